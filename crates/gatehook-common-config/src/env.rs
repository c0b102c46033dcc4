// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Loading credentials from environment variables.
//!
//! Every credential Gatehook reads (the hook bearer token, the management API
//! token, the client-credentials secret) can be given either inline as `VAR`
//! or as a path in `VAR_FILE`, which is how Docker and Kubernetes mount
//! secrets.

use std::path::PathBuf;
use std::{env, fs};

use gatehook_common_secret::SecretString;
use thiserror::Error;

/// Errors that can occur when loading secrets from environment variables.
#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// Load a secret using the `VAR` / `VAR_FILE` convention.
///
/// `VAR_FILE` wins over `VAR`. A single trailing newline is stripped from file
/// contents. Empty inline values are treated as unset.
///
/// ```no_run
/// use gatehook_common_config::load_secret_env;
///
/// if let Some(token) = load_secret_env("GATEHOOK_SERVER_MANAGEMENT_TOKEN")? {
///     println!("management token: {token}"); // prints "[REDACTED]"
/// }
/// # Ok::<(), gatehook_common_config::SecretEnvError>(())
/// ```
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(&path_str);
		let content = fs::read_to_string(&path).map_err(|e| SecretEnvError::Io {
			path: path.clone(),
			source: e,
		})?;

		let secret = content.strip_suffix('\n').unwrap_or(&content).to_string();
		return Ok(Some(SecretString::new(secret)));
	}

	match env::var(var) {
		Ok(value) if !value.is_empty() => Ok(Some(SecretString::new(value))),
		_ => Ok(None),
	}
}
