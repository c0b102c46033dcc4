// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;
use std::str::FromStr;

use gatehook_common_config::load_secret_env;
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	HookConfigLayer, HttpConfigLayer, LogFormat, LoggingConfigLayer, ManagementConfigLayer,
	SignupConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is not an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/gatehook/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: GATEHOOK_SERVER_<SECTION>_<FIELD>. Secrets also accept
/// `<VAR>_FILE`.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			hook: Some(load_hook_from_env()?),
			signup: Some(load_signup_from_env()),
			management: Some(load_management_from_env()?),
			logging: Some(load_logging_from_env()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
	match env_var(name) {
		Some(v) => v.trim().parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid {} value '{v}'", std::any::type_name::<T>()),
		}),
		None => Ok(None),
	}
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	Ok(HttpConfigLayer {
		host: env_var("GATEHOOK_SERVER_HOST"),
		port: env_parse("GATEHOOK_SERVER_PORT")?,
	})
}

fn load_hook_from_env() -> Result<HookConfigLayer, ConfigError> {
	Ok(HookConfigLayer {
		token: load_secret_env("GATEHOOK_SERVER_HOOK_TOKEN")?,
	})
}

fn load_signup_from_env() -> SignupConfigLayer {
	SignupConfigLayer {
		default_role_id: env_var("GATEHOOK_SERVER_DEFAULT_ROLE_ID"),
	}
}

fn load_management_from_env() -> Result<ManagementConfigLayer, ConfigError> {
	Ok(ManagementConfigLayer {
		domain: env_var("GATEHOOK_SERVER_MANAGEMENT_DOMAIN"),
		token: load_secret_env("GATEHOOK_SERVER_MANAGEMENT_TOKEN")?,
		client_id: env_var("GATEHOOK_SERVER_MANAGEMENT_CLIENT_ID"),
		client_secret: load_secret_env("GATEHOOK_SERVER_MANAGEMENT_CLIENT_SECRET")?,
		audience: env_var("GATEHOOK_SERVER_MANAGEMENT_AUDIENCE"),
		base_url: env_var("GATEHOOK_SERVER_MANAGEMENT_BASE_URL"),
		timeout_secs: env_parse("GATEHOOK_SERVER_MANAGEMENT_TIMEOUT_SECS")?,
		deadline_secs: env_parse("GATEHOOK_SERVER_MANAGEMENT_DEADLINE_SECS")?,
		max_attempts: env_parse("GATEHOOK_SERVER_MANAGEMENT_MAX_ATTEMPTS")?,
	})
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	let format = env_var("GATEHOOK_SERVER_LOG_FORMAT")
		.map(|v| LogFormat::from_str_value(&v))
		.transpose()?;

	Ok(LoggingConfigLayer {
		level: env_var("GATEHOOK_SERVER_LOG_LEVEL"),
		format,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let layer = DefaultsSource.load().unwrap();
		assert!(layer.http.is_none());
		assert!(layer.management.is_none());
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let layer = TomlSource::new("/nonexistent/gatehook.toml").load().unwrap();
		assert!(layer.http.is_none());
	}

	#[test]
	fn test_toml_source_reads_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[signup]\ndefault_role_id = \"rol_member\"").unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		assert_eq!(
			layer.signup.unwrap().default_role_id.as_deref(),
			Some("rol_member")
		);
	}

	#[test]
	fn test_toml_source_reports_parse_errors() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[http]\nport = \"not a number\"").unwrap();

		let err = TomlSource::new(file.path()).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}

	#[test]
	fn test_env_parse_rejects_garbage() {
		std::env::set_var("GATEHOOK_TEST_SOURCES_PORT", "eighty");
		let result: Result<Option<u16>, _> = env_parse("GATEHOOK_TEST_SOURCES_PORT");
		std::env::remove_var("GATEHOOK_TEST_SOURCES_PORT");
		assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
	}

	#[test]
	fn test_env_parse_reads_number() {
		std::env::set_var("GATEHOOK_TEST_SOURCES_ATTEMPTS", " 4 ");
		let result: Option<u32> = env_parse("GATEHOOK_TEST_SOURCES_ATTEMPTS").unwrap();
		std::env::remove_var("GATEHOOK_TEST_SOURCES_ATTEMPTS");
		assert_eq!(result, Some(4));
	}
}
