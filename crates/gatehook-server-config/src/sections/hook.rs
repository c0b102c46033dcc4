// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Inbound hook authentication.

use gatehook_common_config::SecretString;
use serde::Deserialize;
use subtle::ConstantTimeEq;

/// Hook endpoint settings (runtime, fully resolved).
///
/// Without a token the hook endpoint rejects every request.
#[derive(Debug, Clone, Default)]
pub struct HookConfig {
	pub token: Option<SecretString>,
}

impl HookConfig {
	/// Whether `presented` is the configured token. The comparison runs in
	/// constant time; a length mismatch or a missing token never matches.
	pub fn authorizes(&self, presented: &str) -> bool {
		self.token.as_ref().is_some_and(|expected| {
			expected
				.expose()
				.as_bytes()
				.ct_eq(presented.as_bytes())
				.into()
		})
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookConfigLayer {
	#[serde(default)]
	pub token: Option<SecretString>,
}

impl HookConfigLayer {
	pub fn merge(&mut self, other: HookConfigLayer) {
		if other.token.is_some() {
			self.token = other.token;
		}
	}

	pub fn finalize(self) -> HookConfig {
		HookConfig {
			token: self.token.filter(|t| !t.is_empty()),
		}
	}
}
