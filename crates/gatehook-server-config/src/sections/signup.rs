// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use gatehook_signup::{RoleId, SignupConfig};
use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupConfigLayer {
	#[serde(default)]
	pub default_role_id: Option<String>,
}

impl SignupConfigLayer {
	pub fn merge(&mut self, other: SignupConfigLayer) {
		if other.default_role_id.is_some() {
			self.default_role_id = other.default_role_id;
		}
	}

	/// The default role is required; the server refuses to start without one.
	pub fn finalize(self) -> Result<SignupConfig, ConfigError> {
		let raw = self.default_role_id.ok_or(ConfigError::Missing {
			key: "signup.default_role_id",
			env_var: "GATEHOOK_SERVER_DEFAULT_ROLE_ID",
		})?;

		let role_id = RoleId::new(raw).map_err(|e| ConfigError::InvalidValue {
			key: "signup.default_role_id".to_string(),
			message: e.to_string(),
		})?;

		Ok(SignupConfig::new(role_id))
	}
}
