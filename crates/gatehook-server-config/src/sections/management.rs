// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Management API connection settings.

use std::time::Duration;

use gatehook_common_config::SecretString;
use gatehook_management::{ManagementConfig, ManagementCredential, RetryConfig};
use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DEADLINE_SECS: u64 = 15;
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Management API configuration layer (partial, for merging).
///
/// Exactly one credential must be configured: a static `token`, or a
/// `client_id` and `client_secret` pair for the client-credentials grant.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManagementConfigLayer {
	#[serde(default)]
	pub domain: Option<String>,
	#[serde(default)]
	pub token: Option<SecretString>,
	#[serde(default)]
	pub client_id: Option<String>,
	#[serde(default)]
	pub client_secret: Option<SecretString>,
	#[serde(default)]
	pub audience: Option<String>,
	#[serde(default)]
	pub base_url: Option<String>,
	#[serde(default)]
	pub timeout_secs: Option<u64>,
	#[serde(default)]
	pub deadline_secs: Option<u64>,
	#[serde(default)]
	pub max_attempts: Option<u32>,
}

impl ManagementConfigLayer {
	pub fn merge(&mut self, other: ManagementConfigLayer) {
		if other.domain.is_some() {
			self.domain = other.domain;
		}
		if other.token.is_some() {
			self.token = other.token;
		}
		if other.client_id.is_some() {
			self.client_id = other.client_id;
		}
		if other.client_secret.is_some() {
			self.client_secret = other.client_secret;
		}
		if other.audience.is_some() {
			self.audience = other.audience;
		}
		if other.base_url.is_some() {
			self.base_url = other.base_url;
		}
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
		if other.deadline_secs.is_some() {
			self.deadline_secs = other.deadline_secs;
		}
		if other.max_attempts.is_some() {
			self.max_attempts = other.max_attempts;
		}
	}

	pub fn finalize(self) -> Result<ManagementConfig, ConfigError> {
		let domain = self
			.domain
			.filter(|d| !d.trim().is_empty())
			.ok_or(ConfigError::Missing {
				key: "management.domain",
				env_var: "GATEHOOK_SERVER_MANAGEMENT_DOMAIN",
			})?;

		let token = self.token.filter(|t| !t.is_empty());
		let client_secret = self.client_secret.filter(|s| !s.is_empty());

		let credential = match (token, self.client_id, client_secret) {
			(Some(_), Some(_), _) => {
				return Err(ConfigError::Validation(
					"configure either management.token or management.client_id, not both".to_string(),
				))
			}
			(Some(token), None, _) => ManagementCredential::StaticToken(token),
			(None, Some(client_id), Some(client_secret)) => ManagementCredential::ClientCredentials {
				client_id,
				client_secret,
				audience: self.audience,
			},
			(None, Some(_), None) => {
				return Err(ConfigError::Missing {
					key: "management.client_secret",
					env_var: "GATEHOOK_SERVER_MANAGEMENT_CLIENT_SECRET",
				})
			}
			(None, None, _) => {
				return Err(ConfigError::Validation(
					"no management API credential: set GATEHOOK_SERVER_MANAGEMENT_TOKEN or \
					 GATEHOOK_SERVER_MANAGEMENT_CLIENT_ID and GATEHOOK_SERVER_MANAGEMENT_CLIENT_SECRET"
						.to_string(),
				))
			}
		};

		let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
		if timeout_secs == 0 {
			return Err(ConfigError::InvalidValue {
				key: "management.timeout_secs".to_string(),
				message: "must be greater than zero".to_string(),
			});
		}

		let deadline_secs = self.deadline_secs.unwrap_or(DEFAULT_DEADLINE_SECS);
		if deadline_secs == 0 {
			return Err(ConfigError::InvalidValue {
				key: "management.deadline_secs".to_string(),
				message: "must be greater than zero".to_string(),
			});
		}

		let max_attempts = self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS);
		if max_attempts == 0 {
			return Err(ConfigError::InvalidValue {
				key: "management.max_attempts".to_string(),
				message: "must be at least 1".to_string(),
			});
		}

		let mut config = ManagementConfig::new(domain, credential)
			.with_timeout(Duration::from_secs(timeout_secs))
			.with_deadline(Duration::from_secs(deadline_secs))
			.with_retry_config(RetryConfig {
				max_attempts,
				..RetryConfig::default()
			});
		if let Some(base_url) = self.base_url {
			config = config.with_base_url(base_url);
		}

		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn secret(value: &str) -> Option<SecretString> {
		Some(SecretString::new(value.to_string()))
	}

	fn static_layer() -> ManagementConfigLayer {
		ManagementConfigLayer {
			domain: Some("tenant.example.com".to_string()),
			token: secret("mgmt-token"),
			..Default::default()
		}
	}

	#[test]
	fn test_static_token_with_defaults() {
		let config = static_layer().finalize().unwrap();
		assert_eq!(config.domain, "tenant.example.com");
		assert!(matches!(
			config.credential,
			ManagementCredential::StaticToken(_)
		));
		assert_eq!(config.timeout, Duration::from_secs(10));
		assert_eq!(config.deadline, Duration::from_secs(15));
		assert_eq!(config.retry_config.max_attempts, 3);
		assert!(config.base_url.is_none());
	}

	#[test]
	fn test_client_credentials() {
		let layer = ManagementConfigLayer {
			domain: Some("tenant.example.com".to_string()),
			client_id: Some("m2m".to_string()),
			client_secret: secret("shh"),
			audience: Some("https://api.example.com/".to_string()),
			base_url: Some("http://localhost:9999".to_string()),
			timeout_secs: Some(3),
			deadline_secs: Some(8),
			max_attempts: Some(5),
			..Default::default()
		};
		let config = layer.finalize().unwrap();

		match config.credential {
			ManagementCredential::ClientCredentials {
				client_id,
				client_secret,
				audience,
			} => {
				assert_eq!(client_id, "m2m");
				assert_eq!(client_secret.expose(), "shh");
				assert_eq!(audience.as_deref(), Some("https://api.example.com/"));
			}
			other => panic!("expected client credentials, got {other:?}"),
		}
		assert_eq!(config.base_url.as_deref(), Some("http://localhost:9999"));
		assert_eq!(config.timeout, Duration::from_secs(3));
		assert_eq!(config.deadline, Duration::from_secs(8));
		assert_eq!(config.retry_config.max_attempts, 5);
	}

	#[test]
	fn test_missing_domain() {
		let layer = ManagementConfigLayer {
			domain: None,
			..static_layer()
		};
		assert!(matches!(
			layer.finalize(),
			Err(ConfigError::Missing {
				key: "management.domain",
				..
			})
		));
	}

	#[test]
	fn test_missing_credential() {
		let layer = ManagementConfigLayer {
			token: None,
			..static_layer()
		};
		assert!(matches!(layer.finalize(), Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_client_id_without_secret() {
		let layer = ManagementConfigLayer {
			token: None,
			client_id: Some("m2m".to_string()),
			..static_layer()
		};
		assert!(matches!(
			layer.finalize(),
			Err(ConfigError::Missing {
				key: "management.client_secret",
				..
			})
		));
	}

	#[test]
	fn test_both_credentials_rejected() {
		let layer = ManagementConfigLayer {
			client_id: Some("m2m".to_string()),
			client_secret: secret("shh"),
			..static_layer()
		};
		assert!(matches!(layer.finalize(), Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_zero_attempts_rejected() {
		let layer = ManagementConfigLayer {
			max_attempts: Some(0),
			..static_layer()
		};
		assert!(matches!(
			layer.finalize(),
			Err(ConfigError::InvalidValue { .. })
		));
	}

	#[test]
	fn test_zero_deadline_rejected() {
		let layer = ManagementConfigLayer {
			deadline_secs: Some(0),
			..static_layer()
		};
		assert!(matches!(
			layer.finalize(),
			Err(ConfigError::InvalidValue { key, .. }) if key == "management.deadline_secs"
		));
	}

	#[test]
	fn test_merge_overwrites_only_set_fields() {
		let mut base = static_layer();
		base.merge(ManagementConfigLayer {
			domain: Some("other.example.com".to_string()),
			timeout_secs: Some(30),
			..Default::default()
		});
		assert_eq!(base.domain.as_deref(), Some("other.example.com"));
		assert_eq!(base.timeout_secs, Some(30));
		assert!(base.token.is_some());
	}
}
