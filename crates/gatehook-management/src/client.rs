// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Management API client implementation.

use std::time::Duration;

use gatehook_common_http::{retry, RetryConfig};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, error, instrument, warn};
use url::Url;

use crate::credential::{ManagementCredential, TokenSource};
use crate::error::ManagementError;
use crate::types::{RoleAssignment, UserSelector};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Kept under the identity provider's hook execution limit.
const DEFAULT_DEADLINE: Duration = Duration::from_secs(15);

/// Settings for [`ManagementClient`].
#[derive(Debug, Clone)]
pub struct ManagementConfig {
	/// Tenant domain, e.g. `example.us.auth0.com`.
	pub domain: String,
	pub credential: ManagementCredential,
	/// Overrides `https://{domain}`; used for private deployments and tests.
	pub base_url: Option<String>,
	/// Per-request timeout.
	pub timeout: Duration,
	/// Bound on one `assign_roles` call, covering retries and backoff.
	pub deadline: Duration,
	pub retry_config: RetryConfig,
}

impl ManagementConfig {
	pub fn new(domain: impl Into<String>, credential: ManagementCredential) -> Self {
		Self {
			domain: domain.into(),
			credential,
			base_url: None,
			timeout: DEFAULT_TIMEOUT,
			deadline: DEFAULT_DEADLINE,
			retry_config: RetryConfig::default(),
		}
	}

	/// Sets a custom base URL for the API (useful for testing).
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = Some(base_url.into());
		self
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	pub fn with_deadline(mut self, deadline: Duration) -> Self {
		self.deadline = deadline;
		self
	}

	pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
		self.retry_config = retry_config;
		self
	}

	fn resolved_base_url(&self) -> String {
		self
			.base_url
			.clone()
			.unwrap_or_else(|| format!("https://{}", self.domain))
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorBody {
	message: Option<String>,
	error: Option<String>,
}

/// Client for the identity provider's management API.
pub struct ManagementClient {
	http_client: Client,
	base_url: String,
	tokens: TokenSource,
	retry_config: RetryConfig,
	deadline: Duration,
}

impl ManagementClient {
	pub fn new(config: ManagementConfig) -> Result<Self, ManagementError> {
		if config.domain.trim().is_empty() {
			return Err(ManagementError::InvalidConfig(
				"domain cannot be empty".to_string(),
			));
		}

		let base_url = config.resolved_base_url();
		Url::parse(&base_url)
			.map_err(|e| ManagementError::InvalidConfig(format!("invalid base URL {base_url}: {e}")))?;
		let base_url = base_url.trim_end_matches('/').to_string();

		let http_client = gatehook_common_http::builder()
			.timeout(config.timeout)
			.build()?;

		Ok(Self {
			tokens: TokenSource::new(config.credential, &base_url, &config.domain),
			http_client,
			base_url,
			retry_config: config.retry_config,
			deadline: config.deadline,
		})
	}

	/// Grants `assignment.roles` to the selected user.
	///
	/// Transient failures (timeouts, 429, 5xx) are retried per the client's
	/// [`RetryConfig`]. A 401 on an exchanged token triggers one more round
	/// with a fresh token. The whole call gives up with
	/// [`ManagementError::Timeout`] once the configured deadline passes.
	#[instrument(skip(self, assignment), fields(user_id = %selector.id, roles = assignment.roles.len()))]
	pub async fn assign_roles(
		&self,
		selector: &UserSelector,
		assignment: &RoleAssignment,
	) -> Result<(), ManagementError> {
		let url = self.user_roles_url(&selector.id);
		let attempt = self.assign_roles_refreshing(&url, assignment);
		match tokio::time::timeout(self.deadline, attempt).await {
			Ok(result) => result,
			Err(_) => {
				warn!(
					deadline_ms = self.deadline.as_millis() as u64,
					"role assignment did not finish before the deadline"
				);
				Err(ManagementError::Timeout)
			}
		}
	}

	async fn assign_roles_refreshing(
		&self,
		url: &str,
		assignment: &RoleAssignment,
	) -> Result<(), ManagementError> {
		match retry(&self.retry_config, || self.assign_roles_once(url, assignment)).await {
			// The 401 already dropped the cached token, so this round re-exchanges.
			Err(ManagementError::Unauthorized { status: 401, .. }) if self.tokens.is_exchanged() => {
				debug!("exchanged management token rejected; retrying with a new one");
				retry(&self.retry_config, || self.assign_roles_once(url, assignment)).await
			}
			result => result,
		}
	}

	fn user_roles_url(&self, user_id: &str) -> String {
		format!(
			"{}/api/v2/users/{}/roles",
			self.base_url,
			urlencoding::encode(user_id)
		)
	}

	async fn assign_roles_once(
		&self,
		url: &str,
		assignment: &RoleAssignment,
	) -> Result<(), ManagementError> {
		let token = self.tokens.bearer(&self.http_client).await?;

		debug!(url = %url, "sending role assignment");

		let response = self
			.http_client
			.post(url)
			.bearer_auth(token.expose())
			.json(assignment)
			.send()
			.await
			.map_err(|e| {
				if e.is_timeout() {
					return ManagementError::Timeout;
				}
				ManagementError::Network(e)
			})?;

		let status = response.status();
		debug!(status = %status, "received management API response");

		if status.is_success() {
			return Ok(());
		}

		let retry_after_secs = response
			.headers()
			.get(reqwest::header::RETRY_AFTER)
			.and_then(|v| v.to_str().ok())
			.and_then(|s| s.trim().parse().ok());
		let body = response.text().await.unwrap_or_default();
		let message = error_message(&body);

		match status {
			StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
				if status == StatusCode::UNAUTHORIZED {
					self.tokens.invalidate().await;
				}
				error!(status = status.as_u16(), "management API rejected credentials");
				Err(ManagementError::Unauthorized {
					status: status.as_u16(),
					message,
				})
			}
			StatusCode::NOT_FOUND => Err(ManagementError::NotFound(message)),
			StatusCode::TOO_MANY_REQUESTS => Err(ManagementError::RateLimited { retry_after_secs }),
			_ => Err(ManagementError::Api {
				status: status.as_u16(),
				message,
			}),
		}
	}
}

/// Prefer the provider's JSON `message`, then `error`, then the raw body.
fn error_message(body: &str) -> String {
	serde_json::from_str::<ApiErrorBody>(body)
		.ok()
		.and_then(|b| b.message.or(b.error))
		.unwrap_or_else(|| body.to_string())
}
