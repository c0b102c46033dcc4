// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Management API credentials and access-token caching.
//!
//! A deployment either hands Gatehook a pre-issued management token, or a
//! machine-to-machine client that exchanges its credentials at
//! `{base}/oauth/token` using the `client_credentials` grant. Exchanged tokens
//! are cached until shortly before they expire.

use std::time::{Duration, Instant};

use gatehook_common_secret::SecretString;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::error::TokenError;

/// Tokens are refreshed this long before the provider says they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// How the client authenticates to the management API.
#[derive(Debug, Clone)]
pub enum ManagementCredential {
	/// A pre-issued management API token.
	StaticToken(SecretString),
	/// Client-credentials grant. `audience` defaults to `https://{domain}/api/v2/`.
	ClientCredentials {
		client_id: String,
		client_secret: SecretString,
		audience: Option<String>,
	},
}

#[derive(Debug, Serialize)]
struct ClientCredentialsRequest<'a> {
	grant_type: &'a str,
	client_id: &'a str,
	client_secret: &'a str,
	audience: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
	access_token: SecretString,
	#[serde(default)]
	expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
	error: String,
	error_description: Option<String>,
}

struct CachedToken {
	token: SecretString,
	refresh_at: Instant,
}

/// Hands out bearer tokens for management API calls.
pub(crate) struct TokenSource {
	credential: ManagementCredential,
	token_url: String,
	default_audience: String,
	cache: RwLock<Option<CachedToken>>,
}

impl TokenSource {
	pub(crate) fn new(credential: ManagementCredential, base_url: &str, domain: &str) -> Self {
		Self {
			credential,
			token_url: format!("{base_url}/oauth/token"),
			default_audience: format!("https://{domain}/api/v2/"),
			cache: RwLock::new(None),
		}
	}

	pub(crate) fn is_exchanged(&self) -> bool {
		matches!(self.credential, ManagementCredential::ClientCredentials { .. })
	}

	/// Current bearer token, exchanging credentials when the cache is cold.
	pub(crate) async fn bearer(&self, http_client: &Client) -> Result<SecretString, TokenError> {
		let (client_id, client_secret, audience) = match &self.credential {
			ManagementCredential::StaticToken(token) => return Ok(token.clone()),
			ManagementCredential::ClientCredentials {
				client_id,
				client_secret,
				audience,
			} => (client_id, client_secret, audience),
		};

		if let Some(cached) = self.cache.read().await.as_ref() {
			if Instant::now() < cached.refresh_at {
				return Ok(cached.token.clone());
			}
		}

		let mut cache = self.cache.write().await;
		// Another caller may have refreshed while we waited for the lock.
		if let Some(cached) = cache.as_ref() {
			if Instant::now() < cached.refresh_at {
				return Ok(cached.token.clone());
			}
		}

		let audience = audience.as_deref().unwrap_or(&self.default_audience);
		let fresh = self
			.exchange(http_client, client_id, client_secret, audience)
			.await?;
		let token = fresh.token.clone();
		*cache = Some(fresh);
		Ok(token)
	}

	/// Drop the cached token so the next call exchanges credentials again.
	pub(crate) async fn invalidate(&self) {
		if self.is_exchanged() {
			debug!("invalidating cached management token");
			*self.cache.write().await = None;
		}
	}

	#[instrument(skip_all, fields(client_id = %client_id, audience = %audience))]
	async fn exchange(
		&self,
		http_client: &Client,
		client_id: &str,
		client_secret: &SecretString,
		audience: &str,
	) -> Result<CachedToken, TokenError> {
		debug!(url = %self.token_url, "requesting management API token");

		let response = http_client
			.post(&self.token_url)
			.form(&ClientCredentialsRequest {
				grant_type: "client_credentials",
				client_id,
				client_secret: client_secret.expose(),
				audience,
			})
			.send()
			.await?;

		let status = response.status();
		let body = response.text().await?;

		if !status.is_success() {
			if let Ok(error_response) = serde_json::from_str::<OAuthErrorResponse>(&body) {
				let message = error_response
					.error_description
					.unwrap_or(error_response.error);
				return Err(TokenError::Rejected(message));
			}
			return Err(TokenError::Rejected(format!("{status}: {body}")));
		}

		let parsed: TokenResponse = serde_json::from_str(&body)
			.map_err(|e| TokenError::InvalidResponse(format!("failed to parse token response: {e}")))?;

		if parsed.access_token.is_empty() {
			return Err(TokenError::InvalidResponse(
				"token response has an empty access_token".to_string(),
			));
		}

		let lifetime = Duration::from_secs(parsed.expires_in.unwrap_or(0));
		let refresh_at = Instant::now() + lifetime.saturating_sub(EXPIRY_MARGIN);
		debug!(
			expires_in_secs = lifetime.as_secs(),
			"management API token acquired"
		);

		Ok(CachedToken {
			token: parsed.access_token,
			refresh_at,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use wiremock::matchers::{body_string_contains, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn client_credentials(audience: Option<&str>) -> ManagementCredential {
		ManagementCredential::ClientCredentials {
			client_id: "m2m-client".to_string(),
			client_secret: SecretString::new("m2m-secret".to_string()),
			audience: audience.map(str::to_string),
		}
	}

	#[tokio::test]
	async fn static_token_is_returned_without_requests() {
		let server = MockServer::start().await;
		let source = TokenSource::new(
			ManagementCredential::StaticToken(SecretString::new("static".to_string())),
			&server.uri(),
			"tenant.example.com",
		);

		let token = source.bearer(&Client::new()).await.unwrap();
		assert_eq!(token.expose(), "static");
		assert!(server.received_requests().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn exchanged_token_is_cached() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/oauth/token"))
			.and(body_string_contains("grant_type=client_credentials"))
			.and(body_string_contains("client_id=m2m-client"))
			.and(body_string_contains(
				"audience=https%3A%2F%2Ftenant.example.com%2Fapi%2Fv2%2F",
			))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"access_token": "exchanged-token",
				"token_type": "Bearer",
				"expires_in": 86400
			})))
			.expect(1)
			.mount(&server)
			.await;

		let source = TokenSource::new(client_credentials(None), &server.uri(), "tenant.example.com");
		let http = Client::new();

		assert_eq!(source.bearer(&http).await.unwrap().expose(), "exchanged-token");
		assert_eq!(source.bearer(&http).await.unwrap().expose(), "exchanged-token");
	}

	#[tokio::test]
	async fn short_lived_token_is_refetched() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/oauth/token"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"access_token": "short-lived",
				"expires_in": 30
			})))
			.expect(2)
			.mount(&server)
			.await;

		let source = TokenSource::new(
			client_credentials(Some("https://custom/api")),
			&server.uri(),
			"tenant.example.com",
		);
		let http = Client::new();

		// 30s is inside the refresh margin, so the token is never reused.
		source.bearer(&http).await.unwrap();
		source.bearer(&http).await.unwrap();
	}

	#[tokio::test]
	async fn invalidate_forces_a_new_exchange() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/oauth/token"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"access_token": "tok",
				"expires_in": 3600
			})))
			.expect(2)
			.mount(&server)
			.await;

		let source = TokenSource::new(client_credentials(None), &server.uri(), "tenant.example.com");
		let http = Client::new();

		source.bearer(&http).await.unwrap();
		source.invalidate().await;
		source.bearer(&http).await.unwrap();
	}

	#[tokio::test]
	async fn rejection_surfaces_error_description() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/oauth/token"))
			.respond_with(ResponseTemplate::new(403).set_body_json(json!({
				"error": "access_denied",
				"error_description": "Service not enabled within domain"
			})))
			.mount(&server)
			.await;

		let source = TokenSource::new(client_credentials(None), &server.uri(), "tenant.example.com");
		let err = source.bearer(&Client::new()).await.unwrap_err();

		match err {
			TokenError::Rejected(message) => {
				assert_eq!(message, "Service not enabled within domain")
			}
			other => panic!("expected Rejected, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn empty_access_token_is_invalid() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/oauth/token"))
			.respond_with(
				ResponseTemplate::new(200).set_body_json(json!({ "access_token": "" })),
			)
			.mount(&server)
			.await;

		let source = TokenSource::new(client_credentials(None), &server.uri(), "tenant.example.com");
		let err = source.bearer(&Client::new()).await.unwrap_err();
		assert!(matches!(err, TokenError::InvalidResponse(_)));
	}

	#[test]
	fn credential_debug_hides_secrets() {
		let rendered = format!("{:?}", client_credentials(None));
		assert!(rendered.contains("m2m-client"));
		assert!(!rendered.contains("m2m-secret"));
	}
}
