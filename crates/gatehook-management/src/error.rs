// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for the management API client.

use gatehook_common_http::RetryableError;
use std::time::Duration;
use thiserror::Error;

/// Errors from acquiring a management API access token.
#[derive(Debug, Error)]
pub enum TokenError {
	#[error("token request failed: {0}")]
	Network(#[from] reqwest::Error),

	/// The token endpoint refused the client credentials.
	#[error("token request rejected: {0}")]
	Rejected(String),

	#[error("invalid token response: {0}")]
	InvalidResponse(String),
}

/// Errors that can occur when calling the management API.
#[derive(Debug, Error)]
pub enum ManagementError {
	#[error("network error: {0}")]
	Network(#[from] reqwest::Error),

	#[error("request timed out")]
	Timeout,

	/// 401 or 403: the management token is invalid or lacks the required scope.
	#[error("unauthorized ({status}): {message}")]
	Unauthorized { status: u16, message: String },

	/// The user or one of the roles does not exist.
	#[error("not found: {0}")]
	NotFound(String),

	#[error("rate limit exceeded")]
	RateLimited { retry_after_secs: Option<u64> },

	#[error("management API error: {status} - {message}")]
	Api { status: u16, message: String },

	#[error(transparent)]
	Token(#[from] TokenError),

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
}

impl RetryableError for ManagementError {
	fn is_retryable(&self) -> bool {
		match self {
			ManagementError::Network(e) => e.is_retryable(),
			ManagementError::Timeout => true,
			ManagementError::RateLimited { .. } => true,
			ManagementError::Api { status, .. } => *status >= 500,
			ManagementError::Token(TokenError::Network(e)) => e.is_retryable(),
			ManagementError::Token(_) => false,
			ManagementError::Unauthorized { .. } => false,
			ManagementError::NotFound(_) => false,
			ManagementError::InvalidConfig(_) => false,
		}
	}

	fn retry_after(&self) -> Option<Duration> {
		match self {
			ManagementError::RateLimited {
				retry_after_secs: Some(secs),
			} => Some(Duration::from_secs(*secs)),
			_ => None,
		}
	}
}
