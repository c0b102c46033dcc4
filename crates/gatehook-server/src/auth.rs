// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use axum::{
	extract::{Request, State},
	http::{header::AUTHORIZATION, StatusCode},
	middleware::Next,
	response::Response,
};
use gatehook_server_config::HookConfig;
use tracing::warn;

/// Admits hook calls whose bearer token the [`HookConfig`] authorizes.
pub async fn hook_auth_middleware(
	State(hook): State<HookConfig>,
	request: Request,
	next: Next,
) -> Result<Response, StatusCode> {
	let authorized = match bearer_token(&request) {
		Some(token) => hook.authorizes(token),
		None => {
			warn!("hook request rejected: no bearer token");
			return Err(StatusCode::UNAUTHORIZED);
		}
	};

	if !authorized {
		warn!(
			hook_token_configured = hook.token.is_some(),
			"hook request rejected: bearer token not accepted"
		);
		return Err(StatusCode::UNAUTHORIZED);
	}

	Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<&str> {
	request
		.headers()
		.get(AUTHORIZATION)?
		.to_str()
		.ok()?
		.strip_prefix("Bearer ")
		.map(str::trim)
}
