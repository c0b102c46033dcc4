// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTTP surface of the Gatehook post-login hook.

pub mod auth;
pub mod routes;
pub mod version;

use axum::{
	middleware,
	routing::{get, post},
	Router,
};
use gatehook_server_config::HookConfig;
use gatehook_signup::SignupRoleAssigner;

pub use routes::hook::HookPayload;

#[derive(Clone)]
pub struct AppState {
	pub signup: SignupRoleAssigner,
}

impl AppState {
	pub fn new(signup: SignupRoleAssigner) -> Self {
		Self { signup }
	}
}

/// Build the router. `/hooks/*` requires the token in `hook`; `/health` is open.
pub fn create_router(state: AppState, hook: HookConfig) -> Router {
	let hooks = Router::new()
		.route("/hooks/post-login", post(routes::hook::post_login))
		.route_layer(middleware::from_fn_with_state(
			hook,
			auth::hook_auth_middleware,
		));

	Router::new()
		.route("/health", get(routes::health::health_check))
		.merge(hooks)
		.with_state(state)
}
