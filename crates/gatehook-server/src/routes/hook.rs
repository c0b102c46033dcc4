// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Post-login hook endpoint.

use axum::{extract::State, Json};
use gatehook_signup::{EventContext, Identity};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Request and response body of the hook: the user and the event context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookPayload {
	pub user: Identity,
	pub context: EventContext,
}

/// POST /hooks/post-login
///
/// Always answers 200 with the payload it received, whether the role was
/// granted, skipped, or failed. Bodies that do not parse are rejected by the
/// extractor before the hook runs.
pub async fn post_login(
	State(state): State<AppState>,
	Json(payload): Json<HookPayload>,
) -> Json<HookPayload> {
	let (user, context) = state
		.signup
		.evaluate(payload.user, payload.context)
		.await
		.into_parts();

	Json(HookPayload { user, context })
}
