// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Router tests for the post-login hook endpoint.
//!
//! Requests are driven through the full router, including the bearer-token
//! middleware, with a recording role assigner in place of the management API.

use std::sync::Arc;

use axum::{
	body::{to_bytes, Body},
	http::{header, Request, StatusCode},
	Router,
};
use gatehook_common_secret::SecretString;
use gatehook_management::{ManagementError, MockRoleAssigner, RoleAssignment, UserSelector};
use gatehook_server::{create_router, AppState};
use gatehook_server_config::HookConfig;
use gatehook_signup::{RoleId, SignupConfig, SignupRoleAssigner};
use serde_json::{json, Value};
use tower::ServiceExt;

const HOOK_TOKEN: &str = "hook-shared-secret";

fn app_with_token(token: Option<&str>) -> (Router, MockRoleAssigner) {
	let mock = MockRoleAssigner::new();
	let signup = SignupRoleAssigner::new(
		SignupConfig::new(RoleId::new("role_abc").unwrap()),
		Arc::new(mock.clone()),
	);
	let router = create_router(
		AppState::new(signup),
		HookConfig {
			token: token.map(|t| SecretString::new(t.to_string())),
		},
	);
	(router, mock)
}

fn app() -> (Router, MockRoleAssigner) {
	app_with_token(Some(HOOK_TOKEN))
}

fn payload(logins_count: Value) -> Value {
	json!({
		"user": {
			"user_id": "auth0|u1",
			"email": "ada@example.com",
			"app_metadata": {}
		},
		"context": {
			"clientID": "client-1",
			"stats": { "loginsCount": logins_count },
			"accessToken": "event-token"
		}
	})
}

fn hook_request(body: &Value, token: Option<&str>) -> Request<Body> {
	let mut builder = Request::builder()
		.method("POST")
		.uri("/hooks/post-login")
		.header(header::CONTENT_TYPE, "application/json");
	if let Some(token) = token {
		builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
	}
	builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
	let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
	serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn new_user_is_assigned_and_payload_echoed() {
	let (app, mock) = app();
	let body = payload(json!(0));

	let response = app
		.oneshot(hook_request(&body, Some(HOOK_TOKEN)))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(body_json(response).await, body);
	assert_eq!(
		mock.calls(),
		vec![(
			UserSelector::by_id("auth0|u1"),
			RoleAssignment::single(RoleId::new("role_abc").unwrap())
		)]
	);
}

#[tokio::test]
async fn returning_user_is_echoed_without_call() {
	let (app, mock) = app();
	let body = payload(json!(3));

	let response = app
		.oneshot(hook_request(&body, Some(HOOK_TOKEN)))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(body_json(response).await, body);
	assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn assignment_failure_still_returns_ok() {
	let (app, mock) = app();
	mock.fail_next(ManagementError::Api {
		status: 500,
		message: "internal error".to_string(),
	});
	let body = payload(json!(1));

	let response = app
		.oneshot(hook_request(&body, Some(HOOK_TOKEN)))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(body_json(response).await, body);
	assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn missing_stats_counts_as_new_user() {
	let (app, mock) = app();
	let body = json!({
		"user": { "user_id": "auth0|u2" },
		"context": {}
	});

	let response = app
		.oneshot(hook_request(&body, Some(HOOK_TOKEN)))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(body_json(response).await, body);
	assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn null_login_count_is_assigned_and_echoed_without_the_key() {
	let (app, mock) = app();
	let body = payload(Value::Null);

	let response = app
		.oneshot(hook_request(&body, Some(HOOK_TOKEN)))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let echoed = body_json(response).await;
	assert_eq!(echoed["user"], body["user"]);
	assert_eq!(echoed["context"]["stats"], json!({}));
	assert_eq!(echoed["context"]["clientID"], "client-1");
	assert_eq!(echoed["context"]["accessToken"], "event-token");
	assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn missing_authorization_is_rejected() {
	let (app, mock) = app();

	let response = app
		.oneshot(hook_request(&payload(json!(0)), None))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn wrong_token_is_rejected() {
	let (app, mock) = app();

	let response = app
		.oneshot(hook_request(&payload(json!(0)), Some("hook-shared-secreT")))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn unconfigured_token_rejects_everything() {
	let (app, mock) = app_with_token(None);

	let response = app
		.oneshot(hook_request(&payload(json!(0)), Some(HOOK_TOKEN)))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn empty_user_id_is_a_client_error() {
	let (app, mock) = app();
	let body = json!({
		"user": { "user_id": "" },
		"context": { "stats": { "loginsCount": 0 } }
	});

	let response = app
		.oneshot(hook_request(&body, Some(HOOK_TOKEN)))
		.await
		.unwrap();

	assert!(response.status().is_client_error());
	assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn health_needs_no_token() {
	let (app, _mock) = app();

	let response = app
		.oneshot(
			Request::builder()
				.uri("/health")
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert_eq!(body["status"], "ok");
	assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
