// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Hook payload types.
//!
//! Only the fields the hook reads are typed. Everything else the identity
//! provider sends is kept in a flattened map so that a record serializes back
//! to the same JSON it was parsed from.

use gatehook_common_secret::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("user id must not be empty")]
pub struct EmptyUserId;

/// The identity provider's unique user identifier, e.g. `auth0|5f7c8ec7`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
	pub fn new(id: impl Into<String>) -> Result<Self, EmptyUserId> {
		let id = id.into();
		if id.is_empty() {
			return Err(EmptyUserId);
		}
		Ok(Self(id))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl TryFrom<String> for UserId {
	type Error = EmptyUserId;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl From<UserId> for String {
	fn from(id: UserId) -> Self {
		id.0
	}
}

impl fmt::Display for UserId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// The user record created by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
	pub user_id: UserId,
	/// Provider-assigned attributes (email, name, app_metadata, ...).
	#[serde(flatten)]
	pub attributes: Map<String, Value>,
}

impl Identity {
	pub fn new(user_id: UserId) -> Self {
		Self {
			user_id,
			attributes: Map::new(),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginStats {
	#[serde(
		rename = "loginsCount",
		default,
		skip_serializing_if = "Option::is_none"
	)]
	pub logins_count: Option<u64>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Per-login metadata handed to the hook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventContext {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stats: Option<LoginStats>,
	/// Credential scoped to this event. Never logged.
	#[serde(
		rename = "accessToken",
		default,
		skip_serializing_if = "Option::is_none"
	)]
	pub access_token: Option<SecretString>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl EventContext {
	pub fn with_logins_count(logins_count: u64) -> Self {
		Self {
			stats: Some(LoginStats {
				logins_count: Some(logins_count),
				extra: Map::new(),
			}),
			..Default::default()
		}
	}

	/// Login count with a missing stats record or counter read as 0.
	pub fn logins_count(&self) -> u64 {
		self
			.stats
			.as_ref()
			.and_then(|stats| stats.logins_count)
			.unwrap_or(0)
	}
}
