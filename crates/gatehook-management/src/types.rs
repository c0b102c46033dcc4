// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Request types for the management API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A role identifier was empty or whitespace.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("role id must not be empty")]
pub struct EmptyRoleId;

/// Identifier of a role defined in the identity provider, e.g. `rol_8f3kD2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleId(String);

impl RoleId {
	pub fn new(id: impl Into<String>) -> Result<Self, EmptyRoleId> {
		let id = id.into();
		if id.trim().is_empty() {
			return Err(EmptyRoleId);
		}
		Ok(Self(id))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl TryFrom<String> for RoleId {
	type Error = EmptyRoleId;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl From<RoleId> for String {
	fn from(id: RoleId) -> Self {
		id.0
	}
}

impl fmt::Display for RoleId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Selects the user a management operation targets: `{"id": "<user_id>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSelector {
	pub id: String,
}

impl UserSelector {
	pub fn by_id(id: impl Into<String>) -> Self {
		Self { id: id.into() }
	}
}

/// Body of a role grant: `{"roles": ["<role_id>", ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleAssignment {
	pub roles: Vec<RoleId>,
}

impl RoleAssignment {
	pub fn single(role: RoleId) -> Self {
		Self { roles: vec![role] }
	}
}
