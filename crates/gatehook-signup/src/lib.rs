// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Post-login hook that grants a default role to new users.
//!
//! [`SignupRoleAssigner::evaluate`] reads the login count from the event
//! context. Users with at most one login get the configured role through a
//! [`RoleAssigner`]; returning users are left alone. The hook never fails its
//! caller: assignment errors are logged and the identity and context are
//! returned exactly as received.

mod assigner;
mod types;

pub use assigner::{
	is_new_user, AssignmentOutcome, HookCompletion, RoleAssignmentRequest, SignupConfig,
	SignupRoleAssigner, RETURNING_USER_THRESHOLD,
};
pub use gatehook_management::{RoleAssigner, RoleId};
pub use types::{EmptyUserId, EventContext, Identity, LoginStats, UserId};
