// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Default role assignment for newly signed-up users.

use std::sync::Arc;

use gatehook_management::{ManagementError, RoleAssigner, RoleAssignment, RoleId, UserSelector};
use tracing::{debug, info, instrument, warn};

use crate::types::{EventContext, Identity};

/// Users with more logins than this are treated as returning users.
///
/// A count of 1 still qualifies, so a user whose first login did not get the
/// role is picked up on the second.
pub const RETURNING_USER_THRESHOLD: u64 = 1;

/// Whether a user with `logins_count` logins should receive the default role.
pub fn is_new_user(logins_count: u64) -> bool {
	logins_count <= RETURNING_USER_THRESHOLD
}

#[derive(Debug, Clone)]
pub struct SignupConfig {
	/// Role granted to every new user.
	pub default_role_id: RoleId,
}

impl SignupConfig {
	pub fn new(default_role_id: RoleId) -> Self {
		Self { default_role_id }
	}
}

/// A single role grant sent to the management API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignmentRequest {
	pub selector: UserSelector,
	pub assignment: RoleAssignment,
}

impl RoleAssignmentRequest {
	pub fn for_identity(identity: &Identity, role_id: &RoleId) -> Self {
		Self {
			selector: UserSelector::by_id(identity.user_id.as_str()),
			assignment: RoleAssignment::single(role_id.clone()),
		}
	}
}

/// What happened during one hook invocation. Informational only.
#[derive(Debug)]
pub enum AssignmentOutcome {
	/// Returning user; no call was made.
	Skipped { logins_count: u64 },
	Assigned { role_id: RoleId },
	/// The grant failed. The login still proceeds.
	Failed { error: ManagementError },
}

impl AssignmentOutcome {
	pub fn is_skipped(&self) -> bool {
		matches!(self, AssignmentOutcome::Skipped { .. })
	}

	pub fn is_assigned(&self) -> bool {
		matches!(self, AssignmentOutcome::Assigned { .. })
	}

	pub fn is_failed(&self) -> bool {
		matches!(self, AssignmentOutcome::Failed { .. })
	}
}

/// Result of a hook invocation: the caller's identity and context, exactly as
/// they were passed in, plus the outcome.
#[derive(Debug)]
pub struct HookCompletion {
	pub identity: Identity,
	pub context: EventContext,
	pub outcome: AssignmentOutcome,
}

impl HookCompletion {
	pub fn into_parts(self) -> (Identity, EventContext) {
		(self.identity, self.context)
	}
}

/// Grants the configured default role to users on their first logins.
#[derive(Clone)]
pub struct SignupRoleAssigner {
	config: Arc<SignupConfig>,
	client: Arc<dyn RoleAssigner>,
}

impl SignupRoleAssigner {
	pub fn new(config: SignupConfig, client: Arc<dyn RoleAssigner>) -> Self {
		Self {
			config: Arc::new(config),
			client,
		}
	}

	/// Evaluate one post-login event.
	///
	/// Never fails. Management errors are logged and reported in the outcome;
	/// the identity and context are handed back untouched on every path.
	#[instrument(skip_all, fields(user_id = %identity.user_id))]
	pub async fn evaluate(&self, identity: Identity, context: EventContext) -> HookCompletion {
		let logins_count = context.logins_count();

		if !is_new_user(logins_count) {
			debug!(logins_count, "returning user, skipping default role");
			return HookCompletion {
				identity,
				context,
				outcome: AssignmentOutcome::Skipped { logins_count },
			};
		}

		let role_id = &self.config.default_role_id;
		let request = RoleAssignmentRequest::for_identity(&identity, role_id);

		let outcome = match self
			.client
			.assign_roles(&request.selector, &request.assignment)
			.await
		{
			Ok(()) => {
				info!(role_id = %role_id, logins_count, "default role assigned");
				AssignmentOutcome::Assigned {
					role_id: role_id.clone(),
				}
			}
			Err(error) => {
				warn!(
					role_id = %role_id,
					logins_count,
					error = %error,
					"failed to assign default role"
				);
				AssignmentOutcome::Failed { error }
			}
		};

		HookCompletion {
			identity,
			context,
			outcome,
		}
	}

	/// Callback form of [`SignupRoleAssigner::evaluate`] for hosts that hand
	/// the hook a completion function. `completion` runs exactly once, after
	/// the management call (if any) has finished.
	pub async fn evaluate_then<F, R>(
		&self,
		identity: Identity,
		context: EventContext,
		completion: F,
	) -> R
	where
		F: FnOnce(HookCompletion) -> R,
	{
		completion(self.evaluate(identity, context).await)
	}
}
