// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::assigner::RoleAssigner;
use crate::error::ManagementError;
use crate::types::{RoleAssignment, UserSelector};

/// In-memory [`RoleAssigner`] for tests.
///
/// Every call is recorded. Calls succeed unless a failure was queued with
/// [`MockRoleAssigner::fail_next`]; queued failures are consumed in order.
#[derive(Clone, Default)]
pub struct MockRoleAssigner {
	calls: Arc<Mutex<Vec<(UserSelector, RoleAssignment)>>>,
	failures: Arc<Mutex<VecDeque<ManagementError>>>,
}

impl MockRoleAssigner {
	pub fn new() -> Self {
		Self::default()
	}

	/// Queue an error for the next unanswered call.
	pub fn fail_next(&self, error: ManagementError) {
		self.failures.lock().unwrap().push_back(error);
	}

	/// Builder form of [`MockRoleAssigner::fail_next`].
	pub fn failing_with(self, error: ManagementError) -> Self {
		self.fail_next(error);
		self
	}

	/// Returns the recorded calls.
	pub fn calls(&self) -> Vec<(UserSelector, RoleAssignment)> {
		self.calls.lock().unwrap().clone()
	}

	pub fn call_count(&self) -> usize {
		self.calls.lock().unwrap().len()
	}
}

#[async_trait]
impl RoleAssigner for MockRoleAssigner {
	async fn assign_roles(
		&self,
		selector: &UserSelector,
		assignment: &RoleAssignment,
	) -> Result<(), ManagementError> {
		self
			.calls
			.lock()
			.unwrap()
			.push((selector.clone(), assignment.clone()));

		match self.failures.lock().unwrap().pop_front() {
			Some(error) => Err(error),
			None => Ok(()),
		}
	}
}
