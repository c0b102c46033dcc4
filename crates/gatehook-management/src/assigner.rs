// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;

use crate::client::ManagementClient;
use crate::error::ManagementError;
use crate::types::{RoleAssignment, UserSelector};

/// Grants roles to users. Implemented by [`ManagementClient`] and by
/// [`crate::MockRoleAssigner`] for tests.
#[async_trait]
pub trait RoleAssigner: Send + Sync {
	async fn assign_roles(
		&self,
		selector: &UserSelector,
		assignment: &RoleAssignment,
	) -> Result<(), ManagementError>;
}

#[async_trait]
impl RoleAssigner for ManagementClient {
	async fn assign_roles(
		&self,
		selector: &UserSelector,
		assignment: &RoleAssignment,
	) -> Result<(), ManagementError> {
		ManagementClient::assign_roles(self, selector, assignment).await
	}
}
