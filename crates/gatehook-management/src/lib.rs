// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Client for the identity provider's management API.
//!
//! Only the operation the signup hook needs is covered: granting roles to a
//! user. Requests authenticate with either a static management token or a
//! client-credentials exchange, and transient failures are retried.
//!
//! # Example
//!
//! ```no_run
//! use gatehook_management::{
//!     ManagementClient, ManagementConfig, ManagementCredential, RoleAssignment, RoleId,
//!     UserSelector,
//! };
//! use gatehook_common_secret::SecretString;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ManagementConfig::new(
//!     "tenant.example.com",
//!     ManagementCredential::StaticToken(SecretString::new("token".to_string())),
//! );
//! let client = ManagementClient::new(config)?;
//! client
//!     .assign_roles(
//!         &UserSelector::by_id("auth0|abc"),
//!         &RoleAssignment::single(RoleId::new("rol_member")?),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod assigner;
mod client;
mod credential;
mod error;
mod mock;
mod types;

pub use assigner::RoleAssigner;
pub use client::{ManagementClient, ManagementConfig};
pub use credential::ManagementCredential;
pub use error::{ManagementError, TokenError};
pub use gatehook_common_http::RetryConfig;
pub use mock::MockRoleAssigner;
pub use types::{EmptyRoleId, RoleAssignment, RoleId, UserSelector};
