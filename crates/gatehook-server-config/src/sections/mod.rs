// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Configuration sections for gatehook-server.

pub mod hook;
pub mod http;
pub mod logging;
pub mod management;
pub mod signup;

pub use hook::{HookConfig, HookConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use management::ManagementConfigLayer;
pub use signup::SignupConfigLayer;
