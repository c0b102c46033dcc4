// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Common configuration primitives for Gatehook.
//!
//! - [`Secret<T>`] and [`SecretString`], re-exported from
//!   [`gatehook_common_secret`]
//! - [`load_secret_env`] for reading credentials from `VAR` or `VAR_FILE`

pub mod env;

pub use gatehook_common_secret::{Secret, SecretString, REDACTED};

pub use env::{load_secret_env, SecretEnvError};
