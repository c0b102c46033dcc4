// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client with consistent User-Agent header.

use reqwest::{Client, ClientBuilder};

/// Creates a client builder carrying the standard Gatehook User-Agent.
///
/// Use this when the caller needs to customize the client before building.
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Returns the standard Gatehook User-Agent string.
///
/// Format: `gatehook/{version} ({os}-{arch})`, e.g. `gatehook/0.1.0 (linux-x86_64)`.
pub fn user_agent() -> String {
	format!(
		"gatehook/{} ({}-{})",
		env!("CARGO_PKG_VERSION"),
		std::env::consts::OS,
		std::env::consts::ARCH
	)
}
