// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Configuration for the Gatehook server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Validation of the settings the hook cannot run without
//! - Consistent environment variable naming (`GATEHOOK_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use gatehook_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use gatehook_management::{ManagementConfig, ManagementCredential};
use gatehook_signup::SignupConfig;
use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub hook: HookConfig,
	pub signup: SignupConfig,
	pub management: ManagementConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`GATEHOOK_SERVER_*`)
/// 2. Config file (`/etc/gatehook/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let hook = layer.hook.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let signup = layer.signup.unwrap_or_default().finalize()?;
	let management = layer.management.unwrap_or_default().finalize()?;

	let credential = match &management.credential {
		ManagementCredential::StaticToken(_) => "static_token",
		ManagementCredential::ClientCredentials { .. } => "client_credentials",
	};

	info!(
		host = %http.host,
		port = http.port,
		default_role_id = %signup.default_role_id,
		management_domain = %management.domain,
		management_credential = credential,
		hook_token_configured = hook.token.is_some(),
		log_format = ?logging.format,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		hook,
		signup,
		management,
		logging,
	})
}
