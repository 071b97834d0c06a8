// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the ferry transport provisioner.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Validation of the resolved [`TransportConfig`]
//! - Consistent environment variable naming (`FERRY_TRANSPORT_*`, `FERRY_LOG_*`)
//!
//! # Usage
//!
//! ```ignore
//! use ferry_config::load_config;
//!
//! let config = load_config()?;
//! println!("proxies accept on {}", config.transport.accept_port);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use ferry_transport::TransportConfig;
pub use layer::FerryConfigLayer;
pub use sections::*;
pub use sources::{
	ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, SYSTEM_CONFIG_PATH,
};

use tracing::{debug, info};

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FerryConfig {
	pub transport: TransportConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`FERRY_*`)
/// 2. Config file (`/etc/ferry/ferry.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<FerryConfig, ConfigError> {
	load_from(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<FerryConfig, ConfigError> {
	load_from(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<FerryConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = FerryConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: FerryConfigLayer) -> Result<FerryConfig, ConfigError> {
	let transport = layer.transport.unwrap_or_default().finalize()?;
	let logging = layer.logging.unwrap_or_default().finalize();

	info!(
		accept_port = transport.accept_port,
		image = %transport.image,
		config_prefix = %transport.naming.config_prefix,
		secret_prefix = %transport.naming.secret_prefix,
		log_level = %logging.level,
		"Ferry configuration loaded"
	);

	Ok(FerryConfig { transport, logging })
}
