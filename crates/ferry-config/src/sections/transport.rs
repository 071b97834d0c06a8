// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Transport configuration section.

use ferry_transport::{
	NamingScheme, TransportConfig, DEFAULT_ACCEPT_PORT, DEFAULT_BINARY, DEFAULT_CERT_COMMON_NAME,
	DEFAULT_CERT_VALIDITY_DAYS, DEFAULT_CONFIG_PATH, DEFAULT_CONFIG_PREFIX, DEFAULT_IMAGE,
	DEFAULT_SECRET_PREFIX,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Transport configuration layer (for merging).
///
/// All fields are optional to support layered configuration from
/// multiple sources (defaults, files, environment).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfigLayer {
	pub accept_port: Option<u16>,
	pub image: Option<String>,
	pub binary: Option<String>,
	pub config_path: Option<String>,
	pub config_prefix: Option<String>,
	pub secret_prefix: Option<String>,
	pub cert_common_name: Option<String>,
	pub cert_validity_days: Option<u32>,
}

impl TransportConfigLayer {
	/// Merges another layer on top of this one.
	/// Values from `other` take precedence when present.
	pub fn merge(&mut self, other: TransportConfigLayer) {
		if other.accept_port.is_some() {
			self.accept_port = other.accept_port;
		}
		if other.image.is_some() {
			self.image = other.image;
		}
		if other.binary.is_some() {
			self.binary = other.binary;
		}
		if other.config_path.is_some() {
			self.config_path = other.config_path;
		}
		if other.config_prefix.is_some() {
			self.config_prefix = other.config_prefix;
		}
		if other.secret_prefix.is_some() {
			self.secret_prefix = other.secret_prefix;
		}
		if other.cert_common_name.is_some() {
			self.cert_common_name = other.cert_common_name;
		}
		if other.cert_validity_days.is_some() {
			self.cert_validity_days = other.cert_validity_days;
		}
	}

	/// Resolves this layer into a validated runtime configuration.
	pub fn finalize(self) -> Result<TransportConfig, ConfigError> {
		let config = TransportConfig {
			accept_port: self.accept_port.unwrap_or(DEFAULT_ACCEPT_PORT),
			image: self.image.unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
			binary: self.binary.unwrap_or_else(|| DEFAULT_BINARY.to_string()),
			config_path: self
				.config_path
				.unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string()),
			naming: NamingScheme::new(
				self
					.config_prefix
					.unwrap_or_else(|| DEFAULT_CONFIG_PREFIX.to_string()),
				self
					.secret_prefix
					.unwrap_or_else(|| DEFAULT_SECRET_PREFIX.to_string()),
			),
			cert_common_name: self
				.cert_common_name
				.unwrap_or_else(|| DEFAULT_CERT_COMMON_NAME.to_string()),
			cert_validity_days: self
				.cert_validity_days
				.unwrap_or(DEFAULT_CERT_VALIDITY_DAYS),
		};
		validate(&config)?;
		Ok(config)
	}
}

fn validate(config: &TransportConfig) -> Result<(), ConfigError> {
	for (key, value) in [
		("transport.image", &config.image),
		("transport.binary", &config.binary),
		("transport.config_path", &config.config_path),
		("transport.config_prefix", &config.naming.config_prefix),
		("transport.secret_prefix", &config.naming.secret_prefix),
		("transport.cert_common_name", &config.cert_common_name),
	] {
		if value.trim().is_empty() {
			return Err(ConfigError::Validation(format!("{key} must not be empty")));
		}
	}
	config
		.validate()
		.map_err(|e| ConfigError::Validation(e.to_string()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_layer_finalizes_to_defaults() {
		let config = TransportConfigLayer::default().finalize().unwrap();
		assert_eq!(config, TransportConfig::default());
	}

	#[test]
	fn merge_prefers_other() {
		let mut base = TransportConfigLayer {
			accept_port: Some(2000),
			image: Some("base".to_string()),
			..Default::default()
		};
		base.merge(TransportConfigLayer {
			image: Some("override".to_string()),
			..Default::default()
		});
		assert_eq!(base.accept_port, Some(2000));
		assert_eq!(base.image.as_deref(), Some("override"));
	}

	#[test]
	fn zero_port_is_rejected() {
		let err = TransportConfigLayer {
			accept_port: Some(0),
			..Default::default()
		}
		.finalize()
		.unwrap_err();
		assert!(err.to_string().contains("accept_port"));
	}

	#[test]
	fn identical_prefixes_are_rejected() {
		let err = TransportConfigLayer {
			config_prefix: Some("same-".to_string()),
			secret_prefix: Some("same-".to_string()),
			..Default::default()
		}
		.finalize()
		.unwrap_err();
		assert!(err.to_string().contains("must differ"));
	}

	#[test]
	fn blank_prefix_is_rejected() {
		let err = TransportConfigLayer {
			secret_prefix: Some("  ".to_string()),
			..Default::default()
		}
		.finalize()
		.unwrap_err();
		assert!(err.to_string().contains("transport.secret_prefix"));
	}

	#[test]
	fn zero_validity_is_rejected() {
		assert!(TransportConfigLayer {
			cert_validity_days: Some(0),
			..Default::default()
		}
		.finalize()
		.is_err());
	}

	mod proptests {
		use super::*;
		use proptest::prelude::*;

		fn opt_port() -> impl Strategy<Value = Option<u16>> {
			proptest::option::of(1u16..=u16::MAX)
		}

		proptest! {
			#[test]
			fn merge_takes_latest_present_port(a in opt_port(), b in opt_port()) {
				let mut layer = TransportConfigLayer { accept_port: a, ..Default::default() };
				layer.merge(TransportConfigLayer { accept_port: b, ..Default::default() });
				prop_assert_eq!(layer.accept_port, b.or(a));

				let config = layer.finalize().unwrap();
				prop_assert_eq!(config.accept_port, b.or(a).unwrap_or(DEFAULT_ACCEPT_PORT));
			}
		}
	}
}
