// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Transport provisioner configuration.

use crate::error::TransportError;
use crate::naming::NamingScheme;

/// TLS-facing port the server proxy accepts on, and the local port the client proxy listens on.
pub const DEFAULT_ACCEPT_PORT: u16 = 2222;
pub const DEFAULT_IMAGE: &str = "quay.io/ferry/stunnel:latest";
pub const DEFAULT_BINARY: &str = "/bin/stunnel";
pub const DEFAULT_CONFIG_PATH: &str = "/etc/stunnel/stunnel.conf";
pub const DEFAULT_CERT_COMMON_NAME: &str = "ferry-tunnel";
pub const DEFAULT_CERT_VALIDITY_DAYS: u32 = 365;

/// Mount point of the secret volume. The rendered templates name
/// `tls.crt`/`tls.key` under this directory literally.
pub const CERTS_DIR: &str = "/etc/stunnel/certs";

/// Key of the rendered config inside the ConfigMap.
pub const CONFIG_KEY: &str = "stunnel.conf";
pub const TLS_CRT_KEY: &str = "tls.crt";
pub const TLS_KEY_KEY: &str = "tls.key";

/// Configuration for the transport provisioner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
	/// Port the proxy listens on in its container
	pub accept_port: u16,
	/// Image carrying the stunnel binary
	pub image: String,
	/// Path of the stunnel binary inside the image
	pub binary: String,
	/// In-container path the rendered config is mounted at
	pub config_path: String,
	/// Artifact name prefixes
	pub naming: NamingScheme,
	/// Common name of the issued leaf certificate
	pub cert_common_name: String,
	/// Leaf and CA validity in days
	pub cert_validity_days: u32,
}

impl TransportConfig {
	/// Reject settings that would render an unusable proxy or clashing artifact names.
	pub fn validate(&self) -> Result<(), TransportError> {
		let invalid = |message: &str| {
			Err(TransportError::InvalidConfig {
				message: message.to_string(),
			})
		};

		if self.accept_port == 0 {
			return invalid("accept_port must be non-zero");
		}
		if self.cert_validity_days == 0 {
			return invalid("cert_validity_days must be non-zero");
		}
		if self.naming.config_prefix.is_empty() {
			return invalid("config_prefix must not be empty");
		}
		if self.naming.secret_prefix.is_empty() {
			return invalid("secret_prefix must not be empty");
		}
		// Equal prefixes give the ConfigMap and Secret of an endpoint the same
		// name, and their pod volumes too.
		if self.naming.config_prefix == self.naming.secret_prefix {
			return invalid("config_prefix and secret_prefix must differ");
		}
		Ok(())
	}
}

impl Default for TransportConfig {
	fn default() -> Self {
		Self {
			accept_port: DEFAULT_ACCEPT_PORT,
			image: DEFAULT_IMAGE.to_string(),
			binary: DEFAULT_BINARY.to_string(),
			config_path: DEFAULT_CONFIG_PATH.to_string(),
			naming: NamingScheme::default(),
			cert_common_name: DEFAULT_CERT_COMMON_NAME.to_string(),
			cert_validity_days: DEFAULT_CERT_VALIDITY_DAYS,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_config_is_valid() {
		assert!(TransportConfig::default().validate().is_ok());
	}

	#[test]
	fn zero_accept_port_is_rejected() {
		let config = TransportConfig {
			accept_port: 0,
			..Default::default()
		};
		let err = config.validate().unwrap_err();
		assert!(matches!(err, TransportError::InvalidConfig { .. }));
		assert!(err.to_string().contains("accept_port"));
	}

	#[test]
	fn zero_validity_is_rejected() {
		let config = TransportConfig {
			cert_validity_days: 0,
			..Default::default()
		};
		assert!(config.validate().is_err());
	}

	#[test]
	fn prefixes_must_be_present_and_distinct() {
		let empty = TransportConfig {
			naming: NamingScheme::new("", "sec-"),
			..Default::default()
		};
		assert!(empty.validate().unwrap_err().to_string().contains("config_prefix"));

		let same = TransportConfig {
			naming: NamingScheme::new("x-", "x-"),
			..Default::default()
		};
		assert!(same.validate().unwrap_err().to_string().contains("must differ"));
	}
}
