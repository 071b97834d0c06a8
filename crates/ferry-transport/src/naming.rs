// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Deterministic artifact names for a tunnel endpoint.
//!
//! The server and client sides are provisioned independently and find each
//! other's artifacts only through these names, so the derivation must stay a
//! pure function of the endpoint's namespace and name.
//!
//! The names are not validated here. Callers keep `prefix + name` within the
//! API server's limits (253 characters for the objects, 63 for volume names,
//! DNS-1123 characters).

use ferry_k8s::NamespacedName;

pub const DEFAULT_CONFIG_PREFIX: &str = "ferry-stunnel-config-";
pub const DEFAULT_SECRET_PREFIX: &str = "ferry-stunnel-secret-";

/// Prefixes used to derive artifact names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingScheme {
	pub config_prefix: String,
	pub secret_prefix: String,
}

impl Default for NamingScheme {
	fn default() -> Self {
		Self {
			config_prefix: DEFAULT_CONFIG_PREFIX.to_string(),
			secret_prefix: DEFAULT_SECRET_PREFIX.to_string(),
		}
	}
}

impl NamingScheme {
	pub fn new(config_prefix: impl Into<String>, secret_prefix: impl Into<String>) -> Self {
		Self {
			config_prefix: config_prefix.into(),
			secret_prefix: secret_prefix.into(),
		}
	}

	/// Derive the artifact names for an endpoint.
	pub fn artifact_names(&self, endpoint: &NamespacedName) -> TunnelIdentity {
		TunnelIdentity {
			namespace: endpoint.namespace.clone(),
			config_name: format!("{}{}", self.config_prefix, endpoint.name),
			secret_name: format!("{}{}", self.secret_prefix, endpoint.name),
		}
	}
}

/// The named artifacts belonging to one tunnel endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TunnelIdentity {
	namespace: String,
	config_name: String,
	secret_name: String,
}

impl TunnelIdentity {
	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	/// Name of the ConfigMap, also used as its volume name.
	pub fn config_name(&self) -> &str {
		&self.config_name
	}

	/// Name of the Secret, also used as its volume name.
	pub fn secret_name(&self) -> &str {
		&self.secret_name
	}

	pub fn config_ref(&self) -> NamespacedName {
		NamespacedName::new(&self.namespace, &self.config_name)
	}

	pub fn secret_ref(&self) -> NamespacedName {
		NamespacedName::new(&self.namespace, &self.secret_name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn names_are_prefix_plus_endpoint_name() {
		let scheme = NamingScheme::new("cfg-prefix-", "sec-prefix-");
		let id = scheme.artifact_names(&NamespacedName::new("ns1", "wk1"));

		assert_eq!(id.namespace(), "ns1");
		assert_eq!(id.config_name(), "cfg-prefix-wk1");
		assert_eq!(id.secret_name(), "sec-prefix-wk1");
		assert_eq!(id.config_ref(), NamespacedName::new("ns1", "cfg-prefix-wk1"));
		assert_eq!(id.secret_ref(), NamespacedName::new("ns1", "sec-prefix-wk1"));
	}

	#[test]
	fn default_prefixes() {
		let id = NamingScheme::default().artifact_names(&NamespacedName::new("ns", "rsync"));
		assert_eq!(id.config_name(), "ferry-stunnel-config-rsync");
		assert_eq!(id.secret_name(), "ferry-stunnel-secret-rsync");
	}

	#[test]
	fn same_endpoint_yields_same_identity() {
		let scheme = NamingScheme::default();
		let endpoint = NamespacedName::new("ns1", "wk1");
		assert_eq!(
			scheme.artifact_names(&endpoint),
			scheme.artifact_names(&endpoint.clone())
		);
	}
}
