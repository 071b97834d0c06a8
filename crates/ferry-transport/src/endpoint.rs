// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The logical transfer endpoint a tunnel is provisioned for.

use std::collections::BTreeMap;
use std::fmt;

use ferry_k8s::NamespacedName;

/// One side of a data-transfer channel.
///
/// Implemented by whatever allocates the transfer port and identity. The
/// provisioner only reads it.
pub trait Endpoint: Send + Sync {
	/// Plaintext port the proxy forwards decrypted traffic to.
	fn port(&self) -> u16;

	fn namespaced_name(&self) -> NamespacedName;

	/// Labels copied onto every artifact created for this endpoint.
	fn labels(&self) -> BTreeMap<String, String>;
}

/// A fixed endpoint value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticEndpoint {
	pub namespaced_name: NamespacedName,
	pub port: u16,
	pub labels: BTreeMap<String, String>,
}

impl StaticEndpoint {
	pub fn new(namespace: impl Into<String>, name: impl Into<String>, port: u16) -> Self {
		Self {
			namespaced_name: NamespacedName::new(namespace, name),
			port,
			labels: BTreeMap::new(),
		}
	}

	pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.labels.insert(key.into(), value.into());
		self
	}
}

impl Endpoint for StaticEndpoint {
	fn port(&self) -> u16 {
		self.port
	}

	fn namespaced_name(&self) -> NamespacedName {
		self.namespaced_name.clone()
	}

	fn labels(&self) -> BTreeMap<String, String> {
		self.labels.clone()
	}
}

/// Where the client proxy reaches the server proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerAddress {
	pub host: String,
	pub port: u16,
}

impl PeerAddress {
	pub fn new(host: impl Into<String>, port: u16) -> Self {
		Self {
			host: host.into(),
			port,
		}
	}
}

impl fmt::Display for PeerAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.host, self.port)
	}
}
