// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The result of one provisioning call.

use ferry_common_secret::SecretBytes;
use ferry_k8s::{Container, Volume};
use serde::Serialize;

use crate::naming::TunnelIdentity;

/// Which end of the tunnel a state describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
	/// Accepts TLS, forwards plaintext to the local transfer listener
	Server,
	/// Accepts plaintext locally, forwards TLS to the server
	Client,
}

/// Everything a workload builder needs to embed a proxy for one endpoint.
///
/// Built up during a single provisioning call and handed to the caller. The
/// provisioner keeps no copy.
#[derive(Debug, Clone)]
pub struct TransportState {
	role: Role,
	identity: TunnelIdentity,
	port: u16,
	crt: Vec<u8>,
	key: SecretBytes,
	containers: Vec<Container>,
	volumes: Vec<Volume>,
}

impl TransportState {
	pub(crate) fn new(role: Role, identity: TunnelIdentity) -> Self {
		Self {
			role,
			identity,
			port: 0,
			crt: Vec::new(),
			key: SecretBytes::new(Vec::new()),
			containers: Vec::new(),
			volumes: Vec::new(),
		}
	}

	pub(crate) fn set_port(&mut self, port: u16) {
		self.port = port;
	}

	pub(crate) fn set_material(&mut self, crt: Vec<u8>, key: SecretBytes) {
		self.crt = crt;
		self.key = key;
	}

	pub(crate) fn set_descriptors(&mut self, containers: Vec<Container>, volumes: Vec<Volume>) {
		self.containers = containers;
		self.volumes = volumes;
	}

	pub fn role(&self) -> Role {
		self.role
	}

	pub fn identity(&self) -> &TunnelIdentity {
		&self.identity
	}

	/// Port the proxy listens on.
	pub fn port(&self) -> u16 {
		self.port
	}

	/// PEM certificate both proxies present and trust.
	pub fn crt(&self) -> &[u8] {
		&self.crt
	}

	pub fn key(&self) -> &SecretBytes {
		&self.key
	}

	pub fn containers(&self) -> &[Container] {
		&self.containers
	}

	pub fn volumes(&self) -> &[Volume] {
		&self.volumes
	}

	/// A serializable view without key material.
	pub fn summary(&self) -> TransportSummary<'_> {
		TransportSummary {
			role: self.role,
			namespace: self.identity.namespace(),
			config_name: self.identity.config_name(),
			secret_name: self.identity.secret_name(),
			port: self.port,
			containers: &self.containers,
			volumes: &self.volumes,
		}
	}
}

#[derive(Debug, Serialize)]
pub struct TransportSummary<'a> {
	pub role: Role,
	pub namespace: &'a str,
	pub config_name: &'a str,
	pub secret_name: &'a str,
	pub port: u16,
	pub containers: &'a [Container],
	pub volumes: &'a [Volume],
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::naming::NamingScheme;
	use ferry_k8s::NamespacedName;

	#[test]
	fn summary_serializes_without_key() {
		let identity = NamingScheme::default().artifact_names(&NamespacedName::new("ns1", "wk1"));
		let mut state = TransportState::new(Role::Server, identity);
		state.set_port(2222);
		state.set_material(b"CERT".to_vec(), SecretBytes::from("PRIVATE".to_string()));

		let json = serde_json::to_value(state.summary()).unwrap();
		assert_eq!(json["role"], "server");
		assert_eq!(json["port"], 2222);
		assert_eq!(json["config_name"], "ferry-stunnel-config-wk1");
		assert!(!json.to_string().contains("PRIVATE"));
	}

	#[test]
	fn debug_redacts_key() {
		let identity = NamingScheme::default().artifact_names(&NamespacedName::new("ns1", "wk1"));
		let mut state = TransportState::new(Role::Client, identity);
		state.set_material(b"CERT".to_vec(), SecretBytes::from("PRIVATE".to_string()));

		assert!(!format!("{state:?}").contains("PRIVATE"));
	}
}
