// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Provisioning of stunnel artifacts for both tunnel roles.
//!
//! The two roles are provisioned independently and share one certificate:
//!
//! - the server role always issues a certificate and publishes it in its
//!   secret artifact, never reads one;
//! - the client role reads the server's secret and copies it, never issues.
//!
//! Until the server has run, the client's read fails with
//! [`TransportError::StoreNotFound`] (see [`TransportError::is_not_ready`]) and
//! nothing is created for the client. Retrying is left to the caller.
//!
//! Steps run strictly in order (config, then secret, then descriptors) and
//! the first failure is returned as-is. Artifacts created before a failure
//! are not deleted.

use std::collections::BTreeMap;
use std::sync::Arc;

use ferry_common_secret::SecretBytes;
use ferry_k8s::{
	ByteString, ConfigMap, K8sClient, NamespacedName, ObjectMeta, Secret, CONFIG_MAP_KIND,
	SECRET_KIND,
};
use tracing::{info, instrument, warn};

use crate::certs::CertificateIssuer;
use crate::config::{TransportConfig, CONFIG_KEY, TLS_CRT_KEY, TLS_KEY_KEY};
use crate::descriptors::{proxy_containers, proxy_volumes};
use crate::endpoint::{Endpoint, PeerAddress};
use crate::error::TransportError;
use crate::naming::TunnelIdentity;
use crate::render::{parse_accept_port, ConfigRenderer};
use crate::state::{Role, TransportState};

/// Creates and looks up the artifacts backing a tunnel endpoint.
pub struct Provisioner {
	client: Arc<dyn K8sClient>,
	config: TransportConfig,
	renderer: ConfigRenderer,
	issuer: CertificateIssuer,
}

impl Provisioner {
	/// Create a new provisioner with the given K8s client and configuration.
	///
	/// Fails with [`TransportError::InvalidConfig`] if `config` does not validate.
	pub fn new(client: Arc<dyn K8sClient>, config: TransportConfig) -> Result<Self, TransportError> {
		config.validate()?;
		let renderer = ConfigRenderer::new()?;
		let issuer = CertificateIssuer::new(config.cert_common_name.clone(), config.cert_validity_days);
		Ok(Self {
			client,
			config,
			renderer,
			issuer,
		})
	}

	/// The validated configuration this provisioner runs with.
	pub fn config(&self) -> &TransportConfig {
		&self.config
	}

	/// Artifact names for an endpoint.
	pub fn identity(&self, endpoint: &NamespacedName) -> TunnelIdentity {
		self.config.naming.artifact_names(endpoint)
	}

	/// Provision the server end: TLS on the configured accept port, plaintext to the endpoint's port.
	#[instrument(skip_all, fields(endpoint = %endpoint.namespaced_name()))]
	pub async fn provision_server<E>(&self, endpoint: &E) -> Result<TransportState, TransportError>
	where
		E: Endpoint + ?Sized,
	{
		let identity = self.identity(&endpoint.namespaced_name());
		let labels = endpoint.labels();
		let mut state = TransportState::new(Role::Server, identity.clone());

		let port = self.config.accept_port;
		state.set_port(port);

		let conf = self.renderer.render_server(port, endpoint.port())?;
		self.create_config(&identity, &labels, conf).await?;

		let material = self.issuer.issue()?;
		self
			.create_secret(&identity, &labels, material.crt.clone(), &material.key)
			.await?;
		state.set_material(material.crt, material.key);

		state.set_descriptors(
			proxy_containers(&self.config, &identity, port),
			proxy_volumes(&identity),
		);

		info!(
			namespace = %identity.namespace(),
			port,
			transfer_port = endpoint.port(),
			"Provisioned stunnel server"
		);
		Ok(state)
	}

	/// Provision the client end against an already provisioned server.
	///
	/// `server` is the server endpoint's identity; its secret is read and
	/// copied into the client's namespace. The client proxy listens on the
	/// configured accept port, so `endpoint.port()` is not consulted. Returns
	/// [`TransportError::StoreNotFound`] without creating anything if the
	/// server has not published its secret yet.
	#[instrument(skip_all, fields(endpoint = %endpoint.namespaced_name(), server = %server, peer = %peer))]
	pub async fn provision_client<E>(
		&self,
		endpoint: &E,
		server: &NamespacedName,
		peer: &PeerAddress,
	) -> Result<TransportState, TransportError>
	where
		E: Endpoint + ?Sized,
	{
		let server_secret = match self.get_secret(server).await {
			Ok(secret) => secret,
			Err(e) if e.is_not_ready() => {
				warn!(server = %server, "server secret not published yet");
				return Err(e);
			}
			Err(e) => return Err(e),
		};
		let server_identity = self.identity(server);
		let (crt, key) = tls_pair(&server_secret, &server_identity.secret_ref())?;

		let identity = self.identity(&endpoint.namespaced_name());
		let labels = endpoint.labels();
		let mut state = TransportState::new(Role::Client, identity.clone());

		let port = self.config.accept_port;
		state.set_port(port);

		let conf = self.renderer.render_client(port, peer)?;
		self.create_config(&identity, &labels, conf).await?;

		self.create_secret(&identity, &labels, crt.clone(), &key).await?;
		state.set_material(crt, key);

		state.set_descriptors(
			proxy_containers(&self.config, &identity, port),
			proxy_volumes(&identity),
		);

		info!(namespace = %identity.namespace(), port, "Provisioned stunnel client");
		Ok(state)
	}

	/// Rebuild a server state from artifacts a previous [`provision_server`](Self::provision_server) created.
	///
	/// Creates nothing and issues nothing.
	#[instrument(skip_all, fields(endpoint = %endpoint))]
	pub async fn load_server(&self, endpoint: &NamespacedName) -> Result<TransportState, TransportError> {
		let identity = self.identity(endpoint);

		let config_map = self.get_config(endpoint).await?;
		let config_ref = identity.config_ref();
		let conf = config_map
			.data
			.as_ref()
			.and_then(|data| data.get(CONFIG_KEY))
			.ok_or_else(|| invalid(CONFIG_MAP_KIND, &config_ref, format!("missing key {CONFIG_KEY}")))?;
		let port = parse_accept_port(conf)
			.ok_or_else(|| invalid(CONFIG_MAP_KIND, &config_ref, "no accept port".to_string()))?;

		let secret = self.get_secret(endpoint).await?;
		let (crt, key) = tls_pair(&secret, &identity.secret_ref())?;

		let mut state = TransportState::new(Role::Server, identity.clone());
		state.set_port(port);
		state.set_material(crt, key);
		state.set_descriptors(
			proxy_containers(&self.config, &identity, port),
			proxy_volumes(&identity),
		);
		Ok(state)
	}

	/// Fetch the config artifact of an endpoint.
	pub async fn get_config(&self, endpoint: &NamespacedName) -> Result<ConfigMap, TransportError> {
		let identity = self.identity(endpoint);
		let config_map = self
			.client
			.get_config_map(identity.config_name(), identity.namespace())
			.await?;
		Ok(config_map)
	}

	/// Fetch the secret artifact of an endpoint.
	pub async fn get_secret(&self, endpoint: &NamespacedName) -> Result<Secret, TransportError> {
		let identity = self.identity(endpoint);
		let secret = self
			.client
			.get_secret(identity.secret_name(), identity.namespace())
			.await?;
		Ok(secret)
	}

	async fn create_config(
		&self,
		identity: &TunnelIdentity,
		labels: &BTreeMap<String, String>,
		conf: String,
	) -> Result<(), TransportError> {
		let config_map = ConfigMap {
			metadata: artifact_meta(identity.config_ref(), labels),
			data: Some(BTreeMap::from([(CONFIG_KEY.to_string(), conf)])),
			..Default::default()
		};
		self
			.client
			.create_config_map(identity.namespace(), config_map)
			.await?;
		info!(config_map = %identity.config_name(), "Created stunnel config");
		Ok(())
	}

	async fn create_secret(
		&self,
		identity: &TunnelIdentity,
		labels: &BTreeMap<String, String>,
		crt: Vec<u8>,
		key: &SecretBytes,
	) -> Result<(), TransportError> {
		let secret = Secret {
			metadata: artifact_meta(identity.secret_ref(), labels),
			data: Some(BTreeMap::from([
				(TLS_CRT_KEY.to_string(), ByteString(crt)),
				(TLS_KEY_KEY.to_string(), ByteString(key.expose().clone())),
			])),
			..Default::default()
		};
		self
			.client
			.create_secret(identity.namespace(), secret)
			.await?;
		info!(secret = %identity.secret_name(), "Created stunnel secret");
		Ok(())
	}
}

fn artifact_meta(target: NamespacedName, labels: &BTreeMap<String, String>) -> ObjectMeta {
	ObjectMeta {
		namespace: Some(target.namespace),
		name: Some(target.name),
		labels: if labels.is_empty() {
			None
		} else {
			Some(labels.clone())
		},
		..Default::default()
	}
}

fn invalid(kind: &'static str, target: &NamespacedName, message: String) -> TransportError {
	TransportError::InvalidArtifact {
		kind,
		namespace: target.namespace.clone(),
		name: target.name.clone(),
		message,
	}
}

/// Extract the `tls.crt`/`tls.key` pair from a secret artifact.
fn tls_pair(secret: &Secret, target: &NamespacedName) -> Result<(Vec<u8>, SecretBytes), TransportError> {
	let data = secret.data.as_ref();
	let field = |key: &str| {
		data
			.and_then(|d| d.get(key))
			.filter(|value| !value.0.is_empty())
			.map(|value| value.0.clone())
			.ok_or_else(|| invalid(SECRET_KIND, target, format!("missing key {key}")))
	};
	let crt = field(TLS_CRT_KEY)?;
	let key = SecretBytes::new(field(TLS_KEY_KEY)?);
	Ok((crt, key))
}
