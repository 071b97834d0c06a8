// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use kube::{
	api::{Api, PostParams},
	Client,
};
use tracing::debug;

use crate::client::K8sClient;
use crate::error::K8sError;
use crate::types::{ConfigMap, Secret, CONFIG_MAP_KIND, SECRET_KIND};

/// Production K8s client implementation using the kube crate.
pub struct KubeClient {
	client: Client,
}

impl KubeClient {
	/// Create a new KubeClient that auto-discovers cluster configuration.
	///
	/// This will attempt to load config from:
	/// 1. In-cluster service account (when running in K8s)
	/// 2. KUBECONFIG environment variable
	/// 3. ~/.kube/config
	pub async fn new() -> Result<Self, K8sError> {
		let client = Client::try_default().await?;
		debug!("K8s client initialized");
		Ok(Self { client })
	}

	pub fn from_client(client: Client) -> Self {
		Self { client }
	}
}

fn object_name(meta_name: Option<&String>) -> String {
	meta_name.cloned().unwrap_or_default()
}

fn map_create_error(err: kube::Error, kind: &'static str, namespace: &str, name: String) -> K8sError {
	match err {
		kube::Error::Api(ref resp) if resp.code == 409 => K8sError::AlreadyExists {
			kind,
			namespace: namespace.to_string(),
			name,
		},
		e => e.into(),
	}
}

fn map_get_error(err: kube::Error, kind: &'static str, namespace: &str, name: &str) -> K8sError {
	match err {
		kube::Error::Api(ref resp) if resp.code == 404 => K8sError::NotFound {
			kind,
			namespace: namespace.to_string(),
			name: name.to_string(),
		},
		e => e.into(),
	}
}

#[async_trait]
impl K8sClient for KubeClient {
	async fn create_config_map(
		&self,
		namespace: &str,
		config_map: ConfigMap,
	) -> Result<ConfigMap, K8sError> {
		let api: Api<ConfigMap> = Api::namespaced(self.client.clone(), namespace);
		let name = object_name(config_map.metadata.name.as_ref());
		api
			.create(&PostParams::default(), &config_map)
			.await
			.map_err(|e| map_create_error(e, CONFIG_MAP_KIND, namespace, name))
	}

	async fn get_config_map(&self, name: &str, namespace: &str) -> Result<ConfigMap, K8sError> {
		let api: Api<ConfigMap> = Api::namespaced(self.client.clone(), namespace);
		api
			.get(name)
			.await
			.map_err(|e| map_get_error(e, CONFIG_MAP_KIND, namespace, name))
	}

	async fn create_secret(&self, namespace: &str, secret: Secret) -> Result<Secret, K8sError> {
		let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
		let name = object_name(secret.metadata.name.as_ref());
		api
			.create(&PostParams::default(), &secret)
			.await
			.map_err(|e| map_create_error(e, SECRET_KIND, namespace, name))
	}

	async fn get_secret(&self, name: &str, namespace: &str) -> Result<Secret, K8sError> {
		let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
		api
			.get(name)
			.await
			.map_err(|e| map_get_error(e, SECRET_KIND, namespace, name))
	}
}
