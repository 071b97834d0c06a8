// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! In-memory object store with the same create/get contract as the API server.
//!
//! Used by tests and by dry runs of the CLI. Every call is recorded so that
//! callers can assert on ordering, and failures can be injected per operation.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::client::K8sClient;
use crate::error::K8sError;
use crate::types::{ConfigMap, NamespacedName, Secret, CONFIG_MAP_KIND, SECRET_KIND};

/// The kind of call made against a [`MemoryClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
	CreateConfigMap,
	GetConfigMap,
	CreateSecret,
	GetSecret,
}

/// A recorded call against a [`MemoryClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
	pub kind: OperationKind,
	pub target: NamespacedName,
}

#[derive(Default)]
struct Store {
	config_maps: BTreeMap<NamespacedName, ConfigMap>,
	secrets: BTreeMap<NamespacedName, Secret>,
	operations: Vec<Operation>,
	failures: HashMap<OperationKind, K8sError>,
}

#[derive(Default)]
pub struct MemoryClient {
	store: Mutex<Store>,
}

impl MemoryClient {
	pub fn new() -> Self {
		Self::default()
	}

	fn lock(&self) -> MutexGuard<'_, Store> {
		self.store.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// Make the next call of `kind` fail with `error`. One-shot.
	pub fn inject_failure(&self, kind: OperationKind, error: K8sError) {
		self.lock().failures.insert(kind, error);
	}

	/// All calls made so far, in order.
	pub fn operations(&self) -> Vec<Operation> {
		self.lock().operations.clone()
	}

	pub fn config_map_count(&self) -> usize {
		self.lock().config_maps.len()
	}

	pub fn secret_count(&self) -> usize {
		self.lock().secrets.len()
	}

	/// Insert a Secret directly, bypassing create semantics and the call log.
	pub fn seed_secret(&self, namespace: &str, mut secret: Secret) {
		let name = secret.metadata.name.clone().unwrap_or_default();
		secret.metadata.namespace = Some(namespace.to_string());
		self
			.lock()
			.secrets
			.insert(NamespacedName::new(namespace, name), secret);
	}
}

fn begin(
	store: &mut Store,
	kind: OperationKind,
	namespace: &str,
	name: &str,
) -> Result<NamespacedName, K8sError> {
	let target = NamespacedName::new(namespace, name);
	store.operations.push(Operation {
		kind,
		target: target.clone(),
	});
	if let Some(err) = store.failures.remove(&kind) {
		return Err(err);
	}
	if name.is_empty() {
		return Err(K8sError::ApiError {
			message: "metadata.name is required".to_string(),
		});
	}
	Ok(target)
}

#[async_trait]
impl K8sClient for MemoryClient {
	async fn create_config_map(
		&self,
		namespace: &str,
		mut config_map: ConfigMap,
	) -> Result<ConfigMap, K8sError> {
		let mut store = self.lock();
		let name = config_map.metadata.name.clone().unwrap_or_default();
		let key = begin(&mut store, OperationKind::CreateConfigMap, namespace, &name)?;
		if store.config_maps.contains_key(&key) {
			return Err(K8sError::AlreadyExists {
				kind: CONFIG_MAP_KIND,
				namespace: key.namespace,
				name: key.name,
			});
		}
		config_map.metadata.namespace = Some(namespace.to_string());
		store.config_maps.insert(key, config_map.clone());
		Ok(config_map)
	}

	async fn get_config_map(&self, name: &str, namespace: &str) -> Result<ConfigMap, K8sError> {
		let mut store = self.lock();
		let key = begin(&mut store, OperationKind::GetConfigMap, namespace, name)?;
		store
			.config_maps
			.get(&key)
			.cloned()
			.ok_or_else(|| K8sError::NotFound {
				kind: CONFIG_MAP_KIND,
				namespace: key.namespace,
				name: key.name,
			})
	}

	async fn create_secret(&self, namespace: &str, mut secret: Secret) -> Result<Secret, K8sError> {
		let mut store = self.lock();
		let name = secret.metadata.name.clone().unwrap_or_default();
		let key = begin(&mut store, OperationKind::CreateSecret, namespace, &name)?;
		if store.secrets.contains_key(&key) {
			return Err(K8sError::AlreadyExists {
				kind: SECRET_KIND,
				namespace: key.namespace,
				name: key.name,
			});
		}
		secret.metadata.namespace = Some(namespace.to_string());
		store.secrets.insert(key, secret.clone());
		Ok(secret)
	}

	async fn get_secret(&self, name: &str, namespace: &str) -> Result<Secret, K8sError> {
		let mut store = self.lock();
		let key = begin(&mut store, OperationKind::GetSecret, namespace, name)?;
		store
			.secrets
			.get(&key)
			.cloned()
			.ok_or_else(|| K8sError::NotFound {
				kind: SECRET_KIND,
				namespace: key.namespace,
				name: key.name,
			})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::ObjectMeta;

	fn config_map(name: &str) -> ConfigMap {
		ConfigMap {
			metadata: ObjectMeta {
				name: Some(name.to_string()),
				..Default::default()
			},
			data: Some(BTreeMap::from([("k".to_string(), "v".to_string())])),
			..Default::default()
		}
	}

	#[tokio::test]
	async fn create_then_get_returns_stored_object() {
		let client = MemoryClient::new();
		client
			.create_config_map("ns1", config_map("cm"))
			.await
			.unwrap();

		let got = client.get_config_map("cm", "ns1").await.unwrap();
		assert_eq!(got.metadata.namespace.as_deref(), Some("ns1"));
		assert_eq!(got.data.unwrap().get("k").map(String::as_str), Some("v"));
	}

	#[tokio::test]
	async fn create_is_create_only() {
		let client = MemoryClient::new();
		client
			.create_config_map("ns1", config_map("cm"))
			.await
			.unwrap();

		let err = client
			.create_config_map("ns1", config_map("cm"))
			.await
			.unwrap_err();
		assert!(matches!(err, K8sError::AlreadyExists { kind: "ConfigMap", .. }));
		assert_eq!(client.config_map_count(), 1);
	}

	#[tokio::test]
	async fn same_name_in_other_namespace_does_not_clash() {
		let client = MemoryClient::new();
		client
			.create_config_map("ns1", config_map("cm"))
			.await
			.unwrap();
		client
			.create_config_map("ns2", config_map("cm"))
			.await
			.unwrap();
		assert_eq!(client.config_map_count(), 2);
	}

	#[tokio::test]
	async fn get_missing_is_not_found() {
		let client = MemoryClient::new();
		let err = client.get_secret("nope", "ns1").await.unwrap_err();
		assert_eq!(
			err,
			K8sError::NotFound {
				kind: "Secret",
				namespace: "ns1".to_string(),
				name: "nope".to_string(),
			}
		);
	}

	#[tokio::test]
	async fn injected_failure_fires_once() {
		let client = MemoryClient::new();
		client.inject_failure(
			OperationKind::CreateConfigMap,
			K8sError::ApiError {
				message: "connection refused".to_string(),
			},
		);

		assert!(client
			.create_config_map("ns1", config_map("cm"))
			.await
			.is_err());
		assert!(client
			.create_config_map("ns1", config_map("cm"))
			.await
			.is_ok());
		assert_eq!(client.operations().len(), 2);
	}

	#[tokio::test]
	async fn missing_name_is_rejected() {
		let client = MemoryClient::new();
		let err = client
			.create_secret("ns1", Secret::default())
			.await
			.unwrap_err();
		assert!(matches!(err, K8sError::ApiError { .. }));
	}
}
