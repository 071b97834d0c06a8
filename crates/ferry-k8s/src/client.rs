// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;

use crate::error::K8sError;
use crate::types::{ConfigMap, Secret};

/// Trait for the K8s object operations tunnel provisioning needs.
///
/// Creates are create-only: an existing object with the same name yields
/// [`K8sError::AlreadyExists`] and is never overwritten. Gets of a missing
/// object yield [`K8sError::NotFound`].
#[async_trait]
pub trait K8sClient: Send + Sync {
	/// Create a ConfigMap in the specified namespace.
	async fn create_config_map(
		&self,
		namespace: &str,
		config_map: ConfigMap,
	) -> Result<ConfigMap, K8sError>;

	/// Get a ConfigMap by name from the specified namespace.
	async fn get_config_map(&self, name: &str, namespace: &str) -> Result<ConfigMap, K8sError>;

	/// Create a Secret in the specified namespace.
	async fn create_secret(&self, namespace: &str, secret: Secret) -> Result<Secret, K8sError>;

	/// Get a Secret by name from the specified namespace.
	async fn get_secret(&self, name: &str, namespace: &str) -> Result<Secret, K8sError>;
}
