// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! K8s object store abstraction for tunnel artifact provisioning.
//!
//! This crate provides:
//! - A trait-based client for the ConfigMap and Secret operations provisioning needs
//! - Production implementation using the kube crate
//! - An in-memory implementation with identical create-only semantics

mod client;
mod error;
mod kube_client;
mod memory;
mod types;

pub use client::K8sClient;
pub use error::K8sError;
pub use kube_client::KubeClient;
pub use memory::{MemoryClient, Operation, OperationKind};
pub use types::{
	ByteString, ConfigMap, ConfigMapVolumeSource, Container, ContainerPort, KeyToPath,
	NamespacedName, ObjectMeta, Secret, SecretVolumeSource, Volume, VolumeMount, CONFIG_MAP_KIND,
	SECRET_KIND,
};
