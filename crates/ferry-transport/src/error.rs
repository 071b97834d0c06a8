// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Transport provisioning error types.

use ferry_k8s::K8sError;

/// Errors that can occur while provisioning or looking up a tunnel.
///
/// None of these are retried here. A failed call leaves any artifact it
/// already created in place.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
	/// A built-in config template failed to parse
	#[error("stunnel config template is malformed: {0}")]
	Template(#[source] minijinja::Error),

	/// Substituting ports into a config template failed
	#[error("failed to render stunnel config: {0}")]
	Render(#[source] minijinja::Error),

	/// Key or certificate generation failed
	#[error("certificate generation failed: {message}")]
	CertGen { message: String },

	/// An artifact with the derived name already exists
	#[error("{kind} {namespace}/{name} already exists")]
	StoreCreateConflict {
		kind: &'static str,
		namespace: String,
		name: String,
	},

	/// The object store could not be reached or rejected the call
	#[error("object store unavailable: {message}")]
	StoreUnavailable { message: String },

	/// The artifact has not been provisioned yet
	#[error("{kind} {namespace}/{name} not found")]
	StoreNotFound {
		kind: &'static str,
		namespace: String,
		name: String,
	},

	/// The provisioner was built with settings that cannot produce a working tunnel
	#[error("invalid transport config: {message}")]
	InvalidConfig { message: String },

	/// A persisted artifact is missing data this crate writes
	#[error("{kind} {namespace}/{name} is invalid: {message}")]
	InvalidArtifact {
		kind: &'static str,
		namespace: String,
		name: String,
		message: String,
	},
}

impl TransportError {
	/// The peer's artifacts do not exist yet. Retryable by the caller.
	pub fn is_not_ready(&self) -> bool {
		matches!(self, TransportError::StoreNotFound { .. })
	}

	/// A second provisioning attempt for the same identity.
	pub fn is_conflict(&self) -> bool {
		matches!(self, TransportError::StoreCreateConflict { .. })
	}
}

impl From<K8sError> for TransportError {
	fn from(err: K8sError) -> Self {
		match err {
			K8sError::AlreadyExists {
				kind,
				namespace,
				name,
			} => TransportError::StoreCreateConflict {
				kind,
				namespace,
				name,
			},
			K8sError::NotFound {
				kind,
				namespace,
				name,
			} => TransportError::StoreNotFound {
				kind,
				namespace,
				name,
			},
			K8sError::ApiError { message } => TransportError::StoreUnavailable { message },
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn already_exists_maps_to_conflict() {
		let err: TransportError = K8sError::AlreadyExists {
			kind: "ConfigMap",
			namespace: "ns1".to_string(),
			name: "cfg".to_string(),
		}
		.into();
		assert!(err.is_conflict());
		assert!(!err.is_not_ready());
		assert_eq!(err.to_string(), "ConfigMap ns1/cfg already exists");
	}

	#[test]
	fn not_found_is_retryable_signal() {
		let err: TransportError = K8sError::NotFound {
			kind: "Secret",
			namespace: "ns1".to_string(),
			name: "sec".to_string(),
		}
		.into();
		assert!(err.is_not_ready());
	}

	#[test]
	fn api_error_maps_to_unavailable() {
		let err: TransportError = K8sError::ApiError {
			message: "connection refused".to_string(),
		}
		.into();
		assert!(matches!(err, TransportError::StoreUnavailable { ref message } if message == "connection refused"));
	}
}
