// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use thiserror::Error;

/// Errors that can occur during K8s operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum K8sError {
	#[error("K8s API error: {message}")]
	ApiError { message: String },

	#[error("{kind} already exists: {namespace}/{name}")]
	AlreadyExists {
		kind: &'static str,
		namespace: String,
		name: String,
	},

	#[error("{kind} not found: {namespace}/{name}")]
	NotFound {
		kind: &'static str,
		namespace: String,
		name: String,
	},
}

impl From<kube::Error> for K8sError {
	fn from(err: kube::Error) -> Self {
		K8sError::ApiError {
			message: err.to_string(),
		}
	}
}
