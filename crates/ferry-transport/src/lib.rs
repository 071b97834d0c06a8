// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Encrypted transport for block and filesystem state transfer.
//!
//! A transfer endpoint speaks plaintext on a local port. This crate wraps it in
//! an stunnel TLS proxy by:
//!
//! - rendering an stunnel config into a ConfigMap
//! - issuing a certificate/key pair into a Secret
//! - describing the proxy container and its volumes for the workload builder
//!
//! The server end issues the certificate; the client end copies it.

mod certs;
mod config;
mod descriptors;
mod endpoint;
mod error;
mod naming;
mod provisioner;
mod render;
mod state;

pub use certs::{CertificateIssuer, CertificateMaterial};
pub use config::{
	TransportConfig, CERTS_DIR, CONFIG_KEY, DEFAULT_ACCEPT_PORT, DEFAULT_BINARY,
	DEFAULT_CERT_COMMON_NAME, DEFAULT_CERT_VALIDITY_DAYS, DEFAULT_CONFIG_PATH, DEFAULT_IMAGE,
	TLS_CRT_KEY, TLS_KEY_KEY,
};
pub use descriptors::{proxy_containers, proxy_volumes, CONTAINER_NAME};
pub use endpoint::{Endpoint, PeerAddress, StaticEndpoint};
pub use error::TransportError;
pub use naming::{NamingScheme, TunnelIdentity, DEFAULT_CONFIG_PREFIX, DEFAULT_SECRET_PREFIX};
pub use provisioner::Provisioner;
pub use render::{parse_accept_port, ConfigRenderer, CLIENT_CONFIG_TEMPLATE, SERVER_CONFIG_TEMPLATE};
pub use state::{Role, TransportState, TransportSummary};
