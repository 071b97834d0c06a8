// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stunnel configuration rendering.
//!
//! Both templates are static. The key and cert lines point into
//! [`CERTS_DIR`](crate::config::CERTS_DIR), which is where the secret volume
//! is mounted; only the ports (and the client's peer host) are substituted.

use minijinja::{context, Environment, UndefinedBehavior};
use tracing::debug;

use crate::endpoint::PeerAddress;
use crate::error::TransportError;

const SERVER_TEMPLATE_NAME: &str = "stunnel-server.conf";
const CLIENT_TEMPLATE_NAME: &str = "stunnel-client.conf";

pub const SERVER_CONFIG_TEMPLATE: &str = "foreground = yes
pid =
socket = l:TCP_NODELAY=1
socket = r:TCP_NODELAY=1
debug = 7
sslVersion = TLSv1.2
[rsync]
accept = {{acceptPort}}
connect = {{connectPort}}
key = /etc/stunnel/certs/tls.key
cert = /etc/stunnel/certs/tls.crt
TIMEOUTclose = 0
";

pub const CLIENT_CONFIG_TEMPLATE: &str = "foreground = yes
pid =
sslVersion = TLSv1.2
client = yes
syslog = no
[rsync]
debug = 7
accept = {{acceptPort}}
cert = /etc/stunnel/certs/tls.crt
connect = {{connectHost}}:{{connectPort}}
key = /etc/stunnel/certs/tls.key
";

/// Renders stunnel configs for both tunnel roles.
pub struct ConfigRenderer {
	env: Environment<'static>,
}

impl ConfigRenderer {
	/// Parse the built-in templates.
	pub fn new() -> Result<Self, TransportError> {
		Self::with_templates(SERVER_CONFIG_TEMPLATE, CLIENT_CONFIG_TEMPLATE)
	}

	fn with_templates(server: &'static str, client: &'static str) -> Result<Self, TransportError> {
		let mut env = Environment::new();
		env.set_keep_trailing_newline(true);
		env.set_undefined_behavior(UndefinedBehavior::Strict);
		env
			.add_template(SERVER_TEMPLATE_NAME, server)
			.map_err(TransportError::Template)?;
		env
			.add_template(CLIENT_TEMPLATE_NAME, client)
			.map_err(TransportError::Template)?;
		Ok(Self { env })
	}

	/// Render the server config: accept TLS on `accept_port`, forward plaintext to `connect_port`.
	pub fn render_server(&self, accept_port: u16, connect_port: u16) -> Result<String, TransportError> {
		debug!(accept_port, connect_port, "rendering stunnel server config");
		self
			.env
			.get_template(SERVER_TEMPLATE_NAME)
			.and_then(|tmpl| {
				tmpl.render(context! {
					acceptPort => accept_port,
					connectPort => connect_port,
				})
			})
			.map_err(TransportError::Render)
	}

	/// Render the client config: accept plaintext on `accept_port`, forward TLS to `peer`.
	pub fn render_client(&self, accept_port: u16, peer: &PeerAddress) -> Result<String, TransportError> {
		debug!(accept_port, peer = %peer, "rendering stunnel client config");
		self
			.env
			.get_template(CLIENT_TEMPLATE_NAME)
			.and_then(|tmpl| {
				tmpl.render(context! {
					acceptPort => accept_port,
					connectHost => &peer.host,
					connectPort => peer.port,
				})
			})
			.map_err(TransportError::Render)
	}
}

/// Recover the `accept = <port>` value from a rendered config.
pub fn parse_accept_port(config: &str) -> Option<u16> {
	config
		.lines()
		.find_map(|line| line.trim().strip_prefix("accept = "))
		.and_then(|port| port.trim().parse().ok())
}
