// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use clap::Args;
use ferry_k8s::NamespacedName;
use ferry_transport::{PeerAddress, Provisioner, StaticEndpoint, CONFIG_KEY};
use serde::Serialize;
use serde_json::Value;

/// Parse a `key=value` label.
pub fn parse_label(raw: &str) -> Result<(String, String), String> {
	match raw.split_once('=') {
		Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
		_ => Err(format!("invalid label '{raw}', expected key=value")),
	}
}

#[derive(Args, Debug)]
pub struct EndpointArgs {
	/// Namespace the artifacts are created in
	#[arg(long)]
	pub namespace: String,

	/// Endpoint name; artifact names are derived from it
	#[arg(long)]
	pub name: String,

	/// Label applied to every created artifact (repeatable)
	#[arg(long = "label", value_parser = parse_label)]
	pub labels: Vec<(String, String)>,
}

impl EndpointArgs {
	fn endpoint(&self, port: u16) -> StaticEndpoint {
		let mut endpoint = StaticEndpoint::new(&self.namespace, &self.name, port);
		endpoint.labels = self.labels.iter().cloned().collect::<BTreeMap<_, _>>();
		endpoint
	}
}

#[derive(Args, Debug)]
pub struct ServerArgs {
	#[command(flatten)]
	pub endpoint: EndpointArgs,

	/// Local plaintext port of the transfer listener
	#[arg(long)]
	pub port: u16,
}

#[derive(Args, Debug)]
pub struct ClientArgs {
	#[command(flatten)]
	pub endpoint: EndpointArgs,

	/// Namespace of the provisioned server endpoint
	#[arg(long)]
	pub server_namespace: String,

	/// Name of the provisioned server endpoint
	#[arg(long)]
	pub server_name: String,

	/// Externally reachable host of the server proxy
	#[arg(long)]
	pub server_host: String,

	/// Externally reachable port of the server proxy
	#[arg(long)]
	pub server_port: u16,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
	#[arg(long)]
	pub namespace: String,

	#[arg(long)]
	pub name: String,
}

#[derive(Debug, Serialize)]
struct ShowOutput {
	endpoint: String,
	config_map: String,
	config: Option<String>,
	secret: String,
	secret_keys: Vec<String>,
}

pub async fn server(provisioner: &Provisioner, args: &ServerArgs) -> Result<Value> {
	let endpoint = args.endpoint.endpoint(args.port);
	let state = provisioner
		.provision_server(&endpoint)
		.await
		.with_context(|| format!("provisioning server for {}", endpoint.namespaced_name))?;
	Ok(serde_json::to_value(state.summary())?)
}

pub async fn client(provisioner: &Provisioner, args: &ClientArgs) -> Result<Value> {
	// The client proxy itself is the local plaintext listener.
	let endpoint = args.endpoint.endpoint(provisioner.config().accept_port);
	let server = NamespacedName::new(&args.server_namespace, &args.server_name);
	let peer = PeerAddress::new(&args.server_host, args.server_port);

	let state = match provisioner.provision_client(&endpoint, &server, &peer).await {
		Ok(state) => state,
		Err(e) if e.is_not_ready() => {
			return Err(e).with_context(|| format!("server {server} is not provisioned yet"));
		}
		Err(e) => {
			return Err(e)
				.with_context(|| format!("provisioning client for {}", endpoint.namespaced_name));
		}
	};
	Ok(serde_json::to_value(state.summary())?)
}

pub async fn show(provisioner: &Provisioner, args: &ShowArgs) -> Result<Value> {
	let endpoint = NamespacedName::new(&args.namespace, &args.name);
	let identity = provisioner.identity(&endpoint);

	let config_map = provisioner.get_config(&endpoint).await?;
	let secret = provisioner.get_secret(&endpoint).await?;

	let output = ShowOutput {
		endpoint: endpoint.to_string(),
		config_map: identity.config_name().to_string(),
		config: config_map
			.data
			.and_then(|mut data| data.remove(CONFIG_KEY)),
		secret: identity.secret_name().to_string(),
		secret_keys: secret
			.data
			.map(|data| data.into_keys().collect())
			.unwrap_or_default(),
	};
	Ok(serde_json::to_value(output)?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::Parser;
	use ferry_k8s::MemoryClient;
	use ferry_transport::TransportConfig;
	use serde_json::json;
	use std::sync::Arc;

	fn provisioner() -> Provisioner {
		Provisioner::new(Arc::new(MemoryClient::new()), TransportConfig::default()).unwrap()
	}

	fn endpoint_args(namespace: &str, name: &str) -> EndpointArgs {
		EndpointArgs {
			namespace: namespace.to_string(),
			name: name.to_string(),
			labels: vec![("app".to_string(), "rsync".to_string())],
		}
	}

	#[test]
	fn parses_labels() {
		assert_eq!(
			parse_label("app=rsync"),
			Ok(("app".to_string(), "rsync".to_string()))
		);
		assert_eq!(parse_label("empty="), Ok(("empty".to_string(), String::new())));
		assert!(parse_label("novalue").is_err());
		assert!(parse_label("=value").is_err());
	}

	#[tokio::test]
	async fn server_then_show_reports_artifacts() {
		let provisioner = provisioner();
		let summary = server(
			&provisioner,
			&ServerArgs {
				endpoint: endpoint_args("ns1", "wk1"),
				port: 8080,
			},
		)
		.await
		.unwrap();
		assert_eq!(summary["role"], "server");
		assert_eq!(summary["port"], 2222);
		assert_eq!(summary["containers"][0]["name"], "stunnel");

		let shown = show(
			&provisioner,
			&ShowArgs {
				namespace: "ns1".to_string(),
				name: "wk1".to_string(),
			},
		)
		.await
		.unwrap();
		assert_eq!(shown["config_map"], "ferry-stunnel-config-wk1");
		assert_eq!(shown["secret_keys"], json!(["tls.crt", "tls.key"]));
		assert!(shown["config"]
			.as_str()
			.unwrap()
			.contains("connect = 8080\n"));
	}

	#[tokio::test]
	async fn client_before_server_explains_not_ready() {
		let err = client(
			&provisioner(),
			&ClientArgs {
				endpoint: endpoint_args("ns2", "wk1-client"),
				server_namespace: "ns1".to_string(),
				server_name: "wk1".to_string(),
				server_host: "wk1.example.com".to_string(),
				server_port: 443,
			},
		)
		.await
		.unwrap_err();
		assert!(err.to_string().contains("not provisioned yet"));
	}

	fn client_args() -> ClientArgs {
		ClientArgs {
			endpoint: endpoint_args("ns2", "wk1-client"),
			server_namespace: "ns1".to_string(),
			server_name: "wk1".to_string(),
			server_host: "wk1.example.com".to_string(),
			server_port: 443,
		}
	}

	#[tokio::test]
	async fn client_listens_on_accept_port_and_dials_peer() {
		let provisioner = provisioner();
		server(
			&provisioner,
			&ServerArgs {
				endpoint: endpoint_args("ns1", "wk1"),
				port: 8080,
			},
		)
		.await
		.unwrap();

		let summary = client(&provisioner, &client_args()).await.unwrap();
		assert_eq!(summary["role"], "client");
		assert_eq!(summary["port"], 2222);

		let shown = show(
			&provisioner,
			&ShowArgs {
				namespace: "ns2".to_string(),
				name: "wk1-client".to_string(),
			},
		)
		.await
		.unwrap();
		let config = shown["config"].as_str().unwrap();
		assert!(config.contains("accept = 2222\n"));
		assert!(config.contains("connect = wk1.example.com:443\n"));
	}

	#[derive(Parser, Debug)]
	struct ClientCli {
		#[command(flatten)]
		args: ClientArgs,
	}

	#[test]
	fn client_has_no_port_flag() {
		let base = [
			"ferry",
			"--namespace",
			"ns2",
			"--name",
			"wk1-client",
			"--server-namespace",
			"ns1",
			"--server-name",
			"wk1",
			"--server-host",
			"wk1.example.com",
			"--server-port",
			"443",
		];
		assert!(ClientCli::try_parse_from(base).is_ok());

		let with_port = base.iter().copied().chain(["--port", "9999"]);
		assert!(ClientCli::try_parse_from(with_port).is_err());
	}
}
