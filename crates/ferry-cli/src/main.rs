// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `ferry` - provision stunnel artifacts for encrypted state transfer.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ferry_config::{FerryConfig, LoggingConfig};
use ferry_k8s::{K8sClient, KubeClient, MemoryClient};
use ferry_transport::Provisioner;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser, Debug)]
#[command(
	name = "ferry",
	about = "Provision encrypted transport tunnels for state transfer",
	version
)]
struct Args {
	/// Config file (defaults to /etc/ferry/ferry.toml)
	#[arg(long, global = true, env = "FERRY_CONFIG")]
	config: Option<PathBuf>,

	/// Run against an in-memory object store instead of the cluster
	#[arg(long, global = true)]
	dry_run: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Provision the server end: issue the certificate and publish it
	Server(commands::ServerArgs),
	/// Provision the client end from an already provisioned server
	Client(commands::ClientArgs),
	/// Print the stored artifacts of an endpoint
	Show(commands::ShowArgs),
}

fn init_tracing(logging: &LoggingConfig) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));
	let registry = tracing_subscriber::registry().with(filter);

	// Logs go to stderr; stdout carries the JSON result.
	if logging.json {
		registry
			.with(
				tracing_subscriber::fmt::layer()
					.json()
					.with_writer(std::io::stderr),
			)
			.init();
	} else {
		registry
			.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
			.init();
	}
}

fn load_config(path: Option<&PathBuf>) -> Result<FerryConfig> {
	let config = match path {
		Some(path) => ferry_config::load_config_with_file(path)?,
		None => ferry_config::load_config()?,
	};
	Ok(config)
}

async fn connect(dry_run: bool) -> Result<Arc<dyn K8sClient>> {
	if dry_run {
		tracing::info!("dry run, using in-memory object store");
		return Ok(Arc::new(MemoryClient::new()));
	}
	Ok(Arc::new(KubeClient::new().await?))
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	let config = load_config(args.config.as_ref())?;
	init_tracing(&config.logging);

	let client = connect(args.dry_run).await?;
	let provisioner = Provisioner::new(client, config.transport)?;

	let output = match &args.command {
		Command::Server(server) => commands::server(&provisioner, server).await?,
		Command::Client(client) => commands::client(&provisioner, client).await?,
		Command::Show(show) => commands::show(&provisioner, show).await?,
	};

	println!("{}", serde_json::to_string_pretty(&output)?);
	Ok(())
}
