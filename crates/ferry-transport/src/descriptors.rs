// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Container and volume descriptors that run a proxy against a tunnel's artifacts.

use ferry_k8s::{
	ConfigMapVolumeSource, Container, ContainerPort, KeyToPath, SecretVolumeSource, Volume,
	VolumeMount,
};

use crate::config::{TransportConfig, CERTS_DIR, CONFIG_KEY, TLS_CRT_KEY, TLS_KEY_KEY};
use crate::naming::TunnelIdentity;

pub const CONTAINER_NAME: &str = "stunnel";
const PORT_NAME: &str = "stunnel";

/// The stunnel container: runs the binary against the mounted config and exposes `port`.
pub fn proxy_containers(
	config: &TransportConfig,
	identity: &TunnelIdentity,
	port: u16,
) -> Vec<Container> {
	vec![Container {
		name: CONTAINER_NAME.to_string(),
		image: Some(config.image.clone()),
		command: Some(vec![config.binary.clone(), config.config_path.clone()]),
		ports: Some(vec![ContainerPort {
			name: Some(PORT_NAME.to_string()),
			protocol: Some("TCP".to_string()),
			container_port: i32::from(port),
			..Default::default()
		}]),
		volume_mounts: Some(vec![
			VolumeMount {
				name: identity.config_name().to_string(),
				mount_path: config.config_path.clone(),
				sub_path: Some(CONFIG_KEY.to_string()),
				..Default::default()
			},
			VolumeMount {
				name: identity.secret_name().to_string(),
				mount_path: CERTS_DIR.to_string(),
				..Default::default()
			},
		]),
		..Default::default()
	}]
}

/// Volumes backing the mounts of [`proxy_containers`], one per artifact.
pub fn proxy_volumes(identity: &TunnelIdentity) -> Vec<Volume> {
	let key_to_path = |key: &str| KeyToPath {
		key: key.to_string(),
		path: key.to_string(),
		mode: None,
	};

	vec![
		Volume {
			name: identity.config_name().to_string(),
			config_map: Some(ConfigMapVolumeSource {
				name: identity.config_name().to_string(),
				..Default::default()
			}),
			..Default::default()
		},
		Volume {
			name: identity.secret_name().to_string(),
			secret: Some(SecretVolumeSource {
				secret_name: Some(identity.secret_name().to_string()),
				items: Some(vec![key_to_path(TLS_CRT_KEY), key_to_path(TLS_KEY_KEY)]),
				..Default::default()
			}),
			..Default::default()
		},
	]
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::naming::NamingScheme;
	use ferry_k8s::NamespacedName;

	fn identity() -> TunnelIdentity {
		NamingScheme::new("cfg-prefix-", "sec-prefix-").artifact_names(&NamespacedName::new("ns1", "wk1"))
	}

	#[test]
	fn container_runs_stunnel_against_mounted_config() {
		let config = TransportConfig::default();
		let containers = proxy_containers(&config, &identity(), 2000);
		assert_eq!(containers.len(), 1);

		let container = &containers[0];
		assert_eq!(container.name, "stunnel");
		assert_eq!(container.image.as_deref(), Some(config.image.as_str()));
		assert_eq!(
			container.command,
			Some(vec![
				"/bin/stunnel".to_string(),
				"/etc/stunnel/stunnel.conf".to_string()
			])
		);

		let ports = container.ports.as_ref().unwrap();
		assert_eq!(ports.len(), 1);
		assert_eq!(ports[0].container_port, 2000);
		assert_eq!(ports[0].protocol.as_deref(), Some("TCP"));
	}

	#[test]
	fn mounts_select_config_key_and_cert_dir() {
		let containers = proxy_containers(&TransportConfig::default(), &identity(), 2000);
		let mounts = containers[0].volume_mounts.as_ref().unwrap();

		assert_eq!(mounts[0].name, "cfg-prefix-wk1");
		assert_eq!(mounts[0].mount_path, "/etc/stunnel/stunnel.conf");
		assert_eq!(mounts[0].sub_path.as_deref(), Some("stunnel.conf"));
		assert_eq!(mounts[1].name, "sec-prefix-wk1");
		assert_eq!(mounts[1].mount_path, "/etc/stunnel/certs");
		assert_eq!(mounts[1].sub_path, None);
	}

	#[test]
	fn volumes_bind_artifacts_by_name() {
		let volumes = proxy_volumes(&identity());
		assert_eq!(volumes.len(), 2);

		assert_eq!(volumes[0].name, "cfg-prefix-wk1");
		assert_eq!(volumes[0].config_map.as_ref().unwrap().name, "cfg-prefix-wk1");

		assert_eq!(volumes[1].name, "sec-prefix-wk1");
		let secret = volumes[1].secret.as_ref().unwrap();
		assert_eq!(secret.secret_name.as_deref(), Some("sec-prefix-wk1"));
		let items: Vec<(&str, &str)> = secret
			.items
			.as_ref()
			.unwrap()
			.iter()
			.map(|i| (i.key.as_str(), i.path.as_str()))
			.collect();
		assert_eq!(items, vec![("tls.crt", "tls.crt"), ("tls.key", "tls.key")]);
	}

	#[test]
	fn every_mount_has_a_volume() {
		let id = identity();
		let containers = proxy_containers(&TransportConfig::default(), &id, 2000);
		let volumes = proxy_volumes(&id);
		for mount in containers[0].volume_mounts.as_ref().unwrap() {
			assert!(volumes.iter().any(|v| v.name == mount.name), "no volume for {}", mount.name);
		}
	}
}
