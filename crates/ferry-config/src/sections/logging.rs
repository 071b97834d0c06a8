// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Logging configuration section.

use serde::{Deserialize, Serialize};

pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfigLayer {
	/// Default filter directive, e.g. `info` or `ferry_transport=debug`
	pub level: Option<String>,
	/// Emit JSON lines instead of human-readable output
	pub json: Option<bool>,
}

impl LoggingConfigLayer {
	pub fn merge(&mut self, other: LoggingConfigLayer) {
		if other.level.is_some() {
			self.level = other.level;
		}
		if other.json.is_some() {
			self.json = other.json;
		}
	}

	pub fn finalize(self) -> LoggingConfig {
		LoggingConfig {
			level: self
				.level
				.filter(|level| !level.trim().is_empty())
				.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
			json: self.json.unwrap_or(false),
		}
	}
}

/// Runtime logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
	pub level: String,
	pub json: bool,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		LoggingConfigLayer::default().finalize()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_to_info_text() {
		let config = LoggingConfig::default();
		assert_eq!(config.level, "info");
		assert!(!config.json);
	}

	#[test]
	fn blank_level_falls_back() {
		let config = LoggingConfigLayer {
			level: Some(String::new()),
			json: Some(true),
		}
		.finalize();
		assert_eq!(config.level, DEFAULT_LOG_LEVEL);
		assert!(config.json);
	}
}
