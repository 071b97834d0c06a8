// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The top-level mergeable configuration layer.

use serde::{Deserialize, Serialize};

use crate::sections::{LoggingConfigLayer, TransportConfigLayer};

/// One source's view of the configuration. Sections it does not set stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FerryConfigLayer {
	pub transport: Option<TransportConfigLayer>,
	pub logging: Option<LoggingConfigLayer>,
}

impl FerryConfigLayer {
	/// Merges another layer on top of this one, section by section.
	pub fn merge(&mut self, other: FerryConfigLayer) {
		merge_section(&mut self.transport, other.transport, TransportConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_section<T>(base: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	match (base.as_mut(), other) {
		(Some(existing), Some(other)) => merge(existing, other),
		(None, Some(other)) => *base = Some(other),
		(_, None) => {}
	}
}
