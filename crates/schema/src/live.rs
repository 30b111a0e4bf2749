//! Live per-owner runtime state supplied at decode time.
//!
//! This is a snapshot owned by the caller. Socket decoding borrows it
//! immutably; refreshing it while a decode is in progress is prevented by the
//! borrow, not by locking.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Runtime snapshot for one owner profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LiveProfile {
	/// Per-instance socket states, in socket index order.
	pub item_sockets: BTreeMap<String, Vec<LiveSocketState>>,
	/// Per-instance reusable plugs, keyed by socket index.
	pub reusable_plugs: BTreeMap<String, BTreeMap<u32, Vec<LivePlug>>>,
	/// Profile-wide plug sets keyed by plug set hash.
	pub profile_plug_sets: BTreeMap<u32, Vec<LivePlug>>,
	/// Character-scoped plug sets keyed by character id, then plug set hash.
	pub character_plug_sets: BTreeMap<String, BTreeMap<u32, Vec<LivePlug>>>,
}

/// Live state of one socket on an item instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LiveSocketState {
	pub plug_hash: Option<u32>,
	pub is_enabled: bool,
	pub is_visible: bool,
}

/// One plug option offered by a live plug source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LivePlug {
	pub plug_item_hash: u32,
	pub can_insert: bool,
	pub enabled: bool,
}

/// Identifies the item instance whose sockets are being decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveItem {
	pub instance_id: String,
	/// Character holding the item; `None` for vault or profile-level items.
	pub owner_id: Option<String>,
}

impl LiveProfile {
	pub fn sockets_of(&self, instance_id: &str) -> Option<&[LiveSocketState]> {
		self.item_sockets.get(instance_id).map(Vec::as_slice)
	}

	pub fn reusable_plugs_of(&self, instance_id: &str, socket_index: u32) -> &[LivePlug] {
		self.reusable_plugs
			.get(instance_id)
			.and_then(|sockets| sockets.get(&socket_index))
			.map(Vec::as_slice)
			.unwrap_or_default()
	}

	pub fn profile_plug_set(&self, plug_set_hash: u32) -> &[LivePlug] {
		self.profile_plug_sets.get(&plug_set_hash).map(Vec::as_slice).unwrap_or_default()
	}

	pub fn character_plug_set(&self, character_id: &str, plug_set_hash: u32) -> &[LivePlug] {
		self.character_plug_sets
			.get(character_id)
			.and_then(|sets| sets.get(&plug_set_hash))
			.map(Vec::as_slice)
			.unwrap_or_default()
	}
}
