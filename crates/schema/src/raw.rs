//! Raw per-locale item catalog.
//!
//! The catalog is a JSON object keyed by item hash strings. Field names follow
//! the source catalog's camelCase convention. Every field of an item is a
//! [`Section`], which keeps a malformed field from taking the rest of the
//! item down with it.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Source catalog keyed by the item hash as it appears in the file.
pub type RawCatalog = BTreeMap<String, serde_json::Value>;

/// One optional nested section of a raw record.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Section<T> {
	/// The key was missing or `null`.
	#[default]
	Absent,
	Present(T),
	/// The key was present but did not match the section schema.
	Malformed(String),
}

impl<T> Section<T> {
	pub fn present(&self) -> Option<&T> {
		match self {
			Self::Present(value) => Some(value),
			_ => None,
		}
	}

	pub fn malformed(&self) -> Option<&str> {
		match self {
			Self::Malformed(reason) => Some(reason),
			_ => None,
		}
	}
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Section<T> {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let value = serde_json::Value::deserialize(deserializer)?;
		if value.is_null() {
			return Ok(Self::Absent);
		}
		Ok(match T::deserialize(value) {
			Ok(section) => Self::Present(section),
			Err(e) => Self::Malformed(e.to_string()),
		})
	}
}

/// Verbose source record for one item hash.
///
/// Top-level scalars are [`Section`]s too: a `null` or mistyped scalar
/// degrades to its default instead of failing the record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawItem {
	pub hash: Section<u32>,
	pub redacted: Section<bool>,
	pub display_properties: Section<DisplayProperties>,
	pub display_source: Section<String>,
	pub screenshot: Section<String>,
	pub item_type: Section<u32>,
	pub item_sub_type: Section<u32>,
	pub class_type: Section<u32>,
	pub item_type_display_name: Section<String>,
	pub ui_item_display_style: Section<String>,
	pub trait_ids: Section<Vec<String>>,
	pub icon_watermark: Section<String>,
	pub is_featured_item: Section<bool>,
	pub equippable: Section<bool>,
	pub non_transferrable: Section<bool>,
	pub breaker_type: Section<u32>,
	pub default_damage_type: Section<u32>,
	pub damage_type_hashes: Section<Vec<u32>>,
	pub collectible_hash: Section<u32>,
	pub inventory: Section<Inventory>,
	pub stats: Section<Stats>,
	pub investment_stats: Section<Vec<InvestmentStat>>,
	pub sockets: Section<Sockets>,
	pub plug: Section<Plug>,
	pub perks: Section<Vec<Perk>>,
	pub quality: Section<Quality>,
	pub set_data: Section<SetData>,
	pub tooltip_notifications: Section<Vec<TooltipNotification>>,
	pub value: Section<ItemValue>,
	pub talent_grid: Section<TalentGrid>,
}

impl RawItem {
	/// Display name, if present and non-empty.
	pub fn name(&self) -> Option<&str> {
		self.display_properties
			.present()
			.and_then(|d| d.name.as_deref())
			.filter(|name| !name.is_empty())
	}

	/// Whether the record is flagged redacted. Unreadable flags count as unset.
	pub fn is_redacted(&self) -> bool {
		self.redacted.present().copied().unwrap_or(false)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayProperties {
	pub name: Option<String>,
	pub description: Option<String>,
	pub icon: Option<String>,
	pub has_icon: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Inventory {
	pub bucket_type_hash: u32,
	pub tier_type: u32,
	pub stack_unique_label: Option<String>,
	pub max_stack_size: u32,
	pub expiration_tooltip: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
	pub stats: BTreeMap<String, StatEntry>,
	pub stat_group_hash: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatEntry {
	pub stat_hash: u32,
	pub value: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvestmentStat {
	pub stat_type_hash: u32,
	pub value: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sockets {
	pub socket_entries: Vec<SocketEntry>,
	pub socket_categories: Vec<SocketCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocketEntry {
	pub socket_type_hash: u32,
	pub single_initial_item_hash: u32,
	pub reusable_plug_set_hash: Option<u32>,
	pub randomized_plug_set_hash: Option<u32>,
	pub plug_sources: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocketCategory {
	pub socket_category_hash: u32,
	pub socket_indexes: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Plug {
	pub plug_category_identifier: Option<String>,
	pub plug_category_hash: u32,
	pub ui_plug_label: Option<String>,
	pub insertion_material_requirement_hash: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Perk {
	pub perk_hash: u32,
	pub perk_visibility: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Quality {
	pub versions: Vec<QualityVersion>,
	pub current_version: u32,
	pub display_version_watermark_icons: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QualityVersion {
	pub power_cap_hash: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SetData {
	pub item_list: Vec<SetItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SetItem {
	pub item_hash: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TooltipNotification {
	pub display_string: Option<String>,
	pub display_style: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemValue {
	pub item_value: Vec<ItemValueEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemValueEntry {
	pub item_hash: u32,
	pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TalentGrid {
	pub talent_grid_hash: u32,
}

/// Entry of the separate socket-category definition table.
///
/// Only the UI style is consumed; it is stamped onto each compact socket
/// category so decoding never needs the definition table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocketCategoryDef {
	pub category_style: u32,
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn missing_and_null_sections_are_absent() {
		let item: RawItem = serde_json::from_str(r#"{"hash": 7, "plug": null}"#).unwrap();
		assert_eq!(item.plug, Section::Absent);
		assert_eq!(item.inventory, Section::Absent);
		assert_eq!(item.hash, Section::Present(7));
	}

	#[test]
	fn malformed_section_does_not_fail_item() {
		let item: RawItem = serde_json::from_str(
			r#"{
				"displayProperties": {"name": "Foo"},
				"inventory": {"bucketTypeHash": "not a number"},
				"stats": [1, 2, 3]
			}"#,
		)
		.unwrap();
		assert_eq!(item.name(), Some("Foo"));
		assert!(item.inventory.malformed().is_some());
		assert!(item.stats.malformed().is_some());
	}

	#[test]
	fn null_or_mistyped_scalars_keep_the_record() {
		let item: RawItem = serde_json::from_str(
			r#"{
				"displayProperties": {"name": "Foo"},
				"itemType": null,
				"redacted": null,
				"iconWatermark": 5,
				"equippable": "yes"
			}"#,
		)
		.unwrap();
		assert_eq!(item.name(), Some("Foo"));
		assert_eq!(item.item_type, Section::Absent);
		assert!(!item.is_redacted());
		assert!(item.icon_watermark.malformed().is_some());
		assert!(item.equippable.malformed().is_some());
	}

	#[test]
	fn empty_name_is_no_name() {
		let item: RawItem = serde_json::from_str(r#"{"displayProperties": {"name": ""}}"#).unwrap();
		assert_eq!(item.name(), None);
	}

	#[test]
	fn socket_section_parses_nested_arrays() {
		let item: RawItem = serde_json::from_str(
			r#"{"sockets": {
				"socketEntries": [{"socketTypeHash": 11, "singleInitialItemHash": 0, "plugSources": 6}],
				"socketCategories": [{"socketCategoryHash": 4, "socketIndexes": [0]}]
			}}"#,
		)
		.unwrap();
		let sockets = item.sockets.present().unwrap();
		assert_eq!(sockets.socket_entries[0].socket_type_hash, 11);
		assert_eq!(sockets.socket_entries[0].plug_sources, 6);
		assert_eq!(sockets.socket_categories[0].socket_indexes, vec![0]);
	}
}
