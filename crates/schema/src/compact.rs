//! Compact artifact wire format.
//!
//! Every optional field is omitted when absent, false, zero or empty. Fields
//! holding `u32` indexes point into the helper table named in their docs.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{EnumCount, IntoEnumIterator};
use thiserror::Error;

use crate::manifest::{ARTIFACT_VERSION, ArtifactManifest};
use crate::{Category, ItemHash};

/// Minified record for one item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompactItem {
	#[serde(rename = "n", default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// [`Category::Descriptions`]
	#[serde(rename = "d", default, skip_serializing_if = "Option::is_none")]
	pub description: Option<u32>,
	/// [`Category::Icons`]
	#[serde(rename = "i", default, skip_serializing_if = "Option::is_none")]
	pub icon: Option<u32>,
	/// Screenshot file name.
	#[serde(rename = "s", default, skip_serializing_if = "Option::is_none")]
	pub screenshot: Option<String>,
	#[serde(rename = "it", default, skip_serializing_if = "Option::is_none")]
	pub item_type: Option<u32>,
	#[serde(rename = "is", default, skip_serializing_if = "Option::is_none")]
	pub item_sub_type: Option<u32>,
	#[serde(rename = "c", default, skip_serializing_if = "Option::is_none")]
	pub class_type: Option<u32>,
	#[serde(rename = "t", default, skip_serializing_if = "Option::is_none")]
	pub tier_type: Option<u32>,
	/// [`Category::BucketTypeHashes`]
	#[serde(rename = "b", default, skip_serializing_if = "Option::is_none")]
	pub bucket: Option<u32>,
	/// [`Category::DisplaySources`]
	#[serde(rename = "ds", default, skip_serializing_if = "Option::is_none")]
	pub display_source: Option<u32>,
	/// [`Category::ItemTypeDisplayNames`]
	#[serde(rename = "itd", default, skip_serializing_if = "Option::is_none")]
	pub item_type_display_name: Option<u32>,
	/// [`Category::ExpirationTooltips`]
	#[serde(rename = "e", default, skip_serializing_if = "Option::is_none")]
	pub expiration_tooltip: Option<u32>,
	/// [`Category::StackUniqueLabels`]
	#[serde(rename = "su", default, skip_serializing_if = "Option::is_none")]
	pub stack_unique_label: Option<u32>,
	#[serde(rename = "ms", default, skip_serializing_if = "Option::is_none")]
	pub max_stack_size: Option<u32>,
	#[serde(rename = "st", default, skip_serializing_if = "Option::is_none")]
	pub stats: Option<CompactStats>,
	/// [`Category::StatHashes`] index to investment value.
	#[serde(rename = "iv", default, skip_serializing_if = "BTreeMap::is_empty")]
	pub investment_stats: BTreeMap<u32, i32>,
	#[serde(rename = "p", default, skip_serializing_if = "Option::is_none")]
	pub plug: Option<CompactPlug>,
	#[serde(rename = "sk", default, skip_serializing_if = "Option::is_none")]
	pub sockets: Option<CompactSockets>,
	/// Visible perk hashes.
	#[serde(rename = "pk", default, skip_serializing_if = "Vec::is_empty")]
	pub perks: Vec<u32>,
	/// [`Category::Versions`]
	#[serde(rename = "pc", default, skip_serializing_if = "Vec::is_empty")]
	pub power_caps: Vec<u32>,
	/// [`Category::IconWatermarks`], or [`Category::IconWatermarksFeatured`]
	/// when `featured` is set.
	#[serde(rename = "iw", default, skip_serializing_if = "Option::is_none")]
	pub watermark: Option<u32>,
	#[serde(rename = "f", default, skip_serializing_if = "is_false", with = "flag")]
	pub featured: bool,
	/// [`Category::TooltipNotifications`]
	#[serde(rename = "tn", default, skip_serializing_if = "Option::is_none")]
	pub tooltip: Option<u32>,
	#[serde(rename = "vl", default, skip_serializing_if = "Vec::is_empty")]
	pub values: Vec<CompactValue>,
	/// [`Category::TalentGridHashes`]
	#[serde(rename = "tg", default, skip_serializing_if = "Option::is_none")]
	pub talent_grid: Option<u32>,
	/// [`Category::DamageTypeHashes`]
	#[serde(rename = "dt", default, skip_serializing_if = "Vec::is_empty")]
	pub damage_types: Vec<u32>,
	#[serde(rename = "dd", default, skip_serializing_if = "Option::is_none")]
	pub default_damage_type: Option<u32>,
	#[serde(rename = "bt", default, skip_serializing_if = "Option::is_none")]
	pub breaker_type: Option<u32>,
	/// [`Category::TraitIds`]
	#[serde(rename = "ti", default, skip_serializing_if = "Vec::is_empty")]
	pub trait_ids: Vec<u32>,
	/// [`Category::UiItemDisplayStyles`]
	#[serde(rename = "u", default, skip_serializing_if = "Option::is_none")]
	pub ui_display_style: Option<u32>,
	#[serde(rename = "ch", default, skip_serializing_if = "Option::is_none")]
	pub collectible_hash: Option<u32>,
	/// Item hashes of the set this item belongs to.
	#[serde(rename = "sd", default, skip_serializing_if = "Vec::is_empty")]
	pub set_items: Vec<u32>,
	#[serde(rename = "r", default, skip_serializing_if = "is_false", with = "flag")]
	pub redacted: bool,
	#[serde(rename = "eq", default, skip_serializing_if = "is_false", with = "flag")]
	pub equippable: bool,
	#[serde(rename = "nt", default, skip_serializing_if = "is_false", with = "flag")]
	pub non_transferrable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompactStats {
	/// [`Category::StatHashes`] index to stat value.
	#[serde(rename = "s", default, skip_serializing_if = "BTreeMap::is_empty")]
	pub stats: BTreeMap<u32, i32>,
	/// [`Category::StatGroupHashes`]
	#[serde(rename = "sgs", default, skip_serializing_if = "Option::is_none")]
	pub stat_group: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompactPlug {
	/// [`Category::PlugCategoryHashes`]; the same index addresses
	/// [`Category::PlugCategoryIdentifiers`].
	#[serde(rename = "p", default, skip_serializing_if = "Option::is_none")]
	pub category: Option<u32>,
	/// [`Category::UiPlugLabels`]
	#[serde(rename = "pl", default, skip_serializing_if = "Option::is_none")]
	pub label: Option<u32>,
	/// [`Category::InsertionMaterialRequirementHashes`]
	#[serde(rename = "im", default, skip_serializing_if = "Option::is_none")]
	pub material_requirement: Option<u32>,
}

impl CompactPlug {
	pub fn is_empty(&self) -> bool {
		self.category.is_none() && self.label.is_none() && self.material_requirement.is_none()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompactSockets {
	/// [`Category::SocketEntries`]
	#[serde(rename = "se", default, skip_serializing_if = "Option::is_none")]
	pub entries: Option<u32>,
	/// [`Category::SocketCategories`]
	#[serde(rename = "sc", default, skip_serializing_if = "Option::is_none")]
	pub categories: Option<u32>,
}

/// One socket entry, stored inside the JSON string interned in
/// [`Category::SocketEntries`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompactSocketEntry {
	/// [`Category::SocketTypeHashes`]
	#[serde(rename = "st", default, skip_serializing_if = "Option::is_none")]
	pub socket_type: Option<u32>,
	/// [`Category::SingleInitialItemHashes`]
	#[serde(rename = "si", default, skip_serializing_if = "Option::is_none")]
	pub single_initial_item: Option<u32>,
	/// [`Category::ReusablePlugSetHashes`]
	#[serde(rename = "rp", default, skip_serializing_if = "Option::is_none")]
	pub reusable_plug_set: Option<u32>,
	/// [`Category::RandomizedPlugSetHashes`]
	#[serde(rename = "rd", default, skip_serializing_if = "Option::is_none")]
	pub randomized_plug_set: Option<u32>,
	/// Raw [`PlugSources`](crate::PlugSources) bits.
	#[serde(rename = "ps", default, skip_serializing_if = "is_zero")]
	pub plug_sources: u32,
}

/// One socket category, stored inside the JSON string interned in
/// [`Category::SocketCategories`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompactSocketCategory {
	/// [`Category::SocketCategoryHashes`]
	#[serde(rename = "h", default, skip_serializing_if = "Option::is_none")]
	pub category: Option<u32>,
	/// [`Category::SocketIndexes`], itself a JSON array string.
	#[serde(rename = "i", default, skip_serializing_if = "Option::is_none")]
	pub indexes: Option<u32>,
	/// Raw [`SocketCategoryStyle`](crate::SocketCategoryStyle).
	#[serde(rename = "y", default, skip_serializing_if = "is_zero")]
	pub style: u32,
}

/// `[item value index, quantity]`, index into [`Category::ItemValueHashes`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactValue(pub u32, pub u32);

/// One value of a helper table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HelperValue {
	Hash(u32),
	Text(String),
}

impl HelperValue {
	pub fn as_hash(&self) -> Option<u32> {
		match self {
			Self::Hash(hash) => Some(*hash),
			Self::Text(_) => None,
		}
	}

	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text),
			Self::Hash(_) => None,
		}
	}
}

/// All helper tables of one artifact, one per [`Category`].
///
/// Serializes as a map keyed by category name in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Helpers {
	tables: Vec<Vec<HelperValue>>,
}

impl Default for Helpers {
	fn default() -> Self {
		Self {
			tables: vec![Vec::new(); Category::COUNT],
		}
	}
}

impl Helpers {
	/// Builds helpers from per-category tables in declaration order.
	///
	/// # Panics
	///
	/// Panics if `tables.len()` differs from the number of categories.
	pub fn from_tables(tables: Vec<Vec<HelperValue>>) -> Self {
		assert_eq!(tables.len(), Category::COUNT, "one helper table per category");
		Self { tables }
	}

	pub fn table(&self, category: Category) -> &[HelperValue] {
		&self.tables[category.index()]
	}

	pub fn get(&self, category: Category, index: u32) -> Option<&HelperValue> {
		self.table(category).get(index as usize)
	}
}

impl Serialize for Helpers {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(Category::COUNT))?;
		for category in Category::iter() {
			map.serialize_entry(category.name(), self.table(category))?;
		}
		map.end()
	}
}

impl<'de> Deserialize<'de> for Helpers {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		struct HelpersVisitor;

		impl<'de> Visitor<'de> for HelpersVisitor {
			type Value = Helpers;

			fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
				f.write_str("a map of helper table name to value array")
			}

			fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Helpers, A::Error> {
				let mut helpers = Helpers::default();
				while let Some(name) = access.next_key::<String>()? {
					let category: Category = name
						.parse()
						.map_err(|_| de::Error::custom(format!("unknown helper table `{name}`")))?;
					helpers.tables[category.index()] = access.next_value()?;
				}
				Ok(helpers)
			}
		}

		deserializer.deserialize_map(HelpersVisitor)
	}
}

/// Errors reading a serialized artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
	#[error("invalid artifact JSON: {0}")]
	Json(#[from] serde_json::Error),

	#[error("unsupported artifact version {found} (expected {expected})")]
	UnsupportedVersion { found: u32, expected: u32 },
}

/// The persisted unit: compact items plus their helper tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactArtifact {
	pub items: BTreeMap<ItemHash, CompactItem>,
	pub helpers: Helpers,
	pub version: u32,
	pub id: String,
}

impl CompactArtifact {
	/// Serializes to the canonical JSON bytes.
	pub fn to_json(&self) -> Result<String, ArtifactError> {
		Ok(serde_json::to_string(self)?)
	}

	/// Parses an artifact, rejecting versions this build cannot decode.
	pub fn from_json(input: &str) -> Result<Self, ArtifactError> {
		#[derive(Deserialize)]
		struct VersionProbe {
			version: u32,
		}

		let probe: VersionProbe = serde_json::from_str(input)?;
		if probe.version != ARTIFACT_VERSION {
			return Err(ArtifactError::UnsupportedVersion {
				found: probe.version,
				expected: ARTIFACT_VERSION,
			});
		}
		Ok(serde_json::from_str(input)?)
	}

	pub fn manifest(&self) -> ArtifactManifest {
		ArtifactManifest {
			id: self.id.clone(),
			version: self.version,
		}
	}
}

fn is_false(value: &bool) -> bool {
	!*value
}

fn is_zero(value: &u32) -> bool {
	*value == 0
}

/// Booleans on the wire are `1` when set and omitted otherwise.
mod flag {
	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_u8(u8::from(*value))
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Wire {
			Int(u8),
			Bool(bool),
		}

		Ok(match Wire::deserialize(deserializer)? {
			Wire::Int(value) => value != 0,
			Wire::Bool(value) => value,
		})
	}
}

#[cfg(test)]
mod tests;
