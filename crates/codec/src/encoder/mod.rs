//! Raw catalog to compact artifact.
//!
//! Items are visited in ascending numeric hash order. Helper indexes depend on
//! visitation order, so this ordering is what makes two runs over the same
//! catalog produce identical bytes.
//!
//! Encoding never fails as a whole. Problems local to one item (an unparsable
//! key, a field that does not match its schema) are collected as
//! [`EncodeIssue`]s and the affected sub-field is left out.

mod sockets;

use std::collections::BTreeMap;

use itemdex_schema::raw::{DisplayProperties, Inventory, Plug, Quality, Stats};
use itemdex_schema::urls::file_name;
use itemdex_schema::{
	ARTIFACT_VERSION, Category, CompactArtifact, CompactItem, CompactPlug, CompactStats, CompactValue, HelperValue, ItemHash, PerkVisibility,
	RawCatalog, RawItem, Section, SocketCategoryDef,
};
use serde::Deserialize;
use thiserror::Error;

use crate::interner::{EncoderSession, Misaligned};

/// A recoverable problem found while encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeIssue {
	#[error("catalog key `{key}` is not a valid item hash")]
	InvalidHash { key: String },

	#[error("catalog key `{key}` repeats item hash {hash}")]
	DuplicateHash { key: String, hash: ItemHash },

	#[error("item {hash}: record skipped: {reason}")]
	MalformedItem { hash: ItemHash, reason: String },

	#[error("item {hash}: section `{section}` skipped: {reason}")]
	MalformedSection { hash: ItemHash, section: &'static str, reason: String },

	#[error("item {hash}: plug category index {primary} disagrees with identifier index {sibling}")]
	MisalignedPlugCategory { hash: ItemHash, primary: u32, sibling: u32 },

	#[error("item {hash}: socket data not encoded: {reason}")]
	SocketEncoding { hash: ItemHash, reason: String },
}

/// Optional side tables consulted while encoding.
#[derive(Debug, Clone, Default)]
pub struct EncodeExtras {
	/// Socket category definitions keyed by category hash.
	pub socket_categories: BTreeMap<u32, SocketCategoryDef>,
}

/// Result of one encode run.
#[derive(Debug, Clone)]
pub struct EncodeOutput {
	pub artifact: CompactArtifact,
	pub issues: Vec<EncodeIssue>,
	/// Items dropped by the inclusion rule.
	pub excluded: usize,
}

/// Encodes a catalog with no side tables.
pub fn encode(catalog: &RawCatalog, id: &str) -> EncodeOutput {
	encode_with(catalog, id, &EncodeExtras::default())
}

/// Encodes a catalog into a fresh artifact tagged with `id`.
///
/// Each call owns a new [`EncoderSession`]; concurrent calls share nothing.
pub fn encode_with(catalog: &RawCatalog, id: &str, extras: &EncodeExtras) -> EncodeOutput {
	let mut encoder = Encoder {
		session: EncoderSession::new(),
		extras,
		issues: Vec::new(),
	};

	let mut excluded = 0;
	let mut items = BTreeMap::new();
	for (hash, value) in encoder.ordered_entries(catalog) {
		let raw = match RawItem::deserialize(value) {
			Ok(raw) => raw,
			Err(e) => {
				encoder.issue(EncodeIssue::MalformedItem {
					hash,
					reason: e.to_string(),
				});
				continue;
			}
		};
		if raw.name().is_none() && !raw.is_redacted() {
			excluded += 1;
			continue;
		}
		let item = encoder.item(hash, &raw);
		items.insert(hash, item);
	}

	tracing::info!(
		id,
		items = items.len(),
		excluded,
		issues = encoder.issues.len(),
		"encode.finished"
	);

	EncodeOutput {
		artifact: CompactArtifact {
			items,
			helpers: encoder.session.into_helpers(),
			version: ARTIFACT_VERSION,
			id: id.to_owned(),
		},
		issues: encoder.issues,
		excluded,
	}
}

struct Encoder<'a> {
	session: EncoderSession,
	extras: &'a EncodeExtras,
	issues: Vec<EncodeIssue>,
}

impl<'a> Encoder<'a> {
	/// Parses catalog keys and orders them numerically.
	fn ordered_entries<'c>(&mut self, catalog: &'c RawCatalog) -> Vec<(ItemHash, &'c serde_json::Value)> {
		let mut entries = Vec::with_capacity(catalog.len());
		for (key, value) in catalog {
			match key.parse::<ItemHash>() {
				Ok(hash) => entries.push((hash, key, value)),
				Err(_) => self.issue(EncodeIssue::InvalidHash { key: key.clone() }),
			}
		}
		// Stable: for keys like "7" and "07" the lexicographically first wins.
		entries.sort_by_key(|(hash, ..)| *hash);

		let mut ordered: Vec<(ItemHash, &serde_json::Value)> = Vec::with_capacity(entries.len());
		for (hash, key, value) in entries {
			if ordered.last().is_some_and(|(last, _)| *last == hash) {
				self.issue(EncodeIssue::DuplicateHash { key: key.clone(), hash });
				continue;
			}
			ordered.push((hash, value));
		}
		ordered
	}

	fn issue(&mut self, issue: EncodeIssue) {
		tracing::debug!(%issue, "encode.issue");
		self.issues.push(issue);
	}

	/// Returns a present section, recording an issue for a malformed one.
	fn section<'r, T>(&mut self, hash: ItemHash, name: &'static str, section: &'r Section<T>) -> Option<&'r T> {
		match section {
			Section::Present(value) => Some(value),
			Section::Absent => None,
			Section::Malformed(reason) => {
				self.issue(EncodeIssue::MalformedSection {
					hash,
					section: name,
					reason: reason.clone(),
				});
				None
			}
		}
	}

	/// Reads a top-level scalar, defaulting when absent or malformed.
	fn scalar<T: Copy + Default>(&mut self, hash: ItemHash, name: &'static str, field: &Section<T>) -> T {
		self.section(hash, name, field).copied().unwrap_or_default()
	}

	fn string<'r>(&mut self, hash: ItemHash, name: &'static str, field: &'r Section<String>) -> Option<&'r str> {
		self.section(hash, name, field).map(String::as_str)
	}

	fn text(&mut self, category: Category, text: Option<&str>) -> Option<u32> {
		text.filter(|text| !text.is_empty())
			.map(|text| self.session.intern_text(category, text))
	}

	fn hash(&mut self, category: Category, hash: u32) -> Option<u32> {
		(hash != 0).then(|| self.session.intern_hash(category, hash))
	}

	fn item(&mut self, hash: ItemHash, raw: &RawItem) -> CompactItem {
		let mut item = CompactItem {
			name: raw.name().map(str::to_owned),
			screenshot: self
				.string(hash, "screenshot", &raw.screenshot)
				.map(file_name)
				.filter(|file| !file.is_empty())
				.map(str::to_owned),
			item_type: nonzero(self.scalar(hash, "itemType", &raw.item_type)),
			item_sub_type: nonzero(self.scalar(hash, "itemSubType", &raw.item_sub_type)),
			class_type: nonzero(self.scalar(hash, "classType", &raw.class_type)),
			default_damage_type: nonzero(self.scalar(hash, "defaultDamageType", &raw.default_damage_type)),
			breaker_type: nonzero(self.scalar(hash, "breakerType", &raw.breaker_type)),
			collectible_hash: nonzero(self.scalar(hash, "collectibleHash", &raw.collectible_hash)),
			featured: self.scalar(hash, "isFeaturedItem", &raw.is_featured_item),
			redacted: self.scalar(hash, "redacted", &raw.redacted),
			equippable: self.scalar(hash, "equippable", &raw.equippable),
			non_transferrable: self.scalar(hash, "nonTransferrable", &raw.non_transferrable),
			..Default::default()
		};

		if let Some(display) = self.section(hash, "displayProperties", &raw.display_properties) {
			self.display(&mut item, display);
		}

		let display_source = self.string(hash, "displaySource", &raw.display_source);
		item.display_source = self.text(Category::DisplaySources, display_source);
		let type_name = self.string(hash, "itemTypeDisplayName", &raw.item_type_display_name);
		item.item_type_display_name = self.text(Category::ItemTypeDisplayNames, type_name);
		let display_style = self.string(hash, "uiItemDisplayStyle", &raw.ui_item_display_style);
		item.ui_display_style = self.text(Category::UiItemDisplayStyles, display_style);

		if let Some(trait_ids) = self.section(hash, "traitIds", &raw.trait_ids) {
			for trait_id in trait_ids {
				if let Some(index) = self.text(Category::TraitIds, Some(trait_id.as_str())) {
					item.trait_ids.push(index);
				}
			}
		}

		if let Some(damage_types) = self.section(hash, "damageTypeHashes", &raw.damage_type_hashes) {
			for damage_type in damage_types {
				if let Some(index) = self.hash(Category::DamageTypeHashes, *damage_type) {
					item.damage_types.push(index);
				}
			}
		}

		if let Some(inventory) = self.section(hash, "inventory", &raw.inventory) {
			self.inventory(&mut item, inventory);
		}

		if let Some(stats) = self.section(hash, "stats", &raw.stats) {
			item.stats = self.stats(stats);
		}

		if let Some(investment) = self.section(hash, "investmentStats", &raw.investment_stats) {
			for stat in investment.iter().filter(|stat| stat.value > 0) {
				if let Some(index) = self.hash(Category::StatHashes, stat.stat_type_hash) {
					item.investment_stats.entry(index).or_insert(stat.value);
				}
			}
		}

		if let Some(plug) = self.section(hash, "plug", &raw.plug) {
			item.plug = self.plug(hash, plug);
		}

		if let Some(sockets) = self.section(hash, "sockets", &raw.sockets) {
			item.sockets = self.sockets(hash, sockets);
		}

		if let Some(perks) = self.section(hash, "perks", &raw.perks) {
			item.perks = perks
				.iter()
				.filter(|perk| perk.perk_hash != 0 && PerkVisibility::from(perk.perk_visibility) != PerkVisibility::Hidden)
				.map(|perk| perk.perk_hash)
				.collect();
		}

		let quality = self.section(hash, "quality", &raw.quality);
		if let Some(quality) = quality {
			for version in &quality.versions {
				if let Some(index) = self.hash(Category::Versions, version.power_cap_hash) {
					item.power_caps.push(index);
				}
			}
		}
		item.watermark = self.watermark(hash, raw, quality, item.featured);

		if let Some(set_data) = self.section(hash, "setData", &raw.set_data) {
			item.set_items = set_data
				.item_list
				.iter()
				.map(|entry| entry.item_hash)
				.filter(|h| *h != 0)
				.collect();
		}

		if let Some(notifications) = self.section(hash, "tooltipNotifications", &raw.tooltip_notifications) {
			// Only the first notification is shown by clients.
			let first = notifications.first().and_then(|n| n.display_string.as_deref());
			item.tooltip = self.text(Category::TooltipNotifications, first);
		}

		if let Some(value) = self.section(hash, "value", &raw.value) {
			for entry in &value.item_value {
				if let Some(index) = self.hash(Category::ItemValueHashes, entry.item_hash) {
					item.values.push(CompactValue(index, entry.quantity));
				}
			}
		}

		if let Some(talent_grid) = self.section(hash, "talentGrid", &raw.talent_grid) {
			item.talent_grid = self.hash(Category::TalentGridHashes, talent_grid.talent_grid_hash);
		}

		item
	}

	fn display(&mut self, item: &mut CompactItem, display: &DisplayProperties) {
		item.description = self.text(Category::Descriptions, display.description.as_deref());
		item.icon = self.text(Category::Icons, display.icon.as_deref().map(file_name));
	}

	fn inventory(&mut self, item: &mut CompactItem, inventory: &Inventory) {
		item.bucket = self.hash(Category::BucketTypeHashes, inventory.bucket_type_hash);
		item.tier_type = nonzero(inventory.tier_type);
		item.max_stack_size = nonzero(inventory.max_stack_size);
		item.stack_unique_label = self.text(Category::StackUniqueLabels, inventory.stack_unique_label.as_deref());
		item.expiration_tooltip = self.text(Category::ExpirationTooltips, inventory.expiration_tooltip.as_deref());
	}

	fn stats(&mut self, stats: &Stats) -> Option<CompactStats> {
		let mut entries: Vec<_> = stats.stats.values().filter(|stat| stat.stat_hash != 0).collect();
		entries.sort_by_key(|stat| stat.stat_hash);

		let mut compact = CompactStats::default();
		for stat in entries {
			let index = self.session.intern_hash(Category::StatHashes, stat.stat_hash);
			compact.stats.insert(index, stat.value);
		}
		compact.stat_group = stats
			.stat_group_hash
			.and_then(|group| self.hash(Category::StatGroupHashes, group));

		(!compact.stats.is_empty() || compact.stat_group.is_some()).then_some(compact)
	}

	fn plug(&mut self, hash: ItemHash, plug: &Plug) -> Option<CompactPlug> {
		let mut compact = CompactPlug::default();

		if plug.plug_category_hash != 0 {
			// The identifier is interned only to keep its table aligned with the
			// hash table; the compact item stores the shared index once. A missing
			// identifier, or one already claimed by another hash, is replaced by
			// the decimal hash so the identifier table still gains a row.
			let identifier = plug
				.plug_category_identifier
				.clone()
				.filter(|id| !id.is_empty())
				.filter(|id| {
					self.session
						.lookup(Category::PlugCategoryIdentifiers, &HelperValue::Text(id.clone()))
						.is_none_or(|index| {
							self.session.lookup(Category::PlugCategoryHashes, &HelperValue::Hash(plug.plug_category_hash)) == Some(index)
						})
				})
				.unwrap_or_else(|| plug.plug_category_hash.to_string());
			let aligned = self.session.intern_aligned(
				Category::PlugCategoryHashes,
				HelperValue::Hash(plug.plug_category_hash),
				Category::PlugCategoryIdentifiers,
				HelperValue::Text(identifier),
			);
			compact.category = Some(match aligned {
				Ok(index) => index,
				Err(Misaligned { primary, sibling }) => {
					self.issue(EncodeIssue::MisalignedPlugCategory { hash, primary, sibling });
					primary
				}
			});
		}

		compact.label = self.text(Category::UiPlugLabels, plug.ui_plug_label.as_deref());
		compact.material_requirement = self.hash(Category::InsertionMaterialRequirementHashes, plug.insertion_material_requirement_hash);

		(!compact.is_empty()).then_some(compact)
	}

	/// Interns the watermark into the featured or normal table.
	///
	/// Falls back to the quality block's per-version watermark when the item
	/// carries none of its own.
	fn watermark(&mut self, hash: ItemHash, raw: &RawItem, quality: Option<&Quality>, featured: bool) -> Option<u32> {
		let own = self
			.string(hash, "iconWatermark", &raw.icon_watermark)
			.filter(|w| !w.is_empty());
		let versioned = quality.and_then(|q| {
			q.display_version_watermark_icons
				.get(q.current_version as usize)
				.map(String::as_str)
		});
		let file = own.or(versioned).map(file_name)?;
		let category = if featured {
			Category::IconWatermarksFeatured
		} else {
			Category::IconWatermarks
		};
		self.text(category, Some(file))
	}
}

fn nonzero(value: u32) -> Option<u32> {
	(value != 0).then_some(value)
}
