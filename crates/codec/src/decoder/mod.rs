//! Compact artifact to display-ready definitions.
//!
//! [`DefinitionResolver::resolve`] always returns a definition. Unknown
//! hashes resolve to [`ResolvedDefinition::default`], and every bad helper
//! index resolves to an empty string or zero. Results are memoized for the
//! resolver's lifetime without eviction; the key space is bounded by the
//! catalog.

mod tables;

use std::sync::Arc;

use itemdex_schema::{Category, CompactArtifact, CompactItem, ItemHash, UrlPrefixes};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::Serialize;

pub(crate) use self::tables::Tables;
use crate::sockets::StaticSockets;

/// Flat, render-ready item definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedDefinition {
	pub hash: ItemHash,
	pub name: String,
	pub description: String,
	/// Full icon URL, or empty.
	pub icon: String,
	/// Full screenshot URL, or empty.
	pub screenshot: String,
	pub item_type: u32,
	pub item_sub_type: u32,
	pub class_type: u32,
	pub tier_type: u32,
	pub bucket_type_hash: u32,
	pub display_source: String,
	pub item_type_display_name: String,
	pub expiration_tooltip: String,
	pub stack_unique_label: String,
	pub max_stack_size: u32,
	pub stats: Vec<ResolvedStat>,
	pub stat_group_hash: u32,
	pub investment_stats: Vec<ResolvedStat>,
	pub plug: Option<ResolvedPlug>,
	pub power_cap_hashes: Vec<u32>,
	/// Full watermark URL, or empty.
	pub icon_watermark: String,
	pub is_featured: bool,
	pub tooltip_notification: String,
	pub item_values: Vec<ResolvedValue>,
	pub talent_grid_hash: Option<u32>,
	pub damage_type_hashes: Vec<u32>,
	pub default_damage_type: u32,
	pub breaker_type: u32,
	pub trait_ids: Vec<String>,
	pub ui_display_style: String,
	pub collectible_hash: Option<u32>,
	pub perk_hashes: Vec<u32>,
	pub set_item_hashes: Vec<u32>,
	pub redacted: bool,
	pub equippable: bool,
	pub non_transferrable: bool,
	pub has_sockets: bool,
	/// Lower-cased `name` and `item_type_display_name` for text search.
	pub search_text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedStat {
	pub stat_hash: u32,
	pub value: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedPlug {
	pub plug_category_hash: u32,
	pub plug_category_identifier: String,
	pub ui_plug_label: String,
	pub insertion_material_requirement_hash: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedValue {
	pub item_hash: u32,
	pub quantity: u32,
}

/// Memoizing decoder over one immutable artifact.
pub struct DefinitionResolver {
	artifact: CompactArtifact,
	urls: UrlPrefixes,
	empty: Arc<ResolvedDefinition>,
	definitions: Mutex<FxHashMap<ItemHash, Arc<ResolvedDefinition>>>,
	pub(crate) sockets: Mutex<FxHashMap<ItemHash, Option<Arc<StaticSockets>>>>,
}

impl DefinitionResolver {
	pub fn new(artifact: CompactArtifact) -> Self {
		Self::with_urls(artifact, UrlPrefixes::default())
	}

	pub fn with_urls(artifact: CompactArtifact, urls: UrlPrefixes) -> Self {
		Self {
			artifact,
			urls,
			empty: Arc::new(ResolvedDefinition::default()),
			definitions: Mutex::new(FxHashMap::default()),
			sockets: Mutex::new(FxHashMap::default()),
		}
	}

	pub fn artifact(&self) -> &CompactArtifact {
		&self.artifact
	}

	/// Number of memoized definitions, including misses.
	pub fn cached_len(&self) -> usize {
		self.definitions.lock().len()
	}

	/// Resolves `hash`, decoding it on first use.
	pub fn resolve(&self, hash: ItemHash) -> Arc<ResolvedDefinition> {
		if let Some(hit) = self.definitions.lock().get(&hash) {
			return Arc::clone(hit);
		}

		let resolved = match self.artifact.items.get(&hash) {
			Some(item) => Arc::new(self.decode(hash, item)),
			None => {
				tracing::debug!(hash, "decode.missing_item");
				Arc::clone(&self.empty)
			}
		};

		let mut definitions = self.definitions.lock();
		Arc::clone(definitions.entry(hash).or_insert(resolved))
	}

	pub fn resolve_many(&self, hashes: impl IntoIterator<Item = ItemHash>) -> Vec<Arc<ResolvedDefinition>> {
		hashes.into_iter().map(|hash| self.resolve(hash)).collect()
	}

	fn decode(&self, hash: ItemHash, item: &CompactItem) -> ResolvedDefinition {
		let tables = Tables::new(&self.artifact.helpers, hash);

		let name = item.name.clone().unwrap_or_default();
		let item_type_display_name = tables
			.opt_text(Category::ItemTypeDisplayNames, item.item_type_display_name)
			.to_owned();
		let search_text = format!("{name} {item_type_display_name}").trim().to_lowercase();

		let watermark_table = if item.featured {
			Category::IconWatermarksFeatured
		} else {
			Category::IconWatermarks
		};

		let (stats, stat_group_hash) = match &item.stats {
			Some(block) => (
				block
					.stats
					.iter()
					.map(|(index, value)| ResolvedStat {
						stat_hash: tables.hash(Category::StatHashes, *index),
						value: *value,
					})
					.collect(),
				tables.opt_hash(Category::StatGroupHashes, block.stat_group),
			),
			None => (Vec::new(), 0),
		};

		let investment_stats = item
			.investment_stats
			.iter()
			.map(|(index, value)| ResolvedStat {
				stat_hash: tables.hash(Category::StatHashes, *index),
				value: *value,
			})
			.collect();

		let plug = item.plug.as_ref().map(|plug| ResolvedPlug {
			plug_category_hash: tables.opt_hash(Category::PlugCategoryHashes, plug.category),
			plug_category_identifier: tables.opt_text(Category::PlugCategoryIdentifiers, plug.category).to_owned(),
			ui_plug_label: tables.opt_text(Category::UiPlugLabels, plug.label).to_owned(),
			insertion_material_requirement_hash: tables.opt_hash(Category::InsertionMaterialRequirementHashes, plug.material_requirement),
		});

		let item_values = item
			.values
			.iter()
			.map(|value| ResolvedValue {
				item_hash: tables.hash(Category::ItemValueHashes, value.0),
				quantity: value.1,
			})
			.filter(|value| value.item_hash != 0)
			.collect();

		ResolvedDefinition {
			hash,
			description: tables.opt_text(Category::Descriptions, item.description).to_owned(),
			icon: self.urls.icon_url(tables.opt_text(Category::Icons, item.icon)),
			screenshot: item
				.screenshot
				.as_deref()
				.map(|file| self.urls.screenshot_url(file))
				.unwrap_or_default(),
			item_type: item.item_type.unwrap_or_default(),
			item_sub_type: item.item_sub_type.unwrap_or_default(),
			class_type: item.class_type.unwrap_or_default(),
			tier_type: item.tier_type.unwrap_or_default(),
			bucket_type_hash: tables.opt_hash(Category::BucketTypeHashes, item.bucket),
			display_source: tables.opt_text(Category::DisplaySources, item.display_source).to_owned(),
			expiration_tooltip: tables.opt_text(Category::ExpirationTooltips, item.expiration_tooltip).to_owned(),
			stack_unique_label: tables.opt_text(Category::StackUniqueLabels, item.stack_unique_label).to_owned(),
			max_stack_size: item.max_stack_size.unwrap_or_default(),
			stats,
			stat_group_hash,
			investment_stats,
			plug,
			power_cap_hashes: item
				.power_caps
				.iter()
				.map(|index| tables.hash(Category::Versions, *index))
				.collect(),
			icon_watermark: self.urls.watermark_url(tables.opt_text(watermark_table, item.watermark)),
			is_featured: item.featured,
			tooltip_notification: tables.opt_text(Category::TooltipNotifications, item.tooltip).to_owned(),
			item_values,
			talent_grid_hash: item
				.talent_grid
				.map(|index| tables.hash(Category::TalentGridHashes, index))
				.filter(|hash| *hash != 0),
			damage_type_hashes: item
				.damage_types
				.iter()
				.map(|index| tables.hash(Category::DamageTypeHashes, *index))
				.collect(),
			default_damage_type: item.default_damage_type.unwrap_or_default(),
			breaker_type: item.breaker_type.unwrap_or_default(),
			trait_ids: item
				.trait_ids
				.iter()
				.map(|index| tables.text(Category::TraitIds, *index).to_owned())
				.collect(),
			ui_display_style: tables.opt_text(Category::UiItemDisplayStyles, item.ui_display_style).to_owned(),
			collectible_hash: item.collectible_hash,
			perk_hashes: item.perks.clone(),
			set_item_hashes: item.set_items.clone(),
			redacted: item.redacted,
			equippable: item.equippable,
			non_transferrable: item.non_transferrable,
			has_sockets: item.sockets.is_some(),
			search_text,
			item_type_display_name,
			name,
		}
	}
}
