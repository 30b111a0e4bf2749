//! Socket topology reconstruction and live fusion.
//!
//! The static half comes from the artifact's double-encoded socket tables and
//! is cached per item hash. Live state is applied by position: state `n` of
//! the instance belongs to socket entry `n`. Length mismatches are reported
//! through [`SocketAlignment`] and never abort the rebuild.

use std::sync::Arc;

use itemdex_schema::{
	Category, CompactSocketCategory, CompactSocketEntry, ItemHash, LiveItem, LivePlug, LiveProfile, LiveSocketState, PlugSources,
	SocketCategoryStyle,
};
use rustc_hash::FxHashSet;
use serde::{Serialize, Serializer};

use crate::decoder::{DefinitionResolver, Tables};

/// Socket layout of one item instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SocketTopology {
	pub socket_categories: Vec<SocketCategory>,
	pub socket_entries: Vec<SocketEntry>,
	pub alignment: SocketAlignment,
}

/// How the live socket states lined up with the static entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SocketAlignment {
	Exact,
	/// Fewer live states than static entries; trailing entries keep defaults.
	LiveShort { expected: usize, live: usize },
	/// More live states than static entries; extra states are ignored.
	LiveLong { expected: usize, live: usize },
}

impl SocketAlignment {
	fn of(expected: usize, live: usize) -> Self {
		match live.cmp(&expected) {
			std::cmp::Ordering::Equal => Self::Exact,
			std::cmp::Ordering::Less => Self::LiveShort { expected, live },
			std::cmp::Ordering::Greater => Self::LiveLong { expected, live },
		}
	}

	pub fn is_exact(&self) -> bool {
		matches!(self, Self::Exact)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocketCategory {
	pub category_hash: u32,
	#[serde(serialize_with = "style_code")]
	pub style: SocketCategoryStyle,
	pub sockets: Vec<SocketRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SocketRef {
	pub socket_index: u32,
	pub socket_type_hash: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SocketEntry {
	pub socket_index: u32,
	pub socket_type_hash: u32,
	pub single_initial_item_hash: u32,
	pub reusable_plug_set_hash: u32,
	pub randomized_plug_set_hash: u32,
	#[serde(serialize_with = "plug_source_bits")]
	pub plug_sources: PlugSources,
	/// Plug currently inserted, from live state.
	pub plugged_hash: Option<u32>,
	pub is_enabled: bool,
	pub is_visible: bool,
	/// Belongs to a category whose options are listed lazily by the UI.
	pub on_demand: bool,
	pub plug_options: Vec<PlugOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlugOption {
	pub plug_item_hash: u32,
	pub can_insert: bool,
	pub enabled: bool,
	pub source: PlugOptionSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlugOptionSource {
	Inserted,
	ReusablePlugItems,
	ProfilePlugSet,
	CharacterPlugSet,
}

/// Immutable socket skeleton decoded from helper tables.
#[derive(Debug)]
pub(crate) struct StaticSockets {
	entries: Vec<SocketEntry>,
	categories: Vec<SocketCategory>,
}

impl DefinitionResolver {
	/// Rebuilds the socket topology of one item instance.
	///
	/// Returns `None` for non-instanced lookups and for items without
	/// sockets.
	pub fn build_sockets(&self, hash: ItemHash, live: Option<&LiveItem>, profile: &LiveProfile) -> Option<SocketTopology> {
		let live = live?;
		let skeleton = self.static_sockets(hash)?;

		let mut entries = skeleton.entries.clone();
		let states = profile.sockets_of(&live.instance_id).unwrap_or_default();
		let alignment = SocketAlignment::of(entries.len(), states.len());
		if !alignment.is_exact() {
			tracing::warn!(hash, instance = %live.instance_id, ?alignment, "sockets.misaligned");
		}
		for (entry, state) in entries.iter_mut().zip(states) {
			apply_state(entry, state);
		}

		for category in &skeleton.categories {
			let on_demand = category.style.is_on_demand();
			for socket in &category.sockets {
				let Some(entry) = entries.get_mut(socket.socket_index as usize) else {
					continue;
				};
				if on_demand {
					entry.on_demand = true;
				} else if entry.plug_options.is_empty() {
					entry.plug_options = plug_options(entry, live, profile);
				}
			}
		}

		Some(SocketTopology {
			socket_categories: skeleton.categories.clone(),
			socket_entries: entries,
			alignment,
		})
	}

	fn static_sockets(&self, hash: ItemHash) -> Option<Arc<StaticSockets>> {
		if let Some(hit) = self.sockets.lock().get(&hash) {
			return hit.clone();
		}
		let skeleton = self.decode_static_sockets(hash).map(Arc::new);
		self.sockets.lock().entry(hash).or_insert(skeleton).clone()
	}

	fn decode_static_sockets(&self, hash: ItemHash) -> Option<StaticSockets> {
		let artifact = self.artifact();
		let compact = artifact.items.get(&hash)?.sockets.as_ref()?;
		let tables = Tables::new(&artifact.helpers, hash);

		let entries: Vec<SocketEntry> = compact
			.entries
			.map(|index| tables.json_array::<CompactSocketEntry>(Category::SocketEntries, index))
			.unwrap_or_default()
			.into_iter()
			.zip(0u32..)
			.map(|(entry, socket_index)| SocketEntry {
				socket_index,
				socket_type_hash: tables.opt_hash(Category::SocketTypeHashes, entry.socket_type),
				single_initial_item_hash: tables.opt_hash(Category::SingleInitialItemHashes, entry.single_initial_item),
				reusable_plug_set_hash: tables.opt_hash(Category::ReusablePlugSetHashes, entry.reusable_plug_set),
				randomized_plug_set_hash: tables.opt_hash(Category::RandomizedPlugSetHashes, entry.randomized_plug_set),
				plug_sources: PlugSources::from_bits_truncate(entry.plug_sources),
				..SocketEntry::default()
			})
			.collect();
		if entries.is_empty() {
			return None;
		}

		let categories = compact
			.categories
			.map(|index| tables.json_array::<CompactSocketCategory>(Category::SocketCategories, index))
			.unwrap_or_default()
			.into_iter()
			.map(|category| SocketCategory {
				category_hash: tables.opt_hash(Category::SocketCategoryHashes, category.category),
				style: SocketCategoryStyle::from(category.style),
				sockets: category
					.indexes
					.map(|index| tables.json_array::<u32>(Category::SocketIndexes, index))
					.unwrap_or_default()
					.into_iter()
					.map(|socket_index| SocketRef {
						socket_index,
						socket_type_hash: entries
							.get(socket_index as usize)
							.map_or(0, |entry| entry.socket_type_hash),
					})
					.collect(),
			})
			.collect();

		Some(StaticSockets { entries, categories })
	}
}

fn apply_state(entry: &mut SocketEntry, state: &LiveSocketState) {
	entry.plugged_hash = state.plug_hash.filter(|hash| *hash != 0);
	entry.is_enabled = state.is_enabled;
	entry.is_visible = state.is_visible;
}

/// Inserted plug first, then each live source selected by the entry's
/// plug source bits in ascending bit order. First occurrence wins.
fn plug_options(entry: &SocketEntry, live: &LiveItem, profile: &LiveProfile) -> Vec<PlugOption> {
	let mut seen = FxHashSet::default();
	let mut options = Vec::new();
	let mut push = |plug: &LivePlug, source: PlugOptionSource| {
		if plug.plug_item_hash != 0 && seen.insert(plug.plug_item_hash) {
			options.push(PlugOption {
				plug_item_hash: plug.plug_item_hash,
				can_insert: plug.can_insert,
				enabled: plug.enabled,
				source,
			});
		}
	};

	if let Some(plugged) = entry.plugged_hash {
		let inserted = LivePlug {
			plug_item_hash: plugged,
			can_insert: true,
			enabled: entry.is_enabled,
		};
		push(&inserted, PlugOptionSource::Inserted);
	}

	let plug_set = plug_set_hash(entry);
	for source in entry.plug_sources.iter() {
		let (plugs, kind) = if source == PlugSources::REUSABLE_PLUG_ITEMS {
			(profile.reusable_plugs_of(&live.instance_id, entry.socket_index), PlugOptionSource::ReusablePlugItems)
		} else if source == PlugSources::PROFILE_PLUG_SET && plug_set != 0 {
			(profile.profile_plug_set(plug_set), PlugOptionSource::ProfilePlugSet)
		} else if source == PlugSources::CHARACTER_PLUG_SET && plug_set != 0 {
			let Some(owner) = live.owner_id.as_deref() else {
				continue;
			};
			(profile.character_plug_set(owner, plug_set), PlugOptionSource::CharacterPlugSet)
		} else {
			continue;
		};
		for plug in plugs {
			push(plug, kind);
		}
	}

	options
}

/// Plug set backing the profile and character sources. Randomized-only
/// entries roll from their randomized set.
fn plug_set_hash(entry: &SocketEntry) -> u32 {
	if entry.reusable_plug_set_hash != 0 {
		entry.reusable_plug_set_hash
	} else {
		entry.randomized_plug_set_hash
	}
}

fn style_code<S: Serializer>(style: &SocketCategoryStyle, serializer: S) -> Result<S::Ok, S::Error> {
	serializer.serialize_u32(u32::from(*style))
}

fn plug_source_bits<S: Serializer>(sources: &PlugSources, serializer: S) -> Result<S::Ok, S::Error> {
	serializer.serialize_u32(sources.bits())
}

#[cfg(test)]
mod tests;
