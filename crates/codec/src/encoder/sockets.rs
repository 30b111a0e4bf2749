//! Socket double encoding.
//!
//! Reference hashes inside each socket entry and category are interned first.
//! The resulting arrays are then serialized to JSON and the strings interned
//! as opaque values, so items with identical socket layouts share one helper
//! entry.

use itemdex_schema::raw::Sockets;
use itemdex_schema::{Category, CompactSocketCategory, CompactSocketEntry, CompactSockets, ItemHash};
use serde::Serialize;

use super::{EncodeIssue, Encoder};

impl Encoder<'_> {
	pub(super) fn sockets(&mut self, hash: ItemHash, sockets: &Sockets) -> Option<CompactSockets> {
		let mut entries = Vec::with_capacity(sockets.socket_entries.len());
		for entry in &sockets.socket_entries {
			entries.push(CompactSocketEntry {
				socket_type: self.hash(Category::SocketTypeHashes, entry.socket_type_hash),
				single_initial_item: self.hash(Category::SingleInitialItemHashes, entry.single_initial_item_hash),
				reusable_plug_set: entry
					.reusable_plug_set_hash
					.and_then(|h| self.hash(Category::ReusablePlugSetHashes, h)),
				randomized_plug_set: entry
					.randomized_plug_set_hash
					.and_then(|h| self.hash(Category::RandomizedPlugSetHashes, h)),
				plug_sources: entry.plug_sources,
			});
		}

		let mut categories = Vec::with_capacity(sockets.socket_categories.len());
		for category in &sockets.socket_categories {
			let indexes = if category.socket_indexes.is_empty() {
				None
			} else {
				self.intern_json(hash, Category::SocketIndexes, &category.socket_indexes)
			};
			let style = self
				.extras
				.socket_categories
				.get(&category.socket_category_hash)
				.map_or(0, |def| def.category_style);
			categories.push(CompactSocketCategory {
				category: self.hash(Category::SocketCategoryHashes, category.socket_category_hash),
				indexes,
				style,
			});
		}

		let compact = CompactSockets {
			entries: if entries.is_empty() {
				None
			} else {
				self.intern_json(hash, Category::SocketEntries, &entries)
			},
			categories: if categories.is_empty() {
				None
			} else {
				self.intern_json(hash, Category::SocketCategories, &categories)
			},
		};
		(compact.entries.is_some() || compact.categories.is_some()).then_some(compact)
	}

	fn intern_json<T: Serialize + ?Sized>(&mut self, hash: ItemHash, category: Category, value: &T) -> Option<u32> {
		match serde_json::to_string(value) {
			Ok(text) => Some(self.session.intern_text(category, &text)),
			Err(e) => {
				self.issue(EncodeIssue::SocketEncoding {
					hash,
					reason: e.to_string(),
				});
				None
			}
		}
	}
}
