//! Per-run helper table builder.
//!
//! An [`EncoderSession`] owns one insertion-ordered set per [`Category`].
//! Index assignment depends only on the order of `intern` calls, so a session
//! must never be shared between encode runs or locales.

use indexmap::IndexSet;
use itemdex_schema::{Category, HelperValue, Helpers, ValueKind};
use strum::EnumCount;

/// Sibling tables disagreed on the index of a value pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Misaligned {
	pub primary: u32,
	pub sibling: u32,
}

/// Append-only interning state for one encode run.
#[derive(Debug, Clone)]
pub struct EncoderSession {
	tables: Vec<IndexSet<HelperValue>>,
}

impl Default for EncoderSession {
	fn default() -> Self {
		Self::new()
	}
}

impl EncoderSession {
	pub fn new() -> Self {
		Self {
			tables: vec![IndexSet::new(); Category::COUNT],
		}
	}

	/// Returns the index of `value` in `category`, appending it on first sight.
	pub fn intern(&mut self, category: Category, value: HelperValue) -> u32 {
		debug_assert_eq!(
			category.kind(),
			match value {
				HelperValue::Hash(_) => ValueKind::Hash,
				HelperValue::Text(_) => ValueKind::Text,
			},
			"value kind does not match {category:?}"
		);
		let (index, _) = self.tables[category.index()].insert_full(value);
		index as u32
	}

	pub fn intern_text(&mut self, category: Category, text: &str) -> u32 {
		self.intern(category, HelperValue::Text(text.to_owned()))
	}

	pub fn intern_hash(&mut self, category: Category, hash: u32) -> u32 {
		self.intern(category, HelperValue::Hash(hash))
	}

	/// Interns a value pair into two sibling tables whose indexes must agree.
	///
	/// A primary value seen before keeps its index and the sibling is left
	/// untouched, so both tables only grow together. On disagreement the
	/// primary index is returned inside the error so the caller can still
	/// store it.
	pub fn intern_aligned(&mut self, primary: Category, value: HelperValue, sibling: Category, sibling_value: HelperValue) -> Result<u32, Misaligned> {
		if let Some(index) = self.lookup(primary, &value) {
			return Ok(index);
		}
		let primary_index = self.intern(primary, value);
		let sibling_index = self.intern(sibling, sibling_value);
		if primary_index == sibling_index {
			Ok(primary_index)
		} else {
			Err(Misaligned {
				primary: primary_index,
				sibling: sibling_index,
			})
		}
	}

	pub fn lookup(&self, category: Category, value: &HelperValue) -> Option<u32> {
		self.tables[category.index()].get_index_of(value).map(|index| index as u32)
	}

	pub fn len(&self, category: Category) -> usize {
		self.tables[category.index()].len()
	}

	pub fn is_empty(&self) -> bool {
		self.tables.iter().all(IndexSet::is_empty)
	}

	/// Consumes the session into wire helper tables.
	pub fn into_helpers(self) -> Helpers {
		Helpers::from_tables(self.tables.into_iter().map(|set| set.into_iter().collect()).collect())
	}
}
