use itemdex_schema::{Category, HelperValue, Helpers, ItemHash};

/// Helper table reads that degrade to zero values.
///
/// Decoding runs on render paths, so a bad index is logged and resolved to
/// `""` or `0` rather than surfaced as an error.
#[derive(Clone, Copy)]
pub(crate) struct Tables<'a> {
	helpers: &'a Helpers,
	item: ItemHash,
}

impl<'a> Tables<'a> {
	pub(crate) fn new(helpers: &'a Helpers, item: ItemHash) -> Self {
		Self { helpers, item }
	}

	fn value(&self, category: Category, index: u32) -> Option<&'a HelperValue> {
		let value = self.helpers.get(category, index);
		if value.is_none() {
			tracing::warn!(
				item = self.item,
				table = category.name(),
				index,
				len = self.helpers.table(category).len(),
				"decode.index_out_of_range"
			);
		}
		value
	}

	pub(crate) fn text(&self, category: Category, index: u32) -> &'a str {
		match self.value(category, index) {
			Some(HelperValue::Text(text)) => text,
			Some(HelperValue::Hash(_)) => {
				tracing::warn!(item = self.item, table = category.name(), index, "decode.expected_text");
				""
			}
			None => "",
		}
	}

	pub(crate) fn hash(&self, category: Category, index: u32) -> u32 {
		match self.value(category, index) {
			Some(HelperValue::Hash(hash)) => *hash,
			Some(HelperValue::Text(_)) => {
				tracing::warn!(item = self.item, table = category.name(), index, "decode.expected_hash");
				0
			}
			None => 0,
		}
	}

	pub(crate) fn opt_text(&self, category: Category, index: Option<u32>) -> &'a str {
		index.map_or("", |index| self.text(category, index))
	}

	pub(crate) fn opt_hash(&self, category: Category, index: Option<u32>) -> u32 {
		index.map_or(0, |index| self.hash(category, index))
	}

	/// Parses an opaque JSON array stored as helper text.
	pub(crate) fn json_array<T: serde::de::DeserializeOwned>(&self, category: Category, index: u32) -> Vec<T> {
		let text = self.text(category, index);
		if text.is_empty() {
			return Vec::new();
		}
		match serde_json::from_str(text) {
			Ok(values) => values,
			Err(e) => {
				tracing::warn!(item = self.item, table = category.name(), index, error = %e, "decode.bad_opaque_array");
				Vec::new()
			}
		}
	}
}
