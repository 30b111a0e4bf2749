//! Helper table categories.
//!
//! Declaration order is part of the wire format: helper tables serialize in
//! this order, so reordering variants changes artifact bytes and requires an
//! [`ARTIFACT_VERSION`](crate::ARTIFACT_VERSION) bump.

use strum::{EnumCount, EnumIter, EnumString, IntoStaticStr};

/// One semantic family of interned values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumCount, EnumIter, EnumString, IntoStaticStr)]
pub enum Category {
	Descriptions,
	DisplaySources,
	ExpirationTooltips,
	ItemTypeDisplayNames,
	IconWatermarks,
	IconWatermarksFeatured,
	TraitIds,
	UiItemDisplayStyles,
	PlugCategoryIdentifiers,
	PlugCategoryHashes,
	UiPlugLabels,
	InsertionMaterialRequirementHashes,
	StackUniqueLabels,
	BucketTypeHashes,
	Versions,
	StatHashes,
	StatGroupHashes,
	DamageTypeHashes,
	ItemValueHashes,
	TooltipNotifications,
	RandomizedPlugSetHashes,
	ReusablePlugSetHashes,
	SingleInitialItemHashes,
	SocketCategoryHashes,
	SocketIndexes,
	SocketCategories,
	SocketEntries,
	SocketTypeHashes,
	TalentGridHashes,
	Icons,
}

/// Shape of the values stored in one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
	/// Free text, file names, or opaque serialized arrays.
	Text,
	/// Numeric definition hashes.
	Hash,
}

impl Category {
	/// Table name used as the key in the serialized `helpers` map.
	pub fn name(self) -> &'static str {
		self.into()
	}

	/// Position of this category's table in declaration order.
	pub const fn index(self) -> usize {
		self as usize
	}

	pub const fn kind(self) -> ValueKind {
		match self {
			Self::PlugCategoryHashes
			| Self::InsertionMaterialRequirementHashes
			| Self::BucketTypeHashes
			| Self::Versions
			| Self::StatHashes
			| Self::StatGroupHashes
			| Self::DamageTypeHashes
			| Self::ItemValueHashes
			| Self::RandomizedPlugSetHashes
			| Self::ReusablePlugSetHashes
			| Self::SingleInitialItemHashes
			| Self::SocketCategoryHashes
			| Self::SocketTypeHashes
			| Self::TalentGridHashes => ValueKind::Hash,
			_ => ValueKind::Text,
		}
	}
}

#[cfg(test)]
mod tests {
	use std::str::FromStr;

	use strum::IntoEnumIterator;

	use super::*;

	#[test]
	fn index_matches_declaration_order() {
		for (pos, category) in Category::iter().enumerate() {
			assert_eq!(category.index(), pos);
		}
		assert_eq!(Category::iter().count(), Category::COUNT);
	}

	#[test]
	fn names_round_trip() {
		for category in Category::iter() {
			assert_eq!(Category::from_str(category.name()), Ok(category));
		}
		assert_eq!(Category::Descriptions.name(), "Descriptions");
	}

	#[test]
	fn opaque_socket_tables_hold_text() {
		assert_eq!(Category::SocketEntries.kind(), ValueKind::Text);
		assert_eq!(Category::SocketCategories.kind(), ValueKind::Text);
		assert_eq!(Category::SocketIndexes.kind(), ValueKind::Text);
		assert_eq!(Category::SocketTypeHashes.kind(), ValueKind::Hash);
	}
}
