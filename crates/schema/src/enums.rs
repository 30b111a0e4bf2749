//! Numeric enumerations carried through the artifact as plain integers.

use serde::{Deserialize, Serialize};

/// UI presentation style of a socket category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum SocketCategoryStyle {
	#[default]
	Unknown,
	Reusable,
	Consumable,
	Unlockable,
	Intrinsic,
	EnergyMeter,
	LargePerk,
	Abilities,
	Supers,
}

impl SocketCategoryStyle {
	/// Whether plug choices for this category are listed by the UI on demand
	/// instead of being expanded into columns up front.
	pub const fn is_on_demand(self) -> bool {
		matches!(self, Self::Consumable | Self::EnergyMeter)
	}
}

impl From<u32> for SocketCategoryStyle {
	fn from(value: u32) -> Self {
		match value {
			1 => Self::Reusable,
			2 => Self::Consumable,
			3 => Self::Unlockable,
			4 => Self::Intrinsic,
			5 => Self::EnergyMeter,
			6 => Self::LargePerk,
			7 => Self::Abilities,
			8 => Self::Supers,
			_ => Self::Unknown,
		}
	}
}

impl From<SocketCategoryStyle> for u32 {
	fn from(style: SocketCategoryStyle) -> Self {
		style as u32
	}
}

bitflags::bitflags! {
	/// Live sources a socket may draw plug options from.
	///
	/// Bits are visited in ascending order when plug columns are built, which
	/// defines the precedence between sources.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct PlugSources: u32 {
		/// Plugs taken from the owner's inventory.
		const INVENTORY_SOURCED = 1 << 0;
		/// Plugs already resolved on the item instance.
		const REUSABLE_PLUG_ITEMS = 1 << 1;
		/// Profile-wide plug set.
		const PROFILE_PLUG_SET = 1 << 2;
		/// Plug set scoped to the owning character.
		const CHARACTER_PLUG_SET = 1 << 3;
	}
}

/// Perk display visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PerkVisibility {
	#[default]
	Visible,
	Disabled,
	Hidden,
}

impl From<u32> for PerkVisibility {
	fn from(value: u32) -> Self {
		match value {
			1 => Self::Disabled,
			2 => Self::Hidden,
			_ => Self::Visible,
		}
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case(2, SocketCategoryStyle::Consumable, true)]
	#[case(5, SocketCategoryStyle::EnergyMeter, true)]
	#[case(1, SocketCategoryStyle::Reusable, false)]
	#[case(0, SocketCategoryStyle::Unknown, false)]
	#[case(99, SocketCategoryStyle::Unknown, false)]
	fn style_from_wire(#[case] raw: u32, #[case] style: SocketCategoryStyle, #[case] on_demand: bool) {
		assert_eq!(SocketCategoryStyle::from(raw), style);
		assert_eq!(style.is_on_demand(), on_demand);
	}

	#[test]
	fn plug_sources_keep_unknown_bits_out() {
		let sources = PlugSources::from_bits_truncate(0b1_0110);
		assert_eq!(sources, PlugSources::REUSABLE_PLUG_ITEMS | PlugSources::PROFILE_PLUG_SET);
	}
}
