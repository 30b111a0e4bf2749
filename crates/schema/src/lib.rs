//! Data types shared by the catalog encoder and decoder.
//!
//! Three families of types live here:
//!
//! - **Raw catalog** ([`raw`]): the verbose per-locale source records, one
//!   [`RawItem`] per item hash. Every nested section is wrapped in a
//!   [`Section`] so a malformed section is reported instead of failing the
//!   whole item.
//! - **Compact artifact** ([`compact`]): the minified wire format, made of
//!   short-keyed [`CompactItem`] records plus per-[`Category`] helper tables.
//! - **Live profile** ([`live`]): per-owner runtime socket and plug state that
//!   the socket decoder fuses with the static artifact.
//!
//! The wire format is plain JSON. [`ARTIFACT_VERSION`] must be bumped whenever
//! a short key or the meaning of a helper table changes.

pub mod category;
pub mod compact;
pub mod enums;
pub mod live;
pub mod manifest;
pub mod raw;
pub mod urls;

pub use category::{Category, ValueKind};
pub use compact::{
	ArtifactError, CompactArtifact, CompactItem, CompactPlug, CompactSocketCategory, CompactSocketEntry, CompactSockets, CompactStats,
	CompactValue, HelperValue, Helpers,
};
pub use enums::{PerkVisibility, PlugSources, SocketCategoryStyle};
pub use live::{LiveItem, LivePlug, LiveProfile, LiveSocketState};
pub use manifest::{ARTIFACT_VERSION, ArtifactManifest};
pub use raw::{RawCatalog, RawItem, Section, SocketCategoryDef};
pub use urls::UrlPrefixes;

/// Stable integer identifier of one catalog item.
pub type ItemHash = u32;
