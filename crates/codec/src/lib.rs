//! Catalog compaction codec.
//!
//! [`encode`] turns one locale's raw catalog into a [`CompactArtifact`] whose
//! repeated values live in per-category helper tables. [`DefinitionResolver`]
//! reverses that at read time, and [`DefinitionResolver::build_sockets`]
//! rebuilds an instance's socket layout against a [`LiveProfile`].
//!
//! [`CompactArtifact`]: itemdex_schema::CompactArtifact
//! [`LiveProfile`]: itemdex_schema::LiveProfile

pub mod decoder;
pub mod dump;
pub mod encoder;
pub mod interner;
pub mod sockets;

pub use decoder::{DefinitionResolver, ResolvedDefinition, ResolvedPlug, ResolvedStat, ResolvedValue};
pub use dump::{VerifyReport, dump_definitions, verify};
pub use encoder::{EncodeExtras, EncodeIssue, EncodeOutput, encode, encode_with};
pub use interner::EncoderSession;
pub use sockets::{PlugOption, PlugOptionSource, SocketAlignment, SocketCategory, SocketEntry, SocketRef, SocketTopology};
