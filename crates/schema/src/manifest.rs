//! Artifact versioning and the freshness manifest.

use serde::{Deserialize, Serialize};

/// Wire format version of [`CompactArtifact`](crate::CompactArtifact).
///
/// Version 1 stores socket entries, socket categories and socket index lists
/// as JSON strings interned in their own helper tables.
pub const ARTIFACT_VERSION: u32 = 1;

/// Small `{id, version}` pair fetched ahead of a full artifact download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
	pub id: String,
	pub version: u32,
}

impl ArtifactManifest {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			version: ARTIFACT_VERSION,
		}
	}

	/// Whether this client can decode artifacts described by this manifest.
	pub fn is_compatible(&self) -> bool {
		self.version == ARTIFACT_VERSION
	}

	/// Whether a cached artifact described by `cached` must be replaced by the
	/// one described by `self`.
	pub fn supersedes(&self, cached: Option<&ArtifactManifest>) -> bool {
		match cached {
			None => true,
			Some(cached) => !cached.is_compatible() || cached != self,
		}
	}
}
