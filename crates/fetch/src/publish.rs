//! Writes built artifacts next to their freshness manifests.
//!
//! Every payload is serialized before the first file is touched, and each
//! file goes through a `.tmp` sibling and a rename so readers never observe a
//! partially written artifact.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use itemdex_codec::EncodeOutput;

use crate::error::PublishError;

pub fn artifact_path(out_dir: &Path, locale: &str) -> PathBuf {
	out_dir.join(format!("{locale}.json"))
}

pub fn manifest_path(out_dir: &Path, locale: &str) -> PathBuf {
	out_dir.join(format!("{locale}.manifest.json"))
}

/// Publishes every locale and returns the written paths in write order.
pub fn publish(out_dir: &Path, outputs: &BTreeMap<String, EncodeOutput>) -> Result<Vec<PathBuf>, PublishError> {
	let mut pending = Vec::with_capacity(outputs.len() * 2);
	for (locale, output) in outputs {
		pending.push((artifact_path(out_dir, locale), output.artifact.to_json()?));
		pending.push((manifest_path(out_dir, locale), serde_json::to_string(&output.artifact.manifest())?));
	}

	fs::create_dir_all(out_dir).map_err(|error| PublishError::Io {
		path: out_dir.to_path_buf(),
		error,
	})?;

	let mut written = Vec::with_capacity(pending.len());
	for (path, contents) in pending {
		write_atomic(&path, contents.as_bytes())?;
		tracing::info!(path = %path.display(), bytes = contents.len(), "publish.wrote");
		written.push(path);
	}
	Ok(written)
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), PublishError> {
	let mut tmp = path.as_os_str().to_owned();
	tmp.push(".tmp");
	let tmp = PathBuf::from(tmp);

	fs::write(&tmp, contents).map_err(|error| PublishError::Io { path: tmp.clone(), error })?;
	fs::rename(&tmp, path).map_err(|error| PublishError::Io {
		path: path.to_path_buf(),
		error,
	})
}
