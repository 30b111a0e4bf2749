use std::path::PathBuf;

use itemdex_schema::ArtifactError;
use thiserror::Error;

pub type Result<T, E = FetchError> = std::result::Result<T, E>;

/// Failure retrieving one locale's catalog.
#[derive(Debug, Error)]
pub enum FetchError {
	#[error("{locale}: request failed: {message}")]
	Network { locale: String, message: String },

	#[error("{locale}: server answered {status}")]
	Status { locale: String, status: u16 },

	#[error("failed to read {}: {error}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		error: std::io::Error,
	},

	#[error("{locale}: gave up after {attempts} attempts")]
	Exhausted {
		locale: String,
		attempts: u32,
		#[source]
		last: Box<FetchError>,
	},
}

/// Failure of a multi-locale build. Any one aborts the whole run.
#[derive(Debug, Error)]
pub enum BuildError {
	#[error(transparent)]
	Fetch(#[from] FetchError),

	#[error("{locale}: catalog is not a JSON object of items: {error}")]
	Parse {
		locale: String,
		#[source]
		error: serde_json::Error,
	},

	#[error("{locale}: build task failed: {message}")]
	Task { locale: String, message: String },
}

#[derive(Debug, Error)]
pub enum PublishError {
	#[error("failed to write {}: {error}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		error: std::io::Error,
	},

	#[error(transparent)]
	Artifact(#[from] ArtifactError),

	#[error("failed to serialize manifest: {0}")]
	Manifest(#[from] serde_json::Error),
}
