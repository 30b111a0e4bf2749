//! Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax, or a key that does not belong.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration or side file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A side file referenced by the configuration is not valid JSON.
	#[error("invalid JSON in {path}: {error}")]
	Json { path: PathBuf, error: serde_json::Error },

	/// A required field is missing from the configuration.
	#[error("missing required field: {0}")]
	MissingField(&'static str),

	/// A field is present but its value cannot be used.
	#[error("invalid value for {field}: {reason}")]
	Invalid { field: &'static str, reason: String },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
