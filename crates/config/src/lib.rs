//! Configuration for itemdex builds.
//!
//! Configuration is written in TOML. Unknown keys are rejected.
//!
//! ```toml
//! socket_categories = "defs/socket-categories.json"
//!
//! [source]
//! url = "https://cdn.example.net/catalog/{locale}/items.json"
//! locales = ["en", "de", "fr"]
//!
//! [retry]
//! max_attempts = 5
//! backoff_ms = 250
//!
//! [output]
//! dir = "public/artifacts"
//!
//! [urls]
//! icon = "https://cdn.example.net/icons/"
//! ```
//!
//! Exactly one of `source.url` and `source.path` must be set. Relative paths
//! are resolved against the directory holding the config file.

pub mod error;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use itemdex_schema::{SocketCategoryDef, UrlPrefixes};
use serde::Deserialize;

pub use error::{ConfigError, Result};

/// Placeholder every multi-locale source template must contain.
pub const LOCALE_PLACEHOLDER: &str = "{locale}";

/// Default config file name looked up in the working directory.
pub const DEFAULT_FILE: &str = "itemdex.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	pub source: SourceConfig,
	#[serde(default)]
	pub retry: RetryConfig,
	#[serde(default)]
	pub output: OutputConfig,
	#[serde(default)]
	pub urls: UrlConfig,
	/// JSON file of socket category definitions keyed by hash.
	#[serde(default)]
	pub socket_categories: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub path: Option<String>,
	#[serde(default)]
	pub locales: Vec<String>,
}

/// Validated catalog location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLocation<'a> {
	Url(&'a str),
	Path(&'a str),
}

impl SourceConfig {
	pub fn location(&self) -> SourceLocation<'_> {
		match (&self.url, &self.path) {
			(Some(url), _) => SourceLocation::Url(url),
			(None, Some(path)) => SourceLocation::Path(path),
			// Unreachable after `Config::validate`.
			(None, None) => SourceLocation::Path(""),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RetryConfig {
	pub max_attempts: u32,
	pub backoff_ms: u64,
}

impl Default for RetryConfig {
	fn default() -> Self {
		Self {
			max_attempts: 3,
			backoff_ms: 500,
		}
	}
}

impl RetryConfig {
	pub fn backoff(&self) -> Duration {
		Duration::from_millis(self.backoff_ms)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct OutputConfig {
	pub dir: PathBuf,
}

impl Default for OutputConfig {
	fn default() -> Self {
		Self {
			dir: PathBuf::from("artifacts"),
		}
	}
}

/// Overrides for the URL prefixes used when decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UrlConfig {
	pub icon: Option<String>,
	pub screenshot: Option<String>,
	pub watermark: Option<String>,
}

impl UrlConfig {
	pub fn prefixes(&self) -> UrlPrefixes {
		let mut prefixes = UrlPrefixes::default();
		if let Some(icon) = &self.icon {
			prefixes.icon.clone_from(icon);
		}
		if let Some(screenshot) = &self.screenshot {
			prefixes.screenshot.clone_from(screenshot);
		}
		if let Some(watermark) = &self.watermark {
			prefixes.watermark.clone_from(watermark);
		}
		prefixes
	}
}

impl Config {
	/// Parses and validates a TOML string.
	pub fn parse(input: &str) -> Result<Self> {
		let config: Config = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Loads a config file, resolving relative paths against its directory.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		let mut config = Self::parse(&content)?;
		if let Some(base) = path.parent() {
			config.rebase(base);
		}
		Ok(config)
	}

	fn validate(&self) -> Result<()> {
		let template = match (&self.source.url, &self.source.path) {
			(None, None) => return Err(ConfigError::MissingField("source.url or source.path")),
			(Some(_), Some(_)) => {
				return Err(ConfigError::Invalid {
					field: "source",
					reason: "set either `url` or `path`, not both".into(),
				});
			}
			(Some(template), None) | (None, Some(template)) => template,
		};

		if self.source.locales.is_empty() {
			return Err(ConfigError::MissingField("source.locales"));
		}
		if self.source.locales.len() > 1 && !template.contains(LOCALE_PLACEHOLDER) {
			return Err(ConfigError::Invalid {
				field: "source",
				reason: format!("template must contain `{LOCALE_PLACEHOLDER}` when several locales are configured"),
			});
		}
		if let Some(locale) = self.source.locales.iter().find(|locale| !is_locale_code(locale)) {
			return Err(ConfigError::Invalid {
				field: "source.locales",
				reason: format!("`{locale}` is not a locale code"),
			});
		}

		if self.retry.max_attempts == 0 {
			return Err(ConfigError::Invalid {
				field: "retry.max_attempts",
				reason: "must be at least 1".into(),
			});
		}
		Ok(())
	}

	fn rebase(&mut self, base: &Path) {
		if self.output.dir.is_relative() {
			self.output.dir = base.join(&self.output.dir);
		}
		if let Some(defs) = self.socket_categories.as_mut()
			&& defs.is_relative()
		{
			*defs = base.join(&*defs);
		}
		if let Some(template) = self.source.path.as_mut()
			&& Path::new(template.as_str()).is_relative()
		{
			*template = base.join(template.as_str()).to_string_lossy().into_owned();
		}
	}

	/// Reads the socket category definitions, if configured.
	pub fn load_socket_categories(&self) -> Result<BTreeMap<u32, SocketCategoryDef>> {
		let Some(path) = &self.socket_categories else {
			return Ok(BTreeMap::new());
		};
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.clone(),
			error: e,
		})?;
		serde_json::from_str(&content).map_err(|error| ConfigError::Json { path: path.clone(), error })
	}
}

/// Locale codes are used in file names, so keep them to `[A-Za-z0-9-_]`.
fn is_locale_code(locale: &str) -> bool {
	!locale.is_empty() && locale.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests;
