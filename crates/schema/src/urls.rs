//! Resource URL composition.
//!
//! The artifact stores only file names; full URLs are rebuilt at decode time
//! by prefixing one of these bases.

use serde::{Deserialize, Serialize};

pub const CONTENT_HOST: &str = "https://www.bungie.net";
pub const ICON_PATH: &str = "/common/destiny2_content/icons/";
pub const SCREENSHOT_PATH: &str = "/common/destiny2_content/screenshots/";

/// Base prefixes joined with decoded file names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlPrefixes {
	pub icon: String,
	pub screenshot: String,
	pub watermark: String,
}

impl Default for UrlPrefixes {
	fn default() -> Self {
		Self {
			icon: format!("{CONTENT_HOST}{ICON_PATH}"),
			screenshot: format!("{CONTENT_HOST}{SCREENSHOT_PATH}"),
			watermark: format!("{CONTENT_HOST}{ICON_PATH}"),
		}
	}
}

impl UrlPrefixes {
	pub fn icon_url(&self, file: &str) -> String {
		join(&self.icon, file)
	}

	pub fn screenshot_url(&self, file: &str) -> String {
		join(&self.screenshot, file)
	}

	pub fn watermark_url(&self, file: &str) -> String {
		join(&self.watermark, file)
	}
}

fn join(prefix: &str, file: &str) -> String {
	if file.is_empty() { String::new() } else { format!("{prefix}{file}") }
}

/// Strips a resource path down to its final file name component.
pub fn file_name(path: &str) -> &str {
	path.rsplit('/').next().unwrap_or(path)
}
