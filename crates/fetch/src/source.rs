//! Where raw catalogs come from.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{FetchError, Result};

/// Placeholder replaced by the locale code in source templates.
pub const LOCALE_PLACEHOLDER: &str = "{locale}";

/// One retrieved catalog body, not yet parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedCatalog {
	/// Artifact id, taken from the file stem of the final location.
	pub id: String,
	pub body: String,
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
	async fn fetch(&self, locale: &str) -> Result<FetchedCatalog>;
}

/// Catalogs served over HTTP from a `{locale}` URL template.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
	client: Client,
	template: String,
	timeout: Duration,
}

impl HttpCatalogSource {
	pub fn new(template: impl Into<String>) -> Self {
		Self {
			client: Client::new(),
			template: template.into(),
			timeout: Duration::from_secs(60),
		}
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
	async fn fetch(&self, locale: &str) -> Result<FetchedCatalog> {
		let url = fill_template(&self.template, locale);
		tracing::debug!(locale, %url, "fetch.http.request");

		let response = self
			.client
			.get(&url)
			.timeout(self.timeout)
			.send()
			.await
			.map_err(|e| FetchError::Network {
				locale: locale.to_owned(),
				message: e.to_string(),
			})?;

		let status = response.status();
		if !status.is_success() {
			return Err(FetchError::Status {
				locale: locale.to_owned(),
				status: status.as_u16(),
			});
		}

		// Redirects may land on a versioned file; its name is the id.
		let id = artifact_id(response.url().path());
		let body = response.text().await.map_err(|e| FetchError::Network {
			locale: locale.to_owned(),
			message: e.to_string(),
		})?;
		Ok(FetchedCatalog { id, body })
	}
}

/// Catalogs read from disk through a `{locale}` path template.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
	template: String,
}

impl FileCatalogSource {
	pub fn new(template: impl Into<String>) -> Self {
		Self { template: template.into() }
	}

	pub fn path_for(&self, locale: &str) -> PathBuf {
		PathBuf::from(fill_template(&self.template, locale))
	}
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
	async fn fetch(&self, locale: &str) -> Result<FetchedCatalog> {
		let path = self.path_for(locale);
		tracing::debug!(locale, path = %path.display(), "fetch.file.read");
		let body = tokio::fs::read_to_string(&path)
			.await
			.map_err(|error| FetchError::Io { path: path.clone(), error })?;
		Ok(FetchedCatalog {
			id: artifact_id(&path.to_string_lossy()),
			body,
		})
	}
}

pub fn fill_template(template: &str, locale: &str) -> String {
	template.replace(LOCALE_PLACEHOLDER, locale)
}

/// File stem of the last path segment, ignoring any query or fragment.
pub fn artifact_id(location: &str) -> String {
	let path = location.split(['?', '#']).next().unwrap_or_default();
	let file = path.rsplit(['/', '\\']).next().unwrap_or_default();
	match file.rsplit_once('.') {
		Some((stem, _)) if !stem.is_empty() => stem.to_owned(),
		_ => file.to_owned(),
	}
}
