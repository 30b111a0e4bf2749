//! Concurrent multi-locale encode.
//!
//! Each locale is fetched on its own task and encoded on the blocking pool
//! with a private encoder session. The run is all-or-nothing: the first
//! failure aborts the remaining tasks and no output is returned.

use std::collections::BTreeMap;
use std::sync::Arc;

use itemdex_codec::{EncodeExtras, EncodeOutput, encode_with};
use itemdex_schema::RawCatalog;
use tokio::task::{self, JoinSet};

use crate::error::BuildError;
use crate::retry::{RetryPolicy, fetch_with_retry};
use crate::source::CatalogSource;

pub async fn build_locales(
	source: Arc<dyn CatalogSource>,
	locales: &[String],
	policy: RetryPolicy,
	extras: Arc<EncodeExtras>,
) -> Result<BTreeMap<String, EncodeOutput>, BuildError> {
	let mut tasks = JoinSet::new();
	let mut task_locales: BTreeMap<task::Id, String> = BTreeMap::new();
	for locale in locales {
		let source = Arc::clone(&source);
		let extras = Arc::clone(&extras);
		tracing::trace!(%locale, pending = tasks.len(), "build.spawn");
		let task_locale = locale.clone();
		let handle = tasks.spawn(async move { build_one(source.as_ref(), &task_locale, policy, extras).await });
		task_locales.insert(handle.id(), locale.clone());
	}

	let mut outputs = BTreeMap::new();
	while let Some(joined) = tasks.join_next_with_id().await {
		let (id, result) = match joined {
			Ok(done) => done,
			Err(e) => {
				let locale = task_locales.remove(&e.id()).unwrap_or_default();
				tracing::error!(%locale, error = %e, "build.task_failed");
				tasks.abort_all();
				return Err(BuildError::Task {
					locale,
					message: e.to_string(),
				});
			}
		};
		let locale = task_locales.remove(&id).unwrap_or_default();
		match result {
			Ok(output) => {
				tracing::info!(%locale, items = output.artifact.items.len(), issues = output.issues.len(), "build.locale_done");
				outputs.insert(locale, output);
			}
			Err(error) => {
				tracing::error!(%locale, %error, "build.aborted");
				tasks.abort_all();
				return Err(error);
			}
		}
	}
	Ok(outputs)
}

async fn build_one(source: &dyn CatalogSource, locale: &str, policy: RetryPolicy, extras: Arc<EncodeExtras>) -> Result<EncodeOutput, BuildError> {
	let fetched = fetch_with_retry(source, locale, policy).await?;

	let task_locale = locale.to_owned();
	tokio::task::spawn_blocking(move || -> Result<EncodeOutput, BuildError> {
		let catalog: RawCatalog = serde_json::from_str(&fetched.body).map_err(|error| BuildError::Parse {
			locale: task_locale.clone(),
			error,
		})?;
		Ok(encode_with(&catalog, &fetched.id, &extras))
	})
	.await
	.map_err(|e| BuildError::Task {
		locale: locale.to_owned(),
		message: e.to_string(),
	})?
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use async_trait::async_trait;
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::error::{FetchError, Result};
	use crate::source::FetchedCatalog;

	/// Serves a fixed body per locale; unknown locales always fail and
	/// `panic` panics the fetching task.
	struct Fixture(BTreeMap<&'static str, &'static str>);

	#[async_trait]
	impl CatalogSource for Fixture {
		async fn fetch(&self, locale: &str) -> Result<FetchedCatalog> {
			if locale == "panic" {
				panic!("source crashed");
			}
			match self.0.get(locale) {
				Some(body) => Ok(FetchedCatalog {
					id: format!("catalog-{locale}"),
					body: (*body).to_owned(),
				}),
				None => Err(FetchError::Status {
					locale: locale.to_owned(),
					status: 404,
				}),
			}
		}
	}

	fn fixture() -> Arc<dyn CatalogSource> {
		Arc::new(Fixture(BTreeMap::from([
			("en", r#"{"1": {"displayProperties": {"name": "Sword", "description": "Sharp"}}}"#),
			("de", r#"{"1": {"displayProperties": {"name": "Schwert", "description": "Scharf"}}}"#),
			("xx", r#"["not", "a", "catalog"]"#),
		])))
	}

	fn policy() -> RetryPolicy {
		RetryPolicy {
			max_attempts: 2,
			backoff: Duration::ZERO,
		}
	}

	fn locales(codes: &[&str]) -> Vec<String> {
		codes.iter().map(|code| (*code).to_owned()).collect()
	}

	#[tokio::test]
	async fn every_locale_gets_its_own_artifact() {
		let outputs = build_locales(fixture(), &locales(&["en", "de"]), policy(), Arc::default())
			.await
			.unwrap();
		assert_eq!(outputs.keys().map(String::as_str).collect::<Vec<_>>(), vec!["de", "en"]);
		assert_eq!(outputs["de"].artifact.id, "catalog-de");
		assert_eq!(outputs["de"].artifact.items[&1].name.as_deref(), Some("Schwert"));
		assert_eq!(outputs["en"].artifact.items[&1].name.as_deref(), Some("Sword"));
	}

	#[tokio::test]
	async fn one_failed_locale_fails_the_run() {
		let error = build_locales(fixture(), &locales(&["en", "ja", "de"]), policy(), Arc::default())
			.await
			.unwrap_err();
		assert!(matches!(error, BuildError::Fetch(FetchError::Exhausted { attempts: 2, .. })));
	}

	#[tokio::test]
	async fn unparsable_catalog_fails_the_run() {
		let error = build_locales(fixture(), &locales(&["xx"]), policy(), Arc::default())
			.await
			.unwrap_err();
		assert!(matches!(error, BuildError::Parse { ref locale, .. } if locale == "xx"));
	}

	#[tokio::test]
	async fn panicked_task_names_its_locale() {
		let error = build_locales(fixture(), &locales(&["panic"]), policy(), Arc::default())
			.await
			.unwrap_err();
		match error {
			BuildError::Task { locale, message } => {
				assert_eq!(locale, "panic");
				assert!(message.contains("panicked"), "{message}");
			}
			other => panic!("unexpected error: {other:?}"),
		}
	}
}
