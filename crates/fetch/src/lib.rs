//! Catalog retrieval and artifact production.
//!
//! [`build_locales`] fetches every configured locale through a
//! [`CatalogSource`] with [`RetryPolicy`] applied, encodes them concurrently
//! and returns all outputs or the first failure. [`publish`] then writes the
//! artifacts and their manifests.

pub mod build;
pub mod error;
pub mod publish;
pub mod retry;
pub mod source;

pub use build::build_locales;
pub use error::{BuildError, FetchError, PublishError};
pub use publish::{artifact_path, manifest_path, publish};
pub use retry::{RetryPolicy, fetch_with_retry};
pub use source::{CatalogSource, FetchedCatalog, FileCatalogSource, HttpCatalogSource, artifact_id, fill_template};
