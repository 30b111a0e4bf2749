//! Subcommand handlers.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use itemdex_codec::{DefinitionResolver, EncodeExtras, EncodeOutput, dump_definitions, encode_with, verify};
use itemdex_config::{Config, SourceLocation};
use itemdex_fetch::{CatalogSource, FileCatalogSource, HttpCatalogSource, RetryPolicy, artifact_id, build_locales, publish};
use itemdex_schema::{ArtifactManifest, CompactArtifact, LiveItem, LiveProfile, RawCatalog, SocketCategoryDef, UrlPrefixes};

pub async fn build(config_path: &Path) -> Result<()> {
	let config = Config::load(config_path).with_context(|| format!("loading {}", config_path.display()))?;

	let source: Arc<dyn CatalogSource> = match config.source.location() {
		SourceLocation::Url(template) => Arc::new(HttpCatalogSource::new(template)),
		SourceLocation::Path(template) => Arc::new(FileCatalogSource::new(template)),
	};
	let policy = RetryPolicy {
		max_attempts: config.retry.max_attempts,
		backoff: config.retry.backoff(),
	};
	let extras = Arc::new(EncodeExtras {
		socket_categories: config.load_socket_categories()?,
	});

	let outputs = build_locales(source, &config.source.locales, policy, extras).await?;
	for (locale, output) in &outputs {
		report_issues(locale, output);
	}

	let written = publish(&config.output.dir, &outputs)?;
	tracing::info!(locales = outputs.len(), files = written.len(), dir = %config.output.dir.display(), "build.published");
	Ok(())
}

pub fn encode(catalog_path: &Path, id: Option<String>, socket_categories: Option<&Path>, output: Option<&Path>) -> Result<()> {
	let catalog: RawCatalog = read_json(catalog_path)?;
	let extras = EncodeExtras {
		socket_categories: match socket_categories {
			Some(path) => read_json::<BTreeMap<u32, SocketCategoryDef>>(path)?,
			None => BTreeMap::new(),
		},
	};
	let id = id.unwrap_or_else(|| artifact_id(&catalog_path.to_string_lossy()));

	let out = encode_with(&catalog, &id, &extras);
	report_issues(&id, &out);
	write_output(output, &out.artifact.to_json()?)
}

pub fn show(config: Option<&Config>, artifact: &Path, hash: u32) -> Result<()> {
	let resolver = resolver(config, artifact)?;
	let definition = resolver.resolve(hash);
	if definition.hash != hash {
		tracing::warn!(hash, "show.not_found");
	}
	write_output(None, &serde_json::to_string_pretty(&*definition)?)
}

pub fn sockets(artifact: &Path, hash: u32, profile: &Path, instance: String, owner: Option<String>) -> Result<()> {
	let resolver = resolver(None, artifact)?;
	let profile: LiveProfile = read_json(profile)?;
	let live = LiveItem {
		instance_id: instance,
		owner_id: owner,
	};
	let Some(topology) = resolver.build_sockets(hash, Some(&live), &profile) else {
		bail!("item {hash} has no sockets");
	};
	write_output(None, &serde_json::to_string_pretty(&topology)?)
}

pub fn dump(config: Option<&Config>, artifact: &Path, output: Option<&Path>) -> Result<()> {
	let resolver = resolver(config, artifact)?;
	write_output(output, &dump_definitions(&resolver)?)
}

pub fn verify_dump(config: Option<&Config>, artifact: &Path, baseline: &Path) -> Result<()> {
	let resolver = resolver(config, artifact)?;
	let actual = dump_definitions(&resolver)?;
	let expected = std::fs::read_to_string(baseline).with_context(|| format!("reading {}", baseline.display()))?;

	let report = verify(&actual, &expected);
	if !report.is_match() {
		bail!("{report}");
	}
	tracing::info!(artifact = %artifact.display(), "verify.match");
	Ok(())
}

pub fn manifest(remote: &Path, cached: Option<&Path>) -> Result<()> {
	let remote: ArtifactManifest = read_json(remote)?;
	let cached: Option<ArtifactManifest> = cached.map(read_json::<ArtifactManifest>).transpose()?;

	if !remote.is_compatible() {
		bail!("remote artifact version {} is not supported by this build", remote.version);
	}
	let status = if remote.supersedes(cached.as_ref()) { "stale" } else { "fresh" };
	write_output(None, &format!("{status} {}", remote.id))
}

/// Config file to use for `build` when none is given.
pub fn default_config_path() -> PathBuf {
	PathBuf::from(itemdex_config::DEFAULT_FILE)
}

fn resolver(config: Option<&Config>, artifact: &Path) -> Result<DefinitionResolver> {
	let json = std::fs::read_to_string(artifact).with_context(|| format!("reading {}", artifact.display()))?;
	let artifact = CompactArtifact::from_json(&json).with_context(|| format!("parsing {}", artifact.display()))?;
	let urls = config.map_or_else(UrlPrefixes::default, |config| config.urls.prefixes());
	Ok(DefinitionResolver::with_urls(artifact, urls))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
	let content = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
	serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
	match path {
		Some(path) => std::fs::write(path, contents).with_context(|| format!("writing {}", path.display())),
		None => {
			let mut stdout = std::io::stdout().lock();
			stdout.write_all(contents.as_bytes())?;
			if !contents.ends_with('\n') {
				stdout.write_all(b"\n")?;
			}
			Ok(())
		}
	}
}

fn report_issues(label: &str, output: &EncodeOutput) {
	for issue in &output.issues {
		tracing::warn!(locale = label, %issue, "encode.issue");
	}
	tracing::info!(
		locale = label,
		items = output.artifact.items.len(),
		excluded = output.excluded,
		issues = output.issues.len(),
		"encode.summary"
	);
}
