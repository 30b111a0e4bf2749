use pretty_assertions::assert_eq;

use super::*;

const MINIMAL: &str = r#"
[source]
url = "https://cdn.example.net/{locale}/items.json"
locales = ["en", "de"]
"#;

#[test]
fn minimal_config_uses_defaults() {
	let config = Config::parse(MINIMAL).unwrap();
	assert_eq!(config.source.location(), SourceLocation::Url("https://cdn.example.net/{locale}/items.json"));
	assert_eq!(config.source.locales, vec!["en", "de"]);
	assert_eq!(config.retry, RetryConfig::default());
	assert_eq!(config.retry.backoff(), Duration::from_millis(500));
	assert_eq!(config.output.dir, PathBuf::from("artifacts"));
	assert_eq!(config.urls.prefixes(), UrlPrefixes::default());
	assert_eq!(config.socket_categories, None);
}

#[test]
fn full_config_parses() {
	let config = Config::parse(
		r#"
socket_categories = "defs.json"

[source]
path = "dumps/{locale}.json"
locales = ["en"]

[retry]
max_attempts = 5
backoff_ms = 20

[output]
dir = "out"

[urls]
icon = "https://img.example.net/"
"#,
	)
	.unwrap();
	assert_eq!(config.source.location(), SourceLocation::Path("dumps/{locale}.json"));
	assert_eq!(config.retry, RetryConfig { max_attempts: 5, backoff_ms: 20 });
	let prefixes = config.urls.prefixes();
	assert_eq!(prefixes.icon, "https://img.example.net/");
	assert_eq!(prefixes.screenshot, UrlPrefixes::default().screenshot);
}

#[test]
fn unknown_keys_are_rejected() {
	let err = Config::parse(&format!("{MINIMAL}\n[retry]\nattempts = 2\n")).unwrap_err();
	assert!(matches!(err, ConfigError::Toml(_)), "{err}");
}

#[test]
fn source_needs_exactly_one_location() {
	let neither = Config::parse("[source]\nlocales = [\"en\"]\n").unwrap_err();
	assert!(matches!(neither, ConfigError::MissingField("source.url or source.path")));

	let both = Config::parse("[source]\nurl = \"a/{locale}\"\npath = \"b/{locale}\"\nlocales = [\"en\"]\n").unwrap_err();
	assert!(matches!(both, ConfigError::Invalid { field: "source", .. }));
}

#[test]
fn locales_are_required_and_checked() {
	let missing = Config::parse("[source]\nurl = \"x/{locale}\"\n").unwrap_err();
	assert!(matches!(missing, ConfigError::MissingField("source.locales")));

	let bad = Config::parse("[source]\nurl = \"x/{locale}\"\nlocales = [\"../etc\"]\n").unwrap_err();
	assert!(matches!(bad, ConfigError::Invalid { field: "source.locales", .. }));
}

#[test]
fn several_locales_need_a_placeholder() {
	let err = Config::parse("[source]\nurl = \"https://cdn/items.json\"\nlocales = [\"en\", \"fr\"]\n").unwrap_err();
	assert!(matches!(err, ConfigError::Invalid { field: "source", .. }));

	// A single locale may use a fixed location.
	Config::parse("[source]\nurl = \"https://cdn/items.json\"\nlocales = [\"en\"]\n").unwrap();
}

#[test]
fn zero_attempts_is_invalid() {
	let err = Config::parse(&format!("{MINIMAL}\n[retry]\nmax_attempts = 0\n")).unwrap_err();
	assert!(matches!(err, ConfigError::Invalid { field: "retry.max_attempts", .. }));
}

#[test]
fn load_resolves_relative_paths() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join(DEFAULT_FILE);
	std::fs::write(
		&path,
		"socket_categories = \"defs.json\"\n[source]\npath = \"raw/{locale}.json\"\nlocales = [\"en\"]\n[output]\ndir = \"/srv/out\"\n",
	)
	.unwrap();
	std::fs::write(dir.path().join("defs.json"), r#"{"3956125808": {"categoryStyle": 2, "name": "mods"}}"#).unwrap();

	let config = Config::load(&path).unwrap();
	assert_eq!(config.output.dir, PathBuf::from("/srv/out"));
	assert_eq!(config.socket_categories, Some(dir.path().join("defs.json")));
	let expected = dir.path().join("raw/{locale}.json");
	assert_eq!(config.source.location(), SourceLocation::Path(expected.to_str().unwrap()));

	let defs = config.load_socket_categories().unwrap();
	assert_eq!(defs[&3956125808].category_style, 2);
}

#[test]
fn missing_file_is_io_error() {
	let err = Config::load("/definitely/not/here/itemdex.toml").unwrap_err();
	assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn unset_socket_categories_is_empty() {
	assert!(Config::parse(MINIMAL).unwrap().load_socket_categories().unwrap().is_empty());
}
