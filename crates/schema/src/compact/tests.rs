use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

fn artifact_with(items: BTreeMap<ItemHash, CompactItem>, helpers: Helpers) -> CompactArtifact {
	CompactArtifact {
		items,
		helpers,
		version: ARTIFACT_VERSION,
		id: "world_sql_content_abc".into(),
	}
}

#[test]
fn sparse_item_omits_empty_fields() {
	let item = CompactItem {
		name: Some("Foo".into()),
		description: Some(0),
		..Default::default()
	};
	assert_eq!(serde_json::to_value(&item).unwrap(), json!({"n": "Foo", "d": 0}));
}

#[test]
fn flags_serialize_as_one() {
	let item = CompactItem {
		redacted: true,
		..Default::default()
	};
	assert_eq!(serde_json::to_value(&item).unwrap(), json!({"r": 1}));

	let parsed: CompactItem = serde_json::from_value(json!({"r": 1, "eq": true, "nt": 0})).unwrap();
	assert!(parsed.redacted);
	assert!(parsed.equippable);
	assert!(!parsed.non_transferrable);
}

#[test]
fn values_serialize_as_pairs() {
	let item = CompactItem {
		values: vec![CompactValue(0, 25)],
		..Default::default()
	};
	assert_eq!(serde_json::to_value(&item).unwrap(), json!({"vl": [[0, 25]]}));
}

#[test]
fn helpers_serialize_in_declaration_order() {
	let mut tables = vec![Vec::new(); Category::COUNT];
	tables[Category::Icons.index()] = vec![HelperValue::Text("a.jpg".into())];
	tables[Category::Descriptions.index()] = vec![HelperValue::Text("Bar".into())];
	tables[Category::BucketTypeHashes.index()] = vec![HelperValue::Hash(1498876634)];
	let helpers = Helpers::from_tables(tables);

	let text = serde_json::to_string(&helpers).unwrap();
	assert!(text.starts_with(r#"{"Descriptions":["Bar"],"DisplaySources":[]"#));
	assert!(text.ends_with(r#""Icons":["a.jpg"]}"#));

	let back: Helpers = serde_json::from_str(&text).unwrap();
	assert_eq!(back, helpers);
}

#[test]
fn helpers_reject_unknown_tables() {
	let err = serde_json::from_str::<Helpers>(r#"{"Bogus": []}"#).unwrap_err();
	assert!(err.to_string().contains("unknown helper table `Bogus`"));
}

#[test]
fn helpers_missing_tables_default_to_empty() {
	let helpers: Helpers = serde_json::from_str(r#"{"Descriptions": ["x"]}"#).unwrap();
	assert_eq!(helpers.table(Category::Descriptions).len(), 1);
	assert!(helpers.table(Category::Icons).is_empty());
	assert_eq!(helpers.get(Category::Icons, 0), None);
}

#[test]
fn artifact_json_round_trip() {
	let mut items = BTreeMap::new();
	items.insert(
		100,
		CompactItem {
			name: Some("Foo".into()),
			description: Some(0),
			..Default::default()
		},
	);
	let mut tables = vec![Vec::new(); Category::COUNT];
	tables[Category::Descriptions.index()] = vec![HelperValue::Text("Bar".into())];
	let artifact = artifact_with(items, Helpers::from_tables(tables));

	let text = artifact.to_json().unwrap();
	assert!(text.starts_with(r#"{"items":{"100":{"n":"Foo","d":0}},"helpers":{"#));
	assert_eq!(CompactArtifact::from_json(&text).unwrap(), artifact);
}

#[test]
fn artifact_rejects_other_versions() {
	let mut artifact = artifact_with(BTreeMap::new(), Helpers::default());
	artifact.version = ARTIFACT_VERSION + 1;
	let text = artifact.to_json().unwrap();
	assert!(matches!(
		CompactArtifact::from_json(&text),
		Err(ArtifactError::UnsupportedVersion { found, .. }) if found == ARTIFACT_VERSION + 1
	));
}

#[test]
fn manifest_mirrors_artifact() {
	let artifact = artifact_with(BTreeMap::new(), Helpers::default());
	assert_eq!(artifact.manifest(), ArtifactManifest::new("world_sql_content_abc"));
}
