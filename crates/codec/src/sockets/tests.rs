use std::collections::BTreeMap;

use itemdex_schema::{RawCatalog, SocketCategoryDef};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use crate::{EncodeExtras, encode_with};

const WEAPON_PERKS: u32 = 4241085061;
const WEAPON_MODS: u32 = 2685412949;

fn resolver() -> DefinitionResolver {
	let catalog: RawCatalog = serde_json::from_value(json!({
		"1": {
			"displayProperties": {"name": "Rifle"},
			"sockets": {
				"socketEntries": [
					{"socketTypeHash": 11, "singleInitialItemHash": 500, "reusablePlugSetHash": 900, "plugSources": 14},
					{"socketTypeHash": 12, "singleInitialItemHash": 501, "plugSources": 2},
					{"socketTypeHash": 13, "singleInitialItemHash": 0, "reusablePlugSetHash": 901, "plugSources": 1}
				],
				"socketCategories": [
					{"socketCategoryHash": WEAPON_PERKS, "socketIndexes": [0, 1]},
					{"socketCategoryHash": WEAPON_MODS, "socketIndexes": [2]}
				]
			}
		},
		"2": {"displayProperties": {"name": "Emblem"}},
		"3": {
			"displayProperties": {"name": "Armor"},
			"sockets": {
				"socketEntries": [
					{"socketTypeHash": 14, "singleInitialItemHash": 0, "randomizedPlugSetHash": 950, "plugSources": 12}
				],
				"socketCategories": [
					{"socketCategoryHash": WEAPON_PERKS, "socketIndexes": [0]}
				]
			}
		}
	}))
	.unwrap();
	let extras = EncodeExtras {
		socket_categories: BTreeMap::from([
			(WEAPON_PERKS, SocketCategoryDef { category_style: 1 }),
			(WEAPON_MODS, SocketCategoryDef { category_style: 2 }),
		]),
	};
	DefinitionResolver::new(encode_with(&catalog, "test", &extras).artifact)
}

fn instance() -> LiveItem {
	LiveItem {
		instance_id: "6917529".into(),
		owner_id: Some("2305843".into()),
	}
}

fn state(plug_hash: u32, is_enabled: bool, is_visible: bool) -> LiveSocketState {
	LiveSocketState {
		plug_hash: Some(plug_hash),
		is_enabled,
		is_visible,
	}
}

fn plug(plug_item_hash: u32) -> LivePlug {
	LivePlug {
		plug_item_hash,
		can_insert: true,
		enabled: true,
	}
}

fn profile_with_states(states: Vec<LiveSocketState>) -> LiveProfile {
	let mut profile = LiveProfile::default();
	profile.item_sockets.insert("6917529".into(), states);
	profile
}

#[test]
fn live_states_apply_by_position() {
	let resolver = resolver();
	let profile = profile_with_states(vec![state(700, true, true), state(701, false, true), state(702, true, false)]);
	let topology = resolver.build_sockets(1, Some(&instance()), &profile).unwrap();

	assert_eq!(topology.alignment, SocketAlignment::Exact);
	let live: Vec<_> = topology
		.socket_entries
		.iter()
		.map(|entry| (entry.plugged_hash, entry.is_enabled, entry.is_visible))
		.collect();
	assert_eq!(live, vec![(Some(700), true, true), (Some(701), false, true), (Some(702), true, false)]);
}

#[test]
fn short_live_payload_leaves_trailing_defaults() {
	let resolver = resolver();
	let profile = profile_with_states(vec![state(700, true, true), state(701, true, true)]);
	let topology = resolver.build_sockets(1, Some(&instance()), &profile).unwrap();

	assert_eq!(topology.alignment, SocketAlignment::LiveShort { expected: 3, live: 2 });
	let last = &topology.socket_entries[2];
	assert_eq!(last.plugged_hash, None);
	assert!(!last.is_enabled);
	assert!(!last.is_visible);
	assert_eq!(last.socket_type_hash, 13);
}

#[test]
fn long_live_payload_ignores_extra_states() {
	let resolver = resolver();
	let profile = profile_with_states(vec![state(1, true, true); 5]);
	let topology = resolver.build_sockets(1, Some(&instance()), &profile).unwrap();
	assert_eq!(topology.alignment, SocketAlignment::LiveLong { expected: 3, live: 5 });
	assert_eq!(topology.socket_entries.len(), 3);
}

#[test]
fn no_live_item_or_no_sockets_yields_none() {
	let resolver = resolver();
	let profile = LiveProfile::default();
	assert_eq!(resolver.build_sockets(1, None, &profile), None);
	assert_eq!(resolver.build_sockets(2, Some(&instance()), &profile), None);
	assert_eq!(resolver.build_sockets(99, Some(&instance()), &profile), None);
}

#[test]
fn static_references_and_categories_resolve() {
	let resolver = resolver();
	let topology = resolver
		.build_sockets(1, Some(&instance()), &LiveProfile::default())
		.unwrap();

	let first = &topology.socket_entries[0];
	assert_eq!(first.socket_index, 0);
	assert_eq!(first.socket_type_hash, 11);
	assert_eq!(first.single_initial_item_hash, 500);
	assert_eq!(first.reusable_plug_set_hash, 900);
	assert_eq!(
		first.plug_sources,
		PlugSources::REUSABLE_PLUG_ITEMS | PlugSources::PROFILE_PLUG_SET | PlugSources::CHARACTER_PLUG_SET
	);

	assert_eq!(
		topology.socket_categories,
		vec![
			SocketCategory {
				category_hash: WEAPON_PERKS,
				style: SocketCategoryStyle::Reusable,
				sockets: vec![
					SocketRef {
						socket_index: 0,
						socket_type_hash: 11
					},
					SocketRef {
						socket_index: 1,
						socket_type_hash: 12
					},
				],
			},
			SocketCategory {
				category_hash: WEAPON_MODS,
				style: SocketCategoryStyle::Consumable,
				sockets: vec![SocketRef {
					socket_index: 2,
					socket_type_hash: 13
				}],
			},
		]
	);
}

#[test]
fn plug_options_follow_source_precedence() {
	let resolver = resolver();
	let mut profile = profile_with_states(vec![state(700, true, true), state(0, true, true), state(702, true, true)]);
	profile
		.reusable_plugs
		.insert("6917529".into(), BTreeMap::from([(0, vec![plug(700), plug(710)])]));
	profile.profile_plug_sets.insert(900, vec![plug(720), plug(710)]);
	profile
		.character_plug_sets
		.insert("2305843".into(), BTreeMap::from([(900, vec![plug(730)])]));

	let topology = resolver.build_sockets(1, Some(&instance()), &profile).unwrap();
	let options: Vec<_> = topology.socket_entries[0]
		.plug_options
		.iter()
		.map(|option| (option.plug_item_hash, option.source))
		.collect();
	assert_eq!(
		options,
		vec![
			(700, PlugOptionSource::Inserted),
			(710, PlugOptionSource::ReusablePlugItems),
			(720, PlugOptionSource::ProfilePlugSet),
			(730, PlugOptionSource::CharacterPlugSet),
		]
	);

	// Zero plug hash means empty socket, and no reusable plugs were recorded.
	assert_eq!(topology.socket_entries[1].plugged_hash, None);
	assert!(topology.socket_entries[1].plug_options.is_empty());
}

#[test]
fn on_demand_categories_skip_option_columns() {
	let resolver = resolver();
	let mut profile = profile_with_states(vec![state(700, true, true), state(701, true, true), state(702, true, true)]);
	profile.profile_plug_sets.insert(901, vec![plug(800)]);

	let topology = resolver.build_sockets(1, Some(&instance()), &profile).unwrap();
	let mod_socket = &topology.socket_entries[2];
	assert!(mod_socket.on_demand);
	assert!(mod_socket.plug_options.is_empty());
	assert!(!topology.socket_entries[0].on_demand);
}

#[test]
fn randomized_plug_set_backs_profile_and_character_sources() {
	let resolver = resolver();
	let mut profile = profile_with_states(vec![state(0, true, true)]);
	profile.profile_plug_sets.insert(950, vec![plug(810)]);
	profile
		.character_plug_sets
		.insert("2305843".into(), BTreeMap::from([(950, vec![plug(820), plug(810)])]));

	let topology = resolver.build_sockets(3, Some(&instance()), &profile).unwrap();
	let entry = &topology.socket_entries[0];
	assert_eq!(entry.reusable_plug_set_hash, 0);
	assert_eq!(entry.randomized_plug_set_hash, 950);
	let options: Vec<_> = entry
		.plug_options
		.iter()
		.map(|option| (option.plug_item_hash, option.source))
		.collect();
	assert_eq!(
		options,
		vec![(810, PlugOptionSource::ProfilePlugSet), (820, PlugOptionSource::CharacterPlugSet)]
	);
}

#[test]
fn character_plug_set_needs_an_owner() {
	let resolver = resolver();
	let mut profile = profile_with_states(Vec::new());
	profile
		.character_plug_sets
		.insert("2305843".into(), BTreeMap::from([(900, vec![plug(730)])]));
	let vaulted = LiveItem {
		instance_id: "6917529".into(),
		owner_id: None,
	};

	let topology = resolver.build_sockets(1, Some(&vaulted), &profile).unwrap();
	assert!(topology.socket_entries[0].plug_options.is_empty());
	assert_eq!(topology.alignment, SocketAlignment::LiveShort { expected: 3, live: 0 });
}

#[test]
fn static_skeleton_is_shared_between_rebuilds() {
	let resolver = resolver();
	let profile = LiveProfile::default();
	resolver.build_sockets(1, Some(&instance()), &profile);
	resolver.build_sockets(1, Some(&instance()), &profile);
	resolver.build_sockets(2, Some(&instance()), &profile);
	assert_eq!(resolver.sockets.lock().len(), 2);
}

#[test]
fn topology_serializes_codes_and_bits() {
	let resolver = resolver();
	let topology = resolver
		.build_sockets(1, Some(&instance()), &LiveProfile::default())
		.unwrap();
	let value = serde_json::to_value(&topology).unwrap();
	assert_eq!(value["socket_categories"][1]["style"], json!(2));
	assert_eq!(value["socket_entries"][0]["plug_sources"], json!(14));
	assert_eq!(value["alignment"], json!({"kind": "live_short", "expected": 3, "live": 0}));
}
