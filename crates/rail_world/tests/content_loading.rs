use std::fs;

use rail_core::test_fixtures::base_yard;
use rail_core::{tick, Command, DepartureTime, GameMode, SpawnPoint, StockType};
use rail_world::{build_initial_state, load_content, load_scenario, load_yard_def};

const REPO_CONTENT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../content");

const SCENARIO: &str = r#"{
    "name": "tempfile",
    "inventories": {
        "east": [{ "id": "loco_1", "stock_type": "Locomotive" }],
        "west": []
    },
    "trains": [{
        "spawn_point": "East",
        "departure": "00:02",
        "stock": ["Locomotive"],
        "program": [{ "type": "MoveTo", "spot": "WestTunnel" }]
    }]
}"#;

#[test]
fn test_repo_content_loads_and_validates() {
    let content = load_content(REPO_CONTENT).unwrap();
    assert!(!content.scenario.trains.is_empty());
    assert_eq!(content.yard, base_yard());
}

#[test]
fn test_repo_scenario_runs_every_train_through_the_yard() {
    let content = load_content(REPO_CONTENT).unwrap();
    let mut state = build_initial_state(&content.scenario);
    rail_core::apply_command(
        &mut state,
        &content.yard,
        &Command::SetMode {
            mode: GameMode::Running,
        },
    )
    .unwrap();

    for _ in 0..6_000 {
        tick(&mut state, &content.yard, 100.0);
    }
    assert_eq!(state.spawned_train_ids.len(), content.scenario.trains.len());
    assert!(state.active_trains.is_empty(), "trains left in the yard: {:?}", state.active_trains);
    // The shunter leaves west after backing off the siding; the coaches run east.
    let west = state.inventories.station(SpawnPoint::West);
    assert!(west.iter().any(|item| item.id.0 == "boxcar_201"));
    assert_eq!(west.len(), 3);
    assert_eq!(state.inventories.station(SpawnPoint::East).len(), 3);
}

#[test]
fn test_missing_yard_file_uses_default_yard() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("scenario.json"), SCENARIO).unwrap();

    let yard_def = load_yard_def(dir.path()).unwrap();
    assert_eq!(yard_def, rail_core::YardDef::default());

    let scenario = load_scenario(dir.path()).unwrap();
    assert_eq!(scenario.trains[0].departure, DepartureTime::new(0, 2));
    assert_eq!(scenario.trains[0].stock, vec![StockType::Locomotive]);
    assert!((scenario.time_multiplier - 1.0).abs() < 1e-12);
}

#[test]
fn test_partial_yard_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("yard.json"), r#"{ "west_approach_m": 500.0 }"#).unwrap();

    let yard_def = load_yard_def(dir.path()).unwrap();
    assert!((yard_def.west_approach_m - 500.0).abs() < 1e-12);
    assert!((yard_def.east_approach_m - 150.0).abs() < 1e-12);
}

#[test]
fn test_missing_scenario_reports_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_content(dir.path().to_str().unwrap()).unwrap_err();
    assert!(format!("{err:#}").contains("scenario.json"));
}

#[test]
fn test_bad_departure_time_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("scenario.json"),
        SCENARIO.replace("00:02", "24:30"),
    )
    .unwrap();
    let err = load_scenario(dir.path()).unwrap_err();
    assert!(format!("{err:#}").contains("parsing scenario.json"));
}

#[test]
fn test_loaded_scenario_runs() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("scenario.json"), SCENARIO).unwrap();
    let content = load_content(dir.path().to_str().unwrap()).unwrap();

    let mut state = build_initial_state(&content.scenario);
    assert_eq!(state.mode, GameMode::Planning);
    rail_core::apply_command(
        &mut state,
        &content.yard,
        &Command::SetMode {
            mode: GameMode::Running,
        },
    )
    .unwrap();

    let mut spawned = false;
    for _ in 0..2_000 {
        tick(&mut state, &content.yard, 100.0);
        spawned |= !state.active_trains.is_empty();
    }
    assert!(spawned);
    // Ran out through the west tunnel and handed the locomotive to that station.
    assert!(state.active_trains.is_empty());
    assert_eq!(state.inventories.station(SpawnPoint::West).len(), 1);
}
