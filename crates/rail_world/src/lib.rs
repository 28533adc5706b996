//! Content loading shared between rail_cli and tests.
//!
//! A content directory holds `yard.json` (yard dimensions, optional) and
//! `scenario.json` (the day's schedule and the stations' starting stock).

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use rail_core::track::validate_layout;
use rail_core::{
    schedule_train, DepartureTime, Inventories, Order, SimState, SpawnPoint, StockType, Yard,
    YardDef,
};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScenarioTrain {
    pub spawn_point: SpawnPoint,
    pub departure: DepartureTime,
    pub stock: Vec<StockType>,
    #[serde(default)]
    pub program: Vec<Order>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inventories: Inventories,
    #[serde(default)]
    pub trains: Vec<ScenarioTrain>,
    #[serde(default = "default_time_multiplier")]
    pub time_multiplier: f64,
}

fn default_time_multiplier() -> f64 {
    1.0
}

#[derive(Debug, Clone)]
pub struct Content {
    pub yard: Yard,
    pub scenario: Scenario,
}

/// Reads `yard.json`, falling back to the built-in yard when the file is absent.
pub fn load_yard_def(content_dir: &Path) -> Result<YardDef> {
    let path = content_dir.join("yard.json");
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no yard.json, using the default yard");
        return Ok(YardDef::default());
    }
    serde_json::from_str(&std::fs::read_to_string(&path).context("reading yard.json")?)
        .context("parsing yard.json")
}

pub fn load_scenario(content_dir: &Path) -> Result<Scenario> {
    serde_json::from_str(
        &std::fs::read_to_string(content_dir.join("scenario.json"))
            .context("reading scenario.json")?,
    )
    .context("parsing scenario.json")
}

/// Loads and validates a content directory.
pub fn load_content(content_dir: &str) -> Result<Content> {
    let dir = Path::new(content_dir);
    let yard = Yard::build(&load_yard_def(dir)?);
    let report = validate_layout(&yard.layout);
    if !report.valid {
        bail!(
            "yard layout is inconsistent: {}",
            report
                .errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        );
    }
    let scenario = load_scenario(dir)?;
    validate_scenario(&scenario, &yard)?;
    tracing::info!(
        scenario = %scenario.name,
        trains = scenario.trains.len(),
        "content loaded"
    );
    Ok(Content { yard, scenario })
}

/// Checks cross references an authoring mistake could break.
pub fn validate_scenario(scenario: &Scenario, yard: &Yard) -> Result<()> {
    ensure!(
        scenario.time_multiplier.is_finite() && scenario.time_multiplier >= 0.0,
        "time multiplier {} must be a non-negative number",
        scenario.time_multiplier
    );

    let mut stock_ids = HashSet::new();
    for item in scenario.inventories.east.iter().chain(&scenario.inventories.west) {
        ensure!(
            stock_ids.insert(&item.id),
            "stock id '{}' appears more than once in the inventories",
            item.id
        );
    }

    for (index, train) in scenario.trains.iter().enumerate() {
        ensure!(
            !train.stock.is_empty(),
            "train {index} departing {} has no stock",
            train.departure
        );
        for order in &train.program {
            match order {
                Order::SetSwitch { switch_id, .. } if *switch_id != yard.switch_id => {
                    bail!("train {index} sets unknown switch '{switch_id}'");
                }
                Order::WaitSeconds { seconds } if !(seconds.is_finite() && *seconds >= 0.0) => {
                    bail!("train {index} waits for an invalid duration {seconds}");
                }
                _ => {}
            }
        }
    }
    Ok(())
}

/// Planning-mode state with every scenario train scheduled, in file order.
pub fn build_initial_state(scenario: &Scenario) -> SimState {
    let mut state = SimState {
        inventories: scenario.inventories.clone(),
        time_multiplier: scenario.time_multiplier,
        ..SimState::default()
    };
    for train in &scenario.trains {
        schedule_train(
            &mut state,
            train.spawn_point,
            train.departure,
            &train.stock,
            train.program.clone(),
        );
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use rail_core::{StockItem, SwitchId, SwitchSetting};

    fn scenario() -> Scenario {
        Scenario {
            name: "test".to_string(),
            inventories: Inventories {
                east: vec![StockItem::new("loco_1", StockType::Locomotive)],
                west: vec![StockItem::new("box_1", StockType::Boxcar)],
            },
            trains: vec![ScenarioTrain {
                spawn_point: SpawnPoint::East,
                departure: DepartureTime::new(0, 1),
                stock: vec![StockType::Locomotive, StockType::Boxcar],
                program: vec![Order::SetSwitch {
                    switch_id: SwitchId(rail_core::MAIN_SWITCH.to_string()),
                    position: SwitchSetting::Diverging,
                }],
            }],
            time_multiplier: 1.0,
        }
    }

    #[test]
    fn test_valid_scenario_passes_validation() {
        validate_scenario(&scenario(), &Yard::default()).unwrap();
    }

    #[test]
    fn test_duplicate_stock_id_is_rejected() {
        let mut scenario = scenario();
        scenario
            .inventories
            .west
            .push(StockItem::new("loco_1", StockType::Locomotive));
        let err = validate_scenario(&scenario, &Yard::default()).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_unknown_switch_is_rejected() {
        let mut scenario = scenario();
        scenario.trains[0].program = vec![Order::SetSwitch {
            switch_id: SwitchId("sw_nowhere".to_string()),
            position: SwitchSetting::Normal,
        }];
        let err = validate_scenario(&scenario, &Yard::default()).unwrap_err();
        assert!(err.to_string().contains("sw_nowhere"));
    }

    #[test]
    fn test_empty_consist_is_rejected() {
        let mut scenario = scenario();
        scenario.trains[0].stock.clear();
        assert!(validate_scenario(&scenario, &Yard::default()).is_err());
    }

    #[test]
    fn test_negative_time_multiplier_is_rejected() {
        let mut scenario = scenario();
        scenario.time_multiplier = -1.0;
        assert!(validate_scenario(&scenario, &Yard::default()).is_err());
    }

    #[test]
    fn test_initial_state_schedules_trains_from_inventory() {
        let state = build_initial_state(&scenario());
        assert_eq!(state.scheduled_trains.len(), 1);
        assert!(state.inventories.east.is_empty());
        // The west boxcar is not at the east station, so a placeholder stands in.
        let consist = &state.scheduled_trains[0].consist;
        assert!(!consist[0].provisional);
        assert!(consist[1].provisional);
        assert_eq!(state.inventories.west.len(), 1);
        assert_eq!(state.next_train_id, 2);
    }
}
