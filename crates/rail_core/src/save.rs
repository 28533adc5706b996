//! Versioned JSON save format.
//!
//! Routes are not stored; they are rebuilt from the yard on restore. Fields
//! added after the first release carry serde defaults so older saves load.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    ActiveTrain, Direction, GameMode, Inventories, Order, SaveError, ScheduledTrain, SimState,
    SpawnPoint, StockItem, TrainId, TrainState, TurnoutState, Yard,
};

pub const SAVE_VERSION: u32 = 1;

/// View state stored alongside the simulation for the front end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTrain {
    pub id: TrainId,
    pub consist: Vec<StockItem>,
    pub position: f64,
    pub speed: f64,
    pub spawn_point: SpawnPoint,
    #[serde(default)]
    pub program: Vec<Order>,
    #[serde(default)]
    pub program_counter: usize,
    #[serde(default)]
    pub train_state: TrainState,
    #[serde(default)]
    pub reverser: Direction,
    #[serde(default)]
    pub wait_timer: f64,
    /// Turnout state the train's route was built with; the world state when absent.
    #[serde(default)]
    pub route_turnout: Option<TurnoutState>,
}

impl SavedTrain {
    fn capture(train: &ActiveTrain) -> Self {
        Self {
            id: train.id,
            consist: train.consist.clone(),
            position: train.position,
            speed: train.speed,
            spawn_point: train.spawn_point,
            program: train.program.clone(),
            program_counter: train.program_counter,
            train_state: train.train_state.clone(),
            reverser: train.reverser,
            wait_timer: train.wait_timer,
            route_turnout: Some(train.route_turnout),
        }
    }

    fn restore(self, yard: &Yard, world_turnout: TurnoutState) -> ActiveTrain {
        let route_turnout = self.route_turnout.unwrap_or(world_turnout);
        ActiveTrain {
            id: self.id,
            consist: self.consist,
            position: self.position,
            speed: self.speed,
            route: yard.route_for(self.spawn_point, route_turnout),
            route_turnout,
            spawn_point: self.spawn_point,
            program: self.program,
            program_counter: self.program_counter,
            train_state: self.train_state,
            reverser: self.reverser,
            wait_timer: self.wait_timer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedState {
    pub version: u32,
    pub game_time: f64,
    #[serde(default)]
    pub mode: GameMode,
    #[serde(default)]
    pub turnout_state: TurnoutState,
    #[serde(default)]
    pub active_trains: Vec<SavedTrain>,
    #[serde(default)]
    pub spawned_train_ids: BTreeSet<TrainId>,
    #[serde(default)]
    pub scheduled_trains: Vec<ScheduledTrain>,
    #[serde(default)]
    pub inventories: Inventories,
    pub next_train_id: u32,
    #[serde(default)]
    pub camera: CameraState,
    #[serde(default = "default_time_multiplier")]
    pub time_multiplier: f64,
}

fn default_time_multiplier() -> f64 {
    1.0
}

impl SavedState {
    pub fn capture(state: &SimState, camera: CameraState) -> Self {
        Self {
            version: SAVE_VERSION,
            game_time: state.game_time,
            mode: state.mode,
            turnout_state: state.turnout_state,
            active_trains: state.active_trains.iter().map(SavedTrain::capture).collect(),
            spawned_train_ids: state.spawned_train_ids.clone(),
            scheduled_trains: state.scheduled_trains.clone(),
            inventories: state.inventories.clone(),
            next_train_id: state.next_train_id,
            camera,
            time_multiplier: state.time_multiplier,
        }
    }

    /// Rebuilds live state. Restored sessions start unpaused with no selection.
    pub fn restore(self, yard: &Yard) -> SimState {
        let turnout_state = self.turnout_state;
        SimState {
            game_time: self.game_time,
            mode: self.mode,
            paused: false,
            active_trains: self
                .active_trains
                .into_iter()
                .map(|train| train.restore(yard, turnout_state))
                .collect(),
            spawned_train_ids: self.spawned_train_ids,
            scheduled_trains: self.scheduled_trains,
            inventories: self.inventories,
            turnout_state,
            time_multiplier: self.time_multiplier,
            selected_train_id: None,
            next_train_id: self.next_train_id,
        }
    }
}

pub fn encode_state(saved: &SavedState) -> Result<String, SaveError> {
    Ok(serde_json::to_string(saved)?)
}

pub fn decode_state(json: &str) -> Result<SavedState, SaveError> {
    let saved: SavedState = serde_json::from_str(json)?;
    if saved.version != SAVE_VERSION {
        return Err(SaveError::UnsupportedVersion {
            found: saved.version,
            expected: SAVE_VERSION,
        });
    }
    Ok(saved)
}
