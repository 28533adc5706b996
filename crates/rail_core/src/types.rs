//! Type definitions for `rail_core`.
//!
//! IDs, orders, train state, world state, events and commands.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{DepartureParseError, Inventories, Route, StockItem};

// ---------------------------------------------------------------------------
// ID newtypes
// ---------------------------------------------------------------------------

macro_rules! numeric_id {
    ($name:ident, $prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

numeric_id!(ElementId, "element_");
numeric_id!(TrainId, "train_");
string_id!(StockId);
string_id!(SwitchId);

// ---------------------------------------------------------------------------
// Core enums
// ---------------------------------------------------------------------------

/// The two tunnel portals. Trains enter from one and leave through the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnPoint {
    East,
    West,
}

impl SpawnPoint {
    pub fn opposite(self) -> Self {
        match self {
            SpawnPoint::East => SpawnPoint::West,
            SpawnPoint::West => SpawnPoint::East,
        }
    }
}

impl fmt::Display for SpawnPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SpawnPoint::East => "East",
            SpawnPoint::West => "West",
        })
    }
}

/// Named points along a route that `MoveTo` can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpotId {
    EastTunnel,
    WestTunnel,
    Platform,
    TeamTrack,
}

impl SpotId {
    pub fn name(self) -> &'static str {
        match self {
            SpotId::EastTunnel => "East Tunnel",
            SpotId::WestTunnel => "West Tunnel",
            SpotId::Platform => "Platform",
            SpotId::TeamTrack => "Team Track",
        }
    }

    pub fn portal(self) -> Option<SpawnPoint> {
        match self {
            SpotId::EastTunnel => Some(SpawnPoint::East),
            SpotId::WestTunnel => Some(SpawnPoint::West),
            SpotId::Platform | SpotId::TeamTrack => None,
        }
    }
}

/// Reverser setting. `Forward` drives toward increasing route distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }
}

/// World-side turnout state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnoutState {
    #[default]
    Normal,
    Reverse,
}

/// Switch position as written in a train program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchSetting {
    Normal,
    Diverging,
}

impl From<SwitchSetting> for TurnoutState {
    fn from(setting: SwitchSetting) -> Self {
        match setting {
            SwitchSetting::Normal => TurnoutState::Normal,
            SwitchSetting::Diverging => TurnoutState::Reverse,
        }
    }
}

/// Which point of the consist a `MoveTo` lands on the spot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum CarTarget {
    #[default]
    TrainHead,
    SpotCar {
        car_index: usize,
    },
}

// ---------------------------------------------------------------------------
// Programs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Order {
    MoveTo {
        spot: SpotId,
        /// Older saves carry no target; they mean the train head.
        #[serde(default)]
        target: CarTarget,
    },
    SetReverser {
        direction: Direction,
    },
    SetSwitch {
        switch_id: SwitchId,
        position: SwitchSetting,
    },
    WaitSeconds {
        seconds: f64,
    },
    Couple,
    Uncouple {
        keep: u32,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum TrainState {
    #[default]
    WaitingForOrders,
    Executing,
    /// Counting down a `WaitSeconds` order; see `ActiveTrain::wait_timer`.
    Waiting,
    /// Terminal. Program execution halts until the player intervenes.
    Stopped {
        reason: String,
    },
}

impl TrainState {
    pub fn is_stopped(&self) -> bool {
        matches!(self, TrainState::Stopped { .. })
    }
}

/// Side channel from a program step back to world state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SetSwitch {
        switch_id: SwitchId,
        position: SwitchSetting,
    },
}

// ---------------------------------------------------------------------------
// Trains
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTrain {
    pub id: TrainId,
    /// Index 0 is the head-most car.
    pub consist: Vec<StockItem>,
    /// Head distance along `route`. Negative while still inside the entry tunnel.
    pub position: f64,
    /// Magnitude only; the reverser gives the direction.
    pub speed: f64,
    pub route: Route,
    /// Turnout state `route` was built with.
    pub route_turnout: TurnoutState,
    pub spawn_point: SpawnPoint,
    pub program: Vec<Order>,
    pub program_counter: usize,
    pub train_state: TrainState,
    pub reverser: Direction,
    pub wait_timer: f64,
}

impl ActiveTrain {
    pub fn current_order(&self) -> Option<&Order> {
        self.program.get(self.program_counter)
    }
}

/// Departure clock time, counted from the start of the session.
/// Serialized as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DepartureTime {
    pub hour: u8,
    pub minute: u8,
}

impl DepartureTime {
    pub fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    pub fn as_seconds(self) -> f64 {
        f64::from(self.hour) * 3600.0 + f64::from(self.minute) * 60.0
    }
}

impl fmt::Display for DepartureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for DepartureTime {
    type Err = DepartureParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hour, minute) = s
            .split_once(':')
            .ok_or_else(|| DepartureParseError::Format(s.to_string()))?;
        let hour: u8 = hour
            .parse()
            .map_err(|_| DepartureParseError::Format(s.to_string()))?;
        let minute: u8 = minute
            .parse()
            .map_err(|_| DepartureParseError::Format(s.to_string()))?;
        if hour > 23 || minute > 59 {
            return Err(DepartureParseError::OutOfRange(s.to_string()));
        }
        Ok(Self { hour, minute })
    }
}

impl TryFrom<String> for DepartureTime {
    type Error = DepartureParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DepartureTime> for String {
    fn from(time: DepartureTime) -> Self {
        time.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTrain {
    pub id: TrainId,
    pub spawn_point: SpawnPoint,
    pub departure: DepartureTime,
    pub consist: Vec<StockItem>,
    pub program: Vec<Order>,
}

// ---------------------------------------------------------------------------
// World state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Planning,
    Running,
}

/// The single piece of mutable world state. Owned by the caller of [`crate::tick`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimState {
    /// Elapsed game seconds since the session started.
    pub game_time: f64,
    pub mode: GameMode,
    pub paused: bool,
    pub active_trains: Vec<ActiveTrain>,
    pub spawned_train_ids: BTreeSet<TrainId>,
    pub scheduled_trains: Vec<ScheduledTrain>,
    pub inventories: Inventories,
    pub turnout_state: TurnoutState,
    pub time_multiplier: f64,
    pub selected_train_id: Option<TrainId>,
    pub next_train_id: u32,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            game_time: 0.0,
            mode: GameMode::Planning,
            paused: false,
            active_trains: Vec::new(),
            spawned_train_ids: BTreeSet::new(),
            scheduled_trains: Vec::new(),
            inventories: Inventories::default(),
            turnout_state: TurnoutState::Normal,
            time_multiplier: 1.0,
            selected_train_id: None,
            next_train_id: 1,
        }
    }
}

impl SimState {
    pub fn train(&self, id: TrainId) -> Option<&ActiveTrain> {
        self.active_trains.iter().find(|train| train.id == id)
    }
}

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub game_time: f64,
    pub event: Event,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    TrainSpawned {
        train_id: TrainId,
        spawn_point: SpawnPoint,
    },
    TrainDespawned {
        train_id: TrainId,
        exit: SpawnPoint,
        returned_stock: usize,
    },
    OrderCompleted {
        train_id: TrainId,
        index: usize,
    },
    TrainStopped {
        train_id: TrainId,
        reason: String,
    },
    SwitchThrown {
        switch_id: SwitchId,
        position: TurnoutState,
    },
    RouteRebuilt {
        train_id: TrainId,
    },
}

// ---------------------------------------------------------------------------
// Command types
// ---------------------------------------------------------------------------

/// Player input, applied between ticks by [`crate::apply_command`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    ThrowSwitch {
        position: TurnoutState,
    },
    AppendOrder {
        train_id: TrainId,
        order: Order,
    },
    RemoveOrder {
        train_id: TrainId,
        index: usize,
    },
    MoveOrder {
        train_id: TrainId,
        from: usize,
        to: usize,
    },
    SelectTrain {
        train_id: Option<TrainId>,
    },
    SetTimeMultiplier {
        multiplier: f64,
    },
    SetPaused {
        paused: bool,
    },
    SetMode {
        mode: GameMode,
    },
}
