//! Shared test fixtures for rail_core and downstream crates.
//!
//! `base_state()` is a running session with stocked stations and no trains.
//! The route and train builders produce hand-made straight routes so
//! movement can be checked without the yard geometry.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use smallvec::SmallVec;

use crate::{
    ActiveTrain, DepartureTime, Direction, ElementId, GameMode, Inventories, Order, Route,
    RouteEnd, RouteSegment, ScheduledTrain, SegmentGeometry, SimState, SpawnPoint, StockItem,
    StockType, TrainId, TrainState, TurnoutState, Vec2, Yard,
};

/// The default yard: 600 m mainline with a siding off the east side.
pub fn base_yard() -> Yard {
    Yard::default()
}

/// Running session, 00:00, two locomotives and two boxcars at each station.
pub fn base_state() -> SimState {
    let station = |prefix: &str| {
        vec![
            StockItem::new(format!("{prefix}_loco_1"), StockType::Locomotive),
            StockItem::new(format!("{prefix}_loco_2"), StockType::Locomotive),
            StockItem::new(format!("{prefix}_box_1"), StockType::Boxcar),
            StockItem::new(format!("{prefix}_box_2"), StockType::Boxcar),
        ]
    };
    SimState {
        mode: GameMode::Running,
        inventories: Inventories {
            east: station("east"),
            west: station("west"),
        },
        ..SimState::default()
    }
}

pub fn consist(types: &[StockType]) -> Vec<StockItem> {
    types
        .iter()
        .enumerate()
        .map(|(i, stock_type)| StockItem::new(format!("car_{i}"), *stock_type))
        .collect()
}

pub fn locomotives(count: usize) -> Vec<StockItem> {
    consist(&vec![StockType::Locomotive; count])
}

/// A single straight segment running east to west, ending at `end`.
pub fn straight_route(length: f64, end: RouteEnd) -> Route {
    let start = match end {
        RouteEnd::Portal(portal) => RouteEnd::Portal(portal.opposite()),
        RouteEnd::BufferStop => RouteEnd::Portal(SpawnPoint::East),
    };
    Route {
        segments: vec![RouteSegment {
            element_id: ElementId(1),
            turnout: false,
            length,
            start_distance: 0.0,
            geometry: SegmentGeometry::Straight {
                start: Vec2::ZERO,
                end: Vec2::new(-length, 0.0),
                orientation: -std::f64::consts::FRAC_PI_2,
            },
        }],
        total_length: length,
        start,
        end,
        spots: SmallVec::new(),
    }
}

/// A stationary train at the start of `route`, reverser forward, no program.
pub fn train_on(route: Route, consist: Vec<StockItem>) -> ActiveTrain {
    ActiveTrain {
        id: TrainId(1),
        consist,
        position: 0.0,
        speed: 0.0,
        route,
        route_turnout: TurnoutState::Normal,
        spawn_point: SpawnPoint::East,
        program: Vec::new(),
        program_counter: 0,
        train_state: TrainState::WaitingForOrders,
        reverser: Direction::Forward,
        wait_timer: 0.0,
    }
}

/// Like [`train_on`] but with `program` loaded and executing.
pub fn programmed_train(route: Route, consist: Vec<StockItem>, program: Vec<Order>) -> ActiveTrain {
    ActiveTrain {
        program,
        train_state: TrainState::Executing,
        ..train_on(route, consist)
    }
}

pub fn scheduled_train(
    id: u32,
    spawn_point: SpawnPoint,
    departure: DepartureTime,
    program: Vec<Order>,
) -> ScheduledTrain {
    ScheduledTrain {
        id: TrainId(id),
        spawn_point,
        departure,
        consist: consist(&[StockType::Locomotive, StockType::Boxcar]),
        program,
    }
}

/// Deterministic RNG seeded with 42.
pub fn make_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}
