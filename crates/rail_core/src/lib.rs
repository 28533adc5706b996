//! `rail_core` — deterministic yard simulation.
//!
//! No IO. Every query is a pure function of its inputs; the only mutation
//! boundary is [`tick`] (and [`apply_command`] for player input).

mod commands;
mod engine;
mod error;
mod execution;
mod inventory;
mod movement;
pub mod physics;
mod plan;
mod program;
mod route;
mod save;
mod spawn;
mod stock;
pub mod track;
mod types;
mod vec2;
mod yard;

pub use commands::apply_command;
pub use engine::tick;
pub use error::{DepartureParseError, ProgramEditError, SaveError};
pub use execution::{step_program, Effects};
pub use inventory::Inventories;
pub use movement::{should_despawn, update_train};
pub use plan::{schedule_train, unschedule_train};
pub use program::{append_order, move_order, remove_order};
pub use route::{
    position_on_route, spot_position, turnout_start_distance, Route, RouteEnd, RoutePosition,
    RouteSegment, RouteSpot, SegmentGeometry,
};
pub use save::{decode_state, encode_state, CameraState, SavedState, SavedTrain, SAVE_VERSION};
pub use spawn::{check_spawns, spawn_train};
pub use stock::{
    car_offset_from_head, consist_length, stock_length, StockItem, StockType, COUPLER_GAP,
};
pub use types::*;
pub use vec2::{flip_orientation, normalize_angle, Vec2};
pub use yard::{Yard, YardDef, YardElements, MAIN_SWITCH};

pub(crate) fn emit(events: &mut Vec<EventEnvelope>, game_time: f64, event: Event) {
    events.push(EventEnvelope { game_time, event });
}

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

#[cfg(test)]
mod tests;
