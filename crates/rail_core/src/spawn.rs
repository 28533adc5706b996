use std::collections::BTreeSet;

use crate::physics::TRAIN_SPEED;
use crate::{
    consist_length, ActiveTrain, Direction, ScheduledTrain, TrainId, TrainState, TurnoutState,
    Yard, COUPLER_GAP,
};

/// Trains whose departure time has passed and that have not been spawned yet.
///
/// Does not record the ids; the caller merges them into `spawned_train_ids`.
pub fn check_spawns(
    elapsed_seconds: f64,
    scheduled: &[ScheduledTrain],
    already_spawned: &BTreeSet<TrainId>,
    turnout: TurnoutState,
    yard: &Yard,
) -> Vec<ActiveTrain> {
    scheduled
        .iter()
        .filter(|train| train.departure.as_seconds() <= elapsed_seconds)
        .filter(|train| !already_spawned.contains(&train.id))
        .map(|train| spawn_train(train, turnout, yard))
        .collect()
}

/// Places a scheduled train just inside its entry tunnel, fully hidden and
/// running at cruise speed.
pub fn spawn_train(scheduled: &ScheduledTrain, turnout: TurnoutState, yard: &Yard) -> ActiveTrain {
    let train_state = if scheduled.program.is_empty() {
        TrainState::WaitingForOrders
    } else {
        TrainState::Executing
    };
    ActiveTrain {
        id: scheduled.id,
        consist: scheduled.consist.clone(),
        position: -(consist_length(&scheduled.consist) + COUPLER_GAP),
        speed: TRAIN_SPEED,
        route: yard.route_for(scheduled.spawn_point, turnout),
        route_turnout: turnout,
        spawn_point: scheduled.spawn_point,
        program: scheduled.program.clone(),
        program_counter: 0,
        train_state,
        reverser: Direction::Forward,
        wait_timer: 0.0,
    }
}
