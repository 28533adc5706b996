//! Per-train program execution.
//!
//! Each call to [`step_program`] advances the order at `program_counter` by
//! one frame. Instant orders (`SetReverser`, `SetSwitch`) complete in the
//! tick they are reached and the train does not move that tick.

use smallvec::SmallVec;

use crate::movement::{brake_for_route_end, clamp_to_route};
use crate::physics::{
    braking_distance, stopping_speed_limit, ACCELERATION, ARRIVAL_SPEED, ARRIVAL_THRESHOLD,
    DECELERATION, MIN_APPROACH_SPEED, TRAIN_SPEED,
};
use crate::{
    car_offset_from_head, consist_length, spot_position, ActiveTrain, CarTarget, Direction,
    Effect, Order, RouteEnd, SpotId, TrainState, COUPLER_GAP,
};

/// World-side changes requested by one program step.
pub type Effects = SmallVec<[Effect; 1]>;

const COUPLE_STOP_REASON: &str = "Couple: no adjacent cars found";
const UNCOUPLE_STOP_REASON: &str = "Uncouple: not yet supported";

pub fn step_program(delta_seconds: f64, train: &mut ActiveTrain) -> Effects {
    let mut effects = Effects::new();
    if train.train_state.is_stopped() {
        train.speed = 0.0;
        return effects;
    }
    let Some(order) = train.current_order().cloned() else {
        train.train_state = TrainState::WaitingForOrders;
        coast(delta_seconds, train);
        return effects;
    };

    match order {
        Order::MoveTo { spot, target } => move_to(delta_seconds, spot, target, train),
        Order::SetReverser { direction } => {
            train.reverser = direction;
            complete_order(train);
        }
        Order::SetSwitch {
            switch_id,
            position,
        } => {
            effects.push(Effect::SetSwitch {
                switch_id,
                position,
            });
            complete_order(train);
        }
        Order::WaitSeconds { seconds } => wait(delta_seconds, seconds, train),
        Order::Couple => stop(train, COUPLE_STOP_REASON.to_string()),
        Order::Uncouple { .. } => stop(train, UNCOUPLE_STOP_REASON.to_string()),
    }
    effects
}

fn complete_order(train: &mut ActiveTrain) {
    train.program_counter += 1;
    train.train_state = TrainState::WaitingForOrders;
    train.wait_timer = 0.0;
}

fn stop(train: &mut ActiveTrain, reason: String) {
    tracing::info!(train = %train.id, %reason, "train stopped");
    train.speed = 0.0;
    train.train_state = TrainState::Stopped { reason };
}

/// Program exhausted: decelerate in place, respecting closed route ends.
fn coast(delta_seconds: f64, train: &mut ActiveTrain) {
    let previous = train.position;
    train.speed = (train.speed - DECELERATION * delta_seconds).max(0.0);
    brake_for_route_end(train, false);
    train.position += train.reverser.sign() * train.speed * delta_seconds;
    clamp_to_route(train, previous, false);
}

fn wait(delta_seconds: f64, seconds: f64, train: &mut ActiveTrain) {
    if !matches!(train.train_state, TrainState::Waiting) {
        train.train_state = TrainState::Waiting;
        train.wait_timer = seconds;
    }
    train.speed = 0.0;
    train.wait_timer -= delta_seconds;
    if train.wait_timer <= 0.0 {
        complete_order(train);
    }
}

/// Driving forward onto the tunnel at the far end of the route leaves the yard.
fn is_departure(spot: SpotId, train: &ActiveTrain) -> bool {
    train.reverser == Direction::Forward
        && spot
            .portal()
            .is_some_and(|portal| train.route.end == RouteEnd::Portal(portal))
}

/// Head distance at which the order is satisfied, or the reason it cannot be.
fn movement_goal(spot: SpotId, target: CarTarget, train: &ActiveTrain) -> Result<f64, String> {
    let spot_distance = spot_position(spot, &train.route)
        .ok_or_else(|| format!("Cannot reach {}", spot.name()))?;
    if is_departure(spot, train) {
        // Far enough into the tunnel that the whole consist is out of sight
        // before braking starts.
        return Ok(train.route.total_length
            + consist_length(&train.consist)
            + braking_distance(TRAIN_SPEED)
            + COUPLER_GAP);
    }
    let offset = match target {
        CarTarget::TrainHead => 0.0,
        CarTarget::SpotCar { car_index } => car_offset_from_head(&train.consist, car_index)
            .ok_or_else(|| {
                format!(
                    "Cannot spot car {car_index}: consist has {} cars",
                    train.consist.len()
                )
            })?,
    };
    let goal = spot_distance + offset;
    if goal > train.route.total_length {
        return Err(format!(
            "Cannot reach {}: consist would overrun the end of the route",
            spot.name()
        ));
    }
    Ok(goal)
}

fn approach_speed(speed: f64, remaining: f64, delta_seconds: f64) -> f64 {
    let accelerated = (speed + ACCELERATION * delta_seconds).min(TRAIN_SPEED);
    accelerated.min(stopping_speed_limit(remaining).max(MIN_APPROACH_SPEED))
}

fn arrive(train: &mut ActiveTrain, goal: f64) {
    train.position = goal;
    train.speed = 0.0;
    complete_order(train);
}

fn move_to(delta_seconds: f64, spot: SpotId, target: CarTarget, train: &mut ActiveTrain) {
    let goal = match movement_goal(spot, target, train) {
        Ok(goal) => goal,
        Err(reason) => return stop(train, reason),
    };
    train.train_state = TrainState::Executing;

    let sign = train.reverser.sign();
    let remaining = (goal - train.position) * sign;
    if remaining < -ARRIVAL_THRESHOLD {
        return stop(
            train,
            format!(
                "Cannot reach {}: it is behind the train for the current reverser",
                spot.name()
            ),
        );
    }
    if remaining.abs() <= ARRIVAL_THRESHOLD && train.speed <= ARRIVAL_SPEED {
        return arrive(train, goal);
    }

    let speed = approach_speed(train.speed, remaining, delta_seconds);
    let step = speed * delta_seconds;
    if step >= remaining {
        return arrive(train, goal);
    }
    let previous = train.position;
    train.speed = speed;
    train.position += sign * step;
    clamp_to_route(train, previous, is_departure(spot, train));
}
