//! Coasting movement for trains without a program, route-end braking, and
//! the despawn boundary.

use crate::physics::stopping_speed_limit;
use crate::{consist_length, ActiveTrain, Direction, RouteEnd};

/// Advances a train with no program at its current speed.
///
/// The far tunnel is open, so such trains run through and despawn; a buffer
/// stop still brakes and holds them.
pub fn update_train(delta_seconds: f64, train: &mut ActiveTrain) {
    let previous = train.position;
    brake_for_route_end(train, true);
    train.position += train.reverser.sign() * train.speed * delta_seconds;
    clamp_to_route(train, previous, true);
}

/// True once the rearmost car has cleared the end of the route.
pub fn should_despawn(train: &ActiveTrain) -> bool {
    train.position - consist_length(&train.consist) > train.route.total_length
}

fn far_end_open(train: &ActiveTrain, departing: bool) -> bool {
    departing && matches!(train.route.end, RouteEnd::Portal(_))
}

/// Caps speed so the train can still stop at a closed route end ahead of it.
pub(crate) fn brake_for_route_end(train: &mut ActiveTrain, departing: bool) {
    let limit = match train.reverser {
        Direction::Forward if !far_end_open(train, departing) => train.route.total_length,
        Direction::Reverse if train.position >= 0.0 => 0.0,
        Direction::Forward | Direction::Reverse => return,
    };
    let ahead = (limit - train.position) * train.reverser.sign();
    train.speed = train.speed.min(stopping_speed_limit(ahead));
}

/// Keeps a train that was on the route from leaving it through a closed end.
pub(crate) fn clamp_to_route(train: &mut ActiveTrain, previous: f64, departing: bool) {
    let total = train.route.total_length;
    match train.reverser {
        Direction::Forward if train.position > total && !far_end_open(train, departing) => {
            train.position = total;
            train.speed = 0.0;
        }
        Direction::Reverse if train.position < 0.0 && previous >= 0.0 => {
            train.position = 0.0;
            train.speed = 0.0;
        }
        Direction::Forward | Direction::Reverse => {}
    }
}
