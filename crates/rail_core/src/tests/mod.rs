use super::*;
use crate::physics::TRAIN_SPEED;
use crate::test_fixtures::{
    base_state, base_yard, consist, locomotives, make_rng, programmed_train, scheduled_train,
    straight_route, train_on,
};


// --- Shared test helpers ------------------------------------------------

const FRAME_MS: f64 = 16.0;
const FRAME_SECONDS: f64 = FRAME_MS / 1000.0;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

/// 300 m straight route into a buffer stop with the platform at 200 m.
fn siding_route() -> Route {
    let mut route = straight_route(300.0, RouteEnd::BufferStop);
    route.spots.push(RouteSpot {
        spot: SpotId::Platform,
        distance: 200.0,
    });
    route
}

fn move_to(spot: SpotId) -> Order {
    Order::MoveTo {
        spot,
        target: CarTarget::TrainHead,
    }
}

fn spot_car(spot: SpotId, car_index: usize) -> Order {
    Order::MoveTo {
        spot,
        target: CarTarget::SpotCar { car_index },
    }
}

/// Steps the program until the counter passes `order_index` or the train stops.
fn run_until_order_done(train: &mut ActiveTrain, order_index: usize, max_steps: usize) {
    for _ in 0..max_steps {
        if train.program_counter > order_index || train.train_state.is_stopped() {
            return;
        }
        step_program(FRAME_SECONDS, train);
    }
}

/// A train as it would appear right after spawning on the real yard.
fn yard_train(yard: &Yard, spawn_point: SpawnPoint, turnout: TurnoutState) -> ActiveTrain {
    let scheduled = scheduled_train(1, spawn_point, DepartureTime::new(0, 0), vec![]);
    spawn_train(&scheduled, turnout, yard)
}

fn stopped_reason(train: &ActiveTrain) -> Option<&str> {
    match &train.train_state {
        TrainState::Stopped { reason } => Some(reason.as_str()),
        _ => None,
    }
}
