//! Full session: a switching move onto the siding and back, alongside a
//! through train on the mainline.

use rail_core::test_fixtures::{base_state, base_yard};
use rail_core::{
    schedule_train, spot_position, tick, CarTarget, DepartureTime, Direction, Event, Order,
    SpawnPoint, SpotId, StockType, SwitchId, SwitchSetting, TrainId, TrainState, TurnoutState,
    MAIN_SWITCH,
};

const FRAME_MS: f64 = 16.0;

fn switching_program() -> Vec<Order> {
    vec![
        Order::SetSwitch {
            switch_id: SwitchId(MAIN_SWITCH.to_string()),
            position: SwitchSetting::Diverging,
        },
        Order::MoveTo {
            spot: SpotId::Platform,
            target: CarTarget::TrainHead,
        },
        Order::WaitSeconds { seconds: 5.0 },
        Order::SetReverser {
            direction: Direction::Reverse,
        },
        Order::MoveTo {
            spot: SpotId::EastTunnel,
            target: CarTarget::TrainHead,
        },
    ]
}

#[test]
fn test_switching_and_through_trains() {
    let yard = base_yard();
    let mut state = base_state();
    let switcher = schedule_train(
        &mut state,
        SpawnPoint::East,
        DepartureTime::new(0, 0),
        &[StockType::Locomotive, StockType::Boxcar],
        switching_program(),
    );
    let through = schedule_train(
        &mut state,
        SpawnPoint::West,
        DepartureTime::new(0, 0),
        &[StockType::Locomotive, StockType::Flatbed],
        vec![],
    );
    assert_eq!((switcher, through), (TrainId(1), TrainId(2)));
    let east_before = state.inventories.east.len();

    let mut completed = Vec::new();
    let mut despawned = Vec::new();
    for _ in 0..(300_000.0 / FRAME_MS) as usize {
        for envelope in tick(&mut state, &yard, FRAME_MS) {
            match envelope.event {
                Event::OrderCompleted { train_id, index } if train_id == switcher => {
                    completed.push(index);
                }
                Event::TrainDespawned { train_id, exit, .. } => despawned.push((train_id, exit)),
                Event::TrainStopped { reason, .. } => panic!("unexpected stop: {reason}"),
                _ => {}
            }
        }
    }

    assert_eq!(completed, vec![0, 1, 2, 3, 4]);
    assert_eq!(despawned, vec![(through, SpawnPoint::East)]);
    assert_eq!(state.turnout_state, TurnoutState::Reverse);

    let train = state.train(switcher).expect("switcher stays in the yard");
    assert!(train.position.abs() < 1e-9);
    assert!(train.speed.abs() < 1e-9);
    assert_eq!(train.train_state, TrainState::WaitingForOrders);
    assert!(spot_position(SpotId::Platform, &train.route).is_some());

    // The through train's locomotive is real stock; its flatbed was provisional.
    assert_eq!(state.inventories.east.len(), east_before + 1);
}
