use crate::physics::MAX_FRAME_MS;
use crate::{
    check_spawns, emit, should_despawn, step_program, turnout_start_distance, update_train,
    ActiveTrain, Effect, Event, EventEnvelope, GameMode, SimState, StockItem, TrainState,
    TurnoutState, Yard,
};

/// Advance the simulation by one frame.
///
/// Order of operations:
/// 1. Clamp the frame delta and advance the game clock.
/// 2. Spawn trains whose departure time has passed.
/// 3. Step every train that has a program; collect its effects.
/// 4. Apply switch effects. On a turnout change, rebuild routes of trains
///    still short of the turnout.
/// 5. Move trains without a program.
/// 6. Despawn trains that have left the yard and return their stock.
/// 7. Merge newly spawned trains and drop a selection that names no active train.
///
/// Does nothing while paused or outside [`GameMode::Running`].
pub fn tick(state: &mut SimState, yard: &Yard, delta_ms: f64) -> Vec<EventEnvelope> {
    let mut events = Vec::new();
    if state.paused || state.mode != GameMode::Running {
        return events;
    }

    let delta_seconds = delta_ms.clamp(0.0, MAX_FRAME_MS) * state.time_multiplier / 1000.0;
    state.game_time += delta_seconds;

    let mut spawned = check_spawns(
        state.game_time,
        &state.scheduled_trains,
        &state.spawned_train_ids,
        state.turnout_state,
        yard,
    );
    for train in &spawned {
        tracing::info!(train = %train.id, spawn_point = %train.spawn_point, "train spawned");
        emit(
            &mut events,
            state.game_time,
            Event::TrainSpawned {
                train_id: train.id,
                spawn_point: train.spawn_point,
            },
        );
    }

    let effects = step_programs(state, delta_seconds, &mut events);
    let turnout_before = state.turnout_state;
    apply_effects(state, yard, effects, &mut events);
    if state.turnout_state != turnout_before {
        let (turnout, game_time) = (state.turnout_state, state.game_time);
        rebuild_routes(&mut state.active_trains, yard, turnout, game_time, &mut events);
        rebuild_routes(&mut spawned, yard, turnout, game_time, &mut events);
    }

    for train in state
        .active_trains
        .iter_mut()
        .filter(|train| train.program.is_empty())
    {
        update_train(delta_seconds, train);
    }

    despawn_exited(state, yard, &mut events);

    state
        .spawned_train_ids
        .extend(spawned.iter().map(|train| train.id));
    state.active_trains.extend(spawned);

    if state
        .selected_train_id
        .is_some_and(|selected| state.train(selected).is_none())
    {
        state.selected_train_id = None;
    }

    events
}

fn step_programs(
    state: &mut SimState,
    delta_seconds: f64,
    events: &mut Vec<EventEnvelope>,
) -> Vec<Effect> {
    let game_time = state.game_time;
    let mut effects = Vec::new();
    for train in state
        .active_trains
        .iter_mut()
        .filter(|train| !train.program.is_empty())
    {
        let counter_before = train.program_counter;
        let was_stopped = train.train_state.is_stopped();
        effects.extend(step_program(delta_seconds, train));

        if train.program_counter > counter_before {
            emit(
                events,
                game_time,
                Event::OrderCompleted {
                    train_id: train.id,
                    index: counter_before,
                },
            );
        }
        if let (false, TrainState::Stopped { reason }) = (was_stopped, &train.train_state) {
            emit(
                events,
                game_time,
                Event::TrainStopped {
                    train_id: train.id,
                    reason: reason.clone(),
                },
            );
        }
    }
    effects
}

/// Applies effects in order; the last write to a switch wins.
fn apply_effects(
    state: &mut SimState,
    yard: &Yard,
    effects: Vec<Effect>,
    events: &mut Vec<EventEnvelope>,
) {
    for effect in effects {
        match effect {
            Effect::SetSwitch {
                switch_id,
                position,
            } => {
                if switch_id != yard.switch_id {
                    tracing::warn!(%switch_id, "ignoring effect for unknown switch");
                    continue;
                }
                let position = TurnoutState::from(position);
                state.turnout_state = position;
                emit(
                    events,
                    state.game_time,
                    Event::SwitchThrown {
                        switch_id,
                        position,
                    },
                );
            }
        }
    }
}

/// Re-routes trains for a new turnout state.
///
/// A train is only re-routed while its head is short of the turnout; once on
/// or past it, the train keeps the route it was committed to.
pub(crate) fn rebuild_routes(
    trains: &mut [ActiveTrain],
    yard: &Yard,
    turnout: TurnoutState,
    game_time: f64,
    events: &mut Vec<EventEnvelope>,
) {
    for train in trains {
        if train.route_turnout == turnout {
            continue;
        }
        let short_of_turnout = turnout_start_distance(&train.route)
            .is_none_or(|start| train.position < start);
        if !short_of_turnout {
            continue;
        }
        train.route = yard.route_for(train.spawn_point, turnout);
        train.route_turnout = turnout;
        tracing::debug!(train = %train.id, ?turnout, "route rebuilt");
        emit(events, game_time, Event::RouteRebuilt { train_id: train.id });
    }
}

fn despawn_exited(state: &mut SimState, yard: &Yard, events: &mut Vec<EventEnvelope>) {
    let (exited, remaining): (Vec<_>, Vec<_>) = std::mem::take(&mut state.active_trains)
        .into_iter()
        .partition(should_despawn);
    state.active_trains = remaining;

    for train in exited {
        let exit = yard
            .exit_for(&train.route)
            .unwrap_or_else(|| train.spawn_point.opposite());
        let returned: Vec<StockItem> = train
            .consist
            .into_iter()
            .filter(|item| !item.provisional)
            .collect();
        let returned_stock = returned.len();
        state.inventories.return_stock(exit, returned);

        tracing::info!(train = %train.id, %exit, returned_stock, "train despawned");
        emit(
            events,
            state.game_time,
            Event::TrainDespawned {
                train_id: train.id,
                exit,
                returned_stock,
            },
        );
    }
}
