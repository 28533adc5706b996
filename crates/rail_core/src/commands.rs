use crate::engine::rebuild_routes;
use crate::{
    append_order, emit, move_order, remove_order, ActiveTrain, Command, Event, EventEnvelope,
    Order, ProgramEditError, SimState, TrainId, TrainState, TurnoutState, Yard,
};

/// Applies one player command between ticks.
///
/// Program edits address the active train with that id first, then the
/// scheduled one. Commands are honored in any mode, paused or not.
pub fn apply_command(
    state: &mut SimState,
    yard: &Yard,
    command: &Command,
) -> Result<Vec<EventEnvelope>, ProgramEditError> {
    let mut events = Vec::new();
    match command {
        Command::ThrowSwitch { position } => throw_switch(state, yard, *position, &mut events),
        Command::AppendOrder { train_id, order } => append(state, *train_id, order.clone())?,
        Command::RemoveOrder { train_id, index } => remove(state, *train_id, *index)?,
        Command::MoveOrder { train_id, from, to } => reorder(state, *train_id, *from, *to)?,
        Command::SelectTrain { train_id } => state.selected_train_id = *train_id,
        Command::SetTimeMultiplier { multiplier } => {
            state.time_multiplier = multiplier.max(0.0);
        }
        Command::SetPaused { paused } => state.paused = *paused,
        Command::SetMode { mode } => {
            tracing::info!(?mode, "mode changed");
            state.mode = *mode;
        }
    }
    Ok(events)
}

fn throw_switch(
    state: &mut SimState,
    yard: &Yard,
    position: TurnoutState,
    events: &mut Vec<EventEnvelope>,
) {
    if state.turnout_state == position {
        return;
    }
    state.turnout_state = position;
    emit(
        events,
        state.game_time,
        Event::SwitchThrown {
            switch_id: yard.switch_id.clone(),
            position,
        },
    );
    rebuild_routes(
        &mut state.active_trains,
        yard,
        position,
        state.game_time,
        events,
    );
}

fn active_mut(state: &mut SimState, train_id: TrainId) -> Option<&mut ActiveTrain> {
    state
        .active_trains
        .iter_mut()
        .find(|train| train.id == train_id)
}

fn scheduled_program(
    state: &mut SimState,
    train_id: TrainId,
) -> Result<&mut Vec<Order>, ProgramEditError> {
    state
        .scheduled_trains
        .iter_mut()
        .find(|train| train.id == train_id)
        .map(|train| &mut train.program)
        .ok_or(ProgramEditError::UnknownTrain(train_id))
}

fn append(state: &mut SimState, train_id: TrainId, order: Order) -> Result<(), ProgramEditError> {
    if let Some(train) = active_mut(state, train_id) {
        append_order(&mut train.program, order);
        return Ok(());
    }
    append_order(scheduled_program(state, train_id)?, order);
    Ok(())
}

fn remove(state: &mut SimState, train_id: TrainId, index: usize) -> Result<(), ProgramEditError> {
    let Some(train) = active_mut(state, train_id) else {
        remove_order(scheduled_program(state, train_id)?, index)?;
        return Ok(());
    };
    remove_order(&mut train.program, index)?;
    if index < train.program_counter {
        train.program_counter -= 1;
    } else if index == train.program_counter && !train.train_state.is_stopped() {
        // The order in progress is gone; the next one starts fresh.
        train.train_state = TrainState::WaitingForOrders;
        train.wait_timer = 0.0;
    }
    Ok(())
}

fn reorder(
    state: &mut SimState,
    train_id: TrainId,
    from: usize,
    to: usize,
) -> Result<(), ProgramEditError> {
    let Some(train) = active_mut(state, train_id) else {
        return move_order(scheduled_program(state, train_id)?, from, to);
    };
    move_order(&mut train.program, from, to)?;
    train.program_counter = shifted_counter(train.program_counter, from, to);
    Ok(())
}

/// Keeps the program counter on the same order after a move.
fn shifted_counter(counter: usize, from: usize, to: usize) -> usize {
    if from == counter {
        to
    } else if from < counter && to >= counter {
        counter - 1
    } else if from > counter && to <= counter {
        counter + 1
    } else {
        counter
    }
}
