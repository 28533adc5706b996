//! Planning-mode scheduling: building consists out of station inventories.

use crate::{
    DepartureTime, Order, ScheduledTrain, SimState, SpawnPoint, StockId, StockItem, StockType,
    TrainId,
};

/// Schedules a new train and returns its id.
///
/// Each requested stock type is taken from the inventory at `spawn_point`
/// when available; otherwise a provisional placeholder stands in for it.
pub fn schedule_train(
    state: &mut SimState,
    spawn_point: SpawnPoint,
    departure: DepartureTime,
    stock_types: &[StockType],
    program: Vec<Order>,
) -> TrainId {
    let id = TrainId(state.next_train_id);
    state.next_train_id += 1;

    let consist: Vec<StockItem> = stock_types
        .iter()
        .enumerate()
        .map(|(index, &stock_type)| {
            state
                .inventories
                .take_stock(spawn_point, stock_type)
                .unwrap_or_else(|| provisional_item(id, index, stock_type))
        })
        .collect();

    tracing::debug!(train = %id, %spawn_point, %departure, cars = consist.len(), "train scheduled");
    state.scheduled_trains.push(ScheduledTrain {
        id,
        spawn_point,
        departure,
        consist,
        program,
    });
    id
}

/// Removes a train that has not departed yet and returns its real stock to
/// the station it was drawn from.
pub fn unschedule_train(state: &mut SimState, train_id: TrainId) -> Option<ScheduledTrain> {
    if state.spawned_train_ids.contains(&train_id) {
        return None;
    }
    let index = state
        .scheduled_trains
        .iter()
        .position(|train| train.id == train_id)?;
    let train = state.scheduled_trains.remove(index);
    state.inventories.return_stock(
        train.spawn_point,
        train.consist.iter().filter(|item| !item.provisional).cloned(),
    );
    Some(train)
}

fn provisional_item(train_id: TrainId, index: usize, stock_type: StockType) -> StockItem {
    StockItem {
        id: StockId(format!("provisional_{}_{index}", train_id.0)),
        stock_type,
        reversed: false,
        provisional: true,
    }
}
