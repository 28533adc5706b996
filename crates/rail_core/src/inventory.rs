//! Per-station stock inventories.

use serde::{Deserialize, Serialize};

use crate::{SpawnPoint, StockItem, StockType};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventories {
    pub east: Vec<StockItem>,
    pub west: Vec<StockItem>,
}

impl Inventories {
    pub fn station(&self, spawn_point: SpawnPoint) -> &[StockItem] {
        match spawn_point {
            SpawnPoint::East => &self.east,
            SpawnPoint::West => &self.west,
        }
    }

    fn station_mut(&mut self, spawn_point: SpawnPoint) -> &mut Vec<StockItem> {
        match spawn_point {
            SpawnPoint::East => &mut self.east,
            SpawnPoint::West => &mut self.west,
        }
    }

    /// Removes the first item of `stock_type`, keeping the rest in order.
    pub fn take_stock(&mut self, spawn_point: SpawnPoint, stock_type: StockType) -> Option<StockItem> {
        let station = self.station_mut(spawn_point);
        let index = station
            .iter()
            .position(|item| item.stock_type == stock_type)?;
        Some(station.remove(index))
    }

    /// Appends `items` in their given order.
    pub fn return_stock(
        &mut self,
        spawn_point: SpawnPoint,
        items: impl IntoIterator<Item = StockItem>,
    ) {
        self.station_mut(spawn_point).extend(items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(items: &[StockItem]) -> Vec<&str> {
        items.iter().map(|item| item.id.0.as_str()).collect()
    }

    fn stocked() -> Inventories {
        Inventories {
            east: vec![
                StockItem::new("box_1", StockType::Boxcar),
                StockItem::new("loco_1", StockType::Locomotive),
                StockItem::new("box_2", StockType::Boxcar),
            ],
            west: vec![],
        }
    }

    #[test]
    fn take_removes_first_match_and_preserves_order() {
        let mut inventories = stocked();
        let taken = inventories
            .take_stock(SpawnPoint::East, StockType::Boxcar)
            .unwrap();
        assert_eq!(taken.id.0, "box_1");
        assert_eq!(ids(&inventories.east), vec!["loco_1", "box_2"]);
    }

    #[test]
    fn take_missing_type_leaves_inventory_untouched() {
        let mut inventories = stocked();
        assert!(inventories
            .take_stock(SpawnPoint::East, StockType::Flatbed)
            .is_none());
        assert!(inventories
            .take_stock(SpawnPoint::West, StockType::Boxcar)
            .is_none());
        assert_eq!(inventories, stocked());
    }

    #[test]
    fn return_appends_in_order() {
        let mut inventories = stocked();
        inventories.return_stock(
            SpawnPoint::West,
            vec![
                StockItem::new("car_a", StockType::PassengerCar),
                StockItem::new("car_b", StockType::Flatbed),
            ],
        );
        inventories.return_stock(
            SpawnPoint::West,
            [StockItem::new("car_c", StockType::Boxcar)],
        );
        assert_eq!(ids(inventories.station(SpawnPoint::West)), vec!["car_a", "car_b", "car_c"]);
    }
}
