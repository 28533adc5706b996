//! Rolling stock catalog and consist measurements.

use serde::{Deserialize, Serialize};

use crate::StockId;

/// Gap between adjacent items of a consist, in meters.
pub const COUPLER_GAP: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockType {
    Locomotive,
    PassengerCar,
    Flatbed,
    Boxcar,
}

impl StockType {
    pub const ALL: [StockType; 4] = [
        StockType::Locomotive,
        StockType::PassengerCar,
        StockType::Flatbed,
        StockType::Boxcar,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StockType::Locomotive => "Locomotive",
            StockType::PassengerCar => "Passenger Car",
            StockType::Flatbed => "Flatbed",
            StockType::Boxcar => "Boxcar",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: StockId,
    pub stock_type: StockType,
    /// Faces backwards within its consist.
    #[serde(default)]
    pub reversed: bool,
    /// Placeholder for stock the station does not actually hold.
    #[serde(default)]
    pub provisional: bool,
}

impl StockItem {
    pub fn new(id: impl Into<String>, stock_type: StockType) -> Self {
        Self {
            id: StockId(id.into()),
            stock_type,
            reversed: false,
            provisional: false,
        }
    }
}

/// Over-buffers length in meters.
pub fn stock_length(stock_type: StockType) -> f64 {
    match stock_type {
        StockType::Locomotive => 10.45,
        StockType::PassengerCar => 13.92,
        StockType::Flatbed => 13.96,
        StockType::Boxcar => 12.0,
    }
}

pub fn consist_length(items: &[StockItem]) -> f64 {
    let cars: f64 = items.iter().map(|item| stock_length(item.stock_type)).sum();
    cars + COUPLER_GAP * items.len().saturating_sub(1) as f64
}

/// Distance from the head to the center of car `car_index`, or `None` past the end.
pub fn car_offset_from_head(consist: &[StockItem], car_index: usize) -> Option<f64> {
    let car = consist.get(car_index)?;
    let ahead: f64 = consist[..car_index]
        .iter()
        .map(|item| stock_length(item.stock_type))
        .sum();
    Some(ahead + car_index as f64 * COUPLER_GAP + stock_length(car.stock_type) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consist(types: &[StockType]) -> Vec<StockItem> {
        types
            .iter()
            .enumerate()
            .map(|(i, t)| StockItem::new(format!("car_{i}"), *t))
            .collect()
    }

    #[test]
    fn empty_consist_has_zero_length() {
        assert!(consist_length(&[]).abs() < 1e-12);
    }

    #[test]
    fn single_item_has_no_coupler_gap() {
        let items = consist(&[StockType::Boxcar]);
        assert!((consist_length(&items) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn consist_length_adds_coupler_gaps() {
        let items = consist(&[
            StockType::Locomotive,
            StockType::PassengerCar,
            StockType::Flatbed,
        ]);
        assert!((consist_length(&items) - 40.33).abs() < 0.01);
    }

    #[test]
    fn car_offset_points_at_car_center() {
        let items = consist(&[
            StockType::Locomotive,
            StockType::PassengerCar,
            StockType::Flatbed,
        ]);
        assert!((car_offset_from_head(&items, 0).unwrap() - 10.45 / 2.0).abs() < 1e-9);
        assert!((car_offset_from_head(&items, 2).unwrap() - 33.35).abs() < 0.01);
        assert!(car_offset_from_head(&items, 3).is_none());
    }

    #[test]
    fn every_type_has_a_positive_length() {
        for stock_type in StockType::ALL {
            assert!(stock_length(stock_type) > 0.0, "{}", stock_type.name());
        }
    }
}
