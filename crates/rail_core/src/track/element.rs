//! Primitive track pieces and their connector geometry.
//!
//! A connector's orientation faces outward from its element. Travel through
//! a connector into the element runs along the flipped orientation.

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::vec2::{flip_orientation, normalize_angle, Vec2};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Connector {
    pub position: Vec2,
    pub orientation: f64,
}

impl Connector {
    pub const fn new(position: Vec2, orientation: f64) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Direction of travel when entering an element through this connector.
    pub fn travel_direction(&self) -> f64 {
        flip_orientation(self.orientation)
    }

    /// The mating connector: same position, facing the other way.
    pub fn mate(&self) -> Connector {
        Connector::new(self.position, flip_orientation(self.orientation))
    }
}

pub type Connectors = SmallVec<[Connector; 3]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hand {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackElementType {
    StraightTrack {
        length: f64,
    },
    /// Positive sweep curves clockwise (to the right of travel).
    CurvedTrack {
        radius: f64,
        sweep: f64,
    },
    Turnout {
        through_length: f64,
        radius: f64,
        /// Magnitude of the diverging leg's sweep; `hand` picks the side.
        sweep: f64,
        hand: Hand,
    },
    TrackEnd,
}

/// Traversable connector pairs. Turnouts list the through leg first.
pub fn routes(element_type: &TrackElementType) -> &'static [(usize, usize)] {
    match element_type {
        TrackElementType::StraightTrack { .. } | TrackElementType::CurvedTrack { .. } => {
            &[(0, 1)]
        }
        TrackElementType::Turnout { .. } => &[(0, 1), (0, 2)],
        TrackElementType::TrackEnd => &[],
    }
}

/// Signed sweep of a turnout's diverging leg.
pub fn diverging_sweep(sweep: f64, hand: Hand) -> f64 {
    match hand {
        Hand::Right => sweep.abs(),
        Hand::Left => -sweep.abs(),
    }
}

/// Computes every connector of an element placed with connector 0 at `entry`.
pub fn compute_connectors(entry: Connector, element_type: &TrackElementType) -> Connectors {
    let mut connectors = Connectors::new();
    connectors.push(entry);
    match *element_type {
        TrackElementType::StraightTrack { length } => {
            connectors.push(advance_straight(&entry, length));
        }
        TrackElementType::CurvedTrack { radius, sweep } => {
            connectors.push(advance_arc(&entry, radius, sweep));
        }
        TrackElementType::Turnout {
            through_length,
            radius,
            sweep,
            hand,
        } => {
            connectors.push(advance_straight(&entry, through_length));
            connectors.push(advance_arc(&entry, radius, diverging_sweep(sweep, hand)));
        }
        TrackElementType::TrackEnd => {}
    }
    connectors
}

/// Center and start angle (seen from the center) of an arc that leaves
/// `start` heading `travel` and turns through `sweep`.
pub fn arc_geometry(start: Vec2, travel: f64, radius: f64, sweep: f64) -> (Vec2, f64) {
    let side = if sweep < 0.0 { -1.0 } else { 1.0 };
    let center = start + Vec2::from_angle(travel + side * FRAC_PI_2) * radius;
    let start_angle = normalize_angle(travel - side * FRAC_PI_2);
    (center, start_angle)
}

fn advance_straight(entry: &Connector, length: f64) -> Connector {
    let travel = entry.travel_direction();
    Connector::new(entry.position + Vec2::from_angle(travel) * length, travel)
}

fn advance_arc(entry: &Connector, radius: f64, sweep: f64) -> Connector {
    let travel = entry.travel_direction();
    let (center, start_angle) = arc_geometry(entry.position, travel, radius, sweep);
    Connector::new(
        center + Vec2::from_angle(start_angle + sweep) * radius,
        normalize_angle(travel + sweep),
    )
}
