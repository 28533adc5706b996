//! Flattened, traversable routes and the pure queries over them.
//!
//! A route is an immutable snapshot of one path through the yard. It holds
//! no reference to the layout, so rebuilding one train's route never touches
//! another's.

use std::f64::consts::FRAC_PI_2;

use smallvec::SmallVec;

use crate::vec2::normalize_angle;
use crate::{ElementId, SpawnPoint, SpotId, Vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentGeometry {
    Straight {
        start: Vec2,
        end: Vec2,
        orientation: f64,
    },
    /// `start_angle` is measured from `center`; `sweep` is signed in travel direction.
    Arc {
        center: Vec2,
        radius: f64,
        start_angle: f64,
        sweep: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteSegment {
    pub element_id: ElementId,
    /// True when the segment runs through a turnout.
    pub turnout: bool,
    pub length: f64,
    /// Cumulative distance from the route start.
    pub start_distance: f64,
    pub geometry: SegmentGeometry,
}

impl RouteSegment {
    pub fn end_distance(&self) -> f64 {
        self.start_distance + self.length
    }
}

/// What a route runs into at either end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteEnd {
    Portal(SpawnPoint),
    BufferStop,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSpot {
    pub spot: SpotId,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub segments: Vec<RouteSegment>,
    pub total_length: f64,
    pub start: RouteEnd,
    pub end: RouteEnd,
    /// Siding spots this route passes, in route order.
    pub spots: SmallVec<[RouteSpot; 2]>,
}

impl Route {
    pub fn element_ids(&self) -> Vec<ElementId> {
        self.segments.iter().map(|segment| segment.element_id).collect()
    }

    pub fn terminal_element(&self) -> Option<ElementId> {
        self.segments.last().map(|segment| segment.element_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutePosition {
    pub position: Vec2,
    /// Travel-direction tangent.
    pub orientation: f64,
}

/// Point and tangent at `distance` along `route`, or `None` outside `[0, total_length]`.
pub fn position_on_route(distance: f64, route: &Route) -> Option<RoutePosition> {
    if !(0.0..=route.total_length).contains(&distance) {
        return None;
    }
    let segment = route
        .segments
        .iter()
        .find(|segment| distance <= segment.end_distance())
        .or_else(|| route.segments.last())?;
    let progress = if segment.length > 0.0 {
        ((distance - segment.start_distance) / segment.length).clamp(0.0, 1.0)
    } else {
        0.0
    };
    Some(match segment.geometry {
        SegmentGeometry::Straight {
            start,
            end,
            orientation,
        } => RoutePosition {
            position: start.lerp(end, progress),
            orientation,
        },
        SegmentGeometry::Arc {
            center,
            radius,
            start_angle,
            sweep,
        } => {
            let angle = start_angle + sweep * progress;
            let side = if sweep < 0.0 { -1.0 } else { 1.0 };
            RoutePosition {
                position: center + Vec2::from_angle(angle) * radius,
                orientation: normalize_angle(angle + side * FRAC_PI_2),
            }
        }
    })
}

/// Distance of a spot along `route`, or `None` when the route does not reach it.
pub fn spot_position(spot: SpotId, route: &Route) -> Option<f64> {
    if let Some(portal) = spot.portal() {
        if route.start == RouteEnd::Portal(portal) {
            return Some(0.0);
        }
        if route.end == RouteEnd::Portal(portal) {
            return Some(route.total_length);
        }
        return None;
    }
    route
        .spots
        .iter()
        .find(|route_spot| route_spot.spot == spot)
        .map(|route_spot| route_spot.distance)
}

/// Distance at which the route enters a turnout, if it passes one.
pub fn turnout_start_distance(route: &Route) -> Option<f64> {
    route
        .segments
        .iter()
        .find(|segment| segment.turnout)
        .map(|segment| segment.start_distance)
}
