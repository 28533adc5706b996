//! Geometric consistency checks over a layout's connections.
//!
//! A design-time tool; nothing in the tick path calls it.

use std::f64::consts::PI;

use thiserror::Error;

use super::layout::{ElementRef, Layout};
use crate::vec2::normalize_angle;

/// Maximum distance between mated connectors, in meters.
pub const POSITION_TOLERANCE: f64 = 0.01;
/// Maximum deviation from exactly opposite orientations, in radians.
pub const ORIENTATION_TOLERANCE: f64 = PI / 180.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("connection references missing connector {}:{}", .missing.element, .missing.connector)]
    DanglingConnection { missing: ElementRef },

    #[error("connectors {}:{} and {}:{} are {distance:.3} m apart", .a.element, .a.connector, .b.element, .b.connector)]
    PositionMismatch {
        a: ElementRef,
        b: ElementRef,
        distance: f64,
    },

    #[error("connectors {}:{} and {}:{} are {deviation:.4} rad from opposite", .a.element, .a.connector, .b.element, .b.connector)]
    OrientationMismatch {
        a: ElementRef,
        b: ElementRef,
        deviation: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

pub fn validate_layout(layout: &Layout) -> ValidationReport {
    let mut errors = Vec::new();
    for &(a, b) in layout.connections() {
        check_connection(layout, a, b, &mut errors);
    }
    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

fn check_connection(
    layout: &Layout,
    a: ElementRef,
    b: ElementRef,
    errors: &mut Vec<ValidationError>,
) {
    let connector_a = layout.connector(a.element, a.connector);
    let connector_b = layout.connector(b.element, b.connector);
    let (Some(connector_a), Some(connector_b)) = (connector_a, connector_b) else {
        for (reference, found) in [(a, connector_a.is_some()), (b, connector_b.is_some())] {
            if !found {
                errors.push(ValidationError::DanglingConnection { missing: reference });
            }
        }
        return;
    };

    let distance = connector_a.position.distance(connector_b.position);
    if distance > POSITION_TOLERANCE {
        errors.push(ValidationError::PositionMismatch { a, b, distance });
    }

    let deviation =
        PI - normalize_angle(connector_a.orientation - connector_b.orientation).abs();
    if deviation > ORIENTATION_TOLERANCE {
        errors.push(ValidationError::OrientationMismatch { a, b, deviation });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::{Connector, TrackElementType};
    use crate::{ElementId, Vec2};

    fn straight(length: f64) -> TrackElementType {
        TrackElementType::StraightTrack { length }
    }

    #[test]
    fn empty_layout_is_valid() {
        let report = validate_layout(&Layout::new());
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn unconnected_elements_are_valid() {
        let mut layout = Layout::new();
        layout.place_element(straight(10.0), Connector::default());
        layout.place_element(straight(10.0), Connector::new(Vec2::new(50.0, 50.0), 1.0));
        assert!(validate_layout(&layout).valid);
    }

    #[test]
    fn chained_placement_is_valid() {
        let mut layout = Layout::new();
        let a = layout.place_element(straight(10.0), Connector::default());
        let b = layout.place_element_at(
            TrackElementType::CurvedTrack {
                radius: 50.0,
                sweep: 0.3,
            },
            ElementRef::new(a, 1),
        );
        layout.place_element_at(straight(10.0), ElementRef::new(b, 1));
        let report = validate_layout(&layout);
        assert!(report.valid, "{:?}", report.errors);
    }

    #[test]
    fn dangling_connection_is_reported() {
        let mut layout = Layout::new();
        let a = layout.place_element(straight(10.0), Connector::default());
        let missing = ElementRef::new(ElementId(99), 0);
        layout.connect(ElementRef::new(a, 1), missing);
        let report = validate_layout(&layout);
        assert!(!report.valid);
        assert_eq!(
            report.errors,
            vec![ValidationError::DanglingConnection { missing }]
        );
    }

    #[test]
    fn out_of_range_connector_index_dangles() {
        let mut layout = Layout::new();
        let a = layout.place_element(straight(10.0), Connector::default());
        let b = layout.place_element(straight(10.0), Connector::default());
        layout.connect(ElementRef::new(a, 5), ElementRef::new(b, 0));
        let report = validate_layout(&layout);
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(
            report.errors[0],
            ValidationError::DanglingConnection { .. }
        ));
    }

    #[test]
    fn position_mismatch_is_reported() {
        let mut layout = Layout::new();
        let a = layout.place_element(straight(10.0), Connector::new(Vec2::ZERO, 0.0));
        // Mates a's connector 1 in orientation but sits 0.5 m away.
        let b = layout.place_element(straight(10.0), Connector::new(Vec2::new(0.5, 10.0), 0.0));
        layout.connect(ElementRef::new(a, 1), ElementRef::new(b, 0));
        let report = validate_layout(&layout);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(
            report.errors[0],
            ValidationError::PositionMismatch { distance, .. } if (distance - 0.5).abs() < 1e-9
        ));
    }

    #[test]
    fn orientation_mismatch_is_reported() {
        let mut layout = Layout::new();
        let a = layout.place_element(straight(10.0), Connector::new(Vec2::ZERO, 0.0));
        let end = *layout.connector(a, 1).unwrap();
        // Same position, but facing the same way as a's connector.
        let b = layout.place_element(straight(10.0), end);
        layout.connect(ElementRef::new(a, 1), ElementRef::new(b, 0));
        let report = validate_layout(&layout);
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(
            report.errors[0],
            ValidationError::OrientationMismatch { .. }
        ));
    }

    #[test]
    fn small_deviations_are_tolerated() {
        let mut layout = Layout::new();
        let a = layout.place_element(straight(10.0), Connector::new(Vec2::ZERO, 0.0));
        let end = *layout.connector(a, 1).unwrap();
        let nudged = Connector::new(
            end.position + Vec2::new(0.005, 0.0),
            end.mate().orientation + ORIENTATION_TOLERANCE / 2.0,
        );
        let b = layout.place_element(straight(10.0), nudged);
        layout.connect(ElementRef::new(a, 1), ElementRef::new(b, 0));
        assert!(validate_layout(&layout).valid);
    }
}
