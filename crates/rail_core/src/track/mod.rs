//! Track pieces, the layout graph that connects them, and layout validation.

mod element;
mod layout;
mod validation;

pub use element::{
    arc_geometry, compute_connectors, diverging_sweep, routes, Connector, Connectors, Hand,
    TrackElementType,
};
pub use layout::{Element, ElementRef, Layout};
pub use validation::{
    validate_layout, ValidationError, ValidationReport, ORIENTATION_TOLERANCE, POSITION_TOLERANCE,
};
