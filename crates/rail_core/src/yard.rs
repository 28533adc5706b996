//! The static yard and route construction over it.
//!
//! Built once from a [`YardDef`]:
//!
//! ```text
//!  West portal ── west approach ──┬── turnout ── east approach ── East portal
//!                                  \
//!                                   curve ── platform ── team track ──| buffer
//! ```
//!
//! The turnout faces east, so only trains from the East portal can be routed
//! onto the siding.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::route::{Route, RouteEnd, RouteSegment, RouteSpot, SegmentGeometry};
use crate::track::{
    arc_geometry, diverging_sweep, routes, Connector, Element, ElementRef, Hand, Layout,
    TrackElementType,
};
use crate::{ElementId, SpawnPoint, SpotId, SwitchId, TurnoutState, Vec2};

/// Id of the yard's single switch, as used by `SetSwitch` orders.
pub const MAIN_SWITCH: &str = "sw_main";

/// Yard dimensions in meters and radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YardDef {
    pub east_approach_m: f64,
    pub west_approach_m: f64,
    pub turnout_through_m: f64,
    pub turnout_radius_m: f64,
    pub turnout_sweep_rad: f64,
    pub turnout_hand: Hand,
    pub platform_m: f64,
    pub team_track_m: f64,
}

impl Default for YardDef {
    fn default() -> Self {
        Self {
            east_approach_m: 150.0,
            west_approach_m: 420.0,
            turnout_through_m: 30.0,
            turnout_radius_m: 190.0,
            turnout_sweep_rad: 0.2,
            turnout_hand: Hand::Left,
            platform_m: 70.0,
            team_track_m: 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YardElements {
    pub east_portal: ElementId,
    pub east_approach: ElementId,
    pub turnout: ElementId,
    pub west_approach: ElementId,
    pub west_portal: ElementId,
    pub siding_curve: ElementId,
    pub platform: ElementId,
    pub team_track: ElementId,
    pub buffer_stop: ElementId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Yard {
    pub layout: Layout,
    pub elements: YardElements,
    pub switch_id: SwitchId,
}

impl Default for Yard {
    fn default() -> Self {
        Self::build(&YardDef::default())
    }
}

impl Yard {
    pub fn build(def: &YardDef) -> Self {
        let mut layout = Layout::new();
        let mainline =
            def.east_approach_m + def.turnout_through_m + def.west_approach_m;

        // The east portal faces west, into the yard.
        let east_portal = layout.place_element(
            TrackElementType::TrackEnd,
            Connector::new(Vec2::new(mainline, 0.0), -std::f64::consts::FRAC_PI_2),
        );
        let east_approach = layout.place_element_at(
            TrackElementType::StraightTrack {
                length: def.east_approach_m,
            },
            ElementRef::new(east_portal, 0),
        );
        let turnout = layout.place_element_at(
            TrackElementType::Turnout {
                through_length: def.turnout_through_m,
                radius: def.turnout_radius_m,
                sweep: def.turnout_sweep_rad,
                hand: def.turnout_hand,
            },
            ElementRef::new(east_approach, 1),
        );
        let west_approach = layout.place_element_at(
            TrackElementType::StraightTrack {
                length: def.west_approach_m,
            },
            ElementRef::new(turnout, 1),
        );
        let west_portal =
            layout.place_element_at(TrackElementType::TrackEnd, ElementRef::new(west_approach, 1));

        // Reverse curve straightens the siding parallel to the mainline.
        let siding_curve = layout.place_element_at(
            TrackElementType::CurvedTrack {
                radius: def.turnout_radius_m,
                sweep: -diverging_sweep(def.turnout_sweep_rad, def.turnout_hand),
            },
            ElementRef::new(turnout, 2),
        );
        let platform = layout.place_element_at(
            TrackElementType::StraightTrack {
                length: def.platform_m,
            },
            ElementRef::new(siding_curve, 1),
        );
        let team_track = layout.place_element_at(
            TrackElementType::StraightTrack {
                length: def.team_track_m,
            },
            ElementRef::new(platform, 1),
        );
        let buffer_stop =
            layout.place_element_at(TrackElementType::TrackEnd, ElementRef::new(team_track, 1));

        Self {
            layout,
            elements: YardElements {
                east_portal,
                east_approach,
                turnout,
                west_approach,
                west_portal,
                siding_curve,
                platform,
                team_track,
                buffer_stop,
            },
            switch_id: SwitchId(MAIN_SWITCH.to_string()),
        }
    }

    pub fn east_to_west_route(&self, turnout: TurnoutState) -> Route {
        self.walk_from(SpawnPoint::East, turnout)
    }

    pub fn west_to_east_route(&self, turnout: TurnoutState) -> Route {
        self.walk_from(SpawnPoint::West, turnout)
    }

    /// Recomputes the route a train entering at `spawn_point` follows.
    pub fn route_for(&self, spawn_point: SpawnPoint, turnout: TurnoutState) -> Route {
        match spawn_point {
            SpawnPoint::East => self.east_to_west_route(turnout),
            SpawnPoint::West => self.west_to_east_route(turnout),
        }
    }

    /// The station a train leaves through at the end of `route`, when the
    /// terminal element identifies one.
    pub fn exit_for(&self, route: &Route) -> Option<SpawnPoint> {
        match route.terminal_element()? {
            id if id == self.elements.west_approach => Some(SpawnPoint::West),
            id if id == self.elements.east_approach => Some(SpawnPoint::East),
            _ => None,
        }
    }

    fn portal(&self, spawn_point: SpawnPoint) -> ElementId {
        match spawn_point {
            SpawnPoint::East => self.elements.east_portal,
            SpawnPoint::West => self.elements.west_portal,
        }
    }

    fn end_kind(&self, id: ElementId) -> RouteEnd {
        if id == self.elements.east_portal {
            RouteEnd::Portal(SpawnPoint::East)
        } else if id == self.elements.west_portal {
            RouteEnd::Portal(SpawnPoint::West)
        } else {
            RouteEnd::BufferStop
        }
    }

    fn spot_at(&self, id: ElementId) -> Option<SpotId> {
        if id == self.elements.platform {
            Some(SpotId::Platform)
        } else if id == self.elements.team_track {
            Some(SpotId::TeamTrack)
        } else {
            None
        }
    }

    fn walk_from(&self, spawn_point: SpawnPoint, turnout: TurnoutState) -> Route {
        let mut segments = Vec::new();
        let mut spots = SmallVec::new();
        let mut distance = 0.0;
        let mut end = RouteEnd::BufferStop;
        let mut next = self
            .layout
            .connected_to(ElementRef::new(self.portal(spawn_point), 0));

        // Each element is entered at most once on a well-formed yard.
        let mut budget = self.layout.elements().len();
        while let Some(entry) = next {
            if budget == 0 {
                tracing::warn!(%spawn_point, "route walk exceeded element count; layout has a loop");
                break;
            }
            budget -= 1;
            let Some(element) = self.layout.find_element(entry.element) else {
                break;
            };
            let Some(exit) = exit_connector(&element.element_type, entry.connector, turnout) else {
                end = self.end_kind(element.id);
                break;
            };
            let segment = build_segment(element, entry.connector, exit, distance);
            if let Some(spot) = self.spot_at(element.id) {
                spots.push(RouteSpot {
                    spot,
                    distance: distance + segment.length / 2.0,
                });
            }
            distance = segment.end_distance();
            segments.push(segment);
            next = self.layout.connected_to(ElementRef::new(element.id, exit));
        }

        Route {
            segments,
            total_length: distance,
            start: RouteEnd::Portal(spawn_point),
            end,
            spots,
        }
    }
}

/// Picks the connector a train leaves through after entering at `entry`.
/// Facing turnouts follow `turnout`; everything else has at most one way on.
fn exit_connector(
    element_type: &TrackElementType,
    entry: usize,
    turnout: TurnoutState,
) -> Option<usize> {
    let exits: SmallVec<[usize; 2]> = routes(element_type)
        .iter()
        .filter_map(|&(from, to)| {
            if from == entry {
                Some(to)
            } else if to == entry {
                Some(from)
            } else {
                None
            }
        })
        .collect();
    match (exits.as_slice(), turnout) {
        ([], _) => None,
        ([only], _) | ([only, ..], TurnoutState::Normal) => Some(*only),
        ([_, diverging, ..], TurnoutState::Reverse) => Some(*diverging),
    }
}

fn build_segment(element: &Element, entry: usize, exit: usize, start_distance: f64) -> RouteSegment {
    let from = element.connectors[entry];
    let to = element.connectors[exit];
    let travel = from.travel_direction();
    let straight = |length: f64| {
        (
            length,
            SegmentGeometry::Straight {
                start: from.position,
                end: to.position,
                orientation: travel,
            },
        )
    };
    let arc = |radius: f64, sweep: f64| {
        // Traversing a curve from its far end runs the sweep backwards.
        let sweep = if entry == 0 { sweep } else { -sweep };
        let (center, start_angle) = arc_geometry(from.position, travel, radius, sweep);
        (
            radius * sweep.abs(),
            SegmentGeometry::Arc {
                center,
                radius,
                start_angle,
                sweep,
            },
        )
    };

    let (length, geometry) = match element.element_type {
        TrackElementType::StraightTrack { length } => straight(length),
        TrackElementType::CurvedTrack { radius, sweep } => arc(radius, sweep),
        TrackElementType::Turnout {
            through_length,
            radius,
            sweep,
            hand,
        } => {
            if entry == 2 || exit == 2 {
                arc(radius, diverging_sweep(sweep, hand))
            } else {
                straight(through_length)
            }
        }
        TrackElementType::TrackEnd => straight(0.0),
    };

    RouteSegment {
        element_id: element.id,
        turnout: matches!(element.element_type, TrackElementType::Turnout { .. }),
        length,
        start_distance,
        geometry,
    }
}
