//! The layout graph: placed elements plus connections between connectors.

use super::element::{compute_connectors, Connector, Connectors, TrackElementType};
use crate::ElementId;

/// One connector of one placed element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef {
    pub element: ElementId,
    pub connector: usize,
}

impl ElementRef {
    pub const fn new(element: ElementId, connector: usize) -> Self {
        Self { element, connector }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub element_type: TrackElementType,
    /// Fixed at placement time.
    pub connectors: Connectors,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    elements: Vec<Element>,
    connections: Vec<(ElementRef, ElementRef)>,
    next_id: u32,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn connections(&self) -> &[(ElementRef, ElementRef)] {
        &self.connections
    }

    /// Places an element with connector 0 at `entry`.
    pub fn place_element(&mut self, element_type: TrackElementType, entry: Connector) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        let connectors = compute_connectors(entry, &element_type);
        self.elements.push(Element {
            id,
            element_type,
            connectors,
        });
        id
    }

    /// Places an element whose connector 0 mates with `at`, and connects the two.
    ///
    /// An unknown `at` falls back to a connector at the origin facing north;
    /// the recorded connection then dangles and validation reports it.
    pub fn place_element_at(&mut self, element_type: TrackElementType, at: ElementRef) -> ElementId {
        let entry = match self.connector(at.element, at.connector) {
            Some(existing) => existing.mate(),
            None => {
                tracing::warn!(element = %at.element, connector = at.connector, "placing against unknown connector");
                Connector::default()
            }
        };
        let id = self.place_element(element_type, entry);
        self.connect(at, ElementRef::new(id, 0));
        id
    }

    /// Records a connection without any geometric check.
    pub fn connect(&mut self, a: ElementRef, b: ElementRef) {
        self.connections.push((a, b));
    }

    pub fn find_element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|element| element.id == id)
    }

    pub fn connector(&self, id: ElementId, index: usize) -> Option<&Connector> {
        self.find_element(id)?.connectors.get(index)
    }

    /// The connector on the other side of a connection, if any.
    pub fn connected_to(&self, at: ElementRef) -> Option<ElementRef> {
        self.connections.iter().find_map(|&(a, b)| {
            if a == at {
                Some(b)
            } else if b == at {
                Some(a)
            } else {
                None
            }
        })
    }
}
