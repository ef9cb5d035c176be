//! Itineraries as supplied by external route planners.
//!
//! An itinerary is an ordered list of legs. A leg is either a leaf
//! (two endpoints, a duration and a mode) or a composite of finer-grained
//! legs, nested arbitrarily deep. Only leaves carry travel data; composite
//! legs exist to preserve the structure the planner reported.

use serde::{Deserialize, Serialize};

use super::{Location, TransportMode};

/// One mode-homogeneous hop between two locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegSegment {
    pub start: Location,
    pub end: Location,
    pub duration_secs: u64,
    pub mode: TransportMode,
}

/// A leg of an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Leg {
    /// An atomic hop.
    Leaf(LegSegment),
    /// A leg decomposed into ordered sub-steps.
    Composite { steps: Vec<Leg> },
}

impl Leg {
    /// Shorthand for a leaf leg.
    pub fn leaf(start: Location, end: Location, duration_secs: u64, mode: TransportMode) -> Self {
        Leg::Leaf(LegSegment {
            start,
            end,
            duration_secs,
            mode,
        })
    }

    /// Total duration of all leaves under this leg.
    pub fn duration_secs(&self) -> u64 {
        self.leaves()
            .map(|segment| segment.duration_secs)
            .fold(0, u64::saturating_add)
    }

    /// Leaves in travel order, descending through composite legs.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            stack: vec![std::slice::from_ref(self).iter()],
        }
    }

    /// Where the leg starts, if it has any leaf.
    pub fn start(&self) -> Option<Location> {
        self.leaves().next().map(|segment| segment.start)
    }

    /// Where the leg ends, if it has any leaf.
    pub fn end(&self) -> Option<Location> {
        self.leaves().last().map(|segment| segment.end)
    }
}

/// Depth-first iterator over the leaves of one or more legs.
pub struct Leaves<'a> {
    stack: Vec<std::slice::Iter<'a, Leg>>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a LegSegment;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(Leg::Leaf(segment)) => return Some(segment),
                Some(Leg::Composite { steps }) => self.stack.push(steps.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// A complete point-to-point trip.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Itinerary {
    pub legs: Vec<Leg>,
}

impl Itinerary {
    pub fn new(legs: Vec<Leg>) -> Self {
        Self { legs }
    }

    /// An itinerary with no legs.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// All leaves of all legs, in travel order.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            stack: vec![self.legs.iter()],
        }
    }

    /// Sum of leaf durations.
    pub fn duration_secs(&self) -> u64 {
        self.leaves()
            .map(|segment| segment.duration_secs)
            .fold(0, u64::saturating_add)
    }

    pub fn origin(&self) -> Option<Location> {
        self.leaves().next().map(|segment| segment.start)
    }

    pub fn destination(&self) -> Option<Location> {
        self.leaves().last().map(|segment| segment.end)
    }

    /// Append another itinerary's legs after this one's.
    pub fn extend(&mut self, other: Itinerary) {
        self.legs.extend(other.legs);
    }
}
