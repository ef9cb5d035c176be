//! Domain types for the journey planner.
//!
//! All types enforce their invariants at construction time, so code that
//! receives these types can trust their validity.

mod itinerary;
mod location;
mod mode;

pub use itinerary::{Itinerary, Leg, LegSegment, Leaves};
pub use location::{InvalidLocation, Location};
pub use mode::{InvalidMode, ModeSet, TransportMode};
