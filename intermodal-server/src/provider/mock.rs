//! Offline provider for development and tests.
//!
//! Answers every request with a single leaf running straight from origin to
//! destination, timed at the mode's cruising speed. Useful for exercising
//! the graph and the web layer without an OTP server.

use std::sync::Mutex;

use crate::domain::{Itinerary, Leg, Location, ModeSet, TransportMode};

use super::ItineraryProvider;
use super::error::ProviderError;

/// Provider that fabricates direct itineraries.
#[derive(Debug, Default)]
pub struct StraightLineProvider {
    /// Modes this provider refuses to plan.
    failing: ModeSet,
    call_count: Mutex<usize>,
}

impl StraightLineProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every request for `mode` with [`ProviderError::NoItinerary`].
    pub fn failing_for(mut self, mode: TransportMode) -> Self {
        self.failing.insert(mode);
        self
    }

    /// Number of itineraries requested so far, including failed ones.
    pub fn call_count(&self) -> usize {
        self.call_count.lock().map(|count| *count).unwrap_or(0)
    }
}

impl ItineraryProvider for StraightLineProvider {
    async fn fetch_itinerary(
        &self,
        origin: Location,
        destination: Location,
        mode: TransportMode,
    ) -> Result<Itinerary, ProviderError> {
        if let Ok(mut count) = self.call_count.lock() {
            *count += 1;
        }

        if self.failing.contains(mode) {
            return Err(ProviderError::no_itinerary(format!("{mode} not available")));
        }

        let secs = mode.duration_for_distance(origin.distance_meters(&destination));
        Ok(Itinerary::new(vec![Leg::leaf(origin, destination, secs, mode)]))
    }
}
