//! Application state for the web layer.

use std::sync::Arc;

use crate::planner::JourneyPlanner;

/// Shared application state.
///
/// Generic over the itinerary provider so tests can serve from an offline
/// provider.
pub struct AppState<P> {
    /// Journey planner with its network and provider
    pub planner: Arc<JourneyPlanner<P>>,
}

impl<P> AppState<P> {
    /// Create a new app state.
    pub fn new(planner: JourneyPlanner<P>) -> Self {
        Self {
            planner: Arc::new(planner),
        }
    }
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            planner: Arc::clone(&self.planner),
        }
    }
}
