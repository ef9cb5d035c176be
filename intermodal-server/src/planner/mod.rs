//! Journey planning over the multimodal graph.
//!
//! Planning runs in two phases. Path search finds the cheapest sequence of
//! mode-tagged edges between the nodes nearest the query coordinates,
//! honouring the allowed modes, the rule that a car or bicycle cannot be
//! picked up mid-journey, and the penalty for leaving one. Refinement then
//! turns that abstract path into a concrete itinerary, one provider request
//! per same-mode run.

mod config;
mod frontier;
mod journey;
mod refine;
mod search;
mod summary;

pub use config::SearchConfig;
pub use journey::{ExpandSummary, JourneyPlanner, PlanError, PlannedJourney};
pub use refine::{ModeRun, RefineError, Refiner, mode_runs};
pub use search::{GraphPath, PathSearch, SearchError, SearchRequest, SearchResult};
pub use summary::{ItinerarySummary, PathSummary};
