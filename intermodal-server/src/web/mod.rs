//! Web layer for the journey planner.
//!
//! Provides HTTP endpoints for planning journeys and growing the network.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
