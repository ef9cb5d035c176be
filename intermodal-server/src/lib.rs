//! Intermodal journey planner server.
//!
//! Learns a graph of walking, cycling, driving and transit connections from
//! an external route planner, then answers "how do I get from here to there
//! mixing modes?" by searching that graph and refining the result back
//! through the planner.

pub mod domain;
pub mod graph;
pub mod index;
pub mod network;
pub mod planner;
pub mod provider;
pub mod web;
