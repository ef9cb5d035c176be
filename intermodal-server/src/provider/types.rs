//! OpenTripPlanner `plan` response DTOs.
//!
//! Only the subset of the response the converter reads is modelled. OTP
//! sends `null` for several list fields, so those are `Option` rather than
//! defaulted.

use serde::Deserialize;

/// Top-level response of `/otp/routers/{router}/plan`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanResponse {
    /// The plan, absent when the planner reports an error.
    pub plan: Option<Plan>,

    /// Why no plan was produced.
    pub error: Option<PlannerError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    pub itineraries: Option<Vec<OtpItinerary>>,
}

/// One itinerary of a plan.
#[derive(Debug, Clone, Deserialize)]
pub struct OtpItinerary {
    /// Total duration in seconds.
    pub duration: Option<f64>,

    pub legs: Vec<OtpLeg>,
}

/// A leg of an OTP itinerary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpLeg {
    /// OTP mode name (e.g. "WALK", "BUS", "RAIL").
    pub mode: String,

    pub from: Place,

    pub to: Place,

    /// Duration in seconds.
    pub duration: f64,

    /// Departure as epoch milliseconds.
    pub start_time: Option<i64>,

    /// Arrival as epoch milliseconds.
    pub end_time: Option<i64>,

    /// Stops between `from` and `to` on transit legs.
    pub intermediate_stops: Option<Vec<Place>>,

    /// Turn-by-turn steps on street legs.
    pub steps: Option<Vec<WalkStep>>,
}

/// A named point: leg endpoint or transit stop.
#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
    /// Arrival as epoch milliseconds.
    pub arrival: Option<i64>,
    /// Departure as epoch milliseconds.
    pub departure: Option<i64>,
}

/// A street step. Its coordinates are where the step begins.
#[derive(Debug, Clone, Deserialize)]
pub struct WalkStep {
    pub lat: f64,
    pub lon: f64,
    /// Length in metres.
    pub distance: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlannerError {
    pub id: Option<i32>,
    pub msg: Option<String>,
    pub message: Option<String>,
}

impl PlannerError {
    /// Best available description.
    pub fn describe(&self) -> String {
        self.msg
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| format!("planner error {}", self.id.unwrap_or_default()))
    }
}
