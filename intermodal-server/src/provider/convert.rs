//! Conversion from OTP DTOs to domain itineraries.
//!
//! Transit legs that list intermediate stops become composite legs with one
//! leaf per stop-to-stop hop, timed from the stop times. Street legs that
//! list steps become composite legs with one leaf per step, timed from the
//! step length at the mode's cruising speed. Every other leg is a leaf.

use chrono::DateTime;

use crate::domain::{InvalidLocation, Itinerary, Leg, Location, TransportMode};

use super::types::{OtpItinerary, OtpLeg, Place, WalkStep};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// OTP mode name with no counterpart
    #[error("unknown OTP mode: {0}")]
    UnknownMode(String),

    /// Coordinates out of range
    #[error(transparent)]
    InvalidLocation(#[from] InvalidLocation),

    /// Itinerary without legs
    #[error("itinerary has no legs")]
    EmptyItinerary,
}

/// Map an OTP mode name onto a transport mode.
///
/// Every public-transport vehicle collapses into [`TransportMode::Transit`].
pub fn otp_mode(name: &str) -> Result<TransportMode, ConversionError> {
    match name {
        "WALK" => Ok(TransportMode::Walk),
        "BICYCLE" => Ok(TransportMode::Bicycle),
        "CAR" => Ok(TransportMode::Car),
        "TRANSIT" | "BUS" | "TROLLEYBUS" | "TRAM" | "SUBWAY" | "MONORAIL" | "RAIL" | "FERRY"
        | "CABLE_CAR" | "GONDOLA" | "FUNICULAR" | "AIRPLANE" => Ok(TransportMode::Transit),
        other => Err(ConversionError::UnknownMode(other.to_string())),
    }
}

/// Convert one OTP itinerary.
pub fn convert_itinerary(itinerary: &OtpItinerary) -> Result<Itinerary, ConversionError> {
    if itinerary.legs.is_empty() {
        return Err(ConversionError::EmptyItinerary);
    }

    let legs = itinerary
        .legs
        .iter()
        .map(convert_leg)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Itinerary::new(legs))
}

/// Convert a single OTP leg.
pub fn convert_leg(leg: &OtpLeg) -> Result<Leg, ConversionError> {
    let mode = otp_mode(&leg.mode)?;

    match (mode, leg.intermediate_stops.as_deref(), leg.steps.as_deref()) {
        (TransportMode::Transit, Some(stops), _) if !stops.is_empty() => {
            stop_to_stop(leg, stops)
        }
        (TransportMode::Walk | TransportMode::Bicycle | TransportMode::Car, _, Some(steps))
            if !steps.is_empty() =>
        {
            step_to_step(leg, steps, mode)
        }
        _ => Ok(Leg::leaf(
            place_location(&leg.from)?,
            place_location(&leg.to)?,
            leg.duration.max(0.0).round() as u64,
            mode,
        )),
    }
}

/// A stop with the times the vehicle arrives and leaves, in epoch ms.
struct TimedStop {
    location: Location,
    arrival: Option<i64>,
    departure: Option<i64>,
}

fn stop_to_stop(leg: &OtpLeg, stops: &[Place]) -> Result<Leg, ConversionError> {
    let mut timed = Vec::with_capacity(stops.len() + 2);
    timed.push(TimedStop {
        location: place_location(&leg.from)?,
        arrival: leg.from.arrival,
        departure: leg.from.departure.or(leg.start_time),
    });
    for stop in stops {
        timed.push(TimedStop {
            location: place_location(stop)?,
            arrival: stop.arrival,
            departure: stop.departure,
        });
    }
    timed.push(TimedStop {
        location: place_location(&leg.to)?,
        arrival: leg.to.arrival.or(leg.end_time),
        departure: leg.to.departure,
    });

    let steps = timed
        .windows(2)
        .map(|hop| {
            let (a, b) = (&hop[0], &hop[1]);
            let secs = elapsed_secs(a.departure.or(a.arrival), b.arrival.or(b.departure))
                .unwrap_or_else(|| {
                    TransportMode::Transit.duration_for_distance(a.location.distance_meters(&b.location))
                });
            Leg::leaf(a.location, b.location, secs, TransportMode::Transit)
        })
        .collect();

    Ok(Leg::Composite { steps })
}

fn step_to_step(leg: &OtpLeg, steps: &[WalkStep], mode: TransportMode) -> Result<Leg, ConversionError> {
    let mut points = steps
        .iter()
        .map(|step| Location::new(step.lat, step.lon))
        .collect::<Result<Vec<_>, _>>()?;
    points.push(place_location(&leg.to)?);

    let legs = steps
        .iter()
        .zip(points.windows(2))
        .map(|(step, pair)| {
            Leg::leaf(pair[0], pair[1], mode.duration_for_distance(step.distance), mode)
        })
        .collect();

    Ok(Leg::Composite { steps: legs })
}

fn place_location(place: &Place) -> Result<Location, ConversionError> {
    Ok(Location::new(place.lat, place.lon)?)
}

/// Whole seconds between two epoch-millisecond instants, if both are known.
///
/// Clock skew in the feed can put `to` before `from`; that counts as zero.
fn elapsed_secs(from_ms: Option<i64>, to_ms: Option<i64>) -> Option<u64> {
    let from = DateTime::from_timestamp_millis(from_ms?)?;
    let to = DateTime::from_timestamp_millis(to_ms?)?;
    Some((to - from).num_seconds().max(0) as u64)
}
