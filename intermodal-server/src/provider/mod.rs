//! Itinerary providers.
//!
//! A provider answers "how do I get from here to there using this mode?"
//! with a concrete itinerary. The graph is grown from provider answers, and
//! abstract graph paths are refined back into itineraries through them.
//!
//! - [`OtpClient`] queries an OpenTripPlanner instance.
//! - [`CachedProvider`] wraps any provider with a TTL cache.
//! - [`StraightLineProvider`] fabricates direct itineraries for local runs.

mod cache;
mod convert;
mod error;
mod mock;
mod otp;
mod types;

use std::future::Future;
use std::sync::Arc;

use crate::domain::{Itinerary, Location, TransportMode};

pub use cache::{CacheConfig, CachedProvider};
pub use convert::{ConversionError, convert_itinerary, convert_leg, otp_mode};
pub use error::ProviderError;
pub use mock::StraightLineProvider;
pub use otp::{OtpClient, OtpConfig, parse_plan};
pub use types::{OtpItinerary, OtpLeg, Place, PlanResponse, WalkStep};

/// Source of concrete itineraries.
///
/// This abstraction allows refinement and expansion to be tested with mock
/// data.
pub trait ItineraryProvider: Send + Sync {
    /// Fetch one itinerary from `origin` to `destination` using `mode`.
    fn fetch_itinerary(
        &self,
        origin: Location,
        destination: Location,
        mode: TransportMode,
    ) -> impl Future<Output = Result<Itinerary, ProviderError>> + Send;
}

impl<P: ItineraryProvider> ItineraryProvider for Arc<P> {
    fn fetch_itinerary(
        &self,
        origin: Location,
        destination: Location,
        mode: TransportMode,
    ) -> impl Future<Output = Result<Itinerary, ProviderError>> + Send {
        (**self).fetch_itinerary(origin, destination, mode)
    }
}
