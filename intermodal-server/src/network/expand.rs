//! Graph expansion from provider queries.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{Itinerary, Location, ModeSet, TransportMode};
use crate::provider::ItineraryProvider;

/// An origin-destination pair to plan between.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OdPair {
    pub origin: Location,
    pub destination: Location,
}

/// Itineraries gathered by one expansion round.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    pub itineraries: Vec<Itinerary>,
    /// Requests that failed or returned an empty itinerary.
    pub failures: usize,
}

/// Queries a provider for every pair, mode and direction.
pub struct Expander<'a, P> {
    provider: &'a P,
}

impl<'a, P: ItineraryProvider> Expander<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Fetch both directions of every pair with every mode in `modes`.
    ///
    /// Failed requests are logged and skipped.
    pub async fn expand(&self, pairs: &[OdPair], modes: ModeSet) -> Expansion {
        let requests: Vec<(Location, Location, TransportMode)> = pairs
            .iter()
            .flat_map(|pair| {
                modes.iter().flat_map(move |mode| {
                    [
                        (pair.origin, pair.destination, mode),
                        (pair.destination, pair.origin, mode),
                    ]
                })
            })
            .collect();

        let results = join_all(requests.iter().map(|&(origin, destination, mode)| {
            self.provider.fetch_itinerary(origin, destination, mode)
        }))
        .await;

        let mut expansion = Expansion::default();
        for (&(origin, destination, mode), result) in requests.iter().zip(results) {
            match result {
                Ok(itinerary) if !itinerary.is_empty() => expansion.itineraries.push(itinerary),
                Ok(_) => {
                    warn!(%origin, %destination, %mode, "Provider returned empty itinerary");
                    expansion.failures += 1;
                }
                Err(e) => {
                    warn!(%origin, %destination, %mode, error = %e, "Failed to fetch itinerary");
                    expansion.failures += 1;
                }
            }
        }

        debug!(
            requests = requests.len(),
            itineraries = expansion.itineraries.len(),
            failures = expansion.failures,
            "Expansion round complete"
        );

        expansion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::StraightLineProvider;

    fn pair(a: (f64, f64), b: (f64, f64)) -> OdPair {
        OdPair {
            origin: Location::new(a.0, a.1).unwrap(),
            destination: Location::new(b.0, b.1).unwrap(),
        }
    }

    #[tokio::test]
    async fn fetches_both_directions_per_mode() {
        let provider = StraightLineProvider::new();
        let pairs = [pair((50.0, 14.0), (50.1, 14.1)), pair((50.2, 14.0), (50.0, 14.3))];
        let modes: ModeSet = [TransportMode::Walk, TransportMode::Car].into_iter().collect();

        let expansion = Expander::new(&provider).expand(&pairs, modes).await;

        assert_eq!(provider.call_count(), 8);
        assert_eq!(expansion.itineraries.len(), 8);
        assert_eq!(expansion.failures, 0);

        let reversed = expansion
            .itineraries
            .iter()
            .any(|i| i.origin() == Some(pairs[0].destination));
        assert!(reversed);
    }

    #[tokio::test]
    async fn failures_are_skipped_and_counted() {
        let provider = StraightLineProvider::new().failing_for(TransportMode::Transit);
        let pairs = [pair((50.0, 14.0), (50.1, 14.1))];

        let expansion = Expander::new(&provider).expand(&pairs, ModeSet::all()).await;

        assert_eq!(provider.call_count(), 8);
        assert_eq!(expansion.itineraries.len(), 6);
        assert_eq!(expansion.failures, 2);
        assert!(
            expansion
                .itineraries
                .iter()
                .flat_map(|i| i.leaves())
                .all(|s| s.mode != TransportMode::Transit)
        );
    }

    #[tokio::test]
    async fn no_pairs_no_requests() {
        let provider = StraightLineProvider::new();
        let expansion = Expander::new(&provider).expand(&[], ModeSet::all()).await;

        assert!(expansion.itineraries.is_empty());
        assert_eq!(provider.call_count(), 0);
    }
}
