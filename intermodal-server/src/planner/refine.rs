//! Refinement of graph paths into concrete itineraries.
//!
//! A graph path only records which mode connects which nodes. Refinement
//! groups consecutive edges of the same mode into runs and asks a provider
//! for a real itinerary covering each run.

use futures::future::join_all;
use tracing::debug;

use crate::domain::{Itinerary, Location, TransportMode};
use crate::graph::{Graph, GraphEdge, GraphError, NodeId};
use crate::provider::{ItineraryProvider, ProviderError};

/// Error from refinement.
#[derive(Debug, thiserror::Error)]
pub enum RefineError {
    /// The provider could not cover one run of the path
    #[error("no {mode} itinerary from {from} to {to}: {source}")]
    RefinementGap {
        mode: TransportMode,
        from: Location,
        to: Location,
        #[source]
        source: ProviderError,
    },

    /// The path refers to nodes missing from the graph
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// A maximal stretch of consecutive edges sharing one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeRun {
    pub mode: TransportMode,
    /// Start of the first edge.
    pub from: NodeId,
    /// End of the last edge.
    pub to: NodeId,
    pub edge_count: usize,
}

/// Split a path into maximal same-mode runs, in travel order.
pub fn mode_runs(edges: &[GraphEdge]) -> Vec<ModeRun> {
    let mut runs: Vec<ModeRun> = Vec::new();
    for edge in edges {
        match runs.last_mut() {
            Some(run) if run.mode == edge.mode => {
                run.to = edge.to;
                run.edge_count += 1;
            }
            _ => runs.push(ModeRun {
                mode: edge.mode,
                from: edge.from,
                to: edge.to,
                edge_count: 1,
            }),
        }
    }
    runs
}

/// Turns graph paths into itineraries using a provider.
pub struct Refiner<'a, P> {
    graph: &'a Graph,
    provider: &'a P,
}

impl<'a, P: ItineraryProvider> Refiner<'a, P> {
    pub fn new(graph: &'a Graph, provider: &'a P) -> Self {
        Self { graph, provider }
    }

    /// Fetch one itinerary per mode run and concatenate them.
    ///
    /// Runs are fetched concurrently. If any run fails, the whole refinement
    /// fails with the first failing run in travel order.
    pub async fn refine(&self, edges: &[GraphEdge]) -> Result<Itinerary, RefineError> {
        let runs = mode_runs(edges);
        if runs.is_empty() {
            return Ok(Itinerary::empty());
        }

        let endpoints = runs
            .iter()
            .map(|run| {
                Ok((
                    self.graph.node(run.from)?.location,
                    self.graph.node(run.to)?.location,
                ))
            })
            .collect::<Result<Vec<_>, GraphError>>()?;

        let fetches = runs
            .iter()
            .zip(&endpoints)
            .map(|(run, &(from, to))| self.provider.fetch_itinerary(from, to, run.mode));
        let results = join_all(fetches).await;

        let mut itinerary = Itinerary::empty();
        for ((run, &(from, to)), result) in runs.iter().zip(&endpoints).zip(results) {
            let part = result.map_err(|source| RefineError::RefinementGap {
                mode: run.mode,
                from,
                to,
                source,
            })?;
            itinerary.extend(part);
        }

        debug!(
            runs = runs.len(),
            legs = itinerary.legs.len(),
            duration_secs = itinerary.duration_secs(),
            "Refined path"
        );

        Ok(itinerary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Leg;
    use crate::provider::StraightLineProvider;
    use std::sync::Mutex;
    use TransportMode::*;

    fn point(i: u32) -> Location {
        Location::new(50.0 + f64::from(i) * 0.01, 14.0).unwrap()
    }

    /// Provider that records every request and answers with a fixed
    /// two-leaf itinerary, so tests can check legs are passed through.
    struct RecordingProvider {
        calls: Mutex<Vec<(Location, Location, TransportMode)>>,
    }

    impl RecordingProvider {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(Location, Location, TransportMode)> {
            self.calls.lock().unwrap().clone()
        }

        fn answer(origin: Location, destination: Location, mode: TransportMode) -> Itinerary {
            let midpoint = Location::new(
                (origin.lat() + destination.lat()) / 2.0,
                (origin.lon() + destination.lon()) / 2.0,
            )
            .unwrap();
            Itinerary::new(vec![Leg::Composite {
                steps: vec![
                    Leg::leaf(origin, midpoint, 11, mode),
                    Leg::leaf(midpoint, destination, 13, mode),
                ],
            }])
        }
    }

    impl ItineraryProvider for RecordingProvider {
        async fn fetch_itinerary(
            &self,
            origin: Location,
            destination: Location,
            mode: TransportMode,
        ) -> Result<Itinerary, ProviderError> {
            self.calls.lock().unwrap().push((origin, destination, mode));
            Ok(Self::answer(origin, destination, mode))
        }
    }

    fn path_graph(edges: &[(u32, u32, TransportMode)]) -> (Graph, Vec<GraphEdge>) {
        let mut graph = Graph::new();
        for &(from, to, mode) in edges {
            graph.add_leg(&Leg::leaf(point(from), point(to), 60, mode));
        }
        let path = edges
            .iter()
            .map(|&(from, to, mode)| GraphEdge {
                from: graph.find_node(&point(from)).unwrap(),
                to: graph.find_node(&point(to)).unwrap(),
                mode,
                duration_secs: 60,
            })
            .collect();
        (graph, path)
    }

    #[test]
    fn runs_group_consecutive_modes() {
        let (_, path) = path_graph(&[
            (0, 1, Walk),
            (1, 2, Transit),
            (2, 3, Transit),
            (3, 4, Walk),
            (4, 5, Walk),
        ]);

        let runs = mode_runs(&path);
        let summary: Vec<_> = runs.iter().map(|r| (r.mode, r.edge_count)).collect();
        assert_eq!(summary, vec![(Walk, 1), (Transit, 2), (Walk, 2)]);
        assert_eq!(runs[1].from, path[1].from);
        assert_eq!(runs[1].to, path[2].to);
    }

    #[test]
    fn no_edges_no_runs() {
        assert!(mode_runs(&[]).is_empty());
    }

    #[tokio::test]
    async fn single_run_makes_one_call_with_run_endpoints() {
        let (graph, path) = path_graph(&[(0, 1, Car), (1, 2, Car), (2, 3, Car)]);
        let provider = RecordingProvider::new();

        let itinerary = Refiner::new(&graph, &provider).refine(&path).await.unwrap();

        assert_eq!(provider.calls(), vec![(point(0), point(3), Car)]);
        assert_eq!(itinerary, RecordingProvider::answer(point(0), point(3), Car));
    }

    #[tokio::test]
    async fn runs_are_concatenated_in_order() {
        let (graph, path) = path_graph(&[(0, 1, Walk), (1, 2, Transit), (2, 3, Walk)]);
        let provider = RecordingProvider::new();

        let itinerary = Refiner::new(&graph, &provider).refine(&path).await.unwrap();

        let mut calls = provider.calls();
        calls.sort_by_key(|(from, _, _)| from.lat_e3());
        assert_eq!(
            calls,
            vec![
                (point(0), point(1), Walk),
                (point(1), point(2), Transit),
                (point(2), point(3), Walk),
            ]
        );

        let modes: Vec<_> = itinerary.leaves().map(|s| s.mode).collect();
        assert_eq!(modes, vec![Walk, Walk, Transit, Transit, Walk, Walk]);
        assert_eq!(itinerary.origin(), Some(point(0)));
        assert_eq!(itinerary.destination(), Some(point(3)));
    }

    #[tokio::test]
    async fn empty_path_refines_to_empty_itinerary() {
        let graph = Graph::new();
        let provider = RecordingProvider::new();

        let itinerary = Refiner::new(&graph, &provider).refine(&[]).await.unwrap();

        assert!(itinerary.is_empty());
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn failing_run_fails_whole_refinement() {
        let (graph, path) = path_graph(&[(0, 1, Walk), (1, 2, Transit), (2, 3, Walk)]);
        let provider = StraightLineProvider::new().failing_for(Transit);

        let err = Refiner::new(&graph, &provider)
            .refine(&path)
            .await
            .unwrap_err();

        match err {
            RefineError::RefinementGap { mode, from, to, .. } => {
                assert_eq!(mode, Transit);
                assert_eq!(from, point(1));
                assert_eq!(to, point(2));
            }
            other => panic!("expected RefinementGap, got {other:?}"),
        }
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn unknown_node_is_graph_error() {
        let graph = Graph::new();
        let provider = RecordingProvider::new();
        let path = [GraphEdge {
            from: NodeId(0),
            to: NodeId(1),
            mode: Walk,
            duration_secs: 1,
        }];

        let err = Refiner::new(&graph, &provider)
            .refine(&path)
            .await
            .unwrap_err();
        assert!(matches!(err, RefineError::Graph(_)));
    }
}
