//! Search configuration for the journey planner.

/// Configuration parameters for path search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Seed candidates taken from the all-nodes index when the request
    /// does not restrict modes.
    pub candidate_count: usize,

    /// Seed candidates taken from each allowed mode's index when the
    /// request restricts modes.
    pub candidates_per_mode: usize,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(candidate_count: usize, candidates_per_mode: usize) -> Self {
        Self {
            candidate_count,
            candidates_per_mode,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            candidate_count: 5,
            candidates_per_mode: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SearchConfig::default();

        assert_eq!(config.candidate_count, 5);
        assert_eq!(config.candidates_per_mode, 2);
    }

    #[test]
    fn custom_config() {
        let config = SearchConfig::new(8, 1);

        assert_eq!(config.candidate_count, 8);
        assert_eq!(config.candidates_per_mode, 1);
    }
}
