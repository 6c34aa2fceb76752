mod aggregator;
pub mod stats;

pub use aggregator::{Aggregator, aggregate};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Finalized latency statistics for one endpoint.
///
/// Shares are percentages of the whole log. All derived values are rounded
/// to 3 decimal places; `time_sum` is kept unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointStats {
    pub count: u64,
    pub count_share: f64,
    pub time_sum: f64,
    pub time_share: f64,
    pub time_avg: f64,
    pub time_max: f64,
    pub time_median: f64,
}

/// Per-endpoint statistics of one log, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationResult {
    endpoints: Vec<(String, EndpointStats)>,
    index: HashMap<String, usize>,
    total_requests: u64,
    total_time: f64,
}

impl AggregationResult {
    pub(crate) fn new(
        endpoints: Vec<(String, EndpointStats)>,
        total_requests: u64,
        total_time: f64,
    ) -> Self {
        let index = endpoints
            .iter()
            .enumerate()
            .map(|(i, (endpoint, _))| (endpoint.clone(), i))
            .collect();

        Self {
            endpoints,
            index,
            total_requests,
            total_time,
        }
    }

    pub fn get(&self, endpoint: &str) -> Option<&EndpointStats> {
        self.index.get(endpoint).map(|&i| &self.endpoints[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EndpointStats)> {
        self.endpoints
            .iter()
            .map(|(endpoint, stats)| (endpoint.as_str(), stats))
    }

    /// Number of distinct endpoints
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Matched requests across all endpoints
    pub fn total_requests(&self) -> u64 {
        self.total_requests
    }

    /// Sum of all latencies, in seconds
    pub fn total_time(&self) -> f64 {
        self.total_time
    }
}
