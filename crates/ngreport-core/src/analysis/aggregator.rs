use super::stats::{max, median, round3};
use super::{AggregationResult, EndpointStats};
use crate::Result;
use crate::log::LogEntry;
use std::collections::HashMap;

/// Running totals for one endpoint, only alive during the pass
#[derive(Default)]
struct Accumulator {
    count: u64,
    time_sum: f64,
    latencies: Vec<f64>,
}

impl Accumulator {
    fn record(&mut self, latency: f64) {
        self.count += 1;
        self.time_sum += latency;
        self.latencies.push(latency);
    }

    fn finalize(mut self, total_requests: u64, total_time: f64) -> EndpointStats {
        let time_share = if total_time > 0.0 {
            round3(self.time_sum / total_time * 100.0)
        } else {
            0.0
        };

        EndpointStats {
            count: self.count,
            count_share: round3(self.count as f64 / total_requests as f64 * 100.0),
            time_sum: self.time_sum,
            time_share,
            time_avg: round3(self.time_sum / self.count as f64),
            time_max: round3(max(&self.latencies).unwrap_or_default()),
            time_median: round3(median(&mut self.latencies).unwrap_or_default()),
        }
    }
}

/// Builds per-endpoint statistics from a single pass over log entries
#[derive(Default)]
pub struct Aggregator {
    index: HashMap<String, usize>,
    accumulators: Vec<(String, Accumulator)>,
    total_requests: u64,
    total_time: f64,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: LogEntry) {
        let slot = match self.index.get(&entry.endpoint) {
            Some(&slot) => slot,
            None => {
                let slot = self.accumulators.len();
                self.index.insert(entry.endpoint.clone(), slot);
                self.accumulators
                    .push((entry.endpoint, Accumulator::default()));
                slot
            }
        };

        self.accumulators[slot].1.record(entry.latency);
        self.total_requests += 1;
        self.total_time += entry.latency;
    }

    /// Requests recorded so far
    pub fn total_requests(&self) -> u64 {
        self.total_requests
    }

    /// Compute shares, averages, maxima and medians once all entries are in.
    /// An aggregator that saw no entries finishes into an empty result.
    pub fn finish(self) -> AggregationResult {
        if self.total_requests == 0 {
            return AggregationResult::default();
        }

        let total_requests = self.total_requests;
        let total_time = self.total_time;
        let endpoints = self
            .accumulators
            .into_iter()
            .map(|(endpoint, acc)| (endpoint, acc.finalize(total_requests, total_time)))
            .collect();

        AggregationResult::new(endpoints, total_requests, total_time)
    }
}

/// Drain a stream of entries into per-endpoint statistics.
///
/// The first error from the stream aborts the aggregation and is returned.
pub fn aggregate<I>(entries: I) -> Result<AggregationResult>
where
    I: IntoIterator<Item = Result<LogEntry>>,
{
    tracing::debug!("Aggregating log entries");

    let mut aggregator = Aggregator::new();
    for entry in entries {
        aggregator.push(entry?);
    }

    let result = aggregator.finish();
    if result.is_empty() {
        tracing::warn!("No matching log lines found");
    } else {
        tracing::info!(
            "Aggregation complete: {} requests across {} endpoints, total time {:.3}s",
            result.total_requests(),
            result.len(),
            result.total_time()
        );
    }

    Ok(result)
}
