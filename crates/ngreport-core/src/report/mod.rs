mod writer;

pub use writer::ReportWriter;

use crate::analysis::stats::round3;
use crate::analysis::{AggregationResult, EndpointStats};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default number of rows kept in a ranked report
pub const DEFAULT_REPORT_SIZE: usize = 1000;

/// One row of the report table, keyed the way the report page expects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub url: String,
    pub count: u64,
    pub count_pers: f64,
    pub time_sum: f64,
    pub time_pers: f64,
    pub time_avg: f64,
    pub time_max: f64,
    pub time_med: f64,
}

impl ReportRow {
    pub fn new(url: &str, stats: &EndpointStats) -> Self {
        Self {
            url: url.to_string(),
            count: stats.count,
            count_pers: stats.count_share,
            time_sum: round3(stats.time_sum),
            time_pers: stats.time_share,
            time_avg: stats.time_avg,
            time_max: stats.time_max,
            time_med: stats.time_median,
        }
    }
}

/// Flattens aggregation results into report rows.
///
/// Without a limit rows keep the order in which endpoints first appeared.
/// With a limit only the endpoints with the largest total time are kept,
/// slowest first.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    limit: Option<usize>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the `limit` endpoints with the largest `time_sum`
    pub fn with_limit(mut self, limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(Error::Report(
                "Report size must be at least 1".to_string(),
            ));
        }
        self.limit = Some(limit);
        Ok(self)
    }

    pub fn build(&self, result: &AggregationResult) -> Vec<ReportRow> {
        let mut rows: Vec<(&str, &EndpointStats)> = result.iter().collect();

        if let Some(limit) = self.limit {
            // stable sort, ties keep first-appearance order
            rows.sort_by(|(_, a), (_, b)| b.time_sum.total_cmp(&a.time_sum));
            rows.truncate(limit);
        }

        tracing::debug!(
            "Built {} report rows from {} endpoints",
            rows.len(),
            result.len()
        );

        rows.into_iter()
            .map(|(url, stats)| ReportRow::new(url, stats))
            .collect()
    }
}
