use serde::{Deserialize, Serialize};

/// One (endpoint, latency) observation extracted from an access log line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Request target, e.g. `/api/v2/banner/25019354`
    pub endpoint: String,
    /// Request processing time in seconds
    pub latency: f64,
}

impl LogEntry {
    pub fn new(endpoint: impl Into<String>, latency: f64) -> Self {
        Self {
            endpoint: endpoint.into(),
            latency,
        }
    }
}
