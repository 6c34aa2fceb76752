mod matcher;
mod reader;
mod types;

pub use matcher::LineMatcher;
pub use reader::{Gzip, LineSource, LogEntries, LogReader, PlainText, source_for};
pub use types::LogEntry;
