pub mod analysis;
pub mod error;
pub mod log;
pub mod report;

pub use error::{Error, Result};
