use super::ReportRow;
use crate::Result;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct ReportWriter;

impl ReportWriter {
    /// Write report rows as a JSON array to a file, creating parent
    /// directories as needed
    pub fn to_file(rows: &[ReportRow], path: &Path) -> Result<()> {
        tracing::debug!("Writing report to: {}", path.display());

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, rows)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        tracing::info!(
            "Successfully wrote report with {} rows to {}",
            rows.len(),
            path.display()
        );

        Ok(())
    }

    /// Convert report rows to a pretty JSON string
    pub fn to_string(rows: &[ReportRow]) -> Result<String> {
        Ok(serde_json::to_string_pretty(rows)?)
    }

    /// Convert report rows to a compact JSON string, the form embedded
    /// into report pages
    pub fn to_string_compact(rows: &[ReportRow]) -> Result<String> {
        Ok(serde_json::to_string(rows)?)
    }
}
