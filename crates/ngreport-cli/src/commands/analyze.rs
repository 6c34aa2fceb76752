use crate::OutputFormat;
use anyhow::Result;
use ngreport_core::analysis::aggregate;
use ngreport_core::log::LogReader;
use ngreport_core::report::{ReportBuilder, ReportRow, ReportWriter};
use serde::Serialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Options resolved from the command line and environment
#[derive(Debug, Clone, Default)]
pub struct ReportConfig {
    /// Keep only this many endpoints, slowest total time first.
    /// `None` keeps every endpoint in order of first appearance.
    pub report_size: Option<usize>,
    /// Write the JSON rows here instead of printing the report
    pub output: Option<PathBuf>,
}

/// Everything the renderers need for one log file
#[derive(Debug, Clone, Serialize)]
pub struct LogReport {
    pub file: String,
    pub total_requests: u64,
    pub total_time: f64,
    pub endpoints: usize,
    pub rows: Vec<ReportRow>,
}

/// Read a log file and build its report rows
pub fn analyze_log(file: &Path, report_size: Option<usize>) -> Result<LogReport> {
    tracing::debug!("Reading log file: {}", file.display());

    let mut entries = LogReader::from_file(file)?;
    let result = aggregate(entries.by_ref())?;
    tracing::debug!(
        "Read {} lines, {} matched",
        entries.lines_read(),
        result.total_requests()
    );

    let mut builder = ReportBuilder::new();
    if let Some(size) = report_size {
        builder = builder.with_limit(size)?;
    }
    let rows = builder.build(&result);

    Ok(LogReport {
        file: file.display().to_string(),
        total_requests: result.total_requests(),
        total_time: result.total_time(),
        endpoints: result.len(),
        rows,
    })
}

pub fn execute(file: &Path, config: &ReportConfig, format: OutputFormat) -> Result<()> {
    tracing::info!("Analyzing log file: {}", file.display());

    let report = analyze_log(file, config.report_size)?;

    if let Some(output) = &config.output {
        ReportWriter::to_file(&report.rows, output)?;
        return Ok(());
    }

    match format {
        OutputFormat::Json => output_json(&report)?,
        OutputFormat::Table => output_table(&report),
        OutputFormat::Pretty => output_pretty(&report),
    }

    Ok(())
}

fn output_pretty(report: &LogReport) {
    use console::style;

    println!("\n{}", style("Latency Report").bold().cyan());
    println!("{}", style("==============").cyan());

    println!("\n{}", style("Summary:").bold());
    println!("  File:            {}", report.file);
    println!("  Total Requests:  {}", report.total_requests);
    println!("  Endpoints:       {}", report.endpoints);
    println!("  Total Time:      {:.3} s", report.total_time);

    if report.rows.is_empty() {
        println!("\n  No matching log lines found");
        println!();
        return;
    }

    if report.rows.len() < report.endpoints {
        println!(
            "\n{}",
            style(format!(
                "Top {} Endpoints by Total Time:",
                report.rows.len()
            ))
            .bold()
        );
    } else {
        println!("\n{}", style("Endpoints:").bold());
    }

    for (i, row) in report.rows.iter().enumerate() {
        println!(
            "  {}. [{:.3} s, {}%] {} - {} requests ({}%), avg {:.3} s, med {:.3} s, max {:.3} s",
            i + 1,
            row.time_sum,
            row.time_pers,
            row.url,
            row.count,
            row.count_pers,
            row.time_avg,
            row.time_med,
            row.time_max
        );
    }

    println!(); // trailing newline
}

fn output_json(report: &LogReport) -> Result<()> {
    println!("{}", ReportWriter::to_string(&report.rows)?);
    Ok(())
}

fn output_table(report: &LogReport) {
    println!("url,count,count_pers,time_sum,time_pers,time_avg,time_max,time_med");
    for row in &report.rows {
        println!(
            "{},{},{},{},{},{},{},{}",
            csv_field(&row.url),
            row.count,
            row.count_pers,
            row.time_sum,
            row.time_pers,
            row.time_avg,
            row.time_max,
            row.time_med
        );
    }
}

/// Quote a CSV field when it holds a separator, quote or line break
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_quotes_when_needed() {
        assert_eq!(csv_field("/api/v2/banner/25019354"), "/api/v2/banner/25019354");
        assert_eq!(csv_field("/api?a=1,2"), "\"/api?a=1,2\"");
        assert_eq!(csv_field("/say\"hi\""), "\"/say\"\"hi\"\"\"");
    }
}
