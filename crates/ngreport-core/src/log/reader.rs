use super::matcher::LineMatcher;
use super::types::LogEntry;
use crate::{Error, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::iter::FusedIterator;
use std::path::Path;

/// Suffix that selects the gzip strategy
const GZIP_EXTENSION: &str = "gz";

/// A way of opening a log file as a stream of text lines
pub trait LineSource {
    fn name(&self) -> &'static str;

    fn open(&self, path: &Path) -> Result<Box<dyn BufRead + Send>>;
}

/// Uncompressed log files
pub struct PlainText;

impl LineSource for PlainText {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn BufRead + Send>> {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Gzip-compressed log files (rotated logs, possibly multi-member)
pub struct Gzip;

impl LineSource for Gzip {
    fn name(&self) -> &'static str {
        "gzip"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn BufRead + Send>> {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    }
}

/// Pick the line source for a path by looking at its suffix
pub fn source_for(path: &Path) -> &'static dyn LineSource {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(GZIP_EXTENSION) => &Gzip,
        _ => &PlainText,
    }
}

pub struct LogReader;

impl LogReader {
    /// Open a log file and stream the entries of every well-formed line.
    ///
    /// Files ending in `.gz` are decompressed on the fly. Failing to open
    /// the file is reported here; read errors surface from the iterator.
    pub fn from_file(path: &Path) -> Result<LogEntries<Box<dyn BufRead + Send>>> {
        let source = source_for(path);
        tracing::debug!(
            "Reading {} log file from: {}",
            source.name(),
            path.display()
        );

        let reader = source.open(path)?;
        Ok(LogEntries::new(reader))
    }

    /// Stream entries from an already opened reader
    pub fn from_reader<R: BufRead>(reader: R) -> LogEntries<R> {
        LogEntries::new(reader)
    }
}

/// Lazy iterator over the entries of a log stream.
///
/// Lines that do not match are skipped. The first I/O or decoding error is
/// yielded once and ends the iteration. The underlying reader is dropped as
/// soon as the stream ends, or when the iterator itself is dropped.
pub struct LogEntries<R> {
    reader: Option<R>,
    buf: Vec<u8>,
    line_number: usize,
}

impl<R: BufRead> LogEntries<R> {
    fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            buf: Vec::new(),
            line_number: 0,
        }
    }

    /// Number of lines read so far, matched or not
    pub fn lines_read(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead> Iterator for LogEntries<R> {
    type Item = Result<LogEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let reader = self.reader.as_mut()?;

            self.buf.clear();
            match reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    tracing::debug!("Reached end of log after {} lines", self.line_number);
                    self.reader = None;
                    return None;
                }
                Ok(_) => {
                    self.line_number += 1;
                    let line = match std::str::from_utf8(&self.buf) {
                        Ok(line) => line,
                        Err(_) => {
                            self.reader = None;
                            return Some(Err(Error::InvalidUtf8 {
                                line: self.line_number,
                            }));
                        }
                    };
                    if let Some(entry) = LineMatcher::match_line(line) {
                        return Some(Ok(entry));
                    }
                }
                Err(e) => {
                    self.reader = None;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}

impl<R: BufRead> FusedIterator for LogEntries<R> {}
