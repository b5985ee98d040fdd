//! Result rows and tabular output sinks.

use crate::util::{SweepError, SweepResult};
use std::io::Write;

/// Column header of the result table. Column order and presence are part
/// of the contract for downstream analysis tooling.
pub const CSV_HEADER: &str = "detector,descriptor,frame,detect_s,raw_keypoints,roi_keypoints,\
size_mean,size_stddev,describe_s,matches,total_s";

/// One record per (configuration, frame).
#[derive(Clone, Debug)]
pub struct ResultRow {
    pub detector: &'static str,
    pub descriptor: &'static str,
    pub frame_index: usize,
    /// Detection stage duration in seconds.
    pub detect_seconds: f64,
    /// Keypoint count before the region filter.
    pub raw_keypoints: usize,
    /// Keypoint count after the region filter.
    pub roi_keypoints: usize,
    /// Mean neighborhood size; NaN when no keypoints survived the filter.
    pub size_mean: f32,
    /// Population standard deviation of neighborhood sizes; NaN when empty.
    pub size_std_dev: f32,
    /// Description stage duration in seconds.
    pub describe_seconds: f64,
    /// Accepted matches against the previous frame; zero on the first
    /// frame of a configuration.
    pub match_count: usize,
    /// Sum of the three stage durations in seconds.
    pub total_seconds: f64,
}

impl ResultRow {
    /// Formats the row as one CSV line (without trailing newline).
    pub fn to_csv(&self) -> String {
        format!(
            "{},{},{},{:.6},{},{},{:.4},{:.4},{:.6},{},{:.6}",
            self.detector,
            self.descriptor,
            self.frame_index,
            self.detect_seconds,
            self.raw_keypoints,
            self.roi_keypoints,
            self.size_mean,
            self.size_std_dev,
            self.describe_seconds,
            self.match_count,
            self.total_seconds,
        )
    }
}

/// Destination for result rows, one per processed frame.
pub trait ResultSink {
    /// Appends one row to the output.
    fn append(&mut self, row: &ResultRow) -> SweepResult<()>;
}

/// CSV sink writing a header row followed by one line per result row.
pub struct CsvSink<W: Write> {
    writer: W,
    header_written: bool,
}

impl<W: Write> CsvSink<W> {
    /// Creates a sink over any writer; the header is emitted before the
    /// first row.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
        }
    }

    /// Consumes the sink and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultSink for CsvSink<W> {
    fn append(&mut self, row: &ResultRow) -> SweepResult<()> {
        let io_err = |err: std::io::Error| SweepError::Sink {
            reason: err.to_string(),
        };
        if !self.header_written {
            writeln!(self.writer, "{CSV_HEADER}").map_err(io_err)?;
            self.header_written = true;
        }
        writeln!(self.writer, "{}", row.to_csv()).map_err(io_err)
    }
}

/// In-memory sink collecting rows, used by tests and programmatic callers.
#[derive(Default)]
pub struct MemorySink {
    pub rows: Vec<ResultRow>,
}

impl ResultSink for MemorySink {
    fn append(&mut self, row: &ResultRow) -> SweepResult<()> {
        self.rows.push(row.clone());
        Ok(())
    }
}
