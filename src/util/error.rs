//! Error types for featsweep.

use thiserror::Error;

/// Result alias for featsweep operations.
pub type SweepResult<T> = std::result::Result<T, SweepError>;

/// Errors that can occur while configuring or running a benchmark sweep.
#[derive(Debug, Error, PartialEq)]
pub enum SweepError {
    /// Zero-sized image or response map.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Backing buffer is shorter than the declared geometry requires.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Row stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// An image file could not be loaded or decoded. Fatal for the sweep.
    #[error("failed to load image '{path}': {reason}")]
    ImageIo { path: String, reason: String },
    /// A detector name outside the recognized set was requested.
    #[error("unknown detector kind '{name}'")]
    UnknownDetector { name: String },
    /// A descriptor name outside the recognized set was requested.
    #[error("unknown descriptor kind '{name}'")]
    UnknownDescriptor { name: String },
    /// A matcher name outside the recognized set was requested.
    #[error("unknown matcher kind '{name}'")]
    UnknownMatcher { name: String },
    /// A selector name outside the recognized set was requested.
    #[error("unknown selector kind '{name}'")]
    UnknownSelector { name: String },
    /// The kind is recognized but has no built-in provider.
    #[error("no built-in provider for {kind}")]
    ProviderUnavailable { kind: &'static str },
    /// Source and reference descriptor matrices use different element types.
    #[error("descriptor family mismatch between source and reference")]
    DescriptorFamilyMismatch,
    /// The result sink failed to write a row.
    #[error("output write failed: {reason}")]
    Sink { reason: String },
    /// Descriptor matrices being matched have different row widths.
    #[error("descriptor width mismatch: source {src}, reference {reference}")]
    DescriptorWidthMismatch { src: usize, reference: usize },
    /// A pipeline stage failed; carries the configuration and frame index
    /// so the diagnostic identifies where in the sweep the error occurred.
    #[error("sweep failed (detector {detector}, descriptor {descriptor}, frame {frame_index}): {source}")]
    Stage {
        detector: &'static str,
        descriptor: &'static str,
        frame_index: usize,
        #[source]
        source: Box<SweepError>,
    },
}

impl SweepError {
    /// Wraps an error with the configuration and frame it occurred in.
    pub fn in_stage(
        self,
        detector: &'static str,
        descriptor: &'static str,
        frame_index: usize,
    ) -> Self {
        SweepError::Stage {
            detector,
            descriptor,
            frame_index,
            source: Box::new(self),
        }
    }
}
