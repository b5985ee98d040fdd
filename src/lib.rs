//! FeatSweep benchmarks keypoint detection/description/matching pipelines
//! over a grayscale image sequence.
//!
//! The crate provides a hand-rolled corner-response NMS detector, a set of
//! pure-Rust capability providers selected by name, and a sweep engine that
//! iterates detector×descriptor configurations over a bounded sliding frame
//! window, timing each pipeline stage and emitting one tabular result row
//! per processed frame.

pub mod describe;
pub mod detect;
pub mod frame;
pub mod image;
pub mod matching;
pub mod sequence;
pub mod sweep;
pub mod util;

pub use image::{ImageView, OwnedImage};
pub use util::stats::SizeStats;
pub use util::{SweepError, SweepResult};

pub use detect::nms::NmsDetector;
pub use detect::response::ResponseMap;
pub use detect::{DetectorKind, FeatureDetector, Keypoint};

pub use describe::{DescriptorExtractor, DescriptorFamily, DescriptorKind, Descriptors};
pub use matching::{DescriptorMatch, MatcherKind, SelectorKind};

pub use frame::{Frame, FrameWindow};
pub use sequence::{FrameSource, SequenceLayout};
pub use sweep::report::{CsvSink, MemorySink, ResultRow, ResultSink};
pub use sweep::{is_compatible, Configuration, RegionOfInterest, SweepConfig, SweepEngine};
