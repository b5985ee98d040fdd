//! Keypoint detection: kinds, the provider trait and the lookup factory.

pub mod corner;
pub mod fast;
pub mod nms;
pub mod response;

use crate::image::ImageView;
use crate::util::{SweepError, SweepResult};
use std::fmt;
use std::str::FromStr;

/// A detected point of interest.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keypoint {
    /// X pixel coordinate (column).
    pub x: f32,
    /// Y pixel coordinate (row).
    pub y: f32,
    /// Neighborhood diameter in pixels, detector-defined.
    pub size: f32,
    /// Detector confidence; `None` for detectors that do not report one.
    pub response: Option<f32>,
}

/// Recognized detector kinds, named after the reference benchmark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DetectorKind {
    ShiTomasi,
    Harris,
    Fast,
    Brisk,
    Orb,
    Akaze,
    Sift,
}

impl DetectorKind {
    /// The benchmark name of the kind, used in result rows and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            DetectorKind::ShiTomasi => "SHITOMASI",
            DetectorKind::Harris => "HARRIS",
            DetectorKind::Fast => "FAST",
            DetectorKind::Brisk => "BRISK",
            DetectorKind::Orb => "ORB",
            DetectorKind::Akaze => "AKAZE",
            DetectorKind::Sift => "SIFT",
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DetectorKind {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SHITOMASI" => Ok(DetectorKind::ShiTomasi),
            "HARRIS" => Ok(DetectorKind::Harris),
            "FAST" => Ok(DetectorKind::Fast),
            "BRISK" => Ok(DetectorKind::Brisk),
            "ORB" => Ok(DetectorKind::Orb),
            "AKAZE" => Ok(DetectorKind::Akaze),
            "SIFT" => Ok(DetectorKind::Sift),
            _ => Err(SweepError::UnknownDetector {
                name: s.to_string(),
            }),
        }
    }
}

/// Capability provider: extracts keypoints from a grayscale image.
///
/// Implementations are opaque to the sweep engine; it only selects them by
/// kind and measures their wall-clock duration.
pub trait FeatureDetector: std::fmt::Debug {
    /// Detects keypoints in `image`. Detector-defined order, not sorted.
    fn detect(&self, image: ImageView<'_>) -> SweepResult<Vec<Keypoint>>;
}

/// Builds the provider for `kind`.
///
/// Kinds without a built-in provider fail here, at configuration-validation
/// time, never mid-sweep.
pub fn build_detector(kind: DetectorKind) -> SweepResult<Box<dyn FeatureDetector>> {
    match kind {
        DetectorKind::ShiTomasi => Ok(Box::new(corner::ShiTomasiDetector::default())),
        DetectorKind::Harris => Ok(Box::new(corner::HarrisDetector::default())),
        DetectorKind::Fast => Ok(Box::new(fast::FastDetector::default())),
        DetectorKind::Orb => Ok(Box::new(fast::FastDetector::orb())),
        DetectorKind::Brisk | DetectorKind::Akaze | DetectorKind::Sift => {
            Err(SweepError::ProviderUnavailable { kind: kind.name() })
        }
    }
}
