//! Keypoint description: kinds, the descriptor matrix and the factory.

pub mod brief;
pub mod brisk;
pub mod hog;

use crate::detect::Keypoint;
use crate::image::ImageView;
use crate::util::{SweepError, SweepResult};
use std::fmt;
use std::str::FromStr;

/// Distance family of a descriptor kind.
///
/// Binary descriptors are compared with Hamming distance; gradient-
/// histogram descriptors with Euclidean distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DescriptorFamily {
    Binary,
    Hog,
}

/// Recognized descriptor kinds, named after the reference benchmark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    Brisk,
    Brief,
    Orb,
    Freak,
    Akaze,
    Sift,
}

impl DescriptorKind {
    /// The benchmark name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            DescriptorKind::Brisk => "BRISK",
            DescriptorKind::Brief => "BRIEF",
            DescriptorKind::Orb => "ORB",
            DescriptorKind::Freak => "FREAK",
            DescriptorKind::Akaze => "AKAZE",
            DescriptorKind::Sift => "SIFT",
        }
    }

    /// Distance family used when matching this kind.
    pub fn family(&self) -> DescriptorFamily {
        match self {
            DescriptorKind::Sift => DescriptorFamily::Hog,
            _ => DescriptorFamily::Binary,
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DescriptorKind {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BRISK" => Ok(DescriptorKind::Brisk),
            "BRIEF" => Ok(DescriptorKind::Brief),
            "ORB" => Ok(DescriptorKind::Orb),
            "FREAK" => Ok(DescriptorKind::Freak),
            "AKAZE" => Ok(DescriptorKind::Akaze),
            "SIFT" => Ok(DescriptorKind::Sift),
            _ => Err(SweepError::UnknownDescriptor {
                name: s.to_string(),
            }),
        }
    }
}

/// Descriptor matrix with rows aligned 1:1 with a keypoint sequence.
#[derive(Clone, Debug)]
pub enum Descriptors {
    /// Packed bit descriptors, `row_bytes` bytes per row.
    Binary { data: Vec<u8>, row_bytes: usize },
    /// Dense float descriptors, `row_len` elements per row.
    Float { data: Vec<f32>, row_len: usize },
}

impl Descriptors {
    /// Empty binary matrix with the given row width.
    pub fn empty_binary(row_bytes: usize) -> Self {
        Descriptors::Binary {
            data: Vec::new(),
            row_bytes,
        }
    }

    /// Empty float matrix with the given row width.
    pub fn empty_float(row_len: usize) -> Self {
        Descriptors::Float {
            data: Vec::new(),
            row_len,
        }
    }

    /// Number of descriptor rows.
    pub fn rows(&self) -> usize {
        match self {
            Descriptors::Binary { data, row_bytes } => {
                if *row_bytes == 0 {
                    0
                } else {
                    data.len() / row_bytes
                }
            }
            Descriptors::Float { data, row_len } => {
                if *row_len == 0 {
                    0
                } else {
                    data.len() / row_len
                }
            }
        }
    }

    /// True when the matrix holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows() == 0
    }

    /// Distance family of the stored descriptors.
    pub fn family(&self) -> DescriptorFamily {
        match self {
            Descriptors::Binary { .. } => DescriptorFamily::Binary,
            Descriptors::Float { .. } => DescriptorFamily::Hog,
        }
    }

    /// The `i`-th binary row; `None` for float matrices or out of range.
    pub fn binary_row(&self, i: usize) -> Option<&[u8]> {
        match self {
            Descriptors::Binary { data, row_bytes } => data.get(i * row_bytes..(i + 1) * row_bytes),
            Descriptors::Float { .. } => None,
        }
    }

    /// The `i`-th float row; `None` for binary matrices or out of range.
    pub fn float_row(&self, i: usize) -> Option<&[f32]> {
        match self {
            Descriptors::Float { data, row_len } => data.get(i * row_len..(i + 1) * row_len),
            Descriptors::Binary { .. } => None,
        }
    }
}

/// Capability provider: computes descriptors for a keypoint sequence.
///
/// The returned matrix always has exactly one row per input keypoint, in
/// input order; border keypoints sample clamped pixels rather than being
/// dropped, so row/keypoint alignment is preserved.
pub trait DescriptorExtractor: std::fmt::Debug {
    /// Describes `keypoints` over `image`.
    fn describe(&self, image: ImageView<'_>, keypoints: &[Keypoint]) -> SweepResult<Descriptors>;
}

/// Builds the provider for `kind`; unavailable kinds fail at
/// configuration-validation time.
pub fn build_extractor(kind: DescriptorKind) -> SweepResult<Box<dyn DescriptorExtractor>> {
    match kind {
        DescriptorKind::Brisk => Ok(Box::new(brisk::BriskExtractor::new())),
        DescriptorKind::Brief => Ok(Box::new(brief::BriefExtractor::brief())),
        DescriptorKind::Orb => Ok(Box::new(brief::BriefExtractor::orb())),
        DescriptorKind::Sift => Ok(Box::new(hog::HogExtractor::default())),
        DescriptorKind::Freak | DescriptorKind::Akaze => {
            Err(SweepError::ProviderUnavailable { kind: kind.name() })
        }
    }
}
