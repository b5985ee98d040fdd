//! BRISK-style binary descriptor: concentric-ring sampling pattern.
//!
//! Sample points sit on four concentric rings around the keypoint plus the
//! center. Descriptor bits compare the smoothed intensities of
//! short-distance point pairs, the BRISK construction, so bits encode
//! local gradient direction between nearby samples rather than the
//! arbitrary offsets BRIEF uses. The pattern is fixed, so descriptors are
//! reproducible across runs.

use crate::describe::brief::smoothed;
use crate::describe::{DescriptorExtractor, Descriptors};
use crate::detect::Keypoint;
use crate::image::ImageView;
use crate::util::SweepResult;

/// Descriptor length in bits.
const NUM_BITS: usize = 256;
/// Descriptor width in bytes.
pub const ROW_BYTES: usize = NUM_BITS / 8;

/// Points per ring and ring radius in pixels, innermost first.
const RINGS: [(usize, f32); 4] = [(10, 3.0), (14, 6.0), (15, 9.0), (20, 12.0)];

/// Point pairs closer than this form descriptor bits.
const SHORT_PAIR_MAX: f32 = 9.0;

fn sampling_points() -> Vec<(f32, f32)> {
    let mut points = vec![(0.0f32, 0.0f32)];
    for (count, radius) in RINGS {
        for i in 0..count {
            let angle = 2.0 * std::f32::consts::PI * i as f32 / count as f32;
            points.push((radius * angle.cos(), radius * angle.sin()));
        }
    }
    points
}

/// Binary descriptor extractor over the concentric-ring pattern.
#[derive(Debug)]
pub struct BriskExtractor {
    pattern: Vec<(i32, i32, i32, i32)>,
}

impl Default for BriskExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl BriskExtractor {
    /// Builds the extractor with the fixed short-distance pair pattern.
    pub fn new() -> Self {
        let points = sampling_points();
        let mut pattern = Vec::with_capacity(NUM_BITS);
        'pairs: for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                let dx = points[i].0 - points[j].0;
                let dy = points[i].1 - points[j].1;
                if (dx * dx + dy * dy).sqrt() >= SHORT_PAIR_MAX {
                    continue;
                }
                pattern.push((
                    points[i].0.round() as i32,
                    points[i].1.round() as i32,
                    points[j].0.round() as i32,
                    points[j].1.round() as i32,
                ));
                if pattern.len() == NUM_BITS {
                    break 'pairs;
                }
            }
        }
        debug_assert_eq!(pattern.len(), NUM_BITS);
        Self { pattern }
    }
}

impl DescriptorExtractor for BriskExtractor {
    fn describe(&self, image: ImageView<'_>, keypoints: &[Keypoint]) -> SweepResult<Descriptors> {
        let mut data = Vec::with_capacity(keypoints.len() * ROW_BYTES);

        for kp in keypoints {
            let cx = kp.x.round() as i32;
            let cy = kp.y.round() as i32;
            let mut byte = 0u8;
            for (i, &(x0, y0, x1, y1)) in self.pattern.iter().enumerate() {
                let a = smoothed(image, cx, cy, x0, y0);
                let b = smoothed(image, cx, cy, x1, y1);
                byte <<= 1;
                if a < b {
                    byte |= 1;
                }
                if i % 8 == 7 {
                    data.push(byte);
                    byte = 0;
                }
            }
        }

        Ok(Descriptors::Binary {
            data,
            row_bytes: ROW_BYTES,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{BriskExtractor, ROW_BYTES};
    use crate::describe::brief::BriefExtractor;
    use crate::describe::DescriptorExtractor;
    use crate::detect::Keypoint;
    use crate::image::OwnedImage;

    fn textured_image(size: usize) -> OwnedImage {
        let data: Vec<u8> = (0..size * size)
            .map(|i| {
                let x = i % size;
                let y = i / size;
                (((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF) as u8
            })
            .collect();
        OwnedImage::new(data, size, size).unwrap()
    }

    fn kp(x: f32, y: f32) -> Keypoint {
        Keypoint {
            x,
            y,
            size: 12.0,
            response: None,
        }
    }

    #[test]
    fn pattern_fills_the_descriptor() {
        assert_eq!(BriskExtractor::new().pattern.len(), 256);
    }

    #[test]
    fn one_row_per_keypoint() {
        let img = textured_image(64);
        let kps = [kp(20.0, 20.0), kp(40.0, 30.0)];
        let desc = BriskExtractor::new().describe(img.view(), &kps).unwrap();
        assert_eq!(desc.rows(), 2);
        assert_eq!(desc.binary_row(0).unwrap().len(), ROW_BYTES);
    }

    #[test]
    fn descriptors_are_deterministic() {
        let img = textured_image(64);
        let kps = [kp(32.0, 32.0)];
        let a = BriskExtractor::new().describe(img.view(), &kps).unwrap();
        let b = BriskExtractor::new().describe(img.view(), &kps).unwrap();
        assert_eq!(a.binary_row(0), b.binary_row(0));
    }

    #[test]
    fn differs_from_brief_pattern() {
        let img = textured_image(64);
        let kps = [kp(32.0, 32.0)];
        let brisk = BriskExtractor::new().describe(img.view(), &kps).unwrap();
        let brief = BriefExtractor::brief().describe(img.view(), &kps).unwrap();
        assert_ne!(brisk.binary_row(0), brief.binary_row(0));
    }

    #[test]
    fn empty_keypoints_give_empty_matrix() {
        let img = textured_image(64);
        let desc = BriskExtractor::new().describe(img.view(), &[]).unwrap();
        assert!(desc.is_empty());
    }
}
