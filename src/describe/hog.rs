//! Gradient-orientation histogram descriptor (SIFT-style, 128-d).
//!
//! A 16x16 patch around the keypoint is split into a 4x4 grid of cells;
//! each cell accumulates an 8-bin histogram of gradient orientations
//! weighted by gradient magnitude. The concatenated histograms are
//! L2-normalized, clamped at 0.2 and renormalized, the usual illumination
//! robustness step.

use crate::describe::{DescriptorExtractor, Descriptors};
use crate::detect::Keypoint;
use crate::image::ImageView;
use crate::util::SweepResult;

const PATCH: i32 = 16;
const CELLS: usize = 4;
const BINS: usize = 8;
/// Descriptor length: 4x4 cells x 8 orientation bins.
pub const ROW_LEN: usize = CELLS * CELLS * BINS;

/// Float descriptor extractor over gradient-orientation histograms.
#[derive(Debug, Default)]
pub struct HogExtractor;

impl DescriptorExtractor for HogExtractor {
    fn describe(&self, image: ImageView<'_>, keypoints: &[Keypoint]) -> SweepResult<Descriptors> {
        let mut data = Vec::with_capacity(keypoints.len() * ROW_LEN);

        for kp in keypoints {
            let cx = kp.x.round() as i32;
            let cy = kp.y.round() as i32;
            let mut hist = [0.0f32; ROW_LEN];

            for py in 0..PATCH {
                for px in 0..PATCH {
                    let x = (cx - PATCH / 2 + px) as isize;
                    let y = (cy - PATCH / 2 + py) as isize;
                    let dx = image.get_clamped(x + 1, y) as f32 - image.get_clamped(x - 1, y) as f32;
                    let dy = image.get_clamped(x, y + 1) as f32 - image.get_clamped(x, y - 1) as f32;
                    let magnitude = (dx * dx + dy * dy).sqrt();
                    if magnitude == 0.0 {
                        continue;
                    }
                    let angle = dy.atan2(dx);
                    let bin = (((angle + std::f32::consts::PI)
                        / (2.0 * std::f32::consts::PI / BINS as f32))
                        as usize)
                        .min(BINS - 1);

                    let cell_x = (px as usize * CELLS) / PATCH as usize;
                    let cell_y = (py as usize * CELLS) / PATCH as usize;
                    hist[(cell_y * CELLS + cell_x) * BINS + bin] += magnitude;
                }
            }

            normalize(&mut hist);
            for v in hist.iter_mut() {
                *v = v.min(0.2);
            }
            normalize(&mut hist);
            data.extend_from_slice(&hist);
        }

        Ok(Descriptors::Float {
            data,
            row_len: ROW_LEN,
        })
    }
}

fn normalize(hist: &mut [f32]) {
    let norm = hist.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in hist.iter_mut() {
            *v /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{HogExtractor, ROW_LEN};
    use crate::describe::DescriptorExtractor;
    use crate::detect::Keypoint;
    use crate::image::OwnedImage;

    fn gradient_image(size: usize) -> OwnedImage {
        let data: Vec<u8> = (0..size * size)
            .map(|i| (((i % size) * 4) & 0xFF) as u8)
            .collect();
        OwnedImage::new(data, size, size).unwrap()
    }

    fn kp(x: f32, y: f32) -> Keypoint {
        Keypoint {
            x,
            y,
            size: 16.0,
            response: None,
        }
    }

    #[test]
    fn rows_are_unit_length() {
        let img = gradient_image(64);
        let desc = HogExtractor
            .describe(img.view(), &[kp(32.0, 32.0)])
            .unwrap();
        assert_eq!(desc.rows(), 1);
        let row = desc.float_row(0).unwrap();
        assert_eq!(row.len(), ROW_LEN);
        let norm = row.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    #[test]
    fn flat_patch_gives_zero_descriptor() {
        let img = OwnedImage::new(vec![128u8; 64 * 64], 64, 64).unwrap();
        let desc = HogExtractor
            .describe(img.view(), &[kp(32.0, 32.0)])
            .unwrap();
        let row = desc.float_row(0).unwrap();
        assert!(row.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn values_are_clamped() {
        let img = gradient_image(64);
        let desc = HogExtractor
            .describe(img.view(), &[kp(32.0, 32.0)])
            .unwrap();
        // Renormalization can push values slightly above the 0.2 clamp.
        assert!(desc.float_row(0).unwrap().iter().all(|v| *v <= 0.5));
    }
}
