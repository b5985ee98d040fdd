//! FAST segment-test corner detector.
//!
//! Samples 16 points on a Bresenham circle of radius 3 around each pixel
//! and declares a corner when at least `arc_length` contiguous circle
//! pixels are all brighter or all darker than the center by the threshold.
//! The contiguity check wraps around the circle. A 3x3 local-maximum pass
//! over the score map suppresses weak neighboring detections.

use crate::detect::{FeatureDetector, Keypoint};
use crate::image::ImageView;
use crate::util::SweepResult;

/// Bresenham circle of radius 3: 16 (dx, dy) offsets, clockwise from 12
/// o'clock.
const CIRCLE_OFFSETS: [(isize, isize); 16] = [
    (0, -3),
    (1, -3),
    (2, -2),
    (3, -1),
    (3, 0),
    (3, 1),
    (2, 2),
    (1, 3),
    (0, 3),
    (-1, 3),
    (-2, 2),
    (-3, 1),
    (-3, 0),
    (-3, -1),
    (-2, -2),
    (-1, -3),
];

/// FAST-N corner detector.
#[derive(Clone, Copy, Debug)]
pub struct FastDetector {
    /// Intensity difference a circle pixel must exceed to count as
    /// brighter/darker than the center.
    pub threshold: u8,
    /// Minimum contiguous arc length, in [9, 12].
    pub arc_length: usize,
    /// Neighborhood diameter assigned to detected keypoints.
    pub patch_size: f32,
    /// Keep at most this many strongest corners; `usize::MAX` keeps all.
    pub max_corners: usize,
}

impl Default for FastDetector {
    fn default() -> Self {
        Self {
            threshold: 30,
            arc_length: 9,
            patch_size: 7.0,
            max_corners: usize::MAX,
        }
    }
}

impl FastDetector {
    /// Parameters for the ORB detector kind: a more permissive threshold,
    /// the ORB patch size and a bounded corner budget.
    pub fn orb() -> Self {
        Self {
            threshold: 20,
            arc_length: 9,
            patch_size: 31.0,
            max_corners: 500,
        }
    }

    /// Segment-test score at `(x, y)`, or `None` if it is not a corner.
    ///
    /// Score is the sum of |circle - center| - threshold over the
    /// qualifying arc, the standard FAST corner strength.
    fn corner_score(&self, image: ImageView<'_>, x: usize, y: usize) -> Option<f32> {
        let center = image.get(x, y)? as i16;
        let t = self.threshold as i16;

        let mut classes = [0i8; 32];
        let mut diffs = [0i16; 16];
        for (i, (dx, dy)) in CIRCLE_OFFSETS.iter().enumerate() {
            let v = image.get_clamped(x as isize + dx, y as isize + dy) as i16;
            let d = v - center;
            diffs[i] = d;
            classes[i] = if d > t {
                1
            } else if d < -t {
                -1
            } else {
                0
            };
        }
        // Duplicate so a wrapping arc becomes a plain run.
        classes.copy_within(0..16, 16);

        for target in [1i8, -1i8] {
            let mut run = 0usize;
            for &c in classes.iter() {
                if c == target {
                    run += 1;
                    if run >= self.arc_length {
                        let score: i16 = diffs
                            .iter()
                            .map(|d| (d.abs() - t).max(0))
                            .sum();
                        return Some(score as f32);
                    }
                } else {
                    run = 0;
                }
            }
        }
        None
    }
}

impl FeatureDetector for FastDetector {
    fn detect(&self, image: ImageView<'_>) -> SweepResult<Vec<Keypoint>> {
        let w = image.width();
        let h = image.height();
        if w <= 6 || h <= 6 {
            return Ok(Vec::new());
        }

        // Score map for the local-maximum pass; 3-pixel border skipped
        // because the sampling circle has radius 3.
        let mut scores = vec![0.0f32; w * h];
        for y in 3..h - 3 {
            for x in 3..w - 3 {
                if let Some(score) = self.corner_score(image, x, y) {
                    scores[y * w + x] = score;
                }
            }
        }

        let mut keypoints = Vec::new();
        for y in 3..h - 3 {
            for x in 3..w - 3 {
                let s = scores[y * w + x];
                if s <= 0.0 {
                    continue;
                }
                let mut is_max = true;
                'window: for dy in -1isize..=1 {
                    for dx in -1isize..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let nx = (x as isize + dx) as usize;
                        let ny = (y as isize + dy) as usize;
                        if scores[ny * w + nx] > s {
                            is_max = false;
                            break 'window;
                        }
                    }
                }
                if is_max {
                    keypoints.push(Keypoint {
                        x: x as f32,
                        y: y as f32,
                        size: self.patch_size,
                        response: Some(s),
                    });
                }
            }
        }

        if keypoints.len() > self.max_corners {
            keypoints.sort_by(|a, b| {
                b.response
                    .unwrap_or(0.0)
                    .total_cmp(&a.response.unwrap_or(0.0))
            });
            keypoints.truncate(self.max_corners);
        }
        Ok(keypoints)
    }
}

#[cfg(test)]
mod tests {
    use super::FastDetector;
    use crate::detect::FeatureDetector;
    use crate::image::OwnedImage;

    /// Bright square on a dark background; its corners are FAST corners.
    fn square_image(size: usize, x0: usize, y0: usize, side: usize) -> OwnedImage {
        let mut data = vec![30u8; size * size];
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                data[y * size + x] = 220;
            }
        }
        OwnedImage::new(data, size, size).unwrap()
    }

    #[test]
    fn detects_square_corners() {
        let img = square_image(48, 12, 12, 20);
        let kps = FastDetector::default().detect(img.view()).unwrap();
        assert!(!kps.is_empty());

        // Every detection should be near one of the four square corners.
        let corners = [(12.0, 12.0), (31.0, 12.0), (12.0, 31.0), (31.0, 31.0)];
        for kp in &kps {
            let near = corners.iter().any(|(cx, cy)| {
                let dx = kp.x - cx;
                let dy = kp.y - cy;
                (dx * dx + dy * dy).sqrt() < 4.0
            });
            assert!(near, "corner at ({}, {}) far from square", kp.x, kp.y);
        }
    }

    #[test]
    fn flat_image_has_no_corners() {
        let img = OwnedImage::new(vec![100u8; 40 * 40], 40, 40).unwrap();
        let kps = FastDetector::default().detect(img.view()).unwrap();
        assert!(kps.is_empty());
    }

    #[test]
    fn tiny_image_yields_empty_set() {
        let img = OwnedImage::new(vec![0u8; 36], 6, 6).unwrap();
        let kps = FastDetector::default().detect(img.view()).unwrap();
        assert!(kps.is_empty());
    }

    #[test]
    fn orb_variant_bounds_corner_count() {
        let det = FastDetector::orb();
        assert_eq!(det.max_corners, 500);
        assert_eq!(det.patch_size, 31.0);
    }
}
