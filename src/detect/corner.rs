//! Harris and Shi-Tomasi corner detectors.
//!
//! Both build a structure-tensor response map from Sobel gradients; they
//! differ in the scalar reduced from the tensor (Harris score vs. minimum
//! eigenvalue) and in how candidates are suppressed. Harris feeds the
//! response map through the greedy NMS detector; Shi-Tomasi keeps the
//! classic good-features-to-track selection: strongest first, minimum
//! pairwise distance.

use crate::detect::nms::NmsDetector;
use crate::detect::response::ResponseMap;
use crate::detect::{FeatureDetector, Keypoint};
use crate::image::ImageView;
use crate::util::SweepResult;

/// Sobel 3x3 gradients, clamped at the borders.
fn sobel_xy(image: ImageView<'_>) -> (Vec<f32>, Vec<f32>) {
    let w = image.width();
    let h = image.height();
    let mut gx = vec![0.0f32; w * h];
    let mut gy = vec![0.0f32; w * h];

    for y in 0..h {
        for x in 0..w {
            let xi = x as isize;
            let yi = y as isize;
            let p = |dx: isize, dy: isize| image.get_clamped(xi + dx, yi + dy) as f32;

            let dx = (p(1, -1) + 2.0 * p(1, 0) + p(1, 1)) - (p(-1, -1) + 2.0 * p(-1, 0) + p(-1, 1));
            let dy = (p(-1, 1) + 2.0 * p(0, 1) + p(1, 1)) - (p(-1, -1) + 2.0 * p(0, -1) + p(1, -1));
            gx[y * w + x] = dx;
            gy[y * w + x] = dy;
        }
    }
    (gx, gy)
}

/// Sums `src` over a (2·radius+1)² box window at every pixel.
fn box_sum(src: &[f32], w: usize, h: usize, radius: usize) -> Vec<f32> {
    let r = radius as isize;
    let mut out = vec![0.0f32; w * h];
    for y in 0..h as isize {
        for x in 0..w as isize {
            let mut acc = 0.0f32;
            for dy in -r..=r {
                for dx in -r..=r {
                    let sx = (x + dx).clamp(0, w as isize - 1) as usize;
                    let sy = (y + dy).clamp(0, h as isize - 1) as usize;
                    acc += src[sy * w + sx];
                }
            }
            out[y as usize * w + x as usize] = acc;
        }
    }
    out
}

/// Structure-tensor components summed over the block window.
fn structure_tensor(image: ImageView<'_>, block_radius: usize) -> (Vec<f32>, Vec<f32>, Vec<f32>) {
    let w = image.width();
    let h = image.height();
    let (gx, gy) = sobel_xy(image);

    let mut ixx = vec![0.0f32; w * h];
    let mut iyy = vec![0.0f32; w * h];
    let mut ixy = vec![0.0f32; w * h];
    for i in 0..w * h {
        ixx[i] = gx[i] * gx[i];
        iyy[i] = gy[i] * gy[i];
        ixy[i] = gx[i] * gy[i];
    }

    (
        box_sum(&ixx, w, h, block_radius),
        box_sum(&iyy, w, h, block_radius),
        box_sum(&ixy, w, h, block_radius),
    )
}

/// Harris corner detector built on the greedy NMS keypoint selector.
#[derive(Clone, Copy, Debug)]
pub struct HarrisDetector {
    /// Harris sensitivity parameter, typically 0.04..0.06.
    pub k: f32,
    /// Half-size of the structure-tensor block window.
    pub block_radius: usize,
    /// Sobel aperture; the keypoint diameter is twice this value.
    pub aperture: usize,
    /// Threshold on the min-max normalized response.
    pub min_response: f32,
    /// Maximum tolerated keypoint overlap passed to the NMS stage.
    pub max_overlap: f32,
}

impl Default for HarrisDetector {
    fn default() -> Self {
        Self {
            k: 0.04,
            block_radius: 2,
            aperture: 3,
            min_response: 0.3,
            max_overlap: 0.0,
        }
    }
}

impl HarrisDetector {
    /// Computes the raw Harris response map: det(M) - k·trace(M)².
    pub fn response(&self, image: ImageView<'_>) -> SweepResult<ResponseMap> {
        let w = image.width();
        let h = image.height();
        let (sxx, syy, sxy) = structure_tensor(image, self.block_radius);

        let mut data = vec![0.0f32; w * h];
        for i in 0..w * h {
            let det = sxx[i] * syy[i] - sxy[i] * sxy[i];
            let trace = sxx[i] + syy[i];
            data[i] = det - self.k * trace * trace;
        }
        ResponseMap::new(data, w, h)
    }
}

impl FeatureDetector for HarrisDetector {
    fn detect(&self, image: ImageView<'_>) -> SweepResult<Vec<Keypoint>> {
        let response = self.response(image)?.normalized();
        let nms = NmsDetector::new(
            self.min_response,
            self.max_overlap,
            2.0 * self.aperture as f32,
        );
        Ok(nms.suppress(&response))
    }
}

/// Shi-Tomasi detector: minimum-eigenvalue response, quality-level
/// threshold and greedy minimum-distance selection.
#[derive(Clone, Copy, Debug)]
pub struct ShiTomasiDetector {
    /// Block size; also the neighborhood size of produced keypoints.
    pub block_size: usize,
    /// Fraction of the strongest response a corner must reach.
    pub quality_level: f32,
    /// Maximum tolerated overlap; spacing is (1 - overlap)·block_size.
    pub max_overlap: f32,
}

impl Default for ShiTomasiDetector {
    fn default() -> Self {
        Self {
            block_size: 4,
            quality_level: 0.01,
            max_overlap: 0.0,
        }
    }
}

impl ShiTomasiDetector {
    /// Minimum-eigenvalue response of the structure tensor.
    pub fn response(&self, image: ImageView<'_>) -> SweepResult<ResponseMap> {
        let w = image.width();
        let h = image.height();
        let (sxx, syy, sxy) = structure_tensor(image, self.block_size / 2);

        let mut data = vec![0.0f32; w * h];
        for i in 0..w * h {
            let half_trace = (sxx[i] + syy[i]) * 0.5;
            let half_diff = (sxx[i] - syy[i]) * 0.5;
            data[i] = half_trace - (half_diff * half_diff + sxy[i] * sxy[i]).sqrt();
        }
        ResponseMap::new(data, w, h)
    }
}

impl FeatureDetector for ShiTomasiDetector {
    fn detect(&self, image: ImageView<'_>) -> SweepResult<Vec<Keypoint>> {
        let response = self.response(image)?;
        let threshold = response.max() * self.quality_level;
        let min_distance = (1.0 - self.max_overlap) * self.block_size as f32;

        let mut candidates: Vec<(f32, f32, f32)> = Vec::new();
        for y in 0..response.height() {
            for x in 0..response.width() {
                let r = response.get(x, y);
                if r > threshold {
                    candidates.push((r, x as f32, y as f32));
                }
            }
        }
        // Strongest corners claim their neighborhood first.
        candidates.sort_by(|a, b| b.0.total_cmp(&a.0));

        let min_dist_sq = min_distance * min_distance;
        let mut corners: Vec<Keypoint> = Vec::new();
        'candidates: for (_, x, y) in candidates {
            for kept in &corners {
                let dx = x - kept.x;
                let dy = y - kept.y;
                if dx * dx + dy * dy < min_dist_sq {
                    continue 'candidates;
                }
            }
            // Descending-quality order; no response is reported, matching
            // the reference detector's output.
            corners.push(Keypoint {
                x,
                y,
                size: self.block_size as f32,
                response: None,
            });
        }
        Ok(corners)
    }
}
