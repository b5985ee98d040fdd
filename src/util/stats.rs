//! Neighborhood-size statistics over a keypoint set.

use crate::detect::Keypoint;

/// Mean and population standard deviation of keypoint neighborhood sizes.
///
/// Both fields are NaN when computed over an empty keypoint set; callers
/// must treat NaN as the documented "no keypoints" sentinel rather than a
/// numeric result.
#[derive(Clone, Copy, Debug)]
pub struct SizeStats {
    pub mean: f32,
    pub std_dev: f32,
    pub count: usize,
}

impl SizeStats {
    /// Computes size statistics over `keypoints`.
    ///
    /// Uses the population (not sample) variance: the keypoint set is the
    /// whole population for a frame, not a sample from one.
    pub fn from_keypoints(keypoints: &[Keypoint]) -> Self {
        let count = keypoints.len();
        if count == 0 {
            return Self {
                mean: f32::NAN,
                std_dev: f32::NAN,
                count: 0,
            };
        }

        let n = count as f32;
        let mean = keypoints.iter().map(|kp| kp.size).sum::<f32>() / n;
        let variance = keypoints
            .iter()
            .map(|kp| {
                let d = kp.size - mean;
                d * d
            })
            .sum::<f32>()
            / n;

        Self {
            mean,
            std_dev: variance.sqrt(),
            count,
        }
    }
}
