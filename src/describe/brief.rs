//! BRIEF-style binary descriptors: smoothed pairwise intensity tests.
//!
//! Each bit compares the box-smoothed intensity at two fixed offsets
//! inside a square patch around the keypoint. The offset pattern is
//! generated once from a fixed seed, so descriptors are reproducible
//! across runs and the BRIEF and ORB kinds get distinct patterns from
//! distinct seeds.

use crate::describe::{DescriptorExtractor, Descriptors};
use crate::detect::Keypoint;
use crate::image::ImageView;
use crate::util::SweepResult;

/// Number of pairwise tests (bits) per descriptor.
const NUM_TESTS: usize = 256;
/// Descriptor width in bytes.
pub const ROW_BYTES: usize = NUM_TESTS / 8;

/// xorshift64* generator for reproducible test patterns.
struct PatternRng(u64);

impl PatternRng {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Uniform offset in [-half, half].
    fn offset(&mut self, half: i32) -> i32 {
        let span = (2 * half + 1) as u64;
        (self.next() % span) as i32 - half
    }
}

/// Binary descriptor extractor over pairwise intensity tests.
#[derive(Debug)]
pub struct BriefExtractor {
    pattern: Vec<(i32, i32, i32, i32)>,
}

impl BriefExtractor {
    /// The BRIEF descriptor kind: 31-px patch, canonical seed.
    pub fn brief() -> Self {
        Self::with_seed(0x9E3779B97F4A7C15, 31)
    }

    /// The ORB descriptor kind: same patch geometry, distinct pattern.
    pub fn orb() -> Self {
        Self::with_seed(0xD1B54A32D192ED03, 31)
    }

    fn with_seed(seed: u64, patch_size: i32) -> Self {
        let half = patch_size / 2;
        let mut rng = PatternRng(seed);
        let pattern = (0..NUM_TESTS)
            .map(|_| {
                (
                    rng.offset(half),
                    rng.offset(half),
                    rng.offset(half),
                    rng.offset(half),
                )
            })
            .collect();
        Self { pattern }
    }

}

/// Box-smoothed intensity at an offset from the keypoint center, clamped
/// to the image bounds. Shared by the binary descriptor extractors.
pub(crate) fn smoothed(image: ImageView<'_>, cx: i32, cy: i32, dx: i32, dy: i32) -> i32 {
    let x = (cx + dx) as isize;
    let y = (cy + dy) as isize;
    let mut sum = 0i32;
    for sy in -2..=2isize {
        for sx in -2..=2isize {
            sum += image.get_clamped(x + sx, y + sy) as i32;
        }
    }
    sum / 25
}

impl DescriptorExtractor for BriefExtractor {
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
