//! Dense per-pixel corner-response maps.

use crate::util::{SweepError, SweepResult};

/// Single-channel grid of per-pixel corner-response scores.
///
/// Same dimensions as the source image; immutable once computed for a frame.
#[derive(Clone, Debug)]
pub struct ResponseMap {
    data: Vec<f32>,
    width: usize,
    height: usize,
}

impl ResponseMap {
    /// Creates a response map from a dense row-major buffer.
    pub fn new(data: Vec<f32>, width: usize, height: usize) -> SweepResult<Self> {
        if width == 0 || height == 0 {
            return Err(SweepError::InvalidDimensions { width, height });
        }
        let needed = width * height;
        if data.len() < needed {
            return Err(SweepError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Map width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Map height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Response at `(x, y)`. Panics if out of bounds.
    pub fn get(&self, x: usize, y: usize) -> f32 {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.width + x]
    }

    /// Largest response in the map.
    pub fn max(&self) -> f32 {
        self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Min-max normalizes the map into [0, 1].
    ///
    /// A constant map normalizes to all zeros. The reference benchmark
    /// normalizes the Harris response before thresholding, so the threshold
    /// is expressed relative to the strongest corner of the frame.
    pub fn normalized(&self) -> Self {
        let min = self.data.iter().copied().fold(f32::INFINITY, f32::min);
        let max = self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let range = max - min;
        let data = if range > 0.0 {
            self.data.iter().map(|v| (v - min) / range).collect()
        } else {
            vec![0.0; self.data.len()]
        };
        Self {
            data,
            width: self.width,
            height: self.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ResponseMap;
    use crate::util::SweepError;

    #[test]
    fn rejects_short_buffer() {
        let err = ResponseMap::new(vec![0.0; 3], 2, 2).unwrap_err();
        assert_eq!(err, SweepError::BufferTooSmall { needed: 4, got: 3 });
    }

    #[test]
    fn normalization_maps_to_unit_range() {
        let map = ResponseMap::new(vec![2.0, 4.0, 6.0, 10.0], 2, 2).unwrap();
        let norm = map.normalized();
        assert!((norm.get(0, 0) - 0.0).abs() < 1e-6);
        assert!((norm.get(1, 1) - 1.0).abs() < 1e-6);
        assert!((norm.get(1, 0) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn constant_map_normalizes_to_zero() {
        let map = ResponseMap::new(vec![5.0; 4], 2, 2).unwrap();
        let norm = map.normalized();
        assert_eq!(norm.get(0, 0), 0.0);
        assert_eq!(norm.get(1, 1), 0.0);
    }
}
