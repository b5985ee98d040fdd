//! Grayscale image storage and borrowed views.
//!
//! `ImageView` is a borrowed 2D view into a 1D `u8` buffer with an explicit
//! stride; `OwnedImage` owns a contiguous buffer and hands out views. The
//! stride counts elements between the starts of consecutive rows.

use crate::util::{SweepError, SweepResult};

#[cfg(feature = "image-io")]
pub mod io;

/// Borrowed grayscale view with an explicit stride.
#[derive(Copy, Clone)]
pub struct ImageView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> ImageView<'a> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [u8], width: usize, height: usize) -> SweepResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [u8], width: usize, height: usize, stride: usize) -> SweepResult<Self> {
        if width == 0 || height == 0 {
            return Err(SweepError::InvalidDimensions { width, height });
        }
        if stride < width {
            return Err(SweepError::InvalidStride { width, stride });
        }
        let needed = (height - 1) * stride + width;
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
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.stride + x).copied()
    }

    /// Returns the pixel at `(x, y)` with coordinates clamped into bounds.
    ///
    /// Used by detectors and descriptor samplers near image borders.
    pub fn get_clamped(&self, x: isize, y: isize) -> u8 {
        let cx = x.clamp(0, self.width as isize - 1) as usize;
        let cy = y.clamp(0, self.height as isize - 1) as usize;
        self.data[cy * self.stride + cx]
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.stride;
        self.data.get(start..start + self.width)
    }
}

/// Owned contiguous grayscale image.
#[derive(Clone)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Creates an owned image from a contiguous pixel buffer.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> SweepResult<Self> {
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

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the backing pixel buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a borrowed view of the whole image.
    pub fn view(&self) -> ImageView<'_> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}
