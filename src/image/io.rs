//! Convenience helpers for loading frames via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::OwnedImage;
use crate::util::{SweepError, SweepResult};
use std::path::Path;

/// Creates an owned grayscale image from a decoded grayscale buffer.
pub fn owned_from_gray_image(img: &image::GrayImage) -> SweepResult<OwnedImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    OwnedImage::new(img.as_raw().clone(), width, height)
}

/// Loads an image from disk and converts it to grayscale.
///
/// Any decode or conversion failure is fatal for the sweep; frames are
/// never silently skipped.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> SweepResult<OwnedImage> {
    let img = image::open(path.as_ref()).map_err(|err| SweepError::ImageIo {
        path: path.as_ref().display().to_string(),
        reason: err.to_string(),
    })?;
    owned_from_gray_image(&img.to_luma8())
}
