//! Frame sequence layout and the source seam used by the sweep engine.
//!
//! Frames come from an ordered, zero-padded filename sequence (fixed
//! prefix, fixed-width numeric index, fixed extension). `FrameSource`
//! abstracts the loading step so the engine can be driven from synthetic
//! in-memory frames in tests.

use crate::image::OwnedImage;
use crate::util::SweepResult;
use std::path::PathBuf;

/// Zero-padded filename layout for a consecutive frame sequence.
#[derive(Clone, Debug)]
pub struct SequenceLayout {
    /// Directory holding the frames.
    pub dir: PathBuf,
    /// Filename prefix before the numeric index.
    pub prefix: String,
    /// File extension including the dot, e.g. ".png".
    pub extension: String,
    /// Index of the first frame.
    pub start_index: usize,
    /// Index of the last frame, inclusive.
    pub end_index: usize,
    /// Number of digits in the zero-padded index.
    pub fill_width: usize,
}

impl SequenceLayout {
    /// Number of frames in the sequence; 0 when the range is reversed.
    pub fn len(&self) -> usize {
        self.end_index
            .checked_sub(self.start_index)
            .map_or(0, |span| span + 1)
    }

    /// True when the sequence holds no frames.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Path for the `i`-th frame of the sequence (0-based).
    pub fn path_for(&self, i: usize) -> PathBuf {
        let index = self.start_index + i;
        self.dir.join(format!(
            "{}{:0fill$}{}",
            self.prefix,
            index,
            self.extension,
            fill = self.fill_width
        ))
    }
}

impl Default for SequenceLayout {
    fn default() -> Self {
        // KITTI 2011_09_26 left-camera layout from the reference benchmark.
        Self {
            dir: PathBuf::from("images/KITTI/2011_09_26/image_00/data"),
            prefix: String::from("000000"),
            extension: String::from(".png"),
            start_index: 0,
            end_index: 9,
            fill_width: 4,
        }
    }
}

/// Ordered source of grayscale frames for one sweep.
pub trait FrameSource {
    /// Number of frames available.
    fn len(&self) -> usize;

    /// True when the source holds no frames.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Loads the `i`-th frame. A load failure aborts the sweep.
    fn load(&self, i: usize) -> SweepResult<OwnedImage>;
}

/// Frame source backed by image files on disk.
#[cfg(feature = "image-io")]
pub struct ImageSequence {
    layout: SequenceLayout,
}

#[cfg(feature = "image-io")]
impl ImageSequence {
    /// Creates a file-backed source for the given layout.
    pub fn new(layout: SequenceLayout) -> Self {
        Self { layout }
    }
}

#[cfg(feature = "image-io")]
impl FrameSource for ImageSequence {
    fn len(&self) -> usize {
        self.layout.len()
    }

    fn load(&self, i: usize) -> SweepResult<OwnedImage> {
        crate::image::io::load_gray_image(self.layout.path_for(i))
    }
}

#[cfg(test)]
mod tests {
    use super::SequenceLayout;
    use std::path::PathBuf;

    #[test]
    fn paths_are_zero_padded() {
        let layout = SequenceLayout {
            dir: PathBuf::from("data"),
            prefix: String::from("img-"),
            extension: String::from(".png"),
            start_index: 3,
            end_index: 12,
            fill_width: 4,
        };
        assert_eq!(layout.len(), 10);
        assert_eq!(layout.path_for(0), PathBuf::from("data/img-0003.png"));
        assert_eq!(layout.path_for(9), PathBuf::from("data/img-0012.png"));
    }

    #[test]
    fn reversed_range_is_empty() {
        let layout = SequenceLayout {
            start_index: 5,
            end_index: 2,
            ..SequenceLayout::default()
        };
        assert_eq!(layout.len(), 0);
        assert!(layout.is_empty());
    }

    #[test]
    fn default_layout_matches_kitti_naming() {
        let layout = SequenceLayout::default();
        assert_eq!(layout.len(), 10);
        assert!(layout
            .path_for(0)
            .to_string_lossy()
            .ends_with("0000000000.png"));
    }
}
