//! Frames and the bounded sliding window over them.

use crate::describe::Descriptors;
use crate::detect::Keypoint;
use crate::image::OwnedImage;
use crate::matching::DescriptorMatch;
use std::collections::VecDeque;

/// One frame of the sequence with the pipeline results attached so far.
///
/// Created when the image is loaded; keypoints, descriptors and matches
/// are filled in progressively by the pipeline stages. Descriptor rows are
/// aligned 1:1 with the keypoint sequence. `matches` relates this frame to
/// the previous frame in the window.
pub struct Frame {
    pub image: OwnedImage,
    pub keypoints: Vec<Keypoint>,
    pub descriptors: Option<Descriptors>,
    pub matches: Vec<DescriptorMatch>,
}

impl Frame {
    /// Creates a frame holding only its image.
    pub fn new(image: OwnedImage) -> Self {
        Self {
            image,
            keypoints: Vec::new(),
            descriptors: None,
            matches: Vec::new(),
        }
    }
}

/// Bounded ring buffer of recent frames with strict FIFO eviction.
///
/// When a frame is admitted to a full window, the oldest frame is dropped
/// first, so the window never exceeds its capacity and matching always
/// pairs adjacent frames.
pub struct FrameWindow {
    frames: VecDeque<Frame>,
    capacity: usize,
}

impl FrameWindow {
    /// Creates an empty window holding at most `capacity` frames.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "window capacity must be > 0");
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Admits a frame, evicting the oldest one first if the window is full.
    pub fn admit(&mut self, frame: Frame) {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    /// Number of frames currently held.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when no frame has been admitted yet.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The most recently admitted frame.
    pub fn current(&self) -> Option<&Frame> {
        self.frames.back()
    }

    /// Mutable access to the most recently admitted frame.
    pub fn current_mut(&mut self) -> Option<&mut Frame> {
        self.frames.back_mut()
    }

    /// The frame admitted before the current one.
    pub fn previous(&self) -> Option<&Frame> {
        let n = self.frames.len();
        if n < 2 {
            return None;
        }
        self.frames.get(n - 2)
    }

    /// Frames in arrival order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }
}
