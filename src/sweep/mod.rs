//! The benchmark sweep engine.
//!
//! Iterates detector×descriptor configurations over a frame sequence,
//! skipping incompatible pairs, and drives the per-frame pipeline: admit
//! into the sliding window, detect (timed), region-filter, compute
//! neighborhood statistics, describe (timed) and, once the window holds
//! two frames, match against the previous frame (timed). One result row
//! is emitted per processed frame.

pub mod report;
pub mod stage;

use crate::describe::{build_extractor, DescriptorKind};
use crate::detect::{build_detector, DetectorKind, Keypoint};
use crate::frame::{Frame, FrameWindow};
use crate::matching::{match_descriptors, MatcherKind, SelectorKind};
use crate::sequence::FrameSource;
use crate::sweep::report::{ResultRow, ResultSink};
use crate::sweep::stage::run_timed;
use crate::util::stats::SizeStats;
use crate::util::SweepResult;
use tracing::{debug, info};

/// Axis-aligned region-of-interest rectangle in pixel units.
///
/// Containment is half-open: a point on the left/top edge is inside, a
/// point on the right/bottom edge is not.
#[derive(Clone, Copy, Debug)]
pub struct RegionOfInterest {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RegionOfInterest {
    /// True when the keypoint position lies inside the rectangle.
    pub fn contains(&self, kp: &Keypoint) -> bool {
        kp.x >= self.x && kp.x < self.x + self.width && kp.y >= self.y && kp.y < self.y + self.height
    }
}

impl Default for RegionOfInterest {
    fn default() -> Self {
        // The preceding-vehicle rectangle from the reference benchmark.
        Self {
            x: 535.0,
            y: 180.0,
            width: 180.0,
            height: 150.0,
        }
    }
}

/// One admitted (detector, descriptor, matcher, selector) combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Configuration {
    pub detector: DetectorKind,
    pub descriptor: DescriptorKind,
    pub matcher: MatcherKind,
    pub selector: SelectorKind,
}

/// Compatibility table applied before a configuration's frame loop.
///
/// The AKAZE descriptor can only describe AKAZE keypoints, and the ORB
/// descriptor cannot describe SIFT keypoints. Every other pairing runs.
pub fn is_compatible(detector: DetectorKind, descriptor: DescriptorKind) -> bool {
    match descriptor {
        DescriptorKind::Akaze => detector == DetectorKind::Akaze,
        DescriptorKind::Orb => detector != DetectorKind::Sift,
        _ => true,
    }
}

/// Sweep parameters: the kind lists to combine and the fixed run constants.
#[derive(Clone, Debug)]
pub struct SweepConfig {
    /// Detector kinds to sweep, outer loop, in input order.
    pub detectors: Vec<DetectorKind>,
    /// Descriptor kinds to sweep, inner loop, in input order.
    pub descriptors: Vec<DescriptorKind>,
    pub matcher: MatcherKind,
    pub selector: SelectorKind,
    /// Region filter applied after detection; `None` keeps all keypoints.
    pub roi: Option<RegionOfInterest>,
    /// Sliding window capacity, e.g. 2 for adjacent-frame matching.
    pub window_capacity: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            detectors: vec![
                DetectorKind::ShiTomasi,
                DetectorKind::Harris,
                DetectorKind::Fast,
                DetectorKind::Orb,
            ],
            descriptors: vec![
                DescriptorKind::Brisk,
                DescriptorKind::Brief,
                DescriptorKind::Orb,
                DescriptorKind::Sift,
            ],
            matcher: MatcherKind::BruteForce,
            selector: SelectorKind::KnnRatio,
            roi: Some(RegionOfInterest::default()),
            window_capacity: 2,
        }
    }
}

/// Drives the configuration × frame double loop.
pub struct SweepEngine {
    config: SweepConfig,
}

impl SweepEngine {
    /// Creates an engine for the given sweep parameters.
    pub fn new(config: SweepConfig) -> Self {
        Self { config }
    }

    /// Checks every requested kind against the provider factories.
    ///
    /// Runs before the first configuration so an unsupported name fails
    /// here, never at a randomly deep iteration.
    pub fn validate(&self) -> SweepResult<()> {
        for &kind in &self.config.detectors {
            build_detector(kind)?;
        }
        for &kind in &self.config.descriptors {
            build_extractor(kind)?;
        }
        Ok(())
    }

    /// Runs the full sweep over `source`, appending one row per processed
    /// frame to `sink`.
    ///
    /// Aborts on the first unrecoverable error; the returned error names
    /// the detector, descriptor and frame index it occurred at.
    pub fn run(&self, source: &dyn FrameSource, sink: &mut dyn ResultSink) -> SweepResult<()> {
        self.validate()?;

        for &detector_kind in &self.config.detectors {
            for &descriptor_kind in &self.config.descriptors {
                if !is_compatible(detector_kind, descriptor_kind) {
                    debug!(
                        detector = detector_kind.name(),
                        descriptor = descriptor_kind.name(),
                        "skipping incompatible configuration"
                    );
                    continue;
                }
                let configuration = Configuration {
                    detector: detector_kind,
                    descriptor: descriptor_kind,
                    matcher: self.config.matcher,
                    selector: self.config.selector,
                };
                self.run_configuration(configuration, source, sink)?;
            }
        }
        Ok(())
    }

    /// Runs the frame loop for one admitted configuration with a fresh
    /// window, so no state leaks across configurations.
    fn run_configuration(
        &self,
        configuration: Configuration,
        source: &dyn FrameSource,
        sink: &mut dyn ResultSink,
    ) -> SweepResult<()> {
        let detector_name = configuration.detector.name();
        let descriptor_name = configuration.descriptor.name();
        info!(
            detector = detector_name,
            descriptor = descriptor_name,
            frames = source.len(),
            "running configuration"
        );

        let detector = build_detector(configuration.detector)?;
        let extractor = build_extractor(configuration.descriptor)?;
        let mut window = FrameWindow::new(self.config.window_capacity);

        for frame_index in 0..source.len() {
            let in_stage =
                |err: crate::util::SweepError| err.in_stage(detector_name, descriptor_name, frame_index);

            let image = source.load(frame_index).map_err(in_stage)?;
            window.admit(Frame::new(image));

            // Detection, timed around the provider call only.
            let current = window.current_mut().expect("frame admitted above");
            let detected = run_timed(|| detector.detect(current.image.view())).map_err(in_stage)?;
            let raw_keypoints = detected.value.len();
            let detect_seconds = detected.seconds;

            // Region filter runs after detection by protocol, even though
            // filtering first would be cheaper.
            current.keypoints = match &self.config.roi {
                Some(roi) => detected
                    .value
                    .into_iter()
                    .filter(|kp| roi.contains(kp))
                    .collect(),
                None => detected.value,
            };
            let roi_keypoints = current.keypoints.len();
            let stats = SizeStats::from_keypoints(&current.keypoints);

            // Description.
            let described =
                run_timed(|| extractor.describe(current.image.view(), &current.keypoints))
                    .map_err(in_stage)?;
            current.descriptors = Some(described.value);
            let describe_seconds = described.seconds;

            // Matching between the two most recent frames; skipped with
            // zero matches on the first frame of the configuration.
            let mut match_seconds = 0.0;
            let match_count = if window.len() > 1 {
                let previous = window.previous().expect("window holds two frames");
                let current = window.current().expect("window is non-empty");
                let source_desc = previous.descriptors.as_ref().expect("described above");
                let reference_desc = current.descriptors.as_ref().expect("described above");
                let matched = run_timed(|| {
                    match_descriptors(
                        source_desc,
                        reference_desc,
                        configuration.matcher,
                        configuration.selector,
                    )
                })
                .map_err(in_stage)?;
                match_seconds = matched.seconds;
                let count = matched.value.len();
                window
                    .current_mut()
                    .expect("window is non-empty")
                    .matches = matched.value;
                count
            } else {
                0
            };

            debug!(
                detector = detector_name,
                descriptor = descriptor_name,
                frame = frame_index,
                raw = raw_keypoints,
                kept = roi_keypoints,
                matches = match_count,
                "frame processed"
            );

            sink.append(&ResultRow {
                detector: detector_name,
                descriptor: descriptor_name,
                frame_index,
                detect_seconds,
                raw_keypoints,
                roi_keypoints,
                size_mean: stats.mean,
                size_std_dev: stats.std_dev,
                describe_seconds,
                match_count,
                total_seconds: detect_seconds + describe_seconds + match_seconds,
            })
            .map_err(in_stage)?;
        }
        Ok(())
    }
}
