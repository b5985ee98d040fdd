//! Greedy non-maximum suppression over a corner-response map.
//!
//! Every pixel whose response exceeds the threshold becomes a candidate
//! keypoint with a fixed neighborhood diameter. Candidates are compared
//! against all previously accepted keypoints by circle intersection-over-
//! union; a conflicting candidate either replaces the first accepted
//! keypoint it strictly beats or is dropped. The replacement is greedy and
//! order-dependent, not a globally optimal suppression; that matches the
//! reference behavior.
//!
//! The inner comparison is O(pixels × accepted keypoints). Acceptable for
//! sparse corner counts; a spatial index could replace the linear scan
//! without changing the contract.

use crate::detect::response::ResponseMap;
use crate::detect::Keypoint;

/// NMS keypoint detector over a response map.
#[derive(Clone, Copy, Debug)]
pub struct NmsDetector {
    /// Minimum response a pixel must strictly exceed to become a candidate.
    pub min_response: f32,
    /// Maximum tolerated pairwise overlap ratio, in [0, 1].
    pub max_overlap: f32,
    /// Neighborhood diameter assigned to every produced keypoint.
    pub diameter: f32,
}

impl NmsDetector {
    /// Creates a detector with the given threshold, overlap limit and
    /// neighborhood diameter.
    pub fn new(min_response: f32, max_overlap: f32, diameter: f32) -> Self {
        Self {
            min_response,
            max_overlap,
            diameter,
        }
    }

    /// Produces non-overlapping keypoints from `map`.
    ///
    /// An empty or all-below-threshold map yields an empty set, which is a
    /// valid result for downstream consumers.
    pub fn suppress(&self, map: &ResponseMap) -> Vec<Keypoint> {
        let mut accepted: Vec<Keypoint> = Vec::new();

        for y in 0..map.height() {
            for x in 0..map.width() {
                let response = map.get(x, y);
                if response <= self.min_response {
                    continue;
                }

                let candidate = Keypoint {
                    x: x as f32,
                    y: y as f32,
                    size: self.diameter,
                    response: Some(response),
                };

                let mut register = true;
                for kept in accepted.iter_mut() {
                    if keypoint_overlap(&candidate, kept) <= self.max_overlap {
                        continue;
                    }
                    // Conflict: one of the two points is dropped either way.
                    register = false;
                    if response > kept.response.unwrap_or(f32::NEG_INFINITY) {
                        *kept = candidate;
                        break;
                    }
                }
                if register {
                    accepted.push(candidate);
                }
            }
        }

        accepted
    }
}

/// Intersection-over-union of two keypoints' neighborhood circles, in [0, 1].
///
/// Each keypoint covers a circle of radius `size / 2` centered at its
/// position. Disjoint circles overlap by 0; a circle contained in the other
/// overlaps by the ratio of their areas.
pub fn keypoint_overlap(a: &Keypoint, b: &Keypoint) -> f32 {
    let ra = a.size * 0.5;
    let rb = b.size * 0.5;
    if ra <= 0.0 || rb <= 0.0 {
        return 0.0;
    }

    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist >= ra + rb {
        return 0.0;
    }

    let area_a = std::f32::consts::PI * ra * ra;
    let area_b = std::f32::consts::PI * rb * rb;

    let intersection = if dist <= (ra - rb).abs() {
        // One circle inside the other.
        area_a.min(area_b)
    } else {
        // Lens area of two intersecting circles.
        let cos_a = ((dist * dist + ra * ra - rb * rb) / (2.0 * dist * ra)).clamp(-1.0, 1.0);
        let cos_b = ((dist * dist + rb * rb - ra * ra) / (2.0 * dist * rb)).clamp(-1.0, 1.0);
        let seg_a = ra * ra * (cos_a.acos() - cos_a * (1.0 - cos_a * cos_a).sqrt());
        let seg_b = rb * rb * (cos_b.acos() - cos_b * (1.0 - cos_b * cos_b).sqrt());
        seg_a + seg_b
    };

    let union = area_a + area_b - intersection;
    (intersection / union).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::{keypoint_overlap, NmsDetector};
    use crate::detect::Keypoint;

    fn kp(x: f32, y: f32, size: f32) -> Keypoint {
        Keypoint {
            x,
            y,
            size,
            response: None,
        }
    }

    #[test]
    fn identical_circles_overlap_fully() {
        let a = kp(10.0, 10.0, 6.0);
        assert!((keypoint_overlap(&a, &a) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn distant_circles_do_not_overlap() {
        let a = kp(0.0, 0.0, 6.0);
        let b = kp(100.0, 0.0, 6.0);
        assert_eq!(keypoint_overlap(&a, &b), 0.0);
    }

    #[test]
    fn touching_circles_do_not_overlap() {
        let a = kp(0.0, 0.0, 6.0);
        let b = kp(6.0, 0.0, 6.0);
        assert!(keypoint_overlap(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn contained_circle_overlaps_by_area_ratio() {
        let big = kp(0.0, 0.0, 8.0);
        let small = kp(0.0, 0.0, 4.0);
        // area ratio (r=2)² / (r=4)² = 0.25
        assert!((keypoint_overlap(&big, &small) - 0.25).abs() < 1e-5);
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = kp(0.0, 0.0, 6.0);
        let b = kp(3.0, 1.0, 5.0);
        let ab = keypoint_overlap(&a, &b);
        let ba = keypoint_overlap(&b, &a);
        assert!((ab - ba).abs() < 1e-6);
        assert!(ab > 0.0 && ab < 1.0);
    }

    #[test]
    fn below_threshold_map_yields_empty_set() {
        use crate::detect::response::ResponseMap;
        let map = ResponseMap::new(vec![0.1; 64], 8, 8).unwrap();
        let detector = NmsDetector::new(0.3, 0.0, 6.0);
        assert!(detector.suppress(&map).is_empty());
    }
}
