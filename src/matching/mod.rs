//! Cross-frame descriptor matching.
//!
//! Two matcher kinds (exhaustive brute force, LSH-indexed) and two
//! selector kinds (single nearest neighbor, k=2 nearest with ratio test).
//! The distance metric follows the descriptor family: Hamming for binary
//! descriptors, Euclidean for gradient-histogram descriptors.

pub mod index;

use crate::describe::Descriptors;
use crate::util::{SweepError, SweepResult};
use std::str::FromStr;

/// Distance-ratio threshold for k-NN selection: the best distance must be
/// below 0.8x the second best, rejecting ambiguous matches.
pub const RATIO_THRESHOLD: f32 = 0.8;

/// Matcher kinds, named after the reference benchmark.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatcherKind {
    /// Exhaustive scan over all reference descriptors.
    BruteForce,
    /// Approximate multi-table LSH index with brute-force fallback.
    Indexed,
}

impl MatcherKind {
    pub fn name(&self) -> &'static str {
        match self {
            MatcherKind::BruteForce => "MAT_BF",
            MatcherKind::Indexed => "MAT_FLANN",
        }
    }
}

impl FromStr for MatcherKind {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MAT_BF" => Ok(MatcherKind::BruteForce),
            "MAT_FLANN" => Ok(MatcherKind::Indexed),
            _ => Err(SweepError::UnknownMatcher {
                name: s.to_string(),
            }),
        }
    }
}

/// Match-selection strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectorKind {
    /// Accept the single nearest neighbor of every source descriptor.
    Nearest,
    /// Consider the two nearest neighbors and apply the distance-ratio test.
    KnnRatio,
}

impl SelectorKind {
    pub fn name(&self) -> &'static str {
        match self {
            SelectorKind::Nearest => "SEL_NN",
            SelectorKind::KnnRatio => "SEL_KNN",
        }
    }
}

impl FromStr for SelectorKind {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SEL_NN" => Ok(SelectorKind::Nearest),
            "SEL_KNN" => Ok(SelectorKind::KnnRatio),
            _ => Err(SweepError::UnknownSelector {
                name: s.to_string(),
            }),
        }
    }
}

/// An accepted match between a source and a reference keypoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DescriptorMatch {
    /// Row index into the source frame's keypoints/descriptors.
    pub source_idx: usize,
    /// Row index into the reference frame's keypoints/descriptors.
    pub reference_idx: usize,
    /// Distance between the two descriptors.
    pub distance: f32,
}

/// A candidate neighbor found during the k-NN search.
#[derive(Clone, Copy, Debug)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f32,
}

/// Hamming distance between two packed bit descriptors.
pub fn hamming_distance(a: &[u8], b: &[u8]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x ^ y).count_ones())
        .sum()
}

/// Euclidean distance between two float descriptors.
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f32>()
        .sqrt()
}

/// Distance between row `i` of `source` and row `j` of `reference`.
///
/// Matrices must share the same family and width; callers validate first.
pub(crate) fn row_distance(source: &Descriptors, i: usize, reference: &Descriptors, j: usize) -> f32 {
    match (source.binary_row(i), reference.binary_row(j)) {
        (Some(a), Some(b)) => hamming_distance(a, b) as f32,
        _ => {
            let a = source.float_row(i).expect("validated descriptor family");
            let b = reference.float_row(j).expect("validated descriptor family");
            l2_distance(a, b)
        }
    }
}

fn validate(source: &Descriptors, reference: &Descriptors) -> SweepResult<()> {
    if source.family() != reference.family() {
        return Err(SweepError::DescriptorFamilyMismatch);
    }
    let (sw, rw) = match (source, reference) {
        (
            Descriptors::Binary { row_bytes: s, .. },
            Descriptors::Binary { row_bytes: r, .. },
        ) => (*s, *r),
        (Descriptors::Float { row_len: s, .. }, Descriptors::Float { row_len: r, .. }) => (*s, *r),
        _ => unreachable!("family checked above"),
    };
    if sw != rw {
        return Err(SweepError::DescriptorWidthMismatch {
            src: sw,
            reference: rw,
        });
    }
    Ok(())
}

/// Exhaustive k-nearest-neighbor search.
fn knn_brute_force(
    source: &Descriptors,
    reference: &Descriptors,
    k: usize,
) -> Vec<Vec<Neighbor>> {
    let mut all = Vec::with_capacity(source.rows());
    for i in 0..source.rows() {
        let mut neighbors: Vec<Neighbor> = (0..reference.rows())
            .map(|j| Neighbor {
                index: j,
                distance: row_distance(source, i, reference, j),
            })
            .collect();
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(k);
        all.push(neighbors);
    }
    all
}

/// Applies the configured selector to per-source neighbor lists.
fn select(neighbor_lists: Vec<Vec<Neighbor>>, selector: SelectorKind) -> Vec<DescriptorMatch> {
    let mut matches = Vec::new();
    for (source_idx, neighbors) in neighbor_lists.into_iter().enumerate() {
        let accepted = match (selector, neighbors.as_slice()) {
            (_, []) => None,
            (SelectorKind::Nearest, [best, ..]) => Some(*best),
            // A lone candidate has no second-best to be confused with.
            (SelectorKind::KnnRatio, [best]) => Some(*best),
            (SelectorKind::KnnRatio, [best, second, ..]) => {
                if best.distance < RATIO_THRESHOLD * second.distance {
                    Some(*best)
                } else {
                    None
                }
            }
        };
        if let Some(n) = accepted {
            matches.push(DescriptorMatch {
                source_idx,
                reference_idx: n.index,
                distance: n.distance,
            });
        }
    }
    matches
}

/// Matches `source` descriptors against `reference` descriptors.
///
/// Empty matrices on either side yield zero matches, never an error; a
/// family or width mismatch between the two sides is an error.
pub fn match_descriptors(
    source: &Descriptors,
    reference: &Descriptors,
    matcher: MatcherKind,
    selector: SelectorKind,
) -> SweepResult<Vec<DescriptorMatch>> {
    if source.is_empty() || reference.is_empty() {
        return Ok(Vec::new());
    }
    validate(source, reference)?;

    let k = match selector {
        SelectorKind::Nearest => 1,
        SelectorKind::KnnRatio => 2,
    };
    let neighbor_lists = match matcher {
        MatcherKind::BruteForce => knn_brute_force(source, reference, k),
        MatcherKind::Indexed => index::knn_indexed(source, reference, k),
    };
    Ok(select(neighbor_lists, selector))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::describe::Descriptors;

    /// Binary descriptor with `bits` low bits set, 32 bytes wide.
    fn row_with_bits(bits: usize) -> Vec<u8> {
        let mut row = vec![0u8; 32];
        for b in 0..bits {
            row[b / 8] |= 1 << (b % 8);
        }
        row
    }

    fn binary_matrix(rows: Vec<Vec<u8>>) -> Descriptors {
        Descriptors::Binary {
            data: rows.concat(),
            row_bytes: 32,
        }
    }

    #[test]
    fn hamming_counts_differing_bits() {
        assert_eq!(hamming_distance(&[0xFF, 0x00], &[0x0F, 0x01]), 5);
        assert_eq!(hamming_distance(&[0xAA], &[0xAA]), 0);
    }

    #[test]
    fn l2_matches_euclidean_norm() {
        let d = l2_distance(&[0.0, 3.0], &[4.0, 0.0]);
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn ratio_test_accepts_unambiguous_match() {
        // d(query, ref0) = 5, d(query, ref1) = 10; 5 < 0.8*10 -> accepted.
        let source = binary_matrix(vec![row_with_bits(0)]);
        let reference = binary_matrix(vec![row_with_bits(5), row_with_bits(10)]);
        let matches = match_descriptors(
            &source,
            &reference,
            MatcherKind::BruteForce,
            SelectorKind::KnnRatio,
        )
        .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].reference_idx, 0);
        assert_eq!(matches[0].distance, 5.0);
    }

    #[test]
    fn ratio_test_rejects_ambiguous_match() {
        // d(query, ref0) = 9, d(query, ref1) = 10; 9 >= 0.8*10 -> rejected.
        let source = binary_matrix(vec![row_with_bits(0)]);
        let reference = binary_matrix(vec![row_with_bits(9), row_with_bits(10)]);
        let matches = match_descriptors(
            &source,
            &reference,
            MatcherKind::BruteForce,
            SelectorKind::KnnRatio,
        )
        .unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn nearest_selector_accepts_every_source_row() {
        let source = binary_matrix(vec![row_with_bits(0), row_with_bits(9)]);
        let reference = binary_matrix(vec![row_with_bits(9), row_with_bits(10)]);
        let matches = match_descriptors(
            &source,
            &reference,
            MatcherKind::BruteForce,
            SelectorKind::Nearest,
        )
        .unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[1].reference_idx, 0);
        assert_eq!(matches[1].distance, 0.0);
    }

    #[test]
    fn empty_matrices_yield_zero_matches() {
        let source = Descriptors::empty_binary(32);
        let reference = binary_matrix(vec![row_with_bits(3)]);
        let matches = match_descriptors(
            &source,
            &reference,
            MatcherKind::BruteForce,
            SelectorKind::KnnRatio,
        )
        .unwrap();
        assert!(matches.is_empty());

        let matches = match_descriptors(
            &reference,
            &source,
            MatcherKind::BruteForce,
            SelectorKind::KnnRatio,
        )
        .unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn family_mismatch_is_an_error() {
        let source = binary_matrix(vec![row_with_bits(1)]);
        let reference = Descriptors::Float {
            data: vec![0.0; 128],
            row_len: 128,
        };
        let err = match_descriptors(
            &source,
            &reference,
            MatcherKind::BruteForce,
            SelectorKind::Nearest,
        )
        .unwrap_err();
        assert_eq!(err, SweepError::DescriptorFamilyMismatch);
    }

    #[test]
    fn kind_names_parse() {
        assert_eq!("MAT_BF".parse::<MatcherKind>().unwrap(), MatcherKind::BruteForce);
        assert_eq!("MAT_FLANN".parse::<MatcherKind>().unwrap(), MatcherKind::Indexed);
        assert_eq!("SEL_NN".parse::<SelectorKind>().unwrap(), SelectorKind::Nearest);
        assert_eq!("SEL_KNN".parse::<SelectorKind>().unwrap(), SelectorKind::KnnRatio);
    }
}
