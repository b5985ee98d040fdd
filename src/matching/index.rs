//! Approximate k-NN via multi-table locality-sensitive hashing.
//!
//! Reference descriptors are inserted into several hash tables, each keyed
//! by a fixed subset of descriptor bits. A query probes its bucket in
//! every table and ranks the union of candidates by true distance. When
//! probing yields fewer than k candidates the query falls back to an
//! exhaustive scan, so small descriptor sets degrade to brute force rather
//! than losing matches.
//!
//! Float descriptors are binarized against their own mean before hashing;
//! ranking always uses the true metric, so only recall is approximate.

use crate::describe::Descriptors;
use crate::matching::{row_distance, Neighbor};
use std::collections::HashMap;

const NUM_TABLES: usize = 4;
const BITS_PER_KEY: usize = 16;

/// Deterministic bit positions for each table, derived from the table
/// index so index construction needs no external randomness.
fn key_bit_positions(table: usize, total_bits: usize) -> Vec<usize> {
    let mut state = 0x9E3779B97F4A7C15u64 ^ (table as u64).wrapping_mul(0xBF58476D1CE4E5B9);
    (0..BITS_PER_KEY)
        .map(|_| {
            state ^= state >> 12;
            state ^= state << 25;
            state ^= state >> 27;
            (state.wrapping_mul(0x2545F4914F6CDD1D) % total_bits as u64) as usize
        })
        .collect()
}

/// Bit view of a descriptor matrix: packed bits for binary rows,
/// sign-vs-mean quantization for float rows with each row's mean computed
/// once up front.
struct BitView<'a> {
    desc: &'a Descriptors,
    row_means: Vec<f32>,
}

impl<'a> BitView<'a> {
    fn new(desc: &'a Descriptors) -> Self {
        let row_means = match desc {
            Descriptors::Binary { .. } => Vec::new(),
            Descriptors::Float { .. } => (0..desc.rows())
                .map(|row| {
                    let values = desc.float_row(row).expect("row within bounds");
                    values.iter().sum::<f32>() / values.len() as f32
                })
                .collect(),
        };
        Self { desc, row_means }
    }

    fn bit(&self, row: usize, bit: usize) -> bool {
        if let Some(bytes) = self.desc.binary_row(row) {
            return bytes[bit / 8] & (1 << (bit % 8)) != 0;
        }
        let values = self.desc.float_row(row).expect("row within bounds");
        values[bit] > self.row_means[row]
    }

    fn hash_row(&self, row: usize, positions: &[usize]) -> u64 {
        let mut key = 0u64;
        for &bit in positions {
            key = (key << 1) | self.bit(row, bit) as u64;
        }
        key
    }
}

fn total_bits(desc: &Descriptors) -> usize {
    match desc {
        Descriptors::Binary { row_bytes, .. } => row_bytes * 8,
        Descriptors::Float { row_len, .. } => *row_len,
    }
}

/// Approximate k-nearest-neighbor search over an LSH index of `reference`.
pub(crate) fn knn_indexed(
    source: &Descriptors,
    reference: &Descriptors,
    k: usize,
) -> Vec<Vec<Neighbor>> {
    let bits = total_bits(reference);
    let reference_bits = BitView::new(reference);
    let source_bits = BitView::new(source);
    let tables: Vec<(Vec<usize>, HashMap<u64, Vec<usize>>)> = (0..NUM_TABLES)
        .map(|t| {
            let positions = key_bit_positions(t, bits);
            let mut buckets: HashMap<u64, Vec<usize>> = HashMap::new();
            for j in 0..reference.rows() {
                buckets
                    .entry(reference_bits.hash_row(j, &positions))
                    .or_default()
                    .push(j);
            }
            (positions, buckets)
        })
        .collect();

    let mut all = Vec::with_capacity(source.rows());
    let mut seen = vec![usize::MAX; reference.rows()];
    for i in 0..source.rows() {
        let mut candidates: Vec<usize> = Vec::new();
        for (positions, buckets) in &tables {
            if let Some(bucket) = buckets.get(&source_bits.hash_row(i, positions)) {
                for &j in bucket {
                    if seen[j] != i {
                        seen[j] = i;
                        candidates.push(j);
                    }
                }
            }
        }
        if candidates.len() < k {
            candidates = (0..reference.rows()).collect();
        }

        let mut neighbors: Vec<Neighbor> = candidates
            .into_iter()
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

#[cfg(test)]
mod tests {
    use super::{knn_indexed, BitView};
    use crate::describe::Descriptors;

    fn binary_matrix(rows: Vec<Vec<u8>>) -> Descriptors {
        Descriptors::Binary {
            data: rows.concat(),
            row_bytes: 32,
        }
    }

    fn patterned_row(seed: u8) -> Vec<u8> {
        (0..32).map(|i| seed.wrapping_mul(31).wrapping_add(i * 7)).collect()
    }

    #[test]
    fn identical_row_is_its_own_nearest_neighbor() {
        let rows: Vec<Vec<u8>> = (0..8).map(patterned_row).collect();
        let reference = binary_matrix(rows.clone());
        let source = binary_matrix(vec![rows[3].clone()]);

        let neighbors = knn_indexed(&source, &reference, 2);
        assert_eq!(neighbors.len(), 1);
        assert_eq!(neighbors[0][0].index, 3);
        assert_eq!(neighbors[0][0].distance, 0.0);
    }

    #[test]
    fn small_sets_fall_back_to_exhaustive_search() {
        // Two reference rows cannot fill k=2 from sparse buckets alone
        // without the fallback; the result must still rank both.
        let reference = binary_matrix(vec![patterned_row(1), patterned_row(200)]);
        let source = binary_matrix(vec![patterned_row(1)]);

        let neighbors = knn_indexed(&source, &reference, 2);
        assert_eq!(neighbors[0].len(), 2);
        assert_eq!(neighbors[0][0].index, 0);
        assert!(neighbors[0][0].distance <= neighbors[0][1].distance);
    }

    #[test]
    fn float_bits_quantize_against_their_own_row_mean() {
        let desc = Descriptors::Float {
            data: vec![0.0, 10.0, 100.0, 110.0],
            row_len: 2,
        };
        let view = BitView::new(&desc);
        assert!(!view.bit(0, 0));
        assert!(view.bit(0, 1));
        assert!(!view.bit(1, 0));
        assert!(view.bit(1, 1));
    }

    #[test]
    fn float_rows_are_hashable() {
        let reference = Descriptors::Float {
            data: (0..256)
                .map(|i| if i < 128 { i as f32 } else { (255 - i) as f32 })
                .collect(),
            row_len: 128,
        };
        let source = Descriptors::Float {
            data: (0..128).map(|i| i as f32).collect(),
            row_len: 128,
        };
        let neighbors = knn_indexed(&source, &reference, 1);
        assert_eq!(neighbors[0][0].index, 0);
        assert_eq!(neighbors[0][0].distance, 0.0);
    }
}
