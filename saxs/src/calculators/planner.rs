//! Choice of the algorithm (direct summation or harmonic expansion) used for
//! each scattering vector.

use log::warn;

use crate::Vector3D;
use crate::scattering::ScatteringVectors;

/// Smallest truncation degree used by the harmonic expansion
pub const MIN_TRUNCATION_DEGREE: usize = 10;
/// Largest truncation degree used by the harmonic expansion
pub const MAX_TRUNCATION_DEGREE: usize = 99;

/// How to use the harmonic expansion algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub enum ExpansionMode {
    /// Only use direct summation
    #[serde(rename = "direct")]
    Off,
    /// Use the harmonic expansion for all scattering vectors where it is
    /// expected to be faster than direct summation
    #[serde(rename = "expansion")]
    Adaptive,
    /// Use the harmonic expansion for all scattering vectors
    #[serde(rename = "forced-expansion")]
    Forced,
}

impl Default for ExpansionMode {
    fn default() -> ExpansionMode {
        ExpansionMode::Off
    }
}

/// Split of the scattering vectors between the two algorithms.
///
/// The expansion set is always a contiguous prefix `0..expansion.len()` of
/// the scattering vectors, and the direct set contains all the remaining
/// indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmPartition {
    /// indexes of the scattering vectors using the harmonic expansion
    pub expansion: Vec<usize>,
    /// indexes of the scattering vectors using direct summation
    pub direct: Vec<usize>,
    /// truncation degree for each entry in `expansion`
    pub degrees: Vec<usize>,
}

impl AlgorithmPartition {
    /// Use direct summation for all `n_vectors` scattering vectors
    pub fn all_direct(n_vectors: usize) -> AlgorithmPartition {
        AlgorithmPartition {
            expansion: Vec::new(),
            direct: (0..n_vectors).collect(),
            degrees: Vec::new(),
        }
    }

    /// Use the expansion for the first `count` vectors, with the given
    /// truncation degrees, and direct summation for the rest
    fn with_expansion_prefix(degrees: &[usize], count: usize) -> AlgorithmPartition {
        AlgorithmPartition {
            expansion: (0..count).collect(),
            direct: (count..degrees.len()).collect(),
            degrees: degrees[..count].to_vec(),
        }
    }

    /// Largest truncation degree of the expansion, if any vector uses it
    pub fn max_degree(&self) -> Option<usize> {
        self.degrees.iter().copied().max()
    }
}

/// Get the largest dimension of the axis-aligned bounding box containing all
/// the `positions`
pub fn max_extent(positions: &[Vector3D]) -> f64 {
    let first = match positions.first() {
        Some(&first) => first,
        None => return 0.0,
    };

    let mut min = first;
    let mut max = first;
    for &position in positions {
        min = min.min(&position);
        max = max.max(&position);
    }

    let extent = max - min;
    return f64::max(extent[0], f64::max(extent[1], extent[2]));
}

/// Get the truncation degree of the harmonic expansion needed for a system
/// of size `extent` at the scattering vector norm `q`, clamped to
/// `[MIN_TRUNCATION_DEGREE, MAX_TRUNCATION_DEGREE]`.
///
/// This is `5 + floor(1.2 D q + 0.5 (12 - log10(D q))^(2/3) (D q)^(1/3))`
/// with `D = extent`.
pub fn truncation_degree(extent: f64, q: f64) -> usize {
    let dq = extent * q;
    if !(dq > 0.0) {
        return MIN_TRUNCATION_DEGREE;
    }

    let digits = f64::max(12.0 - dq.log10(), 0.0);
    let degree = 5.0 + f64::floor(1.2 * dq + 0.5 * digits.powf(2.0 / 3.0) * dq.powf(1.0 / 3.0));

    if degree >= MAX_TRUNCATION_DEGREE as f64 {
        return MAX_TRUNCATION_DEGREE;
    }
    return (degree as usize).max(MIN_TRUNCATION_DEGREE);
}

/// Decide which scattering vectors use the harmonic expansion.
///
/// In adaptive mode, the expansion is used for all vectors up to the largest
/// index for which `4 * degree < floor(sqrt(2 N))`, with `N` the number of
/// atoms. If no vector fulfills this condition, all vectors use direct
/// summation.
#[time_graph::instrument(name = "planner::plan")]
pub fn plan(vectors: &ScatteringVectors, positions: &[Vector3D], mode: ExpansionMode) -> AlgorithmPartition {
    if mode == ExpansionMode::Off {
        return AlgorithmPartition::all_direct(vectors.len());
    }

    let extent = max_extent(positions);
    let degrees = vectors.iter()
        .map(|vector| truncation_degree(extent, vector.norm))
        .collect::<Vec<_>>();

    if mode == ExpansionMode::Forced {
        return AlgorithmPartition::with_expansion_prefix(&degrees, vectors.len());
    }

    let limit = f64::sqrt(2.0 * positions.len() as f64).floor() as usize;
    let threshold = (0..degrees.len()).rev().find(|&k| 4 * degrees[k] < limit);

    match threshold {
        Some(threshold) => AlgorithmPartition::with_expansion_prefix(&degrees, threshold + 1),
        None => {
            warn!(
                "the harmonic expansion is slower than direct summation for this system \
                ({} atoms, extent {:.3}), using direct summation for all scattering vectors",
                positions.len(), extent
            );
            AlgorithmPartition::all_direct(vectors.len())
        }
    }
}
