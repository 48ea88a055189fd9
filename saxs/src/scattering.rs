//! Scattering vectors at which the intensity is evaluated.

use crate::{Error, Vector3D};
use crate::systems::UnitCell;

/// A single scattering vector, stored as a norm and an optional direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatteringVector {
    /// norm of the scattering vector, `|q|`
    pub norm: f64,
    /// normalized direction of the scattering vector. Vectors without
    /// direction are orientationally averaged, giving the Debye kernel
    /// `sin(qr) / qr` instead of `cos(q·r)`.
    pub direction: Option<Vector3D>,
}

impl ScatteringVector {
    /// Create an orientationally averaged scattering vector with the given
    /// norm
    pub fn isotropic(norm: f64) -> ScatteringVector {
        ScatteringVector {
            norm: norm,
            direction: None,
        }
    }

    /// Create an oriented scattering vector from its Cartesian components
    pub fn oriented(vector: Vector3D) -> ScatteringVector {
        let norm = vector.norm();
        let direction = if norm > 0.0 {
            Some(vector / norm)
        } else {
            None
        };

        ScatteringVector {
            norm: norm,
            direction: direction,
        }
    }

    /// Get the full Cartesian vector, if this scattering vector is oriented
    pub fn vector(&self) -> Option<Vector3D> {
        self.direction.map(|direction| self.norm * direction)
    }
}

/// Ordered list of scattering vectors, with strictly positive and strictly
/// ascending norms.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatteringVectors {
    vectors: Vec<ScatteringVector>,
}

impl ScatteringVectors {
    /// Create a new list of scattering vectors, checking that it is not empty
    /// and that the norms are positive and strictly increasing.
    pub fn new(vectors: Vec<ScatteringVector>) -> Result<ScatteringVectors, Error> {
        if vectors.is_empty() {
            return Err(Error::InvalidParameter(
                "the list of scattering vectors can not be empty".into()
            ));
        }

        for (i, vector) in vectors.iter().enumerate() {
            if !(vector.norm > 0.0) || !vector.norm.is_finite() {
                return Err(Error::InvalidParameter(format!(
                    "scattering vector {} must have a positive norm, got {}", i, vector.norm
                )));
            }
        }

        for (i, pair) in vectors.windows(2).enumerate() {
            if pair[1].norm <= pair[0].norm {
                return Err(Error::InvalidParameter(format!(
                    "scattering vectors norms must be in strictly ascending order, \
                    got {} after {} at index {}", pair[1].norm, pair[0].norm, i + 1
                )));
            }
        }

        return Ok(ScatteringVectors { vectors });
    }

    /// Create orientationally averaged scattering vectors with the given
    /// norms
    pub fn from_norms(norms: &[f64]) -> Result<ScatteringVectors, Error> {
        ScatteringVectors::new(norms.iter().map(|&q| ScatteringVector::isotropic(q)).collect())
    }

    /// Create oriented scattering vectors from their Cartesian components
    pub fn from_vectors(vectors: &[Vector3D]) -> Result<ScatteringVectors, Error> {
        ScatteringVectors::new(vectors.iter().map(|&q| ScatteringVector::oriented(q)).collect())
    }

    /// Create oriented scattering vectors at the reciprocal lattice points
    /// `q = 2π (h b_1 + k b_2 + l b_3)` of the given `cell`, for each
    /// `[h, k, l]` in `indices`.
    ///
    /// The resulting norms must be strictly ascending, so `indices` should be
    /// given by increasing norm, without symmetry-equivalent entries.
    pub fn from_miller_indices(cell: &UnitCell, indices: &[[i32; 3]]) -> Result<ScatteringVectors, Error> {
        if cell.is_infinite() {
            return Err(Error::InvalidParameter(
                "can not use Miller indices with an infinite cell".into()
            ));
        }

        let reciprocal = 2.0 * std::f64::consts::PI * cell.reciprocal();
        let b1 = Vector3D::from(reciprocal[0]);
        let b2 = Vector3D::from(reciprocal[1]);
        let b3 = Vector3D::from(reciprocal[2]);

        let vectors = indices.iter().map(|&[h, k, l]| {
            ScatteringVector::oriented(h as f64 * b1 + k as f64 * b2 + l as f64 * b3)
        }).collect();

        return ScatteringVectors::new(vectors);
    }

    /// Number of scattering vectors
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Is this list empty? This is always false for a validated list.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Iterate over the scattering vectors
    pub fn iter(&self) -> std::slice::Iter<'_, ScatteringVector> {
        self.vectors.iter()
    }

    /// Get the norms of all scattering vectors
    pub fn norms(&self) -> Vec<f64> {
        self.vectors.iter().map(|v| v.norm).collect()
    }

    /// Get the largest norm in this list
    pub fn max_norm(&self) -> f64 {
        self.vectors.last().map_or(0.0, |v| v.norm)
    }
}

impl std::ops::Index<usize> for ScatteringVectors {
    type Output = ScatteringVector;

    fn index(&self, i: usize) -> &ScatteringVector {
        &self.vectors[i]
    }
}

impl<'a> IntoIterator for &'a ScatteringVectors {
    type Item = &'a ScatteringVector;
    type IntoIter = std::slice::Iter<'a, ScatteringVector>;

    fn into_iter(self) -> Self::IntoIter {
        self.vectors.iter()
    }
}
