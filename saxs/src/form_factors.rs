//! Per-atom, per-scattering vector amplitudes (form factors) entering the
//! intensity calculation.

use std::collections::BTreeMap;

use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::Error;

/// Abstraction over sources of scattering amplitudes. Any type implementing
/// this trait can be turned into a [`FormFactors`] matrix.
pub trait FormFactorProvider {
    /// Number of scattering vectors for which amplitudes are available
    fn n_vectors(&self) -> usize;
    /// Number of atoms for which amplitudes are available
    fn n_atoms(&self) -> usize;
    /// Get the amplitude of atom `atom` at the scattering vector `vector`
    fn amplitude(&self, vector: usize, atom: usize) -> f64;
}

/// Matrix of scattering amplitudes, with one row per scattering vector and
/// one column per atom.
#[derive(Debug, Clone, PartialEq)]
pub struct FormFactors {
    values: Array2<f64>,
}

impl FormFactors {
    /// Create form factors from an existing `(n_vectors, n_atoms)` matrix
    pub fn new(values: Array2<f64>) -> FormFactors {
        FormFactors { values }
    }

    /// Use the same amplitude `value` for all atoms and scattering vectors
    pub fn constant(n_vectors: usize, n_atoms: usize, value: f64) -> FormFactors {
        FormFactors {
            values: Array2::from_elem((n_vectors, n_atoms), value),
        }
    }

    /// Evaluate all the amplitudes of the given `provider`
    pub fn from_provider(provider: &dyn FormFactorProvider) -> FormFactors {
        let shape = (provider.n_vectors(), provider.n_atoms());
        let values = Array2::from_shape_fn(shape, |(k, i)| provider.amplitude(k, i));
        return FormFactors { values };
    }

    /// Get the number of scattering vectors
    pub fn n_vectors(&self) -> usize {
        self.values.nrows()
    }

    /// Get the number of atoms
    pub fn n_atoms(&self) -> usize {
        self.values.ncols()
    }

    /// Get the full amplitudes matrix
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Get the amplitudes of all atoms for the scattering vector `vector`
    pub fn row(&self, vector: usize) -> ArrayView1<'_, f64> {
        self.values.row(vector)
    }

    /// Check that these form factors can be used with `n_vectors` scattering
    /// vectors and `n_atoms` atoms.
    pub(crate) fn check_shape(&self, n_vectors: usize, n_atoms: usize) -> Result<(), Error> {
        if self.values.dim() != (n_vectors, n_atoms) {
            return Err(Error::InvalidParameter(format!(
                "expected form factors for {} scattering vectors and {} atoms, got a ({}, {}) matrix",
                n_vectors, n_atoms, self.n_vectors(), self.n_atoms()
            )));
        }
        Ok(())
    }

    /// Multiply all amplitudes by `factor`
    pub fn scale(&mut self, factor: f64) {
        self.values *= factor;
    }

    /// Normalize the amplitudes such that the zero-angle intensity becomes
    /// `scale`, i.e. divide all amplitudes by `sqrt(I(0) / scale)`.
    pub fn normalize(&mut self, zero_angle_intensity: f64, scale: f64) -> Result<(), Error> {
        if !(zero_angle_intensity > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "the zero-angle intensity must be positive to normalize form factors, got {}",
                zero_angle_intensity
            )));
        }

        if !(scale > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "the intensity scale must be positive, got {}", scale
            )));
        }

        self.scale(1.0 / f64::sqrt(zero_angle_intensity / scale));
        Ok(())
    }
}

impl FormFactorProvider for FormFactors {
    fn n_vectors(&self) -> usize {
        self.values.nrows()
    }

    fn n_atoms(&self) -> usize {
        self.values.ncols()
    }

    fn amplitude(&self, vector: usize, atom: usize) -> f64 {
        self.values[[vector, atom]]
    }
}

/// Amplitudes given as a polynomial in `q` for each atom:
/// `f_i(q) = Σ_j p_ij q^j`.
#[derive(Debug, Clone)]
pub struct PolynomialFormFactors {
    q_values: Vec<f64>,
    parameters: Vec<Vec<f64>>,
}

impl PolynomialFormFactors {
    /// Create polynomial form factors evaluated at the given norms of the
    /// scattering vectors. `parameters[i]` contains the coefficients of the
    /// polynomial for atom `i`, starting with the constant term.
    pub fn new(q_values: Vec<f64>, parameters: Vec<Vec<f64>>) -> Result<PolynomialFormFactors, Error> {
        for (i, coefficients) in parameters.iter().enumerate() {
            if coefficients.is_empty() {
                return Err(Error::InvalidParameter(format!(
                    "missing polynomial coefficients for atom {}", i
                )));
            }
        }

        Ok(PolynomialFormFactors { q_values, parameters })
    }

    /// Create polynomial form factors where the coefficients are shared by
    /// all atoms with the same type
    pub fn by_type(
        q_values: Vec<f64>,
        types: &[i32],
        parameters: &BTreeMap<i32, Vec<f64>>,
    ) -> Result<PolynomialFormFactors, Error> {
        let mut per_atom = Vec::with_capacity(types.len());
        for atomic_type in types {
            match parameters.get(atomic_type) {
                Some(coefficients) => per_atom.push(coefficients.clone()),
                None => {
                    return Err(Error::InvalidParameter(format!(
                        "missing form factor parameters for atomic type {}", atomic_type
                    )));
                }
            }
        }

        return PolynomialFormFactors::new(q_values, per_atom);
    }

    /// Get the intensity at zero angle, `I(0) = (Σ_i p_i0)^2`
    pub fn zero_angle_intensity(&self) -> f64 {
        let amplitude = self.parameters.iter().map(|p| p[0]).sum::<f64>();
        return amplitude * amplitude;
    }
}

impl FormFactorProvider for PolynomialFormFactors {
    fn n_vectors(&self) -> usize {
        self.q_values.len()
    }

    fn n_atoms(&self) -> usize {
        self.parameters.len()
    }

    fn amplitude(&self, vector: usize, atom: usize) -> f64 {
        let q = self.q_values[vector];
        // Horner scheme
        self.parameters[atom].iter().rev().fold(0.0, |acc, &p| acc * q + p)
    }
}
