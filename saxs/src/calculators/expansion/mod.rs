//! Evaluation of the orientationally averaged intensity through an expansion
//! of the atomic density on spherical harmonics and spherical Bessel
//! functions.
//!
//! Using the plane wave expansion, the Debye sum becomes
//!
//! ```text
//! I(q) = Σ_ij f_i f_j sin(q r_ij) / (q r_ij) = 4π Σ_n Σ_m |B_nm(q)|^2
//! B_nm(q) = Σ_i f_i j_n(q r_i) Y_n^m(r̂_i)
//! ```
//!
//! where the positions are taken relative to the center of the atoms. The
//! sum over `n` is truncated at a degree chosen by the planner. This makes
//! the cost linear with the number of atoms instead of quadratic.

use std::f64::consts::PI;

use log::debug;
use ndarray::{Array2, Axis};
use num_complex::Complex64;
use rayon::prelude::*;

use crate::{Error, Vector3D};
use crate::math::{SphericalHarmonics, spherical_bessel_first_kind, SPHERICAL_BESSEL_MAX_ARGUMENT};
use crate::math::{lm_index, lm_count, LADDER_COEFFICIENTS, LADDER_MAX_DEGREE};

use super::EngineInput;
use super::parallel::ParallelReduction;
use super::planner::AlgorithmPartition;

mod derivatives;
pub use self::derivatives::basis_gradient;

/// Atoms expressed in spherical coordinates around their center
struct CenteredAtoms {
    /// distance of each atom to the center
    radii: Vec<f64>,
    /// spherical harmonics `Y_n^m(r̂_i)` for each atom, for `m >= 0`
    harmonics: Array2<Complex64>,
}

impl CenteredAtoms {
    #[time_graph::instrument(name = "HarmonicExpansion::centered_atoms")]
    fn new(positions: &[Vector3D], max_degree: usize, reduction: &ParallelReduction) -> CenteredAtoms {
        let n_atoms = positions.len();
        let center = positions.iter().copied().sum::<Vector3D>() / n_atoms as f64;

        let mut radii = Vec::with_capacity(n_atoms);
        let mut directions = Vec::with_capacity(n_atoms);
        for &position in positions {
            let relative = position - center;
            let radius = relative.norm();
            radii.push(radius);
            if radius < 1e-12 {
                // the direction is arbitrary for atoms at the center
                directions.push(Vector3D::new(0.0, 0.0, 1.0));
            } else {
                directions.push(relative / radius);
            }
        }

        let mut harmonics = Array2::from_elem((n_atoms, lm_count(max_degree)), Complex64::new(0.0, 0.0));
        if reduction.workers() == 1 {
            let mut spherical_harmonics = SphericalHarmonics::new(max_degree);
            for (row, &direction) in harmonics.axis_iter_mut(Axis(0)).zip(&directions) {
                spherical_harmonics.compute(direction, row);
            }
        } else {
            harmonics.axis_iter_mut(Axis(0))
                .into_par_iter()
                .zip(directions.par_iter())
                .for_each_init(
                    || SphericalHarmonics::new(max_degree),
                    |spherical_harmonics, (row, &direction)| spherical_harmonics.compute(direction, row),
                );
        }

        return CenteredAtoms { radii, harmonics };
    }

    fn max_radius(&self) -> f64 {
        self.radii.iter().copied().fold(0.0, f64::max)
    }
}

/// Harmonic expansion ("Middleman") evaluation of the intensity and its
/// derivatives, distributing atoms over the workers of a
/// [`ParallelReduction`].
#[derive(Debug, Clone)]
pub struct HarmonicExpansion {
    reduction: ParallelReduction,
}

impl HarmonicExpansion {
    /// Create a new harmonic expansion engine
    pub fn new(reduction: ParallelReduction) -> HarmonicExpansion {
        HarmonicExpansion { reduction }
    }

    /// Compute the intensity and derivatives for all scattering vectors in
    /// `partition.expansion`, using the corresponding truncation degree. All
    /// these scattering vectors must be orientationally averaged, and the
    /// atoms can not carry interface weights.
    ///
    /// The derivatives include the contribution of the displacement of the
    /// expansion center, and sum to zero.
    #[time_graph::instrument(name = "HarmonicExpansion::compute")]
    pub fn compute(
        &self,
        input: &EngineInput<'_>,
        partition: &AlgorithmPartition,
        intensities: &mut [f64],
        derivatives: &mut Array2<Vector3D>,
    ) -> Result<(), Error> {
        let max_degree = match partition.max_degree() {
            Some(degree) => degree,
            None => return Ok(()),
        };

        if max_degree > LADDER_MAX_DEGREE || partition.degrees.contains(&0) {
            return Err(Error::InvalidParameter(format!(
                "the harmonic expansion supports truncation degrees between 1 and {}, got {:?}",
                LADDER_MAX_DEGREE, partition.degrees
            )));
        }

        if input.interface.is_some() {
            return Err(Error::InvalidParameter(
                "the harmonic expansion does not support interface weights".into()
            ));
        }

        if let Some(&k) = partition.expansion.iter().find(|&&k| input.vectors[k].vector().is_some()) {
            return Err(Error::InvalidParameter(format!(
                "the harmonic expansion only supports orientationally averaged \
                scattering vectors, but scattering vector {} is oriented", k
            )));
        }

        let n_atoms = input.positions.len();
        input.form_factors.check_shape(input.vectors.len(), n_atoms)?;
        if n_atoms == 0 {
            for &k in &partition.expansion {
                intensities[k] = 0.0;
            }
            return Ok(());
        }

        let atoms = CenteredAtoms::new(input.positions, max_degree, &self.reduction);

        let max_radius = atoms.max_radius();
        for &k in &partition.expansion {
            let argument = input.vectors[k].norm * max_radius;
            if argument > SPHERICAL_BESSEL_MAX_ARGUMENT {
                return Err(Error::InvalidInput(format!(
                    "the harmonic expansion at q = {} needs spherical Bessel functions \
                    at q·r = {}, above the supported maximum of {}",
                    input.vectors[k].norm, argument, SPHERICAL_BESSEL_MAX_ARGUMENT
                )));
            }
        }

        for (&k, &degree) in partition.expansion.iter().zip(&partition.degrees) {
            debug!("harmonic expansion for q = {} with truncation degree {}", input.vectors[k].norm, degree);

            let (intensity, gradients) = self.compute_vector(input, &atoms, k, degree);
            intensities[k] = intensity;
            for (derivative, gradient) in derivatives.row_mut(k).iter_mut().zip(gradients) {
                *derivative = gradient;
            }
        }

        Ok(())
    }

    /// Compute the intensity and derivatives for the scattering vector `k`,
    /// keeping all degrees below `degree` in the expansion
    #[time_graph::instrument(name = "HarmonicExpansion::compute_vector")]
    fn compute_vector(&self, input: &EngineInput<'_>, atoms: &CenteredAtoms, k: usize, degree: usize) -> (f64, Vec<Vector3D>) {
        let n_atoms = input.positions.len();
        let q = input.vectors[k].norm;
        let form_factors = input.form_factors.row(k);

        // j_n(q r_i) for 0 <= n <= degree, one chunk per atom
        let stride = degree + 1;
        let mut bessel = vec![0.0; n_atoms * stride];
        if self.reduction.workers() == 1 {
            for (values, &radius) in bessel.chunks_mut(stride).zip(&atoms.radii) {
                spherical_bessel_first_kind(q * radius, values);
            }
        } else {
            bessel.par_chunks_mut(stride).zip(atoms.radii.par_iter()).for_each(|(values, &radius)| {
                spherical_bessel_first_kind(q * radius, values);
            });
        }

        // expansion coefficients B_nm for n < degree
        let coefficients = self.reduction.map_reduce(
            n_atoms,
            || vec![Complex64::new(0.0, 0.0); lm_count(degree - 1)],
            |coefficients: &mut Vec<Complex64>, i| {
                let amplitude = form_factors[i];
                for n in 0..degree {
                    let radial = amplitude * bessel[i * stride + n];
                    for m in 0..=n {
                        coefficients[lm_index(n, m)] += radial * atoms.harmonics[[i, lm_index(n, m)]];
                    }
                }
            }
        );

        let mut sum = 0.0;
        for n in 0..degree {
            sum += coefficients[lm_index(n, 0)].norm_sqr();
            for m in 1..=n {
                sum += 2.0 * coefficients[lm_index(n, m)].norm_sqr();
            }
        }
        let intensity = 4.0 * PI * sum;

        let ladder = &*LADDER_COEFFICIENTS;
        let mut gradients = self.reduction.map_reduce(
            n_atoms,
            || vec![Vector3D::zero(); n_atoms],
            |gradients: &mut Vec<Vector3D>, i| {
                // basis functions R_n^m = j_n Y_n^m for n <= degree
                let mut basis = vec![Complex64::new(0.0, 0.0); lm_count(degree)];
                for n in 0..=degree {
                    let radial = bessel[i * stride + n];
                    for m in 0..=n {
                        basis[lm_index(n, m)] = radial * atoms.harmonics[[i, lm_index(n, m)]];
                    }
                }

                let mut gradient = Vector3D::zero();
                for n in 0..degree {
                    for m in 0..=n {
                        let weight = if m == 0 { 1.0 } else { 2.0 };
                        let coefficient = coefficients[lm_index(n, m)].conj();
                        let [d_x, d_y, d_z] = basis_gradient(ladder, &basis, n, m);
                        gradient[0] += weight * (coefficient * d_x).re;
                        gradient[1] += weight * (coefficient * d_y).re;
                        gradient[2] += weight * (coefficient * d_z).re;
                    }
                }

                gradients[i] = 8.0 * PI * q * form_factors[i] * gradient;
            }
        );

        // the expansion center moves with the atoms
        let mean = gradients.iter().copied().sum::<Vector3D>() / n_atoms as f64;
        for gradient in &mut gradients {
            *gradient -= mean;
        }

        return (intensity, gradients);
    }
}
