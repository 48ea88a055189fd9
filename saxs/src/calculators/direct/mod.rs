//! Direct pairwise summation of the scattering intensity.
//!
//! For each selected scattering vector `k`, the intensity is the sum over all
//! ordered pairs of atoms `(i, j)` (including `i == j`) of
//! `f_k(i) f_k(j) K(q_k, r_ij)`, where `r_ij` is the minimum image
//! displacement from `i` to `j` and the kernel `K` is `cos(q·r)` for oriented
//! scattering vectors, and the orientationally averaged Debye kernel
//! `sin(qr) / qr` otherwise.

use ndarray::Array2;

use crate::Vector3D;
use super::EngineInput;

mod scalar;
pub use self::scalar::ScalarDirect;

mod batched;
pub use self::batched::BatchedDirect;

/// Implementation strategy for the direct summation.
///
/// Backends write the raw sums over the full grid of pairs for each selected
/// scattering vector `k` in `intensities[k]` and `derivatives[[k, atom]]`,
/// and leave other entries untouched.
pub trait DirectBackend: Send + Sync {
    /// Get the name of this backend, for logging
    fn name(&self) -> &'static str;

    /// Compute the intensity and its derivatives with respect to the atomic
    /// positions for the scattering vectors in `selected`.
    fn compute(
        &self,
        input: &EngineInput<'_>,
        selected: &[usize],
        intensities: &mut [f64],
        derivatives: &mut Array2<Vector3D>,
    );
}

/// Contribution of a single pair of atoms to the intensity and to the
/// derivative with respect to the position of the second atom. The
/// derivative with respect to the first atom is the opposite.
#[inline]
pub(crate) fn pair_contribution(
    norm: f64,
    vector: Option<Vector3D>,
    amplitude: f64,
    delta: Vector3D,
) -> (f64, Vector3D) {
    if let Some(q) = vector {
        let (sin, cos) = (q * delta).sin_cos();
        return (amplitude * cos, -amplitude * sin * q);
    }

    let distance = delta.norm();
    let x = norm * distance;
    if x == 0.0 {
        // the derivative vanishes together with the displacement
        return (amplitude, Vector3D::zero());
    }

    let (sin, cos) = x.sin_cos();
    let sinc = sin / x;
    let factor = amplitude * (cos - sinc) / (distance * distance);
    return (amplitude * sinc, factor * delta);
}
