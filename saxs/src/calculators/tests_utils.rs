use approx::assert_relative_eq;
use ndarray::Array2;

use crate::Vector3D;
use crate::systems::{System, SimpleSystem};

/// Check that analytical derivatives of the intensities agree with a
/// centered finite difference calculation.
///
/// `compute` must return the intensities for all scattering vectors and the
/// corresponding `(n_vectors, n_atoms)` derivatives for the given system.
#[allow(clippy::needless_pass_by_value)]
pub fn finite_difference<F>(mut system: SimpleSystem, compute: F)
where
    F: Fn(&SimpleSystem) -> (Vec<f64>, Array2<Vector3D>),
{
    let (reference, derivatives) = compute(&system);
    let n_atoms = system.size().unwrap();
    assert_eq!(derivatives.dim(), (reference.len(), n_atoms));

    let delta = 1e-5;
    for atom_i in 0..n_atoms {
        for spatial in 0..3 {
            system.positions_mut()[atom_i][spatial] += delta;
            let (plus, _) = compute(&system);

            system.positions_mut()[atom_i][spatial] -= 2.0 * delta;
            let (minus, _) = compute(&system);

            system.positions_mut()[atom_i][spatial] += delta;

            for k in 0..reference.len() {
                let finite_difference = (plus[k] - minus[k]) / (2.0 * delta);
                assert_relative_eq!(
                    derivatives[[k, atom_i]][spatial], finite_difference,
                    epsilon = 1e-7 * reference[k].abs(),
                    max_relative = 1e-5,
                );
            }
        }
    }
}
