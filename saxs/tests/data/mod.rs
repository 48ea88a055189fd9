#![allow(dead_code)]

use approx::assert_relative_eq;
use ndarray::Array2;

use saxs::{FormFactors, ScatteringVectors, SimpleSystem, System, UnitCell, Vector3D};

/// The water dimer from `tests/data/water-dimer.xyz`, built without going
/// through chemfiles
pub fn water_dimer() -> SimpleSystem {
    let mut system = SimpleSystem::new(UnitCell::cubic(12.0));
    system.add_atom(8, Vector3D::new(0.000, 0.000, 0.000));
    system.add_atom(1, Vector3D::new(0.000, 0.75545, -0.58895));
    system.add_atom(1, Vector3D::new(0.000, -0.75545, -0.58895));
    system.add_atom(8, Vector3D::new(2.900, 0.100, 0.000));
    system.add_atom(1, Vector3D::new(3.400, 0.855, -0.300));
    system.add_atom(1, Vector3D::new(3.400, -0.655, -0.300));
    return system;
}

/// Deterministic, irregular cluster of `n` atoms inside a sphere of the given
/// `radius`, with an infinite cell. Atoms alternate between types 6 and 8.
pub fn cluster(n: usize, radius: f64) -> SimpleSystem {
    let golden_angle = std::f64::consts::PI * (3.0 - f64::sqrt(5.0));

    let mut system = SimpleSystem::new(UnitCell::infinite());
    for i in 0..n {
        let z = 1.0 - 2.0 * (i as f64 + 0.5) / n as f64;
        let rho = f64::sqrt(1.0 - z * z);
        let phi = golden_angle * i as f64;
        // radii jumping around between 0.2 and 1.0 of the radius
        let r = radius * (0.2 + 0.8 * (0.5 + 0.5 * f64::sin(12.9898 * i as f64 + 0.3)));

        let atomic_type = if i % 2 == 0 { 6 } else { 8 };
        system.add_atom(atomic_type, Vector3D::new(
            r * rho * f64::cos(phi),
            r * rho * f64::sin(phi),
            r * z,
        ));
    }
    return system;
}

/// Amplitudes that differ between atoms and scattering vectors
pub fn varying_form_factors(n_vectors: usize, n_atoms: usize) -> FormFactors {
    let values = Array2::from_shape_fn((n_vectors, n_atoms), |(k, i)| {
        1.0 + 0.25 * (i % 3) as f64 - 0.05 * k as f64
    });
    return FormFactors::new(values);
}

/// Straightforward double loop over all pairs of atoms, computing the
/// intensities and their derivatives
pub fn reference_intensities(
    system: &dyn System,
    vectors: &ScatteringVectors,
    form_factors: &FormFactors,
) -> (Vec<f64>, Array2<Vector3D>) {
    let positions = system.positions().unwrap();
    let cell = system.cell().unwrap();
    let n_atoms = positions.len();

    let mut intensities = vec![0.0; vectors.len()];
    let mut derivatives = Array2::from_elem((vectors.len(), n_atoms), Vector3D::zero());
    for (k, vector) in vectors.iter().enumerate() {
        for i in 0..n_atoms {
            for j in 0..n_atoms {
                let amplitude = form_factors.values()[[k, i]] * form_factors.values()[[k, j]];
                let delta = cell.minimum_image_delta(positions[i], positions[j]);

                let (value, gradient) = match vector.vector() {
                    Some(q) => {
                        let phase = q * delta;
                        (amplitude * phase.cos(), -amplitude * phase.sin() * q)
                    }
                    None => {
                        let r = delta.norm();
                        let x = vector.norm * r;
                        if x == 0.0 {
                            (amplitude, Vector3D::zero())
                        } else {
                            let factor = amplitude * (x.cos() - x.sin() / x) / (r * r);
                            (amplitude * x.sin() / x, factor * delta)
                        }
                    }
                };

                intensities[k] += value;
                derivatives[[k, j]] += gradient;
                derivatives[[k, i]] -= gradient;
            }
        }
    }

    return (intensities, derivatives);
}

/// Compare `derivatives` of `compute` against centered finite differences
pub fn check_finite_differences<F>(system: &SimpleSystem, derivatives: &Array2<Vector3D>, compute: F)
where
    F: Fn(&SimpleSystem) -> Vec<f64>,
{
    let delta = 1e-5;
    let reference = compute(system);

    let mut system = system.clone();
    let n_atoms = system.size().unwrap();
    for atom in 0..n_atoms {
        for spatial in 0..3 {
            system.positions_mut()[atom][spatial] += delta;
            let plus = compute(&system);

            system.positions_mut()[atom][spatial] -= 2.0 * delta;
            let minus = compute(&system);

            system.positions_mut()[atom][spatial] += delta;

            for k in 0..reference.len() {
                let finite_difference = (plus[k] - minus[k]) / (2.0 * delta);
                assert_relative_eq!(
                    derivatives[[k, atom]][spatial], finite_difference,
                    epsilon = 1e-7 * reference[k].abs(),
                    max_relative = 1e-5,
                );
            }
        }
    }
}

/// Check that the derivatives for each scattering vector sum to zero over
/// all atoms
pub fn check_translation_invariance(derivatives: &Array2<Vector3D>, intensities: &[f64]) {
    for (k, row) in derivatives.outer_iter().enumerate() {
        let total = row.iter().copied().sum::<Vector3D>();
        let scale = row.iter().map(|d| d.norm()).fold(intensities[k].abs(), f64::max);
        assert!(
            total.norm() <= 1e-10 * scale,
            "derivatives for scattering vector {} sum to {:?}", k, total
        );
    }
}
