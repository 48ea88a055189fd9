use ndarray::Array2;

use crate::Vector3D;
use crate::calculators::parallel::ParallelReduction;

use crate::calculators::EngineInput;
use super::{DirectBackend, pair_contribution};

/// Double precision direct summation, distributing the rows of the pair grid
/// over the workers of a [`ParallelReduction`].
#[derive(Debug, Clone)]
pub struct ScalarDirect {
    reduction: ParallelReduction,
}

impl ScalarDirect {
    /// Create a new scalar backend using the given parallel reduction
    pub fn new(reduction: ParallelReduction) -> ScalarDirect {
        ScalarDirect { reduction }
    }
}

impl DirectBackend for ScalarDirect {
    fn name(&self) -> &'static str {
        "scalar"
    }

    #[time_graph::instrument(name = "ScalarDirect::compute")]
    fn compute(
        &self,
        input: &EngineInput<'_>,
        selected: &[usize],
        intensities: &mut [f64],
        derivatives: &mut Array2<Vector3D>,
    ) {
        if selected.is_empty() {
            return;
        }

        let n_atoms = input.positions.len();
        let n_selected = selected.len();
        let vectors = selected.iter()
            .map(|&k| (input.vectors[k].norm, input.vectors[k].vector()))
            .collect::<Vec<_>>();
        let form_factors = input.form_factors.values();

        let weights = input.interface.map(|interface| &interface.weights);
        let weight = |atom: usize| weights.map_or(1.0, |weights| weights[atom]);

        let (partial_intensities, partial_derivatives) = self.reduction.map_reduce(
            n_atoms,
            || (vec![0.0; n_selected], vec![Vector3D::zero(); n_selected * n_atoms]),
            |(intensity_sum, derivative_sum): &mut (Vec<f64>, Vec<Vector3D>), i| {
                let weight_i = weight(i);
                if weight_i == 0.0 {
                    return;
                }

                let position_i = input.positions[i];
                let mut row_sums = vec![0.0; n_selected];
                for j in 0..n_atoms {
                    let weight_j = weight(j);
                    if weight_j == 0.0 {
                        continue;
                    }

                    let delta = input.cell.minimum_image_delta(position_i, input.positions[j]);
                    for (s, (&k, &(norm, vector))) in selected.iter().zip(&vectors).enumerate() {
                        let amplitude = weight_i * form_factors[[k, i]] * weight_j * form_factors[[k, j]];
                        let (intensity, derivative) = pair_contribution(norm, vector, amplitude, delta);
                        row_sums[s] += intensity;
                        derivative_sum[s * n_atoms + j] += derivative;
                        derivative_sum[s * n_atoms + i] -= derivative;
                    }
                }

                for (s, &row_sum) in row_sums.iter().enumerate() {
                    intensity_sum[s] += row_sum;
                }

                if let Some(interface) = input.interface {
                    // the weight of atom i appears in both row i and column i
                    let slope = interface.slopes[i];
                    for (s, &row_sum) in row_sums.iter().enumerate() {
                        derivative_sum[s * n_atoms + i][2] += 2.0 * slope * row_sum;
                    }
                }
            }
        );

        for (s, &k) in selected.iter().enumerate() {
            intensities[k] = partial_intensities[s];
            let mut row = derivatives.row_mut(k);
            for (derivative, &value) in row.iter_mut().zip(&partial_derivatives[s * n_atoms..(s + 1) * n_atoms]) {
                *derivative = value;
            }
        }
    }
}
