use ndarray::{Array1, Array2, ArrayView1, Axis, par_azip};
use rayon::prelude::*;

use crate::Vector3D;

use crate::calculators::EngineInput;
use super::DirectBackend;

/// Single precision direct summation working on full `N x N` arrays of
/// displacements and distances, in the way an accelerator would.
///
/// The displacement grids are built once per evaluation and shared by all
/// selected scattering vectors, which are evaluated in parallel. The memory
/// usage grows as `N^2`, and the results only agree with [`ScalarDirect`]
/// to single precision.
///
/// [`ScalarDirect`]: super::ScalarDirect
#[derive(Debug, Clone, Default)]
pub struct BatchedDirect;

impl BatchedDirect {
    /// Create a new batched backend
    pub fn new() -> BatchedDirect {
        BatchedDirect
    }
}

/// Displacement and distance grids, `delta[c][[i, j]]` contains component `c`
/// of the minimum image displacement from atom `i` to atom `j`.
struct PairGrids {
    delta: [Array2<f32>; 3],
    distance: Array2<f32>,
}

impl PairGrids {
    #[time_graph::instrument(name = "BatchedDirect::pair_grids")]
    fn new(input: &EngineInput<'_>) -> PairGrids {
        let positions = input.positions;
        let n_atoms = positions.len();

        let component = |c: usize| {
            Array2::from_shape_fn((n_atoms, n_atoms), |(i, j)| {
                (positions[j][c] - positions[i][c]) as f32
            })
        };
        let mut dx = component(0);
        let mut dy = component(1);
        let mut dz = component(2);

        if !input.cell.is_infinite() {
            let matrix = input.cell.matrix();
            let mut cell = [[0.0_f32; 3]; 3];
            for row in 0..3 {
                for col in 0..3 {
                    cell[row][col] = matrix[row][col] as f32;
                }
            }

            par_azip!((x in &mut dx, y in &mut dy, z in &mut dz) {
                let mut delta = [*x, *y, *z];
                for row in [2, 1, 0] {
                    let shift = f32::floor(delta[row] / cell[row][row] + 0.5);
                    delta[0] -= shift * cell[row][0];
                    delta[1] -= shift * cell[row][1];
                    delta[2] -= shift * cell[row][2];
                }
                *x = delta[0];
                *y = delta[1];
                *z = delta[2];
            });
        }

        let mut distance = Array2::<f32>::zeros((n_atoms, n_atoms));
        par_azip!((r in &mut distance, &x in &dx, &y in &dy, &z in &dz) {
            *r = f32::sqrt(x * x + y * y + z * z);
        });

        return PairGrids {
            delta: [dx, dy, dz],
            distance: distance,
        };
    }
}

/// Get `Σ_i grid[i, j] - Σ_j grid[j, i]` for all atoms
fn column_minus_row(grid: &Array2<f32>) -> Array1<f64> {
    let columns = grid.sum_axis(Axis(0));
    let rows = grid.sum_axis(Axis(1));
    return (&columns - &rows).mapv(f64::from);
}

/// Add the derivative of the interface weights, `2 w'_i / w_i Σ_j kernel[i, j]`,
/// to the `z` component of the derivatives
fn add_interface_slopes(kernel: &Array2<f32>, slopes: Option<&[f64]>, derivatives: &mut [Vector3D]) {
    if let Some(slopes) = slopes {
        let rows = kernel.sum_axis(Axis(1));
        for ((derivative, &slope), &row) in derivatives.iter_mut().zip(slopes).zip(&rows) {
            derivative[2] += 2.0 * slope * f64::from(row);
        }
    }
}

/// Compute the intensity and derivatives for a single scattering vector.
///
/// `amplitudes` already include the interface weights, and `slopes` are the
/// logarithmic derivatives of these weights.
fn compute_vector(
    grids: &PairGrids,
    norm: f64,
    vector: Option<Vector3D>,
    amplitudes: &Array1<f32>,
    slopes: Option<&[f64]>,
) -> (f64, Vec<Vector3D>) {
    let n_atoms = amplitudes.len();
    let column = amplitudes.view().insert_axis(Axis(1));
    let row = amplitudes.view().insert_axis(Axis(0));
    let amplitude = &column * &row;

    let [dx, dy, dz] = &grids.delta;
    let mut derivatives = vec![Vector3D::zero(); n_atoms];

    if let Some(q) = vector {
        let (qx, qy, qz) = (q[0] as f32, q[1] as f32, q[2] as f32);
        let phase = dx * qx + dy * qy + dz * qz;

        let kernel = &amplitude * &phase.mapv(f32::cos);
        let intensity = kernel.sum();
        let factor = &amplitude * &phase.mapv(|p| -f32::sin(p));

        let sum = column_minus_row(&factor);
        for (derivative, &value) in derivatives.iter_mut().zip(&sum) {
            *derivative = value * q;
        }
        add_interface_slopes(&kernel, slopes, &mut derivatives);

        return (f64::from(intensity), derivatives);
    }

    let q = norm as f32;
    let mut sinc = Array2::<f32>::zeros((n_atoms, n_atoms));
    let mut factor = Array2::<f32>::zeros((n_atoms, n_atoms));
    par_azip!((s in &mut sinc, f in &mut factor, &a in &amplitude, &r in &grids.distance) {
        let x = q * r;
        if x == 0.0 {
            *s = a;
            *f = 0.0;
        } else {
            let (sin, cos) = x.sin_cos();
            *s = a * sin / x;
            *f = a * (cos - sin / x) / (r * r);
        }
    });

    let intensity = sinc.sum();
    for (c, delta) in [dx, dy, dz].into_iter().enumerate() {
        let sum = column_minus_row(&(&factor * delta));
        for (derivative, &value) in derivatives.iter_mut().zip(&sum) {
            derivative[c] = value;
        }
    }
    add_interface_slopes(&sinc, slopes, &mut derivatives);

    return (f64::from(intensity), derivatives);
}

impl DirectBackend for BatchedDirect {
    fn name(&self) -> &'static str {
        "batched"
    }

    #[time_graph::instrument(name = "BatchedDirect::compute")]
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

        let grids = PairGrids::new(input);

        let slopes = input.interface.map(|interface| &*interface.slopes);
        let results = selected.par_iter().map(|&k| {
            let mut amplitudes = input.form_factors.row(k).to_owned();
            if let Some(interface) = input.interface {
                amplitudes *= &ArrayView1::from(interface.weights.as_slice());
            }
            let amplitudes = amplitudes.mapv(|f| f as f32);

            let vector = &input.vectors[k];
            compute_vector(&grids, vector.norm, vector.vector(), &amplitudes, slopes)
        }).collect::<Vec<_>>();

        for (&k, (intensity, values)) in selected.iter().zip(results) {
            intensities[k] = intensity;
            for (derivative, value) in derivatives.row_mut(k).iter_mut().zip(values) {
                *derivative = value;
            }
        }
    }
}
