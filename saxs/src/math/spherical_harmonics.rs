use std::f64::consts::PI;

use ndarray::ArrayViewMut1;
use num_complex::Complex64;

use crate::Vector3D;

/// Linear index of `(l, m)` in arrays storing data for `0 <= l <= l_max` and
/// `0 <= m <= l`.
#[inline]
pub fn lm_index(l: usize, m: usize) -> usize {
    debug_assert!(m <= l);
    return m + l * (l + 1) / 2;
}

/// Number of `(l, m)` pairs with `0 <= l <= max_angular` and `0 <= m <= l`
#[inline]
pub fn lm_count(max_angular: usize) -> usize {
    (max_angular + 1) * (max_angular + 2) / 2
}

/// Array storing data for `0 <= l <= l_max`, `0 <= m <= l`. This type
/// implements `Index<[usize; 2]>` and `IndexMut<[usize; 2]>`.
#[derive(Clone)]
struct LegendreArray {
    max_angular: usize,
    data: Vec<f64>,
}

impl LegendreArray {
    /// Create a new `LegendreArray` with the given maximal angular degree, and
    /// all elements set to zero.
    pub fn new(max_angular: usize) -> LegendreArray {
        LegendreArray {
            max_angular: max_angular,
            data: vec![0.0; lm_count(max_angular)],
        }
    }
}

impl std::ops::Index<[usize; 2]> for LegendreArray {
    type Output = f64;
    fn index(&self, index: [usize; 2]) -> &f64 {
        let [l, m] = index;
        debug_assert!(l <= self.max_angular);
        &self.data[lm_index(l, m)]
    }
}

impl std::ops::IndexMut<[usize; 2]> for LegendreArray {
    fn index_mut(&mut self, index: [usize; 2]) -> &mut f64 {
        let [l, m] = index;
        debug_assert!(l <= self.max_angular);
        &mut self.data[lm_index(l, m)]
    }
}

impl std::fmt::Debug for LegendreArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LegendreArray[\n  l \\ m  ")?;
        for m in 0..(self.max_angular + 1) {
            write!(f, " {: ^12}", m)?;
        }
        writeln!(f)?;
        for l in 0..(self.max_angular + 1) {
            write!(f, "  {: <8}", l)?;
            for m in 0..=l {
                write!(f, " {:+.9}", self[[l, m]])?;
            }
            writeln!(f)?;
        }
        write!(f, "]")?;
        Ok(())
    }
}

/// Complex spherical harmonics `Y_l^m(θ, ϕ) = N_l^m P_l^m(cos θ) e^{i m ϕ}`
/// for `m >= 0`, orthonormal over the sphere and including the
/// Condon-Shortley phase `(-1)^m`.
///
/// Negative orders are not computed, callers use `Y_l^{-m} = conj(Y_l^m)` for
/// real-valued quantities expanded on this basis.
///
/// The normalized associated Legendre polynomials `N_l^m P_l^m` use the
/// recurrence described in <https://arxiv.org/abs/1410.1748>.
#[derive(Debug, Clone)]
pub struct SphericalHarmonics {
    max_angular: usize,
    /// array of normalized associated Legendre polynomials
    legendre_polynomials: LegendreArray,
    /// 'A' coefficient from the arxiv paper to compute Legendre polynomials
    coefficient_a: LegendreArray,
    /// 'B' coefficient from the arxiv paper to compute Legendre polynomials
    coefficient_b: LegendreArray,
}

impl SphericalHarmonics {
    /// Build a new `SphericalHarmonics` calculator with the given `l_max`, and
    /// pre-compute all required quantities
    pub fn new(max_angular: usize) -> SphericalHarmonics {
        let mut coefficient_a = LegendreArray::new(max_angular);
        let mut coefficient_b = LegendreArray::new(max_angular);
        for l in 2..(max_angular + 1) {
            let ls = (l * l) as f64;
            let lm1s = ((l - 1) * (l - 1)) as f64;
            for m in 0..(l - 1) {
                let ms = (m * m) as f64;
                coefficient_a[[l, m]] = f64::sqrt((4.0 * ls - 1.0) / (ls - ms));
                coefficient_b[[l, m]] = -f64::sqrt((lm1s - ms) / (4.0 * lm1s - 1.0));
            }
        }

        SphericalHarmonics {
            max_angular: max_angular,
            legendre_polynomials: LegendreArray::new(max_angular),
            coefficient_a: coefficient_a,
            coefficient_b: coefficient_b,
        }
    }

    /// Get the maximal angular degree computed by this `SphericalHarmonics`
    pub fn max_angular(&self) -> usize {
        self.max_angular
    }

    /// Evaluate the normalized Legendre polynomials at `cos(θ)`, and fill
    /// `self.legendre_polynomials` with the resulting values
    fn compute_legendre_polynomials(&mut self, cos_theta: f64, sin_theta: f64) {
        let mut value = f64::sqrt(0.25 / PI);
        self.legendre_polynomials[[0, 0]] = value;

        if self.max_angular > 0 {
            self.legendre_polynomials[[1, 0]] = cos_theta * f64::sqrt(3.0) * value;
            value *= -f64::sqrt(1.5) * sin_theta;
            self.legendre_polynomials[[1, 1]] = value;

            let a = &self.coefficient_a;
            let b = &self.coefficient_b;
            let p = &mut self.legendre_polynomials;

            for l in 2..(self.max_angular + 1) {
                for m in 0..(l - 1) {
                    p[[l, m]] = a[[l, m]] * (cos_theta * p[[l - 1, m]] + b[[l, m]] * p[[l - 2, m]]);
                }

                p[[l, l - 1]] = cos_theta * f64::sqrt(2.0 * l as f64 + 1.0) * value;
                value *= -f64::sqrt(1.0 + 0.5 / l as f64) * sin_theta;
                p[[l, l]] = value;
            }
        }
    }

    /// Evaluate all spherical harmonics with `m >= 0` for the given
    /// `direction`, and store the results in `values`, using the layout of
    /// [`lm_index`].
    ///
    /// The direction must be normalized. The azimuthal angle is taken to be
    /// zero along the z axis.
    pub fn compute(&mut self, direction: Vector3D, mut values: ArrayViewMut1<'_, Complex64>) {
        assert!(
            (direction.norm2() - 1.0).abs() < 1e-9,
            "expected the direction vector to be normalized in spherical harmonics"
        );
        assert_eq!(
            values.len(), lm_count(self.max_angular),
            "wrong size for the values array, expected {} values for max_angular={}, got {}",
            lm_count(self.max_angular), self.max_angular, values.len(),
        );

        let sin_theta = f64::hypot(direction[0], direction[1]);
        let cos_theta = direction[2];

        let phase = if sin_theta > f64::EPSILON {
            Complex64::new(direction[0] / sin_theta, direction[1] / sin_theta)
        } else {
            Complex64::new(1.0, 0.0)
        };

        self.compute_legendre_polynomials(cos_theta, sin_theta);

        // e^{i m ϕ} computed by successive multiplications
        let mut phase_m = Complex64::new(1.0, 0.0);
        for m in 0..(self.max_angular + 1) {
            for l in m..(self.max_angular + 1) {
                values[lm_index(l, m)] = self.legendre_polynomials[[l, m]] * phase_m;
            }
            phase_m *= phase;
        }
    }
}
