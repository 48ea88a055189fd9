//! Gradients of the basis functions `R_n^m(x) = j_n(|x|) Y_n^m(x / |x|)`
//! with respect to the Cartesian components of `x`, expressed with the
//! values of the basis functions of neighbouring degree and order.

use num_complex::Complex64;

use crate::math::{LadderCoefficients, lm_index};

/// Get the value of `R_n^m` from `values`, or zero if `(n, m)` is outside of
/// `n >= 0, 0 <= m <= n`.
#[inline]
fn basis_value(values: &[Complex64], n: isize, m: isize) -> Complex64 {
    if n < 0 || m < 0 || m > n {
        return Complex64::new(0.0, 0.0);
    }
    return values[lm_index(n as usize, m as usize)];
}

/// Compute the gradient `[∂x, ∂y, ∂z]` of `R_n^m` for `m >= 0`.
///
/// `values` must contain the basis functions for all degrees up to `n + 1`
/// at the point where the gradient is evaluated, using the layout of
/// [`lm_index`].
#[inline]
pub fn basis_gradient(
    ladder: &LadderCoefficients,
    values: &[Complex64],
    n: usize,
    m: usize,
) -> [Complex64; 3] {
    debug_assert!(m <= n);
    let n = n as isize;
    let m = m as isize;

    let d_plus = ladder.b(n + 1, -m - 1) * basis_value(values, n + 1, m + 1)
               + ladder.b(n, m) * basis_value(values, n - 1, m + 1);

    let d_minus = if m == 0 {
        d_plus.conj()
    } else {
        -ladder.b(n + 1, m - 1) * basis_value(values, n + 1, m - 1)
        - ladder.b(n, -m) * basis_value(values, n - 1, m - 1)
    };

    let d_z = ladder.a(n - 1, m) * basis_value(values, n - 1, m)
            - ladder.a(n, m) * basis_value(values, n + 1, m);

    let d_x = 0.5 * (d_plus + d_minus);
    let d_y = (d_plus - d_minus) / Complex64::new(0.0, 2.0);

    return [d_x, d_y, d_z];
}
