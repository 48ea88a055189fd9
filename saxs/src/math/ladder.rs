use once_cell::sync::Lazy;

/// Maximal degree stored in [`LADDER_COEFFICIENTS`]
pub const LADDER_MAX_DEGREE: usize = 100;

/// Process-wide table of ladder coefficients, up to [`LADDER_MAX_DEGREE`]
pub static LADDER_COEFFICIENTS: Lazy<LadderCoefficients> = Lazy::new(|| {
    LadderCoefficients::new(LADDER_MAX_DEGREE)
});

/// Coefficients relating the basis functions `R_n^m(r) = j_n(r) Y_n^m(r̂)` to
/// their neighbours in degree and order, used to compute analytical
/// gradients of the basis functions.
///
/// With `a(n, m)` and `b(n, m)` from this table, the Cartesian gradient of
/// `R_n^m` is a linear combination of `R_{n±1}^{m}` (z component) and
/// `R_{n±1}^{m±1}` (x and y components).
///
/// Both coefficients are zero when `|m| > n`, or when `n` is out of their
/// range of definition (`n >= 0` for `a`, `n >= 1` for `b`).
#[derive(Debug, Clone)]
pub struct LadderCoefficients {
    max_degree: usize,
    /// a(n, m) for `0 <= n <= max_degree`, stored with `m + n` as column
    a: Vec<Vec<f64>>,
    /// b(n, m) for `0 <= n <= max_degree`, stored with `m + n` as column
    b: Vec<Vec<f64>>,
}

impl LadderCoefficients {
    /// Pre-compute the coefficients for all degrees up to `max_degree`
    pub fn new(max_degree: usize) -> LadderCoefficients {
        let mut a = Vec::with_capacity(max_degree + 1);
        let mut b = Vec::with_capacity(max_degree + 1);

        for n in 0..=max_degree {
            let n_f = n as f64;
            let mut a_n = Vec::with_capacity(2 * n + 1);
            let mut b_n = Vec::with_capacity(2 * n + 1);
            for m in -(n as isize)..=(n as isize) {
                let m_f = m as f64;
                a_n.push(f64::sqrt(
                    (n_f + 1.0 - m_f) * (n_f + 1.0 + m_f) / ((2.0 * n_f + 1.0) * (2.0 * n_f + 3.0))
                ));

                if n == 0 {
                    b_n.push(0.0);
                } else {
                    b_n.push(f64::sqrt(
                        (n_f - m_f - 1.0) * (n_f - m_f) / ((2.0 * n_f - 1.0) * (2.0 * n_f + 1.0))
                    ));
                }
            }
            a.push(a_n);
            b.push(b_n);
        }

        LadderCoefficients {
            max_degree: max_degree,
            a: a,
            b: b,
        }
    }

    /// Get the maximal degree stored in this table
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    /// Get the `a(n, m)` coefficient, zero outside of `n >= 0, |m| <= n`
    #[inline]
    pub fn a(&self, n: isize, m: isize) -> f64 {
        if n < 0 || m.abs() > n {
            return 0.0;
        }
        assert!(n as usize <= self.max_degree, "degree {} is too large for this ladder table", n);
        return self.a[n as usize][(m + n) as usize];
    }

    /// Get the `b(n, m)` coefficient, zero outside of `n >= 1, |m| <= n`
    #[inline]
    pub fn b(&self, n: isize, m: isize) -> f64 {
        if n < 1 || m.abs() > n {
            return 0.0;
        }
        assert!(n as usize <= self.max_degree, "degree {} is too large for this ladder table", n);
        return self.b[n as usize][(m + n) as usize];
    }
}
