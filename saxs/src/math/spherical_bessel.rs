//! Spherical Bessel functions of the first kind, using Miller's downward
//! recurrence as in scipy (specfun.f).

/// Largest argument supported by [`spherical_bessel_first_kind`]
pub const SPHERICAL_BESSEL_MAX_ARGUMENT: f64 = 1500.0;

/// Compute the spherical Bessel functions of the first kind `j_n(x)` for all
/// orders `0 <= n < values.len()`, and store them in `values`.
///
/// Values of high orders that are too small to be represented are set to
/// zero.
///
/// # Panics
///
/// If `x` is NaN, negative, or larger than [`SPHERICAL_BESSEL_MAX_ARGUMENT`].
pub fn spherical_bessel_first_kind(x: f64, values: &mut [f64]) {
    assert!(!x.is_nan(), "NaN was fed to spherical Bessel function");
    assert!(x >= 0.0, "spherical Bessel functions are only implemented for positive arguments, got {}", x);
    assert!(
        x <= SPHERICAL_BESSEL_MAX_ARGUMENT,
        "the spherical Bessel implementation does not support large arguments (>{}), got {}",
        SPHERICAL_BESSEL_MAX_ARGUMENT, x
    );

    if values.is_empty() {
        return;
    }

    values.fill(0.0);
    if x < 1e-100 {
        values[0] = 1.0;
        return;
    }

    let (sin, cos) = x.sin_cos();
    let j0 = sin / x;
    values[0] = j0;
    if values.len() == 1 {
        return;
    }

    let j1 = (j0 - cos) / x;
    values[1] = j1;
    if values.len() == 2 {
        return;
    }

    let max_order = (values.len() - 1) as i32;
    // starting point of the downward recurrence, and last order for which the
    // result is not negligible
    let (start, last) = {
        let start = msta1(x, 200);
        if start < max_order {
            (start, start)
        } else {
            (msta2(x, max_order, 15), max_order)
        }
    };

    let mut f = 0.0;
    let mut f0 = 0.0;
    let mut f1 = 1e-100;
    for k in (0..=start).rev() {
        f = (2.0 * k as f64 + 3.0) * f1 / x - f0;
        if k <= last {
            values[k as usize] = f;
        }
        f0 = f1;
        f1 = f;
    }

    // normalize with the most accurate of the closed forms for j0 and j1
    let scale = if j0.abs() > j1.abs() { j0 / f } else { j1 / f0 };
    for value in &mut values[..=(last as usize)] {
        *value *= scale;
    }
}

/// Starting order for the backward recurrence such that the magnitude of
/// `j_n(x)` at that order is about `10^-mp`
fn msta1(x: f64, mp: i32) -> i32 {
    let mut n0 = (1.1 * x) as i32 + 1;
    let mut f0 = envj(n0, x) - mp as f64;
    let mut n1 = n0 + 5;
    let mut f1 = envj(n1, x) - mp as f64;

    for _ in 0..20 {
        let nn = (n1 as f64 - (n1 - n0) as f64 / (1.0 - f0 / f1)) as i32;
        let f = envj(nn, x) - mp as f64;
        if (nn - n1).abs() < 1 {
            return nn;
        }
        n0 = n1;
        f0 = f1;
        n1 = nn;
        f1 = f;
    }

    panic!("failed to find the starting order of the spherical Bessel recurrence for x = {}", x);
}

/// Starting order for the backward recurrence such that all orders up to `n`
/// have `mp` significant digits
fn msta2(x: f64, n: i32, mp: i32) -> i32 {
    let half_mp = 0.5 * mp as f64;
    let ejn = envj(n, x);

    let (objective, mut n0) = if ejn <= half_mp {
        (mp as f64, (1.1 * x) as i32 + 1)
    } else {
        (half_mp + ejn, n)
    };

    let mut f0 = envj(n0, x) - objective;
    let mut n1 = n0 + 5;
    let mut f1 = envj(n1, x) - objective;
    for _ in 0..20 {
        let nn = (n1 as f64 - (n1 - n0) as f64 / (1.0 - f0 / f1)) as i32;
        let f = envj(nn, x) - objective;
        if (nn - n1).abs() < 1 {
            return nn + 10;
        }
        n0 = n1;
        f0 = f1;
        n1 = nn;
        f1 = f;
    }

    panic!("failed to find the starting order of the spherical Bessel recurrence for x = {}", x);
}

/// Envelope function of the Bessel functions, `-log10(|j_n(x)|)` for large `n`
fn envj(n: i32, x: f64) -> f64 {
    let n = n as f64;
    0.5 * f64::log10(6.28 * n) - n * f64::log10(1.36 * x / n)
}
