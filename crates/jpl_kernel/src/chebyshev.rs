//! Chebyshev series evaluation for SPK interpolation records.
//!
//! Both functions use the Clenshaw backward recurrence
//! `b_k = c_k + 2s·b_{k+1} - b_{k+2}`, which never forms `T_k(s)` explicitly.

/// Evaluate `sum(c_k * T_k(s))` for normalised time `s` in `[-1, 1]`.
pub fn value(coeffs: &[f64], s: f64) -> f64 {
    let Some((&c0, rest)) = coeffs.split_first() else {
        return 0.0;
    };
    let two_s = 2.0 * s;
    let (mut b1, mut b2) = (0.0, 0.0);
    for &c in rest.iter().rev() {
        let b = c + two_s * b1 - b2;
        b2 = b1;
        b1 = b;
    }
    c0 + s * b1 - b2
}

/// Evaluate the series and its derivative with respect to `s` in one pass.
///
/// Differentiating the Clenshaw recurrence gives
/// `d_k = 2·b_{k+1} + 2s·d_{k+1} - d_{k+2}` and
/// `f'(s) = b_1 + s·d_1 - d_2`.
pub fn value_and_derivative(coeffs: &[f64], s: f64) -> (f64, f64) {
    let Some((&c0, rest)) = coeffs.split_first() else {
        return (0.0, 0.0);
    };
    let two_s = 2.0 * s;
    let (mut b1, mut b2) = (0.0, 0.0);
    let (mut d1, mut d2) = (0.0, 0.0);
    for &c in rest.iter().rev() {
        let d = 2.0 * b1 + two_s * d1 - d2;
        let b = c + two_s * b1 - b2;
        b2 = b1;
        b1 = b;
        d2 = d1;
        d1 = d;
    }
    (c0 + s * b1 - b2, b1 + s * d1 - d2)
}
