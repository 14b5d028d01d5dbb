//! Logistic activation and its derivative.
//!
//! Both functions evaluate `e^(-|x|)` so that neither overflows for large
//! negative inputs; `e^(-x) / (1 + e^(-x))^2` computed literally turns into
//! `inf / inf` below roughly -710.

/// Smallest value the activation is allowed to reach.
const LOWER: f64 = f64::MIN_POSITIVE;
/// Largest f64 strictly below 1.0.
const UPPER: f64 = 1.0 - f64::EPSILON / 2.0;

/// `1 / (1 + e^(-x))`, kept inside the open interval (0, 1).
///
/// For |x| beyond ~37 the exact result rounds to 0.0 or 1.0; those cases are
/// pinned to the nearest interior value instead.
pub fn sigmoid(x: f64) -> f64 {
    let z = (-x.abs()).exp();
    let s = if x >= 0.0 { 1.0 / (1.0 + z) } else { z / (1.0 + z) };
    s.clamp(LOWER, UPPER)
}

/// `e^(-x) / (1 + e^(-x))^2`, i.e. `sigmoid(x) * (1 - sigmoid(x))`.
///
/// The function is even, so it is evaluated on `-|x|`. Saturated inputs
/// return values at or near zero; no clamping is applied here.
pub fn sigmoid_derivative(x: f64) -> f64 {
    let z = (-x.abs()).exp();
    let denom = 1.0 + z;
    z / (denom * denom)
}
