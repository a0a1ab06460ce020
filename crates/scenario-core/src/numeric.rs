//! Small numeric helpers shared by the kernels and the aggregator.

/// Clamp a value into [0,1]. NaN maps to 0.
pub fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(0.0, 1.0)
}

/// `num / den`, or 0 when the denominator is zero or the result is not finite.
pub fn safe_ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        return 0.0;
    }
    let r = num / den;
    if r.is_finite() {
        r
    } else {
        0.0
    }
}

/// Convert a percentage into a fraction (`25.0` -> `0.25`).
pub fn pct(p: f64) -> f64 {
    p / 100.0
}

/// Percent change of `actual` relative to `baseline`; 0 for a zero baseline.
pub fn pct_change(actual: f64, baseline: f64) -> f64 {
    safe_ratio(actual - baseline, baseline) * 100.0
}

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Linear interpolation from `a` to `b` as `t` runs 0..1.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
