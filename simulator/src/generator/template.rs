use std::f64::consts::PI;

/// Slow daily-shift style oscillation in `[0, 1]` used as the wastage baseline.
pub fn shift_wave(index: usize, period: usize) -> f64 {
    let period = period.max(1) as f64;
    0.5 - 0.5 * ((index as f64 / period) * 2.0 * PI).cos()
}
