// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Number formatting for tick labels and annotations.

/// Formats `v` with as many decimals as the tick `step` needs.
///
/// A step of `0.25` gives two decimals, `5` gives none. Negative zero prints as `0`.
pub fn format_tick_with_step(v: f64, step: f64) -> String {
    format_fixed(v, decimals_for_step(step))
}

/// Formats `v` with exactly `decimals` digits after the point.
pub fn format_fixed(v: f64, decimals: usize) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let s = format!("{v:.decimals$}");
    match s.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_owned(),
        _ => s,
    }
}

/// Decimal places needed to tell multiples of `step` apart (at most 6).
fn decimals_for_step(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 {
        return 0;
    }
    let mut decimals = 0;
    let mut scaled = step;
    while decimals < 6 && (scaled - scaled.round()).abs() > 1e-9 * scaled.abs().max(1.0) {
        scaled *= 10.0;
        decimals += 1;
    }
    decimals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimals_follow_step() {
        assert_eq!(format_tick_with_step(10.0, 5.0), "10");
        assert_eq!(format_tick_with_step(0.5, 0.25), "0.50");
        assert_eq!(format_tick_with_step(0.2, 0.1), "0.2");
        assert_eq!(format_tick_with_step(3.0, 0.0), "3");
    }

    #[test]
    fn negative_zero_is_plain_zero() {
        assert_eq!(format_fixed(-0.0001, 2), "0.00");
        assert_eq!(format_fixed(-1.5, 1), "-1.5");
        assert_eq!(format_fixed(0.75, 2), "0.75");
    }
}
