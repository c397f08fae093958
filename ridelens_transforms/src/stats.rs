// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Descriptive statistics over plain `f64` slices.
//!
//! Every function ignores NaN inputs and returns `None` (or an empty result) when no finite
//! values remain.

/// How [`quantile`] picks a value between two order statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QuantileMethod {
    /// Interpolate linearly between the neighbouring order statistics.
    #[default]
    Linear,
    /// Take the order statistic at the rounded rank.
    Nearest,
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v: Vec<f64> = values.iter().copied().filter(|x| !x.is_nan()).collect();
    v.sort_by(f64::total_cmp);
    v
}

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    let (sum, n) = values
        .iter()
        .filter(|x| !x.is_nan())
        .fold((0.0, 0_usize), |(s, n), x| (s + x, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Median (the mean of the two middle values for even counts).
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5, QuantileMethod::Linear)
}

/// Sample standard deviation (`n - 1` denominator); `None` below two values.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let v = sorted(values);
    if v.len() < 2 {
        return None;
    }
    let m = mean(&v)?;
    let ss: f64 = v.iter().map(|x| (x - m) * (x - m)).sum();
    Some((ss / (v.len() - 1) as f64).sqrt())
}

/// The `q`-quantile (`q` clamped to `[0, 1]`).
pub fn quantile(values: &[f64], q: f64, method: QuantileMethod) -> Option<f64> {
    quantile_sorted(&sorted(values), q, method)
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "rank positions are clamped to [0, last]"
)]
fn quantile_sorted(v: &[f64], q: f64, method: QuantileMethod) -> Option<f64> {
    let last = v.len().checked_sub(1)?;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    Some(match method {
        QuantileMethod::Nearest => v[(pos.round() as usize).min(last)],
        QuantileMethod::Linear => {
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let t = pos - lo as f64;
            v[lo] + (v[hi.min(last)] - v[lo]) * t
        }
    })
}

/// Box-and-whisker summary of a sample.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxStats {
    /// First quartile.
    pub q1: f64,
    /// Median.
    pub median: f64,
    /// Third quartile.
    pub q3: f64,
    /// Smallest value within `q1 - 1.5 * IQR`.
    pub whisker_low: f64,
    /// Largest value within `q3 + 1.5 * IQR`.
    pub whisker_high: f64,
    /// Values beyond the whiskers, ascending.
    pub fliers: Vec<f64>,
}

impl BoxStats {
    /// Whisker reach as a multiple of the inter-quartile range.
    pub const WHISKER_IQR: f64 = 1.5;

    /// Computes quartiles (linear interpolation), whiskers and fliers.
    pub fn compute(values: &[f64]) -> Option<Self> {
        let v = sorted(values);
        let q1 = quantile_sorted(&v, 0.25, QuantileMethod::Linear)?;
        let median = quantile_sorted(&v, 0.5, QuantileMethod::Linear)?;
        let q3 = quantile_sorted(&v, 0.75, QuantileMethod::Linear)?;
        let reach = Self::WHISKER_IQR * (q3 - q1);
        let (lo_fence, hi_fence) = (q1 - reach, q3 + reach);

        let whisker_low = v.iter().copied().find(|x| *x >= lo_fence).unwrap_or(q1);
        let whisker_high = v.iter().rev().copied().find(|x| *x <= hi_fence).unwrap_or(q3);
        let fliers = v
            .iter()
            .copied()
            .filter(|x| *x < whisker_low || *x > whisker_high)
            .collect();
        Some(Self {
            q1,
            median,
            q3,
            whisker_low: whisker_low.min(q1),
            whisker_high: whisker_high.max(q3),
            fliers,
        })
    }
}

/// Scott's rule bandwidth, `n^(-1/5) * sd`.
///
/// A sample without spread gets a tenth of its magnitude (at least `0.1`).
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let v = sorted(values);
    let n = v.len();
    if n == 0 {
        return None;
    }
    let sd = std_dev(&v).unwrap_or(0.0);
    if sd > 0.0 {
        Some((n as f64).powf(-0.2) * sd)
    } else {
        Some(v[0].abs().max(1.0) * 0.1)
    }
}

/// Gaussian kernel density estimate of `values` evaluated at `points`.
///
/// The result integrates to one over the real line. Empty input yields zeros.
pub fn gaussian_kde(values: &[f64], bandwidth: f64, points: &[f64]) -> Vec<f64> {
    let v: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    if v.is_empty() || bandwidth <= 0.0 {
        return vec![0.0; points.len()];
    }
    let norm = 1.0 / (v.len() as f64 * bandwidth * (2.0 * core::f64::consts::PI).sqrt());
    points
        .iter()
        .map(|&p| {
            v.iter()
                .map(|&x| {
                    let z = (p - x) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm
        })
        .collect()
}

/// `n` evenly spaced points from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn central_tendency() {
        assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[f64::NAN, 5.0]), Some(5.0));
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn quantile_methods_differ_between_ranks() {
        let v = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(quantile(&v, 0.25, QuantileMethod::Linear), Some(17.5));
        assert_eq!(quantile(&v, 0.25, QuantileMethod::Nearest), Some(20.0));
        assert_eq!(quantile(&v, 0.75, QuantileMethod::Nearest), Some(30.0));
        assert_eq!(quantile(&v, 1.0, QuantileMethod::Nearest), Some(40.0));
        assert_eq!(quantile(&[7.0], 0.9, QuantileMethod::Linear), Some(7.0));
    }

    #[test]
    fn box_stats_split_fliers() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let b = BoxStats::compute(&v).unwrap();
        assert_eq!(b.median, 3.5);
        assert_eq!(b.q1, 2.25);
        assert_eq!(b.q3, 4.75);
        assert_eq!(b.whisker_low, 1.0);
        assert_eq!(b.whisker_high, 5.0);
        assert_eq!(b.fliers, vec![100.0]);
        assert!(BoxStats::compute(&[]).is_none());
    }

    #[test]
    fn kde_peaks_near_data() {
        let v = [0.0, 0.1, -0.1];
        let bw = scott_bandwidth(&v).unwrap();
        let d = gaussian_kde(&v, bw, &[0.0, 3.0]);
        assert!(d[0] > d[1]);
        assert!(d[0] > 0.0);

        let flat = scott_bandwidth(&[2.0, 2.0]).unwrap();
        assert!(flat > 0.0);
        assert_eq!(gaussian_kde(&[], 1.0, &[0.0]), vec![0.0]);
    }

    #[test]
    fn linspace_hits_both_ends() {
        let v = linspace(1.0, 2.0, 5);
        assert_eq!(v, vec![1.0, 1.25, 1.5, 1.75, 2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }
}
