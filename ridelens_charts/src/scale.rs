// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scales map data values into screen coordinates.
//!
//! A `*Spec` carries the domain and options; `instantiate` binds it to a pixel range once
//! layout has resolved the plot rectangle.

/// A scale specification (domain + options, no range yet).
#[derive(Clone, Copy, Debug)]
pub enum ScaleSpec {
    /// Continuous linear scale.
    Linear(ScaleLinearSpec),
    /// Discrete band scale.
    Band(ScaleBandSpec),
}

impl ScaleSpec {
    /// Whether this scale maps category indices rather than continuous values.
    pub fn is_discrete(&self) -> bool {
        matches!(self, Self::Band(_))
    }
}

impl From<ScaleLinearSpec> for ScaleSpec {
    fn from(value: ScaleLinearSpec) -> Self {
        Self::Linear(value)
    }
}

impl From<ScaleBandSpec> for ScaleSpec {
    fn from(value: ScaleBandSpec) -> Self {
        Self::Band(value)
    }
}

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    ///
    /// A zero-width domain maps everything to the start of the range.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Returns the configured domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Returns "nice" tick values covering the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }
}

/// Specification for a linear scale (domain + options, no range yet).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinearSpec {
    /// Domain in data units.
    pub domain: (f64, f64),
    /// Whether to extend the domain to the outermost nice ticks.
    pub nice: bool,
}

impl ScaleLinearSpec {
    /// Creates a new linear scale spec.
    pub fn new(domain: (f64, f64)) -> Self {
        Self {
            domain,
            nice: false,
        }
    }

    /// Creates a spec whose domain covers `values` plus a relative `margin` on both sides.
    ///
    /// Empty input gives `(0, 1)`; a single distinct value is widened by `0.5` each way.
    pub fn covering(values: impl IntoIterator<Item = f64>, margin: f64) -> Self {
        match infer_domain(values) {
            Some((lo, hi)) => {
                let pad = (hi - lo) * margin.max(0.0);
                Self::new((lo - pad, hi + pad))
            }
            None => Self::new((0.0, 1.0)),
        }
    }

    /// Enables or disables nice-domain behavior.
    pub fn with_nice(mut self, nice: bool) -> Self {
        self.nice = nice;
        self
    }

    /// Forces the domain to include `value` (e.g. a zero baseline for bars).
    pub fn including(mut self, value: f64) -> Self {
        self.domain = (self.domain.0.min(value), self.domain.1.max(value));
        self
    }

    /// Returns the effective domain after applying `nice` (if enabled).
    pub fn resolved_domain(&self, tick_count: usize) -> (f64, f64) {
        if !self.nice {
            return self.domain;
        }
        let ticks = nice_ticks(self.domain.0, self.domain.1, tick_count);
        match (ticks.first(), ticks.last()) {
            (Some(&first), Some(&last)) if ticks.len() >= 2 => (first, last),
            _ => self.domain,
        }
    }

    /// Instantiates a concrete scale using the resolved domain (respecting `nice`).
    pub fn instantiate_resolved(&self, range: (f64, f64), tick_count: usize) -> ScaleLinear {
        ScaleLinear::new(self.resolved_domain(tick_count), range)
    }
}

/// Tick values at a 1/2/5 step covering `[min, max]`.
pub(crate) fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let step = nice_step((max - min) / count as f64);
    if step == 0.0 {
        return vec![min, max];
    }

    let start = (min / step).floor() * step;
    let stop = (max / step).ceil() * step;

    let n_f = ((stop - start) / step).round();
    let n = if n_f.is_finite() && n_f >= 0.0 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "guarded by finite/non-negative checks and capped at 10k"
        )]
        {
            n_f.min(10_000.0) as u64
        }
    } else {
        0
    };
    // Rounding to the step's precision keeps `0.1 * 3` from printing as `0.30000000000000004`.
    let scale = 10_f64.powf((-step.log10().floor()).max(0.0));
    (0..=n)
        .map(|i| ((start + step * i as f64) * scale).round() / scale)
        .collect()
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// A discrete band scale for categorical charts.
///
/// Bands are laid out from the smaller end of the range, so on a vertical axis (whose range
/// runs bottom-to-top) index `0` is the topmost band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleBand {
    range: (f64, f64),
    count: usize,
    padding_inner: f64,
    padding_outer: f64,
}

impl ScaleBand {
    /// Creates a new band scale covering `count` bands over `range`.
    pub fn new(range: (f64, f64), count: usize) -> Self {
        Self {
            range,
            count,
            padding_inner: 0.1,
            padding_outer: 0.1,
        }
    }

    /// Sets inner and outer padding in band units.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.max(0.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// Returns the computed band width.
    pub fn band_width(&self) -> f64 {
        let (r0, r1) = self.range;
        let n = self.count as f64;
        if n <= 0.0 {
            return 0.0;
        }
        let span = (r1 - r0).abs();
        let denom = n + self.padding_inner * (n - 1.0) + 2.0 * self.padding_outer;
        if denom == 0.0 { 0.0 } else { span / denom }
    }

    /// Distance between the starts of neighbouring bands.
    pub fn step(&self) -> f64 {
        self.band_width() * (1.0 + self.padding_inner)
    }

    /// Returns the number of bands.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the start position of the band at `index`.
    pub fn x(&self, index: usize) -> f64 {
        let (r0, r1) = self.range;
        let start = r0.min(r1);
        start + self.band_width() * self.padding_outer + self.step() * index as f64
    }

    /// Returns the center position of the band at `index`.
    pub fn center(&self, index: usize) -> f64 {
        self.x(index) + 0.5 * self.band_width()
    }

    /// A linear scale mapping fractional band indices onto band centers.
    ///
    /// Index `0.0` lands on the first center and each unit advances one step, which lets
    /// continuous offsets (such as jitter) sit between categories.
    pub fn index_scale(&self) -> ScaleLinear {
        let c0 = self.center(0);
        ScaleLinear::new((0.0, 1.0), (c0, c0 + self.step()))
    }
}

/// Specification for a band scale (count + padding, no range yet).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleBandSpec {
    /// Number of bands.
    pub count: usize,
    /// Inner padding in band units.
    pub padding_inner: f64,
    /// Outer padding in band units.
    pub padding_outer: f64,
}

impl ScaleBandSpec {
    /// Creates a new band scale spec with default padding.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            padding_inner: 0.1,
            padding_outer: 0.1,
        }
    }

    /// Sets inner and outer padding in band units.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.max(0.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// Instantiates a concrete scale for a given output range.
    pub fn instantiate(&self, range: (f64, f64)) -> ScaleBand {
        ScaleBand::new(range, self.count).with_padding(self.padding_inner, self.padding_outer)
    }
}

/// Infers a `(min, max)` domain from `values`.
///
/// Non-finite values are ignored; `None` if nothing finite remains. A domain with a single
/// distinct value is widened by `0.5` on both sides so it still maps onto a range.
pub fn infer_domain(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() {
        return None;
    }
    if min == max {
        Some((min - 0.5, max + 0.5))
    } else {
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_maps_endpoints_and_inverts_for_vertical_ranges() {
        let s = ScaleLinear::new((0.0, 10.0), (100.0, 0.0));
        assert_eq!(s.map(0.0), 100.0);
        assert_eq!(s.map(10.0), 0.0);
        assert_eq!(s.map(5.0), 50.0);
        assert_eq!(ScaleLinear::new((3.0, 3.0), (0.0, 1.0)).map(7.0), 0.0);
    }

    #[test]
    fn nice_domain_snaps_to_ticks() {
        let spec = ScaleLinearSpec::new((0.3, 9.2)).with_nice(true);
        assert_eq!(spec.resolved_domain(5), (0.0, 10.0));
        let ticks = ScaleLinear::new((0.0, 0.3), (0.0, 1.0)).ticks(3);
        assert_eq!(ticks, vec![0.0, 0.1, 0.2, 0.3]);
    }

    #[test]
    fn band_indices_run_from_the_small_end() {
        let b = ScaleBand::new((100.0, 0.0), 4).with_padding(0.0, 0.0);
        assert_eq!(b.band_width(), 25.0);
        assert_eq!(b.x(0), 0.0);
        assert_eq!(b.center(3), 87.5);
        assert_eq!(b.step(), 25.0);
        assert_eq!(ScaleBand::new((0.0, 10.0), 0).band_width(), 0.0);
        let idx = b.index_scale();
        assert_eq!(idx.map(3.0), b.center(3));
        assert_eq!(idx.map(1.5), 50.0);
    }

    #[test]
    fn inferred_domains_handle_degenerate_input() {
        assert_eq!(infer_domain([2.0, f64::NAN, -1.0]), Some((-1.0, 2.0)));
        assert_eq!(infer_domain([4.0, 4.0]), Some((3.5, 4.5)));
        assert_eq!(infer_domain(core::iter::empty()), None);
        assert_eq!(ScaleLinearSpec::covering([], 0.1).domain, (0.0, 1.0));
        assert_eq!(
            ScaleLinearSpec::covering([0.0, 10.0], 0.1).domain,
            (-1.0, 11.0)
        );
    }
}
