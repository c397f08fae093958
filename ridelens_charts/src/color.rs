// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color scales: the viridis sequential map and the tab10 categorical palette.

use peniko::Color;

/// Viridis sampled at nine evenly spaced stops (sRGB).
const VIRIDIS: [[u8; 3]; 9] = [
    [0x44, 0x01, 0x54],
    [0x47, 0x2c, 0x7a],
    [0x3b, 0x52, 0x8b],
    [0x2c, 0x72, 0x8e],
    [0x21, 0x91, 0x8c],
    [0x28, 0xae, 0x80],
    [0x5e, 0xc9, 0x62],
    [0xad, 0xdc, 0x30],
    [0xfd, 0xe7, 0x25],
];

/// The ten-color categorical palette used for series.
const TAB10: [[u8; 3]; 10] = [
    [0x1f, 0x77, 0xb4],
    [0xff, 0x7f, 0x0e],
    [0x2c, 0xa0, 0x2c],
    [0xd6, 0x27, 0x28],
    [0x94, 0x67, 0xbd],
    [0x8c, 0x56, 0x4b],
    [0xe3, 0x77, 0xc2],
    [0x7f, 0x7f, 0x7f],
    [0xbc, 0xbd, 0x22],
    [0x17, 0xbe, 0xcf],
];

/// Viridis at `t` in `[0, 1]` (clamped), linearly interpolated between stops.
pub fn viridis(t: f64) -> Color {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let pos = t * (VIRIDIS.len() - 1) as f64;
    let lo = stop_index(pos.floor());
    let hi = (lo + 1).min(VIRIDIS.len() - 1);
    let f = pos - lo as f64;
    let [r0, g0, b0] = VIRIDIS[lo];
    let [r1, g1, b1] = VIRIDIS[hi];
    Color::from_rgb8(lerp_u8(r0, r1, f), lerp_u8(g0, g1, f), lerp_u8(b0, b1, f))
}

/// The `index`-th categorical color, cycling after ten.
pub fn category_color(index: usize) -> Color {
    let [r, g, b] = TAB10[index % TAB10.len()];
    Color::from_rgb8(r, g, b)
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "stop positions are non-negative and below the stop count"
)]
fn stop_index(pos: f64) -> usize {
    (pos.max(0.0) as usize).min(VIRIDIS.len() - 1)
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "interpolating two u8 channels stays within [0, 255]"
)]
fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
    let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
    v.round().clamp(0.0, 255.0) as u8
}

/// A sequential color scale over a numeric domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorScale {
    /// Values mapped to the ends of the colormap.
    pub domain: (f64, f64),
}

impl ColorScale {
    /// Creates a scale over `domain`.
    pub fn new(domain: (f64, f64)) -> Self {
        Self { domain }
    }

    /// Normalized position of `v` within the domain, clamped to `[0, 1]`.
    ///
    /// A zero-width domain puts every value at `0`.
    pub fn normalize(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return 0.0;
        }
        ((v - d0) / span).clamp(0.0, 1.0)
    }

    /// Maps `v` to a color.
    pub fn map(&self, v: f64) -> Color {
        viridis(self.normalize(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viridis_hits_its_end_stops() {
        let lo = viridis(0.0).to_rgba8();
        assert_eq!((lo.r, lo.g, lo.b, lo.a), (0x44, 0x01, 0x54, 0xff));
        let hi = viridis(1.0).to_rgba8();
        assert_eq!((hi.r, hi.g, hi.b, hi.a), (0xfd, 0xe7, 0x25, 0xff));
        assert_eq!(viridis(2.0), viridis(1.0));
        assert_eq!(viridis(f64::NAN), viridis(0.0));
    }

    #[test]
    fn viridis_interpolates_between_stops() {
        let mid = viridis(0.0625).to_rgba8();
        assert_eq!((mid.r, mid.g, mid.b), (0x46, 0x17, 0x67));
    }

    #[test]
    fn color_scale_handles_flat_domains() {
        let s = ColorScale::new((0.0, 0.0));
        assert_eq!(s.normalize(5.0), 0.0);
        let s = ColorScale::new((0.0, 0.5));
        assert_eq!(s.normalize(0.25), 0.5);
        assert_eq!(s.map(0.5), viridis(1.0));
    }

    #[test]
    fn palette_cycles() {
        assert_eq!(category_color(0), category_color(10));
        assert_ne!(category_color(0), category_color(1));
    }
}
