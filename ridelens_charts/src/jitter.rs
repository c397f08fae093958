// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Seeded jitter for strip plots.
//!
//! Jitter uses SplitMix64 with a Box-Muller normal, so a given seed yields the same offsets on
//! every platform and every run.

use core::f64::consts::PI;

/// Seed used by charts that do not pick their own.
pub const DEFAULT_SEED: u64 = 42;

/// A deterministic pseudo-random stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JitterRng {
    state: u64,
}

impl JitterRng {
    /// Creates a stream from `seed`.
    pub const fn new(seed: u64) -> Self {
        let state = if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed };
        Self { state }
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform value in `[0, 1)` from the upper 53 bits.
    pub fn uniform(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1_u64 << 53) as f64)
    }

    /// Normal deviate with the given mean and standard deviation.
    pub fn normal(&mut self, mean: f64, sd: f64) -> f64 {
        let u1 = self.uniform().max(f64::MIN_POSITIVE);
        let u2 = self.uniform();
        mean + sd * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }
}

/// Strip-plot positions for per-category samples.
///
/// Each value of `groups[i]` becomes `(i + N(0, sd), value)`, with x in band-index units (see
/// [`crate::ScaleBand::index_scale`]). Empty groups draw no numbers from the stream.
pub fn jitter_points(groups: &[Vec<f64>], sd: f64, seed: u64) -> Vec<(f64, f64)> {
    let mut rng = JitterRng::new(seed);
    let mut out = Vec::with_capacity(groups.iter().map(Vec::len).sum());
    for (i, values) in groups.iter().enumerate() {
        for v in values {
            out.push((rng.normal(i as f64, sd), *v));
        }
    }
    out
}
