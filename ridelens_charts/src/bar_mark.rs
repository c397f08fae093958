// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bar mark generation.

use peniko::Brush;
use ridelens_core::{Mark, MarkId, TableId};

use crate::scale::{ScaleBand, ScaleLinear};

/// Vertical bars, one per category band.
///
/// This generates one rect mark per finite value, spanning from the baseline to the value.
#[derive(Clone, Debug)]
pub struct BarMarkSpec {
    /// Source table id, used to derive stable mark ids.
    pub table: TableId,
    /// Band scale used for bar positions along x.
    pub band: ScaleBand,
    /// Linear scale used for bar positions along y.
    pub y_scale: ScaleLinear,
    /// Baseline in data units (typically `0.0`).
    pub baseline: f64,
    /// Fill paint for bars.
    pub fill: Brush,
    /// Rendering order hint.
    pub z_index: i32,
}

impl BarMarkSpec {
    /// Creates a bar mark spec with `baseline = 0` and the first palette color.
    pub fn new(table: TableId, band: ScaleBand, y_scale: ScaleLinear) -> Self {
        Self {
            table,
            band,
            y_scale,
            baseline: 0.0,
            fill: crate::color::category_color(0).into(),
            z_index: crate::z_order::SERIES_FILL,
        }
    }

    /// Sets the baseline in data units.
    pub fn with_baseline(mut self, baseline: f64) -> Self {
        self.baseline = baseline;
        self
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Generates marks for `values`, where `values[i]` is drawn in band `i`.
    ///
    /// Mark identity is derived from `(table, index)`. Non-finite values get no bar.
    pub fn marks(&self, values: &[f64]) -> Vec<Mark> {
        let bw = self.band.band_width();
        let y0 = self.y_scale.map(self.baseline);
        values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, &v)| {
                let y = self.y_scale.map(v);
                Mark::builder(MarkId::for_row(self.table, i as u64))
                    .z_index(self.z_index)
                    .rect()
                    .xywh(self.band.x(i), y.min(y0), bw, (y - y0).abs())
                    .fill(self.fill.clone())
                    .build()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;

    #[test]
    fn bars_grow_up_from_the_baseline() {
        let spec = BarMarkSpec::new(
            TableId(4),
            ScaleBand::new((0.0, 40.0), 2).with_padding(0.0, 0.0),
            ScaleLinear::new((0.0, 10.0), (100.0, 0.0)),
        );
        let marks = spec.marks(&[5.0, f64::NAN]);
        assert_eq!(marks.len(), 1);
        assert_eq!(
            marks[0].as_rect().unwrap().rect,
            Rect::new(0.0, 50.0, 20.0, 100.0)
        );
    }

    #[test]
    fn ids_follow_the_band_index() {
        let spec = BarMarkSpec::new(
            TableId(4),
            ScaleBand::new((0.0, 40.0), 2),
            ScaleLinear::new((0.0, 10.0), (100.0, 0.0)),
        );
        let marks = spec.marks(&[f64::NAN, 2.0]);
        assert_eq!(marks[0].id, MarkId::for_row(TableId(4), 1));
    }
}
