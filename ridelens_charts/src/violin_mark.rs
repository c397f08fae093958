// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Violin (kernel density) mark generation.

use kurbo::BezPath;
use peniko::Brush;
use ridelens_core::{Mark, MarkId, TableId};
use ridelens_transforms::stats::{gaussian_kde, linspace, scott_bandwidth};

use crate::scale::{ScaleBand, ScaleLinear};

/// Symmetric density outlines, one per category band.
///
/// Densities are Gaussian KDEs with Scott's bandwidth, evaluated between each group's minimum
/// and maximum. The widest point of every violin spans `width` of the band.
#[derive(Clone, Debug)]
pub struct ViolinMarkSpec {
    /// Source table id, used to derive stable mark ids.
    pub table: TableId,
    /// Band scale for categories.
    pub band: ScaleBand,
    /// Linear scale for values.
    pub y_scale: ScaleLinear,
    /// Maximum violin width as a fraction of the band width.
    pub width: f64,
    /// Number of density evaluation points.
    pub points: usize,
    /// Body fill paint.
    pub fill: Brush,
    /// Rendering order hint.
    pub z_index: i32,
}

impl ViolinMarkSpec {
    /// Creates a violin spec with a width of half the band and 100 evaluation points.
    pub fn new(table: TableId, band: ScaleBand, y_scale: ScaleLinear) -> Self {
        Self {
            table,
            band,
            y_scale,
            width: 0.5,
            points: 100,
            fill: crate::color::category_color(0).with_alpha(0.3).into(),
            z_index: crate::z_order::SERIES_FILL - 1,
        }
    }

    /// Sets the maximum width as a fraction of the band width.
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width.max(0.0);
        self
    }

    /// Sets the body fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Generates one closed path per non-empty group.
    pub fn marks(&self, groups: &[Vec<f64>]) -> Vec<Mark> {
        groups
            .iter()
            .enumerate()
            .filter_map(|(i, values)| {
                let path = self.outline(i, values)?;
                Some(
                    Mark::builder(MarkId::for_row(self.table, i as u64))
                        .z_index(self.z_index)
                        .path()
                        .path(path)
                        .fill(self.fill.clone())
                        .build(),
                )
            })
            .collect()
    }

    fn outline(&self, index: usize, values: &[f64]) -> Option<BezPath> {
        let bandwidth = scott_bandwidth(values)?;
        let (lo, hi) = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if !lo.is_finite() {
            return None;
        }
        let (lo, hi) = if lo == hi {
            (lo - bandwidth, hi + bandwidth)
        } else {
            (lo, hi)
        };

        let ys = linspace(lo, hi, self.points.max(2));
        let density = gaussian_kde(values, bandwidth, &ys);
        let peak = density.iter().copied().fold(0.0, f64::max);
        if peak <= 0.0 {
            return None;
        }
        let half = 0.5 * self.width * self.band.band_width() / peak;
        let cx = self.band.center(index);

        let mut path = BezPath::new();
        for (k, (y, d)) in ys.iter().zip(&density).enumerate() {
            let p = (cx + d * half, self.y_scale.map(*y));
            if k == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
        for (y, d) in ys.iter().zip(&density).rev() {
            path.line_to((cx - d * half, self.y_scale.map(*y)));
        }
        path.close_path();
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Shape;

    use super::*;

    #[test]
    fn widest_point_matches_the_configured_width() {
        let spec = ViolinMarkSpec::new(
            TableId(2),
            ScaleBand::new((0.0, 100.0), 1).with_padding(0.0, 0.0),
            ScaleLinear::new((0.0, 10.0), (100.0, 0.0)),
        )
        .with_width(0.8);
        let marks = spec.marks(&[vec![1.0, 2.0, 2.0, 3.0, 4.0]]);
        assert_eq!(marks.len(), 1);
        let bbox = marks[0].as_path().unwrap().path.bounding_box();
        assert!((bbox.width() - 80.0).abs() < 1e-6);
        assert!((bbox.x0 + bbox.x1 - 100.0).abs() < 1e-6);
        // value 4 maps to y = 60, value 1 to y = 90
        assert!((bbox.y0 - 60.0).abs() < 1e-6);
        assert!((bbox.y1 - 90.0).abs() < 1e-6);
    }

    #[test]
    fn empty_groups_are_skipped_and_single_values_still_draw() {
        let spec = ViolinMarkSpec::new(
            TableId(2),
            ScaleBand::new((0.0, 100.0), 2),
            ScaleLinear::new((0.0, 10.0), (100.0, 0.0)),
        );
        let marks = spec.marks(&[vec![], vec![3.0]]);
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].id, MarkId::for_row(TableId(2), 1));
    }
}
