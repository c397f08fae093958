// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Box-and-whisker mark generation.

use kurbo::{BezPath, Rect};
use peniko::{Brush, Color};
use ridelens_core::{Mark, MarkId, TableId};
use ridelens_transforms::stats::BoxStats;

use crate::rule_mark::RuleMarkSpec;
use crate::scale::{ScaleBand, ScaleLinear};
use crate::symbol::Symbol;

/// Marks generated per box; ids are `group * MARKS_PER_BOX + part`.
const MARKS_PER_BOX: u64 = 8;

/// Vertical boxplots, one per category band.
///
/// Each group gets a box from `q1` to `q3`, a median rule, whiskers with caps and hollow
/// circles for fliers. Groups with no values are skipped.
#[derive(Clone, Debug)]
pub struct BoxplotMarkSpec {
    /// Source table id, used to derive stable mark ids.
    pub table: TableId,
    /// Band scale for categories.
    pub band: ScaleBand,
    /// Linear scale for values.
    pub y_scale: ScaleLinear,
    /// Box width as a fraction of the band width.
    pub width: f64,
    /// Box fill paint.
    pub fill: Brush,
    /// Outline, whisker and flier paint.
    pub stroke: Brush,
    /// Median rule paint.
    pub median_stroke: Brush,
    /// Stroke width for every part.
    pub stroke_width: f64,
    /// Whether values beyond the whiskers are drawn.
    pub show_fliers: bool,
    /// Flier circle diameter.
    pub flier_size: f64,
    /// Rendering order hint for the box body.
    pub z_index: i32,
}

impl BoxplotMarkSpec {
    /// Creates a boxplot spec with a width of half the band.
    pub fn new(table: TableId, band: ScaleBand, y_scale: ScaleLinear) -> Self {
        Self {
            table,
            band,
            y_scale,
            width: 0.5,
            fill: Color::TRANSPARENT.into(),
            stroke: Color::BLACK.into(),
            median_stroke: crate::color::category_color(1).into(),
            stroke_width: 1.0,
            show_fliers: true,
            flier_size: 5.0,
            z_index: crate::z_order::SERIES_FILL,
        }
    }

    /// Sets the box width as a fraction of the band width.
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width.max(0.0);
        self
    }

    /// Sets the box fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Shows or hides fliers.
    pub fn with_fliers(mut self, show: bool) -> Self {
        self.show_fliers = show;
        self
    }

    /// Sets the z-index of the box body; whiskers and medians draw one layer above.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Generates marks for `groups`, where `groups[i]` is drawn in band `i`.
    pub fn marks(&self, groups: &[Vec<f64>]) -> Vec<Mark> {
        let mut out = Vec::new();
        for (i, values) in groups.iter().enumerate() {
            let Some(stats) = BoxStats::compute(values) else {
                continue;
            };
            self.push_box(&mut out, i, &stats);
        }
        out
    }

    fn push_box(&self, out: &mut Vec<Mark>, index: usize, stats: &BoxStats) {
        let id = |part: u64| MarkId::for_row(self.table, index as u64 * MARKS_PER_BOX + part);
        let cx = self.band.center(index);
        let half = 0.5 * self.width * self.band.band_width();
        let y = |v: f64| self.y_scale.map(v);
        let line_z = self.z_index + 1;

        let (q1, q3) = (y(stats.q1), y(stats.q3));
        out.push(
            Mark::builder(id(0))
                .z_index(self.z_index)
                .rect()
                .rect(Rect::new(cx - half, q1.min(q3), cx + half, q1.max(q3)))
                .fill(self.fill.clone())
                .stroke(self.stroke.clone(), self.stroke_width)
                .build(),
        );

        let median = y(stats.median);
        out.push(
            RuleMarkSpec::horizontal(id(1), median, cx - half, cx + half)
                .with_stroke(self.median_stroke.clone(), self.stroke_width)
                .with_z_index(line_z + 1)
                .mark(),
        );

        let (lo, hi) = (y(stats.whisker_low), y(stats.whisker_high));
        let cap = 0.5 * half;
        let rules = [
            RuleMarkSpec::vertical(id(2), cx, q1, lo),
            RuleMarkSpec::vertical(id(3), cx, q3, hi),
            RuleMarkSpec::horizontal(id(4), lo, cx - cap, cx + cap),
            RuleMarkSpec::horizontal(id(5), hi, cx - cap, cx + cap),
        ];
        out.extend(rules.into_iter().map(|r| {
            r.with_stroke(self.stroke.clone(), self.stroke_width)
                .with_z_index(line_z)
                .mark()
        }));

        if self.show_fliers && !stats.fliers.is_empty() {
            let mut path = BezPath::new();
            for v in &stats.fliers {
                path.extend(Symbol::Circle.path(cx, y(*v), self.flier_size));
            }
            out.push(
                Mark::builder(id(6))
                    .z_index(line_z)
                    .path()
                    .path(path)
                    .fill(Color::TRANSPARENT)
                    .stroke(self.stroke.clone(), self.stroke_width)
                    .build(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Shape;
    use ridelens_core::MarkKind;

    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn spec() -> BoxplotMarkSpec {
        BoxplotMarkSpec::new(
            TableId(1),
            ScaleBand::new((0.0, 200.0), 2).with_padding(0.0, 0.0),
            ScaleLinear::new((0.0, 100.0), (100.0, 0.0)),
        )
    }

    #[test]
    fn box_spans_quartiles_around_band_center() {
        let marks = spec().marks(&[vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0], vec![]]);
        let body = marks[0].as_rect().unwrap();
        assert_eq!(body.rect.x0, 25.0);
        assert_eq!(body.rect.x1, 75.0);
        assert!(close(body.rect.y0, 95.25));
        assert!(close(body.rect.y1, 97.75));

        let median = marks[1].as_path().unwrap().path.bounding_box();
        assert!(close(median.y0, 96.5));

        // body, median, two whiskers, two caps, fliers; the empty group adds nothing
        assert_eq!(marks.len(), 7);
        assert_eq!(marks[6].kind(), MarkKind::Path);
    }

    #[test]
    fn fliers_can_be_hidden() {
        let marks = spec()
            .with_fliers(false)
            .marks(&[vec![], vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0]]);
        assert_eq!(marks.len(), 6);
        assert_eq!(marks[0].as_rect().unwrap().rect.x0, 125.0);
        assert_eq!(marks[0].id, MarkId::for_row(TableId(1), 8));
    }
}
