// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Heatmap (matrix) mark generation.

use kurbo::Rect;
use peniko::{Brush, Color};
use ridelens_core::{Mark, MarkId, TableId, TextAnchor, TextBaseline};
use ridelens_transforms::Matrix;

use crate::color::ColorScale;
use crate::format::format_fixed;
use crate::scale::ScaleBand;

/// Row keys at or above this offset identify cell annotations.
const ANNOTATION_KEY: u64 = 0x8000_0000;

/// A heatmap over a dense matrix.
///
/// Columns map through the `x` band scale and rows through the `y` band scale. On a vertical
/// band scale index `0` is the topmost band, so row `0` is drawn at the top.
#[derive(Clone, Debug)]
pub struct HeatmapMarkSpec {
    /// Source table id, used to derive stable mark ids.
    pub table: TableId,
    /// Band scale for matrix columns.
    pub x: ScaleBand,
    /// Band scale for matrix rows.
    pub y: ScaleBand,
    /// Cell color mapping.
    pub color: ColorScale,
    /// When set, each cell is annotated with its value at this many decimals.
    pub annotate: Option<usize>,
    /// Annotation font size.
    pub font_size: f64,
    /// Annotation color.
    pub text_fill: Brush,
    /// Rendering order hint for cells.
    pub z_index: i32,
}

impl HeatmapMarkSpec {
    /// Creates a heatmap spec without annotations.
    pub fn new(table: TableId, x: ScaleBand, y: ScaleBand, color: ColorScale) -> Self {
        Self {
            table,
            x,
            y,
            color,
            annotate: None,
            font_size: 10.0,
            text_fill: Color::BLACK.into(),
            z_index: crate::z_order::SERIES_FILL,
        }
    }

    /// Annotates every cell with its value at `decimals` places.
    pub fn with_annotations(mut self, decimals: usize) -> Self {
        self.annotate = Some(decimals);
        self
    }

    /// Sets the annotation font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Generates one rect per cell, plus one text mark per cell when annotating.
    pub fn marks(&self, matrix: &Matrix) -> Vec<Mark> {
        let (w, h) = (self.x.band_width(), self.y.band_width());
        let mut out = Vec::with_capacity(matrix.rows() * matrix.cols());
        for r in 0..matrix.rows() {
            for c in 0..matrix.cols() {
                let v = matrix.get(r, c);
                let key = (r * matrix.cols() + c) as u64;
                let (x0, y0) = (self.x.x(c), self.y.x(r));
                out.push(
                    Mark::builder(MarkId::for_row(self.table, key))
                        .z_index(self.z_index)
                        .rect()
                        .rect(Rect::new(x0, y0, x0 + w, y0 + h))
                        .fill(self.color.map(v))
                        .build(),
                );
                if let Some(decimals) = self.annotate {
                    out.push(
                        Mark::builder(MarkId::for_row(self.table, ANNOTATION_KEY + key))
                            .z_index(crate::z_order::SERIES_LABELS)
                            .text()
                            .pos(x0 + 0.5 * w, y0 + 0.5 * h)
                            .text(format_fixed(v, decimals))
                            .font_size(self.font_size)
                            .fill(self.text_fill.clone())
                            .anchor(TextAnchor::Middle)
                            .baseline(TextBaseline::Middle)
                            .build(),
                    );
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::viridis;

    fn matrix() -> Matrix {
        let mut m = Matrix::zeros(2, 3);
        m.set(0, 0, 0.5);
        m.set(1, 2, 0.25);
        m
    }

    #[test]
    fn row_zero_is_on_top() {
        let spec = HeatmapMarkSpec::new(
            TableId(3),
            ScaleBand::new((0.0, 30.0), 3).with_padding(0.0, 0.0),
            ScaleBand::new((20.0, 0.0), 2).with_padding(0.0, 0.0),
            ColorScale::new((0.0, 0.5)),
        );
        let marks = spec.marks(&matrix());
        assert_eq!(marks.len(), 6);
        let first = marks[0].as_rect().unwrap();
        assert_eq!(first.rect, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(first.fill, Brush::Solid(viridis(1.0)));
        let last = marks[5].as_rect().unwrap();
        assert_eq!(last.rect, Rect::new(20.0, 10.0, 30.0, 20.0));
        assert_eq!(last.fill, Brush::Solid(viridis(0.5)));
    }

    #[test]
    fn annotations_are_centered_labels() {
        let spec = HeatmapMarkSpec::new(
            TableId(3),
            ScaleBand::new((0.0, 30.0), 3).with_padding(0.0, 0.0),
            ScaleBand::new((20.0, 0.0), 2).with_padding(0.0, 0.0),
            ColorScale::new((0.0, 0.5)),
        )
        .with_annotations(2);
        let marks = spec.marks(&matrix());
        let labels: Vec<_> = marks.iter().filter_map(|m| m.as_text()).collect();
        assert_eq!(labels.len(), 6);
        assert_eq!(labels[0].text, "0.50");
        assert_eq!(labels[1].text, "0.00");
        assert_eq!(labels[5].text, "0.25");
        assert_eq!((labels[0].pos.x, labels[0].pos.y), (5.0, 5.0));
        assert_eq!(labels[0].anchor, TextAnchor::Middle);
        let ids: std::collections::BTreeSet<_> = marks.iter().map(|m| m.id).collect();
        assert_eq!(ids.len(), marks.len());
    }
}
