// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swatch legends: a vertical list of color swatches with labels, under an optional title.

use kurbo::Rect;
use peniko::{Brush, Color};
use ridelens_core::{Mark, MarkId, MarkPayload, TextAnchor, TextBaseline};

use crate::layout::Size;
use crate::measure::{TextMeasurer, TextStyle};
use crate::z_order;

/// Bounds of a text run anchored at `(x, y)`.
pub(crate) fn text_bounds(
    x: f64,
    y: f64,
    (w, h): (f64, f64),
    anchor: TextAnchor,
    baseline: TextBaseline,
) -> Rect {
    let (x0, x1) = match anchor {
        TextAnchor::Start => (x, x + w),
        TextAnchor::Middle => (x - w * 0.5, x + w * 0.5),
        TextAnchor::End => (x - w, x),
    };
    let (y0, y1) = match baseline {
        TextBaseline::Middle => (y - h * 0.5, y + h * 0.5),
        TextBaseline::Alphabetic | TextBaseline::Ideographic => (y - h, y),
        TextBaseline::Hanging => (y, y + h),
    };
    Rect::new(x0, y0, x1, y1)
}

/// Union of the bounds of `marks`, measuring text with `measurer`.
pub(crate) fn marks_bounds(marks: &[Mark], measurer: &dyn TextMeasurer) -> Option<Rect> {
    marks
        .iter()
        .filter_map(|mark| match &mark.payload {
            MarkPayload::Text(t) => {
                let m = measurer.measure(&t.text, TextStyle::new(t.font_size));
                Some(text_bounds(
                    t.pos.x,
                    t.pos.y,
                    (m.advance_width, m.line_height()),
                    t.anchor,
                    t.baseline,
                ))
            }
            payload => payload.bounds(),
        })
        .reduce(|a, b| a.union(b))
}

/// A legend row item.
#[derive(Clone, Debug)]
pub struct LegendItem {
    /// The label string shown next to the swatch.
    pub label: String,
    /// The swatch fill paint.
    pub fill: Brush,
}

impl LegendItem {
    /// Convenience constructor for a solid-color swatch.
    pub fn solid(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            fill: Brush::Solid(color),
        }
    }
}

/// An unpositioned swatch legend.
///
/// Measure with [`LegendSwatchesSpec::measure`], then emit marks at the arranged origin with
/// [`LegendSwatchesSpec::marks`].
#[derive(Clone, Debug)]
pub struct LegendSwatchesSpec {
    /// Stable-id base; each generated mark uses a deterministic offset from this base.
    pub id_base: u64,
    /// Optional heading above the rows.
    pub title: Option<String>,
    /// Swatch square size.
    pub swatch_size: f64,
    /// Vertical gap between rows.
    pub row_gap: f64,
    /// Horizontal gap between swatch and label.
    pub label_dx: f64,
    /// Label font size.
    pub font_size: f64,
    /// Label color.
    pub text_fill: Brush,
    /// Items in display order.
    pub items: Vec<LegendItem>,
}

impl LegendSwatchesSpec {
    /// Creates a new legend specification with defaults.
    pub fn new(id_base: u64, items: Vec<LegendItem>) -> Self {
        Self {
            id_base,
            title: None,
            swatch_size: 10.0,
            row_gap: 6.0,
            label_dx: 6.0,
            font_size: 10.0,
            text_fill: Color::BLACK.into(),
            items,
        }
    }

    /// Sets the heading.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the label font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the swatch size.
    pub fn with_swatch_size(mut self, swatch_size: f64) -> Self {
        self.swatch_size = swatch_size;
        self
    }

    fn row_height(&self) -> f64 {
        self.swatch_size.max(self.font_size)
    }

    /// Generates legend marks with the top-left corner at `(x, y)`.
    pub fn marks(&self, x: f64, y: f64) -> Vec<Mark> {
        let mut out = Vec::new();
        let row_height = self.row_height();
        let mut top = y;

        if let Some(title) = &self.title {
            out.push(
                Mark::builder(MarkId::from_raw(self.id_base + 2000))
                    .z_index(z_order::LEGEND_LABELS)
                    .text()
                    .pos(x, top)
                    .text(title.clone())
                    .font_size(self.font_size)
                    .fill(self.text_fill.clone())
                    .anchor(TextAnchor::Start)
                    .baseline(TextBaseline::Hanging)
                    .build(),
            );
            top += self.font_size + self.row_gap;
        }

        for (i, item) in self.items.iter().enumerate() {
            let row_y = top + i as f64 * (row_height + self.row_gap);
            out.push(
                Mark::builder(MarkId::from_raw(self.id_base + i as u64))
                    .z_index(z_order::LEGEND_SWATCHES)
                    .rect()
                    .xywh(
                        x,
                        row_y + (row_height - self.swatch_size) * 0.5,
                        self.swatch_size,
                        self.swatch_size,
                    )
                    .fill(item.fill.clone())
                    .build(),
            );
            out.push(
                Mark::builder(MarkId::from_raw(self.id_base + 1000 + i as u64))
                    .z_index(z_order::LEGEND_LABELS)
                    .text()
                    .pos(x + self.swatch_size + self.label_dx, row_y + row_height * 0.5)
                    .text(item.label.clone())
                    .font_size(self.font_size)
                    .fill(self.text_fill.clone())
                    .anchor(TextAnchor::Start)
                    .baseline(TextBaseline::Middle)
                    .build(),
            );
        }
        out
    }

    /// Measures the desired legend size.
    pub fn measure(&self, measurer: &dyn TextMeasurer) -> Size {
        marks_bounds(&self.marks(0.0, 0.0), measurer)
            .map(|b| Size::new(b.x1.max(0.0), b.y1.max(0.0)))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::HeuristicTextMeasurer;

    #[test]
    fn measure_grows_with_items_and_labels() {
        let measurer = HeuristicTextMeasurer;
        let short = LegendSwatchesSpec::new(1, vec![LegendItem::solid("A", Color::BLACK)]);
        let long = LegendSwatchesSpec::new(
            1,
            vec![
                LegendItem::solid("A", Color::BLACK),
                LegendItem::solid("student", Color::WHITE),
            ],
        );
        let s1 = short.measure(&measurer);
        let s2 = long.measure(&measurer);
        assert!(s2.width > s1.width);
        assert!(s2.height > s1.height);
        assert_eq!(s1.height, 10.0);
    }

    #[test]
    fn title_shifts_rows_down() {
        let items = vec![LegendItem::solid("staff", Color::BLACK)];
        let plain = LegendSwatchesSpec::new(1, items.clone()).marks(0.0, 0.0);
        let titled = LegendSwatchesSpec::new(1, items)
            .with_title("user_type")
            .marks(0.0, 0.0);
        assert_eq!(titled.len(), plain.len() + 1);
        let y = |marks: &[Mark]| {
            marks
                .iter()
                .find(|m| m.id == MarkId::from_raw(1))
                .and_then(Mark::as_rect)
                .map(|r| r.rect.y0)
        };
        assert!(y(&titled) > y(&plain));
    }

    #[test]
    fn empty_legend_measures_zero() {
        let spec = LegendSwatchesSpec::new(1, Vec::new());
        assert_eq!(spec.measure(&HeuristicTextMeasurer), Size::default());
    }
}
