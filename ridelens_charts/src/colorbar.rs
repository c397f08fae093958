// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertical colorbars for sequential color scales.

use kurbo::Rect;
use peniko::{Brush, Color};
use ridelens_core::{Mark, MarkId, TextAnchor, TextBaseline};

use crate::color::ColorScale;
use crate::format::format_tick_with_step;
use crate::layout::Size;
use crate::measure::{TextMeasurer, TextStyle};
use crate::rule_mark::RuleMarkSpec;
use crate::scale::nice_ticks;
use crate::z_order;

/// A vertical colorbar: a stack of color cells with ticks and an optional rotated title.
///
/// The domain minimum sits at the bottom of the bar.
#[derive(Clone, Debug)]
pub struct ColorbarSpec {
    /// Stable-id base; each generated mark uses a deterministic offset from this base.
    pub id_base: u64,
    /// The color scale being explained.
    pub scale: ColorScale,
    /// Bar thickness.
    pub width: f64,
    /// Bar length (usually the plot height).
    pub length: f64,
    /// Number of color cells the bar is drawn with.
    pub cells: usize,
    /// Approximate number of ticks.
    pub tick_count: usize,
    /// Tick line length.
    pub tick_size: f64,
    /// Gap between ticks and labels.
    pub label_padding: f64,
    /// Label font size.
    pub font_size: f64,
    /// Text and outline color.
    pub text_fill: Brush,
    /// Optional title, drawn rotated along the bar.
    pub title: Option<String>,
    /// Gap between labels and the title.
    pub title_offset: f64,
}

impl ColorbarSpec {
    /// Creates a colorbar for `scale` with defaults.
    pub fn new(id_base: u64, scale: ColorScale) -> Self {
        Self {
            id_base,
            scale,
            width: 12.0,
            length: 200.0,
            cells: 64,
            tick_count: 5,
            tick_size: 4.0,
            label_padding: 3.0,
            font_size: 10.0,
            text_fill: Color::BLACK.into(),
            title: None,
            title_offset: 8.0,
        }
    }

    /// Sets the bar length.
    pub fn with_length(mut self, length: f64) -> Self {
        self.length = length.max(0.0);
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn ticks(&self) -> (Vec<f64>, f64) {
        let (d0, d1) = self.scale.domain;
        let (lo, hi) = (d0.min(d1), d0.max(d1));
        let all = nice_ticks(lo, hi, self.tick_count);
        let step = match all.as_slice() {
            [a, b, ..] => b - a,
            _ => 0.0,
        };
        let eps = (hi - lo).abs() * 1e-9;
        let ticks = all
            .into_iter()
            .filter(|v| *v >= lo - eps && *v <= hi + eps)
            .collect();
        (ticks, step)
    }

    fn label_width(&self, measurer: &dyn TextMeasurer) -> f64 {
        let (ticks, step) = self.ticks();
        ticks
            .into_iter()
            .map(|v| {
                measurer
                    .measure(&format_tick_with_step(v, step), TextStyle::new(self.font_size))
                    .advance_width
            })
            .fold(0.0, f64::max)
    }

    /// Measures the space the colorbar needs.
    pub fn measure(&self, measurer: &dyn TextMeasurer) -> Size {
        let mut width = self.width + self.tick_size + self.label_padding + self.label_width(measurer);
        if self.title.is_some() {
            width += self.title_offset + self.font_size;
        }
        Size::new(width, self.length)
    }

    /// Generates colorbar marks inside `rect` (as arranged by the layout pass).
    pub fn marks(&self, measurer: &dyn TextMeasurer, rect: Rect) -> Vec<Mark> {
        let mut out = Vec::new();
        let bar = Rect::new(rect.x0, rect.y0, rect.x0 + self.width, rect.y0 + self.length);
        let (d0, d1) = self.scale.domain;
        let y_at = |v: f64| bar.y1 - self.scale.normalize(v) * bar.height();

        let cells = self.cells.max(1);
        let cell_h = bar.height() / cells as f64;
        for i in 0..cells {
            let t = (i as f64 + 0.5) / cells as f64;
            let v = d0 + t * (d1 - d0);
            let y1 = bar.y1 - cell_h * i as f64;
            out.push(
                Mark::builder(MarkId::from_raw(self.id_base + i as u64))
                    .z_index(z_order::LEGEND_SWATCHES)
                    .rect()
                    .rect(Rect::new(bar.x0, y1 - cell_h, bar.x1, y1))
                    .fill(self.scale.map(v))
                    .build(),
            );
        }
        out.push(
            Mark::builder(MarkId::from_raw(self.id_base + 999))
                .z_index(z_order::LEGEND_SWATCHES)
                .rect()
                .rect(bar)
                .fill(Color::TRANSPARENT)
                .stroke(self.text_fill.clone(), 1.0)
                .build(),
        );

        let (ticks, step) = self.ticks();
        for (i, v) in ticks.into_iter().enumerate() {
            let y = y_at(v);
            out.push(
                RuleMarkSpec::horizontal(
                    MarkId::from_raw(self.id_base + 1000 + i as u64),
                    y,
                    bar.x1,
                    bar.x1 + self.tick_size,
                )
                .with_stroke(self.text_fill.clone(), 1.0)
                .with_z_index(z_order::LEGEND_LABELS)
                .mark(),
            );
            out.push(
                Mark::builder(MarkId::from_raw(self.id_base + 1500 + i as u64))
                    .z_index(z_order::LEGEND_LABELS)
                    .text()
                    .pos(bar.x1 + self.tick_size + self.label_padding, y)
                    .text(format_tick_with_step(v, step))
                    .font_size(self.font_size)
                    .fill(self.text_fill.clone())
                    .anchor(TextAnchor::Start)
                    .baseline(TextBaseline::Middle)
                    .build(),
            );
        }

        if let Some(title) = &self.title {
            let x = bar.x1
                + self.tick_size
                + self.label_padding
                + self.label_width(measurer)
                + self.title_offset
                + 0.5 * self.font_size;
            out.push(
                Mark::builder(MarkId::from_raw(self.id_base + 2000))
                    .z_index(z_order::LEGEND_LABELS)
                    .text()
                    .pos(x, bar.y0 + 0.5 * bar.height())
                    .text(title.clone())
                    .font_size(self.font_size)
                    .angle(90.0)
                    .fill(self.text_fill.clone())
                    .anchor(TextAnchor::Middle)
                    .baseline(TextBaseline::Middle)
                    .build(),
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use ridelens_core::MarkKind;

    use super::*;
    use crate::measure::HeuristicTextMeasurer;

    #[test]
    fn cells_run_from_low_at_bottom_to_high_at_top() {
        let spec = ColorbarSpec::new(0, ColorScale::new((0.0, 1.0))).with_length(100.0);
        let marks = spec.marks(&HeuristicTextMeasurer, Rect::new(10.0, 20.0, 80.0, 120.0));
        let bottom = marks[0].as_rect().unwrap();
        let top = marks[63].as_rect().unwrap();
        assert!(bottom.rect.y1 > top.rect.y1);
        assert!((bottom.rect.y1 - 120.0).abs() < 1e-9);
        assert!((top.rect.y0 - 20.0).abs() < 1e-9);
        assert_ne!(bottom.fill, top.fill);
    }

    #[test]
    fn ticks_stay_inside_the_domain() {
        let spec = ColorbarSpec::new(0, ColorScale::new((0.0, 0.45)));
        let marks = spec.marks(&HeuristicTextMeasurer, Rect::new(0.0, 0.0, 50.0, 200.0));
        let labels: Vec<&str> = marks
            .iter()
            .filter_map(|m| m.as_text())
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(labels, ["0.0", "0.1", "0.2", "0.3", "0.4"]);
    }

    #[test]
    fn title_widens_the_measure() {
        let m = HeuristicTextMeasurer;
        let plain = ColorbarSpec::new(0, ColorScale::new((0.0, 1.0)));
        let titled = plain.clone().with_title("share");
        assert!(titled.measure(&m).width > plain.measure(&m).width);
        let marks = titled.marks(&m, Rect::new(0.0, 0.0, 50.0, 200.0));
        let title = marks.iter().filter_map(|m| m.as_text()).last().unwrap();
        assert_eq!(title.text, "share");
        assert_eq!(title.angle, 90.0);
        assert!(marks.iter().any(|m| m.kind() == MarkKind::Path));
    }
}
