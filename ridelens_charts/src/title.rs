// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart titles.
//!
//! Titles reserve a strip above the plot in [`crate::ChartLayout`] and render as a single text
//! mark centered (by default) in that strip.

use kurbo::Rect;
use peniko::{Brush, Color};
use ridelens_core::{Mark, MarkId, TextAnchor, TextBaseline};

use crate::z_order;
use crate::{TextMeasurer, TextStyle};

/// A chart-level title.
#[derive(Clone, Debug)]
pub struct TitleSpec {
    /// Stable mark id.
    pub id: MarkId,
    /// Title text (unshaped).
    pub text: String,
    /// Font size in scene coordinates.
    pub font_size: f64,
    /// Fill paint.
    pub fill: Brush,
    /// Vertical padding around the title text, applied above and below.
    pub padding: f64,
    /// Horizontal anchor within the title rectangle.
    pub anchor: TextAnchor,
    /// Rendering order hint.
    pub z_index: i32,
}

impl TitleSpec {
    /// Creates a title spec with default styling.
    pub fn new(id: MarkId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            font_size: 12.0,
            fill: Brush::Solid(Color::BLACK),
            padding: 6.0,
            anchor: TextAnchor::Middle,
            z_index: z_order::TITLES,
        }
    }

    /// Sets the font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the vertical padding.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the horizontal anchor.
    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Returns the height reserved by this title in chart layout.
    pub fn measure(&self, measurer: &dyn TextMeasurer) -> f64 {
        let metrics = measurer.measure(&self.text, TextStyle::new(self.font_size));
        (2.0 * self.padding.max(0.0) + metrics.line_height()).max(0.0)
    }

    /// Width of the title text, used to keep the view wide enough for long titles.
    pub fn text_width(&self, measurer: &dyn TextMeasurer) -> f64 {
        measurer
            .measure(&self.text, TextStyle::new(self.font_size))
            .advance_width
    }

    /// Emits the title mark placed within the provided title rectangle.
    pub fn marks(&self, measurer: &dyn TextMeasurer, title_rect: Rect) -> Vec<Mark> {
        let x = match self.anchor {
            TextAnchor::Start => title_rect.x0,
            TextAnchor::Middle => 0.5 * (title_rect.x0 + title_rect.x1),
            TextAnchor::End => title_rect.x1,
        };
        let th = measurer
            .measure(&self.text, TextStyle::new(self.font_size))
            .line_height();
        let y = title_rect.y0 + self.padding.max(0.0) + 0.5 * th;
        vec![
            Mark::builder(self.id)
                .z_index(self.z_index)
                .text()
                .pos(x, y)
                .text(self.text.clone())
                .font_size(self.font_size)
                .fill(self.fill.clone())
                .anchor(self.anchor)
                .baseline(TextBaseline::Middle)
                .build(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HeuristicTextMeasurer;

    #[test]
    fn title_is_centered_in_its_strip() {
        let measurer = HeuristicTextMeasurer;
        let title = TitleSpec::new(MarkId::from_raw(10), "Title").with_font_size(12.0);
        let h = title.measure(&measurer);
        assert!((h - 24.0).abs() < 1e-9);

        let marks = title.marks(&measurer, Rect::new(0.0, 0.0, 200.0, h));
        assert_eq!(marks.len(), 1);
        let t = marks[0].as_text().unwrap();
        assert_eq!(t.pos.x, 100.0);
        assert!((t.pos.y - 12.0).abs() < 1e-9);
        assert_eq!(t.text, "Title");
    }
}
