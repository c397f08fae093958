// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart composition helpers.
//!
//! A [`ChartSpec`] owns chart layout and the common guides (title, axes, a legend or a
//! colorbar). A chart is assembled from:
//! - a plot/data rectangle,
//! - guide components, and
//! - a set of series marks built against the resolved data rectangle.

use kurbo::Rect;
use peniko::Color;
use ridelens_core::{Mark, MarkId};

use crate::{
    AxisSpec, ChartLayout, ChartLayoutSpec, ColorbarSpec, LegendPlacement, LegendSwatchesSpec,
    Size, TextMeasurer, TitleSpec, z_order,
};

/// Mark id of the plot background.
pub const PLOT_BACKGROUND_ID: MarkId = MarkId::from_raw(u64::MAX - 1);
/// Mark id of the plot frame.
pub const PLOT_FRAME_ID: MarkId = MarkId::from_raw(u64::MAX - 2);

/// A legend-like guide placed next to the plot.
#[derive(Clone, Debug)]
pub enum Guide {
    /// Color swatches with labels.
    Swatches(LegendSwatchesSpec),
    /// A continuous colorbar. The bar keeps its own `length`.
    Colorbar(ColorbarSpec),
}

impl Guide {
    fn measure(&self, measurer: &dyn TextMeasurer) -> Size {
        match self {
            Self::Swatches(s) => s.measure(measurer),
            Self::Colorbar(c) => c.measure(measurer),
        }
    }

    fn marks(&self, measurer: &dyn TextMeasurer, rect: Rect) -> Vec<Mark> {
        match self {
            Self::Swatches(s) => s.marks(rect.x0, rect.y0),
            Self::Colorbar(c) => c.marks(measurer, rect),
        }
    }
}

impl From<LegendSwatchesSpec> for Guide {
    fn from(value: LegendSwatchesSpec) -> Self {
        Self::Swatches(value)
    }
}

impl From<ColorbarSpec> for Guide {
    fn from(value: ColorbarSpec) -> Self {
        Self::Colorbar(value)
    }
}

/// A composed chart description that owns guide specs and layout inputs.
#[derive(Clone, Debug, Default)]
pub struct ChartSpec {
    /// Optional title.
    pub title: Option<TitleSpec>,
    /// Desired plot size (data rectangle plus `layout.plot_padding`).
    pub plot_size: Size,
    /// Layout options.
    pub layout: ChartLayoutSpec,
    /// Optional left axis.
    pub axis_left: Option<AxisSpec>,
    /// Optional right axis.
    pub axis_right: Option<AxisSpec>,
    /// Optional top axis.
    pub axis_top: Option<AxisSpec>,
    /// Optional bottom axis.
    pub axis_bottom: Option<AxisSpec>,
    /// Optional legend or colorbar.
    pub guide: Option<(Guide, LegendPlacement)>,
    /// Whether to outline the plot rectangle.
    pub frame: bool,
}

impl ChartSpec {
    /// Creates an empty chart with the given plot size.
    pub fn new(plot_size: Size) -> Self {
        Self {
            plot_size,
            ..Self::default()
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: TitleSpec) -> Self {
        self.title = Some(title);
        self
    }

    /// Sets the outer padding around the whole chart.
    pub fn with_outer_padding(mut self, padding: f64) -> Self {
        self.layout.outer_padding = padding;
        self
    }

    /// Sets the inset between the plot frame and the data rectangle.
    pub fn with_plot_padding(mut self, padding: f64) -> Self {
        self.layout.plot_padding = padding;
        self
    }

    /// Places an axis according to its orientation, replacing any axis already there.
    pub fn with_axis(mut self, axis: AxisSpec) -> Self {
        let slot = match axis.orient {
            crate::AxisOrient::Left => &mut self.axis_left,
            crate::AxisOrient::Right => &mut self.axis_right,
            crate::AxisOrient::Top => &mut self.axis_top,
            crate::AxisOrient::Bottom => &mut self.axis_bottom,
        };
        *slot = Some(axis);
        self
    }

    /// Sets the legend or colorbar.
    pub fn with_guide(mut self, guide: impl Into<Guide>, placement: LegendPlacement) -> Self {
        self.guide = Some((guide.into(), placement));
        self
    }

    /// Enables or disables the plot frame.
    pub fn with_frame(mut self, frame: bool) -> Self {
        self.frame = frame;
        self
    }

    /// Returns the bottom axis if present, otherwise the top axis.
    pub fn x_axis(&self) -> Option<&AxisSpec> {
        self.axis_bottom.as_ref().or(self.axis_top.as_ref())
    }

    /// Returns the left axis if present, otherwise the right axis.
    pub fn y_axis(&self) -> Option<&AxisSpec> {
        self.axis_left.as_ref().or(self.axis_right.as_ref())
    }

    /// Computes layout for this chart.
    pub fn layout(&self, measurer: &dyn TextMeasurer) -> ChartLayout {
        let mut layout = self.layout;
        layout.title_top = self.title.as_ref().map(|t| t.measure(measurer));
        layout.plot_size = self.plot_size;
        layout.axis_left = self.axis_left.as_ref().map(|a| a.measure(measurer));
        layout.axis_right = self.axis_right.as_ref().map(|a| a.measure(measurer));
        layout.axis_top = self.axis_top.as_ref().map(|a| a.measure(measurer));
        layout.axis_bottom = self.axis_bottom.as_ref().map(|a| a.measure(measurer));
        layout.legend = self
            .guide
            .as_ref()
            .map(|(guide, placement)| (guide.measure(measurer), *placement));
        ChartLayout::arrange(&layout)
    }

    /// Generates marks for the plot background, title, axes and guide, given a computed layout.
    pub fn guide_marks(&self, measurer: &dyn TextMeasurer, layout: &ChartLayout) -> Vec<Mark> {
        let mut out = vec![
            Mark::builder(PLOT_BACKGROUND_ID)
                .z_index(z_order::PLOT_BACKGROUND)
                .rect()
                .rect(layout.plot)
                .fill(Color::WHITE)
                .build(),
        ];
        if self.frame {
            out.push(
                Mark::builder(PLOT_FRAME_ID)
                    .z_index(z_order::AXIS_RULES)
                    .rect()
                    .rect(layout.plot)
                    .fill(Color::TRANSPARENT)
                    .stroke(Color::BLACK, 1.0)
                    .build(),
            );
        }

        if let (Some(title), Some(rect)) = (self.title.as_ref(), layout.title_top) {
            out.extend(title.marks(measurer, rect));
        }

        let plot = layout.data;
        let axes = [
            (self.axis_bottom.as_ref(), layout.axis_bottom),
            (self.axis_top.as_ref(), layout.axis_top),
            (self.axis_left.as_ref(), layout.axis_left),
            (self.axis_right.as_ref(), layout.axis_right),
        ];
        for (axis, rect) in axes {
            if let (Some(axis), Some(rect)) = (axis, rect) {
                out.extend(axis.marks(plot, rect));
            }
        }

        if let (Some((guide, _placement)), Some(rect)) = (self.guide.as_ref(), layout.legend) {
            out.extend(guide.marks(measurer, rect));
        }

        out
    }

    /// Produces a full mark list: series marks + guide marks.
    ///
    /// The series builder is invoked with the resolved data rectangle.
    pub fn marks(
        &self,
        measurer: &dyn TextMeasurer,
        build_series: impl FnOnce(&Self, Rect) -> Vec<Mark>,
    ) -> (ChartLayout, Vec<Mark>) {
        let layout = self.layout(measurer);
        let mut marks = build_series(self, layout.data);
        marks.extend(self.guide_marks(measurer, &layout));
        (layout, marks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ColorScale, HeuristicTextMeasurer, LegendItem, ScaleBandSpec, ScaleLinearSpec,
        category_color,
    };

    fn chart() -> ChartSpec {
        ChartSpec::new(Size::new(200.0, 100.0))
            .with_outer_padding(8.0)
            .with_title(TitleSpec::new(MarkId::from_raw(1), "distance by user_type"))
            .with_axis(
                AxisSpec::bottom(10_000, ScaleBandSpec::new(2))
                    .with_categories(["staff", "student"]),
            )
            .with_axis(
                AxisSpec::left(20_000, ScaleLinearSpec::new((0.0, 10.0)))
                    .with_title("distance_f"),
            )
            .with_frame(true)
    }

    #[test]
    fn series_builder_sees_the_data_rect() {
        let m = HeuristicTextMeasurer;
        let (layout, marks) = chart().marks(&m, |spec, data| {
            let band = spec.x_axis().and_then(|a| a.scale_band(data)).unwrap();
            assert_eq!(band.count(), 2);
            Vec::new()
        });
        assert!(layout.data.x0 > 8.0);
        assert!(layout.data.y0 > 8.0);
        assert!(marks.iter().any(|m| m.id == PLOT_BACKGROUND_ID));
        assert!(marks.iter().any(|m| m.id == PLOT_FRAME_ID));
        let title = marks.iter().find(|m| m.id == MarkId::from_raw(1)).unwrap();
        assert_eq!(title.as_text().unwrap().text, "distance by user_type");
    }

    #[test]
    fn guides_widen_the_view() {
        let m = HeuristicTextMeasurer;
        let plain = chart().layout(&m);
        let legend = LegendSwatchesSpec::new(
            30_000,
            vec![
                LegendItem::solid("staff", category_color(0)),
                LegendItem::solid("student", category_color(1)),
            ],
        );
        let with_legend = chart()
            .with_guide(legend, LegendPlacement::default())
            .layout(&m);
        assert!(with_legend.view.width() > plain.view.width());

        let colorbar = ColorbarSpec::new(40_000, ColorScale::new((0.0, 1.0))).with_length(100.0);
        let spec = chart().with_guide(colorbar, LegendPlacement::default());
        let (layout, marks) = spec.marks(&m, |_, _| Vec::new());
        let rect = layout.legend.unwrap();
        assert!(rect.x0 > layout.plot.x1);
        assert!(marks.iter().any(|m| m.id == MarkId::from_raw(40_000)));
    }
}
