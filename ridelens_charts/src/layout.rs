// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small measure/arrange layout pass for charts.
//!
//! - **Measure**: guides (title, axes, legend or colorbar) report the thickness they need.
//! - **Arrange**: [`ChartLayout::arrange`] reserves those margins around the plot rectangle and
//!   places each guide next to it.

use kurbo::Rect;

/// A width/height pair used by chart layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    /// Width in chart coordinate units.
    pub width: f64,
    /// Height in chart coordinate units.
    pub height: f64,
}

impl Size {
    /// Creates a size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Where a legend (or colorbar) goes relative to the plot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegendOrient {
    /// To the left of the chart, outside the left axis.
    Left,
    /// To the right of the chart, outside the right axis.
    Right,
    /// Above the plot, below the title.
    Top,
    /// Below the chart, outside the bottom axis.
    Bottom,
    /// Inside the upper-left corner of the plot.
    TopLeft,
    /// Inside the upper-right corner of the plot.
    TopRight,
}

/// Legend placement options (orientation + offset).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegendPlacement {
    /// Legend orientation.
    pub orient: LegendOrient,
    /// Offset away from the data rectangle and axes (or inward for corners).
    pub offset: f64,
}

impl Default for LegendPlacement {
    fn default() -> Self {
        Self {
            orient: LegendOrient::Right,
            offset: 18.0,
        }
    }
}

/// Layout inputs for a single chart: a plot area plus optional guides.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChartLayoutSpec {
    /// Optional chart title thickness (reserved above the plot and guides).
    pub title_top: Option<f64>,
    /// The desired plot size.
    pub plot_size: Size,
    /// Extra padding around the whole chart (applied on all sides).
    pub outer_padding: f64,
    /// Inset applied inside the plot rectangle to get the data rectangle.
    pub plot_padding: f64,
    /// Left axis thickness, if any.
    pub axis_left: Option<f64>,
    /// Right axis thickness, if any.
    pub axis_right: Option<f64>,
    /// Top axis thickness, if any.
    pub axis_top: Option<f64>,
    /// Bottom axis thickness, if any.
    pub axis_bottom: Option<f64>,
    /// An optional legend, given by its desired size and placement.
    pub legend: Option<(Size, LegendPlacement)>,
}

/// Output of the arrange pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartLayout {
    /// Outer chart bounds.
    pub view: Rect,
    /// Reserved rectangle for the chart title (if any).
    pub title_top: Option<Rect>,
    /// The plot rectangle.
    pub plot: Rect,
    /// The data rectangle (plot inset by `plot_padding`); scales map onto this.
    pub data: Rect,
    /// Reserved rectangle for the left axis (if any).
    pub axis_left: Option<Rect>,
    /// Reserved rectangle for the right axis (if any).
    pub axis_right: Option<Rect>,
    /// Reserved rectangle for the top axis (if any).
    pub axis_top: Option<Rect>,
    /// Reserved rectangle for the bottom axis (if any).
    pub axis_bottom: Option<Rect>,
    /// Legend placement rectangle (if any).
    pub legend: Option<Rect>,
}

impl ChartLayout {
    /// Computes a layout from the provided specification.
    pub fn arrange(spec: &ChartLayoutSpec) -> Self {
        let outer_padding = spec.outer_padding.max(0.0);
        let plot_padding = spec.plot_padding.max(0.0);
        let title_top_h = spec.title_top.unwrap_or(0.0).max(0.0);
        let axis_left_w = spec.axis_left.unwrap_or(0.0).max(0.0);
        let axis_right_w = spec.axis_right.unwrap_or(0.0).max(0.0);
        let axis_top_h = spec.axis_top.unwrap_or(0.0).max(0.0);
        let axis_bottom_h = spec.axis_bottom.unwrap_or(0.0).max(0.0);

        let mut margin_left = outer_padding + axis_left_w;
        let mut margin_right = outer_padding + axis_right_w;
        let mut margin_top = outer_padding + title_top_h + axis_top_h;
        let mut margin_bottom = outer_padding + axis_bottom_h;

        if let Some((size, placement)) = spec.legend {
            let offset = placement.offset.max(0.0);
            match placement.orient {
                LegendOrient::Left => margin_left += size.width.max(0.0) + offset,
                LegendOrient::Right => margin_right += size.width.max(0.0) + offset,
                LegendOrient::Top => margin_top += size.height.max(0.0) + offset,
                LegendOrient::Bottom => margin_bottom += size.height.max(0.0) + offset,
                LegendOrient::TopLeft | LegendOrient::TopRight => {}
            }
        }

        let plot_w = spec.plot_size.width.max(0.0);
        let plot_h = spec.plot_size.height.max(0.0);
        let plot = Rect::new(
            margin_left,
            margin_top,
            margin_left + plot_w,
            margin_top + plot_h,
        );

        let inset_x = plot_padding.min(0.5 * plot.width());
        let inset_y = plot_padding.min(0.5 * plot.height());
        let data = Rect::new(
            plot.x0 + inset_x,
            plot.y0 + inset_y,
            plot.x1 - inset_x,
            plot.y1 - inset_y,
        );

        // Axes hug the data rectangle so scale mapping matches the series marks.
        let axis_left =
            (axis_left_w > 0.0).then(|| Rect::new(data.x0 - axis_left_w, data.y0, data.x0, data.y1));
        let axis_right = (axis_right_w > 0.0)
            .then(|| Rect::new(data.x1, data.y0, data.x1 + axis_right_w, data.y1));
        let axis_top =
            (axis_top_h > 0.0).then(|| Rect::new(data.x0, data.y0 - axis_top_h, data.x1, data.y0));
        let axis_bottom = (axis_bottom_h > 0.0)
            .then(|| Rect::new(data.x0, data.y1, data.x1, data.y1 + axis_bottom_h));

        let legend = spec.legend.map(|(size, placement)| {
            legend_rect(
                data,
                (axis_left_w, axis_right_w, axis_top_h, axis_bottom_h),
                size,
                placement,
            )
        });

        let view = Rect::new(
            0.0,
            0.0,
            margin_left + plot_w + margin_right,
            margin_top + plot_h + margin_bottom,
        );

        let title_top = (title_top_h > 0.0)
            .then(|| Rect::new(0.0, outer_padding, view.x1, outer_padding + title_top_h));

        Self {
            view,
            title_top,
            plot,
            data,
            axis_left,
            axis_right,
            axis_top,
            axis_bottom,
            legend,
        }
    }
}

fn legend_rect(
    plot: Rect,
    (axis_left_w, axis_right_w, axis_top_h, axis_bottom_h): (f64, f64, f64, f64),
    size: Size,
    placement: LegendPlacement,
) -> Rect {
    let w = size.width.max(0.0);
    let h = size.height.max(0.0);
    let offset = placement.offset.max(0.0);

    match placement.orient {
        LegendOrient::Right => {
            let x0 = plot.x1 + axis_right_w + offset;
            Rect::new(x0, plot.y0, x0 + w, plot.y0 + h)
        }
        LegendOrient::Left => {
            let x1 = plot.x0 - axis_left_w - offset;
            Rect::new(x1 - w, plot.y0, x1, plot.y0 + h)
        }
        LegendOrient::Top => {
            let y1 = plot.y0 - axis_top_h - offset;
            Rect::new(plot.x0, y1 - h, plot.x0 + w, y1)
        }
        LegendOrient::Bottom => {
            let y0 = plot.y1 + axis_bottom_h + offset;
            Rect::new(plot.x0, y0, plot.x0 + w, y0 + h)
        }
        LegendOrient::TopLeft => Rect::new(
            plot.x0 + offset,
            plot.y0 + offset,
            plot.x0 + offset + w,
            plot.y0 + offset + h,
        ),
        LegendOrient::TopRight => Rect::new(
            plot.x1 - offset - w,
            plot.y0 + offset,
            plot.x1 - offset,
            plot.y0 + offset + h,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_reserves_space_above_plot() {
        let spec = ChartLayoutSpec {
            title_top: Some(20.0),
            plot_size: Size::new(100.0, 50.0),
            outer_padding: 10.0,
            plot_padding: 0.0,
            axis_left: Some(30.0),
            axis_right: None,
            axis_top: Some(12.0),
            axis_bottom: Some(18.0),
            legend: None,
        };

        let layout = ChartLayout::arrange(&spec);
        let title = layout.title_top.expect("missing title rect");
        assert!((title.y0 - 10.0).abs() < 1e-9);
        assert!((title.y1 - 30.0).abs() < 1e-9);

        // plot.y0 = padding + title + axis_top
        assert!((layout.plot.y0 - (10.0 + 20.0 + 12.0)).abs() < 1e-9);
        assert!((layout.view.y1 - (10.0 + 20.0 + 12.0 + 50.0 + 10.0 + 18.0)).abs() < 1e-9);
        assert!(layout.axis_right.is_none());
    }

    #[test]
    fn right_legend_sits_outside_the_right_axis() {
        let spec = ChartLayoutSpec {
            plot_size: Size::new(100.0, 50.0),
            axis_right: Some(20.0),
            legend: Some((Size::new(40.0, 30.0), LegendPlacement::default())),
            ..ChartLayoutSpec::default()
        };
        let layout = ChartLayout::arrange(&spec);
        let legend = layout.legend.unwrap();
        assert_eq!(legend.x0, 100.0 + 20.0 + 18.0);
        assert_eq!(legend.width(), 40.0);
        assert_eq!(layout.view.x1, 100.0 + 20.0 + 18.0 + 40.0);
    }
}
