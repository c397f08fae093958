// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart recipes used by the analyses.
//!
//! Every recipe builds a [`ChartSpec`] (title, framed plot, axes and an optional legend or
//! colorbar), generates the series marks against the resolved data rectangle, and renders the
//! result into a [`Figure`]. Charts without any finite value still render, with a "no data"
//! note in the plot.

use kurbo::Rect;
use peniko::Color;
use ridelens_charts::{
    AxisSpec, BarMarkSpec, BoxplotMarkSpec, ChartSpec, ColorScale, ColorbarSpec, GridStyle,
    HeatmapMarkSpec, HeuristicTextMeasurer, LegendItem, LegendPlacement, LegendSwatchesSpec,
    PointMarkSpec, RectMarkSpec, ScaleBandSpec, ScaleLinearSpec, Size, Symbol, TextMarkSpec,
    TitleSpec, ViolinMarkSpec, category_color, jitter_points, z_order,
};
use ridelens_core::{Mark, MarkId, TableId, TextAnchor, TextBaseline};
use ridelens_transforms::Matrix;

use crate::error::AnalysisError;
use crate::figure::Figure;

const TITLE_ID: MarkId = MarkId::from_raw(0x1F_000);
const NO_DATA_SHADE_ID: MarkId = MarkId::from_raw(0x1F_100);
const NO_DATA_TEXT_ID: MarkId = MarkId::from_raw(0x1F_101);
const X_AXIS: u64 = 0x10_000;
const Y_AXIS: u64 = 0x11_000;
const GUIDE: u64 = 0x12_000;
const SERIES: u32 = 0x100;

/// Width reserved per category on discrete x axes.
const CATEGORY_WIDTH: f64 = 90.0;
const PLOT_HEIGHT: f64 = 260.0;

/// Chart title and axis titles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Titles {
    /// Chart title.
    pub title: String,
    /// Horizontal axis title.
    pub x: String,
    /// Vertical axis title.
    pub y: String,
}

impl Titles {
    /// Bundles the three titles.
    pub fn new(title: impl Into<String>, x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x: x.into(),
            y: y.into(),
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "a chart has a handful of series"
)]
fn series_table(index: usize) -> TableId {
    TableId(SERIES + index as u32)
}

fn base_chart(titles: &Titles, plot_size: Size) -> ChartSpec {
    ChartSpec::new(plot_size)
        .with_outer_padding(10.0)
        .with_title(TitleSpec::new(TITLE_ID, titles.title.clone()).with_font_size(13.0))
        .with_frame(true)
}

fn value_axis(scale: ScaleLinearSpec, title: &str) -> AxisSpec {
    AxisSpec::left(Y_AXIS, scale.with_nice(true))
        .with_tick_count(6)
        .with_grid(GridStyle::default())
        .with_title(title)
}

fn category_axis(categories: &[String], title: &str) -> AxisSpec {
    AxisSpec::bottom(
        X_AXIS,
        ScaleBandSpec::new(categories.len()).with_padding(0.2, 0.1),
    )
    .with_categories(categories.iter().cloned())
    .with_title(title)
}

fn category_plot_size(count: usize) -> Size {
    Size::new(CATEGORY_WIDTH * count.max(3) as f64, PLOT_HEIGHT)
}

fn no_data_marks(data: Rect) -> Vec<Mark> {
    let gray = Color::from_rgba8(0x80, 0x80, 0x80, 0xff);
    vec![
        RectMarkSpec::new(NO_DATA_SHADE_ID, data)
            .with_fill(Color::from_rgba8(0xf2, 0xf2, 0xf2, 0xff))
            .with_z_index(z_order::PLOT_BACKGROUND + 1)
            .mark(),
        TextMarkSpec::new(NO_DATA_TEXT_ID, data.center(), "no data")
            .with_anchor(TextAnchor::Middle)
            .with_baseline(TextBaseline::Middle)
            .with_fill(gray)
            .with_z_index(z_order::SERIES_LABELS)
            .mark(),
    ]
}

fn render(
    file_name: &str,
    chart: &ChartSpec,
    has_data: bool,
    build_series: impl FnOnce(&ChartSpec, Rect) -> Vec<Mark>,
) -> Result<Figure, AnalysisError> {
    let measurer = HeuristicTextMeasurer;
    let (layout, mut marks) = chart.marks(&measurer, build_series);
    if !has_data {
        marks.extend(no_data_marks(layout.data));
    }
    Figure::render(file_name, layout.view, &marks)
}

fn has_values(groups: &[Vec<f64>]) -> bool {
    groups.iter().flatten().any(|v| v.is_finite())
}

/// One box per category.
pub fn boxplot(
    file_name: &str,
    titles: &Titles,
    categories: &[String],
    groups: &[Vec<f64>],
) -> Result<Figure, AnalysisError> {
    let values = groups.iter().flatten().copied();
    let chart = base_chart(titles, category_plot_size(categories.len()))
        .with_axis(category_axis(categories, &titles.x))
        .with_axis(value_axis(ScaleLinearSpec::covering(values, 0.05), &titles.y));
    render(file_name, &chart, has_values(groups), |spec, data| {
        let band = spec.x_axis().and_then(|a| a.scale_band(data));
        let y = spec.y_axis().and_then(|a| a.scale_linear(data));
        let (Some(band), Some(y)) = (band, y) else {
            return Vec::new();
        };
        BoxplotMarkSpec::new(series_table(0), band, y).marks(groups)
    })
}

/// A violin per category with a narrow box plot on top.
pub fn violin_with_box(
    file_name: &str,
    titles: &Titles,
    categories: &[String],
    groups: &[Vec<f64>],
) -> Result<Figure, AnalysisError> {
    let values = groups.iter().flatten().copied();
    let chart = base_chart(titles, category_plot_size(categories.len()))
        .with_axis(category_axis(categories, &titles.x))
        .with_axis(value_axis(ScaleLinearSpec::covering(values, 0.1), &titles.y));
    render(file_name, &chart, has_values(groups), |spec, data| {
        let band = spec.x_axis().and_then(|a| a.scale_band(data));
        let y = spec.y_axis().and_then(|a| a.scale_linear(data));
        let (Some(band), Some(y)) = (band, y) else {
            return Vec::new();
        };
        let mut marks = ViolinMarkSpec::new(series_table(0), band, y)
            .with_width(0.8)
            .marks(groups);
        marks.extend(
            BoxplotMarkSpec::new(series_table(1), band, y)
                .with_width(0.18)
                .with_fill(Color::WHITE)
                .with_fliers(false)
                .marks(groups),
        );
        marks
    })
}

/// Values per category as a strip plot, x jittered with a seeded normal.
pub fn jitter(
    file_name: &str,
    titles: &Titles,
    categories: &[String],
    groups: &[Vec<f64>],
    sd: f64,
    seed: u64,
) -> Result<Figure, AnalysisError> {
    let values = groups.iter().flatten().copied();
    let chart = base_chart(titles, category_plot_size(categories.len()))
        .with_axis(category_axis(categories, &titles.x))
        .with_axis(value_axis(ScaleLinearSpec::covering(values, 0.05), &titles.y));
    render(file_name, &chart, has_values(groups), |spec, data| {
        let band = spec.x_axis().and_then(|a| a.scale_band(data));
        let y = spec.y_axis().and_then(|a| a.scale_linear(data));
        let (Some(band), Some(y)) = (band, y) else {
            return Vec::new();
        };
        let points = jitter_points(groups, sd, seed);
        PointMarkSpec::new(series_table(0), band.index_scale(), y)
            .with_symbol(Symbol::Circle)
            .with_size(4.0)
            .with_fill(category_color(0).with_alpha(0.35))
            .marks(&points)
    })
}

/// A scatter plot with one colored series per label and a legend.
pub fn scatter(
    file_name: &str,
    titles: &Titles,
    series: &[(String, Vec<(f64, f64)>)],
) -> Result<Figure, AnalysisError> {
    let xs = series.iter().flat_map(|(_, pts)| pts.iter().map(|p| p.0));
    let ys = series.iter().flat_map(|(_, pts)| pts.iter().map(|p| p.1));
    let legend = LegendSwatchesSpec::new(
        GUIDE,
        series
            .iter()
            .enumerate()
            .map(|(i, (label, _))| LegendItem::solid(label.clone(), category_color(i)))
            .collect(),
    );
    let chart = base_chart(titles, Size::new(360.0, PLOT_HEIGHT))
        .with_axis(
            AxisSpec::bottom(X_AXIS, ScaleLinearSpec::covering(xs, 0.05).with_nice(true))
                .with_tick_count(6)
                .with_title(titles.x.clone()),
        )
        .with_axis(value_axis(ScaleLinearSpec::covering(ys, 0.05), &titles.y))
        .with_guide(legend, LegendPlacement::default());
    let has_data = series
        .iter()
        .any(|(_, pts)| pts.iter().any(|(x, y)| x.is_finite() && y.is_finite()));
    render(file_name, &chart, has_data, |spec, data| {
        let x = spec.x_axis().and_then(|a| a.scale_linear(data));
        let y = spec.y_axis().and_then(|a| a.scale_linear(data));
        let (Some(x), Some(y)) = (x, y) else {
            return Vec::new();
        };
        series
            .iter()
            .enumerate()
            .flat_map(|(i, (_, points))| {
                PointMarkSpec::new(series_table(i), x, y)
                    .with_symbol(Symbol::Circle)
                    .with_size(5.0)
                    .with_fill(category_color(i).with_alpha(0.4))
                    .marks(points)
            })
            .collect()
    })
}

/// One bar per category, from a zero baseline.
pub fn bar(
    file_name: &str,
    titles: &Titles,
    categories: &[String],
    values: &[f64],
) -> Result<Figure, AnalysisError> {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let scale = ScaleLinearSpec::covering(finite, 0.05).including(0.0);
    let chart = base_chart(titles, category_plot_size(categories.len()))
        .with_axis(category_axis(categories, &titles.x))
        .with_axis(value_axis(scale, &titles.y));
    let has_data = values.iter().any(|v| v.is_finite());
    render(file_name, &chart, has_data, |spec, data| {
        let band = spec.x_axis().and_then(|a| a.scale_band(data));
        let y = spec.y_axis().and_then(|a| a.scale_linear(data));
        let (Some(band), Some(y)) = (band, y) else {
            return Vec::new();
        };
        BarMarkSpec::new(series_table(0), band, y).marks(values)
    })
}

/// Options for [`heatmap`].
#[derive(Clone, Debug, PartialEq)]
pub struct HeatmapOptions {
    /// Row labels, top to bottom.
    pub row_labels: Vec<String>,
    /// Column labels, left to right.
    pub col_labels: Vec<String>,
    /// Colorbar title.
    pub colorbar_title: Option<String>,
    /// Decimal places of per-cell annotations; no annotations when `None`.
    pub annotate: Option<usize>,
    /// Size of one cell.
    pub cell: Size,
}

/// A matrix as colored cells with a viridis colorbar.
///
/// The color domain spans the matrix values; a constant matrix uses `[v, v + 1]`.
pub fn heatmap(
    file_name: &str,
    titles: &Titles,
    matrix: &Matrix,
    options: &HeatmapOptions,
) -> Result<Figure, AnalysisError> {
    let (rows, cols) = (matrix.rows(), matrix.cols());
    if options.row_labels.len() != rows || options.col_labels.len() != cols {
        return Err(AnalysisError::Render {
            figure: file_name.to_owned(),
            reason: format!(
                "{rows}x{cols} matrix with {} row and {} column labels",
                options.row_labels.len(),
                options.col_labels.len()
            ),
        });
    }
    let domain = match matrix.min_max() {
        Some((lo, hi)) if hi > lo => (lo, hi),
        Some((lo, _)) => (lo, lo + 1.0),
        None => (0.0, 1.0),
    };
    let color = ColorScale::new(domain);
    let plot_size = Size::new(
        options.cell.width * cols as f64,
        options.cell.height * rows as f64,
    );
    let mut colorbar = ColorbarSpec::new(GUIDE, color).with_length(plot_size.height);
    if let Some(title) = &options.colorbar_title {
        colorbar = colorbar.with_title(title.clone());
    }
    let band = |count| ScaleBandSpec::new(count).with_padding(0.0, 0.0);
    let chart = base_chart(titles, plot_size)
        .with_axis(
            AxisSpec::bottom(X_AXIS, band(cols))
                .with_categories(options.col_labels.iter().cloned())
                .with_title(titles.x.clone()),
        )
        .with_axis(
            AxisSpec::left(Y_AXIS, band(rows))
                .with_categories(options.row_labels.iter().cloned())
                .with_title(titles.y.clone()),
        )
        .with_guide(colorbar, LegendPlacement::default());
    render(file_name, &chart, true, |spec, data| {
        let x = spec.x_axis().and_then(|a| a.scale_band(data));
        let y = spec.y_axis().and_then(|a| a.scale_band(data));
        let (Some(x), Some(y)) = (x, y) else {
            return Vec::new();
        };
        let mut cells = HeatmapMarkSpec::new(series_table(0), x, y, color);
        if let Some(decimals) = options.annotate {
            cells = cells.with_annotations(decimals);
        }
        cells.marks(matrix)
    })
}
