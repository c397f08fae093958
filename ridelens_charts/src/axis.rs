// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis mark generation.
//!
//! An axis is a single [`AxisSpec`] with an `orient` of top, bottom, left or right. It can be
//! measured (for layout) and then arranged against the plot rectangle to generate marks.
//! Discrete (band) axes label category indices, usually through
//! [`AxisSpec::with_categories`].

use std::sync::Arc;

use kurbo::Rect;
use peniko::{Brush, Color};
use ridelens_core::{Mark, MarkId, TextAnchor, TextBaseline};

use crate::format::format_tick_with_step;
use crate::rule_mark::RuleMarkSpec;
use crate::scale::{ScaleBand, ScaleLinear, ScaleSpec};
use crate::z_order;
use crate::{TextMeasurer, TextStyle};

/// A paint + width pair for stroked paths (domain lines, ticks, gridlines).
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in scene coordinates.
    pub stroke_width: f64,
}

impl StrokeStyle {
    /// Convenience for a solid stroke.
    pub fn solid(brush: impl Into<Brush>, stroke_width: f64) -> Self {
        Self {
            brush: brush.into(),
            stroke_width,
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::solid(Color::BLACK, 1.0)
    }
}

/// Axis styling defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisStyle {
    /// Style for the axis domain line and tick marks.
    pub rule: StrokeStyle,
    /// Fill paint for tick labels.
    pub label_fill: Brush,
    /// Font size for tick labels.
    pub label_font_size: f64,
    /// Fill paint for the axis title.
    pub title_fill: Brush,
    /// Font size for the axis title.
    pub title_font_size: f64,
}

impl Default for AxisStyle {
    fn default() -> Self {
        let rule = StrokeStyle::default();
        Self {
            rule: rule.clone(),
            label_fill: rule.brush.clone(),
            label_font_size: 10.0,
            title_fill: rule.brush,
            title_font_size: 11.0,
        }
    }
}

/// Gridline styling.
#[derive(Clone, Debug, PartialEq)]
pub struct GridStyle {
    /// Stroke style for gridlines.
    pub stroke: StrokeStyle,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            stroke: StrokeStyle {
                brush: Brush::Solid(Color::BLACK.with_alpha(40.0 / 255.0)),
                stroke_width: 1.0,
            },
        }
    }
}

/// Axis placement relative to the plot area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrient {
    /// A horizontal axis placed above the plot area.
    Top,
    /// A horizontal axis placed below the plot area.
    Bottom,
    /// A vertical axis placed to the left of the plot area.
    Left,
    /// A vertical axis placed to the right of the plot area.
    Right,
}

impl AxisOrient {
    fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// Sign of the outward normal along the axis' cross direction.
    fn outward(self) -> f64 {
        match self {
            Self::Bottom | Self::Right => 1.0,
            Self::Top | Self::Left => -1.0,
        }
    }
}

/// Formats a tick value; the second argument is the tick step.
pub type TickFormatter = Arc<dyn Fn(f64, f64) -> String>;

/// An axis specification.
#[derive(Clone)]
pub struct AxisSpec {
    /// Stable-id base; each generated mark uses a deterministic offset from this base.
    pub id_base: u64,
    /// The axis scale specification.
    pub scale: ScaleSpec,
    /// Axis placement relative to the plot.
    pub orient: AxisOrient,
    /// Approximate number of ticks (continuous scales only).
    pub tick_count: usize,
    /// Tick line length. Direction depends on [`AxisSpec::orient`].
    pub tick_size: f64,
    /// Whether to draw tick marks.
    pub ticks: bool,
    /// Whether to draw tick labels.
    pub labels: bool,
    /// Whether to draw the axis domain line.
    pub show_domain: bool,
    /// Padding between the tick end and the tick label.
    pub tick_padding: f64,
    /// Extra padding applied between the axis/ticks and tick labels.
    pub label_padding: f64,
    /// Axis styling.
    pub style: AxisStyle,
    /// Optional gridline styling; gridlines span the plot area.
    pub grid: Option<GridStyle>,
    /// Optional axis title text.
    pub title: Option<String>,
    /// Distance from tick labels to the title.
    pub title_offset: f64,
    /// Optional tick label formatter, used for both measuring and rendering labels.
    pub tick_formatter: Option<TickFormatter>,
    /// Tick label rotation angle in degrees.
    pub label_angle: f64,
}

impl core::fmt::Debug for AxisSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AxisSpec")
            .field("id_base", &self.id_base)
            .field("scale", &self.scale)
            .field("orient", &self.orient)
            .field("tick_count", &self.tick_count)
            .field("tick_size", &self.tick_size)
            .field("ticks", &self.ticks)
            .field("labels", &self.labels)
            .field("show_domain", &self.show_domain)
            .field("tick_padding", &self.tick_padding)
            .field("label_padding", &self.label_padding)
            .field("style", &self.style)
            .field("grid", &self.grid)
            .field("title", &self.title)
            .field("title_offset", &self.title_offset)
            .field("tick_formatter", &self.tick_formatter.is_some())
            .field("label_angle", &self.label_angle)
            .finish()
    }
}

/// A scale bound to the plot rectangle along one axis.
#[derive(Clone, Copy, Debug)]
enum Bound {
    Linear(ScaleLinear),
    Band(ScaleBand),
}

impl Bound {
    fn at(&self, v: f64) -> f64 {
        match self {
            Self::Linear(s) => s.map(v),
            Self::Band(s) => s.center(discrete_index(v)),
        }
    }
}

impl AxisSpec {
    /// Creates a new axis specification.
    ///
    /// The returned axis has `tick_count = 10`, `tick_size = 5`, a tick padding of `12` for
    /// top/bottom and `6` for left/right, default style, and no title or grid.
    pub fn new(id_base: u64, scale: impl Into<ScaleSpec>, orient: AxisOrient) -> Self {
        let tick_padding = if orient.is_horizontal() { 12.0 } else { 6.0 };
        Self {
            id_base,
            scale: scale.into(),
            orient,
            tick_count: 10,
            tick_size: 5.0,
            ticks: true,
            labels: true,
            show_domain: true,
            tick_padding,
            label_padding: 0.0,
            style: AxisStyle::default(),
            grid: None,
            title: None,
            title_offset: 10.0,
            tick_formatter: None,
            label_angle: 0.0,
        }
    }

    /// Convenience constructor for a `bottom` axis.
    pub fn bottom(id_base: u64, scale: impl Into<ScaleSpec>) -> Self {
        Self::new(id_base, scale, AxisOrient::Bottom)
    }

    /// Convenience constructor for a `left` axis.
    pub fn left(id_base: u64, scale: impl Into<ScaleSpec>) -> Self {
        Self::new(id_base, scale, AxisOrient::Left)
    }

    /// Set the approximate tick count.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    /// Set tick size in scene coordinates.
    pub fn with_tick_size(mut self, tick_size: f64) -> Self {
        self.tick_size = tick_size;
        self
    }

    /// Enable or disable tick marks.
    pub fn with_ticks(mut self, ticks: bool) -> Self {
        self.ticks = ticks;
        self
    }

    /// Enable or disable tick labels.
    pub fn with_labels(mut self, labels: bool) -> Self {
        self.labels = labels;
        self
    }

    /// Enable or disable the axis domain line.
    pub fn with_domain(mut self, domain: bool) -> Self {
        self.show_domain = domain;
        self
    }

    /// Set tick padding in scene coordinates.
    pub fn with_tick_padding(mut self, tick_padding: f64) -> Self {
        self.tick_padding = tick_padding;
        self
    }

    /// Set a custom tick label formatter.
    pub fn with_tick_formatter(mut self, f: impl Fn(f64, f64) -> String + 'static) -> Self {
        self.tick_formatter = Some(Arc::new(f));
        self
    }

    /// Labels discrete ticks with `labels`, by category index.
    ///
    /// Indices past the end of `labels` get an empty label.
    pub fn with_categories<S: Into<String>>(self, labels: impl IntoIterator<Item = S>) -> Self {
        let labels: Arc<[String]> = labels.into_iter().map(Into::into).collect();
        self.with_tick_formatter(move |v, _step| {
            labels
                .get(discrete_index(v))
                .cloned()
                .unwrap_or_default()
        })
    }

    /// Set tick label rotation angle in degrees.
    pub fn with_label_angle(mut self, angle_degrees: f64) -> Self {
        self.label_angle = angle_degrees;
        self
    }

    /// Set the axis style.
    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.style = style;
        self
    }

    /// Enable gridlines using the provided style.
    pub fn with_grid(mut self, grid: GridStyle) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Set the axis title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the title offset in scene coordinates.
    pub fn with_title_offset(mut self, title_offset: f64) -> Self {
        self.title_offset = title_offset;
        self
    }

    fn range(&self, plot: Rect) -> (f64, f64) {
        if self.orient.is_horizontal() {
            (plot.x0, plot.x1)
        } else {
            (plot.y1, plot.y0)
        }
    }

    /// The linear scale of this axis bound to `plot`, or `None` for a discrete axis.
    pub fn scale_linear(&self, plot: Rect) -> Option<ScaleLinear> {
        match self.scale {
            ScaleSpec::Linear(s) => Some(s.instantiate_resolved(self.range(plot), self.tick_count)),
            _ => None,
        }
    }

    /// The band scale of this axis bound to `plot`, or `None` for other scales.
    pub fn scale_band(&self, plot: Rect) -> Option<ScaleBand> {
        match self.scale {
            ScaleSpec::Band(s) => Some(s.instantiate(self.range(plot))),
            _ => None,
        }
    }

    fn bound(&self, plot: Rect) -> Bound {
        let range = self.range(plot);
        match self.scale {
            ScaleSpec::Linear(s) => Bound::Linear(s.instantiate_resolved(range, self.tick_count)),
            ScaleSpec::Band(s) => Bound::Band(s.instantiate(range)),
        }
    }

    fn tick_values(&self) -> (Vec<f64>, f64) {
        match self.scale {
            ScaleSpec::Linear(s) => {
                let domain = s.resolved_domain(self.tick_count);
                let ticks = ScaleLinear::new(domain, (0.0, 1.0)).ticks(self.tick_count);
                let step = tick_step(&ticks);
                (ticks, step)
            }
            ScaleSpec::Band(s) => ((0..s.count).map(|i| i as f64).collect(), 1.0),
        }
    }

    fn format_tick(&self, v: f64, step: f64) -> String {
        match &self.tick_formatter {
            Some(f) => f(v, step),
            None => format_tick_with_step(v, step),
        }
    }

    /// Measure the thickness this axis needs along its normal direction.
    pub fn measure(&self, measurer: &dyn TextMeasurer) -> f64 {
        let tick_extent = if self.ticks {
            self.tick_size.abs()
        } else {
            0.0
        };
        let horizontal = self.orient.is_horizontal();

        let mut out = tick_extent;
        if self.labels {
            let (ticks, step) = self.tick_values();
            let theta = self.label_angle.to_radians();
            let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
            let max_label_extent = ticks
                .into_iter()
                .map(|v| {
                    let label = self.format_tick(v, step);
                    let m = measurer.measure(&label, TextStyle::new(self.style.label_font_size));
                    let (w, h) = (m.advance_width, m.line_height());
                    if horizontal {
                        sin * w + cos * h
                    } else {
                        cos * w + sin * h
                    }
                })
                .fold(0.0_f64, f64::max);
            out += self.tick_padding.max(0.0) + self.label_padding.max(0.0) + max_label_extent;
        }
        if let Some(title) = &self.title {
            let thickness = if horizontal {
                measurer
                    .measure(title, TextStyle::new(self.style.title_font_size))
                    .line_height()
            } else {
                // The title is rotated, so its height maps to width.
                self.style.title_font_size
            };
            out += self.title_offset.max(0.0) + thickness;
        }
        out
    }

    /// Generate axis marks for the given plot rectangle and arranged axis rectangle.
    ///
    /// `axis_rect` should be the reserved region for this axis, adjacent to `plot`.
    pub fn marks(&self, plot: Rect, axis_rect: Rect) -> Vec<Mark> {
        let orient = self.orient;
        let horizontal = orient.is_horizontal();
        let outward = orient.outward();
        let tick_size = self.tick_size.abs();
        let tick_extent = if self.ticks { tick_size } else { 0.0 };
        let label_gap = (self.tick_padding + self.label_padding).max(0.0);
        let (ticks, step) = self.tick_values();
        let bound = self.bound(plot);

        // The plot edge the axis hugs, as a cross-axis coordinate.
        let edge = match orient {
            AxisOrient::Bottom => plot.y1,
            AxisOrient::Top => plot.y0,
            AxisOrient::Left => plot.x0,
            AxisOrient::Right => plot.x1,
        };
        let (lo, hi) = if horizontal {
            (plot.x0, plot.x1)
        } else {
            (plot.y0, plot.y1)
        };
        let in_plot = |p: f64| p >= lo - 1.0e-9 && p <= hi + 1.0e-9;
        // Rules are described along/cross the axis and flipped into scene space here.
        let rule = |id: MarkId, along0: f64, cross0: f64, along1: f64, cross1: f64| {
            if horizontal {
                RuleMarkSpec::new(id, along0, cross0, along1, cross1)
            } else {
                RuleMarkSpec::new(id, cross0, along0, cross1, along1)
            }
        };

        let mut out = Vec::new();

        if let Some(grid) = &self.grid {
            let mut grid_ticks: Vec<f64> = ticks
                .iter()
                .copied()
                .filter(|v| in_plot(bound.at(*v)))
                .collect();
            // Continuous plots also get lines at the domain endpoints (the plot edges).
            if let ScaleSpec::Linear(s) = self.scale {
                let (d0, d1) = s.resolved_domain(self.tick_count);
                push_if_missing(&mut grid_ticks, d0);
                push_if_missing(&mut grid_ticks, d1);
            }
            let (c0, c1) = if horizontal {
                (plot.y0, plot.y1)
            } else {
                (plot.x0, plot.x1)
            };
            let base = self.id_base.wrapping_sub(5_000);
            for (i, v) in grid_ticks.into_iter().enumerate() {
                let p = bound.at(v);
                out.push(
                    rule(MarkId::from_raw(base + i as u64), p, c0, p, c1)
                        .with_stroke(grid.stroke.brush.clone(), grid.stroke.stroke_width)
                        .with_z_index(z_order::GRID_LINES)
                        .mark(),
                );
            }
        }

        if self.show_domain {
            out.push(
                rule(MarkId::from_raw(self.id_base), lo, edge, hi, edge)
                    .with_stroke(self.style.rule.brush.clone(), self.style.rule.stroke_width)
                    .with_z_index(z_order::AXIS_RULES)
                    .mark(),
            );
        }

        let continuous = !self.scale.is_discrete();
        let ticks_len = ticks.len();
        for (i, v) in ticks.into_iter().enumerate() {
            let p = bound.at(v);
            if !in_plot(p) {
                continue;
            }

            if self.ticks {
                out.push(
                    rule(
                        MarkId::from_raw(self.id_base + 1 + i as u64),
                        p,
                        edge,
                        p,
                        edge + outward * tick_size,
                    )
                    .with_stroke(self.style.rule.brush.clone(), self.style.rule.stroke_width)
                    .with_z_index(z_order::AXIS_RULES)
                    .mark(),
                );
            }

            if self.labels {
                let cross = edge + outward * (tick_extent + label_gap);
                let (x, y, anchor, baseline) = if horizontal {
                    // Edge labels of a continuous axis are pulled inside the plot span.
                    let (anchor, x) = if self.label_angle != 0.0 {
                        let anchor = if outward > 0.0 {
                            TextAnchor::End
                        } else {
                            TextAnchor::Start
                        };
                        (anchor, p)
                    } else if continuous && i == 0 {
                        (TextAnchor::Start, p.clamp(lo, hi))
                    } else if continuous && i + 1 == ticks_len {
                        (TextAnchor::End, p.clamp(lo, hi))
                    } else {
                        (TextAnchor::Middle, p)
                    };
                    let baseline = if outward > 0.0 {
                        TextBaseline::Hanging
                    } else {
                        TextBaseline::Ideographic
                    };
                    (x, cross, anchor, baseline)
                } else {
                    let anchor = if outward > 0.0 {
                        TextAnchor::Start
                    } else {
                        TextAnchor::End
                    };
                    (cross, p, anchor, TextBaseline::Middle)
                };
                out.push(
                    Mark::builder(MarkId::from_raw(self.id_base + 1000 + i as u64))
                        .z_index(z_order::AXIS_LABELS)
                        .text()
                        .pos(x, y)
                        .text(self.format_tick(v, step))
                        .anchor(anchor)
                        .baseline(baseline)
                        .angle(self.label_angle)
                        .font_size(self.style.label_font_size)
                        .fill(self.style.label_fill.clone())
                        .build(),
                );
            }
        }

        if let Some(title) = &self.title {
            // The title sits in the strip at the outer edge of `axis_rect`; `measure` reserved
            // `title_offset` plus the title thickness there, so it never overlaps labels.
            let font = self.style.title_font_size;
            let mid = 0.5 * (lo + hi);
            let (x, y, baseline, angle) = match orient {
                AxisOrient::Bottom => (mid, axis_rect.y1 - font, TextBaseline::Hanging, 0.0),
                AxisOrient::Top => (mid, axis_rect.y0 + font, TextBaseline::Ideographic, 0.0),
                AxisOrient::Left => (axis_rect.x0 + 0.5 * font, mid, TextBaseline::Middle, -90.0),
                AxisOrient::Right => (axis_rect.x1 - 0.5 * font, mid, TextBaseline::Middle, 90.0),
            };
            out.push(
                Mark::builder(MarkId::from_raw(self.id_base + 9000))
                    .z_index(z_order::AXIS_TITLES)
                    .text()
                    .pos(x, y)
                    .text(title.clone())
                    .font_size(font)
                    .fill(self.style.title_fill.clone())
                    .anchor(TextAnchor::Middle)
                    .baseline(baseline)
                    .angle(angle)
                    .build(),
            );
        }

        out
    }
}

fn tick_step(ticks: &[f64]) -> f64 {
    let step = ticks
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(f64::INFINITY, f64::min);
    if step.is_finite() { step } else { 0.0 }
}

fn discrete_index(v: f64) -> usize {
    if !v.is_finite() || v < 0.0 {
        return 0;
    }
    let v = v.round().min(10_000.0);
    #[allow(
        clippy::cast_possible_truncation,
        reason = "value is clamped to a small non-negative range"
    )]
    {
        v as usize
    }
}

fn push_if_missing(ticks: &mut Vec<f64>, v: f64) {
    if !v.is_finite() || ticks.iter().any(|t| (*t - v).abs() <= 1.0e-9) {
        return;
    }
    ticks.push(v);
}

#[cfg(test)]
mod tests {
    use kurbo::Shape;
    use ridelens_core::MarkKind;

    use super::*;
    use crate::HeuristicTextMeasurer;
    use crate::scale::{ScaleBandSpec, ScaleLinearSpec};

    fn labels(marks: &[Mark]) -> Vec<String> {
        marks
            .iter()
            .filter(|m| (1000..2000).contains(&(m.id.0 % 10_000)))
            .filter_map(|m| m.as_text().map(|t| t.text.clone()))
            .collect()
    }

    #[test]
    fn axis_measure_respects_ticks_and_labels_toggles() {
        let measurer = HeuristicTextMeasurer;
        let axis = AxisSpec::left(1, ScaleLinearSpec::new((0.0, 10.0))).with_tick_count(3);

        let with_all = axis.measure(&measurer);
        let no_labels = axis.clone().with_labels(false).measure(&measurer);
        let no_ticks = axis.clone().with_ticks(false).measure(&measurer);
        let none = axis
            .clone()
            .with_ticks(false)
            .with_labels(false)
            .with_domain(false)
            .measure(&measurer);

        assert!(with_all > 0.0);
        assert!(no_labels < with_all);
        assert!(no_ticks < with_all);
        assert_eq!(none, 0.0);
    }

    #[test]
    fn axis_measure_accounts_for_label_angle() {
        let measurer = HeuristicTextMeasurer;
        let axis = AxisSpec::bottom(1, ScaleLinearSpec::new((0.0, 1000.0))).with_tick_count(6);
        let a0 = axis.measure(&measurer);
        let a45 = axis.with_label_angle(45.0).measure(&measurer);
        assert!(a45 >= a0);
    }

    #[test]
    fn axis_uses_custom_tick_formatter_for_labels() {
        let plot = Rect::new(0.0, 0.0, 100.0, 50.0);
        let axis_rect = Rect::new(0.0, 50.0, 100.0, 60.0);
        let axis = AxisSpec::bottom(1, ScaleLinearSpec::new((0.0, 10.0)))
            .with_tick_count(3)
            .with_tick_formatter(|_v, _step| String::from("X"));

        let l = labels(&axis.marks(plot, axis_rect));
        assert!(!l.is_empty());
        assert!(l.iter().all(|s| s == "X"));
    }

    #[test]
    fn category_labels_sit_at_band_centers() {
        let plot = Rect::new(0.0, 0.0, 100.0, 50.0);
        let axis_rect = Rect::new(0.0, 50.0, 100.0, 80.0);
        let axis = AxisSpec::bottom(100, ScaleBandSpec::new(2).with_padding(0.0, 0.0))
            .with_categories(["staff", "student"]);

        let marks = axis.marks(plot, axis_rect);
        assert_eq!(labels(&marks), ["staff", "student"]);
        let first = marks
            .iter()
            .find(|m| m.id == MarkId::from_raw(1100))
            .and_then(Mark::as_text)
            .unwrap();
        assert_eq!(first.pos.x, 25.0);
        assert_eq!(first.anchor, TextAnchor::Middle);
    }

    #[test]
    fn vertical_band_axis_lists_categories_top_down() {
        let plot = Rect::new(50.0, 0.0, 150.0, 70.0);
        let axis_rect = Rect::new(0.0, 0.0, 50.0, 70.0);
        let axis = AxisSpec::left(1, ScaleBandSpec::new(7).with_padding(0.0, 0.0))
            .with_categories(["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
        let marks = axis.marks(plot, axis_rect);
        let mon = marks.iter().find_map(|m| m.as_text().filter(|t| t.text == "Mon"));
        let sun = marks.iter().find_map(|m| m.as_text().filter(|t| t.text == "Sun"));
        assert_eq!(mon.unwrap().pos.y, 5.0);
        assert_eq!(sun.unwrap().pos.y, 65.0);
        assert_eq!(mon.unwrap().anchor, TextAnchor::End);
    }

    #[test]
    fn axis_left_title_uses_axis_rect_edge_to_avoid_label_overlap() {
        let measurer = HeuristicTextMeasurer;
        let plot = Rect::new(100.0, 0.0, 200.0, 100.0);
        let axis = AxisSpec::left(1, ScaleLinearSpec::new((0.0, 10.0)))
            .with_tick_count(3)
            .with_title("Y")
            .with_title_offset(10.0);

        let w = axis.measure(&measurer);
        let axis_rect = Rect::new(plot.x0 - w, plot.y0, plot.x0, plot.y1);
        let marks = axis.marks(plot, axis_rect);

        let title = marks
            .iter()
            .find(|m| m.id == MarkId::from_raw(1 + 9000))
            .and_then(Mark::as_text)
            .expect("missing title");
        let expected = axis_rect.x0 + 0.5 * axis.style.title_font_size;
        assert!((title.pos.x - expected).abs() < 1e-9);
        assert_eq!(title.angle, -90.0);
    }

    #[test]
    fn axis_bottom_title_uses_axis_rect_edge_to_avoid_label_overlap() {
        let measurer = HeuristicTextMeasurer;
        let plot = Rect::new(0.0, 0.0, 100.0, 100.0);
        let axis = AxisSpec::bottom(1, ScaleLinearSpec::new((0.0, 10.0)))
            .with_tick_count(3)
            .with_title("X");

        let h = axis.measure(&measurer);
        let axis_rect = Rect::new(plot.x0, plot.y1, plot.x1, plot.y1 + h);
        let marks = axis.marks(plot, axis_rect);
        let title = marks
            .iter()
            .find(|m| m.id == MarkId::from_raw(1 + 9000))
            .and_then(Mark::as_text)
            .expect("missing title");
        let expected = axis_rect.y1 - axis.style.title_font_size;
        assert!((title.pos.y - expected).abs() < 1e-9);
    }

    #[test]
    fn axis_without_ticks_emits_no_tick_path_marks() {
        let plot = Rect::new(0.0, 0.0, 100.0, 50.0);
        let axis_rect = Rect::new(0.0, 50.0, 100.0, 60.0);
        let axis = AxisSpec::bottom(1, ScaleLinearSpec::new((0.0, 10.0)))
            .with_tick_count(3)
            .with_ticks(false)
            .with_domain(false);

        let marks = axis.marks(plot, axis_rect);
        assert!(
            marks.iter().all(|m| m.kind() != MarkKind::Path),
            "expected no path marks when ticks/domain are disabled"
        );
    }

    #[test]
    fn axis_left_grid_stays_inside_plot_and_hits_domain_edges() {
        let plot = Rect::new(50.0, 30.0, 250.0, 130.0);
        let axis_rect = Rect::new(0.0, 30.0, 50.0, 130.0);
        let axis = AxisSpec::left(1, ScaleLinearSpec::new((-0.7, 3.29)))
            .with_tick_count(6)
            .with_grid(GridStyle::default());

        let mut saw_top_edge = false;
        for m in axis.marks(plot, axis_rect) {
            if m.z_index != z_order::GRID_LINES {
                continue;
            }
            let b = m.as_path().expect("gridlines are paths").path.bounding_box();
            assert!(b.y0 >= plot.y0 - 1.0e-9, "grid above plot: {b:?}");
            assert!(b.y1 <= plot.y1 + 1.0e-9, "grid below plot: {b:?}");
            if (b.y0 - plot.y0).abs() < 1.0e-9 {
                saw_top_edge = true;
            }
        }
        assert!(saw_top_edge, "expected a grid line at plot.y0 for domain max");
    }
}
