// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG serialization for `ridelens_core` marks.
//!
//! ```
//! use kurbo::Rect;
//! use peniko::Color;
//! use ridelens_core::{Mark, MarkId};
//!
//! let marks = vec![
//!     Mark::builder(MarkId::from_raw(1))
//!         .rect()
//!         .xywh(0.0, 0.0, 10.0, 10.0)
//!         .fill(Color::BLACK)
//!         .build(),
//! ];
//! let svg = ridelens_svg::render_svg(Rect::new(0.0, 0.0, 100.0, 50.0), &marks);
//! assert!(svg.starts_with("<svg"));
//! ```

use core::fmt::Write as _;

use kurbo::Rect;
use peniko::{Brush, Color};
use ridelens_core::{Mark, MarkPayload, TextAnchor, TextBaseline};

/// Margin added around the estimated mark bounds.
const VIEW_PADDING: f64 = 10.0;

/// Rendering options.
#[derive(Clone, Debug, PartialEq)]
pub struct SvgOptions {
    /// Background painted under every mark; `None` leaves the document transparent.
    pub background: Option<Color>,
    /// Font family attribute on the root element.
    pub font_family: String,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            background: Some(Color::WHITE),
            font_family: "sans-serif".to_owned(),
        }
    }
}

/// Renders `marks` into an SVG document with default options.
pub fn render_svg(view: Rect, marks: &[Mark]) -> String {
    render_svg_with(view, marks, &SvgOptions::default())
}

/// Renders `marks` into an SVG document.
///
/// The document's `viewBox` is the union of `view` and the padded mark bounds.
pub fn render_svg_with(view: Rect, marks: &[Mark], options: &SvgOptions) -> String {
    let view_box = marks_view_box(marks).map_or(view, |b| view.union(b));

    let mut sorted: Vec<&Mark> = marks.iter().collect();
    sorted.sort_by_key(|m| (m.z_index, m.id));
    warn_on_duplicate_ids(&sorted);

    let mut out = String::new();
    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
    let _ = write!(
        out,
        r#"viewBox="{} {} {} {}" width="{}" height="{}" preserveAspectRatio="xMinYMin meet" font-family="{}">"#,
        view_box.x0,
        view_box.y0,
        view_box.width(),
        view_box.height(),
        view_box.width(),
        view_box.height(),
        escape_xml(&options.font_family),
    );
    out.push('\n');

    if let Some(bg) = options.background {
        let _ = write!(
            out,
            r#"<rect x="{}" y="{}" width="{}" height="{}""#,
            view_box.x0,
            view_box.y0,
            view_box.width(),
            view_box.height()
        );
        write_paint_attr(&mut out, "fill", &Brush::Solid(bg));
        out.push_str("/>\n");
    }

    for mark in sorted {
        write_mark(&mut out, mark);
    }

    out.push_str("</svg>\n");
    out
}

fn write_mark(out: &mut String, mark: &Mark) {
    match &mark.payload {
        MarkPayload::Rect(r) => {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                r.rect.x0,
                r.rect.y0,
                r.rect.width(),
                r.rect.height(),
            );
            write_paint_attr(out, "fill", &r.fill);
            write_stroke_attrs(out, &r.stroke, r.stroke_width);
            out.push_str("/>\n");
        }
        MarkPayload::Text(t) => {
            let baseline = match t.baseline {
                TextBaseline::Middle => "middle",
                TextBaseline::Alphabetic => "alphabetic",
                TextBaseline::Hanging => "hanging",
                TextBaseline::Ideographic => "ideographic",
            };
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" font-size="{}" dominant-baseline="{}""#,
                t.pos.x, t.pos.y, t.font_size, baseline
            );
            if t.angle != 0.0 {
                let _ = write!(
                    out,
                    r#" transform="rotate({} {} {})""#,
                    t.angle, t.pos.x, t.pos.y
                );
            }
            out.push_str(match t.anchor {
                TextAnchor::Start => r#" text-anchor="start""#,
                TextAnchor::Middle => r#" text-anchor="middle""#,
                TextAnchor::End => r#" text-anchor="end""#,
            });
            write_paint_attr(out, "fill", &t.fill);
            out.push('>');
            out.push_str(&escape_xml(&t.text));
            out.push_str("</text>\n");
        }
        MarkPayload::Path(p) => {
            let _ = write!(out, r#"<path d="{}""#, p.path.to_svg());
            write_paint_attr(out, "fill", &p.fill);
            write_stroke_attrs(out, &p.stroke, p.stroke_width);
            out.push_str("/>\n");
        }
    }
}

fn warn_on_duplicate_ids(sorted: &[&Mark]) {
    let mut ids: Vec<_> = sorted.iter().map(|m| m.id).collect();
    ids.sort_unstable();
    if let Some(w) = ids.windows(2).find(|w| w[0] == w[1]) {
        tracing::warn!(id = w[0].0, "duplicate mark id; paint order falls back to input order");
    }
}

/// Union of the padded bounds of every mark, with text bounds estimated.
fn marks_view_box(marks: &[Mark]) -> Option<Rect> {
    marks
        .iter()
        .filter_map(|mark| match &mark.payload {
            MarkPayload::Text(t) => Some(estimate_text_bounds(
                t.pos.x,
                t.pos.y,
                t.font_size,
                t.angle,
                t.anchor,
                t.baseline,
                &t.text,
            )),
            payload => payload.bounds(),
        })
        .reduce(|a, b| a.union(b))
        .map(|r| r.inflate(VIEW_PADDING, VIEW_PADDING))
}

fn estimate_text_bounds(
    x: f64,
    y: f64,
    font_size: f64,
    angle: f64,
    anchor: TextAnchor,
    baseline: TextBaseline,
    text: &str,
) -> Rect {
    // Assume ~0.6em average glyph width; `y` is moved to an approximate midline.
    let width = 0.6 * font_size * text.chars().count() as f64;
    let half_height = 0.5 * font_size;
    let y_midline = match baseline {
        TextBaseline::Middle => y,
        TextBaseline::Alphabetic => y - 0.3 * font_size,
        TextBaseline::Hanging => y + 0.3 * font_size,
        TextBaseline::Ideographic => y - 0.2 * font_size,
    };
    let (x0, x1) = match anchor {
        TextAnchor::Start => (x, x + width),
        TextAnchor::Middle => (x - width / 2.0, x + width / 2.0),
        TextAnchor::End => (x - width, x),
    };
    let upright = Rect::new(x0, y_midline - half_height, x1, y_midline + half_height);
    if angle == 0.0 {
        return upright;
    }
    // Rotate the corners about the anchor point and take their bounding box.
    let (sin, cos) = angle.to_radians().sin_cos();
    let corners = [
        (upright.x0, upright.y0),
        (upright.x1, upright.y0),
        (upright.x0, upright.y1),
        (upright.x1, upright.y1),
    ];
    corners
        .into_iter()
        .map(|(cx, cy)| {
            let (dx, dy) = (cx - x, cy - y);
            let p = (x + dx * cos - dy * sin, y + dx * sin + dy * cos);
            Rect::new(p.0, p.1, p.0, p.1)
        })
        .reduce(|a, b| a.union(b))
        .unwrap_or(upright)
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            if rgba.a == 0 {
                return ("none".to_owned(), None);
            }
            let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let opacity = (rgba.a != 255).then(|| f64::from(rgba.a) / 255.0);
            (fill, opacity)
        }
        _ => ("none".to_owned(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let (value, opacity) = svg_paint(brush);
    let _ = write!(out, r#" {name}="{value}""#);
    if let Some(o) = opacity {
        let _ = write!(out, r#" {name}-opacity="{o}""#);
    }
}

fn write_stroke_attrs(out: &mut String, brush: &Brush, width: f64) {
    if width > 0.0 {
        write_paint_attr(out, "stroke", brush);
        let _ = write!(out, r#" stroke-width="{width}""#);
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
