// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render marks.
//!
//! A [`Mark`] is a fully resolved primitive: a rectangle, a text run, or a path, with its paint
//! and a `z_index`. Chart code builds marks through [`Mark::builder`]; renderers read
//! [`Mark::payload`].

use kurbo::{BezPath, Point, Rect, Shape};
use peniko::{Brush, Color};

use crate::ids::MarkId;

/// Horizontal text anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// Text starts at the anchor point.
    #[default]
    Start,
    /// Text is centered on the anchor point.
    Middle,
    /// Text ends at the anchor point.
    End,
}

/// Vertical text baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// The anchor is the vertical middle of the text.
    #[default]
    Middle,
    /// The anchor is the alphabetic baseline.
    Alphabetic,
    /// The anchor is the top of the text.
    Hanging,
    /// The anchor is the bottom of the text.
    Ideographic,
}

/// The primitive kind of a mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkKind {
    /// Axis-aligned rectangle.
    Rect,
    /// Single line of text.
    Text,
    /// Arbitrary path.
    Path,
}

/// A filled (and optionally stroked) rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct RectMark {
    /// Geometry in scene coordinates.
    pub rect: Rect,
    /// Fill paint.
    pub fill: Brush,
    /// Stroke paint (ignored when `stroke_width` is zero).
    pub stroke: Brush,
    /// Stroke width.
    pub stroke_width: f64,
}

/// A single line of unshaped text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextMark {
    /// Anchor position.
    pub pos: Point,
    /// Text content.
    pub text: String,
    /// Font size.
    pub font_size: f64,
    /// Rotation in degrees around `pos`.
    pub angle: f64,
    /// Horizontal anchor.
    pub anchor: TextAnchor,
    /// Vertical baseline.
    pub baseline: TextBaseline,
    /// Fill paint.
    pub fill: Brush,
}

/// A filled and/or stroked path.
#[derive(Clone, Debug, PartialEq)]
pub struct PathMark {
    /// Geometry in scene coordinates.
    pub path: BezPath,
    /// Fill paint.
    pub fill: Brush,
    /// Stroke paint (ignored when `stroke_width` is zero).
    pub stroke: Brush,
    /// Stroke width.
    pub stroke_width: f64,
}

/// Resolved mark content.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkPayload {
    /// Rectangle.
    Rect(RectMark),
    /// Text.
    Text(TextMark),
    /// Path.
    Path(PathMark),
}

impl MarkPayload {
    /// Geometric bounds, if cheaply known.
    ///
    /// Text has no bounds without measurement, so it returns `None`.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Rect(r) => Some(r.rect.abs()),
            Self::Path(p) => {
                let b = p.path.bounding_box();
                let pad = 0.5 * p.stroke_width.max(0.0);
                Some(b.inflate(pad, pad))
            }
            Self::Text(_) => None,
        }
    }

    /// Kind of this payload.
    pub fn kind(&self) -> MarkKind {
        match self {
            Self::Rect(_) => MarkKind::Rect,
            Self::Text(_) => MarkKind::Text,
            Self::Path(_) => MarkKind::Path,
        }
    }
}

/// A positioned render primitive with stable identity.
#[derive(Clone, Debug, PartialEq)]
pub struct Mark {
    /// Stable identity.
    pub id: MarkId,
    /// Render order hint; renderers sort by `(z_index, id)`.
    pub z_index: i32,
    /// Resolved content.
    pub payload: MarkPayload,
}

impl Mark {
    /// Starts building a mark with the given id.
    pub fn builder(id: MarkId) -> MarkBuilder {
        MarkBuilder { id, z_index: 0 }
    }

    /// Kind of this mark.
    pub fn kind(&self) -> MarkKind {
        self.payload.kind()
    }

    /// Returns the text payload, if this is a text mark.
    pub fn as_text(&self) -> Option<&TextMark> {
        match &self.payload {
            MarkPayload::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the rect payload, if this is a rect mark.
    pub fn as_rect(&self) -> Option<&RectMark> {
        match &self.payload {
            MarkPayload::Rect(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the path payload, if this is a path mark.
    pub fn as_path(&self) -> Option<&PathMark> {
        match &self.payload {
            MarkPayload::Path(p) => Some(p),
            _ => None,
        }
    }
}

/// Entry point for building a [`Mark`]; pick a kind to continue.
#[derive(Clone, Copy, Debug)]
pub struct MarkBuilder {
    id: MarkId,
    z_index: i32,
}

impl MarkBuilder {
    /// Sets the z-index.
    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Continues as a rectangle mark.
    pub fn rect(self) -> RectMarkBuilder {
        RectMarkBuilder {
            base: self,
            mark: RectMark {
                rect: Rect::ZERO,
                fill: Brush::Solid(Color::BLACK),
                stroke: Brush::Solid(Color::TRANSPARENT),
                stroke_width: 0.0,
            },
        }
    }

    /// Continues as a text mark.
    pub fn text(self) -> TextMarkBuilder {
        TextMarkBuilder {
            base: self,
            mark: TextMark {
                pos: Point::ZERO,
                text: String::new(),
                font_size: 12.0,
                angle: 0.0,
                anchor: TextAnchor::Start,
                baseline: TextBaseline::Middle,
                fill: Brush::Solid(Color::BLACK),
            },
        }
    }

    /// Continues as a path mark.
    pub fn path(self) -> PathMarkBuilder {
        PathMarkBuilder {
            base: self,
            mark: PathMark {
                path: BezPath::new(),
                fill: Brush::Solid(Color::TRANSPARENT),
                stroke: Brush::Solid(Color::BLACK),
                stroke_width: 0.0,
            },
        }
    }
}

/// Builder for rectangle marks.
#[derive(Clone, Debug)]
pub struct RectMarkBuilder {
    base: MarkBuilder,
    mark: RectMark,
}

impl RectMarkBuilder {
    /// Sets the z-index.
    pub fn z_index(mut self, z_index: i32) -> Self {
        self.base.z_index = z_index;
        self
    }

    /// Sets the geometry.
    pub fn rect(mut self, rect: Rect) -> Self {
        self.mark.rect = rect;
        self
    }

    /// Sets the geometry from origin and size.
    pub fn xywh(mut self, x: f64, y: f64, w: f64, h: f64) -> Self {
        self.mark.rect = Rect::new(x, y, x + w, y + h);
        self
    }

    /// Sets the fill paint.
    pub fn fill(mut self, fill: impl Into<Brush>) -> Self {
        self.mark.fill = fill.into();
        self
    }

    /// Sets the stroke paint and width.
    pub fn stroke(mut self, stroke: impl Into<Brush>, stroke_width: f64) -> Self {
        self.mark.stroke = stroke.into();
        self.mark.stroke_width = stroke_width;
        self
    }

    /// Finishes the mark.
    pub fn build(self) -> Mark {
        Mark {
            id: self.base.id,
            z_index: self.base.z_index,
            payload: MarkPayload::Rect(self.mark),
        }
    }
}

/// Builder for text marks.
#[derive(Clone, Debug)]
pub struct TextMarkBuilder {
    base: MarkBuilder,
    mark: TextMark,
}

impl TextMarkBuilder {
    /// Sets the z-index.
    pub fn z_index(mut self, z_index: i32) -> Self {
        self.base.z_index = z_index;
        self
    }

    /// Sets the anchor position.
    pub fn pos(mut self, x: f64, y: f64) -> Self {
        self.mark.pos = Point::new(x, y);
        self
    }

    /// Sets the text content.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.mark.text = text.into();
        self
    }

    /// Sets the font size.
    pub fn font_size(mut self, font_size: f64) -> Self {
        self.mark.font_size = font_size;
        self
    }

    /// Sets the rotation angle in degrees.
    pub fn angle(mut self, angle: f64) -> Self {
        self.mark.angle = angle;
        self
    }

    /// Sets the horizontal anchor.
    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.mark.anchor = anchor;
        self
    }

    /// Sets the vertical baseline.
    pub fn baseline(mut self, baseline: TextBaseline) -> Self {
        self.mark.baseline = baseline;
        self
    }

    /// Sets the fill paint.
    pub fn fill(mut self, fill: impl Into<Brush>) -> Self {
        self.mark.fill = fill.into();
        self
    }

    /// Finishes the mark.
    pub fn build(self) -> Mark {
        Mark {
            id: self.base.id,
            z_index: self.base.z_index,
            payload: MarkPayload::Text(self.mark),
        }
    }
}

/// Builder for path marks.
#[derive(Clone, Debug)]
pub struct PathMarkBuilder {
    base: MarkBuilder,
    mark: PathMark,
}

impl PathMarkBuilder {
    /// Sets the z-index.
    pub fn z_index(mut self, z_index: i32) -> Self {
        self.base.z_index = z_index;
        self
    }

    /// Sets the geometry.
    pub fn path(mut self, path: BezPath) -> Self {
        self.mark.path = path;
        self
    }

    /// Sets the fill paint.
    pub fn fill(mut self, fill: impl Into<Brush>) -> Self {
        self.mark.fill = fill.into();
        self
    }

    /// Sets the stroke paint and width.
    pub fn stroke(mut self, stroke: impl Into<Brush>, stroke_width: f64) -> Self {
        self.mark.stroke = stroke.into();
        self.mark.stroke_width = stroke_width;
        self
    }

    /// Finishes the mark.
    pub fn build(self) -> Mark {
        Mark {
            id: self.base.id,
            z_index: self.base.z_index,
            payload: MarkPayload::Path(self.mark),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_builder_normalizes_bounds() {
        let m = Mark::builder(MarkId::from_raw(3))
            .z_index(5)
            .rect()
            .rect(Rect::new(10.0, 20.0, 0.0, 0.0))
            .build();
        assert_eq!(m.z_index, 5);
        assert_eq!(m.kind(), MarkKind::Rect);
        assert_eq!(m.payload.bounds(), Some(Rect::new(0.0, 0.0, 10.0, 20.0)));
    }

    #[test]
    fn path_bounds_include_half_stroke() {
        let mut p = BezPath::new();
        p.move_to((0.0, 0.0));
        p.line_to((10.0, 0.0));
        let m = Mark::builder(MarkId::from_raw(1))
            .path()
            .path(p)
            .stroke(Color::BLACK, 2.0)
            .build();
        let b = m.payload.bounds().unwrap();
        assert_eq!(b, Rect::new(-1.0, -1.0, 11.0, 1.0));
    }

    #[test]
    fn text_has_no_intrinsic_bounds() {
        let m = Mark::builder(MarkId::from_raw(1)).text().text("hi").build();
        assert!(m.payload.bounds().is_none());
        assert_eq!(m.as_text().map(|t| t.text.as_str()), Some("hi"));
    }
}
