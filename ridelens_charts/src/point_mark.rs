// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point mark generation.

use peniko::Brush;
use ridelens_core::{Mark, MarkId, TableId};

use crate::scale::ScaleLinear;
use crate::symbol::Symbol;

/// A point mark over `(x, y)` pairs.
///
/// This generates one mark per finite pair: a rect for [`Symbol::Square`] or a path for
/// [`Symbol::Circle`].
#[derive(Clone, Debug)]
pub struct PointMarkSpec {
    /// Source table id, used to derive stable mark ids.
    pub table: TableId,
    /// X scale mapping data x into scene x.
    pub x_scale: ScaleLinear,
    /// Y scale mapping data y into scene y.
    pub y_scale: ScaleLinear,
    /// Glyph size in scene coordinates.
    pub size: f64,
    /// The point glyph shape.
    pub symbol: Symbol,
    /// Fill paint for the point glyphs.
    pub fill: Brush,
    /// Rendering order hint.
    pub z_index: i32,
}

impl PointMarkSpec {
    /// Creates a point mark spec with a size of 6 and the first palette color.
    pub fn new(table: TableId, x_scale: ScaleLinear, y_scale: ScaleLinear) -> Self {
        Self {
            table,
            x_scale,
            y_scale,
            size: 6.0,
            symbol: Symbol::Square,
            fill: crate::color::category_color(0).into(),
            z_index: crate::z_order::SERIES_POINTS,
        }
    }

    /// Sets the glyph size.
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Sets the symbol shape.
    pub fn with_symbol(mut self, symbol: Symbol) -> Self {
        self.symbol = symbol;
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Generates marks for `points`.
    ///
    /// Mark identity is derived from `(table, index)`; pairs with a non-finite coordinate are
    /// skipped without shifting the ids of the rest.
    pub fn marks(&self, points: &[(f64, f64)]) -> Vec<Mark> {
        let size = self.size;
        points
            .iter()
            .enumerate()
            .filter(|(_, (x, y))| x.is_finite() && y.is_finite())
            .map(|(row, &(x, y))| {
                let id = MarkId::for_row(self.table, row as u64);
                let (cx, cy) = (self.x_scale.map(x), self.y_scale.map(y));
                match self.symbol {
                    Symbol::Square => Mark::builder(id)
                        .z_index(self.z_index)
                        .rect()
                        .xywh(cx - size / 2.0, cy - size / 2.0, size, size)
                        .fill(self.fill.clone())
                        .build(),
                    Symbol::Circle => Mark::builder(id)
                        .z_index(self.z_index)
                        .path()
                        .path(self.symbol.path(cx, cy, size))
                        .fill(self.fill.clone())
                        .build(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Shape;
    use ridelens_core::MarkKind;

    use super::*;

    #[test]
    fn squares_are_centered_on_the_point() {
        let spec = PointMarkSpec::new(
            TableId(1),
            ScaleLinear::new((0.0, 10.0), (0.0, 100.0)),
            ScaleLinear::new((0.0, 10.0), (100.0, 0.0)),
        );
        let marks = spec.marks(&[(5.0, 5.0), (f64::NAN, 1.0), (10.0, 0.0)]);
        assert_eq!(marks.len(), 2);
        let r = marks[0].as_rect().unwrap().rect;
        assert_eq!((r.x0, r.y0, r.width()), (47.0, 47.0, 6.0));
        assert_eq!(marks[1].id, MarkId::for_row(TableId(1), 2));
    }

    #[test]
    fn circles_are_paths() {
        let spec = PointMarkSpec::new(
            TableId(1),
            ScaleLinear::new((0.0, 10.0), (0.0, 100.0)),
            ScaleLinear::new((0.0, 10.0), (100.0, 0.0)),
        )
        .with_symbol(Symbol::Circle)
        .with_size(4.0);
        let marks = spec.marks(&[(0.0, 0.0)]);
        assert_eq!(marks[0].kind(), MarkKind::Path);
        let b = marks[0].as_path().unwrap().path.bounding_box();
        assert!((b.center().x - 0.0).abs() < 0.1);
        assert!((b.center().y - 100.0).abs() < 0.1);
    }
}
