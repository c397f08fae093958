// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Symbol helpers for point-like marks.

use kurbo::{BezPath, Circle, Shape};

/// A small set of symbol shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A square (axis-aligned).
    Square,
    /// A circle.
    Circle,
}

impl Symbol {
    /// Returns a path for this symbol centered at `cx, cy`, using `size` as the diameter/side.
    pub fn path(self, cx: f64, cy: f64, size: f64) -> BezPath {
        match self {
            Self::Square => square_path(cx, cy, size),
            Self::Circle => circle_path(cx, cy, size),
        }
    }
}

fn square_path(cx: f64, cy: f64, size: f64) -> BezPath {
    let half = size * 0.5;
    let mut p = BezPath::new();
    p.move_to((cx - half, cy - half));
    p.line_to((cx + half, cy - half));
    p.line_to((cx + half, cy + half));
    p.line_to((cx - half, cy + half));
    p.close_path();
    p
}

fn circle_path(cx: f64, cy: f64, size: f64) -> BezPath {
    // Flattening tolerance in pixels; SVG output keeps the cubic segments.
    let tolerance = 0.1;
    Circle::new((cx, cy), size * 0.5)
        .path_elements(tolerance)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_are_centered() {
        for s in [Symbol::Square, Symbol::Circle] {
            let b = s.path(10.0, 20.0, 4.0).bounding_box();
            assert!((b.center().x - 10.0).abs() < 0.1, "{s:?}");
            assert!((b.center().y - 20.0).abs() < 0.1, "{s:?}");
            assert!((b.width() - 4.0).abs() < 0.1, "{s:?}");
        }
    }
}
