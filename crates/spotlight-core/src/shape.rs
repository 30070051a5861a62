#![forbid(unsafe_code)]

//! Cut-out shapes for the backdrop.
//!
//! The render layer draws the backdrop everywhere except inside the
//! [`Cutout`]. Shapes are computed from the resolved target rectangle plus
//! padding ("breathing room").

use crate::geometry::{Insets, Point, Rect};

/// Default padding around the spotlighted element.
pub const DEFAULT_PADDING: f32 = 16.0;

/// Kind of cut-out drawn around the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ShapeKind {
    #[default]
    Circle,
    Rectangle,
}

/// Shape kind plus padding.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ShapeOptions {
    pub kind: ShapeKind,
    pub padding: f32,
}

impl Default for ShapeOptions {
    fn default() -> Self {
        Self {
            kind: ShapeKind::default(),
            padding: DEFAULT_PADDING,
        }
    }
}

impl ShapeOptions {
    /// Circle with the given padding.
    #[must_use]
    pub const fn circle(padding: f32) -> Self {
        Self {
            kind: ShapeKind::Circle,
            padding,
        }
    }

    /// Rectangle with the given padding.
    #[must_use]
    pub const fn rectangle(padding: f32) -> Self {
        Self {
            kind: ShapeKind::Rectangle,
            padding,
        }
    }

    /// Compute the cut-out for a target rectangle.
    #[must_use]
    pub fn cutout(&self, target: Rect) -> Cutout {
        let padding = self.padding.max(0.0);
        match self.kind {
            ShapeKind::Circle => Cutout::Circle {
                center: target.center(),
                radius: target.width.max(target.height) / 2.0 + padding,
            },
            ShapeKind::Rectangle => Cutout::Rectangle(target.outset(Insets::all(padding))),
        }
    }
}

/// Geometry of the hole punched into the backdrop.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Cutout {
    Circle { center: Point, radius: f32 },
    Rectangle(Rect),
}

impl Cutout {
    /// Axis-aligned bounds of the cut-out, used to place tooltips.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        match *self {
            Self::Circle { center, radius } => Rect::new(
                center.x - radius,
                center.y - radius,
                radius * 2.0,
                radius * 2.0,
            ),
            Self::Rectangle(rect) => rect,
        }
    }

    /// Whether a press at `point` falls inside the hole (and so should not
    /// count as a backdrop press).
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        match *self {
            Self::Circle { center, radius } => {
                let dx = point.x - center.x;
                let dy = point.y - center.y;
                dx * dx + dy * dy <= radius * radius
            }
            Self::Rectangle(rect) => rect.contains(point),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_padded_circle() {
        let options = ShapeOptions::default();
        assert_eq!(options.kind, ShapeKind::Circle);
        assert_eq!(options.padding, DEFAULT_PADDING);
    }

    #[test]
    fn circle_radius_uses_longest_side() {
        let cutout = ShapeOptions::circle(4.0).cutout(Rect::new(0.0, 0.0, 20.0, 10.0));
        assert_eq!(
            cutout,
            Cutout::Circle {
                center: Point::new(10.0, 5.0),
                radius: 14.0
            }
        );
        assert_eq!(cutout.bounds(), Rect::new(-4.0, -9.0, 28.0, 28.0));
    }

    #[test]
    fn rectangle_is_outset() {
        let cutout = ShapeOptions::rectangle(2.0).cutout(Rect::new(10.0, 10.0, 4.0, 4.0));
        assert_eq!(cutout, Cutout::Rectangle(Rect::new(8.0, 8.0, 8.0, 8.0)));
    }

    #[test]
    fn negative_padding_is_ignored() {
        let cutout = ShapeOptions::rectangle(-5.0).cutout(Rect::new(0.0, 0.0, 4.0, 4.0));
        assert_eq!(cutout, Cutout::Rectangle(Rect::new(0.0, 0.0, 4.0, 4.0)));
    }

    #[test]
    fn contains_respects_shape() {
        let circle = Cutout::Circle {
            center: Point::new(0.0, 0.0),
            radius: 5.0,
        };
        assert!(circle.contains(Point::new(3.0, 4.0)));
        assert!(!circle.contains(Point::new(4.0, 4.0)));

        let rect = Cutout::Rectangle(Rect::new(0.0, 0.0, 5.0, 5.0));
        assert!(rect.contains(Point::new(4.0, 4.0)));
    }
}
