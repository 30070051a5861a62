#![forbid(unsafe_code)]

//! Tooltip placement around the spotlight.
//!
//! Tries the preferred side first, then the opposite side, then the two
//! remaining sides. If nothing fits, the preferred side is used and the
//! tooltip is clamped into the viewport.
//!
//! Non-finite inputs have no placement.

use crate::geometry::{Point, Rect, Size};

/// Side of the spot the tooltip is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Placement {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl Placement {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Fallback order starting from `self`.
    fn candidates(self) -> [Placement; 4] {
        match self {
            Self::Top | Self::Bottom => [self, self.opposite(), Self::Right, Self::Left],
            Self::Left | Self::Right => [self, self.opposite(), Self::Bottom, Self::Top],
        }
    }
}

/// Floating tooltip options.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FloatingOptions {
    pub placement: Placement,
    /// Gap between the spot bounds and the tooltip.
    pub offset: f32,
    /// Try other sides when the preferred one does not fit.
    pub flip: bool,
}

impl Default for FloatingOptions {
    fn default() -> Self {
        Self {
            placement: Placement::Bottom,
            offset: 4.0,
            flip: true,
        }
    }
}

/// Where the tooltip ended up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatingLayout {
    pub origin: Point,
    pub placement: Placement,
}

impl FloatingLayout {
    #[must_use]
    pub fn rect(&self, size: Size) -> Rect {
        Rect::new(self.origin.x, self.origin.y, size.width, size.height)
    }
}

/// Compute tooltip placement for a spot inside `viewport`.
///
/// Returns `None` if any input (including the offset) is NaN or infinite.
#[must_use]
pub fn place(
    anchor: Rect,
    tooltip: Size,
    viewport: Rect,
    options: &FloatingOptions,
) -> Option<FloatingLayout> {
    if !(anchor.is_finite()
        && tooltip.is_finite()
        && viewport.is_finite()
        && options.offset.is_finite())
    {
        return None;
    }

    let origin_for = |placement: Placement| -> Point {
        let gap = options.offset;
        match placement {
            Placement::Bottom => Point::new(
                anchor.center().x - tooltip.width / 2.0,
                anchor.bottom() + gap,
            ),
            Placement::Top => Point::new(
                anchor.center().x - tooltip.width / 2.0,
                anchor.y - tooltip.height - gap,
            ),
            Placement::Right => Point::new(
                anchor.right() + gap,
                anchor.center().y - tooltip.height / 2.0,
            ),
            Placement::Left => Point::new(
                anchor.x - tooltip.width - gap,
                anchor.center().y - tooltip.height / 2.0,
            ),
        }
    };

    // Only the main axis has to fit; the cross axis is clamped afterwards.
    let fits = |placement: Placement, origin: Point| -> bool {
        match placement {
            Placement::Bottom | Placement::Top => {
                origin.y >= viewport.y && origin.y + tooltip.height <= viewport.bottom()
            }
            Placement::Left | Placement::Right => {
                origin.x >= viewport.x && origin.x + tooltip.width <= viewport.right()
            }
        }
    };

    let preferred = options.placement;
    let (origin, placement) = if options.flip {
        preferred
            .candidates()
            .into_iter()
            .map(|placement| (origin_for(placement), placement))
            .find(|(origin, placement)| fits(*placement, *origin))
            .unwrap_or((origin_for(preferred), preferred))
    } else {
        (origin_for(preferred), preferred)
    };

    let max_x = (viewport.right() - tooltip.width).max(viewport.x);
    let max_y = (viewport.bottom() - tooltip.height).max(viewport.y);
    Some(FloatingLayout {
        origin: Point::new(
            origin.x.clamp(viewport.x, max_x),
            origin.y.clamp(viewport.y, max_y),
        ),
        placement,
    })
}
