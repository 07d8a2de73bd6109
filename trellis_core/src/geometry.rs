// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry value types and pure rectangle helpers.
//!
//! Everything in this module is stateless: alignment flags, fractional
//! padding, and the small functions the transform resolver composes
//! (alignment placement, ratio enforcement, size clamping, and the
//! truncating scale step).

use kurbo::{Point, Rect, Size};

bitflags::bitflags! {
    /// Composable alignment of a child rectangle inside its parent's usable
    /// rectangle.
    ///
    /// Horizontal and vertical axes resolve independently, so the nine
    /// classic anchor points are unions of one flag per axis (e.g.
    /// [`BOTTOM_RIGHT`](Self::BOTTOM_RIGHT) is `BOTTOM | RIGHT`). When
    /// conflicting flags are set on one axis, centering wins over the far
    /// edge, and the far edge wins over the near edge. An axis with no flag
    /// set falls back to the near edge (left/top).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Alignment: u8 {
        /// Anchor to the parent's left edge.
        const LEFT = 1 << 0;
        /// Anchor to the parent's right edge.
        const RIGHT = 1 << 1;
        /// Center horizontally.
        const CENTER_X = 1 << 2;
        /// Anchor to the parent's top edge.
        const TOP = 1 << 3;
        /// Anchor to the parent's bottom edge.
        const BOTTOM = 1 << 4;
        /// Center vertically.
        const CENTER_Y = 1 << 5;

        /// Top-left anchor (the default).
        const TOP_LEFT = Self::TOP.bits() | Self::LEFT.bits();
        /// Top-center anchor.
        const TOP_CENTER = Self::TOP.bits() | Self::CENTER_X.bits();
        /// Top-right anchor.
        const TOP_RIGHT = Self::TOP.bits() | Self::RIGHT.bits();
        /// Center-left anchor.
        const CENTER_LEFT = Self::CENTER_Y.bits() | Self::LEFT.bits();
        /// Full center anchor.
        const CENTER = Self::CENTER_X.bits() | Self::CENTER_Y.bits();
        /// Center-right anchor.
        const CENTER_RIGHT = Self::CENTER_Y.bits() | Self::RIGHT.bits();
        /// Bottom-left anchor.
        const BOTTOM_LEFT = Self::BOTTOM.bits() | Self::LEFT.bits();
        /// Bottom-center anchor.
        const BOTTOM_CENTER = Self::BOTTOM.bits() | Self::CENTER_X.bits();
        /// Bottom-right anchor.
        const BOTTOM_RIGHT = Self::BOTTOM.bits() | Self::RIGHT.bits();
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::TOP_LEFT
    }
}

/// Fractional insets a parent applies to the rectangle it offers its
/// relative children.
///
/// Each component is a fraction of the parent's size along that axis, so
/// `left = 0.1` on a 1000-unit-wide parent shaves 100 units off the left of
/// the content rectangle. A child opts out per node with
/// [`set_ignore_parent_padding`](crate::node::NodeTree::set_ignore_parent_padding).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Padding {
    /// Left inset as a fraction of the parent's width.
    pub left: f64,
    /// Top inset as a fraction of the parent's height.
    pub top: f64,
    /// Right inset as a fraction of the parent's width.
    pub right: f64,
    /// Bottom inset as a fraction of the parent's height.
    pub bottom: f64,
}

impl Padding {
    /// No padding.
    pub const ZERO: Self = Self {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    /// Creates a padding from left/top/right/bottom fractions.
    ///
    /// # Panics
    ///
    /// Panics if any component is negative or non-finite, or if the
    /// fractions on either axis sum past `1.0` (the content rectangle would
    /// have negative size).
    #[must_use]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        let padding = Self {
            left,
            top,
            right,
            bottom,
        };
        padding.validate();
        padding
    }

    pub(crate) fn validate(&self) {
        for (name, value) in [
            ("left", self.left),
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
        ] {
            assert!(
                value.is_finite() && value >= 0.0,
                "padding {name} must be a finite non-negative fraction, got {value}"
            );
        }
        assert!(
            self.left + self.right <= 1.0,
            "horizontal padding exceeds the parent: left={} right={}",
            self.left,
            self.right
        );
        assert!(
            self.top + self.bottom <= 1.0,
            "vertical padding exceeds the parent: top={} bottom={}",
            self.top,
            self.bottom
        );
    }

    /// Returns `rect` shrunk by these fractions of its own size.
    #[must_use]
    pub fn inset(&self, rect: Rect) -> Rect {
        let w = rect.width();
        let h = rect.height();
        Rect::new(
            rect.x0 + self.left * w,
            rect.y0 + self.top * h,
            rect.x1 - self.right * w,
            rect.y1 - self.bottom * h,
        )
    }
}

/// Tolerance used when comparing an aspect ratio against its target.
pub const RATIO_TOLERANCE: f64 = 1e-9;

/// Places a rectangle of `size` inside `content` per `alignment` and returns
/// its origin.
///
/// Each axis resolves independently; see [`Alignment`] for the precedence
/// between conflicting flags.
#[must_use]
pub fn align_origin(content: Rect, size: Size, alignment: Alignment) -> Point {
    let x = if alignment.contains(Alignment::CENTER_X) {
        content.x0 + (content.width() - size.width) / 2.0
    } else if alignment.contains(Alignment::RIGHT) {
        content.x1 - size.width
    } else {
        content.x0
    };
    let y = if alignment.contains(Alignment::CENTER_Y) {
        content.y0 + (content.height() - size.height) / 2.0
    } else if alignment.contains(Alignment::BOTTOM) {
        content.y1 - size.height
    } else {
        content.y0
    };
    Point::new(x, y)
}

/// Enforces a fixed `width : height` ratio on `size`, width-priority.
///
/// If the rectangle is narrower than the target (height-oversized), height
/// is recomputed from width; otherwise width is recomputed from height. A
/// size already within [`RATIO_TOLERANCE`] of the target is returned
/// unchanged, as is any size with a degenerate (zero) dimension.
#[must_use]
pub fn apply_ratio(size: Size, ratio: f64) -> Size {
    if size.width <= 0.0 || size.height <= 0.0 {
        return size;
    }
    let current = size.width / size.height;
    if (current - ratio).abs() <= RATIO_TOLERANCE {
        return size;
    }
    if current < ratio {
        Size::new(size.width, size.width / ratio)
    } else {
        Size::new(size.height * ratio, size.height)
    }
}

/// Clamps `size` componentwise to `[min, max]`.
#[must_use]
pub fn clamp_size(size: Size, min: Size, max: Size) -> Size {
    Size::new(
        size.width.max(min.width).min(max.width),
        size.height.max(min.height).min(max.height),
    )
}

/// Scales `rect` by a non-uniform factor, truncating location and size
/// toward zero.
///
/// Location and size are scaled independently (multiply-then-cast), so the
/// far edge is `truncated origin + truncated size`, not a truncation of the
/// unscaled far edge.
#[must_use]
pub fn scale_rect(rect: Rect, sx: f64, sy: f64) -> Rect {
    let x = trunc_toward_zero(rect.x0 * sx);
    let y = trunc_toward_zero(rect.y0 * sy);
    let w = trunc_toward_zero(rect.width() * sx);
    let h = trunc_toward_zero(rect.height() * sy);
    Rect::new(x, y, x + w, y + h)
}

/// Integer truncation toward zero, kept as an `f64` value.
#[expect(
    clippy::cast_possible_truncation,
    reason = "truncation to whole pixels is the point"
)]
fn trunc_toward_zero(v: f64) -> f64 {
    v as i64 as f64
}
