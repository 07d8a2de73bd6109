// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-node positioning component.
//!
//! A [`Transform`] holds every layout *input* for one node; the derived
//! unscaled and scaled rectangles live in the store. [`Transform::resolve`]
//! is the pure recalculation algorithm: base rectangle → relative sizing →
//! alignment and offset → ratio enforcement → min/max clamping. Scaling to
//! the live resolution is a separate store-side step so the resolver stays
//! independent of the screen-scale provider.

use kurbo::{Point, Rect, Size, Vec2};

use crate::geometry::{Alignment, Padding, align_origin, apply_ratio, clamp_size};

/// How a node's rectangle is positioned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Location and size are stored directly in design-resolution units.
    /// Roots are always absolute.
    #[default]
    Absolute,
    /// Location and size derive from the parent's rectangle via fractional
    /// size, alignment, and offset. Requires a parent.
    Relative,
}

/// Layout inputs for one node.
///
/// Mode-specific fields are only meaningful in their mode; the store's
/// accessors enforce that. `min_size`/`max_size`, `ratio`, and `padding`
/// apply in both modes (`padding` is what this node offers its *children*,
/// not an inset on itself).
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    pub(crate) mode: Mode,
    // Absolute inputs.
    pub(crate) location: Point,
    pub(crate) size: Size,
    // Relative inputs.
    pub(crate) relative_size: Vec2,
    pub(crate) relative_offset: Vec2,
    pub(crate) alignment: Alignment,
    pub(crate) ignore_parent_padding: bool,
    // Shared inputs.
    pub(crate) padding: Padding,
    pub(crate) min_size: Size,
    pub(crate) max_size: Size,
    pub(crate) ratio: Option<f64>,
}

impl Transform {
    /// Creates an absolute transform covering `rect`.
    ///
    /// Relative inputs default to filling the parent (`relative_size =
    /// (1, 1)`, top-left alignment, zero offset), so a later mode flip
    /// starts from a sensible state.
    #[must_use]
    pub(crate) fn absolute(rect: Rect) -> Self {
        Self {
            mode: Mode::Absolute,
            location: rect.origin(),
            size: rect.size(),
            relative_size: Vec2::new(1.0, 1.0),
            relative_offset: Vec2::ZERO,
            alignment: Alignment::TOP_LEFT,
            ignore_parent_padding: false,
            padding: Padding::ZERO,
            min_size: Size::ZERO,
            max_size: Size::new(f64::INFINITY, f64::INFINITY),
            ratio: None,
        }
    }

    /// Computes this node's unscaled rectangle.
    ///
    /// `parent` carries the parent's current unscaled rectangle and the
    /// padding it offers, and must be `Some` for relative transforms (the
    /// store guarantees this: mode flips to absolute on detach).
    ///
    /// # Panics
    ///
    /// Panics if the transform is relative and `parent` is `None`.
    #[must_use]
    pub(crate) fn resolve(&self, parent: Option<(Rect, Padding)>) -> Rect {
        let (origin, size) = match self.mode {
            Mode::Absolute => (self.location, self.size),
            Mode::Relative => {
                let (parent_rect, parent_padding) =
                    parent.expect("relative transform requires a parent rectangle");
                let content = if self.ignore_parent_padding {
                    parent_rect
                } else {
                    parent_padding.inset(parent_rect)
                };
                let size = Size::new(
                    content.width() * self.relative_size.x,
                    content.height() * self.relative_size.y,
                );
                let aligned = align_origin(content, size, self.alignment);
                // The offset is a fraction of the parent's *full* size, not
                // the padding-reduced content size.
                let origin = aligned
                    + Vec2::new(
                        self.relative_offset.x * parent_rect.width(),
                        self.relative_offset.y * parent_rect.height(),
                    );
                (origin, size)
            }
        };

        let size = match self.ratio {
            Some(ratio) => apply_ratio(size, ratio),
            None => size,
        };
        // Clamps are hard bounds and run last; a binding clamp wins over the
        // ratio.
        let size = clamp_size(size, self.min_size, self.max_size);
        Rect::from_origin_size(origin, size)
    }
}
