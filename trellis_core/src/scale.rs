// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The screen-scale provider.
//!
//! [`ScreenScale`] is the single source of truth for the fixed design
//! resolution and the live back-buffer resolution. A resolution change is
//! two-phase: [`stage`](ScreenScale::stage) records the new live resolution,
//! [`apply`](ScreenScale::apply) commits it. Nothing else mutates the scale;
//! the node tree owns its provider and only exposes the commit API.

use kurbo::Size;

/// Fixed design resolution plus the current live resolution, with a staged
/// pending resolution awaiting commit.
#[derive(Clone, Debug, PartialEq)]
pub struct ScreenScale {
    design: Size,
    live: Size,
    staged: Option<Size>,
}

impl ScreenScale {
    /// Creates a provider for the given design resolution. The live
    /// resolution starts equal to it (scale `(1, 1)`).
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not finite and positive.
    #[must_use]
    pub fn new(design: Size) -> Self {
        validate_resolution("design", design);
        Self {
            design,
            live: design,
            staged: None,
        }
    }

    /// The fixed design resolution all unscaled coordinates are expressed in.
    #[must_use]
    pub fn design_size(&self) -> Size {
        self.design
    }

    /// The committed live back-buffer resolution.
    #[must_use]
    pub fn live_size(&self) -> Size {
        self.live
    }

    /// The non-uniform scale factor `(live / design)` per axis.
    #[must_use]
    pub fn scale(&self) -> (f64, f64) {
        (
            self.live.width / self.design.width,
            self.live.height / self.design.height,
        )
    }

    /// Stages a new live resolution without changing the scale.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not finite and positive.
    pub fn stage(&mut self, width: f64, height: f64) {
        let staged = Size::new(width, height);
        validate_resolution("staged", staged);
        self.staged = Some(staged);
    }

    /// Commits the staged resolution, if any.
    ///
    /// Returns `true` when the live resolution actually changed; staging the
    /// current resolution (or applying with nothing staged) is a no-op.
    pub fn apply(&mut self) -> bool {
        match self.staged.take() {
            Some(staged) if staged != self.live => {
                self.live = staged;
                true
            }
            _ => false,
        }
    }
}

fn validate_resolution(what: &str, size: Size) {
    assert!(
        size.width.is_finite() && size.width > 0.0 && size.height.is_finite() && size.height > 0.0,
        "{what} resolution must be finite and positive, got {}x{}",
        size.width,
        size.height
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_unit_scale() {
        let scale = ScreenScale::new(Size::new(1920.0, 1080.0));
        assert_eq!(scale.scale(), (1.0, 1.0));
        assert_eq!(scale.live_size(), scale.design_size());
    }

    #[test]
    fn stage_alone_does_not_change_scale() {
        let mut scale = ScreenScale::new(Size::new(1920.0, 1080.0));
        scale.stage(960.0, 540.0);
        assert_eq!(scale.scale(), (1.0, 1.0));
        assert!(scale.apply());
        assert_eq!(scale.scale(), (0.5, 0.5));
    }

    #[test]
    fn scale_is_non_uniform() {
        let mut scale = ScreenScale::new(Size::new(1000.0, 500.0));
        scale.stage(2000.0, 500.0);
        assert!(scale.apply());
        assert_eq!(scale.scale(), (2.0, 1.0));
    }

    #[test]
    fn applying_the_current_resolution_reports_no_change() {
        let mut scale = ScreenScale::new(Size::new(1920.0, 1080.0));
        scale.stage(1920.0, 1080.0);
        assert!(!scale.apply());
        // Nothing staged either.
        assert!(!scale.apply());
    }

    #[test]
    fn restaging_overwrites_the_pending_resolution() {
        let mut scale = ScreenScale::new(Size::new(1000.0, 1000.0));
        scale.stage(100.0, 100.0);
        scale.stage(500.0, 500.0);
        assert!(scale.apply());
        assert_eq!(scale.live_size(), Size::new(500.0, 500.0));
    }

    #[test]
    #[should_panic(expected = "staged resolution must be finite and positive")]
    fn zero_resolution_panics() {
        let mut scale = ScreenScale::new(Size::new(1000.0, 1000.0));
        scale.stage(0.0, 100.0);
    }
}
