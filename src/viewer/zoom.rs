//! Zoom level for the document viewer
//!
//! Holds the fractional scale factor applied to page rendering. The factor
//! is always kept within [`Zoom::MIN_FACTOR`, `Zoom::MAX_FACTOR`]; every
//! mutation clamps, so callers never need to re-check bounds.

/// Zoom state for document viewing
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Zoom {
    factor: f32,
}

impl Default for Zoom {
    fn default() -> Self {
        Self {
            factor: Self::DEFAULT_FACTOR,
        }
    }
}

impl Zoom {
    /// Minimum allowed zoom factor
    pub const MIN_FACTOR: f32 = 0.5;
    /// Maximum allowed zoom factor
    pub const MAX_FACTOR: f32 = 3.0;
    /// Initial zoom factor for a fresh viewer
    pub const DEFAULT_FACTOR: f32 = 1.5;
    /// Step size for explicit zoom-in/zoom-out commands
    pub const STEP: f32 = 0.25;
    /// Step size for Ctrl+mouse-wheel zoom
    pub const WHEEL_STEP: f32 = 0.1;

    #[must_use]
    pub fn new(factor: f32) -> Self {
        Self {
            factor: Self::clamp_factor(factor),
        }
    }

    /// Returns the current zoom factor
    #[must_use]
    pub fn factor(self) -> f32 {
        self.factor
    }

    /// Zoom percentage for the indicator, e.g. 1.5 -> 150
    #[must_use]
    pub fn percent(self) -> u32 {
        (self.factor * 100.0).round() as u32
    }

    /// Set the factor, clamping to bounds. Returns true if the factor changed.
    pub fn set(&mut self, factor: f32) -> bool {
        let clamped = Self::clamp_factor(factor);
        if (self.factor - clamped).abs() > f32::EPSILON {
            self.factor = clamped;
            true
        } else {
            false
        }
    }

    /// Zoom in by one button/keyboard step
    pub fn step_in(&mut self) -> bool {
        self.set(self.factor + Self::STEP)
    }

    /// Zoom out by one button/keyboard step
    pub fn step_out(&mut self) -> bool {
        self.set(self.factor - Self::STEP)
    }

    /// Zoom in by one mouse-wheel step
    pub fn wheel_in(&mut self) -> bool {
        self.set(self.factor + Self::WHEEL_STEP)
    }

    /// Zoom out by one mouse-wheel step
    pub fn wheel_out(&mut self) -> bool {
        self.set(self.factor - Self::WHEEL_STEP)
    }

    /// Factor that maps a page's native width onto the container width
    #[must_use]
    pub fn fit_width(container_width: u16, native_width: u16) -> f32 {
        if native_width == 0 {
            return Self::DEFAULT_FACTOR;
        }
        Self::clamp_factor(f32::from(container_width) / f32::from(native_width))
    }

    /// Clamp factor to valid range, handling NaN/Inf
    #[must_use]
    pub fn clamp_factor(factor: f32) -> f32 {
        if !factor.is_finite() {
            Self::DEFAULT_FACTOR
        } else {
            factor.clamp(Self::MIN_FACTOR, Self::MAX_FACTOR)
        }
    }
}
