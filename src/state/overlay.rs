//! Mask overlay settings owned by a single result viewer.

use crate::constants::{DEFAULT_MASK_OPACITY, opacity};

/// Visibility and opacity of the mask layer.
///
/// The two fields are independent: toggling never changes the opacity and
/// moving the slider never shows a hidden mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayState {
    visible: bool,
    opacity: f32,
}

impl OverlayState {
    /// Create an overlay with the given initial values, normalizing opacity.
    pub fn new(visible: bool, initial_opacity: f32) -> Self {
        let mut overlay = Self {
            visible,
            opacity: DEFAULT_MASK_OPACITY,
        };
        overlay.set_opacity(initial_opacity);
        overlay
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Flip mask visibility.
    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Set the slider value, clamped to [0, 1] and snapped to 0.1 steps.
    /// NaN leaves the current value unchanged.
    pub fn set_opacity(&mut self, value: f32) {
        if value.is_nan() {
            log::warn!("Ignoring NaN opacity");
            return;
        }
        let clamped = value.clamp(opacity::MIN, opacity::MAX);
        let steps = (clamped / opacity::STEP).round();
        self.opacity = (steps * opacity::STEP).clamp(opacity::MIN, opacity::MAX);
    }

    /// Opacity as shown next to the slider, 0-100.
    pub fn opacity_percent(&self) -> u8 {
        (self.opacity * 100.0).round() as u8
    }
}

impl Default for OverlayState {
    fn default() -> Self {
        Self::new(true, DEFAULT_MASK_OPACITY)
    }
}
