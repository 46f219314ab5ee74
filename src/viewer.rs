//! Result viewer: base image with a toggleable mask overlay.

use crate::state::OverlayState;

/// Shows one segmentation result.
///
/// A fresh viewer is created for every new result, so overlay settings never
/// carry over from a previous scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultViewer {
    original_url: String,
    mask_url: String,
    overlay: OverlayState,
}

impl ResultViewer {
    pub fn new(original_url: String, mask_url: String, overlay: OverlayState) -> Self {
        Self {
            original_url,
            mask_url,
            overlay,
        }
    }

    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    pub fn mask_url(&self) -> &str {
        &self.mask_url
    }

    pub fn overlay(&self) -> &OverlayState {
        &self.overlay
    }

    /// Mask URL and opacity while the mask is shown.
    pub fn visible_mask(&self) -> Option<(&str, f32)> {
        self.overlay
            .visible()
            .then(|| (self.mask_url.as_str(), self.overlay.opacity()))
    }

    pub fn toggle_mask(&mut self) {
        self.overlay.toggle();
        log::debug!(
            "👁 Mask {}",
            if self.overlay.visible() { "shown" } else { "hidden" }
        );
    }

    pub fn set_opacity(&mut self, value: f32) {
        self.overlay.set_opacity(value);
        log::debug!("Mask opacity: {}%", self.overlay.opacity_percent());
    }
}
