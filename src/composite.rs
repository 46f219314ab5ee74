//! Flatten the base image and mask overlay into a single PNG.
//!
//! The blend is the same one a browser applies to a mask image stacked on
//! the base image with CSS `opacity`.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::ExportError;
use crate::service::SegmentationService;
use crate::state::OverlayState;

/// Alpha-blend `mask` over `base` using the overlay settings.
///
/// A hidden mask yields the base image unchanged. A mask of a different size
/// is stretched to the base dimensions.
pub fn composite(base: &DynamicImage, mask: &DynamicImage, overlay: &OverlayState) -> RgbaImage {
    let mut out = base.to_rgba8();
    if !overlay.visible() {
        return out;
    }

    let (width, height) = out.dimensions();
    let mask = if mask.width() != width || mask.height() != height {
        log::debug!(
            "Resizing mask {}x{} to {}x{}",
            mask.width(),
            mask.height(),
            width,
            height
        );
        mask.resize_exact(width, height, FilterType::Nearest).to_rgba8()
    } else {
        mask.to_rgba8()
    };

    let opacity = overlay.opacity();
    for (dst, src) in out.pixels_mut().zip(mask.pixels()) {
        let alpha = opacity * f32::from(src[3]) / 255.0;
        for c in 0..3 {
            let blended = f32::from(src[c]) * alpha + f32::from(dst[c]) * (1.0 - alpha);
            dst[c] = blended.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// Fetch both result images from the service and write the composite PNG.
pub fn export_composite(
    service: &dyn SegmentationService,
    original_path: &str,
    mask_path: &str,
    overlay: &OverlayState,
    output: &Path,
) -> Result<(), ExportError> {
    let base = image::load_from_memory(&service.fetch_asset(original_path)?)?;
    let mask = image::load_from_memory(&service.fetch_asset(mask_path)?)?;

    let flattened = composite(&base, &mask, overlay);
    flattened.save_with_format(output, ImageFormat::Png)?;
    log::info!(
        "Exported {}x{} composite to {:?}",
        flattened.width(),
        flattened.height(),
        output
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgba};

    fn gray(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([value])))
    }

    #[test]
    fn test_half_opacity_blend() {
        let base = gray(2, 2, 0);
        let mask = gray(2, 2, 255);
        let out = composite(&base, &mask, &OverlayState::default());
        assert_eq!(out.get_pixel(0, 0), &Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn test_hidden_mask_returns_base() {
        let base = gray(2, 2, 40);
        let mask = gray(2, 2, 255);
        let hidden = OverlayState::new(false, 1.0);
        let out = composite(&base, &mask, &hidden);
        assert_eq!(out.get_pixel(1, 1), &Rgba([40, 40, 40, 255]));
    }

    #[test]
    fn test_zero_and_full_opacity() {
        let base = gray(1, 1, 10);
        let mask = gray(1, 1, 250);

        let out = composite(&base, &mask, &OverlayState::new(true, 0.0));
        assert_eq!(out.get_pixel(0, 0)[0], 10);

        let out = composite(&base, &mask, &OverlayState::new(true, 1.0));
        assert_eq!(out.get_pixel(0, 0)[0], 250);
    }

    #[test]
    fn test_mask_resized_to_base() {
        let base = gray(4, 4, 0);
        let mask = gray(2, 2, 255);
        let out = composite(&base, &mask, &OverlayState::new(true, 1.0));
        assert_eq!(out.dimensions(), (4, 4));
        assert_eq!(out.get_pixel(3, 3)[0], 255);
    }
}
