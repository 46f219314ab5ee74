//! Result images and overlay controls.

use crate::constants::opacity;
use crate::viewer::ResultViewer;

const SLIDER_WIDTH: usize = 10;

pub fn render_viewer(viewer: &ResultViewer) -> Vec<String> {
    let overlay = viewer.overlay();
    let mut lines = vec![
        "Результаты сегментации".to_string(),
        format!("  Original DICOM:    {}", viewer.original_url()),
    ];

    match viewer.visible_mask() {
        Some((url, mask_opacity)) => lines.push(format!(
            "  Segmentation Mask: {} (opacity {:.1})",
            url, mask_opacity
        )),
        None => lines.push("  Segmentation Mask: hidden".to_string()),
    }

    let toggle = if overlay.visible() {
        "[👁 Скрыть маску]"
    } else {
        "[👁 Показать маску]"
    };
    lines.push(format!("  {toggle}"));
    lines.push(format!(
        "  Прозрачность маски: {} {}%",
        slider_bar(overlay.opacity()),
        overlay.opacity_percent()
    ));
    lines
}

fn slider_bar(value: f32) -> String {
    let range = opacity::MAX - opacity::MIN;
    let filled = (((value - opacity::MIN) / range) * SLIDER_WIDTH as f32).round() as usize;
    let filled = filled.min(SLIDER_WIDTH);
    format!(
        "[{}{}]",
        "=".repeat(filled),
        " ".repeat(SLIDER_WIDTH - filled)
    )
}
