//! Drop zone and picker button.

use crate::constants::ACCEPTED_EXTENSIONS;
use crate::uploader::Uploader;

pub fn render_uploader(uploader: &Uploader, loading: bool) -> Vec<String> {
    let border = if uploader.is_drag_active() { '#' } else { '-' };
    let rule = border.to_string().repeat(44);

    let button = if loading {
        "[ Обработка... ] (disabled)"
    } else {
        "[ Выбрать файл ]"
    };
    let extensions = ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(", ");

    vec![
        rule.clone(),
        "  Загрузите DICOM файл".to_string(),
        "  Перетащите файл сюда или нажмите для выбора".to_string(),
        format!("  {button}  ({extensions})"),
        rule,
    ]
}
