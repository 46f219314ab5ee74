//! Home view: header, uploader, status banners and results.

use super::{render_metrics, render_uploader, render_viewer};
use crate::config::MetricsFormat;
use crate::state::UploadState;
use crate::uploader::Uploader;
use crate::viewer::ResultViewer;

/// Prefix of the inline error banner.
pub const ERROR_PREFIX: &str = "❌ Ошибка: ";

/// Text shown while a request is in flight.
pub const LOADING_TEXT: &str = "⏳ Обработка изображения...";

/// Build the full screen for the current state.
///
/// The viewer is only rendered together with a `Success` state.
pub fn render_home(
    state: &UploadState,
    uploader: &Uploader,
    viewer: Option<&ResultViewer>,
    metrics_format: &MetricsFormat,
) -> String {
    let mut lines = vec![
        "🫘 Liver Segmentation Service".to_string(),
        "Автоматическая сегментация печени на КТ-снимках".to_string(),
        String::new(),
    ];
    lines.extend(render_uploader(uploader, state.is_loading()));

    match state {
        UploadState::Idle => {}
        UploadState::Loading => {
            lines.push(String::new());
            lines.push(LOADING_TEXT.to_string());
        }
        UploadState::Failure(message) => {
            lines.push(String::new());
            lines.push(format!("{ERROR_PREFIX}{message}"));
        }
        UploadState::Success(result) => {
            if let Some(viewer) = viewer {
                lines.push(String::new());
                if let Some(id) = &result.result_id {
                    match &result.timestamp {
                        Some(ts) => lines.push(format!("Result {id} ({ts})")),
                        None => lines.push(format!("Result {id}")),
                    }
                }
                lines.extend(render_viewer(viewer));
                lines.push(String::new());
                lines.extend(render_metrics(&result.metrics, metrics_format));
            }
        }
    }

    lines.join("\n")
}
