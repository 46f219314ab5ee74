//! Application message types for liverseg.
//!
//! All UI events and actions are represented as messages in the Elm architecture style.

use crate::uploader::UploaderEvent;

/// Messages that can be sent to update application state.
#[derive(Debug, Clone)]
pub enum Message {
    /// Drop zone and picker input
    Uploader(UploaderEvent),
    /// Result viewer controls
    Viewer(ViewerMessage),
}

/// Result viewer controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerMessage {
    /// Show/hide mask button pressed
    ToggleMask,
    /// Opacity slider moved
    OpacityChanged(f32),
}

impl Message {
    pub fn toggle_mask() -> Self {
        Message::Viewer(ViewerMessage::ToggleMask)
    }
    pub fn opacity(value: f32) -> Self {
        Message::Viewer(ViewerMessage::OpacityChanged(value))
    }
    pub fn drag_enter() -> Self {
        Message::Uploader(UploaderEvent::DragEnter)
    }
    pub fn drag_leave() -> Self {
        Message::Uploader(UploaderEvent::DragLeave)
    }
}
