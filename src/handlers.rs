//! Message handlers for the liverseg application.
//!
//! Each handler processes one category of messages for `LiverSegApp::update`.

use crate::message::ViewerMessage;
use crate::orchestrator::Orchestrator;
use crate::state::RequestId;
use crate::uploader::{Uploader, UploaderEvent};
use crate::viewer::ResultViewer;

/// Handle drop zone and picker input. Returns the request started, if any.
pub fn handle_uploader(
    event: UploaderEvent,
    uploader: &mut Uploader,
    orchestrator: &mut Orchestrator,
) -> Option<RequestId> {
    let file = uploader.handle(event, orchestrator.is_loading())?;
    Some(orchestrator.submit(file))
}

/// Handle viewer controls. Returns a status line for the shell.
///
/// Without a result on screen the controls do not exist, so the message is
/// dropped.
pub fn handle_viewer(msg: ViewerMessage, viewer: Option<&mut ResultViewer>) -> Option<String> {
    let Some(viewer) = viewer else {
        log::debug!("Viewer message {:?} ignored, no result shown", msg);
        return None;
    };
    match msg {
        ViewerMessage::ToggleMask => {
            viewer.toggle_mask();
            let shown = if viewer.overlay().visible() { "shown" } else { "hidden" };
            Some(format!("Mask {shown}"))
        }
        ViewerMessage::OpacityChanged(value) => {
            viewer.set_opacity(value);
            Some(format!("Mask opacity {}%", viewer.overlay().opacity_percent()))
        }
    }
}
