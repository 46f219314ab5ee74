//! File intake from drag-and-drop and the file picker.

use crate::model::UploadFile;
use crate::widget_state::DropZoneState;

/// Raw input events delivered to the uploader.
#[derive(Debug, Clone, PartialEq)]
pub enum UploaderEvent {
    DragEnter,
    DragOver,
    DragLeave,
    /// Files dropped on the zone, in drop order
    Drop(Vec<UploadFile>),
    /// Files chosen in the picker
    Picked(Vec<UploadFile>),
}

/// Turns drop and pick actions into at most one file per action.
#[derive(Debug, Clone, Default)]
pub struct Uploader {
    drop_zone: DropZoneState,
}

impl Uploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drag_active(&self) -> bool {
        self.drop_zone.is_active
    }

    /// Handle one event and return the file to upload, if any.
    ///
    /// Only the first file of a drop or pick is used. While `loading`, the
    /// picker is disabled and picks are ignored; drops still go through.
    pub fn handle(&mut self, event: UploaderEvent, loading: bool) -> Option<UploadFile> {
        match event {
            UploaderEvent::DragEnter | UploaderEvent::DragOver => {
                self.drop_zone.activate();
                None
            }
            UploaderEvent::DragLeave => {
                self.drop_zone.deactivate();
                None
            }
            UploaderEvent::Drop(files) => {
                self.drop_zone.deactivate();
                let file = files.into_iter().next();
                if file.is_none() {
                    log::debug!("Drop without files ignored");
                }
                file
            }
            UploaderEvent::Picked(files) => {
                if loading {
                    log::debug!("Picker disabled while processing, ignoring selection");
                    return None;
                }
                files.into_iter().next()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> UploadFile {
        UploadFile::new(name, b"DICM".to_vec())
    }

    #[test]
    fn test_drag_enter_over_leave() {
        let mut uploader = Uploader::new();
        assert_eq!(uploader.handle(UploaderEvent::DragEnter, false), None);
        assert!(uploader.is_drag_active());
        assert_eq!(uploader.handle(UploaderEvent::DragOver, false), None);
        assert!(uploader.is_drag_active());
        assert_eq!(uploader.handle(UploaderEvent::DragLeave, false), None);
        assert!(!uploader.is_drag_active());
    }

    #[test]
    fn test_drop_takes_first_file_and_clears_active() {
        let mut uploader = Uploader::new();
        uploader.handle(UploaderEvent::DragEnter, false);

        let picked = uploader.handle(
            UploaderEvent::Drop(vec![file("a.dcm"), file("b.dcm")]),
            false,
        );
        assert_eq!(picked.map(|f| f.name), Some("a.dcm".to_string()));
        assert!(!uploader.is_drag_active());
    }

    #[test]
    fn test_empty_drop_yields_nothing() {
        let mut uploader = Uploader::new();
        uploader.handle(UploaderEvent::DragEnter, false);
        assert_eq!(uploader.handle(UploaderEvent::Drop(Vec::new()), false), None);
        assert!(!uploader.is_drag_active());
    }

    #[test]
    fn test_pick_blocked_while_loading_but_drop_is_not() {
        let mut uploader = Uploader::new();
        assert_eq!(
            uploader.handle(UploaderEvent::Picked(vec![file("a.dcm")]), true),
            None
        );
        assert_eq!(
            uploader
                .handle(UploaderEvent::Drop(vec![file("b.dcm")]), true)
                .map(|f| f.name),
            Some("b.dcm".to_string())
        );
    }

    #[test]
    fn test_pick_when_idle() {
        let mut uploader = Uploader::new();
        assert_eq!(
            uploader
                .handle(UploaderEvent::Picked(vec![file("scan.nii")]), false)
                .map(|f| f.name),
            Some("scan.nii".to_string())
        );
        assert_eq!(uploader.handle(UploaderEvent::Picked(Vec::new()), false), None);
    }
}
