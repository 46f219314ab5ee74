//! Widget state management layer.
//!
//! Transient UI state that lives beside the domain state: it changes how
//! things look but never reaches the upload store.

/// Transient state for the drop zone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropZoneState {
    /// Whether something is being dragged over the zone
    pub is_active: bool,
}

impl DropZoneState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A drag entered or moved over the zone.
    pub fn activate(&mut self) {
        self.is_active = true;
    }

    /// The drag left the zone or was dropped.
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}

/// Interactive shell presentation state.
#[derive(Debug, Clone, Default)]
pub struct ShellState {
    /// Last status line shown under the view
    pub status_message: Option<String>,
}

impl ShellState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Take the pending status line, clearing it.
    pub fn take_status(&mut self) -> Option<String> {
        self.status_message.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_zone_activation() {
        let mut state = DropZoneState::new();
        assert!(!state.is_active);

        state.activate();
        state.activate();
        assert!(state.is_active);

        state.deactivate();
        assert!(!state.is_active);
    }

    #[test]
    fn test_shell_status() {
        let mut state = ShellState::new();
        assert!(state.take_status().is_none());

        state.set_status("Mask hidden");
        assert_eq!(state.take_status().as_deref(), Some("Mask hidden"));
        assert!(state.take_status().is_none());
    }
}
