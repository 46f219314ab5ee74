//! Main liverseg application.

use std::path::Path;
use std::sync::Arc;

use crate::composite::export_composite;
use crate::config::AppConfig;
use crate::error::{ExportError, UploadError};
use crate::handlers::{handle_uploader, handle_viewer};
use crate::message::Message;
use crate::orchestrator::Orchestrator;
use crate::service::{HttpSegmentationService, SegmentationService};
use crate::state::{OverlayState, SubscriptionId, UploadState};
use crate::uploader::Uploader;
use crate::viewer::ResultViewer;
use crate::views::render_home;
use crate::widget_state::ShellState;

/// Top-level application: uploader, orchestrator and result viewer.
///
/// Driven Elm-style: input becomes a [`Message`] passed to `update`,
/// background results are collected by `tick`, and `view` renders the
/// current screen.
pub struct LiverSegApp {
    config: AppConfig,
    orchestrator: Orchestrator,
    uploader: Uploader,
    /// Present exactly while the state is `Success`
    viewer: Option<ResultViewer>,
    shell: ShellState,
}

impl LiverSegApp {
    pub fn new(config: AppConfig, service: Arc<dyn SegmentationService>) -> Self {
        log::info!(
            "liverseg ready: service {}, settle policy {}",
            config.service.origin,
            config.settle_policy.name()
        );
        Self {
            orchestrator: Orchestrator::new(service, config.settle_policy),
            config,
            uploader: Uploader::new(),
            viewer: None,
            shell: ShellState::new(),
        }
    }

    /// Create an app talking to the configured HTTP service.
    pub fn with_http(config: AppConfig) -> Result<Self, UploadError> {
        let service = HttpSegmentationService::new(config.service.clone())?;
        Ok(Self::new(config, Arc::new(service)))
    }

    pub fn state(&self) -> &UploadState {
        self.orchestrator.state()
    }

    pub fn viewer(&self) -> Option<&ResultViewer> {
        self.viewer.as_ref()
    }

    pub fn uploader(&self) -> &Uploader {
        &self.uploader
    }

    /// Whether any request is still in flight.
    pub fn is_busy(&self) -> bool {
        self.orchestrator.pending_count() > 0
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&UploadState) + 'static) -> SubscriptionId {
        self.orchestrator.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.orchestrator.unsubscribe(id)
    }

    /// Take the status line produced by the last viewer action.
    pub fn take_status(&mut self) -> Option<String> {
        self.shell.take_status()
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::Uploader(event) => {
                if handle_uploader(event, &mut self.uploader, &mut self.orchestrator).is_some() {
                    self.sync_viewer();
                }
            }
            Message::Viewer(msg) => {
                if let Some(status) = handle_viewer(msg, self.viewer.as_mut()) {
                    self.shell.set_status(status);
                }
            }
        }
    }

    /// Collect settled uploads. Returns true if the screen changed.
    pub fn tick(&mut self) -> bool {
        let accepted = self.orchestrator.poll();
        if accepted > 0 {
            self.sync_viewer();
        }
        accepted > 0
    }

    pub fn view(&self) -> String {
        render_home(
            self.orchestrator.state(),
            &self.uploader,
            self.viewer.as_ref(),
            &self.config.metrics,
        )
    }

    /// Write the current result with its overlay flattened into a PNG.
    pub fn export_composite(&self, output: &Path) -> Result<(), ExportError> {
        let (Some(result), Some(viewer)) = (self.state().result(), self.viewer.as_ref()) else {
            return Err(ExportError::NoResult);
        };
        export_composite(
            self.orchestrator.service().as_ref(),
            &result.original_path,
            &result.mask_path,
            viewer.overlay(),
            output,
        )
    }

    /// Rebuild the viewer after an accepted transition.
    ///
    /// Every accepted `Success` is a new result, so it always gets a fresh
    /// viewer with default overlay settings.
    fn sync_viewer(&mut self) {
        self.viewer = self.orchestrator.state().result().map(|result| {
            let service = self.orchestrator.service();
            ResultViewer::new(
                service.asset_url(&result.original_path),
                service.asset_url(&result.mask_path),
                OverlayState::new(
                    self.config.viewer.show_mask,
                    self.config.viewer.default_opacity,
                ),
            )
        });
    }
}

impl std::fmt::Debug for LiverSegApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiverSegApp")
            .field("orchestrator", &self.orchestrator)
            .field("uploader", &self.uploader)
            .field("viewer", &self.viewer)
            .finish_non_exhaustive()
    }
}
