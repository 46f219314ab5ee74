//! liverseg - Liver Segmentation Client
//!
//! Uploads CT scans to a segmentation service and renders the returned mask
//! overlay and metrics.

pub mod app;
pub mod commands;
pub mod composite;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod message;
pub mod model;
pub mod number_format;
pub mod orchestrator;
pub mod service;
pub mod state;
pub mod uploader;
pub mod viewer;
pub mod views;
pub mod widget_state;

pub use app::LiverSegApp;
pub use config::AppConfig;
pub use error::{ExportError, UploadError};
pub use orchestrator::Orchestrator;
