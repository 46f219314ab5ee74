//! Segmentation service access.
//!
//! The orchestrator talks to the service through [`SegmentationService`], so
//! the HTTP client can be swapped for an in-process fake in tests.

mod http;
mod worker;

pub use http::HttpSegmentationService;
pub use worker::{UploadOutcome, UploadWorker};

use crate::error::UploadError;
use crate::model::{HealthStatus, SegmentationResult, UploadFile};

/// Remote segmentation backend.
///
/// Implementations are called from upload threads and must be shareable.
pub trait SegmentationService: Send + Sync {
    /// Send one scan and return the parsed segmentation result.
    fn upload(&self, file: &UploadFile) -> Result<SegmentationResult, UploadError>;

    /// Query the service health endpoint.
    fn health(&self) -> Result<HealthStatus, UploadError>;

    /// Fetch a result asset (image) by its service-relative path.
    fn fetch_asset(&self, path: &str) -> Result<Vec<u8>, UploadError>;

    /// Absolute URL for a service-relative path.
    fn asset_url(&self, path: &str) -> String;
}
