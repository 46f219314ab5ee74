//! Data models for the liverseg client.

mod segmentation;
mod upload_file;

pub use segmentation::{HealthStatus, Metrics, SegmentationResult};
pub use upload_file::{UploadFile, has_accepted_extension};
