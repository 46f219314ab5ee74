//! Blocking HTTP client for the segmentation service.

use std::time::Duration;

use reqwest::blocking::{Client, Response, multipart};

use super::SegmentationService;
use crate::config::ServiceConfig;
use crate::constants::{HEALTH_PATH, UPLOAD_FIELD_NAME, UPLOAD_PATH};
use crate::error::UploadError;
use crate::model::{HealthStatus, SegmentationResult, UploadFile};

/// Segmentation service reached over HTTP.
///
/// Uses blocking requests; the orchestrator runs each upload on its own
/// thread so the caller never waits on the network.
#[derive(Debug, Clone)]
pub struct HttpSegmentationService {
    config: ServiceConfig,
    client: Client,
}

impl HttpSegmentationService {
    /// Build a client for the configured origin.
    ///
    /// No timeout is applied unless `request_timeout_secs` is set.
    pub fn new(config: ServiceConfig) -> Result<Self, UploadError> {
        let timeout = config.request_timeout_secs.map(Duration::from_secs);
        let client = Client::builder().timeout(timeout).build()?;
        log::debug!(
            "HTTP client ready for {} (timeout: {:?})",
            config.origin,
            timeout
        );
        Ok(Self { config, client })
    }

    pub fn origin(&self) -> &str {
        &self.config.origin
    }

    /// Reject non-2xx responses without reading their body.
    fn check_status(response: Response) -> Result<Response, UploadError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            log::warn!("Service responded with HTTP {}", status);
            Err(UploadError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

impl SegmentationService for HttpSegmentationService {
    fn upload(&self, file: &UploadFile) -> Result<SegmentationResult, UploadError> {
        let url = self.config.url_for(UPLOAD_PATH);
        log::info!("📤 POST {} ({}, {} bytes)", url, file.name, file.len());

        let part = multipart::Part::bytes(file.bytes.to_vec()).file_name(file.name.clone());
        let form = multipart::Form::new().part(UPLOAD_FIELD_NAME, part);

        let response = self.client.post(&url).multipart(form).send()?;
        let body = Self::check_status(response)?.text()?;
        let result = SegmentationResult::from_json(&body)?;

        log::info!(
            "📥 Segmentation result {} received",
            result.result_id.as_deref().unwrap_or("(unnamed)")
        );
        Ok(result)
    }

    fn health(&self) -> Result<HealthStatus, UploadError> {
        let url = self.config.url_for(HEALTH_PATH);
        log::debug!("GET {}", url);
        let response = self.client.get(&url).send()?;
        let body = Self::check_status(response)?.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn fetch_asset(&self, path: &str) -> Result<Vec<u8>, UploadError> {
        let url = self.asset_url(path);
        log::debug!("GET {}", url);
        let response = self.client.get(&url).send()?;
        let bytes = Self::check_status(response)?.bytes()?;
        Ok(bytes.to_vec())
    }

    fn asset_url(&self, path: &str) -> String {
        self.config.url_for(path)
    }
}
