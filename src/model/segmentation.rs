//! Segmentation service response payloads.

use serde::{Deserialize, Serialize};

/// Scalar measurements computed by the service from the predicted mask.
///
/// Passed through to the metrics panel without recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Number of mask pixels
    pub area_pixels: f64,
    /// Estimated volume in cubic millimetres
    pub volume_mm3: f64,
    /// Estimated volume in millilitres
    pub volume_ml: f64,
}

/// A successful segmentation response.
///
/// Paths are relative to the service origin; the client joins them with the
/// origin to build image URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationResult {
    /// Path of the normalized original image
    #[serde(rename = "original_url")]
    pub original_path: String,
    /// Path of the mask image
    #[serde(rename = "mask_url")]
    pub mask_path: String,
    /// Mask metrics
    pub metrics: Metrics,
    /// Short result identifier assigned by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_id: Option<String>,
    /// Service-side status string (e.g. "success")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// ISO-8601 processing timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl SegmentationResult {
    /// Parse a response body.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Response of the service health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_response() {
        let json = r#"{
            "original_url": "/files/o1.png",
            "mask_url": "/files/m1.png",
            "metrics": {"area_pixels": 15234, "volume_mm3": 482931, "volume_ml": 482.93}
        }"#;

        let result = SegmentationResult::from_json(json).unwrap();
        assert_eq!(result.original_path, "/files/o1.png");
        assert_eq!(result.mask_path, "/files/m1.png");
        assert_eq!(result.metrics.area_pixels, 15234.0);
        assert_eq!(result.metrics.volume_mm3, 482931.0);
        assert_eq!(result.metrics.volume_ml, 482.93);
        assert!(result.result_id.is_none());
    }

    #[test]
    fn test_parse_full_response() {
        let json = r#"{
            "result_id": "a1b2c3d4",
            "status": "success",
            "mask_url": "/results/a1b2c3d4/mask.png",
            "original_url": "/results/a1b2c3d4/original.png",
            "metrics": {"area_pixels": 10, "volume_mm3": 20.0, "volume_ml": 0.02},
            "timestamp": "2025-03-01T10:00:00"
        }"#;

        let result = SegmentationResult::from_json(json).unwrap();
        assert_eq!(result.result_id.as_deref(), Some("a1b2c3d4"));
        assert_eq!(result.status.as_deref(), Some("success"));
        assert_eq!(result.timestamp.as_deref(), Some("2025-03-01T10:00:00"));
    }

    #[test]
    fn test_parse_missing_metrics_fails() {
        let json = r#"{"original_url": "/o.png", "mask_url": "/m.png"}"#;
        assert!(SegmentationResult::from_json(json).is_err());
    }

    #[test]
    fn test_health_status() {
        let health: HealthStatus =
            serde_json::from_str(r#"{"status": "healthy", "model": "ONNX liver_model"}"#).unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.model.as_deref(), Some("ONNX liver_model"));

        let health: HealthStatus = serde_json::from_str(r#"{"status": "degraded"}"#).unwrap();
        assert!(!health.is_healthy());
    }
}
