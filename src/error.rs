//! Error types shared by the service client and the orchestrator.

/// Errors that can occur while talking to the segmentation service.
///
/// Every variant collapses into the same failure state at the orchestrator
/// boundary; the `Display` text is what the error banner shows.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The service answered with a non-2xx status. The body is not inspected.
    #[error("Upload failed")]
    Rejected { status: u16 },

    /// Connection, TLS or transport failure
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    /// The response body was not the expected JSON document
    #[error("Failed to parse service response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reading the scan from disk failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when exporting the overlay composite.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// There is no segmentation result to export
    #[error("No segmentation result to export")]
    NoResult,

    /// Fetching one of the result images failed
    #[error("Failed to fetch result image: {0}")]
    Fetch(#[from] UploadError),

    /// Decoding or encoding a PNG failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
