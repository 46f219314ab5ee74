//! Global constants for the liverseg client

/// Service origin used when no config file or flag overrides it
pub const DEFAULT_SERVICE_ORIGIN: &str = "http://localhost:8000";

/// Upload resource on the segmentation service
pub const UPLOAD_PATH: &str = "/upload";

/// Health check resource on the segmentation service
pub const HEALTH_PATH: &str = "/health";

/// Multipart field carrying the uploaded scan
pub const UPLOAD_FIELD_NAME: &str = "file";

/// File extensions offered by the picker. Advisory only.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["dcm", "nii", "nifti"];

/// Initial mask opacity for a freshly created result viewer
pub const DEFAULT_MASK_OPACITY: f32 = 0.5;

/// Opacity slider bounds and step
pub mod opacity {
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 1.0;
    pub const STEP: f32 = 0.1;
}

/// Fraction digit limits used by the metrics panel
pub mod fraction_digits {
    /// Pixel area keeps up to three decimals
    pub const AREA: u32 = 3;
    /// Volume in cubic millimetres is shown as a whole number
    pub const VOLUME_MM3: u32 = 0;
    /// Volume in millilitres keeps up to two decimals
    pub const VOLUME_ML: u32 = 2;
}

/// Interval between worker polls in the interactive shell, in milliseconds
pub const POLL_INTERVAL_MS: u64 = 50;
