//! Configuration file support for liverseg.
//!
//! Settings are stored as JSON in the user's config directory. Every field
//! falls back to its default when missing, so older or partial files keep
//! loading.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MASK_OPACITY, DEFAULT_SERVICE_ORIGIN};
use crate::number_format::Locale;
use crate::state::SettlePolicy;

/// Verbosity of the `log` output, stored by its lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Least to most verbose.
    pub const LEVELS: [LogLevel; 5] = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::LEVELS
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| format!("unknown log level '{name}'"))
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    #[serde(default = "default_version")]
    pub version: u32,

    /// Segmentation service connection
    #[serde(default)]
    pub service: ServiceConfig,

    /// Result viewer defaults
    #[serde(default)]
    pub viewer: ViewerPreferences,

    /// Metrics panel number formatting
    #[serde(default)]
    pub metrics: MetricsFormat,

    /// How overlapping uploads are reconciled
    #[serde(default)]
    pub settle_policy: SettlePolicy,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

/// Segmentation service section of the config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Scheme, host and port of the service, without a trailing path
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Per-request timeout. `None` waits indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_origin() -> String {
    DEFAULT_SERVICE_ORIGIN.to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            request_timeout_secs: None,
        }
    }
}

impl ServiceConfig {
    /// Build an absolute URL for a service-relative path.
    pub fn url_for(&self, path: &str) -> String {
        let origin = self.origin.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{origin}{path}")
        } else {
            format!("{origin}/{path}")
        }
    }

    /// Check that the origin is an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidOrigin {
            origin: self.origin.clone(),
            reason: reason.to_string(),
        };
        let url = reqwest::Url::parse(&self.origin).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host"));
        }
        Ok(())
    }
}

/// Result viewer section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerPreferences {
    /// Mask opacity for each new result, 0.0-1.0
    #[serde(default = "default_opacity")]
    pub default_opacity: f32,

    /// Whether the mask starts visible
    #[serde(default = "default_show_mask")]
    pub show_mask: bool,
}

fn default_opacity() -> f32 {
    DEFAULT_MASK_OPACITY
}

fn default_show_mask() -> bool {
    true
}

impl Default for ViewerPreferences {
    fn default() -> Self {
        Self {
            default_opacity: default_opacity(),
            show_mask: default_show_mask(),
        }
    }
}

/// Locales used by the metrics panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsFormat {
    /// Locale of the pixel area
    #[serde(default)]
    pub area_locale: Locale,

    /// Locale of both volume figures
    #[serde(default = "default_volume_locale")]
    pub volume_locale: Locale,
}

fn default_volume_locale() -> Locale {
    Locale::RuRu
}

impl Default for MetricsFormat {
    fn default() -> Self {
        Self {
            area_locale: Locale::default(),
            volume_locale: default_volume_locale(),
        }
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            service: ServiceConfig::default(),
            viewer: ViewerPreferences::default(),
            metrics: MetricsFormat::default(),
            settle_policy: SettlePolicy::default(),
            log_level: LogLevel::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }
        config.service.validate()?;

        Ok(config)
    }

    pub fn default_filename() -> &'static str {
        "liverseg-config.json"
    }

    /// `<config dir>/liverseg/liverseg-config.json`, with `~/.config` as the
    /// config dir on platforms where none is defined.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .map(|dir| dir.join("liverseg").join(Self::default_filename()))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, ConfigError> {
        let config = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load the default config file if there is one.
    ///
    /// A missing file is silent; an unreadable or invalid one is logged and
    /// skipped so the client still starts with defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path().filter(|path| path.exists())?;
        Self::load_from_path(&path)
            .inspect_err(|e| log::warn!("Ignoring config file {}: {}", path.display(), e))
            .ok()
    }

    /// Write pretty JSON, creating parent directories.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Returns the path written.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<std::path::PathBuf, ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save_to_path(&path)?;
        Ok(path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// Service origin is not a usable base URL
    #[error("Invalid service origin '{origin}': {reason}")]
    InvalidOrigin { origin: String, reason: String },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_roundtrip() {
        let config = AppConfig::new();
        let json = config.to_json().unwrap();
        let loaded = AppConfig::from_json(&json).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.service.origin, "http://localhost:8000");
        assert_eq!(loaded.service.request_timeout_secs, None);
        assert_eq!(loaded.metrics.area_locale, Locale::EnUs);
        assert_eq!(loaded.metrics.volume_locale, Locale::RuRu);
        assert_eq!(loaded.settle_policy, SettlePolicy::LastSettled);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let json = r#"{"version": 1, "service": {"origin": "https://seg.example.org"}}"#;
        let config = AppConfig::from_json(json).unwrap();
        assert_eq!(config.service.origin, "https://seg.example.org");
        assert!(config.viewer.show_mask);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_settle_policy_from_json() {
        let json = r#"{"version": 1, "settle_policy": "latest_issued"}"#;
        let config = AppConfig::from_json(json).unwrap();
        assert_eq!(config.settle_policy, SettlePolicy::LatestIssued);
    }

    #[test]
    fn test_version_too_new() {
        let json = format!(r#"{{"version": {}}}"#, CONFIG_VERSION + 1);
        assert!(matches!(
            AppConfig::from_json(&json),
            Err(ConfigError::VersionTooNew { .. })
        ));
    }

    #[test]
    fn test_invalid_origin_rejected() {
        let json = r#"{"version": 1, "service": {"origin": "ftp://files.example.org"}}"#;
        assert!(matches!(
            AppConfig::from_json(json),
            Err(ConfigError::InvalidOrigin { .. })
        ));

        let json = r#"{"version": 1, "service": {"origin": "not a url"}}"#;
        assert!(matches!(
            AppConfig::from_json(json),
            Err(ConfigError::InvalidOrigin { .. })
        ));
    }

    #[test]
    fn test_url_for_joins_paths() {
        let mut service = ServiceConfig::default();
        assert_eq!(
            service.url_for("/files/o1.png"),
            "http://localhost:8000/files/o1.png"
        );

        service.origin = "http://seg:9000/".to_string();
        assert_eq!(service.url_for("upload"), "http://seg:9000/upload");
        assert_eq!(service.url_for("/upload"), "http://seg:9000/upload");
    }

    #[test]
    fn test_log_level_names() {
        assert_eq!("DEBUG".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert!("loud".parse::<LogLevel>().is_err());
        assert_eq!(log::LevelFilter::from(LogLevel::Warn), log::LevelFilter::Warn);
    }

    #[test]
    fn test_save_and_load_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(AppConfig::default_filename());

        let mut config = AppConfig::new();
        config.viewer.default_opacity = 0.7;
        config.save_to_path(&path).unwrap();

        let loaded = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.viewer.default_opacity, 0.7);
    }
}
