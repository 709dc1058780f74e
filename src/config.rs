use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{DEFAULT_PROJECT_TYPE, DEFAULT_STANDARD_CATEGORY};

/// Main configuration structure for the review desk client
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ReviewDeskConfig {
    /// How the review service is addressed
    pub api: ApiConfig,
    /// Review workflow defaults
    pub review: ReviewConfig,
    /// Local project list mirror
    pub cache: CacheConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Fixed base address; skips host-based selection when set
    pub base_url: Option<String>,
    /// Deployment host name (defaults to the machine's host name)
    pub host: Option<String>,
    /// Host name fragments that mean "served from the API's own origin"
    pub hosted_markers: Vec<String>,
    /// Base address used everywhere else
    pub local_base_url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReviewConfig {
    /// Ask the service for AI-assisted review
    pub use_ai: bool,
    pub default_project_type: String,
    pub default_standard_category: String,
    /// Model picked when the caller names none and the service offers it
    pub preferred_model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Directory holding `projects.json`
    pub dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            host: None,
            hosted_markers: vec!["vercel.app".to_string(), "vercel.com".to_string()],
            local_base_url: "http://localhost:8000".to_string(),
        }
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            use_ai: true,
            default_project_type: DEFAULT_PROJECT_TYPE.to_string(),
            default_standard_category: DEFAULT_STANDARD_CATEGORY.to_string(),
            preferred_model: Some("deepseek-chat".to_string()),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".review-desk"),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl ReviewDeskConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (review-desk.toml)
    /// 3. Environment variables (prefixed with REVIEW_DESK__)
    pub fn load() -> Result<Self> {
        let file = Path::new("review-desk.toml");
        Self::load_from(file.exists().then_some(file))
    }

    /// Same as [`ReviewDeskConfig::load`] with an explicit config file.
    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("REVIEW_DESK")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("api.hosted_markers")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<ReviewDeskConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = ReviewDeskConfig::load_env_file();
        ReviewDeskConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static ReviewDeskConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_point_at_local_service() {
        let config = ReviewDeskConfig::load_from(None).unwrap();
        assert_eq!(config.api.local_base_url, "http://localhost:8000");
        assert_eq!(config.api.hosted_markers, vec!["vercel.app", "vercel.com"]);
        assert!(config.review.use_ai);
        assert_eq!(config.review.default_project_type, "施工前期");
        assert_eq!(config.review.default_standard_category, "通用规范");
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("review-desk.toml");
        std::fs::write(
            &path,
            r#"
[api]
base_url = "https://review.internal"

[review]
use_ai = false
"#,
        )
        .unwrap();

        let config = ReviewDeskConfig::load_from(Some(&path)).unwrap();

        assert_eq!(config.api.base_url.as_deref(), Some("https://review.internal"));
        assert!(!config.review.use_ai);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn saved_file_loads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("review-desk.toml");
        let mut config = ReviewDeskConfig::default();
        config.cache.dir = dir.path().join("cache");
        config.observability.json_logs = true;

        config.save_to_file(&path).unwrap();
        let loaded = ReviewDeskConfig::load_from(Some(&path)).unwrap();

        assert_eq!(loaded, config);
    }
}
