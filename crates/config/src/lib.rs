//! Configuration loading, validation, and management for Waypoint.
//!
//! Loads configuration from `~/.waypoint/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use waypoint_core::{Platform, PresentationMode, TriggerPoint, ViewTable};

/// Environment variable overriding `api_base_url`.
pub const ENV_API_BASE_URL: &str = "WAYPOINT_API_BASE_URL";
/// Environment variable overriding `organization_code`.
pub const ENV_ORG_CODE: &str = "WAYPOINT_ORG_CODE";
/// Environment variable overriding `hash_secret`.
pub const ENV_HASH_SECRET: &str = "WAYPOINT_HASH_SECRET";
/// Environment variable overriding `platform`.
pub const ENV_PLATFORM: &str = "WAYPOINT_PLATFORM";

/// The root configuration structure.
///
/// Maps directly to `~/.waypoint/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the targeted content service
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Organization code issued by the content vendor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_code: Option<String>,

    /// Shared secret for hashing user ids (demo only; production hashes server-side)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_secret: Option<String>,

    /// Platform content is requested for
    #[serde(default)]
    pub platform: Platform,

    /// Content categories to request
    #[serde(default = "default_content_types")]
    pub content_types: Vec<String>,

    /// Which content source binding to use
    #[serde(default)]
    pub binding: Binding,

    /// Which presentation surface renders the content
    #[serde(default)]
    pub presentation_mode: PresentationMode,

    /// Request timeout for network bindings
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Fetch content for the default trigger point right after sign-in
    #[serde(default = "default_true")]
    pub fetch_on_sign_in: bool,

    /// Styling hook for button affordances
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_class_name: Option<String>,

    /// Styling hook for hosted views
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_class_name: Option<String>,

    /// Ordered trigger points; the first is the default location
    #[serde(default = "default_trigger_points")]
    pub trigger_points: Vec<String>,

    /// Extra navigable views
    #[serde(default = "default_views")]
    pub views: Vec<ViewConfig>,

    /// Static catalog settings (used by the `static` binding)
    #[serde(default)]
    pub static_catalog: StaticCatalogConfig,
}

fn default_api_base_url() -> String {
    "https://api.wavecx.com".into()
}
fn default_content_types() -> Vec<String> {
    vec!["featurette".into()]
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_true() -> bool {
    true
}
fn default_trigger_points() -> Vec<String> {
    vec!["account-view".into(), "payments".into(), "transfers".into()]
}
fn default_views() -> Vec<ViewConfig> {
    vec![ViewConfig {
        name: "no-trigger-point-page".into(),
        trigger_point: None,
    }]
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_base_url", &self.api_base_url)
            .field("organization_code", &self.organization_code)
            .field("hash_secret", &redact(&self.hash_secret))
            .field("platform", &self.platform)
            .field("content_types", &self.content_types)
            .field("binding", &self.binding)
            .field("presentation_mode", &self.presentation_mode)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("fetch_on_sign_in", &self.fetch_on_sign_in)
            .field("trigger_points", &self.trigger_points)
            .field("views", &self.views)
            .field("static_catalog", &self.static_catalog)
            .field("button_class_name", &self.button_class_name)
            .field("view_class_name", &self.view_class_name)
            .finish()
    }
}

/// Content source binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binding {
    /// Direct `POST {base}/{org}/targeted-content-events`
    #[default]
    Http,
    /// SDK-style initialize / set_user / set_context / check_for_content
    Sdk,
    /// In-memory catalog, no network
    Static,
}

impl Binding {
    pub fn uses_network(&self) -> bool {
        matches!(self, Self::Http | Self::Sdk)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Sdk => "sdk",
            Self::Static => "static",
        }
    }
}

impl std::fmt::Display for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Binding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(Self::Http),
            "sdk" => Ok(Self::Sdk),
            "static" => Ok(Self::Static),
            other => Err(format!("unknown binding '{other}' (expected http, sdk or static)")),
        }
    }
}

/// A navigable view. Without `trigger_point` the view is content-free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_point: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticCatalogConfig {
    /// JSON file mapping trigger point names to content item arrays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Simulated latency per request, for exercising stale-response handling
    #[serde(default)]
    pub delay_ms: u64,
}

impl AppConfig {
    /// Load configuration from the default location.
    ///
    /// Priority: env vars > config file > defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        Self::load_with_env(&config_path)
    }

    /// Load from a path, then apply process environment overrides and validate.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = lookup(ENV_API_BASE_URL).filter(|v| !v.is_empty()) {
            self.api_base_url = url;
        }
        if let Some(code) = lookup(ENV_ORG_CODE).filter(|v| !v.is_empty()) {
            self.organization_code = Some(code);
        }
        if let Some(secret) = lookup(ENV_HASH_SECRET) {
            self.hash_secret = Some(secret);
        }
        if let Some(platform) = lookup(ENV_PLATFORM) {
            self.platform = platform
                .parse()
                .map_err(ConfigError::ValidationError)?;
        }
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".waypoint")
    }

    /// Validate the configuration.
    ///
    /// The organization code is checked separately by
    /// [`AppConfig::organization_code`], so tooling that never talks to the
    /// network can run without one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(ConfigError::ValidationError(format!(
                "api_base_url must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }

        if self.content_types.is_empty() {
            return Err(ConfigError::ValidationError(
                "content_types must not be empty".into(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be > 0".into(),
            ));
        }

        self.view_table()?;
        Ok(())
    }

    /// The organization code, required by the network bindings.
    pub fn organization_code(&self) -> Result<&str, ConfigError> {
        match self.organization_code.as_deref() {
            Some(code) if !code.trim().is_empty() => Ok(code),
            _ => Err(ConfigError::MissingField {
                field: "organization_code",
                env: ENV_ORG_CODE,
            }),
        }
    }

    /// The hashing secret; an unset secret hashes with an empty key.
    pub fn hash_secret(&self) -> &str {
        self.hash_secret.as_deref().unwrap_or("")
    }

    /// Build the navigation table from `trigger_points` and `views`.
    pub fn view_table(&self) -> Result<ViewTable, ConfigError> {
        ViewTable::new(
            self.trigger_points.iter().map(|tp| TriggerPoint::new(tp.as_str())),
            self.views
                .iter()
                .map(|v| (v.name.clone(), v.trigger_point.as_deref().map(TriggerPoint::new))),
        )
        .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// Generate a default config TOML string (for `init` command).
    pub fn default_toml() -> String {
        let config = Self {
            organization_code: Some("your-org-code".into()),
            ..Self::default()
        };
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            organization_code: None,
            hash_secret: None,
            platform: Platform::default(),
            content_types: default_content_types(),
            binding: Binding::default(),
            presentation_mode: PresentationMode::default(),
            request_timeout_secs: default_request_timeout_secs(),
            fetch_on_sign_in: true,
            trigger_points: default_trigger_points(),
            views: default_views(),
            static_catalog: StaticCatalogConfig::default(),
            button_class_name: None,
            view_class_name: None,
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Missing required setting `{field}` (set it in config.toml or via {env})")]
    MissingField {
        field: &'static str,
        env: &'static str,
    },
}
