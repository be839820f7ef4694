//! Dashboard Configuration - prediction endpoints, HTTP client and server settings
//!
//! Each struct implements `Default` with the built-in endpoint URLs, so the
//! dashboard runs with no config file at all.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;
use crate::client::Endpoint;

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "SMARTFARM_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "smartfarm.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a dashboard deployment.
///
/// Load with `DashboardConfig::load()` which searches:
/// 1. `$SMARTFARM_CONFIG` env var
/// 2. `./smartfarm.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Display metadata
    #[serde(default)]
    pub dashboard: DashboardInfo,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Prediction service URLs
    #[serde(default)]
    pub endpoints: EndpointConfig,

    /// Outbound HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

impl DashboardConfig {
    /// Load configuration using the standard search order:
    /// 1. `$SMARTFARM_CONFIG` environment variable
    /// 2. `./smartfarm.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded dashboard config from SMARTFARM_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from SMARTFARM_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "SMARTFARM_CONFIG points to non-existent file, falling back");
            }
        }

        // 2. Check ./smartfarm.toml
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded dashboard config from ./smartfarm.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./smartfarm.toml, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No smartfarm.toml found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document. Unknown keys are logged, not fatal.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        // Two-pass: check for unknown keys first (warnings only)
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate URLs, server address and client settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (errors, warnings) = super::validation::validate_settings(self);
        for w in &warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Dashboard Info
// ============================================================================

/// Display metadata; appears in logs and the navigation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardInfo {
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_title() -> String {
    defaults::DASHBOARD_TITLE.to_string()
}

impl Default for DashboardInfo {
    fn default() -> Self {
        Self {
            title: default_title(),
        }
    }
}

// ============================================================================
// Server Config
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server bind address.
    ///
    /// Can be overridden by `SMARTFARM_SERVER_ADDR` env var or `--addr` CLI flag.
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

fn default_server_addr() -> String {
    defaults::SERVER_ADDR.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}

// ============================================================================
// Endpoint Config
// ============================================================================

/// URL for each prediction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_soil_carbon_url")]
    pub soil_carbon: String,

    #[serde(default = "default_fertilizer_url")]
    pub fertilizer: String,

    #[serde(default = "default_organic_fertilizer_url")]
    pub organic_fertilizer: String,

    #[serde(default = "default_regional_url")]
    pub regional: String,
}

fn default_soil_carbon_url() -> String { defaults::SOIL_CARBON_URL.to_string() }
fn default_fertilizer_url() -> String { defaults::FERTILIZER_URL.to_string() }
fn default_organic_fertilizer_url() -> String { defaults::ORGANIC_FERTILIZER_URL.to_string() }
fn default_regional_url() -> String { defaults::REGIONAL_URL.to_string() }

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            soil_carbon: default_soil_carbon_url(),
            fertilizer: default_fertilizer_url(),
            organic_fertilizer: default_organic_fertilizer_url(),
            regional: default_regional_url(),
        }
    }
}

impl EndpointConfig {
    /// Point every service at `base` + `/<endpoint-name>`. Handy for local mocks.
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            soil_carbon: format!("{base}/{}", Endpoint::SoilCarbon),
            fertilizer: format!("{base}/{}", Endpoint::Fertilizer),
            organic_fertilizer: format!("{base}/{}", Endpoint::OrganicFertilizer),
            regional: format!("{base}/{}", Endpoint::Regional),
        }
    }

    pub fn url(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::SoilCarbon => &self.soil_carbon,
            Endpoint::Fertilizer => &self.fertilizer,
            Endpoint::OrganicFertilizer => &self.organic_fertilizer,
            Endpoint::Regional => &self.regional,
        }
    }
}

// ============================================================================
// HTTP Client Config
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout. Absent means the transport default (none).
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    defaults::USER_AGENT.to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
