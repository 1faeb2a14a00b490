//! Startup configuration.
//!
//! Layers, later wins:
//! 1. YAML file (explicit path, ./opencti-mcp.yml, ~/.config/opencti-mcp/opencti-mcp.yml)
//! 2. Environment (OPENCTI_URL, OPENCTI_TOKEN, LOG_LEVEL), including anything
//!    the binary loaded from `.env`
//!
//! The merged [`Config`] is turned into an immutable [`ServiceConfig`] once;
//! that is the only thing the query client ever sees.

use log::LevelFilter;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{OpenCtiError, Result};

pub const ENV_URL: &str = "OPENCTI_URL";
pub const ENV_TOKEN: &str = "OPENCTI_TOKEN";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

pub const DEFAULT_LOG_LEVEL: &str = "info";

const PROJECT_NAME: &str = env!("CARGO_PKG_NAME");

/// Raw, possibly incomplete configuration as read from file and environment
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the OpenCTI platform (without `/graphql`)
    pub url: Option<String>,

    /// API token sent as a bearer credential
    pub token: Option<String>,

    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Append logs to this file instead of stderr
    #[serde(rename = "log-file")]
    pub log_file: Option<PathBuf>,

    /// File this config was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// Search order:
    /// 1. Explicit path if provided (must exist and parse)
    /// 2. ./opencti-mcp.yml
    /// 3. <config_dir>/opencti-mcp/opencti-mcp.yml
    /// 4. Defaults
    ///
    /// Nothing is logged here since logging is set up from the result.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let project_config = PathBuf::from(format!("{}.yml", PROJECT_NAME));
        if project_config.exists() {
            return Self::load_from_file(&project_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(PROJECT_NAME).join(format!("{}.yml", PROJECT_NAME));
            if user_config.exists() {
                return Self::load_from_file(&user_config);
            }
        }

        Ok(Self::default())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            OpenCtiError::Configuration(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let mut config: Self = serde_yaml::from_str(&content).map_err(|e| {
            OpenCtiError::Configuration(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Override file values with the process environment
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Override file values using an arbitrary variable lookup
    pub fn with_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_blank(ENV_URL) {
            self.url = Some(url);
        }
        if let Some(token) = non_blank(ENV_TOKEN) {
            self.token = Some(token);
        }
        if let Some(level) = non_blank(ENV_LOG_LEVEL) {
            self.log_level = Some(level);
        }
        self
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// The configured level as a filter; unknown names are a configuration error
    pub fn log_filter(&self) -> Result<LevelFilter> {
        let level = self.log_level().trim();
        LevelFilter::from_str(level).map_err(|_| {
            OpenCtiError::Configuration(format!(
                "Invalid {} '{}': expected off, error, warn, info, debug or trace",
                ENV_LOG_LEVEL, level
            ))
        })
    }

    /// Build the immutable service configuration, failing on missing keys
    pub fn service_config(&self) -> Result<ServiceConfig> {
        let url = self
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| OpenCtiError::Configuration(format!("{} is not set", ENV_URL)))?;
        let token = self
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| OpenCtiError::Configuration(format!("{} is not set", ENV_TOKEN)))?;

        ServiceConfig::new(url, token)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("log_level", &self.log_level)
            .field("log_file", &self.log_file)
            .field("source", &self.source)
            .finish()
    }
}

/// Connection settings for the knowledge base. Read-only after startup.
#[derive(Clone)]
pub struct ServiceConfig {
    endpoint: Url,
    token: String,
}

impl ServiceConfig {
    pub fn new(endpoint: &str, token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(OpenCtiError::Configuration(format!("{} is empty", ENV_TOKEN)));
        }

        let endpoint = Url::parse(endpoint.trim())
            .map_err(|e| OpenCtiError::Configuration(format!("Invalid {} '{}': {}", ENV_URL, endpoint, e)))?;

        match endpoint.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(OpenCtiError::Configuration(format!(
                    "Unsupported scheme '{}' in {}",
                    scheme, ENV_URL
                )));
            }
        }

        Ok(Self { endpoint, token })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Full URL of the GraphQL endpoint
    pub fn graphql_url(&self) -> String {
        format!("{}/graphql", self.endpoint.as_str().trim_end_matches('/'))
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}
