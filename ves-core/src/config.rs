//! Handler Configuration
//!
//! Configuration is plain serde data, loadable from YAML. Every field has a
//! default so a file only needs to name what it changes.

use crate::ring_buffer::DEFAULT_RING_CAPACITY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use ves_event::ReportingEntity;

/// Event listener API version embedded in collector URLs
pub const API_MAJOR_VERSION: u32 = 5;
pub const API_MINOR_VERSION: u32 = 0;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Where and how to reach the event collector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Collector host name or address
    pub fqdn: String,

    /// Collector port
    pub port: u16,

    /// Optional path prefix before `/eventListener`
    pub path: Option<String>,

    /// Optional topic appended to the event URL
    pub topic: Option<String>,

    /// Use HTTPS
    pub secure: bool,

    /// Basic authentication user
    pub username: String,

    /// Basic authentication password
    pub password: String,

    /// Per-request timeout in seconds
    pub api_timeout_secs: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            fqdn: "127.0.0.1".to_string(),
            port: 8080,
            path: None,
            topic: None,
            secure: false,
            username: String::new(),
            password: String::new(),
            api_timeout_secs: 5,
        }
    }
}

impl CollectorConfig {
    fn base_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        let path = non_empty(&self.path)
            .map(|p| format!("/{}", p.trim_matches('/')))
            .unwrap_or_default();
        let version = if API_MINOR_VERSION == 0 {
            API_MAJOR_VERSION.to_string()
        } else {
            format!("{}.{}", API_MAJOR_VERSION, API_MINOR_VERSION)
        };
        format!(
            "{}://{}:{}{}/eventListener/v{}",
            scheme, self.fqdn, self.port, path, version
        )
    }

    /// URL events are posted to
    pub fn events_url(&self) -> String {
        match non_empty(&self.topic) {
            Some(topic) => format!("{}/{}", self.base_url(), topic),
            None => self.base_url(),
        }
    }

    /// URL throttling state reports are posted to
    pub fn throttling_url(&self) -> String {
        format!("{}/clientThrottlingState", self.base_url())
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Identity stamped on every event header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// `sourceName` of every event
    pub source_name: String,

    /// `reportingEntityName` of every event
    pub reporting_entity_name: String,

    /// Default `sourceId`
    pub source_id: Option<String>,

    /// Default `reportingEntityId`
    pub reporting_entity_id: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            source_name: "ves-agent".to_string(),
            reporting_entity_name: "ves-agent".to_string(),
            source_id: None,
            reporting_entity_id: None,
        }
    }
}

impl SourceConfig {
    pub fn reporting_entity(&self) -> ReportingEntity {
        let mut entity = ReportingEntity::new(&self.source_name, &self.reporting_entity_name);
        if let Some(id) = &self.source_id {
            entity = entity.with_source_id(id);
        }
        if let Some(id) = &self.reporting_entity_id {
            entity = entity.with_reporting_entity_id(id);
        }
        entity
    }
}

/// Event handler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// Collector connection
    pub collector: CollectorConfig,

    /// Reporting identity
    pub source: SourceConfig,

    /// Ring buffer slots; one stays empty, so `capacity - 1` events fit
    pub buffer_capacity: usize,

    /// Seconds between heartbeats when running as a reporter
    pub heartbeat_interval_secs: u64,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            collector: CollectorConfig::default(),
            source: SourceConfig::default(),
            buffer_capacity: DEFAULT_RING_CAPACITY,
            heartbeat_interval_secs: 60,
        }
    }
}

impl HandlerConfig {
    /// Parse configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: HandlerConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_yaml_str(&content)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.collector.fqdn.trim().is_empty() {
            return Err(ConfigError::Validation(
                "collector.fqdn must not be empty".to_string(),
            ));
        }
        if self.collector.port == 0 {
            return Err(ConfigError::Validation(
                "collector.port must not be zero".to_string(),
            ));
        }
        if self.buffer_capacity < 2 {
            return Err(ConfigError::Validation(format!(
                "buffer_capacity must be at least 2, got {}",
                self.buffer_capacity
            )));
        }
        if self.collector.api_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "collector.api_timeout_secs must not be zero".to_string(),
            ));
        }
        Ok(())
    }
}
