//! Console configuration
//!
//! Loaded from an optional TOML file. Every field has a default so an empty
//! or missing file yields a working configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsoleConfig {
    pub upload: UploadConfig,
    pub overview: OverviewConfig,
    pub assets: AssetsConfig,
}

/// Timing of the simulated upload progress
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadConfig {
    /// Milliseconds between progress ticks
    pub tick_interval_ms: u64,
    /// Percentage points added per tick
    pub tick_increment: u8,
    /// Progress never exceeds this value before the upload resolves
    pub progress_cap: u8,
    /// How long 100% stays visible after a successful upload
    pub completion_delay_ms: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 200,
            tick_increment: 10,
            progress_cap: 90,
            completion_delay_ms: 500,
        }
    }
}

impl UploadConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(Error::ConfigError(
                "upload.tickIntervalMs must be greater than zero".to_string(),
            ));
        }
        if self.tick_increment == 0 {
            return Err(Error::ConfigError(
                "upload.tickIncrement must be greater than zero".to_string(),
            ));
        }
        if self.progress_cap >= 100 {
            return Err(Error::ConfigError(format!(
                "upload.progressCap must be below 100, got {}",
                self.progress_cap
            )));
        }
        Ok(())
    }
}

/// Values shown while live statistics are unavailable
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverviewConfig {
    pub fallback_participation_percent: u8,
    pub fallback_treasury_utilization_percent: u8,
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self {
            fallback_participation_percent: 78,
            fallback_treasury_utilization_percent: 45,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetsConfig {
    /// Whether uploads are published to every member
    pub publish_uploads: bool,
    pub default_tags: Vec<String>,
    /// Number of fetched payloads kept for repeated view/download
    pub payload_cache_capacity: usize,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            publish_uploads: true,
            default_tags: Vec::new(),
            payload_cache_capacity: 16,
        }
    }
}

impl ConsoleConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: ConsoleConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, or defaults when no path is given.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            debug!("No config file given, using defaults");
            return Ok(Self::default());
        };

        let raw = tokio::fs::read_to_string(path).await?;
        let config = Self::from_toml_str(&raw)?;
        info!("Loaded console config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.upload.validate()?;
        if self.overview.fallback_participation_percent > 100
            || self.overview.fallback_treasury_utilization_percent > 100
        {
            return Err(Error::ConfigError(
                "overview fallback percentages must be at most 100".to_string(),
            ));
        }
        Ok(())
    }
}
