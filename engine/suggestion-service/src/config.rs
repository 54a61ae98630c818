//! Service configuration management
//!
//! Defaults, then an optional TOML file, then `TRANSFER_*` environment
//! variables. Nested keys use a double underscore, e.g.
//! `TRANSFER_RUNNER__TEAM_BUDGET_MS=1500` or
//! `TRANSFER_ENGINE__WEIGHTS__FORM=0.3`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use suggestion_store::StoreConfig;
use transfer_engine::EngineConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "TRANSFER";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Input data locations
    pub data: DataConfig,

    /// Suggestion store configuration
    pub store: StoreConfig,

    /// Scoring and selection configuration
    pub engine: EngineConfig,

    /// Per-team and batch execution settings
    pub runner: RunnerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Player catalog snapshot (JSON)
    pub catalog_path: PathBuf,

    /// Team squads (JSON)
    pub squads_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Wall-clock budget for one team's run in milliseconds
    pub team_budget_ms: u64,

    /// Teams processed concurrently in a batch
    pub batch_workers: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, plain)
    pub format: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("./data/catalog.json"),
            squads_path: PathBuf::from("./data/squads.json"),
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self { team_budget_ms: 3000, batch_workers: num_cpus::get() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl RunnerConfig {
    pub fn team_budget(&self) -> Duration {
        Duration::from_millis(self.team_budget_ms)
    }
}

impl ServiceConfig {
    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

/// Load configuration from an optional file and the environment
pub fn load_config(config_file: Option<&Path>) -> Result<ServiceConfig> {
    let mut builder = config::Config::builder();

    if let Some(path) = config_file {
        tracing::debug!("Loading configuration from file: {:?}", path);
        builder = builder.add_source(config::File::from(path.to_path_buf()).required(true));
    }

    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config: ServiceConfig = builder
        .build()
        .context("Failed to read configuration sources")?
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    validate_config(&config)?;
    Ok(config)
}

/// Validate configuration
pub fn validate_config(config: &ServiceConfig) -> Result<()> {
    config.engine.validate().context("Invalid engine configuration")?;
    config.store.validate().map_err(|e| anyhow::anyhow!("Invalid store configuration: {}", e))?;

    if config.runner.team_budget_ms == 0 {
        return Err(anyhow::anyhow!("runner.team_budget_ms must be greater than 0"));
    }

    if config.runner.batch_workers == 0 {
        return Err(anyhow::anyhow!("runner.batch_workers must be greater than 0"));
    }

    match config.logging.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow::anyhow!("Invalid log level: {}", config.logging.level)),
    }

    match config.logging.format.as_str() {
        "json" | "pretty" | "plain" => {}
        _ => return Err(anyhow::anyhow!("Invalid log format: {}", config.logging.format)),
    }

    Ok(())
}
