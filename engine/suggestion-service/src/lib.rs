//! Suggestion Service
//!
//! Loads the player catalog and team squads, runs the transfer engine per
//! team under a wall-clock budget, and keeps each team's latest suggestions
//! in the suggestion store. Batches fan teams out over a bounded number of
//! concurrent workers.

pub mod batch;
pub mod config;
pub mod error;
pub mod logging;
pub mod service;

pub use batch::{run_batch, BatchReport, TeamOutcome};
pub use config::{load_config, validate_config, DataConfig, LoggingConfig, RunnerConfig, ServiceConfig};
pub use error::{Result, ServiceError};
pub use logging::initialize_logging;
pub use service::{SuggestionService, TeamRun};
