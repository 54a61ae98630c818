//! Error types for the transfer engine

use player_catalog::CatalogError;
use squad_service::{SquadError, TeamId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Team not found: {0}")]
    TeamNotFound(TeamId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Suggestion run for team {team_id} exceeded its {budget_ms} ms budget")]
    DeadlineExceeded { team_id: TeamId, budget_ms: u64 },

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Squad error: {0}")]
    Squad(SquadError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl From<SquadError> for EngineError {
    fn from(err: SquadError) -> Self {
        match err {
            SquadError::TeamNotFound { team_id } => EngineError::TeamNotFound(team_id),
            other => EngineError::Squad(other),
        }
    }
}

impl EngineError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        EngineError::InvalidConfig(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
