//! Error types for the suggestion service

use squad_service::TeamId;
use suggestion_store::StoreError;
use thiserror::Error;
use transfer_engine::EngineError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Team {team_id} did not finish within {budget_ms} ms")]
    Timeout { team_id: TeamId, budget_ms: u64 },

    #[error("Worker failed for team {team_id}: {reason}")]
    Worker { team_id: TeamId, reason: String },
}

impl ServiceError {
    /// Whether the team is unknown to the squad store
    pub fn is_team_not_found(&self) -> bool {
        matches!(self, ServiceError::Engine(EngineError::TeamNotFound(_)))
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
