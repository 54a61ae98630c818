//! Error types for SquadService

use player_catalog::{PlayerId, Price};
use thiserror::Error;

use crate::squad::TeamId;

#[derive(Error, Debug)]
pub enum SquadError {
    #[error("Team not found: {team_id}")]
    TeamNotFound { team_id: TeamId },

    #[error("Bank balance cannot be negative: {bank}")]
    NegativeBank { bank: Price },

    #[error("Team {team_id} references unknown player {player_id}")]
    UnknownPlayer { team_id: TeamId, player_id: PlayerId },

    #[error("Team {team_id} has invalid squad slot {slot} (expected 1-15)")]
    InvalidSlot { team_id: TeamId, slot: u8 },

    #[error("Team {team_id} has a negative price for player {player_id}")]
    NegativePrice { team_id: TeamId, player_id: PlayerId },

    #[error("Team {team_id} was rejected at load: {reason}")]
    Rejected { team_id: TeamId, reason: String },

    #[error("Team {team_id} holds player {player_id} twice")]
    DuplicatePick { team_id: TeamId, player_id: PlayerId },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
