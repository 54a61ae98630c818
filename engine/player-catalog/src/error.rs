//! Error types for the player catalog

use thiserror::Error;

use crate::types::PlayerId;

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Player {player_id} references unknown club {club_id}")]
    UnknownClub { player_id: PlayerId, club_id: u32 },

    #[error("Player {0} appears more than once in the catalog")]
    DuplicatePlayer(PlayerId),

    #[error("Unknown position: {0}")]
    UnknownPosition(String),

    #[error("Unknown player status: {0}")]
    UnknownStatus(String),

    #[error("Invalid price for player {player_id}: {reason}")]
    InvalidPrice { player_id: PlayerId, reason: String },
}
