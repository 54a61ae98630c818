//! SquadService - squad snapshots and budgets
//!
//! This crate provides the read side of a team's roster: the fifteen squad
//! slots a team holds, what each player would sell for, and how much money
//! sits in the bank. Snapshots are immutable once handed out.

pub mod error;
pub mod squad;
pub mod store;

pub use error::SquadError;
pub use squad::{SquadSlot, SquadSnapshot, TeamBudget, TeamId, SQUAD_SIZE, STARTING_SLOTS};
pub use store::{InMemorySquadStore, PickEntry, SquadFile, SquadStore, TeamEntry};

// Result type alias
pub type Result<T> = std::result::Result<T, SquadError>;
