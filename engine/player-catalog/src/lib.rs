//! Player Catalog - read-only player statistics for transfer analysis
//!
//! The catalog holds one immutable snapshot of every player's price, season
//! totals, recent form, ownership and availability. Suggestion runs query it
//! for replacement candidates and never mutate it.

pub mod catalog;
pub mod error;
pub mod price;
pub mod types;

pub use catalog::{CandidateQuery, CatalogSnapshot, InMemoryCatalog, PlayerCatalog};
pub use error::{CatalogError, Result};
pub use price::Price;
pub use types::{ClubStrength, GameweekPoints, PlayerId, PlayerRecord, PlayerStatus, Position};
