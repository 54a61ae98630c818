//! # Suggestion Store
//!
//! Persistence for computed transfer suggestions. Every write replaces a
//! team's whole suggestion set in one step, so readers never observe a mix
//! of old and new suggestions.
//!
//! ## Architecture
//!
//! - **SuggestionPersister**: Abstract trait for storage backends
//! - **InMemorySuggestionStore**: Map guarded by a single lock
//! - **LocalSuggestionStore**: One JSON file per team, replaced via rename
//!
//! ## Usage
//!
//! ```rust
//! use suggestion_store::{InMemorySuggestionStore, SuggestionPersister};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut store = InMemorySuggestionStore::new();
//!     store.initialize().await?;
//!
//!     let written = store.replace_suggestions(42, Vec::new()).await?;
//!     assert_eq!(written, 0);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod local;
pub mod record;

pub use backend::{InMemorySuggestionStore, LocalSuggestionStore, SuggestionPersister};
pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use local::{create_local_store, create_local_store_with_config};
pub use record::{SuggestionRecord, TeamSuggestions};
