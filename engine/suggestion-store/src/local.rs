//! Local file-based store construction

use crate::backend::LocalSuggestionStore;
use crate::config::StoreConfig;
use crate::error::Result;

/// Create a new local store with default configuration
pub fn create_local_store(data_dir: impl Into<std::path::PathBuf>) -> Result<LocalSuggestionStore> {
    LocalSuggestionStore::with_default_config(data_dir)
}

/// Create a new local store with custom configuration
pub fn create_local_store_with_config(config: StoreConfig) -> Result<LocalSuggestionStore> {
    LocalSuggestionStore::new(config)
}
