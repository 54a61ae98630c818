//! Suggestion persister trait and implementations

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::record::{SuggestionRecord, TeamSuggestions};

/// Abstract trait for suggestion storage backends
#[async_trait::async_trait]
pub trait SuggestionPersister: Send + Sync {
    /// Initialize the backend
    async fn initialize(&mut self) -> Result<()>;

    /// Atomically replace a team's suggestion set; returns the count written
    async fn replace_suggestions(&self, team_id: u32, records: Vec<SuggestionRecord>) -> Result<usize>;

    /// Current suggestions for a team, in rank order
    async fn load_suggestions(&self, team_id: u32) -> Result<Vec<SuggestionRecord>>;

    /// Mark one suggestion as implemented
    async fn mark_implemented(&self, team_id: u32, suggestion_id: Uuid) -> Result<()>;

    /// Remove suggestions created before `cutoff`; returns the count removed
    async fn cleanup_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize>;
}

fn not_initialized() -> StoreError {
    StoreError::invalid_operation("Suggestion store not initialized")
}

/// In-memory backend; a replace happens under one write lock
pub struct InMemorySuggestionStore {
    teams: Arc<RwLock<BTreeMap<u32, Vec<SuggestionRecord>>>>,
    initialized: bool,
}

impl InMemorySuggestionStore {
    pub fn new() -> Self {
        Self { teams: Arc::new(RwLock::new(BTreeMap::new())), initialized: false }
    }
}

impl Default for InMemorySuggestionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SuggestionPersister for InMemorySuggestionStore {
    async fn initialize(&mut self) -> Result<()> {
        if !self.initialized {
            self.initialized = true;
            tracing::info!("In-memory suggestion store initialized");
        }
        Ok(())
    }

    async fn replace_suggestions(&self, team_id: u32, records: Vec<SuggestionRecord>) -> Result<usize> {
        if !self.initialized {
            return Err(not_initialized());
        }

        let count = records.len();
        let mut teams = self.teams.write().await;
        teams.insert(team_id, records);

        tracing::debug!("Replaced suggestions for team {}: {} written", team_id, count);
        Ok(count)
    }

    async fn load_suggestions(&self, team_id: u32) -> Result<Vec<SuggestionRecord>> {
        if !self.initialized {
            return Err(not_initialized());
        }

        let teams = self.teams.read().await;
        Ok(teams.get(&team_id).cloned().unwrap_or_default())
    }

    async fn mark_implemented(&self, team_id: u32, suggestion_id: Uuid) -> Result<()> {
        if !self.initialized {
            return Err(not_initialized());
        }

        let mut teams = self.teams.write().await;
        let record = teams
            .get_mut(&team_id)
            .and_then(|records| records.iter_mut().find(|r| r.id == suggestion_id))
            .ok_or_else(|| StoreError::not_found(format!("suggestion {suggestion_id} for team {team_id}")))?;

        record.mark_implemented(Utc::now());
        Ok(())
    }

    async fn cleanup_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        if !self.initialized {
            return Err(not_initialized());
        }

        let mut teams = self.teams.write().await;
        let mut removed = 0;
        for records in teams.values_mut() {
            let before = records.len();
            records.retain(|r| r.created_at >= cutoff);
            removed += before - records.len();
        }
        Ok(removed)
    }
}

/// Local file-based backend: one JSON file per team
///
/// A replace writes a temporary file next to the team's file and renames it
/// over the original, so a crash mid-write leaves the previous set intact.
pub struct LocalSuggestionStore {
    config: StoreConfig,
    team_locks: DashMap<u32, Arc<Mutex<()>>>,
    initialized: bool,
}

impl LocalSuggestionStore {
    /// Create a new local store
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate().map_err(StoreError::config)?;
        Ok(Self { config, team_locks: DashMap::new(), initialized: false })
    }

    /// Create a new local store with default config
    pub fn with_default_config(data_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::new(StoreConfig::new(data_dir))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    fn team_lock(&self, team_id: u32) -> Arc<Mutex<()>> {
        self.team_locks.entry(team_id).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
    }

    async fn read_team(&self, team_id: u32) -> Result<Option<TeamSuggestions>> {
        let path = self.config.team_file(team_id);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn write_team(&self, team: &TeamSuggestions) -> Result<()> {
        let path = self.config.team_file(team.team_id);
        let tmp_path = path.with_extension("json.tmp");

        let content = if self.config.pretty {
            serde_json::to_string_pretty(team)?
        } else {
            serde_json::to_string(team)?
        };

        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, &path).await?;
        Ok(())
    }

    fn team_id_from_path(path: &Path) -> Option<u32> {
        path.file_name()?.to_str()?.strip_prefix("team_")?.strip_suffix(".json")?.parse().ok()
    }
}

#[async_trait::async_trait]
impl SuggestionPersister for LocalSuggestionStore {
    async fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        tokio::fs::create_dir_all(&self.config.data_dir).await?;
        self.initialized = true;

        tracing::info!("Local suggestion store initialized at: {:?}", self.config.data_dir);
        Ok(())
    }

    async fn replace_suggestions(&self, team_id: u32, records: Vec<SuggestionRecord>) -> Result<usize> {
        if !self.initialized {
            return Err(not_initialized());
        }

        let lock = self.team_lock(team_id);
        let _guard = lock.lock().await;

        let count = records.len();
        let team = TeamSuggestions { team_id, written_at: Utc::now(), suggestions: records };
        self.write_team(&team).await?;

        tracing::debug!("Replaced suggestions for team {}: {} written", team_id, count);
        Ok(count)
    }

    async fn load_suggestions(&self, team_id: u32) -> Result<Vec<SuggestionRecord>> {
        if !self.initialized {
            return Err(not_initialized());
        }

        Ok(self.read_team(team_id).await?.map(|t| t.suggestions).unwrap_or_default())
    }

    async fn mark_implemented(&self, team_id: u32, suggestion_id: Uuid) -> Result<()> {
        if !self.initialized {
            return Err(not_initialized());
        }

        let lock = self.team_lock(team_id);
        let _guard = lock.lock().await;

        let mut team = self
            .read_team(team_id)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("suggestions for team {team_id}")))?;

        let record = team
            .suggestions
            .iter_mut()
            .find(|r| r.id == suggestion_id)
            .ok_or_else(|| StoreError::not_found(format!("suggestion {suggestion_id} for team {team_id}")))?;
        record.mark_implemented(Utc::now());

        self.write_team(&team).await
    }

    async fn cleanup_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        if !self.initialized {
            return Err(not_initialized());
        }

        let mut team_ids = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.config.data_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if let Some(team_id) = Self::team_id_from_path(&entry.path()) {
                team_ids.push(team_id);
            }
        }
        team_ids.sort_unstable();

        let mut removed = 0;
        for team_id in team_ids {
            let lock = self.team_lock(team_id);
            let _guard = lock.lock().await;

            let Some(mut team) = self.read_team(team_id).await? else {
                continue;
            };

            let before = team.suggestions.len();
            team.suggestions.retain(|r| r.created_at >= cutoff);
            let dropped = before - team.suggestions.len();

            if dropped > 0 {
                self.write_team(&team).await?;
                removed += dropped;
            }
        }

        tracing::info!("Suggestion cleanup removed {} records older than {}", removed, cutoff);
        Ok(removed)
    }
}
