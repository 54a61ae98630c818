//! Per-team suggestion runs and their persistence

use anyhow::{Context, Result as AnyResult};
use chrono::{DateTime, Utc};
use player_catalog::{InMemoryCatalog, PlayerCatalog};
use serde::Serialize;
use squad_service::{InMemorySquadStore, SquadStore, TeamId};
use std::sync::Arc;
use std::time::{Duration, Instant};
use suggestion_store::{create_local_store_with_config, SuggestionPersister, SuggestionRecord};
use tracing::{debug, info, warn};
use transfer_engine::{EngineError, ScoredSuggestion, SuggestionRequest, TransferEngine};
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};

/// Outcome of one team's run
#[derive(Debug, Clone, Serialize)]
pub struct TeamRun {
    pub team_id: TeamId,
    pub generated_at: DateTime<Utc>,
    pub suggestions: Vec<ScoredSuggestion>,
    pub persisted: usize,
    pub elapsed_ms: u64,
}

/// Runs the engine against loaded catalog and squad data and keeps the
/// latest suggestion set per team
pub struct SuggestionService {
    engine: Arc<TransferEngine>,
    catalog: Arc<dyn PlayerCatalog>,
    squads: Arc<dyn SquadStore>,
    store: Arc<dyn SuggestionPersister>,
    team_budget: Duration,
}

impl SuggestionService {
    pub fn new(
        engine: TransferEngine,
        catalog: Arc<dyn PlayerCatalog>,
        squads: Arc<dyn SquadStore>,
        store: Arc<dyn SuggestionPersister>,
        team_budget: Duration,
    ) -> Self {
        Self { engine: Arc::new(engine), catalog, squads, store, team_budget }
    }

    /// Load data files, open the local store and build the engine
    pub async fn from_config(config: &ServiceConfig) -> AnyResult<Self> {
        info!("Initializing suggestion service...");

        let catalog = InMemoryCatalog::load_from_file(&config.data.catalog_path)
            .await
            .context("Failed to load player catalog")?;

        let squads = InMemorySquadStore::load_from_file(&config.data.squads_path, &catalog)
            .await
            .context("Failed to load squads")?;

        let mut store = create_local_store_with_config(config.store.clone())
            .context("Failed to create suggestion store")?;
        store.initialize().await.context("Failed to initialize suggestion store")?;

        let engine =
            TransferEngine::new(config.engine.clone()).context("Failed to create transfer engine")?;

        info!("Service ready: {} players, {} teams", catalog.len(), squads.len());

        Ok(Self::new(
            engine,
            Arc::new(catalog),
            Arc::new(squads),
            Arc::new(store),
            config.runner.team_budget(),
        ))
    }

    pub fn engine(&self) -> &TransferEngine {
        &self.engine
    }

    pub fn catalog(&self) -> &dyn PlayerCatalog {
        self.catalog.as_ref()
    }

    pub fn team_budget(&self) -> Duration {
        self.team_budget
    }

    /// Every team known to the squad store
    pub fn team_ids(&self) -> Vec<TeamId> {
        self.squads.team_ids()
    }

    /// Generate suggestions for a team within the per-team budget and
    /// replace its stored set
    pub async fn generate_for_team(&self, team_id: TeamId, request: &SuggestionRequest) -> Result<TeamRun> {
        let started = Instant::now();
        let budget = self.team_budget;

        let engine = Arc::clone(&self.engine);
        let catalog = Arc::clone(&self.catalog);
        let squads = Arc::clone(&self.squads);
        let owned_request = request.clone();

        let task = tokio::task::spawn_blocking(move || -> transfer_engine::Result<Vec<ScoredSuggestion>> {
            let squad = squads.snapshot(team_id)?;
            engine.generate_with_deadline(catalog.as_ref(), &squad, &owned_request, budget)
        });

        let budget_ms = budget.as_millis() as u64;
        let suggestions = match tokio::time::timeout(budget, task).await {
            Err(_) => {
                warn!("Team {} exceeded its {} ms budget", team_id, budget_ms);
                return Err(ServiceError::Timeout { team_id, budget_ms });
            }
            Ok(Err(join_error)) => {
                return Err(ServiceError::Worker { team_id, reason: join_error.to_string() });
            }
            Ok(Ok(Err(EngineError::DeadlineExceeded { team_id, budget_ms }))) => {
                warn!("Team {} exceeded its {} ms budget", team_id, budget_ms);
                return Err(ServiceError::Timeout { team_id, budget_ms });
            }
            Ok(Ok(result)) => result?,
        };

        let generated_at = Utc::now();
        let records: Vec<SuggestionRecord> =
            suggestions.iter().map(|s| s.to_record(team_id, generated_at)).collect();
        let persisted = self.store.replace_suggestions(team_id, records).await?;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        debug!("Team {} finished in {} ms", team_id, elapsed_ms);

        Ok(TeamRun { team_id, generated_at, suggestions, persisted, elapsed_ms })
    }

    /// Stored suggestions for a team, highest priority first
    pub async fn suggestions_for_team(&self, team_id: TeamId) -> Result<Vec<SuggestionRecord>> {
        let mut records = self.store.load_suggestions(team_id).await?;
        records.sort_by(|a, b| b.priority_score.cmp(&a.priority_score));
        Ok(records)
    }

    /// Record that a team made a suggested transfer
    pub async fn mark_implemented(&self, team_id: TeamId, suggestion_id: Uuid) -> Result<()> {
        self.store.mark_implemented(team_id, suggestion_id).await?;
        info!("Marked suggestion {} implemented for team {}", suggestion_id, team_id);
        Ok(())
    }

    /// Remove stored suggestions older than `retention_days`
    pub async fn cleanup(&self, retention_days: u32) -> Result<usize> {
        let cutoff = Utc::now() - chrono::Duration::days(i64::from(retention_days));
        let removed = self.store.cleanup_older_than(cutoff).await?;
        info!("Removed {} suggestions created before {}", removed, cutoff);
        Ok(removed)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use player_catalog::{ClubStrength, PlayerRecord, PlayerStatus, Position, Price};
    use squad_service::{PickEntry, SquadFile, TeamEntry};
    use suggestion_store::InMemorySuggestionStore;

    fn player(id: u32, position: Position, form: f64) -> PlayerRecord {
        PlayerRecord {
            id,
            web_name: format!("Player{id}"),
            position,
            status: PlayerStatus::Available,
            club: ClubStrength::new(1, "TST", 1000, 1000),
            price: Price::from_units(6.0),
            total_points: 50,
            form,
            points_per_game: 3.5,
            selected_by_percent: 8.0,
            minutes: 900,
            ict_index: 35.0,
            expected_goals: 1.0,
            expected_assists: 1.0,
        }
    }

    fn team(team_id: TeamId, player_id: u32) -> TeamEntry {
        TeamEntry {
            team_id,
            team_name: format!("Team {team_id}"),
            bank: Price::ZERO,
            squad_value: Some(Price::from_units(100.0)),
            picks: vec![PickEntry {
                player_id,
                purchase_price: Price::from_units(6.0),
                selling_price: Price::from_units(6.0),
                slot: 7,
                is_captain: false,
                is_vice_captain: false,
            }],
        }
    }

    /// Teams 10 and 20 own different midfielders, each with alternatives;
    /// team 30 picks a player missing from the catalog and is rejected
    pub(crate) async fn service(budget: Duration) -> SuggestionService {
        let players = vec![
            player(1, Position::Midfielder, 2.0),
            player(2, Position::Midfielder, 6.0),
            player(3, Position::Midfielder, 3.0),
        ];
        let catalog = InMemoryCatalog::from_players(players).unwrap();

        let file = SquadFile { teams: vec![team(10, 1), team(20, 3), team(30, 77)] };
        let squads = InMemorySquadStore::from_squad_file(file, &catalog);

        let mut store = InMemorySuggestionStore::new();
        store.initialize().await.unwrap();

        let engine = TransferEngine::new(Default::default()).unwrap();
        SuggestionService::new(engine, Arc::new(catalog), Arc::new(squads), Arc::new(store), budget)
    }

    #[tokio::test]
    async fn test_generate_persists_suggestions() {
        let service = service(Duration::from_secs(5)).await;

        let run = service.generate_for_team(10, &SuggestionRequest::default()).await.unwrap();
        assert_eq!(run.team_id, 10);
        assert!(!run.suggestions.is_empty());
        assert_eq!(run.persisted, run.suggestions.len());

        let stored = service.suggestions_for_team(10).await.unwrap();
        assert_eq!(stored.len(), run.persisted);
        assert!(stored.iter().all(|r| r.team_id == 10 && r.player_out_id == 1));
        assert_eq!(stored[0].player_in_id, run.suggestions[0].incoming().id);
    }

    #[tokio::test]
    async fn test_regenerate_replaces_previous_set() {
        let service = service(Duration::from_secs(5)).await;

        let first = service.generate_for_team(10, &SuggestionRequest::default()).await.unwrap();
        let second = service.generate_for_team(10, &SuggestionRequest::default()).await.unwrap();

        let stored = service.suggestions_for_team(10).await.unwrap();
        assert_eq!(stored.len(), second.persisted);
        assert_eq!(first.persisted, second.persisted);
    }

    #[tokio::test]
    async fn test_unknown_team() {
        let service = service(Duration::from_secs(5)).await;
        let err = service.generate_for_team(99, &SuggestionRequest::default()).await.unwrap_err();
        assert!(err.is_team_not_found());
    }

    #[tokio::test]
    async fn test_rejected_team_fails_alone() {
        let service = service(Duration::from_secs(5)).await;
        assert_eq!(service.team_ids(), vec![10, 20, 30]);

        let err = service.generate_for_team(30, &SuggestionRequest::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Engine(EngineError::Squad(_))));
        assert!(!err.is_team_not_found());

        assert!(service.generate_for_team(20, &SuggestionRequest::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_zero_budget_times_out() {
        let service = service(Duration::ZERO).await;
        let err = service.generate_for_team(10, &SuggestionRequest::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Timeout { team_id: 10, budget_ms: 0 }));
        assert!(service.suggestions_for_team(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mark_implemented_and_cleanup() {
        let service = service(Duration::from_secs(5)).await;
        service.generate_for_team(10, &SuggestionRequest::default()).await.unwrap();

        let stored = service.suggestions_for_team(10).await.unwrap();
        service.mark_implemented(10, stored[0].id).await.unwrap();

        let reloaded = service.suggestions_for_team(10).await.unwrap();
        let marked = reloaded.iter().find(|r| r.id == stored[0].id).unwrap();
        assert!(marked.is_implemented);
        assert!(marked.implemented_at.is_some());

        assert_eq!(service.cleanup(7).await.unwrap(), 0);
        assert!(service.mark_implemented(10, Uuid::new_v4()).await.is_err());
    }
}
