use player_catalog::{PlayerCatalog, Position};
use squad_service::{SquadSlot, SquadSnapshot, SquadStore, TeamId, SQUAD_SIZE};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::candidates::CandidateGenerator;
use crate::classifier::SuggestionClassifier;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::estimator::ImpactEstimator;
use crate::models::{ScoredSuggestion, SuggestionRequest, TransferCandidate};
use crate::ranker;
use crate::reason::build_reason;
use crate::scorer::TransferScorer;

/// Wall-clock limit for one run
#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Deadline {
    fn check(&self, team_id: TeamId) -> Result<()> {
        if Instant::now() >= self.at {
            return Err(EngineError::DeadlineExceeded { team_id, budget_ms: self.budget.as_millis() as u64 });
        }
        Ok(())
    }
}

/// Transfer suggestion engine
///
/// Holds only configuration; every run reads an immutable catalog and squad
/// snapshot and returns a fresh result, so one engine can serve many teams
/// concurrently.
#[derive(Debug, Clone)]
pub struct TransferEngine {
    config: EngineConfig,
    scorer: TransferScorer,
    classifier: SuggestionClassifier,
    estimator: ImpactEstimator,
}

impl TransferEngine {
    /// Create an engine from a validated configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let scorer = TransferScorer::new(config.weights.clone());
        let estimator = ImpactEstimator::new(config.selection.fixture_horizon, config.confidence.clone());

        Ok(Self { config, scorer, classifier: SuggestionClassifier::new(), estimator })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ranked suggestions for a squad
    pub fn generate_suggestions(
        &self,
        catalog: &dyn PlayerCatalog,
        squad: &SquadSnapshot,
        request: &SuggestionRequest,
    ) -> Result<Vec<ScoredSuggestion>> {
        self.run(catalog, squad, request, None)
    }

    /// Like `generate_suggestions`, but abandons the run with
    /// `DeadlineExceeded` once `budget` has elapsed
    pub fn generate_with_deadline(
        &self,
        catalog: &dyn PlayerCatalog,
        squad: &SquadSnapshot,
        request: &SuggestionRequest,
        budget: Duration,
    ) -> Result<Vec<ScoredSuggestion>> {
        let deadline = Deadline { at: Instant::now() + budget, budget };
        self.run(catalog, squad, request, Some(deadline))
    }

    /// Look up a team's squad and generate its suggestions
    pub fn suggest_for_team(
        &self,
        catalog: &dyn PlayerCatalog,
        squads: &dyn SquadStore,
        team_id: TeamId,
        request: &SuggestionRequest,
    ) -> Result<Vec<ScoredSuggestion>> {
        let squad = squads.snapshot(team_id)?;
        self.generate_suggestions(catalog, &squad, request)
    }

    /// Score, classify and explain a single candidate
    pub fn assess(&self, candidate: TransferCandidate) -> ScoredSuggestion {
        let outgoing = &candidate.outgoing;
        let incoming = &candidate.incoming;

        let factors = self.scorer.factors(outgoing, incoming);
        let priority = self.scorer.priority(&factors);
        let kind = self.classifier.classify(&candidate, &self.config.selection);
        let gain = self.estimator.predicted_points_gain(outgoing, incoming, priority);
        let confidence = self.estimator.confidence(outgoing, incoming, priority);
        let reason = build_reason(&self.config.reasons, outgoing, incoming, &factors);

        ScoredSuggestion::new(candidate, kind, factors, priority, gain, confidence, reason)
    }

    fn run(
        &self,
        catalog: &dyn PlayerCatalog,
        squad: &SquadSnapshot,
        request: &SuggestionRequest,
        deadline: Option<Deadline>,
    ) -> Result<Vec<ScoredSuggestion>> {
        let _span = tracing::info_span!("team", team_id = squad.team_id).entered();
        let policy = &self.config.selection;
        let limit = self.config.effective_limit(request.max_suggestions);

        if !squad.is_complete() {
            warn!("Team {} has {} players (expected {})", squad.team_id, squad.slots.len(), SQUAD_SIZE);
        }

        let owned = squad.player_ids();
        let generator = CandidateGenerator::new(catalog, policy);
        let positions =
            Position::ALL.into_iter().filter(|p| request.position_filter.map_or(true, |f| f == *p));

        let mut pool = Vec::new();
        for position in positions {
            let slots: Vec<&SquadSlot> = squad
                .slots_in(position)
                .filter(|slot| {
                    let essential = policy.is_essential(&slot.player);
                    if essential {
                        debug!("Skipping essential player {} ({})", slot.player.id, slot.player.web_name);
                    }
                    !essential
                })
                .collect();

            if slots.is_empty() {
                continue;
            }

            let candidates = generator.for_position(position, &owned);
            debug!("{} candidates for {}", candidates.len(), position);

            for slot in slots {
                if let Some(deadline) = &deadline {
                    deadline.check(squad.team_id)?;
                }

                let scored: Vec<ScoredSuggestion> = generator
                    .affordable(slot, &candidates, &squad.budget)
                    .into_iter()
                    .map(|candidate| self.assess(candidate))
                    .filter(|s| s.priority_score() > policy.min_priority_score)
                    .collect();

                pool.extend(ranker::top_for_slot(scored, policy.per_slot_keep));
            }
        }

        let pooled = pool.len();
        let selected = ranker::select(pool, limit);

        info!(
            "Generated {} suggestions for team {} ({} pooled, limit {})",
            selected.len(),
            squad.team_id,
            pooled,
            limit
        );

        Ok(selected)
    }
}
