//! Replacement candidate search

use player_catalog::{CandidateQuery, PlayerCatalog, PlayerId, PlayerRecord, Position};
use squad_service::{SquadSlot, TeamBudget};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::SelectionPolicy;
use crate::models::TransferCandidate;

/// Finds eligible replacements for squad players
pub struct CandidateGenerator<'a> {
    catalog: &'a dyn PlayerCatalog,
    policy: &'a SelectionPolicy,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(catalog: &'a dyn PlayerCatalog, policy: &'a SelectionPolicy) -> Self {
        Self { catalog, policy }
    }

    /// Available players at `position` with enough minutes that the squad
    /// does not already own, best first
    pub fn for_position(&self, position: Position, owned: &BTreeSet<PlayerId>) -> Vec<Arc<PlayerRecord>> {
        let query = CandidateQuery {
            position,
            min_minutes: self.policy.candidate_min_minutes,
            exclude: owned.clone(),
            limit: self.policy.candidate_limit,
        };
        self.catalog.candidates(&query)
    }

    /// Pairs `slot` with every candidate the bank can pay for
    pub fn affordable(
        &self,
        slot: &SquadSlot,
        candidates: &[Arc<PlayerRecord>],
        budget: &TeamBudget,
    ) -> Vec<TransferCandidate> {
        candidates
            .iter()
            .map(|incoming| TransferCandidate::from_slot(slot, Arc::clone(incoming)))
            .filter(|candidate| budget.covers(candidate.cost_delta))
            .collect()
    }
}

impl SelectionPolicy {
    /// Whether a squad member is too valuable to suggest replacing
    pub fn is_essential(&self, player: &PlayerRecord) -> bool {
        player.total_points > self.essential_min_points
            && player.form > self.essential_min_form
            && player.selected_by_percent > self.essential_min_ownership
    }
}
