//! Multi-factor transfer scoring
//!
//! Each factor compares the incoming player against the outgoing one and
//! maps the difference onto [0, 10]. The priority score is the weighted sum
//! of the seven factors.

use player_catalog::PlayerRecord;

use crate::config::ScoringWeights;
use crate::models::FactorScores;

/// Upper bound of every factor sub-score
pub const MAX_FACTOR_SCORE: f64 = 10.0;

/// Value sub-score when the outgoing player's value cannot be compared
pub const NEUTRAL_VALUE_SCORE: f64 = 5.0;

/// Weighted scorer for (outgoing, incoming) pairs
#[derive(Debug, Clone)]
pub struct TransferScorer {
    weights: ScoringWeights,
}

impl TransferScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// All seven sub-scores for a pair
    pub fn factors(&self, outgoing: &PlayerRecord, incoming: &PlayerRecord) -> FactorScores {
        FactorScores {
            form: form_score(outgoing, incoming),
            points_per_game: ppg_score(outgoing, incoming),
            value: value_score(outgoing, incoming),
            fixtures: fixture_score(outgoing, incoming),
            ownership: ownership_score(outgoing, incoming),
            ict: ict_score(outgoing, incoming),
            expected_stats: expected_stats_score(outgoing, incoming),
        }
    }

    /// Weighted sum of the sub-scores
    pub fn priority(&self, factors: &FactorScores) -> f64 {
        let w = &self.weights;
        let priority = factors.form * w.form
            + factors.points_per_game * w.points_per_game
            + factors.value * w.value
            + factors.fixtures * w.fixtures
            + factors.ownership * w.ownership
            + factors.ict * w.ict
            + factors.expected_stats * w.expected_stats;

        if priority.is_finite() {
            priority
        } else {
            0.0
        }
    }
}

/// Clamp to [0, 10]; NaN maps to 0
pub fn clamp_factor(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, MAX_FACTOR_SCORE)
}

pub fn form_score(outgoing: &PlayerRecord, incoming: &PlayerRecord) -> f64 {
    clamp_factor((incoming.form - outgoing.form) * 2.0)
}

pub fn ppg_score(outgoing: &PlayerRecord, incoming: &PlayerRecord) -> f64 {
    clamp_factor(incoming.points_per_game - outgoing.points_per_game)
}

pub fn value_score(outgoing: &PlayerRecord, incoming: &PlayerRecord) -> f64 {
    let out_value = outgoing.value_score();
    if out_value == 0.0 || !out_value.is_finite() {
        return NEUTRAL_VALUE_SCORE;
    }
    clamp_factor((incoming.value_score() / out_value - 1.0) * 10.0)
}

/// Static club attack rating difference; upcoming opponents are not inspected
pub fn fixture_score(outgoing: &PlayerRecord, incoming: &PlayerRecord) -> f64 {
    clamp_factor((incoming.club.attack_strength() - outgoing.club.attack_strength()) / 100.0)
}

/// Rewards moving to a less-owned player
pub fn ownership_score(outgoing: &PlayerRecord, incoming: &PlayerRecord) -> f64 {
    let diff = incoming.selected_by_percent - outgoing.selected_by_percent;
    if diff < 0.0 {
        clamp_factor(diff.abs() / 2.0)
    } else {
        clamp_factor(5.0 - diff / 4.0)
    }
}

pub fn ict_score(outgoing: &PlayerRecord, incoming: &PlayerRecord) -> f64 {
    clamp_factor((incoming.ict_index - outgoing.ict_index) / 5.0)
}

pub fn expected_stats_score(outgoing: &PlayerRecord, incoming: &PlayerRecord) -> f64 {
    clamp_factor((incoming.expected_involvement() - outgoing.expected_involvement()) * 2.0)
}
