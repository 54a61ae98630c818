use chrono::{DateTime, Utc};
use player_catalog::{PlayerRecord, Position, Price};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use squad_service::{SquadSlot, TeamId};
use std::fmt;
use std::sync::Arc;
use suggestion_store::SuggestionRecord;
use uuid::Uuid;

/// Category of a transfer suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Upgrade,
    Downgrade,
    Injury,
    Form,
    Sideways,
}

impl SuggestionKind {
    pub fn label(&self) -> &'static str {
        match self {
            SuggestionKind::Upgrade => "upgrade",
            SuggestionKind::Downgrade => "downgrade",
            SuggestionKind::Injury => "injury",
            SuggestionKind::Form => "form",
            SuggestionKind::Sideways => "sideways",
        }
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Caller options for one suggestion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRequest {
    /// Defaults to the configured maximum when absent
    pub max_suggestions: Option<usize>,

    /// Only analyse squad slots holding this position
    pub position_filter: Option<Position>,
}

impl SuggestionRequest {
    pub fn new(max_suggestions: usize) -> Self {
        Self { max_suggestions: Some(max_suggestions), position_filter: None }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position_filter = Some(position);
        self
    }
}

/// An (outgoing, incoming) pair before scoring
#[derive(Debug, Clone, Serialize)]
pub struct TransferCandidate {
    pub outgoing: Arc<PlayerRecord>,
    pub incoming: Arc<PlayerRecord>,

    /// What the outgoing player sells for
    pub sale_price: Price,

    /// Incoming price minus outgoing sale price
    pub cost_delta: Price,
}

impl TransferCandidate {
    pub fn from_slot(slot: &SquadSlot, incoming: Arc<PlayerRecord>) -> Self {
        let cost_delta = incoming.price - slot.selling_price;
        Self { outgoing: Arc::clone(&slot.player), incoming, sale_price: slot.selling_price, cost_delta }
    }
}

/// The seven factor sub-scores, each in [0, 10]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorScores {
    pub form: f64,
    pub points_per_game: f64,
    pub value: f64,
    pub fixtures: f64,
    pub ownership: f64,
    pub ict: f64,
    pub expected_stats: f64,
}

/// A fully assessed transfer suggestion
///
/// Built in one step by the engine and never modified afterwards. Scores
/// are rounded to two decimals and always finite.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredSuggestion {
    candidate: TransferCandidate,
    kind: SuggestionKind,
    factors: FactorScores,
    priority_score: f64,
    predicted_points_gain: f64,
    confidence: f64,
    reason: String,
}

impl ScoredSuggestion {
    pub(crate) fn new(
        candidate: TransferCandidate,
        kind: SuggestionKind,
        factors: FactorScores,
        priority_score: f64,
        predicted_points_gain: f64,
        confidence: f64,
        reason: String,
    ) -> Self {
        Self {
            candidate,
            kind,
            factors,
            priority_score: round2(priority_score),
            predicted_points_gain: round2(predicted_points_gain),
            confidence: round2(confidence),
            reason,
        }
    }

    pub fn candidate(&self) -> &TransferCandidate {
        &self.candidate
    }

    pub fn outgoing(&self) -> &PlayerRecord {
        &self.candidate.outgoing
    }

    pub fn incoming(&self) -> &PlayerRecord {
        &self.candidate.incoming
    }

    pub fn cost_delta(&self) -> Price {
        self.candidate.cost_delta
    }

    pub fn kind(&self) -> SuggestionKind {
        self.kind
    }

    pub fn factors(&self) -> &FactorScores {
        &self.factors
    }

    pub fn priority_score(&self) -> f64 {
        self.priority_score
    }

    pub fn predicted_points_gain(&self) -> f64 {
        self.predicted_points_gain
    }

    /// Confidence percentage
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Predicted gain per unit of money spent; the gain itself for a
    /// cost-neutral transfer
    pub fn expected_roi(&self) -> f64 {
        let delta = self.candidate.cost_delta;
        if delta.is_zero() {
            return self.predicted_points_gain;
        }
        self.predicted_points_gain / delta.abs().to_units()
    }

    /// Persisted form of this suggestion
    pub fn to_record(&self, team_id: TeamId, created_at: DateTime<Utc>) -> SuggestionRecord {
        SuggestionRecord {
            id: Uuid::new_v4(),
            team_id,
            player_out_id: self.candidate.outgoing.id,
            player_in_id: self.candidate.incoming.id,
            suggestion_type: self.kind.label().to_string(),
            reason: self.reason.clone(),
            priority_score: to_decimal(self.priority_score),
            cost_change: self.candidate.cost_delta.to_decimal(),
            predicted_points_gain: to_decimal(self.predicted_points_gain),
            confidence_score: to_decimal(self.confidence),
            is_implemented: false,
            implemented_at: None,
            created_at,
        }
    }
}

/// Round to two decimals; non-finite values become zero
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).map(|d| d.round_dp(2)).unwrap_or(Decimal::ZERO)
}
