//! Persisted suggestion rows

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A transfer suggestion as persisted for a team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionRecord {
    pub id: Uuid,
    pub team_id: u32,
    pub player_out_id: u32,
    pub player_in_id: u32,

    /// Category label (e.g., "upgrade", "injury")
    pub suggestion_type: String,

    pub reason: String,

    /// Two decimal places
    pub priority_score: Decimal,

    /// One decimal place; negative frees up money
    pub cost_change: Decimal,

    /// Expected points improvement over the fixture horizon
    pub predicted_points_gain: Decimal,

    /// Confidence percentage, 20-95
    pub confidence_score: Decimal,

    pub is_implemented: bool,
    pub implemented_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SuggestionRecord {
    /// Record that the manager made this transfer
    pub fn mark_implemented(&mut self, at: DateTime<Utc>) {
        self.is_implemented = true;
        self.implemented_at = Some(at);
    }
}

/// All suggestions currently held for a team, in rank order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSuggestions {
    pub team_id: u32,
    pub written_at: DateTime<Utc>,
    pub suggestions: Vec<SuggestionRecord>,
}
