//! Configuration for the transfer engine
//!
//! Every weight and threshold the engine consults lives here, so a scoring
//! profile can be swapped or tuned without touching the scorer.

use player_catalog::Price;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::{EngineError, Result};

/// Tolerance for the weights-sum-to-one check
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Configuration for the transfer engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Factor weights for the priority score
    pub weights: ScoringWeights,

    /// Candidate search, essential-player and ranking thresholds
    pub selection: SelectionPolicy,

    /// Confidence percentage policy
    pub confidence: ConfidencePolicy,

    /// Thresholds deciding which reasons are quoted
    pub reasons: ReasonPolicy,
}

/// Weights of the seven scoring factors; must sum to 1.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub form: f64,
    pub points_per_game: f64,
    pub value: f64,
    pub fixtures: f64,
    pub ownership: f64,
    pub ict: f64,
    pub expected_stats: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionPolicy {
    /// A squad member is essential when total points, form and ownership
    /// all exceed these
    pub essential_min_points: u32,
    pub essential_min_form: f64,
    pub essential_min_ownership: f64,

    /// Replacement candidates need at least this many minutes
    pub candidate_min_minutes: u32,

    /// Candidates considered per position
    pub candidate_limit: usize,

    /// Suggestions kept per outgoing player
    pub per_slot_keep: usize,

    /// Used when a request does not name a maximum
    pub default_max_suggestions: usize,

    /// Hard ceiling on returned suggestions
    pub max_suggestions_cap: usize,

    /// Fixtures covered by the predicted points gain
    pub fixture_horizon: u32,

    /// Cost delta above this classifies as an upgrade
    pub upgrade_margin: Price,

    /// Cost delta below the negation of this classifies as a downgrade
    pub downgrade_margin: Price,

    /// Form lead needed for a form-driven suggestion
    pub form_margin: f64,

    /// Suggestions must score strictly above this
    pub min_priority_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidencePolicy {
    pub baseline: f64,
    pub minutes_bonus: f64,
    pub form_bonus: f64,
    pub points_bonus: f64,

    /// Added as (priority / 10) * priority_weight
    pub priority_weight: f64,

    pub floor: f64,
    pub ceiling: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasonPolicy {
    /// Form sub-score above which form is quoted
    pub form_threshold: f64,

    /// Points-per-game sub-score above which ppg is quoted
    pub ppg_threshold: f64,

    /// Value sub-score above which value is quoted
    pub value_threshold: f64,

    /// Extra minutes the incoming player needs for "More game time"
    pub minutes_margin: u32,

    /// Maximum reasons joined into one string
    pub max_parts: usize,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            form: 0.25,
            points_per_game: 0.20,
            value: 0.15,
            fixtures: 0.15,
            ownership: 0.10,
            ict: 0.10,
            expected_stats: 0.05,
        }
    }
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            essential_min_points: 150,
            essential_min_form: 6.0,
            essential_min_ownership: 30.0,
            candidate_min_minutes: 300,
            candidate_limit: 50,
            per_slot_keep: 3,
            default_max_suggestions: 10,
            max_suggestions_cap: 50,
            fixture_horizon: 5,
            upgrade_margin: Price::from_tenths(5),
            downgrade_margin: Price::from_tenths(5),
            form_margin: 1.0,
            min_priority_score: 0.0,
        }
    }
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self {
            baseline: 50.0,
            minutes_bonus: 10.0,
            form_bonus: 15.0,
            points_bonus: 10.0,
            priority_weight: 15.0,
            floor: 20.0,
            ceiling: 95.0,
        }
    }
}

impl Default for ReasonPolicy {
    fn default() -> Self {
        Self {
            form_threshold: 2.0,
            ppg_threshold: 1.0,
            value_threshold: 2.0,
            minutes_margin: 200,
            max_parts: 3,
        }
    }
}

impl ScoringWeights {
    fn as_array(&self) -> [(&'static str, f64); 7] {
        [
            ("form", self.form),
            ("points_per_game", self.points_per_game),
            ("value", self.value),
            ("fixtures", self.fixtures),
            ("ownership", self.ownership),
            ("ict", self.ict),
            ("expected_stats", self.expected_stats),
        ]
    }

    /// Sum of all weights
    pub fn total(&self) -> f64 {
        self.as_array().iter().map(|(_, w)| w).sum()
    }

    pub fn validate(&self) -> Result<()> {
        for (name, weight) in self.as_array() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(EngineError::invalid_config(format!(
                    "weight '{name}' must be a finite non-negative number, got {weight}"
                )));
            }
        }

        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(EngineError::invalid_config(format!("weights must sum to 1.0, got {total}")));
        }

        Ok(())
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file; missing keys take defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by TRANSFER_* environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from TRANSFER_* environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        env_override("TRANSFER_WEIGHT_FORM", &mut self.weights.form)?;
        env_override("TRANSFER_WEIGHT_PPG", &mut self.weights.points_per_game)?;
        env_override("TRANSFER_WEIGHT_VALUE", &mut self.weights.value)?;
        env_override("TRANSFER_WEIGHT_FIXTURES", &mut self.weights.fixtures)?;
        env_override("TRANSFER_WEIGHT_OWNERSHIP", &mut self.weights.ownership)?;
        env_override("TRANSFER_WEIGHT_ICT", &mut self.weights.ict)?;
        env_override("TRANSFER_WEIGHT_EXPECTED", &mut self.weights.expected_stats)?;
        env_override("TRANSFER_MAX_SUGGESTIONS", &mut self.selection.default_max_suggestions)?;
        env_override("TRANSFER_CANDIDATE_MIN_MINUTES", &mut self.selection.candidate_min_minutes)?;
        env_override("TRANSFER_CANDIDATE_LIMIT", &mut self.selection.candidate_limit)?;
        env_override("TRANSFER_PER_SLOT_KEEP", &mut self.selection.per_slot_keep)?;
        Ok(())
    }

    /// Validate weights and thresholds
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;

        let selection = &self.selection;
        if selection.candidate_limit == 0 {
            return Err(EngineError::invalid_config("candidate_limit must be greater than 0"));
        }
        if selection.per_slot_keep == 0 {
            return Err(EngineError::invalid_config("per_slot_keep must be greater than 0"));
        }
        if selection.max_suggestions_cap == 0 {
            return Err(EngineError::invalid_config("max_suggestions_cap must be greater than 0"));
        }
        if selection.default_max_suggestions > selection.max_suggestions_cap {
            return Err(EngineError::invalid_config(format!(
                "default_max_suggestions ({}) exceeds max_suggestions_cap ({})",
                selection.default_max_suggestions, selection.max_suggestions_cap
            )));
        }
        if selection.upgrade_margin.is_negative() || selection.downgrade_margin.is_negative() {
            return Err(EngineError::invalid_config("upgrade/downgrade margins must not be negative"));
        }
        let thresholds = [
            selection.essential_min_form,
            selection.essential_min_ownership,
            selection.form_margin,
            selection.min_priority_score,
        ];
        if thresholds.iter().any(|t| !t.is_finite()) {
            return Err(EngineError::invalid_config("selection thresholds must be finite"));
        }

        let confidence = &self.confidence;
        if !(confidence.floor.is_finite() && confidence.ceiling.is_finite())
            || confidence.floor > confidence.ceiling
        {
            return Err(EngineError::invalid_config(format!(
                "confidence bounds invalid: floor {} ceiling {}",
                confidence.floor, confidence.ceiling
            )));
        }

        if self.reasons.max_parts == 0 {
            return Err(EngineError::invalid_config("reasons.max_parts must be greater than 0"));
        }

        Ok(())
    }

    /// Number of suggestions to return for a request
    pub fn effective_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.selection.default_max_suggestions)
            .min(self.selection.max_suggestions_cap)
    }
}

fn env_override<T: FromStr>(name: &str, target: &mut T) -> Result<()> {
    if let Ok(raw) = std::env::var(name) {
        *target = raw
            .trim()
            .parse()
            .map_err(|_| EngineError::invalid_config(format!("{name}: cannot parse '{raw}'")))?;
    }
    Ok(())
}
