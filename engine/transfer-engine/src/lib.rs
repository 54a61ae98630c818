//! Transfer Engine
//!
//! Proposes (outgoing, incoming) player pairs for a squad, ranked by
//! expected benefit. A run is a single synchronous pass:
//!
//! 1. skip essential squad members
//! 2. search same-position candidates the bank can pay for
//! 3. score each pair on seven weighted factors
//! 4. classify it and estimate gain and confidence
//! 5. keep the best three per outgoing player
//! 6. rank the pool and truncate to the requested count
//!
//! The engine keeps no state between runs; given the same catalog, squad and
//! configuration it returns identical output.

pub mod analytics;
pub mod candidates;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod estimator;
pub mod models;
pub mod ranker;
pub mod reason;
pub mod scorer;

#[cfg(test)]
mod tests;

pub use analytics::{performance_trend, player_trend, position_analysis, PerformanceTrend, PositionAnalysis, Trend};
pub use candidates::CandidateGenerator;
pub use classifier::{ClassificationRule, SuggestionClassifier, CLASSIFICATION_RULES};
pub use config::{ConfidencePolicy, EngineConfig, ReasonPolicy, ScoringWeights, SelectionPolicy};
pub use engine::TransferEngine;
pub use error::{EngineError, Result};
pub use estimator::ImpactEstimator;
pub use models::{FactorScores, ScoredSuggestion, SuggestionKind, SuggestionRequest, TransferCandidate};
pub use scorer::TransferScorer;
