//! Predicted points gain and confidence

use player_catalog::PlayerRecord;

use crate::config::ConfidencePolicy;

/// Derives impact figures from a pair and its priority score
#[derive(Debug, Clone)]
pub struct ImpactEstimator {
    fixture_horizon: u32,
    policy: ConfidencePolicy,
}

impl ImpactEstimator {
    pub fn new(fixture_horizon: u32, policy: ConfidencePolicy) -> Self {
        Self { fixture_horizon, policy }
    }

    /// Points-per-game difference over the horizon, scaled by priority / 10
    pub fn predicted_points_gain(&self, outgoing: &PlayerRecord, incoming: &PlayerRecord, priority: f64) -> f64 {
        let base = (incoming.points_per_game - outgoing.points_per_game) * self.fixture_horizon as f64;
        let gain = base * (priority / 10.0);
        if gain.is_finite() {
            gain
        } else {
            0.0
        }
    }

    /// Confidence percentage, always within the policy's floor and ceiling
    pub fn confidence(&self, outgoing: &PlayerRecord, incoming: &PlayerRecord, priority: f64) -> f64 {
        let policy = &self.policy;
        let mut confidence = policy.baseline;

        if incoming.minutes > outgoing.minutes {
            confidence += policy.minutes_bonus;
        }
        if incoming.form > outgoing.form {
            confidence += policy.form_bonus;
        }
        if incoming.total_points > outgoing.total_points {
            confidence += policy.points_bonus;
        }

        let priority_influence = (priority / 10.0) * policy.priority_weight;
        if priority_influence.is_finite() {
            confidence += priority_influence;
        }

        if confidence.is_nan() {
            return policy.floor;
        }
        confidence.clamp(policy.floor, policy.ceiling)
    }
}
