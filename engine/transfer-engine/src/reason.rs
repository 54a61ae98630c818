//! Human-readable suggestion reasons

use player_catalog::PlayerRecord;

use crate::config::ReasonPolicy;
use crate::models::FactorScores;

/// Used when no specific reason applies
pub const FALLBACK_REASON: &str = "Potential upgrade based on overall statistics";

const SEPARATOR: &str = "; ";

/// Short explanation of why `incoming` beats `outgoing`, at most
/// `max_parts` reasons joined by "; "
pub fn build_reason(
    policy: &ReasonPolicy,
    outgoing: &PlayerRecord,
    incoming: &PlayerRecord,
    factors: &FactorScores,
) -> String {
    let mut parts = Vec::new();

    if factors.form > policy.form_threshold {
        parts.push(format!("Better recent form ({:.1} vs {:.1})", incoming.form, outgoing.form));
    }
    if factors.points_per_game > policy.ppg_threshold {
        parts.push(format!(
            "Higher points per game ({:.1} vs {:.1})",
            incoming.points_per_game, outgoing.points_per_game
        ));
    }
    if factors.value > policy.value_threshold {
        parts.push("Better value for money".to_string());
    }
    if incoming.minutes > outgoing.minutes.saturating_add(policy.minutes_margin) {
        parts.push("More game time".to_string());
    }
    if !outgoing.is_available() {
        parts.push(format!("Current player is {}", outgoing.status));
    }

    if parts.is_empty() {
        return FALLBACK_REASON.to_string();
    }

    parts.truncate(policy.max_parts);
    parts.join(SEPARATOR)
}
