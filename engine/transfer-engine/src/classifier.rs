//! Suggestion classification
//!
//! Rules are evaluated in order and the first match wins. Money moves
//! outrank availability, and availability outranks form.

use crate::config::SelectionPolicy;
use crate::models::{SuggestionKind, TransferCandidate};

/// Predicate deciding whether a rule applies to a candidate
pub type RulePredicate = fn(&TransferCandidate, &SelectionPolicy) -> bool;

/// One (predicate, label) entry in the precedence chain
#[derive(Clone, Copy)]
pub struct ClassificationRule {
    pub kind: SuggestionKind,
    pub description: &'static str,
    pub predicate: RulePredicate,
}

impl std::fmt::Debug for ClassificationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassificationRule")
            .field("kind", &self.kind)
            .field("description", &self.description)
            .finish()
    }
}

/// Precedence chain; the last rule always matches
pub const CLASSIFICATION_RULES: [ClassificationRule; 5] = [
    ClassificationRule {
        kind: SuggestionKind::Upgrade,
        description: "cost delta above the upgrade margin",
        predicate: costs_more,
    },
    ClassificationRule {
        kind: SuggestionKind::Downgrade,
        description: "cost delta below the negated downgrade margin",
        predicate: frees_money,
    },
    ClassificationRule {
        kind: SuggestionKind::Injury,
        description: "outgoing player not available",
        predicate: outgoing_unavailable,
    },
    ClassificationRule {
        kind: SuggestionKind::Form,
        description: "incoming form leads by more than the form margin",
        predicate: better_form,
    },
    ClassificationRule {
        kind: SuggestionKind::Sideways,
        description: "fallback",
        predicate: always,
    },
];

fn costs_more(c: &TransferCandidate, policy: &SelectionPolicy) -> bool {
    c.cost_delta > policy.upgrade_margin
}

fn frees_money(c: &TransferCandidate, policy: &SelectionPolicy) -> bool {
    c.cost_delta < -policy.downgrade_margin
}

fn outgoing_unavailable(c: &TransferCandidate, _: &SelectionPolicy) -> bool {
    !c.outgoing.is_available()
}

fn better_form(c: &TransferCandidate, policy: &SelectionPolicy) -> bool {
    c.incoming.form > c.outgoing.form + policy.form_margin
}

fn always(_: &TransferCandidate, _: &SelectionPolicy) -> bool {
    true
}

/// Labels candidates using an ordered rule list
#[derive(Debug, Clone)]
pub struct SuggestionClassifier {
    rules: Vec<ClassificationRule>,
}

impl Default for SuggestionClassifier {
    fn default() -> Self {
        Self { rules: CLASSIFICATION_RULES.to_vec() }
    }
}

impl SuggestionClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// First matching rule's kind; `Sideways` if nothing matches
    pub fn classify(&self, candidate: &TransferCandidate, policy: &SelectionPolicy) -> SuggestionKind {
        self.rules
            .iter()
            .find(|rule| (rule.predicate)(candidate, policy))
            .map(|rule| rule.kind)
            .unwrap_or(SuggestionKind::Sideways)
    }
}
