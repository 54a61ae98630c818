//! Squad slots, budgets and snapshots

use player_catalog::{PlayerId, PlayerRecord, Position, Price};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::error::SquadError;
use crate::Result;

/// Identifier of a user's team
pub type TeamId = u32;

/// Full squad size (11 starters + 4 bench)
pub const SQUAD_SIZE: usize = 15;

/// Slots 1..=11 are the starting eleven
pub const STARTING_SLOTS: u8 = 11;

/// One of the fifteen roster positions a team occupies
#[derive(Debug, Clone, Serialize)]
pub struct SquadSlot {
    pub player: Arc<PlayerRecord>,

    /// Price paid when the player was bought
    pub purchase_price: Price,

    /// What the player would sell for now (may differ from market price)
    pub selling_price: Price,

    /// Slot number, 1-15
    pub slot: u8,

    pub is_captain: bool,
    pub is_vice_captain: bool,
}

impl SquadSlot {
    pub fn is_starter(&self) -> bool {
        self.slot <= STARTING_SLOTS
    }

    pub fn is_bench(&self) -> bool {
        self.slot > STARTING_SLOTS
    }

    /// Selling price minus purchase price
    pub fn profit_loss(&self) -> Price {
        self.selling_price - self.purchase_price
    }
}

/// Money available to a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TeamBudget {
    bank: Price,
    squad_value: Price,
}

impl TeamBudget {
    /// Create a budget. The bank balance must not be negative.
    pub fn new(bank: Price, squad_value: Price) -> Result<Self> {
        if bank.is_negative() {
            return Err(SquadError::NegativeBank { bank });
        }
        Ok(Self { bank, squad_value })
    }

    /// Spare money in the bank
    pub fn bank(&self) -> Price {
        self.bank
    }

    /// Total value of the squad
    pub fn squad_value(&self) -> Price {
        self.squad_value
    }

    /// Whether a transfer with this cost delta can be paid for from the bank
    pub fn covers(&self, cost_delta: Price) -> bool {
        cost_delta <= self.bank
    }
}

/// A team's roster and budget at the start of a suggestion run
#[derive(Debug, Clone, Serialize)]
pub struct SquadSnapshot {
    pub team_id: TeamId,
    pub team_name: String,
    pub slots: Vec<SquadSlot>,
    pub budget: TeamBudget,
}

impl SquadSnapshot {
    /// Create a snapshot; slots are kept in slot-number order
    pub fn new(
        team_id: TeamId,
        team_name: impl Into<String>,
        mut slots: Vec<SquadSlot>,
        budget: TeamBudget,
    ) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for slot in &slots {
            if slot.slot == 0 || slot.slot as usize > SQUAD_SIZE {
                return Err(SquadError::InvalidSlot { team_id, slot: slot.slot });
            }
            if !seen.insert(slot.player.id) {
                return Err(SquadError::DuplicatePick { team_id, player_id: slot.player.id });
            }
        }

        slots.sort_by_key(|s| s.slot);
        Ok(Self { team_id, team_name: team_name.into(), slots, budget })
    }

    /// Identifiers of every player in the squad
    pub fn player_ids(&self) -> BTreeSet<PlayerId> {
        self.slots.iter().map(|s| s.player.id).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.len() == SQUAD_SIZE
    }

    /// Slots holding players of the given position, in slot order
    pub fn slots_in(&self, position: Position) -> impl Iterator<Item = &SquadSlot> {
        self.slots.iter().filter(move |s| s.player.position == position)
    }

    /// Number of players held per position
    pub fn position_counts(&self) -> BTreeMap<Position, usize> {
        let mut counts = BTreeMap::new();
        for slot in &self.slots {
            *counts.entry(slot.player.position).or_insert(0) += 1;
        }
        counts
    }

    /// Mean season total points across the squad
    pub fn team_strength(&self) -> f64 {
        if self.slots.is_empty() {
            return 0.0;
        }
        let total: u64 = self.slots.iter().map(|s| s.player.total_points as u64).sum();
        total as f64 / self.slots.len() as f64
    }

    /// Whether swapping a player sold at `out_price` for one bought at
    /// `in_price` fits in the bank
    pub fn can_afford_transfer(&self, out_price: Price, in_price: Price) -> bool {
        self.budget.covers(in_price - out_price)
    }
}
