//! Squad snapshot storage

use dashmap::DashMap;
use player_catalog::{PlayerCatalog, PlayerId, Price};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::error::SquadError;
use crate::squad::{SquadSlot, SquadSnapshot, TeamBudget, TeamId};
use crate::Result;

/// Read access to team squads
pub trait SquadStore: Send + Sync {
    /// Current snapshot for a team; `TeamNotFound` if the team was never loaded
    fn snapshot(&self, team_id: TeamId) -> Result<SquadSnapshot>;

    /// All known team ids in ascending order
    fn team_ids(&self) -> Vec<TeamId>;
}

/// A single pick as stored in a squad file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickEntry {
    pub player_id: PlayerId,
    pub purchase_price: Price,
    pub selling_price: Price,
    pub slot: u8,
    #[serde(default)]
    pub is_captain: bool,
    #[serde(default)]
    pub is_vice_captain: bool,
}

/// A team as stored in a squad file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamEntry {
    pub team_id: TeamId,
    pub team_name: String,
    pub bank: Price,

    /// Total squad value; derived from selling prices when absent
    #[serde(default)]
    pub squad_value: Option<Price>,

    pub picks: Vec<PickEntry>,
}

/// Container for every loaded team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadFile {
    pub teams: Vec<TeamEntry>,
}

/// Squad store held in memory
///
/// Teams whose file entry could not be resolved are remembered with the
/// reason, so lookups for them fail without affecting other teams.
#[derive(Debug, Default)]
pub struct InMemorySquadStore {
    squads: DashMap<TeamId, SquadSnapshot>,
    rejected: DashMap<TeamId, String>,
}

impl InMemorySquadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a team's snapshot
    pub fn insert(&self, snapshot: SquadSnapshot) {
        self.rejected.remove(&snapshot.team_id);
        self.squads.insert(snapshot.team_id, snapshot);
    }

    /// Mark a team as unusable; `snapshot` reports `reason` for it
    pub fn reject(&self, team_id: TeamId, reason: impl Into<String>) {
        self.squads.remove(&team_id);
        self.rejected.insert(team_id, reason.into());
    }

    /// Resolve a squad file against a catalog
    ///
    /// A team that fails to resolve is logged and rejected; the rest load.
    pub fn from_squad_file(file: SquadFile, catalog: &dyn PlayerCatalog) -> Self {
        let store = Self::new();
        for team in file.teams {
            let team_id = team.team_id;
            match resolve_team(team, catalog) {
                Ok(snapshot) => store.insert(snapshot),
                Err(e) => {
                    warn!("Skipping team {}: {}", team_id, e);
                    store.reject(team_id, e.to_string());
                }
            }
        }
        store
    }

    /// Number of teams rejected at load
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    /// Load squads from a JSON file, resolving players against the catalog
    pub async fn load_from_file<P: AsRef<Path>>(
        file_path: P,
        catalog: &dyn PlayerCatalog,
    ) -> Result<Self> {
        info!("Loading squads from: {:?}", file_path.as_ref());

        let json_content = tokio::fs::read_to_string(&file_path).await?;
        let file: SquadFile = serde_json::from_str(&json_content)?;

        let total = file.teams.len();
        let store = Self::from_squad_file(file, catalog);
        info!("Loaded {} of {} teams from file", store.len(), total);
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.squads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squads.is_empty()
    }
}

impl SquadStore for InMemorySquadStore {
    fn snapshot(&self, team_id: TeamId) -> Result<SquadSnapshot> {
        if let Some(entry) = self.squads.get(&team_id) {
            return Ok(entry.value().clone());
        }
        match self.rejected.get(&team_id) {
            Some(reason) => Err(SquadError::Rejected { team_id, reason: reason.value().clone() }),
            None => Err(SquadError::TeamNotFound { team_id }),
        }
    }

    fn team_ids(&self) -> Vec<TeamId> {
        let mut ids: Vec<TeamId> = self
            .squads
            .iter()
            .map(|entry| *entry.key())
            .chain(self.rejected.iter().map(|entry| *entry.key()))
            .collect();
        ids.sort_unstable();
        ids
    }
}

fn resolve_team(team: TeamEntry, catalog: &dyn PlayerCatalog) -> Result<SquadSnapshot> {
    let team_id = team.team_id;

    let slots = team
        .picks
        .into_iter()
        .map(|pick| -> Result<SquadSlot> {
            let player = catalog
                .player(pick.player_id)
                .ok_or(SquadError::UnknownPlayer { team_id, player_id: pick.player_id })?;
            if pick.purchase_price.is_negative() || pick.selling_price.is_negative() {
                return Err(SquadError::NegativePrice { team_id, player_id: pick.player_id });
            }
            Ok(SquadSlot {
                player,
                purchase_price: pick.purchase_price,
                selling_price: pick.selling_price,
                slot: pick.slot,
                is_captain: pick.is_captain,
                is_vice_captain: pick.is_vice_captain,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let squad_value =
        team.squad_value.unwrap_or_else(|| slots.iter().map(|s| s.selling_price).sum::<Price>() + team.bank);
    let budget = TeamBudget::new(team.bank, squad_value)?;

    SquadSnapshot::new(team_id, team.team_name, slots, budget)
}
