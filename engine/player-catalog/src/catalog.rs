use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{CatalogError, Result};
use crate::price::Price;
use crate::types::{ClubStrength, GameweekPoints, PlayerId, PlayerRecord, PlayerStatus, Position};

/// Minimum minutes for a player to appear in value picks
pub const VALUE_PICK_MIN_MINUTES: u32 = 500;

/// Replacement search parameters
#[derive(Debug, Clone)]
pub struct CandidateQuery {
    pub position: Position,

    /// Players with fewer minutes are skipped
    pub min_minutes: u32,

    /// Players already owned by the squad
    pub exclude: BTreeSet<PlayerId>,

    /// Maximum number of candidates returned
    pub limit: usize,
}

/// Read-only access to player statistics
///
/// Implementations must return the same answer for the same query for the
/// lifetime of the value; a catalog is one consistent snapshot.
pub trait PlayerCatalog: Send + Sync {
    /// Look up a single player
    fn player(&self, id: PlayerId) -> Option<Arc<PlayerRecord>>;

    /// All players at a position, in ascending id order
    fn by_position(&self, position: Position) -> Vec<Arc<PlayerRecord>>;

    /// Total number of players
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Recent gameweek history for a player, oldest first
    fn history(&self, _id: PlayerId) -> Vec<GameweekPoints> {
        Vec::new()
    }

    /// Available players at the query position with enough minutes, not
    /// already owned, ordered by total points then form (both descending)
    fn candidates(&self, query: &CandidateQuery) -> Vec<Arc<PlayerRecord>> {
        let mut players: Vec<Arc<PlayerRecord>> = self
            .by_position(query.position)
            .into_iter()
            .filter(|p| p.status == PlayerStatus::Available)
            .filter(|p| p.minutes >= query.min_minutes)
            .filter(|p| !query.exclude.contains(&p.id))
            .collect();

        players.sort_by(|a, b| by_points_then_form(a, b));
        players.truncate(query.limit);
        players
    }

    /// Best available players at a position by total points then form
    fn top_players(&self, position: Position, limit: usize) -> Vec<Arc<PlayerRecord>> {
        let mut players: Vec<Arc<PlayerRecord>> =
            self.by_position(position).into_iter().filter(|p| p.is_available()).collect();

        players.sort_by(|a, b| by_points_then_form(a, b));
        players.truncate(limit);
        players
    }

    /// Best points-per-price players at or under a price ceiling
    fn value_picks(&self, position: Position, max_price: Price, limit: usize) -> Vec<Arc<PlayerRecord>> {
        let mut players: Vec<Arc<PlayerRecord>> = self
            .by_position(position)
            .into_iter()
            .filter(|p| p.is_available())
            .filter(|p| p.price <= max_price)
            .filter(|p| p.minutes >= VALUE_PICK_MIN_MINUTES)
            .collect();

        players.sort_by(|a, b| {
            b.value_score()
                .total_cmp(&a.value_score())
                .then_with(|| b.form.total_cmp(&a.form))
                .then_with(|| a.id.cmp(&b.id))
        });
        players.truncate(limit);
        players
    }
}

/// Descending total points, then descending form, then ascending id
fn by_points_then_form(a: &PlayerRecord, b: &PlayerRecord) -> Ordering {
    b.total_points
        .cmp(&a.total_points)
        .then_with(|| b.form.total_cmp(&a.form))
        .then_with(|| a.id.cmp(&b.id))
}

/// Player entry as stored in a catalog file; the club is referenced by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub id: PlayerId,
    pub web_name: String,
    pub position: Position,
    pub status: PlayerStatus,
    pub club_id: u32,
    pub price: Price,
    pub total_points: u32,
    pub form: f64,
    pub points_per_game: f64,
    pub selected_by_percent: f64,
    pub minutes: u32,
    pub ict_index: f64,
    pub expected_goals: f64,
    pub expected_assists: f64,
}

/// Container for a full catalog snapshot on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// Season label (e.g., "2024/25")
    pub season: String,

    /// Gameweek the statistics were taken after
    pub gameweek: u32,

    pub last_updated: DateTime<Utc>,

    pub clubs: Vec<ClubStrength>,

    pub players: Vec<PlayerEntry>,

    /// Per-player gameweek history, keyed by player id
    #[serde(default)]
    pub history: HashMap<PlayerId, Vec<GameweekPoints>>,
}

/// Catalog held entirely in memory
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    players: BTreeMap<PlayerId, Arc<PlayerRecord>>,
    by_position: BTreeMap<Position, Vec<Arc<PlayerRecord>>>,
    history: HashMap<PlayerId, Vec<GameweekPoints>>,
}

impl InMemoryCatalog {
    /// Build a catalog from resolved player records
    pub fn from_players(players: impl IntoIterator<Item = PlayerRecord>) -> Result<Self> {
        let mut catalog = Self::default();
        for player in players {
            catalog.insert(player)?;
        }
        Ok(catalog)
    }

    /// Build a catalog from a snapshot, resolving club references
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Result<Self> {
        let clubs: HashMap<u32, ClubStrength> =
            snapshot.clubs.into_iter().map(|c| (c.club_id, c)).collect();

        let mut catalog = Self::default();
        for entry in snapshot.players {
            let club = clubs
                .get(&entry.club_id)
                .cloned()
                .ok_or(CatalogError::UnknownClub { player_id: entry.id, club_id: entry.club_id })?;

            if entry.price.is_negative() {
                return Err(CatalogError::InvalidPrice {
                    player_id: entry.id,
                    reason: format!("negative price {}", entry.price),
                });
            }

            catalog.insert(PlayerRecord {
                id: entry.id,
                web_name: entry.web_name,
                position: entry.position,
                status: entry.status,
                club,
                price: entry.price,
                total_points: entry.total_points,
                form: entry.form,
                points_per_game: entry.points_per_game,
                selected_by_percent: entry.selected_by_percent,
                minutes: entry.minutes,
                ict_index: entry.ict_index,
                expected_goals: entry.expected_goals,
                expected_assists: entry.expected_assists,
            })?;
        }

        for (player_id, mut history) in snapshot.history {
            history.sort_by_key(|gw| gw.gameweek);
            catalog.history.insert(player_id, history);
        }

        Ok(catalog)
    }

    /// Load a catalog snapshot from a JSON file
    pub async fn load_from_file<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        info!("Loading player catalog from: {:?}", file_path.as_ref());

        let json_content = tokio::fs::read_to_string(&file_path).await?;
        let snapshot: CatalogSnapshot = serde_json::from_str(&json_content)?;

        info!(
            "Loaded {} players across {} clubs (season {}, gameweek {})",
            snapshot.players.len(),
            snapshot.clubs.len(),
            snapshot.season,
            snapshot.gameweek
        );

        Self::from_snapshot(snapshot)
    }

    fn insert(&mut self, player: PlayerRecord) -> Result<()> {
        if self.players.contains_key(&player.id) {
            return Err(CatalogError::DuplicatePlayer(player.id));
        }

        let player = Arc::new(player);
        debug!("Catalog entry {} ({}, {})", player.id, player.web_name, player.position);

        let position_list = self.by_position.entry(player.position).or_default();
        let at = position_list.partition_point(|p| p.id < player.id);
        position_list.insert(at, player.clone());
        self.players.insert(player.id, player);
        Ok(())
    }
}

impl PlayerCatalog for InMemoryCatalog {
    fn player(&self, id: PlayerId) -> Option<Arc<PlayerRecord>> {
        self.players.get(&id).cloned()
    }

    fn by_position(&self, position: Position) -> Vec<Arc<PlayerRecord>> {
        self.by_position.get(&position).cloned().unwrap_or_default()
    }

    fn len(&self) -> usize {
        self.players.len()
    }

    fn history(&self, id: PlayerId) -> Vec<GameweekPoints> {
        self.history.get(&id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: PlayerId, total_points: u32, form: f64, minutes: u32) -> PlayerRecord {
        PlayerRecord {
            id,
            web_name: format!("Player{id}"),
            position: Position::Midfielder,
            status: PlayerStatus::Available,
            club: ClubStrength::new(1, "TST", 1100, 1100),
            price: Price::from_units(6.0),
            total_points,
            form,
            points_per_game: 4.0,
            selected_by_percent: 10.0,
            minutes,
            ict_index: 50.0,
            expected_goals: 1.0,
            expected_assists: 1.0,
        }
    }

    fn query(exclude: &[PlayerId], limit: usize) -> CandidateQuery {
        CandidateQuery {
            position: Position::Midfielder,
            min_minutes: 300,
            exclude: exclude.iter().copied().collect(),
            limit,
        }
    }

    #[test]
    fn test_candidates_ordered_by_points_then_form() {
        let catalog = InMemoryCatalog::from_players(vec![
            player(1, 100, 5.0, 900),
            player(2, 120, 4.0, 900),
            player(3, 100, 6.0, 900),
        ])
        .unwrap();

        let ids: Vec<PlayerId> = catalog.candidates(&query(&[], 50)).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_candidates_filter_status_minutes_and_exclusions() {
        let mut injured = player(4, 200, 9.0, 900);
        injured.status = PlayerStatus::Injured;
        let mut keeper = player(5, 200, 9.0, 900);
        keeper.position = Position::Keeper;

        let catalog = InMemoryCatalog::from_players(vec![
            player(1, 100, 5.0, 900),
            player(2, 120, 4.0, 299),
            player(3, 110, 6.0, 300),
            injured,
            keeper,
        ])
        .unwrap();

        let ids: Vec<PlayerId> = catalog.candidates(&query(&[1], 50)).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_candidates_respect_limit() {
        let catalog =
            InMemoryCatalog::from_players((1..=80).map(|id| player(id, id, 5.0, 900))).unwrap();

        let candidates = catalog.candidates(&query(&[], 50));
        assert_eq!(candidates.len(), 50);
        assert_eq!(candidates[0].id, 80);
    }

    #[test]
    fn test_duplicate_player_rejected() {
        let result = InMemoryCatalog::from_players(vec![player(1, 1, 1.0, 1), player(1, 2, 2.0, 2)]);
        assert!(matches!(result, Err(CatalogError::DuplicatePlayer(1))));
    }

    #[test]
    fn test_value_picks_respect_price_and_minutes() {
        let mut cheap = player(1, 90, 4.0, 900);
        cheap.price = Price::from_units(4.5);
        let mut pricey = player(2, 200, 7.0, 900);
        pricey.price = Price::from_units(12.0);
        let mut benchwarmer = player(3, 60, 3.0, 400);
        benchwarmer.price = Price::from_units(4.0);
        let mut solid = player(4, 100, 5.0, 900);
        solid.price = Price::from_units(6.0);

        let catalog = InMemoryCatalog::from_players(vec![cheap, pricey, benchwarmer, solid]).unwrap();
        let ids: Vec<PlayerId> = catalog
            .value_picks(Position::Midfielder, Price::from_units(7.0), 10)
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn test_from_snapshot_rejects_unknown_club() {
        let snapshot = CatalogSnapshot {
            season: "2024/25".to_string(),
            gameweek: 10,
            last_updated: Utc::now(),
            clubs: vec![],
            players: vec![PlayerEntry {
                id: 7,
                web_name: "Orphan".to_string(),
                position: Position::Forward,
                status: PlayerStatus::Available,
                club_id: 99,
                price: Price::from_units(5.0),
                total_points: 10,
                form: 1.0,
                points_per_game: 1.0,
                selected_by_percent: 1.0,
                minutes: 100,
                ict_index: 1.0,
                expected_goals: 0.0,
                expected_assists: 0.0,
            }],
            history: HashMap::new(),
        };

        assert!(matches!(
            InMemoryCatalog::from_snapshot(snapshot),
            Err(CatalogError::UnknownClub { player_id: 7, club_id: 99 })
        ));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let json = r#"{
            "season": "2024/25",
            "gameweek": 12,
            "last_updated": "2024-11-20T10:00:00Z",
            "clubs": [{"club_id": 1, "short_name": "ARS", "attack_home": 1300, "attack_away": 1250}],
            "players": [{
                "id": 11, "web_name": "Saka", "position": "midfielder", "status": "available",
                "club_id": 1, "price": 10.1, "total_points": 96, "form": 6.8,
                "points_per_game": 8.0, "selected_by_percent": 41.2, "minutes": 1010,
                "ict_index": 120.4, "expected_goals": 4.1, "expected_assists": 3.9
            }],
            "history": {"11": [{"gameweek": 12, "points": 9}, {"gameweek": 11, "points": 3}]}
        }"#;
        tokio::fs::write(&path, json).await.unwrap();

        let catalog = InMemoryCatalog::load_from_file(&path).await.unwrap();
        let saka = catalog.player(11).unwrap();
        assert_eq!(saka.price, Price::from_tenths(101));
        assert_eq!(saka.club.attack_strength(), 1275.0);
        let history = catalog.history(11);
        assert_eq!(history.iter().map(|gw| gw.gameweek).collect::<Vec<_>>(), vec![11, 12]);
    }
}
