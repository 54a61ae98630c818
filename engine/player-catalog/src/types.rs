use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;
use crate::price::Price;

/// Catalog-wide player identifier
pub type PlayerId = u32;

/// Playing position. Transfers are only ever like-for-like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Keeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    /// All positions in squad order
    pub const ALL: [Position; 4] =
        [Position::Keeper, Position::Defender, Position::Midfielder, Position::Forward];

    /// Short code (e.g., "GKP", "DEF")
    pub fn code(&self) -> &'static str {
        match self {
            Position::Keeper => "GKP",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Position {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "gk" | "gkp" | "keeper" | "goalkeeper" => Ok(Position::Keeper),
            "2" | "def" | "defender" => Ok(Position::Defender),
            "3" | "mid" | "midfielder" => Ok(Position::Midfielder),
            "4" | "fwd" | "forward" => Ok(Position::Forward),
            _ => Err(CatalogError::UnknownPosition(s.to_string())),
        }
    }
}

/// Availability status as published by the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Available,
    Doubtful,
    Injured,
    Suspended,
    Unavailable,
}

impl PlayerStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, PlayerStatus::Available)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlayerStatus::Available => "available",
            PlayerStatus::Doubtful => "doubtful",
            PlayerStatus::Injured => "injured",
            PlayerStatus::Suspended => "suspended",
            PlayerStatus::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PlayerStatus {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "available" => Ok(PlayerStatus::Available),
            "d" | "doubtful" => Ok(PlayerStatus::Doubtful),
            "i" | "injured" => Ok(PlayerStatus::Injured),
            "s" | "suspended" => Ok(PlayerStatus::Suspended),
            "u" | "unavailable" => Ok(PlayerStatus::Unavailable),
            _ => Err(CatalogError::UnknownStatus(s.to_string())),
        }
    }
}

/// Club strength ratings used by the fixture factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubStrength {
    pub club_id: u32,

    /// Club short name (e.g., "ARS")
    pub short_name: String,

    pub attack_home: u32,
    pub attack_away: u32,
}

impl ClubStrength {
    pub fn new(club_id: u32, short_name: impl Into<String>, attack_home: u32, attack_away: u32) -> Self {
        Self { club_id, short_name: short_name.into(), attack_home, attack_away }
    }

    /// Static attack rating: mean of home and away attack strength
    pub fn attack_strength(&self) -> f64 {
        (self.attack_home as f64 + self.attack_away as f64) / 2.0
    }
}

/// A player's statistics at the time the catalog snapshot was taken
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,

    /// Display name (e.g., "Saka")
    pub web_name: String,

    pub position: Position,
    pub status: PlayerStatus,
    pub club: ClubStrength,

    /// Current market price
    pub price: Price,

    /// Season total points
    pub total_points: u32,

    /// Rolling average of recent points
    pub form: f64,

    pub points_per_game: f64,

    /// Percentage of all teams holding the player (0-100)
    pub selected_by_percent: f64,

    pub minutes: u32,

    /// Influence/creativity/threat composite
    pub ict_index: f64,

    pub expected_goals: f64,
    pub expected_assists: f64,
}

impl PlayerRecord {
    /// Points per unit of price. Zero when the price is zero.
    pub fn value_score(&self) -> f64 {
        if self.price.is_zero() {
            return 0.0;
        }
        self.total_points as f64 / self.price.to_units()
    }

    /// Expected goals plus expected assists
    pub fn expected_involvement(&self) -> f64 {
        self.expected_goals + self.expected_assists
    }

    pub fn is_available(&self) -> bool {
        self.status.is_available()
    }
}

/// Points scored in a single gameweek
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameweekPoints {
    pub gameweek: u32,
    pub points: i32,
    #[serde(default)]
    pub minutes: u32,
}
