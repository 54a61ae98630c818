//! Player and position analytics

use player_catalog::{GameweekPoints, PlayerCatalog, PlayerId, PlayerRecord, Position, Price};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::round2;

/// Gameweeks inspected by `performance_trend` by default
pub const DEFAULT_TREND_WINDOW: usize = 5;

/// Gameweeks averaged as "recent" when judging a trend
const RECENT_GAMES: usize = 3;

/// Average-points gap separating a trend from "stable"
const TREND_MARGIN: f64 = 1.0;

/// Minutes a player needs to count in a position analysis
pub const ANALYSIS_MIN_MINUTES: u32 = 500;

/// Players listed in the top-performer and best-value lists
pub const ANALYSIS_LIST_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
    InsufficientData,
    NoData,
}

/// Direction of a player's recent scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceTrend {
    pub trend: Trend,
    pub average_points: f64,
    pub games: usize,

    /// Most recent first
    pub recent_scores: Vec<i32>,
}

/// Trend over the last `window` gameweeks of `history` (oldest first)
///
/// The last three games are compared against the games before them; with
/// fewer than three games the trend is `InsufficientData`.
pub fn performance_trend(history: &[GameweekPoints], window: usize) -> PerformanceTrend {
    let recent_scores: Vec<i32> = history.iter().rev().take(window).map(|g| g.points).collect();

    if recent_scores.is_empty() {
        return PerformanceTrend { trend: Trend::NoData, average_points: 0.0, games: 0, recent_scores };
    }

    let average_points = mean(&recent_scores);

    let trend = if recent_scores.len() >= RECENT_GAMES {
        let (recent, older) = recent_scores.split_at(RECENT_GAMES);
        let recent_avg = mean(recent);
        let older_avg = if older.is_empty() { recent_avg } else { mean(older) };

        if recent_avg > older_avg + TREND_MARGIN {
            Trend::Improving
        } else if recent_avg < older_avg - TREND_MARGIN {
            Trend::Declining
        } else {
            Trend::Stable
        }
    } else {
        Trend::InsufficientData
    };

    PerformanceTrend { trend, average_points: round2(average_points), games: recent_scores.len(), recent_scores }
}

/// Trend for a catalog player over the default window
pub fn player_trend(catalog: &dyn PlayerCatalog, player_id: PlayerId) -> PerformanceTrend {
    performance_trend(&catalog.history(player_id), DEFAULT_TREND_WINDOW)
}

fn mean(points: &[i32]) -> f64 {
    points.iter().map(|&p| p as f64).sum::<f64>() / points.len() as f64
}

/// Summary statistics for available regulars at one position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionAnalysis {
    pub position: Position,
    pub total_players: usize,
    pub avg_points: f64,
    pub avg_price: f64,
    pub avg_form: f64,
    pub max_points: u32,
    pub min_price: Price,

    /// Names of the highest scorers
    pub top_performers: Vec<String>,

    /// Names of the best points-per-price players
    pub best_value: Vec<String>,
}

/// Analysis of available players at `position` with at least 500 minutes;
/// `None` when no player qualifies
pub fn position_analysis(catalog: &dyn PlayerCatalog, position: Position) -> Option<PositionAnalysis> {
    let mut players: Vec<Arc<PlayerRecord>> = catalog
        .by_position(position)
        .into_iter()
        .filter(|p| p.is_available() && p.minutes >= ANALYSIS_MIN_MINUTES)
        .collect();

    if players.is_empty() {
        return None;
    }

    let count = players.len() as f64;
    let avg_points = players.iter().map(|p| p.total_points as f64).sum::<f64>() / count;
    let avg_price = players.iter().map(|p| p.price.to_units()).sum::<f64>() / count;
    let avg_form = players.iter().map(|p| p.form).sum::<f64>() / count;
    let max_points = players.iter().map(|p| p.total_points).max().unwrap_or(0);
    let min_price = players.iter().map(|p| p.price).min().unwrap_or(Price::ZERO);

    players.sort_by(|a, b| b.total_points.cmp(&a.total_points).then_with(|| a.id.cmp(&b.id)));
    let top_performers = players.iter().take(ANALYSIS_LIST_SIZE).map(|p| p.web_name.clone()).collect();

    players.sort_by(|a, b| b.value_score().total_cmp(&a.value_score()).then_with(|| a.id.cmp(&b.id)));
    let best_value = players.iter().take(ANALYSIS_LIST_SIZE).map(|p| p.web_name.clone()).collect();

    Some(PositionAnalysis {
        position,
        total_players: players.len(),
        avg_points: round2(avg_points),
        avg_price: round2(avg_price),
        avg_form: round2(avg_form),
        max_points,
        min_price,
        top_performers,
        best_value,
    })
}
