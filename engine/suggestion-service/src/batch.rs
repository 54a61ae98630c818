//! Batch runs across many teams

use futures::stream::{self, StreamExt};
use serde::Serialize;
use squad_service::TeamId;
use std::time::Instant;
use tracing::{error, info};
use transfer_engine::SuggestionRequest;

use crate::service::SuggestionService;

/// Result for a single team within a batch
#[derive(Debug, Clone, Serialize)]
pub struct TeamOutcome {
    pub team_id: TeamId,
    pub suggestions: usize,
    pub error: Option<String>,
}

impl TeamOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of a batch run, outcomes in input order
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub elapsed_ms: u64,
    pub outcomes: Vec<TeamOutcome>,
}

/// Generate suggestions for every team, at most `workers` at a time
///
/// A failing team is logged and reported; the remaining teams still run.
pub async fn run_batch(
    service: &SuggestionService,
    team_ids: Vec<TeamId>,
    request: &SuggestionRequest,
    workers: usize,
) -> BatchReport {
    let started = Instant::now();
    let total = team_ids.len();
    info!("Starting batch for {} teams with {} workers", total, workers);

    let outcomes: Vec<TeamOutcome> = stream::iter(team_ids)
        .map(|team_id| async move {
            match service.generate_for_team(team_id, request).await {
                Ok(run) => TeamOutcome { team_id, suggestions: run.persisted, error: None },
                Err(e) => {
                    error!("Failed to generate suggestions for team {}: {}", team_id, e);
                    TeamOutcome { team_id, suggestions: 0, error: Some(e.to_string()) }
                }
            }
        })
        .buffered(workers.max(1))
        .collect()
        .await;

    let successful = outcomes.iter().filter(|o| o.is_success()).count();
    let report = BatchReport {
        total,
        successful,
        failed: total - successful,
        elapsed_ms: started.elapsed().as_millis() as u64,
        outcomes,
    };

    info!(
        "Batch complete: {}/{} teams succeeded in {} ms",
        report.successful, report.total, report.elapsed_ms
    );
    report
}
