//! End-to-end scenarios for the transfer engine

use player_catalog::{ClubStrength, InMemoryCatalog, PlayerId, PlayerRecord, PlayerStatus, Position, Price};
use squad_service::{InMemorySquadStore, SquadSlot, SquadSnapshot, TeamBudget};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::{EngineConfig, EngineError, ScoredSuggestion, SuggestionKind, SuggestionRequest, TransferCandidate, TransferEngine};

fn player(id: PlayerId, position: Position) -> PlayerRecord {
    PlayerRecord {
        id,
        web_name: format!("Player{id}"),
        position,
        status: PlayerStatus::Available,
        club: ClubStrength::new(1, "TST", 1000, 1000),
        price: Price::from_units(7.0),
        total_points: 60,
        form: 3.0,
        points_per_game: 3.0,
        selected_by_percent: 10.0,
        minutes: 1000,
        ict_index: 40.0,
        expected_goals: 1.0,
        expected_assists: 1.0,
    }
}

fn slot(player: &PlayerRecord, slot: u8, selling_price: f64) -> SquadSlot {
    SquadSlot {
        player: Arc::new(player.clone()),
        purchase_price: player.price,
        selling_price: Price::from_units(selling_price),
        slot,
        is_captain: false,
        is_vice_captain: false,
    }
}

fn squad(bank: f64, slots: Vec<SquadSlot>) -> SquadSnapshot {
    let budget = TeamBudget::new(Price::from_units(bank), Price::from_units(100.0)).unwrap();
    SquadSnapshot::new(1, "Test FC", slots, budget).unwrap()
}

fn catalog(players: &[PlayerRecord]) -> InMemoryCatalog {
    InMemoryCatalog::from_players(players.iter().cloned()).unwrap()
}

fn engine() -> TransferEngine {
    TransferEngine::new(EngineConfig::default()).unwrap()
}

fn pairs(suggestions: &[ScoredSuggestion]) -> Vec<(PlayerId, PlayerId)> {
    suggestions.iter().map(|s| (s.outgoing().id, s.incoming().id)).collect()
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn test_budget_boundary_is_inclusive() {
        let mut outgoing = player(1, Position::Midfielder);
        outgoing.price = Price::from_units(8.0);
        let mut incoming = player(2, Position::Midfielder);
        incoming.price = Price::from_units(8.0);
        incoming.form = 5.0;
        let catalog = catalog(&[outgoing.clone(), incoming]);

        let at_bank = squad(0.5, vec![slot(&outgoing, 6, 7.5)]);
        let suggestions = engine().generate_suggestions(&catalog, &at_bank, &SuggestionRequest::default()).unwrap();
        assert_eq!(pairs(&suggestions), vec![(1, 2)]);
        assert_eq!(suggestions[0].cost_delta(), Price::from_units(0.5));
        assert_eq!(suggestions[0].kind(), SuggestionKind::Form);

        let short = squad(0.3, vec![slot(&outgoing, 6, 7.5)]);
        let suggestions = engine().generate_suggestions(&catalog, &short, &SuggestionRequest::default()).unwrap();
        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_injured_outgoing_classified_as_injury() {
        let mut outgoing = player(1, Position::Defender);
        outgoing.status = PlayerStatus::Injured;
        let incoming = player(2, Position::Defender);
        let catalog = catalog(&[outgoing.clone(), incoming]);

        let squad = squad(0.0, vec![slot(&outgoing, 3, 7.0)]);
        let suggestions = engine().generate_suggestions(&catalog, &squad, &SuggestionRequest::default()).unwrap();

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].cost_delta(), Price::ZERO);
        assert_eq!(suggestions[0].kind(), SuggestionKind::Injury);
        assert!(suggestions[0].reason().contains("Current player is injured"));
    }

    #[test]
    fn test_essential_player_never_replaced() {
        let mut star = player(1, Position::Forward);
        star.total_points = 160;
        star.form = 7.0;
        star.selected_by_percent = 35.0;

        let regular = player(3, Position::Forward);

        let mut superior = player(2, Position::Forward);
        superior.total_points = 250;
        superior.form = 11.0;
        superior.points_per_game = 9.0;
        superior.selected_by_percent = 5.0;
        superior.ict_index = 200.0;

        let catalog = catalog(&[star.clone(), regular.clone(), superior]);
        let squad = squad(5.0, vec![slot(&star, 10, 7.0), slot(&regular, 11, 7.0)]);

        let suggestions = engine().generate_suggestions(&catalog, &squad, &SuggestionRequest::default()).unwrap();
        assert_eq!(pairs(&suggestions), vec![(3, 2)]);
    }

    #[test]
    fn test_zero_priced_outgoing_gets_neutral_value() {
        let mut outgoing = player(1, Position::Keeper);
        outgoing.price = Price::ZERO;
        let incoming = player(2, Position::Keeper);
        let engine = engine();

        let candidate = TransferCandidate::from_slot(&slot(&outgoing, 1, 0.0), Arc::new(incoming.clone()));
        let assessed = engine.assess(candidate);
        assert_eq!(assessed.factors().value, 5.0);
        assert!(assessed.priority_score().is_finite());

        let catalog = catalog(&[outgoing.clone(), incoming]);
        let squad = squad(10.0, vec![slot(&outgoing, 1, 0.0)]);
        assert!(engine.generate_suggestions(&catalog, &squad, &SuggestionRequest::default()).is_ok());
    }

    #[test]
    fn test_truncation_keeps_highest_with_insertion_order_ties() {
        let outgoing: Vec<PlayerRecord> = (1..=3).map(|id| player(id, Position::Midfielder)).collect();

        let mut best = player(101, Position::Midfielder);
        best.price = Price::from_units(6.0);
        best.form = 6.0;
        let mut second = player(102, Position::Midfielder);
        second.price = Price::from_units(6.0);
        second.form = 5.0;
        let mut third = player(103, Position::Midfielder);
        third.form = 4.0;

        let mut players = outgoing.clone();
        players.extend([best, second, third]);
        let catalog = catalog(&players);

        // The third slot sells for less and cannot afford `third`: 3 + 3 + 2 pooled
        let squad = squad(
            0.0,
            vec![slot(&outgoing[0], 5, 7.0), slot(&outgoing[1], 6, 7.0), slot(&outgoing[2], 7, 6.5)],
        );
        let engine = engine();

        let all = engine.generate_suggestions(&catalog, &squad, &SuggestionRequest::new(50)).unwrap();
        assert_eq!(all.len(), 8);

        let top = engine.generate_suggestions(&catalog, &squad, &SuggestionRequest::new(3)).unwrap();
        assert_eq!(pairs(&top), vec![(1, 101), (2, 101), (3, 101)]);
        assert!(top.iter().all(|s| s.priority_score() >= all[3].priority_score()));
        assert!(top[0].priority_score() > all[3].priority_score());
    }
}

#[cfg(test)]
mod engine_tests {
    use super::*;

    fn mixed_squad() -> (InMemoryCatalog, SquadSnapshot) {
        let defender = player(1, Position::Defender);
        let midfielder = player(2, Position::Midfielder);
        let mut better_defender = player(10, Position::Defender);
        better_defender.form = 6.0;
        let mut better_midfielder = player(20, Position::Midfielder);
        better_midfielder.form = 6.0;

        let catalog = catalog(&[defender.clone(), midfielder.clone(), better_defender, better_midfielder]);
        let squad = squad(1.0, vec![slot(&defender, 2, 7.0), slot(&midfielder, 7, 7.0)]);
        (catalog, squad)
    }

    #[test]
    fn test_position_filter_restricts_slots() {
        let (catalog, squad) = mixed_squad();
        let engine = engine();

        let unfiltered = engine.generate_suggestions(&catalog, &squad, &SuggestionRequest::default()).unwrap();
        assert_eq!(pairs(&unfiltered).len(), 2);

        let request = SuggestionRequest::default().with_position(Position::Defender);
        let filtered = engine.generate_suggestions(&catalog, &squad, &request).unwrap();
        assert_eq!(pairs(&filtered), vec![(1, 10)]);
    }

    #[test]
    fn test_no_candidates_is_not_an_error() {
        let keeper = player(1, Position::Keeper);
        let catalog = catalog(&[keeper.clone()]);
        let squad = squad(5.0, vec![slot(&keeper, 1, 7.0)]);

        let suggestions = engine().generate_suggestions(&catalog, &squad, &SuggestionRequest::default()).unwrap();
        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_team_not_found() {
        let (catalog, _) = mixed_squad();
        let store = InMemorySquadStore::new();

        let result = engine().suggest_for_team(&catalog, &store, 99, &SuggestionRequest::default());
        assert!(matches!(result, Err(EngineError::TeamNotFound(99))));
    }

    #[test]
    fn test_suggest_for_team_reads_store() {
        let (catalog, squad) = mixed_squad();
        let store = InMemorySquadStore::new();
        store.insert(squad);

        let suggestions = engine().suggest_for_team(&catalog, &store, 1, &SuggestionRequest::default()).unwrap();
        assert_eq!(suggestions.len(), 2);
    }

    #[test]
    fn test_zero_budget_deadline_aborts() {
        let (catalog, squad) = mixed_squad();

        let result =
            engine().generate_with_deadline(&catalog, &squad, &SuggestionRequest::default(), Duration::ZERO);
        assert!(matches!(result, Err(EngineError::DeadlineExceeded { team_id: 1, budget_ms: 0 })));

        let result =
            engine().generate_with_deadline(&catalog, &squad, &SuggestionRequest::default(), Duration::from_secs(5));
        assert_eq!(result.unwrap().len(), 2);
    }

    #[test]
    fn test_custom_weights_change_ranking() {
        let mut outgoing = player(1, Position::Forward);
        outgoing.selected_by_percent = 30.0;
        let mut in_form = player(2, Position::Forward);
        in_form.form = 6.0;
        in_form.selected_by_percent = 30.0;
        let mut differential = player(3, Position::Forward);
        differential.selected_by_percent = 2.0;

        let catalog = catalog(&[outgoing.clone(), in_form, differential]);
        let squad = squad(0.0, vec![slot(&outgoing, 9, 7.0)]);

        let default_top = engine().generate_suggestions(&catalog, &squad, &SuggestionRequest::new(1)).unwrap();
        assert_eq!(default_top[0].incoming().id, 2);

        let mut config = EngineConfig::default();
        config.weights.form = 0.05;
        config.weights.ownership = 0.30;
        let tuned = TransferEngine::new(config).unwrap();
        let tuned_top = tuned.generate_suggestions(&catalog, &squad, &SuggestionRequest::new(1)).unwrap();
        assert_eq!(tuned_top[0].incoming().id, 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.weights.ict = 0.5;
        assert!(matches!(TransferEngine::new(config), Err(EngineError::InvalidConfig(_))));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    type Stats = (u8, u8, i64, u32, f64, f64, f64, u32, f64, f64, f64, u32);

    fn arb_stats() -> impl Strategy<Value = Stats> {
        (
            0u8..4,
            0u8..6,
            0i64..150,
            0u32..260,
            0.0f64..12.0,
            0.0f64..10.0,
            0.0f64..60.0,
            0u32..3000,
            0.0f64..300.0,
            0.0f64..15.0,
            0.0f64..10.0,
            900u32..1400,
        )
    }

    fn build(id: PlayerId, stats: Stats) -> PlayerRecord {
        let (position, status, price, points, form, ppg, ownership, minutes, ict, xg, xa, attack) = stats;
        PlayerRecord {
            id,
            web_name: format!("Player{id}"),
            position: Position::ALL[position as usize],
            status: match status {
                0 => PlayerStatus::Injured,
                1 => PlayerStatus::Doubtful,
                2 => PlayerStatus::Suspended,
                _ => PlayerStatus::Available,
            },
            club: ClubStrength::new(id % 20, "CLB", attack, attack + 50),
            price: Price::from_tenths(price),
            total_points: points,
            form,
            points_per_game: ppg,
            selected_by_percent: ownership,
            minutes,
            ict_index: ict,
            expected_goals: xg,
            expected_assists: xa,
        }
    }

    fn world(stats: Vec<Stats>, bank_tenths: i64) -> (InMemoryCatalog, SquadSnapshot) {
        let players: Vec<PlayerRecord> =
            stats.into_iter().enumerate().map(|(i, s)| build(i as PlayerId + 1, s)).collect();

        let slots = players
            .iter()
            .take(15)
            .enumerate()
            .map(|(i, p)| SquadSlot {
                player: Arc::new(p.clone()),
                purchase_price: p.price,
                selling_price: Price::from_tenths((p.price.tenths() - 1).max(0)),
                slot: i as u8 + 1,
                is_captain: i == 0,
                is_vice_captain: i == 1,
            })
            .collect();

        let budget = TeamBudget::new(Price::from_tenths(bank_tenths), Price::from_units(100.0)).unwrap();
        let squad = SquadSnapshot::new(7, "Prop FC", slots, budget).unwrap();
        (catalog(&players), squad)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_output_respects_invariants(
            stats in prop::collection::vec(arb_stats(), 20..60),
            bank_tenths in 0i64..40,
            max in 0usize..80,
        ) {
            let (catalog, squad) = world(stats, bank_tenths);
            let engine = engine();
            let policy = &engine.config().selection;
            let suggestions = engine
                .generate_suggestions(&catalog, &squad, &SuggestionRequest::new(max))
                .unwrap();

            prop_assert!(suggestions.len() <= max.min(50));

            let mut per_outgoing: BTreeMap<PlayerId, usize> = BTreeMap::new();
            for s in &suggestions {
                prop_assert!(s.cost_delta() <= squad.budget.bank());
                prop_assert!(!policy.is_essential(s.outgoing()));
                prop_assert!(s.confidence() >= 20.0 && s.confidence() <= 95.0);
                prop_assert!(s.priority_score().is_finite() && s.priority_score() > 0.0);
                prop_assert!(s.predicted_points_gain().is_finite());
                prop_assert_eq!(s.outgoing().position, s.incoming().position);
                prop_assert!(!squad.player_ids().contains(&s.incoming().id));
                *per_outgoing.entry(s.outgoing().id).or_insert(0) += 1;
            }
            prop_assert!(per_outgoing.values().all(|&n| n <= policy.per_slot_keep));

            for pair in suggestions.windows(2) {
                prop_assert!(pair[0].priority_score() >= pair[1].priority_score());
            }
        }

        #[test]
        fn prop_runs_are_deterministic(
            stats in prop::collection::vec(arb_stats(), 20..40),
            bank_tenths in 0i64..40,
        ) {
            let (catalog, squad) = world(stats, bank_tenths);
            let engine = engine();
            let request = SuggestionRequest::new(50);

            let fingerprint = |run: Vec<ScoredSuggestion>| {
                run.iter()
                    .map(|s| {
                        (
                            s.outgoing().id,
                            s.incoming().id,
                            s.kind(),
                            s.priority_score().to_bits(),
                            s.confidence().to_bits(),
                            s.predicted_points_gain().to_bits(),
                            s.reason().to_string(),
                        )
                    })
                    .collect::<Vec<_>>()
            };

            let first = fingerprint(engine.generate_suggestions(&catalog, &squad, &request).unwrap());
            let second = fingerprint(engine.generate_suggestions(&catalog, &squad, &request).unwrap());
            prop_assert_eq!(first, second);
        }
    }
}
