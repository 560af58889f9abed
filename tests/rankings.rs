use std::collections::HashMap;

use gol_terminal::dataset::MatchEvent;
use gol_terminal::rankings::{
    RankingConfig, compute_goal_rankings, filter_by_hour_search, profile_odds_column,
    rank_hours, rank_matchups, rank_minutes,
};

fn event(hour: i64, minute: i64, home: &str, away: &str, hg: i64, ag: i64) -> MatchEvent {
    MatchEvent::new(
        "Liga Teste".to_string(),
        minute,
        hour,
        home.to_string(),
        away.to_string(),
        hg,
        ag,
        HashMap::new(),
    )
}

#[test]
fn hour_ranking_sums_and_ranks() {
    let events = vec![
        event(14, 10, "A", "B", 2, 1),
        event(14, 20, "A", "B", 0, 1),
        event(18, 30, "C", "D", 3, 3),
    ];
    let rows = rank_hours(&events);
    assert_eq!(rows.len(), 2);
    assert_eq!((rows[0].hour, rows[0].total_goals, rows[0].rank), (18, 6, 1));
    assert_eq!((rows[1].hour, rows[1].total_goals, rows[1].rank), (14, 4, 2));
}

#[test]
fn hour_ranking_ties_share_rank_and_order_by_hour() {
    let events = vec![
        event(11, 1, "A", "B", 2, 3),
        event(10, 1, "C", "D", 4, 1),
        event(12, 1, "E", "F", 1, 2),
    ];
    let rows = rank_hours(&events);
    assert_eq!(
        rows.iter().map(|r| (r.hour, r.total_goals, r.rank)).collect::<Vec<_>>(),
        vec![(10, 5, 1), (11, 5, 1), (12, 3, 2)]
    );
}

#[test]
fn matchup_ranking_sum_count_mean() {
    let events = vec![
        event(14, 10, "A", "B", 2, 1),
        event(15, 20, "A", "B", 0, 3),
        event(16, 30, "C", "D", 1, 1),
    ];
    let rows = rank_matchups(&events);
    assert_eq!(rows.len(), 2);

    let ab = &rows[0];
    assert_eq!(ab.matchup, "A x B");
    assert_eq!(ab.total_goals, 6);
    assert_eq!(ab.games, 2);
    assert_eq!(ab.mean_goals, 3.00);
    assert_eq!((ab.rank_by_sum, ab.rank_by_mean), (1, 1));

    let cd = &rows[1];
    assert_eq!(cd.matchup, "C x D");
    assert_eq!(cd.total_goals, 2);
    assert_eq!(cd.games, 1);
    assert_eq!(cd.mean_goals, 2.00);
    assert_eq!((cd.rank_by_sum, cd.rank_by_mean), (2, 2));
}

#[test]
fn matchup_sum_and_mean_ranks_can_diverge() {
    // Steady beats Burst on total goals, Burst beats Steady on mean.
    let events = vec![
        event(14, 10, "Steady", "S2", 1, 1),
        event(15, 10, "Steady", "S2", 1, 1),
        event(16, 10, "Steady", "S2", 1, 1),
        event(17, 10, "Burst", "B2", 5, 0),
    ];
    let rows = rank_matchups(&events);

    let steady = rows.iter().find(|r| r.matchup == "Steady x S2").unwrap();
    let burst = rows.iter().find(|r| r.matchup == "Burst x B2").unwrap();
    assert_eq!((steady.total_goals, steady.mean_goals), (6, 2.00));
    assert_eq!((burst.total_goals, burst.mean_goals), (5, 5.00));
    assert_eq!((steady.rank_by_sum, burst.rank_by_sum), (1, 2));
    assert_eq!((burst.rank_by_mean, steady.rank_by_mean), (1, 2));
}

#[test]
fn minute_ranking_descends_without_rank() {
    let events = vec![
        event(14, 45, "A", "B", 1, 0),
        event(14, 90, "C", "D", 2, 2),
        event(14, 12, "E", "F", 1, 1),
        event(15, 45, "G", "H", 1, 0),
    ];
    let rows = rank_minutes(&events);
    assert_eq!(
        rows.iter().map(|r| (r.minute, r.total_goals)).collect::<Vec<_>>(),
        vec![(90, 4), (12, 2), (45, 2)]
    );
}

#[test]
fn odds_category_stats() {
    let with_odds = |value: &str, hg: i64, ag: i64| {
        MatchEvent::new(
            "Liga Teste".to_string(),
            10,
            14,
            "A".to_string(),
            "B".to_string(),
            hg,
            ag,
            HashMap::from([("Mercado".to_string(), value.to_string())]),
        )
    };
    let events = vec![
        with_odds("Sim", 2, 1),
        with_odds("Sim", 3, 2),
        with_odds("Não", 0, 1),
    ];
    let rows = profile_odds_column(&events, "Mercado");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].value, "Sim");
    assert_eq!(rows[0].total_goals, 8);
    assert_eq!(rows[0].games, 2);
    assert_eq!(rows[0].mean_goals, 4.00);
    assert_eq!(rows[1].value, "Não");
    assert_eq!(rows[1].mean_goals, 1.00);
}

#[test]
fn odds_profile_skips_rows_without_the_column() {
    let events = vec![
        MatchEvent::new(
            "L".to_string(),
            1,
            10,
            "A".to_string(),
            "B".to_string(),
            1,
            1,
            HashMap::from([("Mercado".to_string(), "Sim".to_string())]),
        ),
        event(10, 1, "C", "D", 4, 4),
    ];
    let rows = profile_odds_column(&events, "Mercado");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].games, 1);
    assert_eq!(rows[0].total_goals, 2);
}

#[test]
fn empty_input_yields_empty_products() {
    let out = compute_goal_rankings(&[], &RankingConfig::default());
    assert!(out.by_hour.is_empty());
    assert!(out.matchups.is_empty());
    assert!(out.by_minute.is_empty());
    assert_eq!(out.odds.len(), 4);
    assert!(out.odds.iter().all(|(_, rows)| rows.is_empty()));
    assert!(out.home_teams.is_empty());
    assert!(out.away_teams.is_empty());
}

#[test]
fn empty_search_is_a_noop() {
    let events = vec![event(14, 10, "A", "B", 2, 1), event(21, 20, "C", "D", 0, 0)];
    assert_eq!(filter_by_hour_search(&events, ""), events);
    assert_eq!(filter_by_hour_search(&events, "   "), events);
}

#[test]
fn search_matches_hour_substring() {
    let events = vec![event(14, 10, "A", "B", 2, 1), event(21, 20, "C", "D", 3, 0)];
    let kept = filter_by_hour_search(&events, "4");
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].hour, 14);
}

#[test]
fn non_matching_search_empties_every_product() {
    let events = vec![event(14, 10, "A", "B", 2, 1), event(18, 20, "C", "D", 3, 3)];
    let mut cfg = RankingConfig::default();
    cfg.hour_search = "99".to_string();
    let out = compute_goal_rankings(&events, &cfg);
    assert!(out.by_hour.is_empty());
    assert!(out.matchups.is_empty());
    assert!(out.by_minute.is_empty());
    assert!(out.odds.iter().all(|(_, rows)| rows.is_empty()));
    assert!(out.home_teams.is_empty());
    assert!(out.away_teams.is_empty());
}

#[test]
fn pipeline_is_idempotent() {
    let events: Vec<MatchEvent> = (0..50i64)
        .map(|i| event(8 + i % 12, 1 + i % 90, "A", "B", i % 4, (i + 1) % 3))
        .collect();
    let cfg = RankingConfig::default();
    let first = compute_goal_rankings(&events, &cfg);
    let second = compute_goal_rankings(&events, &cfg);
    assert_eq!(first, second);
}
