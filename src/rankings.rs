use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::dataset::{
    COL_FIVE_PLUS_AWAY, COL_FIVE_PLUS_HOME, COL_WINNER_FT_AWAY, COL_WINNER_FT_HOME, MatchEvent,
};

/// Odds columns profiled when the caller does not configure its own list.
pub static DEFAULT_ODDS_COLUMNS: Lazy<Vec<String>> = Lazy::new(|| {
    [
        COL_WINNER_FT_HOME,
        COL_WINNER_FT_AWAY,
        COL_FIVE_PLUS_HOME,
        COL_FIVE_PLUS_AWAY,
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Case-insensitive substring matched against the stringified hour bucket.
    /// Empty keeps every row.
    pub hour_search: String,
    /// Categorical columns profiled by [`profile_odds_columns`], in output order.
    pub odds_columns: Vec<String>,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            hour_search: String::new(),
            odds_columns: DEFAULT_ODDS_COLUMNS.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourRankRow {
    pub hour: i64,
    pub total_goals: i64,
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupRow {
    pub matchup: String,
    pub total_goals: i64,
    pub games: u64,
    pub mean_goals: f64,
    pub rank_by_sum: u32,
    pub rank_by_mean: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinuteRow {
    pub minute: i64,
    pub total_goals: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OddsCategoryRow {
    pub value: String,
    pub total_goals: i64,
    pub games: u64,
    pub mean_goals: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamMinuteRow {
    pub minute: i64,
    pub team: String,
    pub goals: i64,
    pub games: u64,
    pub mean_per_minute: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSide {
    Home,
    Away,
}

/// The six data products computed from one normalized event table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GoalRankings {
    pub by_hour: Vec<HourRankRow>,
    pub matchups: Vec<MatchupRow>,
    pub by_minute: Vec<MinuteRow>,
    /// One profile per configured odds column, in configured order.
    pub odds: Vec<(String, Vec<OddsCategoryRow>)>,
    pub home_teams: Vec<TeamMinuteRow>,
    pub away_teams: Vec<TeamMinuteRow>,
}

/// Runs the whole pipeline: hour-search filter, then the five independent
/// rankers/profilers. The rankers only read the shared filtered slice, so
/// they run on a rayon join tree; output is identical to sequential order.
pub fn compute_goal_rankings(events: &[MatchEvent], cfg: &RankingConfig) -> GoalRankings {
    let view = filter_by_hour_search(events, &cfg.hour_search);
    let ev = view.as_slice();

    let (by_hour, (matchups, (by_minute, (odds, (home_teams, away_teams))))) = rayon::join(
        || rank_hours(ev),
        || {
            rayon::join(
                || rank_matchups(ev),
                || {
                    rayon::join(
                        || rank_minutes(ev),
                        || {
                            rayon::join(
                                || profile_odds_columns(ev, &cfg.odds_columns),
                                || {
                                    rayon::join(
                                        || team_side_profile(ev, TeamSide::Home),
                                        || team_side_profile(ev, TeamSide::Away),
                                    )
                                },
                            )
                        },
                    )
                },
            )
        },
    );

    GoalRankings {
        by_hour,
        matchups,
        by_minute,
        odds,
        home_teams,
        away_teams,
    }
}

/// Keeps rows whose stringified hour contains `search` case-insensitively.
/// An empty or whitespace-only search keeps everything.
pub fn filter_by_hour_search(events: &[MatchEvent], search: &str) -> Vec<MatchEvent> {
    let query = search.trim().to_lowercase();
    if query.is_empty() {
        return events.to_vec();
    }
    events
        .iter()
        .filter(|e| e.hour.to_string().contains(&query))
        .cloned()
        .collect()
}

/// Goals per hour bucket, descending, with a dense rank over the sums.
pub fn rank_hours(events: &[MatchEvent]) -> Vec<HourRankRow> {
    let mut sums: HashMap<i64, i64> = HashMap::new();
    for e in events {
        *sums.entry(e.hour).or_insert(0) += e.total_goals;
    }

    let mut rows: Vec<(i64, i64)> = sums.into_iter().collect();
    rows.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let ranks = dense_ranks_desc(&rows.iter().map(|&(_, sum)| sum).collect::<Vec<_>>());
    rows.into_iter()
        .zip(ranks)
        .map(|((hour, total_goals), rank)| HourRankRow {
            hour,
            total_goals,
            rank,
        })
        .collect()
}

/// Goals per matchup label, descending by sum, with independent dense ranks
/// over the sum and over the rounded mean. The two ranks can diverge: few
/// very-high-scoring games beat many quiet ones on mean but not on sum.
pub fn rank_matchups(events: &[MatchEvent]) -> Vec<MatchupRow> {
    let mut agg: HashMap<&str, (i64, u64)> = HashMap::new();
    for e in events {
        let slot = agg.entry(e.matchup_label.as_str()).or_insert((0, 0));
        slot.0 += e.total_goals;
        slot.1 += 1;
    }

    let mut rows: Vec<(String, i64, u64)> = agg
        .into_iter()
        .map(|(label, (sum, games))| (label.to_string(), sum, games))
        .collect();
    rows.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let sum_ranks = dense_ranks_desc(&rows.iter().map(|r| r.1).collect::<Vec<_>>());
    let means: Vec<i64> = rows.iter().map(|r| mean_cents(r.1, r.2)).collect();
    let mean_ranks = dense_ranks_desc(&means);

    rows.into_iter()
        .enumerate()
        .map(|(i, (matchup, total_goals, games))| MatchupRow {
            matchup,
            total_goals,
            games,
            mean_goals: means[i] as f64 / 100.0,
            rank_by_sum: sum_ranks[i],
            rank_by_mean: mean_ranks[i],
        })
        .collect()
}

/// Goals per match minute, descending. Display-only ordering, no rank.
pub fn rank_minutes(events: &[MatchEvent]) -> Vec<MinuteRow> {
    let mut sums: HashMap<i64, i64> = HashMap::new();
    for e in events {
        *sums.entry(e.minute).or_insert(0) += e.total_goals;
    }

    let mut rows: Vec<MinuteRow> = sums
        .into_iter()
        .map(|(minute, total_goals)| MinuteRow {
            minute,
            total_goals,
        })
        .collect();
    rows.sort_unstable_by(|a, b| {
        b.total_goals
            .cmp(&a.total_goals)
            .then(a.minute.cmp(&b.minute))
    });
    rows
}

/// One category profile per column, each computed independently.
pub fn profile_odds_columns(
    events: &[MatchEvent],
    columns: &[String],
) -> Vec<(String, Vec<OddsCategoryRow>)> {
    columns
        .iter()
        .map(|col| (col.clone(), profile_odds_column(events, col)))
        .collect()
}

/// Goal stats per category value of one odds column, descending by mean.
/// Rows that do not carry the column are skipped, like a groupby dropping
/// missing keys.
pub fn profile_odds_column(events: &[MatchEvent], column: &str) -> Vec<OddsCategoryRow> {
    let mut agg: HashMap<&str, (i64, u64)> = HashMap::new();
    for e in events {
        let Some(value) = e.odds.get(column) else {
            continue;
        };
        let slot = agg.entry(value.as_str()).or_insert((0, 0));
        slot.0 += e.total_goals;
        slot.1 += 1;
    }

    let mut rows: Vec<OddsCategoryRow> = agg
        .into_iter()
        .map(|(value, (sum, games))| OddsCategoryRow {
            value: value.to_string(),
            total_goals: sum,
            games,
            mean_goals: mean_cents(sum, games) as f64 / 100.0,
        })
        .collect();
    rows.sort_unstable_by(|a, b| {
        cents(b.mean_goals)
            .cmp(&cents(a.mean_goals))
            .then(a.value.cmp(&b.value))
    });
    rows
}

/// Goal stats of one side per (minute, team) pair, descending by that side's
/// goal sum. Home and away runs use disjoint goal columns and are never
/// merged.
pub fn team_side_profile(events: &[MatchEvent], side: TeamSide) -> Vec<TeamMinuteRow> {
    let mut agg: HashMap<(i64, &str), (i64, u64)> = HashMap::new();
    for e in events {
        let (team, goals) = match side {
            TeamSide::Home => (e.home_team.as_str(), e.home_goals),
            TeamSide::Away => (e.away_team.as_str(), e.away_goals),
        };
        let slot = agg.entry((e.minute, team)).or_insert((0, 0));
        slot.0 += goals;
        slot.1 += 1;
    }

    let mut rows: Vec<TeamMinuteRow> = agg
        .into_iter()
        .map(|((minute, team), (sum, games))| TeamMinuteRow {
            minute,
            team: team.to_string(),
            goals: sum,
            games,
            mean_per_minute: mean_cents(sum, games) as f64 / 100.0,
        })
        .collect();
    rows.sort_unstable_by(|a, b| {
        b.goals
            .cmp(&a.goals)
            .then(a.minute.cmp(&b.minute))
            .then(a.team.cmp(&b.team))
    });
    rows
}

/// Share of rows clearing the 3.5 / 4.5 / 5.5 total-goal lines, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OverRates {
    pub over_35: f64,
    pub over_45: f64,
    pub over_55: f64,
}

pub fn over_rates(events: &[MatchEvent]) -> OverRates {
    if events.is_empty() {
        return OverRates::default();
    }
    let n = events.len() as f64;
    let pct = |hits: usize| round2(hits as f64 * 100.0 / n);
    OverRates {
        over_35: pct(events.iter().filter(|e| e.total_goals > 3).count()),
        over_45: pct(events.iter().filter(|e| e.total_goals > 4).count()),
        over_55: pct(events.iter().filter(|e| e.total_goals > 5).count()),
    }
}

/// 1-based dense ranks over descending measures: equal values share a rank,
/// and the next distinct lower value ranks exactly one below the tie group.
fn dense_ranks_desc(measures: &[i64]) -> Vec<u32> {
    let mut distinct = measures.to_vec();
    distinct.sort_unstable_by(|a, b| b.cmp(a));
    distinct.dedup();

    let rank_of: HashMap<i64, u32> = distinct
        .into_iter()
        .zip(1u32..)
        .collect();
    measures.iter().map(|v| rank_of[v]).collect()
}

/// Mean in hundredths, so 2-decimal rounding and rank comparison stay exact.
fn mean_cents(sum: i64, games: u64) -> i64 {
    (sum as f64 / games as f64 * 100.0).round() as i64
}

fn cents(v: f64) -> i64 {
    (v * 100.0).round() as i64
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
