use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dataset::{
    COL_FIVE_PLUS_AWAY, COL_FIVE_PLUS_HOME, COL_WINNER_FT_AWAY, COL_WINNER_FT_HOME, MatchEvent,
};

const LEAGUES: &[&str] = &[
    "Brasileirão Série A",
    "Brasileirão Série B",
    "Premier League",
    "La Liga",
    "Bundesliga",
];

const TEAMS: &[&str] = &[
    "Flamengo",
    "Palmeiras",
    "Corinthians",
    "Santos",
    "Grêmio",
    "Internacional",
    "São Paulo",
    "Fluminense",
    "Botafogo",
    "Cruzeiro",
    "Atlético-MG",
    "Bahia",
];

/// Deterministic synthetic event table: same seed, same rows. Lets the
/// dashboard run without a CSV and gives the bench a stable input.
pub fn generate_events(count: usize, seed: u64) -> Vec<MatchEvent> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| random_event(&mut rng)).collect()
}

fn random_event(rng: &mut StdRng) -> MatchEvent {
    let league = LEAGUES[rng.gen_range(0..LEAGUES.len())];
    let home_idx = rng.gen_range(0..TEAMS.len());
    let mut away_idx = rng.gen_range(0..TEAMS.len());
    if away_idx == home_idx {
        away_idx = (away_idx + 1) % TEAMS.len();
    }

    let home_goals = sample_goals(rng);
    let away_goals = sample_goals(rng);
    let total = home_goals + away_goals;

    let odds = HashMap::from([
        (
            COL_WINNER_FT_HOME.to_string(),
            odds_band(rng, home_goals >= away_goals),
        ),
        (
            COL_WINNER_FT_AWAY.to_string(),
            odds_band(rng, away_goals >= home_goals),
        ),
        (COL_FIVE_PLUS_HOME.to_string(), five_plus_label(total)),
        (COL_FIVE_PLUS_AWAY.to_string(), five_plus_label(total)),
    ]);

    MatchEvent::new(
        league.to_string(),
        rng.gen_range(1..=90),
        rng.gen_range(8..=23),
        TEAMS[home_idx].to_string(),
        TEAMS[away_idx].to_string(),
        home_goals,
        away_goals,
        odds,
    )
}

// Low scores dominate, like real match minutes do.
fn sample_goals(rng: &mut StdRng) -> i64 {
    match rng.gen_range(0..100) {
        0..=44 => 0,
        45..=74 => 1,
        75..=89 => 2,
        90..=96 => 3,
        _ => 4,
    }
}

fn odds_band(rng: &mut StdRng, favored: bool) -> String {
    let bands: &[&str] = if favored {
        &["1.01 - 1.50", "1.51 - 2.00", "2.01 - 3.00"]
    } else {
        &["2.01 - 3.00", "3.01 - 5.00", "5.01+"]
    };
    bands[rng.gen_range(0..bands.len())].to_string()
}

fn five_plus_label(total: i64) -> String {
    let label = if total >= 5 { "Sim" } else { "Não" };
    label.to_string()
}
