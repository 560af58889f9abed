use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;

// Wire column names of the event CSV format.
pub const COL_LEAGUE: &str = "Liga";
pub const COL_MINUTE: &str = "Minuto";
pub const COL_HOUR: &str = "Hora";
pub const COL_HOME_TEAM: &str = "TimeA";
pub const COL_AWAY_TEAM: &str = "TimeB";
pub const COL_HOME_GOALS: &str = "TimeA_Gols";
pub const COL_AWAY_GOALS: &str = "TimeB_Gols";

pub const COL_WINNER_FT_HOME: &str = "VencedorFT_Casa";
pub const COL_WINNER_FT_AWAY: &str = "VencedorFT_Visitante";
pub const COL_FIVE_PLUS_HOME: &str = "TimeGols_Casa5mais";
pub const COL_FIVE_PLUS_AWAY: &str = "TimeGols_Visitante5mais";

/// One normalized match event. `total_goals` and `matchup_label` are derived
/// once in [`MatchEvent::new`] and never recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchEvent {
    pub league: String,
    pub minute: i64,
    pub hour: i64,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: i64,
    pub away_goals: i64,
    pub total_goals: i64,
    pub matchup_label: String,
    /// Categorical odds labels keyed by wire column name.
    pub odds: HashMap<String, String>,
}

impl MatchEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        league: String,
        minute: i64,
        hour: i64,
        home_team: String,
        away_team: String,
        home_goals: i64,
        away_goals: i64,
        odds: HashMap<String, String>,
    ) -> Self {
        let total_goals = home_goals + away_goals;
        let matchup_label = format!("{home_team} x {away_team}");
        Self {
            league,
            minute,
            hour,
            home_team,
            away_team,
            home_goals,
            away_goals,
            total_goals,
            matchup_label,
            odds,
        }
    }
}

/// Lenient integer coercion: anything that fails to parse counts as 0, so a
/// dirty cell never aborts a load. Decimal renderings ("2.0") keep their
/// integer value.
pub fn parse_int_lossy(raw: &str) -> i64 {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return 0;
    }
    if let Ok(n) = s.parse::<i64>() {
        return n;
    }
    s.parse::<f64>().map(|v| v as i64).unwrap_or(0)
}

pub fn load_events_csv(path: &Path, odds_columns: &[String]) -> Result<Vec<MatchEvent>> {
    let file =
        File::open(path).with_context(|| format!("open events csv {}", path.display()))?;
    load_events_from_reader(file, odds_columns)
        .with_context(|| format!("load events csv {}", path.display()))
}

pub fn load_events_from_reader(
    reader: impl Read,
    odds_columns: &[String],
) -> Result<Vec<MatchEvent>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers().context("read csv header")?.clone();
    let idx = column_indexes(&headers, odds_columns)?;

    let mut out = Vec::new();
    for (offset, record) in reader.records().enumerate() {
        // Header is line 1, so the first data record is line 2.
        let record = record.with_context(|| format!("read csv record at line {}", offset + 2))?;
        out.push(event_from_record(&record, &idx));
    }
    Ok(out)
}

struct ColumnIndexes {
    league: usize,
    minute: usize,
    hour: usize,
    home_team: usize,
    away_team: usize,
    home_goals: usize,
    away_goals: usize,
    odds: Vec<(String, usize)>,
}

fn column_indexes(headers: &csv::StringRecord, odds_columns: &[String]) -> Result<ColumnIndexes> {
    let find = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| anyhow!("missing required column '{name}' in events csv header"))
    };

    let mut odds = Vec::with_capacity(odds_columns.len());
    for col in odds_columns {
        odds.push((col.clone(), find(col)?));
    }

    Ok(ColumnIndexes {
        league: find(COL_LEAGUE)?,
        minute: find(COL_MINUTE)?,
        hour: find(COL_HOUR)?,
        home_team: find(COL_HOME_TEAM)?,
        away_team: find(COL_AWAY_TEAM)?,
        home_goals: find(COL_HOME_GOALS)?,
        away_goals: find(COL_AWAY_GOALS)?,
        odds,
    })
}

fn event_from_record(record: &csv::StringRecord, idx: &ColumnIndexes) -> MatchEvent {
    let field = |i: usize| record.get(i).unwrap_or_default();

    let odds = idx
        .odds
        .iter()
        .map(|(name, i)| (name.clone(), field(*i).to_string()))
        .collect();

    MatchEvent::new(
        field(idx.league).to_string(),
        parse_int_lossy(field(idx.minute)),
        parse_int_lossy(field(idx.hour)),
        field(idx.home_team).to_string(),
        field(idx.away_team).to_string(),
        parse_int_lossy(field(idx.home_goals)),
        parse_int_lossy(field(idx.away_goals)),
        odds,
    )
}

#[cfg(test)]
mod tests {
    use super::{MatchEvent, load_events_from_reader, parse_int_lossy};
    use std::collections::HashMap;

    #[test]
    fn lossy_parse_substitutes_zero() {
        assert_eq!(parse_int_lossy("3"), 3);
        assert_eq!(parse_int_lossy(" 2 "), 2);
        assert_eq!(parse_int_lossy("2.0"), 2);
        assert_eq!(parse_int_lossy("-1"), -1);
        assert_eq!(parse_int_lossy(""), 0);
        assert_eq!(parse_int_lossy("-"), 0);
        assert_eq!(parse_int_lossy("abc"), 0);
        assert_eq!(parse_int_lossy("1x"), 0);
    }

    #[test]
    fn event_derives_total_and_matchup() {
        let e = MatchEvent::new(
            "Liga".to_string(),
            12,
            20,
            "Alfa".to_string(),
            "Beta".to_string(),
            2,
            1,
            HashMap::new(),
        );
        assert_eq!(e.total_goals, 3);
        assert_eq!(e.matchup_label, "Alfa x Beta");
    }

    #[test]
    fn missing_column_names_the_column() {
        let csv = "Liga,Minuto,TimeA,TimeB,TimeA_Gols,TimeB_Gols\nX,1,A,B,0,0\n";
        let err = load_events_from_reader(csv.as_bytes(), &[]).unwrap_err();
        assert!(format!("{err:#}").contains("missing required column 'Hora'"));
    }

    #[test]
    fn dirty_cells_become_zero_goals() {
        let csv = "Liga,Minuto,Hora,TimeA,TimeB,TimeA_Gols,TimeB_Gols\nX,n/a,14,A,B,abc,\n";
        let events = load_events_from_reader(csv.as_bytes(), &[]).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].minute, 0);
        assert_eq!(events[0].home_goals, 0);
        assert_eq!(events[0].away_goals, 0);
        assert_eq!(events[0].total_goals, 0);
    }
}
