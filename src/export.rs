use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::rankings::{GoalRankings, OddsCategoryRow, OverRates, TeamMinuteRow};

pub struct ExportReport {
    pub sheets: usize,
    pub rows: usize,
}

/// Writes every data product to its own worksheet, plus a summary sheet with
/// headline rates and a generation timestamp.
pub fn export_rankings_xlsx(
    path: &Path,
    rankings: &GoalRankings,
    rates: &OverRates,
) -> Result<ExportReport> {
    let mut workbook = Workbook::new();
    let mut report = ExportReport { sheets: 0, rows: 0 };

    add_sheet(&mut workbook, "Hours", hour_rows(rankings), &mut report)?;
    add_sheet(&mut workbook, "Matchups", matchup_rows(rankings), &mut report)?;
    add_sheet(&mut workbook, "Minutes", minute_rows(rankings), &mut report)?;
    for (column, profile) in &rankings.odds {
        add_sheet(
            &mut workbook,
            &sheet_name(column),
            odds_rows(profile),
            &mut report,
        )?;
    }
    add_sheet(
        &mut workbook,
        "Home Teams",
        team_rows(&rankings.home_teams),
        &mut report,
    )?;
    add_sheet(
        &mut workbook,
        "Away Teams",
        team_rows(&rankings.away_teams),
        &mut report,
    )?;
    add_sheet(&mut workbook, "Summary", summary_rows(rankings, rates), &mut report)?;

    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;
    Ok(report)
}

/// Serializes the whole result set to JSON, written to a temp file and
/// swapped into place.
pub fn export_rankings_json(path: &Path, rankings: &GoalRankings) -> Result<()> {
    let json = serde_json::to_string_pretty(rankings).context("serialize rankings")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap into {}", path.display()))?;
    Ok(())
}

fn add_sheet(
    workbook: &mut Workbook,
    name: &str,
    rows: Vec<Vec<String>>,
    report: &mut ExportReport,
) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(name)?;
    write_rows(sheet, &rows)?;
    report.sheets += 1;
    // Header rows do not count as data.
    report.rows += rows.len().saturating_sub(1);
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

// Excel worksheet names cap at 31 chars.
fn sheet_name(column: &str) -> String {
    column.chars().take(31).collect()
}

fn hour_rows(rankings: &GoalRankings) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Hora".to_string(),
        "Total de Gols".to_string(),
        "Rank".to_string(),
    ]];
    rows.extend(rankings.by_hour.iter().map(|r| {
        vec![
            r.hour.to_string(),
            r.total_goals.to_string(),
            r.rank.to_string(),
        ]
    }));
    rows
}

fn matchup_rows(rankings: &GoalRankings) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Confronto".to_string(),
        "Total de Gols".to_string(),
        "Jogos".to_string(),
        "Média de Gols".to_string(),
        "Rank (Soma)".to_string(),
        "Rank (Média)".to_string(),
    ]];
    rows.extend(rankings.matchups.iter().map(|r| {
        vec![
            r.matchup.clone(),
            r.total_goals.to_string(),
            r.games.to_string(),
            format!("{:.2}", r.mean_goals),
            r.rank_by_sum.to_string(),
            r.rank_by_mean.to_string(),
        ]
    }));
    rows
}

fn minute_rows(rankings: &GoalRankings) -> Vec<Vec<String>> {
    let mut rows = vec![vec!["Minuto".to_string(), "Total de Gols".to_string()]];
    rows.extend(
        rankings
            .by_minute
            .iter()
            .map(|r| vec![r.minute.to_string(), r.total_goals.to_string()]),
    );
    rows
}

fn odds_rows(profile: &[OddsCategoryRow]) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Valor Odds".to_string(),
        "Total de Gols".to_string(),
        "Nº Jogos".to_string(),
        "Média de Gols".to_string(),
    ]];
    rows.extend(profile.iter().map(|r| {
        vec![
            r.value.clone(),
            r.total_goals.to_string(),
            r.games.to_string(),
            format!("{:.2}", r.mean_goals),
        ]
    }));
    rows
}

fn team_rows(rows_in: &[TeamMinuteRow]) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Minuto".to_string(),
        "Time".to_string(),
        "Gols".to_string(),
        "Jogos".to_string(),
        "Média por Minuto".to_string(),
    ]];
    rows.extend(rows_in.iter().map(|r| {
        vec![
            r.minute.to_string(),
            r.team.clone(),
            r.goals.to_string(),
            r.games.to_string(),
            format!("{:.2}", r.mean_per_minute),
        ]
    }));
    rows
}

fn summary_rows(rankings: &GoalRankings, rates: &OverRates) -> Vec<Vec<String>> {
    let mut rows = vec![vec!["Campo".to_string(), "Valor".to_string()]];
    if let Some(top) = rankings.by_hour.first() {
        rows.push(vec!["Horário com mais gols".to_string(), top.hour.to_string()]);
        rows.push(vec![
            "Total de gols neste horário".to_string(),
            top.total_goals.to_string(),
        ]);
    }
    rows.push(vec![
        "% Over 3.5 Gols".to_string(),
        format!("{:.2}%", rates.over_35),
    ]);
    rows.push(vec![
        "% Over 4.5 Gols".to_string(),
        format!("{:.2}%", rates.over_45),
    ]);
    rows.push(vec![
        "% Over 5.5 Gols".to_string(),
        format!("{:.2}%", rates.over_55),
    ]);
    rows.push(vec!["Gerado em".to_string(), Utc::now().to_rfc3339()]);
    rows
}
