use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use gol_terminal::dataset::load_events_csv;
use gol_terminal::export::{export_rankings_json, export_rankings_xlsx};
use gol_terminal::rankings::{RankingConfig, compute_goal_rankings, over_rates};

/// Headless export: load an events CSV, run the ranking pipeline, write the
/// results as a workbook and/or JSON document.
///
/// Usage: export_stats <events.csv> [--xlsx out.xlsx] [--json out.json] [--search QUERY]
fn main() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let input = args
        .first()
        .filter(|a| !a.starts_with("--"))
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("usage: export_stats <events.csv> [--xlsx PATH] [--json PATH] [--search QUERY]"))?;

    let xlsx_path = flag_value(&args, "--xlsx").map(PathBuf::from);
    let json_path = flag_value(&args, "--json").map(PathBuf::from);
    let mut config = RankingConfig::default();
    if let Some(query) = flag_value(&args, "--search") {
        config.hour_search = query;
    }

    let events = load_events_csv(&input, &config.odds_columns)
        .with_context(|| format!("load dataset {}", input.display()))?;
    println!("Loaded {} events from {}", events.len(), input.display());

    let rates = over_rates(&events);
    let rankings = compute_goal_rankings(&events, &config);
    println!(
        "Computed {} hour buckets, {} matchups, {} minutes, {} odds profiles",
        rankings.by_hour.len(),
        rankings.matchups.len(),
        rankings.by_minute.len(),
        rankings.odds.len()
    );

    let mut wrote = false;
    if let Some(path) = &xlsx_path {
        let report = export_rankings_xlsx(path, &rankings, &rates)?;
        println!(
            "Wrote {} sheets / {} rows to {}",
            report.sheets,
            report.rows,
            path.display()
        );
        wrote = true;
    }
    if let Some(path) = &json_path {
        export_rankings_json(path, &rankings)?;
        println!("Wrote rankings json to {}", path.display());
        wrote = true;
    }
    if !wrote {
        let path = input.with_extension("xlsx");
        let report = export_rankings_xlsx(&path, &rankings, &rates)?;
        println!(
            "Wrote {} sheets / {} rows to {}",
            report.sheets,
            report.rows,
            path.display()
        );
    }

    Ok(())
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|idx| args.get(idx + 1))
        .cloned()
}
