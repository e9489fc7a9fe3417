use std::path::PathBuf;

use anyhow::{Result, anyhow};

use ffl_season::closest::TieBreak;
use ffl_season::config::{RunConfig, synthetic_from_env};
use ffl_season::engine::SeasonEngine;
use ffl_season::export;
use ffl_season::logging::init_logging;
use ffl_season::source::JsonDirSource;
use ffl_season::synthetic::SyntheticLeague;

const DEFAULT_SYNTHETIC_SEED: u64 = 7;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_logging("info");

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut cfg = RunConfig::from_env()?;
    apply_args(&mut cfg, &args)?;

    let report = if let Some(opts) = cfg.synthetic.as_ref() {
        let league = SyntheticLeague::generate(opts);
        SeasonEngine::run(&league, cfg.season.clone())?
    } else {
        let dir = cfg
            .league_dir
            .clone()
            .ok_or_else(|| anyhow!("no league data: pass --league-dir or --synthetic"))?;
        let source = JsonDirSource::open(dir)?;
        SeasonEngine::run(&source, cfg.season.clone())?
    };

    let summary = export::export_report(&cfg.report_dir, &report)?;

    println!("Season aggregation complete");
    println!(
        "Weeks: {}/{} processed",
        report.processed_weeks.len(),
        report.completed_weeks
    );
    if !report.skipped_weeks.is_empty() {
        println!("Skipped weeks: {}", report.skipped_weeks.len());
        for skipped in &report.skipped_weeks {
            println!("   - week {}: {}", skipped.week, skipped.reason);
        }
    }
    println!("Cumulative rows: {}", summary.cumulative_rows);
    println!("Standings rows: {}", summary.standings_rows);
    println!("Closest games: {}", summary.closest_rows);
    println!("Raw points rows: {}", summary.points_rows);
    println!("JSON: {}", summary.json_path.display());
    println!("Workbook: {}", summary.workbook_path.display());

    let standings = report.final_standings();
    if let Some(first) = standings.first() {
        println!();
        println!("Standings after week {}:", first.week);
        for row in &standings {
            println!(
                "{:>3}. {:<24} {:>5} {:>9.2}",
                row.rank, row.team, row.record, row.points_for_total
            );
        }
    }

    Ok(())
}

fn apply_args(cfg: &mut RunConfig, args: &[String]) -> Result<()> {
    if let Some(dir) = arg_value(args, "--league-dir") {
        cfg.league_dir = Some(PathBuf::from(dir));
    }
    if let Some(dir) = arg_value(args, "--out") {
        cfg.report_dir = PathBuf::from(dir);
    }
    if let Some(raw) = arg_value(args, "--tie-break") {
        cfg.season.tie_break = raw.parse::<TieBreak>().map_err(|e| anyhow!(e))?;
    }
    if let Some(raw) = arg_value(args, "--synthetic") {
        let seed = raw
            .parse::<u64>()
            .map_err(|_| anyhow!("invalid --synthetic seed {raw:?}"))?;
        cfg.synthetic = Some(synthetic_from_env(seed));
    } else if args.iter().any(|a| a == "--synthetic") && cfg.synthetic.is_none() {
        cfg.synthetic = Some(synthetic_from_env(DEFAULT_SYNTHETIC_SEED));
    }
    Ok(())
}

/// `--name=value` or `--name value`.
fn arg_value(args: &[String], name: &str) -> Option<String> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(name).and_then(|rest| rest.strip_prefix('=')) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.starts_with("--")
            && !next.trim().is_empty()
        {
            return Some(next.clone());
        }
    }
    None
}
