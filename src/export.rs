use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::report::SeasonReport;

const REPORT_JSON: &str = "season_report.json";
const REPORT_XLSX: &str = "season_report.xlsx";

pub struct ExportSummary {
    pub json_path: PathBuf,
    pub workbook_path: PathBuf,
    pub cumulative_rows: usize,
    pub standings_rows: usize,
    pub closest_rows: usize,
    pub points_rows: usize,
}

/// Write both the JSON report and the workbook into `dir`.
pub fn export_report(dir: &Path, report: &SeasonReport) -> Result<ExportSummary> {
    fs::create_dir_all(dir).with_context(|| format!("create report dir {}", dir.display()))?;
    let json_path = dir.join(REPORT_JSON);
    let workbook_path = dir.join(REPORT_XLSX);
    write_json(&json_path, report)?;
    write_workbook(&workbook_path, report)?;
    Ok(ExportSummary {
        json_path,
        workbook_path,
        cumulative_rows: report.cumulative.len(),
        standings_rows: report.standings.len(),
        closest_rows: report.closest_games.len(),
        points_rows: report.raw_points.len(),
    })
}

pub fn write_json(path: &Path, report: &SeasonReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("serialize season report")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).context("write season report")?;
    fs::rename(&tmp, path).context("swap season report")?;
    Ok(())
}

pub fn read_json(path: &Path) -> Result<SeasonReport> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read season report {}", path.display()))?;
    serde_json::from_str(&raw).context("invalid season report json")
}

enum Cell {
    Text(String),
    Number(f64),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<u32> for Cell {
    fn from(value: u32) -> Self {
        Cell::Number(f64::from(value))
    }
}

fn header(names: &[&str]) -> Vec<Cell> {
    names.iter().map(|n| Cell::from(*n)).collect()
}

pub fn write_workbook(path: &Path, report: &SeasonReport) -> Result<()> {
    let mut cumulative_rows = vec![header(&[
        "Week",
        "Team",
        "Color",
        "Cumulative Points",
        "Cumulative Points Against",
    ])];
    for row in &report.cumulative {
        let color = report
            .teams
            .iter()
            .find(|t| t.team == row.team)
            .and_then(|t| t.color.clone())
            .unwrap_or_default();
        cumulative_rows.push(vec![
            row.week.into(),
            row.team.clone().into(),
            color.into(),
            row.cumulative_points_for.into(),
            row.cumulative_points_against.into(),
        ]);
    }

    let mut standings_rows = vec![header(&[
        "Week",
        "Team",
        "Rank",
        "Wins",
        "Losses",
        "Points For",
        "Record",
    ])];
    for s in &report.standings {
        standings_rows.push(vec![
            s.week.into(),
            s.team.clone().into(),
            s.rank.into(),
            s.wins.into(),
            s.losses.into(),
            s.points_for_total.into(),
            s.record.clone().into(),
        ]);
    }

    let mut closest_rows = vec![header(&[
        "Week",
        "Winning Team",
        "Losing Team",
        "Winning Score",
        "Losing Score",
        "Score Difference",
    ])];
    for g in &report.closest_games {
        closest_rows.push(vec![
            g.week.into(),
            g.winning_team.clone().into(),
            g.losing_team.clone().into(),
            g.winning_score.into(),
            g.losing_score.into(),
            g.margin.into(),
        ]);
    }

    let mut points_rows = vec![header(&["Week", "Team", "Points"])];
    for p in &report.raw_points {
        points_rows.push(vec![p.week.into(), p.team.clone().into(), p.points.into()]);
    }

    let mut skipped_rows = vec![header(&["Week", "Reason"])];
    for s in &report.skipped_weeks {
        skipped_rows.push(vec![s.week.into(), s.reason.clone().into()]);
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Cumulative")?;
        write_rows(sheet, &cumulative_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Standings")?;
        write_rows(sheet, &standings_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("ClosestGames")?;
        write_rows(sheet, &closest_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("RawPoints")?;
        write_rows(sheet, &points_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Skipped")?;
        write_rows(sheet, &skipped_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<Cell>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            let written = match value {
                Cell::Text(text) => worksheet.write_string(r, c, text),
                Cell::Number(number) => worksheet.write_number(r, c, *number),
            };
            written.with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
