use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FetchError;
use crate::league::Matchup;

/// Where the engine gets its roster and weekly results from.
pub trait LeagueSource {
    /// Every team in the season, in a stable order.
    fn list_teams(&self) -> Result<Vec<String>>;

    /// Number of finished weeks; the engine processes weeks `1..=N`.
    fn completed_week_count(&self) -> Result<u32>;

    fn week_matchups(&self, week: u32) -> std::result::Result<Vec<Matchup>, FetchError>;
}

const LEAGUE_FILE: &str = "league.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueFile {
    pub teams: Vec<String>,
    pub completed_weeks: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekFileEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<u32>,
    pub home: String,
    pub away: String,
    pub home_score: f64,
    pub away_score: f64,
}

/// League snapshot on disk: `league.json` plus one `week_NN.json` per week.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
    league: LeagueFile,
}

impl JsonDirSource {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let path = dir.join(LEAGUE_FILE);
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("read league file {}", path.display()))?;
        let league = parse_league_json(&raw)
            .with_context(|| format!("parse league file {}", path.display()))?;
        Ok(Self { dir, league })
    }

    fn week_path(&self, week: u32) -> PathBuf {
        let padded = self.dir.join(format!("week_{week:02}.json"));
        if padded.exists() {
            return padded;
        }
        self.dir.join(format!("week_{week}.json"))
    }
}

impl LeagueSource for JsonDirSource {
    fn list_teams(&self) -> Result<Vec<String>> {
        Ok(self.league.teams.clone())
    }

    fn completed_week_count(&self) -> Result<u32> {
        Ok(self.league.completed_weeks)
    }

    fn week_matchups(&self, week: u32) -> std::result::Result<Vec<Matchup>, FetchError> {
        let path = self.week_path(week);
        debug!(week, path = %path.display(), "reading week file");
        let raw = fs::read_to_string(&path).map_err(|source| FetchError::Io { week, source })?;
        parse_week_json(week, &raw)
    }
}

pub fn parse_league_json(raw: &str) -> Result<LeagueFile> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow!("empty league file"));
    }
    let league: LeagueFile = serde_json::from_str(trimmed).context("invalid league json")?;
    Ok(league)
}

/// Parse one week file. Entries without an explicit week inherit `week`.
pub fn parse_week_json(week: u32, raw: &str) -> std::result::Result<Vec<Matchup>, FetchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(FetchError::Unavailable {
            week,
            reason: "empty week file".to_string(),
        });
    }
    let entries: Vec<WeekFileEntry> =
        serde_json::from_str(trimmed).map_err(|source| FetchError::Parse { week, source })?;
    Ok(entries
        .into_iter()
        .map(|e| Matchup {
            week: e.week.unwrap_or(week),
            home: e.home,
            away: e.away,
            home_score: e.home_score,
            away_score: e.away_score,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_entries_inherit_file_week() {
        let raw = r#"[
            {"home": "A", "away": "B", "home_score": 101.2, "away_score": 88.0},
            {"week": 7, "home": "C", "away": "D", "home_score": 0, "away_score": 12.5}
        ]"#;
        let matchups = parse_week_json(6, raw).expect("valid json");
        assert_eq!(matchups.len(), 2);
        assert_eq!(matchups[0].week, 6);
        assert_eq!(matchups[1].week, 7);
        assert_eq!(matchups[1].away_score, 12.5);
    }

    #[test]
    fn broken_week_file_is_a_fetch_error() {
        let err = parse_week_json(3, "[{").unwrap_err();
        assert!(matches!(err, FetchError::Parse { week: 3, .. }));
        let err = parse_week_json(4, "  ").unwrap_err();
        assert_eq!(err.week(), 4);
    }

    #[test]
    fn league_file_parses() {
        let league = parse_league_json(r#"{"teams": ["A", "B"], "completed_weeks": 2}"#)
            .expect("valid league");
        assert_eq!(league.teams, vec!["A", "B"]);
        assert_eq!(league.completed_weeks, 2);
        assert!(parse_league_json("null").is_err());
    }
}
