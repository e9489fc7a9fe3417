use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::closest::TieBreak;
use crate::synthetic::SyntheticOptions;

const DEFAULT_REPORT_DIR: &str = "reports";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamColor {
    pub team: String,
    pub color: String,
}

/// Engine settings. Passed in explicitly; the engine never reads the
/// environment itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeasonConfig {
    #[serde(default)]
    pub team_colors: Vec<TeamColor>,
    #[serde(default)]
    pub tie_break: TieBreak,
}

impl SeasonConfig {
    pub fn color_for(&self, team: &str) -> Option<&str> {
        self.team_colors
            .iter()
            .find(|c| c.team == team)
            .map(|c| c.color.as_str())
    }

    /// `TEAM_COLORS_PATH` and `TIE_BREAK`.
    pub fn from_env() -> Result<Self> {
        let team_colors = match opt_env("TEAM_COLORS_PATH") {
            Some(path) => load_team_colors(Path::new(&path))?,
            None => Vec::new(),
        };
        let tie_break = match opt_env("TIE_BREAK") {
            Some(raw) => raw.parse::<TieBreak>().map_err(|e| anyhow!(e))?,
            None => TieBreak::default(),
        };
        Ok(Self {
            team_colors,
            tie_break,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ColorsFile {
    List(Vec<TeamColor>),
    Map(BTreeMap<String, String>),
}

pub fn load_team_colors(path: &Path) -> Result<Vec<TeamColor>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read team colors {}", path.display()))?;
    parse_team_colors(&raw).with_context(|| format!("parse team colors {}", path.display()))
}

/// Accepts `[{"team": .., "color": ..}]` or `{"Team": "#hex"}`.
pub fn parse_team_colors(raw: &str) -> Result<Vec<TeamColor>> {
    let parsed: ColorsFile = serde_json::from_str(raw.trim()).context("invalid team colors json")?;
    Ok(match parsed {
        ColorsFile::List(list) => list,
        ColorsFile::Map(map) => map
            .into_iter()
            .map(|(team, color)| TeamColor { team, color })
            .collect(),
    })
}

/// Everything the CLI needs for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub league_dir: Option<PathBuf>,
    pub report_dir: PathBuf,
    pub synthetic: Option<SyntheticOptions>,
    pub season: SeasonConfig,
}

impl RunConfig {
    /// Reads `LEAGUE_DIR`, `REPORT_DIR`, `SYNTHETIC_SEED`, `SYNTHETIC_TEAMS`,
    /// `SYNTHETIC_WEEKS` plus the [`SeasonConfig`] variables.
    pub fn from_env() -> Result<Self> {
        let league_dir = opt_env("LEAGUE_DIR").map(PathBuf::from);
        let report_dir = opt_env("REPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_DIR));
        let synthetic = opt_env("SYNTHETIC_SEED")
            .and_then(|val| val.parse::<u64>().ok())
            .map(synthetic_from_env);
        Ok(Self {
            league_dir,
            report_dir,
            synthetic,
            season: SeasonConfig::from_env()?,
        })
    }
}

pub fn synthetic_from_env(seed: u64) -> SyntheticOptions {
    let defaults = SyntheticOptions::default();
    SyntheticOptions {
        seed,
        teams: opt_env("SYNTHETIC_TEAMS")
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(defaults.teams)
            .clamp(2, 32),
        weeks: opt_env("SYNTHETIC_WEEKS")
            .and_then(|val| val.parse::<u32>().ok())
            .unwrap_or(defaults.weeks)
            .clamp(1, 18),
        ..defaults
    }
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .and_then(|val| if val.trim().is_empty() { None } else { Some(val) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_parse_from_list_and_map() {
        let list = parse_team_colors(r##"[{"team": "A", "color": "#ff0000"}]"##).unwrap();
        assert_eq!(list[0].team, "A");

        let map = parse_team_colors(r##"{"B": "#00ff00", "A": "#0000ff"}"##).unwrap();
        assert_eq!(map.len(), 2);
        let cfg = SeasonConfig {
            team_colors: map,
            tie_break: TieBreak::AwayWins,
        };
        assert_eq!(cfg.color_for("B"), Some("#00ff00"));
        assert_eq!(cfg.color_for("C"), None);
    }

    #[test]
    fn bad_colors_json_is_an_error() {
        assert!(parse_team_colors("[1, 2]").is_err());
    }
}
