use serde::{Deserialize, Serialize};

use crate::closest::{ClosestGameRecord, TieBreak};
use crate::series::{CumulativeRow, TeamSeries};
use crate::standings::StandingsSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsRow {
    pub week: u32,
    pub team: String,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedWeek {
    pub week: u32,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamLegend {
    pub team: String,
    pub color: Option<String>,
}

/// Everything one engine run produces. All tables come from the same pass
/// over the source, so they agree on roster and skipped weeks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonReport {
    pub generated_at: String,
    pub completed_weeks: u32,
    pub processed_weeks: Vec<u32>,
    pub skipped_weeks: Vec<SkippedWeek>,
    pub stopped_early: bool,
    pub tie_break: TieBreak,
    pub teams: Vec<TeamLegend>,
    pub series: Vec<TeamSeries>,
    pub cumulative: Vec<CumulativeRow>,
    pub standings: Vec<StandingsSnapshot>,
    pub closest_games: Vec<ClosestGameRecord>,
    pub raw_points: Vec<PointsRow>,
}

impl SeasonReport {
    pub fn is_complete(&self) -> bool {
        self.skipped_weeks.is_empty() && !self.stopped_early
    }

    pub fn standings_for_week(&self, week: u32) -> Vec<&StandingsSnapshot> {
        self.standings.iter().filter(|s| s.week == week).collect()
    }

    pub fn final_standings(&self) -> Vec<&StandingsSnapshot> {
        match self.processed_weeks.last() {
            Some(&week) => self.standings_for_week(week),
            None => Vec::new(),
        }
    }

    pub fn series_for(&self, team: &str) -> Option<&TeamSeries> {
        self.series.iter().find(|s| s.team == team)
    }
}

/// Highest score first. Equal scores keep their incoming order.
pub fn sort_points_desc(mut rows: Vec<PointsRow>) -> Vec<PointsRow> {
    rows.sort_by(|a, b| b.points.total_cmp(&a.points));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(week: u32, team: &str, points: f64) -> PointsRow {
        PointsRow {
            week,
            team: team.to_string(),
            points,
        }
    }

    #[test]
    fn points_sort_is_descending_and_stable() {
        let sorted = sort_points_desc(vec![
            row(1, "A", 90.0),
            row(1, "B", 120.0),
            row(2, "C", 90.0),
            row(2, "A", 150.5),
        ]);
        let keys: Vec<(u32, &str)> = sorted.iter().map(|r| (r.week, r.team.as_str())).collect();
        assert_eq!(keys, vec![(2, "A"), (1, "B"), (1, "A"), (2, "C")]);
    }
}
