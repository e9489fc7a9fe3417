use serde::{Deserialize, Serialize};

use crate::error::SeasonError;
use crate::league::{Roster, TeamId};

/// One week of a team's scoring series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub week: u32,
    pub points_for: f64,
    pub points_against: f64,
    pub cumulative_points_for: f64,
    pub cumulative_points_against: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSeries {
    pub team: String,
    pub points: Vec<SeriesPoint>,
}

/// Flat row for the cumulative charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeRow {
    pub week: u32,
    pub team: String,
    pub cumulative_points_for: f64,
    pub cumulative_points_against: f64,
}

#[derive(Debug, Clone, Default)]
struct TeamTrack {
    points: Vec<SeriesPoint>,
    total_for: f64,
    total_against: f64,
}

impl TeamTrack {
    fn last_week(&self) -> u32 {
        self.points.last().map(|p| p.week).unwrap_or(0)
    }
}

/// Per-team running points-for / points-against series.
///
/// Weeks are dense: every team must be recorded for week `w` before `w + 1`.
#[derive(Debug, Clone)]
pub struct TimeSeriesAccumulator {
    teams: Vec<String>,
    tracks: Vec<TeamTrack>,
}

impl TimeSeriesAccumulator {
    pub fn new(roster: &Roster) -> Self {
        Self {
            teams: roster.names().to_vec(),
            tracks: vec![TeamTrack::default(); roster.len()],
        }
    }

    /// Append one week for `team` and return the updated cumulative point.
    pub fn record(
        &mut self,
        team: TeamId,
        week: u32,
        points_for: f64,
        points_against: f64,
    ) -> Result<SeriesPoint, SeasonError> {
        let track = &mut self.tracks[team];
        let expected = track.last_week() + 1;
        if week != expected {
            return Err(SeasonError::Sequence {
                team: self.teams[team].clone(),
                week,
                expected,
            });
        }

        track.total_for += points_for;
        track.total_against += points_against;
        let point = SeriesPoint {
            week,
            points_for,
            points_against,
            cumulative_points_for: track.total_for,
            cumulative_points_against: track.total_against,
        };
        track.points.push(point);
        Ok(point)
    }

    /// Last week recorded for `team`, 0 before the first.
    pub fn last_week(&self, team: TeamId) -> u32 {
        self.tracks[team].last_week()
    }

    pub fn latest(&self, team: TeamId) -> Option<&SeriesPoint> {
        self.tracks[team].points.last()
    }

    pub fn export(&self) -> Vec<TeamSeries> {
        self.teams
            .iter()
            .zip(&self.tracks)
            .map(|(team, track)| TeamSeries {
                team: team.clone(),
                points: track.points.clone(),
            })
            .collect()
    }

    /// Week-major rows, roster order within a week.
    pub fn rows(&self) -> Vec<CumulativeRow> {
        let weeks = self
            .tracks
            .iter()
            .map(|t| t.points.len())
            .max()
            .unwrap_or(0);
        let mut rows = Vec::with_capacity(weeks * self.teams.len());
        for idx in 0..weeks {
            for (team, track) in self.teams.iter().zip(&self.tracks) {
                let Some(point) = track.points.get(idx) else {
                    continue;
                };
                rows.push(CumulativeRow {
                    week: point.week,
                    team: team.clone(),
                    cumulative_points_for: point.cumulative_points_for,
                    cumulative_points_against: point.cumulative_points_against,
                });
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accumulator() -> TimeSeriesAccumulator {
        let roster = Roster::new(["A", "B"]).expect("unique names");
        TimeSeriesAccumulator::new(&roster)
    }

    #[test]
    fn cumulative_values_add_up() {
        let mut acc = accumulator();
        acc.record(0, 1, 100.0, 90.0).unwrap();
        acc.record(0, 2, 80.5, 110.0).unwrap();
        let p = acc.record(0, 3, 0.0, 0.0).unwrap();
        assert_eq!(p.cumulative_points_for, 180.5);
        assert_eq!(p.cumulative_points_against, 200.0);
        assert_eq!(acc.last_week(0), 3);
        assert_eq!(acc.last_week(1), 0);
    }

    #[test]
    fn duplicate_week_is_rejected() {
        let mut acc = accumulator();
        acc.record(1, 1, 10.0, 5.0).unwrap();
        let err = acc.record(1, 1, 10.0, 5.0).unwrap_err();
        assert_eq!(
            err,
            SeasonError::Sequence {
                team: "B".to_string(),
                week: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn skipping_ahead_is_rejected() {
        let mut acc = accumulator();
        let err = acc.record(0, 2, 10.0, 5.0).unwrap_err();
        assert!(matches!(err, SeasonError::Sequence { expected: 1, .. }));
        assert!(acc.latest(0).is_none());
    }

    #[test]
    fn rows_are_week_major() {
        let mut acc = accumulator();
        acc.record(0, 1, 1.0, 2.0).unwrap();
        acc.record(1, 1, 2.0, 1.0).unwrap();
        acc.record(0, 2, 3.0, 4.0).unwrap();
        acc.record(1, 2, 4.0, 3.0).unwrap();
        let rows = acc.rows();
        let order: Vec<(u32, &str)> = rows.iter().map(|r| (r.week, r.team.as_str())).collect();
        assert_eq!(order, vec![(1, "A"), (1, "B"), (2, "A"), (2, "B")]);
        assert_eq!(rows[3].cumulative_points_for, 6.0);
    }
}
