use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::SeasonError;
use crate::league::{Roster, TeamId, TeamWeekOutcome, WeekResult};

/// Ranked state of one team at the end of a week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsSnapshot {
    pub week: u32,
    pub team: String,
    pub rank: u32,
    pub wins: u32,
    pub losses: u32,
    pub points_for_total: f64,
    pub record: String,
}

#[derive(Debug, Clone, Copy, Default)]
struct TeamRecord {
    wins: u32,
    losses: u32,
    points_for: f64,
}

/// Running win/loss/points-for table with a ranked snapshot per applied week.
#[derive(Debug, Clone)]
pub struct StandingsTracker {
    teams: Vec<String>,
    records: Vec<TeamRecord>,
    history: Vec<StandingsSnapshot>,
    last_week: u32,
}

impl StandingsTracker {
    pub fn new(roster: &Roster) -> Self {
        Self {
            teams: roster.names().to_vec(),
            records: vec![TeamRecord::default(); roster.len()],
            history: Vec::new(),
            last_week: 0,
        }
    }

    /// Apply every outcome of `week`, then rank all teams.
    ///
    /// Weeks must increase but may have gaps (a skipped week has no snapshot).
    /// Returns the snapshot just appended to the history.
    pub fn apply_week(
        &mut self,
        week: u32,
        outcomes: &[TeamWeekOutcome],
    ) -> Result<&[StandingsSnapshot], SeasonError> {
        if week <= self.last_week {
            let team = outcomes
                .first()
                .map(|o| self.teams[o.team].clone())
                .unwrap_or_default();
            return Err(SeasonError::Sequence {
                team,
                week,
                expected: self.last_week + 1,
            });
        }

        for outcome in outcomes {
            let record = &mut self.records[outcome.team];
            match outcome.result {
                WeekResult::Win => record.wins += 1,
                WeekResult::Loss => record.losses += 1,
                WeekResult::Tie => {}
            }
            record.points_for += outcome.points_for;
        }
        self.last_week = week;

        let start = self.history.len();
        for (idx, team) in self.ranked_order().into_iter().enumerate() {
            let record = self.records[team];
            self.history.push(StandingsSnapshot {
                week,
                team: self.teams[team].clone(),
                rank: idx as u32 + 1,
                wins: record.wins,
                losses: record.losses,
                points_for_total: record.points_for,
                record: format!("{}-{}", record.wins, record.losses),
            });
        }
        Ok(&self.history[start..])
    }

    /// Team ids ordered by wins, then points-for, both descending.
    /// Full ties keep registration order.
    pub fn ranked_order(&self) -> Vec<TeamId> {
        let mut order: Vec<TeamId> = (0..self.teams.len()).collect();
        order.sort_by(|&a, &b| compare_records(&self.records[a], &self.records[b]));
        order
    }

    pub fn history(&self) -> &[StandingsSnapshot] {
        &self.history
    }

    pub fn into_history(self) -> Vec<StandingsSnapshot> {
        self.history
    }

    pub fn last_week(&self) -> u32 {
        self.last_week
    }
}

fn compare_records(a: &TeamRecord, b: &TeamRecord) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then_with(|| b.points_for.total_cmp(&a.points_for))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::Matchup;

    fn tracker() -> (Roster, StandingsTracker) {
        let roster = Roster::new(["A", "B", "C", "D"]).expect("unique names");
        let tracker = StandingsTracker::new(&roster);
        (roster, tracker)
    }

    fn outcomes(matchups: &[Matchup], roster: &Roster) -> Vec<TeamWeekOutcome> {
        matchups
            .iter()
            .flat_map(|m| {
                m.outcomes(roster.id(&m.home).unwrap(), roster.id(&m.away).unwrap())
            })
            .collect()
    }

    fn teams_in_rank_order(snapshots: &[StandingsSnapshot]) -> Vec<&str> {
        snapshots.iter().map(|s| s.team.as_str()).collect()
    }

    #[test]
    fn wins_then_points_decide_rank() {
        let (roster, mut tracker) = tracker();
        let week1 = outcomes(
            &[
                Matchup::new(1, "A", "B", 100.0, 90.0),
                Matchup::new(1, "C", "D", 120.0, 130.0),
            ],
            &roster,
        );
        let snap = tracker.apply_week(1, &week1).unwrap();
        assert_eq!(teams_in_rank_order(snap), vec!["D", "A", "C", "B"]);
        assert_eq!(snap[0].record, "1-0");
        assert_eq!(snap[3].record, "0-1");
        let ranks: Vec<u32> = snap.iter().map(|s| s.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn full_ties_fall_back_to_registration_order() {
        let (_, mut tracker) = tracker();
        let snap = tracker.apply_week(1, &[]).unwrap();
        assert_eq!(teams_in_rank_order(snap), vec!["A", "B", "C", "D"]);
        assert_eq!(snap.iter().map(|s| s.rank).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn tied_matchup_counts_points_but_no_result() {
        let (roster, mut tracker) = tracker();
        let week1 = outcomes(&[Matchup::new(1, "B", "C", 95.0, 95.0)], &roster);
        let snap = tracker.apply_week(1, &week1).unwrap();
        let b = snap.iter().find(|s| s.team == "B").unwrap();
        assert_eq!((b.wins, b.losses), (0, 0));
        assert_eq!(b.points_for_total, 95.0);
        assert_eq!(b.record, "0-0");
    }

    #[test]
    fn weeks_must_increase() {
        let (_, mut tracker) = tracker();
        tracker.apply_week(2, &[]).unwrap();
        let err = tracker.apply_week(2, &[]).unwrap_err();
        assert!(matches!(err, SeasonError::Sequence { week: 2, expected: 3, .. }));
        tracker.apply_week(5, &[]).unwrap();
        assert_eq!(tracker.history().len(), 8);
        assert_eq!(tracker.last_week(), 5);
    }
}
