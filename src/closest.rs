use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::league::Matchup;

/// Which side is listed as the winner when both scores are equal.
///
/// Only the closest-games table needs a winner for tied matchups; standings
/// never count a tie as a win or a loss.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    #[default]
    HomeWins,
    AwayWins,
}

impl FromStr for TieBreak {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "home" | "home_wins" => Ok(TieBreak::HomeWins),
            "away" | "away_wins" => Ok(TieBreak::AwayWins),
            other => Err(format!("unknown tie-break rule {other:?} (expected home|away)")),
        }
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TieBreak::HomeWins => f.write_str("home"),
            TieBreak::AwayWins => f.write_str("away"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosestGameRecord {
    pub week: u32,
    pub winning_team: String,
    pub losing_team: String,
    pub winning_score: f64,
    pub losing_score: f64,
    pub margin: f64,
    pub tied: bool,
}

pub fn rank(matchup: &Matchup, tie_break: TieBreak) -> ClosestGameRecord {
    let home_wins = if matchup.is_tied() {
        tie_break == TieBreak::HomeWins
    } else {
        matchup.home_score > matchup.away_score
    };

    let (winner, loser, win_score, lose_score) = if home_wins {
        (&matchup.home, &matchup.away, matchup.home_score, matchup.away_score)
    } else {
        (&matchup.away, &matchup.home, matchup.away_score, matchup.home_score)
    };

    ClosestGameRecord {
        week: matchup.week,
        winning_team: winner.clone(),
        losing_team: loser.clone(),
        winning_score: win_score,
        losing_score: lose_score,
        margin: (win_score - lose_score).abs(),
        tied: matchup.is_tied(),
    }
}

/// Smallest margin first. Equal margins keep their incoming order.
pub fn rank_all(mut records: Vec<ClosestGameRecord>) -> Vec<ClosestGameRecord> {
    records.sort_by(|a, b| a.margin.total_cmp(&b.margin));
    records
}

/// Collects one record per matchup, in the order matchups were seen.
#[derive(Debug, Clone, Default)]
pub struct ClosestGameRanker {
    tie_break: TieBreak,
    records: Vec<ClosestGameRecord>,
}

impl ClosestGameRanker {
    pub fn new(tie_break: TieBreak) -> Self {
        Self {
            tie_break,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, matchup: &Matchup) -> &ClosestGameRecord {
        self.records.push(rank(matchup, self.tie_break));
        &self.records[self.records.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ranked(&self) -> Vec<ClosestGameRecord> {
        rank_all(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn away_winner_is_listed_first() {
        let r = rank(&Matchup::new(4, "A", "B", 97.3, 112.8), TieBreak::HomeWins);
        assert_eq!(r.winning_team, "B");
        assert_eq!(r.losing_team, "A");
        assert_eq!(r.winning_score, 112.8);
        assert!((r.margin - 15.5).abs() < 1e-9);
        assert!(!r.tied);
    }

    #[test]
    fn tie_break_decides_equal_scores() {
        let m = Matchup::new(2, "A", "B", 80.0, 80.0);
        let home = rank(&m, TieBreak::HomeWins);
        assert_eq!(home.winning_team, "A");
        assert_eq!(home.margin, 0.0);
        assert!(home.tied);

        let away = rank(&m, TieBreak::AwayWins);
        assert_eq!(away.winning_team, "B");
        assert_eq!(away.losing_team, "A");
    }

    #[test]
    fn equal_margins_keep_week_order() {
        let mut ranker = ClosestGameRanker::new(TieBreak::HomeWins);
        ranker.push(&Matchup::new(1, "A", "B", 105.0, 100.0));
        ranker.push(&Matchup::new(1, "C", "D", 90.0, 60.0));
        ranker.push(&Matchup::new(2, "A", "C", 70.0, 75.0));
        ranker.push(&Matchup::new(3, "B", "D", 99.0, 98.0));

        let ranked = ranker.ranked();
        let weeks: Vec<u32> = ranked.iter().map(|r| r.week).collect();
        assert_eq!(weeks, vec![3, 1, 2, 1]);
        assert_eq!(ranked[1].winning_team, "A");
        assert_eq!(ranked[2].winning_team, "C");
    }

    #[test]
    fn tie_break_parses() {
        assert_eq!("Home".parse::<TieBreak>(), Ok(TieBreak::HomeWins));
        assert_eq!(" away_wins ".parse::<TieBreak>(), Ok(TieBreak::AwayWins));
        assert!("coin".parse::<TieBreak>().is_err());
    }
}
