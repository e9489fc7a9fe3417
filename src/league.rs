use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::SeasonError;

/// Index of a team inside its season's [`Roster`].
pub type TeamId = usize;

/// One final head-to-head result as delivered by the league data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub week: u32,
    pub home: String,
    pub away: String,
    pub home_score: f64,
    pub away_score: f64,
}

impl Matchup {
    pub fn new(week: u32, home: &str, away: &str, home_score: f64, away_score: f64) -> Self {
        Self {
            week,
            home: home.to_string(),
            away: away.to_string(),
            home_score,
            away_score,
        }
    }

    pub fn is_tied(&self) -> bool {
        self.home_score == self.away_score
    }

    /// Split the matchup into one directed outcome per side, home first.
    pub fn outcomes(&self, home: TeamId, away: TeamId) -> [TeamWeekOutcome; 2] {
        [
            TeamWeekOutcome::new(self.week, home, self.home_score, self.away_score),
            TeamWeekOutcome::new(self.week, away, self.away_score, self.home_score),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeekResult {
    Win,
    Loss,
    // Counts toward neither wins nor losses.
    Tie,
}

impl WeekResult {
    fn from_scores(points_for: f64, points_against: f64) -> Self {
        if points_for > points_against {
            WeekResult::Win
        } else if points_for < points_against {
            WeekResult::Loss
        } else {
            WeekResult::Tie
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamWeekOutcome {
    pub week: u32,
    pub team: TeamId,
    pub points_for: f64,
    pub points_against: f64,
    pub result: WeekResult,
}

impl TeamWeekOutcome {
    pub fn new(week: u32, team: TeamId, points_for: f64, points_against: f64) -> Self {
        Self {
            week,
            team,
            points_for,
            points_against,
            result: WeekResult::from_scores(points_for, points_against),
        }
    }
}

/// Season team list in registration order. Registration order is also the
/// final standings tie-break, so it never changes once built.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    names: Vec<String>,
    index: HashMap<String, TeamId>,
}

impl Roster {
    pub fn new<I, S>(teams: I) -> Result<Self, SeasonError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut roster = Roster::default();
        for team in teams {
            let name = team.into();
            if roster.index.contains_key(&name) {
                return Err(SeasonError::DuplicateTeam { team: name });
            }
            roster.index.insert(name.clone(), roster.names.len());
            roster.names.push(name);
        }
        Ok(roster)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn id(&self, name: &str) -> Option<TeamId> {
        self.index.get(name).copied()
    }

    pub fn name(&self, id: TeamId) -> &str {
        &self.names[id]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn resolve(&self, name: &str, week: u32) -> Result<TeamId, SeasonError> {
        self.id(name).ok_or_else(|| SeasonError::MissingTeam {
            team: name.to_string(),
            week,
        })
    }
}

/// Matchup with both sides resolved against the roster.
#[derive(Debug, Clone)]
pub struct ResolvedMatchup {
    pub matchup: Matchup,
    pub home: TeamId,
    pub away: TeamId,
}

impl ResolvedMatchup {
    pub fn outcomes(&self) -> [TeamWeekOutcome; 2] {
        self.matchup.outcomes(self.home, self.away)
    }
}

/// Check one week's matchups against the roster and the data contract.
///
/// Nothing is resolved unless the whole week is valid: every team known,
/// no team scheduled twice, scores finite and non-negative, and every matchup
/// stamped with the requested week.
pub fn resolve_week(
    roster: &Roster,
    week: u32,
    matchups: Vec<Matchup>,
) -> Result<Vec<ResolvedMatchup>, SeasonError> {
    let mut seen = vec![false; roster.len()];
    let mut resolved = Vec::with_capacity(matchups.len());

    for matchup in matchups {
        if matchup.week != week {
            return Err(SeasonError::WeekMismatch {
                requested: week,
                found: matchup.week,
            });
        }
        let home = roster.resolve(&matchup.home, week)?;
        let away = roster.resolve(&matchup.away, week)?;
        for (id, score) in [(home, matchup.home_score), (away, matchup.away_score)] {
            if !score.is_finite() || score < 0.0 {
                return Err(SeasonError::InvalidScore {
                    team: roster.name(id).to_string(),
                    week,
                    score,
                });
            }
        }
        for id in [home, away] {
            if seen[id] {
                return Err(SeasonError::Sequence {
                    team: roster.name(id).to_string(),
                    week,
                    expected: week + 1,
                });
            }
            seen[id] = true;
        }
        resolved.push(ResolvedMatchup {
            matchup,
            home,
            away,
        });
    }

    Ok(resolved)
}
