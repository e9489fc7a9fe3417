use std::collections::BTreeSet;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::FetchError;
use crate::league::Matchup;
use crate::source::LeagueSource;

const TEAM_NAMES: &[&str] = &[
    "Gridiron Goblins",
    "Blitz Brigade",
    "Hail Mary Heroes",
    "Red Zone Raiders",
    "Fourth and Long",
    "Pick Six Pirates",
    "Sack Masters",
    "End Zone Elite",
    "Waiver Wire Warriors",
    "Bye Week Bandits",
    "Fumble Factory",
    "Two Point Conversion",
];

#[derive(Debug, Clone)]
pub struct SyntheticOptions {
    pub seed: u64,
    pub teams: usize,
    pub weeks: u32,
    // Per team, per week.
    pub bye_chance: f64,
    pub failing_weeks: Vec<u32>,
}

impl Default for SyntheticOptions {
    fn default() -> Self {
        Self {
            seed: 7,
            teams: 10,
            weeks: 14,
            bye_chance: 0.0,
            failing_weeks: Vec::new(),
        }
    }
}

/// Reproducible random season for offline runs, benches and tests.
#[derive(Debug, Clone)]
pub struct SyntheticLeague {
    teams: Vec<String>,
    schedule: Vec<Vec<Matchup>>,
    failing: BTreeSet<u32>,
}

impl SyntheticLeague {
    pub fn generate(opts: &SyntheticOptions) -> Self {
        let mut rng = StdRng::seed_from_u64(opts.seed);
        let teams: Vec<String> = (0..opts.teams)
            .map(|idx| match TEAM_NAMES.get(idx) {
                Some(name) => (*name).to_string(),
                None => format!("Team {}", idx + 1),
            })
            .collect();

        let bye_chance = if opts.bye_chance.is_finite() {
            opts.bye_chance.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mut schedule = Vec::with_capacity(opts.weeks as usize);
        for week in 1..=opts.weeks {
            let mut active: Vec<usize> = (0..teams.len())
                .filter(|_| !rng.gen_bool(bye_chance))
                .collect();
            active.shuffle(&mut rng);

            let matchups = active
                .chunks_exact(2)
                .map(|pair| Matchup {
                    week,
                    home: teams[pair[0]].clone(),
                    away: teams[pair[1]].clone(),
                    home_score: random_score(&mut rng),
                    away_score: random_score(&mut rng),
                })
                .collect();
            schedule.push(matchups);
        }

        Self {
            teams,
            schedule,
            failing: opts.failing_weeks.iter().copied().collect(),
        }
    }

    /// Every generated matchup, failing weeks included.
    pub fn schedule(&self) -> &[Vec<Matchup>] {
        &self.schedule
    }
}

fn random_score(rng: &mut StdRng) -> f64 {
    let raw: f64 = rng.gen_range(55.0..165.0);
    (raw * 100.0).round() / 100.0
}

impl LeagueSource for SyntheticLeague {
    fn list_teams(&self) -> Result<Vec<String>> {
        Ok(self.teams.clone())
    }

    fn completed_week_count(&self) -> Result<u32> {
        Ok(self.schedule.len() as u32)
    }

    fn week_matchups(&self, week: u32) -> std::result::Result<Vec<Matchup>, FetchError> {
        if self.failing.contains(&week) {
            return Err(FetchError::Unavailable {
                week,
                reason: "synthetic scoreboard outage".to_string(),
            });
        }
        let idx = week.checked_sub(1).map(|w| w as usize);
        idx.and_then(|i| self.schedule.get(i))
            .cloned()
            .ok_or_else(|| FetchError::Unavailable {
                week,
                reason: "week not generated".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_season() {
        let opts = SyntheticOptions {
            seed: 42,
            bye_chance: 0.2,
            ..SyntheticOptions::default()
        };
        let a = SyntheticLeague::generate(&opts);
        let b = SyntheticLeague::generate(&opts);
        assert_eq!(a.schedule(), b.schedule());
    }

    #[test]
    fn every_team_plays_at_most_once_per_week() {
        let league = SyntheticLeague::generate(&SyntheticOptions {
            teams: 9,
            bye_chance: 0.1,
            ..SyntheticOptions::default()
        });
        for week in league.schedule() {
            let mut seen = BTreeSet::new();
            for m in week {
                assert!(seen.insert(m.home.clone()));
                assert!(seen.insert(m.away.clone()));
                assert!(m.home_score >= 0.0 && m.away_score >= 0.0);
            }
        }
    }

    #[test]
    fn failing_weeks_return_fetch_errors() {
        let league = SyntheticLeague::generate(&SyntheticOptions {
            weeks: 3,
            failing_weeks: vec![2],
            ..SyntheticOptions::default()
        });
        assert!(league.week_matchups(1).is_ok());
        assert!(matches!(
            league.week_matchups(2),
            Err(FetchError::Unavailable { week: 2, .. })
        ));
        assert!(league.week_matchups(4).is_err());
        assert!(league.week_matchups(0).is_err());
    }
}
