use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::closest::ClosestGameRanker;
use crate::config::SeasonConfig;
use crate::error::{FetchError, SeasonError};
use crate::league::{Matchup, Roster, resolve_week};
use crate::report::{PointsRow, SeasonReport, SkippedWeek, TeamLegend, sort_points_desc};
use crate::series::TimeSeriesAccumulator;
use crate::source::LeagueSource;
use crate::standings::StandingsTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekStatus {
    Processed { matchups: usize },
    Skipped,
}

/// Single pass over a season, week by week, feeding every tracker.
///
/// The engine owns all per-team state; callers only ever see the copies
/// handed out by [`SeasonEngine::finish`].
#[derive(Debug)]
pub struct SeasonEngine {
    config: SeasonConfig,
    roster: Roster,
    completed_weeks: u32,
    next_week: u32,
    series: TimeSeriesAccumulator,
    standings: StandingsTracker,
    closest: ClosestGameRanker,
    raw_points: Vec<PointsRow>,
    processed: Vec<u32>,
    skipped: Vec<SkippedWeek>,
    stopped_early: bool,
}

impl SeasonEngine {
    pub fn new(
        config: SeasonConfig,
        teams: Vec<String>,
        completed_weeks: u32,
    ) -> Result<Self, SeasonError> {
        let roster = Roster::new(teams)?;
        for color in &config.team_colors {
            if roster.id(&color.team).is_none() {
                warn!(team = %color.team, "color configured for a team outside the roster");
            }
        }
        let tie_break = config.tie_break;
        Ok(Self {
            series: TimeSeriesAccumulator::new(&roster),
            standings: StandingsTracker::new(&roster),
            closest: ClosestGameRanker::new(tie_break),
            config,
            roster,
            completed_weeks,
            next_week: 1,
            raw_points: Vec::new(),
            processed: Vec::new(),
            skipped: Vec::new(),
            stopped_early: false,
        })
    }

    pub fn run<S: LeagueSource + ?Sized>(source: &S, config: SeasonConfig) -> Result<SeasonReport> {
        Self::run_with(source, config, |_| true)
    }

    /// Like [`SeasonEngine::run`], asking `keep_going` before each week's
    /// fetch. Returning `false` stops the run; weeks already processed stay
    /// in the report.
    pub fn run_with<S, F>(source: &S, config: SeasonConfig, mut keep_going: F) -> Result<SeasonReport>
    where
        S: LeagueSource + ?Sized,
        F: FnMut(u32) -> bool,
    {
        let teams = source.list_teams().context("list league teams")?;
        let completed = source
            .completed_week_count()
            .context("read completed week count")?;
        info!(teams = teams.len(), weeks = completed, "starting season aggregation");

        let mut engine = Self::new(config, teams, completed)?;
        while let Some(week) = engine.next_week() {
            if !keep_going(week) {
                info!(week, "aggregation stopped before fetch");
                engine.stopped_early = true;
                break;
            }
            let fetched = source.week_matchups(week);
            engine.ingest_week(week, fetched)?;
        }
        Ok(engine.finish())
    }

    /// Next week to ingest, `None` once every completed week has been seen.
    pub fn next_week(&self) -> Option<u32> {
        (self.next_week <= self.completed_weeks).then_some(self.next_week)
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Feed one week's fetch result.
    ///
    /// A fetch failure skips the week: no snapshot, no closest-game or points
    /// rows, and the series carry forward with zeros. A data error is fatal and
    /// leaves every tracker as it was before the call.
    pub fn ingest_week(
        &mut self,
        week: u32,
        fetched: Result<Vec<Matchup>, FetchError>,
    ) -> Result<WeekStatus, SeasonError> {
        if week != self.next_week {
            return Err(SeasonError::WeekMismatch {
                requested: self.next_week,
                found: week,
            });
        }

        let matchups = match fetched {
            Ok(matchups) => matchups,
            Err(err) => {
                warn!(week, error = %err, "week fetch failed, skipping");
                self.carry_forward(week)?;
                self.skipped.push(SkippedWeek {
                    week,
                    reason: err.to_string(),
                });
                self.next_week += 1;
                return Ok(WeekStatus::Skipped);
            }
        };

        let resolved = resolve_week(&self.roster, week, matchups)?;

        let mut points_for = vec![0.0; self.roster.len()];
        let mut points_against = vec![0.0; self.roster.len()];
        let mut outcomes = Vec::with_capacity(resolved.len() * 2);
        for m in &resolved {
            for outcome in m.outcomes() {
                points_for[outcome.team] = outcome.points_for;
                points_against[outcome.team] = outcome.points_against;
                outcomes.push(outcome);
            }
        }

        for team in 0..self.roster.len() {
            self.series
                .record(team, week, points_for[team], points_against[team])?;
        }
        self.standings.apply_week(week, &outcomes)?;
        for m in &resolved {
            self.closest.push(&m.matchup);
            self.raw_points.push(PointsRow {
                week,
                team: m.matchup.home.clone(),
                points: m.matchup.home_score,
            });
            self.raw_points.push(PointsRow {
                week,
                team: m.matchup.away.clone(),
                points: m.matchup.away_score,
            });
        }

        let idle = self.roster.len().saturating_sub(outcomes.len());
        debug!(week, matchups = resolved.len(), idle, "week applied");
        self.processed.push(week);
        self.next_week += 1;
        Ok(WeekStatus::Processed {
            matchups: resolved.len(),
        })
    }

    fn carry_forward(&mut self, week: u32) -> Result<(), SeasonError> {
        for team in 0..self.roster.len() {
            self.series.record(team, week, 0.0, 0.0)?;
        }
        Ok(())
    }

    pub fn finish(self) -> SeasonReport {
        let teams = self
            .roster
            .names()
            .iter()
            .map(|team| TeamLegend {
                team: team.clone(),
                color: self.config.color_for(team).map(str::to_string),
            })
            .collect();

        info!(
            processed = self.processed.len(),
            skipped = self.skipped.len(),
            games = self.closest.len(),
            "season aggregation finished"
        );

        SeasonReport {
            generated_at: Utc::now().to_rfc3339(),
            completed_weeks: self.completed_weeks,
            processed_weeks: self.processed,
            skipped_weeks: self.skipped,
            stopped_early: self.stopped_early,
            tie_break: self.config.tie_break,
            teams,
            series: self.series.export(),
            cumulative: self.series.rows(),
            closest_games: self.closest.ranked(),
            standings: self.standings.into_history(),
            raw_points: sort_points_desc(self.raw_points),
        }
    }
}
