use thiserror::Error;

/// A single week's matchups could not be retrieved. The engine reports the
/// week as skipped and keeps going.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("week {week}: {reason}")]
    Unavailable { week: u32, reason: String },

    #[error("week {week}: read failed: {source}")]
    Io {
        week: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("week {week}: invalid matchup json: {source}")]
    Parse {
        week: u32,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn week(&self) -> u32 {
        match self {
            FetchError::Unavailable { week, .. }
            | FetchError::Io { week, .. }
            | FetchError::Parse { week, .. } => *week,
        }
    }
}

/// Inconsistent source data. Any of these aborts the run.
#[derive(Debug, Error, PartialEq)]
pub enum SeasonError {
    #[error("team {team}: week {week} recorded out of order (expected week {expected})")]
    Sequence {
        team: String,
        week: u32,
        expected: u32,
    },

    #[error("week {week}: matchup references unknown team {team}")]
    MissingTeam { team: String, week: u32 },

    #[error("team {team} listed more than once in the roster")]
    DuplicateTeam { team: String },

    #[error("week {week}: team {team} has invalid score {score}")]
    InvalidScore { team: String, week: u32, score: f64 },

    #[error("requested week {requested} but source returned a week {found} matchup")]
    WeekMismatch { requested: u32, found: u32 },
}
