use std::fmt;

use thiserror::Error;

/// Run-level failures. Anything here means no artifact is written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("anchor not found: {anchor:?}")]
    AnchorNotFound { anchor: String },

    #[error("no programs extracted ({candidates} candidate ids found)")]
    NoRecords { candidates: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("{name} must be greater than zero")]
    ZeroWindow { name: &'static str },

    #[error("record opening {0:?} must end with `{{`")]
    InvalidOpening(String),

    #[error("invalid record opening pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Required fields in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Days,
    Description,
    Focus,
    Workouts,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Name => "name",
            Field::Days => "days",
            Field::Description => "description",
            Field::Focus => "focus",
            Field::Workouts => "workouts",
        })
    }
}

/// Why a single record was dropped. Never propagated past the run.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    #[error("no record opening found before the id")]
    NoOpeningToken,

    #[error("nearest record opening closes before the id")]
    IdOutsideSpan,

    #[error("missing field `{0}`")]
    MissingField(Field),
}
