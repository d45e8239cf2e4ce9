//! Error types for the reservoir simulation and its inputs
use thiserror::Error;

/// Errors raised while building or stepping reservoirs. All of them are
/// contract violations: a single one invalidates the whole run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Area lookup outside of the storage range of the curve
    #[error("storage {storage} outside of curve range [0, {capacity}]")]
    OutOfRange { storage: f64, capacity: f64 },

    /// Mass balance requested for the fixed initial condition
    #[error("week must be >= 1, but was {week}")]
    InvalidWeek { week: usize },

    /// Mass balance requested after the last week of the series
    #[error("week {week} beyond the {num_weeks} weeks of the series")]
    WeekBeyondHorizon { week: usize, num_weeks: usize },

    /// Storage change of a week that is NaN or infinite, caused by a
    /// non-finite flow or rate
    #[error("non-finite mass balance {candidate} at week {week}")]
    NonFiniteBalance { week: usize, candidate: f64 },

    #[error("invalid storage-area curve: {0}")]
    InvalidCurve(String),

    #[error("{series} series has {found} weeks, expected {expected}")]
    SeriesLengthMismatch {
        series: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("reservoir series must cover at least one week")]
    EmptyHorizon,

    #[error("a chain must have at least one reservoir")]
    EmptyChain,

    #[error(
        "reservoir {id} simulates {found} weeks, but the chain has {expected}"
    )]
    HorizonMismatch {
        id: usize,
        expected: usize,
        found: usize,
    },

    /// Wraps any step failure with the reservoir and week it happened at
    #[error("reservoir {id} ({name}) failed at week {week}: {source}")]
    Reservoir {
        id: usize,
        name: String,
        week: usize,
        #[source]
        source: Box<SimulationError>,
    },
}

/// Errors found while reading and validating a case directory
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("ID {0} not found for reservoirs")]
    MissingId(usize),

    #[error("duplicated reservoir ID {0}")]
    DuplicateId(usize),

    #[error(
        "reservoir {id} points to unknown downstream reservoir {downstream_id}"
    )]
    UnknownDownstream { id: usize, downstream_id: usize },

    #[error(
        "reservoirs {upstream_ids:?} flow into {downstream_id}, not a chain"
    )]
    Confluence {
        downstream_id: usize,
        upstream_ids: Vec<usize>,
    },

    #[error("reservoirs {0:?} form a cycle")]
    Cycle(Vec<usize>),

    #[error(
        "{series} of reservoir {id} has {found} values, expected {expected}"
    )]
    SeriesLength {
        id: usize,
        series: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid {series} distribution for reservoir {id}: {reason}")]
    InvalidDistribution {
        id: usize,
        series: &'static str,
        reason: String,
    },

    #[error("invalid start date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}
