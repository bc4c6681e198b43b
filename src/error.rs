use thiserror::Error;

/// Errors raised when a lap table or a request parameter has the wrong shape.
///
/// Missing data (no laps for a driver, no compounds) is never an error; the
/// analysis functions return empty results for it instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("lap record {index} has no driver code")]
    MissingDriver { index: usize },

    #[error("driver {driver}: lap number must be positive, got {lap_number}")]
    InvalidLapNumber { driver: String, lap_number: u32 },

    #[error("driver {driver}: lap {lap_number} appears more than once")]
    DuplicateLap { driver: String, lap_number: u32 },

    #[error("driver {driver}: lap {lap_number} has invalid {field} ({value})")]
    InvalidTime {
        driver: String,
        lap_number: u32,
        field: &'static str,
        value: f64,
    },

    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    #[error("unknown stint strategy: {0}")]
    UnknownStrategy(String),

    #[error("unknown session type: {0}")]
    UnknownSessionType(String),

    #[error("event not found in schedule: {0}")]
    UnknownEvent(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
