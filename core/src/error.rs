use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResilienceError {
    #[error("Staff member at position {position} has an empty id")]
    EmptyStaffId { position: usize },

    #[error("Duplicate staff id '{id}' in coverage model")]
    DuplicateStaffId { id: String },

    #[error("Staff '{id}' has invalid coverage weight {weight} (must be finite and > 0)")]
    InvalidCoverageWeight { id: String, weight: f64 },

    #[error("Staff id '{id}' is not part of the coverage model")]
    UnknownStaffId { id: String },

    #[error("Staff id '{id}' appears more than once in the absence set")]
    DuplicateAbsentee { id: String },

    #[error("Absence set of size {size} exceeds the {mode} limit of {limit}")]
    AbsenceExceedsMode {
        size: usize,
        limit: usize,
        mode: &'static str,
    },

    #[error("Invalid analysis period starting {start}: {reason}")]
    InvalidPeriod { start: NaiveDate, reason: String },

    #[error("Invalid utilization input: {field} = {value}")]
    InvalidUtilization { field: &'static str, value: f64 },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ResilienceResult<T> = Result<T, ResilienceError>;
