//! Inclusive calendar range an analysis covers.

use crate::error::{ResilienceError, ResilienceResult};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct AnalysisPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AnalysisPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> ResilienceResult<Self> {
        if end < start {
            return Err(ResilienceError::InvalidPeriod {
                start,
                reason: format!("end {end} is before start"),
            });
        }
        Ok(Self { start, end })
    }

    /// `days` calendar days starting at `start`. Zero days, or an end date
    /// past the calendar's range, is rejected.
    pub fn starting(start: NaiveDate, days: u32) -> ResilienceResult<Self> {
        if days == 0 {
            return Err(ResilienceError::InvalidPeriod {
                start,
                reason: "period must cover at least one day".to_string(),
            });
        }
        let end = start
            .checked_add_signed(Duration::days(i64::from(days) - 1))
            .ok_or_else(|| ResilienceError::InvalidPeriod {
                start,
                reason: format!("{days} days runs past the last representable date"),
            })?;
        Self::new(start, end)
    }

    /// Number of days, both bounds included.
    pub fn len_days(&self) -> u32 {
        ((self.end - self.start).num_days() + 1) as u32
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}
