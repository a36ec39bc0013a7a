//! Utilization / defense classifier.
//!
//! Maps demand against safe capacity onto a four-band alert level, and
//! composes that level with the N-1 verdict into a defense-in-depth level.
//! Both derivations read the same `UtilizationThresholds`.

use crate::{
    config::UtilizationThresholds,
    error::{ResilienceError, ResilienceResult},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum UtilizationLevel {
    Green,
    Yellow,
    Orange,
    Black,
}

impl UtilizationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green  => "GREEN",
            Self::Yellow => "YELLOW",
            Self::Orange => "ORANGE",
            Self::Black  => "BLACK",
        }
    }
}

/// Defense-in-depth level, lowest intervention first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DefenseLevel {
    Prevention,
    Control,
    SafetySystems,
    Containment,
    Emergency,
}

/// Absolute figures behind a utilization rate, when they are known.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CapacityFigures {
    pub safe_capacity: f64,
    pub current_demand: f64,
    pub theoretical_capacity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UtilizationSnapshot {
    pub utilization_rate: f64,
    pub level: UtilizationLevel,
    pub buffer_remaining: f64,
    pub wait_time_multiplier: f64,
    pub capacity: Option<CapacityFigures>,
}

pub struct UtilizationClassifier {
    thresholds: UtilizationThresholds,
}

impl Default for UtilizationClassifier {
    fn default() -> Self {
        Self::new(UtilizationThresholds::default())
    }
}

impl UtilizationClassifier {
    pub fn new(thresholds: UtilizationThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &UtilizationThresholds {
        &self.thresholds
    }

    pub fn level_for(&self, utilization_rate: f64) -> UtilizationLevel {
        let t = &self.thresholds;
        if utilization_rate < t.yellow_at {
            UtilizationLevel::Green
        } else if utilization_rate < t.orange_at {
            UtilizationLevel::Yellow
        } else if utilization_rate < t.black_at {
            UtilizationLevel::Orange
        } else {
            UtilizationLevel::Black
        }
    }

    /// M/M/1 queueing delay factor 1 / (1 - rho), capped at saturation.
    pub fn wait_time_multiplier(&self, utilization_rate: f64) -> f64 {
        let cap = self.thresholds.max_wait_multiplier;
        if utilization_rate >= 1.0 {
            return cap;
        }
        (1.0 / (1.0 - utilization_rate)).min(cap)
    }

    pub fn classify(
        &self,
        utilization_rate: f64,
        buffer_remaining: f64,
    ) -> ResilienceResult<UtilizationSnapshot> {
        check_non_negative("utilization_rate", utilization_rate)?;
        check_non_negative("buffer_remaining", buffer_remaining)?;

        Ok(UtilizationSnapshot {
            utilization_rate,
            level: self.level_for(utilization_rate),
            buffer_remaining,
            wait_time_multiplier: self.wait_time_multiplier(utilization_rate),
            capacity: None,
        })
    }

    /// Derive rate and buffer from absolute demand and capacity.
    pub fn assess_capacity(
        &self,
        current_demand: f64,
        theoretical_capacity: f64,
    ) -> ResilienceResult<UtilizationSnapshot> {
        check_non_negative("current_demand", current_demand)?;
        check_non_negative("theoretical_capacity", theoretical_capacity)?;
        if theoretical_capacity == 0.0 {
            return Err(ResilienceError::InvalidUtilization {
                field: "theoretical_capacity",
                value: theoretical_capacity,
            });
        }

        let safe_capacity = theoretical_capacity * self.thresholds.safe_capacity_fraction;
        let utilization_rate = current_demand / safe_capacity;
        let buffer_remaining = (1.0 - utilization_rate).max(0.0);

        let mut snapshot = self.classify(utilization_rate, buffer_remaining)?;
        snapshot.capacity = Some(CapacityFigures {
            safe_capacity,
            current_demand,
            theoretical_capacity,
        });
        Ok(snapshot)
    }

    pub fn defense_level(&self, level: UtilizationLevel, n1_pass: bool) -> DefenseLevel {
        match (level, n1_pass) {
            (UtilizationLevel::Black, false) => DefenseLevel::Emergency,
            (UtilizationLevel::Black, true) | (_, false) => DefenseLevel::Containment,
            (UtilizationLevel::Orange, true) => DefenseLevel::SafetySystems,
            (UtilizationLevel::Yellow, true) => DefenseLevel::Control,
            (UtilizationLevel::Green, true) => DefenseLevel::Prevention,
        }
    }
}

/// Crisis mode: saturated capacity or a roster that cannot lose one person.
pub fn crisis_mode(level: UtilizationLevel, n1_pass: bool) -> bool {
    level == UtilizationLevel::Black || !n1_pass
}

/// Classify under the reference bands.
pub fn classify(
    utilization_rate: f64,
    buffer_remaining: f64,
) -> ResilienceResult<UtilizationSnapshot> {
    UtilizationClassifier::default().classify(utilization_rate, buffer_remaining)
}

fn check_non_negative(field: &'static str, value: f64) -> ResilienceResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ResilienceError::InvalidUtilization { field, value })
    }
}
