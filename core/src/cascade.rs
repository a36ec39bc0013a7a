//! Cascade metric calculator.
//!
//! Scores the impact of one absence set against one coverage model.
//! Pure function of (model, absentees, mode, thresholds): no clock,
//! no randomness, no history. Calling it twice yields identical bits.

use crate::{
    config::CascadeThresholds,
    contingency::{AbsenceSet, ContingencyMode},
    error::ResilienceResult,
    roster::{CoverageModel, CriticalityTier},
    types::Capability,
};
use serde::{Deserialize, Serialize};

/// Closed status scale consumed by the presentation layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SystemStatus {
    Stable,
    Strained,
    Critical,
    Failed,
}

impl SystemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stable   => "stable",
            Self::Strained => "strained",
            Self::Critical => "critical",
            Self::Failed   => "failed",
        }
    }
}

/// Recovery bucket. Wording lives in `actions::recovery_label`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryEstimate {
    Short,
    Medium,
    Long,
    Extended,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CascadeMetrics {
    pub coverage_gap_pct: f64,
    pub affected_slots: u32,
    pub cascade_depth: u32,
    pub redistribution_load: f64,
    pub system_status: SystemStatus,
    pub recovery_time_estimate: RecoveryEstimate,
    /// Sum of the absentees' coverage weights.
    pub lost_coverage: f64,
    /// Capabilities no remaining member holds.
    pub uncovered_capabilities: Vec<Capability>,
}

impl CascadeMetrics {
    /// A combination fails on a `critical`/`failed` status, or when it
    /// leaves some required capability with nobody to cover it.
    pub fn is_failure(&self) -> bool {
        matches!(self.system_status, SystemStatus::Critical | SystemStatus::Failed)
            || self.is_structural_failure()
    }

    pub fn is_structural_failure(&self) -> bool {
        !self.uncovered_capabilities.is_empty()
    }
}

/// `compute_cascade_with` under the reference thresholds.
pub fn compute_cascade(
    model: &CoverageModel,
    absentees: &AbsenceSet,
    mode: ContingencyMode,
) -> ResilienceResult<CascadeMetrics> {
    compute_cascade_with(model, absentees, mode, &CascadeThresholds::default())
}

/// Fails with `UnknownStaffId` when an absentee is not on `model`.
pub fn compute_cascade_with(
    model: &CoverageModel,
    absentees: &AbsenceSet,
    mode: ContingencyMode,
    thresholds: &CascadeThresholds,
) -> ResilienceResult<CascadeMetrics> {
    let absent = absentees.resolve(model)?;
    Ok(cascade_at_positions(model, &absent, mode, thresholds))
}

/// RULE: `absent` holds distinct, ascending positions below `model.len()`.
pub(crate) fn cascade_at_positions(
    model: &CoverageModel,
    absent: &[usize],
    mode: ContingencyMode,
    thresholds: &CascadeThresholds,
) -> CascadeMetrics {
    let staff = model.staff();

    let lost_coverage: f64 = absent.iter().map(|&p| staff[p].coverage_weight).sum();
    let total = model.total_coverage();

    // Empty roster: nothing to lose, nothing to divide by.
    let coverage_gap_pct = if total > 0.0 {
        (100.0 * lost_coverage / total).clamp(0.0, 100.0)
    } else {
        0.0
    };

    let affected_slots = (lost_coverage * thresholds.slots_per_unit).round() as u32;

    // Each absentee counts once, critical and high tiers count extra.
    let cascade_depth: u32 = absent
        .iter()
        .map(|&p| match staff[p].criticality {
            CriticalityTier::Critical => thresholds.critical_weight,
            CriticalityTier::High     => thresholds.high_weight,
            _                         => thresholds.base_weight,
        })
        .sum();

    let remaining = model.len().saturating_sub(absent.len());
    let redistribution_load = if absent.is_empty() {
        0.0
    } else if remaining == 0 {
        thresholds.no_remaining_load
    } else {
        thresholds.redistribution_factor * lost_coverage / remaining as f64
    };

    let system_status = classify_status(coverage_gap_pct, absent.len(), mode, thresholds);
    let recovery_time_estimate = recovery_bucket(cascade_depth, thresholds);

    let uncovered_capabilities = model
        .uncovered_capabilities(absent)
        .into_iter()
        .map(str::to_string)
        .collect();

    CascadeMetrics {
        coverage_gap_pct,
        affected_slots,
        cascade_depth,
        redistribution_load,
        system_status,
        recovery_time_estimate,
        lost_coverage,
        uncovered_capabilities,
    }
}

fn classify_status(
    gap_pct: f64,
    absent: usize,
    mode: ContingencyMode,
    thresholds: &CascadeThresholds,
) -> SystemStatus {
    let within_mode = absent <= mode.limit();
    if absent == 0 {
        SystemStatus::Stable
    } else if within_mode && gap_pct < thresholds.strained_gap_pct {
        SystemStatus::Strained
    } else if within_mode && gap_pct < thresholds.critical_gap_pct {
        SystemStatus::Critical
    } else {
        SystemStatus::Failed
    }
}

fn recovery_bucket(depth: u32, thresholds: &CascadeThresholds) -> RecoveryEstimate {
    if depth < thresholds.recovery_short_below {
        RecoveryEstimate::Short
    } else if depth < thresholds.recovery_medium_below {
        RecoveryEstimate::Medium
    } else if depth < thresholds.recovery_long_below {
        RecoveryEstimate::Long
    } else {
        RecoveryEstimate::Extended
    }
}
