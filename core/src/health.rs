//! System health snapshot: the structured signals alerting reads.
//!
//! Combines a VulnerabilityReport with a UtilizationSnapshot. Carries no
//! human-readable copy; see `actions` for that.

use crate::{
    contingency::ContingencyMode,
    roster::CriticalityTier,
    scanner::VulnerabilityReport,
    utilization::{
        crisis_mode, DefenseLevel, UtilizationClassifier, UtilizationLevel, UtilizationSnapshot,
    },
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Healthy,
    Warning,
    Degraded,
    Critical,
    Emergency,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemHealth {
    pub overall_status: OverallStatus,
    pub utilization: UtilizationSnapshot,
    pub defense_level: DefenseLevel,
    pub crisis_mode: bool,
    pub mode: ContingencyMode,
    pub n1_pass: bool,
    /// `None` when the scan did not evaluate pairs.
    pub n2_pass: Option<bool>,
    pub phase_transition_risk: CriticalityTier,
    pub n1_failure_count: usize,
    pub fatal_pair_count: usize,
    pub top_spof: Option<String>,
}

impl SystemHealth {
    pub fn assess(
        report: &VulnerabilityReport,
        utilization: UtilizationSnapshot,
        classifier: &UtilizationClassifier,
    ) -> Self {
        let level = utilization.level;
        let defense_level = classifier.defense_level(level, report.n1_pass);
        let crisis = crisis_mode(level, report.n1_pass);

        let overall_status = if defense_level == DefenseLevel::Emergency {
            OverallStatus::Emergency
        } else if crisis {
            OverallStatus::Critical
        } else if level == UtilizationLevel::Orange
            || report.phase_transition_risk >= CriticalityTier::Medium
        {
            OverallStatus::Degraded
        } else if level == UtilizationLevel::Yellow {
            OverallStatus::Warning
        } else {
            OverallStatus::Healthy
        };

        if crisis {
            log::warn!(
                "health: CRISIS MODE level={} n1_pass={} defense={:?}",
                level.as_str(),
                report.n1_pass,
                defense_level
            );
        }

        Self {
            overall_status,
            utilization,
            defense_level,
            crisis_mode: crisis,
            mode: report.mode,
            n1_pass: report.n1_pass,
            n2_pass: report.n2_pass,
            phase_transition_risk: report.phase_transition_risk,
            n1_failure_count: report.n1_vulnerabilities.len(),
            fatal_pair_count: report.n2_fatal_pairs.len(),
            top_spof: report.top_spof().map(|s| s.staff_name.clone()),
        }
    }
}
