//! Human-readable copy for the alerting and presentation layers.
//!
//! Thin mapping from structured signals to strings. Nothing in the
//! calculators depends on this module.

use crate::{
    cascade::{RecoveryEstimate, SystemStatus},
    health::{OverallStatus, SystemHealth},
    roster::CriticalityTier,
    utilization::{DefenseLevel, UtilizationLevel},
};
use serde::{Deserialize, Serialize};

pub fn recovery_label(estimate: RecoveryEstimate) -> &'static str {
    match estimate {
        RecoveryEstimate::Short    => "< 24 hours",
        RecoveryEstimate::Medium   => "1-3 days",
        RecoveryEstimate::Long     => "1-2 weeks",
        RecoveryEstimate::Extended => "> 2 weeks",
    }
}

pub fn status_label(status: SystemStatus) -> &'static str {
    match status {
        SystemStatus::Stable   => "Stable",
        SystemStatus::Strained => "Strained",
        SystemStatus::Critical => "Critical",
        SystemStatus::Failed   => "Coverage failure",
    }
}

pub fn defense_label(level: DefenseLevel) -> &'static str {
    match level {
        DefenseLevel::Prevention    => "Prevention",
        DefenseLevel::Control       => "Control",
        DefenseLevel::SafetySystems => "Safety systems",
        DefenseLevel::Containment   => "Containment",
        DefenseLevel::Emergency     => "Emergency",
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionPlan {
    pub immediate_actions: Vec<String>,
    pub recommended_actions: Vec<String>,
}

impl ActionPlan {
    pub fn for_health(health: &SystemHealth) -> Self {
        let mut plan = Self::default();

        if health.crisis_mode {
            plan.immediate_actions
                .push("Activate crisis staffing protocol".to_string());
        }
        if !health.n1_pass {
            let who = health
                .top_spof
                .as_deref()
                .map(|name| format!(" starting with {name}"))
                .unwrap_or_default();
            plan.immediate_actions.push(format!(
                "Cross-train or arrange backup for {} single point(s) of failure{who}",
                health.n1_failure_count
            ));
        }
        if health.utilization.level == UtilizationLevel::Black {
            plan.immediate_actions
                .push("Defer non-essential coverage and call in reserve staff".to_string());
        }

        match health.utilization.level {
            UtilizationLevel::Orange => plan.recommended_actions.push(
                "Freeze new commitments until utilization falls below the orange band".to_string(),
            ),
            UtilizationLevel::Yellow => plan
                .recommended_actions
                .push("Review upcoming leave requests against remaining buffer".to_string()),
            _ => {}
        }
        if health.fatal_pair_count > 0 {
            plan.recommended_actions.push(format!(
                "Avoid scheduling leave together for the {} fatal pair(s)",
                health.fatal_pair_count
            ));
        }
        if health.phase_transition_risk >= CriticalityTier::High {
            plan.recommended_actions
                .push("Reduce load before the roster tips into cascading failure".to_string());
        }
        if health.n2_pass.is_none() && health.n1_pass {
            plan.recommended_actions
                .push("Run an N-2 scan to confirm tolerance of paired absences".to_string());
        }
        if health.overall_status == OverallStatus::Healthy && plan.recommended_actions.is_empty() {
            plan.recommended_actions
                .push("Maintain current coverage; no action required".to_string());
        }

        plan
    }
}
