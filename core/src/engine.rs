//! The resilience engine: one entry point wiring every component.
//!
//! EXECUTION ORDER (fixed):
//!   1. Contingency scan       (cascade metrics per combination)
//!   2. Fragility timeline     (report -> per-day records)
//!   3. Utilization classifier (demand vs safe capacity)
//!   4. Health snapshot        (report + utilization)
//!   5. Action plan            (health -> copy)
//!
//! RULES:
//!   - Each step reads only the outputs of earlier steps.
//!   - No step holds state between calls; `analyze` is idempotent.

use crate::{
    actions::ActionPlan,
    cascade::{compute_cascade_with, CascadeMetrics},
    config::ResilienceConfig,
    contingency::{AbsenceSet, ContingencyMode},
    error::ResilienceResult,
    fragility::{FragilityDay, FragilityMapper},
    health::SystemHealth,
    period::AnalysisPeriod,
    roster::CoverageModel,
    scanner::{ContingencyScanner, VulnerabilityReport},
    utilization::{UtilizationClassifier, UtilizationSnapshot},
};
use serde::{Deserialize, Serialize};

/// Demand side of an analysis request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DemandInput {
    pub current_demand: f64,
    pub theoretical_capacity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Analysis {
    pub report: VulnerabilityReport,
    pub timeline: Vec<FragilityDay>,
    pub utilization: UtilizationSnapshot,
    pub health: SystemHealth,
    pub actions: ActionPlan,
}

pub struct ResilienceEngine {
    config: ResilienceConfig,
    scanner: ContingencyScanner,
    mapper: FragilityMapper,
    classifier: UtilizationClassifier,
}

impl Default for ResilienceEngine {
    fn default() -> Self {
        Self::new(ResilienceConfig::default())
    }
}

impl ResilienceEngine {
    pub fn new(config: ResilienceConfig) -> Self {
        Self {
            scanner: ContingencyScanner::new(config.clone()),
            mapper: FragilityMapper::new(config.fragility.clone()),
            classifier: UtilizationClassifier::new(config.utilization.clone()),
            config,
        }
    }

    /// Build from a validated config.
    pub fn with_config(config: ResilienceConfig) -> ResilienceResult<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &ResilienceConfig {
        &self.config
    }

    pub fn classifier(&self) -> &UtilizationClassifier {
        &self.classifier
    }

    /// Score one explicit absence set. Ids are validated against the model.
    pub fn cascade<S: AsRef<str>>(
        &self,
        model: &CoverageModel,
        absent_ids: &[S],
        mode: ContingencyMode,
    ) -> ResilienceResult<CascadeMetrics> {
        let absentees = AbsenceSet::new(model, absent_ids, mode)?;
        compute_cascade_with(model, &absentees, mode, &self.config.cascade)
    }

    pub fn analyze(
        &self,
        model: &CoverageModel,
        mode: ContingencyMode,
        period: AnalysisPeriod,
        demand: DemandInput,
    ) -> ResilienceResult<Analysis> {
        let report = self.scanner.scan(model, mode, period);
        let timeline = self.mapper.map_to_timeline(&report, period.start, period.end)?;
        let utilization = self
            .classifier
            .assess_capacity(demand.current_demand, demand.theoretical_capacity)?;
        let health = SystemHealth::assess(&report, utilization.clone(), &self.classifier);
        let actions = ActionPlan::for_health(&health);

        log::info!(
            "engine: mode={} staff={} days={} status={:?} defense={:?}",
            mode.as_str(),
            model.len(),
            period.len_days(),
            health.overall_status,
            health.defense_level
        );

        Ok(Analysis {
            report,
            timeline,
            utilization,
            health,
            actions,
        })
    }
}
