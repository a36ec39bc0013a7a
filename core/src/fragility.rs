//! Temporal fragility mapper.
//!
//! Spreads one VulnerabilityReport over an analysis period, one
//! FragilityDay per calendar day, both bounds included.
//!
//! RULE: day-level variance is a seeded sine, never a PRNG. The same
//! report and period always reproduce the same sequence, bit for bit.

use crate::{
    config::FragilityParams,
    error::ResilienceResult,
    period::AnalysisPeriod,
    roster::CriticalityTier,
    scanner::VulnerabilityReport,
    types::DayIndex,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FragilityDay {
    pub day: DayIndex,
    pub date: NaiveDate,
    pub fragility: f64,
    /// Named only on days above the SPOF threshold.
    pub spof: Option<String>,
    pub violations: Vec<String>,
    pub staffing_level: f64,
}

pub struct FragilityMapper {
    params: FragilityParams,
}

impl Default for FragilityMapper {
    fn default() -> Self {
        Self::new(FragilityParams::default())
    }
}

impl FragilityMapper {
    pub fn new(params: FragilityParams) -> Self {
        Self { params }
    }

    /// Fragility before day-level variance, clamped to [0, 1].
    pub fn base_fragility(&self, report: &VulnerabilityReport) -> f64 {
        let p = &self.params;
        let mut base = p.base;
        if !report.n1_pass {
            base += p.n1_fail;
        }
        // An N-1 scan never evaluated pairs, so it shows no N-2 failure.
        if report.n2_pass == Some(false) {
            base += p.n2_fail;
        }
        base += match report.phase_transition_risk {
            CriticalityTier::Critical => p.phase_critical,
            CriticalityTier::High     => p.phase_high,
            CriticalityTier::Medium   => p.phase_medium,
            CriticalityTier::Low      => p.phase_low,
        };
        let vulnerabilities = report.vulnerability_count() as f64;
        base += (vulnerabilities * p.per_vulnerability).min(p.vulnerability_cap);
        base.clamp(0.0, 1.0)
    }

    pub fn variance(&self, day: DayIndex, seed: u64) -> f64 {
        let p = &self.params;
        (f64::from(day) * p.day_frequency + seed as f64 * p.seed_frequency).sin()
            * p.variance_amplitude
    }

    pub fn map_to_timeline(
        &self,
        report: &VulnerabilityReport,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResilienceResult<Vec<FragilityDay>> {
        self.map_to_timeline_with_violations(report, start, end, &report.violations())
    }

    /// As `map_to_timeline`, with a caller-supplied violation list.
    /// The list must already be ordered most severe first.
    pub fn map_to_timeline_with_violations(
        &self,
        report: &VulnerabilityReport,
        start: NaiveDate,
        end: NaiveDate,
        violations: &[String],
    ) -> ResilienceResult<Vec<FragilityDay>> {
        let period = AnalysisPeriod::new(start, end)?;
        let base = self.base_fragility(report);
        let seed = timeline_seed(report);
        let spof_name = report.top_spof().map(|s| s.staff_name.clone());

        let timeline: Vec<FragilityDay> = period
            .dates()
            .enumerate()
            .map(|(index, date)| {
                let day = index as DayIndex;
                let fragility = (base + self.variance(day, seed)).clamp(0.0, 1.0);
                FragilityDay {
                    day,
                    date,
                    fragility,
                    spof: if fragility > self.params.spof_threshold {
                        spof_name.clone()
                    } else {
                        None
                    },
                    violations: self.violations_for(fragility, violations),
                    staffing_level: 100.0 - fragility * self.params.staffing_slope,
                }
            })
            .collect();

        log::debug!(
            "fragility: days={} base={:.3} seed={} start={} end={}",
            timeline.len(),
            base,
            seed,
            start,
            end
        );
        Ok(timeline)
    }

    fn violations_for(&self, fragility: f64, violations: &[String]) -> Vec<String> {
        let p = &self.params;
        let shown = if fragility > p.violations_all_above {
            violations.len()
        } else if fragility > p.violations_two_above {
            2
        } else if fragility > p.violations_one_above {
            1
        } else {
            0
        };
        violations.iter().take(shown).cloned().collect()
    }
}

/// Sum of affected-block counts across N-1 vulnerabilities.
pub fn timeline_seed(report: &VulnerabilityReport) -> u64 {
    report
        .n1_vulnerabilities
        .iter()
        .map(|v| u64::from(v.affected_blocks))
        .sum()
}

/// Map under the reference parameters.
pub fn map_to_timeline(
    report: &VulnerabilityReport,
    start: NaiveDate,
    end: NaiveDate,
) -> ResilienceResult<Vec<FragilityDay>> {
    FragilityMapper::default().map_to_timeline(report, start, end)
}
