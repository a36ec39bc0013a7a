//! Contingency scanner: exhaustive N-1 / N-2 enumeration.
//!
//! This component:
//!   1. Evaluates every singleton absence (N-1 and N-2 modes)
//!   2. Evaluates every unordered pair absence (N-2 mode only)
//!   3. Records failing singletons as N1Vulnerability entries
//!   4. Records failing pairs as N2FatalPair entries
//!   5. Ranks every staff member by structural criticality
//!   6. Derives the phase-transition risk
//!
//! The search is exhaustive: a scan either evaluates every admissible
//! combination or does not return. Pairs are independent, so large N-2
//! scans fan out over the rayon pool and are collected in enumeration order.

use crate::{
    cascade::{cascade_at_positions, CascadeMetrics, SystemStatus},
    config::{ResilienceConfig, ScanConfig},
    contingency::ContingencyMode,
    period::AnalysisPeriod,
    roster::{CoverageModel, CriticalityTier},
    types::{Capability, StaffId},
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

// ── Report types ─────────────────────────────────────────────────────────────

/// A staff member whose lone absence fails the tolerance threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct N1Vulnerability {
    pub staff_id: StaffId,
    pub staff_name: String,
    /// Coverage blocks lost with this member (their `affected_slots`).
    pub affected_blocks: u32,
    pub coverage_gap_pct: f64,
    pub severity: CriticalityTier,
    /// Capabilities left with no holder while this member is away.
    pub uncovered_capabilities: Vec<Capability>,
    pub structural: bool,
}

/// Two staff members whose joint absence fails the tolerance threshold.
///
/// Unordered: ids are stored in ascending order and equality/hashing look
/// only at the id pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct N2FatalPair {
    pub first: StaffId,
    pub second: StaffId,
    pub first_name: String,
    pub second_name: String,
    pub coverage_gap_pct: f64,
    pub system_status: SystemStatus,
    pub structural: bool,
}

impl N2FatalPair {
    pub fn new(
        a: (StaffId, String),
        b: (StaffId, String),
        coverage_gap_pct: f64,
        system_status: SystemStatus,
        structural: bool,
    ) -> Self {
        let (first, second) = if a.0 <= b.0 { (a, b) } else { (b, a) };
        Self {
            first: first.0,
            first_name: first.1,
            second: second.0,
            second_name: second.1,
            coverage_gap_pct,
            system_status,
            structural,
        }
    }

    pub fn involves(&self, id: &str) -> bool {
        self.first == id || self.second == id
    }
}

impl PartialEq for N2FatalPair {
    fn eq(&self, other: &Self) -> bool {
        self.first == other.first && self.second == other.second
    }
}

impl Eq for N2FatalPair {}

impl Hash for N2FatalPair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.first.hash(state);
        self.second.hash(state);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CriticalityScore {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub staff_id: StaffId,
    pub staff_name: String,
    /// Raw score normalised against the highest raw score, in [0, 1].
    pub centrality_score: f64,
    pub raw_score: f64,
    pub services_covered: usize,
    pub unique_coverage_slots: usize,
    pub replacement_difficulty: f64,
    pub risk_level: CriticalityTier,
    pub fails_alone: bool,
    pub fatal_pair_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VulnerabilityReport {
    pub mode: ContingencyMode,
    pub period: AnalysisPeriod,
    pub staff_count: usize,
    pub n1_pass: bool,
    /// `None` when pairs were not evaluated (an N-1 scan).
    pub n2_pass: Option<bool>,
    pub phase_transition_risk: CriticalityTier,
    pub n1_vulnerabilities: Vec<N1Vulnerability>,
    pub n2_fatal_pairs: Vec<N2FatalPair>,
    pub criticality_scores: Vec<CriticalityScore>,
    pub singletons_evaluated: usize,
    pub pairs_evaluated: usize,
}

impl VulnerabilityReport {
    pub fn vulnerability_count(&self) -> usize {
        self.n1_vulnerabilities.len() + self.n2_fatal_pairs.len()
    }

    /// Top-ranked staff member at high or critical risk, if any.
    pub fn top_spof(&self) -> Option<&CriticalityScore> {
        self.criticality_scores
            .iter()
            .find(|s| s.risk_level >= CriticalityTier::High)
    }

    /// Period-level violation labels, most severe first.
    pub fn violations(&self) -> Vec<String> {
        let mut labels = Vec::with_capacity(self.vulnerability_count() + 1);

        for v in &self.n1_vulnerabilities {
            let mut label = format!(
                "N-1 failure: {} ({} severity, {:.0}% coverage gap)",
                v.staff_name,
                v.severity.as_str(),
                v.coverage_gap_pct
            );
            if v.structural {
                label.push_str(&format!(
                    "; sole cover for {}",
                    v.uncovered_capabilities.join(", ")
                ));
            }
            labels.push(label);
        }

        for p in &self.n2_fatal_pairs {
            labels.push(format!(
                "N-2 fatal pair: {} + {} ({:.0}% coverage gap, {})",
                p.first_name,
                p.second_name,
                p.coverage_gap_pct,
                p.system_status.as_str()
            ));
        }

        if self.phase_transition_risk >= CriticalityTier::High {
            labels.push(format!(
                "Phase transition risk: {}",
                self.phase_transition_risk.as_str()
            ));
        }

        labels
    }
}

// ── Scanner ──────────────────────────────────────────────────────────────────

/// Per-member tallies accumulated across failing combinations.
#[derive(Debug, Clone, Default)]
struct Tally {
    raw: f64,
    fails_alone: bool,
    fatal_pairs: usize,
}

pub struct ContingencyScanner {
    config: ResilienceConfig,
}

impl Default for ContingencyScanner {
    fn default() -> Self {
        Self::new(ResilienceConfig::default())
    }
}

impl ContingencyScanner {
    pub fn new(config: ResilienceConfig) -> Self {
        Self { config }
    }

    pub fn scan(
        &self,
        model: &CoverageModel,
        mode: ContingencyMode,
        period: AnalysisPeriod,
    ) -> VulnerabilityReport {
        let n = model.len();
        let mut tallies = vec![Tally::default(); n];

        // ── Singletons ──────────────────────────────
        let mut failing_singletons: Vec<(usize, CascadeMetrics)> = Vec::new();
        for position in 0..n {
            let metrics = self.evaluate(model, &[position], mode);
            if metrics.is_failure() {
                let tally = &mut tallies[position];
                tally.fails_alone = true;
                tally.raw += self.config.scan.singleton_multiplier
                    * status_weight(&metrics)
                    * metrics.coverage_gap_pct;
                failing_singletons.push((position, metrics));
            }
        }
        let n1_pass = failing_singletons.is_empty();

        // ── Pairs ───────────────────────────────────
        let mut n2_fatal_pairs = Vec::new();
        let mut pairs_evaluated = 0;
        if mode == ContingencyMode::N2 {
            let pairs: Vec<(usize, usize)> = (0..n)
                .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
                .collect();
            pairs_evaluated = pairs.len();

            let evaluate =
                |&(i, j): &(usize, usize)| (i, j, self.evaluate(model, &[i, j], mode));
            let results: Vec<(usize, usize, CascadeMetrics)> =
                if pairs.len() >= self.config.scan.parallel_pair_threshold {
                    log::debug!("scan: evaluating {} pairs on rayon pool", pairs.len());
                    pairs.par_iter().map(evaluate).collect()
                } else {
                    pairs.iter().map(evaluate).collect()
                };

            let staff = model.staff();
            for (i, j, metrics) in results.into_iter().filter(|(_, _, m)| m.is_failure()) {
                let share = status_weight(&metrics) * metrics.coverage_gap_pct / 2.0;
                for p in [i, j] {
                    tallies[p].raw += share;
                    tallies[p].fatal_pairs += 1;
                }
                n2_fatal_pairs.push(N2FatalPair::new(
                    (staff[i].id.clone(), staff[i].name.clone()),
                    (staff[j].id.clone(), staff[j].name.clone()),
                    metrics.coverage_gap_pct,
                    metrics.system_status,
                    metrics.is_structural_failure(),
                ));
            }
        }
        let n2_pass =
            (mode == ContingencyMode::N2).then(|| n1_pass && n2_fatal_pairs.is_empty());

        let phase_transition_risk = self.phase_risk(n1_pass, n2_pass, n2_fatal_pairs.len());
        let n1_vulnerabilities = self.build_vulnerabilities(model, failing_singletons);
        let criticality_scores = rank_criticality(model, tallies, &self.config.scan);

        log::debug!(
            "scan: mode={} staff={} singletons={} pairs={} n1_failures={} fatal_pairs={}",
            mode.as_str(),
            n,
            n,
            pairs_evaluated,
            n1_vulnerabilities.len(),
            n2_fatal_pairs.len()
        );
        if n1_pass {
            log::info!(
                "scan: mode={} n1_pass=true n2_pass={:?} risk={}",
                mode.as_str(),
                n2_pass,
                phase_transition_risk.as_str()
            );
        } else {
            log::warn!(
                "scan: N-1 FAILED, {} single points of failure, risk={}",
                n1_vulnerabilities.len(),
                phase_transition_risk.as_str()
            );
        }

        VulnerabilityReport {
            mode,
            period,
            staff_count: n,
            n1_pass,
            n2_pass,
            phase_transition_risk,
            n1_vulnerabilities,
            n2_fatal_pairs,
            criticality_scores,
            singletons_evaluated: n,
            pairs_evaluated,
        }
    }

    /// `positions` come from enumerating `model` itself, so they are in range.
    fn evaluate(
        &self,
        model: &CoverageModel,
        positions: &[usize],
        mode: ContingencyMode,
    ) -> CascadeMetrics {
        cascade_at_positions(model, positions, mode, &self.config.cascade)
    }

    fn phase_risk(
        &self,
        n1_pass: bool,
        n2_pass: Option<bool>,
        fatal_pairs: usize,
    ) -> CriticalityTier {
        if n2_pass == Some(false) && fatal_pairs >= self.config.scan.fatal_pair_phase_critical {
            CriticalityTier::Critical
        } else if !n1_pass {
            CriticalityTier::High
        } else if fatal_pairs > 0 {
            CriticalityTier::Medium
        } else {
            CriticalityTier::Low
        }
    }

    fn severity(&self, gap_pct: f64) -> CriticalityTier {
        let s = &self.config.severity;
        if gap_pct >= s.critical_gap_pct {
            CriticalityTier::Critical
        } else if gap_pct >= s.high_gap_pct {
            CriticalityTier::High
        } else if gap_pct >= s.medium_gap_pct {
            CriticalityTier::Medium
        } else {
            CriticalityTier::Low
        }
    }

    fn build_vulnerabilities(
        &self,
        model: &CoverageModel,
        failing: Vec<(usize, CascadeMetrics)>,
    ) -> Vec<N1Vulnerability> {
        let mut keyed: Vec<(usize, N1Vulnerability)> = failing
            .into_iter()
            .map(|(position, metrics)| {
                let member = &model.staff()[position];
                let structural = metrics.is_structural_failure();
                let vulnerability = N1Vulnerability {
                    staff_id: member.id.clone(),
                    staff_name: member.name.clone(),
                    affected_blocks: metrics.affected_slots,
                    coverage_gap_pct: metrics.coverage_gap_pct,
                    severity: self.severity(metrics.coverage_gap_pct),
                    uncovered_capabilities: metrics.uncovered_capabilities,
                    structural,
                };
                (position, vulnerability)
            })
            .collect();

        keyed.sort_by(|(pa, a), (pb, b)| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| b.coverage_gap_pct.total_cmp(&a.coverage_gap_pct))
                .then_with(|| pa.cmp(pb))
        });
        keyed.into_iter().map(|(_, v)| v).collect()
    }
}

/// Scan under the reference policy.
pub fn scan(
    model: &CoverageModel,
    mode: ContingencyMode,
    period: AnalysisPeriod,
) -> VulnerabilityReport {
    ContingencyScanner::default().scan(model, mode, period)
}

fn status_weight(metrics: &CascadeMetrics) -> f64 {
    match metrics.system_status {
        SystemStatus::Failed => 2.0,
        // Critical, or a structural failure at a tolerable gap.
        _ => 1.0,
    }
}

fn risk_level(tally: &Tally, scan: &ScanConfig) -> CriticalityTier {
    if tally.fails_alone {
        CriticalityTier::Critical
    } else if tally.fatal_pairs >= scan.risk_high_fatal_pairs {
        CriticalityTier::High
    } else if tally.fatal_pairs >= scan.risk_medium_fatal_pairs {
        CriticalityTier::Medium
    } else {
        CriticalityTier::Low
    }
}

/// Total order: raw score descending, then staff id ascending.
fn rank_criticality(
    model: &CoverageModel,
    tallies: Vec<Tally>,
    scan: &ScanConfig,
) -> Vec<CriticalityScore> {
    let mut scores: Vec<CriticalityScore> = model
        .staff()
        .iter()
        .zip(tallies)
        .enumerate()
        .map(|(position, (member, tally))| {
            let services_covered = member.capabilities().len();
            let unique_coverage_slots = model.unique_capabilities(position).len();
            let unique_share = if services_covered == 0 {
                0.0
            } else {
                unique_coverage_slots as f64 / services_covered as f64
            };
            let replacement_difficulty =
                (member.role.replacement_baseline() + 0.6 * unique_share).clamp(0.0, 1.0);

            CriticalityScore {
                rank: 0,
                staff_id: member.id.clone(),
                staff_name: member.name.clone(),
                centrality_score: 0.0,
                raw_score: tally.raw
                    + scan.unique_capability_bonus * unique_coverage_slots as f64,
                services_covered,
                unique_coverage_slots,
                replacement_difficulty,
                risk_level: risk_level(&tally, scan),
                fails_alone: tally.fails_alone,
                fatal_pair_count: tally.fatal_pairs,
            }
        })
        .collect();

    scores.sort_by(|a, b| match b.raw_score.total_cmp(&a.raw_score) {
        Ordering::Equal => a.staff_id.cmp(&b.staff_id),
        other => other,
    });

    let max_raw = scores.first().map(|s| s.raw_score).unwrap_or(0.0);
    for (index, score) in scores.iter_mut().enumerate() {
        score.rank = index + 1;
        score.centrality_score = if max_raw > 0.0 {
            score.raw_score / max_raw
        } else {
            0.0
        };
    }
    scores
}
