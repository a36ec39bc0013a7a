//! Policy constants for the resilience engine.
//!
//! Every threshold the calculators use lives here, once. The defaults are
//! the reference policy; a JSON file may override any subset of fields.
//! In tests, use `ResilienceConfig::default()`.

use crate::error::{ResilienceError, ResilienceResult};
use serde::{Deserialize, Serialize};

// ── Cascade metrics ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeThresholds {
    /// Coverage slots represented by one unit of coverage weight.
    pub slots_per_unit: f64,
    /// Gap (percent) below which a tolerated absence is only `strained`.
    pub strained_gap_pct: f64,
    /// Gap (percent) below which a tolerated absence is `critical` rather than `failed`.
    pub critical_gap_pct: f64,
    /// Per-absentee cascade depth by criticality tier.
    pub critical_weight: u32,
    pub high_weight: u32,
    pub base_weight: u32,
    pub redistribution_factor: f64,
    /// Redistribution load reported when nobody remains on the roster.
    pub no_remaining_load: f64,
    pub recovery_short_below: u32,
    pub recovery_medium_below: u32,
    pub recovery_long_below: u32,
}

impl Default for CascadeThresholds {
    fn default() -> Self {
        Self {
            slots_per_unit: 2.0,
            strained_gap_pct: 20.0,
            critical_gap_pct: 35.0,
            critical_weight: 3,
            high_weight: 2,
            base_weight: 1,
            redistribution_factor: 10.0,
            no_remaining_load: 100.0,
            recovery_short_below: 3,
            recovery_medium_below: 6,
            recovery_long_below: 10,
        }
    }
}

// ── N-1 severity buckets ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityThresholds {
    pub medium_gap_pct: f64,
    pub high_gap_pct: f64,
    pub critical_gap_pct: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            medium_gap_pct: 10.0,
            high_gap_pct: 20.0,
            critical_gap_pct: 35.0,
        }
    }
}

// ── Temporal fragility ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragilityParams {
    pub base: f64,
    pub n1_fail: f64,
    pub n2_fail: f64,
    pub phase_critical: f64,
    pub phase_high: f64,
    pub phase_medium: f64,
    pub phase_low: f64,
    pub per_vulnerability: f64,
    pub vulnerability_cap: f64,
    pub variance_amplitude: f64,
    pub day_frequency: f64,
    pub seed_frequency: f64,
    /// SPOF is named only on days strictly above this fragility.
    pub spof_threshold: f64,
    pub violations_all_above: f64,
    pub violations_two_above: f64,
    pub violations_one_above: f64,
    pub staffing_slope: f64,
}

impl Default for FragilityParams {
    fn default() -> Self {
        Self {
            base: 0.1,
            n1_fail: 0.4,
            n2_fail: 0.2,
            phase_critical: 0.3,
            phase_high: 0.2,
            phase_medium: 0.1,
            phase_low: 0.0,
            per_vulnerability: 0.05,
            vulnerability_cap: 0.2,
            variance_amplitude: 0.15,
            day_frequency: 0.5,
            seed_frequency: 0.1,
            spof_threshold: 0.7,
            violations_all_above: 0.8,
            violations_two_above: 0.6,
            violations_one_above: 0.4,
            staffing_slope: 40.0,
        }
    }
}

// ── Utilization bands ──────────────────────────────────────────────

/// Shared by the classifier and the defense-level derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtilizationThresholds {
    pub yellow_at: f64,
    pub orange_at: f64,
    pub black_at: f64,
    pub safe_capacity_fraction: f64,
    pub max_wait_multiplier: f64,
}

impl Default for UtilizationThresholds {
    fn default() -> Self {
        Self {
            yellow_at: 0.70,
            orange_at: 0.85,
            black_at: 0.95,
            safe_capacity_fraction: 0.80,
            max_wait_multiplier: 100.0,
        }
    }
}

// ── Scanner ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Pair count at or above which N-2 pairs are evaluated on the rayon pool.
    pub parallel_pair_threshold: usize,
    /// Fatal pairs needed before phase-transition risk is `critical`.
    pub fatal_pair_phase_critical: usize,
    /// Fatal pairs a member must sit in for `high` / `medium` risk level.
    pub risk_high_fatal_pairs: usize,
    pub risk_medium_fatal_pairs: usize,
    /// Raw-score bonus per capability nobody else on the roster holds.
    pub unique_capability_bonus: f64,
    /// Weight of a failing singleton relative to a failing pair.
    pub singleton_multiplier: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            parallel_pair_threshold: 500,
            fatal_pair_phase_critical: 3,
            risk_high_fatal_pairs: 3,
            risk_medium_fatal_pairs: 1,
            unique_capability_bonus: 10.0,
            singleton_multiplier: 2.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceConfig {
    pub cascade: CascadeThresholds,
    pub severity: SeverityThresholds,
    pub fragility: FragilityParams,
    pub utilization: UtilizationThresholds,
    pub scan: ScanConfig,
}

impl ResilienceConfig {
    /// Load from a JSON file. Fields missing from the file keep their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config = Self::from_json(&content)?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> ResilienceResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject threshold tables whose bands are out of order.
    pub fn validate(&self) -> ResilienceResult<()> {
        let c = &self.cascade;
        ensure(c.slots_per_unit >= 0.0, "cascade.slots_per_unit must be >= 0")?;
        ensure(
            c.strained_gap_pct < c.critical_gap_pct,
            "cascade.strained_gap_pct must be below cascade.critical_gap_pct",
        )?;
        ensure(
            c.recovery_short_below <= c.recovery_medium_below
                && c.recovery_medium_below <= c.recovery_long_below,
            "cascade recovery buckets must be ascending",
        )?;

        let s = &self.severity;
        ensure(
            s.medium_gap_pct <= s.high_gap_pct && s.high_gap_pct <= s.critical_gap_pct,
            "severity gap buckets must be ascending",
        )?;

        let f = &self.fragility;
        ensure(
            f.violations_one_above <= f.violations_two_above
                && f.violations_two_above <= f.violations_all_above,
            "fragility violation tiers must be ascending",
        )?;
        ensure(f.vulnerability_cap >= 0.0, "fragility.vulnerability_cap must be >= 0")?;

        let u = &self.utilization;
        ensure(
            0.0 < u.yellow_at && u.yellow_at < u.orange_at && u.orange_at < u.black_at,
            "utilization bands must satisfy 0 < yellow < orange < black",
        )?;
        ensure(
            u.safe_capacity_fraction > 0.0 && u.safe_capacity_fraction <= 1.0,
            "utilization.safe_capacity_fraction must be in (0, 1]",
        )?;
        ensure(u.max_wait_multiplier >= 1.0, "utilization.max_wait_multiplier must be >= 1")?;

        let sc = &self.scan;
        ensure(
            1 <= sc.risk_medium_fatal_pairs
                && sc.risk_medium_fatal_pairs <= sc.risk_high_fatal_pairs,
            "scan risk cutoffs must satisfy 1 <= medium <= high",
        )?;
        ensure(
            sc.unique_capability_bonus >= 0.0 && sc.singleton_multiplier >= 0.0,
            "scan.unique_capability_bonus and scan.singleton_multiplier must be >= 0",
        )?;
        Ok(())
    }
}

fn ensure(condition: bool, reason: &str) -> ResilienceResult<()> {
    if condition {
        Ok(())
    } else {
        Err(ResilienceError::InvalidConfig {
            reason: reason.to_string(),
        })
    }
}
