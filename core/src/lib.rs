//! Contingency & cascade-impact resilience engine for staffed coverage rosters.
//!
//! Data flows one way:
//!   roster -> cascade -> scanner -> fragility / utilization -> health -> actions
//!
//! Every calculator is a pure, synchronous function of its inputs.

pub mod actions;
pub mod cascade;
pub mod config;
pub mod contingency;
pub mod engine;
pub mod error;
pub mod fragility;
pub mod health;
pub mod name_generator;
pub mod period;
pub mod rng;
pub mod roster;
pub mod scanner;
pub mod synthetic;
pub mod types;
pub mod utilization;

pub use cascade::{
    compute_cascade, compute_cascade_with, CascadeMetrics, RecoveryEstimate, SystemStatus,
};
pub use config::ResilienceConfig;
pub use contingency::{AbsenceSet, ContingencyMode};
pub use engine::{Analysis, DemandInput, ResilienceEngine};
pub use error::{ResilienceError, ResilienceResult};
pub use fragility::{map_to_timeline, FragilityDay, FragilityMapper};
pub use health::{OverallStatus, SystemHealth};
pub use period::AnalysisPeriod;
pub use roster::{CoverageModel, CriticalityTier, RoleTier, StaffMember};
pub use scanner::{
    scan, ContingencyScanner, CriticalityScore, N1Vulnerability, N2FatalPair, VulnerabilityReport,
};
pub use utilization::{
    classify, DefenseLevel, UtilizationClassifier, UtilizationLevel, UtilizationSnapshot,
};
