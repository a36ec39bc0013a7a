//! Coverage model: the static roster snapshot every calculator reads.
//!
//! RULE: a CoverageModel is validated once, at construction, and is
//! immutable afterwards. Calculators never re-check weights or ids.

use crate::{
    error::{ResilienceError, ResilienceResult},
    types::{Capability, StaffId},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RoleTier {
    Junior,
    Senior,
    Attending,
}

impl RoleTier {
    /// Baseline difficulty of finding a same-tier replacement at short notice.
    pub fn replacement_baseline(&self) -> f64 {
        match self {
            Self::Junior    => 0.10,
            Self::Senior    => 0.25,
            Self::Attending => 0.40,
        }
    }
}

/// Ordered four-step tier, reused for staff criticality, N-1 severity,
/// per-staff risk level and phase-transition risk.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CriticalityTier {
    Low,
    Medium,
    High,
    Critical,
}

impl CriticalityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low      => "low",
            Self::Medium   => "medium",
            Self::High     => "high",
            Self::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    pub role: RoleTier,
    pub specialty: String,
    #[serde(default)]
    pub credentials: Vec<String>,
    pub coverage_weight: f64,
    pub criticality: CriticalityTier,
}

impl StaffMember {
    pub fn new(
        id: impl Into<StaffId>,
        name: impl Into<String>,
        role: RoleTier,
        specialty: impl Into<String>,
        coverage_weight: f64,
        criticality: CriticalityTier,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            specialty: specialty.into(),
            credentials: Vec::new(),
            coverage_weight,
            criticality,
        }
    }

    pub fn with_credentials<I, S>(mut self, credentials: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.credentials = credentials.into_iter().map(Into::into).collect();
        self
    }

    /// Specialty plus credentials, empty tags skipped, deduplicated.
    pub fn capabilities(&self) -> BTreeSet<&str> {
        std::iter::once(self.specialty.as_str())
            .chain(self.credentials.iter().map(String::as_str))
            .filter(|c| !c.trim().is_empty())
            .collect()
    }
}

/// Ordered roster with cached totals and a capability index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<StaffMember>", into = "Vec<StaffMember>")]
pub struct CoverageModel {
    staff: Vec<StaffMember>,
    total_coverage: f64,
    positions: HashMap<StaffId, usize>,
    /// capability -> roster positions of every holder, ascending.
    holders: BTreeMap<Capability, Vec<usize>>,
}

impl CoverageModel {
    /// Validate and index a roster. An empty roster is accepted.
    pub fn new(staff: Vec<StaffMember>) -> ResilienceResult<Self> {
        let mut positions = HashMap::with_capacity(staff.len());
        let mut holders: BTreeMap<Capability, Vec<usize>> = BTreeMap::new();
        let mut total_coverage = 0.0;

        for (position, member) in staff.iter().enumerate() {
            if member.id.trim().is_empty() {
                return Err(ResilienceError::EmptyStaffId { position });
            }
            if !member.coverage_weight.is_finite() || member.coverage_weight <= 0.0 {
                return Err(ResilienceError::InvalidCoverageWeight {
                    id: member.id.clone(),
                    weight: member.coverage_weight,
                });
            }
            if positions.insert(member.id.clone(), position).is_some() {
                return Err(ResilienceError::DuplicateStaffId {
                    id: member.id.clone(),
                });
            }
            for capability in member.capabilities() {
                holders
                    .entry(capability.to_string())
                    .or_default()
                    .push(position);
            }
            total_coverage += member.coverage_weight;
        }

        log::debug!(
            "roster: staff={} total_coverage={:.2} capabilities={}",
            staff.len(),
            total_coverage,
            holders.len()
        );

        Ok(Self {
            staff,
            total_coverage,
            positions,
            holders,
        })
    }

    pub fn staff(&self) -> &[StaffMember] {
        &self.staff
    }

    pub fn len(&self) -> usize {
        self.staff.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staff.is_empty()
    }

    pub fn total_coverage(&self) -> f64 {
        self.total_coverage
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Capabilities that only the member at `position` holds.
    pub fn unique_capabilities(&self, position: usize) -> Vec<&str> {
        self.holders
            .iter()
            .filter(|(_, h)| h.as_slice() == [position])
            .map(|(c, _)| c.as_str())
            .collect()
    }

    /// Capabilities whose every holder is in `absent` (roster positions).
    pub fn uncovered_capabilities(&self, absent: &[usize]) -> Vec<&str> {
        if absent.is_empty() {
            return Vec::new();
        }
        self.holders
            .iter()
            .filter(|(_, h)| h.iter().all(|p| absent.contains(p)))
            .map(|(c, _)| c.as_str())
            .collect()
    }
}

impl TryFrom<Vec<StaffMember>> for CoverageModel {
    type Error = ResilienceError;

    fn try_from(staff: Vec<StaffMember>) -> ResilienceResult<Self> {
        Self::new(staff)
    }
}

impl From<CoverageModel> for Vec<StaffMember> {
    fn from(model: CoverageModel) -> Self {
        model.staff
    }
}
