//! Contingency modes and validated absence sets.

use crate::{
    error::{ResilienceError, ResilienceResult},
    roster::CoverageModel,
    types::StaffId,
};
use serde::{Deserialize, Serialize};

/// How many simultaneous unplanned absences the roster must tolerate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ContingencyMode {
    #[serde(rename = "N-1")]
    N1,
    #[serde(rename = "N-2")]
    N2,
}

impl ContingencyMode {
    /// Largest absence set the mode admits.
    pub fn limit(&self) -> usize {
        match self {
            Self::N1 => 1,
            Self::N2 => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::N1 => "N-1",
            Self::N2 => "N-2",
        }
    }
}

impl std::str::FromStr for ContingencyMode {
    type Err = ResilienceError;

    fn from_str(s: &str) -> ResilienceResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N-1" | "N1" => Ok(Self::N1),
            "N-2" | "N2" => Ok(Self::N2),
            other => Err(ResilienceError::InvalidConfig {
                reason: format!("unknown contingency mode '{other}'"),
            }),
        }
    }
}

/// A set of absent staff, checked against one coverage model.
///
/// Ids are kept in the roster order of the model they were validated
/// against, so two sets built from the same ids in a different order
/// compare equal. Scoring resolves the ids again against whichever model
/// it is given; an id that model does not know is rejected there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AbsenceSet {
    ids: Vec<StaffId>,
}

impl AbsenceSet {
    /// Validate `ids` against `model`: every id known, no duplicates,
    /// size within the mode limit. Nothing is truncated.
    pub fn new<S: AsRef<str>>(
        model: &CoverageModel,
        ids: &[S],
        mode: ContingencyMode,
    ) -> ResilienceResult<Self> {
        if ids.len() > mode.limit() {
            return Err(ResilienceError::AbsenceExceedsMode {
                size: ids.len(),
                limit: mode.limit(),
                mode: mode.as_str(),
            });
        }
        let mut keyed: Vec<(usize, StaffId)> = Vec::with_capacity(ids.len());
        for id in ids {
            let id = id.as_ref();
            let position = model
                .position(id)
                .ok_or_else(|| ResilienceError::UnknownStaffId { id: id.to_string() })?;
            if keyed.iter().any(|(p, _)| *p == position) {
                return Err(ResilienceError::DuplicateAbsentee { id: id.to_string() });
            }
            keyed.push((position, id.to_string()));
        }
        keyed.sort_unstable_by_key(|(p, _)| *p);
        Ok(Self {
            ids: keyed.into_iter().map(|(_, id)| id).collect(),
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[StaffId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ascending roster positions of the absentees within `model`.
    pub(crate) fn resolve(&self, model: &CoverageModel) -> ResilienceResult<Vec<usize>> {
        let mut positions = self
            .ids
            .iter()
            .map(|id| {
                model
                    .position(id)
                    .ok_or_else(|| ResilienceError::UnknownStaffId { id: id.clone() })
            })
            .collect::<ResilienceResult<Vec<usize>>>()?;
        positions.sort_unstable();
        Ok(positions)
    }
}
