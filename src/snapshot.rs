//! Counts of patients per health state at one instant.

use crate::error::QuarantineError;
use crate::health::HealthState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The number of patients in each health state.
///
/// A snapshot always holds every required `HealthState` (see
/// [`HealthState::is_required`]); optional states are either present or absent
/// for the lifetime of the snapshot and of any engine built from it. Counts
/// are unsigned, and deserializing a snapshot rejects negative or fractional
/// counts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<HealthState, i64>",
    into = "BTreeMap<HealthState, u64>"
)]
pub struct PatientSnapshot {
    counts: BTreeMap<HealthState, u64>,
}

impl PatientSnapshot {
    /// Builds a snapshot from `(state, count)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `QuarantineError::InvalidSnapshot` if a required state is absent
    /// or the counts add up to more than a `u64` holds.
    pub fn new<I>(counts: I) -> Result<Self, QuarantineError>
    where
        I: IntoIterator<Item = (HealthState, u64)>,
    {
        let counts: BTreeMap<HealthState, u64> = counts.into_iter().collect();
        if let Some(missing) = HealthState::required().find(|state| !counts.contains_key(state)) {
            return Err(QuarantineError::InvalidSnapshot(format!(
                "missing required state {missing:?} ({missing})"
            )));
        }
        if counts
            .values()
            .try_fold(0u64, |total, count| total.checked_add(*count))
            .is_none()
        {
            return Err(QuarantineError::InvalidSnapshot(
                "total patient count overflows".to_string(),
            ));
        }
        Ok(PatientSnapshot { counts })
    }

    /// Returns the count for `state`; states absent from the snapshot count as zero.
    #[must_use]
    pub fn get(&self, state: HealthState) -> u64 {
        self.counts.get(&state).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn contains(&self, state: HealthState) -> bool {
        self.counts.contains_key(&state)
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of patients in any state other than `Dead`.
    #[must_use]
    pub fn living(&self) -> u64 {
        self.counts
            .iter()
            .filter(|(state, _)| state.is_living())
            .map(|(_, count)| count)
            .sum()
    }

    pub fn states(&self) -> impl Iterator<Item = HealthState> + '_ {
        self.counts.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (HealthState, u64)> + '_ {
        self.counts.iter().map(|(state, count)| (*state, *count))
    }

    /// A snapshot with the same states, every count set to zero.
    pub(crate) fn zeroed(&self) -> Self {
        PatientSnapshot {
            counts: self.counts.keys().map(|state| (*state, 0)).collect(),
        }
    }

    pub(crate) fn add(&mut self, state: HealthState, count: u64) {
        match self.counts.get_mut(&state) {
            Some(current) => *current += count,
            // Only optional states can be absent, and they only ever receive
            // their own (zero) count back.
            None => debug_assert_eq!(count, 0, "count added to absent state {state:?}"),
        }
    }
}

impl TryFrom<BTreeMap<HealthState, i64>> for PatientSnapshot {
    type Error = QuarantineError;

    fn try_from(counts: BTreeMap<HealthState, i64>) -> Result<Self, Self::Error> {
        let counts = counts
            .into_iter()
            .map(|(state, count)| match u64::try_from(count) {
                Ok(count) => Ok((state, count)),
                Err(_) => Err(QuarantineError::InvalidSnapshot(format!(
                    "negative count {count} for state {state:?}"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        PatientSnapshot::new(counts)
    }
}

impl From<PatientSnapshot> for BTreeMap<HealthState, u64> {
    fn from(snapshot: PatientSnapshot) -> Self {
        snapshot.counts
    }
}
