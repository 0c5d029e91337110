//! Cleaning, validating and parsing free-text input.
//!
//! Patients arrive as a comma-separated list of health state codes, one per
//! patient (`"F,H,H,D"`); drugs as a comma-separated list of drug codes
//! (`"An,I"`). The engine never sees these strings: a [`Vocabulary`] checks
//! them against a whitelist first, then [`parse_patients`] and
//! [`parse_drugs`] turn them into a [`PatientSnapshot`] and a [`DrugList`].

use crate::drugs::{Drug, DrugList};
use crate::error::QuarantineError;
use crate::health::HealthState;
use crate::snapshot::PatientSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use strum::IntoEnumIterator;

/// Trims `value` and removes whitespace around every comma.
#[must_use]
pub fn clean_value(value: &str) -> String {
    value
        .trim()
        .split(',')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(",")
}

/// Cleans `input`, treating absent input as empty.
#[must_use]
pub fn clean_input(input: Option<&str>) -> String {
    input.map(clean_value).unwrap_or_default()
}

/// Counts occurrences of each state code. Every required state is present in
/// the result, defaulting to zero.
///
/// # Errors
///
/// `QuarantineError::EmptyPatients` if `patients` is empty, and
/// `QuarantineError::InvalidPatients` for a token that is not a state code.
pub fn parse_patients(patients: &str) -> Result<PatientSnapshot, QuarantineError> {
    if patients.trim().is_empty() {
        return Err(QuarantineError::EmptyPatients);
    }
    let mut counts: BTreeMap<HealthState, u64> =
        HealthState::required().map(|state| (state, 0)).collect();
    for token in patients.split(',').map(str::trim) {
        let state = HealthState::from_str(token)
            .map_err(|_| QuarantineError::InvalidPatients(token.to_string()))?;
        *counts.entry(state).or_default() += 1;
    }
    PatientSnapshot::new(counts)
}

/// Parses drug codes. Empty tokens are ignored, so `""` is no drugs.
///
/// # Errors
///
/// `QuarantineError::InvalidDrugs` for a token that is not a drug code.
pub fn parse_drugs(drugs: &str) -> Result<DrugList, QuarantineError> {
    drugs
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            Drug::from_str(token).map_err(|_| QuarantineError::InvalidDrugs(token.to_string()))
        })
        .collect()
}

/// Which vocabulary a [`Vocabulary`] is built from in configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyKind {
    #[default]
    Standard,
    Classic,
}

/// The whitelists of state and drug codes a session accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocabulary {
    pub patients: BTreeSet<HealthState>,
    pub drugs: BTreeSet<Drug>,
}

impl Vocabulary {
    /// Every known state and drug.
    #[must_use]
    pub fn standard() -> Self {
        Vocabulary {
            patients: HealthState::iter().collect(),
            drugs: Drug::iter().collect(),
        }
    }

    /// The original five states and four drugs, without `Pain` or ibuprofen.
    #[must_use]
    pub fn classic() -> Self {
        Vocabulary {
            patients: HealthState::required().collect(),
            drugs: BTreeSet::from([
                Drug::Antibiotic,
                Drug::Aspirin,
                Drug::Insulin,
                Drug::Paracetamol,
            ]),
        }
    }

    #[must_use]
    pub fn from_kind(kind: VocabularyKind) -> Self {
        match kind {
            VocabularyKind::Standard => Vocabulary::standard(),
            VocabularyKind::Classic => Vocabulary::classic(),
        }
    }

    /// Checks that every token of the cleaned `patients` and `drugs` strings
    /// is in the whitelist. An empty drug token is allowed.
    ///
    /// # Errors
    ///
    /// `QuarantineError::InvalidPatients` or `QuarantineError::InvalidDrugs`
    /// naming the first offending token.
    pub fn validate(&self, patients: &str, drugs: &str) -> Result<(), QuarantineError> {
        for token in patients.split(',') {
            let known = HealthState::from_str(token)
                .is_ok_and(|state| self.patients.contains(&state));
            if !known {
                return Err(QuarantineError::InvalidPatients(token.to_string()));
            }
        }
        for token in drugs.split(',') {
            let known = token.is_empty()
                || Drug::from_str(token).is_ok_and(|drug| self.drugs.contains(&drug));
            if !known {
                return Err(QuarantineError::InvalidDrugs(token.to_string()));
            }
        }
        Ok(())
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Vocabulary::standard()
    }
}
