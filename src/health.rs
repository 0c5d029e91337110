//! Health states a patient can be in.
//!
//! Every patient is in exactly one `HealthState`. States are written as
//! one-letter codes both in free-text input and in serialized snapshots:
//!
//! | code | state          |
//! |------|----------------|
//! | `F`  | `Fever`        |
//! | `P`  | `Pain`         |
//! | `H`  | `Healthy`      |
//! | `D`  | `Diabetic`     |
//! | `T`  | `Tuberculosis` |
//! | `X`  | `Dead`         |
//!
//! `Pain` is an extension state: snapshots may omit it. All other states are
//! required in every snapshot.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

#[derive(
    Deserialize,
    Serialize,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    EnumIter,
    EnumString,
    Display,
    AsRefStr,
)]
pub enum HealthState {
    #[serde(rename = "F")]
    #[strum(serialize = "F")]
    Fever,
    #[serde(rename = "P")]
    #[strum(serialize = "P")]
    Pain,
    #[serde(rename = "H")]
    #[strum(serialize = "H")]
    Healthy,
    #[serde(rename = "D")]
    #[strum(serialize = "D")]
    Diabetic,
    #[serde(rename = "T")]
    #[strum(serialize = "T")]
    Tuberculosis,
    #[serde(rename = "X")]
    #[strum(serialize = "X")]
    Dead,
}

impl HealthState {
    /// Returns `false` only for extension states that a snapshot may omit.
    #[must_use]
    pub fn is_required(self) -> bool {
        !matches!(self, HealthState::Pain)
    }

    #[must_use]
    pub fn is_living(self) -> bool {
        self != HealthState::Dead
    }

    /// Iterates over the states every snapshot must contain.
    pub fn required() -> impl Iterator<Item = HealthState> {
        HealthState::iter().filter(|state| state.is_required())
    }
}
