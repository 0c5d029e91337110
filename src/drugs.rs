//! Drugs and the drug list administered to the whole population.
//!
//! A `DrugList` is a set: giving the same drug twice is the same as giving
//! it once, and order does not matter. Rules test membership of individual
//! drugs or of a `DrugClass`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{AsRefStr, Display, EnumIter, EnumString};

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
pub enum Drug {
    #[serde(rename = "An")]
    #[strum(serialize = "An")]
    Antibiotic,
    #[serde(rename = "As")]
    #[strum(serialize = "As")]
    Aspirin,
    #[serde(rename = "Ib")]
    #[strum(serialize = "Ib")]
    Ibuprofen,
    #[serde(rename = "I")]
    #[strum(serialize = "I")]
    Insulin,
    #[serde(rename = "P")]
    #[strum(serialize = "P")]
    Paracetamol,
}

/// Groups of drugs that are interchangeable for treatment purposes.
#[derive(Deserialize, Serialize, Copy, Clone, PartialEq, Eq, Hash, Debug, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum DrugClass {
    /// Aspirin, ibuprofen and paracetamol.
    Analgesic,
}

impl Drug {
    #[must_use]
    pub fn class(self) -> Option<DrugClass> {
        match self {
            Drug::Aspirin | Drug::Ibuprofen | Drug::Paracetamol => Some(DrugClass::Analgesic),
            Drug::Antibiotic | Drug::Insulin => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrugList {
    drugs: BTreeSet<Drug>,
}

impl DrugList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, drug: Drug) -> bool {
        self.drugs.contains(&drug)
    }

    /// Returns `true` if any drug of the given class is in the list.
    #[must_use]
    pub fn contains_class(&self, class: DrugClass) -> bool {
        self.drugs.iter().any(|drug| drug.class() == Some(class))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drugs.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.drugs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Drug> + '_ {
        self.drugs.iter().copied()
    }
}

impl FromIterator<Drug> for DrugList {
    fn from_iter<I: IntoIterator<Item = Drug>>(iter: I) -> Self {
        DrugList {
            drugs: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[Drug; N]> for DrugList {
    fn from(drugs: [Drug; N]) -> Self {
        drugs.into_iter().collect()
    }
}
