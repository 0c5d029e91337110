//! The rule table: ordered transition rules as data.
//!
//! A [`Rule`] pairs a [`DrugCondition`] with two [`StateDelta`]s, one applied
//! when the condition holds on the administered drug list and one applied when
//! it does not. Deltas are declarative "move these counts there" descriptors
//! that read the pre-step snapshot and add into the post-step snapshot; the
//! single interpreter for them is [`StateDelta::apply`].
//!
//! A [`RuleSet`] holds two ordered sequences:
//!
//! * **dead rules** select whether this tick is a lethal combination, in which
//!   case the whole population ends in `Dead`;
//! * **treatment rules** run only when the tick is not lethal, each moving or
//!   keeping a disjoint slice of the population.
//!
//! Rule sets are validated on construction (including when deserialized from
//! JSON) so that every step conserves the population and never takes
//! patients out of `Dead`.

use crate::drugs::{Drug, DrugClass, DrugList};
use crate::error::QuarantineError;
use crate::health::HealthState;
use crate::snapshot::PatientSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::{Arc, LazyLock};
use strum::IntoEnumIterator;

static STANDARD_RULES: LazyLock<Arc<RuleSet>> = LazyLock::new(|| {
    Arc::new(RuleSet::build_standard().expect("standard rule table is well formed"))
});

static CLASSIC_RULES: LazyLock<Arc<RuleSet>> = LazyLock::new(|| {
    Arc::new(RuleSet::build_classic().expect("classic rule table is well formed"))
});

/// A predicate over the administered drug list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrugCondition {
    Given(Drug),
    ClassGiven(DrugClass),
    AllOf(Vec<DrugCondition>),
    AnyOf(Vec<DrugCondition>),
    Not(Box<DrugCondition>),
}

impl DrugCondition {
    #[must_use]
    pub fn holds(&self, drugs: &DrugList) -> bool {
        match self {
            DrugCondition::Given(drug) => drugs.contains(*drug),
            DrugCondition::ClassGiven(class) => drugs.contains_class(*class),
            DrugCondition::AllOf(conditions) => conditions.iter().all(|c| c.holds(drugs)),
            DrugCondition::AnyOf(conditions) => conditions.iter().any(|c| c.holds(drugs)),
            DrugCondition::Not(condition) => !condition.holds(drugs),
        }
    }

    /// Both drugs given together.
    #[must_use]
    pub fn both(first: Drug, second: Drug) -> Self {
        DrugCondition::AllOf(vec![
            DrugCondition::Given(first),
            DrugCondition::Given(second),
        ])
    }

    #[must_use]
    pub fn without(drug: Drug) -> Self {
        DrugCondition::Not(Box::new(DrugCondition::Given(drug)))
    }
}

/// How a rule redistributes the counts it is responsible for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateDelta {
    /// Carry each listed state's count forward into the same state.
    Keep(Vec<HealthState>),
    /// Add the summed counts of `from` to `to`.
    Move {
        from: Vec<HealthState>,
        to: HealthState,
    },
    /// Add the whole population, whatever state it is in, to `to`.
    MoveAll { to: HealthState },
}

impl StateDelta {
    #[must_use]
    pub fn keep(state: HealthState) -> Self {
        StateDelta::Keep(vec![state])
    }

    #[must_use]
    pub fn move_to(from: HealthState, to: HealthState) -> Self {
        StateDelta::Move {
            from: vec![from],
            to,
        }
    }

    /// The states whose pre-step counts this delta consumes. `MoveAll`
    /// consumes every state.
    #[must_use]
    pub fn sources(&self) -> BTreeSet<HealthState> {
        match self {
            StateDelta::Keep(states) => states.iter().copied().collect(),
            StateDelta::Move { from, .. } => from.iter().copied().collect(),
            StateDelta::MoveAll { .. } => HealthState::iter().collect(),
        }
    }

    fn destination(&self) -> Option<HealthState> {
        match self {
            StateDelta::Keep(_) => None,
            StateDelta::Move { to, .. } | StateDelta::MoveAll { to } => Some(*to),
        }
    }

    /// Reads counts from `before` and adds them into `after`, recording every
    /// state it consumed in `consumed`.
    pub fn apply(
        &self,
        before: &PatientSnapshot,
        after: &mut PatientSnapshot,
        consumed: &mut BTreeSet<HealthState>,
    ) {
        match self {
            StateDelta::Keep(states) => {
                for state in states {
                    after.add(*state, before.get(*state));
                    consumed.insert(*state);
                }
            }
            StateDelta::Move { from, to } => {
                let moved = from.iter().map(|state| before.get(*state)).sum();
                after.add(*to, moved);
                consumed.extend(from.iter().copied());
            }
            StateDelta::MoveAll { to } => {
                after.add(*to, before.total());
                consumed.extend(before.states());
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub condition: DrugCondition,
    pub on_match: StateDelta,
    pub on_no_match: StateDelta,
}

impl Rule {
    pub fn new(
        name: impl Into<String>,
        condition: DrugCondition,
        on_match: StateDelta,
        on_no_match: StateDelta,
    ) -> Self {
        Rule {
            name: name.into(),
            condition,
            on_match,
            on_no_match,
        }
    }

    /// The delta selected by `fired`.
    #[must_use]
    pub fn branch(&self, fired: bool) -> &StateDelta {
        if fired {
            &self.on_match
        } else {
            &self.on_no_match
        }
    }

    fn sources(&self) -> BTreeSet<HealthState> {
        self.on_match
            .sources()
            .union(&self.on_no_match.sources())
            .copied()
            .collect()
    }
}

#[derive(Serialize, Deserialize)]
struct RuleTable {
    dead_rules: Vec<Rule>,
    treatment_rules: Vec<Rule>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RuleTable", into = "RuleTable")]
pub struct RuleSet {
    dead_rules: Vec<Rule>,
    treatment_rules: Vec<Rule>,
}

impl RuleSet {
    /// Builds a rule set, checking that applying it can neither create nor
    /// destroy patients and never moves anyone out of `Dead`.
    ///
    /// # Errors
    ///
    /// Returns `QuarantineError::InvalidRuleSet` if
    /// * a delta lists the same state twice,
    /// * two treatment rules consume the same state,
    /// * a treatment rule consumes a state a dead rule keeps when it does not fire,
    /// * a delta moves counts out of `Dead`, or
    /// * a delta moves counts into an optional state.
    pub fn new(dead_rules: Vec<Rule>, treatment_rules: Vec<Rule>) -> Result<Self, QuarantineError> {
        for rule in dead_rules.iter().chain(&treatment_rules) {
            for delta in [&rule.on_match, &rule.on_no_match] {
                check_delta(&rule.name, delta)?;
            }
        }

        let mut claimed: Vec<(&str, BTreeSet<HealthState>)> = dead_rules
            .iter()
            .map(|rule| (rule.name.as_str(), rule.on_no_match.sources()))
            .collect();
        for rule in &treatment_rules {
            let sources = rule.sources();
            for (other, other_sources) in &claimed {
                if let Some(state) = sources.intersection(other_sources).next() {
                    return Err(QuarantineError::InvalidRuleSet(format!(
                        "rules {:?} and {other:?} both consume {state:?}",
                        rule.name
                    )));
                }
            }
            // Dead rules may keep the same states as each other: only one of
            // them is applied per tick.
            claimed.push((rule.name.as_str(), sources));
        }

        Ok(RuleSet {
            dead_rules,
            treatment_rules,
        })
    }

    /// The full rule table, including the `Pain` state and ibuprofen.
    #[must_use]
    pub fn standard() -> Arc<RuleSet> {
        Arc::clone(&STANDARD_RULES)
    }

    /// The five-state table without `Pain` or ibuprofen.
    #[must_use]
    pub fn classic() -> Arc<RuleSet> {
        Arc::clone(&CLASSIC_RULES)
    }

    #[must_use]
    pub fn dead_rules(&self) -> &[Rule] {
        &self.dead_rules
    }

    #[must_use]
    pub fn treatment_rules(&self) -> &[Rule] {
        &self.treatment_rules
    }

    fn build_standard() -> Result<Self, QuarantineError> {
        use HealthState::{Dead, Diabetic, Fever, Healthy, Pain, Tuberculosis};

        let lethal = |name: &str, first: Drug, second: Drug| {
            Rule::new(
                name,
                DrugCondition::both(first, second),
                StateDelta::MoveAll { to: Dead },
                StateDelta::keep(Dead),
            )
        };

        RuleSet::new(
            vec![
                lethal("aspirin_with_paracetamol", Drug::Aspirin, Drug::Paracetamol),
                lethal("aspirin_with_ibuprofen", Drug::Aspirin, Drug::Ibuprofen),
            ],
            vec![
                Rule::new(
                    "antibiotic_with_insulin_causes_fever",
                    DrugCondition::both(Drug::Antibiotic, Drug::Insulin),
                    StateDelta::move_to(Healthy, Fever),
                    StateDelta::keep(Healthy),
                ),
                Rule::new(
                    "analgesic_cures_fever_and_pain",
                    DrugCondition::ClassGiven(DrugClass::Analgesic),
                    StateDelta::Move {
                        from: vec![Fever, Pain],
                        to: Healthy,
                    },
                    StateDelta::Keep(vec![Fever, Pain]),
                ),
                Rule::new(
                    "antibiotic_cures_tuberculosis",
                    DrugCondition::Given(Drug::Antibiotic),
                    StateDelta::move_to(Tuberculosis, Healthy),
                    StateDelta::keep(Tuberculosis),
                ),
                Rule::new(
                    "diabetic_without_insulin_dies",
                    DrugCondition::without(Drug::Insulin),
                    StateDelta::move_to(Diabetic, Dead),
                    StateDelta::keep(Diabetic),
                ),
            ],
        )
    }

    fn build_classic() -> Result<Self, QuarantineError> {
        use HealthState::{Dead, Diabetic, Fever, Healthy, Tuberculosis};

        RuleSet::new(
            vec![Rule::new(
                "aspirin_with_paracetamol",
                DrugCondition::both(Drug::Aspirin, Drug::Paracetamol),
                StateDelta::MoveAll { to: Dead },
                StateDelta::keep(Dead),
            )],
            vec![
                Rule::new(
                    "antibiotic_with_insulin_causes_fever",
                    DrugCondition::both(Drug::Antibiotic, Drug::Insulin),
                    StateDelta::move_to(Healthy, Fever),
                    StateDelta::keep(Healthy),
                ),
                Rule::new(
                    "aspirin_or_paracetamol_cures_fever",
                    DrugCondition::AnyOf(vec![
                        DrugCondition::Given(Drug::Aspirin),
                        DrugCondition::Given(Drug::Paracetamol),
                    ]),
                    StateDelta::move_to(Fever, Healthy),
                    StateDelta::keep(Fever),
                ),
                Rule::new(
                    "antibiotic_cures_tuberculosis",
                    DrugCondition::Given(Drug::Antibiotic),
                    StateDelta::move_to(Tuberculosis, Healthy),
                    StateDelta::keep(Tuberculosis),
                ),
                Rule::new(
                    "diabetic_without_insulin_dies",
                    DrugCondition::without(Drug::Insulin),
                    StateDelta::move_to(Diabetic, Dead),
                    StateDelta::keep(Diabetic),
                ),
            ],
        )
    }
}

fn check_delta(rule: &str, delta: &StateDelta) -> Result<(), QuarantineError> {
    if let StateDelta::Keep(states) | StateDelta::Move { from: states, .. } = delta {
        if states.len() != delta.sources().len() {
            return Err(QuarantineError::InvalidRuleSet(format!(
                "rule {rule:?} lists a state more than once"
            )));
        }
    }
    let Some(to) = delta.destination() else {
        return Ok(());
    };
    if !to.is_required() {
        return Err(QuarantineError::InvalidRuleSet(format!(
            "rule {rule:?} moves patients into optional state {to:?}"
        )));
    }
    if to != HealthState::Dead && delta.sources().contains(&HealthState::Dead) {
        return Err(QuarantineError::InvalidRuleSet(format!(
            "rule {rule:?} moves patients out of Dead"
        )));
    }
    Ok(())
}

impl TryFrom<RuleTable> for RuleSet {
    type Error = QuarantineError;

    fn try_from(table: RuleTable) -> Result<Self, Self::Error> {
        RuleSet::new(table.dead_rules, table.treatment_rules)
    }
}

impl From<RuleSet> for RuleTable {
    fn from(rules: RuleSet) -> Self {
        RuleTable {
            dead_rules: rules.dead_rules,
            treatment_rules: rules.treatment_rules,
        }
    }
}
