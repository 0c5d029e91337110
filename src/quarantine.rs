//! The simulation engine.
//!
//! A `Quarantine` owns the current [`PatientSnapshot`] and the drug list
//! administered to every patient. Each call to [`Quarantine::step`] advances
//! the population by one tick of [`DAYS_PER_TICK`] days:
//!
//! 1. Every dead rule's condition is evaluated against the drug list, in order.
//! 2. The results are aggregated according to the engine's
//!    [`DeadRuleAggregation`] into a single gating rule. That rule's selected
//!    delta is applied once: either the whole population moves to `Dead`
//!    (a lethal combination) or the already dead are kept.
//! 3. If the tick is not lethal, every treatment rule is applied in order.
//! 4. States no applied delta consumed are carried forward unchanged.
//!
//! ```
//! use quarantine::{Drug, HealthState, PatientSnapshot, Quarantine};
//!
//! let patients = PatientSnapshot::new([
//!     (HealthState::Fever, 1),
//!     (HealthState::Healthy, 2),
//!     (HealthState::Diabetic, 3),
//!     (HealthState::Tuberculosis, 1),
//!     (HealthState::Dead, 0),
//! ])
//! .unwrap();
//! let mut quarantine = Quarantine::new(patients);
//! quarantine.set_drugs([Drug::Antibiotic]);
//! quarantine.step();
//!
//! let report = quarantine.report();
//! assert_eq!(report.get(HealthState::Healthy), 3);
//! assert_eq!(report.get(HealthState::Dead), 3);
//! ```

use crate::drugs::{Drug, DrugList};
use crate::health::HealthState;
use crate::log::{debug, trace};
use crate::rules::RuleSet;
use crate::snapshot::PatientSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Simulated days per call to [`Quarantine::step`].
pub const DAYS_PER_TICK: u64 = 40;

/// How the outcomes of the individual dead rules decide whether a tick is
/// lethal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadRuleAggregation {
    /// The tick is lethal if any dead rule fired.
    #[default]
    AnyFired,
    /// Only the last dead rule decides; earlier firings are overwritten.
    LastEvaluated,
}

impl DeadRuleAggregation {
    /// Picks the index of the dead rule whose branch is applied this tick,
    /// given whether each rule fired.
    fn gating_rule(self, fired: &[bool]) -> Option<usize> {
        let last = fired.len().checked_sub(1)?;
        match self {
            DeadRuleAggregation::AnyFired => Some(fired.iter().position(|f| *f).unwrap_or(last)),
            DeadRuleAggregation::LastEvaluated => Some(last),
        }
    }
}

/// Which of the two per-tick modes a step ran in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// A dead rule fired; the whole population is now dead.
    Lethal,
    /// Treatment rules were applied.
    Treated,
}

#[derive(Clone, Debug)]
pub struct Quarantine {
    patients: PatientSnapshot,
    drugs: DrugList,
    rules: Arc<RuleSet>,
    aggregation: DeadRuleAggregation,
    ticks: u64,
}

impl Quarantine {
    /// Creates an engine using the standard rule table and no drugs.
    #[must_use]
    pub fn new(patients: PatientSnapshot) -> Self {
        Quarantine::with_rules(patients, RuleSet::standard())
    }

    #[must_use]
    pub fn with_rules(patients: PatientSnapshot, rules: Arc<RuleSet>) -> Self {
        Quarantine {
            patients,
            drugs: DrugList::new(),
            rules,
            aggregation: DeadRuleAggregation::default(),
            ticks: 0,
        }
    }

    #[must_use]
    pub fn with_aggregation(mut self, aggregation: DeadRuleAggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Replaces the administered drugs. The list applies to every following
    /// step until it is replaced again.
    pub fn set_drugs<I: IntoIterator<Item = Drug>>(&mut self, drugs: I) {
        self.drugs = drugs.into_iter().collect();
    }

    #[must_use]
    pub fn drugs(&self) -> &DrugList {
        &self.drugs
    }

    /// Advances the population by one tick.
    pub fn step(&mut self) -> TickOutcome {
        let before = &self.patients;
        let mut after = before.zeroed();
        let mut consumed = BTreeSet::new();

        let dead_rules = self.rules.dead_rules();
        let fired: Vec<bool> = dead_rules
            .iter()
            .map(|rule| {
                let fired = rule.condition.holds(&self.drugs);
                trace!("dead rule {}: fired={}", rule.name, fired);
                fired
            })
            .collect();

        let mut lethal = false;
        if let Some(index) = self.aggregation.gating_rule(&fired) {
            lethal = fired[index];
            dead_rules[index]
                .branch(lethal)
                .apply(before, &mut after, &mut consumed);
        }

        if !lethal {
            for rule in self.rules.treatment_rules() {
                let matched = rule.condition.holds(&self.drugs);
                trace!("treatment rule {}: matched={}", rule.name, matched);
                rule.branch(matched)
                    .apply(before, &mut after, &mut consumed);
            }
        }

        for (state, count) in before.iter() {
            if !consumed.contains(&state) {
                after.add(state, count);
            }
        }

        self.ticks += 1;
        let outcome = if lethal {
            TickOutcome::Lethal
        } else {
            TickOutcome::Treated
        };
        debug!(
            "tick {} ({} days): {:?}, {} living, {} dead",
            self.ticks,
            self.elapsed_days(),
            outcome,
            after.living(),
            after.get(HealthState::Dead)
        );
        self.patients = after;
        outcome
    }

    /// Returns a copy of the current population.
    #[must_use]
    pub fn report(&self) -> PatientSnapshot {
        self.patients.clone()
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub fn elapsed_days(&self) -> u64 {
        self.ticks * DAYS_PER_TICK
    }
}
