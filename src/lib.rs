//! A rule engine for simulating drug regimens on a quarantined population
//!
//! A population of patients, each in exactly one [`HealthState`], is advanced
//! one 40-day tick at a time. The same drugs are always given to every
//! patient; what happens to each group of patients is decided by an ordered
//! [`RuleSet`]:
//!
//! * **dead rules** detect lethal drug combinations, which kill the whole
//!   population for that tick;
//! * **treatment rules** otherwise move or keep disjoint groups of patients,
//!   e.g. antibiotics cure tuberculosis and diabetics without insulin die.
//!
//! The central object is the [`Quarantine`] engine, which owns a
//! [`PatientSnapshot`] and a [`DrugList`]. Around it the crate provides the
//! pieces a front end needs:
//! * [`input`]: cleaning, whitelisting and parsing comma-separated input.
//! * [`report`]: pairing the population before and after a tick, and CSV export.
//! * [`history`]: a rolling window of past inputs and results.
//! * [`fetch`]: loading input from a remote server.
//! * [`session`]: all of the above behind a `submit` / `load` interface.
//! * [`config`]: JSON configuration for a session.
pub mod config;
pub mod drugs;
pub mod error;
pub mod fetch;
pub mod health;
pub mod history;
pub mod input;
pub mod log;
pub mod prelude;
pub mod quarantine;
pub mod report;
pub mod rules;
pub mod session;
pub mod snapshot;

pub use config::QuarantineConfig;
pub use drugs::{Drug, DrugClass, DrugList};
pub use error::QuarantineError;
pub use health::HealthState;
pub use quarantine::{DeadRuleAggregation, Quarantine, TickOutcome, DAYS_PER_TICK};
pub use report::SimulationResult;
pub use rules::{DrugCondition, Rule, RuleSet, StateDelta};
pub use session::Session;
pub use snapshot::PatientSnapshot;
