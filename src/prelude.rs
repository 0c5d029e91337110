pub use crate::config::QuarantineConfig;
pub use crate::drugs::{Drug, DrugClass, DrugList};
pub use crate::error::QuarantineError;
pub use crate::fetch::{DataSource, StaticSource};
pub use crate::health::HealthState;
pub use crate::input::{parse_drugs, parse_patients, Vocabulary};
pub use crate::log::{debug, error, info, trace, warn};
pub use crate::quarantine::{DeadRuleAggregation, Quarantine, TickOutcome};
pub use crate::report::SimulationResult;
pub use crate::rules::RuleSet;
pub use crate::session::Session;
pub use crate::snapshot::PatientSnapshot;

#[cfg(feature = "fetch")]
pub use crate::fetch::HttpSource;
