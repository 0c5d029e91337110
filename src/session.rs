//! One user's run of submissions against the engine.
//!
//! A `Session` is what a UI layer talks to. It cleans and validates raw
//! input, builds a fresh [`Quarantine`] for each submission, steps it once,
//! and keeps the last few inputs and results. Rejected input never reaches
//! the engine; the returned error's `Display` is the message to show.

use crate::config::QuarantineConfig;
use crate::error::{InputOrigin, QuarantineError};
use crate::fetch::DataSource;
use crate::history::History;
use crate::input::{clean_input, parse_drugs, parse_patients, Vocabulary};
use crate::log::{info, warn};
use crate::quarantine::{DeadRuleAggregation, Quarantine};
use crate::report::{ReportWriter, SimulationResult};
use crate::rules::RuleSet;
use std::sync::Arc;

/// A cleaned `(patients, drugs)` pair as submitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub patients: String,
    pub drugs: String,
}

pub struct Session {
    rules: Arc<RuleSet>,
    aggregation: DeadRuleAggregation,
    vocabulary: Vocabulary,
    patients_endpoint: String,
    drugs_endpoint: String,
    inputs: History<Submission>,
    results: History<SimulationResult>,
    report: Option<ReportWriter>,
    submitted: u64,
}

impl Session {
    /// Builds a session and applies the configured logging.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured rule table or report file cannot be
    /// loaded, or the logging configuration cannot be applied.
    pub fn new(config: &QuarantineConfig) -> Result<Self, QuarantineError> {
        let rules = config.load_rules()?;
        Session::with_rules(config, rules)
    }

    /// Like [`Session::new`] but with an explicit rule table.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured report file cannot be created or
    /// the logging configuration cannot be applied.
    pub fn with_rules(
        config: &QuarantineConfig,
        rules: Arc<RuleSet>,
    ) -> Result<Self, QuarantineError> {
        config.apply_logging()?;
        let report = config
            .report_file
            .as_deref()
            .map(ReportWriter::create)
            .transpose()?;
        Ok(Session {
            rules,
            aggregation: config.dead_rule_aggregation,
            vocabulary: config.vocabulary(),
            patients_endpoint: config.patients_endpoint.clone(),
            drugs_endpoint: config.drugs_endpoint.clone(),
            inputs: History::new(config.history_length),
            results: History::new(config.history_length),
            report,
            submitted: 0,
        })
    }

    /// Runs one tick on typed input.
    ///
    /// # Errors
    ///
    /// * `EmptyPatients` if no patients were given,
    /// * `DuplicateInput` if the input equals the previous submission,
    /// * `InvalidPatients` / `InvalidDrugs` for tokens outside the vocabulary,
    /// * any error writing the configured report.
    pub fn submit(
        &mut self,
        patients: &str,
        drugs: &str,
    ) -> Result<&SimulationResult, QuarantineError> {
        let submission = Submission {
            patients: clean_input(Some(patients)),
            drugs: clean_input(Some(drugs)),
        };
        self.run(submission, InputOrigin::Typed)
    }

    /// Fetches patients and drugs from `source` and runs one tick on them.
    /// Missing drugs data means no drugs.
    ///
    /// # Errors
    ///
    /// `MissingData` if no patients data could be fetched, otherwise as
    /// [`Session::submit`].
    pub fn load(&mut self, source: &dyn DataSource) -> Result<&SimulationResult, QuarantineError> {
        let Some(patients) = source.fetch(&self.patients_endpoint) else {
            warn!("no patients data from {:?}", self.patients_endpoint);
            return Err(QuarantineError::MissingData("Patients".to_string()));
        };
        let drugs = source.fetch(&self.drugs_endpoint);
        let submission = Submission {
            patients: clean_input(Some(&patients)),
            drugs: clean_input(drugs.as_deref()),
        };
        self.run(submission, InputOrigin::Loaded)
    }

    fn run(
        &mut self,
        submission: Submission,
        origin: InputOrigin,
    ) -> Result<&SimulationResult, QuarantineError> {
        if let Err(e) = self.check(&submission, origin) {
            warn!("rejected {origin:?} input {submission:?}: {e}");
            return Err(e);
        }

        let before = parse_patients(&submission.patients)?;
        let drugs = parse_drugs(&submission.drugs)?;
        let mut quarantine = Quarantine::with_rules(before.clone(), Arc::clone(&self.rules))
            .with_aggregation(self.aggregation);
        quarantine.set_drugs(drugs.iter());
        let outcome = quarantine.step();
        let result = SimulationResult::new(&before, &quarantine.report());

        self.submitted += 1;
        info!(
            "submission {}: {:?} with drugs [{}] -> {:?}",
            self.submitted, submission.patients, submission.drugs, outcome
        );
        if let Some(report) = &mut self.report {
            report.write(self.submitted, &result)?;
        }
        self.inputs.push(submission);
        Ok(self.results.push(result))
    }

    fn check(&self, submission: &Submission, origin: InputOrigin) -> Result<(), QuarantineError> {
        if submission.patients.is_empty() {
            return Err(QuarantineError::EmptyPatients);
        }
        if self.inputs.latest() == Some(submission) {
            return Err(QuarantineError::DuplicateInput(origin));
        }
        self.vocabulary
            .validate(&submission.patients, &submission.drugs)
    }

    /// Past submissions, oldest first.
    #[must_use]
    pub fn inputs(&self) -> &History<Submission> {
        &self.inputs
    }

    /// Past results, oldest first.
    #[must_use]
    pub fn results(&self) -> &History<SimulationResult> {
        &self.results
    }
}
