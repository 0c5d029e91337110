//! Pairing the population before and after a tick for display or export.

use crate::error::QuarantineError;
use crate::health::HealthState;
use crate::snapshot::PatientSnapshot;
use csv::Writer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs::{create_dir_all, File};
use std::path::Path;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateResult {
    pub input: u64,
    pub output: u64,
}

/// Per-state `{input, output}` counts for one tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimulationResult {
    states: BTreeMap<HealthState, StateResult>,
}

impl SimulationResult {
    /// Zips two snapshots, keyed by the states of `input`.
    #[must_use]
    pub fn new(input: &PatientSnapshot, output: &PatientSnapshot) -> Self {
        SimulationResult {
            states: input
                .iter()
                .map(|(state, count)| {
                    let result = StateResult {
                        input: count,
                        output: output.get(state),
                    };
                    (state, result)
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, state: HealthState) -> Option<StateResult> {
        self.states.get(&state).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (HealthState, StateResult)> + '_ {
        self.states.iter().map(|(state, result)| (*state, *result))
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ResultRow {
    tick: u64,
    state: HealthState,
    input: u64,
    output: u64,
}

// Checks that the path is valid. Creates the file and all parent directories if
// they do not exist. Returns the file if successful.
fn generate_validate_filepath(path: &Path) -> Result<File, QuarantineError> {
    match path.extension().and_then(OsStr::to_str) {
        Some("csv") => {
            if let Some(parent) = path.parent() {
                create_dir_all(parent)?;
            }
            let file = File::create(path)?;
            Ok(file)
        }
        _ => Err(QuarantineError::QuarantineError(
            "Report output files must be CSVs at this time".to_string(),
        )),
    }
}

/// Writes results as CSV rows of `tick,state,input,output`.
pub struct ReportWriter {
    writer: Writer<File>,
}

impl ReportWriter {
    /// Creates (or truncates) the report file at `path`.
    ///
    /// # Errors
    ///
    /// Fails if `path` does not end in `.csv` or the file cannot be created.
    pub fn create(path: &Path) -> Result<Self, QuarantineError> {
        let file = generate_validate_filepath(path)?;
        Ok(ReportWriter {
            writer: Writer::from_writer(file),
        })
    }

    /// Appends one row per state and flushes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the underlying write fails.
    pub fn write(&mut self, tick: u64, result: &SimulationResult) -> Result<(), QuarantineError> {
        for (state, StateResult { input, output }) in result.iter() {
            self.writer.serialize(ResultRow {
                tick,
                state,
                input,
                output,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::HealthState::{Dead, Diabetic, Fever, Healthy, Tuberculosis};
    use tempfile::tempdir;

    fn before() -> PatientSnapshot {
        PatientSnapshot::new([
            (Fever, 1),
            (Healthy, 2),
            (Diabetic, 3),
            (Tuberculosis, 1),
            (Dead, 0),
        ])
        .unwrap()
    }

    fn after() -> PatientSnapshot {
        PatientSnapshot::new([
            (Fever, 1),
            (Healthy, 2),
            (Diabetic, 0),
            (Tuberculosis, 1),
            (Dead, 3),
        ])
        .unwrap()
    }

    #[test]
    fn zips_snapshots() {
        let result = SimulationResult::new(&before(), &after());
        assert_eq!(
            result.get(Diabetic),
            Some(StateResult {
                input: 3,
                output: 0
            })
        );
        assert_eq!(result.get(Dead), Some(StateResult { input: 0, output: 3 }));
        assert_eq!(result.iter().count(), 5);
    }

    #[test]
    fn serializes_per_state() {
        let result = SimulationResult::new(&before(), &after());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["X"]["input"], 0);
        assert_eq!(json["X"]["output"], 3);
    }

    #[test]
    fn writes_csv_rows() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("results.csv");
        let result = SimulationResult::new(&before(), &after());
        {
            let mut writer = ReportWriter::create(&path).unwrap();
            writer.write(1, &result).unwrap();
            writer.write(2, &result).unwrap();
        }

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<ResultRow> = reader.deserialize().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 10);
        assert_eq!(
            rows[0],
            ResultRow {
                tick: 1,
                state: Fever,
                input: 1,
                output: 1
            }
        );
        assert_eq!(rows[9].tick, 2);
        assert_eq!(rows[9].state, Dead);
        assert_eq!(rows[9].output, 3);
    }

    #[test]
    fn rejects_non_csv_paths() {
        let temp_dir = tempdir().unwrap();
        let result = ReportWriter::create(&temp_dir.path().join("results.txt"));
        assert!(result.is_err());
    }
}
