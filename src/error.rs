use std::fmt::{self, Display};
use std::io;

/// Where a rejected submission came from. Only used to pick the message
/// shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOrigin {
    Typed,
    Loaded,
}

/// Provides `QuarantineError` and maps to other errors to
/// convert to a `QuarantineError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum QuarantineError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    CSVError(csv::Error),
    #[cfg(feature = "fetch")]
    FetchError(reqwest::Error),
    /// A snapshot is missing a required state or carries an unusable count.
    InvalidSnapshot(String),
    InvalidRuleSet(String),
    InvalidConfig(String),
    EmptyPatients,
    InvalidPatients(String),
    InvalidDrugs(String),
    DuplicateInput(InputOrigin),
    MissingData(String),
    QuarantineError(String),
}

impl From<io::Error> for QuarantineError {
    fn from(error: io::Error) -> Self {
        QuarantineError::IoError(error)
    }
}

impl From<serde_json::Error> for QuarantineError {
    fn from(error: serde_json::Error) -> Self {
        QuarantineError::JsonError(error)
    }
}

impl From<csv::Error> for QuarantineError {
    fn from(error: csv::Error) -> Self {
        QuarantineError::CSVError(error)
    }
}

#[cfg(feature = "fetch")]
impl From<reqwest::Error> for QuarantineError {
    fn from(error: reqwest::Error) -> Self {
        QuarantineError::FetchError(error)
    }
}

impl From<String> for QuarantineError {
    fn from(error: String) -> Self {
        QuarantineError::QuarantineError(error)
    }
}

impl From<&str> for QuarantineError {
    fn from(error: &str) -> Self {
        QuarantineError::QuarantineError(error.to_string())
    }
}

impl std::error::Error for QuarantineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuarantineError::IoError(error) => Some(error),
            QuarantineError::JsonError(error) => Some(error),
            QuarantineError::CSVError(error) => Some(error),
            #[cfg(feature = "fetch")]
            QuarantineError::FetchError(error) => Some(error),
            _ => None,
        }
    }
}

impl Display for QuarantineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QuarantineError::EmptyPatients => write!(f, "Error: please type patients."),
            QuarantineError::InvalidPatients(token) => {
                write!(f, "Error: one or more patients are invalid ({token:?}).")
            }
            QuarantineError::InvalidDrugs(token) => {
                write!(f, "Error: one or more drugs are invalid ({token:?}).")
            }
            QuarantineError::DuplicateInput(InputOrigin::Typed) => {
                write!(f, "Patients & drugs are the same: please type new data.")
            }
            QuarantineError::DuplicateInput(InputOrigin::Loaded) => {
                write!(f, "Patients & drugs are the same: please load new data.")
            }
            QuarantineError::MissingData(what) => {
                write!(f, "{what} data is undefined, cannot create Quarantine.")
            }
            QuarantineError::InvalidSnapshot(reason) => write!(f, "Invalid snapshot: {reason}"),
            QuarantineError::InvalidRuleSet(reason) => write!(f, "Invalid rule set: {reason}"),
            QuarantineError::InvalidConfig(reason) => write!(f, "Invalid config: {reason}"),
            _ => write!(f, "Error: {self:?}"),
        }
    }
}
