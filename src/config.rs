//! Session configuration loaded from JSON.
//!
//! Every field has a default, so an empty object `{}` is a valid
//! configuration:
//!
//! ```json
//! {
//!     "history_length": 10,
//!     "base_url": "http://localhost:7200/",
//!     "patients_endpoint": "patients",
//!     "drugs_endpoint": "drugs",
//!     "timeout_secs": 5,
//!     "dead_rule_aggregation": "any_fired",
//!     "log_level": "info",
//!     "log_filters": {"quarantine::quarantine": "trace", "reqwest": "error"},
//!     "rule_table": "standard",
//!     "rules_file": "rules.json",
//!     "vocabulary": "standard",
//!     "report_file": "output/results.csv"
//! }
//! ```
//!
//! `rules_file`, when set, takes precedence over `rule_table`. `history_length`
//! must be at least 1. `log_filters` maps module paths to their own level,
//! overriding `log_level` for messages from those modules.

use crate::error::QuarantineError;
use crate::history::DEFAULT_HISTORY_LENGTH;
use crate::input::{Vocabulary, VocabularyKind};
use crate::log::{self, LevelFilter};
use crate::quarantine::DeadRuleAggregation;
use crate::rules::RuleSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// The built-in rule tables.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTableKind {
    #[default]
    Standard,
    Classic,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuarantineConfig {
    pub history_length: NonZeroUsize,
    pub base_url: String,
    pub patients_endpoint: String,
    pub drugs_endpoint: String,
    pub timeout_secs: u64,
    pub dead_rule_aggregation: DeadRuleAggregation,
    pub log_level: Option<String>,
    pub log_filters: BTreeMap<String, String>,
    pub rule_table: RuleTableKind,
    pub rules_file: Option<PathBuf>,
    pub vocabulary: VocabularyKind,
    pub report_file: Option<PathBuf>,
}

impl Default for QuarantineConfig {
    fn default() -> Self {
        QuarantineConfig {
            history_length: DEFAULT_HISTORY_LENGTH,
            base_url: "http://localhost:7200/".to_string(),
            patients_endpoint: "patients".to_string(),
            drugs_endpoint: "drugs".to_string(),
            timeout_secs: 5,
            dead_rule_aggregation: DeadRuleAggregation::default(),
            log_level: None,
            log_filters: BTreeMap::new(),
            rule_table: RuleTableKind::default(),
            rules_file: None,
            vocabulary: VocabularyKind::default(),
            report_file: None,
        }
    }
}

impl QuarantineConfig {
    /// Reads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid
    /// configuration.
    pub fn from_json_file(path: &Path) -> Result<Self, QuarantineError> {
        let data = std::fs::read_to_string(path)?;
        let config: QuarantineConfig = serde_json::from_str(&data)?;
        Ok(config)
    }

    /// The rule table to run: the contents of `rules_file` if set, otherwise
    /// the built-in table named by `rule_table`.
    ///
    /// # Errors
    ///
    /// Returns an error if `rules_file` cannot be read or holds an invalid
    /// rule table.
    pub fn load_rules(&self) -> Result<Arc<RuleSet>, QuarantineError> {
        match &self.rules_file {
            Some(path) => {
                let data = std::fs::read_to_string(path)?;
                let rules: RuleSet = serde_json::from_str(&data)?;
                Ok(Arc::new(rules))
            }
            None => Ok(match self.rule_table {
                RuleTableKind::Standard => RuleSet::standard(),
                RuleTableKind::Classic => RuleSet::classic(),
            }),
        }
    }

    #[must_use]
    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::from_kind(self.vocabulary)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// # Errors
    ///
    /// `QuarantineError::InvalidConfig` if `log_level` is not a level name.
    pub fn log_level_filter(&self) -> Result<Option<LevelFilter>, QuarantineError> {
        self.log_level.as_deref().map(parse_level).transpose()
    }

    /// `log_filters` with every level parsed.
    ///
    /// # Errors
    ///
    /// `QuarantineError::InvalidConfig` if a filter's level is not a level name.
    pub fn module_log_filters(&self) -> Result<BTreeMap<String, LevelFilter>, QuarantineError> {
        self.log_filters
            .iter()
            .map(|(module, level)| parse_level(level).map(|level| (module.clone(), level)))
            .collect()
    }

    /// Installs `log_level` and `log_filters` on the crate's logger. Does
    /// nothing if neither is set.
    ///
    /// # Errors
    ///
    /// `QuarantineError::InvalidConfig` if a level is not a level name, or
    /// an error if the logger cannot be installed.
    pub fn apply_logging(&self) -> Result<(), QuarantineError> {
        let level = self.log_level_filter()?;
        let filters = self.module_log_filters()?;
        log::configure(level, filters)
    }

    /// An HTTP data source for the configured server.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    #[cfg(feature = "fetch")]
    pub fn http_source(&self) -> Result<crate::fetch::HttpSource, QuarantineError> {
        crate::fetch::HttpSource::new(&self.base_url, self.timeout())
    }
}

fn parse_level(level: &str) -> Result<LevelFilter, QuarantineError> {
    LevelFilter::from_str(level)
        .map_err(|_| QuarantineError::InvalidConfig(format!("unknown log level {level:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_object_is_default() {
        let file = write_temp("{}");
        let config = QuarantineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config, QuarantineConfig::default());
        assert_eq!(config.history_length.get(), 10);
        assert!(config.log_filters.is_empty());
        assert_eq!(config.base_url, "http://localhost:7200/");
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn reads_overrides() {
        let file = write_temp(
            r#"{
                "history_length": 3,
                "dead_rule_aggregation": "last_evaluated",
                "vocabulary": "classic",
                "rule_table": "classic",
                "log_level": "debug",
                "log_filters": {"quarantine::session": "warn"}
            }"#,
        );
        let config = QuarantineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.history_length.get(), 3);
        assert_eq!(
            config.dead_rule_aggregation,
            DeadRuleAggregation::LastEvaluated
        );
        assert_eq!(config.vocabulary(), Vocabulary::classic());
        assert_eq!(config.log_level_filter().unwrap(), Some(LevelFilter::Debug));
        assert_eq!(
            config.module_log_filters().unwrap(),
            BTreeMap::from([("quarantine::session".to_string(), LevelFilter::Warn)])
        );
        assert_eq!(config.load_rules().unwrap(), RuleSet::classic());
    }

    #[test]
    fn rejects_unknown_fields() {
        let file = write_temp(r#"{"histroy_length": 3}"#);
        assert!(matches!(
            QuarantineConfig::from_json_file(file.path()),
            Err(QuarantineError::JsonError(_))
        ));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let config = QuarantineConfig {
            log_level: Some("loud".to_string()),
            ..QuarantineConfig::default()
        };
        assert!(matches!(
            config.apply_logging(),
            Err(QuarantineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_unknown_module_filter_level() {
        let config = QuarantineConfig {
            log_filters: BTreeMap::from([("quarantine".to_string(), "chatty".to_string())]),
            ..QuarantineConfig::default()
        };
        let error = config.apply_logging().unwrap_err();
        assert!(error.to_string().contains("chatty"));
    }

    #[test]
    fn rejects_zero_history_length() {
        let file = write_temp(r#"{"history_length": 0}"#);
        assert!(matches!(
            QuarantineConfig::from_json_file(file.path()),
            Err(QuarantineError::JsonError(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = QuarantineConfig::from_json_file(Path::new("does/not/exist.json"));
        assert!(matches!(result, Err(QuarantineError::IoError(_))));
    }

    #[test]
    fn loads_rules_file() {
        let rules = serde_json::to_string(&*RuleSet::classic()).unwrap();
        let rules_file = write_temp(&rules);
        let config = QuarantineConfig {
            rules_file: Some(rules_file.path().to_path_buf()),
            ..QuarantineConfig::default()
        };
        assert_eq!(*config.load_rules().unwrap(), *RuleSet::classic());
    }
}
