//! Logging for the crate.
//!
//! Messages go through the `log` facade macros re-exported here (`error!`, `warn!`, `info!`,
//! `debug!`, `trace!`). The engine logs every tick at `debug` and every rule evaluation at
//! `trace`; sessions log accepted submissions at `info` and rejected input at `warn`; remote
//! fetch failures are logged at `error`.
//!
//! Nothing is printed until a level is configured, usually through the `log_level` and
//! `log_filters` fields of [`QuarantineConfig`](crate::QuarantineConfig), which a
//! [`Session`](crate::Session) applies when it is created. The same settings can be applied
//! directly:
//!
//! ```rust
//! use quarantine::log::{configure, LevelFilter};
//!
//! // Engine ticks, and every rule evaluation inside them.
//! configure(
//!     Some(LevelFilter::Debug),
//!     [("quarantine::quarantine".to_string(), LevelFilter::Trace)],
//! )
//! .unwrap();
//! ```
//!
//! With the `logging` feature the crate installs a `log4rs` logger writing to stderr. Without
//! it only the facade's maximum level is adjusted, so a logger installed by the host
//! application receives the messages.
#[cfg(feature = "logging")]
mod standard_logger;

#[cfg(not(feature = "logging"))]
mod null_logger;

pub use log::{debug, error, info, trace, warn, LevelFilter};

use crate::error::QuarantineError;
use std::collections::BTreeMap;
use std::sync::{LazyLock, Mutex, MutexGuard};

const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Off;
// The HTTP stack behind remote fetch is noisy.
const DEFAULT_MODULE_FILTERS: [(&str, LevelFilter); 2] = [
    ("hyper_util", LevelFilter::Off),
    ("reqwest", LevelFilter::Warn),
];

static LOG_SETTINGS: LazyLock<Mutex<LogSettings>> = LazyLock::new(Mutex::default);

/// The level and per-module filters currently installed. Loggers are global, so there is one
/// instance, behind `LOG_SETTINGS`.
#[derive(Debug)]
struct LogSettings {
    /// Applies to every module without its own filter. `Off` disables logging.
    level: LevelFilter,
    /// Module path to level, e.g. `"quarantine::session"`.
    filters: BTreeMap<String, LevelFilter>,

    #[cfg(feature = "logging")]
    handle: Option<log4rs::Handle>,
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            level: DEFAULT_LOG_LEVEL,
            filters: DEFAULT_MODULE_FILTERS
                .iter()
                .map(|(module, level)| ((*module).to_string(), *level))
                .collect(),

            #[cfg(feature = "logging")]
            handle: None,
        }
    }
}

impl LogSettings {
    /// Merges `level` and `filters` into the settings. Returns whether anything changed.
    fn merge<I>(&mut self, level: Option<LevelFilter>, filters: I) -> bool
    where
        I: IntoIterator<Item = (String, LevelFilter)>,
    {
        let mut changed = false;
        if let Some(level) = level {
            changed |= self.level != level;
            self.level = level;
        }
        for (module, level) in filters {
            changed |= self.filters.insert(module, level) != Some(level);
        }
        changed
    }
}

/// Sets the global level, if given, and adds or replaces the given module filters. Filters
/// not mentioned are left as they are. The logger is only reinstalled if something changed.
///
/// # Errors
///
/// Returns an error if the logger cannot be installed, for example because the host
/// application already installed its own.
pub fn configure<I>(level: Option<LevelFilter>, filters: I) -> Result<(), QuarantineError>
where
    I: IntoIterator<Item = (String, LevelFilter)>,
{
    let mut settings = log_settings()?;
    if settings.merge(level, filters) {
        settings.install()?;
    }
    Ok(())
}

fn log_settings() -> Result<MutexGuard<'static, LogSettings>, QuarantineError> {
    LOG_SETTINGS
        .lock()
        .map_err(|_| QuarantineError::from("log settings lock poisoned"))
}
