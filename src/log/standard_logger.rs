use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;

use crate::error::QuarantineError;
use crate::log::LogSettings;

// ISO 8601 timestamp and color coded level tag
const LOG_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%SZ)} {h({l})} {t} - {m}{n}";
const APPENDER: &str = "stderr";

impl LogSettings {
    /// Points the global `log4rs` logger at these settings, installing it on first use.
    pub(super) fn install(&mut self) -> Result<(), QuarantineError> {
        let stderr = ConsoleAppender::builder()
            .target(Target::Stderr)
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build();
        let loggers = self
            .filters
            .iter()
            .map(|(module, level)| Logger::builder().build(module.clone(), *level));
        let config = Config::builder()
            .appender(Appender::builder().build(APPENDER, Box::new(stderr)))
            .loggers(loggers)
            .build(Root::builder().appender(APPENDER).build(self.level))
            .map_err(|e| QuarantineError::InvalidConfig(format!("log filters: {e}")))?;

        if let Some(handle) = &self.handle {
            handle.set_config(config);
            return Ok(());
        }
        let handle = log4rs::init_config(config)
            .map_err(|e| QuarantineError::from(format!("cannot install logger: {e}")))?;
        self.handle = Some(handle);
        Ok(())
    }
}
