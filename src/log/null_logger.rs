/*!

Without the `logging` feature the crate installs no logger. Only the facade's maximum level is
adjusted, to the most verbose of the global level and the module filters, so a logger installed
by the host application still receives the crate's messages and does its own filtering.

*/

use crate::error::QuarantineError;
use crate::log::LogSettings;

impl LogSettings {
    pub(super) fn install(&mut self) -> Result<(), QuarantineError> {
        let max = self.filters.values().copied().fold(self.level, Ord::max);
        log::set_max_level(max);
        Ok(())
    }
}
