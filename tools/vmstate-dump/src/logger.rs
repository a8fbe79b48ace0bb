use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;

/// Environment variable holding the log level filter.
pub const LOG_ENV: &str = "VMSTATE_LOG";

pub struct StderrLogger {
    max_level: LevelFilter,
}

impl StderrLogger {
    #[must_use]
    pub const fn new(max_level: LevelFilter) -> Self {
        Self { max_level }
    }

    /// Level from [`LOG_ENV`], `warn` if unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let level = std::env::var(LOG_ENV)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(LevelFilter::Warn);
        Self::new(level)
    }

    /// Call this once during early init.
    #[allow(clippy::missing_errors_doc)]
    pub fn init(self) -> Result<(), SetLoggerError> {
        let max_level = self.max_level;
        log::set_logger(Box::leak(Box::new(self)))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // Format: "[LEVEL] target: message\n"
        let _ = writeln!(
            std::io::stderr().lock(),
            "[{}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use log::Level;

    #[test]
    fn filters_above_max_level() {
        let logger = StderrLogger::new(LevelFilter::Info);
        let info = Metadata::builder().level(Level::Info).build();
        let debug = Metadata::builder().level(Level::Debug).build();
        assert!(logger.enabled(&info));
        assert!(!logger.enabled(&debug));
    }
}
