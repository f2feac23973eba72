// A minimal stderr logger for the `log` facade. Level filtering is left to
// `log::set_max_level`, which main derives from RUST_LOG.

use log::{self, Log};

/// Logs every record it is handed to stderr.
#[derive(Debug)]
pub struct Logger(());

const LOGGER: &'static Logger = &Logger(());

impl Logger {
    /// Installs this logger as the global logger.
    pub fn init() -> Result<(), log::SetLoggerError> {
        log::set_logger(LOGGER)
    }
}

impl Log for Logger {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        // Records from the library carry their source location, which is
        // the quickest way back to the compile or search that emitted them.
        match (record.file(), record.line()) {
            (Some(file), Some(line)) => eprintln!(
                "{}|{}|{}:{}: {}",
                record.level(),
                record.target(),
                file,
                line,
                record.args()
            ),
            _ => eprintln!(
                "{}|{}: {}",
                record.level(),
                record.target(),
                record.args()
            ),
        }
    }

    fn flush(&self) {}
}
