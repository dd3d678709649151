//! Default unwedge logger

use std::env;
use std::io::{stdout, Write};
use std::str::FromStr;

use anyhow::Result;
use log::{LevelFilter, Log, Metadata, Record};
use once_cell::sync::OnceCell;

/// Public global variable to access the logger
pub static UNWEDGE_LOGGER: OnceCell<UnwedgeLogger> = OnceCell::new();

/// If in debug mode, default level is debug to get maximum logging
#[cfg(debug_assertions)]
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

/// If not in debug mode, default level is info so the operator sees each
/// cleanup step as it runs
#[cfg(not(debug_assertions))]
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// Initialize the logger, must be called before accessing the logger.
/// Multiple parts might call this at once, but the actual initialization
/// is done only once due to use of OnceCell
pub fn init(debug: bool) -> Result<()> {
    // the --debug flag wins over the env variable
    let level_filter = if debug {
        LevelFilter::Debug
    } else if let Ok(log_level_str) = env::var("UNWEDGE_LOG_LEVEL") {
        LevelFilter::from_str(&log_level_str).unwrap_or(DEFAULT_LOG_LEVEL)
    } else {
        DEFAULT_LOG_LEVEL
    };

    let logger = UNWEDGE_LOGGER.get_or_init(|| UnwedgeLogger::new(level_filter.to_level()));
    log::set_logger(logger).map(|()| log::set_max_level(level_filter))?;

    Ok(())
}

/// unwedge's custom Logger
pub struct UnwedgeLogger {
    /// Indicates level up to which logs are to be printed
    level: Option<log::Level>,
}

impl UnwedgeLogger {
    /// Create new logger
    pub fn new(level: Option<log::Level>) -> Self {
        Self { level }
    }
}

/// Implements Log interface given by log crate, so we can use its functionality
impl Log for UnwedgeLogger {
    /// Check if level of given log is enabled or not
    fn enabled(&self, metadata: &Metadata) -> bool {
        if let Some(level) = self.level {
            metadata.level() <= level
        } else {
            false
        }
    }

    /// Function to carry out logging
    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            // debug records carry their call site, operator-facing ones stay terse
            let log_msg = match (record.file(), record.line()) {
                (Some(file), Some(line)) if record.level() >= log::Level::Debug => format!(
                    "[{} {}:{}] {} {}",
                    record.level(),
                    file,
                    line,
                    chrono::Local::now().to_rfc3339(),
                    record.args()
                ),
                (_, _) => format!(
                    "[{}] {} {}",
                    record.level(),
                    chrono::Local::now().to_rfc3339(),
                    record.args()
                ),
            };

            // diagnostics are a plain line stream on stdout
            let _ = writeln!(stdout(), "{}", log_msg);
        }
    }

    /// Flush the stream
    fn flush(&self) {
        let _ = stdout().flush();
    }
}
