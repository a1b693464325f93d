//! The process-wide default logger and the functions that forward to it.
//!
//! Until [`init`] or [`set_default`] is called, the default logger writes to
//! standard output at [`Level::Info`](crate::Level::Info). Replacing the
//! default is atomic; loggers obtained earlier keep their own configuration.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use once_cell::sync::Lazy;

use crate::{Config, ConfigOption, Field, Logger, Result, SugaredLogger};

struct Defaults {
    logger: Logger,
    sugar: SugaredLogger,
}

impl Defaults {
    fn new(logger: Logger) -> Self {
        let sugar = logger.sugar();
        Self { logger, sugar }
    }
}

static DEFAULTS: Lazy<ArcSwap<Defaults>> =
    Lazy::new(|| ArcSwap::from_pointee(Defaults::new(Logger::stdout(&Config::default()))));

/// Build a logger from `options`, install it as the default and return it.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened; the previous default
/// stays installed.
pub fn init<I>(options: I) -> Result<Logger>
where
    I: IntoIterator<Item = ConfigOption>,
{
    let logger = Logger::from_options(options)?;
    set_default(logger.clone());
    Ok(logger)
}

/// Install `logger` as the default.
pub fn set_default(logger: Logger) {
    DEFAULTS.store(Arc::new(Defaults::new(logger)));
}

/// The current default logger.
pub fn default_logger() -> Logger {
    DEFAULTS.load().logger.clone()
}

/// The loosely typed variant of the current default logger.
pub fn sugared() -> SugaredLogger {
    DEFAULTS.load().sugar.clone()
}

/// A child of the current default logger carrying `fields`.
pub fn with(fields: &[Field]) -> Logger {
    DEFAULTS.load().logger.with(fields)
}

/// Flush the current default logger.
pub fn sync() -> Result<()> {
    DEFAULTS.load().logger.sync()
}

macro_rules! forward {
    ($($print:ident, $printf:ident, $keyed:ident, $strict:ident $(-> $never:tt)?;)*) => {$(
        #[track_caller]
        pub fn $print(args: &[&dyn fmt::Display]) $(-> $never)? {
            DEFAULTS.load().sugar.$print(args)
        }

        #[track_caller]
        pub fn $printf(args: fmt::Arguments<'_>) $(-> $never)? {
            DEFAULTS.load().sugar.$printf(args)
        }

        #[track_caller]
        pub fn $keyed(message: &str, keys_and_values: &[&dyn fmt::Display]) $(-> $never)? {
            DEFAULTS.load().sugar.$keyed(message, keys_and_values)
        }

        #[track_caller]
        pub fn $strict(message: &str, fields: &[Field]) $(-> $never)? {
            DEFAULTS.load().logger.$print(message, fields)
        }
    )*};
}

forward! {
    debug, debugf, debugw, debugz;
    info, infof, infow, infoz;
    warn, warnf, warnw, warnz;
    error, errorf, errorw, errorz;
    panic, panicf, panicw, panicz -> !;
    fatal, fatalf, fatalw, fatalz -> !;
}
