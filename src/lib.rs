//! # xlog
//!
//! A process-wide logging facade with size-based file rotation.
//!
//! ## Features
//!
//! - Configuration built from an ordered list of [`ConfigOption`]s
//! - Standard output, or a log file rotated by size with count and age
//!   limits and optional gzip of old files
//! - Fixed console layout with ISO-8601 timestamps and call-site capture
//! - A global default logger with print, printf, keyed and strictly typed
//!   entry points for every level
//! - Built on the `tracing` ecosystem
//!
//! ## Example
//!
//! ```rust,no_run
//! use xlog::{ConfigOption, Field};
//!
//! xlog::init([
//!     ConfigOption::string_level("debug"),
//!     ConfigOption::Filename("/var/log/app.log".into()),
//!     ConfigOption::MaxSize(50),
//!     ConfigOption::MaxBackups(5),
//! ])?;
//!
//! xlog::info(&[&"started, pid ", &std::process::id()]);
//! xlog::debugf!("cache warmed in {}ms", 42);
//! xlog::warnw("slow request", &[&"path", &"/health", &"ms", &950]);
//! xlog::errorz("upstream failed", &[Field::str("host", "db-1"), Field::u64("attempt", 3)]);
//! # Ok::<(), xlog::Error>(())
//! ```

pub mod config;
pub mod field;
pub mod level;
pub mod logger;
pub mod options;
pub mod rotation;
pub mod sugar;
pub mod writer;

mod error;
mod format;
mod global;
mod macros;
mod sink;

pub use config::Config;
pub use error::{Error, Result};
pub use field::{Field, Value};
pub use level::Level;
pub use logger::Logger;
pub use options::ConfigOption;
pub use rotation::RotationPolicy;
pub use sugar::SugaredLogger;
pub use writer::RotatingWriter;

pub use global::{
    debug, debugf, debugw, debugz, default_logger, error, errorf, errorw, errorz, fatal, fatalf,
    fatalw, fatalz, info, infof, infow, infoz, init, panic, panicf, panicw, panicz, set_default,
    sugared, sync, warn, warnf, warnw, warnz, with,
};
