//! Adjustments applied in order to a draft [`Config`].
//!
//! ```rust
//! use xlog::{Config, ConfigOption, Level};
//!
//! let config = Config::from_options([
//!     ConfigOption::string_level("debug"),
//!     ConfigOption::Filename("app.log".into()),
//!     ConfigOption::MaxBackups(7),
//! ]);
//! assert_eq!(config.level, Level::Debug);
//! ```

use std::path::PathBuf;

use crate::{Config, Level};

/// A single adjustment to one field of a [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOption {
    /// Minimum level that is emitted.
    Level(Level),
    /// Log file path. An empty path selects standard output.
    Filename(PathBuf),
    /// Size in megabytes at which the log file is rotated.
    MaxSize(i64),
    /// Number of rotated files to retain.
    MaxBackups(i64),
    /// Days to retain rotated files.
    MaxAge(i64),
    /// Local time (true) or UTC (false) in backup names.
    LocalTime(bool),
    /// Gzip rotated files.
    Compress(bool),
}

impl ConfigOption {
    /// Level given by name, falling back to [`Level::Info`].
    pub fn string_level(name: &str) -> Self {
        Self::Level(Level::from_name(name))
    }

    /// Write this adjustment into `config`.
    pub fn apply(self, config: &mut Config) {
        match self {
            Self::Level(level) => config.level = level,
            Self::Filename(path) => {
                config.filename = if path.as_os_str().is_empty() {
                    None
                } else {
                    Some(path)
                };
            }
            Self::MaxSize(mb) => config.max_size_mb = mb,
            Self::MaxBackups(n) => config.max_backups = n,
            Self::MaxAge(days) => config.max_age_days = days,
            Self::LocalTime(local) => config.local_time = local,
            Self::Compress(compress) => config.compress = compress,
        }
    }
}

impl From<Level> for ConfigOption {
    fn from(level: Level) -> Self {
        Self::Level(level)
    }
}
