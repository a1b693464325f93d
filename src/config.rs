use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ConfigOption, Level};

/// Configuration for a logger.
///
/// Built once per logger from the baseline in [`Config::default`] and a
/// sequence of [`ConfigOption`]s, then handed to [`crate::Logger::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum level that is emitted
    pub level: Level,
    /// Log file; `None` writes to standard output without rotation
    pub filename: Option<PathBuf>,
    /// Size in megabytes at which the active file is rotated
    pub max_size_mb: i64,
    /// Rotated files to retain; 0 keeps all of them
    pub max_backups: i64,
    /// Days to retain rotated files; 0 keeps them forever
    pub max_age_days: i64,
    /// Use local time rather than UTC in backup file names
    pub local_time: bool,
    /// Gzip rotated files
    pub compress: bool,
}

impl Config {
    /// Apply `options` in order over a fresh baseline.
    pub fn from_options<I>(options: I) -> Self
    where
        I: IntoIterator<Item = ConfigOption>,
    {
        let mut config = Self::default();
        for option in options {
            option.apply(&mut config);
        }
        config
    }

    /// The log file, treating an empty path as standard output.
    pub fn log_file(&self) -> Option<&Path> {
        self.filename
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: Level::Info,
            filename: None,
            max_size_mb: 100,
            max_backups: 0,
            max_age_days: 0,
            local_time: true,
            compress: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.level, Level::Info);
        assert!(config.filename.is_none());
        assert_eq!(config.max_size_mb, 100);
        assert_eq!(config.max_backups, 0);
        assert_eq!(config.max_age_days, 0);
        assert!(config.local_time);
        assert!(config.compress);
    }

    #[test]
    fn test_from_no_options_is_baseline() {
        assert_eq!(Config::from_options([]), Config::default());
    }

    #[test]
    fn test_last_writer_wins_per_field() {
        let config = Config::from_options([
            ConfigOption::Filename("a.log".into()),
            ConfigOption::MaxSize(50),
            ConfigOption::Filename("b.log".into()),
        ]);
        assert_eq!(config.filename, Some(PathBuf::from("b.log")));
        assert_eq!(config.max_size_mb, 50);
        assert_eq!(config.max_backups, 0);
    }

    #[test]
    fn test_negative_values_pass_through() {
        let config = Config::from_options([
            ConfigOption::MaxSize(-1),
            ConfigOption::MaxBackups(-3),
            ConfigOption::MaxAge(-7),
        ]);
        assert_eq!(config.max_size_mb, -1);
        assert_eq!(config.max_backups, -3);
        assert_eq!(config.max_age_days, -7);
    }

    #[test]
    fn test_deserialize_yaml_partial() {
        let yaml = r#"
level: debug
filename: /var/log/app.log
max_backups: 3
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.level, Level::Debug);
        assert_eq!(config.filename, Some(PathBuf::from("/var/log/app.log")));
        assert_eq!(config.max_backups, 3);
        assert_eq!(config.max_size_mb, 100);
        assert!(config.compress);
    }

    #[test]
    fn test_deserialize_toml_unknown_level() {
        let toml = r#"
level = "loud"
max_size_mb = 10
compress = false
local_time = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.level, Level::Info);
        assert!(config.filename.is_none());
        assert_eq!(config.max_size_mb, 10);
        assert!(!config.compress);
        assert!(!config.local_time);
    }

    #[test]
    fn test_empty_filename_is_no_log_file() {
        let config: Config = serde_yaml::from_str("filename: \"\"").unwrap();
        assert_eq!(config.filename, Some(PathBuf::new()));
        assert!(config.log_file().is_none());

        let config = Config {
            filename: Some("app.log".into()),
            ..Config::default()
        };
        assert_eq!(config.log_file(), Some(Path::new("app.log")));
    }
}
