use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::Config;

const MEGABYTE: u64 = 1024 * 1024;
const DEFAULT_MAX_SIZE: u64 = 100 * MEGABYTE;
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Suffix appended to compressed backups.
pub const COMPRESS_SUFFIX: &str = ".gz";

/// Timestamp embedded in backup file names.
const BACKUP_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]-[minute]-[second].[subsecond digits:3]");

/// When to rotate a log file and which rotated files to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Maximum file size in bytes before rotation.
    pub max_size: u64,
    /// Maximum number of backups to keep; 0 keeps all.
    pub max_backups: usize,
    /// Maximum age of a backup, measured from the timestamp in its name.
    pub max_age: Option<Duration>,
    /// Stamp backups with local time instead of UTC.
    pub local_time: bool,
    /// Gzip backups after rotation.
    pub compress: bool,
}

impl RotationPolicy {
    /// Derive a policy from the rotation fields of `config`.
    ///
    /// Non-positive sizes fall back to 100 MB; non-positive backup counts and
    /// ages disable the corresponding limit.
    pub fn from_config(config: &Config) -> Self {
        let max_size = if config.max_size_mb <= 0 {
            DEFAULT_MAX_SIZE
        } else {
            (config.max_size_mb as u64).saturating_mul(MEGABYTE)
        };
        let max_age = (config.max_age_days > 0)
            .then(|| Duration::from_secs((config.max_age_days as u64).saturating_mul(SECONDS_PER_DAY)));

        Self {
            max_size,
            max_backups: usize::try_from(config.max_backups).unwrap_or(0),
            max_age,
            local_time: config.local_time,
            compress: config.compress,
        }
    }

    /// Size-only rotation with no retention limits and no compression.
    pub fn size(max_size: u64) -> Self {
        Self {
            max_size,
            max_backups: 0,
            max_age: None,
            local_time: true,
            compress: false,
        }
    }

    /// Set the number of backups to keep.
    pub fn with_max_backups(mut self, max_backups: usize) -> Self {
        self.max_backups = max_backups;
        self
    }

    /// Set the maximum backup age.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Enable or disable gzip of backups.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Choose local time or UTC for backup names.
    pub fn with_local_time(mut self, local_time: bool) -> Self {
        self.local_time = local_time;
        self
    }

    /// Whether rotation has any cleanup work to do.
    pub(crate) fn needs_cleanup(&self) -> bool {
        self.max_backups > 0 || self.max_age.is_some() || self.compress
    }

    /// The current wall-clock time used for backup names.
    pub(crate) fn now(&self) -> PrimitiveDateTime {
        let now = if self.local_time {
            OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
        } else {
            OffsetDateTime::now_utc()
        };
        PrimitiveDateTime::new(now.date(), now.time())
    }
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Naming scheme for backups of one log file: `<stem>-<timestamp><ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BackupNaming {
    dir: PathBuf,
    prefix: String,
    ext: String,
}

impl BackupNaming {
    /// `None` when `path` has no file name.
    pub(crate) fn new(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?;
        let as_path = Path::new(file_name);
        let stem = as_path.file_stem()?.to_string_lossy();
        let ext = as_path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Some(Self {
            dir,
            prefix: format!("{stem}-"),
            ext,
        })
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the backup stamped with `at`.
    pub(crate) fn backup_path(&self, at: PrimitiveDateTime) -> io::Result<PathBuf> {
        let stamp = at.format(BACKUP_TIME_FORMAT).map_err(io::Error::other)?;
        Ok(self.dir.join(format!("{}{}{}", self.prefix, stamp, self.ext)))
    }

    /// Backup path for a rotation at `at` that names no existing file, plain
    /// or compressed. Taken names push the stamp forward one millisecond.
    pub(crate) fn free_backup_path(&self, mut at: PrimitiveDateTime) -> io::Result<PathBuf> {
        loop {
            let path = self.backup_path(at)?;
            if !path.exists() && !compressed(&path).exists() {
                return Ok(path);
            }
            at = at
                .checked_add(time::Duration::milliseconds(1))
                .ok_or_else(|| io::Error::other("backup timestamp out of range"))?;
        }
    }

    /// The timestamp of a backup file name, plain or compressed. Names that
    /// are not backups of this file yield `None`.
    pub(crate) fn parse(&self, file_name: &str) -> Option<PrimitiveDateTime> {
        let rest = file_name.strip_prefix(&self.prefix)?;
        let compressed_ext = format!("{}{}", self.ext, COMPRESS_SUFFIX);
        let stamp = rest
            .strip_suffix(compressed_ext.as_str())
            .or_else(|| rest.strip_suffix(self.ext.as_str()))?;
        PrimitiveDateTime::parse(stamp, BACKUP_TIME_FORMAT).ok()
    }
}

/// A rotated file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BackupFile {
    pub path: PathBuf,
    pub timestamp: PrimitiveDateTime,
}

/// Cleanup to perform after a rotation.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct CleanupPlan {
    pub remove: Vec<PathBuf>,
    pub compress: Vec<PathBuf>,
}

/// Decide which backups to delete and which to compress.
pub(crate) fn plan_cleanup(
    mut backups: Vec<BackupFile>,
    policy: &RotationPolicy,
    now: PrimitiveDateTime,
) -> CleanupPlan {
    let mut plan = CleanupPlan::default();
    backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    if policy.max_backups > 0 && policy.max_backups < backups.len() {
        // A backup and its compressed copy count once.
        let mut preserved = HashSet::new();
        let mut remaining = Vec::with_capacity(backups.len());
        for backup in backups {
            preserved.insert(uncompressed(&backup.path));
            if preserved.len() > policy.max_backups {
                plan.remove.push(backup.path);
            } else {
                remaining.push(backup);
            }
        }
        backups = remaining;
    }

    let cutoff = policy
        .max_age
        .and_then(|age| time::Duration::try_from(age).ok())
        .and_then(|age| now.checked_sub(age));
    if let Some(cutoff) = cutoff {
        let (expired, kept): (Vec<_>, Vec<_>) =
            backups.into_iter().partition(|b| b.timestamp < cutoff);
        plan.remove.extend(expired.into_iter().map(|b| b.path));
        backups = kept;
    }

    if policy.compress {
        plan.compress = backups
            .into_iter()
            .filter(|b| !is_compressed(&b.path))
            .map(|b| b.path)
            .collect();
    }

    plan
}

fn is_compressed(path: &Path) -> bool {
    path.to_string_lossy().ends_with(COMPRESS_SUFFIX)
}

/// `path` with the compression suffix appended.
pub(crate) fn compressed(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}{}", path.display(), COMPRESS_SUFFIX))
}

fn uncompressed(path: &Path) -> PathBuf {
    let name = path.to_string_lossy();
    match name.strip_suffix(COMPRESS_SUFFIX) {
        Some(stripped) => PathBuf::from(stripped),
        None => path.to_path_buf(),
    }
}
