use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::rotation::{BackupFile, BackupNaming, plan_cleanup};
use crate::{Error, Result, RotationPolicy};

/// A file writer that rotates the file once it reaches the policy's size
/// limit, keeping timestamped backups next to it.
#[derive(Debug)]
pub struct RotatingWriter {
    /// Path of the active log file.
    path: PathBuf,
    naming: BackupNaming,
    policy: RotationPolicy,
    file: Option<File>,
    /// Bytes in the active file.
    size: u64,
}

impl RotatingWriter {
    /// Create a new rotating writer and open the log file.
    pub fn new(path: impl AsRef<Path>, policy: RotationPolicy) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let naming =
            BackupNaming::new(&path).ok_or_else(|| Error::InvalidFilename(path.clone()))?;

        let mut writer = Self {
            path,
            naming,
            policy,
            file: None,
            size: 0,
        };
        writer.open_existing_or_new(0)?;

        Ok(writer)
    }

    /// Path of the active log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rotation and retention limits in effect.
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Close the active file, move it to a backup and start a fresh one.
    pub fn rotate(&mut self) -> io::Result<()> {
        self.file = None;
        self.open_new()?;
        // Cleanup failures must not block writes; the next rotation retries.
        let _ = self.cleanup();
        Ok(())
    }

    /// Reuse the existing file if `pending` more bytes fit, otherwise rotate.
    fn open_existing_or_new(&mut self, pending: u64) -> io::Result<()> {
        let metadata = match fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return self.open_new(),
            Err(err) => return Err(err),
        };

        if metadata.len() + pending >= self.policy.max_size {
            return self.rotate();
        }

        match OpenOptions::new().append(true).open(&self.path) {
            Ok(file) => {
                self.file = Some(file);
                self.size = metadata.len();
                Ok(())
            }
            // Unreadable leftovers are moved aside rather than appended to.
            Err(_) => self.open_new(),
        }
    }

    /// Open a fresh file, first renaming any existing one to a backup.
    fn open_new(&mut self) -> io::Result<()> {
        fs::create_dir_all(self.naming.dir())?;

        if self.path.exists() {
            let backup = self.naming.free_backup_path(self.policy.now())?;
            fs::rename(&self.path, &backup)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;
        self.file = Some(file);
        self.size = 0;
        Ok(())
    }

    /// Backups of this file currently on disk.
    fn backups(&self) -> io::Result<Vec<BackupFile>> {
        let mut backups = Vec::new();
        for entry in fs::read_dir(self.naming.dir())? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            if let Some(timestamp) = self.naming.parse(&name.to_string_lossy()) {
                backups.push(BackupFile {
                    path: entry.path(),
                    timestamp,
                });
            }
        }
        Ok(backups)
    }

    /// Apply the retention limits and compress what remains.
    fn cleanup(&self) -> io::Result<()> {
        if !self.policy.needs_cleanup() {
            return Ok(());
        }

        let plan = plan_cleanup(self.backups()?, &self.policy, self.policy.now());
        for path in &plan.remove {
            fs::remove_file(path)?;
        }
        for path in &plan.compress {
            compress_file(path)?;
        }
        Ok(())
    }
}

impl Write for RotatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = buf.len() as u64;
        if len > self.policy.max_size {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "write length {} exceeds maximum file size {}",
                    len, self.policy.max_size
                ),
            ));
        }

        if self.file.is_none() {
            self.open_existing_or_new(len)?;
        } else if self.size + len > self.policy.max_size {
            self.rotate()?;
        }

        let Some(file) = self.file.as_mut() else {
            return Err(io::Error::other("Failed to open log file"));
        };
        let written = file.write(buf)?;
        self.size += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_ref() {
            Some(file) => file.sync_all(),
            None => Ok(()),
        }
    }
}

/// Gzip `path` into `path.gz` and remove the original.
#[cfg(feature = "gzip")]
fn compress_file(path: &Path) -> io::Result<()> {
    let target = crate::rotation::compressed(path);
    if target.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", target.display()),
        ));
    }

    match gzip_into(path, &target) {
        Ok(()) => fs::remove_file(path),
        Err(err) => {
            let _ = fs::remove_file(&target);
            Err(err)
        }
    }
}

#[cfg(feature = "gzip")]
fn gzip_into(source: &Path, target: &Path) -> io::Result<()> {
    use flate2::Compression;
    use flate2::write::GzEncoder;

    let mut source = File::open(source)?;
    let mut encoder = GzEncoder::new(File::create(target)?, Compression::default());
    io::copy(&mut source, &mut encoder)?;
    encoder.finish()?.sync_all()
}

#[cfg(not(feature = "gzip"))]
fn compress_file(_path: &Path) -> io::Result<()> {
    Ok(())
}
