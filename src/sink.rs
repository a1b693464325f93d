use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

use crate::{Config, Result, RotatingWriter, RotationPolicy};

/// Where records end up. Each record is written while holding the sink's
/// lock, so concurrent records never interleave.
#[derive(Debug, Clone)]
pub(crate) enum Sink {
    Stdout,
    File(Arc<Mutex<RotatingWriter>>),
    #[cfg(test)]
    Memory(Arc<Mutex<Vec<u8>>>),
}

impl Sink {
    /// Standard output without a filename, otherwise a rotating file.
    pub(crate) fn from_config(config: &Config) -> Result<Self> {
        match config.log_file() {
            None => Ok(Self::Stdout),
            Some(path) => {
                let writer = RotatingWriter::new(path, RotationPolicy::from_config(config))?;
                Ok(Self::File(Arc::new(Mutex::new(writer))))
            }
        }
    }

    pub(crate) fn flush(&self) -> io::Result<()> {
        self.make_writer().flush()
    }

    /// Force a rotation; nothing to do for standard output.
    pub(crate) fn rotate(&self) -> io::Result<()> {
        match self {
            Self::File(writer) => lock(writer).rotate(),
            _ => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) enum SinkWriter<'a> {
    Stdout(io::StdoutLock<'static>),
    File(MutexGuard<'a, RotatingWriter>),
    #[cfg(test)]
    Memory(MutexGuard<'a, Vec<u8>>),
}

impl Write for SinkWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(out) => out.write(buf),
            Self::File(file) => file.write(buf),
            #[cfg(test)]
            Self::Memory(mem) => mem.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(out) => out.flush(),
            Self::File(file) => file.flush(),
            #[cfg(test)]
            Self::Memory(mem) => mem.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for Sink {
    type Writer = SinkWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        match self {
            Self::Stdout => SinkWriter::Stdout(io::stdout().lock()),
            Self::File(writer) => SinkWriter::File(lock(writer)),
            #[cfg(test)]
            Self::Memory(buf) => SinkWriter::Memory(lock(buf)),
        }
    }
}
