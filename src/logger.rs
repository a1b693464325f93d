use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::Dispatch;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;

use crate::field::{self, Field};
use crate::format::{self, ConsoleFormat};
use crate::sink::Sink;
use crate::{Config, ConfigOption, Level, Result, SugaredLogger};

// `tracing` needs the level and the field names at compile time.
macro_rules! record {
    ($tracing_level:expr, $level:expr, $name:expr, $caller:expr, $fields:expr, $message:expr) => {
        tracing::event!(
            target: "xlog",
            $tracing_level,
            severity = $level.as_str(),
            logger = $name,
            caller = $caller,
            fields = $fields,
            "{}",
            $message
        )
    };
}

#[derive(Debug)]
struct Core {
    level: Level,
    filename: Option<PathBuf>,
    sink: Sink,
    dispatch: Dispatch,
}

/// A logger bound to one sink and one minimum level.
///
/// Clones share the sink. Children created with [`Logger::with`] and
/// [`Logger::named`] add context but keep the parent's sink and level.
#[derive(Debug, Clone)]
pub struct Logger {
    core: Arc<Core>,
    name: Option<String>,
    context: Arc<Vec<Field>>,
}

impl Logger {
    /// Build a logger from a finished configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be created or opened.
    pub fn new(config: Config) -> Result<Self> {
        let sink = Sink::from_config(&config)?;
        Ok(Self::with_sink(&config, sink))
    }

    /// Build a logger from options applied over the baseline configuration.
    pub fn from_options<I>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = ConfigOption>,
    {
        Self::new(Config::from_options(options))
    }

    /// A standard output logger; never fails.
    pub(crate) fn stdout(config: &Config) -> Self {
        Self::with_sink(config, Sink::Stdout)
    }

    pub(crate) fn with_sink(config: &Config, sink: Sink) -> Self {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .event_format(ConsoleFormat)
            .with_writer(sink.clone());
        let subscriber = tracing_subscriber::registry()
            .with(LevelFilter::from_level(config.level.as_tracing()))
            .with(fmt_layer);

        Self {
            core: Arc::new(Core {
                level: config.level,
                filename: config.log_file().map(Path::to_path_buf),
                sink,
                dispatch: Dispatch::new(subscriber),
            }),
            name: None,
            context: Arc::new(Vec::new()),
        }
    }

    /// Minimum level this logger emits.
    pub fn level(&self) -> Level {
        self.core.level
    }

    /// Whether a record at `level` would be written.
    pub fn is_enabled(&self, level: Level) -> bool {
        level >= self.core.level
    }

    /// Whether records go to standard output rather than a file.
    pub fn writes_to_stdout(&self) -> bool {
        matches!(self.core.sink, Sink::Stdout)
    }

    /// The log file, if any.
    pub fn filename(&self) -> Option<&Path> {
        self.core.filename.as_deref()
    }

    /// Dot-joined name set through [`Logger::named`].
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// A child logger that adds `fields` to every record.
    pub fn with(&self, fields: &[Field]) -> Self {
        let mut context = Vec::clone(&self.context);
        context.extend_from_slice(fields);
        Self {
            core: Arc::clone(&self.core),
            name: self.name.clone(),
            context: Arc::new(context),
        }
    }

    /// A child logger whose name is this logger's name extended by `name`,
    /// joined with a dot.
    pub fn named(&self, name: &str) -> Self {
        let name = match &self.name {
            Some(parent) => format!("{parent}.{name}"),
            None => name.to_string(),
        };
        Self {
            core: Arc::clone(&self.core),
            name: Some(name),
            context: Arc::clone(&self.context),
        }
    }

    /// The loosely typed variant of this logger.
    pub fn sugar(&self) -> SugaredLogger {
        SugaredLogger::new(self.clone())
    }

    /// Flush the sink.
    pub fn sync(&self) -> Result<()> {
        self.core.sink.flush()?;
        Ok(())
    }

    /// Force the log file to rotate. Does nothing on standard output.
    pub fn rotate(&self) -> Result<()> {
        self.core.sink.rotate()?;
        Ok(())
    }

    /// Log at `level`. Panic and fatal levels do not return.
    #[track_caller]
    pub fn log(&self, level: Level, message: &str, fields: &[Field]) {
        self.emit(level, message, fields);
        if level.is_terminal() {
            self.terminate(level, message);
        }
    }

    #[track_caller]
    pub fn debug(&self, message: &str, fields: &[Field]) {
        self.emit(Level::Debug, message, fields);
    }

    #[track_caller]
    pub fn info(&self, message: &str, fields: &[Field]) {
        self.emit(Level::Info, message, fields);
    }

    #[track_caller]
    pub fn warn(&self, message: &str, fields: &[Field]) {
        self.emit(Level::Warn, message, fields);
    }

    #[track_caller]
    pub fn error(&self, message: &str, fields: &[Field]) {
        self.emit(Level::Error, message, fields);
    }

    /// Log, then panic with `message`.
    #[track_caller]
    pub fn panic(&self, message: &str, fields: &[Field]) -> ! {
        self.emit(Level::Panic, message, fields);
        self.terminate(Level::Panic, message)
    }

    /// Log, flush, then exit the process with status 1.
    #[track_caller]
    pub fn fatal(&self, message: &str, fields: &[Field]) -> ! {
        self.emit(Level::Fatal, message, fields);
        self.terminate(Level::Fatal, message)
    }

    /// Write one record if `level` is enabled. The reported caller is the
    /// first frame outside the `#[track_caller]` chain.
    #[track_caller]
    pub(crate) fn emit(&self, level: Level, message: &str, fields: &[Field]) {
        if !self.is_enabled(level) {
            return;
        }

        let caller = format::caller(Location::caller());
        let fields = field::encode(self.context.iter().chain(fields));
        let name = self.name.as_deref().unwrap_or_default();

        tracing::dispatcher::with_default(&self.core.dispatch, || match level {
            Level::Debug => record!(
                tracing::Level::DEBUG,
                level,
                name,
                caller.as_str(),
                fields.as_str(),
                message
            ),
            Level::Info => record!(
                tracing::Level::INFO,
                level,
                name,
                caller.as_str(),
                fields.as_str(),
                message
            ),
            Level::Warn => record!(
                tracing::Level::WARN,
                level,
                name,
                caller.as_str(),
                fields.as_str(),
                message
            ),
            Level::Error | Level::Panic | Level::Fatal => record!(
                tracing::Level::ERROR,
                level,
                name,
                caller.as_str(),
                fields.as_str(),
                message
            ),
        });
    }

    /// End the thread (panic) or the process (fatal). Runs whether or not the
    /// record itself was enabled.
    pub(crate) fn terminate(&self, level: Level, message: &str) -> ! {
        if level == Level::Fatal {
            let _ = self.sync();
            std::process::exit(1);
        }
        panic!("{message}")
    }
}
