use std::fmt::{self, Write as _};

use crate::{Field, Level, Logger};

const IGNORED_KEY: &str = "ignored key without a value";

macro_rules! level_methods {
    ($($level:expr => $print:ident, $printf:ident, $keyed:ident;)*) => {$(
        /// Print-style: operands are concatenated.
        #[track_caller]
        pub fn $print(&self, args: &[&dyn fmt::Display]) {
            self.log($level, args)
        }

        /// Printf-style.
        #[track_caller]
        pub fn $printf(&self, args: fmt::Arguments<'_>) {
            self.logf($level, args)
        }

        /// Keyed-style: alternating keys and values.
        #[track_caller]
        pub fn $keyed(&self, message: &str, keys_and_values: &[&dyn fmt::Display]) {
            self.logw($level, message, keys_and_values)
        }
    )*};
}

macro_rules! terminal_methods {
    ($($level:expr => $print:ident, $printf:ident, $keyed:ident;)*) => {$(
        #[track_caller]
        pub fn $print(&self, args: &[&dyn fmt::Display]) -> ! {
            let message = concat(args);
            self.logger.emit($level, &message, &[]);
            self.logger.terminate($level, &message)
        }

        #[track_caller]
        pub fn $printf(&self, args: fmt::Arguments<'_>) -> ! {
            let message = args.to_string();
            self.logger.emit($level, &message, &[]);
            self.logger.terminate($level, &message)
        }

        #[track_caller]
        pub fn $keyed(&self, message: &str, keys_and_values: &[&dyn fmt::Display]) -> ! {
            let fields = self.pair_up(keys_and_values);
            self.logger.emit($level, message, &fields);
            self.logger.terminate($level, message)
        }
    )*};
}

/// A loosely typed wrapper around [`Logger`] for call sites that prefer
/// formatting arguments over building [`Field`]s.
#[derive(Debug, Clone)]
pub struct SugaredLogger {
    logger: Logger,
}

impl SugaredLogger {
    pub(crate) fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// The strictly typed logger underneath.
    pub fn desugar(&self) -> &Logger {
        &self.logger
    }

    /// A child logger carrying alternating keys and values as context.
    #[track_caller]
    pub fn with(&self, keys_and_values: &[&dyn fmt::Display]) -> Self {
        let fields = self.pair_up(keys_and_values);
        Self::new(self.logger.with(&fields))
    }

    /// Print-style at `level`.
    #[track_caller]
    pub fn log(&self, level: Level, args: &[&dyn fmt::Display]) {
        if self.logger.is_enabled(level) || level.is_terminal() {
            self.logger.log(level, &concat(args), &[]);
        }
    }

    /// Printf-style at `level`.
    #[track_caller]
    pub fn logf(&self, level: Level, args: fmt::Arguments<'_>) {
        if self.logger.is_enabled(level) || level.is_terminal() {
            self.logger.log(level, &args.to_string(), &[]);
        }
    }

    /// Keyed-style at `level`.
    #[track_caller]
    pub fn logw(&self, level: Level, message: &str, keys_and_values: &[&dyn fmt::Display]) {
        if self.logger.is_enabled(level) || level.is_terminal() {
            let fields = self.pair_up(keys_and_values);
            self.logger.log(level, message, &fields);
        }
    }

    level_methods! {
        Level::Debug => debug, debugf, debugw;
        Level::Info => info, infof, infow;
        Level::Warn => warn, warnf, warnw;
        Level::Error => error, errorf, errorw;
    }

    terminal_methods! {
        Level::Panic => panic, panicf, panicw;
        Level::Fatal => fatal, fatalf, fatalw;
    }

    /// Turn alternating keys and values into fields. A trailing key without
    /// a value is reported in its own error record and dropped.
    #[track_caller]
    fn pair_up(&self, keys_and_values: &[&dyn fmt::Display]) -> Vec<Field> {
        let mut pairs = keys_and_values.chunks_exact(2);
        let fields: Vec<Field> = pairs
            .by_ref()
            .map(|pair| Field::str(pair[0].to_string(), pair[1].to_string()))
            .collect();

        if let [key] = pairs.remainder() {
            self.logger.emit(
                Level::Error,
                IGNORED_KEY,
                &[Field::str("ignored", key.to_string())],
            );
        }
        fields
    }
}

fn concat(args: &[&dyn fmt::Display]) -> String {
    let mut message = String::new();
    for arg in args {
        let _ = write!(message, "{arg}");
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::Sink;
    use crate::Config;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::{Arc, Mutex};

    fn memory_sugar(level: Level) -> (SugaredLogger, Arc<Mutex<Vec<u8>>>) {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let config = Config::from_options([level.into()]);
        let logger = Logger::with_sink(&config, Sink::Memory(Arc::clone(&buf)));
        (logger.sugar(), buf)
    }

    fn output(buf: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8(buf.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn test_print_style_concatenates() {
        let (sugar, buf) = memory_sugar(Level::Info);
        sugar.info(&[&"retry ", &3, &" of ", &5]);
        assert!(output(&buf).contains("\tretry 3 of 5\n"));
    }

    #[test]
    fn test_printf_style() {
        let (sugar, buf) = memory_sugar(Level::Debug);
        sugar.debugf(format_args!("loaded {} rows in {:.2}s", 12, 0.25));
        assert!(output(&buf).contains("\tdebug\t"));
        assert!(output(&buf).contains("\tloaded 12 rows in 0.25s\n"));
    }

    #[test]
    fn test_keyed_style() {
        let (sugar, buf) = memory_sugar(Level::Info);
        sugar.warnw("slow query", &[&"table", &"users", &"ms", &150]);
        let out = output(&buf);
        assert!(out.contains("\tslow query\t"));
        assert!(out.contains(r#"{"ms":"150","table":"users"}"#));
    }

    #[test]
    fn test_keyed_style_dangling_key() {
        let (sugar, buf) = memory_sugar(Level::Info);
        sugar.infow("lonely", &[&"user", &"ana", &"orphan"]);

        let out = output(&buf);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2, "{lines:?}");
        assert!(lines[0].contains("\terror\t"));
        assert!(lines[0].contains(IGNORED_KEY));
        assert!(lines[0].ends_with(r#"{"ignored":"orphan"}"#));
        assert!(lines[1].ends_with("\tlonely\t{\"user\":\"ana\"}"));
    }

    #[test]
    fn test_filtered_levels_write_nothing() {
        let (sugar, buf) = memory_sugar(Level::Error);
        sugar.debug(&[&"a"]);
        sugar.infof(format_args!("b"));
        sugar.warnw("c", &[&"k", &"v"]);
        assert!(output(&buf).is_empty());
    }

    #[test]
    fn test_with_context() {
        let (sugar, buf) = memory_sugar(Level::Info);
        let child = sugar.with(&[&"request", &"r-9"]);
        child.errorf(format_args!("failed"));
        assert!(output(&buf).ends_with("\tfailed\t{\"request\":\"r-9\"}\n"));
        assert_eq!(child.desugar().level(), Level::Info);
    }

    #[test]
    fn test_panicf_logs_then_panics() {
        let (sugar, buf) = memory_sugar(Level::Info);
        let result = catch_unwind(AssertUnwindSafe(|| {
            sugar.panicf(format_args!("invariant {} broken", 7));
        }));
        assert!(result.is_err());
        assert!(output(&buf).contains("\tpanic\t"));
        assert!(output(&buf).contains("invariant 7 broken"));
    }

    #[test]
    fn test_caller_is_call_site() {
        let (sugar, buf) = memory_sugar(Level::Info);
        sugar.info(&[&"where"]);
        let out = output(&buf);
        let caller = out.split('\t').nth(2).unwrap();
        assert!(caller.starts_with("src/sugar.rs:"), "{caller}");
    }
}
