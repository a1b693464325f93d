use std::panic::{AssertUnwindSafe, catch_unwind};

use xlog::{Config, ConfigOption, Field, Level, Logger};

fn read(path: &std::path::Path) -> String {
    std::fs::read_to_string(path).expect("read log file")
}

#[test]
fn test_file_logger_filters_below_level() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("app.log");

    let logger = Logger::from_options([
        ConfigOption::Filename(path.clone()),
        ConfigOption::string_level("warn"),
    ])
    .expect("build logger");
    assert!(!logger.writes_to_stdout());

    logger.debug("file-test: debug", &[]);
    logger.info("file-test: info", &[]);
    logger.warn("file-test: warn", &[Field::str("disk", "sda1")]);
    logger.error("file-test: error", &[]);
    logger.sync().expect("sync");

    let content = read(&path);
    assert!(!content.contains("file-test: debug"));
    assert!(!content.contains("file-test: info"));
    assert!(content.contains("\twarn\t"));
    assert!(content.contains("file-test: warn\t{\"disk\":\"sda1\"}"));
    assert!(content.contains("file-test: error"));
    assert!(!content.contains('\x1b'), "ANSI escape found in log file");
}

#[test]
fn test_file_logger_reports_caller() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("caller.log");
    let logger = Logger::new(Config {
        filename: Some(path.clone()),
        ..Config::default()
    })
    .expect("build logger");

    logger.sugar().infof(format_args!("where am I"));
    logger.sync().expect("sync");

    let content = read(&path);
    let caller = content.split('\t').nth(2).expect("caller column");
    assert!(
        caller.starts_with("tests/file_logging_tests.rs:"),
        "unexpected caller {caller}"
    );
}

#[test]
fn test_file_logger_appends_every_call() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("repeat.log");
    let logger = Logger::from_options([ConfigOption::Filename(path.clone())]).expect("build");

    for _ in 0..3 {
        logger.info("same record", &[]);
    }
    logger.sync().expect("sync");

    assert_eq!(read(&path).matches("same record").count(), 3);
}

#[test]
fn test_file_logger_round_trip_all_levels() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("levels.log");
    let logger = Logger::from_options([
        ConfigOption::Filename(path.clone()),
        ConfigOption::Level(Level::Error),
    ])
    .expect("build logger");

    logger.debug("lvl-debug", &[]);
    logger.info("lvl-info", &[]);
    logger.warn("lvl-warn", &[]);
    logger.error("lvl-error", &[]);
    let panicked = catch_unwind(AssertUnwindSafe(|| {
        logger.panic("lvl-panic", &[]);
    }));
    assert!(panicked.is_err());
    logger.sync().expect("sync");

    let content = read(&path);
    let levels: Vec<&str> = content
        .lines()
        .map(|line| line.split('\t').nth(1).expect("level column"))
        .collect();
    assert_eq!(levels, vec!["error", "panic"]);
}

#[test]
fn test_forced_rotation_keeps_backup() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("svc.log");
    let logger = Logger::from_options([
        ConfigOption::Filename(path.clone()),
        ConfigOption::Compress(false),
    ])
    .expect("build logger");

    logger.info("before rotation", &[]);
    logger.rotate().expect("rotate");
    logger.info("after rotation", &[]);
    logger.sync().expect("sync");

    assert!(read(&path).contains("after rotation"));
    assert!(!read(&path).contains("before rotation"));

    let backups: Vec<_> = std::fs::read_dir(dir.path())
        .expect("read dir")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("svc-") && name.ends_with(".log"))
        .collect();
    assert_eq!(backups.len(), 1, "{backups:?}");
    assert!(read(&dir.path().join(&backups[0])).contains("before rotation"));
}

#[test]
fn test_unwritable_path_fails_construction() {
    let dir = tempfile::tempdir().expect("tempdir");
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"").expect("write blocker");

    let result = Logger::from_options([ConfigOption::Filename(blocker.join("app.log"))]);
    assert!(matches!(result, Err(xlog::Error::Io(_))));
}

#[test]
fn test_stdout_logger_has_no_file() {
    let logger = Logger::from_options([ConfigOption::Filename("".into())]).expect("build");
    assert!(logger.writes_to_stdout());
    assert!(logger.filename().is_none());
}

#[test]
fn test_back_to_back_rotations_keep_both_generations() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("gen.log");
    let logger = Logger::from_options([ConfigOption::Filename(path.clone())]).expect("build");

    logger.info("first-generation", &[]);
    logger.rotate().expect("rotate");
    logger.info("second-generation", &[]);
    logger.rotate().expect("rotate");

    let mut backups: Vec<_> = std::fs::read_dir(dir.path())
        .expect("read dir")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("gen-"))
        .collect();
    backups.sort();
    assert_eq!(backups.len(), 2, "{backups:?}");
    assert!(backups.iter().all(|name| name.ends_with(".log.gz")), "{backups:?}");
}
