use cognosis_core::{ConfigError, CoreConfig, LogTarget};
use std::io::Write;

#[test]
fn loads_arena_and_logging_sections() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");
    let path = dir.path().join("cognosis.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        "[arena]\nchunk_capacity = 4096\n\n[logging]\nlevel = \"debug\"\nlog_dir = {:?}",
        log_dir.to_str().unwrap()
    )
    .unwrap();

    let config = CoreConfig::load(&path).unwrap();
    assert_eq!(config.arena.chunk_capacity, 4096);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.target(), LogTarget::Directory(log_dir));

    let arena = config.scratch_arena().unwrap();
    assert_eq!(arena.chunk_capacity(), 4096);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = CoreConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn relative_log_dir_is_rejected() {
    let err = CoreConfig::from_toml_str("[logging]\nlog_dir = \"logs\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Logging(_)));
}

#[test]
fn unset_log_dir_targets_stderr() {
    let config = CoreConfig::from_toml_str("[logging]\nlevel = \"info\"\n").unwrap();
    assert_eq!(config.logging.target(), LogTarget::Stderr);
}
