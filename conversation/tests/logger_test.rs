//! init_tracing installs a process-global subscriber, so this binary holds a single test.

use conversation::init_tracing;

/// **Test: Log file (and missing parent directories) are created; a second init fails.**
#[test]
fn init_tracing_creates_log_file_and_is_single_shot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("session-chat.log");
    let path_str = path.to_str().unwrap();

    init_tracing(Some(path_str)).unwrap();
    tracing::info!(session_id = "s1", "logger test line");

    assert!(path.exists());
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("logger test line"));

    assert!(init_tracing(None).is_err());
}
