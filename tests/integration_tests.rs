//! Integration tests for the process-wide logger
//!
//! These tests verify:
//! - Duplicate suppression as seen in the log files
//! - Per-level file routing and shared files
//! - Init / shutdown lifecycle, including re-initialization
//! - Process-wide statistics
//! - Audio forwarding and WAV layout
//! - Panic recovery
//!
//! The global logger is shared by every test in this binary, so each test
//! holds `SESSION_LOCK` for its whole duration.

use parking_lot::{const_mutex, Mutex, MutexGuard};
use rust_clog::recovery::recover_and_flush;
use rust_clog::{api, Agent, Config, Event, Level, LoggerError, Param};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

static SESSION_LOCK: Mutex<()> = const_mutex(());

const SHUTDOWN: Duration = Duration::from_secs(2);

/// Exclusive use of the global logger; shuts it down when dropped
struct Session {
    _guard: MutexGuard<'static, ()>,
}

impl Drop for Session {
    fn drop(&mut self) {
        api::shutdown(SHUTDOWN);
    }
}

fn session() -> Session {
    let guard = SESSION_LOCK.lock();
    api::shutdown(SHUTDOWN);
    Session { _guard: guard }
}

/// Console off, files under `dir`
fn file_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.console.enabled = false;
    config.file.base_dir = Some(dir.to_path_buf());
    config
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("Failed to read log file")
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_repeated_message_collapses_into_summary() {
    let _session = session();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    api::init(file_config(temp_dir.path()).route_level(Level::Info, "app.log"));

    for _ in 0..5 {
        api::info("Test", "Same message", vec![]);
    }
    api::info("Test", "Different message", vec![]);
    assert!(api::shutdown(SHUTDOWN));

    assert_eq!(
        read_lines(&temp_dir.path().join("app.log")),
        vec![
            "[INFO] Test: Same message",
            "[INFO] Test: last message repeated 4 more times",
            "[INFO] Test: Different message",
        ]
    );
}

#[test]
fn test_level_or_facility_change_breaks_run() {
    let _session = session();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    api::init(
        file_config(temp_dir.path())
            .route_level(Level::Info, "all.log")
            .route_level(Level::Error, "all.log"),
    );

    api::info("Test", "X", vec![]);
    api::info("Test", "X", vec![]);
    api::error("Test", "X", vec![]);
    api::info("Test", "X", vec![]);
    api::info("Other", "X", vec![]);
    api::shutdown(SHUTDOWN);

    let lines = read_lines(&temp_dir.path().join("all.log"));
    assert_eq!(
        lines,
        vec![
            "[INFO] Test: X",
            "[INFO] Test: last message repeated 1 more times",
            "[ERROR] Test: X",
            "[INFO] Test: X",
            "[INFO] Other: X",
        ]
    );
    assert!(lines.iter().filter(|l| l.ends_with(": X")).count() >= 3);
}

#[test]
fn test_disabled_dedupe_keeps_every_line() {
    let _session = session();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = file_config(temp_dir.path()).route_level(Level::Info, "app.log");
    config.dedupe.enabled = false;
    api::init(config);

    for _ in 0..5 {
        api::info("Test", "Same message", vec![]);
    }
    api::shutdown(SHUTDOWN);

    let lines = read_lines(&temp_dir.path().join("app.log"));
    assert_eq!(lines.len(), 5);
    assert!(lines.iter().all(|l| l == "[INFO] Test: Same message"));
}

#[test]
fn test_shutdown_drains_and_flushes_pending_summary() {
    let _session = session();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    api::init(file_config(temp_dir.path()).route_level(Level::Warning, "warn.log"));

    for i in 0..200 {
        api::warning("Load", "item %d", vec![Param::from(i)]);
    }
    for _ in 0..3 {
        api::warning("Load", "done", vec![]);
    }
    assert!(api::shutdown(SHUTDOWN));

    let lines = read_lines(&temp_dir.path().join("warn.log"));
    assert_eq!(lines.len(), 202);
    assert_eq!(lines[0], "[WARNING] Load: item 0");
    assert_eq!(lines[199], "[WARNING] Load: item 199");
    assert_eq!(lines[201], "[WARNING] Load: last message repeated 2 more times");
}

#[test]
fn test_file_routing_empty_and_shared_filenames() {
    let _session = session();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    api::init(
        file_config(temp_dir.path())
            .route_level(Level::Debug, "")
            .route_level(Level::Fail, "problems.log")
            .route_level(Level::Error, "problems.log"),
    );

    api::debug("Svc", "not persisted", vec![]);
    api::success("Svc", "not routed", vec![]);
    api::fail("Svc", "attempt %d failed", vec![Param::from(1)]);
    api::error("Svc", "gave up", vec![]);
    api::shutdown(SHUTDOWN);

    let entries: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(entries, vec!["problems.log"]);
    assert_eq!(
        read_lines(&temp_dir.path().join("problems.log")),
        vec!["[FAIL] Svc: attempt 1 failed", "[ERROR] Svc: gave up"]
    );
}

#[test]
fn test_empty_facility_uses_default() {
    let _session = session();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    api::init(file_config(temp_dir.path()).route_level(Level::Info, "app.log"));

    api::info("", "anonymous", vec![]);
    api::shutdown(SHUTDOWN);

    assert_eq!(
        read_lines(&temp_dir.path().join("app.log")),
        vec!["[INFO] Application: anonymous"]
    );
}

#[test]
fn test_stats_count_accepted_and_emitted() {
    let _session = session();
    let mut config = Config::default();
    config.console.enabled = false;
    api::init(config);

    let before = api::get_stats();
    api::info("Stats", "one", vec![]);
    api::error("Stats", "two", vec![]);
    api::shutdown(SHUTDOWN);
    let after = api::get_stats();

    assert_eq!(after.accepted - before.accepted, 2);
    assert_eq!(after.emitted - before.emitted, 2);
    for level in Level::ALL {
        assert_eq!(after.drops(level), before.drops(level));
    }
}

#[test]
fn test_logging_without_init_is_ignored() {
    let _session = session();
    assert!(!api::is_initialized());

    let before = api::get_stats();
    assert!(!api::log(Level::Error, "Nobody", "listening", vec![]));
    api::catastrophe("Nobody", "still fine", vec![]);
    api::audio_write_pcm16(&[1, 2, 3]).unwrap();
    api::audio_write_bytes_pcm16le(&[1, 2]).unwrap();

    let after = api::get_stats();
    assert_eq!(after.accepted, before.accepted);
    assert_eq!(after.total_dropped(), before.total_dropped());
    assert!(api::shutdown(SHUTDOWN));
    assert!(api::shutdown(SHUTDOWN));
}

#[test]
fn test_second_init_is_ignored_until_shutdown() {
    let _session = session();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    api::init(file_config(temp_dir.path()).route_level(Level::Info, "first.log"));
    api::init(file_config(temp_dir.path()).route_level(Level::Info, "second.log"));
    api::info("Init", "after double init", vec![]);
    api::shutdown(SHUTDOWN);
    assert!(!temp_dir.path().join("second.log").exists());

    // A shutdown allows a fresh agent with the new config
    api::init(file_config(temp_dir.path()).route_level(Level::Info, "second.log"));
    assert!(api::is_initialized());
    api::info("Init", "after reinit", vec![]);
    api::shutdown(SHUTDOWN);

    assert_eq!(
        read_lines(&temp_dir.path().join("first.log")),
        vec!["[INFO] Init: after double init"]
    );
    assert_eq!(
        read_lines(&temp_dir.path().join("second.log")),
        vec!["[INFO] Init: after reinit"]
    );
}

#[test]
fn test_failed_init_leaves_logger_uninitialized() {
    let _session = session();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let blocker = temp_dir.path().join("plain-file");
    fs::write(&blocker, b"not a directory").unwrap();

    let config = file_config(&blocker.join("logs")).route_level(Level::Info, "app.log");
    let err = api::try_init(config.clone()).unwrap_err();
    assert!(matches!(err, LoggerError::Initialization { .. }));
    assert!(!api::is_initialized());

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| api::init(config)));
    assert!(result.is_err());
    assert!(!api::is_initialized());
}

#[test]
fn test_audio_forwarding_writes_wav() {
    let _session = session();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = Config::default();
    config.console.enabled = false;
    config.audio.enabled = true;
    config.audio.sample_rate = 16_000;
    config.audio.output_dir = temp_dir.path().join("audio");
    config.audio.filename_pattern = Some("capture.wav".to_string());
    api::init(config);

    let k = 480;
    let frame: Vec<i16> = (0..k as i16).collect();
    api::audio_write_pcm16(&frame).unwrap();
    api::audio_write_bytes_pcm16le(&[0x10, 0x00, 0x20, 0x00]).unwrap();
    api::shutdown(SHUTDOWN);

    let bytes = fs::read(temp_dir.path().join("audio").join("capture.wav")).unwrap();
    let data_len = 2 * k + 4;
    assert_eq!(bytes.len(), 44 + data_len);
    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(
        u32::from_le_bytes(bytes[4..8].try_into().unwrap()) as usize,
        44 + data_len - 8
    );
    assert_eq!(
        u32::from_le_bytes(bytes[24..28].try_into().unwrap()),
        16_000
    );
    assert_eq!(
        u32::from_le_bytes(bytes[40..44].try_into().unwrap()) as usize,
        data_len
    );
}

#[test]
fn test_hooks_registered_in_config_run() {
    let _session = session();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let hook_seen = Arc::clone(&seen);

    let mut config = Config::default().add_level_hook(
        Level::Success,
        Arc::new(move |event: &Event| hook_seen.lock().push(event.iface.clone())),
    );
    config.console.enabled = false;
    api::init(config);

    api::success("Deploy", "finished", vec![]);
    api::info("Deploy", "ignored by the hook", vec![]);
    api::shutdown(SHUTDOWN);

    assert_eq!(*seen.lock(), vec!["Deploy".to_string()]);
}

#[test]
fn test_macros_forward_to_global_logger() {
    let _session = session();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    api::init(
        file_config(temp_dir.path())
            .route_level(Level::Info, "macro.log")
            .route_level(Level::Catastrophe, "macro.log"),
    );

    rust_clog::info!("Macro", "port %d on %s", 8080, "localhost");
    rust_clog::catastrophe!("Macro", "plain");
    rust_clog::log!(Level::Info, "Macro", "%05.1f|%-4s|%x", 3.14159, "ab", 255u32);
    api::shutdown(SHUTDOWN);

    assert_eq!(
        read_lines(&temp_dir.path().join("macro.log")),
        vec![
            "[INFO] Macro: port 8080 on localhost",
            "[CATASTROPHE] Macro: plain",
            "[INFO] Macro: 003.1|ab  |ff",
        ]
    );
}

#[test]
fn test_recover_and_flush_logs_panic() {
    let _session = session();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    api::init(file_config(temp_dir.path()).route_level(Level::Catastrophe, "fatal.log"));

    let result: Option<()> = recover_and_flush(false, || panic!("disk on fire"));
    assert!(result.is_none());
    assert!(!api::is_initialized());

    let lines = read_lines(&temp_dir.path().join("fatal.log"));
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("[CATASTROPHE] Recovery: panic: disk on fire | backtrace: "));
}

#[test]
fn test_recover_and_flush_can_repanic() {
    let _session = session();
    let mut config = Config::default();
    config.console.enabled = false;
    api::init(config);

    let outcome = std::panic::catch_unwind(|| recover_and_flush(true, || panic!("again")));
    assert!(outcome.is_err());
    assert!(!api::is_initialized());
}

#[test]
fn test_config_file_drives_agent() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("clog.json");
    let log_dir = temp_dir.path().join("logs");
    let json = format!(
        r#"{{
            "queue_capacity": 16,
            "console": {{ "enabled": false }},
            "file": {{ "base_dir": {:?}, "per_level": {{ "INFO": "info.log" }} }},
            "dedupe": {{ "summary_format": "(repeated %d times)" }}
        }}"#,
        log_dir.to_str().unwrap()
    );
    fs::write(&config_path, json).unwrap();

    let config = Config::from_json_file(&config_path).unwrap();
    let agent = Agent::new(config).unwrap();
    for _ in 0..3 {
        agent.log(Level::Info, "Cfg", "tick", vec![]);
    }
    assert!(agent.stop(SHUTDOWN));

    assert_eq!(
        read_lines(&log_dir.join("info.log")),
        vec!["[INFO] Cfg: tick", "[INFO] Cfg: (repeated 2 times)"]
    );
}

#[test]
fn test_missing_config_file_is_io_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let err = Config::from_json_file(temp_dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, LoggerError::IoOperation { .. }));
}
