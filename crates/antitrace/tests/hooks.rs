//! Tests for the load/unload hooks and the process-exit responder

use std::io::Write;
use std::process::Command;
use std::ptr;
use std::sync::{mpsc, Mutex, OnceLock};
use std::time::{Duration, Instant};

use antitrace::hooks::{JNI_OnLoad, JNI_OnUnload};
use antitrace::{ProcessExitResponder, EXIT_STATUS, JNI_VERSION_1_6};
use antitrace_core::{FileStatusSource, MonitorConfig, MonitorError, MonitorExit, TracerId};
use antitrace_utils::logging::LOG_FILE_ENV;

/// Set in the re-executed child that is expected to exit on detection.
const CHILD_ENV: &str = "ANTITRACE_TEST_EXIT_CHILD";

/// The monitor slot is process-wide; tests touching it run one at a time.
fn slot_lock() -> &'static Mutex<()>
{
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn status_file(tracer: &str) -> tempfile::NamedTempFile
{
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "Name:\tapp\nState:\tS\nTgid:\t7\nPid:\t7\nPPid:\t1\nTracerPid:\t{tracer}\n").unwrap();
    file
}

#[test]
fn test_jni_hooks_report_version_and_stop_monitor()
{
    let _guard = slot_lock().lock().unwrap();

    assert_eq!(JNI_VERSION_1_6, 0x0001_0006);
    assert_eq!(JNI_OnLoad(ptr::null_mut(), ptr::null_mut()), JNI_VERSION_1_6);

    // A second load must not start a second monitor.
    assert_eq!(antitrace::on_load(), JNI_VERSION_1_6);

    JNI_OnUnload(ptr::null_mut(), ptr::null_mut());
    assert!(!antitrace::is_running());
    assert!(antitrace::stop().is_none());
}

#[test]
fn test_load_survives_an_uncreatable_log_file()
{
    let _guard = slot_lock().lock().unwrap();
    std::env::set_var(LOG_FILE_ENV, "/proc/definitely/not/a/dir/antitrace.log");

    let version = antitrace::on_load();
    std::env::remove_var(LOG_FILE_ENV);

    assert_eq!(version, JNI_VERSION_1_6);
    antitrace::on_unload();
    assert!(!antitrace::is_running());
}

#[test]
fn test_start_with_rejects_a_second_monitor_until_stopped()
{
    let _guard = slot_lock().lock().unwrap();
    let clean = status_file("0");
    let config = MonitorConfig::default().with_interval(Duration::from_secs(60));

    antitrace::start_with(config.clone(), FileStatusSource::new(clean.path()), |_: TracerId| {}).unwrap();
    assert!(antitrace::is_running());

    let second = antitrace::start_with(config.clone(), FileStatusSource::new(clean.path()), |_: TracerId| {});
    assert!(matches!(second, Err(MonitorError::AlreadyRunning)));

    assert!(matches!(antitrace::stop(), Some(MonitorExit::Cancelled)));
    assert!(!antitrace::is_running());

    antitrace::start_with(config, FileStatusSource::new(clean.path()), |_: TracerId| {}).unwrap();
    assert!(matches!(antitrace::stop(), Some(MonitorExit::Cancelled)));
}

#[test]
fn test_lost_source_frees_the_slot()
{
    let _guard = slot_lock().lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let missing = FileStatusSource::new(dir.path().join("status"));

    antitrace::start_with(MonitorConfig::default(), missing, |_: TracerId| {}).unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    while antitrace::is_running() {
        assert!(Instant::now() < deadline, "monitor did not stop on a missing source");
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(matches!(antitrace::stop(), Some(MonitorExit::SourceLost(_))));
}

#[test]
fn test_detection_reaches_the_custom_responder()
{
    let _guard = slot_lock().lock().unwrap();
    let traced = status_file("1234");
    let (tx, rx) = mpsc::channel();

    antitrace::start_with(MonitorConfig::default(), FileStatusSource::new(traced.path()), move |tracer: TracerId| {
        let _ = tx.send(tracer);
    })
    .unwrap();

    assert_eq!(rx.recv_timeout(Duration::from_secs(10)), Ok(TracerId(1234)));
    assert!(matches!(antitrace::stop(), Some(MonitorExit::TracerDetected(TracerId(1234)))));
}

/// Re-runs this test in a child process where the real responder exits it.
#[test]
fn test_process_exit_responder_terminates_with_status_zero()
{
    if std::env::var_os(CHILD_ENV).is_some() {
        let traced = status_file("1234");
        antitrace::start_with(MonitorConfig::default(), FileStatusSource::new(traced.path()), ProcessExitResponder).unwrap();

        // Only reached if the responder failed to end the process.
        std::thread::sleep(Duration::from_secs(30));
        panic!("process survived tracer detection");
    }

    let output = Command::new(std::env::current_exe().unwrap())
        .args(["--exact", "test_process_exit_responder_terminates_with_status_zero", "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, "1")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(EXIT_STATUS), "{output:?}");
}
