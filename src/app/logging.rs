//! Opt-in debug log for promptdeck sessions.
//!
//! Every line is tagged with the session and the frame time of the tick that
//! wrote it. Once the file passes its cap it is moved aside to `<name>.1` and
//! a fresh file is started, so one previous stretch of history survives.

use crate::config::AppConfig;
use std::{
    env,
    ffi::OsString,
    fs::{self, File, OpenOptions},
    io::{self, Write},
    panic,
    path::{Path, PathBuf},
    process,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, OnceLock,
    },
    time::{SystemTime, UNIX_EPOCH},
};

const SESSION_LOG_CAP_BYTES: u64 = 1024 * 1024;
const CRASH_LOG_CAP_BYTES: u64 = 64 * 1024;

static ENABLED: AtomicBool = AtomicBool::new(false);
static CONTENT_ENABLED: AtomicBool = AtomicBool::new(false);
static STATE: OnceLock<Mutex<LogState>> = OnceLock::new();

pub fn log_file_path() -> PathBuf {
    env::temp_dir().join("promptdeck_session.log")
}

/// Crash entries never contain prompt text unless `--log-content` is on.
pub fn crash_log_path() -> PathBuf {
    env::temp_dir().join("promptdeck_crash.log")
}

#[derive(Default)]
struct LogState {
    sink: Option<SessionLog>,
    frame_time: Option<f64>,
}

struct SessionLog {
    path: PathBuf,
    file: File,
    written: u64,
    cap: u64,
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn rotated_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("promptdeck.log"));
    name.push(".1");
    path.with_file_name(name)
}

impl SessionLog {
    fn open(path: PathBuf, cap: u64) -> io::Result<Self> {
        let file = open_append(&path)?;
        let written = file.metadata().map(|meta| meta.len()).unwrap_or(0);
        let mut log = Self {
            path,
            file,
            written,
            cap,
        };
        if log.written > log.cap {
            log.rotate()?;
        }
        Ok(log)
    }

    fn rotate(&mut self) -> io::Result<()> {
        if fs::rename(&self.path, rotated_path(&self.path)).is_ok() {
            self.file = open_append(&self.path)?;
        } else {
            self.file = File::create(&self.path)?;
        }
        self.written = 0;
        Ok(())
    }

    fn append(&mut self, line: &str) -> io::Result<()> {
        let len = line.len() as u64;
        if self.written > 0 && self.written.saturating_add(len) > self.cap {
            self.rotate()?;
        }
        self.file.write_all(line.as_bytes())?;
        self.written = self.written.saturating_add(len);
        Ok(())
    }
}

fn state() -> &'static Mutex<LogState> {
    STATE.get_or_init(|| Mutex::new(LogState::default()))
}

fn session_tag() -> &'static str {
    static TAG: OnceLock<String> = OnceLock::new();
    TAG.get_or_init(|| {
        let started = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        format!("{}-{started}", process::id())
    })
}

fn format_line(tag: &str, frame_time: Option<f64>, msg: &str) -> String {
    match frame_time {
        Some(t) => format!("[{tag} t={t:.3}s] {msg}\n"),
        None => format!("[{tag} setup] {msg}\n"),
    }
}

pub fn init_logging(config: &AppConfig) {
    let enabled = config.logging_enabled();
    set_logging(enabled, enabled && config.log_content);
}

fn set_logging(enabled: bool, content_enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
    CONTENT_ENABLED.store(content_enabled, Ordering::Relaxed);
    let mut state = state()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    state.sink = if enabled {
        SessionLog::open(log_file_path(), SESSION_LOG_CAP_BYTES).ok()
    } else {
        None
    };
}

/// Stamp following log lines with the current tick's frame time.
pub fn set_log_frame_time(now: f64) {
    if !ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let mut state = state()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    state.frame_time = Some(now);
}

pub fn log_debug(msg: &str) {
    if !ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let mut state = state()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let line = format_line(session_tag(), state.frame_time, msg);
    if let Some(sink) = state.sink.as_mut() {
        // Drop the sink after a failed write.
        if sink.append(&line).is_err() {
            state.sink = None;
        }
    }
}

/// Like `log_debug`, for lines that carry prompt payloads or typed text.
pub fn log_debug_content(msg: &str) {
    if CONTENT_ENABLED.load(Ordering::Relaxed) {
        log_debug(msg);
    }
}

fn panic_payload(info: &panic::PanicHookInfo<'_>) -> String {
    if !CONTENT_ENABLED.load(Ordering::Relaxed) {
        return "payload withheld (--log-content off)".to_string();
    }
    let payload = info.payload();
    payload
        .downcast_ref::<&str>()
        .map(|text| (*text).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string payload".to_string())
}

pub fn log_panic(info: &panic::PanicHookInfo<'_>) {
    if !ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let location = info
        .location()
        .map(|loc| format!("{}:{}", loc.file(), loc.line()))
        .unwrap_or_else(|| "unknown location".to_string());
    let frame_time = state()
        .try_lock()
        .ok()
        .and_then(|state| state.frame_time);
    let line = format_line(
        session_tag(),
        frame_time,
        &format!(
            "panic at {location}: {} (promptdeck {})",
            panic_payload(info),
            env!("CARGO_PKG_VERSION")
        ),
    );
    if let Ok(mut crash_log) = SessionLog::open(crash_log_path(), CRASH_LOG_CAP_BYTES) {
        let _ = crash_log.append(&line);
    }
}
