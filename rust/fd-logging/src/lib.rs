//! fd-logging: NDJSON session transcripts + debug logging.
//!
//! A transcript records every commitment at the moment its digest is shown and
//! every reveal with the key and values, so a session can be audited after the
//! fact. Diagnostics go to stderr only when `FD_DEBUG_LOG` is set.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Transcript schema version.
pub const TRANSCRIPT_VERSION: u32 = 1;

pub const EVENT_SESSION_START: &str = "session_start";
pub const EVENT_COMMIT: &str = "commit";
pub const EVENT_REVEAL: &str = "reveal";
pub const EVENT_GAME_RESULT: &str = "game_result";

pub fn debug_enabled() -> bool {
    static ON: OnceLock<bool> = OnceLock::new();
    *ON.get_or_init(|| {
        matches!(
            std::env::var("FD_DEBUG_LOG").as_deref(),
            Ok("1" | "true" | "yes")
        )
    })
}

/// `eprintln!` gated on `FD_DEBUG_LOG`.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        if $crate::debug_enabled() {
            eprintln!("[fd-debug] {}", format_args!($($arg)*));
        }
    };
}

pub fn now_ms() -> u64 {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    d.as_millis() as u64
}

pub fn hash_config_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Versioning block carried by every event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfoV1 {
    pub transcript_version: u32,
    pub hmac_algorithm: String,
    pub value_encoding: String,
}

impl VersionInfoV1 {
    pub fn new(hmac_algorithm: &str, value_encoding: &str) -> Self {
        Self {
            transcript_version: TRANSCRIPT_VERSION,
            hmac_algorithm: hmac_algorithm.to_string(),
            value_encoding: value_encoding.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStartEventV1 {
    pub event: String,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub dice: Vec<String>,
    pub config_hash: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitEventV1 {
    pub event: String,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub round: u32,
    pub purpose: String,
    pub modulus: u64,
    pub hmac: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealEventV1 {
    pub event: String,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub round: u32,
    pub purpose: String,
    pub modulus: u64,
    pub hmac: String,
    pub key: String,
    pub own_value: u64,
    pub counterpart_value: u64,
    pub result: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResultEventV1 {
    pub event: String,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub first_player: String, // "user" | "computer"
    pub computer_die: String,
    pub user_die: String,
    pub computer_face: i64,
    pub user_face: i64,
    pub outcome: String, // "user" | "computer" | "tie"
}

#[derive(Debug)]
pub enum NdjsonError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl From<io::Error> for NdjsonError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for NdjsonError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl std::fmt::Display for NdjsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "transcript io error: {e}"),
            Self::Json(e) => write!(f, "transcript json error: {e}"),
        }
    }
}

impl std::error::Error for NdjsonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

/// Append-only NDJSON writer.
///
/// Contract: each call writes exactly one JSON object followed by a newline.
pub struct NdjsonWriter {
    w: BufWriter<File>,
    lines_since_flush: u64,
    flush_every_lines: u64,
}

impl NdjsonWriter {
    /// Open a file for append. Creates it if it doesn't exist.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, NdjsonError> {
        Self::open_append_with_flush(path, 0)
    }

    /// `flush_every_lines=0` disables periodic flushing.
    pub fn open_append_with_flush(
        path: impl AsRef<Path>,
        flush_every_lines: u64,
    ) -> Result<Self, NdjsonError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            w: BufWriter::new(f),
            lines_since_flush: 0,
            flush_every_lines,
        })
    }

    pub fn write_event<T: Serialize>(&mut self, event: &T) -> Result<(), NdjsonError> {
        let mut buf = serde_json::to_vec(event)?;
        buf.push(b'\n');
        self.w.write_all(&buf)?;
        self.lines_since_flush += 1;
        if self.flush_every_lines > 0 && self.lines_since_flush >= self.flush_every_lines {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), NdjsonError> {
        self.w.flush()?;
        self.lines_since_flush = 0;
        Ok(())
    }
}

impl Drop for NdjsonWriter {
    fn drop(&mut self) {
        let _ = self.w.flush();
    }
}

/// Read every parseable JSON line; blank and truncated lines are skipped.
pub fn read_events(path: impl AsRef<Path>) -> Result<Vec<serde_json::Value>, NdjsonError> {
    let s = std::fs::read_to_string(path)?;
    Ok(s.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect())
}

/// All `reveal` events of a transcript, in file order.
pub fn read_reveals(path: impl AsRef<Path>) -> Result<Vec<RevealEventV1>, NdjsonError> {
    let mut out = Vec::new();
    for v in read_events(path)? {
        if v.get("event").and_then(|e| e.as_str()) == Some(EVENT_REVEAL) {
            out.push(serde_json::from_value(v)?);
        }
    }
    Ok(out)
}
