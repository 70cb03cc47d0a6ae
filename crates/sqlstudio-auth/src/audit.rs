//! Append-only audit trail of login attempts.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use thiserror::Error;

/// Failure to open the audit file. This is the only fatal path in the
/// gate: callers should treat it as a startup error, not a per-request
/// one.
#[derive(Debug, Error)]
#[error("failed to open audit log {path}: {source}")]
pub struct AuditError {
    path: PathBuf,
    #[source]
    source: std::io::Error,
}

/// Result of a credential verification, as written to the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginResult {
    Success,
    Failed,
}

impl LoginResult {
    pub fn as_str(self) -> &'static str {
        match self {
            LoginResult::Success => "success",
            LoginResult::Failed => "failed",
        }
    }
}

/// Append-only login audit file.
///
/// One line per verified attempt, in the fixed layout
/// `YYYY-MM-DD HH:MM:SS   IP_ADDRESS   RESULT`, handed to the OS before
/// `record` returns. Appends are serialized under a mutex so concurrent
/// attempts never interleave within a line. A failed append is reported
/// through the service log and swallowed: login availability must not
/// depend on the audit disk.
pub struct AuditLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl AuditLog {
    /// Open the audit file for appending, creating it and its parent
    /// directories as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref().to_path_buf();

        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(|source| AuditError {
                    path: path.clone(),
                    source,
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| AuditError {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Record one login attempt at the current wall-clock time.
    pub fn record(&self, addr: &str, result: LoginResult) {
        self.record_at(addr, result, Local::now());
    }

    /// Timestamp-taking variant of [`record`], used by tests.
    ///
    /// [`record`]: AuditLog::record
    pub fn record_at(&self, addr: &str, result: LoginResult, when: DateTime<Local>) {
        let line = format!(
            "{}   {}   {}\n",
            when.format("%Y-%m-%d %H:%M:%S"),
            addr,
            result.as_str()
        );

        let mut file = self.file.lock();
        if let Err(err) = file.write_all(line.as_bytes()) {
            tracing::error!(
                path = %self.path.display(),
                %err,
                "failed to append login audit line"
            );
        }
    }

    /// The last `limit` audit lines, most recent first. Returns an empty
    /// list when the file cannot be read.
    pub fn recent(&self, limit: usize) -> Vec<String> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) => {
                tracing::error!(path = %self.path.display(), %err, "failed to read audit log");
                return Vec::new();
            }
        };

        let lines: Vec<String> = BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .collect();

        lines.into_iter().rev().take(limit).collect()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
