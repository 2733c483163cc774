//! Shared test infrastructure for flocate.
//!
//! Provides:
//! - `CmdResult` + `run_cli_case()` — integration test CLI runner
//! - `updatedb_bin()` / `locate_bin()` — binary path resolution
//! - `TestTree` — directory tree builder on a tempdir

// Not every test binary uses every item; suppress dead-code warnings for the shared module.
#![allow(dead_code)]

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::{SystemTime, UNIX_EPOCH};

// ──────────────────── CLI test runner ────────────────────

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

pub fn updatedb_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_fupdatedb"))
}

pub fn locate_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_flocate"))
}

pub fn run_cli_case<S: AsRef<OsStr>>(case_name: &str, bin_path: &Path, args: &[S]) -> CmdResult {
    let root = std::env::temp_dir().join("flocate-test-logs");
    fs::create_dir_all(&root).expect("create temp test log dir");

    let log_path = root.join(format!("{}-{}.log", sanitize(case_name), now_millis()));

    let output = Command::new(bin_path)
        .args(args)
        .env("RUST_BACKTRACE", "1")
        .output()
        .expect("execute flocate binary");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let mut log_content = String::new();
    log_content.push_str(&format!("case={case_name}\n"));
    log_content.push_str(&format!("bin={}\n", bin_path.display()));
    log_content.push_str(&format!("status={}\n", output.status));
    log_content.push_str("----- stdout -----\n");
    log_content.push_str(&stdout);
    log_content.push('\n');
    log_content.push_str("----- stderr -----\n");
    log_content.push_str(&stderr);
    log_content.push('\n');
    fs::write(&log_path, log_content).expect("write test log");

    CmdResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}

// ──────────────────── TestTree ────────────────────

/// Builder for directory trees under a tempdir.
pub struct TestTree {
    root: tempfile::TempDir,
}

impl TestTree {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create test tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Create a file with the given content, creating parents as needed.
    pub fn create_file(&self, rel_path: &str, content: &[u8]) -> PathBuf {
        let path = self.root.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, content).expect("write test file");
        path
    }

    /// Create a directory, creating parents as needed.
    pub fn create_dir(&self, rel_path: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        fs::create_dir_all(&path).expect("create test dir");
        path
    }
}
