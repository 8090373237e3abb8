// Shared helpers for integration tests.
//
// Provides a temporary home directory with an optional settings file so each
// integration test can load configuration in isolation.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use bootstrap_cli::config::Config;

/// Seconds in one day.
pub const DAY: Duration = Duration::from_secs(86_400);

/// An isolated home directory backed by a [`tempfile::TempDir`].
pub struct TestHome {
    pub home: tempfile::TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temp home"),
        }
    }

    pub fn path(&self) -> &Path {
        self.home.path()
    }

    /// Write a settings file at `bootstrap.toml` in the home directory.
    pub fn write_settings(&self, content: &str) -> PathBuf {
        let path = self.path().join("bootstrap.toml");
        std::fs::write(&path, content).expect("write settings");
        path
    }

    /// Load configuration from an explicit settings file.
    pub fn load(&self, settings: &Path) -> Config {
        Config::load(Some(settings), self.path()).expect("load config")
    }

    /// Write `content` to `rel`, creating parents.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path().join(rel);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
        std::fs::write(&path, content).expect("write file");
        path
    }

    /// Create an empty file in `dir` last modified `days` days (plus a
    /// minute) ago.
    pub fn aged_file(&self, dir: &Path, name: &str, days: u64) -> PathBuf {
        std::fs::create_dir_all(dir).expect("create dir");
        let path = dir.join(name);
        let file = std::fs::File::create(&path).expect("create file");
        let age = DAY * u32::try_from(days).expect("days") + Duration::from_secs(60);
        file.set_modified(SystemTime::now() - age)
            .expect("set mtime");
        path
    }
}
