//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builder helpers with an isolated data directory
//! - Migration log and listing fixtures

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Header of every fixture migration log.
pub const LOG_HEADER: &str =
    "SourcePath,FullPath,DestinationLocation,DestinationType,DestinationExtension,SourceExtension";

/// Destination host used by fixture rows.
pub const TENANT: &str = "https://tenant.sharepoint.com";

const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// Environment variables that would leak the caller's setup into a test.
const ISOLATED_VARS: &[&str] = &[
    "MIGMAP_DATA_DIR",
    "MIGMAP_MIGRATION_LOG",
    "MIGMAP_OUTPUT",
    "MIGMAP_ITEMS_DIR",
    "MIGMAP_CONCURRENCY",
    "MIGMAP_ROOT_DESTINATION_PATH",
    "MIGMAP_MAX_COPY_NUMBER",
    "MIGMAP_KNOWN_ERRORS",
    "MIGMAP_REDACT_PRINCIPALS",
    "MIGMAP_CACHE_ENABLED",
    "MIGMAP_CACHE_BUSY_TIMEOUT_MS",
    "MIGMAP_OUTPUT_FORMAT",
    "MIGMAP_LOG_MODE",
];

/// Test environment with isolated data directory.
///
/// Layout under the temporary directory:
/// - `exports/`: exported listings
/// - `migration_log.csv`: the log, once written
/// - `out/dataset.csv`: the dataset a run writes
/// - `migmap-data/`: data directory (created by migmap on demand)
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the migmap data directory
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let data_dir = temp_path.join("migmap-data");
        fs::create_dir_all(temp_path.join("exports")).expect("Failed to create exports dir");

        Self {
            temp_dir,
            temp_path,
            data_dir,
        }
    }

    /// Get a bare command builder running inside the temp directory with
    /// every `MIGMAP_*` variable cleared.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("migmap").expect("Failed to find migmap binary");
        cmd.current_dir(&self.temp_path);
        for var in ISOLATED_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Get a command builder with the data directory pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// A `run` command pointed at this environment's files.
    pub fn run_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("run")
            .arg("--items-dir")
            .arg(self.items_dir())
            .arg("--log")
            .arg(self.log_path())
            .arg("--output")
            .arg(self.output_path());
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    pub fn items_dir(&self) -> PathBuf {
        self.temp_path.join("exports")
    }

    pub fn log_path(&self) -> PathBuf {
        self.temp_path.join("migration_log.csv")
    }

    pub fn output_path(&self) -> PathBuf {
        self.temp_path.join("out").join("dataset.csv")
    }

    /// Write a migration log from `(principal, full_path, destination, type)` rows.
    pub fn write_log(&self, rows: &[(&str, &str, &str, &str)]) {
        let mut csv = format!("{LOG_HEADER}\n");
        for (principal, full_path, destination, kind) in rows {
            let ext = extension(full_path);
            csv.push_str(&format!(
                "{principal},{full_path},{TENANT}{destination},{kind},{ext},{ext}\n"
            ));
        }
        fs::write(self.log_path(), csv).expect("Failed to write log");
    }

    /// Write a principal's listing from `(id, name, is_folder, parents)`
    /// records, with parents as a comma-separated id list.
    pub fn write_listing(&self, principal: &str, records: &[(&str, &str, bool, &str)]) {
        let body: String = records
            .iter()
            .map(|(id, name, is_folder, parents)| {
                let parents: Vec<&str> = parents.split(',').filter(|p| !p.is_empty()).collect();
                let record = serde_json::json!({
                    "id": id,
                    "name": name,
                    "mimeType": if *is_folder { FOLDER_MIME } else { "text/plain" },
                    "parents": parents,
                    "webViewLink": format!("https://drive.google.com/file/d/{id}/view"),
                    "owners": [{"emailAddress": principal}],
                });
                format!("{record}\n")
            })
            .collect();
        fs::write(self.items_dir().join(format!("{principal}.jsonl")), body)
            .expect("Failed to write listing");
    }

    /// Make a principal's listing fail with `messages`.
    pub fn write_provider_error(&self, principal: &str, messages: &[&str]) {
        fs::write(
            self.items_dir().join(format!("{principal}.error")),
            messages.join("\n"),
        )
        .expect("Failed to write provider error");
    }

    /// Write a file relative to the temp directory.
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        fs::write(&path, contents).expect("Failed to write file");
        path
    }

    /// Contents of the dataset.
    pub fn dataset(&self) -> String {
        fs::read_to_string(self.output_path()).expect("Failed to read dataset")
    }

    /// The standard scenario: one principal with a matched folder, a
    /// matched file and one log row that nothing claims.
    pub fn write_basic_scenario(&self) {
        self.write_log(&[
            ("a@x.com", "/Docs", "/Migrated/Docs", "folder"),
            ("a@x.com", "/Docs/f.txt", "/Migrated/Docs/f.txt", "file"),
            ("a@x.com", "/Docs/gone.txt", "/Migrated/Docs/gone.txt", "file"),
        ]);
        self.write_listing(
            "a@x.com",
            &[("d", "Docs", true, ""), ("f", "f.txt", false, "d")],
        );
    }

    /// Run with JSON output and parse the summary.
    pub fn run_json(&self, extra: &[&str]) -> serde_json::Value {
        let output = self
            .run_command()
            .args(["--format", "json"])
            .args(extra)
            .output()
            .expect("Failed to run migmap");
        assert!(
            output.status.success(),
            "Run failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("Output is not valid JSON")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

fn extension(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(dot) if dot > 0 => &name[dot + 1..],
        _ => "",
    }
}
