//! Common test utilities for integration tests.
//!
//! Fixtures write migration logs and exported listings into a temporary
//! workspace so that tests drive the library through its file-backed
//! collaborators.

pub mod listing;

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub use listing::ListingFixture;

/// Header of every migration log written by [`LogFixture`].
pub const LOG_HEADER: &str =
    "SourcePath,FullPath,DestinationLocation,DestinationType,DestinationExtension,SourceExtension";

/// Destination host used by fixture rows.
pub const TENANT: &str = "https://tenant.sharepoint.com";

/// A temporary workspace with `exports/`, `logs/` and `out/` directories.
pub struct Workspace {
    dir: TempDir,
}

#[allow(dead_code)]
impl Workspace {
    /// Creates an empty workspace.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["exports", "logs", "out", "data"] {
            fs::create_dir_all(dir.path().join(sub)).unwrap();
        }
        Self { dir }
    }

    /// Workspace root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Directory the listings are exported to.
    pub fn items_dir(&self) -> PathBuf {
        self.root().join("exports")
    }

    /// Default migration log location.
    pub fn log_path(&self) -> PathBuf {
        self.root().join("logs").join("migration_log.csv")
    }

    /// Default dataset location.
    pub fn output_path(&self) -> PathBuf {
        self.root().join("out").join("dataset.csv")
    }

    /// Data directory for the cache database.
    pub fn data_dir(&self) -> PathBuf {
        self.root().join("data")
    }

    /// Writes `log` to the default migration log location.
    pub fn write_log(&self, log: &LogFixture) -> PathBuf {
        let path = self.log_path();
        fs::write(&path, log.to_csv()).unwrap();
        path
    }

    /// Writes a principal's listing as a single export file.
    pub fn write_listing(&self, principal: &str, listing: &ListingFixture) {
        listing.write_to(&self.items_dir(), principal);
    }

    /// Makes a principal's listing fail with `messages`.
    pub fn write_provider_error(&self, principal: &str, messages: &[&str]) {
        fs::write(
            self.items_dir().join(format!("{principal}.error")),
            messages.join("\n"),
        )
        .unwrap();
    }

    /// Data rows of the dataset, header excluded.
    pub fn dataset_rows(&self) -> Vec<csv::StringRecord> {
        let mut reader = csv::Reader::from_path(self.output_path()).unwrap();
        reader.records().map(Result::unwrap).collect()
    }
}

/// One migration log row.
#[derive(Debug, Clone)]
pub struct LogRow {
    pub principal: String,
    pub full_path: String,
    pub destination_location: String,
    pub destination_type: String,
}

/// Builder for migration log CSV files.
///
/// # Examples
///
/// ```no_run
/// # use common::LogFixture;
/// let log = LogFixture::new()
///     .folder("a@x.com", "/Docs", "/Docs")
///     .file("a@x.com", "/Docs/f.txt", "/Docs/f.txt");
/// ```
#[derive(Debug, Clone, Default)]
pub struct LogFixture {
    rows: Vec<LogRow>,
    raw_lines: Vec<String>,
}

#[allow(dead_code)]
impl LogFixture {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a row with an explicit destination type.
    pub fn row(mut self, principal: &str, full_path: &str, destination: &str, kind: &str) -> Self {
        self.rows.push(LogRow {
            principal: principal.into(),
            full_path: full_path.into(),
            destination_location: format!("{TENANT}{destination}"),
            destination_type: kind.into(),
        });
        self
    }

    /// Adds a file row.
    pub fn file(self, principal: &str, full_path: &str, destination: &str) -> Self {
        self.row(principal, full_path, destination, "file")
    }

    /// Adds a folder row.
    pub fn folder(self, principal: &str, full_path: &str, destination: &str) -> Self {
        self.row(principal, full_path, destination, "folder")
    }

    /// Appends a line verbatim, for malformed-row tests.
    pub fn raw(mut self, line: &str) -> Self {
        self.raw_lines.push(line.into());
        self
    }

    /// Renders the log as CSV.
    pub fn to_csv(&self) -> String {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(LOG_HEADER.split(','))
            .unwrap();
        for row in &self.rows {
            let ext = extension(&row.full_path);
            writer
                .write_record([
                    row.principal.as_str(),
                    row.full_path.as_str(),
                    row.destination_location.as_str(),
                    row.destination_type.as_str(),
                    ext,
                    ext,
                ])
                .unwrap();
        }
        let mut csv = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        for line in &self.raw_lines {
            csv.push_str(line);
            csv.push('\n');
        }
        csv
    }
}

fn extension(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(dot) if dot > 0 => &name[dot + 1..],
        _ => "",
    }
}
