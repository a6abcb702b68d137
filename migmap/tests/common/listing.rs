//! Exported listing fixtures.

use std::fs;
use std::path::Path;

use serde_json::json;

const FOLDER: &str = "application/vnd.google-apps.folder";

/// Builder for a principal's exported listing.
#[derive(Debug, Clone, Default)]
pub struct ListingFixture {
    records: Vec<serde_json::Value>,
}

#[allow(dead_code)]
impl ListingFixture {
    /// Creates an empty listing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a folder.
    pub fn folder(self, id: &str, name: &str, parents: &[&str]) -> Self {
        self.record(id, name, FOLDER, parents)
    }

    /// Adds a plain file.
    pub fn file(self, id: &str, name: &str, parents: &[&str]) -> Self {
        self.record(id, name, "text/plain", parents)
    }

    /// Adds a record with an explicit MIME type.
    pub fn record(mut self, id: &str, name: &str, mime_type: &str, parents: &[&str]) -> Self {
        self.records.push(json!({
            "id": id,
            "name": name,
            "mimeType": mime_type,
            "parents": parents,
            "webViewLink": format!("https://drive.google.com/file/d/{id}/view"),
            "owners": [{"emailAddress": "owner@x.com"}],
        }));
        self
    }

    /// The listing as JSON Lines.
    pub fn to_jsonl(&self) -> String {
        self.records
            .iter()
            .map(|r| format!("{r}\n"))
            .collect()
    }

    /// Writes `<dir>/<principal>.jsonl`.
    pub fn write_to(&self, dir: &Path, principal: &str) {
        fs::write(dir.join(format!("{principal}.jsonl")), self.to_jsonl()).unwrap();
    }

    /// Writes the listing split into page files of `page_size` records.
    pub fn write_pages(&self, dir: &Path, principal: &str, page_size: usize) {
        for (i, chunk) in self.records.chunks(page_size).enumerate() {
            let body: String = chunk.iter().map(|r| format!("{r}\n")).collect();
            fs::write(
                dir.join(format!("{principal}.page-{:04}.jsonl", i + 1)),
                body,
            )
            .unwrap();
        }
    }
}
