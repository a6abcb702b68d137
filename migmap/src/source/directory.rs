//! A live item source backed by exported listing files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::item::LiveItem;
use crate::source::record::DriveFileRecord;
use crate::source::LiveItemSource;

/// Every this many pages a progress line is logged.
pub const PROGRESS_PAGE_INTERVAL: usize = 5;

/// Reads listings from a directory of JSON Lines exports.
///
/// For a principal `p` the source reads `p.jsonl` if present, otherwise the
/// pages `p.page-0001.jsonl`, `p.page-0002.jsonl`, ... until the first
/// missing page. Each line is one provider file record. A sibling
/// `p.error` file makes the listing fail with its lines as the provider's
/// error messages. A principal with no files has no items.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    /// Creates a source reading from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory listings are read from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file(&self, principal: &str, suffix: &str) -> PathBuf {
        self.dir.join(format!("{principal}{suffix}"))
    }

    fn page_file(&self, principal: &str, page: usize) -> PathBuf {
        self.file(principal, &format!(".page-{page:04}.jsonl"))
    }

    fn read_page(path: &Path, items: &mut Vec<LiveItem>) -> Result<()> {
        let content = fs::read_to_string(path)?;
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            let record: DriveFileRecord = serde_json::from_str(line)?;
            match record.into_live_item() {
                Some(item) => items.push(item),
                None => log::debug!("skipping record without id in {}", path.display()),
            }
        }
        Ok(())
    }

    fn provider_errors(&self, principal: &str) -> Result<Option<Vec<String>>> {
        match fs::read_to_string(self.file(principal, ".error")) {
            Ok(content) => Ok(Some(
                content
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from)
                    .collect(),
            )),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl LiveItemSource for DirectorySource {
    fn list_items(&self, principal: &str, label: &str) -> Result<Vec<LiveItem>> {
        if principal.contains(['/', '\\']) || principal.starts_with('.') {
            return Err(Error::InvalidPath {
                path: self.file(principal, ""),
                reason: "principal is not a plain file name".into(),
            });
        }

        if let Some(messages) = self.provider_errors(principal)? {
            return Err(Error::Source {
                principal: principal.to_string(),
                messages,
            });
        }

        let mut items = Vec::new();
        let single = self.file(principal, ".jsonl");
        if single.is_file() {
            Self::read_page(&single, &mut items)?;
            return Ok(items);
        }

        let mut page = 1;
        loop {
            let path = self.page_file(principal, page);
            if !path.is_file() {
                break;
            }
            if page % PROGRESS_PAGE_INTERVAL == 0 {
                log::info!("Fetching page {page} for {label}...");
            }
            Self::read_page(&path, &mut items)?;
            page += 1;
        }

        Ok(items)
    }
}
