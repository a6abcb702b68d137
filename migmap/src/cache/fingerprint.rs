//! Query shapes and their fingerprints.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Item fields requested from the drive provider.
const DEFAULT_FIELDS: &[&str] = &[
    "id",
    "name",
    "mimeType",
    "parents",
    "webViewLink",
    "owners(emailAddress)",
    "lastModifyingUser(emailAddress)",
    "viewedByMeTime",
    "createdTime",
    "size",
    "shared",
    "originalFilename",
    "sha256Checksum",
    "resourceKey",
    "fullFileExtension",
    "fileExtension",
];

/// Parameters that determine which items a listing returns and in which
/// order.
///
/// Two listings fetched with equal shapes are interchangeable, so the shape's
/// fingerprint is part of every cache key. Changing any field invalidates
/// existing cache entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryShape {
    /// Storage space queried.
    pub spaces: String,
    /// Requested item fields.
    pub fields: Vec<String>,
    /// Listing order. Creation order decides which duplicate gets which
    /// copy number.
    pub order_by: String,
    /// Corpora searched.
    pub corpora: String,
    /// Whether shared drives are included.
    pub include_all_drives: bool,
    /// Items per page.
    pub page_size: u32,
}

impl Default for QueryShape {
    fn default() -> Self {
        Self {
            spaces: "drive".into(),
            fields: DEFAULT_FIELDS.iter().map(|f| (*f).to_string()).collect(),
            order_by: "createdTime".into(),
            corpora: "allDrives".into(),
            include_all_drives: true,
            page_size: 1000,
        }
    }
}

impl QueryShape {
    /// Lowercase hex SHA-256 of the shape's canonical JSON form.
    ///
    /// # Examples
    ///
    /// ```
    /// use migmap::cache::QueryShape;
    ///
    /// let fingerprint = QueryShape::default().fingerprint();
    /// assert_eq!(fingerprint.len(), 64);
    /// assert_eq!(fingerprint, QueryShape::default().fingerprint());
    /// ```
    #[must_use]
    pub fn fingerprint(&self) -> String {
        // Field order is fixed by the struct, so the serialization is stable.
        let canonical = serde_json::to_string(self).unwrap_or_default();
        format!("{:x}", Sha256::digest(canonical.as_bytes()))
    }
}
