//! Live drive items and their matched, annotated form.
//!
//! A [`LiveItem`] is one entry of a principal's drive listing. Items form a
//! multi-parent DAG through their `parents` identifiers. A [`MatchedItem`] is
//! one resolved path of a live item that was claimed against a migration log
//! row, carrying the destination fields from that row.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Drive MIME type for folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Drive MIME type for forms.
pub const FORM_MIME_TYPE: &str = "application/vnd.google-apps.form";

/// Type classification of a live item.
///
/// # Examples
///
/// ```
/// use migmap::ItemKind;
///
/// assert_eq!(ItemKind::from_mime_type(Some("application/vnd.google-apps.folder")), ItemKind::Folder);
/// assert_eq!(ItemKind::from_mime_type(Some("application/pdf")), ItemKind::File);
/// assert_eq!(ItemKind::Form.destination_type(), "MicrosoftForm");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A regular file.
    #[default]
    File,
    /// A folder.
    Folder,
    /// A form, migrated to a form-submission endpoint.
    Form,
}

impl ItemKind {
    /// Classifies a drive MIME type.
    #[must_use]
    pub fn from_mime_type(mime_type: Option<&str>) -> Self {
        match mime_type {
            Some(FOLDER_MIME_TYPE) => Self::Folder,
            Some(FORM_MIME_TYPE) => Self::Form,
            _ => Self::File,
        }
    }

    /// The destination type string the migration log uses for this kind.
    #[must_use]
    pub const fn destination_type(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
            Self::Form => "MicrosoftForm",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Folder => write!(f, "folder"),
            Self::Form => write!(f, "form"),
        }
    }
}

/// One item of a principal's live drive listing.
///
/// The metadata fields are passed through to the output dataset untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveItem {
    /// Stable external identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Type classification.
    #[serde(default)]
    pub kind: ItemKind,
    /// Parent identifiers; empty for roots.
    #[serde(default)]
    pub parents: Vec<String>,
    /// Web link to the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Owner address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Last time the principal viewed the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_viewed: Option<String>,
    /// Address of the last modifying user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modifying_user: Option<String>,
}

impl LiveItem {
    /// Creates an item with no metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// use migmap::{ItemKind, LiveItem};
    ///
    /// let item = LiveItem::new("f1", "f.txt", ItemKind::File, ["d1"]);
    /// assert_eq!(item.parents, vec!["d1".to_string()]);
    /// ```
    #[must_use]
    pub fn new<I, S>(id: impl Into<String>, name: impl Into<String>, kind: ItemKind, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            parents: parents.into_iter().map(Into::into).collect(),
            url: None,
            owner: None,
            last_viewed: None,
            last_modifying_user: None,
        }
    }
}

/// A live item under one resolved path, annotated with its destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedItem {
    /// The live item.
    pub item: LiveItem,
    /// The resolved full path this match was made under.
    pub path: String,
    /// Destination location from the claimed log row.
    pub destination_location: String,
    /// Destination type from the claimed log row.
    pub destination_type: String,
    /// Destination location relative to its host.
    pub destination_path: String,
}
