//! Provider-shaped item records.

use serde::{Deserialize, Serialize};

use crate::item::{ItemKind, LiveItem};

/// An address wrapper as the provider nests it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAddress {
    /// The address.
    #[serde(default)]
    pub email_address: Option<String>,
}

/// One file record as returned by the drive listing API.
///
/// # Examples
///
/// ```
/// use migmap::source::DriveFileRecord;
/// use migmap::ItemKind;
///
/// let record: DriveFileRecord = serde_json::from_str(
///     r#"{"id":"d1","name":"Docs","mimeType":"application/vnd.google-apps.folder"}"#,
/// ).unwrap();
/// let item = record.into_live_item().unwrap();
/// assert_eq!(item.kind, ItemKind::Folder);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFileRecord {
    /// Item identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// MIME type.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Parent identifiers.
    #[serde(default)]
    pub parents: Option<Vec<String>>,
    /// Web link.
    #[serde(default)]
    pub web_view_link: Option<String>,
    /// Owners, first one is reported.
    #[serde(default)]
    pub owners: Option<Vec<EmailAddress>>,
    /// Last modifying user.
    #[serde(default)]
    pub last_modifying_user: Option<EmailAddress>,
    /// Last time the principal viewed the item.
    #[serde(default)]
    pub viewed_by_me_time: Option<String>,
}

impl DriveFileRecord {
    /// Converts the record, or `None` if it has no identifier.
    #[must_use]
    pub fn into_live_item(self) -> Option<LiveItem> {
        let id = self.id.filter(|id| !id.is_empty())?;
        let mut item = LiveItem::new(
            id,
            self.name.unwrap_or_default(),
            ItemKind::from_mime_type(self.mime_type.as_deref()),
            self.parents.unwrap_or_default(),
        );
        item.url = self.web_view_link;
        item.owner = self
            .owners
            .and_then(|owners| owners.into_iter().next())
            .and_then(|owner| owner.email_address);
        item.last_modifying_user = self.last_modifying_user.and_then(|u| u.email_address);
        item.last_viewed = self.viewed_by_me_time;
        Some(item)
    }
}
