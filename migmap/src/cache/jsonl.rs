//! JSON Lines encoding of item listings.

use crate::error::Result;
use crate::item::LiveItem;

/// Encodes items as JSON Lines, one item per line.
///
/// # Errors
///
/// Returns an error if an item cannot be serialized.
pub fn encode_items(items: &[LiveItem]) -> Result<String> {
    let lines = items
        .iter()
        .map(serde_json::to_string)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

/// Decodes JSON Lines into items.
///
/// Blank lines are ignored. Malformed lines are logged and skipped so that
/// one damaged record does not discard the whole listing.
#[must_use]
pub fn decode_items(payload: &str) -> Vec<LiveItem> {
    payload
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(n, line)| match serde_json::from_str(line) {
            Ok(item) => Some(item),
            Err(e) => {
                log::error!("skipping malformed cached item on line {}: {e}", n + 1);
                None
            }
        })
        .collect()
}
