//! Copy-number suffixes.
//!
//! When several source items share a path, the migration tool renames all
//! but the first by inserting ` (N)` before the extension: `report.pdf`,
//! `report (1).pdf`, `report (2).pdf`. Matching walks those candidates in
//! order; reporting parses them back out of unmatched paths.

use crate::path::SEPARATOR;

/// Longest trailing extension recognized when parsing copy numbers.
const MAX_EXTENSION_LEN: usize = 5;

/// Byte offset of the extension dot in the last segment of `path`.
///
/// A leading dot (a hidden file) is not an extension.
fn extension_start(path: &str) -> Option<usize> {
    let segment_start = path.rfind(SEPARATOR).map_or(0, |i| i + 1);
    let dot = path[segment_start..].rfind('.')? + segment_start;
    (dot > segment_start).then_some(dot)
}

/// Returns `path` with copy number `n` applied.
///
/// Copy number zero is the path itself.
///
/// # Examples
///
/// ```
/// use migmap::reconcile::with_copy_number;
///
/// assert_eq!(with_copy_number("/A/report.pdf", 0), "/A/report.pdf");
/// assert_eq!(with_copy_number("/A/report.pdf", 2), "/A/report (2).pdf");
/// assert_eq!(with_copy_number("/A/Folder", 1), "/A/Folder (1)");
/// ```
#[must_use]
pub fn with_copy_number(path: &str, n: u32) -> String {
    if n == 0 {
        return path.to_string();
    }
    let suffix = format!(" ({n})");
    match extension_start(path) {
        Some(dot) => format!("{}{}{}", &path[..dot], suffix, &path[dot..]),
        None => format!("{path}{suffix}"),
    }
}

/// Parses the copy number at the end of `path`, ignoring a short extension.
///
/// # Examples
///
/// ```
/// use migmap::reconcile::parse_copy_number;
///
/// assert_eq!(parse_copy_number("/A/report (3).pdf"), Some(3));
/// assert_eq!(parse_copy_number("/A/Folder (12)"), Some(12));
/// assert_eq!(parse_copy_number("/A/report.pdf"), None);
/// ```
#[must_use]
pub fn parse_copy_number(path: &str) -> Option<u32> {
    let stem = match extension_start(path) {
        Some(dot)
            if path.len() - dot - 1 <= MAX_EXTENSION_LEN
                && path[dot + 1..].chars().all(char::is_alphanumeric) =>
        {
            &path[..dot]
        }
        _ => path,
    };

    let inner = stem.strip_suffix(')')?;
    let open = inner.rfind('(')?;
    let digits = &inner[open + 1..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
