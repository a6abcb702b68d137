//! Reconciliation keys and full-path normalization.

use std::fmt;

/// Known encoding corruptions and their corrections.
///
/// These are UTF-8 sequences that were decoded as Windows-1252 somewhere
/// between the source drive and the migration log. Longer sequences come
/// first so that a shorter prefix never pre-empts them.
pub const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("\u{e2}\u{20ac}\u{2122}", "\u{2019}"), // right single quote
    ("\u{e2}\u{20ac}\u{2dc}", "\u{2018}"),  // left single quote
    ("\u{e2}\u{20ac}\u{153}", "\u{201c}"),  // left double quote
    ("\u{e2}\u{20ac}\u{9d}", "\u{201d}"),   // right double quote
    ("\u{e2}\u{20ac}\u{201c}", "\u{2013}"), // en dash
    ("\u{e2}\u{20ac}\u{201d}", "\u{2014}"), // em dash
    ("\u{e2}\u{20ac}\u{a6}", "\u{2026}"),   // ellipsis
    ("\u{c3}\u{a9}", "\u{e9}"),             // e acute
    ("\u{c3}\u{a8}", "\u{e8}"),             // e grave
    ("\u{c3}\u{a1}", "\u{e1}"),             // a acute
    ("\u{c3}\u{b3}", "\u{f3}"),             // o acute
    ("\u{c3}\u{bc}", "\u{fc}"),             // u umlaut
    ("\u{c3}\u{b6}", "\u{f6}"),             // o umlaut
    ("\u{c2}\u{a0}", "\u{a0}"),             // no-break space
];

/// Trims a full path and repairs known encoding corruption.
///
/// # Examples
///
/// ```
/// use migmap::reconcile::normalize_full_path;
///
/// assert_eq!(normalize_full_path("  /Docs/a.txt "), "/Docs/a.txt");
/// assert_eq!(normalize_full_path("/Bob\u{e2}\u{20ac}\u{2122}s"), "/Bob\u{2019}s");
/// ```
#[must_use]
pub fn normalize_full_path(path: &str) -> String {
    let mut normalized = path.trim().to_string();
    for (corrupt, fixed) in SUBSTITUTIONS {
        if normalized.contains(corrupt) {
            normalized = normalized.replace(corrupt, fixed);
        }
    }
    normalized
}

/// Composite index key: principal, destination type and normalized path.
///
/// The path is always normalized on construction, so keys built from a log
/// row and from a live path compare equal whenever the repaired strings do.
///
/// # Examples
///
/// ```
/// use migmap::reconcile::ReconciliationKey;
///
/// let a = ReconciliationKey::new("a@x.com", "file", "/Docs/f.txt ");
/// let b = ReconciliationKey::new("a@x.com", "file", "/Docs/f.txt");
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReconciliationKey {
    principal: String,
    destination_type: String,
    full_path: String,
}

impl ReconciliationKey {
    /// Builds a key, normalizing `full_path`.
    #[must_use]
    pub fn new(principal: &str, destination_type: &str, full_path: &str) -> Self {
        Self {
            principal: principal.trim().to_string(),
            destination_type: destination_type.trim().to_string(),
            full_path: normalize_full_path(full_path),
        }
    }

    /// The principal part of the key.
    #[must_use]
    pub fn principal(&self) -> &str {
        &self.principal
    }

    /// The destination type part of the key.
    #[must_use]
    pub fn destination_type(&self) -> &str {
        &self.destination_type
    }

    /// The normalized full path part of the key.
    #[must_use]
    pub fn full_path(&self) -> &str {
        &self.full_path
    }
}

impl fmt::Display for ReconciliationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}::{}",
            self.principal, self.destination_type, self.full_path
        )
    }
}
