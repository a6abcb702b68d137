//! Path resolution for multi-parent drive listings.
//!
//! A drive listing is flat: every item names its parents by identifier, and
//! an item may have more than one parent. This module turns such a listing
//! into full slash-delimited paths.
//!
//! # Key Concepts
//!
//! ## Multiple paths
//!
//! An item with two parents is reachable along two root-to-item traversals
//! and therefore owns two paths. Counts compose: a child of parents with 1 and
//! 2 paths owns 3 paths.
//!
//! ## Unknown parents
//!
//! A parent identifier that is not part of the listing (a shared drive root,
//! for example) contributes an empty segment, so its children resolve as if
//! they were roots.
//!
//! ## Cycles
//!
//! The listing comes from an external system, so cycles are detected rather
//! than assumed absent. A cycle fails the whole resolution pass with
//! [`Error::CycleDetected`](crate::Error::CycleDetected).
//!
//! # Examples
//!
//! ```
//! use migmap::{ItemKind, LiveItem};
//! use migmap::path::PathResolver;
//!
//! let items = vec![
//!     LiveItem::new("a", "A", ItemKind::Folder, Vec::<String>::new()),
//!     LiveItem::new("b", "B", ItemKind::Folder, Vec::<String>::new()),
//!     LiveItem::new("f", "f.txt", ItemKind::File, ["a", "b"]),
//! ];
//!
//! let paths = PathResolver::new().resolve(&items).unwrap();
//! assert_eq!(paths.get("f").len(), 2);
//! ```

pub mod resolver;
mod types;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use resolver::PathResolver;
pub use types::{join_segment, ResolvedPaths, SEPARATOR};
