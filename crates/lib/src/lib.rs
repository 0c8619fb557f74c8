//! A mutable hierarchical configuration tree with path addressing and a
//! YAML persistence layer.
//!
//! The tree is made of [`Node`]s — null, scalar, list, or map — owned by a
//! [`Store`]. Nodes are addressed by slash-delimited paths whose segments
//! are map keys or `@`-prefixed list directives (`@3`, `@last`, `@next`,
//! `@before 2`, `@after last`); writes create intermediate containers on
//! demand. Scalars are stored as their source text and interpreted lazily,
//! so unconventional spellings (`0x1F`, `True`) survive a load/save cycle.
//!
//! A store tracks modification and, when bound to a file, flushes itself on
//! drop. [`Registry`] caches stores by source so independent callers share
//! one tree per file.
//!
//! # Examples
//!
//! ```
//! use conftree::{NodeKind, Store};
//!
//! let mut store = Store::new();
//! store.set_item("style/font_point", 16)?;
//! store.set_item("menu/keys/@next", "A")?;
//! store.set_item("menu/keys/@next", "B")?;
//!
//! assert_eq!(store.get_int("style/font_point"), Some(16));
//! assert_eq!(store.kind_at("menu/keys"), Some(NodeKind::List));
//! assert_eq!(store.get_str("menu/keys/@last"), Some("B"));
//! # Ok::<(), conftree::Error>(())
//! ```

pub mod codec;
pub mod entry;
pub mod node;
pub mod path;
pub mod registry;
pub mod store;

pub use entry::EntryRef;
pub use node::{Node, NodeKind};
pub use registry::Registry;
pub use store::Store;

/// Result type returned by all fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from tree access and persistence.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying file or stream failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source text is not a usable YAML document.
    #[error("YAML parse error: {reason}")]
    Parse { reason: String },

    /// A path step or typed access met a node of the wrong kind.
    #[error("type mismatch at '{at}': expected {expected}, found {found}")]
    TypeMismatch {
        at: String,
        expected: NodeKind,
        found: NodeKind,
    },

    /// A save was requested on a store with no bound source.
    #[error("store has no bound source to save to")]
    NoSource,

    /// A registry operation named a source that was never opened.
    #[error("no store registered for source '{name}'")]
    UnknownSource { name: String },
}

impl Error {
    /// Checks if the error is a parse failure.
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }

    /// Checks if the error is a node kind mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Error::TypeMismatch { .. })
    }

    /// Checks if the error wraps an I/O failure.
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}
