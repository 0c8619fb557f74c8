//! Ergonomic cursors over a store.
//!
//! An [`EntryRef`] pairs exclusive store access with a path, so a chain like
//! `store.root_entry().key("menu").at(0)` reads naturally while every
//! operation still flows through the store's traversal and write rules.
//! Chaining only extends the path; containers come into being at the first
//! write through the cursor, exactly as a direct [`Store::set_item`] would
//! create them.
//!
//! Typed reads never fail: absence and kind mismatches yield the type's
//! zero value, which keeps option lookups one-liners at call sites that do
//! not care whether the option was ever set.

use tracing::trace;

use crate::node::{Node, NodeKind};
use crate::path::{DELIMITER, SIGIL};
use crate::store::Store;
use crate::Result;

impl Store {
    /// A cursor at `path`. The root path (`""` or `"/"`) addresses the root.
    pub fn entry(&mut self, path: impl Into<String>) -> EntryRef<'_> {
        let path = path.into();
        let path = if crate::path::is_root(&path) { String::new() } else { path };
        EntryRef { store: self, path }
    }

    /// A cursor at the root node.
    pub fn root_entry(&mut self) -> EntryRef<'_> {
        self.entry("")
    }
}

/// A mutable cursor into one position of a store's tree.
#[derive(Debug)]
pub struct EntryRef<'a> {
    store: &'a mut Store,
    path: String,
}

impl<'a> EntryRef<'a> {
    /// The path this cursor addresses.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn node(&self) -> Option<&Node> {
        self.store.traverse(&self.path)
    }

    // ===== Navigation =====

    /// Narrows the cursor to map entry `key`.
    pub fn key(mut self, key: &str) -> EntryRef<'a> {
        if !self.path.is_empty() {
            self.path.push(DELIMITER);
        }
        self.path.push_str(key);
        self
    }

    /// Narrows the cursor to list element `index` (a bare `@index` step, so
    /// writes through the result grow the list as needed).
    pub fn at(mut self, index: usize) -> EntryRef<'a> {
        if !self.path.is_empty() {
            self.path.push(DELIMITER);
        }
        self.path.push(SIGIL);
        self.path.push_str(&index.to_string());
        self
    }

    // ===== Inspection =====

    /// True when the position is absent or holds `Null`.
    pub fn is_null(&self) -> bool {
        self.node().is_none_or(Node::is_null)
    }

    /// True when the position holds a scalar.
    pub fn is_value(&self) -> bool {
        self.node().is_some_and(Node::is_scalar)
    }

    /// True when the position holds a list.
    pub fn is_list(&self) -> bool {
        self.node().is_some_and(Node::is_list)
    }

    /// True when the position holds a map.
    pub fn is_map(&self) -> bool {
        self.node().is_some_and(Node::is_map)
    }

    /// The kind at the position, or `None` when the path does not resolve.
    pub fn kind(&self) -> Option<NodeKind> {
        self.node().map(Node::kind)
    }

    /// List length at the position; 0 for anything that is not a list.
    pub fn len(&self) -> usize {
        self.node().and_then(Node::list_len).unwrap_or(0)
    }

    /// True when the position is not a list or the list is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the position is a map containing `key`.
    pub fn has_key(&self, key: &str) -> bool {
        self.node().is_some_and(|node| node.contains_key(key))
    }

    // ===== Coercing reads =====

    /// The boolean at the position, or `false`.
    pub fn to_bool(&self) -> bool {
        self.node().and_then(Node::as_bool).unwrap_or_default()
    }

    /// The integer at the position, or `0`.
    pub fn to_int(&self) -> i64 {
        self.node().and_then(Node::as_int).unwrap_or_default()
    }

    /// The float at the position, or `0.0`.
    pub fn to_f64(&self) -> f64 {
        self.node().and_then(Node::as_f64).unwrap_or_default()
    }

    /// The scalar text at the position, or the empty string.
    pub fn to_text(&self) -> String {
        self.node().and_then(Node::as_str).unwrap_or_default().to_string()
    }

    // ===== Writes =====

    /// Writes `value` at the position, vivifying intermediates.
    pub fn set(&mut self, value: impl Into<Node>) -> Result<()> {
        self.store.set_item(&self.path, value)
    }

    /// Writes `Null` at the position. In a map this tombstones the entry
    /// (it disappears on the next save); in a list the slot stays.
    pub fn clear(&mut self) -> Result<()> {
        self.store.set_item(&self.path, Node::Null)
    }

    /// Direct access to the list at the position, replacing whatever was
    /// there with an empty list first when the position is not already one.
    pub fn ensure_list(&mut self) -> Result<&mut Vec<Node>> {
        if !self.node().is_some_and(Node::is_list) {
            trace!(path = %self.path, "replacing entry with an empty list");
            self.store.set_item(&self.path, Node::list())?;
        }
        let node = self.store.traverse_mut(&self.path);
        Ok(node.and_then(Node::as_list_mut).expect("list present after write"))
    }

    /// Direct access to the map at the position, replacing whatever was
    /// there with an empty map first when the position is not already one.
    pub fn ensure_map(&mut self) -> Result<&mut std::collections::BTreeMap<String, Node>> {
        if !self.node().is_some_and(Node::is_map) {
            trace!(path = %self.path, "replacing entry with an empty map");
            self.store.set_item(&self.path, Node::map())?;
        }
        let node = self.store.traverse_mut(&self.path);
        Ok(node.and_then(Node::as_map_mut).expect("map present after write"))
    }

    /// Appends `value` to the list at the position, creating or replacing
    /// the position with a list as needed.
    pub fn append(&mut self, value: impl Into<Node>) -> Result<()> {
        self.ensure_list()?.push(value.into());
        self.store.mark_dirty();
        Ok(())
    }
}
