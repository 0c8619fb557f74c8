//! The configuration store: root ownership, traversal, auto-vivifying
//! writes, and the persistence lifecycle.
//!
//! A [`Store`] exclusively owns the root [`Node`] of one configuration
//! document. Reads go through [`Store::traverse`] (never mutates); writes go
//! through [`Store::set_item`] (creates intermediate containers on demand).
//! Every successful write marks the store dirty; a dirty store bound to a
//! non-empty source flushes itself on drop, best effort.
//!
//! A `Store` is single-writer: there is no internal locking, and callers
//! sharing one instance must serialize access externally (see
//! [`crate::registry`]).

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path as FsPath, PathBuf};

use tracing::{debug, error, info, trace, warn};

use crate::codec;
use crate::node::{Node, NodeKind};
use crate::path::{self, Segment};
use crate::{Error, Result};

/// A mutable configuration tree with path addressing and YAML persistence.
///
/// # Examples
///
/// ```
/// use conftree::Store;
///
/// let mut store = Store::new();
/// store.set_item("menu/page_size", 9)?;
/// store.set_item("menu/alternative_select_keys", "ABCDEF")?;
/// assert_eq!(store.get_int("menu/page_size"), Some(9));
/// # Ok::<(), conftree::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct Store {
    root: Node,
    source: PathBuf,
    dirty: bool,
}

impl Store {
    /// Creates an empty store with no bound source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store bound to `file` and loads its content.
    ///
    /// A missing or malformed file leaves the store empty; the source stays
    /// bound so a later save (explicit or on drop) targets it.
    pub fn open(file: impl Into<PathBuf>) -> Self {
        let mut store = Store::new();
        // failures are logged inside load_from_file
        let _ = store.load_from_file(file);
        store
    }

    /// The root node. `Null` when nothing has been loaded or set.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// True if the tree changed since the last load/save.
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the store as changed, forcing a flush on drop.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// The bound source path; empty when the store is in-memory only.
    pub fn source(&self) -> &FsPath {
        &self.source
    }

    // ===== Traversal =====

    /// Read-only walk to the node at `path`.
    ///
    /// Never mutates the tree and never creates intermediate containers:
    /// absent segments and kind mismatches yield `None`. The root path (`""`
    /// or `"/"`) always resolves to the root node, which may be `Null`.
    pub fn traverse(&self, path: &str) -> Option<&Node> {
        trace!(%path, "traverse");
        if path::is_root(path) {
            return Some(&self.root);
        }
        let mut current = &self.root;
        for segment in path::split(path) {
            current = match segment {
                Segment::Key(key) => current.as_map()?.get(&key)?,
                Segment::Directive(directive) => {
                    let list = current.as_list()?;
                    list.get(directive.resolve(list.len()))?
                }
            };
        }
        Some(current)
    }

    /// Mutable variant of [`Store::traverse`]. Still a read-mode walk:
    /// nothing is created or inserted, and the dirty flag is untouched —
    /// callers mutating through the result mark the store themselves.
    pub fn traverse_mut(&mut self, path: &str) -> Option<&mut Node> {
        if path::is_root(path) {
            return Some(&mut self.root);
        }
        let mut current = &mut self.root;
        for segment in path::split(path) {
            current = match segment {
                Segment::Key(key) => current.as_map_mut()?.get_mut(&key)?,
                Segment::Directive(directive) => {
                    let list = current.as_list_mut()?;
                    let index = directive.resolve(list.len());
                    list.get_mut(index)?
                }
            };
        }
        Some(current)
    }

    // ===== Writing =====

    /// Writes `item` at `path`, creating intermediate containers as needed.
    ///
    /// The empty path or `"/"` replaces the root wholesale. Otherwise an
    /// absent root is first created as an empty map, and the walk resolves
    /// one segment at a time: a directive segment requires a list, anything
    /// else a map. Absent intermediates are created by looking ahead at the
    /// *next* segment (directive → list, key → map); `@before`/`@after`
    /// directives insert their `Null` placeholder during the walk; bare
    /// indices beyond the end grow the list sparsely.
    ///
    /// A kind mismatch anywhere aborts with [`Error::TypeMismatch`].
    /// Mutations already performed by earlier, successful steps (root
    /// vivification, directive inserts, sparse growth) are not rolled back.
    pub fn set_item(&mut self, path: &str, item: impl Into<Node>) -> Result<()> {
        let item = item.into();
        debug!(%path, "write");
        if path::is_root(path) {
            self.root = item;
            self.dirty = true;
            return Ok(());
        }
        if self.root.is_null() {
            self.root = Node::map();
        }
        let segments = path::split(path);
        let last = segments.len() - 1;
        let mut current = &mut self.root;
        for i in 0..last {
            current = Self::descend(current, &segments[i], &segments[i + 1], path)?;
        }
        match &segments[last] {
            Segment::Key(key) => {
                let map = expect_map(current, path)?;
                map.insert(key.clone(), item);
            }
            Segment::Directive(directive) => {
                let list = expect_list(current, path)?;
                let index = directive.resolve(list.len());
                if directive.inserts() {
                    insert_placeholder(list, index);
                }
                if index >= list.len() {
                    list.resize(index + 1, Node::Null);
                }
                list[index] = item;
            }
        }
        self.dirty = true;
        Ok(())
    }

    /// One intermediate step of the write walk: resolve `segment` against
    /// `current` and return the child, creating it per `next` if absent.
    fn descend<'t>(
        current: &'t mut Node,
        segment: &Segment,
        next: &Segment,
        path: &str,
    ) -> Result<&'t mut Node> {
        let child = match segment {
            Segment::Key(key) => {
                let map = expect_map(current, path)?;
                map.entry(key.clone()).or_insert(Node::Null)
            }
            Segment::Directive(directive) => {
                let list = expect_list(current, path)?;
                let index = directive.resolve(list.len());
                if directive.inserts() {
                    insert_placeholder(list, index);
                }
                if index >= list.len() {
                    list.resize(index + 1, Node::Null);
                }
                &mut list[index]
            }
        };
        if child.is_null() {
            *child = fresh_container(next);
            trace!(%path, kind = %child.kind(), "created intermediate container");
        }
        Ok(child)
    }

    // ===== Typed facade =====

    /// Reads a boolean at `path`. `None` on absence, wrong kind, or a value
    /// that is not (case-insensitively) `true`/`false`.
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.traverse(path)?.as_bool()
    }

    /// Reads an integer at `path` (hex `0x` literals accepted).
    pub fn get_int(&self, path: &str) -> Option<i64> {
        self.traverse(path)?.as_int()
    }

    /// Reads a float at `path`.
    pub fn get_f64(&self, path: &str) -> Option<f64> {
        self.traverse(path)?.as_f64()
    }

    /// Reads a scalar's string content at `path`.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.traverse(path)?.as_str()
    }

    /// True when `path` is absent or holds `Null`.
    pub fn is_null(&self, path: &str) -> bool {
        self.traverse(path).is_none_or(Node::is_null)
    }

    /// The kind of the node at `path`, or `None` when absent.
    pub fn kind_at(&self, path: &str) -> Option<NodeKind> {
        self.traverse(path).map(Node::kind)
    }

    // ===== Persistence =====

    /// Parses a YAML document from `reader` and replaces the root.
    ///
    /// The stream form leaves the bound source and the dirty flag alone, and
    /// a parse failure leaves the previous root in place.
    pub fn load_from_reader(&mut self, mut reader: impl Read) -> Result<()> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        self.root = codec::decode_str(&text)?;
        Ok(())
    }

    /// Emits the tree as YAML into `writer`.
    pub fn save_to_writer(&self, mut writer: impl Write) -> Result<()> {
        writer.write_all(codec::encode(&self.root).as_bytes())?;
        Ok(())
    }

    /// Binds `file` as the source and loads it, replacing the root.
    ///
    /// The dirty flag is reset and the root cleared before reading, so a
    /// missing file or a parse failure leaves an empty tree — the source
    /// stays remembered for later save attempts.
    pub fn load_from_file(&mut self, file: impl Into<PathBuf>) -> Result<()> {
        let file = file.into();
        self.source = file.clone();
        self.dirty = false;
        self.root = Node::Null;
        let text = match fs::read_to_string(&file) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!(file = %file.display(), "nonexistent config file");
                return Err(err.into());
            }
            Err(err) => return Err(err.into()),
        };
        info!(file = %file.display(), "loading config file");
        match codec::decode_str(&text) {
            Ok(root) => {
                self.root = root;
                Ok(())
            }
            Err(err) => {
                error!(file = %file.display(), %err, "error parsing YAML");
                Err(err)
            }
        }
    }

    /// Binds `file` as the source and writes the tree to it as YAML.
    /// Resets the dirty flag.
    pub fn save_to_file(&mut self, file: impl Into<PathBuf>) -> Result<()> {
        let file = file.into();
        self.source = file.clone();
        self.dirty = false;
        if file.as_os_str().is_empty() {
            // not really saving
            return Err(Error::NoSource);
        }
        info!(file = %file.display(), "saving config file");
        fs::write(&file, codec::encode(&self.root))?;
        Ok(())
    }

    /// Saves to the bound source. Fails with [`Error::NoSource`] when the
    /// store is in-memory only.
    pub fn save(&mut self) -> Result<()> {
        if self.source.as_os_str().is_empty() {
            return Err(Error::NoSource);
        }
        let file = self.source.clone();
        self.save_to_file(file)
    }
}

impl Drop for Store {
    /// Best-effort flush: a dirty store bound to a non-empty source saves
    /// itself. Failure is logged and discarded — callers needing guaranteed
    /// persistence call [`Store::save`] explicitly.
    fn drop(&mut self) {
        if self.dirty && !self.source.as_os_str().is_empty() {
            if let Err(err) = self.save() {
                warn!(source = %self.source.display(), %err, "failed to flush config on drop");
            }
        }
    }
}

fn fresh_container(next: &Segment) -> Node {
    if next.is_directive() { Node::list() } else { Node::map() }
}

/// Inserts the `Null` placeholder an inserting directive addresses, growing
/// the list first when the index is past the end.
fn insert_placeholder(list: &mut Vec<Node>, index: usize) {
    if index > list.len() {
        list.resize(index, Node::Null);
    }
    list.insert(index, Node::Null);
}

fn expect_map<'t>(node: &'t mut Node, at: &str) -> Result<&'t mut BTreeMap<String, Node>> {
    let found = node.kind();
    node.as_map_mut().ok_or_else(|| Error::TypeMismatch {
        at: at.to_string(),
        expected: NodeKind::Map,
        found,
    })
}

fn expect_list<'t>(node: &'t mut Node, at: &str) -> Result<&'t mut Vec<Node>> {
    let found = node.kind();
    node.as_list_mut().ok_or_else(|| Error::TypeMismatch {
        at: at.to_string(),
        expected: NodeKind::List,
        found,
    })
}
