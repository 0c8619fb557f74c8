//! Tree node model for hierarchical configuration data.
//!
//! A configuration document is a tree of [`Node`]s. Scalars store every
//! typed value — bool, integer, float — as its string representation; the
//! typed accessors parse and format on demand, and the stored string stays
//! the single source of truth. Containers come in two kinds: an ordered,
//! sparse-safe [`Node::List`] and a key-ordered [`Node::Map`].
//!
//! # Examples
//!
//! ```
//! use conftree::Node;
//!
//! let n = Node::from(31);
//! assert_eq!(n.as_str(), Some("31"));
//! assert_eq!(n.as_int(), Some(31));
//!
//! let hex = Node::from("0x1F");
//! assert_eq!(hex.as_int(), Some(31));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::{Error, Result};

/// The kind of a [`Node`], used in type tests and mismatch errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Null,
    Scalar,
    List,
    Map,
}

impl NodeKind {
    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Null => "null",
            NodeKind::Scalar => "scalar",
            NodeKind::List => "list",
            NodeKind::Map => "map",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in the configuration tree.
///
/// `Null` doubles as the absence of a value: sparse list growth fills
/// intervening slots with it, and map entries holding it vanish from encoded
/// output. The tree is acyclic by construction — a node exclusively owns its
/// children and there is no back-reference mechanism.
///
/// Map entries are enumerated in lexicographic key order (`BTreeMap`), so
/// enumeration and encoding are deterministic.
///
/// Every accessor is total over the node's kind: calling a list operation on
/// a map (or vice versa) reports failure to the caller, it never panics.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Node {
    /// Absence of a value.
    #[default]
    Null,
    /// A single value stored in its string form.
    Scalar(String),
    /// An ordered, index-addressable, resizable sequence.
    List(Vec<Node>),
    /// String keys to child nodes, key-ordered.
    Map(BTreeMap<String, Node>),
}

impl Node {
    /// Returns the kind of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Null => NodeKind::Null,
            Node::Scalar(_) => NodeKind::Scalar,
            Node::List(_) => NodeKind::List,
            Node::Map(_) => NodeKind::Map,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Node::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Node::Map(_))
    }

    /// Creates an empty list node.
    pub fn list() -> Self {
        Node::List(Vec::new())
    }

    /// Creates an empty map node.
    pub fn map() -> Self {
        Node::Map(BTreeMap::new())
    }

    // ===== Scalar accessors =====

    /// Returns the scalar's string content, or `None` if not a scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Parses the scalar as a boolean.
    ///
    /// Case-insensitive exact match against `"true"` / `"false"`; anything
    /// else (including the empty string) fails with `None`.
    pub fn as_bool(&self) -> Option<bool> {
        let s = self.as_str()?;
        if s.eq_ignore_ascii_case("true") {
            Some(true)
        } else if s.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    /// Parses the scalar as an integer.
    ///
    /// A `0x`-prefixed string is first tried as a hexadecimal literal; it is
    /// accepted only if the whole remainder is hex digits, and the unsigned
    /// result is reinterpreted as signed. Otherwise the string must parse as
    /// a decimal integer in full — any non-numeric remainder fails the read.
    pub fn as_int(&self) -> Option<i64> {
        let s = self.as_str()?;
        if s.is_empty() {
            return None;
        }
        if let Some(hex) = s.strip_prefix("0x")
            && !hex.is_empty()
            && let Ok(value) = u64::from_str_radix(hex, 16)
        {
            return Some(value as i64);
        }
        s.parse::<i64>().ok()
    }

    /// Parses the scalar as a float. Failure leaves nothing changed and
    /// reports `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let s = self.as_str()?;
        if s.is_empty() {
            return None;
        }
        s.parse::<f64>().ok()
    }

    // ===== List operations =====

    /// Returns the element count, or `None` if not a list.
    pub fn list_len(&self) -> Option<usize> {
        self.as_list().map(Vec::len)
    }

    /// Returns the element at `index`, or `None` if not a list or out of
    /// bounds.
    pub fn list_get(&self, index: usize) -> Option<&Node> {
        self.as_list()?.get(index)
    }

    /// Mutable variant of [`Node::list_get`].
    pub fn list_get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.as_list_mut()?.get_mut(index)
    }

    /// Sets the element at `index`, growing the list with `Null` slots if
    /// `index` is beyond the current length.
    pub fn list_set(&mut self, index: usize, element: impl Into<Node>) -> Result<()> {
        let list = self.require_list("list_set")?;
        if index >= list.len() {
            list.resize(index + 1, Node::Null);
        }
        list[index] = element.into();
        Ok(())
    }

    /// Inserts an element before `index`, shifting later elements up by one.
    /// An `index` beyond the end grows the list with `Null` slots first.
    pub fn list_insert(&mut self, index: usize, element: impl Into<Node>) -> Result<()> {
        let list = self.require_list("list_insert")?;
        if index > list.len() {
            list.resize(index, Node::Null);
        }
        list.insert(index, element.into());
        Ok(())
    }

    /// Appends an element.
    pub fn list_push(&mut self, element: impl Into<Node>) -> Result<()> {
        self.require_list("list_push")?.push(element.into());
        Ok(())
    }

    /// Resizes the list, filling new slots with `Null`.
    pub fn list_resize(&mut self, len: usize) -> Result<()> {
        self.require_list("list_resize")?.resize(len, Node::Null);
        Ok(())
    }

    /// Removes all elements.
    pub fn list_clear(&mut self) -> Result<()> {
        self.require_list("list_clear")?.clear();
        Ok(())
    }

    // ===== Map operations =====

    /// Returns true if this is a map containing `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.as_map().is_some_and(|m| m.contains_key(key))
    }

    /// Returns the entry under `key`, or `None` if not a map or missing.
    pub fn map_get(&self, key: &str) -> Option<&Node> {
        self.as_map()?.get(key)
    }

    /// Mutable variant of [`Node::map_get`].
    pub fn map_get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.as_map_mut()?.get_mut(key)
    }

    /// Sets the entry under `key`, replacing any previous value.
    ///
    /// This is the non-path API: a key containing `/` or starting with `@`
    /// is legal here, it just cannot be addressed back through a path.
    pub fn map_set(&mut self, key: impl Into<String>, element: impl Into<Node>) -> Result<()> {
        self.require_map("map_set")?.insert(key.into(), element.into());
        Ok(())
    }

    /// Removes all entries.
    pub fn map_clear(&mut self) -> Result<()> {
        self.require_map("map_clear")?.clear();
        Ok(())
    }

    /// Enumerates entries in key order, or `None` if not a map.
    pub fn entries(&self) -> Option<impl Iterator<Item = (&String, &Node)>> {
        self.as_map().map(|m| m.iter())
    }

    // ===== Container views =====

    /// Returns the underlying sequence if this is a list.
    pub fn as_list(&self) -> Option<&Vec<Node>> {
        match self {
            Node::List(list) => Some(list),
            _ => None,
        }
    }

    /// Mutable variant of [`Node::as_list`].
    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::List(list) => Some(list),
            _ => None,
        }
    }

    /// Returns the underlying map if this is a map.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Mutable variant of [`Node::as_map`].
    pub fn as_map_mut(&mut self) -> Option<&mut BTreeMap<String, Node>> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    fn require_list(&mut self, op: &str) -> Result<&mut Vec<Node>> {
        let found = self.kind();
        self.as_list_mut().ok_or(Error::TypeMismatch {
            at: op.to_string(),
            expected: NodeKind::List,
            found,
        })
    }

    fn require_map(&mut self, op: &str) -> Result<&mut BTreeMap<String, Node>> {
        let found = self.kind();
        self.as_map_mut().ok_or(Error::TypeMismatch {
            at: op.to_string(),
            expected: NodeKind::Map,
            found,
        })
    }
}

// Scalar construction formats the typed value into its string form.
impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Scalar(if value { "true" } else { "false" }.to_string())
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Scalar(value.to_string())
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Node::from(value as i64)
    }
}

impl From<u32> for Node {
    fn from(value: u32) -> Self {
        Node::from(value as i64)
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Scalar(value.to_string())
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Scalar(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Scalar(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::List(value)
    }
}

impl From<BTreeMap<String, Node>> for Node {
    fn from(value: BTreeMap<String, Node>) -> Self {
        Node::Map(value)
    }
}
