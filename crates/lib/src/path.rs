//! Path addressing for the configuration tree.
//!
//! A path is a string of segments separated by [`DELIMITER`]. The empty path
//! and the single segment `/` denote the root itself. A segment beginning
//! with [`SIGIL`] is a list directive addressing an element of a list node;
//! every other segment (including the empty one) is a map key.
//!
//! Directive grammar, after the sigil:
//!
//! ```text
//! <directive> ::= "next"
//!               | "before" [" " <tail>]
//!               | "after"  [" " <tail>]
//!               | <tail>
//! <tail>      ::= "last" | <decimal-digits>
//! ```
//!
//! `before`/`after` are inserting directives: resolving them for a write
//! inserts a `Null` placeholder at the resolved index before the target is
//! addressed. Read-only resolution never inserts.

/// Separates path segments.
pub const DELIMITER: char = '/';

/// Upper bound on a directive tail index. A larger tail reads as
/// unparseable (zero), which keeps resolved indices — and the list growth a
/// write at such an index would trigger — bounded.
pub const MAX_INDEX: usize = 1 << 20;

/// Marks a segment as a list directive.
pub const SIGIL: char = '@';

/// One step of a parsed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Addresses a map entry.
    Key(String),
    /// Addresses a list element.
    Directive(Directive),
}

impl Segment {
    /// Classifies a raw segment. Only the leading sigil decides; the
    /// directive body is parsed leniently, never rejected.
    pub fn parse(raw: &str) -> Segment {
        match raw.strip_prefix(SIGIL) {
            Some(body) => Segment::Directive(Directive::parse(body)),
            None => Segment::Key(raw.to_string()),
        }
    }

    /// Returns true for a list directive.
    pub fn is_directive(&self) -> bool {
        matches!(self, Segment::Directive(_))
    }
}

/// Position anchor of a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Bare tail: a literal position.
    At,
    /// The append position (current length).
    Next,
    /// Insert before the tail position.
    Before,
    /// Insert after the tail position (`after i` == `before i + 1`).
    After,
}

/// Tail of a directive: `last` or a literal index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tail {
    Last,
    Index(usize),
}

/// A parsed list directive.
///
/// Resolution is additive over the anchor and tail contributions: `@next`
/// starts from the list length, `@after` adds one, `last` adds the length
/// and then steps back once unless the running index is zero (so
/// `before`/`after last` on an empty list is index 0), and an absent,
/// non-numeric, or out-of-range (above [`MAX_INDEX`]) tail contributes
/// zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive {
    pub anchor: Anchor,
    pub tail: Tail,
}

impl Directive {
    /// Parses the directive body (the text after the sigil).
    pub fn parse(body: &str) -> Directive {
        let (anchor, rest) = if let Some(rest) = body.strip_prefix("next") {
            (Anchor::Next, rest)
        } else if let Some(rest) = body.strip_prefix("before") {
            (Anchor::Before, rest)
        } else if let Some(rest) = body.strip_prefix("after") {
            (Anchor::After, rest)
        } else {
            (Anchor::At, body)
        };
        let rest = rest.strip_prefix(' ').unwrap_or(rest);
        let tail = if rest.starts_with("last") {
            Tail::Last
        } else {
            Tail::Index(leading_decimal(rest))
        };
        Directive { anchor, tail }
    }

    /// Resolves the directive to an index against a list of length `len`.
    pub fn resolve(&self, len: usize) -> usize {
        let mut index = match self.anchor {
            Anchor::Next => len,
            Anchor::After => 1,
            Anchor::At | Anchor::Before => 0,
        };
        match self.tail {
            Tail::Last => {
                index += len;
                // when the list is empty, (before|after) last == 0
                index = index.saturating_sub(1);
            }
            Tail::Index(i) => index += i,
        }
        index
    }

    /// Returns true if write-mode resolution inserts a placeholder at the
    /// resolved index.
    pub fn inserts(&self) -> bool {
        matches!(self.anchor, Anchor::Before | Anchor::After)
    }
}

/// Returns true if `path` denotes the root itself.
pub fn is_root(path: &str) -> bool {
    path.is_empty() || path == "/"
}

/// Splits a non-root path into segments. Empty segments are preserved as
/// empty map keys.
pub fn split(path: &str) -> Vec<Segment> {
    path.split(DELIMITER).map(Segment::parse).collect()
}

fn leading_decimal(s: &str) -> usize {
    let digits: &str = &s[..s.bytes().take_while(u8::is_ascii_digit).count()];
    match digits.parse::<usize>() {
        Ok(index) if index <= MAX_INDEX => index,
        _ => 0,
    }
}
