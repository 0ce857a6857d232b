//! Tree walking over token documents.
//!
//! Every consumer of a [`TokenDocument`] goes through these functions so
//! that traversal order and metadata skipping are the same everywhere.

use crate::document::{Token, TokenDocument, TokenGroup, TokenNode};
use crate::naming::split_words;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Keys starting with this prefix carry metadata, never children.
pub const METADATA_PREFIX: char = '$';

/// Separator of a canonical token name.
pub const PATH_SEPARATOR: char = '/';

/// Whether a document key is a metadata key.
pub fn is_metadata_key(key: &str) -> bool {
    key.starts_with(METADATA_PREFIX)
}

/// An ordered sequence of path segments identifying a token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenPath(pub Vec<String>);

impl TokenPath {
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Parse a canonical name (`Colour/Grey/750`).
    pub fn from_canonical(name: &str) -> Self {
        Self(
            name.split(PATH_SEPARATOR)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    /// Parse an alias reference, which may use `/` or `.` separators.
    pub fn from_reference(reference: &str) -> Self {
        let reference = reference.trim().trim_start_matches('{').trim_end_matches('}');
        if reference.contains(PATH_SEPARATOR) {
            Self::from_canonical(reference)
        } else {
            Self(
                reference
                    .split('.')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
            )
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The canonical name: segments joined by `/`.
    pub fn canonical(&self) -> String {
        self.0.join("/")
    }

    pub fn leaf(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a segment.
    pub fn child(&self, segment: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.to_string());
        Self(segments)
    }

    /// Whether the first segment equals `prefix` (case-insensitive).
    pub fn starts_with_segment(&self, prefix: &str) -> bool {
        self.first()
            .map_or(false, |first| first.eq_ignore_ascii_case(prefix))
    }

    /// The path without its first segment.
    pub fn strip_first(&self) -> Self {
        Self(self.0.iter().skip(1).cloned().collect())
    }

    /// Whether any segment holds `needle` as whole words, case-insensitive.
    /// `borderRadius` and `radius-sm` hold `radius`; `Promotion` does not
    /// hold `motion`. Trailing digits are ignored (`elevation2`).
    pub fn contains_word(&self, needle: &str) -> bool {
        let needle = lowercase_words(needle);
        if needle.is_empty() {
            return false;
        }
        self.0.iter().any(|segment| {
            lowercase_words(segment)
                .windows(needle.len())
                .any(|window| window == needle.as_slice())
        })
    }
}

fn lowercase_words(text: &str) -> Vec<String> {
    split_words(text)
        .into_iter()
        .map(|word| {
            let word = word.to_lowercase();
            match word.trim_end_matches(|c: char| c.is_ascii_digit()) {
                "" => word.clone(),
                stem => stem.to_string(),
            }
        })
        .collect()
}

impl fmt::Display for TokenPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl From<&str> for TokenPath {
    fn from(name: &str) -> Self {
        Self::from_canonical(name)
    }
}

impl Serialize for TokenPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical())
    }
}

impl<'de> Deserialize<'de> for TokenPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_canonical(&name))
    }
}

/// All tokens in depth-first, key-insertion order.
pub fn walk(doc: &TokenDocument) -> Vec<(TokenPath, &Token)> {
    walk_where(doc, |_, _| true)
}

/// Tokens accepted by `predicate`, in depth-first, key-insertion order.
pub fn walk_where<'a, F>(doc: &'a TokenDocument, predicate: F) -> Vec<(TokenPath, &'a Token)>
where
    F: Fn(&TokenPath, &Token) -> bool,
{
    let mut out = Vec::new();
    collect(&doc.root, &TokenPath::default(), &predicate, &mut out);
    out
}

fn collect<'a, F>(
    group: &'a TokenGroup,
    prefix: &TokenPath,
    predicate: &F,
    out: &mut Vec<(TokenPath, &'a Token)>,
) where
    F: Fn(&TokenPath, &Token) -> bool,
{
    for (key, node) in &group.children {
        if is_metadata_key(key) {
            continue;
        }
        let path = prefix.child(key);
        match node {
            TokenNode::Token(token) => {
                if predicate(&path, token) {
                    tracing::trace!(path = %path, kind = %token.kind, "walk token");
                    out.push((path, token));
                }
            }
            TokenNode::Group(child) => collect(child, &path, predicate, out),
            TokenNode::Value(_) => {}
        }
    }
}

/// Call `visitor` for every token, in walk order.
pub fn visit<F>(doc: &TokenDocument, mut visitor: F)
where
    F: FnMut(&TokenPath, &Token),
{
    for (path, token) in walk(doc) {
        visitor(&path, token);
    }
}

/// The token at exactly `path`, or `None` when the path ends at a group,
/// a plain value, a metadata key, or nothing.
pub fn find<'a, S: AsRef<str>>(doc: &'a TokenDocument, path: &[S]) -> Option<&'a Token> {
    let (last, parents) = path.split_last()?;
    let mut group = &doc.root;
    for segment in parents {
        if is_metadata_key(segment.as_ref()) {
            return None;
        }
        match group.children.get(segment.as_ref())? {
            TokenNode::Group(child) => group = child,
            _ => return None,
        }
    }
    if is_metadata_key(last.as_ref()) {
        return None;
    }
    match group.children.get(last.as_ref())? {
        TokenNode::Token(token) => Some(token),
        _ => None,
    }
}
