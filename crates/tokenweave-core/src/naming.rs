//! Naming helpers shared by every emitter.
//!
//! Token paths are turned into identifiers in three steps: split each path
//! segment into words, drop elided segments (`standard`), then apply the
//! target's [`NamingCase`].

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Path segment elided from every generated name (case-insensitive).
pub const ELIDED_SEGMENT: &str = "standard";

/// Leading path segments that name a collection rather than a family.
const COLLECTION_ROOTS: &[&str] = &[
    "colour", "colours", "color", "colors", "palette", "primitive", "primitives", "core", "base",
    "global", "ref", "reference",
];

/// Identifier casing convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamingCase {
    Camel,
    Pascal,
    Snake,
    ScreamingSnake,
    Kebab,
}

impl NamingCase {
    pub const ALL: [NamingCase; 5] = [
        NamingCase::Camel,
        NamingCase::Pascal,
        NamingCase::Snake,
        NamingCase::ScreamingSnake,
        NamingCase::Kebab,
    ];

    /// Join words into an identifier in this case.
    pub fn apply<S: AsRef<str>>(&self, words: &[S]) -> String {
        let joined = words
            .iter()
            .map(|w| w.as_ref())
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        joined.from_case(Case::Title).to_case(self.to_case())
    }

    fn to_case(self) -> Case {
        match self {
            Self::Camel => Case::Camel,
            Self::Pascal => Case::Pascal,
            Self::Snake => Case::Snake,
            Self::ScreamingSnake => Case::UpperSnake,
            Self::Kebab => Case::Kebab,
        }
    }

    /// Classify an identifier; `None` when the spelling is ambiguous
    /// (a single lowercase word fits camel, snake and kebab alike).
    pub fn classify(ident: &str) -> Option<NamingCase> {
        let ident = ident.trim_start_matches(['$', '-', '_']);
        if ident.is_empty() {
            return None;
        }
        let has_lower = ident.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = ident.chars().any(|c| c.is_ascii_uppercase());
        let first_upper = ident.chars().next().map_or(false, |c| c.is_ascii_uppercase());

        if ident.contains('-') {
            Some(Self::Kebab)
        } else if ident.contains('_') {
            if has_lower {
                Some(Self::Snake)
            } else {
                Some(Self::ScreamingSnake)
            }
        } else if first_upper && has_lower {
            Some(Self::Pascal)
        } else if first_upper && !has_lower && ident.chars().filter(|c| c.is_ascii_alphabetic()).count() > 1 {
            Some(Self::ScreamingSnake)
        } else if !first_upper && has_upper {
            Some(Self::Camel)
        } else {
            None
        }
    }
}

impl fmt::Display for NamingCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Camel => "camelCase",
            Self::Pascal => "PascalCase",
            Self::Snake => "snake_case",
            Self::ScreamingSnake => "SCREAMING_SNAKE_CASE",
            Self::Kebab => "kebab-case",
        };
        f.write_str(name)
    }
}

/// Split one segment into words on non-alphanumerics and lower→upper
/// transitions. Letter/digit runs stay together (`2xl`, `grey750`).
pub fn split_words(segment: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for c in segment.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Whether a path segment is dropped from generated names.
pub fn is_elided_segment(segment: &str) -> bool {
    segment.trim().eq_ignore_ascii_case(ELIDED_SEGMENT)
}

/// Words for a sequence of path segments, with elided segments removed.
pub fn path_words<S: AsRef<str>>(segments: &[S]) -> Vec<String> {
    segments
        .iter()
        .map(|s| s.as_ref())
        .filter(|s| !is_elided_segment(s))
        .flat_map(split_words)
        .collect()
}

/// Display segments of a primitive: elided segments removed and a
/// leading collection root (`Colour/…`) dropped when more remains.
pub fn primitive_segments<S: AsRef<str>>(segments: &[S]) -> Vec<String> {
    let mut kept: Vec<String> = segments
        .iter()
        .map(|s| s.as_ref().to_string())
        .filter(|s| !is_elided_segment(s))
        .collect();
    if kept.len() >= 3
        && COLLECTION_ROOTS
            .iter()
            .any(|root| kept[0].trim().eq_ignore_ascii_case(root))
    {
        kept.remove(0);
    }
    kept
}

/// Family of a primitive: its leading non-numeric segment.
pub fn family_of<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| s.as_ref())
        .find(|s| !s.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or("")
        .to_string()
}

/// Numeric sort key: the trailing digits of a name (`Grey/750` → 750).
pub fn trailing_number(name: &str) -> Option<u64> {
    let digits: String = name
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

/// Lowercase alphanumerics only; two spellings of one name normalise equal.
pub fn normalize_identifier(ident: &str) -> String {
    ident
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Prefix identifiers that would start with a digit.
pub fn ensure_identifier_start(ident: String) -> String {
    match ident.chars().next() {
        Some(c) if c.is_ascii_digit() => format!("_{}", ident),
        _ => ident,
    }
}

/// Compare two group labels alphabetically, case-insensitive first.
pub fn compare_labels(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
