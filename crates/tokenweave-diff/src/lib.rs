//! Diffing generated output against a reference file.
//!
//! This crate provides:
//! - An LCS line diff and a word diff for paired changed lines
//! - Per-format extraction of token declarations
//! - Classification of declarations into added/removed/modified/renamed,
//!   including family-level renames

mod classify;
mod declarations;
mod lcs;
mod similarity;

pub use classify::{diff, DiffRecord, FamilyRename, Rename};
pub use declarations::{declaration_map, extract_declarations, Declaration};
pub use lcs::{diff_lines, diff_words, paired_word_diffs, DiffLine, DiffOp, WordDiff, WordSpan};
pub use similarity::{levenshtein_distance, name_segments, normalized_similarity};
