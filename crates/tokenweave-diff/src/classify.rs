//! Change classification between a reference file and generated output.

use crate::declarations::{declaration_map, extract_declarations};
use crate::lcs::{diff_lines, paired_word_diffs, DiffOp, WordDiff};
use crate::similarity::{name_segments, normalized_similarity};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tokenweave_core::SourceFormat;

/// Minimum name similarity for a rename whose values are identical.
const RENAME_SIMILARITY_EXACT: f64 = 0.35;
/// Minimum name similarity for a rename whose values are only near-identical.
const RENAME_SIMILARITY_NEAR: f64 = 0.6;
/// Minimum value similarity for two values to count as near-identical.
const NEAR_VALUE_SIMILARITY: f64 = 0.85;
/// Pairs needed before a shared prefix substitution is a family rename.
const FAMILY_RENAME_MIN_PAIRS: usize = 2;

/// A removed name paired with the added name that replaced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rename {
    pub old_name: String,
    pub new_name: String,
}

/// A prefix substitution shared by several renames (`grey` -> `neutral`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyRename {
    pub old_family: String,
    pub new_family: String,
    pub pairs: usize,
}

/// Everything that changed between a reference and a generated file.
///
/// Renamed names stay in `added_tokens`/`removed_tokens`; `renamed_tokens`
/// only pairs them up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffRecord {
    pub filename: String,
    pub added_lines: Vec<String>,
    pub removed_lines: Vec<String>,
    pub added_tokens: BTreeSet<String>,
    pub removed_tokens: BTreeSet<String>,
    pub modified_token_names: BTreeSet<String>,
    pub renamed_tokens: Vec<Rename>,
    pub family_renames: Vec<FamilyRename>,
    /// Word-level highlights for paired changed lines.
    pub word_diffs: Vec<WordDiff>,
}

impl DiffRecord {
    pub fn has_token_changes(&self) -> bool {
        !self.added_tokens.is_empty()
            || !self.removed_tokens.is_empty()
            || !self.modified_token_names.is_empty()
    }

    /// Removed and modified names: the changes that can ripple downstream.
    pub fn changed_names(&self) -> impl Iterator<Item = &str> {
        self.removed_tokens
            .iter()
            .chain(&self.modified_token_names)
            .map(String::as_str)
    }
}

/// Diff `generated` against `reference`, both in `format`.
pub fn diff(filename: &str, reference: &str, generated: &str, format: SourceFormat) -> DiffRecord {
    let lines = diff_lines(reference, generated);
    let mut record = DiffRecord {
        filename: filename.to_string(),
        word_diffs: paired_word_diffs(&lines),
        ..DiffRecord::default()
    };
    for line in &lines {
        match line.op {
            DiffOp::Added => record.added_lines.push(line.text.clone()),
            DiffOp::Removed => record.removed_lines.push(line.text.clone()),
            DiffOp::Equal => {}
        }
    }

    let old = declaration_map(&extract_declarations(reference, format));
    let new = declaration_map(&extract_declarations(generated, format));
    for (name, value) in &new {
        match old.get(name) {
            None => {
                record.added_tokens.insert(name.clone());
            }
            Some(old_value) if old_value != value => {
                record.modified_token_names.insert(name.clone());
            }
            Some(_) => {}
        }
    }
    for name in old.keys() {
        if !new.contains_key(name) {
            record.removed_tokens.insert(name.clone());
        }
    }

    record.renamed_tokens = detect_renames(&record, &old, &new);
    record.family_renames = detect_family_renames(&record.renamed_tokens);

    tracing::debug!(
        file = filename,
        added = record.added_tokens.len(),
        removed = record.removed_tokens.len(),
        modified = record.modified_token_names.len(),
        renamed = record.renamed_tokens.len(),
        "classified diff"
    );
    record
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ValueMatch {
    Near,
    Exact,
}

fn canonical_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\'' && *c != '"')
        .flat_map(char::to_lowercase)
        .collect()
}

fn value_match(old: &str, new: &str) -> Option<ValueMatch> {
    if old == new {
        return Some(ValueMatch::Exact);
    }
    let (a, b) = (canonical_value(old), canonical_value(new));
    if a == b || normalized_similarity(&a, &b) >= NEAR_VALUE_SIMILARITY {
        Some(ValueMatch::Near)
    } else {
        None
    }
}

/// The unqualified identifier without CSS/SCSS sigils.
fn leaf(name: &str) -> &str {
    name.rsplit('.')
        .next()
        .unwrap_or(name)
        .trim_start_matches(['-', '$'])
}

fn detect_renames(
    record: &DiffRecord,
    old_values: &BTreeMap<String, String>,
    new_values: &BTreeMap<String, String>,
) -> Vec<Rename> {
    let mut taken: BTreeSet<&str> = BTreeSet::new();
    let mut renames = Vec::new();

    for old in &record.removed_tokens {
        let mut best: Option<(ValueMatch, f64, &str)> = None;
        let Some(old_value) = old_values.get(old) else {
            continue;
        };
        for new in &record.added_tokens {
            if taken.contains(new.as_str()) {
                continue;
            }
            let Some(strength) = new_values.get(new).and_then(|v| value_match(old_value, v)) else {
                continue;
            };
            let threshold = match strength {
                ValueMatch::Exact => RENAME_SIMILARITY_EXACT,
                ValueMatch::Near => RENAME_SIMILARITY_NEAR,
            };
            let similarity = normalized_similarity(&leaf(old).to_lowercase(), &leaf(new).to_lowercase());
            if similarity < threshold {
                continue;
            }
            let better = match best {
                None => true,
                Some((s, sim, _)) => (strength, similarity) > (s, sim),
            };
            if better {
                best = Some((strength, similarity, new.as_str()));
            }
        }
        if let Some((_, _, new)) = best {
            taken.insert(new);
            renames.push(Rename {
                old_name: old.clone(),
                new_name: new.to_string(),
            });
        }
    }
    renames
}

/// Split two names into the differing leading part and the shared tail.
fn prefix_substitution(old: &str, new: &str) -> Option<(String, String)> {
    let a = name_segments(leaf(old));
    let b = name_segments(leaf(new));
    let common = a
        .iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    if common == 0 || common >= a.len() || common >= b.len() {
        return None;
    }
    Some((
        a[..a.len() - common].join("-"),
        b[..b.len() - common].join("-"),
    ))
}

fn detect_family_renames(renames: &[Rename]) -> Vec<FamilyRename> {
    let mut counts: IndexMap<(String, String), usize> = IndexMap::new();
    for rename in renames {
        if let Some(key) = prefix_substitution(&rename.old_name, &rename.new_name) {
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .filter(|(_, pairs)| *pairs >= FAMILY_RENAME_MIN_PAIRS)
        .map(|((old_family, new_family), pairs)| FamilyRename {
            old_family,
            new_family,
            pairs,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_added_removed_modified() {
        let reference = ":root {\n  --grey-750: #1d1d1d;\n  --grey-900: #111111;\n  --white: #ffffff;\n}\n";
        let generated = ":root {\n  --grey-750: #1e1e1e;\n  /* NEW */\n  --grey-50: #f5f5f5;\n  --white: #ffffff;\n  /* REMOVED: --grey-900 */\n}\n";
        let record = diff("tokens.css", reference, generated, SourceFormat::Css);
        assert!(record.added_tokens.contains("--grey-50"));
        assert!(record.removed_tokens.contains("--grey-900"));
        assert!(record.modified_token_names.contains("--grey-750"));
        assert!(!record.modified_token_names.contains("--white"));
        assert!(record.added_lines.iter().any(|l| l.contains("--grey-50")));
        assert!(record.removed_lines.iter().any(|l| l.contains("--grey-900")));
        assert!(record.renamed_tokens.is_empty());
    }

    #[test]
    fn test_rename_and_family_rename() {
        let reference = ":root {\n  --grey-50: #f5f5f5;\n  --grey-750: #1d1d1d;\n  --blue-500: #0000ff;\n}\n";
        let generated = ":root {\n  --neutral-50: #f5f5f5;\n  --neutral-750: #1d1d1d;\n  --blue-500: #0000ff;\n}\n";
        let record = diff("tokens.css", reference, generated, SourceFormat::Css);
        assert_eq!(record.renamed_tokens.len(), 2);
        assert!(record.renamed_tokens.contains(&Rename {
            old_name: "--grey-750".into(),
            new_name: "--neutral-750".into(),
        }));
        assert_eq!(
            record.family_renames,
            vec![FamilyRename {
                old_family: "grey".into(),
                new_family: "neutral".into(),
                pairs: 2,
            }]
        );
        // Renamed names remain in the added/removed sets.
        assert!(record.removed_tokens.contains("--grey-50"));
        assert!(record.added_tokens.contains("--neutral-50"));
    }

    #[test]
    fn test_unrelated_names_with_equal_values_are_not_renames() {
        let reference = ":root {\n  --white: #ffffff;\n}\n";
        let generated = ":root {\n  --surface-raised: #ffffff;\n}\n";
        let record = diff("tokens.css", reference, generated, SourceFormat::Css);
        assert!(record.renamed_tokens.is_empty());
    }

    #[test]
    fn test_swift_qualified_changes() {
        let reference = "struct AppColors {\n    static let grey750 = Color(hex: \"#1d1d1d\")\n}\n";
        let generated = "struct AppColors {\n    static let gray750 = Color(hex: \"#1d1d1d\")\n}\n";
        let record = diff("AppColors.swift", reference, generated, SourceFormat::Swift);
        assert_eq!(
            record.renamed_tokens,
            vec![Rename {
                old_name: "AppColors.grey750".into(),
                new_name: "AppColors.gray750".into(),
            }]
        );
        assert!(record.family_renames.is_empty());
        assert_eq!(record.word_diffs.len(), 1);
    }
}
