//! LCS-based line and word diffs.

use serde::Serialize;

/// Classification of a diffed line or span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffOp {
    Equal,
    Added,
    Removed,
}

/// One line of a line diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    pub op: DiffOp,
    pub text: String,
    /// 1-based line number in the old text.
    pub old_line: Option<usize>,
    /// 1-based line number in the new text.
    pub new_line: Option<usize>,
}

/// A span of a word diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordSpan {
    pub op: DiffOp,
    pub text: String,
}

/// Word-level highlight for one removed/added line pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordDiff {
    pub old_line: usize,
    pub new_line: usize,
    pub spans: Vec<WordSpan>,
}

/// Edit script over two sequences: `(op, index into a or b)`.
fn edit_script<T: Eq>(a: &[T], b: &[T]) -> Vec<(DiffOp, usize)> {
    // Common prefix and suffix never need the table.
    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    let a_mid = &a[prefix..a.len() - suffix];
    let b_mid = &b[prefix..b.len() - suffix];
    let (n, m) = (a_mid.len(), b_mid.len());

    // table[i][j] = LCS length of a_mid[i..] and b_mid[j..]
    let mut table = vec![vec![0u32; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i][j] = if a_mid[i] == b_mid[j] {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }

    let mut script: Vec<(DiffOp, usize)> = (0..prefix).map(|i| (DiffOp::Equal, i)).collect();
    let (mut i, mut j) = (0, 0);
    while i < n || j < m {
        if i < n && j < m && a_mid[i] == b_mid[j] {
            script.push((DiffOp::Equal, prefix + i));
            i += 1;
            j += 1;
        } else if i < n && (j == m || table[i + 1][j] >= table[i][j + 1]) {
            script.push((DiffOp::Removed, prefix + i));
            i += 1;
        } else {
            script.push((DiffOp::Added, prefix + j));
            j += 1;
        }
    }
    script.extend((a.len() - suffix..a.len()).map(|i| (DiffOp::Equal, i)));
    script
}

/// Classic LCS line diff.
pub fn diff_lines(old: &str, new: &str) -> Vec<DiffLine> {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();

    let mut out = Vec::new();
    let (mut old_no, mut new_no) = (0usize, 0usize);
    for (op, index) in edit_script(&old_lines, &new_lines) {
        let line = match op {
            DiffOp::Equal => {
                old_no += 1;
                new_no += 1;
                DiffLine {
                    op,
                    text: old_lines[index].to_string(),
                    old_line: Some(old_no),
                    new_line: Some(new_no),
                }
            }
            DiffOp::Removed => {
                old_no += 1;
                DiffLine {
                    op,
                    text: old_lines[index].to_string(),
                    old_line: Some(old_no),
                    new_line: None,
                }
            }
            DiffOp::Added => {
                new_no += 1;
                DiffLine {
                    op,
                    text: new_lines[index].to_string(),
                    old_line: None,
                    new_line: Some(new_no),
                }
            }
        };
        out.push(line);
    }
    tracing::trace!(lines = out.len(), "line diff");
    out
}

/// Split a line into word and non-word runs.
fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut prev: Option<bool> = None;
    for (i, c) in line.char_indices() {
        let is_word = c.is_alphanumeric() || c == '_' || c == '-';
        if let Some(p) = prev {
            if p != is_word || !is_word {
                tokens.push(&line[start..i]);
                start = i;
            }
        }
        prev = Some(is_word);
    }
    if start < line.len() {
        tokens.push(&line[start..]);
    }
    tokens
}

/// Word diff of two lines, adjacent spans with the same op merged.
pub fn diff_words(old: &str, new: &str) -> Vec<WordSpan> {
    let a = tokenize(old);
    let b = tokenize(new);
    let mut spans: Vec<WordSpan> = Vec::new();
    for (op, index) in edit_script(&a, &b) {
        let text = match op {
            DiffOp::Added => b[index],
            _ => a[index],
        };
        match spans.last_mut() {
            Some(last) if last.op == op => last.text.push_str(text),
            _ => spans.push(WordSpan {
                op,
                text: text.to_string(),
            }),
        }
    }
    spans
}

/// Pair each run of removed lines with the added run right after it, line
/// by line, and word-diff the pairs.
pub fn paired_word_diffs(lines: &[DiffLine]) -> Vec<WordDiff> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if lines[i].op != DiffOp::Removed {
            i += 1;
            continue;
        }
        let removed_start = i;
        while i < lines.len() && lines[i].op == DiffOp::Removed {
            i += 1;
        }
        let added_start = i;
        while i < lines.len() && lines[i].op == DiffOp::Added {
            i += 1;
        }
        let removed = &lines[removed_start..added_start];
        let added = &lines[added_start..i];
        for (old, new) in removed.iter().zip(added) {
            if let (Some(old_line), Some(new_line)) = (old.old_line, new.new_line) {
                out.push(WordDiff {
                    old_line,
                    new_line,
                    spans: diff_words(&old.text, &new.text),
                });
            }
        }
    }
    out
}
