//! Name similarity used by rename detection.

/// Levenshtein edit distance over chars.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev_row: Vec<usize> = (0..=b.len()).collect();
    let mut curr_row: Vec<usize> = vec![0; b.len() + 1];
    for i in 1..=a.len() {
        curr_row[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr_row[j] = (curr_row[j - 1] + 1)
                .min(prev_row[j] + 1)
                .min(prev_row[j - 1] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }
    prev_row[b.len()]
}

/// `1 - distance / max_len`, in `[0, 1]`.
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(a, b) as f64 / max_len as f64
}

/// Lowercase segments of an identifier, split on separators, case changes
/// and letter/digit boundaries (`grey750` -> `grey`, `750`).
pub fn name_segments(name: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;
    for c in name.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }
        if let Some(p) = prev {
            let boundary = (p.is_lowercase() && c.is_uppercase())
                || (p.is_ascii_digit() != c.is_ascii_digit());
            if boundary && !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
        prev = Some(c);
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("grey", "gray"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
    }

    #[test]
    fn test_normalized_similarity() {
        assert_eq!(normalized_similarity("", ""), 1.0);
        assert!(normalized_similarity("grey-750", "gray-750") > 0.8);
        assert!(normalized_similarity("grey-750", "blue-100") < 0.5);
    }

    #[test]
    fn test_name_segments() {
        assert_eq!(name_segments("--grey-750"), vec!["grey", "750"]);
        assert_eq!(name_segments("grey750"), vec!["grey", "750"]);
        assert_eq!(name_segments("TextOnPrimary"), vec!["text", "on", "primary"]);
        assert_eq!(name_segments("TEXT_PRIMARY"), vec!["text", "primary"]);
    }
}
