//! Known-bug detection in reference files.
//!
//! Findings are reported, never fixed: generation always uses the values
//! from the token documents.

use super::leaf_name;
use crate::model::{Warning, WarningKind};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use tokenweave_core::{normalize_identifier, SourceFormat};
use tokenweave_diff::extract_declarations;

/// Branches needed before a uniform switch/when counts as a copy-paste bug.
const UNIFORM_BRANCH_MIN: usize = 3;

fn bare_hex_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"["']((?:[0-9A-Fa-f]{6}|[0-9A-Fa-f]{8}))["']"#).expect("valid regex")
    })
}

fn block_start_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(?:switch|when)\b[^{]*\{\s*$").expect("valid regex"))
}

fn swift_case_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*case\s+[^:]+:\s*(?:return\s+)?(.*?)\s*;?\s*$").expect("valid regex"))
}

fn kotlin_branch_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([^/\s][^>]*?)\s*->\s*(.+?)\s*$").expect("valid regex"))
}

/// Scan a reference file for recognised bugs.
pub fn lint_reference(filename: &str, text: &str, format: SourceFormat) -> Vec<Warning> {
    let mut warnings = Vec::new();
    warnings.extend(bare_hex_literals(filename, text));
    if matches!(format, SourceFormat::Swift | SourceFormat::Kotlin | SourceFormat::TypeScript) {
        warnings.extend(uniform_branches(filename, text, format));
    }
    warnings.extend(incomplete_pairs(filename, text, format));
    if !warnings.is_empty() {
        tracing::debug!(file = filename, findings = warnings.len(), "reference lint");
    }
    warnings
}

fn bare_hex_literals(filename: &str, text: &str) -> Vec<Warning> {
    let mut details = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("//") || trimmed.starts_with("import") {
            continue;
        }
        for caps in bare_hex_re().captures_iter(line) {
            details.push(format!("line {}: \"{}\"", index + 1, &caps[1]));
        }
    }
    if details.is_empty() {
        return Vec::new();
    }
    vec![Warning::new(
        WarningKind::Lint,
        format!("{}: hex color literal missing '#' prefix", filename),
    )
    .with_details(details)]
}

/// Branch target of one line inside a switch/when block.
fn branch_target(line: &str, format: SourceFormat) -> Option<String> {
    let trimmed = line.trim();
    match format {
        SourceFormat::Kotlin => {
            let caps = kotlin_branch_re().captures(line)?;
            if caps[1].trim() == "else" {
                return None;
            }
            Some(caps[2].to_string())
        }
        _ => {
            if trimmed.starts_with("default") {
                return None;
            }
            let caps = swift_case_re().captures(line)?;
            Some(caps[1].to_string())
        }
    }
}

fn uniform_branches(filename: &str, text: &str, format: SourceFormat) -> Vec<Warning> {
    let lines: Vec<&str> = text.lines().collect();
    let mut warnings = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if !block_start_re().is_match(lines[i]) {
            i += 1;
            continue;
        }
        let start = i;
        let mut depth = 1i32;
        let mut targets: Vec<String> = Vec::new();
        let mut awaiting_body = false;
        i += 1;
        while i < lines.len() && depth > 0 {
            let line = lines[i];
            depth += line.matches('{').count() as i32 - line.matches('}').count() as i32;
            if depth == 1 {
                if awaiting_body && !line.trim().is_empty() {
                    let body = line.trim().trim_start_matches("return ").trim_end_matches(';');
                    targets.push(body.to_string());
                    awaiting_body = false;
                } else if let Some(target) = branch_target(line, format) {
                    if target.is_empty() {
                        awaiting_body = true;
                    } else {
                        targets.push(target);
                    }
                }
            }
            i += 1;
        }
        let unique: BTreeSet<&String> = targets.iter().collect();
        if targets.len() >= UNIFORM_BRANCH_MIN && unique.len() == 1 {
            warnings.push(
                Warning::new(
                    WarningKind::Lint,
                    format!(
                        "{}: {} branches starting at line {} all map to the same target",
                        filename,
                        targets.len(),
                        start + 1
                    ),
                )
                .with_details(vec![targets[0].clone()]),
            );
        }
    }
    warnings
}

fn incomplete_pairs(filename: &str, text: &str, format: SourceFormat) -> Vec<Warning> {
    let mut light: BTreeSet<String> = BTreeSet::new();
    let mut dark: BTreeSet<String> = BTreeSet::new();
    let mut spelled: std::collections::HashMap<String, String> = std::collections::HashMap::new();
    for decl in extract_declarations(text, format) {
        let leaf = leaf_name(&decl.name).to_string();
        let key = normalize_identifier(&leaf);
        if let Some(base) = key.strip_suffix("light").filter(|b| !b.is_empty()) {
            light.insert(base.to_string());
            spelled.insert(format!("{}light", base), leaf);
        } else if let Some(base) = key.strip_suffix("dark").filter(|b| !b.is_empty()) {
            dark.insert(base.to_string());
            spelled.insert(format!("{}dark", base), leaf);
        }
    }
    // Only meaningful where the file pairs members at all.
    if light.intersection(&dark).next().is_none() {
        return Vec::new();
    }
    let mut details = Vec::new();
    for base in light.difference(&dark) {
        if let Some(name) = spelled.get(&format!("{}light", base)) {
            details.push(format!("{} has no dark counterpart", name));
        }
    }
    for base in dark.difference(&light) {
        if let Some(name) = spelled.get(&format!("{}dark", base)) {
            details.push(format!("{} has no light counterpart", name));
        }
    }
    if details.is_empty() {
        return Vec::new();
    }
    vec![Warning::new(
        WarningKind::Lint,
        format!("{}: semantic group missing light/dark members", filename),
    )
    .with_details(details)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_hex_literal() {
        let text = "extension Color {\n    static let brand = Color(hex: \"1D1D1D\")\n    static let ok = Color(hex: \"#FFFFFF\")\n}\n";
        let warnings = lint_reference("Colors.swift", text, SourceFormat::Swift);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::Lint);
        assert_eq!(warnings[0].details, vec!["line 2: \"1D1D1D\"".to_string()]);
    }

    #[test]
    fn test_uniform_swift_switch() {
        let text = "func color(for state: State) -> Color {\n    switch state {\n    case .normal: return AppColors.primary\n    case .hover: return AppColors.primary\n    case .pressed:\n        return AppColors.primary\n    default: return AppColors.secondary\n    }\n}\n";
        let warnings = lint_reference("States.swift", text, SourceFormat::Swift);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("3 branches"));
        assert_eq!(warnings[0].details, vec!["AppColors.primary".to_string()]);
    }

    #[test]
    fn test_kotlin_when_with_distinct_targets_is_clean() {
        let text = "fun tone(state: State) = when (state) {\n    State.Normal -> Tones.Primary\n    State.Hover -> Tones.Secondary\n    State.Pressed -> Tones.Primary\n    else -> Tones.Primary\n}\n";
        assert!(lint_reference("Tones.kt", text, SourceFormat::Kotlin).is_empty());
    }

    #[test]
    fn test_kotlin_uniform_when() {
        let text = "fun tone(state: State) = when (state) {\n    State.Normal -> Tones.Primary\n    State.Hover -> Tones.Primary\n    State.Pressed -> Tones.Primary\n}\n";
        let warnings = lint_reference("Tones.kt", text, SourceFormat::Kotlin);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_incomplete_light_dark_pairs() {
        let text = "object AppColors {\n    val TextPrimaryLight = Color(0xFF1D1D1D)\n    val TextPrimaryDark = Color(0xFFF5F5F5)\n    val SurfaceLight = Color(0xFFFFFFFF)\n}\n";
        let warnings = lint_reference("AppColors.kt", text, SourceFormat::Kotlin);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].details, vec!["SurfaceLight has no dark counterpart".to_string()]);
    }
}
