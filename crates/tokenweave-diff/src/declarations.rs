//! Token declaration extraction.
//!
//! Pattern probes per format, not a parser. A brace stack tracks named
//! containers so Swift, Kotlin and TypeScript names come out qualified
//! (`AppColors.Primitives.grey750`); CSS and SCSS names stay as written.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tokenweave_core::SourceFormat;

/// A token declaration found in source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub name: String,
    pub value: String,
    /// 1-based line number.
    pub line: usize,
}

fn scss_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(\$[A-Za-z0-9_-]+)\s*:\s*(.+?)\s*(?:!default\s*)?;").expect("valid regex")
    })
}

fn css_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(--[A-Za-z0-9_-]+)\s*:\s*(.+?)\s*;").expect("valid regex"))
}

fn ts_const_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*export\s+const\s+([A-Za-z_$][\w$]*)\s*(?::[^=]*)?=\s*(.*?)\s*;?\s*$")
            .expect("valid regex")
    })
}

fn ts_member_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*([A-Za-z_$][\w$]*|'[^']+'|"[^"]+")\s*:\s*(.*?)\s*,?\s*$"#)
            .expect("valid regex")
    })
}

fn swift_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^\s*(?:(?:public|internal|private|fileprivate|open|static|class|final|nonisolated|@\w+)\s+)*(?:let|var)\s+([A-Za-z_][A-Za-z0-9_]*|`[^`]+`)\s*(?::([^={]*))?(=|\{)?\s*(.*?)\s*$",
        )
        .expect("valid regex")
    })
}

fn kotlin_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^\s*(?:(?:private|internal|public|protected|override|const|inline|@\w+)\s+)*val\s+([A-Za-z_][A-Za-z0-9_]*|`[^`]+`)\s*(?::([^={]*))?(=|\{)?\s*(.*?)\s*$",
        )
        .expect("valid regex")
    })
}

fn container_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(?:struct|enum|class|object|extension|interface|protocol|namespace)\s+([A-Za-z_][A-Za-z0-9_]*)")
            .expect("valid regex")
    })
}

fn is_comment_line(trimmed: &str) -> bool {
    trimmed.starts_with("//")
        || trimmed.starts_with("/*")
        || trimmed.starts_with('*')
        || trimmed.starts_with("<!--")
}

/// The code part of a line: string literal contents blanked and a
/// trailing line comment removed. Used for brace counting only.
fn code_part(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut quote: Option<char> = None;
    let mut prev = ' ';
    for c in line.chars() {
        match quote {
            Some(q) => {
                if c == q && prev != '\\' {
                    quote = None;
                    out.push(c);
                }
            }
            None => {
                if c == '"' || c == '\'' || c == '`' {
                    quote = Some(c);
                    out.push(c);
                } else if c == '/' && prev == '/' {
                    out.pop();
                    break;
                } else {
                    out.push(c);
                }
            }
        }
        prev = c;
    }
    out
}

fn clean_name(name: &str) -> String {
    name.trim_matches(|c| c == '`' || c == '\'' || c == '"').to_string()
}

/// Collapse whitespace and drop trailing separators.
fn normalize_value(value: &str) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches([';', ','])
        .trim()
        .to_string()
}

/// Strip getter and body wrappers from a pending value line.
fn body_value(line: &str) -> String {
    let mut text = line.trim();
    if let Some(index) = text.find("get()") {
        text = text[index + "get()".len()..].trim_start();
        text = text.strip_prefix('=').unwrap_or(text).trim_start();
    }
    text = text.strip_prefix("return ").unwrap_or(text);
    normalize_value(text.trim_end_matches('}'))
}

struct Scope {
    names: Vec<Option<String>>,
}

impl Scope {
    fn qualify(&self, name: &str) -> String {
        let mut parts: Vec<&str> = self.names.iter().flatten().map(String::as_str).collect();
        parts.push(name);
        parts.join(".")
    }

    fn in_named(&self) -> bool {
        matches!(self.names.last(), Some(Some(_)))
    }

    /// Apply the braces of `code`, naming the first opened scope.
    fn apply(&mut self, code: &str, mut name: Option<String>) {
        for c in code.chars() {
            match c {
                '{' => self.names.push(name.take()),
                '}' => {
                    self.names.pop();
                }
                _ => {}
            }
        }
    }
}

/// Extract declarations in source order.
pub fn extract_declarations(text: &str, format: SourceFormat) -> Vec<Declaration> {
    let mut out: Vec<Declaration> = Vec::new();
    let mut scope = Scope { names: Vec::new() };
    let mut pending: Option<(String, usize)> = None;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || is_comment_line(trimmed) {
            continue;
        }
        let code = code_part(line);

        if let Some((name, at)) = pending.take() {
            if trimmed != "}" {
                out.push(Declaration {
                    name,
                    value: body_value(trimmed),
                    line: at,
                });
                scope.apply(&code, None);
                continue;
            }
        }

        match format {
            SourceFormat::Css | SourceFormat::Scss => {
                let re = if format == SourceFormat::Css {
                    css_re()
                } else {
                    scss_re()
                };
                if let Some(caps) = re.captures(line) {
                    out.push(Declaration {
                        name: caps[1].to_string(),
                        value: normalize_value(&caps[2]),
                        line: line_no,
                    });
                }
            }
            SourceFormat::TypeScript => {
                if let Some(caps) = ts_const_re().captures(line) {
                    let value = caps[2].trim();
                    if value == "{" {
                        scope.apply(&code, Some(caps[1].to_string()));
                        continue;
                    }
                    out.push(Declaration {
                        name: scope.qualify(&caps[1]),
                        value: normalize_value(value.trim_end_matches("as const").trim()),
                        line: line_no,
                    });
                } else if scope.in_named() {
                    if let Some(caps) = ts_member_re().captures(line) {
                        let name = clean_name(&caps[1]);
                        let value = caps[2].trim();
                        if value == "{" {
                            scope.apply(&code, Some(name));
                            continue;
                        }
                        out.push(Declaration {
                            name: scope.qualify(&name),
                            value: normalize_value(value),
                            line: line_no,
                        });
                    }
                }
            }
            SourceFormat::Swift | SourceFormat::Kotlin => {
                let re = if format == SourceFormat::Swift {
                    swift_re()
                } else {
                    kotlin_re()
                };
                if let Some(caps) = re.captures(line) {
                    let name = scope.qualify(&clean_name(&caps[1]));
                    let op = caps.get(3).map(|m| m.as_str());
                    let rest = caps.get(4).map_or("", |m| m.as_str()).trim();
                    match op {
                        Some("=") => out.push(Declaration {
                            name,
                            value: normalize_value(rest),
                            line: line_no,
                        }),
                        Some(_) if !rest.trim_end_matches('}').trim().is_empty() => {
                            out.push(Declaration {
                                name,
                                value: normalize_value(rest.trim_end_matches('}')),
                                line: line_no,
                            })
                        }
                        _ => {
                            if !trimmed.ends_with(',') && !trimmed.ends_with(')') {
                                pending = Some((name, line_no));
                            }
                        }
                    }
                }
            }
        }

        let container = container_re()
            .captures(&code)
            .filter(|_| code.contains('{'))
            .map(|caps| caps[1].to_string());
        scope.apply(&code, container);
    }
    out
}

/// Declarations keyed by name. A name declared more than once (a dark
/// override block, say) maps to its values joined with ` | `.
pub fn declaration_map(declarations: &[Declaration]) -> BTreeMap<String, String> {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    for decl in declarations {
        map.entry(decl.name.clone())
            .and_modify(|v| {
                v.push_str(" | ");
                v.push_str(&decl.value);
            })
            .or_insert_with(|| decl.value.clone());
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(decls: &[Declaration]) -> Vec<&str> {
        decls.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_css_custom_properties() {
        let css = ":root {\n  /* NEW */\n  --grey-750: #1d1d1d;\n  --text-primary: light-dark(var(--grey-750), var(--grey-50));\n}\n";
        let decls = extract_declarations(css, SourceFormat::Css);
        assert_eq!(names(&decls), vec!["--grey-750", "--text-primary"]);
        assert_eq!(decls[1].value, "light-dark(var(--grey-750), var(--grey-50))");
        assert_eq!(decls[0].line, 3);
    }

    #[test]
    fn test_scss_variables() {
        let scss = "$grey-750: #1d1d1d !default;\n$space-4: 16px;\n";
        let decls = extract_declarations(scss, SourceFormat::Scss);
        assert_eq!(names(&decls), vec!["$grey-750", "$space-4"]);
        assert_eq!(decls[0].value, "#1d1d1d");
    }

    #[test]
    fn test_typescript_consts_and_objects() {
        let ts = "export const GREY_750 = '#1d1d1d';\nexport const TEXT_PRIMARY = { light: GREY_750, dark: GREY_50 } as const;\nexport const spacing = {\n  sm: '8px',\n  md: '16px',\n} as const;\n";
        let decls = extract_declarations(ts, SourceFormat::TypeScript);
        assert_eq!(
            names(&decls),
            vec!["GREY_750", "TEXT_PRIMARY", "spacing.sm", "spacing.md"]
        );
        assert_eq!(decls[1].value, "{ light: GREY_750, dark: GREY_50 }");
        assert_eq!(decls[2].value, "'8px'");
    }

    #[test]
    fn test_swift_qualified_names() {
        let swift = r##"import SwiftUI

struct AppColors {
    enum Primitives {
        static let grey750 = Color(hex: "#1d1d1d")
    }
    static let textPrimary = Color(light: Primitives.grey750, dark: Primitives.grey50)
    static var surface: Color {
        Color(light: Primitives.white, dark: Primitives.grey900)
    }
}
"##;
        let decls = extract_declarations(swift, SourceFormat::Swift);
        assert_eq!(
            names(&decls),
            vec!["AppColors.Primitives.grey750", "AppColors.textPrimary", "AppColors.surface"]
        );
        assert_eq!(decls[2].value, "Color(light: Primitives.white, dark: Primitives.grey900)");
    }

    #[test]
    fn test_kotlin_vals_and_getters() {
        let kotlin = "object AppColors {\n    val Grey750 = Color(0xFF1D1D1D)\n    val TextPrimary: Color\n        @Composable get() = if (isSystemInDarkTheme()) Grey50 else Grey750\n    val `2xl` = 24.dp\n}\n";
        let decls = extract_declarations(kotlin, SourceFormat::Kotlin);
        assert_eq!(
            names(&decls),
            vec!["AppColors.Grey750", "AppColors.TextPrimary", "AppColors.2xl"]
        );
        assert_eq!(decls[1].value, "if (isSystemInDarkTheme()) Grey50 else Grey750");
    }

    #[test]
    fn test_comment_lines_are_skipped() {
        let kotlin = "object AppColors {\n    // REMOVED: val Grey900 = Color(0xFF111111)\n}\n";
        assert!(extract_declarations(kotlin, SourceFormat::Kotlin).is_empty());
    }

    #[test]
    fn test_duplicate_names_join_values() {
        let css = ":root {\n  --bg: #fff;\n}\n[data-theme=\"dark\"] {\n  --bg: #000;\n}\n";
        let map = declaration_map(&extract_declarations(css, SourceFormat::Css));
        assert_eq!(map.get("--bg").map(String::as_str), Some("#fff | #000"));
    }
}
