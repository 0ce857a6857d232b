//! Web convention detectors: CSS custom properties, SCSS variables and
//! TypeScript constants.
//!
//! Best practices: kebab-case custom properties with `light-dark()`,
//! kebab-case SCSS variables, SCREAMING_SNAKE TS constants whose
//! light/dark pairs are `{ light, dark }` objects.

use super::{
    choose_dark_mode, count, leaf_name, paired_suffix_count, ConventionDetector,
    ConventionProfile, DarkModeStrategy,
};
use regex::Regex;
use std::sync::OnceLock;
use tokenweave_core::{ArtifactCategory, NamingCase, SourceFormat};
use tokenweave_diff::Declaration;

/// Default selector for dark overrides.
pub const DEFAULT_DARK_SELECTOR: &str = "[data-theme=\"dark\"]";

fn light_dark_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"light-dark\(").expect("valid regex"))
}

fn dark_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?m)^[ \t]*((?:@media[^{\n]*prefers-color-scheme:\s*dark[^{\n]*)|(?:[^{}\n;]*(?:\.dark\b|\.theme-dark|\.dark-theme|data-theme=["']?dark["']?\])[^{}\n;]*?))\s*\{"#,
        )
        .expect("valid regex")
    })
}

fn root_selector_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^[ \t]*([^{}\n@;/*$][^{}\n;]*?)\s*\{").expect("valid regex"))
}

fn scss_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^[ \t]*(@(?:use|import|forward)\s+[^;\n]+;)").expect("valid regex"))
}

fn scss_theme_map_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?mi)^[ \t]*\$([\w-]*(?:light|dark)[\w-]*)\s*:\s*\(").expect("valid regex")
    })
}

fn ts_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^[ \t]*(import\s[^\n]+)$").expect("valid regex"))
}

fn ts_theme_object_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*export\s+const\s+(\w*(?:[Ll]ight|[Dd]ark|LIGHT|DARK)\w*)\s*(?::[^=\n]*)?=\s*\{")
            .expect("valid regex")
    })
}

fn ts_light_member_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\blight\s*:").expect("valid regex"))
}

fn ts_dark_member_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bdark\s*:").expect("valid regex"))
}

fn is_dark_name(name: &str) -> bool {
    name.to_ascii_lowercase().contains("dark")
}

/// Shared CSS/SCSS dark-block evidence: `(selector, declarations inside)`.
fn dark_block(text: &str) -> Option<(String, usize)> {
    let caps = dark_block_re().captures(text)?;
    let selector = caps[1].trim().to_string();
    let start = caps.get(0).map_or(0, |m| m.end());
    let mut depth = 1usize;
    let mut end = text.len();
    for (offset, c) in text[start..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    end = start + offset;
                    break;
                }
            }
            _ => {}
        }
    }
    let members = text[start..end].matches(':').count();
    Some((selector, members))
}

/// CSS custom-property detector.
pub struct CssDetector {
    category: ArtifactCategory,
}

impl CssDetector {
    pub fn new(category: ArtifactCategory) -> Self {
        Self { category }
    }
}

impl ConventionDetector for CssDetector {
    fn format(&self) -> SourceFormat {
        SourceFormat::Css
    }

    fn best_practices(&self) -> ConventionProfile {
        let mut profile = ConventionProfile::base(SourceFormat::Css, self.category);
        profile.naming = NamingCase::Kebab;
        profile.indent = "  ".to_string();
        profile.container_keyword = ":root".to_string();
        profile.container_name = ":root".to_string();
        profile.dark_mode = DarkModeStrategy::Dynamic;
        profile.dark_selector = DEFAULT_DARK_SELECTOR.to_string();
        profile
    }

    fn probe(&self, reference: &str, declarations: &[Declaration], profile: &mut ConventionProfile) {
        if let Some(caps) = root_selector_re().captures(reference) {
            let selector = caps[1].trim();
            if !is_dark_name(selector) {
                profile.container_keyword = selector.to_string();
                profile.container_name = selector.to_string();
            }
        }
        let separate = match dark_block(reference) {
            Some((selector, members)) => {
                profile.dark_selector = selector;
                members
            }
            None => 0,
        };
        let dynamic = count(light_dark_re(), reference);
        let paired = paired_suffix_count(declarations.iter().map(|d| leaf_name(&d.name)));
        choose_dark_mode(profile, dynamic, paired, separate);
    }
}

/// SCSS variable detector.
pub struct ScssDetector {
    category: ArtifactCategory,
}

impl ScssDetector {
    pub fn new(category: ArtifactCategory) -> Self {
        Self { category }
    }
}

impl ConventionDetector for ScssDetector {
    fn format(&self) -> SourceFormat {
        SourceFormat::Scss
    }

    fn best_practices(&self) -> ConventionProfile {
        let mut profile = ConventionProfile::base(SourceFormat::Scss, self.category);
        profile.naming = NamingCase::Kebab;
        profile.indent = "  ".to_string();
        profile.dark_mode = DarkModeStrategy::Dynamic;
        profile.light_container = "theme-light".to_string();
        profile.dark_container = "theme-dark".to_string();
        profile
    }

    fn probe(&self, reference: &str, declarations: &[Declaration], profile: &mut ConventionProfile) {
        profile.imports = scss_import_re()
            .captures_iter(reference)
            .map(|caps| caps[1].to_string())
            .collect();

        let mut separate = 0;
        for caps in scss_theme_map_re().captures_iter(reference) {
            let name = caps[1].to_string();
            if is_dark_name(&name) {
                profile.dark_container = name;
            } else {
                profile.light_container = name;
                separate += 1;
            }
        }
        // Map entries are not declarations; weigh a theme map pair like a
        // dark block.
        if separate > 0 {
            separate = separate.max(reference.matches("\":").count() / 2);
        }
        let dynamic = count(light_dark_re(), reference);
        let paired = paired_suffix_count(declarations.iter().map(|d| leaf_name(&d.name)));
        choose_dark_mode(profile, dynamic, paired, separate);
    }
}

/// TypeScript constant detector.
pub struct TypeScriptDetector {
    category: ArtifactCategory,
}

impl TypeScriptDetector {
    pub fn new(category: ArtifactCategory) -> Self {
        Self { category }
    }
}

impl ConventionDetector for TypeScriptDetector {
    fn format(&self) -> SourceFormat {
        SourceFormat::TypeScript
    }

    fn best_practices(&self) -> ConventionProfile {
        let mut profile = ConventionProfile::base(SourceFormat::TypeScript, self.category);
        profile.naming = NamingCase::ScreamingSnake;
        profile.indent = "  ".to_string();
        profile.container_keyword = "const".to_string();
        profile.dark_mode = DarkModeStrategy::Dynamic;
        profile.light_container = "lightColors".to_string();
        profile.dark_container = "darkColors".to_string();
        profile
    }

    fn probe(&self, reference: &str, declarations: &[Declaration], profile: &mut ConventionProfile) {
        profile.imports = ts_import_re()
            .captures_iter(reference)
            .map(|caps| caps[1].trim().to_string())
            .collect();

        let mut light_object: Option<String> = None;
        for caps in ts_theme_object_re().captures_iter(reference) {
            let name = caps[1].to_string();
            if is_dark_name(&name) {
                profile.dark_container = name;
            } else {
                light_object.get_or_insert(name);
            }
        }
        let separate = match light_object {
            Some(name) => {
                let prefix = format!("{}.", name);
                let members = declarations
                    .iter()
                    .filter(|d| d.name.starts_with(&prefix))
                    .count();
                profile.light_container = name;
                members
            }
            None => 0,
        };
        let dynamic = count(ts_light_member_re(), reference).min(count(ts_dark_member_re(), reference));
        let paired = paired_suffix_count(
            declarations
                .iter()
                .filter(|d| !d.name.contains('.'))
                .map(|d| leaf_name(&d.name)),
        );
        choose_dark_mode(profile, dynamic, paired, separate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_best_practices() {
        let profile = CssDetector::new(ArtifactCategory::Colors).detect(None, false);
        assert_eq!(profile.naming, NamingCase::Kebab);
        assert_eq!(profile.dark_mode, DarkModeStrategy::Dynamic);
        assert!(!profile.from_reference);
    }

    #[test]
    fn test_css_media_query_block() {
        let reference = ":root {\n  --text-primary: #1d1d1d;\n  --surface: #ffffff;\n}\n\n@media (prefers-color-scheme: dark) {\n  :root {\n    --text-primary: #f5f5f5;\n    --surface: #000000;\n  }\n}\n";
        let profile = CssDetector::new(ArtifactCategory::Colors).detect(Some(reference), false);
        assert_eq!(profile.dark_mode, DarkModeStrategy::SeparateContainers);
        assert_eq!(profile.dark_selector, "@media (prefers-color-scheme: dark)");
        assert_eq!(profile.container_name, ":root");
        assert!(profile.from_reference);
    }

    #[test]
    fn test_css_paired_suffixes() {
        let reference = "html {\n\t--text-primary-light: #1d1d1d;\n\t--text-primary-dark: #f5f5f5;\n}\n";
        let profile = CssDetector::new(ArtifactCategory::Colors).detect(Some(reference), false);
        assert_eq!(profile.dark_mode, DarkModeStrategy::Paired);
        assert_eq!(profile.container_name, "html");
        assert_eq!(profile.indent, "\t");
    }

    #[test]
    fn test_best_practices_flag_ignores_reference() {
        let reference = "html {\n\t--text-primary-light: #1d1d1d;\n\t--text-primary-dark: #f5f5f5;\n}\n";
        let profile = CssDetector::new(ArtifactCategory::Colors).detect(Some(reference), true);
        assert_eq!(profile.dark_mode, DarkModeStrategy::Dynamic);
        assert_eq!(profile.container_name, ":root");
    }

    #[test]
    fn test_scss_theme_maps() {
        let reference = "@use 'sass:map';\n\n$grey-750: #1d1d1d;\n$grey-50: #f5f5f5;\n\n$light-theme: (\n  \"text-primary\": $grey-750,\n);\n$dark-theme: (\n  \"text-primary\": $grey-50,\n);\n";
        let profile = ScssDetector::new(ArtifactCategory::Colors).detect(Some(reference), false);
        assert_eq!(profile.dark_mode, DarkModeStrategy::SeparateContainers);
        assert_eq!(profile.light_container, "light-theme");
        assert_eq!(profile.dark_container, "dark-theme");
        assert_eq!(profile.imports, vec!["@use 'sass:map';".to_string()]);
    }

    #[test]
    fn test_typescript_camel_case_theme_objects() {
        let reference = "export const grey750 = '#1d1d1d';\nexport const grey50 = '#f5f5f5';\n\nexport const lightTheme = {\n  textPrimary: grey750,\n  surface: grey50,\n} as const;\n\nexport const darkTheme = {\n  textPrimary: grey50,\n  surface: grey750,\n} as const;\n";
        let profile = TypeScriptDetector::new(ArtifactCategory::Colors).detect(Some(reference), false);
        assert_eq!(profile.naming, NamingCase::Camel);
        assert_eq!(profile.dark_mode, DarkModeStrategy::SeparateContainers);
        assert_eq!(profile.light_container, "lightTheme");
        assert_eq!(profile.dark_container, "darkTheme");
        assert_eq!(profile.vocabulary.lookup("GREY_750"), Some("grey750"));
    }
}
