//! Kotlin (Jetpack Compose) convention detector.
//!
//! Best practices: `object Primitives` plus `object LightColorTokens` /
//! `object DarkColorTokens` with PascalCase members, followed by
//! Material3 `lightColorScheme`/`darkColorScheme` builders.

use super::{
    apply_layout, choose_dark_mode, container_layout, count, leaf_name, paired_suffix_count,
    ConventionDetector, ConventionProfile, DarkModeStrategy,
};
use regex::Regex;
use std::sync::OnceLock;
use tokenweave_core::{ArtifactCategory, NamingCase, SourceFormat};
use tokenweave_diff::Declaration;

fn package_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*package\s+([\w.]+)").expect("valid regex"))
}

fn import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*import\s+([\w.*]+)").expect("valid regex"))
}

fn dynamic_getter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"get\(\)\s*=\s*if\s*\(\s*isSystemInDarkTheme\(\)").expect("valid regex")
    })
}

fn material3_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"lightColorScheme\(|darkColorScheme\(|androidx\.compose\.material3").expect("valid regex")
    })
}

fn enum_class_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)enum\s+class\s+\w+[^{]*\{([^;}]*)").expect("valid regex"))
}

/// Compose detector.
pub struct KotlinDetector {
    category: ArtifactCategory,
}

impl KotlinDetector {
    pub fn new(category: ArtifactCategory) -> Self {
        Self { category }
    }
}

impl ConventionDetector for KotlinDetector {
    fn format(&self) -> SourceFormat {
        SourceFormat::Kotlin
    }

    fn best_practices(&self) -> ConventionProfile {
        let mut profile = ConventionProfile::base(SourceFormat::Kotlin, self.category);
        profile.naming = NamingCase::Pascal;
        profile.container_keyword = "object".to_string();
        if self.category == ArtifactCategory::Colors {
            profile.primitives_container = Some("Primitives".to_string());
            profile.dark_mode = DarkModeStrategy::SeparateContainers;
            profile.material3 = true;
        }
        profile.light_container = "LightColorTokens".to_string();
        profile.dark_container = "DarkColorTokens".to_string();
        profile.nested_sections = false;
        profile
    }

    fn probe(&self, reference: &str, declarations: &[Declaration], profile: &mut ConventionProfile) {
        if let Some(caps) = package_re().captures(reference) {
            profile.package = Some(caps[1].to_string());
        }
        let imports: Vec<String> = import_re()
            .captures_iter(reference)
            .map(|caps| caps[1].to_string())
            .collect();

        let layout = container_layout(reference, declarations);
        apply_layout(profile, &layout);

        let dynamic = count(dynamic_getter_re(), reference);
        let paired = paired_suffix_count(declarations.iter().map(|d| leaf_name(&d.name)));
        choose_dark_mode(profile, dynamic, paired, layout.light_members);

        profile.material3 = material3_re().is_match(reference);
        if !imports.is_empty() {
            profile.imports = imports;
        }

        profile.enum_cases = enum_class_re()
            .captures_iter(reference)
            .flat_map(|caps| {
                caps[1]
                    .split(',')
                    .filter_map(|entry| entry.trim().split(|c: char| !c.is_alphanumeric() && c != '_').next())
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();
    }
}
