//! Swift convention detector.
//!
//! Best practices: a `struct AppColors` of `static let` members with a
//! nested `Primitives` enum and a `Color(light:dark:)` helper, SwiftUI,
//! Dynamic Type anchors and tracking on text styles.

use super::{
    apply_layout, choose_dark_mode, container_layout, count, leaf_name, paired_suffix_count,
    ConventionDetector, ConventionProfile, DarkModeStrategy, UiFramework,
};
use regex::Regex;
use std::sync::OnceLock;
use tokenweave_core::{ArtifactCategory, NamingCase, SourceFormat};
use tokenweave_diff::Declaration;

fn import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*import\s+(\w+)").expect("valid regex"))
}

fn dynamic_call_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Color\(\s*light:|UIColor\s*\{|UIColor\(\s*dynamicProvider:").expect("valid regex")
    })
}

fn helper_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"init\(\s*light:").expect("valid regex"))
}

fn font_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(?:Font|UIFont)\b").expect("valid regex"))
}

fn dynamic_type_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"relativeTo:|@ScaledMetric|UIFontMetrics|dynamicTypeSize|preferredFont").expect("valid regex")
    })
}

fn tracking_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)tracking|kern|letterSpacing").expect("valid regex"))
}

fn case_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*case\s+([^:=\n]+?)\s*(?:=.*)?$").expect("valid regex"))
}

/// SwiftUI / UIKit detector.
pub struct SwiftDetector {
    category: ArtifactCategory,
}

impl SwiftDetector {
    pub fn new(category: ArtifactCategory) -> Self {
        Self { category }
    }
}

impl ConventionDetector for SwiftDetector {
    fn format(&self) -> SourceFormat {
        SourceFormat::Swift
    }

    fn best_practices(&self) -> ConventionProfile {
        let mut profile = ConventionProfile::base(SourceFormat::Swift, self.category);
        profile.naming = NamingCase::Camel;
        profile.container_keyword = if self.category == ArtifactCategory::Colors {
            "struct".to_string()
        } else {
            "enum".to_string()
        };
        if self.category == ArtifactCategory::Colors {
            profile.primitives_container = Some("Primitives".to_string());
        }
        profile.nested_sections = true;
        profile.dark_mode = DarkModeStrategy::Dynamic;
        profile.framework = UiFramework::SwiftUI;
        profile.imports = vec!["SwiftUI".to_string()];
        profile.dynamic_helper = true;
        profile.dynamic_type = true;
        profile.tracking = true;
        profile
    }

    fn probe(&self, reference: &str, declarations: &[Declaration], profile: &mut ConventionProfile) {
        let imports: Vec<String> = import_re()
            .captures_iter(reference)
            .map(|caps| caps[1].to_string())
            .collect();
        if !imports.is_empty() {
            let swiftui = imports.iter().any(|i| i == "SwiftUI");
            let uikit = imports.iter().any(|i| i == "UIKit");
            if uikit && !swiftui {
                profile.framework = UiFramework::UIKit;
            }
            profile.imports = imports;
        }

        let layout = container_layout(reference, declarations);
        apply_layout(profile, &layout);

        let dynamic = count(dynamic_call_re(), reference).saturating_sub(count(helper_re(), reference));
        let paired = paired_suffix_count(declarations.iter().map(|d| leaf_name(&d.name)));
        choose_dark_mode(profile, dynamic, paired, layout.light_members);

        if helper_re().is_match(reference) {
            profile.dynamic_helper = true;
        } else if dynamic > 0 {
            // Calls without a definition: the helper lives elsewhere.
            profile.dynamic_helper = false;
        }

        if count(font_re(), reference) > 0 {
            profile.dynamic_type = dynamic_type_re().is_match(reference);
            profile.tracking = tracking_re().is_match(reference);
        }

        profile.enum_cases = case_re()
            .captures_iter(reference)
            .flat_map(|caps| {
                caps[1]
                    .split(',')
                    .filter_map(|c| c.split('(').next())
                    .map(|c| c.trim().trim_matches('`').to_string())
                    .filter(|c| !c.is_empty() && !c.starts_with('.') && !c.starts_with('"'))
                    .collect::<Vec<_>>()
            })
            .collect();
    }
}
