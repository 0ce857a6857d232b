//! Convention detection.
//!
//! Each target language has a detector that turns an optional reference
//! file into a [`ConventionProfile`]. Every axis is probed independently
//! with regex counts; an axis without evidence keeps its best-practices
//! default.

mod kotlin;
mod lint;
mod swift;
mod web;

pub use kotlin::KotlinDetector;
pub use lint::lint_reference;
pub use swift::SwiftDetector;
pub use web::{CssDetector, ScssDetector, TypeScriptDetector};

use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use tokenweave_core::{normalize_identifier, split_words, ArtifactCategory, NamingCase, SourceFormat};
use tokenweave_diff::{extract_declarations, Declaration};

/// How a light/dark pair is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DarkModeStrategy {
    /// One declaration resolving per appearance.
    Dynamic,
    /// Flat `…Light` / `…Dark` declarations.
    Paired,
    /// A light container and a dark container with the same members.
    SeparateContainers,
}

/// Whether semantic colors share one container or get one per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerShape {
    Single,
    PerCategory,
}

/// Apple UI framework used by Swift output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UiFramework {
    SwiftUI,
    UIKit,
}

/// Identifier spellings taken verbatim from a reference, keyed by their
/// normalised form.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Vocabulary {
    spellings: HashMap<String, String>,
}

impl Vocabulary {
    /// Index identifiers; the first spelling of a key wins.
    pub fn from_identifiers<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut spellings = HashMap::new();
        for ident in identifiers {
            let ident = bare_identifier(ident.as_ref());
            let key = normalize_identifier(ident);
            if !key.is_empty() {
                spellings.entry(key).or_insert_with(|| ident.to_string());
            }
        }
        Self { spellings }
    }

    /// The reference spelling of `ident`, if any.
    pub fn lookup(&self, ident: &str) -> Option<&str> {
        self.spellings
            .get(&normalize_identifier(ident))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.spellings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spellings.is_empty()
    }
}

/// Stylistic conventions for one target language and category.
#[derive(Debug, Clone, Serialize)]
pub struct ConventionProfile {
    pub format: SourceFormat,
    pub category: ArtifactCategory,
    /// Whether any axis came from a reference file.
    pub from_reference: bool,
    pub naming: NamingCase,
    pub indent: String,
    /// `struct`, `enum`, `extension`, `object`, or a CSS selector.
    pub container_keyword: String,
    pub container_name: String,
    pub primitives_container: Option<String>,
    pub light_container: String,
    pub dark_container: String,
    /// Primitive and light/dark containers live inside the main container.
    pub nested_sections: bool,
    pub shape: ContainerShape,
    /// Suffix of per-category container names (`TextColors`).
    pub category_suffix: String,
    pub dark_mode: DarkModeStrategy,
    pub imports: Vec<String>,
    pub package: Option<String>,
    pub framework: UiFramework,
    /// Emit the `Color(light:dark:)` initializer alongside the tokens.
    pub dynamic_helper: bool,
    pub material3: bool,
    pub dynamic_type: bool,
    pub tracking: bool,
    /// Selector (or at-rule) wrapping dark overrides in CSS.
    pub dark_selector: String,
    pub vocabulary: Vocabulary,
    pub enum_cases: Vec<String>,
}

impl ConventionProfile {
    /// Language-neutral defaults; detectors override per language.
    pub(crate) fn base(format: SourceFormat, category: ArtifactCategory) -> Self {
        Self {
            format,
            category,
            from_reference: false,
            naming: NamingCase::Camel,
            indent: "    ".to_string(),
            container_keyword: String::new(),
            container_name: format!("App{}", category.title()),
            primitives_container: None,
            light_container: "Light".to_string(),
            dark_container: "Dark".to_string(),
            nested_sections: false,
            shape: ContainerShape::Single,
            category_suffix: category.title().to_string(),
            dark_mode: DarkModeStrategy::Dynamic,
            imports: Vec::new(),
            package: None,
            framework: UiFramework::SwiftUI,
            dynamic_helper: false,
            material3: false,
            dynamic_type: false,
            tracking: false,
            dark_selector: String::new(),
            vocabulary: Vocabulary::default(),
            enum_cases: Vec::new(),
        }
    }
}

/// A per-language convention detector.
pub trait ConventionDetector: Send + Sync {
    /// Format this detector handles.
    fn format(&self) -> SourceFormat;

    /// The fixed opinionated default profile.
    fn best_practices(&self) -> ConventionProfile;

    /// Language-specific probes over a reference file.
    fn probe(&self, reference: &str, declarations: &[Declaration], profile: &mut ConventionProfile);

    /// Infer a profile from an optional reference.
    fn detect(&self, reference: Option<&str>, use_best_practices: bool) -> ConventionProfile {
        let mut profile = self.best_practices();
        let Some(text) = reference.filter(|t| !t.trim().is_empty()) else {
            return profile;
        };
        if use_best_practices {
            return profile;
        }

        let declarations = extract_declarations(text, self.format());
        if let Some(indent) = detect_indent(text) {
            profile.indent = indent;
        }
        if let Some(naming) = naming_majority(declarations.iter().map(|d| leaf_name(&d.name))) {
            profile.naming = naming;
        }
        self.probe(text, &declarations, &mut profile);
        profile.vocabulary = Vocabulary::from_identifiers(
            declarations
                .iter()
                .map(|d| leaf_name(&d.name))
                .chain(profile.enum_cases.iter().map(String::as_str))
                .chain(std::iter::once(profile.container_name.as_str())),
        );
        profile.from_reference = true;

        tracing::debug!(
            format = %self.format(),
            naming = %profile.naming,
            container = %profile.container_name,
            dark_mode = ?profile.dark_mode,
            shape = ?profile.shape,
            vocabulary = profile.vocabulary.len(),
            "detected conventions"
        );
        profile
    }
}

/// Detector for a format and category.
pub fn detector_for(format: SourceFormat, category: ArtifactCategory) -> Box<dyn ConventionDetector> {
    match format {
        SourceFormat::Css => Box::new(CssDetector::new(category)),
        SourceFormat::Scss => Box::new(ScssDetector::new(category)),
        SourceFormat::TypeScript => Box::new(TypeScriptDetector::new(category)),
        SourceFormat::Swift => Box::new(SwiftDetector::new(category)),
        SourceFormat::Kotlin => Box::new(KotlinDetector::new(category)),
    }
}

/// Identifier without sigils or backticks.
pub(crate) fn bare_identifier(ident: &str) -> &str {
    ident
        .trim_start_matches(['-', '$'])
        .trim_matches('`')
}

/// Last component of a qualified declaration name.
pub(crate) fn leaf_name(name: &str) -> &str {
    bare_identifier(name.rsplit('.').next().unwrap_or(name))
}

/// Count regex matches.
pub(crate) fn count(re: &Regex, text: &str) -> usize {
    re.find_iter(text).count()
}

/// Indentation unit: tab, 2 or 4 spaces.
pub(crate) fn detect_indent(text: &str) -> Option<String> {
    let mut tabs = 0usize;
    let mut two = 0usize;
    let mut four = 0usize;
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        if line.starts_with('\t') {
            tabs += 1;
            continue;
        }
        let spaces = line.len() - line.trim_start_matches(' ').len();
        if spaces == 0 {
            continue;
        }
        if spaces % 4 == 0 {
            four += 1;
        } else if spaces % 2 == 0 {
            two += 1;
        }
    }
    if tabs == 0 && two == 0 && four == 0 {
        None
    } else if tabs > two + four {
        Some("\t".to_string())
    } else if two > 0 {
        Some("  ".to_string())
    } else {
        Some("    ".to_string())
    }
}

/// Most common unambiguous naming case among identifiers.
pub(crate) fn naming_majority<'a>(identifiers: impl Iterator<Item = &'a str>) -> Option<NamingCase> {
    let mut counts: Vec<(NamingCase, usize)> = NamingCase::ALL.iter().map(|c| (*c, 0)).collect();
    for ident in identifiers {
        if let Some(case) = NamingCase::classify(ident) {
            if let Some(entry) = counts.iter_mut().find(|(c, _)| *c == case) {
                entry.1 += 1;
            }
        }
    }
    // Stable: ties go to the earlier case in `NamingCase::ALL`.
    let (case, n) = counts
        .into_iter()
        .fold((NamingCase::Camel, 0), |best, next| if next.1 > best.1 { next } else { best });
    (n > 0).then_some(case)
}

/// Containers that hold at least one declaration, as found in a reference.
#[derive(Debug, Default)]
pub(crate) struct ContainerLayout {
    /// `(keyword, name)` of the first top-level container that is neither
    /// a primitive nor a light/dark container.
    pub main: Option<(String, String)>,
    pub primitives: Option<String>,
    pub light: Option<String>,
    pub dark: Option<String>,
    /// Whether the primitive or light/dark containers are nested.
    pub nested: Option<bool>,
    /// Top-level containers sharing a trailing word (`TextColors`,
    /// `BackgroundColors`), with that word.
    pub categories: Option<String>,
    /// Declarations inside the light container.
    pub light_members: usize,
}

const PRIMITIVE_WORDS: &[&str] = &["primitive", "primitives", "palette", "core", "base", "raw", "ref", "reference"];

fn has_word(name: &str, candidates: &[&str]) -> bool {
    split_words(name)
        .iter()
        .any(|w| candidates.iter().any(|c| w.eq_ignore_ascii_case(c)))
}

fn edge_word_is(name: &str, word: &str) -> bool {
    let words = split_words(name);
    let matches = |w: Option<&String>| w.map_or(false, |w| w.eq_ignore_ascii_case(word));
    matches(words.first()) || matches(words.last())
}

/// Keyword a container was declared with.
fn container_keyword(text: &str, name: &str) -> Option<String> {
    let pattern = format!(
        r"\b(struct|enum|extension|class|object|interface)\s+{}\b",
        regex::escape(name)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(text).map(|caps| caps[1].to_string())
}

/// Classify the containers that qualify `declarations`.
pub(crate) fn container_layout(text: &str, declarations: &[Declaration]) -> ContainerLayout {
    let mut layout = ContainerLayout::default();
    let mut top_level: Vec<String> = Vec::new();
    let mut extensions: Vec<String> = Vec::new();

    for decl in declarations {
        let parts: Vec<&str> = decl.name.split('.').collect();
        let containers = &parts[..parts.len().saturating_sub(1)];
        for (depth, name) in containers.iter().enumerate() {
            let name = name.to_string();
            if edge_word_is(&name, "light") {
                let light = layout.light.get_or_insert_with(|| name.clone());
                if *light == name && depth + 2 == parts.len() {
                    layout.light_members += 1;
                }
                layout.nested.get_or_insert(depth > 0);
            } else if edge_word_is(&name, "dark") {
                layout.dark.get_or_insert(name);
                layout.nested.get_or_insert(depth > 0);
            } else if has_word(&name, PRIMITIVE_WORDS) {
                layout.primitives.get_or_insert(name);
                layout.nested.get_or_insert(depth > 0);
            } else if depth == 0 && !top_level.contains(&name) && !extensions.contains(&name) {
                match container_keyword(text, &name).as_deref() {
                    Some("extension") => extensions.push(name),
                    _ => top_level.push(name),
                }
            }
        }
    }

    layout.main = top_level
        .first()
        .map(|name| {
            let keyword = container_keyword(text, name).unwrap_or_default();
            (keyword, name.clone())
        })
        .or_else(|| extensions.first().map(|name| ("extension".to_string(), name.clone())));

    if top_level.len() >= 2 {
        let last_words: Vec<String> = top_level
            .iter()
            .filter_map(|name| split_words(name).last().cloned())
            .collect();
        if last_words.len() == top_level.len() && last_words.iter().all(|w| *w == last_words[0]) {
            layout.categories = Some(last_words[0].clone());
        }
    }
    layout
}

/// Apply a detected container layout to a profile.
pub(crate) fn apply_layout(profile: &mut ConventionProfile, layout: &ContainerLayout) {
    if let Some((keyword, name)) = &layout.main {
        if !keyword.is_empty() {
            profile.container_keyword = keyword.clone();
        }
        profile.container_name = name.clone();
    }
    match (&layout.primitives, &layout.main) {
        (Some(primitives), _) => profile.primitives_container = Some(primitives.clone()),
        // Declarations without a primitive container share the main one.
        (None, Some(_)) => profile.primitives_container = None,
        (None, None) => {}
    }
    if let Some(light) = &layout.light {
        profile.light_container = light.clone();
    }
    if let Some(dark) = &layout.dark {
        profile.dark_container = dark.clone();
    }
    if let Some(nested) = layout.nested {
        profile.nested_sections = nested;
    }
    if let Some(suffix) = &layout.categories {
        profile.shape = ContainerShape::PerCategory;
        profile.category_suffix = suffix.clone();
    }
}

/// Number of base names declared with both a light and a dark suffix.
pub(crate) fn paired_suffix_count<'a>(identifiers: impl Iterator<Item = &'a str>) -> usize {
    let mut light = std::collections::HashSet::new();
    let mut dark = std::collections::HashSet::new();
    for ident in identifiers {
        let key = normalize_identifier(ident);
        if let Some(base) = key.strip_suffix("light").filter(|b| !b.is_empty()) {
            light.insert(base.to_string());
        } else if let Some(base) = key.strip_suffix("dark").filter(|b| !b.is_empty()) {
            dark.insert(base.to_string());
        }
    }
    light.intersection(&dark).count()
}

/// Pick the best-evidenced dark-mode strategy, keeping the default when
/// nothing was seen or the evidence ties with it.
pub(crate) fn choose_dark_mode(
    profile: &mut ConventionProfile,
    dynamic: usize,
    paired: usize,
    separate: usize,
) {
    let evidence = [
        (DarkModeStrategy::Dynamic, dynamic),
        (DarkModeStrategy::Paired, paired),
        (DarkModeStrategy::SeparateContainers, separate),
    ];
    let best = evidence.iter().map(|(_, n)| *n).max().unwrap_or(0);
    if best == 0 {
        return;
    }
    let current = evidence
        .iter()
        .find(|(s, _)| *s == profile.dark_mode)
        .map_or(0, |(_, n)| *n);
    if current == best {
        return;
    }
    if let Some((strategy, _)) = evidence.iter().find(|(_, n)| *n == best) {
        profile.dark_mode = *strategy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_indent() {
        assert_eq!(detect_indent("a {\n  b\n    c\n}"), Some("  ".to_string()));
        assert_eq!(detect_indent("a {\n    b\n}"), Some("    ".to_string()));
        assert_eq!(detect_indent("a {\n\tb\n\t\tc\n}"), Some("\t".to_string()));
        assert_eq!(detect_indent("flat\nfile"), None);
    }

    #[test]
    fn test_naming_majority() {
        let idents = ["grey750", "textPrimary", "TextSecondary", "surfaceRaised"];
        assert_eq!(naming_majority(idents.into_iter()), Some(NamingCase::Camel));
        let ambiguous = ["grey", "white"];
        assert_eq!(naming_majority(ambiguous.into_iter()), None);
    }

    #[test]
    fn test_paired_suffix_count() {
        let idents = ["textPrimaryLight", "textPrimaryDark", "iconLight", "light"];
        assert_eq!(paired_suffix_count(idents.into_iter()), 1);
    }

    #[test]
    fn test_vocabulary_keeps_first_spelling() {
        let vocab = Vocabulary::from_identifiers(["--Grey-750", "grey750", "`default`"]);
        assert_eq!(vocab.lookup("grey_750"), Some("Grey-750"));
        assert_eq!(vocab.lookup("Default"), Some("default"));
        assert_eq!(vocab.lookup("blue"), None);
    }

    #[test]
    fn test_container_layout_swift() {
        let text = "extension Color {\n    init(light: Color, dark: Color) {\n    }\n}\n\nstruct BrandColors {\n    enum Palette {\n        static let grey50 = Color.white\n    }\n    enum Light {\n        static let textPrimary = Palette.grey50\n    }\n    enum Dark {\n        static let textPrimary = Palette.grey50\n    }\n}\n";
        let decls = extract_declarations(text, SourceFormat::Swift);
        let layout = container_layout(text, &decls);
        assert_eq!(layout.main, Some(("struct".to_string(), "BrandColors".to_string())));
        assert_eq!(layout.primitives.as_deref(), Some("Palette"));
        assert_eq!(layout.light.as_deref(), Some("Light"));
        assert_eq!(layout.dark.as_deref(), Some("Dark"));
        assert_eq!(layout.nested, Some(true));
        assert_eq!(layout.light_members, 1);
        assert_eq!(layout.categories, None);
    }

    #[test]
    fn test_container_layout_per_category() {
        let text = "object TextColors {\n    val Primary = Color(0xFF000000)\n}\nobject BackgroundColors {\n    val Primary = Color(0xFFFFFFFF)\n}\n";
        let decls = extract_declarations(text, SourceFormat::Kotlin);
        let layout = container_layout(text, &decls);
        assert_eq!(layout.categories.as_deref(), Some("Colors"));
        assert_eq!(layout.main, Some(("object".to_string(), "TextColors".to_string())));
    }

    #[test]
    fn test_choose_dark_mode_keeps_default_on_tie() {
        let mut profile = ConventionProfile::base(SourceFormat::Swift, ArtifactCategory::Colors);
        choose_dark_mode(&mut profile, 0, 0, 0);
        assert_eq!(profile.dark_mode, DarkModeStrategy::Dynamic);
        choose_dark_mode(&mut profile, 2, 2, 0);
        assert_eq!(profile.dark_mode, DarkModeStrategy::Dynamic);
        choose_dark_mode(&mut profile, 0, 3, 1);
        assert_eq!(profile.dark_mode, DarkModeStrategy::Paired);
    }
}
