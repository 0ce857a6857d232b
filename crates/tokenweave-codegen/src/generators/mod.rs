//! Code generators.
//!
//! Every target language implements [`EmitterPolicy`]: naming, container
//! rendering and value rendering. The category emitters ([`colors`],
//! [`spacing`], [`typography`], [`composite`]) walk the tokens once and
//! drive a policy, so sorting, grouping and light/dark handling live in
//! one place.

pub mod colors;
pub mod composite;
mod kotlin;
pub mod palette;
pub mod spacing;
mod swift;
pub mod templates;
pub mod typography;
mod web;
pub mod writer;

pub use colors::{emit_palette, Collision, PalettePlan, PaletteSlice};
pub use kotlin::KotlinPolicy;
pub use palette::{ColorRef, Palette, Primitive, SemanticEntry};
pub use swift::SwiftPolicy;
pub use templates::{FileHeader, TemplateEngine};
pub use web::{CssPolicy, ScssPolicy, TypeScriptPolicy};
pub use writer::SourceWriter;

use crate::conventions::ConventionProfile;
use colors::{ordered, push_grouped};
use std::collections::HashMap;
use tokenweave_core::{
    ensure_identifier_start, format_number, is_elided_segment, path_words, Color, SourceFormat,
};

/// The role of a container opened by an emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// The file's main container (`struct AppColors`, `:root`).
    Main,
    Primitives,
    Light,
    Dark,
    /// One semantic group (`TextColors`).
    Group,
}

/// Language-specific rendering used by every category emitter.
pub trait EmitterPolicy: Send + Sync {
    fn profile(&self) -> &ConventionProfile;

    fn format(&self) -> SourceFormat {
        self.profile().format
    }

    /// Reserved words that must be escaped when used as identifiers.
    fn keywords(&self) -> &'static [&'static str] {
        &[]
    }

    /// Whether an identifier may start with a digit.
    fn allows_leading_digit(&self) -> bool {
        false
    }

    /// Identifier for a list of words: the reference spelling when the
    /// vocabulary knows it, otherwise the profile's naming case.
    fn identifier(&self, words: &[String]) -> String {
        let profile = self.profile();
        let generated = profile.naming.apply(words);
        if generated.is_empty() {
            return generated;
        }
        let ident = match profile.vocabulary.lookup(&generated) {
            Some(spelling) => spelling.to_string(),
            None if self.allows_leading_digit() => generated,
            None => ensure_identifier_start(generated),
        };
        if self.keywords().contains(&ident.as_str()) {
            format!("`{}`", ident)
        } else {
            ident
        }
    }

    /// Identifier as written in a declaration (`--x`, `$x`, `x`).
    fn declared(&self, ident: &str) -> String {
        ident.to_string()
    }

    /// Whether members are addressed through their container. Flat
    /// formats (CSS, SCSS, TypeScript) keep every name globally unique.
    fn scoped(&self) -> bool {
        true
    }

    /// Whether the file wraps its declarations in a main container.
    fn main_container(&self) -> bool {
        true
    }

    /// Light members of separate containers go straight into the main
    /// container (CSS `:root`).
    fn light_in_main(&self) -> bool {
        false
    }

    /// Whether a dark container repeats members identical to light.
    fn dark_includes_static(&self) -> bool {
        true
    }

    fn color_literal(&self, color: Color) -> String;

    /// Reference to a primitive from a semantic declaration.
    fn primitive_ref(&self, qualifier: Option<&str>, ident: &str) -> String {
        match qualifier {
            Some(q) => format!("{}.{}", q, ident),
            None => ident.to_string(),
        }
    }

    /// Package line and imports: the profile's, then any of `required`
    /// it lacks.
    fn imports(&self, _w: &mut SourceWriter, _required: &[&str]) {}

    /// Imports and helpers ahead of the first color container.
    fn preamble(&self, w: &mut SourceWriter, _plan: &PalettePlan) {
        self.imports(w, &[]);
    }

    /// Anything trailing the containers.
    fn postamble(&self, _w: &mut SourceWriter, _plan: &PalettePlan) {}

    fn open(&self, w: &mut SourceWriter, container: Container, name: &str);

    fn close(&self, w: &mut SourceWriter, container: Container);

    fn primitive(&self, w: &mut SourceWriter, container: Container, ident: &str, path: &str, color: Color) {
        let literal = self.color_literal(color);
        self.constant(w, container, ident, path, None, &literal);
    }

    /// A constant declaration. `ty` is an optional type annotation for
    /// languages that want one.
    fn constant(
        &self,
        w: &mut SourceWriter,
        container: Container,
        ident: &str,
        path: &str,
        ty: Option<&str>,
        expr: &str,
    );

    /// A declaration resolving to `light` or `dark` by appearance.
    fn dynamic(&self, w: &mut SourceWriter, ident: &str, path: &str, light: &str, dark: &str);
}

/// The policy for a profile's format.
pub fn policy_for(profile: ConventionProfile) -> Box<dyn EmitterPolicy> {
    match profile.format {
        SourceFormat::Css => Box::new(CssPolicy::new(profile)),
        SourceFormat::Scss => Box::new(ScssPolicy::new(profile)),
        SourceFormat::TypeScript => Box::new(TypeScriptPolicy::new(profile)),
        SourceFormat::Swift => Box::new(SwiftPolicy::new(profile)),
        SourceFormat::Kotlin => Box::new(KotlinPolicy::new(profile)),
    }
}

/// A named constant of a non-color category.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueEntry {
    pub ident: String,
    /// Canonical token path.
    pub path: String,
    pub expr: String,
    pub ty: Option<String>,
}

/// A token bound for a constants file, before naming.
#[derive(Debug, Clone)]
pub(crate) struct Pending<T> {
    pub path: String,
    /// Segments the name and group come from.
    pub segments: Vec<String>,
    /// Alias targets, nearest first.
    pub targets: Vec<String>,
    pub value: T,
}

/// Name, group and order tokens, then render them. An alias whose target
/// is declared earlier in the same file references it instead of
/// repeating the value.
pub(crate) fn plan_values<P, T, F>(
    policy: &P,
    w: &mut SourceWriter,
    pending: Vec<Pending<T>>,
    mut render: F,
) -> Vec<(String, Vec<ValueEntry>)>
where
    P: EmitterPolicy + ?Sized,
    F: FnMut(&T) -> Option<(String, Option<String>)>,
{
    let mut groups: Vec<(String, Vec<(String, Pending<T>)>)> = Vec::new();
    for item in pending {
        let ident = policy.identifier(&path_words(&item.segments));
        if ident.is_empty() {
            continue;
        }
        let label = item
            .segments
            .iter()
            .find(|s| !is_elided_segment(s))
            .cloned()
            .unwrap_or_default();
        push_grouped(&mut groups, &label, (ident, item));
    }

    let mut declared: HashMap<String, String> = HashMap::new();
    let mut out = Vec::new();
    let (groups, collisions) = ordered(groups, |(ident, _)| ident.as_str(), |(_, item)| item.path.as_str());
    w.collided(&collisions);
    for (label, items) in groups {
        let mut entries = Vec::new();
        for (ident, item) in items {
            let Some((literal, ty)) = render(&item.value) else {
                tracing::debug!(token = %item.path, format = %policy.format(), "no representation, skipped");
                continue;
            };
            let expr = item
                .targets
                .iter()
                .find_map(|target| declared.get(target))
                .map(|target| policy.primitive_ref(None, target))
                .unwrap_or(literal);
            declared.insert(item.path.clone(), ident.clone());
            entries.push(ValueEntry {
                ident,
                path: item.path,
                expr,
                ty,
            });
        }
        if !entries.is_empty() {
            out.push((label, entries));
        }
    }
    out
}

/// Emit grouped constants into the profile's main container, after the
/// imports and any one-line helper declarations.
pub(crate) fn emit_values<P: EmitterPolicy + ?Sized>(
    policy: &P,
    w: &mut SourceWriter,
    groups: &[(String, Vec<ValueEntry>)],
    required: &[&str],
    helpers: &[String],
) {
    policy.imports(w, required);
    for helper in helpers {
        w.line(helper);
    }
    let profile = policy.profile();
    if policy.main_container() {
        w.blank();
        policy.open(w, Container::Main, &profile.container_name);
    }
    for (group, items) in groups {
        w.blank();
        if !group.is_empty() {
            w.comment(group);
        }
        for item in items {
            policy.constant(w, Container::Main, &item.ident, &item.path, item.ty.as_deref(), &item.expr);
        }
    }
    if policy.main_container() {
        policy.close(w, Container::Main);
    }
}

/// A string literal in the target language.
pub(crate) fn string_literal(format: SourceFormat, text: &str) -> String {
    match format {
        SourceFormat::Css | SourceFormat::Scss => text.to_string(),
        SourceFormat::TypeScript => format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'")),
        SourceFormat::Swift | SourceFormat::Kotlin => {
            format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
        }
    }
}

/// Round to three decimals and print without trailing zeros.
pub(crate) fn decimal(value: f64) -> String {
    format_number((value * 1000.0).round() / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::detector_for;
    use tokenweave_core::ArtifactCategory;

    fn words(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_identifier_hygiene() {
        let swift = policy_for(detector_for(SourceFormat::Swift, ArtifactCategory::Spacing).detect(None, true));
        assert_eq!(swift.identifier(&words(&["2xl"])), "_2xl");
        assert_eq!(swift.identifier(&words(&["default"])), "`default`");

        let css = policy_for(detector_for(SourceFormat::Css, ArtifactCategory::Spacing).detect(None, true));
        assert_eq!(css.identifier(&words(&["2xl"])), "2xl");
        assert_eq!(css.declared("2xl"), "--2xl");
    }

    #[test]
    fn test_identifier_prefers_reference_spelling() {
        let reference = "object AppColors {\n    val grey_750 = Color(0xFF1D1D1D)\n    val text_primary = grey_750\n}\n";
        let profile = detector_for(SourceFormat::Kotlin, ArtifactCategory::Colors).detect(Some(reference), false);
        let kotlin = policy_for(profile);
        assert_eq!(kotlin.identifier(&words(&["Grey", "750"])), "grey_750");
        assert_eq!(kotlin.identifier(&words(&["Surface", "raised"])), "surface_raised");
    }

    #[test]
    fn test_decimal() {
        assert_eq!(decimal(0.11372), "0.114");
        assert_eq!(decimal(1.0), "1");
    }
}
