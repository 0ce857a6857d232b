//! Web policies: CSS custom properties, SCSS variables and TypeScript
//! constants.

use super::colors::PalettePlan;
use super::{Container, EmitterPolicy, SourceWriter};
use crate::conventions::{ConventionProfile, DarkModeStrategy};
use tokenweave_core::{ArtifactCategory, Color};

/// CSS custom properties on `:root`.
pub struct CssPolicy {
    profile: ConventionProfile,
}

impl CssPolicy {
    pub fn new(profile: ConventionProfile) -> Self {
        Self { profile }
    }

    fn dark_is_at_rule(&self) -> bool {
        self.profile.dark_selector.starts_with('@')
    }
}

impl EmitterPolicy for CssPolicy {
    fn profile(&self) -> &ConventionProfile {
        &self.profile
    }

    fn allows_leading_digit(&self) -> bool {
        true
    }

    fn declared(&self, ident: &str) -> String {
        format!("--{}", ident)
    }

    fn scoped(&self) -> bool {
        false
    }

    fn light_in_main(&self) -> bool {
        true
    }

    fn dark_includes_static(&self) -> bool {
        false
    }

    fn color_literal(&self, color: Color) -> String {
        color.to_hex()
    }

    fn primitive_ref(&self, _qualifier: Option<&str>, ident: &str) -> String {
        format!("var(--{})", ident)
    }

    fn open(&self, w: &mut SourceWriter, container: Container, name: &str) {
        match container {
            Container::Main => {
                w.open(format!("{} {{", name), None);
                if self.profile.category == ArtifactCategory::Colors
                    && self.profile.dark_mode == DarkModeStrategy::Dynamic
                {
                    w.line("color-scheme: light dark;");
                }
            }
            Container::Dark => {
                w.open(format!("{} {{", self.profile.dark_selector), None);
                if self.dark_is_at_rule() {
                    w.open(format!("{} {{", self.profile.container_name), None);
                }
            }
            Container::Primitives | Container::Light | Container::Group => {}
        }
    }

    fn close(&self, w: &mut SourceWriter, container: Container) {
        match container {
            Container::Main => w.close("}"),
            Container::Dark => {
                if self.dark_is_at_rule() {
                    w.close("}");
                }
                w.close("}");
            }
            Container::Primitives | Container::Light | Container::Group => {}
        }
    }

    fn constant(
        &self,
        w: &mut SourceWriter,
        _container: Container,
        ident: &str,
        path: &str,
        _ty: Option<&str>,
        expr: &str,
    ) {
        let name = self.declared(ident);
        w.declare(&name, path, format!("{}: {};", name, expr));
    }

    fn dynamic(&self, w: &mut SourceWriter, ident: &str, path: &str, light: &str, dark: &str) {
        let expr = format!("light-dark({}, {})", light, dark);
        self.constant(w, Container::Main, ident, path, None, &expr);
    }
}

/// SCSS variables, with theme maps for separate light/dark containers.
pub struct ScssPolicy {
    profile: ConventionProfile,
}

impl ScssPolicy {
    pub fn new(profile: ConventionProfile) -> Self {
        Self { profile }
    }
}

/// Write the profile's import lines plus missing `required` ones.
fn import_lines(w: &mut SourceWriter, profile: &ConventionProfile, required: &[&str]) {
    let mut lines: Vec<&str> = profile.imports.iter().map(String::as_str).collect();
    for line in required.iter().copied() {
        if !lines.contains(&line) {
            lines.push(line);
        }
    }
    if lines.is_empty() {
        return;
    }
    for line in lines {
        w.line(line);
    }
    w.blank();
}

impl EmitterPolicy for ScssPolicy {
    fn profile(&self) -> &ConventionProfile {
        &self.profile
    }

    fn declared(&self, ident: &str) -> String {
        format!("${}", ident)
    }

    fn scoped(&self) -> bool {
        false
    }

    fn main_container(&self) -> bool {
        false
    }

    fn color_literal(&self, color: Color) -> String {
        color.to_hex()
    }

    fn primitive_ref(&self, _qualifier: Option<&str>, ident: &str) -> String {
        format!("${}", ident)
    }

    fn imports(&self, w: &mut SourceWriter, required: &[&str]) {
        import_lines(w, &self.profile, required);
    }

    fn preamble(&self, w: &mut SourceWriter, plan: &PalettePlan) {
        match &plan.primitives_module {
            Some(module) => self.imports(w, &[format!("@use '{}' as *;", module).as_str()]),
            None => self.imports(w, &[]),
        }
    }

    fn open(&self, w: &mut SourceWriter, container: Container, name: &str) {
        if matches!(container, Container::Light | Container::Dark) {
            w.open(format!("${}: (", name), None);
        }
    }

    fn close(&self, w: &mut SourceWriter, container: Container) {
        if matches!(container, Container::Light | Container::Dark) {
            w.close(");");
        }
    }

    fn constant(
        &self,
        w: &mut SourceWriter,
        container: Container,
        ident: &str,
        path: &str,
        _ty: Option<&str>,
        expr: &str,
    ) {
        match container {
            Container::Light | Container::Dark => {
                w.member(ident, path, format!("\"{}\": {},", ident, expr));
            }
            _ => {
                let name = self.declared(ident);
                w.declare(&name, path, format!("{}: {};", name, expr));
            }
        }
    }

    fn dynamic(&self, w: &mut SourceWriter, ident: &str, path: &str, light: &str, dark: &str) {
        let expr = format!("light-dark({}, {})", light, dark);
        self.constant(w, Container::Main, ident, path, None, &expr);
    }
}

/// Exported TypeScript constants.
pub struct TypeScriptPolicy {
    profile: ConventionProfile,
}

impl TypeScriptPolicy {
    pub fn new(profile: ConventionProfile) -> Self {
        Self { profile }
    }
}

impl EmitterPolicy for TypeScriptPolicy {
    fn profile(&self) -> &ConventionProfile {
        &self.profile
    }

    fn scoped(&self) -> bool {
        false
    }

    fn main_container(&self) -> bool {
        false
    }

    fn color_literal(&self, color: Color) -> String {
        format!("'{}'", color.to_hex())
    }

    fn imports(&self, w: &mut SourceWriter, required: &[&str]) {
        import_lines(w, &self.profile, required);
    }

    fn preamble(&self, w: &mut SourceWriter, plan: &PalettePlan) {
        match &plan.primitives_module {
            Some(module) if !plan.referenced_primitives.is_empty() => {
                let line = format!(
                    "import {{ {} }} from './{}';",
                    plan.referenced_primitives.join(", "),
                    module
                );
                self.imports(w, &[line.as_str()]);
            }
            _ => self.imports(w, &[]),
        }
    }

    fn open(&self, w: &mut SourceWriter, container: Container, name: &str) {
        if matches!(container, Container::Light | Container::Dark) {
            w.open(format!("export const {} = {{", name), Some(name));
        }
    }

    fn close(&self, w: &mut SourceWriter, container: Container) {
        if matches!(container, Container::Light | Container::Dark) {
            w.close("} as const;");
        }
    }

    fn constant(
        &self,
        w: &mut SourceWriter,
        container: Container,
        ident: &str,
        path: &str,
        _ty: Option<&str>,
        expr: &str,
    ) {
        match container {
            Container::Light | Container::Dark => {
                w.declare(ident, path, format!("{}: {},", ident, expr));
            }
            _ => w.declare(ident, path, format!("export const {} = {};", ident, expr)),
        }
    }

    fn dynamic(&self, w: &mut SourceWriter, ident: &str, path: &str, light: &str, dark: &str) {
        let expr = format!("{{ light: {}, dark: {} }} as const", light, dark);
        self.constant(w, Container::Main, ident, path, None, &expr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::{detector_for, DarkModeStrategy};
    use crate::generators::colors::{emit_palette, PaletteSlice};
    use crate::generators::palette::{ColorRef, Palette, Primitive, SemanticEntry};
    use tokenweave_core::{SourceFormat, TokenPath};

    fn palette() -> Palette {
        let mut palette = Palette::default();
        for (key, hex) in [("Colour/Grey/750", "#1d1d1d"), ("Colour/Grey/50", "#f5f5f5")] {
            palette.primitives.insert(
                key.to_string(),
                Primitive {
                    key: key.to_string(),
                    segments: vec!["Grey".to_string(), key.rsplit('/').next().unwrap().to_string()],
                    family: "Grey".to_string(),
                    color: Color::from_hex(hex).unwrap(),
                },
            );
        }
        let path = TokenPath::from_canonical("Text/primary");
        palette.semantics.push(SemanticEntry {
            segments: path.segments().to_vec(),
            group: "Text".to_string(),
            path,
            light: ColorRef::Primitive("Colour/Grey/750".to_string()),
            dark: ColorRef::Primitive("Colour/Grey/50".to_string()),
            dark_fallback: false,
        });
        palette
    }

    fn render(format: SourceFormat, strategy: Option<DarkModeStrategy>, selector: Option<&str>) -> String {
        let mut profile = detector_for(format, ArtifactCategory::Colors).detect(None, true);
        if let Some(strategy) = strategy {
            profile.dark_mode = strategy;
        }
        if let Some(selector) = selector {
            profile.dark_selector = selector.to_string();
        }
        let indent = profile.indent.clone();
        let policy = crate::generators::policy_for(profile);
        let mut w = SourceWriter::new(format, &indent, None);
        emit_palette(policy.as_ref(), &mut w, &palette(), &PaletteSlice::all());
        w.finish("").0
    }

    #[test]
    fn test_css_light_dark() {
        let css = render(SourceFormat::Css, None, None);
        assert_eq!(
            css,
            ":root {\n  color-scheme: light dark;\n\n  /* Grey */\n  --grey-50: #f5f5f5;\n  --grey-750: #1d1d1d;\n\n  /* Text */\n  --text-primary: light-dark(var(--grey-750), var(--grey-50));\n}\n"
        );
    }

    #[test]
    fn test_css_media_query_overrides() {
        let css = render(
            SourceFormat::Css,
            Some(DarkModeStrategy::SeparateContainers),
            Some("@media (prefers-color-scheme: dark)"),
        );
        assert!(css.contains("  --text-primary: var(--grey-750);\n}\n"));
        assert!(css.contains(
            "@media (prefers-color-scheme: dark) {\n  :root {\n    /* Text */\n    --text-primary: var(--grey-50);\n  }\n}\n"
        ));
    }

    #[test]
    fn test_css_paired() {
        let css = render(SourceFormat::Css, Some(DarkModeStrategy::Paired), None);
        assert!(css.contains("  --text-primary-light: var(--grey-750);\n  --text-primary-dark: var(--grey-50);\n"));
    }

    #[test]
    fn test_scss_theme_maps() {
        let scss = render(SourceFormat::Scss, Some(DarkModeStrategy::SeparateContainers), None);
        assert!(scss.contains("$grey-750: #1d1d1d;\n"));
        assert!(scss.contains("$theme-light: (\n  // Text\n  \"text-primary\": $grey-750,\n);\n"));
        assert!(scss.contains("$theme-dark: (\n  // Text\n  \"text-primary\": $grey-50,\n);\n"));
    }

    #[test]
    fn test_typescript_dynamic() {
        let ts = render(SourceFormat::TypeScript, None, None);
        assert!(ts.contains("export const GREY_750 = '#1d1d1d';\n"));
        assert!(ts.contains("export const TEXT_PRIMARY = { light: GREY_750, dark: GREY_50 } as const;\n"));
    }

    #[test]
    fn test_typescript_separate_objects() {
        let ts = render(SourceFormat::TypeScript, Some(DarkModeStrategy::SeparateContainers), None);
        assert!(ts.contains("export const lightColors = {\n  // Text\n  TEXT_PRIMARY: GREY_750,\n} as const;\n"));
        assert!(ts.contains("export const darkColors = {\n"));
    }
}
