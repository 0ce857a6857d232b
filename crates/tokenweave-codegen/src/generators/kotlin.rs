//! Jetpack Compose policy.

use super::colors::PalettePlan;
use super::{Container, EmitterPolicy, SourceWriter};
use crate::conventions::ConventionProfile;
use tokenweave_core::{normalize_identifier, Color};

const KOTLIN_KEYWORDS: &[&str] = &[
    "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in",
    "interface", "is", "null", "object", "package", "return", "super", "this", "throw", "true",
    "try", "typealias", "typeof", "val", "var", "when", "while",
];

/// Material3 color scheme roles, in builder parameter order.
const M3_ROLES: &[&str] = &[
    "primary",
    "onPrimary",
    "primaryContainer",
    "onPrimaryContainer",
    "secondary",
    "onSecondary",
    "secondaryContainer",
    "onSecondaryContainer",
    "tertiary",
    "onTertiary",
    "background",
    "onBackground",
    "surface",
    "onSurface",
    "surfaceVariant",
    "onSurfaceVariant",
    "error",
    "onError",
    "outline",
    "outlineVariant",
];

pub(crate) const COLOR_IMPORT: &str = "androidx.compose.ui.graphics.Color";

/// `object` containers of `val` declarations.
pub struct KotlinPolicy {
    profile: ConventionProfile,
}

impl KotlinPolicy {
    pub fn new(profile: ConventionProfile) -> Self {
        Self { profile }
    }

    /// `val LightColorScheme = lightColorScheme(...)` and its dark twin.
    fn color_schemes(&self, w: &mut SourceWriter, plan: &PalettePlan) {
        let qualifier = plan.qualifier.as_deref();
        let roles: Vec<(&str, String, String)> = M3_ROLES
            .iter()
            .filter_map(|role| {
                let key = normalize_identifier(role);
                let entry = plan.semantic_entries().find(|entry| {
                    let words = normalize_identifier(&entry.words.concat());
                    words == key || words == format!("color{}", key)
                })?;
                Some((
                    *role,
                    plan.operand(self, &entry.light, qualifier),
                    plan.operand(self, &entry.dark, qualifier),
                ))
            })
            .collect();

        for (name, builder, dark) in [
            ("LightColorScheme", "lightColorScheme", false),
            ("DarkColorScheme", "darkColorScheme", true),
        ] {
            w.blank();
            if roles.is_empty() {
                w.declare(name, "", format!("val {} = {}()", name, builder));
                continue;
            }
            w.open_declared(name, "", format!("val {} = {}(", name, builder));
            for (role, light, dark_expr) in &roles {
                let expr = if dark { dark_expr } else { light };
                w.line(format!("{} = {},", role, expr));
            }
            w.close(")");
        }
    }
}

impl EmitterPolicy for KotlinPolicy {
    fn profile(&self) -> &ConventionProfile {
        &self.profile
    }

    fn keywords(&self) -> &'static [&'static str] {
        KOTLIN_KEYWORDS
    }

    fn imports(&self, w: &mut SourceWriter, required: &[&str]) {
        if let Some(package) = &self.profile.package {
            w.line(format!("package {}", package));
            w.blank();
        }
        let mut imports: Vec<&str> = self.profile.imports.iter().map(String::as_str).collect();
        for import in required.iter().copied() {
            if !imports.contains(&import) {
                imports.push(import);
            }
        }
        for import in &imports {
            w.line(format!("import {}", import));
        }
        w.blank();
    }

    fn color_literal(&self, color: Color) -> String {
        format!("Color(0x{})", color.to_argb_hex())
    }

    fn preamble(&self, w: &mut SourceWriter, plan: &PalettePlan) {
        let mut required = vec![COLOR_IMPORT];
        if plan.has_dynamic() {
            required.push("androidx.compose.foundation.isSystemInDarkTheme");
            required.push("androidx.compose.runtime.Composable");
        }
        if self.profile.material3 && plan.has_semantics() {
            required.push("androidx.compose.material3.darkColorScheme");
            required.push("androidx.compose.material3.lightColorScheme");
        }
        self.imports(w, &required);
    }

    fn postamble(&self, w: &mut SourceWriter, plan: &PalettePlan) {
        if self.profile.material3 && plan.has_semantics() {
            self.color_schemes(w, plan);
        }
    }

    fn open(&self, w: &mut SourceWriter, _container: Container, name: &str) {
        w.open(format!("object {} {{", name), Some(name));
    }

    fn close(&self, w: &mut SourceWriter, _container: Container) {
        w.close("}");
    }

    fn constant(
        &self,
        w: &mut SourceWriter,
        _container: Container,
        ident: &str,
        path: &str,
        ty: Option<&str>,
        expr: &str,
    ) {
        let text = match ty {
            Some(ty) => format!("val {}: {} = {}", ident, ty, expr),
            None => format!("val {} = {}", ident, expr),
        };
        w.declare(ident.trim_matches('`'), path, text);
    }

    fn dynamic(&self, w: &mut SourceWriter, ident: &str, path: &str, light: &str, dark: &str) {
        w.declare_lines(
            ident.trim_matches('`'),
            path,
            &[
                format!("val {}: Color", ident),
                format!("@Composable get() = if (isSystemInDarkTheme()) {} else {}", dark, light),
            ],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::{detector_for, DarkModeStrategy};
    use crate::generators::colors::{emit_palette, PaletteSlice};
    use crate::generators::palette::{ColorRef, Palette, Primitive, SemanticEntry};
    use tokenweave_core::{ArtifactCategory, SourceFormat, TokenPath};

    fn palette() -> Palette {
        let mut palette = Palette::default();
        for (key, hex) in [("Colour/Blue/500", "#0066ff"), ("Colour/Blue/200", "#99c2ff")] {
            palette.primitives.insert(
                key.to_string(),
                Primitive {
                    key: key.to_string(),
                    segments: vec!["Blue".to_string(), key.rsplit('/').next().unwrap().to_string()],
                    family: "Blue".to_string(),
                    color: Color::from_hex(hex).unwrap(),
                },
            );
        }
        let path = TokenPath::from_canonical("Primary");
        palette.semantics.push(SemanticEntry {
            segments: path.segments().to_vec(),
            group: "Primary".to_string(),
            path,
            light: ColorRef::Primitive("Colour/Blue/500".to_string()),
            dark: ColorRef::Primitive("Colour/Blue/200".to_string()),
            dark_fallback: false,
        });
        palette
    }

    fn render(reference: Option<&str>, strategy: Option<DarkModeStrategy>) -> String {
        let mut profile = detector_for(SourceFormat::Kotlin, ArtifactCategory::Colors).detect(reference, false);
        if let Some(strategy) = strategy {
            profile.dark_mode = strategy;
        }
        profile.package.get_or_insert_with(|| "com.example.app.ui.theme".to_string());
        let indent = profile.indent.clone();
        let policy = KotlinPolicy::new(profile);
        let mut w = SourceWriter::new(SourceFormat::Kotlin, &indent, reference);
        emit_palette(&policy, &mut w, &palette(), &PaletteSlice::all());
        w.finish("").0
    }

    #[test]
    fn test_best_practices_material3() {
        let kotlin = render(None, None);
        assert!(kotlin.starts_with("package com.example.app.ui.theme\n\nimport androidx.compose.ui.graphics.Color\n"));
        assert!(kotlin.contains("    val Blue500 = Color(0xFF0066FF)\n"));
        assert!(kotlin.contains(
            "val LightColorScheme = lightColorScheme(\n    primary = Primitives.Blue500,\n)\n"
        ));
        assert!(kotlin.contains("    primary = Primitives.Blue200,\n"));
    }

    #[test]
    fn test_dynamic_getter() {
        let kotlin = render(None, Some(DarkModeStrategy::Dynamic));
        assert!(kotlin.contains("import androidx.compose.foundation.isSystemInDarkTheme\n"));
        assert!(kotlin.contains(
            "object AppColors {\n    // Primary\n    val Primary: Color\n        @Composable get() = if (isSystemInDarkTheme()) Primitives.Blue200 else Primitives.Blue500\n}\n"
        ));
    }

    #[test]
    fn test_reference_container_and_new_marker() {
        let reference = "package com.brand.ui\n\nimport androidx.compose.ui.graphics.Color\n\nobject BrandColors {\n    val Blue500 = Color(0xFF0066FF)\n    val PrimaryLight = Blue500\n    val PrimaryDark = Color(0xFF99C2FF)\n}\n";
        let kotlin = render(Some(reference), None);
        assert!(kotlin.starts_with("package com.brand.ui\n"));
        assert!(kotlin.contains("object BrandColors {\n"));
        assert!(kotlin.contains("    val PrimaryLight = Blue500\n"));
        assert!(kotlin.contains("    // NEW\n    val Blue200 = Color(0xFF99C2FF)\n"));
        assert!(kotlin.contains("    val PrimaryDark = Blue200\n"));
    }
}
