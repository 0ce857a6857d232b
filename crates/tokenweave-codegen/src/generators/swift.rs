//! SwiftUI / UIKit policy.

use super::colors::PalettePlan;
use super::{decimal, Container, EmitterPolicy, SourceWriter};
use crate::conventions::{ConventionProfile, UiFramework};
use tokenweave_core::Color;

const SWIFT_KEYWORDS: &[&str] = &[
    "associatedtype", "break", "case", "catch", "class", "continue", "default", "defer", "deinit",
    "do", "else", "enum", "extension", "fallthrough", "false", "for", "func", "guard", "if",
    "import", "in", "init", "inout", "internal", "is", "let", "nil", "operator", "private",
    "protocol", "public", "repeat", "return", "self", "Self", "static", "struct", "subscript",
    "super", "switch", "throw", "throws", "true", "try", "typealias", "var", "where", "while",
];

/// Swift `static let` declarations inside structs, enums or extensions.
pub struct SwiftPolicy {
    profile: ConventionProfile,
}

impl SwiftPolicy {
    pub fn new(profile: ConventionProfile) -> Self {
        Self { profile }
    }

    fn uikit(&self) -> bool {
        self.profile.framework == UiFramework::UIKit
    }

    fn framework_module(&self) -> &'static str {
        if self.uikit() {
            "UIKit"
        } else {
            "SwiftUI"
        }
    }

    fn dynamic_helper(&self, w: &mut SourceWriter) {
        w.open("extension Color {", Some("Color"));
        w.open("init(light: Color, dark: Color) {", None);
        w.open("self.init(UIColor { traits in", None);
        w.line("traits.userInterfaceStyle == .dark ? UIColor(dark) : UIColor(light)");
        w.close("})");
        w.close("}");
        w.close("}");
    }
}

impl EmitterPolicy for SwiftPolicy {
    fn profile(&self) -> &ConventionProfile {
        &self.profile
    }

    fn keywords(&self) -> &'static [&'static str] {
        SWIFT_KEYWORDS
    }

    fn imports(&self, w: &mut SourceWriter, required: &[&str]) {
        let mut modules: Vec<&str> = self.profile.imports.iter().map(String::as_str).collect();
        for module in required.iter().copied().chain(std::iter::once(self.framework_module())) {
            if !modules.contains(&module) {
                modules.push(module);
            }
        }
        for module in &modules {
            w.line(format!("import {}", module));
        }
        w.blank();
    }

    fn color_literal(&self, color: Color) -> String {
        let (r, g, b) = color.unit_rgb();
        let (r, g, b) = (decimal(r), decimal(g), decimal(b));
        if self.uikit() {
            format!(
                "UIColor(red: {}, green: {}, blue: {}, alpha: {})",
                r,
                g,
                b,
                decimal(color.alpha())
            )
        } else if color.is_opaque() {
            format!("Color(red: {}, green: {}, blue: {})", r, g, b)
        } else {
            format!(
                "Color(red: {}, green: {}, blue: {}, opacity: {})",
                r,
                g,
                b,
                decimal(color.alpha())
            )
        }
    }

    fn preamble(&self, w: &mut SourceWriter, plan: &PalettePlan) {
        self.imports(w, &[]);
        if plan.has_dynamic() && !self.uikit() && self.profile.dynamic_helper {
            self.dynamic_helper(w);
        }
    }

    fn open(&self, w: &mut SourceWriter, container: Container, name: &str) {
        let keyword = match container {
            Container::Main if !self.profile.container_keyword.is_empty() => {
                self.profile.container_keyword.as_str()
            }
            _ => "enum",
        };
        w.open(format!("{} {} {{", keyword, name), Some(name));
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
            Some(ty) => format!("static let {}: {} = {}", ident, ty, expr),
            None => format!("static let {} = {}", ident, expr),
        };
        w.declare(ident.trim_matches('`'), path, text);
    }

    fn dynamic(&self, w: &mut SourceWriter, ident: &str, path: &str, light: &str, dark: &str) {
        let expr = if self.uikit() {
            format!("UIColor {{ $0.userInterfaceStyle == .dark ? {} : {} }}", dark, light)
        } else {
            format!("Color(light: {}, dark: {})", light, dark)
        };
        self.constant(w, Container::Main, ident, path, None, &expr);
    }
}
