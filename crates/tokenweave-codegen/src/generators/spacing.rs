//! Spacing and sizing constants.
//!
//! Every numeric token of the values document that no composite category
//! claims and that is not a font metric lands here.

use super::composite::category_of;
use super::{emit_values, plan_values, EmitterPolicy, Pending, SourceWriter};
use tokenweave_core::{format_number, walk, Dimension, SourceFormat, TokenDocument, TokenKind, TokenPath};
use tokenweave_resolver::TokenGraph;

pub(crate) const DP_IMPORT: &str = "androidx.compose.ui.unit.dp";

/// Pixels per `rem`/`em` when a native target needs absolute units.
const REM_PX: f64 = 16.0;

/// Path words that mark a number as a font metric rather than spacing.
const FONT_WORDS: &[&str] = &["font", "typography", "lineheight", "line-height", "letterspacing", "letter-spacing"];

/// A resolved numeric token.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberToken {
    pub path: TokenPath,
    pub value: Dimension,
    /// Alias targets, nearest first.
    pub targets: Vec<String>,
}

impl NumberToken {
    pub(crate) fn pending(&self) -> Pending<Dimension> {
        Pending {
            path: self.path.canonical(),
            segments: self.path.segments().to_vec(),
            targets: self.targets.clone(),
            value: self.value.clone(),
        }
    }
}

/// Numeric tokens of `doc` that belong in the spacing file.
pub fn collect_spacing(doc: &TokenDocument, graph: &TokenGraph) -> Vec<NumberToken> {
    walk(doc)
        .into_iter()
        .filter(|(path, token)| {
            token.kind == TokenKind::Number
                && category_of(path, token.kind).is_none()
                && !FONT_WORDS.iter().any(|w| path.contains_word(w))
        })
        .filter_map(|(path, _)| {
            let resolved = graph.resolve(&path.canonical()).ok()?;
            let value = resolved.value.as_number()?.clone();
            if !is_length(&value) {
                tracing::trace!(token = %path, unit = ?value.unit(), "not a length");
                return None;
            }
            let targets = resolved.chain.iter().skip(1).cloned().collect();
            Some(NumberToken { path, value, targets })
        })
        .collect()
}

fn is_length(value: &Dimension) -> bool {
    matches!(value.unit(), None | Some("px" | "rem" | "em" | "pt" | "dp" | "%"))
}

/// A length as the target writes it, with its type annotation. `None`
/// for relative units a native target cannot express.
pub(crate) fn length(format: SourceFormat, value: &Dimension) -> Option<(String, Option<String>)> {
    let px = match value.unit() {
        Some("rem" | "em") => value.value * REM_PX,
        Some("%") => f64::NAN,
        _ => value.value,
    };
    match format {
        SourceFormat::Css | SourceFormat::Scss => Some((css_length(value), None)),
        SourceFormat::TypeScript => Some((format!("'{}'", css_length(value)), None)),
        SourceFormat::Swift if px.is_finite() => Some((format_number(px), Some("CGFloat".to_string()))),
        SourceFormat::Kotlin if px.is_finite() => Some((kotlin_unit(px, "dp"), None)),
        SourceFormat::Swift | SourceFormat::Kotlin => None,
    }
}

fn css_length(value: &Dimension) -> String {
    match value.unit() {
        Some(unit @ ("rem" | "em" | "%")) => format!("{}{}", format_number(value.value), unit),
        _ => format!("{}px", format_number(value.value)),
    }
}

/// `16.dp`, `(-4).dp`.
pub(crate) fn kotlin_unit(value: f64, unit: &str) -> String {
    if value < 0.0 {
        format!("({}).{}", format_number(value), unit)
    } else {
        format!("{}.{}", format_number(value), unit)
    }
}

/// Emit the spacing file.
pub fn emit_spacing<P: EmitterPolicy + ?Sized>(policy: &P, w: &mut SourceWriter, tokens: &[NumberToken]) {
    let format = policy.format();
    let pending = tokens.iter().map(NumberToken::pending).collect();
    let groups = plan_values(policy, w, pending, |value| length(format, value));
    let required: &[&str] = if format == SourceFormat::Kotlin { &[DP_IMPORT] } else { &[] };
    emit_values(policy, w, &groups, required, &[]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::detector_for;
    use crate::generators::policy_for;
    use tokenweave_core::{ArtifactCategory, Token, TokenValue};

    fn number(path: &str, text: &str) -> NumberToken {
        NumberToken {
            path: TokenPath::from_canonical(path),
            value: Dimension::parse(text).unwrap(),
            targets: Vec::new(),
        }
    }

    fn render(format: SourceFormat, tokens: &[NumberToken]) -> String {
        let mut profile = detector_for(format, ArtifactCategory::Spacing).detect(None, true);
        profile.package.get_or_insert_with(|| "com.example.app.ui.theme".to_string());
        let indent = profile.indent.clone();
        let policy = policy_for(profile);
        let mut w = SourceWriter::new(format, &indent, None);
        emit_spacing(policy.as_ref(), &mut w, tokens);
        w.finish("").0
    }

    fn sample() -> Vec<NumberToken> {
        let mut alias = number("Stack/gutter", "16");
        alias.targets = vec!["Spacing/16".to_string()];
        vec![number("Spacing/16", "16"), number("Spacing/4", "4"), alias, number("Size/icon", "1.5rem")]
    }

    #[test]
    fn test_css_spacing() {
        let css = render(SourceFormat::Css, &sample());
        assert_eq!(
            css,
            ":root {\n  /* Size */\n  --size-icon: 1.5rem;\n\n  /* Spacing */\n  --spacing-4: 4px;\n  --spacing-16: 16px;\n\n  /* Stack */\n  --stack-gutter: var(--spacing-16);\n}\n"
        );
    }

    #[test]
    fn test_typescript_spacing() {
        let ts = render(SourceFormat::TypeScript, &sample());
        assert!(ts.contains("export const SPACING_4 = '4px';\n"));
        assert!(ts.contains("export const STACK_GUTTER = SPACING_16;\n"));
    }

    #[test]
    fn test_swift_spacing_converts_rem() {
        let swift = render(SourceFormat::Swift, &sample());
        assert!(swift.starts_with("import SwiftUI\n\nenum AppSpacing {\n"));
        assert!(swift.contains("    static let sizeIcon: CGFloat = 24\n"));
        assert!(swift.contains("    static let stackGutter: CGFloat = spacing16\n"));
    }

    #[test]
    fn test_kotlin_spacing() {
        let kotlin = render(SourceFormat::Kotlin, &[number("Spacing/4", "4"), number("Offset/pull", "-8")]);
        assert!(kotlin.contains("import androidx.compose.ui.unit.dp\n"));
        assert!(kotlin.contains("object AppSpacing {\n"));
        assert!(kotlin.contains("    val OffsetPull = (-8).dp\n"));
        assert!(kotlin.contains("    val Spacing4 = 4.dp\n"));
    }

    #[test]
    fn test_percentages_are_web_only() {
        let tokens = [number("Size/half", "50%")];
        assert!(render(SourceFormat::Css, &tokens).contains("--size-half: 50%;"));
        assert!(!render(SourceFormat::Swift, &tokens).contains("sizeHalf"));
    }

    #[test]
    fn test_collect_skips_composites_and_font_metrics() {
        let mut doc = TokenDocument::empty("values");
        for (path, text) in [
            ("Spacing/8", "8"),
            ("Radius/sm", "4"),
            ("Motion/duration/fast", "0.2"),
            ("Font/size/body", "16"),
        ] {
            let value = TokenValue::Number(Dimension::parse(text).unwrap());
            doc.insert(&TokenPath::from_canonical(path), Token::concrete(value));
        }
        let graph = TokenGraph::build(&[&doc]);
        let tokens = collect_spacing(&doc, &graph);
        let paths: Vec<String> = tokens.iter().map(|t| t.path.canonical()).collect();
        assert_eq!(paths, vec!["Spacing/8".to_string()]);
    }
}
