//! Text styles.
//!
//! Entries are partitioned by platform prefix first: `ios/` paths only
//! reach Swift, `droid/` paths reach web (prefix kept) and Android
//! (prefix stripped), everything else is shared.

use super::spacing::kotlin_unit;
use super::{decimal, emit_values, plan_values, string_literal, EmitterPolicy, Pending, SourceWriter};
use crate::conventions::{ConventionProfile, UiFramework};
use tokenweave_core::{
    format_number, walk, Platform, SourceFormat, TokenDocument, TokenKind, TokenPath, TypographyValue,
};
use tokenweave_resolver::TokenGraph;

const IOS_PREFIX: &str = "ios";
const ANDROID_PREFIX: &str = "droid";

const KOTLIN_TEXT_STYLE: &str = "androidx.compose.ui.text.TextStyle";
const KOTLIN_FONT_WEIGHT: &str = "androidx.compose.ui.text.font.FontWeight";
const KOTLIN_FONT_FAMILY: &str = "androidx.compose.ui.text.font.FontFamily";
const KOTLIN_SP: &str = "androidx.compose.ui.unit.sp";

/// A resolved typography token.
#[derive(Debug, Clone, PartialEq)]
pub struct TypographyToken {
    pub path: TokenPath,
    /// Segments generated names come from (platform prefix stripped).
    pub segments: Vec<String>,
    pub value: TypographyValue,
    pub targets: Vec<String>,
}

/// Typography tokens across `documents`, first occurrence of a path wins.
pub fn collect_typography(documents: &[&TokenDocument], graph: &TokenGraph) -> Vec<TypographyToken> {
    let mut tokens: Vec<TypographyToken> = Vec::new();
    for doc in documents {
        for (path, token) in walk(doc) {
            if token.kind != TokenKind::Typography || tokens.iter().any(|t| t.path == path) {
                continue;
            }
            let Ok(resolved) = graph.resolve(&path.canonical()) else {
                continue;
            };
            let Some(value) = resolved.value.as_typography() else {
                continue;
            };
            tokens.push(TypographyToken {
                segments: path.segments().to_vec(),
                value: value.clone(),
                targets: resolved.chain.iter().skip(1).cloned().collect(),
                path,
            });
        }
    }
    tokens
}

fn strip_prefix(token: &TypographyToken) -> TypographyToken {
    TypographyToken {
        segments: token.segments.iter().skip(1).cloned().collect(),
        ..token.clone()
    }
}

/// The entries one platform receives.
pub fn partition(tokens: &[TypographyToken], platform: Platform) -> Vec<TypographyToken> {
    let ios = |t: &&TypographyToken| t.path.starts_with_segment(IOS_PREFIX);
    let android = |t: &&TypographyToken| t.path.starts_with_segment(ANDROID_PREFIX);
    let shared = |t: &&TypographyToken| !ios(t) && !android(t);

    let prefixed_or_shared = |prefixed: &dyn Fn(&&TypographyToken) -> bool| -> Vec<TypographyToken> {
        if tokens.iter().any(|t| prefixed(&t)) {
            tokens.iter().filter(|t| prefixed(t)).map(strip_prefix).collect()
        } else {
            tokens.iter().filter(|t| shared(t)).cloned().collect()
        }
    };

    match platform {
        Platform::Web => tokens.iter().filter(|t| !ios(t)).cloned().collect(),
        Platform::Android => prefixed_or_shared(&android),
        Platform::Ios => prefixed_or_shared(&ios),
    }
}

/// Dynamic Type anchor for a font size, largest first.
pub fn text_style_for(font_size: f64) -> &'static str {
    const BINS: &[(f64, &str)] = &[
        (34.0, "largeTitle"),
        (28.0, "title"),
        (22.0, "title2"),
        (20.0, "title3"),
        (17.0, "body"),
        (16.0, "callout"),
        (15.0, "subheadline"),
        (13.0, "footnote"),
        (12.0, "caption"),
    ];
    BINS.iter()
        .find(|(min, _)| font_size >= *min)
        .map_or("caption2", |(_, style)| *style)
}

/// UIKit spells two of the text styles differently.
fn uikit_text_style(style: &str) -> &str {
    match style {
        "title" => "title1",
        "caption" => "caption1",
        other => other,
    }
}

/// `lineHeight − fontSize`, never negative.
pub fn line_spacing(value: &TypographyValue) -> f64 {
    value
        .line_height_px()
        .map_or(0.0, |lh| (lh - value.font_size).max(0.0))
}

fn text_transform(case: &str) -> Option<&'static str> {
    match case.to_ascii_lowercase().as_str() {
        "upper" | "uppercase" => Some("uppercase"),
        "lower" | "lowercase" => Some("lowercase"),
        "title" | "capitalize" => Some("capitalize"),
        _ => None,
    }
}

/// What one web declaration carries.
#[derive(Debug, Clone)]
enum WebPart {
    Font(TypographyValue),
    LetterSpacing(f64),
    TextTransform(&'static str),
}

fn css_font(value: &TypographyValue) -> String {
    let family = value
        .font_family
        .as_deref()
        .map_or_else(|| "system-ui".to_string(), |f| format!("\"{}\"", f));
    match value.line_height_px() {
        Some(lh) => format!(
            "{} {}px/{}px {}",
            value.font_weight.to_numeric(),
            format_number(value.font_size),
            format_number(lh),
            family
        ),
        None => format!(
            "{} {}px {}",
            value.font_weight.to_numeric(),
            format_number(value.font_size),
            family
        ),
    }
}

fn typescript_object(value: &TypographyValue) -> String {
    let mut fields = Vec::new();
    if let Some(family) = &value.font_family {
        fields.push(format!("fontFamily: {}", string_literal(SourceFormat::TypeScript, family)));
    }
    fields.push(format!("fontSize: '{}px'", format_number(value.font_size)));
    fields.push(format!("fontWeight: {}", value.font_weight.to_numeric()));
    if let Some(lh) = value.line_height_px() {
        fields.push(format!("lineHeight: '{}px'", format_number(lh)));
    }
    if let Some(ls) = value.letter_spacing_px().filter(|ls| *ls != 0.0) {
        fields.push(format!("letterSpacing: '{}px'", format_number(ls)));
    }
    if let Some(transform) = value.text_case.as_deref().and_then(text_transform) {
        fields.push(format!("textTransform: '{}'", transform));
    }
    format!("{{ {} }} as const", fields.join(", "))
}

fn swift_font(profile: &ConventionProfile, value: &TypographyValue) -> String {
    let size = format_number(value.font_size);
    let weight = value.font_weight.to_swift();
    let style = text_style_for(value.font_size);
    if profile.framework == UiFramework::UIKit {
        let system = format!("UIFont.systemFont(ofSize: {}, weight: {})", size, weight);
        let base = match &value.font_family {
            Some(family) => format!("UIFont(name: \"{}\", size: {}) ?? {}", family, size, system),
            None => system,
        };
        return if profile.dynamic_type {
            format!(
                "UIFontMetrics(forTextStyle: .{}).scaledFont(for: {})",
                uikit_text_style(style),
                base
            )
        } else {
            base
        };
    }
    match &value.font_family {
        Some(family) if profile.dynamic_type => format!(
            ".custom(\"{}\", size: {}, relativeTo: .{}).weight({})",
            family, size, style, weight
        ),
        Some(family) => format!(".custom(\"{}\", fixedSize: {}).weight({})", family, size, weight),
        None => format!(".system(size: {}, weight: {})", size, weight),
    }
}

fn swift_helper(profile: &ConventionProfile) -> String {
    let font = if profile.framework == UiFramework::UIKit { "UIFont" } else { "Font" };
    if profile.tracking {
        format!(
            "struct TextStyle {{ let font: {}; let lineSpacing: CGFloat; let tracking: CGFloat }}",
            font
        )
    } else {
        format!("struct TextStyle {{ let font: {}; let lineSpacing: CGFloat }}", font)
    }
}

fn swift_style(profile: &ConventionProfile, value: &TypographyValue) -> String {
    let font = swift_font(profile, value);
    let spacing = decimal(line_spacing(value));
    if profile.tracking {
        let tracking = decimal(value.letter_spacing_px().unwrap_or(0.0));
        format!("TextStyle(font: {}, lineSpacing: {}, tracking: {})", font, spacing, tracking)
    } else {
        format!("TextStyle(font: {}, lineSpacing: {})", font, spacing)
    }
}

fn kotlin_family(family: &str) -> Option<&'static str> {
    match family.trim().to_ascii_lowercase().as_str() {
        "serif" => Some("FontFamily.Serif"),
        "sans-serif" | "sans serif" | "system-ui" => Some("FontFamily.SansSerif"),
        "monospace" | "mono" => Some("FontFamily.Monospace"),
        "cursive" => Some("FontFamily.Cursive"),
        _ => None,
    }
}

/// A Compose `TextStyle`. Families without a platform constant need a
/// bundled font resource, so they are named in a trailing comment.
fn kotlin_style(value: &TypographyValue, uses_family: &mut bool) -> String {
    let mut args = Vec::new();
    let mut custom = None;
    if let Some(family) = value.font_family.as_deref() {
        match kotlin_family(family) {
            Some(generic) => {
                *uses_family = true;
                args.push(format!("fontFamily = {}", generic));
            }
            None => custom = Some(family.trim()),
        }
    }
    args.push(format!("fontSize = {}", kotlin_unit(value.font_size, "sp")));
    args.push(format!("fontWeight = FontWeight.{}", value.font_weight.to_kotlin()));
    if let Some(lh) = value.line_height_px() {
        args.push(format!("lineHeight = {}", kotlin_unit(lh, "sp")));
    }
    if let Some(ls) = value.letter_spacing_px().filter(|ls| *ls != 0.0) {
        args.push(format!("letterSpacing = {}", kotlin_unit(ls, "sp")));
    }
    let style = format!("TextStyle({})", args.join(", "));
    match custom {
        Some(family) => format!("{} // fontFamily: {}", style, family),
        None => style,
    }
}

fn web_part(token: &TypographyToken, suffix: &[&str], value: WebPart) -> Pending<WebPart> {
    Pending {
        path: token.path.canonical(),
        segments: token
            .segments
            .iter()
            .cloned()
            .chain(suffix.iter().map(|s| s.to_string()))
            .collect(),
        targets: if suffix.is_empty() { token.targets.clone() } else { Vec::new() },
        value,
    }
}

/// The font shorthand plus separate letter-spacing and text-transform
/// declarations.
fn web_parts(tokens: &[TypographyToken]) -> Vec<Pending<WebPart>> {
    let mut parts = Vec::new();
    for token in tokens {
        parts.push(web_part(token, &[], WebPart::Font(token.value.clone())));
        if let Some(ls) = token.value.letter_spacing_px().filter(|ls| *ls != 0.0) {
            parts.push(web_part(token, &["letter", "spacing"], WebPart::LetterSpacing(ls)));
        }
        if let Some(transform) = token.value.text_case.as_deref().and_then(text_transform) {
            parts.push(web_part(token, &["text", "transform"], WebPart::TextTransform(transform)));
        }
    }
    parts
}

/// Emit the typography file for one format.
pub fn emit_typography<P: EmitterPolicy + ?Sized>(policy: &P, w: &mut SourceWriter, tokens: &[TypographyToken]) {
    let profile = policy.profile();
    let pending = || {
        tokens
            .iter()
            .map(|t| Pending {
                path: t.path.canonical(),
                segments: t.segments.clone(),
                targets: t.targets.clone(),
                value: t.value.clone(),
            })
            .collect::<Vec<_>>()
    };

    match policy.format() {
        SourceFormat::Css | SourceFormat::Scss => {
            let groups = plan_values(policy, w, web_parts(tokens), |part| {
                let expr = match part {
                    WebPart::Font(value) => css_font(value),
                    WebPart::LetterSpacing(ls) => format!("{}px", format_number(*ls)),
                    WebPart::TextTransform(transform) => transform.to_string(),
                };
                Some((expr, None))
            });
            emit_values(policy, w, &groups, &[], &[]);
        }
        SourceFormat::TypeScript => {
            let groups = plan_values(policy, w, pending(), |value| Some((typescript_object(value), None)));
            emit_values(policy, w, &groups, &[], &[]);
        }
        SourceFormat::Swift => {
            let groups = plan_values(policy, w, pending(), |value| Some((swift_style(profile, value), None)));
            emit_values(policy, w, &groups, &[], &[swift_helper(profile)]);
        }
        SourceFormat::Kotlin => {
            let mut uses_family = false;
            let groups = plan_values(policy, w, pending(), |value| Some((kotlin_style(value, &mut uses_family), None)));
            let mut required = vec![KOTLIN_TEXT_STYLE, KOTLIN_FONT_WEIGHT, KOTLIN_SP];
            if uses_family {
                required.insert(1, KOTLIN_FONT_FAMILY);
            }
            emit_values(policy, w, &groups, &required, &[]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::detector_for;
    use crate::generators::policy_for;
    use tokenweave_core::{ArtifactCategory, Dimension, FontWeight};

    fn style(path: &str, size: f64, line_height: Option<f64>) -> TypographyToken {
        let path = TokenPath::from_canonical(path);
        TypographyToken {
            segments: path.segments().to_vec(),
            path,
            value: TypographyValue {
                font_family: Some("Inter".to_string()),
                font_size: size,
                font_weight: FontWeight::Bold,
                line_height: line_height.map(Dimension::unitless),
                letter_spacing: None,
                text_case: None,
            },
            targets: Vec::new(),
        }
    }

    fn render(format: SourceFormat, tokens: &[TypographyToken]) -> String {
        let profile = detector_for(format, ArtifactCategory::Typography).detect(None, true);
        let indent = profile.indent.clone();
        let policy = policy_for(profile);
        let mut w = SourceWriter::new(format, &indent, None);
        emit_typography(policy.as_ref(), &mut w, tokens);
        w.finish("").0
    }

    #[test]
    fn test_text_style_bins() {
        assert_eq!(text_style_for(40.0), "largeTitle");
        assert_eq!(text_style_for(34.0), "largeTitle");
        assert_eq!(text_style_for(28.0), "title");
        assert_eq!(text_style_for(17.0), "body");
        assert_eq!(text_style_for(16.0), "callout");
        assert_eq!(text_style_for(12.0), "caption");
        assert_eq!(text_style_for(11.0), "caption2");
    }

    #[test]
    fn test_line_spacing() {
        assert_eq!(line_spacing(&style("Body", 16.0, Some(24.0)).value), 8.0);
        assert_eq!(line_spacing(&style("Body", 16.0, Some(1.5)).value), 8.0);
        assert_eq!(line_spacing(&style("Body", 16.0, None).value), 0.0);
    }

    #[test]
    fn test_partition_prefixes() {
        let tokens = vec![
            style("Heading/large", 32.0, None),
            style("ios/Heading/large", 34.0, None),
            style("droid/Heading/large", 30.0, None),
        ];
        let web: Vec<String> = partition(&tokens, Platform::Web).iter().map(|t| t.path.canonical()).collect();
        assert_eq!(web, vec!["Heading/large".to_string(), "droid/Heading/large".to_string()]);

        let ios = partition(&tokens, Platform::Ios);
        assert_eq!(ios.len(), 1);
        assert_eq!(ios[0].segments, vec!["Heading".to_string(), "large".to_string()]);
        assert_eq!(ios[0].path.canonical(), "ios/Heading/large");

        let android = partition(&tokens, Platform::Android);
        assert_eq!(android.len(), 1);
        assert_eq!(android[0].value.font_size, 30.0);
    }

    #[test]
    fn test_partition_falls_back_to_shared() {
        let tokens = vec![style("Body", 16.0, None), style("ios/Body", 17.0, None)];
        let android = partition(&tokens, Platform::Android);
        assert_eq!(android.len(), 1);
        assert_eq!(android[0].path.canonical(), "Body");
    }

    #[test]
    fn test_swift_text_styles() {
        let swift = render(SourceFormat::Swift, &[style("Heading/large", 34.0, Some(41.0))]);
        assert!(swift.contains("struct TextStyle { let font: Font; let lineSpacing: CGFloat; let tracking: CGFloat }\n"));
        assert!(swift.contains(
            "    static let headingLarge = TextStyle(font: .custom(\"Inter\", size: 34, relativeTo: .largeTitle).weight(.bold), lineSpacing: 7, tracking: 0)\n"
        ));
    }

    #[test]
    fn test_css_font_shorthand() {
        let mut token = style("Heading/large", 32.0, Some(40.0));
        token.value.letter_spacing = Some(Dimension::with_unit(-0.5, "px"));
        let css = render(SourceFormat::Css, &[token]);
        assert!(css.contains("  --heading-large: 700 32px/40px \"Inter\";\n"));
        assert!(css.contains("  --heading-large-letter-spacing: -0.5px;\n"));
    }

    #[test]
    fn test_typescript_object() {
        let ts = render(SourceFormat::TypeScript, &[style("Body", 16.0, Some(24.0))]);
        assert!(ts.contains(
            "export const BODY = { fontFamily: 'Inter', fontSize: '16px', fontWeight: 700, lineHeight: '24px' } as const;\n"
        ));
    }

    #[test]
    fn test_kotlin_text_style() {
        let kotlin = render(SourceFormat::Kotlin, &[style("Body", 16.0, Some(24.0))]);
        assert!(kotlin.contains("import androidx.compose.ui.unit.sp\n"));
        assert!(kotlin.contains(
            "    val Body = TextStyle(fontSize = 16.sp, fontWeight = FontWeight.Bold, lineHeight = 24.sp) // fontFamily: Inter\n"
        ));
        assert!(!kotlin.contains("FontFamily"));
    }

    #[test]
    fn test_kotlin_font_family() {
        let mut roboto = style("Body", 16.0, None);
        roboto.value.font_family = Some("Roboto".to_string());
        let mut code = style("Code", 14.0, None);
        code.value.font_family = Some("monospace".to_string());
        let kotlin = render(SourceFormat::Kotlin, &[roboto, code]);
        assert!(kotlin.contains("    val Body = TextStyle(fontSize = 16.sp, fontWeight = FontWeight.Bold) // fontFamily: Roboto\n"));
        assert!(kotlin.contains("import androidx.compose.ui.text.font.FontFamily\n"));
        assert!(kotlin.contains("    val Code = TextStyle(fontFamily = FontFamily.Monospace, fontSize = 14.sp, fontWeight = FontWeight.Bold)\n"));
    }
}
