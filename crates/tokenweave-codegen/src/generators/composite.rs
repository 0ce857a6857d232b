//! Shadow, border, motion, radius and opacity constants.
//!
//! Shadow and border tokens are recognised by kind. Numbers and strings
//! only qualify through keywords in their path, checked in a fixed order
//! so `Shadow/radius` is a shadow and `Border/radius` a radius.

use super::spacing::{kotlin_unit, length, DP_IMPORT};
use super::{decimal, emit_values, plan_values, string_literal, EmitterPolicy, Pending, SourceWriter};
use crate::conventions::UiFramework;
use tokenweave_core::{
    format_number, walk, ArtifactCategory, BorderValue, Color, Dimension, ShadowLayer, SourceFormat,
    TokenDocument, TokenKind, TokenPath, TokenValue,
};
use tokenweave_resolver::TokenGraph;

const SHADOW_WORDS: &[&str] = &["shadow", "elevation"];
const MOTION_WORDS: &[&str] = &["duration", "delay", "easing", "transition", "animation", "motion"];
const RADIUS_WORDS: &[&str] = &["radius", "radii", "corner", "rounded"];
const OPACITY_WORDS: &[&str] = &["opacity", "alpha"];
const BORDER_WORDS: &[&str] = &["border", "stroke"];

/// Keyword precedence for numbers and strings.
const KEYWORD_CATEGORIES: &[(ArtifactCategory, &[&str])] = &[
    (ArtifactCategory::Shadow, SHADOW_WORDS),
    (ArtifactCategory::Motion, MOTION_WORDS),
    (ArtifactCategory::Radius, RADIUS_WORDS),
    (ArtifactCategory::Opacity, OPACITY_WORDS),
    (ArtifactCategory::Border, BORDER_WORDS),
];

const KOTLIN_COLOR: &str = "androidx.compose.ui.graphics.Color";
const KOTLIN_DP: &str = "androidx.compose.ui.unit.Dp";
const KOTLIN_BORDER_STROKE: &str = "androidx.compose.foundation.BorderStroke";
const KOTLIN_ANIMATION_CORE: &str = "androidx.compose.animation.core";

/// The composite category a token belongs to, if any. Numbers and
/// strings match keywords as whole path words.
pub fn category_of(path: &TokenPath, kind: TokenKind) -> Option<ArtifactCategory> {
    match kind {
        TokenKind::Shadow => Some(ArtifactCategory::Shadow),
        TokenKind::Border => Some(ArtifactCategory::Border),
        TokenKind::Color | TokenKind::Typography => None,
        TokenKind::Number | TokenKind::String => KEYWORD_CATEGORIES
            .iter()
            .find(|(_, words)| words.iter().any(|w| path.contains_word(w)))
            .map(|(category, _)| *category),
    }
}

/// A timing function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    CubicBezier([f64; 4]),
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    Linear,
}

impl Easing {
    /// `cubic-bezier(…)`, a DTCG `[x1, y1, x2, y2]` array, or a CSS keyword.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim().to_ascii_lowercase();
        let keyword = match text.as_str() {
            "ease" => Some(Self::Ease),
            "ease-in" | "easein" => Some(Self::EaseIn),
            "ease-out" | "easeout" => Some(Self::EaseOut),
            "ease-in-out" | "easeinout" => Some(Self::EaseInOut),
            "linear" => Some(Self::Linear),
            _ => None,
        };
        if keyword.is_some() {
            return keyword;
        }
        let inner = text
            .strip_prefix("cubic-bezier(")
            .and_then(|s| s.strip_suffix(')'))
            .or_else(|| text.strip_prefix('[').and_then(|s| s.strip_suffix(']')))?;
        let points: Vec<f64> = inner
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;
        let points: [f64; 4] = points.try_into().ok()?;
        Some(Self::CubicBezier(points))
    }

    fn css(&self) -> String {
        match self {
            Self::CubicBezier(p) => format!(
                "cubic-bezier({}, {}, {}, {})",
                decimal(p[0]),
                decimal(p[1]),
                decimal(p[2]),
                decimal(p[3])
            ),
            Self::Ease => "ease".to_string(),
            Self::EaseIn => "ease-in".to_string(),
            Self::EaseOut => "ease-out".to_string(),
            Self::EaseInOut => "ease-in-out".to_string(),
            Self::Linear => "linear".to_string(),
        }
    }

    fn swift(&self) -> String {
        match self {
            Self::CubicBezier(p) => format!(
                ".timingCurve({}, {}, {}, {})",
                decimal(p[0]),
                decimal(p[1]),
                decimal(p[2]),
                decimal(p[3])
            ),
            Self::Ease => ".default".to_string(),
            Self::EaseIn => ".easeIn".to_string(),
            Self::EaseOut => ".easeOut".to_string(),
            Self::EaseInOut => ".easeInOut".to_string(),
            Self::Linear => ".linear".to_string(),
        }
    }

    /// Compose expression and the symbol it imports.
    fn kotlin(&self) -> (String, &'static str) {
        match self {
            Self::CubicBezier(p) => (
                format!(
                    "CubicBezierEasing({}, {}, {}, {})",
                    kotlin_float(p[0]),
                    kotlin_float(p[1]),
                    kotlin_float(p[2]),
                    kotlin_float(p[3])
                ),
                "CubicBezierEasing",
            ),
            Self::Ease => ("Ease".to_string(), "Ease"),
            Self::EaseIn => ("EaseIn".to_string(), "EaseIn"),
            Self::EaseOut => ("EaseOut".to_string(), "EaseOut"),
            Self::EaseInOut => ("EaseInOut".to_string(), "EaseInOut"),
            Self::Linear => ("LinearEasing".to_string(), "LinearEasing"),
        }
    }
}

/// A resolved composite value.
#[derive(Debug, Clone, PartialEq)]
pub enum CompositeValue {
    /// Milliseconds.
    Duration(f64),
    Easing(Easing),
    Length(Dimension),
    /// Fraction in 0..=1.
    Opacity(f64),
    Text(String),
    Shadow(Vec<ShadowLayer>),
    Border(BorderValue),
}

/// A resolved token of one composite category.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeToken {
    pub path: TokenPath,
    pub category: ArtifactCategory,
    pub value: CompositeValue,
    pub targets: Vec<String>,
}

/// Milliseconds for a motion number. Explicit `ms`/`s` units win; a
/// unitless value below `seconds_threshold` is read as seconds.
pub fn duration_ms(value: &Dimension, seconds_threshold: Option<f64>) -> f64 {
    let ms = match value.unit() {
        Some("s") => value.value * 1000.0,
        Some(_) => value.value,
        None => match seconds_threshold {
            Some(threshold) if value.value < threshold => value.value * 1000.0,
            _ => value.value,
        },
    };
    (ms * 1000.0).round() / 1000.0
}

/// Opacity as a fraction: percentages and values above 1 are scaled down.
pub fn opacity_fraction(value: &Dimension) -> f64 {
    if value.unit() == Some("%") || value.value > 1.0 {
        value.value / 100.0
    } else {
        value.value
    }
}

fn classify(category: ArtifactCategory, value: &TokenValue, seconds_threshold: Option<f64>) -> Option<CompositeValue> {
    let classified = match (category, value) {
        (_, TokenValue::Shadow(layers)) => CompositeValue::Shadow(layers.clone()),
        (_, TokenValue::Border(border)) => CompositeValue::Border(border.clone()),
        (ArtifactCategory::Motion, TokenValue::Number(d)) => CompositeValue::Duration(duration_ms(d, seconds_threshold)),
        (ArtifactCategory::Motion, TokenValue::String(s)) => {
            Easing::parse(s).map_or_else(|| CompositeValue::Text(s.clone()), CompositeValue::Easing)
        }
        (ArtifactCategory::Opacity, TokenValue::Number(d)) => CompositeValue::Opacity(opacity_fraction(d)),
        (_, TokenValue::Number(d)) => CompositeValue::Length(d.clone()),
        (_, TokenValue::String(s)) => CompositeValue::Text(s.clone()),
        (_, TokenValue::Color(_) | TokenValue::Typography(_)) => return None,
    };
    Some(classified)
}

/// Composite tokens across `documents`, first occurrence of a path wins.
pub fn collect_composites(
    documents: &[&TokenDocument],
    graph: &TokenGraph,
    seconds_threshold: Option<f64>,
) -> Vec<CompositeToken> {
    let mut tokens: Vec<CompositeToken> = Vec::new();
    for doc in documents {
        for (path, token) in walk(doc) {
            let Some(category) = category_of(&path, token.kind) else {
                continue;
            };
            if tokens.iter().any(|t| t.path == path) {
                continue;
            }
            let Ok(resolved) = graph.resolve(&path.canonical()) else {
                continue;
            };
            let Some(value) = classify(category, &resolved.value, seconds_threshold) else {
                continue;
            };
            tracing::trace!(token = %path, category = %category, "composite token");
            tokens.push(CompositeToken {
                targets: resolved.chain.iter().skip(1).cloned().collect(),
                path,
                category,
                value,
            });
        }
    }
    tokens
}

/// Tokens split by category, in artifact order, empty categories dropped.
pub fn by_category(tokens: &[CompositeToken]) -> Vec<(ArtifactCategory, Vec<CompositeToken>)> {
    ArtifactCategory::COMPOSITES
        .iter()
        .map(|category| {
            let members: Vec<CompositeToken> = tokens.iter().filter(|t| t.category == *category).cloned().collect();
            (*category, members)
        })
        .filter(|(_, members)| !members.is_empty())
        .collect()
}

/// `0.4f`, `0f`.
fn kotlin_float(value: f64) -> String {
    format!("{}f", decimal(value))
}

/// Imports and helper declarations the rendered values need.
#[derive(Default)]
struct Needs {
    imports: Vec<String>,
    helpers: Vec<String>,
}

impl Needs {
    fn import(&mut self, import: impl Into<String>) {
        let import = import.into();
        if !self.imports.contains(&import) {
            self.imports.push(import);
        }
    }

    fn helper(&mut self, helper: String) {
        if !self.helpers.contains(&helper) {
            self.helpers.push(helper);
        }
    }
}

fn css_shadow(layers: &[ShadowLayer]) -> String {
    layers
        .iter()
        .map(|l| {
            format!(
                "{}{}px {}px {}px {}px {}",
                if l.inset { "inset " } else { "" },
                format_number(l.offset_x),
                format_number(l.offset_y),
                format_number(l.blur),
                format_number(l.spread),
                l.color.to_hex()
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn css_border(border: &BorderValue) -> String {
    let color = border.color.map_or_else(|| "currentColor".to_string(), |c| c.to_hex());
    format!("{}px {} {}", format_number(border.width), border.style, color)
}

struct Renderer<'a, P: EmitterPolicy + ?Sized> {
    policy: &'a P,
    needs: Needs,
}

impl<P: EmitterPolicy + ?Sized> Renderer<'_, P> {
    fn format(&self) -> SourceFormat {
        self.policy.format()
    }

    fn uikit(&self) -> bool {
        self.policy.profile().framework == UiFramework::UIKit
    }

    fn render(&mut self, value: &CompositeValue) -> Option<(String, Option<String>)> {
        let format = self.format();
        let rendered = match value {
            CompositeValue::Length(d) => {
                let rendered = length(format, d)?;
                if format == SourceFormat::Kotlin {
                    self.needs.import(DP_IMPORT);
                }
                return Some(rendered);
            }
            CompositeValue::Text(text) => (string_literal(format, text), None),
            CompositeValue::Duration(ms) => self.duration(*ms),
            CompositeValue::Easing(easing) => self.easing(easing),
            CompositeValue::Opacity(fraction) => match format {
                SourceFormat::Swift => (decimal(*fraction), Some("Double".to_string())),
                SourceFormat::Kotlin => (kotlin_float(*fraction), None),
                _ => (decimal(*fraction), None),
            },
            CompositeValue::Shadow(layers) => self.shadow(layers)?,
            CompositeValue::Border(border) => self.border(border),
        };
        Some(rendered)
    }

    fn duration(&self, ms: f64) -> (String, Option<String>) {
        match self.format() {
            SourceFormat::Css | SourceFormat::Scss => (format!("{}ms", format_number(ms)), None),
            SourceFormat::TypeScript => (format_number(ms), None),
            SourceFormat::Swift => (
                format!(".milliseconds({})", format_number(ms.round())),
                Some("Duration".to_string()),
            ),
            SourceFormat::Kotlin => (format_number(ms.round()), None),
        }
    }

    fn easing(&mut self, easing: &Easing) -> (String, Option<String>) {
        match self.format() {
            SourceFormat::Css | SourceFormat::Scss => (easing.css(), None),
            SourceFormat::TypeScript => (string_literal(SourceFormat::TypeScript, &easing.css()), None),
            SourceFormat::Swift => (easing.swift(), Some("Animation".to_string())),
            SourceFormat::Kotlin => {
                let (expr, symbol) = easing.kotlin();
                self.needs.import(format!("{}.{}", KOTLIN_ANIMATION_CORE, symbol));
                (expr, None)
            }
        }
    }

    fn swift_color(&self) -> &'static str {
        if self.uikit() {
            "UIColor"
        } else {
            "Color"
        }
    }

    fn shadow(&mut self, layers: &[ShadowLayer]) -> Option<(String, Option<String>)> {
        if layers.is_empty() {
            return None;
        }
        let rendered = match self.format() {
            SourceFormat::Css | SourceFormat::Scss => (css_shadow(layers), None),
            SourceFormat::TypeScript => (string_literal(SourceFormat::TypeScript, &css_shadow(layers)), None),
            SourceFormat::Swift => {
                let helper = format!(
                    "struct ShadowStyle {{ let color: {}; let radius: CGFloat; let x: CGFloat; let y: CGFloat }}",
                    self.swift_color()
                );
                self.needs.helper(helper);
                let styles: Vec<String> = layers
                    .iter()
                    .map(|l| {
                        format!(
                            "ShadowStyle(color: {}, radius: {}, x: {}, y: {})",
                            self.policy.color_literal(l.color),
                            decimal(l.blur / 2.0),
                            format_number(l.offset_x),
                            format_number(l.offset_y)
                        )
                    })
                    .collect();
                match styles.as_slice() {
                    [single] => (single.clone(), None),
                    _ => (format!("[{}]", styles.join(", ")), None),
                }
            }
            SourceFormat::Kotlin => {
                for import in [KOTLIN_COLOR, KOTLIN_DP, DP_IMPORT] {
                    self.needs.import(import);
                }
                self.needs.helper(
                    "data class ShadowToken(val color: Color, val offsetX: Dp, val offsetY: Dp, val blur: Dp, val spread: Dp)"
                        .to_string(),
                );
                let tokens: Vec<String> = layers
                    .iter()
                    .map(|l| {
                        format!(
                            "ShadowToken(color = {}, offsetX = {}, offsetY = {}, blur = {}, spread = {})",
                            self.policy.color_literal(l.color),
                            kotlin_unit(l.offset_x, "dp"),
                            kotlin_unit(l.offset_y, "dp"),
                            kotlin_unit(l.blur, "dp"),
                            kotlin_unit(l.spread, "dp")
                        )
                    })
                    .collect();
                match tokens.as_slice() {
                    [single] => (single.clone(), None),
                    _ => (format!("listOf({})", tokens.join(", ")), None),
                }
            }
        };
        Some(rendered)
    }

    fn border(&mut self, border: &BorderValue) -> (String, Option<String>) {
        let color = |fallback: &str| {
            border
                .color
                .map_or_else(|| fallback.to_string(), |c: Color| self.policy.color_literal(c))
        };
        match self.format() {
            SourceFormat::Css | SourceFormat::Scss => (css_border(border), None),
            SourceFormat::TypeScript => (
                format!(
                    "{{ width: '{}px', style: '{}', color: {} }} as const",
                    format_number(border.width),
                    border.style,
                    color("'currentColor'")
                ),
                None,
            ),
            SourceFormat::Swift => {
                let fallback = if self.uikit() { ".label" } else { ".primary" };
                let expr = format!("BorderStyle(width: {}, color: {})", format_number(border.width), color(fallback));
                let helper = format!("struct BorderStyle {{ let width: CGFloat; let color: {} }}", self.swift_color());
                self.needs.helper(helper);
                (expr, None)
            }
            SourceFormat::Kotlin => {
                let expr = format!(
                    "BorderStroke({}, {})",
                    kotlin_unit(border.width, "dp"),
                    color("Color.Unspecified")
                );
                for import in [KOTLIN_BORDER_STROKE, KOTLIN_COLOR, DP_IMPORT] {
                    self.needs.import(import);
                }
                (expr, None)
            }
        }
    }
}

/// Emit the file for one composite category.
pub fn emit_composite<P: EmitterPolicy + ?Sized>(policy: &P, w: &mut SourceWriter, tokens: &[CompositeToken]) {
    let pending = tokens
        .iter()
        .map(|t| Pending {
            path: t.path.canonical(),
            segments: t.path.segments().to_vec(),
            targets: t.targets.clone(),
            value: t.value.clone(),
        })
        .collect();
    let mut renderer = Renderer {
        policy,
        needs: Needs::default(),
    };
    let groups = plan_values(policy, w, pending, |value| renderer.render(value));
    let Needs { mut imports, helpers } = renderer.needs;
    imports.sort();
    let required: Vec<&str> = imports.iter().map(String::as_str).collect();
    emit_values(policy, w, &groups, &required, &helpers);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::detector_for;
    use crate::generators::policy_for;
    use tokenweave_core::Token;

    fn path(text: &str) -> TokenPath {
        TokenPath::from_canonical(text)
    }

    fn token(category: ArtifactCategory, p: &str, value: CompositeValue) -> CompositeToken {
        CompositeToken {
            path: path(p),
            category,
            value,
            targets: Vec::new(),
        }
    }

    fn render(format: SourceFormat, category: ArtifactCategory, tokens: &[CompositeToken]) -> String {
        let mut profile = detector_for(format, category).detect(None, true);
        profile.package.get_or_insert_with(|| "com.example.app.ui.theme".to_string());
        let indent = profile.indent.clone();
        let policy = policy_for(profile);
        let mut w = SourceWriter::new(format, &indent, None);
        emit_composite(policy.as_ref(), &mut w, tokens);
        w.finish("").0
    }

    fn doc_with(entries: &[(&str, TokenValue)]) -> TokenDocument {
        let mut doc = TokenDocument::empty("values");
        for (p, value) in entries {
            doc.insert(&path(p), Token::concrete(value.clone()));
        }
        doc
    }

    fn number(text: &str) -> TokenValue {
        TokenValue::Number(Dimension::parse(text).unwrap())
    }

    #[test]
    fn test_category_keywords() {
        assert_eq!(category_of(&path("Motion/duration/fast"), TokenKind::Number), Some(ArtifactCategory::Motion));
        assert_eq!(category_of(&path("Radius/md"), TokenKind::Number), Some(ArtifactCategory::Radius));
        assert_eq!(category_of(&path("Shadow/radius"), TokenKind::Number), Some(ArtifactCategory::Shadow));
        assert_eq!(category_of(&path("Border/radius/sm"), TokenKind::Number), Some(ArtifactCategory::Radius));
        assert_eq!(category_of(&path("Border/width"), TokenKind::Number), Some(ArtifactCategory::Border));
        assert_eq!(category_of(&path("Overlay/opacity"), TokenKind::Number), Some(ArtifactCategory::Opacity));
        assert_eq!(category_of(&path("Border/default"), TokenKind::Color), None);
        assert_eq!(category_of(&path("Spacing/4"), TokenKind::Number), None);
        assert_eq!(category_of(&path("Card"), TokenKind::Shadow), Some(ArtifactCategory::Shadow));
        assert_eq!(category_of(&path("Promotion/banner/gap"), TokenKind::Number), None);
        assert_eq!(category_of(&path("Alphabet/size"), TokenKind::Number), None);
        assert_eq!(category_of(&path("Button/borderRadius"), TokenKind::Number), Some(ArtifactCategory::Radius));
    }

    #[test]
    fn test_seconds_heuristic() {
        assert_eq!(duration_ms(&Dimension::unitless(0.2), Some(10.0)), 200.0);
        assert_eq!(duration_ms(&Dimension::unitless(200.0), Some(10.0)), 200.0);
        assert_eq!(duration_ms(&Dimension::unitless(5.0), None), 5.0);
        assert_eq!(duration_ms(&Dimension::with_unit(5.0, "ms"), Some(10.0)), 5.0);
        assert_eq!(duration_ms(&Dimension::with_unit(0.25, "s"), None), 250.0);
    }

    #[test]
    fn test_motion_duration_normalised_to_milliseconds() {
        for value in ["0.2", "200"] {
            let doc = doc_with(&[("Motion/duration/fast", number(value))]);
            let graph = TokenGraph::build(&[&doc]);
            let tokens = collect_composites(&[&doc], &graph, Some(10.0));
            assert_eq!(tokens.len(), 1);
            assert_eq!(tokens[0].value, CompositeValue::Duration(200.0));
            let ts = render(SourceFormat::TypeScript, ArtifactCategory::Motion, &tokens);
            assert!(ts.contains("export const MOTION_DURATION_FAST = 200;\n"), "{}", ts);
            let kotlin = render(SourceFormat::Kotlin, ArtifactCategory::Motion, &tokens);
            assert!(kotlin.contains("    val MotionDurationFast = 200\n"), "{}", kotlin);
        }
    }

    #[test]
    fn test_easing_parse() {
        assert_eq!(
            Easing::parse("cubic-bezier(0.4, 0, 0.2, 1)"),
            Some(Easing::CubicBezier([0.4, 0.0, 0.2, 1.0]))
        );
        assert_eq!(Easing::parse("[0.4,0,0.2,1]"), Some(Easing::CubicBezier([0.4, 0.0, 0.2, 1.0])));
        assert_eq!(Easing::parse("ease-out"), Some(Easing::EaseOut));
        assert_eq!(Easing::parse("springy"), None);
    }

    #[test]
    fn test_easing_per_target() {
        let tokens = [token(
            ArtifactCategory::Motion,
            "Motion/easing/emphasized",
            CompositeValue::Easing(Easing::CubicBezier([0.4, 0.0, 0.2, 1.0])),
        )];
        let css = render(SourceFormat::Css, ArtifactCategory::Motion, &tokens);
        assert!(css.contains("--motion-easing-emphasized: cubic-bezier(0.4, 0, 0.2, 1);"));
        let swift = render(SourceFormat::Swift, ArtifactCategory::Motion, &tokens);
        assert!(swift.contains("static let motionEasingEmphasized: Animation = .timingCurve(0.4, 0, 0.2, 1)"));
        let kotlin = render(SourceFormat::Kotlin, ArtifactCategory::Motion, &tokens);
        assert!(kotlin.contains("import androidx.compose.animation.core.CubicBezierEasing\n"));
        assert!(kotlin.contains("val MotionEasingEmphasized = CubicBezierEasing(0.4f, 0f, 0.2f, 1f)"));
    }

    #[test]
    fn test_opacity_fraction() {
        assert_eq!(opacity_fraction(&Dimension::unitless(0.5)), 0.5);
        assert_eq!(opacity_fraction(&Dimension::unitless(40.0)), 0.4);
        assert_eq!(opacity_fraction(&Dimension::with_unit(80.0, "%")), 0.8);
        let tokens = [token(ArtifactCategory::Opacity, "Opacity/disabled", CompositeValue::Opacity(0.4))];
        let swift = render(SourceFormat::Swift, ArtifactCategory::Opacity, &tokens);
        assert!(swift.contains("static let opacityDisabled: Double = 0.4"));
        let kotlin = render(SourceFormat::Kotlin, ArtifactCategory::Opacity, &tokens);
        assert!(kotlin.contains("val OpacityDisabled = 0.4f"));
    }

    fn card_shadow() -> CompositeToken {
        let layer = ShadowLayer::drop(0.0, 2.0, 4.0, Color::rgba(0, 0, 0, 0x1a));
        token(ArtifactCategory::Shadow, "Shadow/card", CompositeValue::Shadow(vec![layer]))
    }

    #[test]
    fn test_css_shadow() {
        let css = render(SourceFormat::Css, ArtifactCategory::Shadow, &[card_shadow()]);
        assert!(css.contains("--shadow-card: 0px 2px 4px 0px #0000001a;"), "{}", css);

        let mut layered = card_shadow();
        let inner = ShadowLayer::drop(0.0, 1.0, 2.0, Color::BLACK);
        layered.value = CompositeValue::Shadow(vec![ShadowLayer { inset: true, ..inner }]);
        let css = render(SourceFormat::Css, ArtifactCategory::Shadow, &[layered]);
        assert!(css.contains("inset 0px 1px 2px 0px #000000"));
    }

    #[test]
    fn test_swift_shadow_helper() {
        let swift = render(SourceFormat::Swift, ArtifactCategory::Shadow, &[card_shadow()]);
        assert!(swift.contains(
            "struct ShadowStyle { let color: Color; let radius: CGFloat; let x: CGFloat; let y: CGFloat }\n"
        ));
        assert!(swift.contains("static let shadowCard = ShadowStyle(color: Color(red: 0, green: 0, blue: 0, opacity: 0.102), radius: 2, x: 0, y: 2)"));
    }

    #[test]
    fn test_kotlin_shadow_list() {
        let mut shadow = card_shadow();
        let layers = vec![
            ShadowLayer::drop(0.0, 1.0, 2.0, Color::BLACK),
            ShadowLayer::drop(0.0, 4.0, 8.0, Color::BLACK).with_spread(-2.0),
        ];
        shadow.value = CompositeValue::Shadow(layers);
        let kotlin = render(SourceFormat::Kotlin, ArtifactCategory::Shadow, &[shadow]);
        assert!(kotlin.contains("import androidx.compose.ui.unit.Dp\n"));
        assert!(kotlin.contains("data class ShadowToken("));
        assert!(kotlin.contains("val ShadowCard = listOf(ShadowToken("));
        assert!(kotlin.contains("spread = (-2).dp)"));
    }

    #[test]
    fn test_border_targets() {
        let border = BorderValue {
            color: Some(Color::rgb(0xe0, 0xe0, 0xe0)),
            width: 1.0,
            style: "solid".to_string(),
        };
        let tokens = [token(ArtifactCategory::Border, "Border/card", CompositeValue::Border(border))];
        let css = render(SourceFormat::Css, ArtifactCategory::Border, &tokens);
        assert!(css.contains("--border-card: 1px solid #e0e0e0;"));
        let ts = render(SourceFormat::TypeScript, ArtifactCategory::Border, &tokens);
        assert!(ts.contains("{ width: '1px', style: 'solid', color: '#e0e0e0' } as const"));
        let kotlin = render(SourceFormat::Kotlin, ArtifactCategory::Border, &tokens);
        assert!(kotlin.contains("import androidx.compose.foundation.BorderStroke\n"));
        assert!(kotlin.contains("val BorderCard = BorderStroke(1.dp, Color(0xFFE0E0E0))"));
        let swift = render(SourceFormat::Swift, ArtifactCategory::Border, &tokens);
        assert!(swift.contains("struct BorderStyle { let width: CGFloat; let color: Color }\n"));
    }

    #[test]
    fn test_radius_uses_lengths() {
        let tokens = [token(ArtifactCategory::Radius, "Radius/md", CompositeValue::Length(Dimension::unitless(8.0)))];
        assert!(render(SourceFormat::Css, ArtifactCategory::Radius, &tokens).contains("--radius-md: 8px;"));
        assert!(render(SourceFormat::Swift, ArtifactCategory::Radius, &tokens).contains("static let radiusMd: CGFloat = 8"));
        assert!(render(SourceFormat::Kotlin, ArtifactCategory::Radius, &tokens).contains("val RadiusMd = 8.dp"));
    }

    #[test]
    fn test_by_category_order() {
        let doc = doc_with(&[
            ("Radius/sm", number("4")),
            ("Motion/duration/slow", number("400")),
            ("Spacing/4", number("4")),
            ("Opacity/muted", number("0.6")),
        ]);
        let graph = TokenGraph::build(&[&doc]);
        let tokens = collect_composites(&[&doc], &graph, Some(10.0));
        let categories: Vec<ArtifactCategory> = by_category(&tokens).into_iter().map(|(c, _)| c).collect();
        assert_eq!(
            categories,
            vec![ArtifactCategory::Motion, ArtifactCategory::Radius, ArtifactCategory::Opacity]
        );
    }
}
