//! The token document model.
//!
//! A document is parsed once from DTCG-flavored JSON into a tree of groups
//! and typed tokens. Alias metadata is lifted out of `$extensions` (or a
//! curly `{a.b}` value) into [`Token::alias_target`].

use crate::errors::DocumentError;
use crate::types::{BorderValue, Color, Dimension, FontWeight, ShadowLayer, TypographyValue};
use crate::walker::{is_metadata_key, walk, TokenPath};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Color,
    Number,
    String,
    Typography,
    Shadow,
    Border,
}

impl TokenKind {
    /// Map a `$type` name onto a kind. Unknown types are strings.
    pub fn from_type_name(name: &str) -> Self {
        match name.trim() {
            "color" => Self::Color,
            "number" | "float" | "integer" | "dimension" | "duration" | "fontWeight"
            | "fontSize" | "lineHeight" | "letterSpacing" | "paragraphSpacing" | "spacing"
            | "sizing" | "borderRadius" | "borderWidth" | "opacity" => Self::Number,
            "typography" => Self::Typography,
            "shadow" | "boxShadow" => Self::Shadow,
            "border" => Self::Border,
            _ => Self::String,
        }
    }

    /// Infer a kind from the shape of an untyped value.
    pub fn infer(value: &Value) -> Self {
        match value {
            Value::Number(_) => Self::Number,
            Value::String(s) => {
                if s.starts_with('#') && Color::from_hex(s).is_some() {
                    Self::Color
                } else if s.starts_with("rgb") && Color::from_css_function(s).is_some() {
                    Self::Color
                } else if Dimension::parse(s).is_some() {
                    Self::Number
                } else {
                    Self::String
                }
            }
            Value::Array(items) if items.iter().all(looks_like_shadow) && !items.is_empty() => {
                Self::Shadow
            }
            Value::Object(obj) => {
                if obj.contains_key("fontSize") || obj.contains_key("fontFamily") {
                    Self::Typography
                } else if looks_like_shadow(value) {
                    Self::Shadow
                } else if obj.contains_key("width") && obj.contains_key("style") {
                    Self::Border
                } else if obj.contains_key("colorSpace")
                    || (obj.contains_key("r") && obj.contains_key("g") && obj.contains_key("b"))
                {
                    Self::Color
                } else if obj.contains_key("value") && obj.contains_key("unit") {
                    Self::Number
                } else {
                    Self::String
                }
            }
            _ => Self::String,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Number => "number",
            Self::String => "string",
            Self::Typography => "typography",
            Self::Shadow => "shadow",
            Self::Border => "border",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn looks_like_shadow(value: &Value) -> bool {
    value.as_object().map_or(false, |obj| {
        obj.contains_key("blur") || obj.contains_key("offsetX") || obj.contains_key("offsetY")
    })
}

/// A concrete, kind-specific token payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum TokenValue {
    Color(Color),
    Number(Dimension),
    String(String),
    Typography(TypographyValue),
    Shadow(Vec<ShadowLayer>),
    Border(BorderValue),
}

impl TokenValue {
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::Color(_) => TokenKind::Color,
            Self::Number(_) => TokenKind::Number,
            Self::String(_) => TokenKind::String,
            Self::Typography(_) => TokenKind::Typography,
            Self::Shadow(_) => TokenKind::Shadow,
            Self::Border(_) => TokenKind::Border,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Dimension> {
        match self {
            Self::Number(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_typography(&self) -> Option<&TypographyValue> {
        match self {
            Self::Typography(t) => Some(t),
            _ => None,
        }
    }
}

/// A leaf of a token document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// The concrete value. Curly aliases carry none.
    pub value: Option<TokenValue>,
    /// The token this one points at, if it is an alias.
    pub alias_target: Option<TokenPath>,
    /// The raw `$extensions` object.
    pub extensions: Map<String, Value>,
    pub description: Option<String>,
}

impl Token {
    /// A plain value token.
    pub fn concrete(value: TokenValue) -> Self {
        Self {
            kind: value.kind(),
            value: Some(value),
            alias_target: None,
            extensions: Map::new(),
            description: None,
        }
    }

    /// An alias token, optionally carrying the already-resolved value.
    pub fn alias(kind: TokenKind, target: TokenPath, value: Option<TokenValue>) -> Self {
        Self {
            kind,
            value,
            alias_target: Some(target),
            extensions: Map::new(),
            description: None,
        }
    }

    pub fn is_alias(&self) -> bool {
        self.alias_target.is_some()
    }
}

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenNode {
    Group(TokenGroup),
    Token(Token),
    /// A non-object value where a group or token was expected.
    Value(Value),
}

/// A group of named children, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenGroup {
    /// `$type` declared on the group, inherited by descendants.
    pub kind: Option<TokenKind>,
    pub children: IndexMap<String, TokenNode>,
}

/// A parsed token document.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenDocument {
    /// Label used in diagnostics (`light`, `dark`, a file name).
    pub name: String,
    pub root: TokenGroup,
}

impl TokenDocument {
    /// An empty document.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: TokenGroup::default(),
        }
    }

    /// Parse a document from JSON text.
    pub fn from_json_str(name: &str, text: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(text).map_err(|source| DocumentError::InvalidJson {
            name: name.to_string(),
            source,
        })?;
        Self::from_value(name, &value)
    }

    /// Parse a document from an already-decoded JSON value.
    pub fn from_value(name: &str, value: &Value) -> Result<Self, DocumentError> {
        let obj = value.as_object().ok_or_else(|| DocumentError::NotAnObject {
            name: name.to_string(),
        })?;
        let parser = Parser { document: name };
        let root = parser.group(obj, None, &TokenPath::default())?;
        let doc = Self {
            name: name.to_string(),
            root,
        };
        tracing::debug!(document = name, tokens = walk(&doc).len(), "parsed token document");
        Ok(doc)
    }

    /// Number of tokens per kind.
    pub fn count_by_kind(&self) -> BTreeMap<TokenKind, usize> {
        let mut counts = BTreeMap::new();
        for (_, token) in walk(self) {
            *counts.entry(token.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Whether the document holds at least one token of `kind`.
    pub fn has_kind(&self, kind: TokenKind) -> bool {
        walk(self).iter().any(|(_, t)| t.kind == kind)
    }

    /// Insert a token at `path`, creating groups as needed.
    pub fn insert(&mut self, path: &TokenPath, token: Token) {
        let Some((last, parents)) = path.segments().split_last() else {
            return;
        };
        let mut group = &mut self.root;
        for segment in parents {
            let entry = group
                .children
                .entry(segment.clone())
                .or_insert_with(|| TokenNode::Group(TokenGroup::default()));
            if !matches!(entry, TokenNode::Group(_)) {
                *entry = TokenNode::Group(TokenGroup::default());
            }
            group = match entry {
                TokenNode::Group(g) => g,
                _ => return,
            };
        }
        group.children.insert(last.clone(), TokenNode::Token(token));
    }
}

struct Parser<'a> {
    document: &'a str,
}

impl<'a> Parser<'a> {
    fn malformed(&self, path: &TokenPath, reason: impl Into<String>) -> DocumentError {
        DocumentError::MalformedToken {
            document: self.document.to_string(),
            path: path.canonical(),
            reason: reason.into(),
        }
    }

    fn group(
        &self,
        obj: &Map<String, Value>,
        inherited: Option<TokenKind>,
        path: &TokenPath,
    ) -> Result<TokenGroup, DocumentError> {
        let kind = obj
            .get("$type")
            .and_then(Value::as_str)
            .map(TokenKind::from_type_name)
            .or(inherited);
        let mut children = IndexMap::new();
        for (key, value) in obj {
            if is_metadata_key(key) {
                continue;
            }
            let child_path = path.child(key);
            let node = match value {
                Value::Object(child) if child.contains_key("$value") => {
                    TokenNode::Token(self.token(child, kind, &child_path)?)
                }
                Value::Object(child) => TokenNode::Group(self.group(child, kind, &child_path)?),
                other => TokenNode::Value(other.clone()),
            };
            children.insert(key.clone(), node);
        }
        Ok(TokenGroup { kind, children })
    }

    fn token(
        &self,
        obj: &Map<String, Value>,
        inherited: Option<TokenKind>,
        path: &TokenPath,
    ) -> Result<Token, DocumentError> {
        let raw = obj.get("$value").unwrap_or(&Value::Null);
        let type_name = obj.get("$type").and_then(Value::as_str);
        let extensions = obj
            .get("$extensions")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let description = obj
            .get("$description")
            .and_then(Value::as_str)
            .map(String::from);

        let curly = raw.as_str().and_then(curly_reference);
        let alias_target = curly.clone().or_else(|| extension_alias(&extensions));

        let kind = type_name
            .map(TokenKind::from_type_name)
            .or(inherited)
            .unwrap_or_else(|| {
                if curly.is_some() {
                    TokenKind::String
                } else {
                    TokenKind::infer(raw)
                }
            });

        let value = if curly.is_some() {
            None
        } else {
            Some(self.value(kind, type_name, raw, path)?)
        };

        Ok(Token {
            kind,
            value,
            alias_target,
            extensions,
            description,
        })
    }

    fn value(
        &self,
        kind: TokenKind,
        type_name: Option<&str>,
        raw: &Value,
        path: &TokenPath,
    ) -> Result<TokenValue, DocumentError> {
        match kind {
            TokenKind::Color => parse_color(raw)
                .map(TokenValue::Color)
                .ok_or_else(|| self.malformed(path, format!("invalid color value {}", raw))),
            TokenKind::Number => {
                let parsed = if type_name == Some("fontWeight") {
                    parse_font_weight(raw).map(|w| Dimension::unitless(w.to_numeric() as f64))
                } else {
                    parse_dimension(raw)
                };
                parsed
                    .map(TokenValue::Number)
                    .ok_or_else(|| self.malformed(path, format!("invalid number value {}", raw)))
            }
            TokenKind::String => Ok(TokenValue::String(match raw {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })),
            TokenKind::Typography => parse_typography(raw)
                .map(TokenValue::Typography)
                .ok_or_else(|| self.malformed(path, "typography value needs a fontSize")),
            TokenKind::Shadow => parse_shadow(raw)
                .map(TokenValue::Shadow)
                .ok_or_else(|| self.malformed(path, "invalid shadow value")),
            TokenKind::Border => parse_border(raw)
                .map(TokenValue::Border)
                .ok_or_else(|| self.malformed(path, "invalid border value")),
        }
    }
}

/// `{Colour.Grey.750}` as a whole value.
fn curly_reference(text: &str) -> Option<TokenPath> {
    let inner = text.trim().strip_prefix('{')?.strip_suffix('}')?;
    if inner.is_empty() || inner.contains(['{', '}']) {
        return None;
    }
    Some(TokenPath::from_reference(inner))
}

/// Alias metadata in `$extensions`: `aliasData.targetVariableName` (top
/// level or one vendor key deep) or a plain `alias` string.
fn extension_alias(extensions: &Map<String, Value>) -> Option<TokenPath> {
    let from_alias_data = |obj: &Map<String, Value>| {
        obj.get("aliasData")
            .and_then(|d| d.get("targetVariableName"))
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(TokenPath::from_reference)
    };
    from_alias_data(extensions)
        .or_else(|| {
            extensions
                .values()
                .filter_map(Value::as_object)
                .find_map(from_alias_data)
        })
        .or_else(|| {
            extensions
                .get("alias")
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(TokenPath::from_reference)
        })
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Hex strings, `rgb()` functions, Figma `{r,g,b,a}` floats and DTCG
/// `{colorSpace, components, alpha}` objects.
pub fn parse_color(value: &Value) -> Option<Color> {
    match value {
        Value::String(s) => Color::from_hex(s).or_else(|| Color::from_css_function(s)),
        Value::Object(obj) => {
            if let Some(components) = obj.get("components").and_then(Value::as_array) {
                let c: Vec<f64> = components.iter().filter_map(number).collect();
                if c.len() != 3 {
                    return obj.get("hex").and_then(Value::as_str).and_then(Color::from_hex);
                }
                let alpha = obj.get("alpha").and_then(number).unwrap_or(1.0);
                return Some(Color::from_unit_floats(c[0], c[1], c[2], alpha));
            }
            if let Some(hex) = obj.get("hex").and_then(Value::as_str) {
                return Color::from_hex(hex);
            }
            let r = obj.get("r").and_then(number)?;
            let g = obj.get("g").and_then(number)?;
            let b = obj.get("b").and_then(number)?;
            let a = obj.get("a").and_then(number).unwrap_or(1.0);
            Some(Color::from_unit_floats(r, g, b, a))
        }
        _ => None,
    }
}

/// JSON numbers, numeric strings with a unit, or `{value, unit}`.
pub fn parse_dimension(value: &Value) -> Option<Dimension> {
    match value {
        Value::Number(n) => n.as_f64().map(Dimension::unitless),
        Value::String(s) => Dimension::parse(s),
        Value::Object(obj) => {
            let v = obj.get("value").and_then(number)?;
            match obj.get("unit").and_then(Value::as_str) {
                Some(unit) if !unit.is_empty() => Some(Dimension::with_unit(v, unit.to_ascii_lowercase())),
                _ => Some(Dimension::unitless(v)),
            }
        }
        _ => None,
    }
}

fn parse_font_weight(value: &Value) -> Option<FontWeight> {
    match value {
        Value::Number(n) => n.as_f64().map(FontWeight::from_numeric),
        Value::String(s) => FontWeight::from_name(s),
        _ => None,
    }
}

fn parse_typography(value: &Value) -> Option<TypographyValue> {
    let obj = value.as_object()?;
    let font_size = obj.get("fontSize").and_then(parse_dimension)?.value;
    let font_weight = obj
        .get("fontWeight")
        .and_then(parse_font_weight)
        .unwrap_or(FontWeight::Regular);
    let font_family = match obj.get("fontFamily") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Array(items)) => items.first().and_then(Value::as_str).map(String::from),
        _ => None,
    };
    Some(TypographyValue {
        font_family,
        font_size,
        font_weight,
        line_height: obj.get("lineHeight").and_then(parse_dimension),
        letter_spacing: obj.get("letterSpacing").and_then(parse_dimension),
        text_case: obj
            .get("textCase")
            .and_then(Value::as_str)
            .filter(|s| !s.eq_ignore_ascii_case("none") && !s.eq_ignore_ascii_case("original"))
            .map(String::from),
    })
}

fn parse_shadow_layer(value: &Value) -> Option<ShadowLayer> {
    let obj = value.as_object()?;
    let color = obj.get("color").and_then(parse_color)?;
    let field = |names: &[&str]| {
        names
            .iter()
            .find_map(|n| obj.get(*n).and_then(parse_dimension))
            .map_or(0.0, |d| d.value)
    };
    let inset = obj.get("inset").and_then(Value::as_bool).unwrap_or(false)
        || obj
            .get("type")
            .and_then(Value::as_str)
            .map_or(false, |t| t.eq_ignore_ascii_case("innerShadow") || t == "inset");
    Some(ShadowLayer {
        color,
        offset_x: field(&["offsetX", "x"]),
        offset_y: field(&["offsetY", "y"]),
        blur: field(&["blur", "radius"]),
        spread: field(&["spread"]),
        inset,
    })
}

fn parse_shadow(value: &Value) -> Option<Vec<ShadowLayer>> {
    match value {
        Value::Array(items) if !items.is_empty() => items.iter().map(parse_shadow_layer).collect(),
        Value::Object(_) => parse_shadow_layer(value).map(|layer| vec![layer]),
        _ => None,
    }
}

fn parse_border(value: &Value) -> Option<BorderValue> {
    let obj = value.as_object()?;
    Some(BorderValue {
        color: obj.get("color").and_then(parse_color),
        width: obj.get("width").and_then(parse_dimension)?.value,
        style: obj
            .get("style")
            .and_then(Value::as_str)
            .unwrap_or("solid")
            .to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::find;

    #[test]
    fn test_type_inheritance() {
        let doc = TokenDocument::from_json_str(
            "light",
            r##"{ "Grey": { "$type": "color", "750": { "$value": "#1d1d1d" } } }"##,
        )
        .unwrap();
        let token = find(&doc, &["Grey", "750"]).unwrap();
        assert_eq!(token.kind, TokenKind::Color);
        assert_eq!(token.value, Some(TokenValue::Color(Color::rgb(0x1d, 0x1d, 0x1d))));
    }

    #[test]
    fn test_figma_alias_extension() {
        let doc = TokenDocument::from_json_str(
            "light",
            r##"{
                "Text": {
                    "primary": {
                        "$type": "color",
                        "$value": "#1d1d1d",
                        "$extensions": {
                            "com.figma": { "aliasData": { "targetVariableName": "Colour/Grey/750" } }
                        }
                    }
                }
            }"##,
        )
        .unwrap();
        let token = find(&doc, &["Text", "primary"]).unwrap();
        assert_eq!(token.alias_target.as_ref().map(|p| p.canonical()).as_deref(), Some("Colour/Grey/750"));
        assert!(token.value.is_some());
    }

    #[test]
    fn test_curly_alias_has_no_value() {
        let doc = TokenDocument::from_json_str(
            "light",
            r##"{ "a": { "$type": "color", "$value": "{Colour.Grey.750}" } }"##,
        )
        .unwrap();
        let token = find(&doc, &["a"]).unwrap();
        assert!(token.value.is_none());
        assert_eq!(token.alias_target, Some(TokenPath::from_canonical("Colour/Grey/750")));
    }

    #[test]
    fn test_number_forms() {
        let doc = TokenDocument::from_json_str(
            "values",
            r##"{
                "a": { "$type": "number", "$value": 16 },
                "b": { "$type": "dimension", "$value": "1.5rem" },
                "c": { "$type": "duration", "$value": { "value": 200, "unit": "ms" } },
                "d": { "$type": "fontWeight", "$value": "Semi Bold" }
            }"##,
        )
        .unwrap();
        let num = |name: &str| find(&doc, &[name]).and_then(|t| t.value.clone());
        assert_eq!(num("a"), Some(TokenValue::Number(Dimension::unitless(16.0))));
        assert_eq!(num("b"), Some(TokenValue::Number(Dimension::with_unit(1.5, "rem"))));
        assert_eq!(num("c"), Some(TokenValue::Number(Dimension::with_unit(200.0, "ms"))));
        assert_eq!(num("d"), Some(TokenValue::Number(Dimension::unitless(600.0))));
    }

    #[test]
    fn test_color_objects() {
        let figma = serde_json::json!({ "r": 1.0, "g": 0.0, "b": 0.0, "a": 1.0 });
        assert_eq!(parse_color(&figma), Some(Color::rgb(255, 0, 0)));
        let dtcg = serde_json::json!({ "colorSpace": "srgb", "components": [0, 0, 1], "alpha": 0.5 });
        assert_eq!(parse_color(&dtcg), Some(Color::rgba(0, 0, 255, 128)));
    }

    #[test]
    fn test_typography_value() {
        let doc = TokenDocument::from_json_str(
            "typography",
            r##"{
                "Heading": {
                    "$type": "typography",
                    "$value": {
                        "fontFamily": "Inter",
                        "fontSize": 32,
                        "fontWeight": 700,
                        "lineHeight": "40px",
                        "letterSpacing": "-1%"
                    }
                }
            }"##,
        )
        .unwrap();
        let t = find(&doc, &["Heading"]).and_then(|t| t.value.clone()).unwrap();
        let t = t.as_typography().unwrap();
        assert_eq!(t.font_family.as_deref(), Some("Inter"));
        assert_eq!(t.font_weight, FontWeight::Bold);
        assert_eq!(t.line_height_px(), Some(40.0));
    }

    #[test]
    fn test_inferred_kinds() {
        let doc = TokenDocument::from_json_str(
            "x",
            r##"{
                "c": { "$value": "#ffffff" },
                "n": { "$value": 4 },
                "s": { "$value": "Inter" },
                "sh": { "$value": { "color": "#000000", "offsetX": 0, "offsetY": 2, "blur": 4 } }
            }"##,
        )
        .unwrap();
        let counts = doc.count_by_kind();
        assert_eq!(counts.get(&TokenKind::Color), Some(&1));
        assert_eq!(counts.get(&TokenKind::Number), Some(&1));
        assert_eq!(counts.get(&TokenKind::String), Some(&1));
        assert_eq!(counts.get(&TokenKind::Shadow), Some(&1));
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(
            TokenDocument::from_json_str("x", "[1, 2]"),
            Err(DocumentError::NotAnObject { .. })
        ));
        assert!(matches!(
            TokenDocument::from_json_str("x", "{ nope"),
            Err(DocumentError::InvalidJson { .. })
        ));
        assert!(matches!(
            TokenDocument::from_json_str("x", r##"{ "a": { "$type": "color", "$value": "blue-ish" } }"##),
            Err(DocumentError::MalformedToken { .. })
        ));
    }

    #[test]
    fn test_insert_creates_groups() {
        let mut doc = TokenDocument::empty("synth");
        doc.insert(
            &TokenPath::from_canonical("Colour/Grey/50"),
            Token::concrete(TokenValue::Color(Color::WHITE)),
        );
        assert!(find(&doc, &["Colour", "Grey", "50"]).is_some());
    }
}
