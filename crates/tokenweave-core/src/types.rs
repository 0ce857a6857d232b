//! Value types carried by tokens.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create from unit floats (0.0..=1.0), as Figma exports them.
    ///
    /// Values above 1.0 are taken as 0..=255 channels.
    pub fn from_unit_floats(r: f64, g: f64, b: f64, a: f64) -> Self {
        let scale = if r > 1.0 || g > 1.0 || b > 1.0 { 1.0 } else { 255.0 };
        let channel = |v: f64, s: f64| (v * s).round().clamp(0.0, 255.0) as u8;
        Self {
            r: channel(r, scale),
            g: channel(g, scale),
            b: channel(b, scale),
            a: channel(a.min(1.0), 255.0),
        }
    }

    /// Parse a hex string (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`; `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let pair = |s: &str| u8::from_str_radix(s, 16).ok();
        let nibble = |c: char| {
            let v = c.to_digit(16)? as u8;
            Some(v * 16 + v)
        };
        match hex.len() {
            3 | 4 => {
                let mut chars = hex.chars();
                let r = nibble(chars.next()?)?;
                let g = nibble(chars.next()?)?;
                let b = nibble(chars.next()?)?;
                let a = match chars.next() {
                    Some(c) => nibble(c)?,
                    None => 255,
                };
                Some(Self::rgba(r, g, b, a))
            }
            6 => Some(Self::rgb(pair(&hex[0..2])?, pair(&hex[2..4])?, pair(&hex[4..6])?)),
            8 => Some(Self::rgba(
                pair(&hex[0..2])?,
                pair(&hex[2..4])?,
                pair(&hex[4..6])?,
                pair(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Parse `rgb(…)` / `rgba(…)` functional notation.
    pub fn from_css_function(text: &str) -> Option<Self> {
        let text = text.trim();
        let inner = text
            .strip_prefix("rgba(")
            .or_else(|| text.strip_prefix("rgb("))?
            .strip_suffix(')')?;
        let parts: Vec<f64> = inner
            .split(|c: char| c == ',' || c == '/' || c == ' ')
            .filter(|p| !p.is_empty())
            .map(|p| {
                p.trim_end_matches('%')
                    .parse::<f64>()
                    .map(|v| if p.ends_with('%') { v / 100.0 } else { v })
            })
            .collect::<Result<_, _>>()
            .ok()?;
        match parts.as_slice() {
            [r, g, b] => Some(Self::from_unit_floats(r / 255.0, g / 255.0, b / 255.0, 1.0)),
            [r, g, b, a] => Some(Self::from_unit_floats(r / 255.0, g / 255.0, b / 255.0, *a)),
            _ => None,
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Alpha as a unit float.
    pub fn alpha(&self) -> f64 {
        self.a as f64 / 255.0
    }

    /// Channels as unit floats.
    pub fn unit_rgb(&self) -> (f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        )
    }

    /// Lowercase CSS hex (`#1d1d1d`, or `#1d1d1d99` when translucent).
    pub fn to_hex(&self) -> String {
        if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Uppercase ARGB hex without prefix (`FF1D1D1D`), the Compose literal order.
    pub fn to_argb_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A number with an optional unit (`16`, `16px`, `200ms`, `150%`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub value: f64,
    pub unit: Option<String>,
}

impl Dimension {
    pub fn unitless(value: f64) -> Self {
        Self { value, unit: None }
    }

    pub fn with_unit(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: Some(unit.into()),
        }
    }

    /// Parse a numeric string with an optional alphabetic or `%` suffix.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let split = text
            .char_indices()
            .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || ((*c == '-' || *c == '+') && *i == 0)))
            .map(|(i, _)| i)
            .unwrap_or(text.len());
        let (number, unit) = text.split_at(split);
        let value = number.parse::<f64>().ok()?;
        let unit = unit.trim();
        if unit.is_empty() {
            Some(Self::unitless(value))
        } else if unit == "%" || unit.chars().all(|c| c.is_ascii_alphabetic()) {
            Some(Self::with_unit(value, unit.to_ascii_lowercase()))
        } else {
            None
        }
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", format_number(self.value), self.unit().unwrap_or(""))
    }
}

/// Format a float without trailing zeros (`16`, `0.5`, `1.25`).
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let text = format!("{:.4}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    Thin,
    ExtraLight,
    Light,
    Regular,
    Medium,
    SemiBold,
    Bold,
    ExtraBold,
    Black,
}

impl FontWeight {
    /// Nearest weight for a numeric value (100..=900).
    pub fn from_numeric(value: f64) -> Self {
        match ((value / 100.0).round() as i64).clamp(1, 9) {
            1 => Self::Thin,
            2 => Self::ExtraLight,
            3 => Self::Light,
            4 => Self::Regular,
            5 => Self::Medium,
            6 => Self::SemiBold,
            7 => Self::Bold,
            8 => Self::ExtraBold,
            _ => Self::Black,
        }
    }

    /// Parse a style name such as `Semi Bold`, `semibold` or `Heavy`.
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        if let Ok(n) = key.parse::<f64>() {
            return Some(Self::from_numeric(n));
        }
        let weight = match key.as_str() {
            "thin" | "hairline" => Self::Thin,
            "extralight" | "ultralight" => Self::ExtraLight,
            "light" => Self::Light,
            "regular" | "normal" | "book" => Self::Regular,
            "medium" => Self::Medium,
            "semibold" | "demibold" => Self::SemiBold,
            "bold" => Self::Bold,
            "extrabold" | "ultrabold" | "heavy" => Self::ExtraBold,
            "black" => Self::Black,
            _ => return None,
        };
        Some(weight)
    }

    /// Convert to numeric weight.
    pub fn to_numeric(&self) -> u16 {
        match self {
            Self::Thin => 100,
            Self::ExtraLight => 200,
            Self::Light => 300,
            Self::Regular => 400,
            Self::Medium => 500,
            Self::SemiBold => 600,
            Self::Bold => 700,
            Self::ExtraBold => 800,
            Self::Black => 900,
        }
    }

    /// Convert to Swift font weight.
    pub fn to_swift(&self) -> &'static str {
        match self {
            Self::Thin => ".thin",
            Self::ExtraLight => ".ultraLight",
            Self::Light => ".light",
            Self::Regular => ".regular",
            Self::Medium => ".medium",
            Self::SemiBold => ".semibold",
            Self::Bold => ".bold",
            Self::ExtraBold => ".heavy",
            Self::Black => ".black",
        }
    }

    /// Convert to a Compose `FontWeight` member.
    pub fn to_kotlin(&self) -> &'static str {
        match self {
            Self::Thin => "Thin",
            Self::ExtraLight => "ExtraLight",
            Self::Light => "Light",
            Self::Regular => "Normal",
            Self::Medium => "Medium",
            Self::SemiBold => "SemiBold",
            Self::Bold => "Bold",
            Self::ExtraBold => "ExtraBold",
            Self::Black => "Black",
        }
    }
}

/// A typography token value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypographyValue {
    pub font_family: Option<String>,
    /// Font size in points/pixels.
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub line_height: Option<Dimension>,
    pub letter_spacing: Option<Dimension>,
    pub text_case: Option<String>,
}

impl TypographyValue {
    /// Line height in pixels.
    ///
    /// `%` is relative to the font size; a unitless value below 4 is a
    /// multiplier; anything else is already pixels.
    pub fn line_height_px(&self) -> Option<f64> {
        let lh = self.line_height.as_ref()?;
        let px = match lh.unit() {
            Some("%") => self.font_size * lh.value / 100.0,
            Some("em") | Some("rem") => self.font_size * lh.value,
            None if lh.value < 4.0 => self.font_size * lh.value,
            _ => lh.value,
        };
        Some(round_to(px, 2))
    }

    /// Letter spacing in pixels (`%` and `em` are relative to the font size).
    pub fn letter_spacing_px(&self) -> Option<f64> {
        let ls = self.letter_spacing.as_ref()?;
        let px = match ls.unit() {
            Some("%") => self.font_size * ls.value / 100.0,
            Some("em") | Some("rem") => self.font_size * ls.value,
            _ => ls.value,
        };
        Some(round_to(px, 3))
    }
}

/// One layer of a shadow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowLayer {
    pub color: Color,
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub spread: f64,
    pub inset: bool,
}

impl ShadowLayer {
    /// Create a new drop shadow.
    pub fn drop(offset_x: f64, offset_y: f64, blur: f64, color: Color) -> Self {
        Self {
            color,
            offset_x,
            offset_y,
            blur,
            spread: 0.0,
            inset: false,
        }
    }

    /// Set the spread radius.
    pub fn with_spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self
    }
}

/// A border token value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderValue {
    pub color: Option<Color>,
    pub width: f64,
    pub style: String,
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
