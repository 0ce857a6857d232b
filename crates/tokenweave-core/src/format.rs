//! Target platforms, source formats and artifact categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A generation target platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Web,
    Ios,
    Android,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Web, Platform::Ios, Platform::Android];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Ios => "ios",
            Self::Android => "android",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "web" => Ok(Self::Web),
            "ios" | "swift" => Ok(Self::Ios),
            "android" | "kotlin" => Ok(Self::Android),
            other => Err(format!("unknown platform '{}'", other)),
        }
    }
}

/// The language of a generated or reference source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Scss,
    Css,
    #[serde(rename = "typescript")]
    TypeScript,
    Swift,
    Kotlin,
}

impl SourceFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Scss => "scss",
            Self::Css => "css",
            Self::TypeScript => "ts",
            Self::Swift => "swift",
            Self::Kotlin => "kt",
        }
    }

    /// Infer the format from a file name's extension.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = filename.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "scss" | "sass" => Some(Self::Scss),
            "css" => Some(Self::Css),
            "ts" | "tsx" | "js" | "mjs" => Some(Self::TypeScript),
            "swift" => Some(Self::Swift),
            "kt" | "kts" => Some(Self::Kotlin),
            _ => None,
        }
    }

    pub fn platform(&self) -> Platform {
        match self {
            Self::Scss | Self::Css | Self::TypeScript => Platform::Web,
            Self::Swift => Platform::Ios,
            Self::Kotlin => Platform::Android,
        }
    }

    /// Opening and closing markers of a single-line comment.
    pub fn comment_markers(&self) -> (&'static str, &'static str) {
        match self {
            Self::Css => ("/*", " */"),
            _ => ("//", ""),
        }
    }

    /// Wrap text in a single-line comment.
    pub fn comment(&self, text: &str) -> String {
        let (open, close) = self.comment_markers();
        format!("{} {}{}", open, text, close)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scss => "scss",
            Self::Css => "css",
            Self::TypeScript => "typescript",
            Self::Swift => "swift",
            Self::Kotlin => "kotlin",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scss" | "sass" => Ok(Self::Scss),
            "css" => Ok(Self::Css),
            "ts" | "typescript" => Ok(Self::TypeScript),
            "swift" => Ok(Self::Swift),
            "kt" | "kotlin" => Ok(Self::Kotlin),
            other => Err(format!("unknown source format '{}'", other)),
        }
    }
}

/// The token category an artifact covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactCategory {
    Colors,
    Spacing,
    Typography,
    Shadow,
    Border,
    Motion,
    Radius,
    Opacity,
}

impl ArtifactCategory {
    /// Categories produced by the keyword-matched composite emitters.
    pub const COMPOSITES: [ArtifactCategory; 5] = [
        ArtifactCategory::Shadow,
        ArtifactCategory::Motion,
        ArtifactCategory::Radius,
        ArtifactCategory::Opacity,
        ArtifactCategory::Border,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Colors => "colors",
            Self::Spacing => "spacing",
            Self::Typography => "typography",
            Self::Shadow => "shadow",
            Self::Border => "border",
            Self::Motion => "motion",
            Self::Radius => "radius",
            Self::Opacity => "opacity",
        }
    }

    /// Title-cased label used in container and file names.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Colors => "Colors",
            Self::Spacing => "Spacing",
            Self::Typography => "Typography",
            Self::Shadow => "Shadows",
            Self::Border => "Borders",
            Self::Motion => "Motion",
            Self::Radius => "Radius",
            Self::Opacity => "Opacity",
        }
    }

    /// Guess the category of a reference file from its name.
    pub fn infer_from_filename(filename: &str) -> Self {
        let name = filename.to_ascii_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| name.contains(w));
        if has(&["typo", "font", "text-style", "textstyle"]) {
            Self::Typography
        } else if has(&["spacing", "dimen", "space", "sizing"]) {
            Self::Spacing
        } else if has(&["shadow", "elevation"]) {
            Self::Shadow
        } else if has(&["motion", "anim", "duration", "easing"]) {
            Self::Motion
        } else if has(&["radius", "radii", "corner"]) {
            Self::Radius
        } else if has(&["opacity", "alpha"]) {
            Self::Opacity
        } else if has(&["border", "stroke"]) {
            Self::Border
        } else {
            Self::Colors
        }
    }
}

impl fmt::Display for ArtifactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "colors" | "color" | "colours" | "colour" => Ok(Self::Colors),
            "spacing" | "dimensions" | "values" => Ok(Self::Spacing),
            "typography" | "type" | "fonts" => Ok(Self::Typography),
            "shadow" | "shadows" => Ok(Self::Shadow),
            "border" | "borders" => Ok(Self::Border),
            "motion" | "animation" => Ok(Self::Motion),
            "radius" | "radii" => Ok(Self::Radius),
            "opacity" => Ok(Self::Opacity),
            other => Err(format!("unknown artifact category '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_filename() {
        assert_eq!(SourceFormat::from_filename("Colors.swift"), Some(SourceFormat::Swift));
        assert_eq!(SourceFormat::from_filename("_tokens.scss"), Some(SourceFormat::Scss));
        assert_eq!(SourceFormat::from_filename("Theme.kt"), Some(SourceFormat::Kotlin));
        assert_eq!(SourceFormat::from_filename("README"), None);
    }

    #[test]
    fn test_category_inference() {
        assert_eq!(
            ArtifactCategory::infer_from_filename("AppTypography.swift"),
            ArtifactCategory::Typography
        );
        assert_eq!(
            ArtifactCategory::infer_from_filename("BrandColors.kt"),
            ArtifactCategory::Colors
        );
        assert_eq!(
            ArtifactCategory::infer_from_filename("elevation.css"),
            ArtifactCategory::Shadow
        );
    }

    #[test]
    fn test_comment_style() {
        assert_eq!(SourceFormat::Css.comment("NEW"), "/* NEW */");
        assert_eq!(SourceFormat::Swift.comment("NEW"), "// NEW");
    }
}
