//! Data contracts exchanged with the caller.

use crate::error::{CodegenError, Result};
use crate::options::GenerationOptions;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tokenweave_core::{ArtifactCategory, Platform, SourceFormat, TokenDocument};
use tokenweave_diff::DiffRecord;
use tokenweave_resolver::ImpactReport;

/// Whether output follows fixed defaults or the conventions of supplied
/// reference files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMode {
    #[default]
    BestPractices,
    MatchExisting,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BestPractices => "best-practices",
            Self::MatchExisting => "match-existing",
        }
    }

    pub fn uses_best_practices(&self) -> bool {
        *self == Self::BestPractices
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Warning category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningKind {
    Cycle,
    Lint,
    Unused,
    Resolution,
}

/// A non-fatal finding surfaced with the generation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    #[serde(rename = "type")]
    pub kind: WarningKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl Warning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

/// A reference source file supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceFile {
    pub platform: Platform,
    #[serde(default)]
    pub category: Option<ArtifactCategory>,
    pub filename: String,
    pub content: String,
}

impl ReferenceFile {
    pub fn new(platform: Platform, filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            platform,
            category: None,
            filename: filename.into(),
            content: content.into(),
        }
    }

    /// Explicit category, else inferred from the filename.
    pub fn category(&self) -> ArtifactCategory {
        self.category
            .unwrap_or_else(|| ArtifactCategory::infer_from_filename(&self.filename))
    }

    pub fn format(&self) -> Result<SourceFormat> {
        SourceFormat::from_filename(&self.filename)
            .ok_or_else(|| CodegenError::UnknownReferenceFormat(self.filename.clone()))
    }
}

/// One generated source file.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedArtifact {
    pub filename: String,
    pub content: String,
    pub format: SourceFormat,
    pub platform: Platform,
    pub category: ArtifactCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_content: Option<String>,
    /// Qualified generated identifier -> token path.
    pub symbols: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

/// Everything a generation needs.
#[derive(Debug, Clone)]
pub struct GenerationInput {
    pub light: TokenDocument,
    pub dark: Option<TokenDocument>,
    pub values: Option<TokenDocument>,
    pub typography: Option<TokenDocument>,
    pub references: Vec<ReferenceFile>,
    pub options: GenerationOptions,
}

impl GenerationInput {
    pub fn new(light: TokenDocument) -> Self {
        Self {
            light,
            dark: None,
            values: None,
            typography: None,
            references: Vec::new(),
            options: GenerationOptions::default(),
        }
    }

    /// Parse every supplied document; any malformed one fails the request.
    pub fn from_json(
        light: &str,
        dark: Option<&str>,
        values: Option<&str>,
        typography: Option<&str>,
    ) -> Result<Self> {
        let mut input = Self::new(TokenDocument::from_json_str("light", light)?);
        input.dark = dark
            .map(|text| TokenDocument::from_json_str("dark", text))
            .transpose()?;
        input.values = values
            .map(|text| TokenDocument::from_json_str("values", text))
            .transpose()?;
        input.typography = typography
            .map(|text| TokenDocument::from_json_str("typography", text))
            .transpose()?;
        Ok(input)
    }

    pub fn with_dark(mut self, dark: TokenDocument) -> Self {
        self.dark = Some(dark);
        self
    }

    pub fn with_values(mut self, values: TokenDocument) -> Self {
        self.values = Some(values);
        self
    }

    pub fn with_typography(mut self, typography: TokenDocument) -> Self {
        self.typography = Some(typography);
        self
    }

    pub fn with_reference(mut self, reference: ReferenceFile) -> Self {
        self.references.push(reference);
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// All supplied documents, light first.
    pub fn documents(&self) -> Vec<&TokenDocument> {
        std::iter::once(&self.light)
            .chain(self.dark.as_ref())
            .chain(self.values.as_ref())
            .chain(self.typography.as_ref())
            .collect()
    }
}

/// Counts reported alongside the artifacts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationSummary {
    pub mode: GenerationMode,
    /// Token kind -> count across every input document.
    pub tokens: BTreeMap<String, usize>,
    /// Platform -> number of artifacts.
    pub artifacts: BTreeMap<String, usize>,
    pub warnings: usize,
}

/// Output of one generation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationResult {
    pub artifacts: Vec<GeneratedArtifact>,
    pub diffs: Vec<DiffRecord>,
    pub impact: ImpactReport,
    pub summary: GenerationSummary,
    pub warnings: Vec<Warning>,
}

impl GenerationResult {
    pub fn artifact(&self, filename: &str) -> Option<&GeneratedArtifact> {
        self.artifacts.iter().find(|a| a.filename == filename)
    }

    pub fn artifacts_for(&self, platform: Platform) -> impl Iterator<Item = &GeneratedArtifact> {
        self.artifacts.iter().filter(move |a| a.platform == platform)
    }

    pub fn diff_for(&self, filename: &str) -> Option<&DiffRecord> {
        self.diffs.iter().find(|d| d.filename == filename)
    }
}
