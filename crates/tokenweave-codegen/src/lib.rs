//! Convention-adaptive code generation from design tokens.
//!
//! This crate turns resolved token documents into source files for the
//! web (CSS, SCSS, TypeScript), iOS (SwiftUI/UIKit) and Android (Jetpack
//! Compose), either following fixed best practices or imitating reference
//! files the caller already has.
//!
//! # Example
//!
//! ```ignore
//! use tokenweave_codegen::{generate, GenerationInput};
//!
//! let input = GenerationInput::from_json(light_json, Some(dark_json), None, None)?;
//! let result = generate(&input)?;
//! for artifact in &result.artifacts {
//!     println!("{}", artifact.filename);
//! }
//! ```

pub mod conventions;
pub mod error;
mod generate;
pub mod generators;
pub mod model;
pub mod options;

pub use conventions::{detector_for, lint_reference, ConventionDetector, ConventionProfile};
pub use error::{CodegenError, Result};
pub use generate::generate;
pub use generators::{policy_for, EmitterPolicy, FileHeader, Palette, PaletteSlice, SourceWriter, TemplateEngine};
pub use model::{
    GeneratedArtifact, GenerationInput, GenerationMode, GenerationResult, GenerationSummary, ReferenceFile, Warning,
    WarningKind,
};
pub use options::{GenerationOptions, DEFAULT_KOTLIN_PACKAGE, DEFAULT_MOTION_SECONDS_THRESHOLD};
