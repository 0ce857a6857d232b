//! `tokenweave.toml` loading and flag overrides.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tokenweave_codegen::{GenerationMode, GenerationOptions};
use tokenweave_core::Platform;

/// Options given on the command line. `None` leaves the file's value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub mode: Option<GenerationMode>,
    pub platforms: Vec<Platform>,
    pub motion_seconds_threshold: Option<f64>,
    pub disable_seconds_heuristic: bool,
    pub parallel: bool,
    pub kotlin_package: Option<String>,
}

/// Parse a TOML config. Missing keys keep their defaults.
pub fn parse(text: &str) -> Result<GenerationOptions> {
    let options: GenerationOptions = toml::from_str(text)?;
    Ok(options)
}

/// Options from `path` when given, else defaults.
pub fn load(path: Option<&Path>) -> Result<GenerationOptions> {
    let Some(path) = path else {
        return Ok(GenerationOptions::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    let options = parse(&text).with_context(|| format!("parsing config {}", path.display()))?;
    tracing::debug!(config = %path.display(), mode = %options.mode, "loaded config");
    Ok(options)
}

/// Apply flags on top of file options.
pub fn apply(mut options: GenerationOptions, overrides: Overrides) -> GenerationOptions {
    if let Some(mode) = overrides.mode {
        options.mode = mode;
    }
    if !overrides.platforms.is_empty() {
        options.platforms = overrides.platforms;
    }
    if let Some(threshold) = overrides.motion_seconds_threshold {
        options.motion_seconds_threshold = Some(threshold);
    }
    if overrides.disable_seconds_heuristic {
        options.disable_seconds_heuristic = true;
    }
    if overrides.parallel {
        options.parallel = true;
    }
    if let Some(package) = overrides.kotlin_package {
        options.kotlin_package = Some(package);
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let options = parse("mode = \"match-existing\"\nplatforms = [\"web\", \"android\"]\nparallel = true\n").unwrap();
        assert_eq!(options.mode, GenerationMode::MatchExisting);
        assert_eq!(options.platforms, vec![Platform::Web, Platform::Android]);
        assert!(options.parallel);
        assert_eq!(options.seconds_threshold(), Some(10.0));
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse("").unwrap(), GenerationOptions::default());
    }

    #[test]
    fn test_bad_config() {
        assert!(parse("mode = \"sometimes\"").is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let file = parse("mode = \"match-existing\"\nkotlin_package = \"com.brand\"\n").unwrap();
        let options = apply(
            file,
            Overrides {
                mode: Some(GenerationMode::BestPractices),
                platforms: vec![Platform::Ios],
                disable_seconds_heuristic: true,
                ..Overrides::default()
            },
        );
        assert_eq!(options.mode, GenerationMode::BestPractices);
        assert_eq!(options.platforms, vec![Platform::Ios]);
        assert_eq!(options.kotlin_package(), "com.brand");
        assert_eq!(options.seconds_threshold(), None);
    }
}
