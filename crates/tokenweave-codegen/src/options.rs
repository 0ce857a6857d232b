//! Generation options.

use crate::model::GenerationMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokenweave_core::Platform;

/// Default best-practices Kotlin package.
pub const DEFAULT_KOTLIN_PACKAGE: &str = "com.example.app.ui.theme";

/// Unitless motion durations below this many units are read as seconds.
pub const DEFAULT_MOTION_SECONDS_THRESHOLD: f64 = 10.0;

/// Knobs for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    pub mode: GenerationMode,
    pub platforms: Vec<Platform>,
    pub motion_seconds_threshold: Option<f64>,
    pub disable_seconds_heuristic: bool,
    /// Run per-platform emitters on the rayon pool.
    pub parallel: bool,
    pub kotlin_package: Option<String>,
    /// Pinned generation time; `None` means now.
    #[serde(skip)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            mode: GenerationMode::BestPractices,
            platforms: Platform::ALL.to_vec(),
            motion_seconds_threshold: Some(DEFAULT_MOTION_SECONDS_THRESHOLD),
            disable_seconds_heuristic: false,
            parallel: false,
            kotlin_package: None,
            timestamp: None,
        }
    }
}

impl GenerationOptions {
    pub fn with_mode(mut self, mode: GenerationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_platforms(mut self, platforms: &[Platform]) -> Self {
        self.platforms = platforms.to_vec();
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Effective seconds threshold; `None` when the heuristic is off.
    pub fn seconds_threshold(&self) -> Option<f64> {
        if self.disable_seconds_heuristic {
            None
        } else {
            self.motion_seconds_threshold
        }
    }

    pub fn kotlin_package(&self) -> &str {
        self.kotlin_package.as_deref().unwrap_or(DEFAULT_KOTLIN_PACKAGE)
    }

    pub fn targets(&self, platform: Platform) -> bool {
        self.platforms.contains(&platform)
    }

    /// RFC 3339 timestamp stamped into file headers.
    pub fn timestamp_label(&self) -> String {
        self.timestamp
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = GenerationOptions::default();
        assert_eq!(options.mode, GenerationMode::BestPractices);
        assert_eq!(options.platforms.len(), 3);
        assert_eq!(options.seconds_threshold(), Some(10.0));
        assert_eq!(options.kotlin_package(), DEFAULT_KOTLIN_PACKAGE);
    }

    #[test]
    fn test_partial_json() {
        let options: GenerationOptions =
            serde_json::from_str(r#"{"mode": "match-existing", "platforms": ["ios"]}"#).unwrap();
        assert_eq!(options.mode, GenerationMode::MatchExisting);
        assert_eq!(options.platforms, vec![Platform::Ios]);
        assert!(!options.parallel);
        assert_eq!(options.motion_seconds_threshold, Some(10.0));
    }

    #[test]
    fn test_disable_seconds_heuristic() {
        let options = GenerationOptions {
            disable_seconds_heuristic: true,
            ..GenerationOptions::default()
        };
        assert_eq!(options.seconds_threshold(), None);
    }

    #[test]
    fn test_pinned_timestamp() {
        let at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let options = GenerationOptions::default().with_timestamp(at);
        assert_eq!(options.timestamp_label(), "2024-05-01T12:00:00Z");
    }
}
