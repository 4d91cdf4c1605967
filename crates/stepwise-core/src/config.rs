//! Configuration loading and typed config structures.
//!
//! The configuration lives in `stepwise-config.yaml` at the project root.
//! Every field has a default, so an empty file (or no file at all) yields
//! a working configuration.

use std::path::Path;

use serde::Deserialize;

/// Speed multipliers offered to the presentation layer.
const SPEED_PRESETS: [f64; 6] = [0.25, 0.5, 1.0, 1.5, 2.0, 4.0];

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is outside its allowed range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StepwiseConfig {
    /// Playback engine settings.
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Which algorithm the player binary runs, and on what input.
    #[serde(default)]
    pub demo: DemoConfig,
}

impl StepwiseConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `STEPWISE_LOG_LEVEL` overrides `logging.level`
    /// - `STEPWISE_ALGORITHM` overrides `demo.algorithm`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Override selected values with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("STEPWISE_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("STEPWISE_ALGORITHM") {
            self.demo.algorithm = val;
        }
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.playback.validate()?;
        if let Some(speed) = self.demo.speed {
            if !is_valid_speed(speed) {
                return Err(ConfigError::Invalid {
                    reason: format!("demo.speed must be finite and positive, got {speed}"),
                });
            }
        }
        Ok(())
    }
}

/// Playback engine configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlaybackConfig {
    /// Display time for steps without a duration hint, in milliseconds.
    #[serde(default = "default_step_duration_ms")]
    pub default_step_duration_ms: u64,

    /// Speed multiplier a fresh engine starts with.
    #[serde(default = "default_initial_speed")]
    pub initial_speed: f64,

    /// Whether a fresh engine starts with looping enabled.
    #[serde(default)]
    pub loop_enabled: bool,

    /// Slowest speed offered by [`PlaybackConfig::speed_presets`].
    #[serde(default = "default_min_speed")]
    pub min_speed: f64,

    /// Fastest speed offered by [`PlaybackConfig::speed_presets`].
    #[serde(default = "default_max_speed")]
    pub max_speed: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_step_duration_ms: default_step_duration_ms(),
            initial_speed: default_initial_speed(),
            loop_enabled: false,
            min_speed: default_min_speed(),
            max_speed: default_max_speed(),
        }
    }
}

impl PlaybackConfig {
    /// Check that durations and speeds are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_step_duration_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "playback.default_step_duration_ms must be at least 1".to_owned(),
            });
        }
        for (name, value) in [
            ("initial_speed", self.initial_speed),
            ("min_speed", self.min_speed),
            ("max_speed", self.max_speed),
        ] {
            if !is_valid_speed(value) {
                return Err(ConfigError::Invalid {
                    reason: format!("playback.{name} must be finite and positive, got {value}"),
                });
            }
        }
        if self.min_speed > self.max_speed {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "playback.min_speed ({}) exceeds playback.max_speed ({})",
                    self.min_speed, self.max_speed
                ),
            });
        }
        Ok(())
    }

    /// Standard speed multipliers within `[min_speed, max_speed]`.
    pub fn speed_presets(&self) -> Vec<f64> {
        SPEED_PRESETS
            .iter()
            .copied()
            .filter(|s| *s >= self.min_speed && *s <= self.max_speed)
            .collect()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG`
    /// is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Player binary demo settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DemoConfig {
    /// Algorithm name, e.g. `bubble_sort`, `binary_search`, `fibonacci`.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Explicit input values. When absent, a random input is generated.
    #[serde(default)]
    pub input: Option<Vec<i64>>,

    /// Search target for `binary_search`.
    #[serde(default)]
    pub target: i64,

    /// Length of the generated input when `input` is absent.
    #[serde(default = "default_random_len")]
    pub random_len: usize,

    /// Seed for the generated input.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Speed override for the demo run.
    #[serde(default)]
    pub speed: Option<f64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            input: None,
            target: 0,
            random_len: default_random_len(),
            seed: default_seed(),
            speed: None,
        }
    }
}

/// Whether `speed` can be used as a playback multiplier.
pub fn is_valid_speed(speed: f64) -> bool {
    speed.is_finite() && speed > 0.0
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_step_duration_ms() -> u64 {
    1000
}

const fn default_initial_speed() -> f64 {
    1.0
}

const fn default_min_speed() -> f64 {
    0.25
}

const fn default_max_speed() -> f64 {
    4.0
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_algorithm() -> String {
    "bubble_sort".to_owned()
}

const fn default_random_len() -> usize {
    8
}

const fn default_seed() -> u64 {
    42
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_uses_defaults() {
        let config = StepwiseConfig::parse("{}").unwrap();
        assert_eq!(config.playback.default_step_duration_ms, 1000);
        assert!((config.playback.initial_speed - 1.0).abs() < f64::EPSILON);
        assert!(!config.playback.loop_enabled);
        assert_eq!(config.demo.random_len, 8);
        assert!(config.demo.input.is_none());
    }

    #[test]
    fn parses_all_sections() {
        let yaml = r"
playback:
  default_step_duration_ms: 400
  initial_speed: 2.0
  loop_enabled: true
logging:
  level: debug
demo:
  algorithm: binary_search
  input: [1, 3, 5, 7]
  target: 5
  speed: 1.5
";
        let config = StepwiseConfig::parse(yaml).unwrap();
        assert_eq!(config.playback.default_step_duration_ms, 400);
        assert!(config.playback.loop_enabled);
        assert_eq!(config.demo.input, Some(vec![1, 3, 5, 7]));
        assert_eq!(config.demo.target, 5);
    }

    #[test]
    fn rejects_zero_duration() {
        let result = StepwiseConfig::parse("playback:\n  default_step_duration_ms: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_non_positive_speed() {
        let result = StepwiseConfig::parse("playback:\n  initial_speed: 0.0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));

        let result = StepwiseConfig::parse("demo:\n  speed: -1.0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_inverted_speed_range() {
        let result = StepwiseConfig::parse("playback:\n  min_speed: 3.0\n  max_speed: 2.0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_malformed_yaml() {
        let result = StepwiseConfig::parse("playback: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn presets_respect_range() {
        let config = PlaybackConfig {
            min_speed: 0.5,
            max_speed: 2.0,
            ..PlaybackConfig::default()
        };
        assert_eq!(config.speed_presets().len(), 4);
        assert_eq!(PlaybackConfig::default().speed_presets().len(), 6);
    }

    #[test]
    fn speed_validity() {
        assert!(is_valid_speed(0.1));
        assert!(!is_valid_speed(0.0));
        assert!(!is_valid_speed(-2.0));
        assert!(!is_valid_speed(f64::NAN));
        assert!(!is_valid_speed(f64::INFINITY));
    }
}
