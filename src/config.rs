//! # Player Configuration
//!
//! Optional YAML file read by the command-line player. Every field has a default,
//! so an empty document is a valid configuration.
//!
//! ```yaml
//! bpm: 96
//! tuning: 3                 # preset number or name, or a map:
//! # tuning: { 1D: F3, 1G: G3 }
//! samples_dir: ./samples
//! scheduler:
//!   lookahead_ms: 25
//!   horizon_ms: 100
//!   tail_secs: 2.0
//!   start_delay_secs: 0.1
//!   frame_rate: 60
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::TabError;
use crate::tuning::{preset, Tuning};

/// Timing constants of the playback loop.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Dispatcher poll interval.
    pub lookahead_ms: f64,
    /// How far ahead of the audio clock events are handed to the backend.
    pub horizon_ms: f64,
    /// Wait after the last event before stopping on its own.
    pub tail_secs: f64,
    /// Gap between `play()` and tick 0.
    pub start_delay_secs: f64,
    /// Position reports per second.
    pub frame_rate: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            lookahead_ms: 25.0,
            horizon_ms: 100.0,
            tail_secs: 2.0,
            start_delay_secs: 0.1,
            frame_rate: 60.0,
        }
    }
}

impl SchedulerConfig {
    pub fn lookahead_secs(&self) -> f64 {
        self.lookahead_ms / 1000.0
    }

    pub fn horizon_secs(&self) -> f64 {
        self.horizon_ms / 1000.0
    }

    pub fn frame_secs(&self) -> f64 {
        1.0 / self.frame_rate
    }

    /// Every value finite; poll interval, tail and frame rate positive;
    /// horizon and start delay not negative.
    pub fn validate(&self) -> Result<(), TabError> {
        let checks = [
            ("lookahead_ms", self.lookahead_ms, false),
            ("horizon_ms", self.horizon_ms, true),
            ("tail_secs", self.tail_secs, false),
            ("start_delay_secs", self.start_delay_secs, true),
            ("frame_rate", self.frame_rate, false),
        ];
        for (name, value, zero_ok) in checks {
            let in_range = if zero_ok { value >= 0.0 } else { value > 0.0 };
            if !value.is_finite() || !in_range {
                let bound = if zero_ok { ">= 0" } else { "> 0" };
                return Err(TabError::InvalidSchedulerConfig(format!(
                    "{} must be finite and {} (got {})",
                    name, bound, value
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TuningSetting {
    /// 1-based preset number written as a bare YAML integer.
    Index(usize),
    Preset(String),
    Map(BTreeMap<String, String>),
}

impl TuningSetting {
    pub fn resolve(&self) -> Result<Tuning, TabError> {
        match self {
            TuningSetting::Index(n) => Ok(preset(&n.to_string())?.tuning),
            TuningSetting::Preset(key) => Ok(preset(key)?.tuning),
            TuningSetting::Map(map) => Ok(Tuning::from(map.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub bpm: f64,
    pub tuning: Option<TuningSetting>,
    pub samples_dir: Option<PathBuf>,
    pub scheduler: SchedulerConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            tuning: None,
            samples_dir: None,
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl PlayerConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self, TabError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(source)?;
        config.scheduler.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TabError> {
        let source = fs::read_to_string(path)?;
        Self::from_yaml_str(&source)
    }

    /// The configured tuning, or the base tuning when none is set.
    pub fn resolve_tuning(&self) -> Result<Tuning, TabError> {
        match &self.tuning {
            Some(setting) => setting.resolve(),
            None => Ok(Tuning::base()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = PlayerConfig::from_yaml_str("").unwrap();
        assert_eq!(config, PlayerConfig::default());
        assert_eq!(config.resolve_tuning().unwrap(), Tuning::base());
    }

    #[test]
    fn test_partial_scheduler_block() {
        let config = PlayerConfig::from_yaml_str("bpm: 90\nscheduler:\n  tail_secs: 0.5\n").unwrap();
        assert_eq!(config.bpm, 90.0);
        assert_eq!(config.scheduler.tail_secs, 0.5);
        assert_eq!(config.scheduler.lookahead_ms, 25.0);
        assert_eq!(config.scheduler.horizon_secs(), 0.1);
    }

    #[test]
    fn test_tuning_preset_and_map() {
        let config = PlayerConfig::from_yaml_str("tuning: \"4\"").unwrap();
        assert_eq!(config.resolve_tuning().unwrap().pitch_for("1D"), Some("F3"));

        let config = PlayerConfig::from_yaml_str("tuning:\n  1d: C3\n  6G: C6\n").unwrap();
        let tuning = config.resolve_tuning().unwrap();
        assert_eq!(tuning.pitch_for("1D"), Some("C3"));
        assert_eq!(tuning.pitch_for("6G"), Some("C6"));
        assert_eq!(tuning.len(), 2);
    }

    #[test]
    fn test_bare_integer_tuning_is_preset_number() {
        let config = PlayerConfig::from_yaml_str("tuning: 3").unwrap();
        assert_eq!(config.tuning, Some(TuningSetting::Index(3)));
        assert_eq!(config.resolve_tuning().unwrap(), preset("3").unwrap().tuning);

        let config = PlayerConfig::from_yaml_str("tuning: 42").unwrap();
        assert!(matches!(config.resolve_tuning(), Err(TabError::UnknownTuning(_))));
    }

    #[test]
    fn test_default_scheduler_settings_are_valid() {
        assert!(SchedulerConfig::default().validate().is_ok());
        let no_delay = SchedulerConfig {
            start_delay_secs: 0.0,
            horizon_ms: 0.0,
            ..SchedulerConfig::default()
        };
        assert!(no_delay.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_scheduler_settings_rejected() {
        let bad = [
            SchedulerConfig { lookahead_ms: 0.0, ..SchedulerConfig::default() },
            SchedulerConfig { frame_rate: 0.0, ..SchedulerConfig::default() },
            SchedulerConfig { horizon_ms: -50.0, ..SchedulerConfig::default() },
            SchedulerConfig { tail_secs: f64::NAN, ..SchedulerConfig::default() },
            SchedulerConfig { start_delay_secs: f64::INFINITY, ..SchedulerConfig::default() },
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(TabError::InvalidSchedulerConfig(_))),
                "{:?}",
                config
            );
        }
    }

    #[test]
    fn test_yaml_with_zero_poll_interval_rejected() {
        let result = PlayerConfig::from_yaml_str(
            "scheduler:\n  lookahead_ms: 0\n  frame_rate: 0\n  horizon_ms: -50\n",
        );
        assert!(matches!(result, Err(TabError::InvalidSchedulerConfig(_))));
    }

    #[test]
    fn test_unknown_preset() {
        let config = PlayerConfig::from_yaml_str("tuning: nowhere").unwrap();
        assert!(matches!(config.resolve_tuning(), Err(TabError::UnknownTuning(_))));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = PlayerConfig::from_yaml_str("bpm: [fast");
        assert!(matches!(result, Err(TabError::Config(_))));
    }
}
