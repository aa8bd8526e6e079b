//! Runner settings loaded from an optional TOML file.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Settings controlling the headless match loop.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RunnerConfig {
    /// Fixed simulation rate in ticks per second.
    pub(crate) tick_hz: u32,
    /// Tick budget before the match is called off.
    pub(crate) max_ticks: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            max_ticks: 100_000,
        }
    }
}

impl RunnerConfig {
    /// Loads and validates settings from the provided TOML file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read runner config {}", path.display()))?;
        let config: Self =
            toml::from_str(&contents).context("failed to parse runner config toml contents")?;
        config.validate()
    }

    fn validate(self) -> Result<Self> {
        if self.tick_hz == 0 {
            bail!("tick_hz must be greater than zero");
        }
        if self.max_ticks == 0 {
            bail!("max_ticks must be greater than zero");
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: RunnerConfig = toml::from_str("").expect("parse");
        assert_eq!(config, RunnerConfig::default());
    }

    #[test]
    fn explicit_fields_override_defaults() {
        let config: RunnerConfig =
            toml::from_str("tick_hz = 30\nmax_ticks = 500").expect("parse");
        assert_eq!(config.tick_hz, 30);
        assert_eq!(config.max_ticks, 500);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<RunnerConfig, _> = toml::from_str("frame_rate = 50");
        assert!(result.is_err());
    }

    #[test]
    fn zero_tick_rate_fails_validation() {
        let config: RunnerConfig = toml::from_str("tick_hz = 0").expect("parse");
        assert!(config.validate().is_err());
    }
}
