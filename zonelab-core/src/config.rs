//! Run configuration — one immutable value set per run.
//!
//! Every field has a fixed default; TOML files and struct-update syntax may
//! override any subset. `EngineConfig` is tagged by `engine` and selects which
//! state machine runs.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fingerprint::ConfigHash;
use crate::levels::pips_to_price;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be finite (got {value})")]
    NonFinite { field: &'static str, value: f64 },
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },
    #[error("parse config: {0}")]
    Parse(String),
    #[error("read config: {0}")]
    Io(String),
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field, value });
    }
    if value <= 0.0 {
        return Err(ConfigError::NonPositive { field, value });
    }
    Ok(())
}

fn require_distance(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field, value });
    }
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

fn require_count(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::ZeroCount { field });
    }
    Ok(())
}

/// Level-ladder / entry-zone engine settings. Distances are in pips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LadderConfig {
    /// Price value of one pip.
    pub pip_size: f64,
    /// Spacing between ladder levels.
    pub level_pips: f64,
    /// Levels generated on each side of the anchor.
    pub n_levels: usize,
    /// Half-width of the entry zone around the active level.
    pub entry_zone_pips: f64,
    /// Bars an entry zone lives before it expires.
    pub zone_no_bars: usize,
    /// true: entry needs a close beyond the zone edge. false: a touch is enough.
    pub close_beyond_entry_zone: bool,
    pub sl_pips: f64,
    pub tp1_pips: f64,
    pub tp2_pips: f64,
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            pip_size: 0.01,
            level_pips: 500.0,
            n_levels: 4,
            entry_zone_pips: 50.0,
            zone_no_bars: 40,
            close_beyond_entry_zone: true,
            sl_pips: 150.0,
            tp1_pips: 150.0,
            tp2_pips: 300.0,
        }
    }
}

impl LadderConfig {
    pub fn level_size(&self) -> f64 {
        pips_to_price(self.level_pips, self.pip_size)
    }

    pub fn entry_zone_half_width(&self) -> f64 {
        pips_to_price(self.entry_zone_pips, self.pip_size)
    }

    pub fn sl_distance(&self) -> f64 {
        pips_to_price(self.sl_pips, self.pip_size)
    }

    pub fn tp1_distance(&self) -> f64 {
        pips_to_price(self.tp1_pips, self.pip_size)
    }

    pub fn tp2_distance(&self) -> f64 {
        pips_to_price(self.tp2_pips, self.pip_size)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("pip_size", self.pip_size)?;
        require_positive("level_pips", self.level_pips)?;
        require_positive("level_size", self.level_size())?;
        require_count("n_levels", self.n_levels)?;
        require_positive("entry_zone_pips", self.entry_zone_pips)?;
        require_count("zone_no_bars", self.zone_no_bars)?;
        require_distance("sl_pips", self.sl_pips)?;
        require_distance("tp1_pips", self.tp1_pips)?;
        require_distance("tp2_pips", self.tp2_pips)?;
        Ok(())
    }
}

/// Psychological-level / box engine settings. Distances are in price units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxConfig {
    /// Spacing of the round-number levels.
    pub psych_step: f64,
    /// Half-height of the box around a psychological level.
    pub box_step: f64,
    pub sl_step: f64,
    pub tp1_step: f64,
    pub tp2_step: f64,
}

impl Default for BoxConfig {
    fn default() -> Self {
        Self {
            psych_step: 5.0,
            box_step: 0.5,
            sl_step: 1.5,
            tp1_step: 1.5,
            tp2_step: 3.0,
        }
    }
}

impl BoxConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("psych_step", self.psych_step)?;
        require_positive("box_step", self.box_step)?;
        require_distance("sl_step", self.sl_step)?;
        require_distance("tp1_step", self.tp1_step)?;
        require_distance("tp2_step", self.tp2_step)?;
        Ok(())
    }
}

/// Which engine runs, with its settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "engine", rename_all = "snake_case")]
pub enum EngineConfig {
    LevelLadder(LadderConfig),
    PsychBox(BoxConfig),
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::LevelLadder(LadderConfig::default())
    }
}

impl From<LadderConfig> for EngineConfig {
    fn from(config: LadderConfig) -> Self {
        Self::LevelLadder(config)
    }
}

impl From<BoxConfig> for EngineConfig {
    fn from(config: BoxConfig) -> Self {
        Self::PsychBox(config)
    }
}

impl EngineConfig {
    pub fn engine_name(&self) -> &'static str {
        match self {
            Self::LevelLadder(_) => "level_ladder",
            Self::PsychBox(_) => "psych_box",
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::LevelLadder(c) => c.validate(),
            Self::PsychBox(c) => c.validate(),
        }
    }

    /// Parse a TOML string. Missing fields take their defaults; the result is
    /// not validated.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Exact identity of the resolved settings.
    pub fn config_hash(&self) -> ConfigHash {
        let json = serde_json::to_vec(self).unwrap_or_default();
        ConfigHash::from_bytes(&json)
    }
}
