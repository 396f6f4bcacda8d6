//! TOML-based application configuration.
//!
//! Stores:
//! - Transition timing and arm motion
//! - Activity log capacity
//! - Operator label written to log entries
//! - Seed values for the statistics card
//!
//! Configuration is stored at `~/.config/barrier-control/config.toml`.
//! Only settings live here; barrier state is never persisted.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::activity::DEFAULT_LOG_CAPACITY;
use crate::barrier::ControllerSettings;
use crate::error::{ConfigError, Result};
use crate::motion::MotionStrategy;

const MAX_TRANSITION_MS: u64 = 10 * 60 * 1000;

/// Transition timing and arm motion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionConfig {
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    #[serde(default)]
    pub strategy: MotionStrategy,
    #[serde(default)]
    pub closed_angle: f64,
    #[serde(default = "default_open_angle")]
    pub open_angle: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_capacity")]
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorConfig {
    #[serde(default = "default_operator")]
    pub name: String,
}

/// Starting values for the statistics card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedConfig {
    #[serde(default = "default_operation_count")]
    pub operation_count: u64,
    #[serde(default = "default_battery_level")]
    pub battery_level: u8,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/barrier-control/config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub transition: TransitionConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub operator: OperatorConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

// Default functions
fn default_duration_ms() -> u64 {
    2000
}
fn default_open_angle() -> f64 {
    -90.0
}
fn default_log_capacity() -> usize {
    DEFAULT_LOG_CAPACITY
}
fn default_operator() -> String {
    "Operator".into()
}
fn default_operation_count() -> u64 {
    47
}
fn default_battery_level() -> u8 {
    87
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            strategy: MotionStrategy::default(),
            closed_angle: 0.0,
            open_angle: default_open_angle(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            capacity: default_log_capacity(),
        }
    }
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            name: default_operator(),
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            operation_count: default_operation_count(),
            battery_level: default_battery_level(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent_path) = parent_path {
            for part in parent_path.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => {
                if let Ok(n) = value.parse::<u64>() {
                    serde_json::Value::Number(n.into())
                } else if let Ok(n) = value.parse::<f64>() {
                    serde_json::Number::from_f64(n)
                        .map(serde_json::Value::Number)
                        .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                } else {
                    return Err(invalid(format!("cannot parse '{value}' as number")));
                }
            }
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| {
                        ConfigError::ParseFailed(format!("{}: {e}", path.display()))
                    })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => toml::to_string_pretty(val).ok(),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not save.
    ///
    /// The new value is parsed against the type of the existing one and the
    /// whole config is validated before it is applied.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transition.duration_ms == 0 || self.transition.duration_ms > MAX_TRANSITION_MS {
            return Err(ConfigError::InvalidValue {
                key: "transition.duration_ms".into(),
                message: format!("must be between 1 and {MAX_TRANSITION_MS}"),
            });
        }
        if !self.transition.open_angle.is_finite() || !self.transition.closed_angle.is_finite() {
            return Err(ConfigError::InvalidValue {
                key: "transition".into(),
                message: "angles must be finite".into(),
            });
        }
        if self.log.capacity == 0 || self.log.capacity > DEFAULT_LOG_CAPACITY {
            return Err(ConfigError::InvalidValue {
                key: "log.capacity".into(),
                message: format!("must be between 1 and {DEFAULT_LOG_CAPACITY}"),
            });
        }
        if self.seed.battery_level > 100 {
            return Err(ConfigError::InvalidValue {
                key: "seed.battery_level".into(),
                message: "must be a percentage (0-100)".into(),
            });
        }
        if self.operator.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "operator.name".into(),
                message: "must not be empty".into(),
            });
        }
        Ok(())
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            transition_ms: self.transition.duration_ms,
            strategy: self.transition.strategy,
            closed_angle: self.transition.closed_angle,
            open_angle: self.transition.open_angle,
            log_capacity: self.log.capacity,
            operator: self.operator.name.clone(),
            initial_operation_count: self.seed.operation_count,
            battery_level: self.seed.battery_level,
        }
    }
}
