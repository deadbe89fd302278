use std::path::{Path, PathBuf};
use std::{env, fs, io};

use bevy_ecs::resource::Resource;
use bevy_ecs::schedule::ExecutorKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{LabelKey, TierLimits, UnlockGatedBonus};

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV_VAR: &str = "TROOP_ENGINE_CONFIG";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ExecutorChoice {
    #[default]
    SingleThreaded,
    MultiThreaded,
}

string_enum!(ExecutorChoice {
    SingleThreaded => "single_threaded",
    MultiThreaded => "multi_threaded",
});

impl From<ExecutorChoice> for ExecutorKind {
    fn from(choice: ExecutorChoice) -> Self {
        match choice {
            ExecutorChoice::SingleThreaded => ExecutorKind::SingleThreaded,
            ExecutorChoice::MultiThreaded => ExecutorKind::MultiThreaded,
        }
    }
}

/// Engine tuning knobs. Every field has a default so a partial file is valid.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Multiplier applied to `current * retinue_ratio`.
    pub bonus_factor: f64,
    /// Unlock that gates the bonus.
    pub bonus_unlock: String,
    pub bonus_label_key: String,
    pub bonus_label_fallback: String,
    /// Explicit tier limits; when absent they follow the compatibility probe.
    pub tier_limits: Option<TierLimits>,
    /// Root tiers used when a structural override is active.
    pub override_basic_root_tier: u8,
    pub override_elite_root_tier: u8,
    pub executor: ExecutorChoice,
    /// Sync records kept before the oldest are dropped.
    pub sync_log_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bonus_factor: 0.2,
            bonus_unlock: "retinue_morale".to_string(),
            bonus_label_key: "retinue_morale_bonus".to_string(),
            bonus_label_fallback: "Retinue".to_string(),
            tier_limits: None,
            override_basic_root_tier: 1,
            override_elite_root_tier: 2,
            executor: ExecutorChoice::default(),
            sync_log_capacity: 256,
        }
    }
}

impl EngineConfig {
    pub fn bonus_calculator(&self) -> UnlockGatedBonus {
        UnlockGatedBonus::new(
            self.bonus_factor,
            LabelKey::new(&self.bonus_label_key, &self.bonus_label_fallback),
        )
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read engine config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub fn load_engine_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_engine_config(&contents)
}

pub fn parse_engine_config(data: &str) -> Result<EngineConfig, ConfigError> {
    Ok(serde_json::from_str(data)?)
}

/// Load from `TROOP_ENGINE_CONFIG` if set. A missing or broken file is logged
/// and the built-in defaults are used.
pub fn load_engine_config_from_env() -> EngineConfig {
    let Some(path) = env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from) else {
        return EngineConfig::default();
    };
    match load_engine_config(&path) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "engine_config.load_failed"
            );
            EngineConfig::default()
        }
    }
}
