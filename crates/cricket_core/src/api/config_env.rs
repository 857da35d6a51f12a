use crate::config::ScoringConfig;
use std::{env, fs};

pub(crate) const SCORING_CONFIG_PATH_ENV: &str = "CRICKET_SCORING_CONFIG_PATH";

/// Config named by `CRICKET_SCORING_CONFIG_PATH`, if the variable is set.
pub(crate) fn scoring_config_from_env() -> Result<Option<ScoringConfig>, String> {
    let Ok(path) = env::var(SCORING_CONFIG_PATH_ENV) else {
        return Ok(None);
    };

    let path = path.trim();
    if path.is_empty() {
        return Ok(None);
    }

    load_scoring_config(path).map(Some)
}

pub(crate) fn load_scoring_config(path: &str) -> Result<ScoringConfig, String> {
    let content = fs::read_to_string(path).map_err(|e| {
        format!("Failed to read scoring config file from {SCORING_CONFIG_PATH_ENV}='{path}': {e}")
    })?;

    let config = ScoringConfig::from_json(&content).map_err(|e| {
        format!("Failed to parse scoring config JSON from {SCORING_CONFIG_PATH_ENV}='{path}': {e}")
    })?;

    config
        .validate()
        .map_err(|e| format!("Invalid scoring config from {SCORING_CONFIG_PATH_ENV}='{path}': {e}"))?;

    log::info!("Loaded scoring config from {path}");
    Ok(config)
}
