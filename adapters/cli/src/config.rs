//! Arena tuning loaded from an optional TOML file.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use hexfall_world::{
    ArenaConfig, DEFAULT_DETONATION_RADIUS, DEFAULT_INCOMING_DAMAGE_SCALE,
    DEFAULT_SPAWN_HEALTH_SCALE,
};
use serde::Deserialize;

/// Errors raised when a tuning file holds values the arena cannot use.
#[derive(Debug, PartialEq, thiserror::Error)]
pub(crate) enum ConfigError {
    /// The detonation radius was negative, infinite or NaN.
    #[error("detonation_radius must be a finite, non-negative number (got {0})")]
    InvalidRadius(f32),
    /// The incoming damage scale was negative, infinite or NaN.
    #[error("incoming_damage_scale must be a finite, non-negative number (got {0})")]
    InvalidDamageScale(f32),
    /// The spawn health scale was not a positive finite number.
    #[error("spawn_health_scale must be a positive, finite number (got {0})")]
    InvalidHealthScale(f32),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TuningFile {
    detonation_radius: Option<f32>,
    incoming_damage_scale: Option<f32>,
    spawn_health_scale: Option<f32>,
}

/// Reads the tuning file at `path`, falling back to defaults for absent keys.
pub(crate) fn load(path: &Path) -> Result<ArenaConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file at {}", path.display()))?;
    let config = parse(&contents)
        .with_context(|| format!("invalid tuning file at {}", path.display()))?;
    Ok(config)
}

pub(crate) fn parse(contents: &str) -> Result<ArenaConfig> {
    let file: TuningFile =
        toml::from_str(contents).context("failed to parse tuning toml contents")?;
    Ok(validate(file)?)
}

fn validate(file: TuningFile) -> Result<ArenaConfig, ConfigError> {
    let radius = file.detonation_radius.unwrap_or(DEFAULT_DETONATION_RADIUS);
    if !radius.is_finite() || radius < 0.0 {
        return Err(ConfigError::InvalidRadius(radius));
    }

    let scale = file
        .incoming_damage_scale
        .unwrap_or(DEFAULT_INCOMING_DAMAGE_SCALE);
    if !scale.is_finite() || scale < 0.0 {
        return Err(ConfigError::InvalidDamageScale(scale));
    }

    let health_scale = file
        .spawn_health_scale
        .unwrap_or(DEFAULT_SPAWN_HEALTH_SCALE);
    if !health_scale.is_finite() || health_scale <= 0.0 {
        return Err(ConfigError::InvalidHealthScale(health_scale));
    }

    Ok(ArenaConfig::new(radius, scale, health_scale))
}
