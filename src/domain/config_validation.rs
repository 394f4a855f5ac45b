//! Configuration validation.
//!
//! Validates all config fields before a quiz session starts. Missing keys are
//! fine (built-in defaults apply); present keys must parse and be in range.

use std::str::FromStr;

use crate::domain::archetype::Archetype;
use crate::domain::classifier::DOJI_RATIO_THRESHOLD;
use crate::domain::error::QuizError;
use crate::domain::game_config::DEFAULT_ROUNDS;
use crate::domain::walk::{DEFAULT_WALK_LENGTH, MIN_WALK_LENGTH, WalkParams};
use crate::ports::config_port::ConfigPort;

pub fn validate_game_config(config: &dyn ConfigPort) -> Result<(), QuizError> {
    validate_rounds(config)?;
    validate_walk_length(config)?;
    validate_seed(config)?;
    validate_walk(config)?;
    validate_threshold(config)?;
    validate_distractors(config)?;
    validate_patterns(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> QuizError {
    QuizError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse a present key, rejecting values that do not parse as `T`.
fn parse_key<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    expected: &str,
) -> Result<Option<T>, QuizError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(None);
    };
    match raw.trim().parse::<T>() {
        Ok(value) => Ok(Some(value)),
        Err(_) => Err(invalid(
            section,
            key,
            &format!("{key} must be {expected}, got {raw:?}"),
        )),
    }
}

/// Parse a present float key. NaN and infinities are rejected.
fn parse_finite(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, QuizError> {
    match parse_key::<f64>(config, section, key, "a number")? {
        Some(v) if !v.is_finite() => Err(invalid(
            section,
            key,
            &format!("{key} must be a finite number"),
        )),
        other => Ok(other),
    }
}

fn validate_rounds(config: &dyn ConfigPort) -> Result<(), QuizError> {
    let value = parse_key::<i64>(config, "game", "rounds", "an integer")?
        .unwrap_or(i64::from(DEFAULT_ROUNDS));
    if value < 1 {
        return Err(invalid("game", "rounds", "rounds must be at least 1"));
    }
    if u32::try_from(value).is_err() {
        return Err(invalid("game", "rounds", "rounds is out of range"));
    }
    Ok(())
}

fn validate_walk_length(config: &dyn ConfigPort) -> Result<(), QuizError> {
    let value = parse_key::<i64>(config, "game", "walk_length", "an integer")?
        .unwrap_or(DEFAULT_WALK_LENGTH as i64);
    if value < MIN_WALK_LENGTH as i64 {
        return Err(invalid(
            "game",
            "walk_length",
            "walk_length must be at least 2",
        ));
    }
    Ok(())
}

fn validate_seed(config: &dyn ConfigPort) -> Result<(), QuizError> {
    parse_key::<u64>(config, "game", "seed", "a non-negative integer")?;
    Ok(())
}

fn validate_walk(config: &dyn ConfigPort) -> Result<(), QuizError> {
    let d = WalkParams::default();
    let start_price = parse_finite(config, "walk", "start_price")?.unwrap_or(d.start_price);
    if start_price <= 0.0 {
        return Err(invalid("walk", "start_price", "start_price must be positive"));
    }
    let sigma = parse_finite(config, "walk", "sigma")?.unwrap_or(d.sigma);
    if sigma <= 0.0 {
        return Err(invalid("walk", "sigma", "sigma must be positive"));
    }
    let shadow_min = parse_finite(config, "walk", "shadow_min")?.unwrap_or(d.shadow_min);
    if shadow_min < 0.0 {
        return Err(invalid(
            "walk",
            "shadow_min",
            "shadow_min must be non-negative",
        ));
    }
    let shadow_max = parse_finite(config, "walk", "shadow_max")?.unwrap_or(d.shadow_max);
    if shadow_max < shadow_min {
        return Err(invalid(
            "walk",
            "shadow_max",
            "shadow_max must not be below shadow_min",
        ));
    }
    Ok(())
}

fn validate_threshold(config: &dyn ConfigPort) -> Result<(), QuizError> {
    let value = parse_finite(config, "classifier", "threshold")?.unwrap_or(DOJI_RATIO_THRESHOLD);
    if value <= 0.0 || value >= 1.0 {
        return Err(invalid(
            "classifier",
            "threshold",
            "threshold must be between 0 and 1",
        ));
    }
    Ok(())
}

fn validate_distractors(config: &dyn ConfigPort) -> Result<(), QuizError> {
    if let Some(pool) = config.get_string("distractors", "pool") {
        if pool.split('|').any(|d| d.trim().is_empty()) {
            return Err(invalid(
                "distractors",
                "pool",
                "pool entries must be non-empty",
            ));
        }
    }
    Ok(())
}

fn validate_patterns(config: &dyn ConfigPort) -> Result<(), QuizError> {
    for archetype in Archetype::ALL {
        let section = format!("pattern_{}", archetype.config_key());
        if let Some(expected) = config.get_string(&section, "expected") {
            if expected.trim().is_empty() {
                return Err(invalid(&section, "expected", "expected must be non-empty"));
            }
        }
    }
    Ok(())
}
