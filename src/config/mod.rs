mod schema;

pub use schema::{Config, Settings, DEFAULT_FUZZY_THRESHOLD, DEFAULT_TIMEZONE};

use anyhow::{anyhow, Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::clock::TimeZoneSetting;

const CONFIG_ENV_VAR: &str = "IFDAY_CONFIG";

pub fn get_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return PathBuf::from(path);
    }

    // ~/.ifday/config.json
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".ifday")
        .join("config.json")
}

/// `--config` wins over IFDAY_CONFIG and the default location
pub fn get_config_path_with_override(path: Option<&Path>) -> PathBuf {
    match path {
        Some(path) => path.to_path_buf(),
        None => get_config_path(),
    }
}

/// load the config at `path`, writing defaults there if it does not exist
pub fn load_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        let config = Config::default();
        save_to(&config, path)?;
        return Ok(config);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

pub fn save_to(config: &Config, path: &Path) -> Result<()> {
    // ensure directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
    }

    let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    Ok(())
}

/// Verify configuration file and return a list of errors
pub fn verify(path: &Path) -> Result<Vec<String>> {
    let mut errors = Vec::new();

    if !path.exists() {
        return Err(anyhow!("config file not found: {}", path.display()));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            return Err(anyhow!("invalid JSON: {}", e));
        }
    };

    if TimeZoneSetting::parse(&config.settings.timezone).is_none() {
        errors.push(format!(
            "settings.timezone: invalid timezone '{}': use 'local', 'utc', or an offset like '+02:00'",
            config.settings.timezone
        ));
    }

    Ok(errors)
}

pub fn set_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["settings", "show_errors"] => {
            config.settings.show_errors = parse_bool(value)?;
        }
        ["settings", "timezone"] => {
            let tz = TimeZoneSetting::parse(value).ok_or_else(|| {
                anyhow!(
                    "Invalid timezone: {}. Use local, utc, or an offset like +02:00",
                    value
                )
            })?;
            config.settings.timezone = tz.to_string();
        }
        ["settings", "fuzzy_threshold"] => {
            config.settings.fuzzy_threshold = value
                .parse()
                .with_context(|| format!("Invalid number: {}", value))?;
        }
        _ => {
            return Err(anyhow!(
                "Unknown config key: {}. Valid keys: settings.show_errors, settings.timezone, settings.fuzzy_threshold",
                key
            ));
        }
    }

    Ok(())
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(anyhow!(
            "Invalid boolean value: {}. Use true/false, yes/no, 1/0, or on/off",
            value
        )),
    }
}
