//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Start from the first config file found by [`probe_config_paths`], or
//!    from [`Config::default`] when there is none
//! 2. Overlay any `VITALSCOPE_*` environment variables that are set
//!
//! Files may be JSON or TOML (detected by extension). Every field is
//! optional; missing ones keep their defaults.
//!
//! ## Environment Variables
//! - `VITALSCOPE_STORAGE_BACKEND`: `memory`, `file` or `sqlite`
//! - `VITALSCOPE_STORAGE_PATH`: database file or store directory
//! - `VITALSCOPE_STORAGE_POOL_SIZE`: SQLite connection pool size
//! - `VITALSCOPE_MAX_ENTRIES`: cap on persisted metric events
//! - `VITALSCOPE_PAGE_URL`: URL recorded on every metric event
//! - `VITALSCOPE_AUTO_START`: start collection on context creation
//! - `VITALSCOPE_TELEMETRY_ENABLED`: forward web vitals over HTTP
//! - `VITALSCOPE_TELEMETRY_ENDPOINT`: telemetry POST endpoint
//!
//! ## File Locations
//! Probed in order: `./vitalscope.{toml,json}`, `./config.{toml,json}`, then
//! the same names next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use vitalscope_domain::{Config, Result, StorageBackend, VitalScopeError};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["vitalscope.toml", "vitalscope.json", "config.toml", "config.json"];

/// Load configuration from the probed file (if any) plus the environment
///
/// # Errors
/// Returns `VitalScopeError::Config` if a found file cannot be parsed or an
/// environment variable holds an invalid value.
pub fn load() -> Result<Config> {
    let mut config = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found, using defaults");
            Config::default()
        }
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Defaults overlaid with the environment only
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();
    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Overwrite fields of `config` with every `VITALSCOPE_*` variable that is set
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    let mut applied = 0usize;

    if let Some(backend) = env_parse::<StorageBackend>("VITALSCOPE_STORAGE_BACKEND")? {
        config.storage.backend = backend;
        applied += 1;
    }
    if let Some(path) = env_string("VITALSCOPE_STORAGE_PATH") {
        config.storage.path = path;
        applied += 1;
    }
    if let Some(pool_size) = env_parse::<u32>("VITALSCOPE_STORAGE_POOL_SIZE")? {
        config.storage.pool_size = pool_size;
        applied += 1;
    }
    if let Some(max_entries) = env_parse::<usize>("VITALSCOPE_MAX_ENTRIES")? {
        config.storage.max_entries = max_entries;
        applied += 1;
    }
    if let Some(page_url) = env_string("VITALSCOPE_PAGE_URL") {
        config.collection.page_url = page_url;
        applied += 1;
    }
    if let Some(auto_start) = env_bool("VITALSCOPE_AUTO_START") {
        config.collection.auto_start = auto_start;
        applied += 1;
    }
    if let Some(enabled) = env_bool("VITALSCOPE_TELEMETRY_ENABLED") {
        config.telemetry.enabled = enabled;
        applied += 1;
    }
    if let Some(endpoint) = env_string("VITALSCOPE_TELEMETRY_ENDPOINT") {
        config.telemetry.endpoint = Some(endpoint);
        applied += 1;
    }

    if applied > 0 {
        tracing::info!(overrides = applied, "Configuration overridden from environment");
    }
    Ok(())
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `VitalScopeError::Config` if the file is missing, unreadable,
/// malformed or holds a size below 1.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(VitalScopeError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            VitalScopeError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| VitalScopeError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| VitalScopeError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| VitalScopeError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(VitalScopeError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// First existing config file in the standard locations
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    probe_in(&dirs)
}

fn probe_in(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_string(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| VitalScopeError::Config(format!("Invalid value for {}: {}", key, e)))
        })
        .transpose()
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
///
/// Anything else counts as `false`.
fn env_bool(key: &str) -> Option<bool> {
    env_string(key)
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}
