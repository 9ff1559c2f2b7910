//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.approuter/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::debug::analyzer::DEFAULT_MAX_ACTIVE_ROUTERS;
use crate::debug::flow::DEFAULT_STEP_DELAY_MS;
use crate::debug::recorder::DEFAULT_LOG_CAPACITY;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AppRouterConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub debug: DebugConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DebugConfig {
    pub enabled: Option<bool>,
    pub log_capacity: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RegistryConfig {
    pub strict_registration: Option<bool>,
    pub max_active_routers: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DemoConfig {
    pub step_delay_ms: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;
pub const DEFAULT_LOG_FILE: &str = "approuter.log";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub log_level: LevelFilter,
    pub log_file: String,
    pub debug_enabled: bool,
    pub log_capacity: usize,
    pub strict_registration: bool,
    pub max_active_routers: usize,
    pub step_delay_ms: u64,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.approuter/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".approuter").join("config.toml"))
}

/// Load config from `~/.approuter/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `AppRouterConfig::default()`.
pub fn load_config() -> Result<AppRouterConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(AppRouterConfig::default())
        }
    }
}

/// Load config from an explicit path, generating a default there if missing.
/// A malformed file is `ConfigError::Parse`.
pub fn load_config_from(path: &Path) -> Result<AppRouterConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(AppRouterConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: AppRouterConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# AppRouter Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# log_level = "debug"               # "off", "error", "warn", "info", "debug", "trace"
# log_file = "approuter.log"

# [debug]
# enabled = true                    # record navigation events
# log_capacity = 1000               # oldest events are evicted first

# [registry]
# strict_registration = false       # refuse duplicate router ids instead of overwriting
# max_active_routers = 10           # analyzer warns above this

# [demo]
# step_delay_ms = 500               # delay between scripted flow steps
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Overrides supplied on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub log_level: Option<LevelFilter>,
    pub step_delay_ms: Option<u64>,
    pub strict_registration: bool,
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &AppRouterConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Log level: CLI → env → config → default
    let log_level = cli
        .log_level
        .or_else(|| env_parse("APPROUTER_LOG_LEVEL"))
        .or_else(|| parse_level(config.general.log_level.as_deref()))
        .unwrap_or(DEFAULT_LOG_LEVEL);

    // Log file: env → config → default
    let log_file = std::env::var("APPROUTER_LOG_FILE")
        .ok()
        .or_else(|| config.general.log_file.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    let debug_enabled = env_parse("APPROUTER_DEBUG")
        .or(config.debug.enabled)
        .unwrap_or(true);

    let log_capacity = env_parse("APPROUTER_LOG_CAPACITY")
        .or(config.debug.log_capacity)
        .unwrap_or(DEFAULT_LOG_CAPACITY);

    // Strict mode: a CLI flag can only turn it on
    let strict_registration = cli.strict_registration
        || env_parse("APPROUTER_STRICT")
            .or(config.registry.strict_registration)
            .unwrap_or(false);

    let step_delay_ms = cli
        .step_delay_ms
        .or_else(|| env_parse("APPROUTER_STEP_DELAY_MS"))
        .or(config.demo.step_delay_ms)
        .unwrap_or(DEFAULT_STEP_DELAY_MS);

    ResolvedConfig {
        log_level,
        log_file,
        debug_enabled,
        log_capacity,
        strict_registration,
        max_active_routers: config
            .registry
            .max_active_routers
            .unwrap_or(DEFAULT_MAX_ACTIVE_ROUTERS),
        step_delay_ms,
    }
}

fn parse_level(value: Option<&str>) -> Option<LevelFilter> {
    let value = value?;
    match value.parse() {
        Ok(level) => Some(level),
        Err(_) => {
            warn!("Ignoring unknown log level '{}'", value);
            None
        }
    }
}

/// Reads and parses an env var. Unset or unparsable values are ignored.
fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring unparsable {}={}", name, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = AppRouterConfig::default();
        assert!(config.general.log_level.is_none());
        assert!(config.debug.enabled.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = AppRouterConfig::default();
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.log_capacity, DEFAULT_LOG_CAPACITY);
        assert_eq!(resolved.max_active_routers, DEFAULT_MAX_ACTIVE_ROUTERS);
        assert_eq!(resolved.step_delay_ms, DEFAULT_STEP_DELAY_MS);
        assert!(resolved.debug_enabled);
        assert!(!resolved.strict_registration);
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = AppRouterConfig {
            general: GeneralConfig {
                log_level: Some("warn".to_string()),
                log_file: Some("nav.log".to_string()),
            },
            debug: DebugConfig {
                enabled: Some(false),
                log_capacity: Some(50),
            },
            registry: RegistryConfig {
                strict_registration: Some(true),
                max_active_routers: Some(3),
            },
            demo: DemoConfig {
                step_delay_ms: Some(10),
            },
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.log_level, LevelFilter::Warn);
        assert_eq!(resolved.log_file, "nav.log");
        assert!(!resolved.debug_enabled);
        assert_eq!(resolved.log_capacity, 50);
        assert!(resolved.strict_registration);
        assert_eq!(resolved.max_active_routers, 3);
        assert_eq!(resolved.step_delay_ms, 10);
    }

    #[test]
    fn test_resolve_cli_wins() {
        let config = AppRouterConfig {
            general: GeneralConfig {
                log_level: Some("warn".to_string()),
                ..Default::default()
            },
            demo: DemoConfig {
                step_delay_ms: Some(10),
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            log_level: Some(LevelFilter::Trace),
            step_delay_ms: Some(0),
            strict_registration: true,
        };
        let resolved = resolve(&config, &cli);
        assert_eq!(resolved.log_level, LevelFilter::Trace);
        assert_eq!(resolved.step_delay_ms, 0);
        assert!(resolved.strict_registration);
    }

    #[test]
    fn test_unknown_log_level_falls_back() {
        let config = AppRouterConfig {
            general: GeneralConfig {
                log_level: Some("loud".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
log_level = "info"

[debug]
enabled = true
log_capacity = 250

[registry]
strict_registration = true
max_active_routers = 20

[demo]
step_delay_ms = 100
"#;
        let config: AppRouterConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level.as_deref(), Some("info"));
        assert_eq!(config.debug.log_capacity, Some(250));
        assert_eq!(config.registry.strict_registration, Some(true));
        assert_eq!(config.registry.max_active_routers, Some(20));
        assert_eq!(config.demo.step_delay_ms, Some(100));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing, everything else stays default
        let toml_str = r#"
[demo]
step_delay_ms = 0
"#;
        let config: AppRouterConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.demo.step_delay_ms, Some(0));
        assert!(config.general.log_level.is_none());
        assert!(config.registry.max_active_routers.is_none());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("approuter-cfg-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[debug\nenabled = ").unwrap();

        let result = load_config_from(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_generates_default() {
        let dir = std::env::temp_dir().join(format!("approuter-cfg-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");

        let config = load_config_from(&path).unwrap();
        assert!(config.demo.step_delay_ms.is_none());
        let generated = fs::read_to_string(&path).unwrap();
        assert!(generated.starts_with("# AppRouter Configuration"));
        // The generated file is all comments, so it parses to defaults
        let reparsed: AppRouterConfig = toml::from_str(&generated).unwrap();
        assert!(reparsed.debug.enabled.is_none());
        let _ = fs::remove_dir_all(&dir);
    }
}
