//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.splitscreen/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SplitscreenConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub poll_interval_ms: Option<u64>,
    pub log_file: Option<String>,
    pub log_level: Option<String>,
    pub preamble: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DisplayConfig {
    pub prompt: Option<String>,
    pub status_fill: Option<char>,
    pub status_color: Option<String>,
    pub capacity: Option<usize>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_LOG_FILE: &str = "splitscreen.log";
pub const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Debug;
pub const DEFAULT_PROMPT: &str = "> ";
pub const DEFAULT_STATUS_FILL: char = '-';
pub const DEFAULT_STATUS_COLOR: Color = Color::Green;

pub fn default_preamble() -> Vec<String> {
    vec![
        "Hello there ... ctrl-c to quit".to_string(),
        "------------------------------".to_string(),
    ]
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

/// How the display surface draws itself.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySettings {
    pub prompt: String,
    pub status_fill: char,
    pub status_color: Color,
    /// Upper bound on scroll buffer lines; the pane height always wins.
    pub capacity: Option<usize>,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            status_fill: DEFAULT_STATUS_FILL,
            status_color: DEFAULT_STATUS_COLOR,
            capacity: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub poll_interval: Duration,
    pub log_file: PathBuf,
    pub log_level: log::LevelFilter,
    pub preamble: Vec<String>,
    pub display: DisplaySettings,
    /// Values that were present but rejected. Resolution runs before the
    /// logger exists, so the caller logs these once it is up.
    pub warnings: Vec<String>,
}

/// Values supplied on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub log_file: Option<PathBuf>,
    pub poll_interval_ms: Option<u64>,
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

/// Returns the path to `~/.splitscreen/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".splitscreen").join("config.toml"))
}

/// Load config from `path`, or from `~/.splitscreen/config.toml` when `None`.
///
/// A missing default file is generated (commented out) and treated as empty.
/// A missing explicit file is an error and is never generated.
pub fn load_config(path: Option<&Path>) -> Result<SplitscreenConfig, ConfigError> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => match config_path() {
            Some(p) => (p, false),
            None => {
                return Err(ConfigError::Io(io::Error::new(
                    io::ErrorKind::NotFound,
                    "could not determine home directory",
                )));
            }
        },
    };

    if !path.exists() {
        if explicit {
            return Err(ConfigError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )));
        }
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path).map_err(ConfigError::Io)?;
        return Ok(SplitscreenConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config = parse_config(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<SplitscreenConfig, ConfigError> {
    toml::from_str(contents).map_err(ConfigError::Parse)
}

const DEFAULT_CONFIG_TEMPLATE: &str = r##"# Splitscreen Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# poll_interval_ms = 500             # Idle pause of the display loop
# log_file = "splitscreen.log"       # Relative to the working directory
# log_level = "debug"                # "off", "error", "warn", "info", "debug", "trace"
# preamble = ["Hello there ... ctrl-c to quit", "------------------------------"]

# [display]
# prompt = "> "
# status_fill = "-"
# status_color = "green"             # Any ratatui colour name, or "#rrggbb"
# capacity = 200                     # Never more than the log pane height
"##;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, DEFAULT_CONFIG_TEMPLATE)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &SplitscreenConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    config: &SplitscreenConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let mut warnings = Vec::new();

    // Poll interval: CLI → env → config → default
    let poll_interval_ms = cli
        .poll_interval_ms
        .or_else(|| env_parse(&env, "SPLITSCREEN_POLL_INTERVAL_MS", &mut warnings))
        .or(config.general.poll_interval_ms)
        .unwrap_or(DEFAULT_POLL_INTERVAL_MS);

    // Log file: CLI → env → config → default
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| env("SPLITSCREEN_LOG_FILE").map(PathBuf::from))
        .or_else(|| config.general.log_file.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    // Log level: env → config → default
    let log_level = env("SPLITSCREEN_LOG_LEVEL")
        .or_else(|| config.general.log_level.clone())
        .and_then(|level| match log::LevelFilter::from_str(&level) {
            Ok(filter) => Some(filter),
            Err(_) => {
                warnings.push(format!("Unknown log level {level:?}, using default"));
                None
            }
        })
        .unwrap_or(DEFAULT_LOG_LEVEL);

    let preamble = config
        .general
        .preamble
        .clone()
        .unwrap_or_else(default_preamble);

    ResolvedConfig {
        poll_interval: Duration::from_millis(poll_interval_ms),
        log_file,
        log_level,
        preamble,
        display: resolve_display(&config.display, &mut warnings),
        warnings,
    }
}

fn resolve_display(display: &DisplayConfig, warnings: &mut Vec<String>) -> DisplaySettings {
    let status_color = display
        .status_color
        .as_deref()
        .and_then(|name| match Color::from_str(name) {
            Ok(color) => Some(color),
            Err(_) => {
                warnings.push(format!("Unknown status colour {name:?}, using default"));
                None
            }
        })
        .unwrap_or(DEFAULT_STATUS_COLOR);

    DisplaySettings {
        prompt: display
            .prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
        status_fill: display.status_fill.unwrap_or(DEFAULT_STATUS_FILL),
        status_color,
        capacity: display.capacity,
    }
}

fn env_parse<T: FromStr>(
    env: impl Fn(&str) -> Option<String>,
    key: &str,
    warnings: &mut Vec<String>,
) -> Option<T> {
    let raw = env(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warnings.push(format!("Ignoring unparseable {key}={raw:?}"));
            None
        }
    }
}
