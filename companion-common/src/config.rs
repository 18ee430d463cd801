//! Configuration loading and setting resolution
//!
//! Bootstrap settings come from, in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is not an error: the service starts on defaults and
//! logs a warning. A TOML file that exists but does not parse is.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the back-end base address
pub const ENV_BASE_URL: &str = "COMPANION_BASE_URL";

/// Environment variable carrying the bearer credential for the back end
pub const ENV_TOKEN: &str = "COMPANION_TOKEN";

/// Back-end address used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:28088";

/// HTTP port of the catalog service when nothing else is configured
pub const DEFAULT_PORT: u16 = 5730;

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional; absent fields fall through to the environment
/// or the compiled defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TomlConfig {
    /// Base address of the REST back end (e.g. `http://localhost:28088`)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Bearer credential forwarded to the back end
    #[serde(default)]
    pub token: Option<String>,

    /// HTTP port of the catalog service
    #[serde(default)]
    pub port: Option<u16>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Default location of a module's TOML file: `<config dir>/companion/<module>.toml`
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("companion").join(format!("{}.toml", module_name)))
}

/// Load the TOML bootstrap file, falling back to defaults when it does not exist
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Resolve the back-end base address
///
/// The result is normalized with [`normalize_base_url`].
pub fn resolve_base_url(cli_arg: Option<&str>, toml: &TomlConfig) -> String {
    let chosen = pick_setting(cli_arg, ENV_BASE_URL, toml.base_url.as_deref())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    normalize_base_url(&chosen)
}

/// Resolve the bearer credential, if any
///
/// The result is normalized with [`normalize_credential`].
pub fn resolve_token(cli_arg: Option<&str>, toml: &TomlConfig) -> Option<String> {
    pick_setting(cli_arg, ENV_TOKEN, toml.token.as_deref())
        .and_then(|token| normalize_credential(&token))
}

/// First non-blank value in CLI → environment → TOML order
fn pick_setting(cli_arg: Option<&str>, env_var_name: &str, toml_value: Option<&str>) -> Option<String> {
    // Priority 1: Command-line argument
    if let Some(value) = cli_arg.filter(|v| !v.trim().is_empty()) {
        return Some(value.to_string());
    }

    // Priority 2: Environment variable
    if let Ok(value) = std::env::var(env_var_name) {
        if !value.trim().is_empty() {
            return Some(value);
        }
    }

    // Priority 3: TOML config file
    toml_value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

/// Trim whitespace and trailing slashes so equivalent addresses share a cache key
///
/// # Examples
///
/// ```
/// use companion_common::config::normalize_base_url;
///
/// assert_eq!(normalize_base_url(" http://host:28088/ "), "http://host:28088");
/// ```
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

/// Trim whitespace and surrounding double quotes; blank credentials are absent
///
/// # Examples
///
/// ```
/// use companion_common::config::normalize_credential;
///
/// assert_eq!(normalize_credential(" \"abc\" ").as_deref(), Some("abc"));
/// assert_eq!(normalize_credential("\"\""), None);
/// ```
pub fn normalize_credential(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(trimmed);
    let token = unquoted.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
