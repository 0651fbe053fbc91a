//! Configuration with hierarchical layering.
//!
//! # Load Order
//!
//! 1. Default values (compile-time)
//! 2. Global config (`~/.vestibule/config.toml`)
//! 3. Project config (`.vestibule/config.toml`)
//! 4. Environment variables (`VESTIBULE_*`)
//!
//! Each layer overrides the previous. Missing files are ignored;
//! unparseable files are errors.
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `VESTIBULE_DEBUG` | `debug` | bool |
//! | `VESTIBULE_SIGN_IN_PATH` | `paths.sign_in` | String |
//! | `VESTIBULE_SELECT_ROLE_PATH` | `paths.select_role` | String |
//! | `VESTIBULE_PROVIDER_URL` | `provider.base_url` | String |
//! | `VESTIBULE_UI_BANNER` | `ui.banner` | bool |
//!
//! # Example Configuration
//!
//! ```toml
//! # ~/.vestibule/config.toml
//! debug = false
//!
//! [paths]
//! sign_in = "/sign-in"
//! select_role = "/select-role"
//!
//! [bootstrap]
//! initial_delay_ms = 500
//! max_delay_ms = 30000
//! multiplier = 2
//!
//! [provider]
//! base_url = "https://clerk.example.com"
//! timeout_ms = 10000
//!
//! [ui]
//! banner = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use vestibule_runtime::BackoffPolicy;
use vestibule_types::ErrorCode;

/// Project-local config directory name.
const PROJECT_CONFIG_DIR: &str = ".vestibule";

/// Config file name in both global and project directories.
const CONFIG_FILE: &str = "config.toml";

/// Default global config directory (`~/.vestibule`).
pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".vestibule")
}

/// Default global config file path.
pub fn default_config_path() -> PathBuf {
    default_config_dir().join(CONFIG_FILE)
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file exists but could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// The offending file.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A config file exists but could not be parsed.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// The offending file.
        path: PathBuf,
        /// The underlying TOML failure.
        #[source]
        source: toml::de::Error,
    },

    /// An environment variable carried an unusable value.
    #[error("invalid environment variable {var}: {reason}")]
    InvalidEnvVar {
        /// The variable name.
        var: &'static str,
        /// Why it was rejected.
        reason: &'static str,
    },
}

impl ConfigError {
    fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    fn parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    fn invalid_env_var(var: &'static str, reason: &'static str) -> Self {
        Self::InvalidEnvVar { var, reason }
    }
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "APP_CONFIG_IO",
            Self::Parse { .. } => "APP_CONFIG_PARSE",
            Self::InvalidEnvVar { .. } => "APP_CONFIG_ENV",
        }
    }

    fn is_recoverable(&self) -> bool {
        // Config problems need a human to fix the file or variable.
        false
    }
}

/// Main configuration structure.
///
/// This is the unified configuration after merging all layers. Fields
/// are optional in the file (`#[serde(default)]`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VestibuleConfig {
    /// Enable debug mode (verbose logging, diagnostics).
    pub debug: bool,

    /// Guard redirect paths.
    pub paths: PathsConfig,

    /// Bootstrap retry tuning.
    pub bootstrap: BootstrapConfig,

    /// Identity provider endpoint settings.
    pub provider: ProviderConfig,

    /// UI behavior flags.
    pub ui: UiConfig,
}

impl VestibuleConfig {
    /// Creates a config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Merges another config into this one.
    ///
    /// Values from `other` override values in `self` only where they
    /// differ from the compile-time default. This enables layering.
    pub fn merge(&mut self, other: &Self) {
        let default = Self::default();
        if other.debug != default.debug {
            self.debug = other.debug;
        }
        self.paths.merge(&other.paths);
        self.bootstrap.merge(&other.bootstrap);
        self.provider.merge(&other.provider);
        self.ui.merge(&other.ui);
    }
}

/// Guard redirect paths.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Where signed-out navigation is sent.
    pub sign_in: String,

    /// Where unclassified or mismatched navigation is sent.
    pub select_role: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            sign_in: "/sign-in".into(),
            select_role: "/select-role".into(),
        }
    }
}

impl PathsConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();
        if other.sign_in != default.sign_in {
            self.sign_in = other.sign_in.clone();
        }
        if other.select_role != default.select_role {
            self.select_role = other.select_role.clone();
        }
    }
}

/// Bootstrap retry tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BootstrapConfig {
    /// First retry delay in milliseconds.
    pub initial_delay_ms: u64,

    /// Retry delay cap in milliseconds.
    pub max_delay_ms: u64,

    /// Delay multiplier between attempts.
    pub multiplier: u32,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 500,
            max_delay_ms: 30_000,
            multiplier: 2,
        }
    }
}

impl BootstrapConfig {
    /// Converts to the runtime's backoff policy.
    #[must_use]
    pub fn backoff_policy(&self) -> BackoffPolicy {
        BackoffPolicy::new(
            Duration::from_millis(self.initial_delay_ms),
            Duration::from_millis(self.max_delay_ms),
            self.multiplier,
        )
    }

    fn merge(&mut self, other: &Self) {
        let default = Self::default();
        if other.initial_delay_ms != default.initial_delay_ms {
            self.initial_delay_ms = other.initial_delay_ms;
        }
        if other.max_delay_ms != default.max_delay_ms {
            self.max_delay_ms = other.max_delay_ms;
        }
        if other.multiplier != default.multiplier {
            self.multiplier = other.multiplier;
        }
    }
}

/// Identity provider endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the hosted identity frontend.
    pub base_url: String,

    /// Per-call timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_ms: 10_000,
        }
    }
}

impl ProviderConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();
        if other.base_url != default.base_url {
            self.base_url = other.base_url.clone();
        }
        if other.timeout_ms != default.timeout_ms {
            self.timeout_ms = other.timeout_ms;
        }
    }
}

/// UI behavior flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UiConfig {
    /// Show the persistent bootstrap-failure banner.
    pub banner: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { banner: true }
    }
}

impl UiConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();
        if other.banner != default.banner {
            self.banner = other.banner;
        }
    }
}

/// Encapsulates config resolution for the app builder.
///
/// Lets the builder stay agnostic of where config comes from: the CLI
/// wires a [`ConfigLoader`], tests wire a [`StaticResolver`].
pub trait ConfigResolver {
    /// Resolves the effective configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any layer exists but cannot be used.
    fn resolve(&self) -> Result<VestibuleConfig, ConfigError>;
}

/// A resolver returning a fixed config. For tests and embedders.
#[derive(Debug, Clone)]
pub struct StaticResolver(VestibuleConfig);

impl StaticResolver {
    /// Wraps a fixed config.
    #[must_use]
    pub fn new(config: VestibuleConfig) -> Self {
        Self(config)
    }
}

impl ConfigResolver for StaticResolver {
    fn resolve(&self) -> Result<VestibuleConfig, ConfigError> {
        Ok(self.0.clone())
    }
}

/// Configuration loader with builder pattern.
///
/// # Example
///
/// ```no_run
/// use vestibule_app::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_project_root("/path/to/project")
///     .skip_env_vars() // for deterministic tests
///     .load()
///     .expect("config should load");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Global config file path (defaults to `~/.vestibule/config.toml`).
    global_config_path: Option<PathBuf>,

    /// Project root directory.
    project_root: Option<PathBuf>,

    /// Skip environment variable loading.
    skip_env: bool,

    /// Skip global config loading.
    skip_global: bool,
}

impl ConfigLoader {
    /// Creates a loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom global config path.
    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Sets the project root directory.
    ///
    /// Project config is loaded from `<root>/.vestibule/config.toml`.
    #[must_use]
    pub fn with_project_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_root = Some(path.into());
        self
    }

    /// Skips environment variable loading (for deterministic tests).
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Skips global config loading.
    #[must_use]
    pub fn skip_global_config(mut self) -> Self {
        self.skip_global = true;
        self
    }

    /// Loads and merges configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any config file exists but cannot be
    /// parsed. Missing config files are silently ignored.
    pub fn load(&self) -> Result<VestibuleConfig, ConfigError> {
        let mut config = VestibuleConfig::default();

        if !self.skip_global {
            let global_path = self
                .global_config_path
                .clone()
                .unwrap_or_else(default_config_path);
            if let Some(global) = self.load_file(&global_path)? {
                debug!(path = %global_path.display(), "loaded global config");
                config.merge(&global);
            }
        }

        if let Some(ref project_root) = self.project_root {
            let project_path = project_root.join(PROJECT_CONFIG_DIR).join(CONFIG_FILE);
            if let Some(project) = self.load_file(&project_path)? {
                debug!(path = %project_path.display(), "loaded project config");
                config.merge(&project);
            }
        }

        if !self.skip_env {
            apply_env_vars(&mut config)?;
        }

        Ok(config)
    }

    fn load_file(&self, path: &Path) -> Result<Option<VestibuleConfig>, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text)
                .map(Some)
                .map_err(|e| ConfigError::parse(path, e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::io(path, e)),
        }
    }
}

impl ConfigResolver for ConfigLoader {
    fn resolve(&self) -> Result<VestibuleConfig, ConfigError> {
        self.load()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn apply_env_vars(config: &mut VestibuleConfig) -> Result<(), ConfigError> {
    if let Ok(val) = std::env::var("VESTIBULE_DEBUG") {
        config.debug = parse_bool(&val)
            .ok_or_else(|| ConfigError::invalid_env_var("VESTIBULE_DEBUG", "expected bool"))?;
    }
    if let Ok(val) = std::env::var("VESTIBULE_SIGN_IN_PATH") {
        config.paths.sign_in = val;
    }
    if let Ok(val) = std::env::var("VESTIBULE_SELECT_ROLE_PATH") {
        config.paths.select_role = val;
    }
    if let Ok(val) = std::env::var("VESTIBULE_PROVIDER_URL") {
        config.provider.base_url = val;
    }
    if let Ok(val) = std::env::var("VESTIBULE_UI_BANNER") {
        config.ui.banner = parse_bool(&val)
            .ok_or_else(|| ConfigError::invalid_env_var("VESTIBULE_UI_BANNER", "expected bool"))?;
    }
    Ok(())
}
