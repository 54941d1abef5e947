//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::application::errors::{ConfigError, PluginError};

/// Name of the plugin directory next to the executable
pub const PLUGIN_DIR_NAME: &str = "plugins";

/// Host configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub plugins: PluginConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PluginConfig {
    /// Directory to scan; `None` means `plugins` next to the executable
    pub directory: Option<PathBuf>,
    /// File extension of loadable modules, without the dot
    pub extension: String,
    /// What to do when a module or one of its plugins fails to load
    pub on_load_failure: LoadFailurePolicy,
    /// How handlers without a return value are run
    pub dispatch: DispatchMode,
}

/// Behaviour when a module fails to load or a plugin fails to instantiate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadFailurePolicy {
    /// Fail the whole load and leave the registry empty
    #[default]
    Abort,
    /// Log the failure and keep going with the remaining modules
    Skip,
}

/// How notification handlers are dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchMode {
    /// Await the handler before returning to the caller
    #[default]
    Inline,
    /// Spawn the handler as an unsupervised task and return immediately
    Detached,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            directory: None,
            extension: std::env::consts::DLL_EXTENSION.to_string(),
            on_load_failure: LoadFailurePolicy::default(),
            dispatch: DispatchMode::default(),
        }
    }
}

impl PluginConfig {
    /// Resolve the directory to scan
    pub fn resolve_directory(&self) -> Result<PathBuf, PluginError> {
        if let Some(dir) = &self.directory {
            return Ok(dir.clone());
        }

        let exe = std::env::current_exe()?;
        let base = exe.parent().unwrap_or_else(|| Path::new("."));
        Ok(base.join(PLUGIN_DIR_NAME))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err(ConfigError::InvalidValue(format!(
                "plugin extension must be non-empty and without a leading dot: {:?}",
                self.extension
            )));
        }
        Ok(())
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.plugins.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    /// Override values from `ARENA_PLUGINS_*` environment variables
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(dir) = var("ARENA_PLUGINS_DIR") {
            self.plugins.directory = Some(PathBuf::from(dir));
        }

        if let Some(extension) = var("ARENA_PLUGINS_EXTENSION") {
            self.plugins.extension = extension;
        }

        if let Some(policy) = var("ARENA_PLUGINS_ON_LOAD_FAILURE") {
            self.plugins.on_load_failure = parse_env("ARENA_PLUGINS_ON_LOAD_FAILURE", &policy)?;
        }

        if let Some(mode) = var("ARENA_PLUGINS_DISPATCH") {
            self.plugins.dispatch = parse_env("ARENA_PLUGINS_DISPATCH", &mode)?;
        }

        self.plugins.validate()
    }
}

fn parse_env<T: serde::de::DeserializeOwned>(key: &str, value: &str) -> Result<T, ConfigError> {
    serde_yaml::from_str(value)
        .map_err(|_| ConfigError::InvalidValue(format!("{}={}", key, value)))
}
