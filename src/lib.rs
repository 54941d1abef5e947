//! Plugin host for an arena draft helper
//!
//! Scans a `plugins` directory for shared libraries, instantiates the
//! plugins they export and forwards arena events to the first one.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::errors::{ConfigError, PluginError, PluginResult};
pub use domain::entities::{ArenaData, ArenaEvent, Card, PickIndex, PluginState};
pub use domain::traits::ArenaPlugin;
pub use infrastructure::config::{Config, DispatchMode, LoadFailurePolicy, PluginConfig};
pub use infrastructure::plugins::{PluginRegistrar, PluginRegistry};

// Re-exported for plugin authors
pub use async_trait::async_trait;
pub use semver;
