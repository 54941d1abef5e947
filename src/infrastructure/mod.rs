//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Plugins: Module discovery, loading and the plugin registry

pub mod config;
pub mod plugins;
