//! Plugin system
//!
//! Plugins are dynamically loaded shared libraries found under the plugin
//! directory. Each module exports `arena_plugin_register` (see
//! [`export_plugins!`](crate::export_plugins)) and hands its plugin
//! factories to a [`PluginRegistrar`].

pub mod discovery;
pub mod loader;
pub mod registrar;
pub mod registry;

pub use loader::{LoadedModule, ModuleLoader, NativeModuleLoader};
pub use registrar::{PluginFactory, PluginRegisterFn, PluginRegistrar, REGISTER_SYMBOL};
pub use registry::{PluginInfo, PluginRegistry, RegisteredPlugin};
