//! Plugin loader - Dynamically loads plugin modules from shared libraries

use std::path::{Path, PathBuf};
use std::sync::Arc;
use libloading::{Library, Symbol};
use crate::application::errors::{PluginError, PluginResult};
use super::registrar::{PluginFactory, PluginRegisterFn, PluginRegistrar, REGISTER_SYMBOL};

/// A module whose registration call has run
///
/// Factories are declared before the library so they are dropped first.
pub struct LoadedModule {
    path: PathBuf,
    factories: Vec<(String, PluginFactory)>,
    library: Option<Arc<Library>>,
}

impl LoadedModule {
    /// Module backed by code already linked into the process
    pub fn new(path: impl Into<PathBuf>, registrar: PluginRegistrar) -> Self {
        Self {
            path: path.into(),
            factories: registrar.into_factories(),
            library: None,
        }
    }

    fn from_library(path: &Path, registrar: PluginRegistrar, library: Library) -> Self {
        Self {
            path: path.to_path_buf(),
            factories: registrar.into_factories(),
            library: Some(Arc::new(library)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub(crate) fn factories(&self) -> &[(String, PluginFactory)] {
        &self.factories
    }

    /// Library the factories and their plugins must not outlive
    pub(crate) fn library(&self) -> Option<&Arc<Library>> {
        self.library.as_ref()
    }
}

/// Turns a module file into a set of plugin factories
pub trait ModuleLoader: Send + Sync {
    fn load(&self, path: &Path) -> PluginResult<LoadedModule>;
}

/// Loads shared libraries through the platform loader
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeModuleLoader;

impl ModuleLoader for NativeModuleLoader {
    fn load(&self, path: &Path) -> PluginResult<LoadedModule> {
        tracing::debug!("Loading module: {}", path.display());

        // Load the library
        let library = unsafe { Library::new(path).map_err(|e| PluginError::load(path, e))? };

        // A module without the entry point declares no plugins
        let registrar = {
            let register: Result<Symbol<PluginRegisterFn>, _> = unsafe { library.get(REGISTER_SYMBOL) };
            match register {
                Ok(register) => {
                    let mut registrar = PluginRegistrar::new();
                    unsafe { register(&mut registrar) };
                    registrar
                }
                Err(e) => {
                    tracing::debug!("No plugin entry point in {}: {}", path.display(), e);
                    PluginRegistrar::new()
                }
            }
        };

        tracing::debug!("Module {} declares {} plugin(s)", path.display(), registrar.len());
        Ok(LoadedModule::from_library(path, registrar, library))
    }
}
