//! Module entry point - How a loadable module hands its plugins to the host

use crate::domain::traits::ArenaPlugin;

/// Symbol every plugin module exports
pub const REGISTER_SYMBOL: &[u8] = b"arena_plugin_register";

/// Signature of the exported registration function
///
/// Modules must be built with the same compiler and crate version as the host.
#[allow(improper_ctypes_definitions)]
pub type PluginRegisterFn = unsafe extern "C" fn(registrar: &mut PluginRegistrar);

/// Constructor for one plugin type
pub type PluginFactory = Box<dyn Fn() -> Result<Box<dyn ArenaPlugin>, String> + Send + Sync>;

/// Collects the plugin factories a module declares
#[derive(Default)]
pub struct PluginRegistrar {
    factories: Vec<(String, PluginFactory)>,
}

impl PluginRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin type built through its `Default` impl
    pub fn register<P>(&mut self)
    where
        P: ArenaPlugin + Default + 'static,
    {
        self.register_with(std::any::type_name::<P>(), || {
            Ok(Box::new(P::default()) as Box<dyn ArenaPlugin>)
        });
    }

    /// Register a plugin with a fallible constructor
    pub fn register_with<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Box<dyn ArenaPlugin>, String> + Send + Sync + 'static,
    {
        self.factories.push((name.into(), Box::new(factory)));
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub(crate) fn into_factories(self) -> Vec<(String, PluginFactory)> {
        self.factories
    }
}

/// Export the registration entry point for a plugin module
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct TierListPlugin;
///
/// #[arena_plugins::async_trait]
/// impl arena_plugins::ArenaPlugin for TierListPlugin {
///     fn name(&self) -> &str { "Tier list" }
///     fn author(&self) -> &str { "someone" }
///     fn version(&self) -> arena_plugins::semver::Version {
///         arena_plugins::semver::Version::new(1, 0, 0)
///     }
/// }
///
/// arena_plugins::export_plugins!(TierListPlugin);
/// ```
#[macro_export]
macro_rules! export_plugins {
    ($($plugin:ty),+ $(,)?) => {
        #[no_mangle]
        #[allow(improper_ctypes_definitions)]
        pub extern "C" fn arena_plugin_register(registrar: &mut $crate::PluginRegistrar) {
            $( registrar.register::<$plugin>(); )+
        }
    };
}
