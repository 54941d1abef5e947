//! Plugin registry - Discovers plugins and forwards arena events to them
//!
//! Every event goes to the first registered plugin only. The rest stay
//! loaded but never receive anything.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use chrono::{DateTime, Utc};
use libloading::Library;
use semver::Version;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::application::errors::{PluginError, PluginResult};
use crate::domain::entities::{ArenaData, ArenaEvent, Card, PickIndex, PluginState};
use crate::domain::traits::ArenaPlugin;
use crate::infrastructure::config::{DispatchMode, LoadFailurePolicy, PluginConfig};
use super::discovery;
use super::loader::{ModuleLoader, NativeModuleLoader};

/// A plugin instance together with the library its code lives in
///
/// The instance is declared first so it is dropped before the library.
#[derive(Clone)]
pub struct RegisteredPlugin {
    instance: Arc<dyn ArenaPlugin>,
    #[allow(dead_code)]
    library: Option<Arc<Library>>,
    source: Option<PathBuf>,
    loaded_at: DateTime<Utc>,
}

impl RegisteredPlugin {
    pub fn plugin(&self) -> &dyn ArenaPlugin {
        self.instance.as_ref()
    }

    /// Module file the plugin came from, `None` for in-process plugins
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn info(&self) -> PluginInfo {
        PluginInfo {
            name: self.instance.name().to_string(),
            author: self.instance.author().to_string(),
            version: self.instance.version(),
            source: self.source.clone(),
            loaded_at: self.loaded_at,
        }
    }
}

/// Plugin information for listing
#[derive(Debug, Clone, Serialize)]
pub struct PluginInfo {
    pub name: String,
    pub author: String,
    pub version: Version,
    pub source: Option<PathBuf>,
    pub loaded_at: DateTime<Utc>,
}

/// Ordered set of plugin instances with first-wins dispatch
pub struct PluginRegistry {
    plugins: Vec<RegisteredPlugin>,
    config: PluginConfig,
    loader: Box<dyn ModuleLoader>,
}

impl PluginRegistry {
    pub fn new(config: PluginConfig) -> Self {
        Self::with_loader(config, NativeModuleLoader)
    }

    pub fn with_loader(config: PluginConfig, loader: impl ModuleLoader + 'static) -> Self {
        Self {
            plugins: Vec::new(),
            config,
            loader: Box::new(loader),
        }
    }

    /// Drop all plugins and rescan the plugin directory
    ///
    /// Returns the number of plugins now registered. A missing directory
    /// or one without modules is not an error. On failure under the
    /// `abort` policy the registry is left empty.
    pub fn load_plugins(&mut self) -> PluginResult<usize> {
        self.clear();

        let dir = self.config.resolve_directory()?;
        let modules = discovery::find_modules(&dir, &self.config.extension, self.config.on_load_failure)?;
        if modules.is_empty() {
            info!("No plugins found in {}", dir.display());
            return Ok(0);
        }

        let mut loaded = Vec::new();
        for path in &modules {
            self.load_module(path, &mut loaded)?;
        }

        for plugin in &loaded {
            info!("Found: {}", plugin.instance.name());
        }
        self.plugins = loaded;
        Ok(self.plugins.len())
    }

    fn load_module(&self, path: &Path, loaded: &mut Vec<RegisteredPlugin>) -> PluginResult<()> {
        let module = match self.loader.load(path) {
            Ok(module) => module,
            Err(e) => return self.on_failure(e),
        };

        for (factory_name, factory) in module.factories() {
            match factory() {
                Ok(instance) => loaded.push(RegisteredPlugin {
                    instance: Arc::from(instance),
                    library: module.library().cloned(),
                    source: Some(module.path().to_path_buf()),
                    loaded_at: Utc::now(),
                }),
                Err(reason) => self.on_failure(PluginError::Instantiate {
                    path: module.path().to_path_buf(),
                    factory: factory_name.clone(),
                    reason,
                })?,
            }
        }
        Ok(())
    }

    fn on_failure(&self, err: PluginError) -> PluginResult<()> {
        match self.config.on_load_failure {
            LoadFailurePolicy::Abort => Err(err),
            LoadFailurePolicy::Skip => {
                warn!("Skipping plugin: {}", err);
                Ok(())
            }
        }
    }

    /// Append an in-process plugin after the discovered ones
    pub fn register(&mut self, plugin: Arc<dyn ArenaPlugin>) {
        info!("Registering plugin: {}", plugin.name());
        self.plugins.push(RegisteredPlugin {
            instance: plugin,
            library: None,
            source: None,
            loaded_at: Utc::now(),
        });
    }

    pub fn clear(&mut self) {
        self.plugins.clear();
    }

    /// The plugin that receives events, if any
    pub fn active(&self) -> Option<&RegisteredPlugin> {
        self.plugins.first()
    }

    pub fn descriptors(&self) -> Vec<PluginInfo> {
        self.plugins.iter().map(RegisteredPlugin::info).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Ask the active plugin for card values
    ///
    /// `None` when no plugin is loaded or the plugin has no opinion.
    pub async fn get_card_values(
        &self,
        arena: &ArenaData,
        new_cards: &[Card],
        default_values: &[String],
    ) -> Option<Vec<String>> {
        let entry = self.active()?;
        debug!(plugin = entry.instance.name(), "Requesting card values");
        entry
            .instance
            .get_card_values(arena, new_cards, default_values)
            .await
    }

    pub async fn new_arena(&self, arena: &ArenaData) {
        self.dispatch(arena, ArenaEvent::NewArena).await
    }

    pub async fn heroes_detected(&self, arena: &ArenaData, hero0: &str, hero1: &str, hero2: &str) {
        let heroes = [hero0.to_string(), hero1.to_string(), hero2.to_string()];
        self.dispatch(arena, ArenaEvent::HeroesDetected { heroes }).await
    }

    pub async fn hero_picked(&self, arena: &ArenaData, hero: &str) {
        let hero = hero.to_string();
        self.dispatch(arena, ArenaEvent::HeroPicked { hero }).await
    }

    pub async fn cards_detected(&self, arena: &ArenaData, card0: &Card, card1: &Card, card2: &Card) {
        let cards = [card0.clone(), card1.clone(), card2.clone()];
        self.dispatch(arena, ArenaEvent::CardsDetected { cards }).await
    }

    pub async fn card_picked(&self, arena: &ArenaData, pick: PickIndex, card: Option<&Card>) {
        let card = card.cloned();
        self.dispatch(arena, ArenaEvent::CardPicked { pick, card }).await
    }

    pub async fn done(&self, arena: &ArenaData) {
        self.dispatch(arena, ArenaEvent::Done).await
    }

    pub async fn resume_arena(&self, arena: &ArenaData, state: PluginState) {
        self.dispatch(arena, ArenaEvent::ResumeArena { state }).await
    }

    pub async fn close_arena(&self, arena: &ArenaData, state: PluginState) {
        self.dispatch(arena, ArenaEvent::CloseArena { state }).await
    }

    /// Forward a notification to the active plugin
    pub async fn dispatch(&self, arena: &ArenaData, event: ArenaEvent) {
        let Some(entry) = self.active() else {
            return;
        };
        debug!(plugin = entry.instance.name(), event = event.kind(), "Dispatching event");

        match self.config.dispatch {
            DispatchMode::Inline => event.deliver(entry.plugin(), arena).await,
            DispatchMode::Detached => match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    // The task keeps its own handle on the library
                    let entry = entry.clone();
                    let arena = arena.clone();
                    handle.spawn(async move {
                        event.deliver(entry.plugin(), &arena).await;
                    });
                }
                Err(_) => {
                    warn!("No async runtime for detached dispatch, running {} inline", event.kind());
                    event.deliver(entry.plugin(), arena).await
                }
            },
        }
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new(PluginConfig::default())
    }
}
