//! Plugin registry integration tests
//! Run with: cargo test --test registry_test

use std::path::Path;
use std::sync::{Arc, Mutex, Once};

use arena_plugins::infrastructure::plugins::{LoadedModule, ModuleLoader};
use arena_plugins::semver::Version;
use arena_plugins::{
    async_trait, ArenaData, ArenaPlugin, Card, DispatchMode, LoadFailurePolicy, PickIndex,
    PluginConfig, PluginRegistrar, PluginRegistry, PluginResult, PluginState,
};

static INIT: Once = Once::new();

fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Call log shared by every fake plugin: (plugin, event) pairs
type CallLog = Arc<Mutex<Vec<(String, String)>>>;

struct Recorder {
    name: String,
    log: CallLog,
}

impl Recorder {
    fn record(&self, event: impl Into<String>) {
        self.log.lock().unwrap().push((self.name.clone(), event.into()));
    }
}

#[async_trait]
impl ArenaPlugin for Recorder {
    fn name(&self) -> &str {
        &self.name
    }

    fn author(&self) -> &str {
        "integration"
    }

    fn version(&self) -> Version {
        Version::new(2, 0, 0)
    }

    async fn get_card_values(
        &self,
        _arena: &ArenaData,
        new_cards: &[Card],
        _default_values: &[String],
    ) -> Option<Vec<String>> {
        self.record("get-card-values");
        let mut values: Vec<String> = new_cards.iter().map(|c| format!("{}@{}", c.id, self.name)).collect();
        values.push("take the first".to_string());
        Some(values)
    }

    async fn new_arena(&self, _arena: &ArenaData) {
        self.record("new-arena");
    }

    async fn heroes_detected(&self, _arena: &ArenaData, hero0: &str, hero1: &str, hero2: &str) {
        self.record(format!("heroes-detected({},{},{})", hero0, hero1, hero2));
    }

    async fn hero_picked(&self, _arena: &ArenaData, hero: &str) {
        self.record(format!("hero-picked({})", hero));
    }

    async fn cards_detected(&self, _arena: &ArenaData, card0: &Card, card1: &Card, card2: &Card) {
        self.record(format!("cards-detected({},{},{})", card0.id, card1.id, card2.id));
    }

    async fn card_picked(&self, _arena: &ArenaData, pick: PickIndex, card: Option<&Card>) {
        let card = card.map(|c| c.id.as_str()).unwrap_or("none");
        self.record(format!("card-picked({},{})", pick.get(), card));
    }

    async fn done(&self, _arena: &ArenaData) {
        self.record("done");
    }

    async fn resume_arena(&self, _arena: &ArenaData, state: PluginState) {
        self.record(format!("resume-arena({})", state.as_str()));
    }

    async fn close_arena(&self, _arena: &ArenaData, state: PluginState) {
        self.record(format!("close-arena({})", state.as_str()));
    }
}

/// Plugin with identity only, every handler left at its default
#[derive(Default)]
struct Silent;

#[async_trait]
impl ArenaPlugin for Silent {
    fn name(&self) -> &str {
        "silent"
    }

    fn author(&self) -> &str {
        "integration"
    }

    fn version(&self) -> Version {
        Version::new(0, 0, 1)
    }
}

/// Treats each module file as a list of plugin names, one per line
///
/// An empty file stands for a module that exports no plugin types.
struct ManifestLoader {
    log: CallLog,
}

impl ModuleLoader for ManifestLoader {
    fn load(&self, path: &Path) -> PluginResult<LoadedModule> {
        let content = std::fs::read_to_string(path)?;
        let mut registrar = PluginRegistrar::new();
        for name in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let name = name.to_string();
            let log = self.log.clone();
            registrar.register_with(name.clone(), move || {
                Ok(Box::new(Recorder {
                    name: name.clone(),
                    log: log.clone(),
                }) as Box<dyn ArenaPlugin>)
            });
        }
        Ok(LoadedModule::new(path, registrar))
    }
}

fn config_for(dir: &Path) -> PluginConfig {
    PluginConfig {
        directory: Some(dir.to_path_buf()),
        extension: "so".to_string(),
        on_load_failure: LoadFailurePolicy::Abort,
        dispatch: DispatchMode::Inline,
    }
}

fn write_module(dir: &Path, file: &str, plugins: &[&str]) {
    std::fs::write(dir.join(file), plugins.join("\n")).unwrap();
}

fn cards() -> [Card; 3] {
    [
        Card::new("CS2_029", "Fireball"),
        Card::new("CS2_022", "Polymorph"),
        Card::new("EX1_277", "Arcane Missiles"),
    ]
}

async fn fire_every_notification(registry: &PluginRegistry, arena: &ArenaData) {
    let [c0, c1, c2] = cards();
    registry.new_arena(arena).await;
    registry.heroes_detected(arena, "Jaina", "Rexxar", "Thrall").await;
    registry.hero_picked(arena, "Jaina").await;
    registry.cards_detected(arena, &c0, &c1, &c2).await;
    registry.card_picked(arena, PickIndex::new(1).unwrap(), Some(&c1)).await;
    registry.done(arena).await;
    registry.resume_arena(arena, PluginState::SearchCards).await;
    registry.close_arena(arena, PluginState::Done).await;
}

#[tokio::test]
async fn test_empty_registry_is_a_no_op() {
    ensure_init();
    let registry = PluginRegistry::new(config_for(Path::new("/nonexistent/arena/plugins")));
    let arena = ArenaData::new("empty");

    fire_every_notification(&registry, &arena).await;
    let values = registry
        .get_card_values(&arena, &cards(), &["1".to_string(), "2".to_string(), "3".to_string()])
        .await;

    assert!(values.is_none());
    assert!(registry.active().is_none());
}

#[tokio::test]
async fn test_missing_directory_loads_nothing() {
    ensure_init();
    let tmp = tempfile::tempdir().unwrap();
    let log = CallLog::default();
    let mut registry = PluginRegistry::with_loader(
        config_for(&tmp.path().join("plugins")),
        ManifestLoader { log },
    );

    assert_eq!(registry.load_plugins().unwrap(), 0);
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_every_event_reaches_only_the_first_plugin() {
    ensure_init();
    let tmp = tempfile::tempdir().unwrap();
    write_module(tmp.path(), "a.so", &["first", "second"]);
    write_module(tmp.path(), "b.so", &["third"]);
    let log = CallLog::default();
    let mut registry = PluginRegistry::with_loader(config_for(tmp.path()), ManifestLoader { log: log.clone() });

    assert_eq!(registry.load_plugins().unwrap(), 3);
    let arena = ArenaData::new("run");
    fire_every_notification(&registry, &arena).await;
    registry.get_card_values(&arena, &cards(), &[]).await;

    let calls = log.lock().unwrap().clone();
    assert_eq!(calls.len(), 9);
    assert!(calls.iter().all(|(plugin, _)| plugin == "first"));
    let events: Vec<_> = calls.iter().map(|(_, e)| e.as_str()).collect();
    assert_eq!(
        events,
        vec![
            "new-arena",
            "heroes-detected(Jaina,Rexxar,Thrall)",
            "hero-picked(Jaina)",
            "cards-detected(CS2_029,CS2_022,EX1_277)",
            "card-picked(1,CS2_022)",
            "done",
            "resume-arena(search-cards)",
            "close-arena(done)",
            "get-card-values",
        ]
    );
}

#[tokio::test]
async fn test_card_values_returned_unmodified() {
    ensure_init();
    let log = CallLog::default();
    let mut registry = PluginRegistry::default();
    registry.register(Arc::new(Recorder { name: "solo".to_string(), log }));

    let defaults = vec!["80".to_string(), "75".to_string(), "60".to_string()];
    let values = registry.get_card_values(&ArenaData::default(), &cards(), &defaults).await;

    assert_eq!(
        values,
        Some(vec![
            "CS2_029@solo".to_string(),
            "CS2_022@solo".to_string(),
            "EX1_277@solo".to_string(),
            "take the first".to_string(),
        ])
    );
}

#[tokio::test]
async fn test_default_handlers_have_no_opinion() {
    ensure_init();
    let log = CallLog::default();
    let mut registry = PluginRegistry::default();
    registry.register(Arc::new(Silent));
    registry.register(Arc::new(Recorder { name: "shadowed".to_string(), log: log.clone() }));

    fire_every_notification(&registry, &ArenaData::default()).await;
    let values = registry.get_card_values(&ArenaData::default(), &cards(), &[]).await;

    assert!(values.is_none());
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_reload_replaces_previous_plugins() {
    ensure_init();
    let tmp = tempfile::tempdir().unwrap();
    write_module(tmp.path(), "set_a.so", &["alpha"]);
    let log = CallLog::default();
    let mut registry = PluginRegistry::with_loader(config_for(tmp.path()), ManifestLoader { log: log.clone() });

    assert_eq!(registry.load_plugins().unwrap(), 1);
    registry.new_arena(&ArenaData::default()).await;

    std::fs::remove_file(tmp.path().join("set_a.so")).unwrap();
    write_module(tmp.path(), "set_b.so", &["beta"]);
    assert_eq!(registry.load_plugins().unwrap(), 1);
    registry.new_arena(&ArenaData::default()).await;
    registry.done(&ArenaData::default()).await;

    let calls = log.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![
            ("alpha".to_string(), "new-arena".to_string()),
            ("beta".to_string(), "new-arena".to_string()),
            ("beta".to_string(), "done".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_reload_is_idempotent() {
    ensure_init();
    let tmp = tempfile::tempdir().unwrap();
    write_module(tmp.path(), "a.so", &["alpha", "beta"]);
    let log = CallLog::default();
    let mut registry = PluginRegistry::with_loader(config_for(tmp.path()), ManifestLoader { log });

    assert_eq!(registry.load_plugins().unwrap(), 2);
    assert_eq!(registry.load_plugins().unwrap(), 2);
    let names: Vec<_> = registry.descriptors().into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["alpha", "beta"]);
}

#[tokio::test]
async fn test_module_without_plugin_types_contributes_nothing() {
    ensure_init();
    let tmp = tempfile::tempdir().unwrap();
    write_module(tmp.path(), "helpers.so", &[]);
    write_module(tmp.path(), "readme.txt", &["ignored"]);
    let log = CallLog::default();
    let mut registry = PluginRegistry::with_loader(config_for(tmp.path()), ManifestLoader { log });

    assert_eq!(registry.load_plugins().unwrap(), 0);
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_no_valid_pick_passes_through() {
    ensure_init();
    let log = CallLog::default();
    let mut registry = PluginRegistry::default();
    registry.register(Arc::new(Recorder { name: "picker".to_string(), log: log.clone() }));

    registry.card_picked(&ArenaData::default(), PickIndex::NONE, None).await;

    assert_eq!(
        *log.lock().unwrap(),
        vec![("picker".to_string(), "card-picked(-1,none)".to_string())]
    );
}

#[tokio::test]
async fn test_native_loader_abort_and_skip() {
    ensure_init();
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("garbage.so"), b"not an object file").unwrap();

    let mut aborting = PluginRegistry::new(config_for(tmp.path()));
    assert!(aborting.load_plugins().is_err());
    assert!(aborting.is_empty());

    let config = PluginConfig {
        on_load_failure: LoadFailurePolicy::Skip,
        ..config_for(tmp.path())
    };
    let mut skipping = PluginRegistry::new(config);
    assert_eq!(skipping.load_plugins().unwrap(), 0);
}

#[tokio::test]
async fn test_builtin_registered_after_discovery() {
    ensure_init();
    let tmp = tempfile::tempdir().unwrap();
    write_module(tmp.path(), "a.so", &["discovered"]);
    let log = CallLog::default();
    let mut registry = PluginRegistry::with_loader(config_for(tmp.path()), ManifestLoader { log: log.clone() });
    registry.load_plugins().unwrap();
    registry.register(Arc::new(Recorder { name: "builtin".to_string(), log: log.clone() }));

    registry.hero_picked(&ArenaData::default(), "Rexxar").await;

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.active().unwrap().plugin().name(), "discovered");
    assert_eq!(
        *log.lock().unwrap(),
        vec![("discovered".to_string(), "hero-picked(Rexxar)".to_string())]
    );
}
