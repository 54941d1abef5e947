use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use arena_plugins::application::services::{ReplayScript, ReplayService};
use arena_plugins::{ArenaData, Card, Config, ConfigError, PluginRegistry};

#[derive(Parser)]
#[command(name = "arena-plugins")]
#[command(about = "Load arena helper plugins and feed them events", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "arena-plugins.yaml")]
    config: String,

    /// Plugin directory (overrides config)
    #[arg(short, long)]
    plugins_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List discovered plugins
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Ask the active plugin to value three cards
    Score {
        /// Card as ID:NAME, given exactly three times
        #[arg(long = "card", value_parser = parse_card, num_args = 1, required = true)]
        cards: Vec<Card>,
        /// Default tier value for each card, none or exactly three
        #[arg(long = "value")]
        values: Vec<String>,
    },
    /// Replay a scripted arena run against the plugins
    Replay {
        /// YAML script with `arena` and `steps`
        script: PathBuf,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn parse_card(s: &str) -> Result<Card, String> {
    match s.split_once(':') {
        Some((id, name)) if !id.is_empty() => Ok(Card::new(id, name)),
        _ if !s.is_empty() => Ok(Card::new(s, s)),
        _ => Err("card must be ID or ID:NAME".to_string()),
    }
}

/// A draft offers three cards, each with at most one default value
fn check_score_args(cards: &[Card], values: &[String]) -> Result<(), String> {
    if cards.len() != 3 {
        return Err(format!("expected 3 cards, got {}", cards.len()));
    }
    if !values.is_empty() && values.len() != cards.len() {
        return Err(format!("expected 0 or 3 values, got {}", values.len()));
    }
    Ok(())
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            println!("arena-plugins v{}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Commands::InitConfig => init_config(&cli.config),
        command => {
            if let Commands::Score { cards, values } = &command {
                if let Err(e) = check_score_args(cards, values) {
                    tracing::error!("Invalid score arguments: {}", e);
                    return ExitCode::FAILURE;
                }
            }
            let config = match load_config(&cli.config, cli.plugins_dir) {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!("Invalid configuration: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    tracing::error!("Failed to start runtime: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            rt.block_on(run(command, config))
        }
    }
}

fn load_config(config_path: &str, plugins_dir: Option<PathBuf>) -> Result<Config, ConfigError> {
    let mut config = if std::path::Path::new(config_path).exists() {
        Config::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        })
    } else {
        Config::default()
    };
    config.apply_env()?;

    if let Some(dir) = plugins_dir {
        config.plugins.directory = Some(dir);
    }
    Ok(config)
}

async fn run(command: Commands, config: Config) -> ExitCode {
    let mut registry = PluginRegistry::new(config.plugins);
    if let Err(e) = registry.load_plugins() {
        tracing::error!("Failed to load plugins: {}", e);
        return ExitCode::FAILURE;
    }
    tracing::info!("Plugin system initialized with {} plugins", registry.len());

    match command {
        Commands::List { json } => list_plugins(&registry, json),
        Commands::Score { cards, values } => {
            let values = registry
                .get_card_values(&ArenaData::default(), &cards, &values)
                .await;
            match values {
                Some(values) => {
                    for value in values {
                        println!("{}", value);
                    }
                }
                None => println!("No plugin opinion"),
            }
            ExitCode::SUCCESS
        }
        Commands::Replay { script } => {
            let script = match ReplayScript::load(&script) {
                Ok(script) => script,
                Err(e) => {
                    tracing::error!("{}", e);
                    return ExitCode::FAILURE;
                }
            };
            let report = ReplayService::new(&registry).run(script).await;
            print_json(&report)
        }
        Commands::Version | Commands::InitConfig => ExitCode::SUCCESS,
    }
}

fn list_plugins(registry: &PluginRegistry, json: bool) -> ExitCode {
    if json {
        return print_json(&registry.descriptors());
    }

    if registry.is_empty() {
        println!("No plugins loaded");
    }
    for (i, info) in registry.descriptors().iter().enumerate() {
        let marker = if i == 0 { "*" } else { " " };
        let source = info
            .source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in".to_string());
        println!("{} {} v{} by {} ({})", marker, info.name, info.version, info.author, source);
    }
    ExitCode::SUCCESS
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Failed to serialize output: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_config(config_path: &str) -> ExitCode {
    let yaml = match Config::default().to_yaml() {
        Ok(yaml) => yaml,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match std::fs::write(config_path, yaml) {
        Ok(()) => {
            println!("Config written to {}", config_path);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Failed to write config: {}", e);
            ExitCode::FAILURE
        }
    }
}
