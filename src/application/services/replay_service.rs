use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::application::errors::ConfigError;
use crate::domain::entities::{ArenaData, ArenaEvent, Card};
use crate::infrastructure::plugins::PluginRegistry;

/// Scripted arena run, as read from YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ReplayScript {
    pub arena: ArenaData,
    pub steps: Vec<ReplayStep>,
}

/// One step of a replay: a notification or a card value request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplayStep {
    Event(ArenaEvent),
    CardValues {
        #[serde(rename = "card-values")]
        card_values: CardValuesRequest,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CardValuesRequest {
    pub cards: Vec<Card>,
    pub default_values: Vec<String>,
}

/// What the active plugin answered during a replay
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayReport {
    pub events: usize,
    pub card_values: Vec<Option<Vec<String>>>,
    pub arena: ArenaData,
}

impl ReplayScript {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Parse(format!("Failed to read replay script: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse replay script: {}", e)))
    }
}

/// Plays the host's side of an arena run against a registry
///
/// The arena context is updated the way the host would before each
/// notification goes out.
pub struct ReplayService<'a> {
    registry: &'a PluginRegistry,
}

impl<'a> ReplayService<'a> {
    pub fn new(registry: &'a PluginRegistry) -> Self {
        Self { registry }
    }

    pub async fn run(&self, script: ReplayScript) -> ReplayReport {
        let mut report = ReplayReport {
            arena: script.arena,
            ..ReplayReport::default()
        };

        for step in script.steps {
            match step {
                ReplayStep::Event(event) => {
                    record(&mut report.arena, &event);
                    self.registry.dispatch(&report.arena, event).await;
                    report.events += 1;
                }
                ReplayStep::CardValues { card_values } => {
                    let values = self
                        .registry
                        .get_card_values(&report.arena, &card_values.cards, &card_values.default_values)
                        .await;
                    tracing::debug!("Card values: {:?}", values);
                    report.card_values.push(values);
                }
            }
        }

        report
    }
}

fn record(arena: &mut ArenaData, event: &ArenaEvent) {
    match event {
        ArenaEvent::NewArena => *arena = ArenaData::new(arena.deck_name.clone()),
        ArenaEvent::HeroesDetected { heroes } => arena.detected_heroes = heroes.to_vec(),
        ArenaEvent::HeroPicked { hero } => arena.picked_hero = Some(hero.clone()),
        ArenaEvent::CardsDetected { cards } => arena.detected_cards.push(cards.clone()),
        ArenaEvent::CardPicked { card: Some(card), .. } => arena.picked_cards.push(card.clone()),
        _ => {}
    }
}
