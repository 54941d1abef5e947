use arena_plugins::semver::Version;
use arena_plugins::{async_trait, export_plugins, ArenaData, ArenaPlugin, Card};

/// Scores every card by its position and adds a pick hint
#[derive(Default)]
pub struct TierPlugin;

#[async_trait]
impl ArenaPlugin for TierPlugin {
    fn name(&self) -> &str {
        "Tier fixture"
    }

    fn author(&self) -> &str {
        "arena-plugins tests"
    }

    fn version(&self) -> Version {
        Version::new(1, 4, 0)
    }

    async fn get_card_values(
        &self,
        _arena: &ArenaData,
        new_cards: &[Card],
        default_values: &[String],
    ) -> Option<Vec<String>> {
        let mut values: Vec<String> = new_cards
            .iter()
            .zip(default_values)
            .map(|(card, value)| format!("{}={}", card.id, value))
            .collect();
        values.push("tier".to_string());
        Some(values)
    }
}

export_plugins!(TierPlugin);
