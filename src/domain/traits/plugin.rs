use async_trait::async_trait;
use semver::Version;

use crate::domain::entities::{ArenaData, Card, PickIndex, PluginState};

/// Capability contract for arena plugins
///
/// Identity is required. Every event handler is optional: the default
/// bodies do nothing, so a plugin overrides only the events it cares about.
#[async_trait]
pub trait ArenaPlugin: Send + Sync {
    /// Plugin name
    fn name(&self) -> &str;

    /// Plugin author
    fn author(&self) -> &str;

    /// Plugin version
    fn version(&self) -> Version;

    /// Called when three new cards are detected
    ///
    /// `default_values` holds the host's tier value for each card. Return
    /// three card values and an optional fourth advice string, or `None`
    /// to keep the host's values.
    async fn get_card_values(
        &self,
        _arena: &ArenaData,
        _new_cards: &[Card],
        _default_values: &[String],
    ) -> Option<Vec<String>> {
        None
    }

    /// Called when a new arena is started
    async fn new_arena(&self, _arena: &ArenaData) {}

    /// Called when the three hero choices are detected
    async fn heroes_detected(&self, _arena: &ArenaData, _hero0: &str, _hero1: &str, _hero2: &str) {}

    /// Called when a hero is picked
    async fn hero_picked(&self, _arena: &ArenaData, _hero: &str) {}

    /// Called when the three card choices are detected
    async fn cards_detected(&self, _arena: &ArenaData, _card0: &Card, _card1: &Card, _card2: &Card) {}

    /// Called when a card is picked
    ///
    /// `card` is `None` when the pick could not be matched to a card.
    async fn card_picked(&self, _arena: &ArenaData, _pick: PickIndex, _card: Option<&Card>) {}

    /// Called when all cards are picked
    async fn done(&self, _arena: &ArenaData) {}

    /// Called when the helper window is opened
    async fn resume_arena(&self, _arena: &ArenaData, _state: PluginState) {}

    /// Called when the helper window is closed
    async fn close_arena(&self, _arena: &ArenaData, _state: PluginState) {}
}
