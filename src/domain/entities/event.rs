use serde::{Deserialize, Serialize};

use super::{ArenaData, Card, PickIndex, PluginState};
use crate::domain::traits::ArenaPlugin;

/// Arena notification without a return value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ArenaEvent {
    NewArena,
    HeroesDetected { heroes: [String; 3] },
    HeroPicked { hero: String },
    CardsDetected { cards: [Card; 3] },
    CardPicked {
        pick: PickIndex,
        #[serde(default)]
        card: Option<Card>,
    },
    Done,
    ResumeArena { state: PluginState },
    CloseArena { state: PluginState },
}

impl ArenaEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ArenaEvent::NewArena => "new-arena",
            ArenaEvent::HeroesDetected { .. } => "heroes-detected",
            ArenaEvent::HeroPicked { .. } => "hero-picked",
            ArenaEvent::CardsDetected { .. } => "cards-detected",
            ArenaEvent::CardPicked { .. } => "card-picked",
            ArenaEvent::Done => "done",
            ArenaEvent::ResumeArena { .. } => "resume-arena",
            ArenaEvent::CloseArena { .. } => "close-arena",
        }
    }

    /// Invoke the matching handler on `plugin`
    pub async fn deliver(&self, plugin: &dyn ArenaPlugin, arena: &ArenaData) {
        match self {
            ArenaEvent::NewArena => plugin.new_arena(arena).await,
            ArenaEvent::HeroesDetected { heroes: [h0, h1, h2] } => {
                plugin.heroes_detected(arena, h0, h1, h2).await
            }
            ArenaEvent::HeroPicked { hero } => plugin.hero_picked(arena, hero).await,
            ArenaEvent::CardsDetected { cards: [c0, c1, c2] } => {
                plugin.cards_detected(arena, c0, c1, c2).await
            }
            ArenaEvent::CardPicked { pick, card } => {
                plugin.card_picked(arena, *pick, card.as_ref()).await
            }
            ArenaEvent::Done => plugin.done(arena).await,
            ArenaEvent::ResumeArena { state } => plugin.resume_arena(arena, *state).await,
            ArenaEvent::CloseArena { state } => plugin.close_arena(arena, *state).await,
        }
    }
}
