use serde::{Deserialize, Serialize};

use super::Card;
use crate::application::errors::ConfigError;

/// Accumulated state of the current arena run
///
/// Handed to every plugin call as-is. The registry never looks inside.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ArenaData {
    pub deck_name: String,
    pub detected_heroes: Vec<String>,
    pub picked_hero: Option<String>,
    /// Every triple of cards offered so far, oldest first
    pub detected_cards: Vec<[Card; 3]>,
    pub picked_cards: Vec<Card>,
}

impl ArenaData {
    pub fn new(deck_name: impl Into<String>) -> Self {
        Self {
            deck_name: deck_name.into(),
            ..Self::default()
        }
    }
}

/// Host detection state, passed along when the helper window opens or closes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PluginState {
    #[default]
    Idle,
    SearchHeroes,
    SearchBigHero,
    DetectedHeroes,
    SearchCards,
    SearchCardValues,
    DetectedCards,
    Done,
}

impl PluginState {
    pub fn as_str(&self) -> &str {
        match self {
            PluginState::Idle => "idle",
            PluginState::SearchHeroes => "search-heroes",
            PluginState::SearchBigHero => "search-big-hero",
            PluginState::DetectedHeroes => "detected-heroes",
            PluginState::SearchCards => "search-cards",
            PluginState::SearchCardValues => "search-card-values",
            PluginState::DetectedCards => "detected-cards",
            PluginState::Done => "done",
        }
    }
}

/// Index of the picked card, in the range -1..=2
///
/// -1 means no valid pick was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct PickIndex(i32);

impl PickIndex {
    pub const NONE: PickIndex = PickIndex(-1);

    pub fn new(index: i32) -> Result<Self, ConfigError> {
        if (-1..=2).contains(&index) {
            Ok(Self(index))
        } else {
            Err(ConfigError::InvalidValue(format!(
                "pick index {} out of range -1..=2",
                index
            )))
        }
    }

    pub fn get(self) -> i32 {
        self.0
    }

    /// Slot of the picked card, `None` when no valid pick was detected
    pub fn slot(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }

    pub fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl TryFrom<i32> for PickIndex {
    type Error = ConfigError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        PickIndex::new(value)
    }
}

impl From<PickIndex> for i32 {
    fn from(index: PickIndex) -> Self {
        index.0
    }
}
