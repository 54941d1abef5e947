pub mod arena;
pub mod card;
pub mod event;

pub use arena::{ArenaData, PickIndex, PluginState};
pub use card::Card;
pub use event::ArenaEvent;
