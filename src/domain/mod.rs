//! Domain layer - Arena types and the plugin contract
//!
//! This layer contains:
//! - Entities: Arena context, cards, host state snapshots
//! - Traits: The capability contract every plugin implements

pub mod entities;
pub mod traits;
