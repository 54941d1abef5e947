pub mod plugin;

pub use plugin::ArenaPlugin;
