//! Application layer - Use cases driven through the plugin registry
//!
//! This layer contains:
//! - Errors: Plugin and configuration errors
//! - Services: Event replay against a loaded registry

pub mod errors;
pub mod services;
