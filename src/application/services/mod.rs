//! Application services
//!
//! - Replay: Drive a registry through a scripted arena run

pub mod replay_service;

pub use replay_service::{CardValuesRequest, ReplayReport, ReplayScript, ReplayService, ReplayStep};
