// Public API for integration tests and transport bridges

pub mod catalog;
pub mod config;
pub mod protocol;
pub mod render;
pub mod state;
pub mod types;
pub mod ws;
