//! Infrastructure layer: storage adapters behind the workflow ports, the unit
//! of work, and configuration loading.

pub mod config;
pub mod in_memory;
pub mod store;

pub use config::{load_settings, ConfigError};
pub use in_memory::InMemoryBackend;

#[cfg(test)]
mod integration_tests;
