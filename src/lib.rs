//! Typed startup configuration loaded from an `app.env` file.
//!
//! [`config::init`] reads `./app.env` once and returns an owned
//! [`EnvConfig`]. Pass it by reference to anything that needs it.

pub mod config;
pub mod models;
pub mod report;

pub use config::{ConfigError, ConfigFormat, ConfigSource};
pub use models::EnvConfig;
