//! # Configuration
//!
//! Client configuration: where the API lives, how its endpoints are named,
//! and where the session is persisted.

pub mod client;

pub use client::{ApiPaths, ClientConfig, ConfigError};
