//! proctor-store: persistent collection storage and configuration.
//!
//! Implements the `KeyValueStore` trait on top of a data directory and
//! loads the layered `proctor.toml` configuration.

pub mod config;
pub mod error;
pub mod fs;

pub use config::{load_config, load_config_from, open_store, ProctorConfig, SessionSettings};
pub use error::StoreError;
pub use fs::JsonFileStore;
