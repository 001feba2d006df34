//! Configuration loading for the storefront client.
//!
//! Uses figment to layer built-in defaults, an optional YAML file, and
//! `STOREFRONT_*` environment variables.

pub mod schema;

pub use schema::{Config, LogConfig, LogFormat};
