//! Builders for constructing configuration instances in tests.

pub mod config;

pub use config::ConfigBuilder;
