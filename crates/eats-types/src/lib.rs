//! Common types module for the eats order backend.
//!
//! This module defines the core data types and structures used throughout
//! the order system. It provides a centralized location for shared types
//! to ensure consistency across all components.

/// Restaurant and dish types exposed by the read-only catalog.
pub mod catalog;
/// Event payloads published on the order event bus.
pub mod events;
/// Order types including line items and lifecycle statuses.
pub mod order;
/// Registry trait for self-registering implementations.
pub mod registry;
/// Storage namespaces for managing persistent data.
pub mod storage;
/// Principal and role types supplied by the authentication layer.
pub mod user;
/// Utility functions for timestamps and display formatting.
pub mod utils;
/// Configuration validation types for ensuring type-safe configurations.
pub mod validation;

// Re-export all types for convenient access
pub use catalog::*;
pub use events::*;
pub use order::*;
pub use registry::*;
pub use storage::*;
pub use user::*;
pub use utils::{current_timestamp, truncate_id};
pub use validation::*;
