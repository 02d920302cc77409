//! Core order lifecycle engine for the eats order backend.
//!
//! This module provides the main orchestration logic for the order system,
//! coordinating storage, catalog lookups, the order state machine, and the
//! event bus to run the complete order lifecycle. It includes the pluggable
//! factory pattern for building engine instances from configuration.

pub mod builder;
pub mod engine;
pub mod policy;
pub mod pricing;
pub mod service;
pub mod state;

pub use builder::{BuilderError, ServiceBuilder, ServiceFactories};
pub use engine::{event_bus::EventBus, EngineError, OrderEngine};
pub use service::{OrderError, OrderService};
pub use state::{OrderStateError, OrderStateMachine};
