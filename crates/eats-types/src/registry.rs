//! Registry trait for self-registering implementations.
//!
//! This module provides the base trait that all pluggable implementations
//! must implement to register themselves with their configuration name and
//! factory function.

/// Base trait for implementation registries.
///
/// Each implementation module (storage backends, catalog backends) must
/// provide a Registry struct that implements this trait. This ensures that
/// every implementation declares its configuration name and provides a
/// factory function.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation.
	///
	/// This should match the key used in the TOML configuration, for example:
	/// - "memory" for storage.implementations.memory
	/// - "storage" for catalog.implementations.storage
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	///
	/// Each module defines its own factory type, for example a StorageFactory
	/// for storage implementations.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
