//! Catalog module for the eats order backend.
//!
//! This module provides read-only access to the restaurants and dishes that
//! orders are placed against. It defines interfaces and services for catalog
//! lookups such as restaurant retrieval, dish retrieval, and ownership queries.

use async_trait::async_trait;
use eats_storage::StorageService;
use eats_types::{ConfigSchema, Dish, ImplementationRegistry, Restaurant};
use std::sync::Arc;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod storage;
}

pub mod seed;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
	/// Error that occurs when the backing store fails.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for catalog implementations.
///
/// This trait must be implemented by any catalog implementation that wants to
/// integrate with the order system. Lookups return `None` for unknown
/// identifiers rather than treating them as errors.
#[async_trait]
pub trait CatalogInterface: Send + Sync {
	/// Returns the configuration schema for this catalog implementation.
	///
	/// This allows each implementation to define its own configuration requirements
	/// with specific validation rules. The schema is used to validate TOML configuration
	/// before initializing the catalog implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Looks up a restaurant by its identifier.
	async fn find_restaurant(&self, id: &str) -> Result<Option<Restaurant>, CatalogError>;

	/// Looks up a dish by its identifier.
	async fn find_dish(&self, id: &str) -> Result<Option<Dish>, CatalogError>;

	/// Returns every restaurant owned by the given principal.
	///
	/// An owner with no restaurants yields an empty vector.
	async fn restaurants_owned_by(&self, owner_id: &str) -> Result<Vec<Restaurant>, CatalogError>;
}

/// Type alias for catalog factory functions.
///
/// This is the function signature that all catalog implementations must provide
/// to create instances of their catalog interface. Implementations receive the
/// shared storage service so catalog data can live alongside order data.
pub type CatalogFactory =
	fn(&toml::Value, Arc<StorageService>) -> Result<Box<dyn CatalogInterface>, CatalogError>;

/// Registry trait for catalog implementations.
///
/// This trait extends the base ImplementationRegistry to specify that
/// catalog implementations must provide a CatalogFactory.
pub trait CatalogRegistry: ImplementationRegistry<Factory = CatalogFactory> {}

/// Get all registered catalog implementations.
///
/// Returns a vector of (name, factory) tuples for all available catalog implementations.
/// This is used by the factory registry to automatically register all implementations.
pub fn get_all_implementations() -> Vec<(&'static str, CatalogFactory)> {
	use implementations::storage;

	vec![(storage::Registry::NAME, storage::Registry::factory())]
}

/// Service that manages catalog lookups.
///
/// This struct provides a high-level interface for catalog access,
/// wrapping an underlying catalog implementation.
pub struct CatalogService {
	/// The underlying catalog implementation.
	implementation: Box<dyn CatalogInterface>,
}

impl CatalogService {
	/// Creates a new CatalogService with the specified implementation.
	///
	/// The implementation must implement the CatalogInterface trait and will be
	/// used for all catalog lookups performed by this service.
	pub fn new(implementation: Box<dyn CatalogInterface>) -> Self {
		Self { implementation }
	}

	/// Looks up a restaurant by its identifier.
	///
	/// This method delegates to the underlying implementation's find_restaurant method.
	pub async fn find_restaurant(&self, id: &str) -> Result<Option<Restaurant>, CatalogError> {
		self.implementation.find_restaurant(id).await
	}

	/// Looks up a dish by its identifier.
	///
	/// This method delegates to the underlying implementation's find_dish method.
	pub async fn find_dish(&self, id: &str) -> Result<Option<Dish>, CatalogError> {
		self.implementation.find_dish(id).await
	}

	/// Returns every restaurant owned by the given principal.
	///
	/// This method delegates to the underlying implementation's restaurants_owned_by method.
	pub async fn restaurants_owned_by(
		&self,
		owner_id: &str,
	) -> Result<Vec<Restaurant>, CatalogError> {
		self.implementation.restaurants_owned_by(owner_id).await
	}
}
