//! Storage-backed catalog implementation for the order service.
//!
//! This module provides a catalog implementation that reads restaurants and
//! dishes from the shared storage service, under their own namespaces. It is
//! typically populated at startup from seed data.

use crate::{CatalogError, CatalogFactory, CatalogInterface, CatalogRegistry};
use async_trait::async_trait;
use eats_storage::{StorageError, StorageService};
use eats_types::{
	ConfigSchema, Dish, ImplementationRegistry, Restaurant, Schema, StorageKey, ValidationError,
};
use std::sync::Arc;

/// Catalog implementation backed by the shared storage service.
pub struct StorageCatalog {
	/// Storage holding the restaurant and dish records.
	storage: Arc<StorageService>,
}

impl StorageCatalog {
	/// Creates a new StorageCatalog over the given storage service.
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}
}

#[async_trait]
impl CatalogInterface for StorageCatalog {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(StorageCatalogSchema)
	}

	async fn find_restaurant(&self, id: &str) -> Result<Option<Restaurant>, CatalogError> {
		match self
			.storage
			.retrieve::<Restaurant>(StorageKey::Restaurants.as_str(), id)
			.await
		{
			Ok(restaurant) => Ok(Some(restaurant)),
			Err(StorageError::NotFound) => Ok(None),
			Err(e) => Err(CatalogError::Backend(e.to_string())),
		}
	}

	async fn find_dish(&self, id: &str) -> Result<Option<Dish>, CatalogError> {
		match self
			.storage
			.retrieve::<Dish>(StorageKey::Dishes.as_str(), id)
			.await
		{
			Ok(dish) => Ok(Some(dish)),
			Err(StorageError::NotFound) => Ok(None),
			Err(e) => Err(CatalogError::Backend(e.to_string())),
		}
	}

	async fn restaurants_owned_by(&self, owner_id: &str) -> Result<Vec<Restaurant>, CatalogError> {
		let mut owned: Vec<Restaurant> = self
			.storage
			.retrieve_all::<Restaurant>(StorageKey::Restaurants.as_str())
			.await
			.map_err(|e| CatalogError::Backend(e.to_string()))?
			.into_iter()
			.filter(|restaurant| restaurant.owner_id == owner_id)
			.collect();

		// Storage listing order is unspecified, sort for stable output
		owned.sort_by(|a, b| a.id.cmp(&b.id));
		Ok(owned)
	}
}

/// Configuration schema for StorageCatalog.
pub struct StorageCatalogSchema;

impl ConfigSchema for StorageCatalogSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		// The storage catalog has no required configuration
		let schema = Schema::new(vec![], vec![]);
		schema.validate(config)
	}
}

/// Factory function to create a storage-backed catalog from configuration.
///
/// Configuration parameters:
/// - None required for the storage catalog
pub fn create_catalog(
	_config: &toml::Value,
	storage: Arc<StorageService>,
) -> Result<Box<dyn CatalogInterface>, CatalogError> {
	Ok(Box::new(StorageCatalog::new(storage)))
}

/// Registry entry for the storage catalog implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "storage";
	type Factory = CatalogFactory;

	fn factory() -> Self::Factory {
		create_catalog
	}
}

impl CatalogRegistry for Registry {}
