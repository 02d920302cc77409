//! Configuration builder for creating test and development configurations.
//!
//! This module provides utilities for constructing Config instances with
//! sensible defaults, particularly useful for testing scenarios.

use crate::{
	CatalogConfig, CatalogSeed, Config, EventsConfig, ServiceConfig, StorageConfig,
};
use std::collections::HashMap;

/// Builder for creating `Config` instances with a fluent API.
///
/// Provides an easy way to create test configurations with sensible defaults.
/// The built configuration registers the "memory" storage and "storage"
/// catalog implementations with empty settings, which is enough for the
/// in-process backends used in tests.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	service_id: String,
	channel_capacity: usize,
	storage_primary: String,
	catalog_primary: String,
	seed: Option<CatalogSeed>,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	/// Creates a new `ConfigBuilder` with default values suitable for testing.
	pub fn new() -> Self {
		Self {
			service_id: "test-eats".to_string(),
			channel_capacity: 16,
			storage_primary: "memory".to_string(),
			catalog_primary: "storage".to_string(),
			seed: None,
		}
	}

	/// Sets the service ID.
	pub fn service_id(mut self, id: String) -> Self {
		self.service_id = id;
		self
	}

	/// Sets the broadcast channel capacity.
	pub fn channel_capacity(mut self, capacity: usize) -> Self {
		self.channel_capacity = capacity;
		self
	}

	/// Sets the primary storage implementation.
	pub fn storage_primary(mut self, primary: String) -> Self {
		self.storage_primary = primary;
		self
	}

	/// Sets the primary catalog implementation.
	pub fn catalog_primary(mut self, primary: String) -> Self {
		self.catalog_primary = primary;
		self
	}

	/// Sets the catalog seed data.
	pub fn seed(mut self, seed: CatalogSeed) -> Self {
		self.seed = Some(seed);
		self
	}

	/// Builds the `Config` with the configured values.
	pub fn build(self) -> Config {
		let empty = toml::Value::Table(toml::map::Map::new());

		let mut storage_implementations = HashMap::new();
		storage_implementations.insert(self.storage_primary.clone(), empty.clone());

		let mut catalog_implementations = HashMap::new();
		catalog_implementations.insert(self.catalog_primary.clone(), empty);

		Config {
			service: ServiceConfig {
				id: self.service_id,
			},
			events: EventsConfig {
				channel_capacity: self.channel_capacity,
			},
			storage: StorageConfig {
				primary: self.storage_primary,
				implementations: storage_implementations,
			},
			catalog: CatalogConfig {
				primary: self.catalog_primary,
				implementations: catalog_implementations,
				seed: self.seed,
			},
		}
	}
}
