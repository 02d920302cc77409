//! Builder pattern for constructing order engines.
//!
//! This module provides a builder that wires up all the services needed by
//! an [`OrderEngine`] from configuration and a set of factory functions, so
//! the binary decides which implementations are compiled in.

use crate::engine::{event_bus::EventBus, OrderEngine};
use crate::service::OrderService;
use crate::state::OrderStateMachine;
use eats_catalog::{seed::seed_catalog, CatalogError, CatalogInterface, CatalogService};
use eats_config::Config;
use eats_storage::{StorageError, StorageInterface, StorageService};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while building an engine.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Container for the factory functions needed to build an engine.
///
/// Factories are keyed by implementation name; only names that also appear
/// in the configuration are instantiated.
pub struct ServiceFactories<SF, CF> {
	pub storage_factories: HashMap<String, SF>,
	pub catalog_factories: HashMap<String, CF>,
}

/// Builder for constructing an [`OrderEngine`] with pluggable implementations.
pub struct ServiceBuilder {
	config: Config,
}

impl ServiceBuilder {
	/// Creates a new builder with the given configuration.
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Builds the engine using the provided factories.
	///
	/// Every configured implementation with a matching factory is
	/// instantiated; the configured primary is then promoted to back the
	/// corresponding service. Catalog seed data, when present, is loaded
	/// before the engine is returned.
	pub async fn build<SF, CF>(
		self,
		factories: ServiceFactories<SF, CF>,
	) -> Result<OrderEngine, BuilderError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>,
		CF: Fn(&toml::Value, Arc<StorageService>) -> Result<Box<dyn CatalogInterface>, CatalogError>,
	{
		// Create storage implementations
		let mut storage_impls = HashMap::new();
		for (name, implementation_config) in &self.config.storage.implementations {
			if let Some(factory) = factories.storage_factories.get(name) {
				match factory(implementation_config) {
					Ok(implementation) => {
						storage_impls.insert(name.clone(), implementation);
						let is_primary = &self.config.storage.primary == name;
						tracing::info!(component = "storage", implementation = %name, enabled = %is_primary, "Loaded");
					}
					Err(e) => {
						tracing::error!(
							component = "storage",
							implementation = %name,
							error = %e,
							"Failed to create storage implementation"
						);
						return Err(BuilderError::Config(format!(
							"Failed to create storage implementation '{}': {}",
							name, e
						)));
					}
				}
			}
		}

		if storage_impls.is_empty() {
			return Err(BuilderError::Config(
				"No valid storage implementations available".into(),
			));
		}

		let primary_storage = &self.config.storage.primary;
		let storage_backend = storage_impls.remove(primary_storage).ok_or_else(|| {
			BuilderError::MissingComponent(format!(
				"storage implementation '{}'",
				primary_storage
			))
		})?;
		let storage = Arc::new(StorageService::new(storage_backend));

		// Create catalog implementations
		let mut catalog_impls = HashMap::new();
		for (name, implementation_config) in &self.config.catalog.implementations {
			if let Some(factory) = factories.catalog_factories.get(name) {
				match factory(implementation_config, storage.clone()) {
					Ok(implementation) => {
						catalog_impls.insert(name.clone(), implementation);
						let is_primary = &self.config.catalog.primary == name;
						tracing::info!(component = "catalog", implementation = %name, enabled = %is_primary, "Loaded");
					}
					Err(e) => {
						tracing::error!(
							component = "catalog",
							implementation = %name,
							error = %e,
							"Failed to create catalog implementation"
						);
						return Err(BuilderError::Config(format!(
							"Failed to create catalog implementation '{}': {}",
							name, e
						)));
					}
				}
			}
		}

		if catalog_impls.is_empty() {
			return Err(BuilderError::Config(
				"No valid catalog implementations available".into(),
			));
		}

		let primary_catalog = &self.config.catalog.primary;
		let catalog_backend = catalog_impls.remove(primary_catalog).ok_or_else(|| {
			BuilderError::MissingComponent(format!(
				"catalog implementation '{}'",
				primary_catalog
			))
		})?;
		let catalog = Arc::new(CatalogService::new(catalog_backend));

		// Load fixture data before the engine starts serving
		if let Some(seed) = &self.config.catalog.seed {
			seed_catalog(&storage, &seed.restaurants, &seed.dishes)
				.await
				.map_err(|e| BuilderError::Config(format!("Failed to seed catalog: {}", e)))?;
		}

		let event_bus = EventBus::new(self.config.events.channel_capacity);
		let state_machine = Arc::new(OrderStateMachine::new(storage.clone()));
		let orders = Arc::new(OrderService::new(
			storage.clone(),
			catalog.clone(),
			state_machine,
			event_bus.clone(),
		));

		Ok(OrderEngine::new(
			self.config,
			storage,
			catalog,
			orders,
			event_bus,
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use eats_catalog::CatalogFactory;
	use eats_config::builders::ConfigBuilder;
	use eats_config::CatalogSeed;
	use eats_storage::StorageFactory;
	use eats_types::{Dish, Restaurant};

	fn storage_factories() -> HashMap<String, StorageFactory> {
		eats_storage::get_all_implementations()
			.into_iter()
			.map(|(name, factory)| (name.to_string(), factory))
			.collect()
	}

	fn catalog_factories() -> HashMap<String, CatalogFactory> {
		eats_catalog::get_all_implementations()
			.into_iter()
			.map(|(name, factory)| (name.to_string(), factory))
			.collect()
	}

	#[tokio::test]
	async fn test_build_with_memory_backends() {
		let config = ConfigBuilder::new().build();

		let engine = ServiceBuilder::new(config)
			.build(ServiceFactories {
				storage_factories: storage_factories(),
				catalog_factories: catalog_factories(),
			})
			.await
			.unwrap();

		assert_eq!(engine.config().service.id, "test-eats");
	}

	#[tokio::test]
	async fn test_build_seeds_catalog() {
		let config = ConfigBuilder::new()
			.seed(CatalogSeed {
				restaurants: vec![Restaurant {
					id: "r-1".to_string(),
					name: "Trattoria".to_string(),
					address: "1 Test St".to_string(),
					owner_id: "owner-1".to_string(),
				}],
				dishes: vec![Dish {
					id: "d-1".to_string(),
					restaurant_id: "r-1".to_string(),
					name: "Carbonara".to_string(),
					description: None,
					price: "10.00".parse().unwrap(),
					options: vec![],
				}],
			})
			.build();

		let engine = ServiceBuilder::new(config)
			.build(ServiceFactories {
				storage_factories: storage_factories(),
				catalog_factories: catalog_factories(),
			})
			.await
			.unwrap();

		let restaurant = engine.catalog().find_restaurant("r-1").await.unwrap();
		assert_eq!(restaurant.unwrap().name, "Trattoria");
		let dish = engine.catalog().find_dish("d-1").await.unwrap();
		assert!(dish.is_some());
	}

	#[tokio::test]
	async fn test_build_without_primary_factory() {
		// The configured primary has no registered factory, nothing loads
		let config = ConfigBuilder::new()
			.storage_primary("redis".to_string())
			.build();

		let result = ServiceBuilder::new(config)
			.build(ServiceFactories {
				storage_factories: storage_factories(),
				catalog_factories: catalog_factories(),
			})
			.await;

		assert!(matches!(result, Err(BuilderError::Config(_))));
	}
}
