//! Main entry point for the eats order service.
//!
//! This binary runs the complete order lifecycle backend: order intake,
//! kitchen progress, and delivery assignment. It uses a modular architecture
//! with pluggable implementations for different components.

use clap::Parser;
use eats_config::Config;
use eats_core::{OrderEngine, ServiceBuilder, ServiceFactories};
use std::path::PathBuf;

// Import implementations from individual crates
use eats_catalog::implementations::storage::create_catalog as create_storage_catalog;
use eats_storage::implementations::file::create_storage as create_file_storage;
use eats_storage::implementations::memory::create_storage as create_memory_storage;

/// Command-line arguments for the order service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the order service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the order engine with all implementations
/// 5. Runs the engine until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	// Create env filter with default from args
	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started eats service");

	// Load configuration
	let config = Config::from_file(args.config.to_str().unwrap()).await?;
	tracing::info!("Loaded configuration [{}]", config.service.id);

	// Build the engine with implementations
	let engine = build_engine(config).await?;

	// Run until interrupted
	engine.run().await?;

	tracing::info!("Stopped eats service");
	Ok(())
}

/// Macro to create a factory HashMap with the appropriate type aliases
macro_rules! create_factory_map {
    ($interface:path, $error:path, $( $name:literal => $factory:expr ),* $(,)?) => {{
        let mut factories = std::collections::HashMap::new();
        $(
            factories.insert(
                $name.to_string(),
                $factory as fn(&toml::Value) -> Result<Box<dyn $interface>, $error>
            );
        )*
        factories
    }};

    // Variant for catalog factories that take the storage service
    ($interface:path, $error:path, catalog, $( $name:literal => $factory:expr ),* $(,)?) => {{
        let mut factories = std::collections::HashMap::new();
        $(
            factories.insert(
                $name.to_string(),
                $factory as fn(&toml::Value, std::sync::Arc<eats_storage::StorageService>) -> Result<Box<dyn $interface>, $error>
            );
        )*
        factories
    }};
}

/// Builds the order engine with all necessary implementations.
///
/// This function wires up all the concrete implementations for:
/// - Storage backends (e.g., in-memory, file)
/// - Catalog sources (e.g., storage-backed)
async fn build_engine(config: Config) -> Result<OrderEngine, Box<dyn std::error::Error>> {
	let builder = ServiceBuilder::new(config);

	// Storage factories (simple config-only interface)
	let storage_factories = create_factory_map!(
		eats_storage::StorageInterface,
		eats_storage::StorageError,
		"file" => create_file_storage,
		"memory" => create_memory_storage,
	);

	// Catalog factories (config + storage handle)
	let catalog_factories = create_factory_map!(
		eats_catalog::CatalogInterface,
		eats_catalog::CatalogError,
		catalog,
		"storage" => create_storage_catalog,
	);

	let factories = ServiceFactories {
		storage_factories,
		catalog_factories,
	};

	Ok(builder.build(factories).await?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use eats_config::{CatalogConfig, EventsConfig, ServiceConfig, StorageConfig};
	use eats_types::{CreateOrderItem, CreateOrderRequest, Principal, Role};
	use std::collections::HashMap;
	use tempfile::tempdir;
	use toml::Value;

	/// Creates a minimal test configuration for unit testing
	fn create_test_config() -> Config {
		Config {
			service: ServiceConfig {
				id: "test-service".to_string(),
			},
			events: EventsConfig {
				channel_capacity: 16,
			},
			storage: StorageConfig {
				primary: "memory".to_string(),
				implementations: {
					let mut map = HashMap::new();
					map.insert("memory".to_string(), Value::Table(toml::map::Map::new()));
					map
				},
			},
			catalog: CatalogConfig {
				primary: "storage".to_string(),
				implementations: {
					let mut map = HashMap::new();
					map.insert("storage".to_string(), Value::Table(toml::map::Map::new()));
					map
				},
				seed: None,
			},
		}
	}

	#[test]
	fn test_args_default_values() {
		let args = Args {
			config: PathBuf::from("config.toml"),
			log_level: "info".to_string(),
		};

		assert_eq!(args.config, PathBuf::from("config.toml"));
		assert_eq!(args.log_level, "info");
	}

	#[test]
	fn test_create_factory_map_macro() {
		use eats_storage::implementations::memory::create_storage;
		use eats_storage::{StorageError, StorageInterface};

		let factories = create_factory_map!(
			StorageInterface,
			StorageError,
			"memory" => create_storage,
		);

		assert_eq!(factories.len(), 1);
		assert!(factories.contains_key("memory"));
	}

	#[test]
	fn test_create_factory_map_multiple_entries() {
		use eats_storage::implementations::{
			file::create_storage as create_file, memory::create_storage as create_memory,
		};
		use eats_storage::{StorageError, StorageInterface};

		let factories = create_factory_map!(
			StorageInterface,
			StorageError,
			"memory" => create_memory,
			"file" => create_file,
		);

		assert_eq!(factories.len(), 2);
		assert!(factories.contains_key("memory"));
		assert!(factories.contains_key("file"));
	}

	#[test]
	fn test_catalog_factories_creation() {
		let catalog_factories = create_factory_map!(
			eats_catalog::CatalogInterface,
			eats_catalog::CatalogError,
			catalog,
			"storage" => create_storage_catalog,
		);

		assert_eq!(catalog_factories.len(), 1);
		assert!(catalog_factories.contains_key("storage"));
	}

	#[tokio::test]
	async fn test_build_engine_with_minimal_config() {
		let config = create_test_config();

		let result = build_engine(config).await;
		assert!(result.is_ok(), "Failed to build engine: {:?}", result.err());

		let engine = result.unwrap();
		assert_eq!(engine.config().service.id, "test-service");
	}

	#[tokio::test]
	async fn test_engine_serves_orders_from_file_config() {
		let temp_dir = tempdir().expect("Failed to create temp dir");
		let config_path = temp_dir.path().join("test_config.toml");

		let config_content = r#"
[service]
id = "test-file-service"

[events]
channel_capacity = 8

[storage]
primary = "memory"

[storage.implementations.memory]

[catalog]
primary = "storage"

[catalog.implementations.storage]

[[catalog.seed.restaurants]]
id = "r-1"
name = "Trattoria"
address = "1 Via Roma"
owner_id = "owner-1"

[[catalog.seed.dishes]]
id = "d-1"
restaurant_id = "r-1"
name = "Carbonara"
price = "10.00"
"#;

		std::fs::write(&config_path, config_content).expect("Failed to write config");

		let config = Config::from_file(config_path.to_str().unwrap())
			.await
			.expect("Failed to load config");
		assert_eq!(config.service.id, "test-file-service");

		let engine = build_engine(config).await.expect("Failed to build engine");

		// Seeded catalog serves a full order round trip
		let client = Principal::new("customer-1", Role::Client);
		let order = engine
			.orders()
			.create_order(
				&client,
				CreateOrderRequest {
					restaurant_id: "r-1".to_string(),
					items: vec![CreateOrderItem {
						dish_id: "d-1".to_string(),
						options: vec![],
					}],
				},
			)
			.await
			.expect("Failed to create order");

		assert_eq!(order.total, "10.00".parse().unwrap());

		let listed = engine.orders().list_orders(&client, None).await.unwrap();
		assert_eq!(listed.len(), 1);
		assert_eq!(listed[0].id, order.id);
	}
}
