//! Configuration module for the eats order backend.
//!
//! This module provides structures and utilities for managing service configuration.
//! It supports loading configuration from TOML files and provides validation to ensure
//! all required configuration values are properly set.

#[cfg(feature = "testing")]
pub mod builders;

use eats_types::{Dish, Restaurant};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		let message = err.message().to_string();
		ConfigError::Parse(message)
	}
}

/// Main configuration structure for the eats service.
///
/// This structure contains all configuration sections required for the service
/// to operate, including service identity, event bus sizing, storage and
/// catalog backends, and optional catalog seed data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Configuration specific to the service instance.
	pub service: ServiceConfig,
	/// Configuration for the in-process event bus.
	#[serde(default)]
	pub events: EventsConfig,
	/// Configuration for the storage backend.
	pub storage: StorageConfig,
	/// Configuration for the restaurant catalog.
	pub catalog: CatalogConfig,
}

/// Configuration specific to the service instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
	/// Unique identifier for this service instance.
	pub id: String,
}

/// Configuration for the in-process event bus.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventsConfig {
	/// Capacity of each broadcast channel.
	/// Defaults to 256 events if not specified.
	#[serde(default = "default_channel_capacity")]
	pub channel_capacity: usize,
}

impl Default for EventsConfig {
	fn default() -> Self {
		Self {
			channel_capacity: default_channel_capacity(),
		}
	}
}

/// Returns the default broadcast channel capacity.
///
/// Slow subscribers fall behind once this many events queue up, so the
/// default leaves generous headroom for bursty order activity.
fn default_channel_capacity() -> usize {
	256
}

/// Configuration for the storage backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of storage implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for the restaurant catalog.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of catalog implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
	/// Optional fixture data loaded into the catalog at startup.
	pub seed: Option<CatalogSeed>,
}

/// Fixture data loaded into the catalog at startup.
///
/// Seeding is idempotent: entries are stored by id, so restarting the
/// service with the same seed simply overwrites the same records.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogSeed {
	/// Restaurants to load into the catalog.
	#[serde(default)]
	pub restaurants: Vec<Restaurant>,
	/// Dishes to load into the catalog.
	#[serde(default)]
	pub dishes: Vec<Dish>,
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	// Limit input size to prevent ReDoS attacks
	const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let full_match = cap.get(0).unwrap();
		let var_name = cap.get(1).unwrap().as_str();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => {
				if let Some(default) = default_value {
					default.to_string()
				} else {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					)));
				}
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a TOML file.
	///
	/// Environment variables are resolved and the configuration is
	/// validated after parsing.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let contents = tokio::fs::read_to_string(path).await?;
		contents.parse()
	}

	/// Validates the configuration to ensure all required fields are properly set.
	///
	/// This method performs validation across all configuration sections:
	/// - Ensures service ID is not empty
	/// - Ensures the event channel capacity is non-zero
	/// - Validates storage and catalog backends are specified
	/// - Checks that seed data is internally consistent
	fn validate(&self) -> Result<(), ConfigError> {
		// Validate service config
		if self.service.id.is_empty() {
			return Err(ConfigError::Validation("Service ID cannot be empty".into()));
		}

		// Validate events config
		if self.events.channel_capacity == 0 {
			return Err(ConfigError::Validation(
				"Event channel capacity must be greater than 0".into(),
			));
		}

		// Validate storage config
		if self.storage.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one storage implementation must be configured".into(),
			));
		}
		if self.storage.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Storage primary implementation cannot be empty".into(),
			));
		}
		if !self
			.storage
			.implementations
			.contains_key(&self.storage.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary storage '{}' not found in implementations",
				self.storage.primary
			)));
		}

		// Validate catalog config
		if self.catalog.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one catalog implementation must be configured".into(),
			));
		}
		if self.catalog.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Catalog primary implementation cannot be empty".into(),
			));
		}
		if !self
			.catalog
			.implementations
			.contains_key(&self.catalog.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary catalog '{}' not found in implementations",
				self.catalog.primary
			)));
		}

		// Validate seed data consistency
		self.validate_seed()?;

		Ok(())
	}

	/// Validates catalog seed data.
	///
	/// # Validation Rules
	/// 1. Restaurant ids must be unique within the seed
	/// 2. Dish ids must be unique within the seed
	/// 3. Every dish must reference a seeded restaurant
	/// 4. Dish prices must not be negative
	fn validate_seed(&self) -> Result<(), ConfigError> {
		let Some(seed) = &self.catalog.seed else {
			return Ok(());
		};

		let mut restaurant_ids = HashSet::new();
		for restaurant in &seed.restaurants {
			if restaurant.id.is_empty() {
				return Err(ConfigError::Validation(
					"Seeded restaurant id cannot be empty".into(),
				));
			}
			if !restaurant_ids.insert(restaurant.id.as_str()) {
				return Err(ConfigError::Validation(format!(
					"Duplicate restaurant id '{}' in catalog seed",
					restaurant.id
				)));
			}
		}

		let mut dish_ids = HashSet::new();
		for dish in &seed.dishes {
			if !dish_ids.insert(dish.id.as_str()) {
				return Err(ConfigError::Validation(format!(
					"Duplicate dish id '{}' in catalog seed",
					dish.id
				)));
			}
			if !restaurant_ids.contains(dish.restaurant_id.as_str()) {
				return Err(ConfigError::Validation(format!(
					"Seeded dish '{}' references restaurant '{}' which doesn't exist in the seed",
					dish.id, dish.restaurant_id
				)));
			}
			if dish.price.is_sign_negative() {
				return Err(ConfigError::Validation(format!(
					"Seeded dish '{}' has a negative price",
					dish.id
				)));
			}
		}

		Ok(())
	}
}

/// Implementation of FromStr trait for Config to enable parsing from string.
///
/// This allows configuration to be parsed from TOML strings using the standard
/// string parsing interface. Environment variables are resolved and the
/// configuration is automatically validated after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_env_var_resolution() {
		// Set up test environment variables
		std::env::set_var("TEST_HOST", "localhost");
		std::env::set_var("TEST_PORT", "5432");

		let input = "host = \"${TEST_HOST}:${TEST_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "host = \"localhost:5432\"");

		// Clean up
		std::env::remove_var("TEST_HOST");
		std::env::remove_var("TEST_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${MISSING_VAR:-default_value}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"default_value\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "value = \"${MISSING_VAR}\"";
		let result = resolve_env_vars(input);
		assert!(result.is_err());
		assert!(result.unwrap_err().to_string().contains("MISSING_VAR"));
	}

	#[test]
	fn test_config_with_env_vars() {
		// Set environment variable
		std::env::set_var("TEST_SERVICE_ID", "test-eats");

		let config_str = r#"
[service]
id = "${TEST_SERVICE_ID}"

[storage]
primary = "memory"
[storage.implementations.memory]

[catalog]
primary = "storage"
[catalog.implementations.storage]
"#;

		let config: Config = config_str.parse().unwrap();
		assert_eq!(config.service.id, "test-eats");
		// [events] was omitted, so the default capacity applies
		assert_eq!(config.events.channel_capacity, 256);

		// Clean up
		std::env::remove_var("TEST_SERVICE_ID");
	}

	#[test]
	fn test_missing_primary_rejected() {
		let config_str = r#"
[service]
id = "test"

[storage]
primary = "file"
[storage.implementations.memory]

[catalog]
primary = "storage"
[catalog.implementations.storage]
"#;

		let result = Config::from_str(config_str);
		assert!(result.is_err());
		let err = result.unwrap_err();
		assert!(err
			.to_string()
			.contains("Primary storage 'file' not found in implementations"));
	}

	#[test]
	fn test_zero_channel_capacity_rejected() {
		let config_str = r#"
[service]
id = "test"

[events]
channel_capacity = 0

[storage]
primary = "memory"
[storage.implementations.memory]

[catalog]
primary = "storage"
[catalog.implementations.storage]
"#;

		let result = Config::from_str(config_str);
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("channel capacity"));
	}

	#[test]
	fn test_seed_parses() {
		let config_str = r#"
[service]
id = "test"

[storage]
primary = "memory"
[storage.implementations.memory]

[catalog]
primary = "storage"
[catalog.implementations.storage]

[[catalog.seed.restaurants]]
id = "r-1"
name = "Trattoria Da Mario"
address = "1 Via Roma"
owner_id = "owner-1"

[[catalog.seed.dishes]]
id = "d-1"
restaurant_id = "r-1"
name = "Margherita"
price = "8.00"

[[catalog.seed.dishes.options]]
name = "Size"

[[catalog.seed.dishes.options.choices]]
name = "Large"
extra = "2.00"
"#;

		let config: Config = config_str.parse().unwrap();
		let seed = config.catalog.seed.unwrap();
		assert_eq!(seed.restaurants.len(), 1);
		assert_eq!(seed.dishes.len(), 1);
		assert_eq!(seed.dishes[0].options.len(), 1);
	}

	#[test]
	fn test_seed_dish_without_restaurant_rejected() {
		let config_str = r#"
[service]
id = "test"

[storage]
primary = "memory"
[storage.implementations.memory]

[catalog]
primary = "storage"
[catalog.implementations.storage]

[[catalog.seed.dishes]]
id = "d-1"
restaurant_id = "r-unknown"
name = "Margherita"
price = "8.00"
"#;

		let result = Config::from_str(config_str);
		assert!(result.is_err());
		let err = result.unwrap_err();
		assert!(err
			.to_string()
			.contains("references restaurant 'r-unknown' which doesn't exist"));
	}

	#[test]
	fn test_duplicate_seed_restaurant_rejected() {
		let config_str = r#"
[service]
id = "test"

[storage]
primary = "memory"
[storage.implementations.memory]

[catalog]
primary = "storage"
[catalog.implementations.storage]

[[catalog.seed.restaurants]]
id = "r-1"
name = "First"
address = "1 First St"
owner_id = "owner-1"

[[catalog.seed.restaurants]]
id = "r-1"
name = "Second"
address = "2 Second St"
owner_id = "owner-2"
"#;

		let result = Config::from_str(config_str);
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("Duplicate restaurant id 'r-1'"));
	}

	#[tokio::test]
	async fn test_from_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.toml");

		let config_str = r#"
[service]
id = "file-eats"

[storage]
primary = "memory"
[storage.implementations.memory]

[catalog]
primary = "storage"
[catalog.implementations.storage]
"#;
		std::fs::write(&path, config_str).unwrap();

		let config = Config::from_file(&path.to_string_lossy()).await.unwrap();
		assert_eq!(config.service.id, "file-eats");
	}
}
