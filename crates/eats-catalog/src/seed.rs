//! Catalog seeding from configured fixture data.
//!
//! Seeding writes restaurants and dishes into their storage namespaces by id,
//! so running it again with the same data is a harmless overwrite.

use crate::CatalogError;
use eats_storage::StorageService;
use eats_types::{Dish, Restaurant, StorageKey};

/// Loads the given restaurants and dishes into storage.
///
/// Records are stored under the catalog namespaces keyed by id. Existing
/// records with the same id are overwritten.
pub async fn seed_catalog(
	storage: &StorageService,
	restaurants: &[Restaurant],
	dishes: &[Dish],
) -> Result<(), CatalogError> {
	for restaurant in restaurants {
		storage
			.store(StorageKey::Restaurants.as_str(), &restaurant.id, restaurant)
			.await
			.map_err(|e| CatalogError::Backend(e.to_string()))?;
	}

	for dish in dishes {
		storage
			.store(StorageKey::Dishes.as_str(), &dish.id, dish)
			.await
			.map_err(|e| CatalogError::Backend(e.to_string()))?;
	}

	tracing::info!(
		component = "catalog",
		restaurants = restaurants.len(),
		dishes = dishes.len(),
		"Seeded catalog"
	);

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use eats_storage::implementations::memory::MemoryStorage;

	#[tokio::test]
	async fn test_reseeding_overwrites_by_id() {
		let storage = StorageService::new(Box::new(MemoryStorage::new()));
		let mut restaurant = Restaurant {
			id: "r-1".to_string(),
			name: "Trattoria".to_string(),
			address: "1 Test St".to_string(),
			owner_id: "owner-1".to_string(),
		};

		seed_catalog(&storage, &[restaurant.clone()], &[]).await.unwrap();

		restaurant.name = "Trattoria Nuova".to_string();
		seed_catalog(&storage, &[restaurant], &[]).await.unwrap();

		let stored: Vec<Restaurant> = storage
			.retrieve_all(StorageKey::Restaurants.as_str())
			.await
			.unwrap();
		assert_eq!(stored.len(), 1);
		assert_eq!(stored[0].name, "Trattoria Nuova");
	}
}
