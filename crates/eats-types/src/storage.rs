//! Storage-related types for the order system.

use std::str::FromStr;

/// Storage namespaces for different data collections.
///
/// This enum provides type safety for storage operations by replacing
/// string literals with strongly typed variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
	/// Namespace for order documents
	Orders,
	/// Namespace for order line item records
	OrderItems,
	/// Namespace for restaurant catalog entries
	Restaurants,
	/// Namespace for dish catalog entries
	Dishes,
}

impl StorageKey {
	/// Returns the string representation of the storage namespace.
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageKey::Orders => "orders",
			StorageKey::OrderItems => "order_items",
			StorageKey::Restaurants => "restaurants",
			StorageKey::Dishes => "dishes",
		}
	}

	/// Returns an iterator over all StorageKey variants.
	pub fn all() -> impl Iterator<Item = Self> {
		[
			Self::Orders,
			Self::OrderItems,
			Self::Restaurants,
			Self::Dishes,
		]
		.into_iter()
	}
}

impl FromStr for StorageKey {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"orders" => Ok(Self::Orders),
			"order_items" => Ok(Self::OrderItems),
			"restaurants" => Ok(Self::Restaurants),
			"dishes" => Ok(Self::Dishes),
			_ => Err(()),
		}
	}
}

impl From<StorageKey> for &'static str {
	fn from(key: StorageKey) -> Self {
		key.as_str()
	}
}
