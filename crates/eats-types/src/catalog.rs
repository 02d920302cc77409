//! Catalog types for restaurants and their menus.
//!
//! The order system treats the catalog as read-only reference data. Menu
//! management lives elsewhere; these types exist so orders can resolve dishes
//! and price option selections at creation time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A restaurant listed in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
	/// Unique identifier for this restaurant.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Street address shown to customers and riders.
	pub address: String,
	/// Owner of the restaurant, used for visibility checks and owner feeds.
	pub owner_id: String,
}

/// A dish on a restaurant's menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dish {
	/// Unique identifier for this dish.
	pub id: String,
	/// Restaurant this dish belongs to.
	pub restaurant_id: String,
	/// Display name, matched against order item selections.
	pub name: String,
	/// Optional menu description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Base price before any option surcharges.
	pub price: Decimal,
	/// Customization options offered for this dish.
	#[serde(default)]
	pub options: Vec<DishOption>,
}

/// A customization option on a dish.
///
/// An option either carries a flat surcharge in `extra` or a set of priced
/// `choices`. When both are present the flat surcharge wins; callers are
/// expected to check `extra` first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishOption {
	/// Option name, matched against order item selections.
	pub name: String,
	/// Flat surcharge applied when this option is selected.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub extra: Option<Decimal>,
	/// Named choices with their own surcharges.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub choices: Option<Vec<DishOptionChoice>>,
}

/// A selectable choice within a dish option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishOptionChoice {
	/// Choice name, matched against the selection's choice value.
	pub name: String,
	/// Surcharge for this choice; absent means free.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub extra: Option<Decimal>,
}
