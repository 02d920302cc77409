//! Order types for the delivery lifecycle.
//!
//! This module defines the order aggregate, its line items, and the status
//! enum orders move through from placement to delivery.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A placed order with its pricing and lifecycle state.
///
/// Orders snapshot everything needed to evaluate visibility and event
/// delivery without further lookups: the restaurant's owner is copied onto
/// the order at creation time and the total is computed once and never
/// recomputed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
	/// Unique identifier for this order.
	pub id: String,
	/// Customer that placed the order. Optional so orders outlive deleted
	/// accounts.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub customer_id: Option<String>,
	/// Rider assigned to deliver the order, set by the first take.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub driver_id: Option<String>,
	/// Restaurant the order was placed against.
	pub restaurant_id: String,
	/// Owner of that restaurant at creation time.
	pub restaurant_owner_id: String,
	/// Line items in the order the customer placed them.
	pub items: Vec<OrderItem>,
	/// Total price, fixed at creation from the menu in effect.
	pub total: Decimal,
	/// Current lifecycle status.
	pub status: OrderStatus,
	/// Timestamp when this order was created.
	pub created_at: u64,
	/// Timestamp when this order was last updated.
	pub updated_at: u64,
}

/// A single line item in an order.
///
/// Items are immutable after creation; edits to an order never touch them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
	/// Unique identifier for this item.
	pub id: String,
	/// Dish this item refers to.
	pub dish_id: String,
	/// Option selections made by the customer.
	#[serde(default)]
	pub options: Vec<OrderItemOption>,
}

/// An option selection on an order item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemOption {
	/// Name of the dish option being selected.
	pub name: String,
	/// Chosen value for options that price per choice.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub choice: Option<String>,
}

/// Request payload for placing a new order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
	/// Restaurant to order from.
	pub restaurant_id: String,
	/// Requested line items.
	pub items: Vec<CreateOrderItem>,
}

/// A requested line item before it has been priced and assigned an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderItem {
	/// Dish to order.
	pub dish_id: String,
	/// Option selections for the dish.
	#[serde(default)]
	pub options: Vec<OrderItemOption>,
}

/// Status of an order in the delivery lifecycle.
///
/// The nominal flow is Pending -> Cooking -> Cooked -> MatchingDriver ->
/// PickedUp -> Delivered, with Cancelled reachable from Pending only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
	/// Order has been placed and awaits the kitchen.
	Pending,
	/// The restaurant is preparing the order.
	Cooking,
	/// The food is ready for pickup.
	Cooked,
	/// A delivery rider is being matched.
	MatchingDriver,
	/// The rider has collected the order.
	PickedUp,
	/// The order reached the customer.
	Delivered,
	/// The customer cancelled before cooking started.
	Cancelled,
}

impl OrderStatus {
	/// Terminal statuses admit no further transitions.
	pub fn is_terminal(&self) -> bool {
		matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrderStatus::Pending => write!(f, "Pending"),
			OrderStatus::Cooking => write!(f, "Cooking"),
			OrderStatus::Cooked => write!(f, "Cooked"),
			OrderStatus::MatchingDriver => write!(f, "MatchingDriver"),
			OrderStatus::PickedUp => write!(f, "PickedUp"),
			OrderStatus::Delivered => write!(f, "Delivered"),
			OrderStatus::Cancelled => write!(f, "Cancelled"),
		}
	}
}
