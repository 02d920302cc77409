//! Event payloads for the order event bus.
//!
//! Each payload type maps to one named channel on the bus. Events carry the
//! full order snapshot taken at publish time so subscription predicates can
//! be evaluated without further lookups.

use crate::Order;
use serde::{Deserialize, Serialize};

/// Published on the "order created" channel when a client places an order.
///
/// Carries the restaurant owner's id alongside the order so the owner feed
/// can filter without resolving the restaurant again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreated {
	/// The freshly created order, in Pending status.
	pub order: Order,
	/// Owner of the restaurant the order targets.
	pub owner_id: String,
}

/// Published on the "order cooked" channel when a kitchen marks food ready.
///
/// Broadcast to the whole delivery pool; it is the signal riders pick
/// orders from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCooked {
	/// The order that just became ready for pickup.
	pub order: Order,
}

/// Published on the "order status changed" channel after any persisted
/// change to an order, including driver assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusChanged {
	/// Snapshot of the order after the change was persisted.
	pub order: Order,
}
