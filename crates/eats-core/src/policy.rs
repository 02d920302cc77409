//! Visibility rules for orders.
//!
//! Determines which principals may read a given order. The checks are pure
//! functions of the order snapshot and are evaluated fresh on every read,
//! since a driver assignment changes who is eligible mid-lifecycle.

use eats_types::{Order, Principal, Role};

/// Checks whether a principal may see an order.
///
/// Each role is matched against its own relation on the order: clients
/// against the customer, drivers against the assigned driver, owners
/// against the restaurant owner snapshot. A missing relation means the
/// principal is not eligible.
pub fn can_see(order: &Order, principal: &Principal) -> bool {
	match principal.role {
		Role::Client => order.customer_id.as_deref() == Some(principal.id.as_str()),
		Role::Delivery => order.driver_id.as_deref() == Some(principal.id.as_str()),
		Role::Owner => order.restaurant_owner_id == principal.id,
	}
}

/// Checks whether a user id belongs to any of the order's parties.
///
/// Unlike [`can_see`] this ignores roles entirely; it backs the per-order
/// update feed, where the subscriber's relation to the order is what counts.
pub fn is_party(order: &Order, user_id: &str) -> bool {
	order.customer_id.as_deref() == Some(user_id)
		|| order.driver_id.as_deref() == Some(user_id)
		|| order.restaurant_owner_id == user_id
}
