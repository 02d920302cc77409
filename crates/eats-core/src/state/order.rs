//! Order state machine implementation.
//!
//! Manages order status transitions with role-based validation, moving orders
//! through the lifecycle: Pending -> Cooking -> Cooked -> MatchingDriver ->
//! PickedUp -> Delivered, with Cancelled reachable only while still Pending.
//! Also provides utilities for loading and updating persisted orders.

use eats_storage::{StorageError, StorageService};
use eats_types::{Order, OrderStatus, Role, StorageKey};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Errors that can occur during order state management.
///
/// These errors represent failures in storage operations,
/// missing orders, or time-related issues.
#[derive(Debug, Error)]
pub enum OrderStateError {
	#[error("Storage error: {0}")]
	Storage(String),
	#[error("Order not found: {0}")]
	OrderNotFound(String),
	#[error("Time error: {0}")]
	TimeError(String),
}

/// Statuses each role is allowed to request.
///
/// The table deliberately carries no sequence information beyond the
/// Client precondition checked in `resolve_transition`: owners and drivers
/// drive their own portion of the lifecycle and may re-issue a status.
static ROLE_TRANSITIONS: Lazy<HashMap<Role, HashSet<OrderStatus>>> = Lazy::new(|| {
	let mut m = HashMap::new();
	m.insert(Role::Client, HashSet::from([OrderStatus::Cancelled]));
	m.insert(
		Role::Owner,
		HashSet::from([OrderStatus::Cooking, OrderStatus::Cooked]),
	);
	m.insert(
		Role::Delivery,
		HashSet::from([
			OrderStatus::MatchingDriver,
			OrderStatus::PickedUp,
			OrderStatus::Delivered,
		]),
	);
	m
});

/// Manages order state transitions and persistence
pub struct OrderStateMachine {
	storage: Arc<StorageService>,
}

impl OrderStateMachine {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Resolves a requested status change against the role transition table.
	///
	/// Returns the status to apply, or `None` when the request does not
	/// resolve to a transition: the order is terminal, the target is outside
	/// the role's allowed set, or a precondition fails. An unresolved request
	/// is a no-op for callers, not an error.
	pub fn resolve_transition(
		role: Role,
		current: OrderStatus,
		requested: OrderStatus,
	) -> Option<OrderStatus> {
		// Terminal orders accept no further changes
		if current.is_terminal() {
			return None;
		}

		if !ROLE_TRANSITIONS
			.get(&role)
			.is_some_and(|targets| targets.contains(&requested))
		{
			return None;
		}

		// Clients may only cancel while the order is still pending
		if requested == OrderStatus::Cancelled && current != OrderStatus::Pending {
			return None;
		}

		Some(requested)
	}

	/// Gets an order by ID
	pub async fn get_order(&self, order_id: &str) -> Result<Order, OrderStateError> {
		self.storage
			.retrieve(StorageKey::Orders.as_str(), order_id)
			.await
			.map_err(|e| match e {
				StorageError::NotFound => OrderStateError::OrderNotFound(order_id.to_string()),
				other => OrderStateError::Storage(other.to_string()),
			})
	}

	/// Stores a new order
	pub async fn store_order(&self, order: &Order) -> Result<(), OrderStateError> {
		self.storage
			.store(StorageKey::Orders.as_str(), &order.id, order)
			.await
			.map_err(|e| OrderStateError::Storage(e.to_string()))
	}

	/// Updates an order with a closure and persists it
	pub async fn update_order_with<F>(
		&self,
		order_id: &str,
		updater: F,
	) -> Result<Order, OrderStateError>
	where
		F: FnOnce(&mut Order),
	{
		let mut order = self.get_order(order_id).await?;

		// Apply the update
		updater(&mut order);

		// Automatically set updated_at timestamp
		order.updated_at = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_err(|e| OrderStateError::TimeError(e.to_string()))?
			.as_secs();

		self.storage
			.update(StorageKey::Orders.as_str(), order_id, &order)
			.await
			.map_err(|e| match e {
				StorageError::NotFound => OrderStateError::OrderNotFound(order_id.to_string()),
				other => OrderStateError::Storage(other.to_string()),
			})?;

		Ok(order)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_client_cancel_only_while_pending() {
		assert_eq!(
			OrderStateMachine::resolve_transition(
				Role::Client,
				OrderStatus::Pending,
				OrderStatus::Cancelled,
			),
			Some(OrderStatus::Cancelled)
		);

		for current in [
			OrderStatus::Cooking,
			OrderStatus::Cooked,
			OrderStatus::MatchingDriver,
			OrderStatus::PickedUp,
		] {
			assert_eq!(
				OrderStateMachine::resolve_transition(
					Role::Client,
					current,
					OrderStatus::Cancelled,
				),
				None
			);
		}
	}

	#[test]
	fn test_role_targets() {
		// Clients cannot drive the kitchen or delivery lifecycle
		assert_eq!(
			OrderStateMachine::resolve_transition(
				Role::Client,
				OrderStatus::Pending,
				OrderStatus::Cooking,
			),
			None
		);

		// Owners control cooking statuses and nothing else
		assert_eq!(
			OrderStateMachine::resolve_transition(
				Role::Owner,
				OrderStatus::Pending,
				OrderStatus::Cooking,
			),
			Some(OrderStatus::Cooking)
		);
		assert_eq!(
			OrderStateMachine::resolve_transition(
				Role::Owner,
				OrderStatus::Cooking,
				OrderStatus::Cooked,
			),
			Some(OrderStatus::Cooked)
		);
		assert_eq!(
			OrderStateMachine::resolve_transition(
				Role::Owner,
				OrderStatus::Pending,
				OrderStatus::Cancelled,
			),
			None
		);

		// Drivers control the delivery statuses
		for requested in [
			OrderStatus::MatchingDriver,
			OrderStatus::PickedUp,
			OrderStatus::Delivered,
		] {
			assert_eq!(
				OrderStateMachine::resolve_transition(
					Role::Delivery,
					OrderStatus::Cooked,
					requested,
				),
				Some(requested)
			);
		}
		assert_eq!(
			OrderStateMachine::resolve_transition(
				Role::Delivery,
				OrderStatus::Cooked,
				OrderStatus::Cooking,
			),
			None
		);
	}

	#[test]
	fn test_terminal_states_are_final() {
		for current in [OrderStatus::Delivered, OrderStatus::Cancelled] {
			for requested in [
				OrderStatus::Pending,
				OrderStatus::Cooking,
				OrderStatus::Cooked,
				OrderStatus::MatchingDriver,
				OrderStatus::PickedUp,
				OrderStatus::Delivered,
				OrderStatus::Cancelled,
			] {
				for role in [Role::Client, Role::Owner, Role::Delivery] {
					assert_eq!(
						OrderStateMachine::resolve_transition(role, current, requested),
						None,
						"{:?} must not leave terminal {:?}",
						role,
						current
					);
				}
			}
		}
	}

	#[test]
	fn test_same_status_reissue_resolves() {
		// Re-issuing the current status is a valid transition, not a no-op
		assert_eq!(
			OrderStateMachine::resolve_transition(
				Role::Owner,
				OrderStatus::Cooking,
				OrderStatus::Cooking,
			),
			Some(OrderStatus::Cooking)
		);
	}
}
