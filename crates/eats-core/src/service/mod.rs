//! Order lifecycle service.
//!
//! Implements the order operations exposed to the transport layer: creation,
//! role-scoped listing, retrieval, status edits, and driver assignment, plus
//! the subscription feeds in [`subscriptions`]. State changes go through the
//! order state machine and publish events on the bus.

pub mod subscriptions;

use crate::engine::event_bus::EventBus;
use crate::policy;
use crate::pricing;
use crate::state::{OrderStateError, OrderStateMachine};
use eats_catalog::CatalogService;
use eats_storage::StorageService;
use eats_types::{
	current_timestamp, truncate_id, CreateOrderRequest, Order, OrderCooked, OrderCreated,
	OrderItem, OrderStatus, OrderStatusChanged, Principal, Role, StorageKey,
};
use rust_decimal::Decimal;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::instrument;
use uuid::Uuid;

/// Number of stripes serializing read-modify-write edits.
///
/// A fixed stripe set bounds lock memory with no cleanup path; two orders
/// sharing a stripe only costs extra serialization.
const EDIT_LOCK_STRIPES: usize = 16;

/// Errors that can occur during order operations.
///
/// Unresolvable status changes are not errors; they resolve to a no-op so
/// stale clients cannot fail a request by racing the lifecycle.
#[derive(Debug, Error)]
pub enum OrderError {
	#[error("Restaurant not found: {0}")]
	RestaurantNotFound(String),
	#[error("Dish not found: {0}")]
	DishNotFound(String),
	#[error("Order not found: {0}")]
	OrderNotFound(String),
	#[error("Not authorized")]
	NotAuthorized,
	#[error("Order already has a driver")]
	DriverAlreadyAssigned,
	#[error("Catalog error: {0}")]
	Catalog(String),
	#[error("Storage error: {0}")]
	Storage(String),
}

impl From<OrderStateError> for OrderError {
	fn from(err: OrderStateError) -> Self {
		match err {
			OrderStateError::OrderNotFound(id) => OrderError::OrderNotFound(id),
			other => OrderError::Storage(other.to_string()),
		}
	}
}

/// Service implementing the order lifecycle operations.
pub struct OrderService {
	storage: Arc<StorageService>,
	catalog: Arc<CatalogService>,
	state_machine: Arc<OrderStateMachine>,
	event_bus: EventBus,
	edit_locks: Vec<Mutex<()>>,
}

impl OrderService {
	pub fn new(
		storage: Arc<StorageService>,
		catalog: Arc<CatalogService>,
		state_machine: Arc<OrderStateMachine>,
		event_bus: EventBus,
	) -> Self {
		Self {
			storage,
			catalog,
			state_machine,
			event_bus,
			edit_locks: (0..EDIT_LOCK_STRIPES).map(|_| Mutex::new(())).collect(),
		}
	}

	/// Returns the lock stripe covering the given order id.
	fn stripe_for(&self, order_id: &str) -> &Mutex<()> {
		let mut hasher = DefaultHasher::new();
		order_id.hash(&mut hasher);
		&self.edit_locks[(hasher.finish() as usize) % EDIT_LOCK_STRIPES]
	}

	/// Creates a new order for a client.
	///
	/// Every line item is resolved and priced against the catalog before
	/// anything is persisted, so a bad dish reference cannot leave a partial
	/// order behind. The order snapshots the restaurant's owner id for
	/// visibility checks and event fan-out, and starts in `Pending`.
	#[instrument(skip_all, fields(restaurant_id = %truncate_id(&request.restaurant_id)))]
	pub async fn create_order(
		&self,
		principal: &Principal,
		request: CreateOrderRequest,
	) -> Result<Order, OrderError> {
		if principal.role != Role::Client {
			return Err(OrderError::NotAuthorized);
		}

		let restaurant = self
			.catalog
			.find_restaurant(&request.restaurant_id)
			.await
			.map_err(|e| OrderError::Catalog(e.to_string()))?
			.ok_or_else(|| OrderError::RestaurantNotFound(request.restaurant_id.clone()))?;

		let mut items = Vec::with_capacity(request.items.len());
		let mut total = Decimal::ZERO;
		for line in &request.items {
			let dish = self
				.catalog
				.find_dish(&line.dish_id)
				.await
				.map_err(|e| OrderError::Catalog(e.to_string()))?
				.ok_or_else(|| OrderError::DishNotFound(line.dish_id.clone()))?;

			total += pricing::item_price(&dish, &line.options);
			items.push(OrderItem {
				id: Uuid::new_v4().to_string(),
				dish_id: line.dish_id.clone(),
				options: line.options.clone(),
			});
		}

		let now = current_timestamp();
		let order = Order {
			id: Uuid::new_v4().to_string(),
			customer_id: Some(principal.id.clone()),
			driver_id: None,
			restaurant_id: restaurant.id.clone(),
			restaurant_owner_id: restaurant.owner_id.clone(),
			items: items.clone(),
			total,
			status: OrderStatus::Pending,
			created_at: now,
			updated_at: now,
		};

		for item in &items {
			self.storage
				.store(StorageKey::OrderItems.as_str(), &item.id, item)
				.await
				.map_err(|e| OrderError::Storage(e.to_string()))?;
		}

		self.state_machine.store_order(&order).await?;

		self.event_bus
			.order_created()
			.publish(OrderCreated {
				order: order.clone(),
				owner_id: restaurant.owner_id,
			})
			.ok();

		Ok(order)
	}

	/// Lists the orders visible to a principal, optionally filtered by status.
	///
	/// Clients see their own orders, drivers the orders assigned to them,
	/// and owners the orders of every restaurant they own. An absent status
	/// filter applies no status constraint.
	pub async fn list_orders(
		&self,
		principal: &Principal,
		status: Option<OrderStatus>,
	) -> Result<Vec<Order>, OrderError> {
		let all: Vec<Order> = self
			.storage
			.retrieve_all(StorageKey::Orders.as_str())
			.await
			.map_err(|e| OrderError::Storage(e.to_string()))?;

		let mut orders: Vec<Order> = match principal.role {
			Role::Client => all
				.into_iter()
				.filter(|o| o.customer_id.as_deref() == Some(principal.id.as_str()))
				.collect(),
			Role::Delivery => all
				.into_iter()
				.filter(|o| o.driver_id.as_deref() == Some(principal.id.as_str()))
				.collect(),
			Role::Owner => {
				let owned: HashSet<String> = self
					.catalog
					.restaurants_owned_by(&principal.id)
					.await
					.map_err(|e| OrderError::Catalog(e.to_string()))?
					.into_iter()
					.map(|r| r.id)
					.collect();

				all.into_iter()
					.filter(|o| owned.contains(&o.restaurant_id))
					.collect()
			},
		};

		if let Some(status) = status {
			orders.retain(|o| o.status == status);
		}

		// Backends list in arbitrary order, sort for stable output
		orders.sort_by(|a, b| {
			a.created_at
				.cmp(&b.created_at)
				.then_with(|| a.id.cmp(&b.id))
		});

		Ok(orders)
	}

	/// Retrieves a single order, enforcing the visibility policy.
	pub async fn get_order(
		&self,
		principal: &Principal,
		order_id: &str,
	) -> Result<Order, OrderError> {
		let order = self.state_machine.get_order(order_id).await?;

		if !policy::can_see(&order, principal) {
			return Err(OrderError::NotAuthorized);
		}

		Ok(order)
	}

	/// Applies a status change requested by a principal.
	///
	/// The request is resolved against the role transition table; a request
	/// that does not resolve returns the unchanged order without persisting
	/// or publishing anything. A resolved change persists the new status and
	/// publishes a status-changed event, preceded by a cooked event when the
	/// order became ready for pickup.
	#[instrument(skip_all, fields(order_id = %truncate_id(order_id)))]
	pub async fn edit_order_status(
		&self,
		principal: &Principal,
		order_id: &str,
		target: OrderStatus,
	) -> Result<Order, OrderError> {
		let _guard = self.stripe_for(order_id).lock().await;

		let order = self.state_machine.get_order(order_id).await?;

		if !policy::can_see(&order, principal) {
			return Err(OrderError::NotAuthorized);
		}

		let Some(next) =
			OrderStateMachine::resolve_transition(principal.role, order.status, target)
		else {
			tracing::debug!(
				role = %principal.role,
				from = %order.status,
				to = %target,
				"Status change does not resolve, leaving order unchanged"
			);
			return Ok(order);
		};

		let updated = self
			.state_machine
			.update_order_with(order_id, |o| {
				o.status = next;
			})
			.await?;

		// The cooked announcement goes to the delivery pool ahead of the
		// parties' own update feed
		if updated.status == OrderStatus::Cooked {
			self.event_bus
				.order_cooked()
				.publish(OrderCooked {
					order: updated.clone(),
				})
				.ok();
		}

		self.event_bus
			.order_status_changed()
			.publish(OrderStatusChanged {
				order: updated.clone(),
			})
			.ok();

		Ok(updated)
	}

	/// Assigns the calling driver to an order.
	///
	/// Succeeds idempotently when the same driver takes the order again;
	/// a different driver on an already assigned order is a conflict. Two
	/// concurrent takes serialize on the order's stripe lock, so exactly
	/// one of them wins.
	#[instrument(skip_all, fields(order_id = %truncate_id(order_id)))]
	pub async fn take_order(
		&self,
		principal: &Principal,
		order_id: &str,
	) -> Result<Order, OrderError> {
		if principal.role != Role::Delivery {
			return Err(OrderError::NotAuthorized);
		}

		let _guard = self.stripe_for(order_id).lock().await;

		let order = self.state_machine.get_order(order_id).await?;

		if let Some(driver_id) = &order.driver_id {
			if driver_id != &principal.id {
				return Err(OrderError::DriverAlreadyAssigned);
			}
		}

		let updated = self
			.state_machine
			.update_order_with(order_id, |o| {
				o.driver_id = Some(principal.id.clone());
			})
			.await?;

		self.event_bus
			.order_status_changed()
			.publish(OrderStatusChanged {
				order: updated.clone(),
			})
			.ok();

		Ok(updated)
	}
}
