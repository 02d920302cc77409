//! Subscription feeds over the event bus.
//!
//! Each feed filters a bus channel down to what the subscribing principal
//! is allowed to observe. Feeds only carry events published after the
//! subscription was created.

use crate::policy;
use crate::service::OrderService;
use eats_types::{Order, Principal};
use futures::{Stream, StreamExt};

impl OrderService {
	/// Stream of newly created orders for the restaurants the principal owns.
	///
	/// Matches on the owner id snapshotted into the event at creation time,
	/// so a restaurant changing hands does not reroute in-flight events.
	pub fn subscribe_owner_pending(
		&self,
		principal: &Principal,
	) -> impl Stream<Item = Order> + Send {
		let owner_id = principal.id.clone();
		self.event_bus
			.order_created()
			.subscribe_filtered(move |event| event.owner_id == owner_id)
			.map(|event| event.order)
	}

	/// Stream of orders that became ready for pickup.
	///
	/// The feed is shared by the whole delivery pool; claiming an order goes
	/// through [`OrderService::take_order`].
	pub fn subscribe_delivery_cooked(&self) -> impl Stream<Item = Order> + Send {
		self.event_bus
			.order_cooked()
			.subscribe_filtered(|_| true)
			.map(|event| event.order)
	}

	/// Stream of updates for a single order, restricted to its parties.
	///
	/// Party membership is evaluated against the order state carried by each
	/// event, so a driver assigned mid-stream starts receiving updates from
	/// the assignment onwards.
	pub fn subscribe_order_updates(
		&self,
		principal: &Principal,
		order_id: &str,
	) -> impl Stream<Item = Order> + Send {
		let user_id = principal.id.clone();
		let order_id = order_id.to_string();
		self.event_bus
			.order_status_changed()
			.subscribe_filtered(move |event| {
				event.order.id == order_id && policy::is_party(&event.order, &user_id)
			})
			.map(|event| event.order)
	}
}
