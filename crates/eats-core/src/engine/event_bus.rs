//! Event bus for broadcasting order lifecycle events.
//!
//! The bus owns one broadcast channel per event type so subscribers only
//! receive the payloads they care about. Publishing is fire-and-forget:
//! delivery failures and the absence of subscribers never fail the
//! operation that raised the event.

use eats_types::{OrderCooked, OrderCreated, OrderStatusChanged};
use futures::Stream;
use tokio::sync::broadcast;

/// A broadcast channel carrying one event payload type.
#[derive(Clone)]
pub struct Channel<T> {
	sender: broadcast::Sender<T>,
}

impl<T: Clone + Send + 'static> Channel<T> {
	/// Creates a channel that buffers up to `capacity` events per subscriber.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Publishes an event to all current subscribers.
	///
	/// Returns the number of subscribers the event was delivered to. With no
	/// live subscribers the underlying channel reports an error; callers
	/// treat publishing as fire-and-forget and ignore the result.
	pub fn publish(&self, event: T) -> Result<usize, broadcast::error::SendError<T>> {
		self.sender.send(event)
	}

	/// Subscribes to all events on this channel.
	pub fn subscribe(&self) -> broadcast::Receiver<T> {
		self.sender.subscribe()
	}

	/// Subscribes with a predicate, yielding only matching events.
	///
	/// The predicate is evaluated against each payload at delivery time. A
	/// subscriber that lags behind the channel capacity skips the missed
	/// events and continues with the newest ones. Dropping the stream
	/// releases the subscription.
	pub fn subscribe_filtered<F>(&self, predicate: F) -> impl Stream<Item = T> + Send
	where
		F: Fn(&T) -> bool + Send + 'static,
	{
		let mut receiver = self.sender.subscribe();
		async_stream::stream! {
			loop {
				match receiver.recv().await {
					Ok(event) => {
						if predicate(&event) {
							yield event;
						}
					},
					Err(broadcast::error::RecvError::Lagged(skipped)) => {
						tracing::warn!(skipped = skipped, "Subscriber lagged, skipping missed events");
					},
					Err(broadcast::error::RecvError::Closed) => break,
				}
			}
		}
	}
}

/// Event bus carrying the order lifecycle channels.
///
/// Cloning the bus is cheap; every clone publishes into the same channels.
#[derive(Clone)]
pub struct EventBus {
	/// New orders, consumed by restaurant owner feeds.
	order_created: Channel<OrderCreated>,
	/// Orders ready for pickup, consumed by the delivery pool.
	order_cooked: Channel<OrderCooked>,
	/// Any status or assignment change, consumed by per-order feeds.
	order_status_changed: Channel<OrderStatusChanged>,
}

impl EventBus {
	/// Creates an event bus whose channels buffer `capacity` events each.
	pub fn new(capacity: usize) -> Self {
		Self {
			order_created: Channel::new(capacity),
			order_cooked: Channel::new(capacity),
			order_status_changed: Channel::new(capacity),
		}
	}

	/// Returns the channel carrying order creation events.
	pub fn order_created(&self) -> &Channel<OrderCreated> {
		&self.order_created
	}

	/// Returns the channel carrying order cooked events.
	pub fn order_cooked(&self) -> &Channel<OrderCooked> {
		&self.order_cooked
	}

	/// Returns the channel carrying order status change events.
	pub fn order_status_changed(&self) -> &Channel<OrderStatusChanged> {
		&self.order_status_changed
	}
}
