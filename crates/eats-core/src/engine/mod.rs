//! Core order engine orchestrating the delivery lifecycle.
//!
//! The engine owns the configured services and parks on [`OrderEngine::run`],
//! which observes the event bus for activity logging until shutdown. Request
//! handling goes through the service accessors; the loop itself never mutates
//! order state.

pub mod event_bus;

use crate::service::OrderService;
use eats_catalog::CatalogService;
use eats_config::Config;
use eats_storage::StorageService;
use eats_types::truncate_id;
use event_bus::EventBus;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Service error: {0}")]
	Service(String),
}

/// Main engine bundling the order lifecycle services.
#[derive(Clone)]
pub struct OrderEngine {
	/// Service configuration.
	config: Config,
	/// Storage service for persisting orders and items.
	storage: Arc<StorageService>,
	/// Catalog service for restaurant and dish lookups.
	catalog: Arc<CatalogService>,
	/// Order lifecycle service.
	orders: Arc<OrderService>,
	/// Event bus fanning lifecycle events out to subscribers.
	event_bus: EventBus,
}

impl OrderEngine {
	/// Creates a new engine from already constructed services.
	///
	/// Use [`ServiceBuilder`](crate::builder::ServiceBuilder) to construct an
	/// engine from configuration.
	pub fn new(
		config: Config,
		storage: Arc<StorageService>,
		catalog: Arc<CatalogService>,
		orders: Arc<OrderService>,
		event_bus: EventBus,
	) -> Self {
		Self {
			config,
			storage,
			catalog,
			orders,
			event_bus,
		}
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn storage(&self) -> &Arc<StorageService> {
		&self.storage
	}

	pub fn catalog(&self) -> &Arc<CatalogService> {
		&self.catalog
	}

	pub fn orders(&self) -> &Arc<OrderService> {
		&self.orders
	}

	pub fn event_bus(&self) -> &EventBus {
		&self.event_bus
	}

	/// Main execution loop.
	///
	/// Logs lifecycle activity from the event bus until a shutdown signal
	/// arrives. Returns once the signal is received so the caller can finish
	/// cleanly.
	pub async fn run(&self) -> Result<(), EngineError> {
		let mut created = self.event_bus.order_created().subscribe();
		let mut status_changed = self.event_bus.order_status_changed().subscribe();

		tracing::info!(service = %self.config.service.id, "Engine running");

		loop {
			tokio::select! {
				Ok(event) = created.recv() => {
					tracing::info!(
						order_id = %truncate_id(&event.order.id),
						restaurant_id = %truncate_id(&event.order.restaurant_id),
						total = %event.order.total,
						"Order created"
					);
				}

				Ok(event) = status_changed.recv() => {
					tracing::info!(
						order_id = %truncate_id(&event.order.id),
						status = %event.order.status,
						"Order updated"
					);
				}

				// Shutdown signal
				res = tokio::signal::ctrl_c() => {
					res.map_err(|e| EngineError::Service(e.to_string()))?;
					tracing::info!("Shutdown signal received");
					break;
				}
			}
		}

		Ok(())
	}
}
