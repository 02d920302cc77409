//! Principal and role types for request authorization.
//!
//! Authentication happens upstream of this system. Every operation receives
//! an already-verified principal and only consults its id and role to decide
//! visibility and permitted transitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a principal acts under when calling the order service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
	/// Customer placing and cancelling their own orders.
	Client,
	/// Restaurant owner progressing orders through the kitchen.
	Owner,
	/// Delivery rider picking up and delivering orders.
	Delivery,
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Role::Client => write!(f, "Client"),
			Role::Owner => write!(f, "Owner"),
			Role::Delivery => write!(f, "Delivery"),
		}
	}
}

/// An authenticated caller as seen by the order service.
///
/// The id is opaque; it is only ever compared against the relation ids
/// stored on an order. Principals are never persisted or mutated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
	/// Opaque user identifier issued by the auth layer.
	pub id: String,
	/// Role the caller acts under for this request.
	pub role: Role,
}

impl Principal {
	/// Creates a new principal with the given id and role.
	pub fn new(id: impl Into<String>, role: Role) -> Self {
		Self {
			id: id.into(),
			role,
		}
	}
}
