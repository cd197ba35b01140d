//! Common types for the gasless intent signing workspace.
//!
//! This crate defines the data shared by every other crate: the signed
//! `Order` struct and its bridge payload, network and token metadata,
//! deadline presets, session events and the EIP-712 hashing helpers.

/// Deadline preference presets.
pub mod deadline;
/// Session events for external observers.
pub mod events;
/// Network and token configuration types.
pub mod networks;
/// The signed order struct, its payload and the intent factory interface.
pub mod order;
/// Redacted string type for key material.
pub mod secret_string;
/// Utility functions for hashing, amount conversion and formatting.
pub mod utils;

pub use deadline::DeadlinePreference;
pub use events::SessionEvent;
pub use networks::{
	deserialize_networks, token_decimals, NetworkConfig, NetworksConfig, TokenConfig,
	DEFAULT_TOKEN_DECIMALS,
};
pub use order::{bridge_transfer_order_type, BridgeTransfer, IIntentFactory, Order};
pub use secret_string::SecretString;
pub use utils::{current_timestamp, format_token_amount, parse_token_amount, truncate_id};
