//! Order construction for gasless cross-chain intents.
//!
//! This crate turns raw form input into the canonical signing subject. Input is
//! checked by the [`ValidationEngine`], deadlines come from the
//! [`DeadlinePolicy`], the [`OrderBuilder`] assembles the `Order` and its
//! bridge payload, and the [`TypedDataSchema`] derives the EIP-712 payload a
//! wallet signs.

use alloy_primitives::Address;
use intent_types::{token_decimals, NetworksConfig};
use thiserror::Error;

pub mod builder;
pub mod deadline;
pub mod form;
pub mod typed_data;
pub mod validation;

pub use builder::{BuiltOrder, OrderBuilder};
pub use deadline::{Clock, DeadlinePolicy, Deadlines, FixedClock, SystemClock};
pub use form::{accepts_amount_input, IntentForm};
pub use typed_data::{SigningDomain, TypedDataPayload, TypedDataSchema, TypedField};
pub use validation::{ValidatedFields, ValidationEngine};

/// User-correctable input errors.
///
/// Each variant carries the message shown next to the form. Checks run in a
/// fixed order and the first failure wins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
	#[error("Please select a source chain.")]
	MissingSourceChain,
	#[error("Please select a destination chain.")]
	MissingDestinationChain,
	#[error("Source and destination chains must be different.")]
	SameChain,
	#[error("Please select a token.")]
	InvalidToken,
	#[error("Please enter a positive amount.")]
	InvalidAmount,
	#[error("Amount cannot have more than {decimals} decimal places for this token.")]
	AmountPrecision { decimals: u8 },
	#[error("Please enter the nonce (must be a valid non-negative integer).")]
	InvalidNonce,
	#[error("Open Deadline must be a valid positive integer (timestamp).")]
	InvalidOpenDeadline,
	#[error("Fill Deadline must be a valid positive integer (timestamp).")]
	InvalidFillDeadline,
	#[error("Open Deadline must be earlier than Fill Deadline.")]
	DeadlineOrder,
	#[error("Deadlines must be in the future.")]
	DeadlineElapsed,
}

/// Errors raised while turning validated input into a signable payload.
#[derive(Debug, Error)]
pub enum OrderError {
	/// No intent factory is configured for the chain.
	#[error("Unsupported chain: {0}")]
	UnsupportedChain(u64),
	/// A chain id does not fit the signing domain.
	#[error("Invalid chain id: {0}")]
	InvalidChainId(String),
	/// Orders are signed with a zero intent address only.
	#[error("Intent address must be the zero placeholder at signing time, found {0}")]
	IntentAddressNotPlaceholder(Address),
	/// A typed-data payload deviates from the fixed `Order` schema.
	#[error("Non-canonical typed data: {0}")]
	NonCanonicalTypes(String),
	/// Typed-data JSON could not be produced or read.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// The `orderData` payload could not be decoded.
	#[error("Invalid order data: {0}")]
	InvalidOrderData(String),
}

/// Source of token precision used to bound amount input.
pub trait TokenMetadata: Send + Sync {
	/// Returns the number of fractional digits `token` accepts on `chain_id`.
	fn token_decimals(&self, chain_id: u64, token: &Address) -> u8;
}

impl TokenMetadata for NetworksConfig {
	fn token_decimals(&self, chain_id: u64, token: &Address) -> u8 {
		token_decimals(self, chain_id, token)
	}
}
