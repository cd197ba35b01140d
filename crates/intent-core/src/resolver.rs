//! Intent address resolution contract.
//!
//! The intent factory derives a counterfactual address from `(order, salt)`.
//! The core never performs the read itself: it builds a [`ResolutionRequest`]
//! once the order exists and hands it to an [`IntentAddressResolver`].

use alloy_primitives::{Address, Bytes, B256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use intent_types::{IIntentFactory, Order};
use thiserror::Error;

/// Errors reported by an address resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
	/// The factory could not be reached.
	#[error("Resolver unavailable: {0}")]
	Unavailable(String),
	/// The factory call reverted or failed.
	#[error("Call failed: {0}")]
	CallFailed(String),
	/// The factory answered with data that is not an address.
	#[error("Invalid response: {0}")]
	InvalidResponse(String),
}

/// A `getIntentAddress` read for one signing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRequest {
	/// Signing attempt the request belongs to.
	pub attempt: u64,
	/// Chain hosting the factory.
	pub chain_id: u64,
	/// Factory to call.
	pub factory: Address,
	/// The order exactly as it is signed, with the zero intent address.
	pub order: Order,
	/// `keccak256` of the configured salt.
	pub salt: B256,
}

impl ResolutionRequest {
	/// ABI-encoded `getIntentAddress(order, salt)` call.
	pub fn calldata(&self) -> Bytes {
		IIntentFactory::getIntentAddressCall {
			order: self.order.clone(),
			salt: self.salt,
		}
		.abi_encode()
		.into()
	}

	/// Decodes the factory's return data.
	pub fn decode_response(data: &[u8]) -> Result<Address, ResolverError> {
		IIntentFactory::getIntentAddressCall::abi_decode_returns(data, true)
			.map(|ret| ret._0)
			.map_err(|e| ResolverError::InvalidResponse(e.to_string()))
	}
}

/// External read-only capability that answers resolution requests.
#[async_trait]
pub trait IntentAddressResolver: Send + Sync {
	async fn resolve(&self, request: &ResolutionRequest) -> Result<Address, ResolverError>;
}

/// Resolver that answers every request with a known address.
///
/// Used when the intent address was obtained out of band, for example from a
/// previous `eth_call` against the factory.
#[derive(Debug, Clone, Copy)]
pub struct StaticResolver {
	intent_address: Address,
}

impl StaticResolver {
	pub fn new(intent_address: Address) -> Self {
		Self { intent_address }
	}
}

#[async_trait]
impl IntentAddressResolver for StaticResolver {
	async fn resolve(&self, _request: &ResolutionRequest) -> Result<Address, ResolverError> {
		Ok(self.intent_address)
	}
}
