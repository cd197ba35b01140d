//! Signing core for gasless cross-chain intents.
//!
//! An [`IntentSession`] holds the form, the deadline preference and the signing
//! state for one user. The [`SigningCoordinator`] drives a session through a
//! signing attempt: it builds the order, asks the wallet for a signature while
//! the intent address is resolved, then verifies the recovered signer before
//! handing out a [`FinalizedIntent`].

use alloy_primitives::Address;
use intent_order::{OrderError, ValidationError};
use thiserror::Error;

pub mod engine;
pub mod handoff;
pub mod recovery;
pub mod resolver;
pub mod session;
pub mod state;

#[cfg(test)]
mod test_utils;

pub use engine::SigningCoordinator;
pub use handoff::FinalizedIntent;
pub use recovery::RecoveryVerifier;
pub use resolver::{IntentAddressResolver, ResolutionRequest, ResolverError, StaticResolver};
pub use session::{IntentSession, ResponseOutcome, SignatureRequest};
pub use state::{SigningState, SigningStateKind};

/// Message shown when no wallet identity is available.
pub const CONNECT_WALLET_MESSAGE: &str = "Please connect your wallet first.";

/// Errors surfaced by an intent session.
///
/// Every variant renders as a message fit for display to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
	/// Input failed validation. Fixed by editing the form.
	#[error("{0}")]
	Validation(#[from] ValidationError),
	/// No signing identity is available. Requires reconnecting the wallet.
	#[error("{0}")]
	Connectivity(String),
	/// The wallet rejected or failed the signature request.
	#[error("Error signing message: {0}")]
	Signing(String),
	/// The wallet could not switch chains. The form stays editable.
	#[error("Failed to switch chain: {0}")]
	ChainSwitch(String),
	/// The recovered signer is not the connected identity.
	#[error("Signature was produced by {recovered}, expected {expected}")]
	RecoveryMismatch { expected: Address, recovered: Address },
	/// No signer could be recovered from the signature.
	#[error("Signature recovery failed: {0}")]
	Recovery(String),
	/// The intent address could not be resolved.
	#[error("Failed to resolve intent address: {0}")]
	Resolution(String),
	/// The order could not be turned into a signable payload.
	#[error("{0}")]
	Order(String),
	/// The session no longer accepts the requested change.
	#[error("Session is locked: {0}")]
	SessionLocked(String),
	/// The attempt was replaced before it completed.
	#[error("Signing attempt {0} was superseded")]
	Superseded(u64),
}

impl IntentError {
	/// True when the user can fix the cause and try again in the same session.
	pub fn is_retryable(&self) -> bool {
		matches!(
			self,
			IntentError::Validation(_)
				| IntentError::Signing(_)
				| IntentError::ChainSwitch(_)
				| IntentError::Resolution(_)
				| IntentError::Superseded(_)
		)
	}

	/// Backend errors are shown only when no validation error is pending.
	pub fn is_validation(&self) -> bool {
		matches!(self, IntentError::Validation(_))
	}
}

impl From<OrderError> for IntentError {
	fn from(err: OrderError) -> Self {
		IntentError::Order(err.to_string())
	}
}
