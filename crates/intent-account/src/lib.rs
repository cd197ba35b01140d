//! Wallet capabilities consumed by the intent signer.
//!
//! The signer never manages wallet connections itself. It reads the connected
//! identity and active chain, asks for typed-data signatures and requests
//! chain switches through [`WalletInterface`]. Browser or hardware wallets sit
//! behind this trait in production; [`implementations::local`] provides a
//! private-key wallet for development and tests.

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use intent_order::TypedDataPayload;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

pub use implementations::local::LocalWallet;

/// Errors reported by a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
	/// No identity is connected.
	#[error("Wallet not connected")]
	NotConnected,
	/// The user or wallet declined the request.
	#[error("Request rejected: {0}")]
	Rejected(String),
	/// The wallet failed while producing a signature.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// The wallet could not switch to the requested chain.
	#[error("Failed to switch to chain {chain_id}: {reason}")]
	ChainSwitchFailed { chain_id: u64, reason: String },
	/// Key material is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}

/// External wallet capability.
///
/// Identity and active chain are owned by the wallet; callers treat them as
/// read-only inputs.
#[async_trait]
pub trait WalletInterface: Send + Sync {
	/// The connected identity, or `None` when disconnected.
	fn address(&self) -> Option<Address>;

	/// The chain the wallet currently operates on.
	fn active_chain_id(&self) -> Option<u64>;

	/// Signs typed data with the EIP-712 scheme and returns the 65-byte
	/// `r || s || v` signature.
	async fn sign_typed_data(&self, payload: &TypedDataPayload) -> Result<Bytes, WalletError>;

	/// Asks the wallet to operate on `chain_id`.
	async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError>;
}
