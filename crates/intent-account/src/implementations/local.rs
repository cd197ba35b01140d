//! Private-key wallet for development and tests.

use crate::{WalletError, WalletInterface};
use alloy_primitives::{Address, Bytes};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use intent_order::TypedDataPayload;
use intent_types::SecretString;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Wallet backed by an in-memory private key.
///
/// Behaves like an injected browser wallet: it signs only for its active
/// chain and switches only to chains it knows about.
pub struct LocalWallet {
	signer: PrivateKeySigner,
	active_chain_id: AtomicU64,
	supported_chains: HashSet<u64>,
}

impl LocalWallet {
	/// Creates a wallet from a hex private key (with or without `0x`).
	///
	/// # Errors
	///
	/// Returns [`WalletError::InvalidKey`] if the key cannot be parsed, or if
	/// `active_chain_id` is not among `supported_chains`.
	pub fn new(
		private_key: &SecretString,
		active_chain_id: u64,
		supported_chains: impl IntoIterator<Item = u64>,
	) -> Result<Self, WalletError> {
		let signer = private_key
			.with_exposed(PrivateKeySigner::from_str)
			.map_err(|e| WalletError::InvalidKey(e.to_string()))?;
		let supported_chains: HashSet<u64> = supported_chains.into_iter().collect();

		if !supported_chains.contains(&active_chain_id) {
			return Err(WalletError::InvalidKey(format!(
				"active chain {} is not a supported chain",
				active_chain_id
			)));
		}

		Ok(Self {
			signer,
			active_chain_id: AtomicU64::new(active_chain_id),
			supported_chains,
		})
	}
}

#[async_trait]
impl WalletInterface for LocalWallet {
	fn address(&self) -> Option<Address> {
		Some(self.signer.address())
	}

	fn active_chain_id(&self) -> Option<u64> {
		Some(self.active_chain_id.load(Ordering::SeqCst))
	}

	async fn sign_typed_data(&self, payload: &TypedDataPayload) -> Result<Bytes, WalletError> {
		payload
			.ensure_canonical_types()
			.map_err(|e| WalletError::Rejected(e.to_string()))?;

		let active = self.active_chain_id.load(Ordering::SeqCst);
		if payload.domain.chain_id != active {
			return Err(WalletError::Rejected(format!(
				"Provided chainId {} must match the active chainId {}",
				payload.domain.chain_id, active
			)));
		}

		let digest = payload.signing_hash();
		debug!(chain_id = active, digest = %digest, "Signing typed data");

		let signature = self
			.signer
			.sign_hash(&digest)
			.await
			.map_err(|e| WalletError::SigningFailed(e.to_string()))?;

		Ok(Bytes::from(signature.as_bytes().to_vec()))
	}

	async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
		if !self.supported_chains.contains(&chain_id) {
			return Err(WalletError::ChainSwitchFailed {
				chain_id,
				reason: "Unrecognized chain ID".to_string(),
			});
		}
		self.active_chain_id.store(chain_id, Ordering::SeqCst);
		Ok(())
	}
}

impl std::fmt::Debug for LocalWallet {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LocalWallet")
			.field("address", &self.signer.address())
			.field("active_chain_id", &self.active_chain_id.load(Ordering::SeqCst))
			.finish()
	}
}
