//! Fixtures shared by the session and coordinator tests.

use crate::IntentSession;
use alloy_primitives::{address, Address, Bytes};
use async_trait::async_trait;
use intent_account::{LocalWallet, WalletError, WalletInterface};
use intent_config::builders::ConfigBuilder;
use intent_order::{FixedClock, TypedDataPayload};
use intent_types::SecretString;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const NOW: u64 = 1_700_000_000;
pub const KEY0: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const KEY1: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
pub const USDT: Address = address!("0xBF882Fc99800A93494fe4844DC0002FcbaA79A7A");
pub const INTENT_ADDRESS: Address = address!("0x3333333333333333333333333333333333333333");

pub fn local_wallet(key: &str) -> Arc<LocalWallet> {
	Arc::new(
		LocalWallet::new(&SecretString::from(key), 11155111, [11155111, 357]).unwrap(),
	)
}

pub fn address_of(key: &str) -> Address {
	alloy_signer_local::PrivateKeySigner::from_str(key)
		.unwrap()
		.address()
}

pub fn session_with(wallet: Arc<dyn WalletInterface>) -> IntentSession {
	let config = ConfigBuilder::new().build();
	IntentSession::new(&config, wallet, Arc::new(FixedClock::new(NOW)))
}

/// Wallet that reports one identity and signs with another key.
pub struct ImpostorWallet {
	inner: LocalWallet,
	reported: Address,
}

impl ImpostorWallet {
	pub fn new(signing_key: &str, reported: Address) -> Self {
		Self {
			inner: LocalWallet::new(&SecretString::from(signing_key), 11155111, [11155111, 357])
				.unwrap(),
			reported,
		}
	}
}

#[async_trait]
impl WalletInterface for ImpostorWallet {
	fn address(&self) -> Option<Address> {
		Some(self.reported)
	}

	fn active_chain_id(&self) -> Option<u64> {
		self.inner.active_chain_id()
	}

	async fn sign_typed_data(&self, payload: &TypedDataPayload) -> Result<Bytes, WalletError> {
		self.inner.sign_typed_data(payload).await
	}

	async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
		self.inner.switch_chain(chain_id).await
	}
}

/// Wallet whose user declines signature requests until told otherwise.
pub struct RejectingWallet {
	inner: LocalWallet,
	rejecting: AtomicBool,
}

impl RejectingWallet {
	pub fn new(key: &str) -> Self {
		Self {
			inner: LocalWallet::new(&SecretString::from(key), 11155111, [11155111, 357]).unwrap(),
			rejecting: AtomicBool::new(true),
		}
	}

	pub fn set_rejecting(&self, rejecting: bool) {
		self.rejecting.store(rejecting, Ordering::SeqCst);
	}
}

#[async_trait]
impl WalletInterface for RejectingWallet {
	fn address(&self) -> Option<Address> {
		self.inner.address()
	}

	fn active_chain_id(&self) -> Option<u64> {
		self.inner.active_chain_id()
	}

	async fn sign_typed_data(&self, payload: &TypedDataPayload) -> Result<Bytes, WalletError> {
		if self.rejecting.load(Ordering::SeqCst) {
			return Err(WalletError::Rejected(
				"User denied message signature".to_string(),
			));
		}
		self.inner.sign_typed_data(payload).await
	}

	async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
		self.inner.switch_chain(chain_id).await
	}
}

/// Wallet with no connected identity.
pub struct DisconnectedWallet;

#[async_trait]
impl WalletInterface for DisconnectedWallet {
	fn address(&self) -> Option<Address> {
		None
	}

	fn active_chain_id(&self) -> Option<u64> {
		None
	}

	async fn sign_typed_data(&self, _payload: &TypedDataPayload) -> Result<Bytes, WalletError> {
		Err(WalletError::NotConnected)
	}

	async fn switch_chain(&self, _chain_id: u64) -> Result<(), WalletError> {
		Err(WalletError::NotConnected)
	}
}
