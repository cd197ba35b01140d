//! Subcommand implementations.
//!
//! Each command loads no state of its own: it receives the parsed
//! configuration, builds a session over a wallet and prints JSON to stdout.

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use clap::Args as ClapArgs;
use intent_account::{LocalWallet, WalletError, WalletInterface};
use intent_config::{Config, ConfigError};
use intent_core::{
	IntentError, IntentSession, RecoveryVerifier, SigningCoordinator, StaticResolver,
};
use intent_order::{OrderError, SystemClock, TypedDataPayload};
use intent_types::DeadlinePreference;
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors reported by the command-line driver.
#[derive(Debug, Error)]
pub enum CliError {
	#[error("Configuration error: {0}")]
	Config(#[from] ConfigError),
	#[error("{0}")]
	Intent(#[from] IntentError),
	#[error("Wallet error: {0}")]
	Wallet(#[from] WalletError),
	#[error("Order error: {0}")]
	Order(#[from] OrderError),
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
	#[error("{0}")]
	Usage(String),
	/// The signature verified, but for a different signer.
	#[error(
		"Signature was produced by {}, expected {}",
		.0.recovered_address,
		.0.expected_address
	)]
	SignerMismatch(VerifyReport),
}

/// Order inputs shared by `build` and `sign`.
///
/// Inputs apply in a fixed order: demo defaults, source chain, destination,
/// token, amount, nonce, then deadlines. The token is applied before the
/// amount because selecting a token clears it.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct FormArgs {
	/// Start from the demo order (Sepolia to chain 357, 100 of the first token)
	#[arg(long)]
	pub demo: bool,

	/// Source chain id
	#[arg(long)]
	pub source_chain: Option<u64>,

	/// Destination chain id
	#[arg(long)]
	pub dest_chain: Option<u64>,

	/// Token address or symbol on the source chain
	#[arg(long)]
	pub token: Option<String>,

	/// Amount in whole token units, e.g. 1.5
	#[arg(long)]
	pub amount: Option<String>,

	/// Order nonce
	#[arg(long)]
	pub nonce: Option<String>,

	/// Deadline preset (fast, auto, economy)
	#[arg(long)]
	pub deadline: Option<DeadlinePreference>,

	/// Explicit open deadline (UNIX seconds); requires --fill-deadline
	#[arg(long, requires = "fill_deadline")]
	pub open_deadline: Option<String>,

	/// Explicit fill deadline (UNIX seconds); requires --open-deadline
	#[arg(long, requires = "open_deadline")]
	pub fill_deadline: Option<String>,
}

/// Wallet that exposes an identity but cannot sign.
///
/// Lets `build` produce typed data for an address whose key lives elsewhere.
struct WatchOnlyWallet {
	address: Address,
}

#[async_trait]
impl WalletInterface for WatchOnlyWallet {
	fn address(&self) -> Option<Address> {
		Some(self.address)
	}

	fn active_chain_id(&self) -> Option<u64> {
		None
	}

	async fn sign_typed_data(&self, _payload: &TypedDataPayload) -> Result<Bytes, WalletError> {
		Err(WalletError::SigningFailed(
			"watch-only identity cannot sign".to_string(),
		))
	}

	async fn switch_chain(&self, _chain_id: u64) -> Result<(), WalletError> {
		Ok(())
	}
}

/// Creates the local development wallet from the `[account]` section.
pub fn local_wallet(config: &Config) -> Result<Arc<LocalWallet>, CliError> {
	let account = config.account.as_ref().ok_or_else(|| {
		CliError::Usage("an [account] private_key is required to sign".to_string())
	})?;
	let wallet = LocalWallet::new(
		&account.private_key,
		config.intent.default_source_chain_id,
		config.networks.keys().copied(),
	)?;
	Ok(Arc::new(wallet))
}

fn session(config: &Config, wallet: Arc<dyn WalletInterface>) -> IntentSession {
	IntentSession::new(config, wallet, Arc::new(SystemClock))
}

/// Resolves `--token` to an address, accepting a symbol configured on the
/// selected source chain.
fn resolve_token(config: &Config, source_chain_id: Option<u64>, token: &str) -> String {
	if Address::from_str(token).is_ok() {
		return token.to_string();
	}
	source_chain_id
		.and_then(|chain_id| config.networks.get(&chain_id))
		.and_then(|network| network.token_by_symbol(token))
		.map(|t| t.address.to_string())
		.unwrap_or_else(|| token.to_string())
}

/// Applies the form inputs to `session`.
pub async fn apply_form(
	session: &mut IntentSession,
	config: &Config,
	form: &FormArgs,
) -> Result<(), CliError> {
	if form.demo {
		session.fill_demo_defaults().await?;
	}
	if let Some(chain_id) = form.source_chain {
		match session.select_source_chain(chain_id).await {
			Err(IntentError::ChainSwitch(reason)) => {
				warn!(chain_id, %reason, "Continuing without wallet chain switch");
			},
			other => other?,
		}
	}
	if let Some(chain_id) = form.dest_chain {
		session.set_destination_chain(Some(chain_id))?;
	}
	if let Some(token) = &form.token {
		let token = resolve_token(config, session.form().source_chain_id, token);
		session.set_token(token)?;
	}
	if let Some(amount) = &form.amount {
		if !session.set_amount(amount)? {
			return Err(CliError::Usage(format!(
				"amount '{}' is not a valid amount for the selected token",
				amount
			)));
		}
	}
	if let Some(nonce) = &form.nonce {
		session.set_nonce(nonce.clone())?;
	}
	if let Some(preference) = form.deadline {
		if !DeadlinePreference::presets().contains(&preference) {
			return Err(CliError::Usage(
				"custom deadlines are set with --open-deadline and --fill-deadline".to_string(),
			));
		}
		session.set_deadline_preference(preference)?;
	}
	if let (Some(open), Some(fill)) = (&form.open_deadline, &form.fill_deadline) {
		session.set_custom_deadlines(open.clone(), fill.clone())?;
	}
	Ok(())
}

/// Builds the typed-data payload for the form and returns it as
/// `eth_signTypedData_v4` JSON.
///
/// The order is built for `user` when given, otherwise for the configured
/// local key.
pub async fn build(
	config: &Config,
	form: &FormArgs,
	user: Option<Address>,
) -> Result<String, CliError> {
	let wallet: Arc<dyn WalletInterface> = match user {
		Some(address) => Arc::new(WatchOnlyWallet { address }),
		None => local_wallet(config)?,
	};
	let mut session = session(config, wallet);
	apply_form(&mut session, config, form).await?;

	let request = session.begin_signing()?;
	info!(
		attempt = request.attempt,
		chain_id = request.payload.domain.chain_id,
		"Built typed data"
	);
	Ok(request.payload.to_json()?)
}

/// Signs the form with the local key, resolves against `intent_address` and
/// returns the finalized intent as JSON.
pub async fn sign(
	config: &Config,
	form: &FormArgs,
	intent_address: Address,
) -> Result<String, CliError> {
	let wallet = local_wallet(config)?;
	let mut session = session(config, wallet);
	apply_form(&mut session, config, form).await?;

	let coordinator = SigningCoordinator::new(Arc::new(StaticResolver::new(intent_address)));
	let finalized = coordinator.sign_and_finalize(&mut session).await?;
	Ok(serde_json::to_string_pretty(&finalized)?)
}

/// Outcome of `verify`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerifyReport {
	pub expected_address: Address,
	pub recovered_address: Address,
	pub matches: bool,
}

/// Recovers the signer of a typed-data JSON document and compares it with
/// `expected`.
///
/// # Errors
///
/// Returns [`CliError::SignerMismatch`] carrying the report when another key
/// signed, and [`CliError::Intent`] when no signer can be recovered.
pub async fn verify(
	typed_data_json: &str,
	signature: &str,
	expected: Address,
) -> Result<VerifyReport, CliError> {
	let payload = TypedDataPayload::from_json(typed_data_json)?;
	let signature = Bytes::from_str(signature)
		.map_err(|e| CliError::Usage(format!("invalid signature hex: {}", e)))?;

	let verifier = RecoveryVerifier::new();
	match verifier.verify(&payload, &signature, expected) {
		Ok(recovered) => Ok(VerifyReport {
			expected_address: expected,
			recovered_address: recovered,
			matches: true,
		}),
		Err(IntentError::RecoveryMismatch { recovered, .. }) => {
			warn!(%expected, %recovered, "Signature was produced by a different key");
			Err(CliError::SignerMismatch(VerifyReport {
				expected_address: expected,
				recovered_address: recovered,
				matches: false,
			}))
		},
		Err(e) => Err(e.into()),
	}
}

/// Token entry of the `networks` listing.
#[derive(Debug, Serialize)]
pub struct TokenInfo {
	pub address: Address,
	pub symbol: String,
	pub decimals: u8,
}

/// Network entry of the `networks` listing.
#[derive(Debug, Serialize)]
pub struct NetworkInfo {
	pub chain_id: u64,
	pub name: String,
	pub intent_factory: Address,
	pub tokens: Vec<TokenInfo>,
}

/// Lists configured networks and tokens, ordered by chain id.
pub fn networks(config: &Config) -> Vec<NetworkInfo> {
	let mut networks: Vec<NetworkInfo> = config
		.networks
		.iter()
		.map(|(chain_id, network)| NetworkInfo {
			chain_id: *chain_id,
			name: network.name.clone(),
			intent_factory: network.intent_factory_address,
			tokens: network
				.tokens
				.iter()
				.map(|t| TokenInfo {
					address: t.address,
					symbol: t.symbol.clone(),
					decimals: t.decimals,
				})
				.collect(),
		})
		.collect();
	networks.sort_by_key(|n| n.chain_id);
	networks
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;
	use intent_config::builders::ConfigBuilder;
	use intent_core::FinalizedIntent;

	const KEY0: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
	const USER0: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
	const USER1: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
	const INTENT_ADDRESS: Address = address!("0x3333333333333333333333333333333333333333");

	fn config() -> Config {
		ConfigBuilder::new().private_key(KEY0).build()
	}

	fn demo() -> FormArgs {
		FormArgs {
			demo: true,
			..FormArgs::default()
		}
	}

	#[tokio::test]
	async fn test_build_for_watch_only_identity() {
		let config = ConfigBuilder::new().build();
		let json = build(&config, &demo(), Some(USER1)).await.unwrap();

		let payload = TypedDataPayload::from_json(&json).unwrap();
		assert_eq!(payload.primary_type, "Order");
		assert_eq!(payload.message.user, USER1);
		assert_eq!(payload.message.intentAddress, Address::ZERO);
		assert_eq!(payload.domain.chain_id, 11155111);
	}

	#[tokio::test]
	async fn test_build_without_identity_fails() {
		let config = ConfigBuilder::new().build();
		let err = build(&config, &demo(), None).await.unwrap_err();
		assert!(matches!(err, CliError::Usage(_)));
	}

	#[tokio::test]
	async fn test_token_symbol_and_amount() {
		let form = FormArgs {
			demo: true,
			token: Some("wbtc".to_string()),
			amount: Some("0.00000001".to_string()),
			..FormArgs::default()
		};
		let json = build(&config(), &form, None).await.unwrap();
		let payload = TypedDataPayload::from_json(&json).unwrap();
		let transfer = intent_types::BridgeTransfer::decode(&payload.message.orderData).unwrap();
		assert_eq!(
			transfer.output_token,
			address!("0xc580C2C0005798751cd0c221292667deeb991157")
		);
		assert_eq!(transfer.amount, alloy_primitives::U256::from(1u64));
	}

	#[tokio::test]
	async fn test_amount_over_precision_is_usage_error() {
		let form = FormArgs {
			demo: true,
			amount: Some("1.001".to_string()),
			..FormArgs::default()
		};
		let err = build(&config(), &form, None).await.unwrap_err();
		assert!(matches!(err, CliError::Usage(_)));
	}

	#[tokio::test]
	async fn test_sign_then_verify() {
		let config = config();
		let json = sign(&config, &demo(), INTENT_ADDRESS).await.unwrap();
		let finalized: FinalizedIntent = serde_json::from_str(&json).unwrap();
		assert_eq!(finalized.recovered_address, USER0);
		assert_eq!(finalized.resolved_intent_address, INTENT_ADDRESS);
		assert_eq!(finalized.order.intentAddress, INTENT_ADDRESS);

		// The signature covers the order with the zero intent address.
		let signed_order = finalized.order.with_intent_address(Address::ZERO);
		let payload = intent_order::TypedDataSchema::new(
			config.intent.domain_name.clone(),
			config.intent.domain_version.clone(),
			config.networks.clone(),
		)
		.derive(&signed_order)
		.unwrap();
		let typed_data = payload.to_json().unwrap();
		let signature = finalized.signature.to_string();

		let report = verify(&typed_data, &signature, USER0).await.unwrap();
		assert_eq!(
			report,
			VerifyReport {
				expected_address: USER0,
				recovered_address: USER0,
				matches: true
			}
		);

		// Another expected signer is a failure, with the report attached.
		let err = verify(&typed_data, &signature, USER1).await.unwrap_err();
		let CliError::SignerMismatch(report) = err else {
			panic!("expected signer mismatch, got {:?}", err);
		};
		assert!(!report.matches);
		assert_eq!(report.expected_address, USER1);
		assert_eq!(report.recovered_address, USER0);
	}

	#[tokio::test]
	async fn test_verify_rejects_bad_signature() {
		let config = ConfigBuilder::new().build();
		let json = build(&config, &demo(), Some(USER1)).await.unwrap();

		assert!(matches!(
			verify(&json, "0xzz", USER1).await,
			Err(CliError::Usage(_))
		));
		assert!(matches!(
			verify(&json, "0x1234", USER1).await,
			Err(CliError::Intent(IntentError::Recovery(_)))
		));
	}

	#[test]
	fn test_networks_sorted() {
		let listing = networks(&ConfigBuilder::new().build());
		let ids: Vec<u64> = listing.iter().map(|n| n.chain_id).collect();
		assert_eq!(ids, vec![357, 11155111]);
		assert_eq!(listing[1].tokens.len(), 3);
		assert_eq!(listing[1].tokens[0].symbol, "USDT");
	}
}
