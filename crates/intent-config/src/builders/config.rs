//! Configuration builder for creating test and development configurations.
//!
//! The default configuration describes a Sepolia source chain carrying USDT,
//! WBTC and WETH with their demo precisions, and a destination chain 357.

use crate::{AccountConfig, Config, IntentConfig};
use alloy_primitives::{address, Address};
use intent_types::{
	DeadlinePreference, NetworkConfig, NetworksConfig, SecretString, TokenConfig,
};

/// Builder for creating `Config` instances with a fluent API.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	domain_name: String,
	domain_version: String,
	salt: String,
	default_source_chain_id: u64,
	default_deadline_preference: DeadlinePreference,
	networks: NetworksConfig,
	private_key: Option<String>,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

fn token(address: Address, symbol: &str, decimals: u8) -> TokenConfig {
	TokenConfig {
		address,
		symbol: symbol.to_string(),
		decimals,
	}
}

impl ConfigBuilder {
	/// Creates a new `ConfigBuilder` with default values suitable for testing.
	pub fn new() -> Self {
		let mut networks = NetworksConfig::new();
		networks.insert(
			11155111,
			NetworkConfig {
				name: "Sepolia".to_string(),
				intent_factory_address: address!("0x1111111111111111111111111111111111111111"),
				tokens: vec![
					token(
						address!("0xBF882Fc99800A93494fe4844DC0002FcbaA79A7A"),
						"USDT",
						2,
					),
					token(
						address!("0xc580C2C0005798751cd0c221292667deeb991157"),
						"WBTC",
						8,
					),
					token(
						address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
						"WETH",
						9,
					),
				],
			},
		);
		networks.insert(
			357,
			NetworkConfig {
				name: "Destination".to_string(),
				intent_factory_address: address!("0x2222222222222222222222222222222222222222"),
				tokens: Vec::new(),
			},
		);

		Self {
			domain_name: "SignOrder".to_string(),
			domain_version: "1".to_string(),
			salt: "test-salt".to_string(),
			default_source_chain_id: 11155111,
			default_deadline_preference: DeadlinePreference::Auto,
			networks,
			private_key: None,
		}
	}

	/// Sets the EIP-712 domain name.
	pub fn domain_name(mut self, name: impl Into<String>) -> Self {
		self.domain_name = name.into();
		self
	}

	/// Sets the EIP-712 domain version.
	pub fn domain_version(mut self, version: impl Into<String>) -> Self {
		self.domain_version = version.into();
		self
	}

	/// Sets the intent address salt.
	pub fn salt(mut self, salt: impl Into<String>) -> Self {
		self.salt = salt.into();
		self
	}

	/// Sets the chain selected on session start and reset.
	pub fn default_source_chain_id(mut self, chain_id: u64) -> Self {
		self.default_source_chain_id = chain_id;
		self
	}

	/// Sets the deadline preset of fresh sessions.
	pub fn default_deadline_preference(mut self, preference: DeadlinePreference) -> Self {
		self.default_deadline_preference = preference;
		self
	}

	/// Adds or replaces a network.
	pub fn network(mut self, chain_id: u64, network: NetworkConfig) -> Self {
		self.networks.insert(chain_id, network);
		self
	}

	/// Configures a local wallet key.
	pub fn private_key(mut self, key: impl Into<String>) -> Self {
		self.private_key = Some(key.into());
		self
	}

	/// Builds the `Config` with the configured values.
	pub fn build(self) -> Config {
		Config {
			intent: IntentConfig {
				domain_name: self.domain_name,
				domain_version: self.domain_version,
				salt: self.salt,
				default_source_chain_id: self.default_source_chain_id,
				default_deadline_preference: self.default_deadline_preference,
			},
			networks: self.networks,
			account: self.private_key.map(|key| AccountConfig {
				private_key: SecretString::from(key),
			}),
		}
	}
}
