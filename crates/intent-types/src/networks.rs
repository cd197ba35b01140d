//! Network configuration types for cross-chain order construction.
//!
//! This module defines the per-chain settings the order core needs: the
//! intent factory contract that acts as EIP-712 verifying contract, and the
//! token metadata that bounds amount precision.

use alloy_primitives::Address;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Precision applied to tokens that are not declared in the network metadata.
pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;

/// Configuration for a token on a specific network.
///
/// # Fields
///
/// * `address` - The on-chain address of the token contract
/// * `symbol` - The token symbol (e.g., "USDT", "WETH")
/// * `decimals` - The number of fractional digits the token accepts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct TokenConfig {
	pub address: Address,
	pub symbol: String,
	pub decimals: u8,
}

/// Configuration for a single blockchain network.
///
/// # Fields
///
/// * `name` - Human readable chain name, used in logs and selectors
/// * `intent_factory_address` - Factory that verifies order signatures and
///   derives ephemeral intent addresses on this chain
/// * `tokens` - Tokens that may be bridged from this network
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
	#[serde(default)]
	pub name: String,
	pub intent_factory_address: Address,
	#[serde(default)]
	pub tokens: Vec<TokenConfig>,
}

impl NetworkConfig {
	/// Looks up a token by address (addresses compare byte-wise, so checksum
	/// casing in the input does not matter).
	pub fn token(&self, address: &Address) -> Option<&TokenConfig> {
		self.tokens.iter().find(|t| &t.address == address)
	}

	/// Looks up a token by its symbol, case-insensitively.
	pub fn token_by_symbol(&self, symbol: &str) -> Option<&TokenConfig> {
		self.tokens
			.iter()
			.find(|t| t.symbol.eq_ignore_ascii_case(symbol))
	}
}

/// Networks configuration mapping chain IDs to their configurations.
pub type NetworksConfig = HashMap<u64, NetworkConfig>;

/// Returns the declared precision of `token` on `chain_id`, falling back to
/// [`DEFAULT_TOKEN_DECIMALS`] when the chain or token is unknown.
pub fn token_decimals(networks: &NetworksConfig, chain_id: u64, token: &Address) -> u8 {
	networks
		.get(&chain_id)
		.and_then(|network| network.token(token))
		.map(|t| t.decimals)
		.unwrap_or(DEFAULT_TOKEN_DECIMALS)
}

/// Helper function to deserialize network configurations from TOML.
///
/// TOML tables cannot have numeric keys, so chain IDs arrive as strings and
/// are converted to `u64` here.
///
/// # Errors
///
/// Returns a deserialization error if a chain ID key cannot be parsed as a u64
/// or the underlying network configuration is invalid.
pub fn deserialize_networks<'de, D>(deserializer: D) -> Result<NetworksConfig, D::Error>
where
	D: Deserializer<'de>,
{
	let string_map: HashMap<String, NetworkConfig> = HashMap::deserialize(deserializer)?;
	let mut result = HashMap::new();

	for (key, value) in string_map {
		let chain_id = key
			.parse::<u64>()
			.map_err(|e| serde::de::Error::custom(format!("Invalid chain_id '{}': {}", key, e)))?;
		result.insert(chain_id, value);
	}

	Ok(result)
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;

	fn sepolia() -> NetworkConfig {
		NetworkConfig {
			name: "Sepolia".to_string(),
			intent_factory_address: address!("0x1111111111111111111111111111111111111111"),
			tokens: vec![TokenConfig {
				address: address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
				symbol: "WETH".to_string(),
				decimals: 9,
			}],
		}
	}

	#[test]
	fn test_token_decimals_uses_metadata() {
		let mut networks = NetworksConfig::new();
		networks.insert(11155111, sepolia());

		let weth = address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
		assert_eq!(token_decimals(&networks, 11155111, &weth), 9);
	}

	#[test]
	fn test_token_decimals_defaults_for_unknown() {
		let mut networks = NetworksConfig::new();
		networks.insert(11155111, sepolia());

		let unknown = address!("0x2222222222222222222222222222222222222222");
		assert_eq!(
			token_decimals(&networks, 11155111, &unknown),
			DEFAULT_TOKEN_DECIMALS
		);
		assert_eq!(
			token_decimals(&networks, 1, &unknown),
			DEFAULT_TOKEN_DECIMALS
		);
	}

	#[test]
	fn test_token_by_symbol_is_case_insensitive() {
		let network = sepolia();
		assert!(network.token_by_symbol("weth").is_some());
		assert!(network.token_by_symbol("USDT").is_none());
	}
}
