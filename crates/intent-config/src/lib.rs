//! Configuration module for the gasless intent signer.
//!
//! This module provides structures and utilities for managing signer configuration.
//! It supports loading configuration from TOML files and validates that every
//! network can act as an EIP-712 verifying domain before any order is built.
//!
//! ## Modular Configuration Support
//!
//! Configurations can be split into multiple files for better organization:
//! - Use `include = ["file1.toml", "file2.toml"]` to include other config files
//! - Each top-level section must be unique across all files (no duplicates allowed)

#[cfg(any(test, feature = "testing"))]
pub mod builders;
mod loader;

use alloy_primitives::{keccak256, B256};
use intent_types::{
	deserialize_networks, utils::DEFAULT_SOURCE_CHAIN_ID, DeadlinePreference, NetworksConfig,
	SecretString,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Largest decimal count whose scale factor still fits in a `uint256`.
pub const MAX_TOKEN_DECIMALS: u8 = 77;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		let message = err.message().to_string();
		ConfigError::Parse(message)
	}
}

/// Main configuration structure for the intent signer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Signing domain and session defaults.
	pub intent: IntentConfig,
	/// Network and token configurations.
	#[serde(deserialize_with = "deserialize_networks")]
	pub networks: NetworksConfig,
	/// Local development wallet. External wallets need no configuration.
	#[serde(default)]
	pub account: Option<AccountConfig>,
}

/// Signing domain identity and session defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IntentConfig {
	/// EIP-712 domain name shared by every intent factory.
	#[serde(default = "default_domain_name")]
	pub domain_name: String,
	/// EIP-712 domain version.
	#[serde(default = "default_domain_version")]
	pub domain_version: String,
	/// Salt passed (hashed) to the factory when deriving intent addresses.
	pub salt: String,
	/// Chain the session starts on and returns to on reset.
	#[serde(default = "default_source_chain_id")]
	pub default_source_chain_id: u64,
	/// Deadline preset applied to fresh sessions.
	#[serde(default)]
	pub default_deadline_preference: DeadlinePreference,
}

impl IntentConfig {
	/// Returns `keccak256(salt)`, the salt argument of `getIntentAddress`.
	pub fn salt_hash(&self) -> B256 {
		keccak256(self.salt.as_bytes())
	}
}

fn default_domain_name() -> String {
	"SignOrder".to_string()
}

fn default_domain_version() -> String {
	"1".to_string()
}

fn default_source_chain_id() -> u64 {
	DEFAULT_SOURCE_CHAIN_ID
}

/// Local key wallet configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
	pub private_key: SecretString,
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let var_name = var_name.as_str();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => {
				if let Some(default) = default_value {
					default.to_string()
				} else {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					)));
				}
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a file with async environment variable resolution.
	///
	/// This method supports modular configuration through include directives:
	/// - `include = ["file1.toml", "file2.toml"]` - Include specific files
	///
	/// Each top-level section must be unique across all configuration files.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let path_buf = Path::new(path);
		let base_dir = path_buf.parent().unwrap_or_else(|| Path::new("."));

		let mut loader = loader::ConfigLoader::new(base_dir);
		let file_name = path_buf
			.file_name()
			.ok_or_else(|| ConfigError::Validation(format!("Invalid path: {}", path)))?;
		loader.load_config(file_name).await
	}

	/// Validates the configuration.
	///
	/// Checks that:
	/// - The signing domain name, version and salt are non-empty
	/// - At least two networks are configured (an order needs distinct source and destination)
	/// - Every network names a non-zero intent factory
	/// - Token addresses are unique per network and decimals stay within `uint256` range
	/// - The default source chain is one of the configured networks
	fn validate(&self) -> Result<(), ConfigError> {
		if self.intent.domain_name.trim().is_empty() {
			return Err(ConfigError::Validation(
				"Intent domain_name cannot be empty".into(),
			));
		}
		if self.intent.domain_version.trim().is_empty() {
			return Err(ConfigError::Validation(
				"Intent domain_version cannot be empty".into(),
			));
		}
		if self.intent.salt.is_empty() {
			return Err(ConfigError::Validation("Intent salt cannot be empty".into()));
		}

		if self.networks.is_empty() {
			return Err(ConfigError::Validation(
				"Networks configuration cannot be empty".into(),
			));
		}
		if self.networks.len() < 2 {
			return Err(ConfigError::Validation(
				"At least 2 different networks must be configured".into(),
			));
		}
		for (chain_id, network) in &self.networks {
			if *chain_id == 0 {
				return Err(ConfigError::Validation(
					"Network chain id must be a positive integer".into(),
				));
			}
			if network.intent_factory_address.is_zero() {
				return Err(ConfigError::Validation(format!(
					"Network {} must have a non-zero intent_factory_address",
					chain_id
				)));
			}

			let mut seen = HashSet::new();
			for token in &network.tokens {
				if !seen.insert(token.address) {
					return Err(ConfigError::Validation(format!(
						"Network {} lists token {} more than once",
						chain_id, token.address
					)));
				}
				if token.decimals > MAX_TOKEN_DECIMALS {
					return Err(ConfigError::Validation(format!(
						"Token {} on network {} has {} decimals (max: {})",
						token.symbol, chain_id, token.decimals, MAX_TOKEN_DECIMALS
					)));
				}
			}
		}

		if !self
			.networks
			.contains_key(&self.intent.default_source_chain_id)
		{
			return Err(ConfigError::Validation(format!(
				"Default source chain {} is not a configured network",
				self.intent.default_source_chain_id
			)));
		}

		if let Some(account) = &self.account {
			if account.private_key.is_empty() {
				return Err(ConfigError::Validation(
					"Account private_key cannot be empty".into(),
				));
			}
		}

		Ok(())
	}
}

/// Implementation of FromStr trait for Config to enable parsing from string.
///
/// This allows configuration to be parsed from TOML strings using the standard
/// string parsing interface. Environment variables are resolved and the
/// configuration is automatically validated after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
