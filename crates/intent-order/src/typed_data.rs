//! EIP-712 payload derivation.
//!
//! A [`TypedDataPayload`] is the `(domain, types, primaryType, message)` quadruple
//! sent to a wallet. It is derived once per signing attempt and kept verbatim
//! so recovery hashes exactly what was signed.

use crate::OrderError;
use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::Eip712Domain;
use intent_types::utils::eip712::{
	compute_domain_hash, compute_final_digest, compute_order_struct_hash, ORDER_PRIMARY_TYPE,
};
use intent_types::{NetworksConfig, Order};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

const DOMAIN_TYPE_NAME: &str = "EIP712Domain";

const DOMAIN_FIELDS: [(&str, &str); 4] = [
	("name", "string"),
	("version", "string"),
	("chainId", "uint256"),
	("verifyingContract", "address"),
];

const ORDER_FIELDS: [(&str, &str); 8] = [
	("intentAddress", "address"),
	("user", "address"),
	("nonce", "uint256"),
	("sourceChainId", "uint256"),
	("openDeadline", "uint32"),
	("fillDeadline", "uint32"),
	("orderDataType", "bytes32"),
	("orderData", "bytes"),
];

/// One member of an EIP-712 struct type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedField {
	pub name: String,
	#[serde(rename = "type")]
	pub kind: String,
}

fn fields(pairs: &[(&str, &str)]) -> Vec<TypedField> {
	pairs
		.iter()
		.map(|(name, kind)| TypedField {
			name: name.to_string(),
			kind: kind.to_string(),
		})
		.collect()
}

/// The fixed type map: `EIP712Domain` and `Order`.
pub fn canonical_types() -> BTreeMap<String, Vec<TypedField>> {
	let mut types = BTreeMap::new();
	types.insert(DOMAIN_TYPE_NAME.to_string(), fields(&DOMAIN_FIELDS));
	types.insert(ORDER_PRIMARY_TYPE.to_string(), fields(&ORDER_FIELDS));
	types
}

/// EIP-712 domain of an intent factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningDomain {
	pub name: String,
	pub version: String,
	pub chain_id: u64,
	pub verifying_contract: Address,
}

/// Typed data in `eth_signTypedData_v4` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedDataPayload {
	pub types: BTreeMap<String, Vec<TypedField>>,
	pub primary_type: String,
	pub domain: SigningDomain,
	pub message: Order,
}

impl TypedDataPayload {
	pub fn domain_hash(&self) -> B256 {
		compute_domain_hash(
			&self.domain.name,
			&self.domain.version,
			self.domain.chain_id,
			&self.domain.verifying_contract,
		)
	}

	pub fn struct_hash(&self) -> B256 {
		compute_order_struct_hash(&self.message)
	}

	/// The digest a wallet signs: `keccak256(0x1901 || domainHash || structHash)`.
	pub fn signing_hash(&self) -> B256 {
		compute_final_digest(&self.domain_hash(), &self.struct_hash())
	}

	/// The domain in alloy's representation.
	pub fn eip712_domain(&self) -> Eip712Domain {
		Eip712Domain::new(
			Some(Cow::Owned(self.domain.name.clone())),
			Some(Cow::Owned(self.domain.version.clone())),
			Some(U256::from(self.domain.chain_id)),
			Some(self.domain.verifying_contract),
			None,
		)
	}

	/// Checks that the type map and primary type are the fixed `Order` schema.
	///
	/// # Errors
	///
	/// Returns [`OrderError::NonCanonicalTypes`] on any deviation.
	pub fn ensure_canonical_types(&self) -> Result<(), OrderError> {
		if self.primary_type != ORDER_PRIMARY_TYPE {
			return Err(OrderError::NonCanonicalTypes(format!(
				"primary type is '{}', expected '{}'",
				self.primary_type, ORDER_PRIMARY_TYPE
			)));
		}
		if self.types != canonical_types() {
			return Err(OrderError::NonCanonicalTypes(
				"type map differs from the Order schema".into(),
			));
		}
		Ok(())
	}

	pub fn to_json(&self) -> Result<String, OrderError> {
		serde_json::to_string_pretty(self).map_err(|e| OrderError::Serialization(e.to_string()))
	}

	/// Parses typed-data JSON and rejects payloads outside the `Order` schema.
	pub fn from_json(json: &str) -> Result<Self, OrderError> {
		let payload: Self =
			serde_json::from_str(json).map_err(|e| OrderError::Serialization(e.to_string()))?;
		payload.ensure_canonical_types()?;
		Ok(payload)
	}
}

/// Derives typed-data payloads for orders.
///
/// The domain name and version are fixed per deployment; chain id and
/// verifying contract come from the order's source chain.
#[derive(Debug, Clone)]
pub struct TypedDataSchema {
	domain_name: String,
	domain_version: String,
	networks: NetworksConfig,
}

impl TypedDataSchema {
	pub fn new(
		domain_name: impl Into<String>,
		domain_version: impl Into<String>,
		networks: NetworksConfig,
	) -> Self {
		Self {
			domain_name: domain_name.into(),
			domain_version: domain_version.into(),
			networks,
		}
	}

	/// Returns the domain for `chain_id`.
	///
	/// # Errors
	///
	/// Returns [`OrderError::UnsupportedChain`] when no intent factory is
	/// configured for the chain.
	pub fn domain(&self, chain_id: u64) -> Result<SigningDomain, OrderError> {
		let network = self
			.networks
			.get(&chain_id)
			.ok_or(OrderError::UnsupportedChain(chain_id))?;

		Ok(SigningDomain {
			name: self.domain_name.clone(),
			version: self.domain_version.clone(),
			chain_id,
			verifying_contract: network.intent_factory_address,
		})
	}

	/// Derives the payload for `order`.
	///
	/// # Errors
	///
	/// Fails if the order carries a non-zero intent address or its source chain
	/// has no configured factory.
	pub fn derive(&self, order: &Order) -> Result<TypedDataPayload, OrderError> {
		if !order.intentAddress.is_zero() {
			return Err(OrderError::IntentAddressNotPlaceholder(order.intentAddress));
		}

		let chain_id = u64::try_from(order.sourceChainId)
			.map_err(|_| OrderError::InvalidChainId(order.sourceChainId.to_string()))?;

		Ok(TypedDataPayload {
			types: canonical_types(),
			primary_type: ORDER_PRIMARY_TYPE.to_string(),
			domain: self.domain(chain_id)?,
			message: order.clone(),
		})
	}
}
