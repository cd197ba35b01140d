//! EIP-712 utilities for gasless order signing.
//!
//! These helpers provide:
//! - Domain hash computation (name, version, chainId, verifyingContract)
//! - `Order` struct hash computation
//! - Final digest computation (0x1901 || domainHash || structHash)
//! - A minimal ABI encoder for the static EIP-712 field types the order uses

use crate::order::Order;
use alloy_primitives::{keccak256, Address as AlloyAddress, B256, U256};

pub const DOMAIN_TYPE: &str =
	"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";
pub const ORDER_TYPE: &str = "Order(address intentAddress,address user,uint256 nonce,uint256 sourceChainId,uint32 openDeadline,uint32 fillDeadline,bytes32 orderDataType,bytes orderData)";
pub const ORDER_PRIMARY_TYPE: &str = "Order";

/// Compute EIP-712 domain hash
/// (keccak256(abi.encode(typeHash, nameHash, versionHash, chainId, verifyingContract))).
pub fn compute_domain_hash(
	name: &str,
	version: &str,
	chain_id: u64,
	verifying_contract: &AlloyAddress,
) -> B256 {
	let mut enc = Eip712AbiEncoder::new();
	enc.push_b256(&keccak256(DOMAIN_TYPE.as_bytes()));
	enc.push_b256(&keccak256(name.as_bytes()));
	enc.push_b256(&keccak256(version.as_bytes()));
	enc.push_u256(U256::from(chain_id));
	enc.push_address(verifying_contract);
	keccak256(enc.finish())
}

/// Compute the EIP-712 struct hash of an [`Order`].
pub fn compute_order_struct_hash(order: &Order) -> B256 {
	let mut enc = Eip712AbiEncoder::new();
	enc.push_b256(&keccak256(ORDER_TYPE.as_bytes()));
	enc.push_address(&order.intentAddress);
	enc.push_address(&order.user);
	enc.push_u256(order.nonce);
	enc.push_u256(order.sourceChainId);
	enc.push_u32(order.openDeadline);
	enc.push_u32(order.fillDeadline);
	enc.push_b256(&order.orderDataType);
	enc.push_bytes(&order.orderData);
	keccak256(enc.finish())
}

/// Compute the final EIP-712 digest: keccak256(0x1901 || domainHash || structHash).
pub fn compute_final_digest(domain_hash: &B256, struct_hash: &B256) -> B256 {
	let mut out = Vec::with_capacity(2 + 32 + 32);
	out.push(0x19);
	out.push(0x01);
	out.extend_from_slice(domain_hash.as_slice());
	out.extend_from_slice(struct_hash.as_slice());
	keccak256(out)
}

/// Minimal ABI encoder for the word-sized values used in EIP-712 struct hashing.
pub struct Eip712AbiEncoder {
	buf: Vec<u8>,
}

impl Default for Eip712AbiEncoder {
	fn default() -> Self {
		Self::new()
	}
}

impl Eip712AbiEncoder {
	pub fn new() -> Self {
		Self { buf: Vec::new() }
	}

	pub fn push_b256(&mut self, v: &B256) {
		self.buf.extend_from_slice(v.as_slice());
	}

	pub fn push_address(&mut self, addr: &AlloyAddress) {
		let mut word = [0u8; 32];
		word[12..].copy_from_slice(addr.as_slice());
		self.buf.extend_from_slice(&word);
	}

	pub fn push_u256(&mut self, v: U256) {
		let word: [u8; 32] = v.to_be_bytes::<32>();
		self.buf.extend_from_slice(&word);
	}

	pub fn push_u32(&mut self, v: u32) {
		let mut word = [0u8; 32];
		word[28..].copy_from_slice(&v.to_be_bytes());
		self.buf.extend_from_slice(&word);
	}

	/// Dynamic `bytes` are encoded as the keccak256 of their contents.
	pub fn push_bytes(&mut self, data: &[u8]) {
		self.push_b256(&keccak256(data));
	}

	pub fn finish(self) -> Vec<u8> {
		self.buf
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::order::bridge_transfer_order_type;
	use alloy_primitives::{address, Bytes};
	use alloy_sol_types::{Eip712Domain, SolStruct};
	use std::borrow::Cow;

	fn order() -> Order {
		Order {
			intentAddress: AlloyAddress::ZERO,
			user: address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
			nonce: U256::from(7u64),
			sourceChainId: U256::from(11155111u64),
			openDeadline: 1_700_000_300,
			fillDeadline: 1_700_021_600,
			orderDataType: bridge_transfer_order_type(),
			orderData: Bytes::from(vec![0xab; 192]),
		}
	}

	#[test]
	fn test_order_type_string_matches_sol_struct() {
		assert_eq!(Order::eip712_encode_type(), ORDER_TYPE);
	}

	#[test]
	fn test_struct_hash_matches_sol_struct() {
		let order = order();
		assert_eq!(compute_order_struct_hash(&order), order.eip712_hash_struct());
	}

	#[test]
	fn test_digest_matches_sol_struct_signing_hash() {
		let order = order();
		let factory = address!("0x1111111111111111111111111111111111111111");
		let domain = Eip712Domain::new(
			Some(Cow::Borrowed("SignOrder")),
			Some(Cow::Borrowed("1")),
			Some(U256::from(11155111u64)),
			Some(factory),
			None,
		);

		let domain_hash = compute_domain_hash("SignOrder", "1", 11155111, &factory);
		assert_eq!(domain_hash, domain.hash_struct());

		let digest = compute_final_digest(&domain_hash, &compute_order_struct_hash(&order));
		assert_eq!(digest, order.eip712_signing_hash(&domain));
	}

	#[test]
	fn test_push_u32_is_right_aligned() {
		let mut enc = Eip712AbiEncoder::new();
		enc.push_u32(0x01020304);
		let word = enc.finish();
		assert_eq!(word.len(), 32);
		assert_eq!(&word[28..], &[1, 2, 3, 4]);
		assert!(word[..28].iter().all(|b| *b == 0));
	}
}
