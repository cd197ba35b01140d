//! Gasless cross-chain order types.
//!
//! The `Order` struct defined here is the canonical signing subject: it is the
//! exact tuple the intent factory hashes under EIP-712, and the argument the
//! factory uses to derive the ephemeral intent address.

use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::{sol, SolValue};
use serde::{Deserialize, Serialize};

sol! {
	/// Gasless cross-chain order signed by the user.
	///
	/// `intentAddress` stays zero while signing; the factory-derived address is
	/// substituted only after resolution.
	#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
	struct Order {
		address intentAddress;
		address user;
		uint256 nonce;
		uint256 sourceChainId;
		uint32 openDeadline;
		uint32 fillDeadline;
		bytes32 orderDataType;
		bytes orderData;
	}

	/// Intent factory view used to derive counterfactual intent addresses.
	interface IIntentFactory {
		function getIntentAddress(Order calldata order, bytes32 salt) external view returns (address);
	}
}

/// Schema identifier for bridge transfer payloads, hashed into `orderDataType`.
pub const BRIDGE_TRANSFER_ORDER: &str = "BRIDGE_TRANSFER_ORDER";

/// Returns `keccak256("BRIDGE_TRANSFER_ORDER")`, the fixed `orderDataType` of
/// every bridge transfer order.
pub fn bridge_transfer_order_type() -> B256 {
	keccak256(BRIDGE_TRANSFER_ORDER.as_bytes())
}

impl Order {
	/// Hash identifying this exact order, used for log correlation.
	pub fn order_hash(&self) -> B256 {
		keccak256(self.abi_encode())
	}

	/// Returns a copy of the order with the resolved intent address substituted.
	pub fn with_intent_address(&self, intent_address: Address) -> Self {
		Self {
			intentAddress: intent_address,
			..self.clone()
		}
	}
}

/// Decoded form of the bridge transfer `orderData` payload.
///
/// Encoded as the ABI tuple
/// `(address inputToken, address outputToken, uint256 amount, uint256 destinationChainId, address destinationToken, address recipient)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeTransfer {
	/// Placeholder input token (zero address).
	pub input_token: Address,
	/// Token delivered by the bridge.
	pub output_token: Address,
	/// Amount in the token's base units.
	pub amount: U256,
	/// Chain where the fill happens.
	pub destination_chain_id: u64,
	/// Output token repeated for the destination leg.
	pub destination_token: Address,
	/// Receiver of the bridged funds.
	pub recipient: Address,
}

type BridgeTuple = (Address, Address, U256, U256, Address, Address);

impl BridgeTransfer {
	/// ABI-encodes the transfer as a flat parameter tuple.
	pub fn encode(&self) -> Vec<u8> {
		let tuple: BridgeTuple = (
			self.input_token,
			self.output_token,
			self.amount,
			U256::from(self.destination_chain_id),
			self.destination_token,
			self.recipient,
		);
		tuple.abi_encode_params()
	}

	/// Decodes a payload produced by [`BridgeTransfer::encode`].
	pub fn decode(data: &[u8]) -> Result<Self, String> {
		let (input_token, output_token, amount, destination_chain_id, destination_token, recipient) =
			BridgeTuple::abi_decode_params(data, true)
				.map_err(|e| format!("Invalid bridge order data: {}", e))?;

		let destination_chain_id = u64::try_from(destination_chain_id)
			.map_err(|_| "Destination chain id does not fit in u64".to_string())?;

		Ok(Self {
			input_token,
			output_token,
			amount,
			destination_chain_id,
			destination_token,
			recipient,
		})
	}
}
