//! Assembly of the canonical `Order` from validated input.

use crate::ValidatedFields;
use alloy_primitives::{Address, B256, U256};
use intent_types::{bridge_transfer_order_type, BridgeTransfer, Order};
use serde::{Deserialize, Serialize};

/// An order ready for signing, with the unsigned context that travels with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltOrder {
	pub order: Order,
	/// Decoded form of `order.orderData`.
	pub transfer: BridgeTransfer,
	pub destination_chain_id: u64,
	/// The input the order was built from.
	pub fields: ValidatedFields,
}

impl BuiltOrder {
	/// Identity of the built order, used to pair asynchronous responses with it.
	pub fn order_hash(&self) -> B256 {
		self.order.order_hash()
	}
}

/// Builds bridge transfer orders.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderBuilder;

impl OrderBuilder {
	pub fn new() -> Self {
		Self
	}

	/// Builds the signing subject for `fields`, signed by `user`.
	///
	/// The bridge payload carries the zero input-token placeholder, the selected
	/// token as output and destination token, the scaled amount, the destination
	/// chain and `user` as recipient. The intent address stays zero.
	pub fn build(&self, fields: &ValidatedFields, user: Address) -> BuiltOrder {
		let transfer = BridgeTransfer {
			input_token: Address::ZERO,
			output_token: fields.token_address,
			amount: fields.amount,
			destination_chain_id: fields.destination_chain_id,
			destination_token: fields.token_address,
			recipient: user,
		};

		let order = Order {
			intentAddress: Address::ZERO,
			user,
			nonce: fields.nonce,
			sourceChainId: U256::from(fields.source_chain_id),
			openDeadline: fields.open_deadline,
			fillDeadline: fields.fill_deadline,
			orderDataType: bridge_transfer_order_type(),
			orderData: transfer.encode().into(),
		};

		BuiltOrder {
			order,
			transfer,
			destination_chain_id: fields.destination_chain_id,
			fields: fields.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;

	fn fields() -> ValidatedFields {
		ValidatedFields {
			source_chain_id: 11155111,
			destination_chain_id: 357,
			token_address: address!("0xBF882Fc99800A93494fe4844DC0002FcbaA79A7A"),
			amount_input: "100".to_string(),
			amount: U256::from(10_000u64),
			token_decimals: 2,
			nonce: U256::from(1234u64),
			open_deadline: 1_700_000_300,
			fill_deadline: 1_700_021_600,
		}
	}

	#[test]
	fn test_build_sets_placeholder_and_schema() {
		let user = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
		let built = OrderBuilder::new().build(&fields(), user);

		assert_eq!(built.order.intentAddress, Address::ZERO);
		assert_eq!(built.order.user, user);
		assert_eq!(built.order.sourceChainId, U256::from(11155111u64));
		assert_eq!(built.order.orderDataType, bridge_transfer_order_type());
		assert_eq!(built.destination_chain_id, 357);
	}

	#[test]
	fn test_order_data_decodes_to_transfer() {
		let user = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
		let built = OrderBuilder::new().build(&fields(), user);

		let decoded = BridgeTransfer::decode(&built.order.orderData).unwrap();
		assert_eq!(decoded, built.transfer);
		assert_eq!(decoded.input_token, Address::ZERO);
		assert_eq!(decoded.output_token, decoded.destination_token);
		assert_eq!(decoded.amount, U256::from(10_000u64));
		assert_eq!(decoded.recipient, user);
	}

	#[test]
	fn test_build_is_deterministic() {
		let user = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
		let a = OrderBuilder::new().build(&fields(), user);
		let b = OrderBuilder::new().build(&fields(), user);
		assert_eq!(a.order_hash(), b.order_hash());

		let mut other = fields();
		other.nonce = U256::from(1235u64);
		assert_ne!(OrderBuilder::new().build(&other, user).order_hash(), a.order_hash());
	}
}
