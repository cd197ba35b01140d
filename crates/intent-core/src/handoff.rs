//! Payload handed to the next stage once an intent is finalized.

use alloy_primitives::{Address, Bytes};
use intent_order::BuiltOrder;
use intent_types::Order;
use serde::{Deserialize, Serialize};

/// A signed order with its resolved intent address and verified signer.
///
/// `order` carries the resolved intent address; the signature covers the same
/// order with the zero placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedIntent {
	pub signature: Bytes,
	pub order: Order,
	pub recovered_address: Address,
	pub resolved_intent_address: Address,
	pub token_address: Address,
	/// Amount as the user entered it.
	pub amount: String,
	pub chain_id: u64,
	pub dest_chain_id: u64,
	pub user_address: Address,
	pub fill_deadline: u32,
}

impl FinalizedIntent {
	pub(crate) fn assemble(
		built: &BuiltOrder,
		signature: Bytes,
		recovered_address: Address,
		resolved_intent_address: Address,
	) -> Self {
		Self {
			signature,
			order: built.order.with_intent_address(resolved_intent_address),
			recovered_address,
			resolved_intent_address,
			token_address: built.fields.token_address,
			amount: built.fields.amount_input.clone(),
			chain_id: built.fields.source_chain_id,
			dest_chain_id: built.destination_chain_id,
			user_address: built.order.user,
			fill_deadline: built.order.fillDeadline,
		}
	}
}
