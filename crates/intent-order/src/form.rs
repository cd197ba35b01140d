//! Raw form fields as entered by the user.

use serde::{Deserialize, Serialize};

/// Unvalidated order input.
///
/// Text fields hold exactly what the user typed; nothing here is trusted until
/// it passes the [`ValidationEngine`](crate::ValidationEngine).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentForm {
	pub source_chain_id: Option<u64>,
	pub destination_chain_id: Option<u64>,
	pub token_address: String,
	pub amount: String,
	pub nonce: String,
	pub open_deadline: String,
	pub fill_deadline: String,
}

impl IntentForm {
	/// Clears the user-entered order fields, keeping the source chain and deadlines.
	pub fn clear_inputs(&mut self) {
		self.destination_chain_id = None;
		self.token_address.clear();
		self.amount.clear();
		self.nonce.clear();
	}
}

/// Edit-time amount filter.
///
/// Accepts partial input a user may still be typing (`""`, `"1."`, `".5"`) as
/// long as it is digits with at most one point and no more than `decimals`
/// fractional digits. Submission applies the stricter checks.
pub fn accepts_amount_input(input: &str, decimals: u8) -> bool {
	let (integer_part, fraction_part) = match input.split_once('.') {
		Some((integer_part, fraction_part)) => (integer_part, Some(fraction_part)),
		None => (input, None),
	};

	if !integer_part.chars().all(|c| c.is_ascii_digit()) {
		return false;
	}

	match fraction_part {
		None => true,
		Some(fraction) => {
			fraction.len() <= decimals as usize && fraction.chars().all(|c| c.is_ascii_digit())
		},
	}
}
