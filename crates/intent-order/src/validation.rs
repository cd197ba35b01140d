//! Submission-time validation of order input.
//!
//! Validation is pure: it reads the form, token metadata and a timestamp, and
//! either returns typed fields or the first violation found.

use crate::{IntentForm, TokenMetadata, ValidationError};
use alloy_primitives::{Address, U256};
use intent_types::utils::{fraction_digits, parse_token_amount};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Form input after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedFields {
	pub source_chain_id: u64,
	pub destination_chain_id: u64,
	pub token_address: Address,
	/// Amount as entered, kept for the handoff payload.
	pub amount_input: String,
	/// Amount scaled to the token's base units.
	pub amount: U256,
	pub token_decimals: u8,
	pub nonce: U256,
	pub open_deadline: u32,
	pub fill_deadline: u32,
}

/// Checks raw form input against the order invariants.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationEngine;

impl ValidationEngine {
	pub fn new() -> Self {
		Self
	}

	/// Validates `form` in a fixed order and fails fast.
	///
	/// # Arguments
	///
	/// * `form` - Raw user input
	/// * `metadata` - Token precision lookup for the source chain
	/// * `now` - Current UNIX time; both deadlines must lie after it
	///
	/// # Errors
	///
	/// Returns the first [`ValidationError`] encountered.
	pub fn validate(
		&self,
		form: &IntentForm,
		metadata: &dyn TokenMetadata,
		now: u64,
	) -> Result<ValidatedFields, ValidationError> {
		let source_chain_id = form
			.source_chain_id
			.filter(|id| *id > 0)
			.ok_or(ValidationError::MissingSourceChain)?;
		let destination_chain_id = form
			.destination_chain_id
			.filter(|id| *id > 0)
			.ok_or(ValidationError::MissingDestinationChain)?;
		if source_chain_id == destination_chain_id {
			return Err(ValidationError::SameChain);
		}

		let token_address = parse_token_address(&form.token_address)?;
		let token_decimals = metadata.token_decimals(source_chain_id, &token_address);
		let amount = parse_amount(&form.amount, token_decimals)?;
		let nonce = parse_nonce(&form.nonce)?;

		let open_deadline = parse_deadline(&form.open_deadline)
			.ok_or(ValidationError::InvalidOpenDeadline)?;
		let fill_deadline = parse_deadline(&form.fill_deadline)
			.ok_or(ValidationError::InvalidFillDeadline)?;
		if open_deadline >= fill_deadline {
			return Err(ValidationError::DeadlineOrder);
		}
		if u64::from(open_deadline) <= now {
			return Err(ValidationError::DeadlineElapsed);
		}

		Ok(ValidatedFields {
			source_chain_id,
			destination_chain_id,
			token_address,
			amount_input: form.amount.clone(),
			amount,
			token_decimals,
			nonce,
			open_deadline,
			fill_deadline,
		})
	}
}

/// Accepts `0x` followed by exactly 40 hex digits, in any letter case.
fn parse_token_address(input: &str) -> Result<Address, ValidationError> {
	let hex = input
		.strip_prefix("0x")
		.ok_or(ValidationError::InvalidToken)?;
	if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
		return Err(ValidationError::InvalidToken);
	}
	Address::from_str(input).map_err(|_| ValidationError::InvalidToken)
}

fn parse_amount(input: &str, decimals: u8) -> Result<U256, ValidationError> {
	let well_formed = {
		let (integer_part, fraction_part) = input.split_once('.').unwrap_or((input, ""));
		!(integer_part.is_empty() && fraction_part.is_empty())
			&& integer_part.chars().all(|c| c.is_ascii_digit())
			&& fraction_part.chars().all(|c| c.is_ascii_digit())
	};
	if !well_formed {
		return Err(ValidationError::InvalidAmount);
	}
	if fraction_digits(input) > decimals as usize {
		return Err(ValidationError::AmountPrecision { decimals });
	}

	let amount = parse_token_amount(input, decimals).map_err(|_| ValidationError::InvalidAmount)?;
	if amount.is_zero() {
		return Err(ValidationError::InvalidAmount);
	}
	Ok(amount)
}

fn parse_nonce(input: &str) -> Result<U256, ValidationError> {
	if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
		return Err(ValidationError::InvalidNonce);
	}
	U256::from_str_radix(input, 10).map_err(|_| ValidationError::InvalidNonce)
}

/// Positive integer timestamp that fits the order's `uint32` field.
fn parse_deadline(input: &str) -> Option<u32> {
	if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
		return None;
	}
	input.parse::<u32>().ok().filter(|ts| *ts > 0)
}
