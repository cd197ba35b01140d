//! Amount and string formatting utilities.
//!
//! Provides conversions between human-entered decimal amounts and token base
//! units, plus id truncation for log output.

use alloy_primitives::U256;

/// Utility function to truncate a hex string for display purposes.
///
/// Shows only the first 8 characters followed by ".." for longer strings.
/// Counts characters, not bytes.
pub fn truncate_id(id: &str) -> String {
	match id.char_indices().nth(8) {
		Some((cut, _)) => format!("{}..", &id[..cut]),
		None => id.to_string(),
	}
}

/// Returns the number of fractional digits in a decimal amount string.
///
/// `"1.50"` has two fractional digits, `"100"` and `"100."` have none.
pub fn fraction_digits(amount: &str) -> usize {
	amount
		.split_once('.')
		.map(|(_, fraction)| fraction.len())
		.unwrap_or(0)
}

/// Scales a decimal amount string to the token's base units.
///
/// Accepts `digits[.digits]` (either side may be empty, not both). Fails when
/// the input is malformed, has more fractional digits than `decimals`, or
/// does not fit in a `U256`.
///
/// # Examples
///
/// `parse_token_amount("1.5", 6)` yields `1_500_000`.
pub fn parse_token_amount(amount: &str, decimals: u8) -> Result<U256, String> {
	let (integer_part, fraction_part) = amount.split_once('.').unwrap_or((amount, ""));

	if integer_part.is_empty() && fraction_part.is_empty() {
		return Err(format!("Invalid amount '{}'", amount));
	}
	if !integer_part.chars().all(|c| c.is_ascii_digit())
		|| !fraction_part.chars().all(|c| c.is_ascii_digit())
	{
		return Err(format!("Invalid amount '{}'", amount));
	}
	if fraction_part.len() > decimals as usize {
		return Err(format!(
			"Amount '{}' has more than {} decimal places",
			amount, decimals
		));
	}

	// Right-pad the fraction so the concatenation is already in base units.
	let digits = format!(
		"{}{:0<width$}",
		integer_part,
		fraction_part,
		width = decimals as usize
	);
	let digits = digits.trim_start_matches('0');
	if digits.is_empty() {
		return Ok(U256::ZERO);
	}

	U256::from_str_radix(digits, 10).map_err(|e| format!("Amount '{}' out of range: {}", amount, e))
}

/// Formats a token amount with decimal places for display.
///
/// Converts a raw token amount (as stored on-chain) to a human-readable
/// format with proper decimal placement, e.g. "1.5" or "1000".
pub fn format_token_amount(amount: &str, decimals: u8) -> String {
	if decimals == 0 {
		return amount.to_string();
	}

	let decimal_places = decimals as usize;

	let (integer_part, decimal_part) = if amount.len() <= decimal_places {
		let decimal_str = format!("{:0>width$}", amount, width = decimal_places);
		("0".to_string(), decimal_str)
	} else {
		let split_pos = amount.len() - decimal_places;
		(
			amount[..split_pos].to_string(),
			amount[split_pos..].to_string(),
		)
	};

	let decimal_trimmed = decimal_part.trim_end_matches('0');

	if decimal_trimmed.is_empty() {
		integer_part
	} else {
		format!("{}.{}", integer_part, decimal_trimmed)
	}
}
