//! Utility functions for EIP-712 hashing, amount conversion and formatting.

pub mod constants;
pub mod eip712;
pub mod formatting;
pub mod helpers;

pub use constants::{
	DEFAULT_SOURCE_CHAIN_ID, DEMO_AMOUNT, DEMO_DESTINATION_CHAIN_ID, DEMO_NONCE,
};
pub use eip712::{
	compute_domain_hash, compute_final_digest, compute_order_struct_hash, Eip712AbiEncoder,
	DOMAIN_TYPE, ORDER_PRIMARY_TYPE, ORDER_TYPE,
};
pub use formatting::{format_token_amount, fraction_digits, parse_token_amount, truncate_id};
pub use helpers::current_timestamp;
