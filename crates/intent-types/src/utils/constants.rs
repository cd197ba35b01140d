//! Constants shared by the order core and its drivers.

/// Source chain selected when nothing else is configured (Sepolia).
pub const DEFAULT_SOURCE_CHAIN_ID: u64 = 11155111;

/// Destination chain used by the demo defaults.
pub const DEMO_DESTINATION_CHAIN_ID: u64 = 357;

/// Amount entered by the demo defaults, in whole tokens.
pub const DEMO_AMOUNT: &str = "100";

/// Nonce entered by the demo defaults.
pub const DEMO_NONCE: &str = "1234";
