//! Session events for external observers.
//!
//! Every state transition of an intent session records one of these events
//! so that a renderer can follow progress without reaching into session state.

use crate::DeadlinePreference;
use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

/// Event emitted by an intent session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionEvent {
	/// Source chain changed.
	SourceChainSelected { chain_id: u64 },
	/// Wallet refused or failed to switch chains; the form stays editable.
	ChainSwitchFailed { chain_id: u64, reason: String },
	/// Deadline fields were overwritten.
	DeadlinesUpdated {
		preference: DeadlinePreference,
		open_deadline: u64,
		fill_deadline: u64,
	},
	/// Submission rejected by input validation.
	ValidationFailed { message: String },
	/// A typed-data payload was issued to the wallet.
	SignatureRequested { attempt: u64, order_hash: B256 },
	/// The wallet returned a signature for the current attempt.
	SignatureReceived { attempt: u64 },
	/// The wallet rejected or failed the current attempt.
	SigningFailed { attempt: u64, message: String },
	/// A response for a superseded attempt or order was ignored.
	StaleResponseDiscarded { attempt: u64, kind: String },
	/// The factory returned the intent address for the current order.
	IntentAddressResolved { attempt: u64, intent_address: Address },
	/// The recovered signer is not the connected identity.
	RecoveryMismatch { expected: Address, recovered: Address },
	/// Signature, intent address and signer identity are all in place.
	Finalized { attempt: u64, intent_address: Address },
	/// The session returned to idle.
	Reset,
}
