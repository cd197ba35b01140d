//! Signing state machine.

use alloy_primitives::Bytes;
use intent_order::TypedDataPayload;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Signing progress of the current attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SigningState {
	/// No request outstanding.
	#[default]
	Idle,
	/// A payload was issued to the wallet and no answer arrived yet.
	AwaitingSignature {
		attempt: u64,
		payload: TypedDataPayload,
	},
	/// The wallet signed. `payload` is the exact payload that was signed and
	/// is the only input recovery may use.
	Signed {
		attempt: u64,
		signature: Bytes,
		payload: TypedDataPayload,
	},
	/// The wallet rejected or failed the request.
	Failed { attempt: u64, message: String },
}

/// Discriminant of [`SigningState`], used by the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningStateKind {
	Idle,
	AwaitingSignature,
	Signed,
	Failed,
}

static TRANSITIONS: Lazy<HashMap<SigningStateKind, HashSet<SigningStateKind>>> =
	Lazy::new(|| {
		use SigningStateKind::*;

		let mut m = HashMap::new();
		m.insert(Idle, HashSet::from([AwaitingSignature]));
		// A new request replaces an outstanding one; edits drop it back to idle.
		m.insert(
			AwaitingSignature,
			HashSet::from([Signed, Failed, AwaitingSignature, Idle]),
		);
		m.insert(Signed, HashSet::from([Idle]));
		m.insert(Failed, HashSet::from([AwaitingSignature, Idle]));
		m
	});

impl SigningState {
	pub fn kind(&self) -> SigningStateKind {
		match self {
			SigningState::Idle => SigningStateKind::Idle,
			SigningState::AwaitingSignature { .. } => SigningStateKind::AwaitingSignature,
			SigningState::Signed { .. } => SigningStateKind::Signed,
			SigningState::Failed { .. } => SigningStateKind::Failed,
		}
	}

	/// Attempt the state belongs to, if any.
	pub fn attempt(&self) -> Option<u64> {
		match self {
			SigningState::Idle => None,
			SigningState::AwaitingSignature { attempt, .. }
			| SigningState::Signed { attempt, .. }
			| SigningState::Failed { attempt, .. } => Some(*attempt),
		}
	}

	/// True while `attempt` is the request the wallet is expected to answer.
	pub fn is_awaiting(&self, attempt: u64) -> bool {
		matches!(self, SigningState::AwaitingSignature { attempt: a, .. } if *a == attempt)
	}

	pub fn can_transition_to(&self, next: SigningStateKind) -> bool {
		TRANSITIONS
			.get(&self.kind())
			.is_some_and(|allowed| allowed.contains(&next))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_transition_table() {
		use SigningStateKind::*;

		let idle = SigningState::Idle;
		assert!(idle.can_transition_to(AwaitingSignature));
		assert!(!idle.can_transition_to(Signed));
		assert!(!idle.can_transition_to(Failed));

		let failed = SigningState::Failed {
			attempt: 1,
			message: "rejected".into(),
		};
		assert!(failed.can_transition_to(AwaitingSignature));
		assert!(failed.can_transition_to(Idle));
		assert!(!failed.can_transition_to(Signed));

		let signed = SigningState::Signed {
			attempt: 1,
			signature: Bytes::from(vec![0u8; 65]),
			payload: test_payload(),
		};
		assert!(signed.can_transition_to(Idle));
		assert!(!signed.can_transition_to(AwaitingSignature));
		assert!(!signed.can_transition_to(Failed));
	}

	#[test]
	fn test_awaiting_matches_only_its_attempt() {
		let state = SigningState::AwaitingSignature {
			attempt: 3,
			payload: test_payload(),
		};
		assert!(state.is_awaiting(3));
		assert!(!state.is_awaiting(2));
		assert_eq!(state.attempt(), Some(3));
		assert!(!SigningState::Idle.is_awaiting(3));
	}

	fn test_payload() -> TypedDataPayload {
		use alloy_primitives::{address, U256};
		use intent_config::builders::ConfigBuilder;
		use intent_order::{OrderBuilder, TypedDataSchema, ValidatedFields};

		let config = ConfigBuilder::new().build();
		let fields = ValidatedFields {
			source_chain_id: 11155111,
			destination_chain_id: 357,
			token_address: address!("0xBF882Fc99800A93494fe4844DC0002FcbaA79A7A"),
			amount_input: "1".to_string(),
			amount: U256::from(100u64),
			token_decimals: 2,
			nonce: U256::from(1u64),
			open_deadline: 1_700_000_300,
			fill_deadline: 1_700_021_600,
		};
		let order = OrderBuilder::new()
			.build(&fields, address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"))
			.order;
		TypedDataSchema::new("SignOrder", "1", config.networks)
			.derive(&order)
			.unwrap()
	}
}
