//! Signer recovery for signed typed data.
//!
//! Recovery always runs on the payload frozen at signing time; a payload
//! re-derived from current session state could differ from what the wallet saw.

use crate::IntentError;
use alloy_primitives::{Address, PrimitiveSignature};
use intent_order::TypedDataPayload;

/// Recovers and checks typed-data signers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoveryVerifier;

impl RecoveryVerifier {
	pub fn new() -> Self {
		Self
	}

	/// Recovers the address that produced `signature` over `payload`.
	///
	/// # Errors
	///
	/// Returns [`IntentError::Recovery`] if the signature is not a valid
	/// 65-byte secp256k1 signature for the payload digest.
	pub fn recover(
		&self,
		payload: &TypedDataPayload,
		signature: &[u8],
	) -> Result<Address, IntentError> {
		if signature.len() != 65 {
			return Err(IntentError::Recovery(format!(
				"expected a 65-byte signature, got {} bytes",
				signature.len()
			)));
		}
		let signature = PrimitiveSignature::try_from(signature)
			.map_err(|e| IntentError::Recovery(e.to_string()))?;
		signature
			.recover_address_from_prehash(&payload.signing_hash())
			.map_err(|e| IntentError::Recovery(e.to_string()))
	}

	/// Recovers the signer and requires it to equal `expected`.
	///
	/// # Errors
	///
	/// Returns [`IntentError::RecoveryMismatch`] when a different key signed,
	/// or [`IntentError::Recovery`] when no signer can be recovered.
	pub fn verify(
		&self,
		payload: &TypedDataPayload,
		signature: &[u8],
		expected: Address,
	) -> Result<Address, IntentError> {
		let recovered = self.recover(payload, signature)?;
		if recovered != expected {
			return Err(IntentError::RecoveryMismatch {
				expected,
				recovered,
			});
		}
		Ok(recovered)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{address, U256};
	use intent_account::{LocalWallet, WalletInterface};
	use intent_config::builders::ConfigBuilder;
	use intent_order::{OrderBuilder, TypedDataSchema, ValidatedFields};
	use intent_types::SecretString;

	const KEY0: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	fn wallet() -> LocalWallet {
		LocalWallet::new(&SecretString::from(KEY0), 11155111, [11155111, 357]).unwrap()
	}

	fn payload(nonce: u64) -> TypedDataPayload {
		let config = ConfigBuilder::new().build();
		let fields = ValidatedFields {
			source_chain_id: 11155111,
			destination_chain_id: 357,
			token_address: address!("0xc580C2C0005798751cd0c221292667deeb991157"),
			amount_input: "0.5".to_string(),
			amount: U256::from(50_000_000u64),
			token_decimals: 8,
			nonce: U256::from(nonce),
			open_deadline: 1_700_000_060,
			fill_deadline: 1_700_003_600,
		};
		let order = OrderBuilder::new()
			.build(&fields, address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"))
			.order;
		TypedDataSchema::new("SignOrder", "1", config.networks)
			.derive(&order)
			.unwrap()
	}

	#[tokio::test]
	async fn test_round_trip_recovers_signer() {
		let wallet = wallet();
		let payload = payload(1);
		let signature = wallet.sign_typed_data(&payload).await.unwrap();

		let verifier = RecoveryVerifier::new();
		let recovered = verifier
			.verify(&payload, &signature, wallet.address().unwrap())
			.unwrap();
		assert_eq!(Some(recovered), wallet.address());
	}

	#[tokio::test]
	async fn test_different_payload_recovers_someone_else() {
		let wallet = wallet();
		let signature = wallet.sign_typed_data(&payload(1)).await.unwrap();

		let result =
			RecoveryVerifier::new().verify(&payload(2), &signature, wallet.address().unwrap());
		assert!(matches!(result, Err(IntentError::RecoveryMismatch { .. })));
	}

	#[test]
	fn test_malformed_signature() {
		let result = RecoveryVerifier::new().recover(&payload(1), &[1u8; 64]);
		assert!(matches!(result, Err(IntentError::Recovery(_))));
	}
}
