//! Drives a session through one signing attempt.

use crate::resolver::IntentAddressResolver;
use crate::session::{IntentSession, ResponseOutcome};
use crate::{FinalizedIntent, IntentError};
use std::sync::Arc;
use tracing::instrument;

/// Runs signing and intent address resolution for a session.
///
/// The signature request and the resolution read are issued together and
/// joined; finalization starts only when both answered for the same order.
#[derive(Clone)]
pub struct SigningCoordinator {
	resolver: Arc<dyn IntentAddressResolver>,
}

impl SigningCoordinator {
	pub fn new(resolver: Arc<dyn IntentAddressResolver>) -> Self {
		Self { resolver }
	}

	/// Opens a new attempt on `session`, waits for the wallet and the
	/// resolver, and finalizes.
	///
	/// # Errors
	///
	/// Returns the first error of the attempt: validation, connectivity,
	/// signing, resolution or recovery. A signing failure leaves the session
	/// in `Failed`, ready for another attempt.
	#[instrument(skip_all, fields(attempt = tracing::field::Empty))]
	pub async fn sign_and_finalize(
		&self,
		session: &mut IntentSession,
	) -> Result<FinalizedIntent, IntentError> {
		let request = session.begin_signing()?;
		tracing::Span::current().record("attempt", request.attempt);

		let wallet = session.wallet().clone();
		let (signature, intent_address) = tokio::join!(
			wallet.sign_typed_data(&request.payload),
			self.resolver.resolve(&request.resolution),
		);

		if session.complete_signing(request.attempt, signature)? == ResponseOutcome::Discarded {
			return Err(IntentError::Superseded(request.attempt));
		}
		if session.complete_resolution(request.attempt, &request.resolution.order, intent_address)?
			== ResponseOutcome::Discarded
		{
			return Err(IntentError::Superseded(request.attempt));
		}

		session
			.try_finalize()?
			.ok_or(IntentError::Superseded(request.attempt))
	}
}
