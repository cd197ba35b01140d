//! Intent session: the form, its deadline preference and the signing state of
//! one user, threaded explicitly through every transition.
//!
//! Asynchronous work (signature, intent address resolution, chain switches)
//! happens outside the session. The session hands out requests tagged with an
//! attempt number and accepts responses only for the attempt and order they
//! were issued for.

use crate::handoff::FinalizedIntent;
use crate::recovery::RecoveryVerifier;
use crate::resolver::{ResolutionRequest, ResolverError};
use crate::state::{SigningState, SigningStateKind};
use crate::{IntentError, CONNECT_WALLET_MESSAGE};
use alloy_primitives::{Address, Bytes, B256};
use intent_account::{WalletError, WalletInterface};
use intent_config::Config;
use intent_order::{
	accepts_amount_input, BuiltOrder, Clock, DeadlinePolicy, IntentForm, OrderBuilder,
	TokenMetadata, TypedDataPayload, TypedDataSchema, ValidationEngine, ValidationError,
};
use intent_types::utils::{
	format_token_amount, truncate_id, DEFAULT_SOURCE_CHAIN_ID, DEMO_AMOUNT,
	DEMO_DESTINATION_CHAIN_ID, DEMO_NONCE,
};
use intent_types::{DeadlinePreference, NetworksConfig, Order, SessionEvent};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Work issued for one signing attempt.
///
/// The signature and the resolution may run concurrently; both answers are
/// returned to the session with `attempt`.
#[derive(Debug, Clone)]
pub struct SignatureRequest {
	pub attempt: u64,
	/// Payload to sign, frozen for recovery.
	pub payload: TypedDataPayload,
	/// Intent address read for the same order.
	pub resolution: ResolutionRequest,
}

/// Whether an asynchronous response was applied to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
	Applied,
	/// The response belonged to a superseded attempt or a different order.
	Discarded,
}

/// Built order of the attempt currently in flight or signed.
#[derive(Debug, Clone)]
struct CurrentAttempt {
	attempt: u64,
	built: BuiltOrder,
	order_hash: B256,
}

/// Intent address received for an attempt.
#[derive(Debug, Clone, Copy)]
struct Resolution {
	attempt: u64,
	order_hash: B256,
	intent_address: Address,
}

/// State of one user's order form and signing progress.
pub struct IntentSession {
	wallet: Arc<dyn WalletInterface>,
	networks: NetworksConfig,
	validation: ValidationEngine,
	deadlines: DeadlinePolicy,
	builder: OrderBuilder,
	schema: TypedDataSchema,
	verifier: RecoveryVerifier,
	salt_hash: B256,
	default_source_chain_id: u64,
	form: IntentForm,
	preference: DeadlinePreference,
	next_attempt: u64,
	state: SigningState,
	current: Option<CurrentAttempt>,
	resolution: Option<Resolution>,
	finalized: Option<FinalizedIntent>,
	form_error: Option<ValidationError>,
	backend_error: Option<IntentError>,
	events: Vec<SessionEvent>,
}

impl IntentSession {
	/// Creates a session on the configured default source chain with the
	/// configured deadline preset applied.
	pub fn new(config: &Config, wallet: Arc<dyn WalletInterface>, clock: Arc<dyn Clock>) -> Self {
		let mut session = Self {
			wallet,
			networks: config.networks.clone(),
			validation: ValidationEngine::new(),
			deadlines: DeadlinePolicy::new(clock),
			builder: OrderBuilder::new(),
			schema: TypedDataSchema::new(
				config.intent.domain_name.clone(),
				config.intent.domain_version.clone(),
				config.networks.clone(),
			),
			verifier: RecoveryVerifier::new(),
			salt_hash: config.intent.salt_hash(),
			default_source_chain_id: config.intent.default_source_chain_id,
			form: IntentForm {
				source_chain_id: Some(config.intent.default_source_chain_id),
				..IntentForm::default()
			},
			preference: DeadlinePreference::Auto,
			next_attempt: 1,
			state: SigningState::Idle,
			current: None,
			resolution: None,
			finalized: None,
			form_error: None,
			backend_error: None,
			events: Vec::new(),
		};
		session.apply_preference(config.intent.default_deadline_preference);
		session
	}

	pub fn form(&self) -> &IntentForm {
		&self.form
	}

	pub fn preference(&self) -> DeadlinePreference {
		self.preference
	}

	pub fn state(&self) -> &SigningState {
		&self.state
	}

	pub fn wallet(&self) -> &Arc<dyn WalletInterface> {
		&self.wallet
	}

	pub fn finalized(&self) -> Option<&FinalizedIntent> {
		self.finalized.as_ref()
	}

	/// True once signed: the signed fields can no longer change.
	pub fn is_locked(&self) -> bool {
		self.finalized.is_some() || self.state.kind() == SigningStateKind::Signed
	}

	/// The single error to show, validation errors first.
	pub fn display_error(&self) -> Option<String> {
		self.form_error
			.as_ref()
			.map(ToString::to_string)
			.or_else(|| self.backend_error.as_ref().map(ToString::to_string))
	}

	/// Takes the events recorded since the last call.
	pub fn drain_events(&mut self) -> Vec<SessionEvent> {
		std::mem::take(&mut self.events)
	}

	/// Selects the source chain and asks the wallet to follow.
	///
	/// The preset resets to `Auto`. A failed switch is reported as
	/// [`IntentError::ChainSwitch`] but the selection is kept and the form
	/// stays editable.
	pub async fn select_source_chain(&mut self, chain_id: u64) -> Result<(), IntentError> {
		self.begin_edit()?;

		if !self.networks.contains_key(&chain_id) {
			warn!(chain_id, "Selected source chain has no configured intent factory");
		}
		self.form.source_chain_id = Some(chain_id);
		self.events
			.push(SessionEvent::SourceChainSelected { chain_id });
		self.apply_preference(DeadlinePreference::Auto);

		let wallet = self.wallet.clone();
		if let Err(e) = wallet.switch_chain(chain_id).await {
			warn!(chain_id, error = %e, "Chain switch failed");
			self.events.push(SessionEvent::ChainSwitchFailed {
				chain_id,
				reason: e.to_string(),
			});
			return Err(IntentError::ChainSwitch(e.to_string()));
		}

		debug!(chain_id, "Source chain selected");
		Ok(())
	}

	pub fn set_destination_chain(&mut self, chain_id: Option<u64>) -> Result<(), IntentError> {
		self.begin_edit()?;
		self.form.destination_chain_id = chain_id;
		Ok(())
	}

	/// Selects the token. The amount is cleared because its precision may differ.
	pub fn set_token(&mut self, token_address: impl Into<String>) -> Result<(), IntentError> {
		self.begin_edit()?;
		self.form.token_address = token_address.into();
		self.form.amount.clear();
		Ok(())
	}

	/// Applies amount input if it passes the edit-time filter for the selected
	/// token's precision. Returns whether the input was taken.
	pub fn set_amount(&mut self, amount: &str) -> Result<bool, IntentError> {
		self.begin_edit()?;
		let decimals = self.selected_token_decimals();
		if !accepts_amount_input(amount, decimals) {
			debug!(decimals, "Amount input exceeds token precision");
			return Ok(false);
		}
		self.form.amount = amount.to_string();
		Ok(true)
	}

	pub fn set_nonce(&mut self, nonce: impl Into<String>) -> Result<(), IntentError> {
		self.begin_edit()?;
		self.form.nonce = nonce.into();
		Ok(())
	}

	/// Applies a preset, overwriting both deadlines from one clock read.
	/// Selecting `Custom` keeps the current deadline values.
	pub fn set_deadline_preference(
		&mut self,
		preference: DeadlinePreference,
	) -> Result<(), IntentError> {
		self.begin_edit()?;
		self.apply_preference(preference);
		Ok(())
	}

	/// Sets deadlines directly, detaching from any preset.
	pub fn set_custom_deadlines(
		&mut self,
		open_deadline: impl Into<String>,
		fill_deadline: impl Into<String>,
	) -> Result<(), IntentError> {
		self.begin_edit()?;
		self.form.open_deadline = open_deadline.into();
		self.form.fill_deadline = fill_deadline.into();
		self.preference = DeadlinePreference::Custom;
		Ok(())
	}

	/// Fills the form with demo values: Sepolia to chain 357, the first token
	/// configured on the source chain, amount 100, nonce 1234, `Auto` deadlines.
	pub async fn fill_demo_defaults(&mut self) -> Result<(), IntentError> {
		self.select_source_chain_lenient(DEFAULT_SOURCE_CHAIN_ID)
			.await?;

		let token = self
			.networks
			.get(&DEFAULT_SOURCE_CHAIN_ID)
			.and_then(|network| network.tokens.first())
			.map(|token| token.address.to_string())
			.unwrap_or_default();

		self.form.destination_chain_id = Some(DEMO_DESTINATION_CHAIN_ID);
		self.form.token_address = token;
		self.form.amount = DEMO_AMOUNT.to_string();
		self.form.nonce = DEMO_NONCE.to_string();
		self.form_error = None;
		Ok(())
	}

	/// Clears the order inputs and errors, re-applies `Auto` deadlines and
	/// returns to the default source chain.
	pub async fn reset_inputs(&mut self) -> Result<(), IntentError> {
		self.begin_edit()?;
		self.form.clear_inputs();
		self.form_error = None;
		self.backend_error = None;

		let default_chain = self.default_source_chain_id;
		self.select_source_chain_lenient(default_chain).await
	}

	/// Returns a non-finalized session to `Idle`, dropping the current attempt.
	pub fn reset(&mut self) -> Result<(), IntentError> {
		if self.finalized.is_some() {
			return Err(IntentError::SessionLocked(
				"a finalized intent cannot be reset".into(),
			));
		}
		if self.state.kind() != SigningStateKind::Idle {
			self.transition(SigningState::Idle)?;
		}
		self.current = None;
		self.resolution = None;
		self.backend_error = None;
		self.events.push(SessionEvent::Reset);
		debug!("Session reset");
		Ok(())
	}

	/// Validates the form, builds the order and opens a new signing attempt.
	///
	/// Any outstanding attempt is superseded: its responses will be discarded.
	///
	/// # Errors
	///
	/// - [`IntentError::SessionLocked`] once the session is signed or finalized
	/// - [`IntentError::Connectivity`] without a connected identity
	/// - [`IntentError::Validation`] for the first invalid field
	/// - [`IntentError::Order`] if the source chain has no intent factory
	pub fn begin_signing(&mut self) -> Result<SignatureRequest, IntentError> {
		if self.is_locked() {
			return Err(IntentError::SessionLocked(
				"the order has already been signed".into(),
			));
		}

		let Some(user) = self.wallet.address() else {
			let err = IntentError::Connectivity(CONNECT_WALLET_MESSAGE.to_string());
			self.backend_error = Some(err.clone());
			return Err(err);
		};

		let fields = match self.validation.validate(
			&self.form,
			&self.networks as &dyn TokenMetadata,
			self.deadlines.now(),
		) {
			Ok(fields) => fields,
			Err(e) => {
				debug!(error = %e, "Order input rejected");
				self.events.push(SessionEvent::ValidationFailed {
					message: e.to_string(),
				});
				self.form_error = Some(e.clone());
				return Err(IntentError::Validation(e));
			},
		};
		self.form_error = None;

		let built = self.builder.build(&fields, user);
		let amount = format_token_amount(&fields.amount.to_string(), fields.token_decimals);
		let payload = match self.schema.derive(&built.order) {
			Ok(payload) => payload,
			Err(e) => {
				let err = IntentError::from(e);
				self.backend_error = Some(err.clone());
				return Err(err);
			},
		};

		let attempt = self.next_attempt;
		self.transition(SigningState::AwaitingSignature {
			attempt,
			payload: payload.clone(),
		})?;
		self.next_attempt += 1;

		let order_hash = built.order_hash();
		let resolution = ResolutionRequest {
			attempt,
			chain_id: payload.domain.chain_id,
			factory: payload.domain.verifying_contract,
			order: built.order.clone(),
			salt: self.salt_hash,
		};
		self.current = Some(CurrentAttempt {
			attempt,
			built,
			order_hash,
		});
		self.resolution = None;
		self.backend_error = None;
		self.events.push(SessionEvent::SignatureRequested {
			attempt,
			order_hash,
		});
		info!(
			attempt,
			chain_id = payload.domain.chain_id,
			order_hash = %truncate_id(&order_hash.to_string()),
			%amount,
			"Signature requested"
		);

		Ok(SignatureRequest {
			attempt,
			payload,
			resolution,
		})
	}

	/// Applies the wallet's answer for `attempt`.
	///
	/// # Errors
	///
	/// Returns the signing error when the wallet rejected or failed; the
	/// session moves to `Failed` and a new attempt may be started.
	pub fn complete_signing(
		&mut self,
		attempt: u64,
		result: Result<Bytes, WalletError>,
	) -> Result<ResponseOutcome, IntentError> {
		if !self.state.is_awaiting(attempt) {
			return Ok(self.discard(attempt, "signature"));
		}
		let SigningState::AwaitingSignature { payload, .. } = &self.state else {
			return Ok(self.discard(attempt, "signature"));
		};
		let payload = payload.clone();

		match result {
			Ok(signature) => {
				self.transition(SigningState::Signed {
					attempt,
					signature,
					payload,
				})?;
				self.events
					.push(SessionEvent::SignatureReceived { attempt });
				info!(attempt, "Signature received");
				Ok(ResponseOutcome::Applied)
			},
			Err(e) => {
				let err = match e {
					WalletError::NotConnected => {
						IntentError::Connectivity(CONNECT_WALLET_MESSAGE.to_string())
					},
					other => IntentError::Signing(other.to_string()),
				};
				self.transition(SigningState::Failed {
					attempt,
					message: err.to_string(),
				})?;
				self.events.push(SessionEvent::SigningFailed {
					attempt,
					message: err.to_string(),
				});
				warn!(attempt, error = %err, "Signing failed");
				self.backend_error = Some(err.clone());
				Err(err)
			},
		}
	}

	/// Applies the resolver's answer for `attempt`.
	///
	/// The answer is accepted only if `order` is the order built for the
	/// current attempt; anything else is discarded.
	pub fn complete_resolution(
		&mut self,
		attempt: u64,
		order: &Order,
		result: Result<Address, ResolverError>,
	) -> Result<ResponseOutcome, IntentError> {
		let Some(current) = &self.current else {
			return Ok(self.discard(attempt, "resolution"));
		};
		let order_hash = order.order_hash();
		let signing_attempt_active = matches!(
			self.state.kind(),
			SigningStateKind::AwaitingSignature | SigningStateKind::Signed
		);
		if current.attempt != attempt || current.order_hash != order_hash || !signing_attempt_active
		{
			return Ok(self.discard(attempt, "resolution"));
		}

		match result {
			Ok(intent_address) => {
				self.resolution = Some(Resolution {
					attempt,
					order_hash,
					intent_address,
				});
				self.events.push(SessionEvent::IntentAddressResolved {
					attempt,
					intent_address,
				});
				info!(attempt, intent_address = %intent_address, "Intent address resolved");
				Ok(ResponseOutcome::Applied)
			},
			Err(e) => {
				let err = IntentError::Resolution(e.to_string());
				warn!(attempt, error = %e, "Intent address resolution failed");
				self.backend_error = Some(err.clone());
				Err(err)
			},
		}
	}

	/// Finalizes once the signature and the intent address of the same order
	/// are both present. Returns `Ok(None)` while either is missing.
	///
	/// # Errors
	///
	/// Returns [`IntentError::RecoveryMismatch`] when the recovered signer is
	/// not the connected identity; handoff is blocked.
	pub fn try_finalize(&mut self) -> Result<Option<FinalizedIntent>, IntentError> {
		if let Some(finalized) = &self.finalized {
			return Ok(Some(finalized.clone()));
		}

		let SigningState::Signed {
			attempt,
			signature,
			payload,
		} = &self.state
		else {
			return Ok(None);
		};
		let (Some(current), Some(resolution)) = (&self.current, &self.resolution) else {
			return Ok(None);
		};
		let signed_hash = payload.message.order_hash();
		if current.attempt != *attempt
			|| resolution.attempt != *attempt
			|| resolution.order_hash != signed_hash
			|| current.order_hash != signed_hash
		{
			return Ok(None);
		}

		let Some(identity) = self.wallet.address() else {
			let err = IntentError::Connectivity(CONNECT_WALLET_MESSAGE.to_string());
			self.backend_error = Some(err.clone());
			return Err(err);
		};

		let recovered = match self.verifier.verify(payload, signature, identity) {
			Ok(recovered) => recovered,
			Err(err) => {
				if let IntentError::RecoveryMismatch {
					expected,
					recovered,
				} = &err
				{
					error!(
						attempt = *attempt,
						expected = %expected,
						recovered = %recovered,
						"Recovered signer does not match connected identity"
					);
					self.events.push(SessionEvent::RecoveryMismatch {
						expected: *expected,
						recovered: *recovered,
					});
				}
				self.backend_error = Some(err.clone());
				return Err(err);
			},
		};

		let finalized = FinalizedIntent::assemble(
			&current.built,
			signature.clone(),
			recovered,
			resolution.intent_address,
		);
		let attempt = *attempt;
		self.events.push(SessionEvent::Finalized {
			attempt,
			intent_address: resolution.intent_address,
		});
		info!(
			attempt,
			intent_address = %resolution.intent_address,
			signer = %recovered,
			"Intent finalized"
		);
		self.finalized = Some(finalized.clone());
		Ok(Some(finalized))
	}

	/// Rejects edits on a locked session and drops an attempt still awaiting
	/// its signature, since its order no longer matches the form.
	fn begin_edit(&mut self) -> Result<(), IntentError> {
		if self.is_locked() {
			return Err(IntentError::SessionLocked(
				"signed orders cannot be edited".into(),
			));
		}
		if let SigningState::AwaitingSignature { attempt, .. } = self.state {
			debug!(attempt, "Form edited, dropping outstanding signing attempt");
			self.transition(SigningState::Idle)?;
			self.current = None;
			self.resolution = None;
		}
		Ok(())
	}

	/// Switches chains, treating a failed switch as non-fatal.
	async fn select_source_chain_lenient(&mut self, chain_id: u64) -> Result<(), IntentError> {
		match self.select_source_chain(chain_id).await {
			Err(IntentError::ChainSwitch(_)) | Ok(()) => Ok(()),
			Err(e) => Err(e),
		}
	}

	fn apply_preference(&mut self, preference: DeadlinePreference) {
		self.preference = preference;
		if let Some(deadlines) = self.deadlines.deadlines(preference) {
			self.form.open_deadline = deadlines.open_deadline.to_string();
			self.form.fill_deadline = deadlines.fill_deadline.to_string();
			self.events.push(SessionEvent::DeadlinesUpdated {
				preference,
				open_deadline: deadlines.open_deadline,
				fill_deadline: deadlines.fill_deadline,
			});
		}
	}

	fn selected_token_decimals(&self) -> u8 {
		let chain_id = self.form.source_chain_id.unwrap_or(self.default_source_chain_id);
		let token = Address::from_str(&self.form.token_address).unwrap_or(Address::ZERO);
		self.networks.token_decimals(chain_id, &token)
	}

	fn transition(&mut self, next: SigningState) -> Result<(), IntentError> {
		if !self.state.can_transition_to(next.kind()) {
			return Err(IntentError::SessionLocked(format!(
				"cannot move from {:?} to {:?}",
				self.state.kind(),
				next.kind()
			)));
		}
		self.state = next;
		Ok(())
	}

	fn discard(&mut self, attempt: u64, kind: &str) -> ResponseOutcome {
		debug!(attempt, kind, "Discarding stale response");
		self.events.push(SessionEvent::StaleResponseDiscarded {
			attempt,
			kind: kind.to_string(),
		});
		ResponseOutcome::Discarded
	}
}

impl std::fmt::Debug for IntentSession {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("IntentSession")
			.field("form", &self.form)
			.field("preference", &self.preference)
			.field("state", &self.state.kind())
			.field("finalized", &self.finalized.is_some())
			.finish()
	}
}
