//! Callback validation and the provider exchange.
//!
//! Parameters are validated before any provider client is built. The session is created first;
//! the identity token and profile are then requested concurrently and joined, so the first
//! failure drops (and cancels) the sibling call.

// crates.io
use futures::future;
// self
use crate::{
	_prelude::*,
	auth::{Principal, TokenBag, TokenSecret},
	handshake::{
		AppwriteScheme, AuthenticationTicket, HandshakeFailure, HandshakeOutcome, HandshakeState,
	},
	obs::{self, HandshakeSpan, HandshakeStage, StageOutcome},
	provider::{AccountApi, AccountConnector},
};

/// Query parameter carrying the one-time secret.
pub const PARAM_SECRET: &str = "secret";
/// Query parameter carrying the provider user identifier.
pub const PARAM_USER_ID: &str = "userId";

/// One-time credential pair delivered by the provider redirect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallbackParameters {
	/// Provider user identifier.
	pub user_id: String,
	/// One-time secret; redacted in debug output.
	pub secret: TokenSecret,
}
impl CallbackParameters {
	/// Extracts the parameters from a raw query string (a leading `?` is accepted).
	pub fn from_query(query: &str) -> Result<Self, HandshakeFailure> {
		let query = query.strip_prefix('?').unwrap_or(query);

		Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()))
	}

	/// Extracts the parameters from decoded key/value pairs.
	///
	/// The first non-empty value of each key wins; unrelated keys are ignored.
	pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, HandshakeFailure>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		let mut secret = None;
		let mut user_id = None;

		for (key, value) in pairs {
			let value = value.as_ref();

			if value.is_empty() {
				continue;
			}

			match key.as_ref() {
				PARAM_SECRET if secret.is_none() => secret = Some(TokenSecret::new(value)),
				PARAM_USER_ID if user_id.is_none() => user_id = Some(value.to_owned()),
				_ => {},
			}
		}

		let secret = secret.ok_or(HandshakeFailure::MissingParameter { name: PARAM_SECRET })?;
		let user_id = user_id.ok_or(HandshakeFailure::MissingParameter { name: PARAM_USER_ID })?;

		Ok(Self { user_id, secret })
	}

	/// Always [`HandshakeState::CallbackReceived`].
	pub const fn state(&self) -> HandshakeState {
		HandshakeState::CallbackReceived
	}
}

impl<K> AppwriteScheme<K>
where
	K: AccountConnector,
{
	/// Processes the provider redirect's raw query string.
	///
	/// Failures are logged inside the handshake span and returned as
	/// [`HandshakeOutcome::Failure`]; nothing is retried.
	pub async fn handle_callback(&self, query: &str) -> HandshakeOutcome {
		const STAGE: HandshakeStage = HandshakeStage::Callback;

		let span = HandshakeSpan::new(STAGE, self.options.scheme());

		obs::record_handshake_outcome(STAGE, StageOutcome::Attempt);

		let result = span
			.instrument(async move {
				let result = match CallbackParameters::from_query(query) {
					Ok(parameters) => self.exchange(parameters).await,
					Err(failure) => Err(failure),
				};

				if let Err(failure) = &result {
					obs::log_failure(failure);
				}

				result
			})
			.await;

		match &result {
			Ok(_) => obs::record_handshake_outcome(STAGE, StageOutcome::Success),
			Err(_) => obs::record_handshake_outcome(STAGE, StageOutcome::Failure),
		}

		result.into()
	}

	/// Exchanges validated parameters for a ticket using a fresh provider client.
	pub async fn exchange(
		&self,
		parameters: CallbackParameters,
	) -> Result<AuthenticationTicket, HandshakeFailure> {
		let client = self
			.connector
			.connect(self.options.endpoint(), self.options.project())
			.map_err(HandshakeFailure::Provider)?;
		let session = client
			.create_session(&parameters.user_id, &parameters.secret)
			.await
			.map_err(HandshakeFailure::Provider)?
			.ok_or(HandshakeFailure::InvalidSession)?;
		let (token, profile) =
			future::try_join(client.create_identity_token(), client.fetch_profile())
				.await
				.map_err(HandshakeFailure::Provider)?;
		let principal = Principal::from_profile(&profile);
		let tokens =
			TokenBag::pack(&session, &token).map_err(|e| HandshakeFailure::Provider(e.into()))?;

		Ok(AuthenticationTicket { scheme: self.options.scheme().clone(), principal, tokens })
	}
}
