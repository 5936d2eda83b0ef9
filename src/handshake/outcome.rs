//! Handshake states, the success ticket, and the failure taxonomy.

// self
use crate::{
	_prelude::*,
	auth::{Principal, SchemeName, TokenBag},
};

/// Message shown to end users for any failed handshake.
pub const GENERIC_FAILURE_MESSAGE: &str = "Sign-in failed. Please try again.";

/// Position of one handshake in its protocol state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HandshakeState {
	/// Nothing issued yet.
	#[default]
	Idle,
	/// Challenge redirect handed to the browser.
	ChallengeIssued,
	/// Callback parameters received and validated.
	CallbackReceived,
	/// Terminal: ticket produced.
	Succeeded,
	/// Terminal: failure reported.
	Failed,
}
impl HandshakeState {
	/// Returns a stable label.
	pub const fn as_str(self) -> &'static str {
		match self {
			HandshakeState::Idle => "idle",
			HandshakeState::ChallengeIssued => "challenge_issued",
			HandshakeState::CallbackReceived => "callback_received",
			HandshakeState::Succeeded => "succeeded",
			HandshakeState::Failed => "failed",
		}
	}

	/// Returns true for [`HandshakeState::Succeeded`] and [`HandshakeState::Failed`].
	pub const fn is_terminal(self) -> bool {
		matches!(self, HandshakeState::Succeeded | HandshakeState::Failed)
	}
}
impl Display for HandshakeState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Authenticated result of a completed handshake.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthenticationTicket {
	/// Scheme that authenticated the principal.
	pub scheme: SchemeName,
	/// Claims built from the provider profile.
	pub principal: Principal,
	/// Tokens to hand to the surrounding session mechanism.
	pub tokens: TokenBag,
}

/// Reason a handshake attempt failed. All variants are terminal for the attempt.
///
/// `Display` never includes provider text; the cause of [`HandshakeFailure::Provider`] is
/// only reachable through [`HandshakeFailure::cause`] and [`StdError::source`].
#[derive(Debug, ThisError)]
pub enum HandshakeFailure {
	/// Callback lacked a required parameter; no provider call was made.
	#[error("Sign-in callback is missing the `{name}` parameter.")]
	MissingParameter {
		/// Missing query parameter name.
		name: &'static str,
	},
	/// Provider answered without a usable session.
	#[error("Provider returned no session for the sign-in callback.")]
	InvalidSession,
	/// Transport or provider failure at one of the remote calls.
	#[error("Sign-in could not be completed with the provider.")]
	Provider(#[source] Error),
}
impl HandshakeFailure {
	/// Returns a stable label suitable for logs or redirect parameters.
	pub const fn as_str(&self) -> &'static str {
		match self {
			HandshakeFailure::MissingParameter { .. } => "missing_parameter",
			HandshakeFailure::InvalidSession => "invalid_session",
			HandshakeFailure::Provider(_) => "provider_error",
		}
	}

	/// Underlying error for provider failures.
	pub fn cause(&self) -> Option<&Error> {
		match self {
			HandshakeFailure::Provider(cause) => Some(cause),
			_ => None,
		}
	}

	/// Fixed, non-revealing message for end users.
	pub const fn user_message(&self) -> &'static str {
		GENERIC_FAILURE_MESSAGE
	}
}

/// Result of processing one callback.
#[derive(Debug)]
pub enum HandshakeOutcome {
	/// Principal and tokens were produced.
	Success(AuthenticationTicket),
	/// The attempt failed.
	Failure(HandshakeFailure),
}
impl HandshakeOutcome {
	/// Returns true for [`HandshakeOutcome::Success`].
	pub fn is_success(&self) -> bool {
		matches!(self, HandshakeOutcome::Success(_))
	}

	/// Terminal state reached by this outcome.
	pub fn state(&self) -> HandshakeState {
		match self {
			HandshakeOutcome::Success(_) => HandshakeState::Succeeded,
			HandshakeOutcome::Failure(_) => HandshakeState::Failed,
		}
	}

	/// Borrows the ticket on success.
	pub fn ticket(&self) -> Option<&AuthenticationTicket> {
		match self {
			HandshakeOutcome::Success(ticket) => Some(ticket),
			HandshakeOutcome::Failure(_) => None,
		}
	}

	/// Borrows the failure reason on failure.
	pub fn failure(&self) -> Option<&HandshakeFailure> {
		match self {
			HandshakeOutcome::Success(_) => None,
			HandshakeOutcome::Failure(failure) => Some(failure),
		}
	}

	/// Converts into a standard result.
	pub fn into_result(self) -> Result<AuthenticationTicket, HandshakeFailure> {
		match self {
			HandshakeOutcome::Success(ticket) => Ok(ticket),
			HandshakeOutcome::Failure(failure) => Err(failure),
		}
	}
}
impl From<Result<AuthenticationTicket, HandshakeFailure>> for HandshakeOutcome {
	fn from(result: Result<AuthenticationTicket, HandshakeFailure>) -> Self {
		match result {
			Ok(ticket) => HandshakeOutcome::Success(ticket),
			Err(failure) => HandshakeOutcome::Failure(failure),
		}
	}
}
