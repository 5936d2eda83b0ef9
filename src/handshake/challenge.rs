//! Challenge redirect issuance.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	handshake::{AppwriteScheme, HandshakeOptions, HandshakeState},
	obs::{self, HandshakeSpan, HandshakeStage, StageOutcome},
	provider::AccountConnector,
};

const AUTHORIZE_PATH: &str = "/account/tokens/oauth2/oidc";

/// Redirect handed to the browser to start a handshake.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Challenge {
	/// Provider authorization URL the browser must visit.
	pub redirect_url: Url,
	/// Absolute callback URL the provider returns to.
	pub return_url: Url,
	/// Always [`HandshakeState::ChallengeIssued`].
	pub state: HandshakeState,
}

impl<K> AppwriteScheme<K>
where
	K: AccountConnector,
{
	/// Builds the challenge redirect for a request arriving at `origin`.
	///
	/// `origin` is the caller's scheme, host, and optional path base, e.g.
	/// `https://app.example.com/portal`. No provider call is made.
	pub fn challenge(&self, origin: &str) -> Result<Challenge> {
		const STAGE: HandshakeStage = HandshakeStage::Challenge;

		let _guard = HandshakeSpan::new(STAGE, self.options.scheme()).entered();

		obs::record_handshake_outcome(STAGE, StageOutcome::Attempt);

		let result = build_challenge(&self.options, origin);

		match &result {
			Ok(_) => obs::record_handshake_outcome(STAGE, StageOutcome::Success),
			Err(_) => obs::record_handshake_outcome(STAGE, StageOutcome::Failure),
		}

		Ok(result?)
	}
}

/// Builds a challenge without a scheme instance.
pub fn build_challenge(options: &HandshakeOptions, origin: &str) -> Result<Challenge, ConfigError> {
	let return_url = return_url(origin, options.callback_path())?;
	let redirect_url = authorize_url(options, &return_url)?;

	Ok(Challenge { redirect_url, return_url, state: HandshakeState::ChallengeIssued })
}

fn return_url(origin: &str, callback_path: &str) -> Result<Url, ConfigError> {
	let origin = origin.trim().trim_end_matches('/');

	Url::parse(&format!("{origin}{callback_path}"))
		.map_err(|source| ConfigError::InvalidOrigin { source })
}

fn authorize_url(options: &HandshakeOptions, return_url: &Url) -> Result<Url, ConfigError> {
	let mut raw = format!(
		"{}?project={}",
		options.endpoint().api_url(AUTHORIZE_PATH),
		urlencoding::encode(options.project())
	);
	let scopes = options.scopes().to_query();

	if !scopes.is_empty() {
		raw.push('&');
		raw.push_str(&scopes);
	}

	raw.push_str("&success=");
	raw.push_str(&urlencoding::encode(return_url.as_str()));

	Url::parse(&raw).map_err(|source| ConfigError::InvalidEndpoint { source })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn options() -> HandshakeOptions {
		HandshakeOptions::builder("https://cloud.example.com/v1/", "proj-1")
			.build()
			.expect("Options fixture should build.")
	}

	#[test]
	fn redirect_carries_project_scopes_and_return_url() {
		let challenge =
			build_challenge(&options(), "https://app.example.com/").expect("Challenge should build.");

		assert_eq!(challenge.return_url.as_str(), "https://app.example.com/signin-appwrite");
		assert_eq!(challenge.state, HandshakeState::ChallengeIssued);
		assert_eq!(
			challenge.redirect_url.as_str(),
			"https://cloud.example.com/v1/account/tokens/oauth2/oidc?project=proj-1\
			 &scopes[0]=openid&scopes[1]=profile\
			 &success=https%3A%2F%2Fapp.example.com%2Fsignin-appwrite"
		);

		let success = challenge
			.redirect_url
			.query_pairs()
			.find(|(key, _)| key == "success")
			.map(|(_, value)| value.into_owned());

		assert_eq!(success.as_deref(), Some("https://app.example.com/signin-appwrite"));
	}

	#[test]
	fn empty_scopes_leave_no_gap() {
		let options = HandshakeOptions::builder("https://cloud.example.com", "proj-1")
			.scopes(Vec::<String>::new())
			.callback_path("/cb")
			.build()
			.expect("Options fixture should build.");
		let challenge = build_challenge(&options, "http://localhost:3000/base")
			.expect("Challenge should build.");

		assert_eq!(challenge.return_url.as_str(), "http://localhost:3000/base/cb");
		assert!(!challenge.redirect_url.as_str().contains("&&"));
		assert!(!challenge.redirect_url.as_str().contains("scopes"));
	}

	#[test]
	fn invalid_origin_is_rejected() {
		assert!(matches!(
			build_challenge(&options(), "not an origin"),
			Err(ConfigError::InvalidOrigin { .. })
		));
	}
}
