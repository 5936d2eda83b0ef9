//! Provider-scoped API clients for requests after sign-in.

// self
use crate::{
	_prelude::*,
	auth::{TokenBag, TokenSecret},
	config::ProviderSettings,
	error::ConfigError,
	http::HttpSettings,
	provider::{AppwriteClient, Credential},
};

/// Builds server-privileged and user-scoped clients for one provider project.
///
/// Every call returns a new client with its own transport.
#[derive(Clone, Debug)]
pub struct ClientFactory {
	settings: ProviderSettings,
	http: HttpSettings,
}
impl ClientFactory {
	/// Creates a factory with default HTTP settings.
	pub fn new(settings: ProviderSettings) -> Self {
		Self { settings, http: HttpSettings::default() }
	}

	/// Overrides the HTTP settings applied to produced clients.
	pub fn with_http_settings(mut self, http: HttpSettings) -> Self {
		self.http = http;

		self
	}

	/// Provider settings backing this factory.
	pub fn settings(&self) -> &ProviderSettings {
		&self.settings
	}

	/// Client authenticated with the server API key.
	pub fn server_client(&self) -> Result<AppwriteClient> {
		let key = self.settings.key.clone().ok_or(ConfigError::MissingApiKey)?;

		self.client(Credential::ApiKey(key))
	}

	/// Anonymous user-scoped client.
	pub fn user_client(&self) -> Result<AppwriteClient> {
		self.client(Credential::Anonymous)
	}

	/// User-scoped client authenticated with an identity token.
	pub fn user_client_from_jwt(&self, jwt: TokenSecret) -> Result<AppwriteClient> {
		self.client(Credential::Jwt(jwt))
	}

	/// User-scoped client authenticated with a session secret.
	pub fn user_client_from_session(&self, secret: TokenSecret) -> Result<AppwriteClient> {
		self.client(Credential::Session(secret))
	}

	/// Rebuilds the user-scoped client for a request from its stored tokens.
	///
	/// A non-empty, unexpired identity token yields a token-scoped client; anything else yields
	/// the anonymous client.
	pub fn resolve_user_client(&self, tokens: Option<&TokenBag>) -> Result<AppwriteClient> {
		self.client(user_credential(tokens, OffsetDateTime::now_utc()))
	}

	fn client(&self, credential: Credential) -> Result<AppwriteClient> {
		AppwriteClient::with_settings(
			self.settings.endpoint.clone(),
			self.settings.project.clone(),
			credential,
			&self.http,
		)
	}
}

fn user_credential(tokens: Option<&TokenBag>, now: OffsetDateTime) -> Credential {
	let Some(bag) = tokens else { return Credential::Anonymous };

	if bag.jwt.is_empty() {
		return Credential::Anonymous;
	}
	if bag.jwt_expires_at().is_some_and(|expires_at| now >= expires_at) {
		return Credential::Anonymous;
	}

	Credential::Jwt(bag.jwt.clone())
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	fn bag(jwt: &str, expiry: &str) -> TokenBag {
		TokenBag { jwt: TokenSecret::new(jwt), jwt_expiry: expiry.into(), session: "{}".into() }
	}

	#[test]
	fn credential_selection_prefers_live_tokens() {
		let now = datetime!(2029-06-01 0:00 UTC);

		assert_eq!(user_credential(None, now), Credential::Anonymous);
		assert_eq!(user_credential(Some(&bag("", "")), now), Credential::Anonymous);
		assert_eq!(
			user_credential(Some(&bag("jwt", "2030-01-01T00:00:00Z")), now),
			Credential::Jwt(TokenSecret::new("jwt"))
		);
		assert_eq!(
			user_credential(Some(&bag("jwt", "2029-01-01T00:00:00Z")), now),
			Credential::Anonymous
		);
		assert_eq!(
			user_credential(Some(&bag("jwt", "unknown")), now),
			Credential::Jwt(TokenSecret::new("jwt"))
		);
	}
}
