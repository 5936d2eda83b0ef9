//! Provider account API contracts and the reqwest-backed client.
//!
//! [`AccountApi`] covers the three calls the handshake needs and stays free of any HTTP
//! client type so tests and alternative transports can plug in. [`AccountConnector`] hands
//! out a fresh client per callback; clients are never shared between requests.

pub mod model;

#[cfg(feature = "reqwest")] mod client;

#[cfg(feature = "reqwest")] pub use client::*;
pub use model::*;

// self
use crate::{
	_prelude::*,
	auth::{IdentityToken, ProjectId, TokenSecret},
	error::ConfigError,
};

/// Boxed future returned by [`AccountApi`] calls.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Operation label for session creation.
pub const OP_CREATE_SESSION: &str = "account.createSession";
/// Operation label for identity token issuance.
pub const OP_CREATE_JWT: &str = "account.createJWT";
/// Operation label for the profile lookup.
pub const OP_GET_ACCOUNT: &str = "account.get";

/// Account calls performed during the callback exchange.
pub trait AccountApi
where
	Self: Send + Sync,
{
	/// Exchanges the one-time `userId` + `secret` pair for a session.
	///
	/// `Ok(None)` means the provider answered without a session.
	fn create_session<'a>(
		&'a self,
		user_id: &'a str,
		secret: &'a TokenSecret,
	) -> ProviderFuture<'a, Option<ProviderSession>>;

	/// Issues an identity token for the current session.
	fn create_identity_token(&self) -> ProviderFuture<'_, IdentityToken>;

	/// Fetches the profile of the current session's user.
	fn fetch_profile(&self) -> ProviderFuture<'_, ProfileData>;
}

/// Factory for per-callback [`AccountApi`] clients.
pub trait AccountConnector
where
	Self: 'static + Send + Sync,
{
	/// Client type produced for each callback.
	type Client: AccountApi;

	/// Builds a fresh client without credentials for the given endpoint and project.
	fn connect(&self, endpoint: &ProviderEndpoint, project: &ProjectId) -> Result<Self::Client>;
}

/// Credential attached to provider API calls.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Credential {
	/// No credential; user-scoped calls rely on the session established by the client.
	#[default]
	Anonymous,
	/// Server API key (`X-Appwrite-Key`).
	ApiKey(TokenSecret),
	/// User identity token (`X-Appwrite-JWT`).
	Jwt(TokenSecret),
	/// User session secret (`X-Appwrite-Session`).
	Session(TokenSecret),
}
impl Credential {
	/// Header name and value carrying this credential, if any.
	pub fn header(&self) -> Option<(&'static str, &str)> {
		match self {
			Credential::Anonymous => None,
			Credential::ApiKey(key) => Some(("X-Appwrite-Key", key.expose())),
			Credential::Jwt(jwt) => Some(("X-Appwrite-JWT", jwt.expose())),
			Credential::Session(secret) => Some(("X-Appwrite-Session", secret.expose())),
		}
	}

	/// Returns true when the credential grants server privileges.
	pub fn is_server(&self) -> bool {
		matches!(self, Credential::ApiKey(_))
	}
}

/// Normalized provider endpoint without the API version segment.
///
/// `https://cloud.example.com`, `https://cloud.example.com/` and
/// `https://cloud.example.com/v1` all normalize to the same endpoint.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ProviderEndpoint {
	base: String,
}
impl ProviderEndpoint {
	/// Parses and normalizes an endpoint.
	pub fn parse(raw: &str) -> Result<Self, ConfigError> {
		let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidEndpoint { source })?;

		Self::from_url(url)
	}

	/// Normalizes an already parsed endpoint.
	pub fn from_url(mut url: Url) -> Result<Self, ConfigError> {
		if !matches!(url.scheme(), "http" | "https") {
			return Err(ConfigError::UnsupportedEndpointScheme { url: url.into() });
		}

		url.set_query(None);
		url.set_fragment(None);

		let mut base = String::from(url).trim_end_matches('/').to_owned();

		if let Some(stripped) = base.strip_suffix("/v1") {
			base = stripped.to_owned();
		}

		Ok(Self { base })
	}

	/// Endpoint without the version segment.
	pub fn as_str(&self) -> &str {
		&self.base
	}

	/// Versioned API base, e.g. `https://cloud.example.com/v1`.
	pub fn api_base(&self) -> String {
		format!("{}/v1", self.base)
	}

	/// Absolute URL for an API path such as `/account`.
	pub fn api_url(&self, path: &str) -> String {
		format!("{}/v1/{}", self.base, path.trim_start_matches('/'))
	}
}
impl Debug for ProviderEndpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "ProviderEndpoint({})", self.base)
	}
}
impl Display for ProviderEndpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.base)
	}
}
impl FromStr for ProviderEndpoint {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}
impl<'de> Deserialize<'de> for ProviderEndpoint {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		Self::parse(&raw).map_err(serde::de::Error::custom)
	}
}
impl Serialize for ProviderEndpoint {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_str(&self.base)
	}
}
