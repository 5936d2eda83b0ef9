//! HTTP transport settings and the reqwest wrapper used for provider calls.
//!
//! Every provider client owns its own [`ReqwestHttpClient`], built from [`HttpSettings`], so
//! cookies the provider sets while a session is created stay confined to that client.
//! Redirects are never followed: account endpoints answer directly.

// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Transport knobs applied to each provider client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpSettings {
	/// Whole-request timeout; expiry surfaces as a transport timeout error. `None` disables it.
	pub timeout: Option<Duration>,
	/// `User-Agent` header value.
	pub user_agent: String,
}
impl HttpSettings {
	const DEFAULT_TIMEOUT: Duration = Duration::seconds(30);

	/// Overrides the request timeout.
	///
	/// Zero or negative durations disable the timeout rather than failing every request.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout.is_positive().then_some(timeout);

		self
	}

	/// Overrides the `User-Agent` header.
	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = user_agent.into();

		self
	}
}
impl Default for HttpSettings {
	fn default() -> Self {
		Self {
			timeout: Some(Self::DEFAULT_TIMEOUT),
			user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into(),
		}
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	///
	/// Configure custom clients with redirects disabled and, for handshake use, a private
	/// cookie store.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client with a private cookie store, no redirects, and the configured timeout.
	pub fn from_settings(settings: &HttpSettings) -> Result<Self, ConfigError> {
		let mut builder = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.cookie_store(true)
			.user_agent(settings.user_agent.as_str());

		if let Some(timeout) = settings.timeout {
			builder = builder.timeout(timeout.unsigned_abs());
		}

		let client = builder.build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl std::ops::Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
