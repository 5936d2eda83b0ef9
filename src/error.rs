//! Crate-level error types shared by the provider client, configuration, and handshake.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Provider answered with a non-success status.
	#[error(transparent)]
	Provider(#[from] ProviderApiError),
	/// Provider reply could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Identity token returned by the provider is unusable.
	#[error(transparent)]
	IdentityToken(#[from] crate::auth::IdentityTokenError),
	/// Session or identity token could not be packed for storage.
	#[error(transparent)]
	TokenBag(#[from] crate::auth::TokenBagError),
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Provider endpoint cannot be parsed.
	#[error("Provider endpoint is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Provider endpoint uses a scheme other than HTTP(S).
	#[error("Provider endpoint must use http or https: {url}.")]
	UnsupportedEndpointScheme {
		/// Endpoint that failed validation.
		url: String,
	},
	/// Caller origin cannot be combined with the callback path.
	#[error("Request origin is invalid.")]
	InvalidOrigin {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Project identifier failed validation.
	#[error("Project identifier is invalid.")]
	InvalidProject(#[from] crate::auth::IdentifierError),
	/// Scheme name failed validation.
	#[error("Scheme name is invalid.")]
	InvalidSchemeName {
		/// Underlying validation failure.
		#[source]
		source: crate::auth::IdentifierError,
	},
	/// Callback path is empty or not absolute.
	#[error("Callback path must be a non-empty absolute path: `{path}`.")]
	InvalidCallbackPath {
		/// Offending path.
		path: String,
	},
	/// Requested scopes cannot be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Required setting is absent.
	#[error("Missing setting `{name}`.")]
	MissingSetting {
		/// Setting name that was looked up.
		name: &'static str,
	},
	/// Server-privileged client requested without an API key.
	#[error("Server client requires an API key.")]
	MissingApiKey,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling `{operation}`.")]
	Network {
		/// Provider operation in flight.
		operation: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request did not complete within the configured timeout.
	#[error("Request to `{operation}` timed out.")]
	Timeout {
		/// Provider operation in flight.
		operation: &'static str,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		operation: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { operation, source: Box::new(src) }
	}

	#[cfg(feature = "reqwest")]
	pub(crate) fn from_reqwest(operation: &'static str, e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout { operation } } else { Self::network(operation, e) }
	}
}

/// Non-success reply returned by the provider's REST API.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Provider rejected `{operation}` with status {status}: {message}.")]
pub struct ProviderApiError {
	/// Provider operation that failed.
	pub operation: &'static str,
	/// HTTP status code.
	pub status: u16,
	/// Provider error type, e.g. `user_invalid_token`.
	pub kind: Option<String>,
	/// Provider- or client-supplied message.
	pub message: String,
}

/// Provider reply carried malformed JSON.
#[derive(Debug, ThisError)]
#[error("Provider returned malformed JSON for `{operation}`.")]
pub struct DecodeError {
	/// Provider operation whose reply failed to decode.
	pub operation: &'static str,
	/// Structured parsing failure with the offending field path.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn provider_api_error_renders_operation_and_status() {
		let err: Error = ProviderApiError {
			operation: "account.get",
			status: 401,
			kind: Some("user_unauthorized".into()),
			message: "The current user is not authorized".into(),
		}
		.into();

		assert!(matches!(err, Error::Provider(ProviderApiError { status: 401, .. })));
		assert_eq!(
			err.to_string(),
			"Provider rejected `account.get` with status 401: The current user is not authorized."
		);
	}

	#[test]
	fn decode_error_keeps_field_path() {
		let mut de = serde_json::Deserializer::from_str(r#"{"jwt": 42}"#);
		let source = serde_path_to_error::deserialize::<_, BTreeMap<String, String>>(&mut de)
			.expect_err("Numeric value should not decode as string.");
		let err = DecodeError { operation: "account.createJWT", source };

		assert_eq!(err.source.path().to_string(), "jwt");
		assert!(StdError::source(&err).is_some());
	}
}
