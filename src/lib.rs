//! Appwrite remote sign-in for Rust services.
//!
//! [`handshake::AppwriteScheme`] issues the challenge redirect and turns the provider callback
//! into an [`handshake::AuthenticationTicket`]: claims built from the account profile plus a
//! token bag. [`factory::ClientFactory`] rebuilds provider-scoped API clients from that bag on
//! later requests.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
#[cfg(feature = "reqwest")] pub mod factory;
pub mod handshake;
pub mod http;
pub mod obs;
pub mod provider;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// crates.io
	use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
	// self
	use crate::provider::ProviderSession;
	#[cfg(feature = "reqwest")]
	use crate::{
		auth::ProjectId,
		http::HttpSettings,
		provider::{AccountConnector, AppwriteClient, Credential, ProviderEndpoint},
	};

	/// Mints an unsigned identity token whose payload carries the provided `exp` instant.
	///
	/// The handshake only reads the expiry, so a fixed header and signature are enough for
	/// tests.
	pub fn test_identity_token(expires_at: OffsetDateTime) -> String {
		let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
		let payload = URL_SAFE_NO_PAD.encode(
			serde_json::json!({ "userId": "u1", "sessionId": "s1", "exp": expires_at.unix_timestamp() })
				.to_string(),
		);

		format!("{header}.{payload}.c2lnbmF0dXJl")
	}

	/// Builds a provider session fixture with the field set the account API returns.
	pub fn test_session(user_id: &str) -> ProviderSession {
		let fields = serde_json::json!({
			"$id": "session-1",
			"userId": user_id,
			"expire": "2030-01-01T00:00:00.000+00:00",
			"provider": "oidc",
			"secret": "",
			"current": true,
		});

		match fields {
			serde_json::Value::Object(map) => ProviderSession::from_fields(map),
			_ => ProviderSession::default(),
		}
	}

	/// Connector that points fresh reqwest-backed clients at a mock server with a short
	/// timeout.
	#[cfg(feature = "reqwest")]
	#[derive(Clone, Debug, Default)]
	pub struct TestConnector;
	#[cfg(feature = "reqwest")]
	impl AccountConnector for TestConnector {
		type Client = AppwriteClient;

		fn connect(&self, endpoint: &ProviderEndpoint, project: &ProjectId) -> Result<Self::Client> {
			let settings = HttpSettings::default().with_timeout(Duration::seconds(5));

			AppwriteClient::with_settings(
				endpoint.clone(),
				project.clone(),
				Credential::Anonymous,
				&settings,
			)
		}
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
