//! Named token entries attached to an authentication ticket.

// crates.io
use time::format_description::well_known::Rfc3339;
// self
use crate::{
	_prelude::*,
	auth::{IdentityToken, TokenSecret},
	provider::ProviderSession,
};

/// Entry name holding the identity token value.
pub const TOKEN_NAME_JWT: &str = "appwrite_auth.token.jwt";
/// Entry name holding the identity token expiry (RFC 3339, UTC).
pub const TOKEN_NAME_JWT_EXPIRES_AT: &str = "appwrite_auth.token.jwt.expires_at";
/// Entry name holding the serialized provider session.
pub const TOKEN_NAME_SESSION: &str = "appwrite_auth.token.session";

/// Errors raised while packing a [`TokenBag`].
#[derive(Debug, ThisError)]
pub enum TokenBagError {
	/// Expiry instant cannot be rendered as RFC 3339.
	#[error("Identity token expiry cannot be formatted.")]
	ExpiryFormat(#[from] time::error::Format),
	/// Session field map cannot be serialized.
	#[error("Provider session cannot be serialized.")]
	SessionEncode(#[from] serde_json::Error),
}

/// One named value handed to the surrounding session mechanism.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
	/// Reserved entry name.
	pub name: String,
	/// Entry value.
	pub value: String,
}
impl Debug for StoredToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("StoredToken")
			.field("name", &self.name)
			.field("value", &"<redacted>")
			.finish()
	}
}

/// Identity token, its expiry, and the serialized session stored alongside a ticket.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBag {
	/// Identity token used to build user-scoped API clients.
	pub jwt: TokenSecret,
	/// Identity token expiry formatted as RFC 3339 (UTC).
	pub jwt_expiry: String,
	/// Provider session field map in its stored textual form.
	pub session: String,
}
impl TokenBag {
	/// Packs a session and identity token.
	pub fn pack(session: &ProviderSession, token: &IdentityToken) -> Result<Self, TokenBagError> {
		let jwt_expiry = token.expires_at.to_offset(time::UtcOffset::UTC).format(&Rfc3339)?;
		let session = session.to_stored()?;

		Ok(Self { jwt: token.value.clone(), jwt_expiry, session })
	}

	/// Parsed identity token expiry, when the stored text is valid RFC 3339.
	pub fn jwt_expires_at(&self) -> Option<OffsetDateTime> {
		OffsetDateTime::parse(&self.jwt_expiry, &Rfc3339).ok()
	}

	/// Rebuilds the provider session from its stored form.
	pub fn provider_session(&self) -> Result<ProviderSession, serde_json::Error> {
		ProviderSession::from_stored(&self.session)
	}

	/// Returns the three named entries for persistence.
	pub fn entries(&self) -> Vec<StoredToken> {
		[
			(TOKEN_NAME_JWT, self.jwt.expose()),
			(TOKEN_NAME_SESSION, self.session.as_str()),
			(TOKEN_NAME_JWT_EXPIRES_AT, self.jwt_expiry.as_str()),
		]
		.into_iter()
		.map(|(name, value)| StoredToken { name: name.into(), value: value.into() })
		.collect()
	}

	/// Reads a bag back from persisted entries; unrelated names are ignored.
	///
	/// Returns `None` when no non-empty identity token entry is present.
	pub fn from_entries<'a, I>(entries: I) -> Option<Self>
	where
		I: IntoIterator<Item = (&'a str, &'a str)>,
	{
		let mut jwt = None;
		let mut jwt_expiry = String::new();
		let mut session = String::new();

		for (name, value) in entries {
			match name {
				TOKEN_NAME_JWT if !value.is_empty() => jwt = Some(TokenSecret::new(value)),
				TOKEN_NAME_JWT_EXPIRES_AT => jwt_expiry = value.to_owned(),
				TOKEN_NAME_SESSION => session = value.to_owned(),
				_ => {},
			}
		}

		Some(Self { jwt: jwt?, jwt_expiry, session })
	}
}
impl Debug for TokenBag {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenBag")
			.field("jwt", &self.jwt)
			.field("jwt_expiry", &self.jwt_expiry)
			.field("session", &"<redacted>")
			.finish()
	}
}
