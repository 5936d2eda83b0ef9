//! Identity tokens issued by the provider after session creation.
//!
//! Only the payload's `exp` claim is read; the signature is not verified.

// crates.io
use base64::{
	Engine as _,
	engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
};
// self
use crate::{_prelude::*, auth::TokenSecret};

/// Errors raised while reading an identity token.
#[derive(Debug, ThisError)]
pub enum IdentityTokenError {
	/// The token is not made of three dot-separated segments.
	#[error("Identity token must have three segments, found {segments}.")]
	Malformed {
		/// Number of segments found.
		segments: usize,
	},
	/// Payload segment is not valid base64url.
	#[error("Identity token payload is not valid base64url.")]
	PayloadEncoding(#[from] base64::DecodeError),
	/// Payload segment is not a JSON object.
	#[error("Identity token payload is not valid JSON.")]
	PayloadJson(#[from] serde_json::Error),
	/// Payload has no numeric `exp` claim.
	#[error("Identity token payload has no `exp` claim.")]
	MissingExpiry,
	/// `exp` cannot be represented as an instant.
	#[error("Identity token expiry {exp} is out of range.")]
	ExpiryOutOfRange {
		/// Raw `exp` value.
		exp: i64,
	},
}

#[derive(Deserialize)]
struct ExpiryClaim {
	#[serde(default)]
	exp: Option<JsonValue>,
}

/// Provider-issued identity token and its expiry instant.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityToken {
	/// Raw token value; callers must avoid logging it.
	pub value: TokenSecret,
	/// Expiry instant read from the `exp` claim.
	pub expires_at: OffsetDateTime,
}
impl IdentityToken {
	/// Reads the expiry out of a compact JWT without verifying its signature.
	pub fn parse(raw: impl Into<String>) -> Result<Self, IdentityTokenError> {
		let raw = raw.into();
		let segments = raw.split('.').collect::<Vec<_>>();

		if segments.len() != 3 {
			return Err(IdentityTokenError::Malformed { segments: segments.len() });
		}

		let payload = decode_segment(segments[1])?;
		let claim = serde_json::from_slice::<ExpiryClaim>(&payload)?;
		let exp = match claim.exp {
			Some(JsonValue::Number(n)) => n
				.as_i64()
				.or_else(|| n.as_f64().map(|f| f.trunc() as i64))
				.ok_or(IdentityTokenError::MissingExpiry)?,
			_ => return Err(IdentityTokenError::MissingExpiry),
		};
		let expires_at = OffsetDateTime::from_unix_timestamp(exp)
			.map_err(|_| IdentityTokenError::ExpiryOutOfRange { exp })?;

		Ok(Self { value: TokenSecret::new(raw), expires_at })
	}

	/// Returns true if the token has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}
}
impl Debug for IdentityToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("IdentityToken")
			.field("value", &"<redacted>")
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, base64::DecodeError> {
	URL_SAFE_NO_PAD.decode(segment).or_else(|_| URL_SAFE.decode(segment))
}
