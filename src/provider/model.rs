//! Data returned by the provider's account API.

// self
use crate::_prelude::*;

/// Opaque session handle returned by a successful credential exchange.
///
/// The full field map is kept as returned so it can be stored and later rebuilt without
/// losing provider-specific fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderSession {
	fields: JsonMap<String, JsonValue>,
}
impl ProviderSession {
	/// Wraps a session field map.
	pub fn from_fields(fields: JsonMap<String, JsonValue>) -> Self {
		Self { fields }
	}

	/// Decodes a session from its stored textual form.
	pub fn from_stored(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}

	/// Serializes the field map into its stored textual form.
	pub fn to_stored(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string(&self.fields)
	}

	/// Borrows the raw field map.
	pub fn fields(&self) -> &JsonMap<String, JsonValue> {
		&self.fields
	}

	/// Consumes the session and returns the raw field map.
	pub fn into_fields(self) -> JsonMap<String, JsonValue> {
		self.fields
	}

	/// Session identifier (`$id`).
	pub fn id(&self) -> Option<&str> {
		self.str_field("$id")
	}

	/// Owning user identifier (`userId`).
	pub fn user_id(&self) -> Option<&str> {
		self.str_field("userId")
	}

	/// Session secret (`secret`), present only when the provider chose to disclose it.
	pub fn secret(&self) -> Option<&str> {
		self.str_field("secret").filter(|value| !value.is_empty())
	}

	/// Session expiry as reported by the provider (`expire`).
	pub fn expire(&self) -> Option<&str> {
		self.str_field("expire")
	}

	fn str_field(&self, key: &str) -> Option<&str> {
		self.fields.get(key).and_then(JsonValue::as_str)
	}
}

/// Account profile fetched with a freshly created session.
///
/// Absent `name`/`email` stay `None` here; defaults are applied only when claims are built.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
	/// Provider user identifier.
	#[serde(rename = "$id")]
	pub id: String,
	/// Display name.
	#[serde(default, rename = "name")]
	pub display_name: Option<String>,
	/// Primary email address.
	#[serde(default)]
	pub email: Option<String>,
	/// User preferences in the order the provider returned them.
	#[serde(default, rename = "prefs")]
	pub preferences: JsonMap<String, JsonValue>,
}
impl ProfileData {
	/// Creates a profile with only an identifier.
	pub fn new(id: impl Into<String>) -> Self {
		Self { id: id.into(), ..Default::default() }
	}

	/// Sets the display name.
	pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
		self.display_name = Some(name.into());

		self
	}

	/// Sets the email address.
	pub fn with_email(mut self, email: impl Into<String>) -> Self {
		self.email = Some(email.into());

		self
	}

	/// Appends a preference entry.
	pub fn with_preference(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
		self.preferences.insert(key.into(), value.into());

		self
	}
}
