//! Provider connection settings loaded from the environment or any key lookup.

// self
use crate::{
	_prelude::*,
	auth::{ProjectId, TokenSecret},
	error::ConfigError,
	handshake::{HandshakeOptions, HandshakeOptionsBuilder},
	provider::ProviderEndpoint,
};

/// Environment key for the provider endpoint.
pub const ENV_ENDPOINT: &str = "APPWRITE_ENDPOINT";
/// Environment key for the project identifier.
pub const ENV_PROJECT: &str = "APPWRITE_PROJECT";
/// Legacy environment key for the project identifier.
pub const ENV_PROJECT_LEGACY: &str = "APPWRITE_PROJECT_ID";
/// Environment key for the server API key.
pub const ENV_API_KEY: &str = "APPWRITE_KEY";
/// Legacy environment key for the server API key.
pub const ENV_API_KEY_LEGACY: &str = "APPWRITE_API_KEY";

/// Endpoint, project, and optional API key for one provider project.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ProviderSettings {
	/// Provider endpoint.
	pub endpoint: ProviderEndpoint,
	/// Provider project identifier.
	#[serde(alias = "projectId", alias = "project_id")]
	pub project: ProjectId,
	/// Server API key; required only for server-privileged clients.
	#[serde(default, alias = "apiKey", alias = "api_key")]
	pub key: Option<TokenSecret>,
}
impl ProviderSettings {
	/// Creates settings from already validated parts.
	pub fn new(endpoint: ProviderEndpoint, project: ProjectId) -> Self {
		Self { endpoint, project, key: None }
	}

	/// Attaches a server API key.
	pub fn with_key(mut self, key: impl Into<String>) -> Self {
		self.key = Some(TokenSecret::new(key));

		self
	}

	/// Loads settings from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Loads settings through `lookup`, trying primary keys before legacy ones.
	///
	/// Blank values count as absent.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let read = |names: &[&'static str]| {
			names.iter().find_map(|name| lookup(*name).filter(|value| !value.trim().is_empty()))
		};
		let endpoint = read(&[ENV_ENDPOINT])
			.ok_or(ConfigError::MissingSetting { name: ENV_ENDPOINT })?;
		let project = read(&[ENV_PROJECT, ENV_PROJECT_LEGACY])
			.ok_or(ConfigError::MissingSetting { name: ENV_PROJECT })?;
		let key = read(&[ENV_API_KEY, ENV_API_KEY_LEGACY]);
		let settings =
			Self::new(ProviderEndpoint::parse(&endpoint)?, ProjectId::new(project.trim())?);

		Ok(match key {
			Some(key) => settings.with_key(key.trim()),
			None => settings,
		})
	}

	/// Starts handshake options for this provider project.
	pub fn handshake_options(&self) -> HandshakeOptionsBuilder {
		HandshakeOptions::builder(self.endpoint.as_str(), &*self.project)
	}
}
