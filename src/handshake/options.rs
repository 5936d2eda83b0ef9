//! Scheme configuration shared read-only by every handshake of that scheme.

// self
use crate::{
	_prelude::*,
	auth::{ProjectId, SchemeName, ScopeList},
	error::ConfigError,
	provider::ProviderEndpoint,
};

/// Callback path used when none is configured.
pub const DEFAULT_CALLBACK_PATH: &str = "/signin-appwrite";
/// Scheme and display name used when none is configured.
pub const DEFAULT_SCHEME_NAME: &str = "AppwriteAuth";
/// Scopes requested when none are configured.
pub const DEFAULT_SCOPES: [&str; 2] = ["openid", "profile"];

/// Validated, immutable handshake configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandshakeOptions {
	endpoint: ProviderEndpoint,
	project: ProjectId,
	callback_path: String,
	scopes: ScopeList,
	display_name: String,
	scheme: SchemeName,
}
impl HandshakeOptions {
	/// Starts a builder for the given provider endpoint and project identifier.
	pub fn builder(
		endpoint: impl Into<String>,
		project: impl Into<String>,
	) -> HandshakeOptionsBuilder {
		HandshakeOptionsBuilder::new(endpoint.into(), project.into())
	}

	/// Provider endpoint (without the `/v1` segment).
	pub fn endpoint(&self) -> &ProviderEndpoint {
		&self.endpoint
	}

	/// Provider project identifier.
	pub fn project(&self) -> &ProjectId {
		&self.project
	}

	/// Absolute path the provider redirects back to.
	pub fn callback_path(&self) -> &str {
		&self.callback_path
	}

	/// Requested scopes in encoding order.
	pub fn scopes(&self) -> &ScopeList {
		&self.scopes
	}

	/// Human-readable scheme label.
	pub fn display_name(&self) -> &str {
		&self.display_name
	}

	/// Name the scheme is registered under.
	pub fn scheme(&self) -> &SchemeName {
		&self.scheme
	}

	/// Returns true when a request path targets the callback endpoint.
	///
	/// Matching ignores ASCII case and a single trailing `/`.
	pub fn matches_callback(&self, path: &str) -> bool {
		let path = if path.len() > 1 { path.strip_suffix('/').unwrap_or(path) } else { path };

		path.eq_ignore_ascii_case(&self.callback_path)
	}
}

/// Builder for [`HandshakeOptions`]; validation happens in [`HandshakeOptionsBuilder::build`].
#[derive(Clone, Debug)]
pub struct HandshakeOptionsBuilder {
	endpoint: String,
	project: String,
	callback_path: String,
	scopes: Vec<String>,
	display_name: Option<String>,
	scheme: String,
}
impl HandshakeOptionsBuilder {
	fn new(endpoint: String, project: String) -> Self {
		Self {
			endpoint,
			project,
			callback_path: DEFAULT_CALLBACK_PATH.into(),
			scopes: DEFAULT_SCOPES.iter().map(|scope| (*scope).into()).collect(),
			display_name: None,
			scheme: DEFAULT_SCHEME_NAME.into(),
		}
	}

	/// Overrides the callback path (must start with `/`; one trailing `/` is dropped).
	pub fn callback_path(mut self, path: impl Into<String>) -> Self {
		self.callback_path = path.into();

		self
	}

	/// Replaces the requested scopes.
	pub fn scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Appends one requested scope.
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scopes.push(scope.into());

		self
	}

	/// Overrides the display name (defaults to the scheme name).
	pub fn display_name(mut self, name: impl Into<String>) -> Self {
		self.display_name = Some(name.into());

		self
	}

	/// Overrides the scheme name.
	pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
		self.scheme = scheme.into();

		self
	}

	/// Validates the configuration.
	pub fn build(self) -> Result<HandshakeOptions, ConfigError> {
		let endpoint = ProviderEndpoint::parse(&self.endpoint)?;
		let project = ProjectId::new(self.project.trim())?;
		let scheme = SchemeName::new(&self.scheme)
			.map_err(|source| ConfigError::InvalidSchemeName { source })?;

		if !self.callback_path.starts_with('/') {
			return Err(ConfigError::InvalidCallbackPath { path: self.callback_path });
		}

		let mut callback_path = self.callback_path;

		if callback_path.len() > 1 && callback_path.ends_with('/') {
			callback_path.pop();
		}

		let scopes = ScopeList::new(self.scopes)?;
		let display_name = self.display_name.unwrap_or_else(|| scheme.to_string());

		Ok(HandshakeOptions {
			endpoint,
			project,
			callback_path,
			scopes,
			display_name,
			scheme,
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_follow_scheme_conventions() {
		let options = HandshakeOptions::builder("https://cloud.example.com/v1", "demo")
			.build()
			.expect("Default options should build.");

		assert_eq!(options.endpoint().as_str(), "https://cloud.example.com");
		assert_eq!(options.project().as_ref(), "demo");
		assert_eq!(options.callback_path(), DEFAULT_CALLBACK_PATH);
		assert_eq!(options.scopes().iter().collect::<Vec<_>>(), vec!["openid", "profile"]);
		assert_eq!(options.display_name(), "AppwriteAuth");
		assert_eq!(options.scheme().as_ref(), "AppwriteAuth");
	}

	#[test]
	fn build_rejects_broken_invariants() {
		let builder = || HandshakeOptions::builder("https://cloud.example.com", "demo");

		assert!(matches!(
			HandshakeOptions::builder("https://cloud.example.com", "  ").build(),
			Err(ConfigError::InvalidProject(_))
		));
		assert!(matches!(
			builder().callback_path("").build(),
			Err(ConfigError::InvalidCallbackPath { .. })
		));
		assert!(matches!(
			builder().callback_path("signin").build(),
			Err(ConfigError::InvalidCallbackPath { .. })
		));
		assert!(matches!(builder().scope("bad scope").build(), Err(ConfigError::InvalidScope(_))));
		assert!(matches!(
			builder().scheme("Appwrite Auth").build(),
			Err(ConfigError::InvalidSchemeName { .. })
		));
		assert!(matches!(
			HandshakeOptions::builder("mailto:ops@example.com", "demo").build(),
			Err(ConfigError::UnsupportedEndpointScheme { .. })
		));
	}

	#[test]
	fn callback_matching_is_lenient_on_case_and_slash() {
		let options = HandshakeOptions::builder("https://cloud.example.com", "demo")
			.callback_path("/auth/callback")
			.scopes(Vec::<String>::new())
			.display_name("Sign in")
			.build()
			.expect("Custom options should build.");

		assert!(options.scopes().is_empty());
		assert_eq!(options.display_name(), "Sign in");
		assert!(options.matches_callback("/auth/callback"));
		assert!(options.matches_callback("/Auth/Callback/"));
		assert!(!options.matches_callback("/auth/callback/extra"));
		assert!(!options.matches_callback("/"));
	}

	#[test]
	fn configured_trailing_slash_still_matches_callbacks() {
		let builder = || HandshakeOptions::builder("https://cloud.example.com", "demo");
		let options =
			builder().callback_path("/auth/").build().expect("Slash-terminated path should build.");

		assert_eq!(options.callback_path(), "/auth");
		assert!(options.matches_callback("/auth/"));
		assert!(options.matches_callback("/auth"));

		let root = builder().callback_path("/").build().expect("Root path should build.");

		assert_eq!(root.callback_path(), "/");
		assert!(root.matches_callback("/"));
	}
}
