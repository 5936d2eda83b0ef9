//! Reqwest-backed provider client.

// crates.io
use reqwest::{Method, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::{IdentityToken, ProjectId, TokenSecret},
	error::{DecodeError, ProviderApiError, TransportError},
	http::{HttpSettings, ReqwestHttpClient},
	provider::{
		AccountApi, AccountConnector, Credential, OP_CREATE_JWT, OP_CREATE_SESSION,
		OP_GET_ACCOUNT, ProfileData, ProviderEndpoint, ProviderFuture, ProviderSession,
	},
};

const BODY_PREVIEW_LIMIT: usize = 256;

#[derive(Deserialize)]
struct JwtReply {
	jwt: String,
}

#[derive(Deserialize)]
struct ErrorReply {
	message: String,
	#[serde(default, rename = "type")]
	kind: Option<String>,
}

/// Provider API client scoped to one endpoint, project, and credential.
///
/// After [`AccountApi::create_session`] succeeds the client adopts the session (via the
/// disclosed session secret and its private cookie store) for subsequent calls.
pub struct AppwriteClient {
	http: ReqwestHttpClient,
	endpoint: ProviderEndpoint,
	project: ProjectId,
	credential: RwLock<Credential>,
}
impl AppwriteClient {
	/// Creates a client with default [`HttpSettings`].
	pub fn new(
		endpoint: ProviderEndpoint,
		project: ProjectId,
		credential: Credential,
	) -> Result<Self> {
		Self::with_settings(endpoint, project, credential, &HttpSettings::default())
	}

	/// Creates a client with its own transport built from `settings`.
	pub fn with_settings(
		endpoint: ProviderEndpoint,
		project: ProjectId,
		credential: Credential,
		settings: &HttpSettings,
	) -> Result<Self> {
		let http = ReqwestHttpClient::from_settings(settings)?;

		Ok(Self::with_http_client(http, endpoint, project, credential))
	}

	/// Creates a client around a caller-provided transport.
	pub fn with_http_client(
		http: ReqwestHttpClient,
		endpoint: ProviderEndpoint,
		project: ProjectId,
		credential: Credential,
	) -> Self {
		Self { http, endpoint, project, credential: RwLock::new(credential) }
	}

	/// Endpoint the client talks to.
	pub fn endpoint(&self) -> &ProviderEndpoint {
		&self.endpoint
	}

	/// Project the client is scoped to.
	pub fn project(&self) -> &ProjectId {
		&self.project
	}

	/// Credential currently attached to calls.
	pub fn credential(&self) -> Credential {
		self.credential.read().clone()
	}

	/// Replaces the credential attached to subsequent calls.
	pub fn set_credential(&self, credential: Credential) {
		*self.credential.write() = credential;
	}

	/// Sends a JSON request to an API path and decodes the reply.
	///
	/// Empty or `null` bodies (surrounding whitespace ignored) decode to `Ok(None)`. Non-success statuses become
	/// [`ProviderApiError`].
	pub async fn request_json<T>(
		&self,
		operation: &'static str,
		method: Method,
		path: &str,
		body: Option<&JsonValue>,
	) -> Result<Option<T>>
	where
		T: DeserializeOwned,
	{
		let bytes = self.send(operation, method, path, body).await?;
		let trimmed = bytes.trim_ascii();

		if trimmed.is_empty() || trimmed == b"null" {
			return Ok(None);
		}

		decode(operation, trimmed).map(Some)
	}

	async fn send(
		&self,
		operation: &'static str,
		method: Method,
		path: &str,
		body: Option<&JsonValue>,
	) -> Result<Vec<u8>> {
		let mut request = self
			.http
			.request(method, self.endpoint.api_url(path))
			.header("X-Appwrite-Project", &*self.project)
			.header(CONTENT_TYPE, "application/json");
		let credential = self.credential();

		if let Some((name, value)) = credential.header() {
			request = request.header(name, value);
		}
		if let Some(body) = body {
			request = request.body(body.to_string());
		}

		let response = request
			.send()
			.await
			.map_err(|e| TransportError::from_reqwest(operation, e))?;
		let status = response.status();
		let bytes = response
			.bytes()
			.await
			.map_err(|e| TransportError::from_reqwest(operation, e))?
			.to_vec();

		if !status.is_success() {
			return Err(api_error(operation, status.as_u16(), &bytes).into());
		}

		Ok(bytes)
	}
}
impl AccountApi for AppwriteClient {
	fn create_session<'a>(
		&'a self,
		user_id: &'a str,
		secret: &'a TokenSecret,
	) -> ProviderFuture<'a, Option<ProviderSession>> {
		Box::pin(async move {
			let body = serde_json::json!({ "userId": user_id, "secret": secret.expose() });
			let session = self
				.request_json::<ProviderSession>(
					OP_CREATE_SESSION,
					Method::POST,
					"/account/sessions/token",
					Some(&body),
				)
				.await?;

			if let Some(secret) = session.as_ref().and_then(ProviderSession::secret) {
				self.set_credential(Credential::Session(TokenSecret::new(secret)));
			}

			Ok(session)
		})
	}

	fn create_identity_token(&self) -> ProviderFuture<'_, IdentityToken> {
		Box::pin(async move {
			let body = serde_json::json!({});
			let bytes = self.send(OP_CREATE_JWT, Method::POST, "/account/jwts", Some(&body)).await?;
			let reply = decode::<JwtReply>(OP_CREATE_JWT, &bytes)?;

			Ok(IdentityToken::parse(reply.jwt)?)
		})
	}

	fn fetch_profile(&self) -> ProviderFuture<'_, ProfileData> {
		Box::pin(async move {
			let bytes = self.send(OP_GET_ACCOUNT, Method::GET, "/account", None).await?;

			decode(OP_GET_ACCOUNT, &bytes)
		})
	}
}
impl Debug for AppwriteClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AppwriteClient")
			.field("endpoint", &self.endpoint)
			.field("project", &self.project)
			.field("credential", &*self.credential.read())
			.finish()
	}
}

/// Default connector producing a fresh [`AppwriteClient`] (and transport) per callback.
#[derive(Clone, Debug, Default)]
pub struct ReqwestConnector {
	/// Transport settings applied to each client.
	pub settings: HttpSettings,
}
impl ReqwestConnector {
	/// Creates a connector with custom transport settings.
	pub fn with_settings(settings: HttpSettings) -> Self {
		Self { settings }
	}
}
impl AccountConnector for ReqwestConnector {
	type Client = AppwriteClient;

	fn connect(&self, endpoint: &ProviderEndpoint, project: &ProjectId) -> Result<Self::Client> {
		AppwriteClient::with_settings(
			endpoint.clone(),
			project.clone(),
			Credential::Anonymous,
			&self.settings,
		)
	}
}

fn decode<T>(operation: &'static str, bytes: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut de = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut de)
		.map_err(|source| DecodeError { operation, source }.into())
}

fn api_error(operation: &'static str, status: u16, body: &[u8]) -> ProviderApiError {
	match serde_json::from_slice::<ErrorReply>(body) {
		Ok(reply) => ProviderApiError { operation, status, kind: reply.kind, message: reply.message },
		Err(_) => ProviderApiError { operation, status, kind: None, message: preview(body) },
	}
}

fn preview(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);

	if text.trim().is_empty() {
		return "empty response body".into();
	}
	if text.chars().count() <= BODY_PREVIEW_LIMIT {
		return text.into_owned();
	}

	let mut buf = text.chars().take(BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}
