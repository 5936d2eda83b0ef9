// std
use std::{
	future,
	sync::atomic::{AtomicUsize, Ordering},
	time::Duration as StdDuration,
};
// crates.io
use time::macros::datetime;
// self
use appwrite_auth::{
	_preludet::*,
	auth::{
		Claim, ClaimType, IdentityToken, ProjectId, TOKEN_NAME_JWT, TOKEN_NAME_JWT_EXPIRES_AT,
		TokenBag, TokenSecret,
	},
	error::ProviderApiError,
	handshake::{AppwriteScheme, HandshakeFailure, HandshakeOptions, HandshakeState},
	provider::{
		AccountApi, AccountConnector, ProfileData, ProviderEndpoint, ProviderFuture,
		ProviderSession,
	},
};

const EXPIRES_AT: OffsetDateTime = datetime!(2030-01-01 0:00 UTC);

#[derive(Default)]
struct Calls {
	connect: AtomicUsize,
	session: AtomicUsize,
	token: AtomicUsize,
	profile: AtomicUsize,
	credentials: Mutex<Vec<(String, String)>>,
}
impl Calls {
	fn provider_calls(&self) -> usize {
		self.session.load(Ordering::SeqCst)
			+ self.token.load(Ordering::SeqCst)
			+ self.profile.load(Ordering::SeqCst)
	}
}

#[derive(Clone)]
struct Script {
	session: Option<ProviderSession>,
	profile: Option<ProfileData>,
}

struct ScriptedConnector {
	script: Script,
	calls: Arc<Calls>,
}
impl AccountConnector for ScriptedConnector {
	type Client = ScriptedClient;

	fn connect(&self, endpoint: &ProviderEndpoint, project: &ProjectId) -> Result<Self::Client> {
		assert_eq!(endpoint.as_str(), "https://cloud.example.com");
		assert_eq!(project.as_ref(), "proj-1");

		self.calls.connect.fetch_add(1, Ordering::SeqCst);

		Ok(ScriptedClient { script: self.script.clone(), calls: self.calls.clone() })
	}
}

struct ScriptedClient {
	script: Script,
	calls: Arc<Calls>,
}
impl AccountApi for ScriptedClient {
	fn create_session<'a>(
		&'a self,
		user_id: &'a str,
		secret: &'a TokenSecret,
	) -> ProviderFuture<'a, Option<ProviderSession>> {
		self.calls.session.fetch_add(1, Ordering::SeqCst);
		self.calls.credentials.lock().push((user_id.to_owned(), secret.expose().to_owned()));

		let session = self.script.session.clone();

		Box::pin(async move { Ok(session) })
	}

	fn create_identity_token(&self) -> ProviderFuture<'_, IdentityToken> {
		self.calls.token.fetch_add(1, Ordering::SeqCst);

		Box::pin(async {
			Ok(IdentityToken { value: TokenSecret::new("x"), expires_at: EXPIRES_AT })
		})
	}

	fn fetch_profile(&self) -> ProviderFuture<'_, ProfileData> {
		self.calls.profile.fetch_add(1, Ordering::SeqCst);

		let result = self.script.profile.clone().ok_or_else(|| {
			Error::from(ProviderApiError {
				operation: "account.get",
				status: 503,
				kind: Some("general_unknown".into()),
				message: "upstream shard 7 offline".into(),
			})
		});

		Box::pin(async move { result })
	}
}

struct StallingConnector;
impl AccountConnector for StallingConnector {
	type Client = StallingClient;

	fn connect(&self, _: &ProviderEndpoint, _: &ProjectId) -> Result<Self::Client> {
		Ok(StallingClient)
	}
}

struct StallingClient;
impl AccountApi for StallingClient {
	fn create_session<'a>(
		&'a self,
		user_id: &'a str,
		_: &'a TokenSecret,
	) -> ProviderFuture<'a, Option<ProviderSession>> {
		Box::pin(async move { Ok(Some(test_session(user_id))) })
	}

	fn create_identity_token(&self) -> ProviderFuture<'_, IdentityToken> {
		Box::pin(async {
			Err(ProviderApiError {
				operation: "account.createJWT",
				status: 429,
				kind: Some("general_rate_limit_exceeded".into()),
				message: "Rate limit for the current endpoint has been exceeded.".into(),
			}
			.into())
		})
	}

	fn fetch_profile(&self) -> ProviderFuture<'_, ProfileData> {
		Box::pin(future::pending())
	}
}

fn alice() -> ProfileData {
	ProfileData::new("u1")
		.with_display_name("Alice")
		.with_email("a@example.com")
		.with_preference("theme", "dark")
}

fn scheme(script: Script) -> (AppwriteScheme<ScriptedConnector>, Arc<Calls>) {
	let calls = Arc::new(Calls::default());
	let options = HandshakeOptions::builder("https://cloud.example.com/v1", "proj-1")
		.build()
		.expect("Options fixture should build.");
	let connector = ScriptedConnector { script, calls: calls.clone() };

	(AppwriteScheme::with_connector(options, connector), calls)
}

#[tokio::test]
async fn missing_secret_fails_without_provider_calls() {
	let (scheme, calls) =
		scheme(Script { session: Some(test_session("u1")), profile: Some(alice()) });
	let outcome = scheme.handle_callback("?userId=u1").await;

	assert_eq!(outcome.state(), HandshakeState::Failed);
	assert!(matches!(
		outcome.failure(),
		Some(HandshakeFailure::MissingParameter { name: "secret" })
	));
	assert_eq!(calls.connect.load(Ordering::SeqCst), 0);
	assert_eq!(calls.provider_calls(), 0);
}

#[tokio::test]
async fn successful_callback_builds_claims_and_tokens() {
	let (scheme, calls) =
		scheme(Script { session: Some(test_session("u1")), profile: Some(alice()) });
	let ticket = scheme
		.handle_callback("?secret=one-time&userId=u1")
		.await
		.into_result()
		.expect("Callback should succeed.");

	assert_eq!(ticket.scheme.as_ref(), "AppwriteAuth");
	assert_eq!(
		ticket.principal.claims,
		vec![
			Claim::new(ClaimType::Name, "Alice"),
			Claim::new(ClaimType::Email, "a@example.com"),
			Claim::new(ClaimType::Id, "u1"),
			Claim::new(ClaimType::Preference("theme".into()), "dark"),
		]
	);
	assert_eq!(ticket.principal.claims[3].kind.to_string(), "AppwritePref_theme");
	assert_eq!(ticket.tokens.jwt.expose(), "x");
	assert_eq!(ticket.tokens.jwt_expiry, "2030-01-01T00:00:00Z");
	assert_eq!(
		ticket.tokens.provider_session().expect("Stored session should decode."),
		test_session("u1")
	);
	assert_eq!(calls.connect.load(Ordering::SeqCst), 1);
	assert_eq!(calls.token.load(Ordering::SeqCst), 1);
	assert_eq!(calls.profile.load(Ordering::SeqCst), 1);
	assert_eq!(*calls.credentials.lock(), vec![("u1".to_owned(), "one-time".to_owned())]);

	let entries = ticket.tokens.entries();
	let restored = TokenBag::from_entries(
		entries.iter().map(|entry| (entry.name.as_str(), entry.value.as_str())),
	)
	.expect("Entries should restore the bag.");

	assert_eq!(restored, ticket.tokens);
	assert!(entries.iter().any(|entry| entry.name == TOKEN_NAME_JWT && entry.value == "x"));
	assert!(entries.iter().any(|entry| entry.name == TOKEN_NAME_JWT_EXPIRES_AT));
}

#[tokio::test]
async fn empty_preferences_yield_identity_claims_only() {
	let profile = ProfileData::new("u2");
	let (scheme, _) = scheme(Script { session: Some(test_session("u2")), profile: Some(profile) });
	let ticket = scheme
		.handle_callback("secret=s&userId=u2")
		.await
		.into_result()
		.expect("Callback should succeed.");

	assert_eq!(ticket.principal.claims.len(), 3);
	assert_eq!(ticket.principal.name(), "");
	assert_eq!(ticket.principal.email(), "");
	assert_eq!(ticket.principal.id(), "u2");
	assert_eq!(ticket.principal.preferences().count(), 0);
}

#[tokio::test]
async fn null_session_is_an_invalid_session() {
	let (scheme, calls) = scheme(Script { session: None, profile: Some(alice()) });
	let outcome = scheme.handle_callback("secret=s&userId=u1").await;

	assert!(matches!(outcome.failure(), Some(HandshakeFailure::InvalidSession)));
	assert_eq!(calls.session.load(Ordering::SeqCst), 1);
	assert_eq!(calls.token.load(Ordering::SeqCst), 0);
	assert_eq!(calls.profile.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn profile_failure_keeps_cause_but_hides_it_from_users() {
	let (scheme, _) = scheme(Script { session: Some(test_session("u1")), profile: None });
	let failure = scheme
		.handle_callback("secret=s&userId=u1")
		.await
		.into_result()
		.expect_err("Profile failure should fail the handshake.");

	assert!(matches!(
		failure.cause(),
		Some(Error::Provider(ProviderApiError { operation: "account.get", status: 503, .. }))
	));
	assert!(!failure.to_string().contains("shard"));
	assert!(!failure.user_message().contains("shard"));

	let source = StdError::source(&failure).expect("Provider failure should expose its cause.");

	assert!(source.to_string().contains("upstream shard 7 offline"));
}

#[tokio::test]
async fn token_failure_abandons_pending_profile_lookup() {
	let options = HandshakeOptions::builder("https://cloud.example.com", "proj-1")
		.build()
		.expect("Options fixture should build.");
	let scheme = AppwriteScheme::with_connector(options, StallingConnector);
	let callback = scheme.handle_callback("secret=s&userId=u1");
	let outcome = tokio::time::timeout(StdDuration::from_secs(5), callback)
		.await
		.expect("First failure should resolve the join without waiting for the profile.");
	let failure = outcome.into_result().expect_err("Token failure should fail the handshake.");

	assert_eq!(failure.as_str(), "provider_error");
	assert!(matches!(
		failure.cause(),
		Some(Error::Provider(ProviderApiError { status: 429, .. }))
	));
}

#[test]
fn challenge_points_at_provider_with_return_url() {
	let (scheme, calls) = scheme(Script { session: None, profile: None });
	let challenge = scheme.challenge("https://app.example.com").expect("Challenge should build.");
	let redirect = challenge.redirect_url.as_str();

	assert_eq!(challenge.return_url.as_str(), "https://app.example.com/signin-appwrite");
	assert!(redirect.starts_with("https://cloud.example.com/v1/account/tokens/oauth2/oidc?"));
	assert!(redirect.contains("project=proj-1"));
	assert!(redirect.contains("scopes[0]=openid&scopes[1]=profile"));
	assert!(redirect.ends_with("success=https%3A%2F%2Fapp.example.com%2Fsignin-appwrite"));
	assert_eq!(calls.connect.load(Ordering::SeqCst), 0);
}
