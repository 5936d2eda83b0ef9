// crates.io
use httpmock::prelude::*;
use time::macros::datetime;
// self
use appwrite_auth::{
	_preludet::*,
	auth::{IdentityToken, ProjectId, TokenBag, TokenSecret},
	config::ProviderSettings,
	error::{ConfigError, ProviderApiError},
	factory::ClientFactory,
	provider::{AccountApi, Credential, ProviderEndpoint},
	reqwest::Method,
};

const PROJECT: &str = "proj-1";

fn settings(server: &MockServer) -> ProviderSettings {
	ProviderSettings::new(
		ProviderEndpoint::parse(&server.base_url()).expect("Mock endpoint should parse."),
		ProjectId::new(PROJECT).expect("Project fixture should be valid."),
	)
}

fn token_bag() -> TokenBag {
	let token = IdentityToken::parse(test_identity_token(datetime!(2099-01-01 0:00 UTC)))
		.expect("Token fixture should parse.");

	TokenBag::pack(&test_session("u1"), &token).expect("Bag fixture should pack.")
}

#[tokio::test]
async fn server_client_sends_api_key() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1/users")
				.header("x-appwrite-project", PROJECT)
				.header("x-appwrite-key", "server-key");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"total":0,"users":[]}"#);
		})
		.await;
	let factory = ClientFactory::new(settings(&server).with_key("server-key"));
	let client = factory.server_client().expect("Server client should build.");

	assert!(client.credential().is_server());

	let reply = client
		.request_json::<JsonValue>("users.list", Method::GET, "/users", None)
		.await
		.expect("Users listing should succeed.")
		.expect("Users listing should return a body.");

	mock.assert_async().await;

	assert_eq!(reply["total"], 0);
}

#[test]
fn server_client_requires_api_key() {
	let factory = ClientFactory::new(ProviderSettings::new(
		ProviderEndpoint::parse("https://cloud.example.com").expect("Endpoint should parse."),
		ProjectId::new(PROJECT).expect("Project fixture should be valid."),
	));

	assert!(matches!(factory.server_client(), Err(Error::Config(ConfigError::MissingApiKey))));
	assert_eq!(
		factory.user_client().expect("Anonymous client should build.").credential(),
		Credential::Anonymous
	);
}

#[tokio::test]
async fn stored_tokens_rebuild_a_jwt_scoped_client() {
	let server = MockServer::start_async().await;
	let bag = token_bag();
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1/account")
				.header("x-appwrite-project", PROJECT)
				.header("x-appwrite-jwt", bag.jwt.expose());
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"$id":"u1","name":"Alice","email":"a@example.com","prefs":{}}"#);
		})
		.await;
	let factory = ClientFactory::new(settings(&server));
	let client = factory.resolve_user_client(Some(&bag)).expect("User client should build.");

	assert_eq!(client.credential(), Credential::Jwt(bag.jwt.clone()));

	let profile = client.fetch_profile().await.expect("Profile fetch should succeed.");

	mock.assert_async().await;

	assert_eq!(profile.id, "u1");
	assert_eq!(profile.display_name.as_deref(), Some("Alice"));
}

#[tokio::test]
async fn missing_tokens_fall_back_to_anonymous_client() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/account");
			then.status(401).header("content-type", "application/json").body(
				r#"{"message":"User (role: guests) missing scope (account)","code":401,"type":"general_unauthorized_scope"}"#,
			);
		})
		.await;
	let factory = ClientFactory::new(settings(&server));
	let client = factory.resolve_user_client(None).expect("Anonymous client should build.");

	assert_eq!(client.credential(), Credential::Anonymous);

	let err = client.fetch_profile().await.expect_err("Guests cannot read the account.");

	mock.assert_async().await;

	assert!(matches!(
		err,
		Error::Provider(ProviderApiError { operation: "account.get", status: 401, .. })
	));
}

#[tokio::test]
async fn session_scoped_client_sends_session_header() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1/account/jwts")
				.header("x-appwrite-session", "sess-secret");
			then.status(201)
				.header("content-type", "application/json")
				.body(
					serde_json::json!({
						"jwt": test_identity_token(datetime!(2030-01-01 0:00 UTC))
					})
					.to_string(),
				);
		})
		.await;
	let factory = ClientFactory::new(settings(&server));
	let client = factory
		.user_client_from_session(TokenSecret::new("sess-secret"))
		.expect("Session client should build.");
	let token = client.create_identity_token().await.expect("Token issuance should succeed.");

	mock.assert_async().await;

	assert_eq!(token.expires_at, datetime!(2030-01-01 0:00 UTC));
}
