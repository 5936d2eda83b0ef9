//! Walks through one remote sign-in against a mock provider: issue the challenge redirect,
//! process the callback, then rebuild a user-scoped client from the stored tokens.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use color_eyre::{Result, eyre::eyre};
use httpmock::prelude::*;
use time::{Duration, OffsetDateTime};
// self
use appwrite_auth::{
	config::ProviderSettings,
	factory::ClientFactory,
	handshake::{HandshakeOptions, ReqwestScheme},
	provider::AccountApi,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let jwt = demo_token(OffsetDateTime::now_utc() + Duration::minutes(15));

	server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/account/sessions/token");
			then.status(201).header("content-type", "application/json").body(
				r#"{"$id":"session-1","userId":"u1","provider":"oidc","secret":"demo-session"}"#,
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/account/jwts").header("x-appwrite-session", "demo-session");
			then.status(201)
				.header("content-type", "application/json")
				.body(format!(r#"{{"jwt":"{jwt}"}}"#));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/account");
			then.status(200).header("content-type", "application/json").body(
				r#"{"$id":"u1","name":"Alice","email":"a@example.com","prefs":{"theme":"dark"}}"#,
			);
		})
		.await;

	let options = HandshakeOptions::builder(server.base_url(), "demo-project").build()?;
	let scheme = ReqwestScheme::new(options);
	let challenge = scheme.challenge("http://localhost:3000")?;

	println!("Redirect the browser to {}.", challenge.redirect_url);

	let ticket = scheme
		.handle_callback("userId=u1&secret=one-time-secret")
		.await
		.into_result()
		.map_err(|failure| eyre!(failure.user_message()))?;

	for claim in &ticket.principal.claims {
		println!("Claim {} = {:?}.", claim.kind, claim.value);
	}
	for entry in ticket.tokens.entries() {
		println!("Persist token entry {}.", entry.name);
	}

	let settings = ProviderSettings::new(
		scheme.options().endpoint().clone(),
		scheme.options().project().clone(),
	);
	let client = ClientFactory::new(settings).resolve_user_client(Some(&ticket.tokens))?;
	let profile = client.fetch_profile().await?;

	println!("Rehydrated client sees user {}.", profile.id);

	Ok(())
}

fn demo_token(expires_at: OffsetDateTime) -> String {
	let payload = format!(r#"{{"userId":"u1","exp":{}}}"#, expires_at.unix_timestamp());

	format!(
		"{}.{}.c2lnbmF0dXJl",
		URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#),
		URL_SAFE_NO_PAD.encode(payload)
	)
}
