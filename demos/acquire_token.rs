//! Acquires a service token with the password grant against a local mock token endpoint,
//! reading the client and user credentials from a temporary directory.

// std
use std::fs;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use tempfile::TempDir;
use url::Url;
// self
use oauth2_tooling::flows::{AuthorizationRedirect, Realm, TokenRequest};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/access_token").query_param("realm", "/services");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"4b70510f-be1d-4f0f-b4cb-edbca2c79d41\",\"token_type\":\"Bearer\",\"expires_in\":3599}",
			);
		})
		.await;
	let credentials = TempDir::new()?;

	fs::write(
		credentials.path().join("user.json"),
		r#"{"application_username":"orders-service","application_password":"s3cr3t"}"#,
	)?;
	fs::write(
		credentials.path().join("client.json"),
		r#"{"client_id":"orders-client","client_secret":"client-s3cr3t"}"#,
	)?;

	let request = TokenRequest::builder()
		.password(["uid", "orders.read"])
		.realm(Realm::Services)
		.access_token_endpoint(Url::parse(&server.url("/oauth2/access_token"))?)
		.credentials_dir(credentials.path())
		.build()?;
	let response = oauth2_tooling::acquire_token(&request).await?;

	println!("access token: {}", response.access_token().unwrap_or("<none>"));
	println!("expires in:   {:?}", response.expires_in());

	token_mock.assert_async().await;

	// Employees start the authorization code grant in a browser.
	let redirect = AuthorizationRedirect::new(
		&Url::parse(&server.url("/oauth2/authorize"))?,
		"orders-client",
		Url::parse("https://orders.example.com/callback")?,
		Realm::Employees,
	);

	println!("authorize at: {}", redirect.url);

	Ok(())
}
