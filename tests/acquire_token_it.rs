#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use tempfile::TempDir;
// self
use oauth2_tooling::{
	_preludet::*,
	error::{ConfigError, CredentialError},
	flows::{GrantType, Realm, TokenRequest},
};

const ACCESS_TOKEN: &str = "4b70510f-be1d-4f0f-b4cb-edbca2c79d41";
const VALID_BASIC: &str = "Basic dGVzdC1jbGllbnQ6dGVzdC1jbGllbnQtc2VjcmV0";
const WRONG_BASIC: &str = "Basic dGVzdC1jbGllbnQ6d3Jvbmctc2VjcmV0";

fn credentials_dir() -> TempDir {
	let dir = TempDir::new().expect("Temporary credentials directory should be created.");

	write_credentials(dir.path());

	dir
}

fn token_endpoint(server: &MockServer) -> Url {
	Url::parse(&server.url("/token")).expect("Mock token endpoint should parse successfully.")
}

fn password_request(server: &MockServer, dir: &TempDir) -> TokenRequest {
	TokenRequest::builder()
		.password(["uid", "orders.read"])
		.realm(Realm::Services)
		.access_token_endpoint(token_endpoint(server))
		.credentials_dir(dir.path())
		.build()
		.expect("Password token request should build successfully.")
}

#[tokio::test]
async fn password_grant_returns_access_token() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/token")
				.query_param("realm", "/services")
				.header("authorization", VALID_BASIC)
				.header("content-type", "application/x-www-form-urlencoded")
				.form_urlencoded_tuple("grant_type", "password")
				.form_urlencoded_tuple("username", TEST_USERNAME)
				.form_urlencoded_tuple("password", TEST_PASSWORD)
				.form_urlencoded_tuple("scope", "uid orders.read");
			then.status(200).header("content-type", "application/json").body(format!(
				"{{\"access_token\":\"{ACCESS_TOKEN}\",\"token_type\":\"Bearer\",\"expires_in\":3600}}"
			));
		})
		.await;
	let dir = credentials_dir();
	let acquirer = build_reqwest_test_acquirer();
	let response = acquirer
		.acquire(&password_request(&server, &dir))
		.await
		.expect("Password grant should succeed against the mock endpoint.");

	assert_eq!(response.access_token(), Some(ACCESS_TOKEN));
	assert_eq!(response.token_type(), Some("Bearer"));
	assert_eq!(response.expires_in(), Some(Duration::hours(1)));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn wrong_client_secret_surfaces_upstream_rejection() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token").header("authorization", WRONG_BASIC);
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_client\"}");
		})
		.await;
	let dir = TempDir::new().expect("Temporary credentials directory should be created.");

	write_credentials_with(dir.path(), TEST_CLIENT_ID, "wrong-secret");

	let err = build_reqwest_test_acquirer()
		.acquire(&password_request(&server, &dir))
		.await
		.expect_err("Invalid client credentials should be rejected.");

	assert_eq!(err.status(), Some(401));

	let Error::Upstream(rejection) = err else {
		panic!("Expected an upstream rejection, got {err:?}.");
	};

	assert_eq!(rejection.oauth_error(), Some("invalid_client"));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn authorization_code_grant_sends_code_and_redirect_uri() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/token")
				.query_param("realm", "/employees")
				.header("authorization", VALID_BASIC)
				.form_urlencoded_tuple("grant_type", "authorization_code")
				.form_urlencoded_tuple("code", "auth-code-123")
				.form_urlencoded_tuple("redirect_uri", "https://app.example.com/callback");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"employee-token\",\"refresh_token\":\"r-1\"}");
		})
		.await;
	let dir = credentials_dir();
	let request = TokenRequest::builder()
		.authorization_code(
			"auth-code-123",
			Url::parse("https://app.example.com/callback").expect("Redirect URI should parse."),
		)
		.realm(Realm::Employees)
		.access_token_endpoint(token_endpoint(&server))
		.credentials_dir(dir.path())
		.build()
		.expect("Authorization code request should build successfully.");
	let response = build_reqwest_test_acquirer()
		.acquire(&request)
		.await
		.expect("Authorization code grant should succeed.");

	assert_eq!(response.access_token(), Some("employee-token"));
	assert_eq!(response.refresh_token(), Some("r-1"));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn missing_credentials_fail_before_any_request() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let dir = TempDir::new().expect("Temporary credentials directory should be created.");
	let err = build_reqwest_test_acquirer()
		.acquire(&password_request(&server, &dir))
		.await
		.expect_err("Missing credential files should fail.");

	assert!(matches!(err, Error::Credentials(CredentialError::Read { .. })));

	mock.assert_calls_async(0).await;
}

#[test]
fn unsupported_grant_name_is_rejected_locally() {
	let err = "client_credentials".parse::<GrantType>().expect_err("Grant is not supported.");

	assert!(matches!(err, ConfigError::UnsupportedGrant { .. }));
	assert!("/partners".parse::<Realm>().is_err());
}

#[tokio::test]
async fn unreachable_endpoint_surfaces_transport_error() {
	let dir = credentials_dir();
	let request = TokenRequest::builder()
		.password(["uid"])
		.realm(Realm::Services)
		.access_token_endpoint(
			Url::parse("http://127.0.0.1:9/token").expect("Unreachable endpoint should parse."),
		)
		.credentials_dir(dir.path())
		.build()
		.expect("Token request should build successfully.");
	let err = build_reqwest_test_acquirer()
		.acquire(&request)
		.await
		.expect_err("Connection to a closed port should fail.");

	assert!(matches!(err, Error::Transport(_)));
	assert_eq!(err.status(), None);
}

#[tokio::test]
async fn malformed_success_body_is_a_response_error() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).header("content-type", "application/json").body("not json");
		})
		.await;
	let dir = credentials_dir();
	let err = build_reqwest_test_acquirer()
		.acquire(&password_request(&server, &dir))
		.await
		.expect_err("Non-JSON success body should fail.");

	assert!(matches!(err, Error::Response(_)));
	assert_eq!(err.status(), Some(200));
}
