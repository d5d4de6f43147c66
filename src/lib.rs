//! OAuth 2.0 tooling for HTTP services: acquire access tokens from on-disk credentials,
//! validate inbound bearer tokens against a tokeninfo endpoint, and enforce scopes with tower
//! middleware.

#![deny(clippy::all, missing_docs)]

pub mod auth;
pub mod error;
pub mod flows;
pub mod introspection;
pub mod middleware;
pub mod obs;
pub mod transport;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::{fs, path::Path};
	// self
	use crate::{flows::TokenAcquirer, introspection::TokenInfoClient, transport::ReqwestHttpClient};

	/// Client identifier written by [`write_credentials`].
	pub const TEST_CLIENT_ID: &str = "test-client";
	/// Client secret written by [`write_credentials`].
	pub const TEST_CLIENT_SECRET: &str = "test-client-secret";
	/// Application username written by [`write_credentials`].
	pub const TEST_USERNAME: &str = "test-user";
	/// Application password written by [`write_credentials`].
	pub const TEST_PASSWORD: &str = "test-password";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`TokenAcquirer`] backed by the reqwest transport used across integration
	/// tests.
	pub fn build_reqwest_test_acquirer() -> TokenAcquirer<ReqwestHttpClient> {
		TokenAcquirer::with_http_client(test_reqwest_http_client())
	}

	/// Constructs a [`TokenInfoClient`] for the provided tokeninfo endpoint.
	pub fn build_reqwest_test_token_info(endpoint: Url) -> TokenInfoClient<ReqwestHttpClient> {
		TokenInfoClient::with_http_client(endpoint, test_reqwest_http_client())
	}

	/// Writes `user.json` and `client.json` fixtures into `dir` using the test constants.
	pub fn write_credentials(dir: &Path) {
		write_credentials_with(dir, TEST_CLIENT_ID, TEST_CLIENT_SECRET);
	}

	/// Writes credential fixtures with a caller-chosen client identifier and secret.
	pub fn write_credentials_with(dir: &Path, client_id: &str, client_secret: &str) {
		let user = serde_json::json!({
			"application_username": TEST_USERNAME,
			"application_password": TEST_PASSWORD,
		});
		let client = serde_json::json!({
			"client_id": client_id,
			"client_secret": client_secret,
		});

		fs::write(dir.join("user.json"), user.to_string())
			.expect("Failed to write user credentials fixture.");
		fs::write(dir.join("client.json"), client.to_string())
			.expect("Failed to write client credentials fixture.");
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		path::PathBuf,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map, Value};
	pub use thiserror::Error as ThisError;
	pub use time::Duration;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(feature = "reqwest")] pub use {flows::acquire_token, introspection::get_token_info};
