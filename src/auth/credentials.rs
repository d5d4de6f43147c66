//! On-disk credential documents used by the token acquisition flows.
//!
//! A credentials directory holds two JSON documents: `user.json` with the application's
//! `application_username`/`application_password` and `client.json` with the OAuth
//! `client_id`/`client_secret`. Both are read fresh for every acquisition; nothing is cached.

// std
use std::path::Path;
// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, auth::Secret, error::CredentialError};

/// File name of the user credentials document.
pub const USER_CREDENTIALS_FILE: &str = "user.json";
/// File name of the client credentials document.
pub const CLIENT_CREDENTIALS_FILE: &str = "client.json";

/// OAuth client identity used for HTTP Basic authentication at the token endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCredentials {
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: Secret,
}
impl ClientCredentials {
	/// `Authorization` header value (`Basic base64(client_id:client_secret)`).
	pub fn basic_authorization(&self) -> String {
		crate::auth::basic_authorization(&self.client_id, self.client_secret.expose())
	}
}

/// Application (resource owner) credentials used by the password grant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredentials {
	/// Application username.
	#[serde(rename = "application_username")]
	pub username: String,
	/// Application password.
	#[serde(rename = "application_password")]
	pub password: Secret,
}

/// Both credential documents loaded from one directory.
#[derive(Clone, Debug)]
pub struct Credentials {
	/// Contents of `user.json`.
	pub user: UserCredentials,
	/// Contents of `client.json`.
	pub client: ClientCredentials,
}
impl Credentials {
	/// Reads `user.json` and `client.json` from `dir` concurrently.
	///
	/// Fails with the first [`CredentialError`] when either document is missing, unreadable,
	/// or not the expected JSON shape.
	pub async fn load(dir: impl AsRef<Path>) -> Result<Self, CredentialError> {
		let dir = dir.as_ref();
		let (user, client) = tokio::try_join!(
			read_document::<UserCredentials>(dir.join(USER_CREDENTIALS_FILE)),
			read_document::<ClientCredentials>(dir.join(CLIENT_CREDENTIALS_FILE)),
		)?;

		Ok(Self { user, client })
	}
}

async fn read_document<T>(path: PathBuf) -> Result<T, CredentialError>
where
	T: DeserializeOwned,
{
	let bytes = match tokio::fs::read(&path).await {
		Ok(bytes) => bytes,
		Err(source) => return Err(CredentialError::Read { path, source }),
	};
	let mut de = serde_json::Deserializer::from_slice(&bytes);

	serde_path_to_error::deserialize(&mut de).map_err(|source| CredentialError::Parse { path, source })
}
