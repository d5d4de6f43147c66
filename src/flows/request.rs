//! Validated token request and its builder.

// std
use std::path::Path;
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	flows::{Grant, Realm},
};

/// Everything one token acquisition needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenRequest {
	grant: Grant,
	realm: Realm,
	access_token_endpoint: Url,
	credentials_dir: PathBuf,
}
impl TokenRequest {
	/// Creates a new builder.
	pub fn builder() -> TokenRequestBuilder {
		TokenRequestBuilder::default()
	}

	/// Grant-specific parameters.
	pub fn grant(&self) -> &Grant {
		&self.grant
	}

	/// Realm sent with the exchange.
	pub fn realm(&self) -> Realm {
		self.realm
	}

	/// Token endpoint.
	pub fn access_token_endpoint(&self) -> &Url {
		&self.access_token_endpoint
	}

	/// Directory holding `user.json` and `client.json`.
	pub fn credentials_dir(&self) -> &Path {
		&self.credentials_dir
	}
}

/// Builder for [`TokenRequest`]; `build` reports the first missing or invalid option.
#[derive(Clone, Debug, Default)]
pub struct TokenRequestBuilder {
	grant: Option<Grant>,
	realm: Option<Realm>,
	access_token_endpoint: Option<Url>,
	credentials_dir: Option<PathBuf>,
}
impl TokenRequestBuilder {
	/// Sets the grant.
	pub fn grant(mut self, grant: Grant) -> Self {
		self.grant = Some(grant);

		self
	}

	/// Shorthand for a password grant requesting `scopes`.
	pub fn password<I, S>(self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.grant(Grant::password(scopes))
	}

	/// Shorthand for an authorization code grant.
	pub fn authorization_code(self, code: impl Into<String>, redirect_uri: Url) -> Self {
		self.grant(Grant::authorization_code(code, redirect_uri))
	}

	/// Sets the realm.
	pub fn realm(mut self, realm: Realm) -> Self {
		self.realm = Some(realm);

		self
	}

	/// Sets the token endpoint.
	pub fn access_token_endpoint(mut self, url: Url) -> Self {
		self.access_token_endpoint = Some(url);

		self
	}

	/// Sets the credentials directory.
	pub fn credentials_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.credentials_dir = Some(dir.into());

		self
	}

	/// Validates and builds the request.
	pub fn build(self) -> Result<TokenRequest, ConfigError> {
		let grant = self.grant.ok_or(ConfigError::missing("grant"))?;
		let realm = self.realm.ok_or(ConfigError::missing("realm"))?;
		let access_token_endpoint =
			self.access_token_endpoint.ok_or(ConfigError::missing("access_token_endpoint"))?;
		let credentials_dir =
			self.credentials_dir.ok_or(ConfigError::missing("credentials_dir"))?;

		grant.validate()?;

		Ok(TokenRequest { grant, realm, access_token_endpoint, credentials_dir })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn endpoint() -> Url {
		Url::parse("https://auth.example.com/oauth2/access_token")
			.expect("Token endpoint fixture should parse.")
	}

	#[test]
	fn builds_complete_password_request() {
		let request = TokenRequest::builder()
			.password(["uid", "cn"])
			.realm(Realm::Services)
			.access_token_endpoint(endpoint())
			.credentials_dir("/etc/credentials")
			.build()
			.expect("Complete request should build.");

		assert_eq!(request.grant(), &Grant::password(["uid", "cn"]));
		assert_eq!(request.realm(), Realm::Services);
		assert_eq!(request.credentials_dir(), Path::new("/etc/credentials"));
	}

	#[test]
	fn missing_options_are_reported_by_name() {
		let err = TokenRequest::builder()
			.password(["uid"])
			.access_token_endpoint(endpoint())
			.credentials_dir("/etc/credentials")
			.build()
			.expect_err("Realm is mandatory.");

		assert!(matches!(err, ConfigError::MissingOption { option: "realm" }));

		let err = TokenRequest::builder()
			.realm(Realm::Employees)
			.access_token_endpoint(endpoint())
			.credentials_dir("/etc/credentials")
			.build()
			.expect_err("Grant is mandatory.");

		assert!(matches!(err, ConfigError::MissingOption { option: "grant" }));

		let err = TokenRequest::builder()
			.password(["uid"])
			.realm(Realm::Employees)
			.credentials_dir("/etc/credentials")
			.build()
			.expect_err("Endpoint is mandatory.");

		assert!(matches!(err, ConfigError::MissingOption { option: "access_token_endpoint" }));
	}

	#[test]
	fn invalid_grant_fields_fail_the_build() {
		let redirect =
			Url::parse("https://app.example.com/callback").expect("Redirect URI should parse.");
		let err = TokenRequest::builder()
			.authorization_code("", redirect)
			.realm(Realm::Employees)
			.access_token_endpoint(endpoint())
			.credentials_dir("/etc/credentials")
			.build()
			.expect_err("Empty codes are rejected.");

		assert!(matches!(err, ConfigError::EmptyAuthorizationCode));
	}
}
