//! Authorization redirect that starts the authorization code grant.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	flows::{Realm, common},
};

const STATE_LEN: usize = 32;

/// Authorization endpoint URL plus the `state` value the callback must echo back.
///
/// Send the end-user to [`url`](Self::url); when the provider redirects back, call
/// [`validate_state`](Self::validate_state) before redeeming the `code` with
/// [`Grant::authorization_code`](crate::flows::Grant::authorization_code).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRedirect {
	/// Fully-formed authorization URL.
	pub url: Url,
	/// Opaque state value that must round-trip via the redirect handler.
	pub state: String,
	/// Redirect URI embedded in the URL; the code exchange must send the same value.
	pub redirect_uri: Url,
}
impl AuthorizationRedirect {
	/// Builds `{endpoint}?response_type=code&client_id=..&redirect_uri=..&realm=..&state=..`.
	pub fn new(
		authorization_endpoint: &Url,
		client_id: &str,
		redirect_uri: Url,
		realm: Realm,
	) -> Self {
		let state = random_state();
		let url = common::with_query(
			authorization_endpoint,
			[
				("response_type", "code"),
				("client_id", client_id),
				("redirect_uri", redirect_uri.as_str()),
				("realm", realm.as_str()),
				("state", state.as_str()),
			],
		);

		Self { url, state, redirect_uri }
	}

	/// Validates the returned `state` parameter after the authorization redirect.
	pub fn validate_state(&self, returned_state: &str) -> Result<(), ConfigError> {
		if returned_state == self.state { Ok(()) } else { Err(ConfigError::StateMismatch) }
	}
}

fn random_state() -> String {
	rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn redirect_carries_all_parameters() {
		let endpoint = Url::parse("https://auth.example.com/oauth2/authorize")
			.expect("Authorization endpoint fixture should parse.");
		let redirect_uri =
			Url::parse("https://app.example.com/callback").expect("Redirect URI should parse.");
		let redirect =
			AuthorizationRedirect::new(&endpoint, "client-42", redirect_uri, Realm::Employees);
		let pairs = redirect.url.query_pairs().into_owned().collect::<Vec<_>>();

		assert_eq!(redirect.state.len(), STATE_LEN);
		assert!(redirect.state.chars().all(|c| c.is_ascii_alphanumeric()));
		assert_eq!(
			pairs,
			vec![
				("response_type".into(), "code".into()),
				("client_id".into(), "client-42".into()),
				("redirect_uri".into(), "https://app.example.com/callback".into()),
				("realm".into(), "/employees".into()),
				("state".into(), redirect.state.clone()),
			]
		);
	}

	#[test]
	fn state_validation_detects_mismatch() {
		let endpoint =
			Url::parse("https://auth.example.com/authorize").expect("Endpoint should parse.");
		let redirect_uri =
			Url::parse("https://app.example.com/callback").expect("Redirect URI should parse.");
		let first = AuthorizationRedirect::new(&endpoint, "c", redirect_uri.clone(), Realm::Services);
		let second = AuthorizationRedirect::new(&endpoint, "c", redirect_uri, Realm::Services);

		assert!(first.validate_state(&first.state).is_ok());
		assert!(matches!(first.validate_state(&second.state), Err(ConfigError::StateMismatch)));
	}
}
