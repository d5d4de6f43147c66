//! Token endpoint response.

// self
use crate::{_prelude::*, flows::common};

/// Raw JSON object returned by the token endpoint.
///
/// No schema is enforced beyond "JSON object"; the accessors read the RFC 6749 fields when
/// the provider sends them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenResponse(Map<String, Value>);
impl TokenResponse {
	/// Wraps an already-parsed response body.
	pub fn new(body: Map<String, Value>) -> Self {
		Self(body)
	}

	/// `access_token` field.
	pub fn access_token(&self) -> Option<&str> {
		self.str_field("access_token")
	}

	/// `token_type` field.
	pub fn token_type(&self) -> Option<&str> {
		self.str_field("token_type")
	}

	/// `refresh_token` field.
	pub fn refresh_token(&self) -> Option<&str> {
		self.str_field("refresh_token")
	}

	/// `scope` field as sent by the provider.
	pub fn scope(&self) -> Option<&str> {
		self.str_field("scope")
	}

	/// `expires_in` field as a duration; non-numeric or negative values are ignored.
	pub fn expires_in(&self) -> Option<Duration> {
		common::expires_in(&self.0)
	}

	/// Any field of the body.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	/// Borrowed body.
	pub fn as_map(&self) -> &Map<String, Value> {
		&self.0
	}

	/// Owned body.
	pub fn into_inner(self) -> Map<String, Value> {
		self.0
	}

	fn str_field(&self, key: &str) -> Option<&str> {
		self.0.get(key).and_then(Value::as_str)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn accessors_read_standard_fields() {
		let response: TokenResponse = serde_json::from_str(
			r#"{"access_token":"abc","token_type":"Bearer","expires_in":3599,"scope":"uid","x_custom":1}"#,
		)
		.expect("Token response should deserialize.");

		assert_eq!(response.access_token(), Some("abc"));
		assert_eq!(response.token_type(), Some("Bearer"));
		assert_eq!(response.expires_in(), Some(Duration::seconds(3599)));
		assert_eq!(response.scope(), Some("uid"));
		assert_eq!(response.refresh_token(), None);
		assert_eq!(response.get("x_custom"), Some(&Value::from(1)));
	}

	#[test]
	fn non_object_bodies_do_not_deserialize() {
		assert!(serde_json::from_str::<TokenResponse>("[1,2]").is_err());
	}
}
