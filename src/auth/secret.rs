//! Credential values that must stay out of logs and error messages.

// self
use crate::_prelude::*;

/// Password or client secret read from a credentials document.
///
/// Deserializes from a plain JSON string. `Debug` and `Display` print `<redacted>`, so
/// [`ClientCredentials`](crate::auth::ClientCredentials) and
/// [`UserCredentials`](crate::auth::UserCredentials) can be logged whole.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);
impl Secret {
	/// Wraps a credential value.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Plain value, for building the Basic header or the password grant form.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("Secret(<redacted>)")
	}
}
impl Display for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::ClientCredentials;

	#[test]
	fn logged_credentials_hide_the_secret() {
		let client: ClientCredentials =
			serde_json::from_str(r#"{"client_id":"orders-client","client_secret":"hunter2"}"#)
				.expect("Client credentials should parse.");
		let logged = format!("{client:?}");

		assert!(logged.contains("orders-client"));
		assert!(logged.contains("Secret(<redacted>)"));
		assert!(!logged.contains("hunter2"));
		assert_eq!(client.client_secret.to_string(), "<redacted>");
		assert_eq!(client.client_secret.expose(), "hunter2");
	}
}
