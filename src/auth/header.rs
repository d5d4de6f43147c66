//! `Authorization` header helpers.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use http::{HeaderMap, header::AUTHORIZATION};

const BEARER: &str = "Bearer";

/// Builds an HTTP Basic `Authorization` value for the provided client identity.
pub fn basic_authorization(client_id: &str, client_secret: &str) -> String {
	format!("Basic {}", STANDARD.encode(format!("{client_id}:{client_secret}")))
}

/// Extracts the token from a `Bearer <token>` header value.
///
/// The scheme is matched case-insensitively and must be followed by at least one space.
/// Returns `None` for other schemes, empty tokens, and tokens containing whitespace.
pub fn bearer_token(value: &str) -> Option<&str> {
	let (scheme, rest) = value.split_at_checked(BEARER.len())?;

	if !scheme.eq_ignore_ascii_case(BEARER) || !rest.starts_with(' ') {
		return None;
	}

	let token = rest.trim_matches(' ');

	if token.is_empty() || token.chars().any(char::is_whitespace) {
		return None;
	}

	Some(token)
}

/// Reads the bearer token from the `Authorization` header of `headers`.
pub fn bearer_token_from_headers(headers: &HeaderMap) -> Option<&str> {
	headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()).and_then(bearer_token)
}

#[cfg(test)]
mod tests {
	// crates.io
	use http::HeaderValue;
	// self
	use super::*;

	#[test]
	fn basic_authorization_encodes_pair() {
		assert_eq!(basic_authorization("client", "secret"), "Basic Y2xpZW50OnNlY3JldA==");
	}

	#[test]
	fn bearer_token_parses_valid_values() {
		assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
		assert_eq!(bearer_token("bearer   abc"), Some("abc"));
	}

	#[test]
	fn bearer_token_rejects_malformed_values() {
		assert_eq!(bearer_token("Basic abc"), None);
		assert_eq!(bearer_token("Bearer"), None);
		assert_eq!(bearer_token("Bearer "), None);
		assert_eq!(bearer_token("Bearerabc"), None);
		assert_eq!(bearer_token("Bearer a b"), None);
		assert_eq!(bearer_token("Bé"), None);
	}

	#[test]
	fn bearer_token_reads_header_map() {
		let mut headers = HeaderMap::new();

		assert_eq!(bearer_token_from_headers(&headers), None);

		headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer token-123"));

		assert_eq!(bearer_token_from_headers(&headers), Some("token-123"));
	}
}
