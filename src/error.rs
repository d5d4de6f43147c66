//! Crate-level error types shared across flows, introspection, and middleware.

// std
use std::path::Path;
// crates.io
use http::StatusCode;
// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Credential documents could not be loaded.
	#[error(transparent)]
	Credentials(#[from] CredentialError),
	/// Upstream endpoint answered with a non-success status.
	#[error(transparent)]
	Upstream(#[from] UpstreamRejection),
	/// Upstream endpoint answered 200 with a body that could not be parsed.
	#[error(transparent)]
	Response(#[from] ResponseError),
	/// Transport failure (DNS, TCP, TLS); no response was received.
	#[error(transparent)]
	Transport(#[from] TransportError),
}
impl Error {
	/// HTTP status returned by the upstream endpoint, when one was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Upstream(rejection) => Some(rejection.status),
			Self::Response(ResponseError::Parse { status, .. }) => Some(*status),
			_ => None,
		}
	}

	/// Status code that inbound middleware answers with when this error fails validation.
	///
	/// Upstream `4xx`/`5xx` statuses are passed through; everything else maps to
	/// `401 Unauthorized`.
	pub fn rejection_status(&self) -> StatusCode {
		match self {
			Self::Upstream(rejection) => StatusCode::from_u16(rejection.status)
				.ok()
				.filter(|status| status.is_client_error() || status.is_server_error())
				.unwrap_or(StatusCode::UNAUTHORIZED),
			_ => StatusCode::UNAUTHORIZED,
		}
	}
}

/// Configuration and validation failures raised before any network call.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required option was not supplied.
	#[error("Required option `{option}` is missing.")]
	MissingOption {
		/// Option name.
		option: &'static str,
	},
	/// Grant type string is not one of the supported grants.
	#[error("Grant type `{grant}` is not supported.")]
	UnsupportedGrant {
		/// Offending grant label.
		grant: String,
	},
	/// Realm string is not one of the known realms.
	#[error("Realm `{realm}` is not supported.")]
	UnsupportedRealm {
		/// Offending realm label.
		realm: String,
	},
	/// Authorization code grant was configured with an empty code.
	#[error("Authorization code cannot be empty.")]
	EmptyAuthorizationCode,
	/// Request scopes cannot be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Public endpoint pattern is malformed.
	#[error("Public endpoint pattern `{pattern}` must be a non-empty path starting with `/`.")]
	InvalidPublicEndpoint {
		/// Offending pattern.
		pattern: String,
	},
	/// Authorization callback returned a different `state` than the one issued.
	#[error("Authorization state mismatch.")]
	StateMismatch,
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] http::Error),
}
impl ConfigError {
	/// Shorthand for [`ConfigError::MissingOption`].
	pub fn missing(option: &'static str) -> Self {
		Self::MissingOption { option }
	}

	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures while reading the on-disk credential documents.
#[derive(Debug, ThisError)]
pub enum CredentialError {
	/// File is missing or unreadable.
	#[error("Failed to read credentials from {}.", .path.display())]
	Read {
		/// Path of the credential document.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// File content is not the expected JSON document.
	#[error("Failed to parse credentials from {}.", .path.display())]
	Parse {
		/// Path of the credential document.
		path: PathBuf,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl CredentialError {
	/// Path of the document that failed to load.
	pub fn path(&self) -> &Path {
		match self {
			Self::Read { path, .. } | Self::Parse { path, .. } => path,
		}
	}
}

/// Non-success answer from the token or tokeninfo endpoint.
#[derive(Debug, ThisError)]
#[error("Endpoint rejected the request with HTTP {status}.")]
pub struct UpstreamRejection {
	/// HTTP status code.
	pub status: u16,
	/// Parsed error body; the raw body as a JSON string when it is not JSON.
	pub data: Value,
}
impl UpstreamRejection {
	/// OAuth `error` field of the body, when present.
	pub fn oauth_error(&self) -> Option<&str> {
		self.data.get("error").and_then(Value::as_str)
	}
}

/// Success responses whose body could not be interpreted.
#[derive(Debug, ThisError)]
pub enum ResponseError {
	/// Body is not the expected JSON document.
	#[error("Endpoint {endpoint} returned malformed JSON.")]
	Parse {
		/// Endpoint that answered, without query.
		endpoint: String,
		/// HTTP status code.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {endpoint}.")]
	Network {
		/// Endpoint that was being called, without query.
		endpoint: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling {endpoint}.")]
	Io {
		/// Endpoint that was being called, without query.
		endpoint: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// HTTP client failed with a message only.
	#[error("HTTP client error occurred while calling {endpoint}: {message}.")]
	Other {
		/// Endpoint that was being called, without query.
		endpoint: String,
		/// Client-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		endpoint: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint: endpoint.into(), source: Box::new(src) }
	}

	/// Endpoint that was being called.
	pub fn endpoint(&self) -> &str {
		match self {
			Self::Network { endpoint, .. }
			| Self::Io { endpoint, .. }
			| Self::Other { endpoint, .. } => endpoint,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn rejection_status_passes_upstream_codes_through() {
		let err = Error::from(UpstreamRejection { status: 403, data: Value::Null });

		assert_eq!(err.status(), Some(403));
		assert_eq!(err.rejection_status(), StatusCode::FORBIDDEN);
	}

	#[test]
	fn rejection_status_defaults_to_unauthorized() {
		let transport = Error::from(TransportError::Other {
			endpoint: "https://example.com/tokeninfo".into(),
			message: "boom".into(),
		});
		let bogus = Error::from(UpstreamRejection { status: 42, data: Value::Null });

		assert_eq!(transport.status(), None);
		assert_eq!(transport.rejection_status(), StatusCode::UNAUTHORIZED);
		assert_eq!(bogus.rejection_status(), StatusCode::UNAUTHORIZED);
	}

	#[test]
	fn rejection_status_never_passes_non_error_codes() {
		for status in [201, 204, 302] {
			let err = Error::from(UpstreamRejection { status, data: Value::Null });

			assert_eq!(err.status(), Some(status));
			assert_eq!(err.rejection_status(), StatusCode::UNAUTHORIZED);
		}

		let err = Error::from(UpstreamRejection { status: 503, data: Value::Null });

		assert_eq!(err.rejection_status(), StatusCode::SERVICE_UNAVAILABLE);
	}

	#[test]
	fn upstream_rejection_exposes_oauth_error() {
		let rejection = UpstreamRejection {
			status: 400,
			data: serde_json::json!({ "error": "invalid_grant" }),
		};

		assert_eq!(rejection.oauth_error(), Some("invalid_grant"));
		assert!(rejection.to_string().contains("400"));
	}
}
