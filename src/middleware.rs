//! Inbound request middleware: bearer validation and scope enforcement.
//!
//! Stack [`TokenInfoLayer`] outside [`RequireScopesLayer`]:
//!
//! 1. [`TokenInfoLayer`] lets public paths through, extracts the bearer token, calls the
//!    tokeninfo endpoint once, and inserts an [`AuthContext`] into the request extensions.
//! 2. [`RequireScopesLayer`] reads that context and answers `403 Forbidden` unless every
//!    required scope was granted.
//!
//! Rejections end the pipeline with an empty body of the inner service's response type and
//! a `WWW-Authenticate` challenge.

pub mod public;
pub mod require_scopes;
pub mod token_info;

pub use public::*;
pub use require_scopes::*;
pub use token_info::*;

// crates.io
use http::{HeaderValue, Request, Response, StatusCode, header::WWW_AUTHENTICATE};
// self
use crate::{_prelude::*, auth::ScopeSet, introspection::TokenInfo};

pub(crate) type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Request-scoped authentication state attached by [`TokenInfoLayer`].
///
/// Lives in the request extensions for one request cycle and is read, never mutated, by
/// later layers and handlers.
#[derive(Clone, Debug)]
pub struct AuthContext {
	token_info: Arc<TokenInfo>,
}
impl AuthContext {
	/// Wraps a tokeninfo answer.
	pub fn new(token_info: TokenInfo) -> Self {
		Self { token_info: Arc::new(token_info) }
	}

	/// Tokeninfo answer for the presented bearer token.
	pub fn token_info(&self) -> &TokenInfo {
		&self.token_info
	}

	/// Granted scopes.
	pub fn scopes(&self) -> &ScopeSet {
		self.token_info.scopes()
	}

	/// Context previously attached to `request`, if any.
	pub fn from_request<B>(request: &Request<B>) -> Option<&Self> {
		request.extensions().get::<Self>()
	}

	/// Checks that every scope of `required` was granted.
	pub fn require(&self, required: &ScopeSet) -> Result<(), Rejection> {
		check_scopes(Some(self), required)
	}
}

/// Checks `required` against the scopes of `context`; an absent context grants nothing.
pub fn check_scopes(context: Option<&AuthContext>, required: &ScopeSet) -> Result<(), Rejection> {
	let granted = context.map(AuthContext::scopes).cloned().unwrap_or_default();
	let missing = required.missing_from(&granted);

	if missing.is_empty() {
		Ok(())
	} else {
		Err(Rejection::InsufficientScope {
			required: required.clone(),
			missing: missing.into_iter().map(str::to_owned).collect(),
		})
	}
}

/// Reasons an inbound request is turned away.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum Rejection {
	/// No `Authorization: Bearer <token>` header, or a malformed one.
	#[error("Missing or malformed bearer token.")]
	MissingToken,
	/// The tokeninfo call failed; `status` is what the client receives.
	#[error("Token validation failed with HTTP {}.", .status.as_u16())]
	InvalidToken {
		/// Response status.
		status: StatusCode,
	},
	/// The token lacks some required scopes.
	#[error("Token lacks the required scopes: {}.", .missing.join(" "))]
	InsufficientScope {
		/// Scopes the route requires.
		required: ScopeSet,
		/// Required scopes that were not granted.
		missing: Vec<String>,
	},
}
impl Rejection {
	/// Response status for this rejection.
	pub fn status(&self) -> StatusCode {
		match self {
			Rejection::MissingToken => StatusCode::UNAUTHORIZED,
			Rejection::InvalidToken { status } => *status,
			Rejection::InsufficientScope { .. } => StatusCode::FORBIDDEN,
		}
	}

	/// `WWW-Authenticate` challenge per RFC 6750.
	pub fn challenge(&self) -> String {
		match self {
			Rejection::MissingToken => "Bearer".into(),
			Rejection::InvalidToken { .. } => "Bearer error=\"invalid_token\"".into(),
			Rejection::InsufficientScope { required, .. } =>
				format!("Bearer error=\"insufficient_scope\", scope=\"{required}\""),
		}
	}

	/// Builds the rejection response with an empty body.
	pub fn into_response<B>(self, path: &str) -> Response<B>
	where
		B: Default,
	{
		let status = self.status();

		crate::obs::log_rejection(path, status.as_u16(), &self);
		crate::obs::record_rejection(status.as_u16());

		let mut response = Response::new(B::default());

		*response.status_mut() = status;

		if let Ok(value) = HeaderValue::from_str(&self.challenge()) {
			response.headers_mut().insert(WWW_AUTHENTICATE, value);
		}

		response
	}
}
