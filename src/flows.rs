//! Token acquisition flows.
//!
//! [`TokenAcquirer`] performs one token exchange per call: it re-reads the credential
//! documents, builds the grant-specific form body, authenticates the client with HTTP Basic,
//! and returns the raw token response. [`AuthorizationRedirect`] builds the URL that starts
//! an authorization code grant.

pub mod authorize;
pub(crate) mod common;
pub mod grant;
pub mod request;
pub mod response;

mod acquire;

pub use authorize::*;
pub use grant::*;
pub use request::*;
pub use response::*;

#[cfg(feature = "reqwest")] pub use acquire::acquire_token;

// self
use crate::{_prelude::*, transport::AuthHttpClient};
#[cfg(feature = "reqwest")] use crate::transport::ReqwestHttpClient;

/// Performs token exchanges through a shared HTTP transport.
///
/// The acquirer holds no token or credential state; clones share the transport.
pub struct TokenAcquirer<C>
where
	C: ?Sized + AuthHttpClient,
{
	/// HTTP client wrapper used for every outbound token request.
	pub http_client: Arc<C>,
}
impl<C> TokenAcquirer<C>
where
	C: ?Sized + AuthHttpClient,
{
	/// Creates an acquirer that reuses the caller-provided transport.
	pub fn with_http_client(http_client: impl Into<Arc<C>>) -> Self {
		Self { http_client: http_client.into() }
	}
}
#[cfg(feature = "reqwest")]
impl TokenAcquirer<ReqwestHttpClient> {
	/// Creates an acquirer backed by a default reqwest client.
	pub fn new() -> Self {
		Self::with_http_client(ReqwestHttpClient::default())
	}
}
#[cfg(feature = "reqwest")]
impl Default for TokenAcquirer<ReqwestHttpClient> {
	fn default() -> Self {
		Self::new()
	}
}
impl<C> Clone for TokenAcquirer<C>
where
	C: ?Sized + AuthHttpClient,
{
	fn clone(&self) -> Self {
		Self { http_client: self.http_client.clone() }
	}
}
impl<C> Debug for TokenAcquirer<C>
where
	C: ?Sized + AuthHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenAcquirer").finish_non_exhaustive()
	}
}
