//! Token exchange against the access token endpoint.

// crates.io
use http::{
	Method, Request,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	auth::Credentials,
	error::ConfigError,
	flows::{TokenAcquirer, TokenRequest, TokenResponse, common},
	obs::{self, FlowKind},
	transport::{self, AuthHttpClient},
};
#[cfg(feature = "reqwest")] use crate::transport::ReqwestHttpClient;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

impl<C> TokenAcquirer<C>
where
	C: ?Sized + AuthHttpClient,
{
	/// Exchanges the configured grant for a token.
	///
	/// Loads `user.json` and `client.json` concurrently, then issues exactly one
	/// `POST {endpoint}?realm={realm}` with HTTP Basic client authentication. Resolves with
	/// the JSON body of a `200 OK` answer; any other status fails with
	/// [`Error::Upstream`], and a missing response with [`Error::Transport`]. Nothing is
	/// retried or cached.
	pub async fn acquire(&self, request: &TokenRequest) -> Result<TokenResponse> {
		let kind = FlowKind::from(request.grant().grant_type());

		obs::observe(kind, "acquire", async move {
			let credentials = Credentials::load(request.credentials_dir()).await?;
			let body = common::grant_form(request.grant(), &credentials.user);
			let url = common::with_query(
				request.access_token_endpoint(),
				[("realm", request.realm().as_str())],
			);
			let http_request = Request::builder()
				.method(Method::POST)
				.uri(url.as_str())
				.header(AUTHORIZATION, credentials.client.basic_authorization())
				.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
				.header(ACCEPT, JSON_CONTENT_TYPE)
				.body(body.into_bytes())
				.map_err(ConfigError::from)?;
			let endpoint = transport::endpoint_label(request.access_token_endpoint());

			transport::dispatch(self.http_client.as_ref(), &endpoint, http_request).await
		})
		.await
	}
}

/// Acquires a token with a default reqwest transport.
#[cfg(feature = "reqwest")]
pub async fn acquire_token(request: &TokenRequest) -> Result<TokenResponse> {
	TokenAcquirer::<ReqwestHttpClient>::new().acquire(request).await
}
