//! Bearer validation layer backed by the tokeninfo endpoint.

// std
use std::task::{Context, Poll};
// crates.io
use http::{Request, Response};
use tower::{Layer, Service};
// self
use crate::{
	_prelude::*,
	auth,
	error::ConfigError,
	introspection::TokenInfoClient,
	middleware::{AuthContext, BoxFuture, PublicEndpoints, Rejection},
	transport::AuthHttpClient,
};
#[cfg(feature = "reqwest")] use crate::transport::ReqwestHttpClient;

/// Serializable configuration for [`TokenInfoLayer`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
	/// Tokeninfo endpoint; mandatory.
	pub token_info_endpoint: Option<Url>,
	/// Path patterns that skip validation.
	#[serde(default)]
	pub public_endpoints: Vec<String>,
}

/// Request-validation logic shared by every [`TokenInfoService`] clone.
///
/// Usable without tower through [`TokenInfoGate::authorize`].
#[derive(Debug)]
pub struct TokenInfoGate<C>
where
	C: ?Sized + AuthHttpClient,
{
	client: TokenInfoClient<C>,
	public_endpoints: PublicEndpoints,
}
impl<C> TokenInfoGate<C>
where
	C: ?Sized + AuthHttpClient,
{
	/// Tokeninfo client used for validation.
	pub fn client(&self) -> &TokenInfoClient<C> {
		&self.client
	}

	/// Public path patterns.
	pub fn public_endpoints(&self) -> &PublicEndpoints {
		&self.public_endpoints
	}

	/// Decides one inbound request from its path and bearer token.
	///
	/// `bearer` is the token extracted with [`auth::bearer_token_from_headers`]. Returns
	/// `Ok(None)` for public paths, `Ok(Some(context))` for a validated token, and the
	/// [`Rejection`] otherwise. The tokeninfo endpoint is called at most once and never when
	/// the token is missing.
	pub async fn authorize(
		&self,
		path: &str,
		bearer: Option<&str>,
	) -> Result<Option<AuthContext>, Rejection> {
		if self.public_endpoints.matches(path) {
			return Ok(None);
		}

		let token = bearer.ok_or(Rejection::MissingToken)?;

		match self.client.token_info(token).await {
			Ok(info) => Ok(Some(AuthContext::new(info))),
			Err(err) => Err(Rejection::InvalidToken { status: err.rejection_status() }),
		}
	}
}

/// Builder for [`TokenInfoLayer`].
pub struct TokenInfoLayerBuilder<C>
where
	C: ?Sized + AuthHttpClient,
{
	http_client: Arc<C>,
	token_info_endpoint: Option<Url>,
	public_endpoints: Vec<String>,
}
impl<C> TokenInfoLayerBuilder<C>
where
	C: ?Sized + AuthHttpClient,
{
	/// Starts a builder that reuses the caller-provided transport.
	pub fn with_http_client(http_client: impl Into<Arc<C>>) -> Self {
		Self {
			http_client: http_client.into(),
			token_info_endpoint: None,
			public_endpoints: Vec::new(),
		}
	}

	/// Sets the tokeninfo endpoint.
	pub fn token_info_endpoint(mut self, url: Url) -> Self {
		self.token_info_endpoint = Some(url);

		self
	}

	/// Adds one public path pattern.
	pub fn public_endpoint(mut self, pattern: impl Into<String>) -> Self {
		self.public_endpoints.push(pattern.into());

		self
	}

	/// Adds several public path patterns.
	pub fn public_endpoints<I, S>(mut self, patterns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.public_endpoints.extend(patterns.into_iter().map(Into::into));

		self
	}

	/// Applies a [`GateConfig`], keeping any endpoint already set when the config has none.
	pub fn config(mut self, config: GateConfig) -> Self {
		if let Some(url) = config.token_info_endpoint {
			self.token_info_endpoint = Some(url);
		}

		self.public_endpoints(config.public_endpoints)
	}

	/// Validates the options and builds the layer.
	pub fn build(self) -> Result<TokenInfoLayer<C>, ConfigError> {
		let endpoint =
			self.token_info_endpoint.ok_or(ConfigError::missing("token_info_endpoint"))?;
		let public_endpoints = PublicEndpoints::new(&self.public_endpoints)?;
		let client = TokenInfoClient::with_http_client(endpoint, self.http_client);

		Ok(TokenInfoLayer { gate: Arc::new(TokenInfoGate { client, public_endpoints }) })
	}
}

/// Tower layer that validates bearer tokens against a tokeninfo endpoint.
pub struct TokenInfoLayer<C>
where
	C: ?Sized + AuthHttpClient,
{
	gate: Arc<TokenInfoGate<C>>,
}
impl<C> TokenInfoLayer<C>
where
	C: ?Sized + AuthHttpClient,
{
	/// Shared validation logic.
	pub fn gate(&self) -> &TokenInfoGate<C> {
		&self.gate
	}
}
#[cfg(feature = "reqwest")]
impl TokenInfoLayer<ReqwestHttpClient> {
	/// Starts a builder backed by a default reqwest transport.
	pub fn builder() -> TokenInfoLayerBuilder<ReqwestHttpClient> {
		TokenInfoLayerBuilder::with_http_client(ReqwestHttpClient::default())
	}

	/// Builds a layer from configuration with a default reqwest transport.
	pub fn from_config(config: GateConfig) -> Result<Self, ConfigError> {
		Self::builder().config(config).build()
	}
}
impl<C> Clone for TokenInfoLayer<C>
where
	C: ?Sized + AuthHttpClient,
{
	fn clone(&self) -> Self {
		Self { gate: self.gate.clone() }
	}
}
impl<C> Debug for TokenInfoLayer<C>
where
	C: ?Sized + AuthHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenInfoLayer")
			.field("token_info_endpoint", self.gate.client.endpoint())
			.field("public_endpoints", &self.gate.public_endpoints)
			.finish()
	}
}
impl<S, C> Layer<S> for TokenInfoLayer<C>
where
	C: ?Sized + AuthHttpClient,
{
	type Service = TokenInfoService<S, C>;

	fn layer(&self, inner: S) -> Self::Service {
		TokenInfoService { inner, gate: self.gate.clone() }
	}
}

/// Tower service created by [`TokenInfoLayer`].
///
/// For each request:
///
/// 1. public paths go straight to the inner service;
/// 2. a missing or malformed `Authorization: Bearer` header is answered with `401`;
/// 3. the token is looked up once at the tokeninfo endpoint; on success an [`AuthContext`] is
///    inserted into the request extensions, on failure the upstream status (or `401`) is
///    returned.
pub struct TokenInfoService<S, C>
where
	C: ?Sized + AuthHttpClient,
{
	inner: S,
	gate: Arc<TokenInfoGate<C>>,
}
impl<S, C> Clone for TokenInfoService<S, C>
where
	S: Clone,
	C: ?Sized + AuthHttpClient,
{
	fn clone(&self) -> Self {
		Self { inner: self.inner.clone(), gate: self.gate.clone() }
	}
}
impl<S, C, ReqBody, ResBody> Service<Request<ReqBody>> for TokenInfoService<S, C>
where
	S: 'static + Send + Clone + Service<Request<ReqBody>, Response = Response<ResBody>>,
	S::Error: 'static + Send,
	S::Future: Send,
	C: ?Sized + AuthHttpClient,
	ReqBody: 'static + Send,
	ResBody: 'static + Send + Default,
{
	type Error = S::Error;
	type Future = BoxFuture<Result<Self::Response, Self::Error>>;
	type Response = Response<ResBody>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, mut request: Request<ReqBody>) -> Self::Future {
		let clone = self.inner.clone();
		let mut inner = std::mem::replace(&mut self.inner, clone);
		let gate = self.gate.clone();

		Box::pin(async move {
			let path = request.uri().path().to_owned();
			let bearer = auth::bearer_token_from_headers(request.headers()).map(str::to_owned);

			match gate.authorize(&path, bearer.as_deref()).await {
				Ok(Some(context)) => {
					request.extensions_mut().insert(context);

					inner.call(request).await
				},
				Ok(None) => inner.call(request).await,
				Err(rejection) => Ok(rejection.into_response(&path)),
			}
		})
	}
}
