//! Scope enforcement layer.

// std
use std::{
	future,
	task::{Context, Poll},
};
// crates.io
use http::{Request, Response};
use tower::{Layer, Service};
// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, ScopeValidationError},
	middleware::{self, AuthContext, BoxFuture},
};

/// Tower layer that answers `403 Forbidden` unless the request's [`AuthContext`] grants
/// every required scope.
///
/// Must run inside [`TokenInfoLayer`](crate::middleware::TokenInfoLayer); requests without a
/// context are treated as granting no scopes.
#[derive(Clone, Debug)]
pub struct RequireScopesLayer {
	required: ScopeSet,
}
impl RequireScopesLayer {
	/// Requires every scope of `required`.
	pub fn new(required: ScopeSet) -> Self {
		Self { required }
	}

	/// Validates `scopes` and requires all of them.
	pub fn try_new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Ok(Self::new(ScopeSet::new(scopes)?))
	}

	/// Required scopes.
	pub fn required(&self) -> &ScopeSet {
		&self.required
	}
}
impl<S> Layer<S> for RequireScopesLayer {
	type Service = RequireScopesService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		RequireScopesService { inner, required: self.required.clone() }
	}
}

/// Tower service created by [`RequireScopesLayer`].
#[derive(Clone, Debug)]
pub struct RequireScopesService<S> {
	inner: S,
	required: ScopeSet,
}
impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequireScopesService<S>
where
	S: Service<Request<ReqBody>, Response = Response<ResBody>>,
	S::Error: 'static + Send,
	S::Future: 'static + Send,
	ResBody: 'static + Send + Default,
{
	type Error = S::Error;
	type Future = BoxFuture<Result<Self::Response, Self::Error>>;
	type Response = Response<ResBody>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
		if let Err(rejection) =
			middleware::check_scopes(AuthContext::from_request(&request), &self.required)
		{
			let response = rejection.into_response(request.uri().path());

			return Box::pin(future::ready(Ok::<_, S::Error>(response)));
		}

		Box::pin(self.inner.call(request))
	}
}
