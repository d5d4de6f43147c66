//! Transport primitives for token and tokeninfo calls.
//!
//! [`AuthHttpClient`] is the crate's only dependency on an HTTP stack. Flows build an
//! [`HttpRequest`], hand it to a short-lived [`AsyncHttpClient`] handle, and classify the
//! answer with one rule shared by every endpoint: `200 OK` yields the parsed JSON body, any
//! other status becomes an [`UpstreamRejection`], and a missing response becomes a
//! [`TransportError`] naming the endpoint.

// crates.io
use http::StatusCode;
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{ResponseError, TransportError, UpstreamRejection},
};

/// Abstraction over HTTP transports capable of executing token and tokeninfo calls.
///
/// Implementations must be `Send + Sync + 'static` so they can be shared behind `Arc`
/// across flows and middleware. The handles they return must own whatever state is
/// required so their request futures remain `Send` for the lifetime of the call.
pub trait AuthHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle used for a single call.
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds a handle for one outbound call.
	fn handle(&self) -> Self::Handle;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token endpoints return results directly, so any custom [`ReqwestClient`] passed to
/// [`ReqwestHttpClient::with_client`] should disable redirect following.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl AuthHttpClient for ReqwestHttpClient {
	type Handle = ReqwestHandle;
	type TransportError = ReqwestError;

	fn handle(&self) -> Self::Handle {
		ReqwestHandle(self.0.clone())
	}
}

/// [`AsyncHttpClient`] handle returned by [`ReqwestHttpClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHandle(ReqwestClient);
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for ReqwestHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = self.0.clone();

		Box::pin(async move {
			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

/// Sends `request` through `client` and classifies the answer.
///
/// `endpoint` labels errors and must not carry query parameters, since those may hold
/// credentials or tokens.
pub(crate) async fn dispatch<C, T>(client: &C, endpoint: &str, request: HttpRequest) -> Result<T>
where
	C: ?Sized + AuthHttpClient,
	T: DeserializeOwned,
{
	let handle = client.handle();
	let response =
		handle.call(request).await.map_err(|err| map_transport_error(endpoint, err))?;

	read_json_body(endpoint, response)
}

/// Applies the status rule to a received response.
pub(crate) fn read_json_body<T>(endpoint: &str, response: HttpResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let status = response.status();
	let body = response.into_body();

	if status != StatusCode::OK {
		let data = serde_json::from_slice(&body)
			.unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));

		return Err(UpstreamRejection { status: status.as_u16(), data }.into());
	}

	let mut de = serde_json::Deserializer::from_slice(&body);

	serde_path_to_error::deserialize(&mut de).map_err(|source| {
		ResponseError::Parse { endpoint: endpoint.to_owned(), status: status.as_u16(), source }
			.into()
	})
}

/// Strips query and fragment so the URL can label errors and spans.
pub(crate) fn endpoint_label(url: &Url) -> String {
	let mut label = url.clone();

	label.set_query(None);
	label.set_fragment(None);

	label.into()
}

fn map_transport_error<E>(endpoint: &str, err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	let endpoint = endpoint.to_owned();

	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(endpoint, *inner).into(),
		HttpClientError::Http(inner) => crate::error::ConfigError::from(inner).into(),
		HttpClientError::Io(source) => TransportError::Io { endpoint, source }.into(),
		HttpClientError::Other(message) => TransportError::Other { endpoint, message }.into(),
		other => TransportError::Other { endpoint, message: format!("{other:?}") }.into(),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn response(status: u16, body: &str) -> HttpResponse {
		let mut response = HttpResponse::new(body.as_bytes().to_vec());

		*response.status_mut() =
			StatusCode::from_u16(status).expect("Fixture status should be valid.");

		response
	}

	#[test]
	fn ok_status_parses_body() {
		let body: Map<String, Value> =
			read_json_body("https://example.com/token", response(200, r#"{"access_token":"t"}"#))
				.expect("200 with JSON should parse.");

		assert_eq!(body.get("access_token"), Some(&Value::from("t")));
	}

	#[test]
	fn other_success_statuses_are_rejections() {
		let err = read_json_body::<Map<String, Value>>(
			"https://example.com/token",
			response(201, r#"{"access_token":"t"}"#),
		)
		.expect_err("Only 200 counts as success.");

		assert_eq!(err.status(), Some(201));
	}

	#[test]
	fn rejection_keeps_json_or_raw_body() {
		let json = read_json_body::<Value>("x", response(401, r#"{"error":"invalid_client"}"#))
			.expect_err("401 must be rejected.");
		let raw = read_json_body::<Value>("x", response(502, "Bad Gateway"))
			.expect_err("502 must be rejected.");

		match (json, raw) {
			(Error::Upstream(json), Error::Upstream(raw)) => {
				assert_eq!(json.oauth_error(), Some("invalid_client"));
				assert_eq!(raw.data, Value::from("Bad Gateway"));
			},
			other => panic!("Unexpected error variants: {other:?}."),
		}
	}

	#[test]
	fn malformed_success_body_is_a_parse_error() {
		let err = read_json_body::<Map<String, Value>>("x", response(200, "not json"))
			.expect_err("Malformed JSON must fail.");

		assert!(matches!(err, Error::Response(ResponseError::Parse { status: 200, .. })));
	}

	#[test]
	fn endpoint_label_drops_query() {
		let url = Url::parse("https://example.com/tokeninfo?access_token=secret#frag")
			.expect("Fixture URL should parse.");

		assert_eq!(endpoint_label(&url), "https://example.com/tokeninfo");
	}
}
