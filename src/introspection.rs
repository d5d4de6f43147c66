//! Tokeninfo (introspection) client and result model.

// crates.io
use http::{Method, Request, header::ACCEPT};
// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, ScopeValidationError},
	error::ConfigError,
	flows::common,
	obs::{self, FlowKind},
	transport::{self, AuthHttpClient},
};
#[cfg(feature = "reqwest")] use crate::transport::ReqwestHttpClient;

/// Tokeninfo answer: the raw JSON object plus the granted scopes parsed from its `scope`
/// field.
///
/// `scope` may be a JSON array of strings or a space-delimited string; when absent the token
/// grants no scopes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct TokenInfo {
	scopes: ScopeSet,
	body: Map<String, Value>,
}
impl TokenInfo {
	/// Granted scopes.
	pub fn scopes(&self) -> &ScopeSet {
		&self.scopes
	}

	/// `uid` field (the token owner), when present.
	pub fn uid(&self) -> Option<&str> {
		self.body.get("uid").and_then(Value::as_str)
	}

	/// `realm` field, when present.
	pub fn realm(&self) -> Option<&str> {
		self.body.get("realm").and_then(Value::as_str)
	}

	/// Remaining lifetime reported by the endpoint.
	pub fn expires_in(&self) -> Option<Duration> {
		common::expires_in(&self.body)
	}

	/// Any field of the body.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.body.get(key)
	}

	/// Borrowed body.
	pub fn as_map(&self) -> &Map<String, Value> {
		&self.body
	}
}
impl TryFrom<Map<String, Value>> for TokenInfo {
	type Error = TokenInfoScopeError;

	fn try_from(body: Map<String, Value>) -> Result<Self, Self::Error> {
		let scopes = match body.get("scope") {
			None | Some(Value::Null) => ScopeSet::default(),
			Some(Value::String(raw)) => ScopeSet::new(raw.split_whitespace())?,
			Some(Value::Array(values)) => ScopeSet::new(
				values
					.iter()
					.map(|value| value.as_str().ok_or(TokenInfoScopeError::NotAString))
					.collect::<Result<Vec<_>, _>>()?,
			)?,
			Some(_) => return Err(TokenInfoScopeError::NotAString),
		};

		Ok(Self { scopes, body })
	}
}
impl From<TokenInfo> for Map<String, Value> {
	fn from(info: TokenInfo) -> Self {
		info.body
	}
}

/// Reasons a tokeninfo `scope` field cannot be read.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum TokenInfoScopeError {
	/// `scope` is neither a string nor an array of strings.
	#[error("The scope field must be a string or an array of strings.")]
	NotAString,
	/// A scope entry failed validation.
	#[error(transparent)]
	Invalid(#[from] ScopeValidationError),
}

/// Calls a tokeninfo endpoint for inbound bearer tokens.
pub struct TokenInfoClient<C>
where
	C: ?Sized + AuthHttpClient,
{
	endpoint: Url,
	http_client: Arc<C>,
}
impl<C> TokenInfoClient<C>
where
	C: ?Sized + AuthHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(endpoint: Url, http_client: impl Into<Arc<C>>) -> Self {
		Self { endpoint, http_client: http_client.into() }
	}

	/// Tokeninfo endpoint.
	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}

	/// Issues exactly one `GET {endpoint}?access_token={token}`.
	///
	/// Resolves with the parsed body of a `200 OK` answer; any other status fails with
	/// [`Error::Upstream`], and a missing response with [`Error::Transport`].
	pub async fn token_info(&self, access_token: &str) -> Result<TokenInfo> {
		obs::observe(FlowKind::TokenInfo, "token_info", async move {
			let url = common::with_query(&self.endpoint, [("access_token", access_token)]);
			let http_request = Request::builder()
				.method(Method::GET)
				.uri(url.as_str())
				.header(ACCEPT, "application/json")
				.body(Vec::new())
				.map_err(ConfigError::from)?;
			let endpoint = transport::endpoint_label(&self.endpoint);

			transport::dispatch(self.http_client.as_ref(), &endpoint, http_request).await
		})
		.await
	}
}
#[cfg(feature = "reqwest")]
impl TokenInfoClient<ReqwestHttpClient> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(endpoint: Url) -> Self {
		Self::with_http_client(endpoint, ReqwestHttpClient::default())
	}
}
impl<C> Clone for TokenInfoClient<C>
where
	C: ?Sized + AuthHttpClient,
{
	fn clone(&self) -> Self {
		Self { endpoint: self.endpoint.clone(), http_client: self.http_client.clone() }
	}
}
impl<C> Debug for TokenInfoClient<C>
where
	C: ?Sized + AuthHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenInfoClient").field("endpoint", &self.endpoint).finish()
	}
}

/// Looks up `access_token` at `token_info_url` with a default reqwest transport.
#[cfg(feature = "reqwest")]
pub async fn get_token_info(token_info_url: &Url, access_token: &str) -> Result<TokenInfo> {
	TokenInfoClient::new(token_info_url.clone()).token_info(access_token).await
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn scope_array_is_normalized() {
		let info: TokenInfo = serde_json::from_str(
			r#"{"uid":"svc-orders","realm":"/services","scope":["write","read","uid"],"expires_in":120}"#,
		)
		.expect("Tokeninfo with an array scope should parse.");

		assert_eq!(info.scopes().iter().collect::<Vec<_>>(), vec!["read", "uid", "write"]);
		assert_eq!(info.uid(), Some("svc-orders"));
		assert_eq!(info.realm(), Some("/services"));
		assert_eq!(info.expires_in(), Some(Duration::seconds(120)));
	}

	#[test]
	fn scope_string_is_split_on_whitespace() {
		let info: TokenInfo = serde_json::from_str(r#"{"active":true,"scope":"read  write"}"#)
			.expect("Tokeninfo with a string scope should parse.");

		assert!(info.scopes().contains("read"));
		assert!(info.scopes().contains("write"));
		assert_eq!(info.get("active"), Some(&Value::Bool(true)));
	}

	#[test]
	fn missing_scope_grants_nothing() {
		let info: TokenInfo =
			serde_json::from_str(r#"{"uid":"x"}"#).expect("Tokeninfo without scope should parse.");

		assert!(info.scopes().is_empty());
	}

	#[test]
	fn malformed_scope_is_rejected() {
		assert!(serde_json::from_str::<TokenInfo>(r#"{"scope":[1,2]}"#).is_err());
		assert!(serde_json::from_str::<TokenInfo>(r#"{"scope":{"a":1}}"#).is_err());
		assert!(serde_json::from_str::<TokenInfo>(r#"{"scope":["has space"]}"#).is_err());
	}

	#[test]
	fn serializes_back_to_the_raw_body() {
		let raw = r#"{"scope":["read"],"uid":"x"}"#;
		let info: TokenInfo = serde_json::from_str(raw).expect("Tokeninfo should parse.");
		let value = serde_json::to_value(&info).expect("Tokeninfo should serialize.");

		assert_eq!(value, serde_json::json!({ "scope": ["read"], "uid": "x" }));
	}
}
