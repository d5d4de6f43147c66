//! Shared helpers for flow implementations (form bodies, query composition, scope joining).

// crates.io
use url::form_urlencoded::Serializer;
// self
use crate::{_prelude::*, auth::UserCredentials, flows::Grant};

/// Appends `pairs` to the query of `endpoint`, keeping any query it already carries.
pub(crate) fn with_query<'a, I>(endpoint: &Url, pairs: I) -> Url
where
	I: IntoIterator<Item = (&'a str, &'a str)>,
{
	let mut url = endpoint.clone();

	url.query_pairs_mut().extend_pairs(pairs);

	url
}

/// Reads a non-negative `expires_in` number of seconds from a JSON body.
pub(crate) fn expires_in(body: &Map<String, Value>) -> Option<Duration> {
	body.get("expires_in").and_then(Value::as_i64).filter(|secs| *secs >= 0).map(Duration::seconds)
}

/// Joins scopes with a single space, preserving caller order.
pub(crate) fn format_scope(scopes: &[String]) -> String {
	scopes.join(" ")
}

/// Form-urlencoded body for the grant.
///
/// The password grant needs the application credentials; the authorization code grant
/// ignores them.
pub(crate) fn grant_form(grant: &Grant, user: &UserCredentials) -> String {
	let mut form = Serializer::new(String::new());

	form.append_pair("grant_type", grant.grant_type().as_str());

	match grant {
		Grant::Password { scopes } => {
			form.append_pair("username", &user.username);
			form.append_pair("password", user.password.expose());
			form.append_pair("scope", &format_scope(scopes));
		},
		Grant::AuthorizationCode { code, redirect_uri } => {
			form.append_pair("code", code);
			form.append_pair("redirect_uri", redirect_uri.as_str());
		},
	}

	form.finish()
}
