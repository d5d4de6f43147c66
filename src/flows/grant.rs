//! Grant types, realms, and the grant payload sent to the token endpoint.

// self
use crate::{_prelude::*, error::ConfigError};

/// OAuth 2.0 grant types supported by the token acquirer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrantType {
	/// Resource Owner Password Credentials grant.
	#[serde(rename = "password")]
	PasswordCredentials,
	/// Authorization Code grant.
	#[serde(rename = "authorization_code")]
	AuthorizationCode,
}
impl GrantType {
	/// Returns the RFC 6749 identifier for the grant type.
	pub const fn as_str(self) -> &'static str {
		match self {
			GrantType::PasswordCredentials => "password",
			GrantType::AuthorizationCode => "authorization_code",
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for GrantType {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"password" => Ok(Self::PasswordCredentials),
			"authorization_code" => Ok(Self::AuthorizationCode),
			other => Err(ConfigError::UnsupportedGrant { grant: other.to_owned() }),
		}
	}
}

/// Authorization boundary passed to the token and authorization endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Realm {
	/// Human employees.
	#[serde(rename = "/employees")]
	Employees,
	/// Service (machine) identities.
	#[serde(rename = "/services")]
	Services,
}
impl Realm {
	/// Wire value sent in the `realm` query parameter.
	pub const fn as_str(self) -> &'static str {
		match self {
			Realm::Employees => "/employees",
			Realm::Services => "/services",
		}
	}
}
impl Display for Realm {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Realm {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"/employees" => Ok(Self::Employees),
			"/services" => Ok(Self::Services),
			other => Err(ConfigError::UnsupportedRealm { realm: other.to_owned() }),
		}
	}
}

/// Grant-specific parameters; each variant carries only the fields its grant needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "grant_type")]
pub enum Grant {
	/// Password grant requesting `scopes` (sent space-joined in caller order).
	#[serde(rename = "password")]
	Password {
		/// Requested scopes.
		scopes: Vec<String>,
	},
	/// Authorization code grant redeeming `code` for the `redirect_uri` it was issued to.
	#[serde(rename = "authorization_code")]
	AuthorizationCode {
		/// Code returned to the redirect URI.
		code: String,
		/// Redirect URI used in the authorization request.
		redirect_uri: Url,
	},
}
impl Grant {
	/// Password grant for the provided scopes.
	pub fn password<I, S>(scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::Password { scopes: scopes.into_iter().map(Into::into).collect() }
	}

	/// Authorization code grant.
	pub fn authorization_code(code: impl Into<String>, redirect_uri: Url) -> Self {
		Self::AuthorizationCode { code: code.into(), redirect_uri }
	}

	/// Grant type of this variant.
	pub const fn grant_type(&self) -> GrantType {
		match self {
			Grant::Password { .. } => GrantType::PasswordCredentials,
			Grant::AuthorizationCode { .. } => GrantType::AuthorizationCode,
		}
	}

	/// Checks the grant fields the type system cannot.
	pub fn validate(&self) -> Result<(), ConfigError> {
		match self {
			Grant::Password { scopes } => {
				for scope in scopes {
					crate::auth::validate_scope(scope)?;
				}

				Ok(())
			},
			Grant::AuthorizationCode { code, .. } if code.is_empty() =>
				Err(ConfigError::EmptyAuthorizationCode),
			Grant::AuthorizationCode { .. } => Ok(()),
		}
	}
}
