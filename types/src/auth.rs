use jiff::Timestamp;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::secret_string;
use crate::user::UserId;
use crate::validation::{FieldErrors, ValidationErrors};

pub const LOGIN_PATH: &str = "auth/login";
pub const REFRESH_PATH: &str = "auth/refresh-token";
pub const PROFILE_PATH: &str = "auth/profile";

pub const MIN_PASSWORD_LEN: usize = 6;

/// The access/refresh pair issued by the identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    #[serde(with = "secret_string")]
    access_token: SecretString,
    #[serde(with = "secret_string")]
    refresh_token: SecretString,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into().into(),
            refresh_token: refresh_token.into().into(),
        }
    }

    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    pub fn refresh_token(&self) -> &str {
        self.refresh_token.expose_secret()
    }

    /// Whether `other` carries the same access token.
    pub fn same_access(&self, other: &TokenPair) -> bool {
        self.access_token() == other.access_token()
    }
}

/// Body returned by both the login and refresh endpoints.
#[derive(Deserialize)]
pub struct TokenResponse {
    #[serde(with = "secret_string")]
    access_token: SecretString,
    #[serde(with = "secret_string")]
    refresh_token: SecretString,
}

impl From<TokenResponse> for TokenPair {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
        }
    }
}

#[derive(Serialize)]
pub struct RefreshRequest<'a> {
    #[serde(rename = "refreshToken")]
    pub refresh_token: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    #[serde(with = "secret_string")]
    pub password: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into().into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = FieldErrors::default();
        errors.email("email", &self.email);
        errors.password("password", self.password.expose_secret());
        errors.finish()
    }
}

/// The signed-in account, as returned by `GET /auth/profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: String,
    pub avatar: String,
    pub creation_at: Timestamp,
    pub updated_at: Timestamp,
}
