use std::fmt;

use jiff::Timestamp;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::secret_string;
use crate::validation::{FieldErrors, ValidationErrors};

pub const USERS_PATH: &str = "users";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(UserId)
    }
}

impl UserId {
    pub fn path(&self) -> String {
        format!("{USERS_PATH}/{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub avatar: String,
    pub creation_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Newest accounts first, ties broken by id so the order is stable.
pub fn sort_newest_first(users: &mut [User]) {
    users.sort_by(|a, b| {
        b.creation_at
            .cmp(&a.creation_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    #[serde(with = "secret_string")]
    pub password: SecretString,
    pub avatar: Url,
}

impl CreateUser {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = FieldErrors::default();
        errors.required("name", &self.name);
        errors.email("email", &self.email);
        errors.password("password", self.password.expose_secret());
        errors.web_url("avatar", &self.avatar);
        errors.finish()
    }
}

/// A partial update; absent fields are left untouched by the API.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "secret_string::option::serialize"
    )]
    pub password: Option<SecretString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Url>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none() && self.avatar.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = FieldErrors::default();
        if self.is_empty() {
            errors.push("update", "at least one field must be provided");
        }
        if let Some(name) = &self.name {
            errors.required("name", name);
        }
        if let Some(email) = &self.email {
            errors.email("email", email);
        }
        if let Some(password) = &self.password {
            errors.password("password", password.expose_secret());
        }
        if let Some(avatar) = &self.avatar {
            errors.web_url("avatar", avatar);
        }
        errors.finish()
    }
}
