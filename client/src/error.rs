use reqwest::StatusCode;
use thiserror::Error;
use types::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request failed with status {status}")]
    Status { status: StatusCode, body: String },

    /// The session could not be renewed and has been cleared.
    #[error("session refresh failed: {0}")]
    RefreshFailed(#[source] Box<ClientError>),

    #[error("session expired")]
    SessionExpired,

    #[error("not signed in")]
    NotSignedIn,

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid page: {0}")]
    Paging(String),

    #[error("session storage error: {0}")]
    Storage(String),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The caller has to sign in again before anything else will work.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ClientError::RefreshFailed(_) | ClientError::SessionExpired | ClientError::NotSignedIn
        ) || self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

impl From<types::Error> for ClientError {
    fn from(error: types::Error) -> Self {
        ClientError::Storage(error.message)
    }
}
