use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use types::auth::{REFRESH_PATH, RefreshRequest, TokenPair, TokenResponse};

use crate::error::ClientError;
use crate::storage::SessionStore;

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

pub(crate) trait ResponseExt {
    async fn try_json<T: DeserializeOwned>(self) -> Result<T>;
}

impl ResponseExt for Response {
    async fn try_json<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.bytes().await?;

        match serde_json::from_slice(&body) {
            Ok(r) => Ok(r),
            Err(error) => {
                // Bodies may carry personal data; keep them out of anything above debug.
                debug!(?error, body = %String::from_utf8_lossy(&body), "failed to parse response");
                Err(error.into())
            }
        }
    }
}

/// Turn any non-2xx answer into [`ClientError::Status`].
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // Best effort; the status alone still classifies the failure.
    let body = match response.text().await {
        Ok(body) => body,
        Err(error) => {
            debug!(?error, %status, "failed to read error response body");
            String::new()
        }
    };
    Err(ClientError::Status { status, body })
}

/// A description of one outbound call. Owned by the logical request that
/// issues it and rebuilt for each dispatch.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<serde_json::Value>,
    headers: HeaderMap,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Whether a logical request has already spent its one retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryMarker {
    NotRetried,
    Retried,
}

/// HTTP client that signs every call with the session's access token and
/// renews an expired token once per logical request.
#[derive(Clone)]
pub struct AuthenticatedClient {
    client: Client,
    base_url: Url,
    session: SessionStore,
}

impl AuthenticatedClient {
    pub fn new(base_url: Url, session: SessionStore) -> Self {
        Self::with_client(Client::new(), base_url, session)
    }

    pub fn with_timeout(base_url: Url, session: SessionStore, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, session))
    }

    pub fn with_client(client: Client, mut base_url: Url, session: SessionStore) -> Self {
        // Without the trailing slash `join` would replace the last segment.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            client,
            base_url,
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn build(&self, request: &ApiRequest, tokens: Option<&TokenPair>) -> Result<RequestBuilder> {
        let url = self.endpoint(&request.path)?;

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .headers(request.headers.clone());
        if let Some(tokens) = tokens {
            builder = builder.bearer_auth(tokens.access_token());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        Ok(builder)
    }

    async fn dispatch(&self, request: &ApiRequest, tokens: Option<&TokenPair>) -> Result<Response> {
        debug!(
            method = %request.method,
            path = %request.path,
            authenticated = tokens.is_some(),
            "dispatching request"
        );
        Ok(self.build(request, tokens)?.send().await?)
    }

    /// Send a request outside the refresh rule. Used for endpoints where a 401
    /// means bad credentials rather than an expired token.
    pub(crate) async fn send_unauthenticated(&self, request: &ApiRequest) -> Result<Response> {
        check_status(self.dispatch(request, None).await?).await
    }

    /// Send `request` with the current access token. A first 401 renews the
    /// token pair and re-dispatches once; every other outcome is returned as is.
    pub async fn send(&self, request: ApiRequest) -> Result<Response> {
        let mut marker = RetryMarker::NotRetried;

        loop {
            let tokens = self.session.tokens().await;
            let response = self.dispatch(&request, tokens.as_ref()).await?;

            if response.status() != StatusCode::UNAUTHORIZED {
                return check_status(response).await;
            }

            // Nothing to renew with, or the retry itself was rejected.
            let (RetryMarker::NotRetried, Some(rejected)) = (marker, tokens) else {
                return check_status(response).await;
            };

            marker = RetryMarker::Retried;
            self.renew(&rejected).await?;
        }
    }

    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.send(request).await?.try_json().await
    }

    /// Replace `rejected` with a fresh pair. Concurrent callers rejected with
    /// the same token share a single refresh call.
    async fn renew(&self, rejected: &TokenPair) -> Result<()> {
        let _gate = self.session.lock_refresh().await;

        match self.session.tokens().await {
            None => return Err(ClientError::SessionExpired),
            Some(current) if !current.same_access(rejected) => {
                debug!("access token already renewed by a concurrent request");
                return Ok(());
            }
            Some(_) => {}
        }

        // The cell changes before the file is written, so persistence
        // failures are only logged.
        match self.request_refresh(rejected).await {
            Ok(tokens) => {
                if let Err(storage) = self.session.set_tokens(tokens).await {
                    warn!(error = %storage.message, "could not persist renewed session");
                }
                info!("renewed access token");
                Ok(())
            }
            Err(error) => {
                warn!(%error, "token refresh failed, signing out");
                if let Err(storage) = self.session.clear().await {
                    warn!(error = %storage.message, "could not remove persisted session");
                }
                Err(ClientError::RefreshFailed(Box::new(error)))
            }
        }
    }

    async fn request_refresh(&self, rejected: &TokenPair) -> Result<TokenPair> {
        let request = ApiRequest::post(REFRESH_PATH).json(&RefreshRequest {
            refresh_token: rejected.refresh_token(),
        })?;

        let response: TokenResponse = self.send_unauthenticated(&request).await?.try_json().await?;
        Ok(response.into())
    }
}
