mod auth;
pub mod config;
pub mod directory;
mod error;
mod http;
pub mod storage;
mod users;

use tracing_subscriber::EnvFilter;

pub use crate::config::Config;
pub use crate::directory::UserDirectory;
pub use crate::error::ClientError;
pub use crate::http::{ApiRequest, AuthenticatedClient, Result};
pub use crate::storage::SessionStore;

/// Install the global subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Build a client whose session lives in `config.session_file`.
pub async fn connect(config: &Config) -> types::Result<AuthenticatedClient> {
    let session = SessionStore::open(&config.session_file).await?;
    let client = AuthenticatedClient::with_timeout(config.api_url.clone(), session, config.timeout())?;
    Ok(client)
}
