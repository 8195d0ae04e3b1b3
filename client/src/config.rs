use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use types::Result;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.escuelajs.co/api/v1/";
const ENV_PREFIX: &str = "DASHBOARD";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api_url: Url,
    pub session_file: PathBuf,
    pub log_filter: String,
    pub timeout_secs: u64,
}

impl Config {
    /// Layer defaults, an optional TOML file and `DASHBOARD_*` variables, in
    /// that order of precedence.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("api_url", DEFAULT_API_URL)?
            .set_default("session_file", default_session_file().display().to_string())?
            .set_default("log_filter", "warn")?
            .set_default("timeout_secs", 30_i64)?;

        if let Some(file) = file {
            builder = builder.add_source(config::File::from(file).required(true));
        }

        let config = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_session_file() -> PathBuf {
    let base = std::env::var_os("XDG_STATE_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".local/state")))
        .unwrap_or_else(std::env::temp_dir);

    base.join("dashboard").join("session")
}
