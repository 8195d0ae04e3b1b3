use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::auth::{Profile, TokenPair};

/// Everything that survives between runs: the live token pair and, once
/// fetched, the profile it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub tokens: TokenPair,
    #[serde(default)]
    pub user: Option<Profile>,
}

impl Session {
    pub fn new(tokens: TokenPair) -> Self {
        Self { tokens, user: None }
    }
}

pub fn encode_session(session: &Session) -> Result<String> {
    let json = serde_json::to_string(session).context("failed to serialize session")?;
    Ok(URL_SAFE_NO_PAD.encode(json.as_bytes()))
}

pub fn decode_session(encoded: &str) -> Result<Session> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded.trim())
        .context("failed to decode base64")?;
    let json = String::from_utf8(bytes).context("invalid UTF-8 in session")?;
    Ok(serde_json::from_str(&json).context("failed to parse session JSON")?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_survives_encoding() {
        let session = Session::new(TokenPair::new("A1", "R1"));
        let encoded = encode_session(&session).unwrap();

        let decoded = decode_session(&format!("{encoded}\n")).unwrap();
        assert_eq!(decoded.tokens.access_token(), "A1");
        assert_eq!(decoded.tokens.refresh_token(), "R1");
        assert!(decoded.user.is_none());
    }

    #[test]
    fn garbage_is_rejected() {
        let error = decode_session("not base64!").unwrap_err();
        assert!(error.message.contains("failed to decode base64"));
    }
}
