use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::debug;
use types::auth::{Profile, TokenPair};
use types::{Result, Session, decode_session, encode_session};

/// Handle to the single live session. Clones share the same cell.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    session: RwLock<Option<Session>>,
    refresh_gate: Mutex<()>,
    path: Option<PathBuf>,
}

impl SessionStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a store backed by `path`, loading the session saved there if any.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let session = match tokio::fs::read_to_string(&path).await {
            Ok(encoded) => Some(decode_session(&encoded)?),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => None,
            Err(error) => return Err(error.into()),
        };
        debug!(path = %path.display(), restored = session.is_some(), "opened session store");

        Ok(Self {
            inner: Arc::new(Inner {
                session: RwLock::new(session),
                refresh_gate: Mutex::new(()),
                path: Some(path),
            }),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.inner.path.as_deref()
    }

    pub async fn tokens(&self) -> Option<TokenPair> {
        self.inner
            .session
            .read()
            .await
            .as_ref()
            .map(|session| session.tokens.clone())
    }

    pub async fn user(&self) -> Option<Profile> {
        self.inner
            .session
            .read()
            .await
            .as_ref()
            .and_then(|session| session.user.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.session.read().await.is_some()
    }

    /// Replace the token pair, keeping the stored profile.
    pub async fn set_tokens(&self, tokens: TokenPair) -> Result<()> {
        let mut session = self.inner.session.write().await;
        match session.as_mut() {
            Some(session) => session.tokens = tokens,
            None => *session = Some(Session::new(tokens)),
        }
        self.persist(session.as_ref()).await
    }

    pub async fn set_user(&self, user: Profile) -> Result<()> {
        let mut session = self.inner.session.write().await;
        let Some(current) = session.as_mut() else {
            return Err(types::err!("cannot store a profile without a session"));
        };
        current.user = Some(user);
        self.persist(session.as_ref()).await
    }

    pub async fn clear(&self) -> Result<()> {
        let mut session = self.inner.session.write().await;
        *session = None;
        self.persist(None).await
    }

    /// Serializes token refreshes across every clone of this store.
    pub(crate) async fn lock_refresh(&self) -> MutexGuard<'_, ()> {
        self.inner.refresh_gate.lock().await
    }

    // Called with the write lock held so the file always matches the cell.
    async fn persist(&self, session: Option<&Session>) -> Result<()> {
        let Some(path) = &self.inner.path else {
            return Ok(());
        };

        match session {
            Some(session) => {
                if let Some(parent) = path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    tokio::fs::create_dir_all(parent).await?;
                }
                tokio::fs::write(path, encode_session(session)?).await?;
            }
            None => match tokio::fs::remove_file(path).await {
                Ok(()) => {}
                Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
                Err(error) => return Err(error.into()),
            },
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_tokens_keeps_profile_slot() {
        let store = SessionStore::in_memory();
        assert!(!store.is_authenticated().await);

        store.set_tokens(TokenPair::new("A1", "R1")).await.unwrap();
        store.set_tokens(TokenPair::new("A2", "R2")).await.unwrap();

        let tokens = store.tokens().await.unwrap();
        assert_eq!(tokens.access_token(), "A2");
        assert_eq!(tokens.refresh_token(), "R2");
        assert!(store.user().await.is_none());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = SessionStore::in_memory();
        let other = store.clone();

        store.set_tokens(TokenPair::new("A1", "R1")).await.unwrap();
        assert!(other.is_authenticated().await);

        other.clear().await.unwrap();
        assert!(store.tokens().await.is_none());
    }

    #[tokio::test]
    async fn profile_requires_session() {
        let store = SessionStore::in_memory();
        let profile: Profile = serde_json::from_value(serde_json::json!({
            "id": 1,
            "email": "john@mail.com",
            "name": "Jhon",
            "role": "customer",
            "avatar": "https://i.imgur.com/LDOO4Qs.jpg",
            "creationAt": "2024-01-01T10:00:00Z",
            "updatedAt": "2024-01-01T10:00:00Z"
        }))
        .unwrap();

        assert!(store.set_user(profile.clone()).await.is_err());

        store.set_tokens(TokenPair::new("A1", "R1")).await.unwrap();
        store.set_user(profile.clone()).await.unwrap();
        assert_eq!(store.user().await, Some(profile));
    }

    #[tokio::test]
    async fn persisted_session_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session");

        let store = SessionStore::open(&path).await.unwrap();
        assert!(!store.is_authenticated().await);
        store.set_tokens(TokenPair::new("A1", "R1")).await.unwrap();
        assert!(path.exists());

        let reopened = SessionStore::open(&path).await.unwrap();
        assert_eq!(reopened.tokens().await.unwrap().access_token(), "A1");

        reopened.clear().await.unwrap();
        assert!(!path.exists());
        assert!(!SessionStore::open(&path).await.unwrap().is_authenticated().await);
    }

    #[tokio::test]
    async fn corrupt_session_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session");
        std::fs::write(&path, "definitely not a session").unwrap();

        assert!(SessionStore::open(&path).await.is_err());
    }
}
