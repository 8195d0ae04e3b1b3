use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;
use types::user::{CreateUser, UpdateUser, User, UserId, sort_newest_first};
use types::{Page, USERS_PER_PAGE};

use crate::error::ClientError;
use crate::http::{AuthenticatedClient, Result};

pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(5 * 60);

struct Cached {
    users: Arc<Vec<User>>,
    fetched_at: Instant,
}

/// Bumped by every invalidation so a fetch that started earlier cannot
/// store its result afterwards.
#[derive(Default)]
struct Cache {
    entry: Option<Cached>,
    generation: u64,
}

/// Cached view of the users collection. Reads are served from memory until
/// they go stale; every successful write invalidates the cache.
pub struct UserDirectory {
    client: AuthenticatedClient,
    stale_after: Duration,
    per_page: usize,
    cache: RwLock<Cache>,
}

impl UserDirectory {
    pub fn new(client: AuthenticatedClient) -> Self {
        Self {
            client,
            stale_after: DEFAULT_STALE_AFTER,
            per_page: USERS_PER_PAGE,
            cache: RwLock::new(Cache::default()),
        }
    }

    pub fn stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    pub fn per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn client(&self) -> &AuthenticatedClient {
        &self.client
    }

    /// All users, newest first.
    pub async fn list(&self) -> Result<Arc<Vec<User>>> {
        let generation = {
            let cache = self.cache.read().await;
            if let Some(cached) = &cache.entry
                && cached.fetched_at.elapsed() < self.stale_after
            {
                return Ok(cached.users.clone());
            }
            cache.generation
        };

        let mut users = self.client.list_users().await?;
        sort_newest_first(&mut users);
        let users = Arc::new(users);

        let mut cache = self.cache.write().await;
        if cache.generation == generation {
            debug!(count = users.len(), "refreshed users cache");
            cache.entry = Some(Cached {
                users: users.clone(),
                fetched_at: Instant::now(),
            });
        } else {
            debug!("users cache invalidated during fetch, not storing");
        }
        Ok(users)
    }

    pub async fn page(&self, page: usize) -> Result<Page<User>> {
        let users = self.list().await?;
        Page::slice(&users, page, self.per_page).map_err(|error| ClientError::Paging(error.message))
    }

    pub async fn create(&self, input: &CreateUser) -> Result<User> {
        let user = self.client.create_user(input).await?;
        self.invalidate().await;
        Ok(user)
    }

    pub async fn update(&self, id: UserId, input: &UpdateUser) -> Result<User> {
        let user = self.client.update_user(id, input).await?;
        self.invalidate().await;
        Ok(user)
    }

    pub async fn delete(&self, id: UserId) -> Result<()> {
        self.client.delete_user(id).await?;
        self.invalidate().await;
        Ok(())
    }

    pub async fn invalidate(&self) {
        let mut cache = self.cache.write().await;
        cache.entry = None;
        cache.generation += 1;
    }
}
