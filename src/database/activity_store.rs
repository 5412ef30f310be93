use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::RwLock;

use crate::database::seed::{self, SeedError};
use crate::models::Activity;

/// In-memory activity registry shared by every request handler.
///
/// Cloning is cheap and all clones see the same data. Each method takes the
/// lock exactly once, so a read-modify-write done through [`ActivityStore::update`]
/// is atomic with respect to other requests.
#[derive(Debug, Clone, Default)]
pub struct ActivityStore {
    inner: Arc<RwLock<IndexMap<String, Activity>>>,
}

impl ActivityStore {
    pub fn new(activities: IndexMap<String, Activity>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(activities)),
        }
    }

    /// Store loaded with the fixed startup roster.
    pub fn seeded() -> Result<Self, SeedError> {
        seed::seed_activities().map(Self::new)
    }

    pub async fn snapshot(&self) -> IndexMap<String, Activity> {
        self.inner.read().await.clone()
    }

    pub async fn get(&self, name: &str) -> Option<Activity> {
        self.inner.read().await.get(name).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Runs `f` against the named activity under the write lock.
    /// Returns `None` when no activity has that exact name.
    pub async fn update<T>(&self, name: &str, f: impl FnOnce(&mut Activity) -> T) -> Option<T> {
        let mut activities = self.inner.write().await;
        activities.get_mut(name).map(f)
    }
}
