use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{LikeToggle, Profile};
use crate::services::store::{ProfileStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    profiles: BTreeMap<String, Profile>,
    likes: HashMap<String, Vec<String>>,
}

/// In-process profile store
///
/// Backs tests and local runs without PostgreSQL. Profiles are kept in a
/// `BTreeMap`, so the candidate pool comes out in ascending id order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with profiles
    pub fn with_profiles<I>(profiles: I) -> Self
    where
        I: IntoIterator<Item = Profile>,
    {
        let profiles = profiles
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        Self {
            inner: RwLock::new(Inner {
                profiles,
                likes: HashMap::new(),
            }),
        }
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        Ok(self.inner.read().await.profiles.get(user_id).cloned())
    }

    async fn get_profiles(&self, ids: &[String]) -> Result<Vec<Profile>, StoreError> {
        let inner = self.inner.read().await;
        Ok(ids.iter().filter_map(|id| inner.profiles.get(id).cloned()).collect())
    }

    async fn liked_ids(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .likes
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn candidate_pool(
        &self,
        exclude_id: &str,
        exclude_ids: &[String],
    ) -> Result<Vec<Profile>, StoreError> {
        let excluded: HashSet<&str> = exclude_ids.iter().map(String::as_str).collect();
        let inner = self.inner.read().await;

        Ok(inner
            .profiles
            .values()
            .filter(|p| p.is_profile_complete)
            .filter(|p| p.id != exclude_id && !excluded.contains(p.id.as_str()))
            .cloned()
            .collect())
    }

    async fn toggle_like(&self, user_id: &str, target_id: &str) -> Result<LikeToggle, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.profiles.contains_key(user_id) {
            return Err(StoreError::NotFound(format!("User {} not found", user_id)));
        }

        let liked = inner.likes.entry(user_id.to_string()).or_default();
        match liked.iter().position(|id| id == target_id) {
            Some(index) => {
                liked.remove(index);
                Ok(LikeToggle::Unliked)
            }
            None => {
                liked.push(target_id.to_string());
                Ok(LikeToggle::Liked)
            }
        }
    }

    async fn upsert_profile(&self, profile: Profile) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .profiles
            .insert(profile.id.clone(), profile);
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
