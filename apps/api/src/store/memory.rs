use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::avatar::Avatar;
use crate::models::job::Job;
use crate::models::profile::CandidateProfile;
use crate::models::user::{NewUser, User};
use crate::store::{Store, StoreError};

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    profiles: Vec<CandidateProfile>,
    jobs: Vec<Job>,
    /// job_id -> avatars in first-seen order
    avatars: HashMap<String, Vec<Avatar>>,
}

/// Process-local store. All collections sit behind one lock, so every
/// read-modify-write (profile replace, avatar upsert) happens under a single
/// write guard.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(format!("email {}", user.email)));
        }
        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn save_profile(&self, mut draft: CandidateProfile) -> Result<CandidateProfile, StoreError> {
        let now = Utc::now();
        let mut inner = self.inner.write().await;

        if let Some(owner) = draft.owner {
            if let Some(existing) = inner.profiles.iter_mut().find(|p| p.owner == Some(owner)) {
                draft.candidate_id = existing.candidate_id;
                draft.created_at = existing.created_at;
                draft.updated_at = Some(now);
                *existing = draft.clone();
                return Ok(draft);
            }
        }

        draft.created_at = Some(now);
        draft.updated_at = Some(now);
        inner.profiles.push(draft.clone());
        Ok(draft)
    }

    async fn get_profile(&self, candidate_id: Uuid) -> Result<Option<CandidateProfile>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .profiles
            .iter()
            .find(|p| p.candidate_id == candidate_id)
            .cloned())
    }

    async fn list_profiles(&self) -> Result<Vec<CandidateProfile>, StoreError> {
        Ok(self.inner.read().await.profiles.clone())
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, StoreError> {
        Ok(self.inner.read().await.jobs.clone())
    }

    async fn get_job(&self, job_id: &str) -> Result<Option<Job>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.jobs.iter().find(|j| j.job_id == job_id).cloned())
    }

    async fn replace_jobs(&self, jobs: Vec<Job>) -> Result<(), StoreError> {
        self.inner.write().await.jobs = jobs;
        Ok(())
    }

    async fn upsert_avatar(&self, mut avatar: Avatar) -> Result<Avatar, StoreError> {
        let mut inner = self.inner.write().await;
        let slot = inner.avatars.entry(avatar.job_id.clone()).or_default();

        match slot.iter_mut().find(|a| a.candidate_id == avatar.candidate_id) {
            Some(existing) => {
                avatar.avatar_id = existing.avatar_id;
                *existing = avatar.clone();
            }
            None => slot.push(avatar.clone()),
        }
        Ok(avatar)
    }

    async fn list_avatars(&self, job_id: &str) -> Result<Vec<Avatar>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.avatars.get(job_id).cloned().unwrap_or_default())
    }

    async fn get_avatar(&self, avatar_id: Uuid) -> Result<Option<Avatar>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .avatars
            .values()
            .flatten()
            .find(|a| a.avatar_id == avatar_id)
            .cloned())
    }
}
