//! Storage interface shared by the in-memory and PostgreSQL backends.
//!
//! `AppState` holds an `Arc<dyn Store>`; the backend is chosen at startup from
//! `DATABASE_URL`. Handlers never know which one they are talking to.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::avatar::Avatar;
use crate::models::job::Job;
use crate::models::profile::CandidateProfile;
use crate::models::user::{NewUser, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("duplicate {0}")]
    Duplicate(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Fails with `StoreError::Duplicate` when the email is already registered.
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Persists a freshly analysed profile.
    ///
    /// With an owner, an existing profile of that owner is replaced in place and
    /// keeps its `candidate_id`. Without one, the draft is stored as a new
    /// anonymous profile.
    async fn save_profile(&self, draft: CandidateProfile) -> Result<CandidateProfile, StoreError>;
    async fn get_profile(&self, candidate_id: Uuid) -> Result<Option<CandidateProfile>, StoreError>;
    async fn list_profiles(&self) -> Result<Vec<CandidateProfile>, StoreError>;

    async fn list_jobs(&self) -> Result<Vec<Job>, StoreError>;
    async fn get_job(&self, job_id: &str) -> Result<Option<Job>, StoreError>;
    /// Drops every job and stores `jobs` in the given order.
    async fn replace_jobs(&self, jobs: Vec<Job>) -> Result<(), StoreError>;

    /// Inserts or replaces the avatar for `(job_id, candidate_id)` atomically.
    /// A replaced entry keeps its original `avatar_id`; the stored avatar is returned.
    async fn upsert_avatar(&self, avatar: Avatar) -> Result<Avatar, StoreError>;
    async fn list_avatars(&self, job_id: &str) -> Result<Vec<Avatar>, StoreError>;
    async fn get_avatar(&self, avatar_id: Uuid) -> Result<Option<Avatar>, StoreError>;
}
