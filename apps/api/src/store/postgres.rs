use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::matching::engine::SkillCoverage;
use crate::models::avatar::Avatar;
use crate::models::job::{Importance, Job, RequiredSkill};
use crate::models::profile::{CandidateProfile, SkillType};
use crate::models::user::{NewUser, User};
use crate::store::{Store, StoreError};

// ────────────────────────────────────────────────────────────────────────────
// Row types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, FromRow)]
struct ProfileRow {
    candidate_id: Uuid,
    user_id: Option<Uuid>,
    rpg_class: String,
    creativity_score: f64,
    summary: String,
    skills: Value,
    meta_skills: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for CandidateProfile {
    type Error = StoreError;

    fn try_from(row: ProfileRow) -> Result<Self, StoreError> {
        let skills = serde_json::from_value(row.skills).map_err(|e| {
            StoreError::Corrupt(format!("skills of candidate {}: {e}", row.candidate_id))
        })?;
        let meta_skills = serde_json::from_value(row.meta_skills).map_err(|e| {
            StoreError::Corrupt(format!("meta skills of candidate {}: {e}", row.candidate_id))
        })?;
        Ok(CandidateProfile {
            candidate_id: row.candidate_id,
            owner: row.user_id,
            rpg_class: row.rpg_class,
            creativity_score: row.creativity_score,
            summary: row.summary,
            skills,
            meta_skills,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        })
    }
}

#[derive(Debug, FromRow)]
struct JobRow {
    job_id: String,
    title: String,
    domain: String,
    description: String,
}

#[derive(Debug, FromRow)]
struct JobSkillRow {
    job_id: String,
    skill_id: String,
    name: String,
    skill_type: Option<String>,
    importance: Option<String>,
}

impl From<JobSkillRow> for RequiredSkill {
    // An unknown importance string is kept as `None` so the engine reports it.
    fn from(row: JobSkillRow) -> Self {
        RequiredSkill {
            id: row.skill_id,
            name: row.name,
            skill_type: row.skill_type.as_deref().and_then(SkillType::parse),
            importance: row.importance.as_deref().and_then(Importance::parse),
        }
    }
}

#[derive(Debug, FromRow)]
struct AvatarRow {
    avatar_id: Uuid,
    job_id: String,
    candidate_id: Uuid,
    match_score: f64,
    gap_cost_hours: i32,
    summary: String,
    primary_branch: String,
    skill_coverage: Value,
}

impl TryFrom<AvatarRow> for Avatar {
    type Error = StoreError;

    fn try_from(row: AvatarRow) -> Result<Self, StoreError> {
        let skill_coverage: SkillCoverage = serde_json::from_value(row.skill_coverage)
            .map_err(|e| StoreError::Corrupt(format!("coverage of avatar {}: {e}", row.avatar_id)))?;
        Ok(Avatar {
            avatar_id: row.avatar_id,
            job_id: row.job_id,
            candidate_id: row.candidate_id,
            match_score: row.match_score,
            gap_cost_hours: u32::try_from(row.gap_cost_hours).map_err(|_| {
                StoreError::Corrupt(format!("negative gap cost on avatar {}", row.avatar_id))
            })?,
            summary: row.summary,
            primary_branch: row.primary_branch,
            skill_coverage,
        })
    }
}

const AVATAR_COLUMNS: &str = "avatar_id, job_id, candidate_id, match_score, gap_cost_hours, \
     summary, primary_branch, skill_coverage";

// ────────────────────────────────────────────────────────────────────────────
// Store implementation
// ────────────────────────────────────────────────────────────────────────────

/// PostgreSQL-backed store. Schema lives in `apps/api/migrations`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn skills_for(&self, job_ids: &[String]) -> Result<Vec<JobSkillRow>, StoreError> {
        Ok(sqlx::query_as::<_, JobSkillRow>(
            r#"
            SELECT job_id, skill_id, name, skill_type, importance
            FROM job_skills
            WHERE job_id = ANY($1)
            ORDER BY job_id, position
            "#,
        )
        .bind(job_ids)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn assemble_jobs(&self, rows: Vec<JobRow>) -> Result<Vec<Job>, StoreError> {
        let job_ids: Vec<String> = rows.iter().map(|r| r.job_id.clone()).collect();
        let mut skill_rows = self.skills_for(&job_ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let (mine, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut skill_rows)
                    .into_iter()
                    .partition(|s| s.job_id == row.job_id);
                skill_rows = rest;
                Job {
                    job_id: row.job_id,
                    title: row.title,
                    domain: row.domain,
                    description: row.description,
                    skills_required: mine.into_iter().map(RequiredSkill::from).collect(),
                }
            })
            .collect())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(created) => Ok(created),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::Duplicate(format!("email {}", user.email)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn save_profile(&self, draft: CandidateProfile) -> Result<CandidateProfile, StoreError> {
        let skills = serde_json::to_value(&draft.skills)
            .map_err(|e| StoreError::Corrupt(format!("unserializable skills: {e}")))?;
        let meta_skills = serde_json::to_value(&draft.meta_skills)
            .map_err(|e| StoreError::Corrupt(format!("unserializable meta skills: {e}")))?;

        // NULL user_id never conflicts, so anonymous drafts always insert.
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO candidate_profiles
                (candidate_id, user_id, rpg_class, creativity_score, summary, skills, meta_skills)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE SET
                rpg_class = EXCLUDED.rpg_class,
                creativity_score = EXCLUDED.creativity_score,
                summary = EXCLUDED.summary,
                skills = EXCLUDED.skills,
                meta_skills = EXCLUDED.meta_skills,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(draft.candidate_id)
        .bind(draft.owner)
        .bind(&draft.rpg_class)
        .bind(draft.creativity_score)
        .bind(&draft.summary)
        .bind(skills)
        .bind(meta_skills)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Saved candidate profile {} (owned: {})",
            row.candidate_id,
            row.user_id.is_some()
        );
        row.try_into()
    }

    async fn get_profile(&self, candidate_id: Uuid) -> Result<Option<CandidateProfile>, StoreError> {
        sqlx::query_as::<_, ProfileRow>("SELECT * FROM candidate_profiles WHERE candidate_id = $1")
            .bind(candidate_id)
            .fetch_optional(&self.pool)
            .await?
            .map(CandidateProfile::try_from)
            .transpose()
    }

    async fn list_profiles(&self) -> Result<Vec<CandidateProfile>, StoreError> {
        sqlx::query_as::<_, ProfileRow>("SELECT * FROM candidate_profiles ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(CandidateProfile::try_from)
            .collect()
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, StoreError> {
        let rows = sqlx::query_as::<_, JobRow>(
            "SELECT job_id, title, domain, description FROM jobs ORDER BY position",
        )
        .fetch_all(&self.pool)
        .await?;
        self.assemble_jobs(rows).await
    }

    async fn get_job(&self, job_id: &str) -> Result<Option<Job>, StoreError> {
        let row = sqlx::query_as::<_, JobRow>(
            "SELECT job_id, title, domain, description FROM jobs WHERE job_id = $1",
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.assemble_jobs(vec![row]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    async fn replace_jobs(&self, jobs: Vec<Job>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM jobs").execute(&mut *tx).await?;

        for (position, job) in jobs.iter().enumerate() {
            sqlx::query(
                "INSERT INTO jobs (job_id, position, title, domain, description) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(&job.job_id)
            .bind(position as i32)
            .bind(&job.title)
            .bind(&job.domain)
            .bind(&job.description)
            .execute(&mut *tx)
            .await?;

            for (skill_position, skill) in job.skills_required.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO job_skills (job_id, position, skill_id, name, skill_type, importance)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(&job.job_id)
                .bind(skill_position as i32)
                .bind(&skill.id)
                .bind(&skill.name)
                .bind(skill.skill_type.map(|t| t.as_str()))
                .bind(skill.importance.map(|i| i.as_str()))
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        info!("Replaced job catalogue with {} jobs", jobs.len());
        Ok(())
    }

    async fn upsert_avatar(&self, avatar: Avatar) -> Result<Avatar, StoreError> {
        let coverage = serde_json::to_value(avatar.skill_coverage)
            .map_err(|e| StoreError::Corrupt(format!("unserializable coverage: {e}")))?;

        let row = sqlx::query_as::<_, AvatarRow>(&format!(
            r#"
            INSERT INTO avatars ({AVATAR_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (job_id, candidate_id) DO UPDATE SET
                match_score = EXCLUDED.match_score,
                gap_cost_hours = EXCLUDED.gap_cost_hours,
                summary = EXCLUDED.summary,
                primary_branch = EXCLUDED.primary_branch,
                skill_coverage = EXCLUDED.skill_coverage,
                updated_at = now()
            RETURNING {AVATAR_COLUMNS}
            "#
        ))
        .bind(avatar.avatar_id)
        .bind(&avatar.job_id)
        .bind(avatar.candidate_id)
        .bind(avatar.match_score)
        .bind(avatar.gap_cost_hours as i32)
        .bind(&avatar.summary)
        .bind(&avatar.primary_branch)
        .bind(coverage)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn list_avatars(&self, job_id: &str) -> Result<Vec<Avatar>, StoreError> {
        sqlx::query_as::<_, AvatarRow>(&format!(
            "SELECT {AVATAR_COLUMNS} FROM avatars WHERE job_id = $1 ORDER BY created_at"
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Avatar::try_from)
        .collect()
    }

    async fn get_avatar(&self, avatar_id: Uuid) -> Result<Option<Avatar>, StoreError> {
        sqlx::query_as::<_, AvatarRow>(&format!(
            "SELECT {AVATAR_COLUMNS} FROM avatars WHERE avatar_id = $1"
        ))
        .bind(avatar_id)
        .fetch_optional(&self.pool)
        .await?
        .map(Avatar::try_from)
        .transpose()
    }
}
