//! Axum route handlers for jobs, candidate builds and the recruiter view.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::avatars::{avatars_for_job, record_builds};
use crate::matching::engine::{calculate_build, Build, Quest};
use crate::matching::tree::{skill_tree, SkillTree};
use crate::models::avatar::Avatar;
use crate::models::job::Job;
use crate::models::profile::Skill;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildsRequest {
    #[serde(default)]
    pub candidate_profile: Option<Value>,
    #[serde(default)]
    pub job_ids: Vec<String>,
}

/// The part of the submitted profile the engine needs; the rest is echoed back.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildProfile {
    candidate_id: Option<Uuid>,
    #[serde(default)]
    skills: Vec<Skill>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildsResponse {
    pub candidate_id: Uuid,
    pub base_profile: Value,
    pub builds: Vec<Build>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarListResponse {
    pub job_id: String,
    pub avatars: Vec<Avatar>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarDetailResponse {
    pub avatar_id: Uuid,
    pub job_id: String,
    pub tree: SkillTree,
    pub quests: Vec<Quest>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Result<Json<Vec<Job>>, AppError> {
    Ok(Json(state.store.list_jobs().await?))
}

/// POST /api/candidate/builds
///
/// Matches the submitted profile against the selected jobs (all jobs when
/// `jobIds` is empty) and refreshes the candidate's avatar for each of them.
/// Unknown job ids are ignored.
pub async fn handle_builds(
    State(state): State<AppState>,
    Json(request): Json<BuildsRequest>,
) -> Result<Json<BuildsResponse>, AppError> {
    let base_profile = request
        .candidate_profile
        .ok_or_else(|| AppError::Validation("Missing candidate profile".to_string()))?;

    let profile: BuildProfile = serde_json::from_value(base_profile.clone())
        .map_err(|e| AppError::Validation(format!("Invalid candidate profile: {e}")))?;
    let candidate_id = profile
        .candidate_id
        .ok_or_else(|| AppError::Validation("Candidate profile has no candidateId".to_string()))?;

    let jobs: Vec<Job> = state
        .store
        .list_jobs()
        .await?
        .into_iter()
        .filter(|job| request.job_ids.is_empty() || request.job_ids.contains(&job.job_id))
        .collect();

    let builds = record_builds(state.store.as_ref(), &jobs, candidate_id, &profile.skills).await?;

    Ok(Json(BuildsResponse {
        candidate_id,
        base_profile,
        builds,
    }))
}

/// GET /api/recruiter/avatars/:job_id
pub async fn handle_list_avatars(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<AvatarListResponse>, AppError> {
    let avatars = avatars_for_job(state.store.as_ref(), &job_id).await?;
    Ok(Json(AvatarListResponse { job_id, avatars }))
}

/// GET /api/recruiter/avatar/:avatar_id
///
/// Rebuilds the avatar's match from the stored profile and job so the tree
/// reflects the current data.
pub async fn handle_avatar_detail(
    State(state): State<AppState>,
    Path(avatar_id): Path<String>,
) -> Result<Json<AvatarDetailResponse>, AppError> {
    let not_found = || AppError::NotFound("Avatar not found".to_string());

    // Any id that cannot be a stored avatar is reported the same way as an unknown one.
    let avatar_id = Uuid::parse_str(&avatar_id).map_err(|_| not_found())?;
    let avatar = state
        .store
        .get_avatar(avatar_id)
        .await?
        .ok_or_else(not_found)?;

    let profile = state
        .store
        .get_profile(avatar.candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Candidate profile not found".to_string()))?;

    let job = state
        .store
        .get_job(&avatar.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    let build = calculate_build(&profile.skills, &job)?;

    Ok(Json(AvatarDetailResponse {
        avatar_id,
        job_id: avatar.job_id,
        tree: skill_tree(&build, &job),
        quests: build.quests,
    }))
}
