use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::matching::engine::SkillCoverage;

/// Recruiter-facing summary of one candidate's build for one job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Avatar {
    pub avatar_id: Uuid,
    pub job_id: String,
    pub candidate_id: Uuid,
    pub match_score: f64,
    pub gap_cost_hours: u32,
    pub summary: String,
    pub primary_branch: String,
    pub skill_coverage: SkillCoverage,
}
