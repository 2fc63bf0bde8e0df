use std::collections::HashMap;

use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::engine::{calculate_build, Build};
use crate::models::avatar::Avatar;
use crate::models::job::Job;
use crate::models::profile::Skill;
use crate::store::Store;

pub const DEFAULT_BRANCH: &str = "General";

/// Most frequent category among covered skills; ties go to the first seen.
pub fn primary_branch(build: &Build) -> String {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (order, covered) in build.covered_skills.iter().enumerate() {
        counts.entry(covered.category.as_str()).or_insert((0, order)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(category, _)| category.to_string())
        .unwrap_or_else(|| DEFAULT_BRANCH.to_string())
}

/// Derives the recruiter avatar for a build. `avatar_id` is fresh; the store
/// keeps the previous id when the pair already has an avatar.
pub fn avatar_for(build: &Build, job: &Job, candidate_id: Uuid) -> Avatar {
    Avatar {
        avatar_id: Uuid::new_v4(),
        job_id: job.job_id.clone(),
        candidate_id,
        match_score: build.match_score,
        gap_cost_hours: build.gap_cost_hours,
        summary: format!("Match for {}", job.title),
        primary_branch: primary_branch(build),
        skill_coverage: build.skill_coverage,
    }
}

/// Computes the build for (job, candidate) and replaces that pair's avatar.
pub async fn record_build(
    store: &dyn Store,
    job: &Job,
    candidate_id: Uuid,
    skills: &[Skill],
) -> Result<(Build, Avatar), AppError> {
    let build = calculate_build(skills, job)?;
    let avatar = store
        .upsert_avatar(avatar_for(&build, job, candidate_id))
        .await?;
    debug!(
        "Avatar {} for candidate {candidate_id} on {}: score {}",
        avatar.avatar_id, job.job_id, avatar.match_score
    );
    Ok((build, avatar))
}

/// Computes every build first and only then upserts the avatars, so a
/// malformed job leaves the cache untouched.
pub async fn record_builds(
    store: &dyn Store,
    jobs: &[Job],
    candidate_id: Uuid,
    skills: &[Skill],
) -> Result<Vec<Build>, AppError> {
    let builds = jobs
        .iter()
        .map(|job| calculate_build(skills, job))
        .collect::<Result<Vec<_>, _>>()?;

    for (build, job) in builds.iter().zip(jobs) {
        store
            .upsert_avatar(avatar_for(build, job, candidate_id))
            .await?;
    }
    info!(
        "Recorded {} builds for candidate {candidate_id}",
        builds.len()
    );
    Ok(builds)
}

/// Avatars for a job, computing them for every stored profile when none exist yet.
pub async fn avatars_for_job(store: &dyn Store, job_id: &str) -> Result<Vec<Avatar>, AppError> {
    let avatars = store.list_avatars(job_id).await?;
    if !avatars.is_empty() {
        return Ok(avatars);
    }

    let Some(job) = store.get_job(job_id).await? else {
        return Ok(Vec::new());
    };

    let profiles = store.list_profiles().await?;
    let mut warmed = Vec::with_capacity(profiles.len());
    for profile in &profiles {
        let (_, avatar) = record_build(store, &job, profile.candidate_id, &profile.skills).await?;
        warmed.push(avatar);
    }
    info!("Computed {} avatars for job {job_id}", warmed.len());
    Ok(warmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::engine::CoveredSkill;
    use crate::models::job::{Importance, RequiredSkill};
    use crate::models::profile::{CandidateProfile, SkillAnalysis};
    use crate::store::MemoryStore;

    fn covered(category: &str) -> CoveredSkill {
        CoveredSkill {
            job_skill_id: "skill_x".to_string(),
            name: "X".to_string(),
            source_skill_ids: vec!["skill_x".to_string()],
            explanation: "Matched X (Level: N/A)".to_string(),
            category: category.to_string(),
        }
    }

    fn job() -> Job {
        Job {
            job_id: "job_backend".to_string(),
            title: "Backend Developer".to_string(),
            domain: "Engineering".to_string(),
            description: String::new(),
            skills_required: vec![
                RequiredSkill::new("skill_python", "Python", Importance::Critical),
                RequiredSkill::new("skill_docker", "Docker", Importance::Medium),
            ],
        }
    }

    fn build_with(categories: &[&str]) -> Build {
        let mut build = calculate_build(&[], &job()).unwrap();
        build.covered_skills = categories.iter().map(|c| covered(c)).collect();
        build
    }

    #[test]
    fn test_primary_branch_defaults_to_general() {
        assert_eq!(primary_branch(&build_with(&[])), "General");
    }

    #[test]
    fn test_primary_branch_picks_most_common() {
        assert_eq!(primary_branch(&build_with(&["Data", "Code", "Code"])), "Code");
    }

    #[test]
    fn test_primary_branch_tie_goes_to_first_seen() {
        assert_eq!(primary_branch(&build_with(&["Social", "Data", "Data", "Social"])), "Social");
    }

    #[test]
    fn test_avatar_summary_names_job() {
        let build = calculate_build(&[Skill::named("skill_python", "Python")], &job()).unwrap();
        let avatar = avatar_for(&build, &job(), Uuid::new_v4());
        assert_eq!(avatar.summary, "Match for Backend Developer");
        assert_eq!(avatar.match_score, 0.5);
        assert_eq!(avatar.gap_cost_hours, 5);
    }

    #[tokio::test]
    async fn test_record_build_twice_keeps_one_identical_avatar() {
        let store = MemoryStore::new();
        let candidate = Uuid::new_v4();
        let skills = vec![Skill::named("skill_python", "Python")];

        let (build_a, avatar_a) = record_build(&store, &job(), candidate, &skills).await.unwrap();
        let (build_b, avatar_b) = record_build(&store, &job(), candidate, &skills).await.unwrap();

        assert_eq!(build_a, build_b);
        assert_eq!(avatar_a, avatar_b);
        assert_eq!(store.list_avatars("job_backend").await.unwrap(), vec![avatar_a]);
    }

    #[tokio::test]
    async fn test_record_builds_leaves_cache_untouched_on_malformed_job() {
        let store = MemoryStore::new();
        let mut broken = job();
        broken.job_id = "job_broken".to_string();
        broken.skills_required[0].importance = None;

        let result = record_builds(
            &store,
            &[job(), broken],
            Uuid::new_v4(),
            &[Skill::named("skill_python", "Python")],
        )
        .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(store.list_avatars("job_backend").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_avatars_warm_from_stored_profiles() {
        let store = MemoryStore::new();
        store.replace_jobs(vec![job()]).await.unwrap();
        for _ in 0..2 {
            store
                .save_profile(CandidateProfile::from_analysis(
                    SkillAnalysis {
                        skills: vec![Skill::named("skill_docker", "docker")],
                        creativity_score: 0.3,
                        rpg_class: "Code Wizard".to_string(),
                        meta_skills: vec![],
                    },
                    None,
                ))
                .await
                .unwrap();
        }

        let avatars = avatars_for_job(&store, "job_backend").await.unwrap();
        assert_eq!(avatars.len(), 2);
        assert!(avatars.iter().all(|a| a.gap_cost_hours == 10));

        // second call reads the cached entries instead of adding more
        assert_eq!(avatars_for_job(&store, "job_backend").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_job_has_no_avatars() {
        let store = MemoryStore::new();
        assert!(avatars_for_job(&store, "job_missing").await.unwrap().is_empty());
    }
}
