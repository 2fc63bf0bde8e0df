//! Loads the job catalogue from a JSON seed file at startup.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use crate::models::job::{Importance, Job, RequiredSkill};
use crate::models::profile::SkillType;
use crate::store::Store;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedJob {
    job_id: String,
    title: String,
    #[serde(default)]
    domain: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    skills_required: Vec<SeedSkill>,
}

#[derive(Debug, Deserialize)]
struct SeedSkill {
    id: String,
    name: String,
    #[serde(rename = "type", default)]
    skill_type: Option<SkillType>,
    #[serde(default)]
    importance: Option<Importance>,
}

impl From<SeedJob> for Job {
    // Seed files may omit type and importance; they default to technical / medium.
    fn from(seed: SeedJob) -> Self {
        Job {
            job_id: seed.job_id,
            title: seed.title,
            domain: seed.domain,
            description: seed.description,
            skills_required: seed
                .skills_required
                .into_iter()
                .map(|s| RequiredSkill {
                    id: s.id,
                    name: s.name,
                    skill_type: Some(s.skill_type.unwrap_or(SkillType::Technical)),
                    importance: Some(s.importance.unwrap_or(Importance::Medium)),
                })
                .collect(),
        }
    }
}

pub fn parse_seed(json: &str) -> Result<Vec<Job>> {
    let jobs: Vec<SeedJob> = serde_json::from_str(json).context("Job seed file is not valid JSON")?;
    Ok(jobs.into_iter().map(Job::from).collect())
}

/// Seeds the store when it has no jobs, or unconditionally when `reset` is set.
/// Returns the number of jobs written.
pub async fn seed_jobs(store: &dyn Store, path: &Path, reset: bool) -> Result<usize> {
    if !reset && !store.list_jobs().await?.is_empty() {
        info!("Job catalogue already present, skipping seed");
        return Ok(0);
    }

    if !path.exists() {
        warn!("Job seed file {} not found, job catalogue left as is", path.display());
        return Ok(0);
    }

    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read job seed file {}", path.display()))?;
    let jobs = parse_seed(&raw)?;
    let count = jobs.len();

    store.replace_jobs(jobs).await?;
    info!("Seeded {count} jobs from {}", path.display());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::store::MemoryStore;

    const SEED: &str = r#"[
        {
            "jobId": "job_data_analyst",
            "title": "Data Analyst",
            "domain": "Data",
            "skillsRequired": [
                {"id": "skill_sql", "name": "SQL", "type": "technical", "importance": "critical"},
                {"id": "skill_storytelling", "name": "Storytelling"}
            ]
        }
    ]"#;

    fn seed_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_seed_applies_defaults() {
        let jobs = parse_seed(SEED).unwrap();
        assert_eq!(jobs.len(), 1);
        let storytelling = &jobs[0].skills_required[1];
        assert_eq!(storytelling.skill_type, Some(SkillType::Technical));
        assert_eq!(storytelling.importance, Some(Importance::Medium));
        assert_eq!(jobs[0].description, "");
    }

    #[test]
    fn test_parse_seed_rejects_missing_id() {
        assert!(parse_seed(r#"[{"jobId": "j", "title": "T", "skillsRequired": [{"name": "SQL"}]}]"#).is_err());
    }

    #[tokio::test]
    async fn test_seed_skips_when_jobs_exist() {
        let store = MemoryStore::new();
        let file = seed_file(SEED);

        assert_eq!(seed_jobs(&store, file.path(), false).await.unwrap(), 1);
        assert_eq!(seed_jobs(&store, file.path(), false).await.unwrap(), 0);
        assert_eq!(seed_jobs(&store, file.path(), true).await.unwrap(), 1);
        assert_eq!(store.list_jobs().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_seed_file_is_not_fatal() {
        let store = MemoryStore::new();
        let count = seed_jobs(&store, Path::new("/nonexistent/jobs.json"), false)
            .await
            .unwrap();
        assert_eq!(count, 0);
        assert!(store.list_jobs().await.unwrap().is_empty());
    }
}
