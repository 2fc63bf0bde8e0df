//! Build computation: matches a candidate's skills against one job's requirements.
//!
//! Algorithm:
//! 1. Validate every requirement (non-blank id and name, known importance).
//!    Any violation rejects the whole job; no partial build is produced.
//! 2. For each requirement, pick a candidate skill by exact id, else by
//!    case-insensitive name. First rule that hits wins.
//! 3. matchScore = covered / total, rounded to 2 decimals (0 for an empty job).
//! 4. Every uncovered requirement becomes a quest: 10h if critical, else 5h.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::job::{Importance, Job, RequiredSkill};
use crate::models::profile::Skill;

pub const CRITICAL_QUEST_HOURS: u32 = 10;
pub const DEFAULT_QUEST_HOURS: u32 = 5;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CoveredSkill {
    pub job_skill_id: String,
    pub name: String,
    pub source_skill_ids: Vec<String>,
    pub explanation: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MissingSkill {
    pub job_skill_id: String,
    pub name: String,
    pub importance: Importance,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub estimated_hours: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SkillCoverage {
    pub critical_covered: u32,
    pub critical_total: u32,
    pub overall_covered: u32,
    pub overall_total: u32,
}

/// Result of matching one candidate against one job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub job_id: String,
    pub job_title: String,
    pub match_score: f64,
    pub gap_cost_hours: u32,
    pub covered_skills: Vec<CoveredSkill>,
    pub missing_skills: Vec<MissingSkill>,
    pub quests: Vec<Quest>,
    pub skill_coverage: SkillCoverage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Id,
    Name,
    Importance,
}

impl std::fmt::Display for RequiredField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RequiredField::Id => "id",
            RequiredField::Name => "name",
            RequiredField::Importance => "importance",
        })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum MatchError {
    #[error("job {job_id}: required skill #{index} is missing '{field}'")]
    MalformedRequiredSkill {
        job_id: String,
        index: usize,
        field: RequiredField,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Core algorithm
// ────────────────────────────────────────────────────────────────────────────

pub fn calculate_build(candidate_skills: &[Skill], job: &Job) -> Result<Build, MatchError> {
    let requirements = validate_requirements(job)?;

    // Later entries overwrite earlier ones, so duplicates resolve to the last skill.
    let by_id: HashMap<&str, &Skill> = candidate_skills
        .iter()
        .map(|s| (s.id.as_str(), s))
        .collect();
    let by_name: HashMap<String, &Skill> = candidate_skills
        .iter()
        .map(|s| (s.name.to_lowercase(), s))
        .collect();

    let mut covered_skills = Vec::new();
    let mut missing_skills = Vec::new();
    let mut coverage = SkillCoverage {
        overall_total: requirements.len() as u32,
        ..SkillCoverage::default()
    };

    for (required, importance) in requirements {
        if importance.is_critical() {
            coverage.critical_total += 1;
        }

        let matched = by_id
            .get(required.id.as_str())
            .or_else(|| by_name.get(&required.name.to_lowercase()))
            .copied();

        match matched {
            Some(skill) => {
                coverage.overall_covered += 1;
                if importance.is_critical() {
                    coverage.critical_covered += 1;
                }
                covered_skills.push(CoveredSkill {
                    job_skill_id: required.id.clone(),
                    name: required.name.clone(),
                    source_skill_ids: vec![skill.id.clone()],
                    explanation: format!(
                        "Matched {} (Level: {})",
                        required.name,
                        skill.level.map(|l| l.as_str()).unwrap_or("N/A")
                    ),
                    category: skill
                        .category
                        .map(|c| c.as_str())
                        .unwrap_or("Other")
                        .to_string(),
                });
            }
            None => missing_skills.push(MissingSkill {
                job_skill_id: required.id.clone(),
                name: required.name.clone(),
                importance,
            }),
        }
    }

    let quests: Vec<Quest> = missing_skills.iter().map(quest_for).collect();
    let gap_cost_hours = quests.iter().map(|q| q.estimated_hours).sum();

    Ok(Build {
        job_id: job.job_id.clone(),
        job_title: job.title.clone(),
        match_score: match_ratio(coverage.overall_covered, coverage.overall_total),
        gap_cost_hours,
        covered_skills,
        missing_skills,
        quests,
        skill_coverage: coverage,
    })
}

/// Checks every requirement up front and pairs it with its importance.
fn validate_requirements(job: &Job) -> Result<Vec<(&RequiredSkill, Importance)>, MatchError> {
    job.skills_required
        .iter()
        .enumerate()
        .map(|(index, required)| {
            let malformed = |field| MatchError::MalformedRequiredSkill {
                job_id: job.job_id.clone(),
                index,
                field,
            };
            if required.id.trim().is_empty() {
                return Err(malformed(RequiredField::Id));
            }
            if required.name.trim().is_empty() {
                return Err(malformed(RequiredField::Name));
            }
            let importance = required
                .importance
                .ok_or_else(|| malformed(RequiredField::Importance))?;
            Ok((required, importance))
        })
        .collect()
}

fn quest_for(missing: &MissingSkill) -> Quest {
    let estimated_hours = if missing.importance.is_critical() {
        CRITICAL_QUEST_HOURS
    } else {
        DEFAULT_QUEST_HOURS
    };
    Quest {
        id: format!("quest_{}", missing.job_skill_id),
        title: format!("Learn {}", missing.name),
        description: format!(
            "Complete a course or project to demonstrate {}.",
            missing.name
        ),
        estimated_hours,
    }
}

/// Two decimals, exact halves rounded to even (1/8 -> 0.12, 5/8 -> 0.62).
fn match_ratio(covered: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let ratio = covered as f64 / total as f64;
    (ratio * 100.0).round_ties_even() / 100.0
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
