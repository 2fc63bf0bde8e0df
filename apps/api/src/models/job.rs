use serde::{Deserialize, Serialize};

use crate::models::profile::SkillType;

/// How much a requirement weighs in quest costing and critical coverage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Critical,
    High,
    Medium,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::Critical => "critical",
            Importance::High => "high",
            Importance::Medium => "medium",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Some(Importance::Critical),
            "high" => Some(Importance::High),
            "medium" => Some(Importance::Medium),
            _ => None,
        }
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, Importance::Critical)
    }
}

/// A skill a job posting asks for.
///
/// `importance` is optional at the type level so that rows written by other
/// tools can be loaded; the match engine rejects requirements without one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequiredSkill {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub skill_type: Option<SkillType>,
    #[serde(default)]
    pub importance: Option<Importance>,
}

impl RequiredSkill {
    pub fn new(id: &str, name: &str, importance: Importance) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            skill_type: Some(SkillType::Technical),
            importance: Some(importance),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub job_id: String,
    pub title: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills_required: Vec<RequiredSkill>,
}
