use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SkillType {
    Technical,
    Soft,
    Domain,
    Tool,
}

impl SkillType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillType::Technical => "technical",
            SkillType::Soft => "soft",
            SkillType::Domain => "domain",
            SkillType::Tool => "tool",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "technical" => Some(SkillType::Technical),
            "soft" => Some(SkillType::Soft),
            "domain" => Some(SkillType::Domain),
            "tool" => Some(SkillType::Tool),
            _ => None,
        }
    }
}

/// Skill-tree branch a candidate skill belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SkillCategory {
    Code,
    Data,
    Social,
    Business,
    Design,
}

impl SkillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Code => "Code",
            SkillCategory::Data => "Data",
            SkillCategory::Social => "Social",
            SkillCategory::Business => "Business",
            SkillCategory::Design => "Design",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "code" => Some(SkillCategory::Code),
            "data" => Some(SkillCategory::Data),
            "social" => Some(SkillCategory::Social),
            "business" => Some(SkillCategory::Business),
            "design" => Some(SkillCategory::Design),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Basic,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Basic => "basic",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Some(SkillLevel::Basic),
            "intermediate" => Some(SkillLevel::Intermediate),
            "advanced" => Some(SkillLevel::Advanced),
            _ => None,
        }
    }
}

// Optional skill attributes come from the LLM or from client-echoed profiles.
// Anything that is not a recognised string becomes `None` instead of failing
// the whole skill.
fn lenient_str<'de, D, T>(deserializer: D, parse: fn(&str) -> Option<T>) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Value::as_str).and_then(parse))
}

fn lenient_skill_type<'de, D: Deserializer<'de>>(d: D) -> Result<Option<SkillType>, D::Error> {
    lenient_str(d, SkillType::parse)
}

fn lenient_category<'de, D: Deserializer<'de>>(d: D) -> Result<Option<SkillCategory>, D::Error> {
    lenient_str(d, SkillCategory::parse)
}

fn lenient_level<'de, D: Deserializer<'de>>(d: D) -> Result<Option<SkillLevel>, D::Error> {
    lenient_str(d, SkillLevel::parse)
}

/// `null` and a missing list both mean no evidence.
fn evidence_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Evidence>, D::Error> {
    Ok(Option::<Vec<Evidence>>::deserialize(d)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evidence {
    pub snippet: String,
}

/// A skill extracted from a CV. Only `id` and `name` are mandatory on input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    pub name: String,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_skill_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub skill_type: Option<SkillType>,
    #[serde(default, deserialize_with = "lenient_category", skip_serializing_if = "Option::is_none")]
    pub category: Option<SkillCategory>,
    #[serde(default, deserialize_with = "lenient_level", skip_serializing_if = "Option::is_none")]
    pub level: Option<SkillLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transferability_score: Option<f64>,
    #[serde(default, deserialize_with = "evidence_or_empty")]
    pub evidence: Vec<Evidence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_of_experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_to_previous_jobs: Option<String>,
}

impl Skill {
    /// Minimal skill with only the identifying fields set.
    pub fn named(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            skill_type: None,
            category: None,
            level: None,
            transferability_score: None,
            evidence: Vec::new(),
            reasoning: None,
            years_of_experience: None,
            connection_to_previous_jobs: None,
        }
    }
}

/// Structured output of a CV analysis, before it is attached to a candidate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillAnalysis {
    pub skills: Vec<Skill>,
    pub creativity_score: f64,
    pub rpg_class: String,
    pub meta_skills: Vec<String>,
}

impl SkillAnalysis {
    pub fn summary(&self) -> String {
        format!("Level {} {}", self.skills.len(), self.rpg_class)
    }
}

/// A stored candidate profile. `owner` links it to a registered user, if any.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub candidate_id: Uuid,
    #[serde(skip)]
    pub owner: Option<Uuid>,
    pub rpg_class: String,
    pub creativity_score: f64,
    pub summary: String,
    pub skills: Vec<Skill>,
    pub meta_skills: Vec<String>,
    #[serde(skip)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CandidateProfile {
    /// Builds an unsaved profile from an analysis under a fresh candidate id.
    pub fn from_analysis(analysis: SkillAnalysis, owner: Option<Uuid>) -> Self {
        Self {
            candidate_id: Uuid::new_v4(),
            owner,
            summary: analysis.summary(),
            rpg_class: analysis.rpg_class,
            creativity_score: analysis.creativity_score,
            skills: analysis.skills,
            meta_skills: analysis.meta_skills,
            created_at: None,
            updated_at: None,
        }
    }
}
