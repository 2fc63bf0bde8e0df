use serde::{Deserialize, Serialize};

use crate::matching::engine::Build;
use crate::models::job::{Importance, Job, RequiredSkill};
use crate::models::profile::{Evidence, SkillType};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Covered,
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub skill_type: SkillType,
    pub status: NodeStatus,
    pub importance: Importance,
    pub evidence: Vec<Evidence>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreeEdge {
    pub from: String,
    pub to: String,
}

/// Skill tree shown on the recruiter's avatar detail page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SkillTree {
    pub nodes: Vec<TreeNode>,
    pub edges: Vec<TreeEdge>,
}

/// Covered requirements first, then missing ones, each in job order.
/// Edges are not derived yet, so the list is always empty.
pub fn skill_tree(build: &Build, job: &Job) -> SkillTree {
    let requirement = |id: &str| job.skills_required.iter().find(|r| r.id == id);
    let type_of = |r: Option<&RequiredSkill>| {
        r.and_then(|r| r.skill_type).unwrap_or(SkillType::Technical)
    };

    let covered = build.covered_skills.iter().map(|c| {
        let required = requirement(&c.job_skill_id);
        TreeNode {
            id: c.job_skill_id.clone(),
            name: c.name.clone(),
            skill_type: type_of(required),
            status: NodeStatus::Covered,
            importance: required
                .and_then(|r| r.importance)
                .unwrap_or(Importance::Medium),
            evidence: vec![Evidence {
                snippet: c.explanation.clone(),
            }],
        }
    });

    let missing = build.missing_skills.iter().map(|m| TreeNode {
        id: m.job_skill_id.clone(),
        name: m.name.clone(),
        skill_type: type_of(requirement(&m.job_skill_id)),
        status: NodeStatus::Missing,
        importance: m.importance,
        evidence: Vec::new(),
    });

    SkillTree {
        nodes: covered.chain(missing).collect(),
        edges: Vec::new(),
    }
}
