use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use magentashift_api::analysis::SkillExtractor;
use magentashift_api::auth::AuthKeys;
use magentashift_api::errors::AppError;
use magentashift_api::models::job::{Importance, Job, RequiredSkill};
use magentashift_api::models::profile::{Skill, SkillAnalysis, SkillCategory, SkillLevel};
use magentashift_api::routes::build_router;
use magentashift_api::state::AppState;
use magentashift_api::store::{MemoryStore, Store};

/// Returns the same analysis for any CV, naming the class after the text.
struct StubExtractor;

#[async_trait]
impl SkillExtractor for StubExtractor {
    async fn extract(&self, cv_text: &str) -> Result<SkillAnalysis, AppError> {
        let mut sql = Skill::named("skill_sql", "SQL");
        sql.category = Some(SkillCategory::Data);
        sql.level = Some(SkillLevel::Advanced);
        let mut python = Skill::named("skill_py", "python");
        python.category = Some(SkillCategory::Code);

        Ok(SkillAnalysis {
            skills: vec![sql, python],
            creativity_score: 0.7,
            rpg_class: if cv_text.contains("wizard") { "Code Wizard" } else { "Data Alchemist" }.to_string(),
            meta_skills: vec!["Curiosity".to_string()],
        })
    }
}

fn data_analyst() -> Job {
    Job {
        job_id: "job_data_analyst".to_string(),
        title: "Data Analyst".to_string(),
        domain: "Data".to_string(),
        description: String::new(),
        skills_required: vec![
            RequiredSkill::new("skill_sql", "SQL", Importance::Critical),
            RequiredSkill::new("skill_python", "Python", Importance::High),
            RequiredSkill::new("skill_storytelling", "Storytelling", Importance::Medium),
            RequiredSkill::new("skill_figma", "Figma", Importance::Critical),
        ],
    }
}

fn designer() -> Job {
    Job {
        job_id: "job_ux_designer".to_string(),
        title: "UX Designer".to_string(),
        domain: "Design".to_string(),
        description: String::new(),
        skills_required: vec![RequiredSkill::new("skill_figma", "Figma", Importance::Critical)],
    }
}

async fn app() -> Router {
    let store = Arc::new(MemoryStore::new());
    store.replace_jobs(vec![data_analyst(), designer()]).await.unwrap();

    build_router(
        AppState {
            store,
            extractor: Arc::new(StubExtractor),
            auth: AuthKeys::new("integration-secret", 7, 4),
        },
        1024 * 1024,
    )
}

async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"name": "Ada", "email": email, "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "magentashift-api");
}

#[tokio::test]
async fn register_login_and_me() {
    let app = app().await;
    let token = register(&app, "Ada@Example.com").await;

    let (status, me) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me, json!({"name": "Ada", "email": "ada@example.com"}));

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "ada@example.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "ada@example.com", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid email or password");
}

#[tokio::test]
async fn register_rejects_duplicates_and_short_passwords() {
    let app = app().await;
    register(&app, "ada@example.com").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"name": "Ada", "email": "ada@example.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"name": "Bob", "email": "bob@example.com", "password": "123"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn me_requires_a_valid_token() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Token is missing");

    let (status, body) = send(&app, "GET", "/api/auth/me", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid token");
}

#[tokio::test]
async fn jobs_are_listed() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/api/jobs", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let jobs = body.as_array().unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0]["jobId"], "job_data_analyst");
    assert_eq!(jobs[0]["skillsRequired"][0]["importance"], "critical");
}

#[tokio::test]
async fn parse_requires_some_input() {
    let app = app().await;
    let (status, body) = send(&app, "POST", "/api/candidate/parse", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "No CV text, file, or LinkedIn URL provided");
}

#[tokio::test]
async fn parse_returns_a_profile() {
    let app = app().await;
    let (status, profile) = send(
        &app,
        "POST",
        "/api/candidate/parse",
        None,
        Some(json!({"cvText": "Five years of SQL reporting"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["rpgClass"], "Data Alchemist");
    assert_eq!(profile["summary"], "Level 2 Data Alchemist");
    assert_eq!(profile["skills"].as_array().unwrap().len(), 2);
    assert!(profile["candidateId"].is_string());
}

#[tokio::test]
async fn authenticated_parse_replaces_the_users_profile() {
    let app = app().await;
    let token = register(&app, "ada@example.com").await;

    let (_, first) = send(
        &app,
        "POST",
        "/api/candidate/parse",
        Some(&token),
        Some(json!({"cvText": "analyst"})),
    )
    .await;
    let (status, second) = send(
        &app,
        "POST",
        "/api/candidate/parse",
        Some(&token),
        Some(json!({"cvText": "wizard"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["candidateId"], second["candidateId"]);
    assert_eq!(second["rpgClass"], "Code Wizard");

    // Anonymous uploads always create a new candidate.
    let (_, anonymous) = send(
        &app,
        "POST",
        "/api/candidate/parse",
        None,
        Some(json!({"cvText": "analyst"})),
    )
    .await;
    assert_ne!(anonymous["candidateId"], first["candidateId"]);
}

#[tokio::test]
async fn builds_populate_the_recruiter_view() {
    let app = app().await;
    let (_, profile) = send(
        &app,
        "POST",
        "/api/candidate/parse",
        None,
        Some(json!({"cvText": "analyst"})),
    )
    .await;

    let request = json!({"candidateProfile": profile, "jobIds": ["job_data_analyst"]});
    let (status, body) = send(&app, "POST", "/api/candidate/builds", None, Some(request.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["candidateId"], profile["candidateId"]);
    assert_eq!(body["baseProfile"], profile);

    let builds = body["builds"].as_array().unwrap();
    assert_eq!(builds.len(), 1);
    let build = &builds[0];
    assert_eq!(build["matchScore"], 0.5);
    assert_eq!(build["gapCostHours"], 15);
    assert_eq!(build["skillCoverage"]["criticalCovered"], 1);
    assert_eq!(build["skillCoverage"]["criticalTotal"], 2);
    assert_eq!(build["coveredSkills"][0]["explanation"], "Matched SQL (Level: advanced)");

    let (status, listing) = send(&app, "GET", "/api/recruiter/avatars/job_data_analyst", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let avatars = listing["avatars"].as_array().unwrap();
    assert_eq!(avatars.len(), 1);
    assert_eq!(avatars[0]["primaryBranch"], "Data");
    assert_eq!(avatars[0]["summary"], "Match for Data Analyst");
    let avatar_id = avatars[0]["avatarId"].as_str().unwrap().to_string();

    // Resubmitting the same profile refreshes the avatar in place.
    let (_, again) = send(&app, "POST", "/api/candidate/builds", None, Some(request)).await;
    assert_eq!(again["builds"], body["builds"]);
    let (_, listing) = send(&app, "GET", "/api/recruiter/avatars/job_data_analyst", None, None).await;
    assert_eq!(listing["avatars"].as_array().unwrap().len(), 1);
    assert_eq!(listing["avatars"][0]["avatarId"], avatar_id.as_str());

    let (status, detail) = send(&app, "GET", &format!("/api/recruiter/avatar/{avatar_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["jobId"], "job_data_analyst");
    let nodes = detail["tree"]["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 4);
    assert_eq!(nodes[0]["status"], "covered");
    assert_eq!(nodes[3]["status"], "missing");
    assert_eq!(detail["quests"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn builds_require_a_candidate_id() {
    let app = app().await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/candidate/builds",
        None,
        Some(json!({"candidateProfile": {"skills": []}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/api/candidate/builds", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn recruiter_view_warms_up_from_stored_profiles() {
    let app = app().await;
    send(&app, "POST", "/api/candidate/parse", None, Some(json!({"cvText": "analyst"}))).await;

    let (status, listing) = send(&app, "GET", "/api/recruiter/avatars/job_ux_designer", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let avatars = listing["avatars"].as_array().unwrap();
    assert_eq!(avatars.len(), 1);
    assert_eq!(avatars[0]["matchScore"], 0.0);
    assert_eq!(avatars[0]["primaryBranch"], "General");

    let (status, listing) = send(&app, "GET", "/api/recruiter/avatars/job_unknown", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(listing["avatars"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn builds_tolerate_unrecognised_skill_attributes() {
    let app = app().await;
    let profile = json!({
        "candidateId": "6f1c2b1e-3d4a-4b5c-8d9e-0f1a2b3c4d5e",
        "skills": [{
            "id": "skill_sql",
            "name": "SQL",
            "level": "Expert",
            "category": "Tools",
            "evidence": null
        }]
    });

    let (status, body) = send(
        &app,
        "POST",
        "/api/candidate/builds",
        None,
        Some(json!({"candidateProfile": profile, "jobIds": ["job_data_analyst"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let build = &body["builds"][0];
    assert_eq!(build["matchScore"], 0.25);
    assert_eq!(build["coveredSkills"][0]["explanation"], "Matched SQL (Level: N/A)");
    assert_eq!(build["coveredSkills"][0]["category"], "Other");
}

#[tokio::test]
async fn malformed_avatar_id_is_not_found() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/api/recruiter/avatar/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["message"], "Avatar not found");
}

#[tokio::test]
async fn unknown_avatar_is_not_found() {
    let app = app().await;
    let (status, body) = send(
        &app,
        "GET",
        "/api/recruiter/avatar/00000000-0000-0000-0000-000000000000",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Avatar not found");
}
