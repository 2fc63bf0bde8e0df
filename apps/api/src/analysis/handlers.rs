//! Axum route handlers for CV upload and analysis.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use crate::analysis::pdf::extract_pdf_text;
use crate::auth::MaybeUser;
use crate::errors::AppError;
use crate::models::profile::CandidateProfile;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request extraction
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CvTextBody {
    #[serde(default)]
    cv_text: String,
    #[serde(default)]
    linkedin_url: Option<String>,
}

/// CV input, from either a multipart form (`file`, `cvText`, `linkedinUrl`)
/// or a JSON body (`cvText`, `linkedinUrl`).
#[derive(Debug, Default)]
pub struct CvUpload {
    pub pdf: Option<Bytes>,
    pub cv_text: String,
    pub linkedin_url: Option<String>,
}

#[async_trait]
impl FromRequest<AppState> for CvUpload {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let Json(body) = Json::<CvTextBody>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            return Ok(CvUpload {
                pdf: None,
                cv_text: body.cv_text,
                linkedin_url: body.linkedin_url,
            });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        let mut upload = CvUpload::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    let has_name = field.file_name().is_some_and(|f| !f.is_empty());
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(e.body_text()))?;
                    if has_name && !data.is_empty() {
                        upload.pdf = Some(data);
                    }
                }
                "cvText" => {
                    upload.cv_text = field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(e.body_text()))?;
                }
                "linkedinUrl" => {
                    upload.linkedin_url = Some(
                        field
                            .text()
                            .await
                            .map_err(|e| AppError::Validation(e.body_text()))?,
                    );
                }
                _ => {}
            }
        }
        Ok(upload)
    }
}

impl CvUpload {
    /// The text sent for analysis. A PDF wins over pasted text; a LinkedIn URL
    /// is appended as an extra line, or stands alone when there is no text.
    async fn into_analysis_text(self) -> Result<String, AppError> {
        let cv_text = match self.pdf {
            Some(data) => extract_pdf_text(data).await?,
            None => self.cv_text,
        };
        let linkedin_url = self
            .linkedin_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        match (cv_text.trim().is_empty(), linkedin_url) {
            (true, None) => Err(AppError::Validation(
                "No CV text, file, or LinkedIn URL provided".to_string(),
            )),
            (true, Some(url)) => Ok(format!("LinkedIn profile: {url}")),
            (false, Some(url)) => Ok(format!("{cv_text}\nLinkedIn profile: {url}")),
            (false, None) => Ok(cv_text),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/candidate/parse
///
/// Analyses a CV and stores the resulting profile. A signed-in caller's
/// previous profile is replaced and keeps its candidate id; anonymous calls
/// always create a new profile.
pub async fn handle_parse(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    upload: CvUpload,
) -> Result<Json<CandidateProfile>, AppError> {
    let text = upload.into_analysis_text().await?;
    let analysis = state.extractor.extract(&text).await?;

    let owner = user.map(|u| u.id);
    let profile = state
        .store
        .save_profile(CandidateProfile::from_analysis(analysis, owner))
        .await?;

    info!(
        "Stored candidate profile {} ({} skills, owned: {})",
        profile.candidate_id,
        profile.skills.len(),
        owner.is_some()
    );
    Ok(Json(profile))
}
