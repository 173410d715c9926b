use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath};
use crate::models::resume::{NewResume, ResumeRow};
use crate::ranking::Direction;
use crate::resumes::upload::{UploadForm, PDF_CONTENT_TYPE};
use crate::scoring::CandidateReport;
use crate::state::AppState;
use crate::storage;
use crate::store::StoreError;

#[derive(Deserialize)]
pub struct MoveRequest {
    pub direction: Direction,
}

/// POST /api/v1/resumes
///
/// Multipart: `jobId`, `resume` (PDF), optional `candidateName` / `position` overrides.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    let upload = UploadForm::read(multipart)
        .await?
        .validate(state.config.max_upload_bytes)?;

    let job = state
        .store
        .get_job(upload.job_id)
        .await?
        .ok_or(StoreError::JobNotFound(upload.job_id))?;

    let text = state.extractor.extract(upload.file.bytes.clone()).await;
    if text.trim().is_empty() {
        warn!(
            "No text extracted from {} for job {}, scores default to 0",
            upload.file.file_name, job.id
        );
    }

    let analysis = state.analyzer.analyze(&text, &job.description);
    let report = CandidateReport::build(analysis, job.weights());

    let key = storage::object_key(&upload.file.file_name);
    let stored = state
        .files
        .put(&key, upload.file.bytes, PDF_CONTENT_TYPE)
        .await?;

    let resume = NewResume {
        id: Uuid::new_v4(),
        job_id: job.id,
        name: upload.candidate_name.unwrap_or(report.name),
        position: upload.position.unwrap_or(report.position),
        file_name: upload.file.file_name,
        file_key: stored.key.clone(),
        file_url: stored.url,
        skill_score: report.scores.skill_score,
        experience_score: report.scores.experience_score,
        overall_score: report.scores.overall_score,
        skill_description: report.skill_description,
        experience_description: report.experience_description,
        summary: report.summary,
        matched_skills: report.matched_skills,
        experience_months: report.experience_months.min(i32::MAX as u32) as i32,
    };

    let row = match state.ranks.insert(resume).await {
        Ok(row) => row,
        Err(e) => {
            storage::discard(state.files.as_ref(), [stored.key]).await;
            return Err(e);
        }
    };

    info!(
        "Scored resume {} for job {}: skills={} experience={} overall={} rank={}",
        row.id, row.job_id, row.skill_score, row.experience_score, row.overall_score, row.rank
    );
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    let resume = state
        .store
        .get_resume(id)
        .await?
        .ok_or(StoreError::ResumeNotFound(id))?;
    Ok(Json(resume))
}

/// POST /api/v1/resumes/:id/move
pub async fn handle_move_resume(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<MoveRequest>,
) -> Result<Json<ResumeRow>, AppError> {
    Ok(Json(state.ranks.move_rank(id, req.direction).await?))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    let removed = state.ranks.remove(id).await?;
    storage::discard(state.files.as_ref(), [removed.file_key]).await;
    Ok(StatusCode::NO_CONTENT)
}
