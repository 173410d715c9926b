use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::jobs::stats::JobStats;
use crate::models::job::{JobRow, NewJob};
use crate::models::resume::ResumeRow;
use crate::scoring::Weights;
use crate::state::AppState;
use crate::storage;
use crate::store::{JobEdit, StoreError};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub user_id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub skills_weight: Option<i32>,
    pub experience_weight: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub skills_weight: Option<i32>,
    pub experience_weight: Option<i32>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeOrder {
    #[default]
    Rank,
    Score,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeListQuery {
    /// Only resumes with an overall score at or above this.
    pub min_score: Option<i32>,
    /// Only resumes whose matched skills include this one (case-insensitive).
    pub skill: Option<String>,
    pub min_experience_months: Option<i32>,
    pub limit: Option<usize>,
    #[serde(default)]
    pub order: ResumeOrder,
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    let user_id = req
        .user_id
        .ok_or_else(|| AppError::Validation("userId is required".to_string()))?;
    let title = required_text("title", req.title)?;
    let description = required_text("description", req.description)?;
    let weights = requested_weights(req.skills_weight, req.experience_weight)?.unwrap_or_default();

    let job = state
        .store
        .insert_job(NewJob {
            id: Uuid::new_v4(),
            user_id,
            title,
            description,
            weights,
        })
        .await?;

    info!(
        "Created job {} for user {} (skills={} experience={})",
        job.id, job.user_id, job.skills_weight, job.experience_weight
    );
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs?userId=
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UserIdQuery>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    Ok(Json(state.store.list_jobs(params.user_id).await?))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    Ok(Json(find_job(&state, id).await?))
}

/// PATCH /api/v1/jobs/:id
///
/// Title and description edits never rescore. A weight edit rescores and
/// resequences every resume of the job, and commits with any details edit in
/// one atomic step.
pub async fn handle_update_job(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<UpdateJobRequest>,
) -> Result<Json<JobRow>, AppError> {
    let job = find_job(&state, id).await?;

    let title = req.title.map(|t| required_text("title", Some(t))).transpose()?;
    let description = req
        .description
        .map(|d| required_text("description", Some(d)))
        .transpose()?;
    let weights = requested_weights(req.skills_weight, req.experience_weight)?;

    match weights.filter(|w| *w != job.weights()) {
        // Details commit in the same mutation as the reweight.
        Some(weights) => {
            let details = JobEdit { title, description };
            state.weights.on_weight_change(id, weights, details).await?;
        }
        None if title.is_some() || description.is_some() => {
            state
                .store
                .update_job_details(id, title, description)
                .await?
                .ok_or(StoreError::JobNotFound(id))?;
        }
        None => {}
    }

    Ok(Json(find_job(&state, id).await?))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    let removed = state.ranks.remove_job(id).await?;
    info!("Deleted job {id} and {} resumes", removed.len());

    storage::discard(
        state.files.as_ref(),
        removed.into_iter().map(|r| r.file_key),
    )
    .await;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/jobs/:id/stats
pub async fn handle_job_stats(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<JobStats>, AppError> {
    find_job(&state, id).await?;
    let resumes = state.store.resumes_by_rank(id).await?;
    Ok(Json(JobStats::from_resumes(&resumes)))
}

/// GET /api/v1/jobs/:id/resumes
///
/// Rank order by default. Filters only narrow what is returned; ranks are untouched.
pub async fn handle_list_job_resumes(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppQuery(params): AppQuery<ResumeListQuery>,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    find_job(&state, id).await?;

    let resumes = match params.order {
        ResumeOrder::Rank => state.store.resumes_by_rank(id).await?,
        ResumeOrder::Score => state.store.resumes_by_score(id).await?,
    };
    let min_score = params.min_score.unwrap_or(0);
    let min_months = params.min_experience_months.unwrap_or(0);
    let skill = params
        .skill
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let limit = params.limit.unwrap_or(usize::MAX);

    Ok(Json(
        resumes
            .into_iter()
            .filter(|r| r.overall_score >= min_score)
            .filter(|r| r.experience_months >= min_months)
            .filter(|r| skill.map_or(true, |wanted| has_skill(r, wanted)))
            .take(limit)
            .collect(),
    ))
}

/// POST /api/v1/jobs/:id/resequence
///
/// Restores pure score order, discarding manual moves.
pub async fn handle_resequence_job(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    find_job(&state, id).await?;
    Ok(Json(state.ranks.resequence(id).await?))
}

async fn find_job(state: &AppState, id: Uuid) -> Result<JobRow, AppError> {
    state
        .store
        .get_job(id)
        .await?
        .ok_or_else(|| StoreError::JobNotFound(id).into())
}

fn has_skill(resume: &ResumeRow, wanted: &str) -> bool {
    resume
        .matched_skills
        .iter()
        .any(|s| s.eq_ignore_ascii_case(wanted))
}

fn required_text(field: &str, value: Option<String>) -> Result<String, AppError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{field} is required"))),
    }
}

/// Weights from an optional skills/experience pair. Either one alone determines
/// the other; both must add up to 100.
fn requested_weights(
    skills: Option<i32>,
    experience: Option<i32>,
) -> Result<Option<Weights>, AppError> {
    let weights = match (skills, experience) {
        (None, None) => return Ok(None),
        (Some(skills), experience) => Weights::from_pair(skills, experience)?,
        (None, Some(experience)) => Weights::from_pair(100i32.saturating_sub(experience), Some(experience))?,
    };
    Ok(Some(weights))
}
