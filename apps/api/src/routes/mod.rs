pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::config::StorageConfig;
use crate::jobs::handlers as jobs;
use crate::resumes::handlers as resumes;
use crate::state::AppState;
use crate::storage::local::UPLOADS_ROUTE;

/// Room for the multipart envelope and text fields around the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state
        .config
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let router = Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route(
            "/api/v1/jobs",
            post(jobs::handle_create_job).get(jobs::handle_list_jobs),
        )
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handle_get_job)
                .patch(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        .route("/api/v1/jobs/:id/stats", get(jobs::handle_job_stats))
        .route(
            "/api/v1/jobs/:id/resumes",
            get(jobs::handle_list_job_resumes),
        )
        .route(
            "/api/v1/jobs/:id/resequence",
            post(jobs::handle_resequence_job),
        )
        // Resumes
        .route(
            "/api/v1/resumes",
            post(resumes::handle_upload_resume).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get_resume).delete(resumes::handle_delete_resume),
        )
        .route("/api/v1/resumes/:id/move", post(resumes::handle_move_resume));

    let router = match &state.config.storage {
        StorageConfig::Local { upload_dir, .. } => {
            router.nest_service(UPLOADS_ROUTE, ServeDir::new(upload_dir))
        }
        StorageConfig::S3(_) => router,
    };

    router.with_state(state)
}
