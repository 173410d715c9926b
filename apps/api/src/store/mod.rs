//! Persistence collaborator.
//!
//! Handlers and the rank manager only see `ScreeningStore`; `AppState` carries it
//! as `Arc<dyn ScreeningStore>`. Every change to a job's rank order goes through
//! `apply`, which must commit all of it or none of it.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::job::{JobRow, NewJob};
use crate::models::resume::{NewResume, ResumeRow};
use crate::ranking::plan::RankAssignment;
use crate::scoring::Weights;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Job {0} not found")]
    JobNotFound(Uuid),

    #[error("Resume {0} not found")]
    ResumeNotFound(Uuid),

    #[error("Job {job_id} changed while planning: expected {expected} resumes, found {found}")]
    StalePlan {
        job_id: Uuid,
        expected: usize,
        found: usize,
    },

    #[error("Rank update for job {job_id} matched {touched} of {planned} resumes")]
    PartialUpdate {
        job_id: Uuid,
        planned: usize,
        touched: usize,
    },

    #[error("Rank assignment for job {0} would duplicate a rank")]
    RankConflict(Uuid),
}

/// Title/description edits committed together with a weight change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobEdit {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// New overall score and rank for one resume after a weight change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rescored {
    pub resume_id: Uuid,
    pub overall_score: i32,
    pub rank: i32,
}

#[derive(Debug, Clone)]
pub enum RankChange {
    /// Shift ranks >= `rank` down by one, then insert at `rank`.
    Insert { resume: NewResume, rank: i32 },
    /// Overwrite the listed ranks; unlisted resumes keep theirs.
    Reassign { ranks: Vec<RankAssignment> },
    /// Delete one resume and rank the rest as listed.
    Remove {
        resume_id: Uuid,
        ranks: Vec<RankAssignment>,
    },
    /// Store new weights (plus any title/description edit) on the job and new
    /// overall scores and ranks on every resume.
    Reweight {
        weights: Weights,
        details: JobEdit,
        scores: Vec<Rescored>,
    },
}

/// A planned change to one job's resume set, computed from `expected_len` resumes.
/// Stores reject it if the job no longer holds that many.
#[derive(Debug, Clone)]
pub struct JobMutation {
    pub job_id: Uuid,
    pub expected_len: usize,
    pub change: RankChange,
}

impl JobMutation {
    /// Compact description for logs: operation plus every planned `resume→rank`.
    pub fn describe(&self) -> String {
        let assignments = |ranks: &[RankAssignment]| {
            ranks
                .iter()
                .map(|a| format!("{}→{}", a.resume_id, a.rank))
                .collect::<Vec<_>>()
                .join(", ")
        };
        match &self.change {
            RankChange::Insert { resume, rank } => format!(
                "insert {} (overall {}) at rank {rank}",
                resume.id, resume.overall_score
            ),
            RankChange::Reassign { ranks } => format!("reassign [{}]", assignments(ranks)),
            RankChange::Remove { resume_id, ranks } => {
                format!("remove {resume_id}, reassign [{}]", assignments(ranks))
            }
            RankChange::Reweight { weights, scores, .. } => format!(
                "reweight skills={} experience={} [{}]",
                weights.skills(),
                weights.experience(),
                scores
                    .iter()
                    .map(|s| format!("{}→{} ({})", s.resume_id, s.rank, s.overall_score))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

#[async_trait]
pub trait ScreeningStore: Send + Sync {
    async fn insert_job(&self, job: NewJob) -> Result<JobRow, StoreError>;

    /// Jobs owned by `user_id`, newest first.
    async fn list_jobs(&self, user_id: Uuid) -> Result<Vec<JobRow>, StoreError>;

    async fn get_job(&self, job_id: Uuid) -> Result<Option<JobRow>, StoreError>;

    /// Edits title and/or description. Weights only change through `apply`.
    async fn update_job_details(
        &self,
        job_id: Uuid,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<Option<JobRow>, StoreError>;

    /// Deletes the job and all its resumes. Returns the removed resumes,
    /// or `None` if the job did not exist.
    async fn delete_job(&self, job_id: Uuid) -> Result<Option<Vec<ResumeRow>>, StoreError>;

    async fn get_resume(&self, resume_id: Uuid) -> Result<Option<ResumeRow>, StoreError>;

    async fn resumes_by_rank(&self, job_id: Uuid) -> Result<Vec<ResumeRow>, StoreError>;

    /// Overall score descending, current rank breaking ties.
    async fn resumes_by_score(&self, job_id: Uuid) -> Result<Vec<ResumeRow>, StoreError>;

    /// Applies a rank change atomically and returns the job's resumes by rank.
    async fn apply(&self, mutation: JobMutation) -> Result<Vec<ResumeRow>, StoreError>;
}
