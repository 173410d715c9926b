use std::sync::Arc;

use tokio::sync::OwnedMutexGuard;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{NewResume, ResumeRow};
use crate::ranking::locks::JobLocks;
use crate::ranking::plan::{
    insertion_rank, move_plan, resequence, verify_dense, Direction, Standing,
};
use crate::scoring::calculator::overall_score;
use crate::store::{JobMutation, RankChange, ScreeningStore, StoreError};

/// Owns every rank change. Each operation holds the job's lock while it reads the
/// current standings, plans, and applies the plan as a single store mutation.
#[derive(Clone)]
pub struct RankManager {
    store: Arc<dyn ScreeningStore>,
    locks: JobLocks,
}

impl RankManager {
    pub fn new(store: Arc<dyn ScreeningStore>, locks: JobLocks) -> Self {
        Self { store, locks }
    }

    pub(crate) fn store(&self) -> &dyn ScreeningStore {
        self.store.as_ref()
    }

    pub(crate) async fn lock(&self, job_id: Uuid) -> OwnedMutexGuard<()> {
        self.locks.acquire(job_id).await
    }

    /// Inserts a scored resume below every existing resume scoring at least as high.
    /// The overall score is recomputed under the lock from the job's current weights,
    /// so an upload racing a weight change still lands consistently.
    pub async fn insert(&self, mut resume: NewResume) -> Result<ResumeRow, AppError> {
        let job_id = resume.job_id;
        let resume_id = resume.id;
        let _guard = self.lock(job_id).await;

        let job = self
            .store
            .get_job(job_id)
            .await?
            .ok_or(StoreError::JobNotFound(job_id))?;
        resume.overall_score =
            overall_score(resume.skill_score, resume.experience_score, job.weights());

        let standings = self.standings(job_id).await?;
        let rank = insertion_rank(&standings, resume.overall_score);

        let rows = commit(
            self.store(),
            JobMutation {
                job_id,
                expected_len: standings.len(),
                change: RankChange::Insert { resume, rank },
            },
        )
        .await?;
        find_row(rows, job_id, resume_id)
    }

    /// Re-derives every rank in the job from overall scores, discarding manual moves.
    pub async fn resequence(&self, job_id: Uuid) -> Result<Vec<ResumeRow>, AppError> {
        let _guard = self.lock(job_id).await;

        let standings = self.standings(job_id).await?;
        commit(
            self.store(),
            JobMutation {
                job_id,
                expected_len: standings.len(),
                change: RankChange::Reassign {
                    ranks: resequence(&standings),
                },
            },
        )
        .await
    }

    /// Swaps the resume with its neighbour one step up or down.
    pub async fn move_rank(
        &self,
        resume_id: Uuid,
        direction: Direction,
    ) -> Result<ResumeRow, AppError> {
        let job_id = self.job_of(resume_id).await?;
        let _guard = self.lock(job_id).await;

        let standings = self.standings(job_id).await?;
        let swap = move_plan(&standings, resume_id, direction)?;

        let rows = commit(
            self.store(),
            JobMutation {
                job_id,
                expected_len: standings.len(),
                change: RankChange::Reassign {
                    ranks: swap.to_vec(),
                },
            },
        )
        .await?;
        find_row(rows, job_id, resume_id)
    }

    /// Deletes a resume and resequences what remains. Returns the deleted row.
    pub async fn remove(&self, resume_id: Uuid) -> Result<ResumeRow, AppError> {
        let job_id = self.job_of(resume_id).await?;
        let _guard = self.lock(job_id).await;

        let rows = self.store.resumes_by_rank(job_id).await?;
        let Some(removed) = rows.iter().find(|r| r.id == resume_id).cloned() else {
            return Err(StoreError::ResumeNotFound(resume_id).into());
        };
        let remaining: Vec<Standing> = rows
            .iter()
            .filter(|r| r.id != resume_id)
            .map(Standing::from)
            .collect();

        commit(
            self.store(),
            JobMutation {
                job_id,
                expected_len: rows.len(),
                change: RankChange::Remove {
                    resume_id,
                    ranks: resequence(&remaining),
                },
            },
        )
        .await?;
        Ok(removed)
    }

    /// Deletes a job with all its resumes. Returns the removed resumes so their
    /// files can be cleaned up.
    pub async fn remove_job(&self, job_id: Uuid) -> Result<Vec<ResumeRow>, AppError> {
        let removed = {
            let _guard = self.lock(job_id).await;
            self.store
                .delete_job(job_id)
                .await?
                .ok_or(StoreError::JobNotFound(job_id))?
        };
        self.locks.forget(job_id);
        Ok(removed)
    }

    async fn job_of(&self, resume_id: Uuid) -> Result<Uuid, AppError> {
        self.store
            .get_resume(resume_id)
            .await?
            .map(|r| r.job_id)
            .ok_or_else(|| StoreError::ResumeNotFound(resume_id).into())
    }

    async fn standings(&self, job_id: Uuid) -> Result<Vec<Standing>, AppError> {
        let rows = self.store.resumes_by_rank(job_id).await?;
        Ok(rows.iter().map(Standing::from).collect())
    }
}

/// Applies one planned mutation and checks the result is still a dense ranking.
/// Failures are logged with the job and the attempted assignment.
pub(crate) async fn commit(
    store: &dyn ScreeningStore,
    mutation: JobMutation,
) -> Result<Vec<ResumeRow>, AppError> {
    let job_id = mutation.job_id;
    let attempted = mutation.describe();

    let rows = match store.apply(mutation).await {
        Ok(rows) => rows,
        Err(e @ (StoreError::JobNotFound(_) | StoreError::ResumeNotFound(_))) => {
            return Err(e.into())
        }
        Err(e) => {
            error!("Rank update for job {job_id} rolled back ({attempted}): {e}");
            return Err(AppError::Consistency(format!("job {job_id}: {e}")));
        }
    };

    if let Err(e) = verify_dense(rows.iter().map(|r| r.rank)) {
        error!("Job {job_id} left with broken ranks after {attempted}: {e}");
        return Err(e.into());
    }

    info!("Job {job_id}: {attempted}");
    Ok(rows)
}

fn find_row(rows: Vec<ResumeRow>, job_id: Uuid, resume_id: Uuid) -> Result<ResumeRow, AppError> {
    rows.into_iter().find(|r| r.id == resume_id).ok_or_else(|| {
        AppError::Consistency(format!(
            "resume {resume_id} missing from job {job_id} after rank update"
        ))
    })
}
