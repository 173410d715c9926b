//! In-memory `ScreeningStore` for tests. `apply` works on a copy of the state and
//! swaps it in only if every step (including the rank uniqueness check) succeeds,
//! mirroring a rolled-back transaction.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::job::{JobRow, NewJob};
use crate::models::resume::{NewResume, ResumeRow};
use crate::ranking::plan::{verify_dense, RankAssignment};
use crate::store::{JobMutation, RankChange, ScreeningStore, StoreError};

#[derive(Default, Clone)]
struct Tables {
    jobs: HashMap<Uuid, JobRow>,
    resumes: HashMap<Uuid, ResumeRow>,
}

impl Tables {
    fn job_resumes(&self, job_id: Uuid) -> Vec<ResumeRow> {
        let mut rows: Vec<ResumeRow> = self
            .resumes
            .values()
            .filter(|r| r.job_id == job_id)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.rank);
        rows
    }

    fn reassign(&mut self, job_id: Uuid, ranks: &[RankAssignment]) -> Result<(), StoreError> {
        for assignment in ranks {
            match self.resumes.get_mut(&assignment.resume_id) {
                Some(row) if row.job_id == job_id => row.rank = assignment.rank,
                _ => {
                    return Err(StoreError::PartialUpdate {
                        job_id,
                        planned: ranks.len(),
                        touched: 0,
                    })
                }
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_next_apply: AtomicBool,
}

impl MemoryStore {
    /// Makes the next `apply` fail as a dropped connection would, leaving state untouched.
    pub fn fail_next_apply(&self) {
        self.fail_next_apply.store(true, Ordering::SeqCst);
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn row_from_new(resume: NewResume, rank: i32) -> ResumeRow {
    let now = Utc::now();
    ResumeRow {
        id: resume.id,
        job_id: resume.job_id,
        name: resume.name,
        position: resume.position,
        file_name: resume.file_name,
        file_key: resume.file_key,
        file_url: resume.file_url,
        skill_score: resume.skill_score,
        experience_score: resume.experience_score,
        overall_score: resume.overall_score,
        skill_description: resume.skill_description,
        experience_description: resume.experience_description,
        summary: resume.summary,
        matched_skills: resume.matched_skills,
        experience_months: resume.experience_months,
        rank,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl ScreeningStore for MemoryStore {
    async fn insert_job(&self, job: NewJob) -> Result<JobRow, StoreError> {
        let row = JobRow {
            id: job.id,
            user_id: job.user_id,
            title: job.title,
            description: job.description,
            skills_weight: job.weights.skills(),
            experience_weight: job.weights.experience(),
            created_at: Utc::now(),
        };
        self.tables().jobs.insert(row.id, row.clone());
        Ok(row)
    }

    async fn list_jobs(&self, user_id: Uuid) -> Result<Vec<JobRow>, StoreError> {
        let mut jobs: Vec<JobRow> = self
            .tables()
            .jobs
            .values()
            .filter(|j| j.user_id == user_id)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    async fn get_job(&self, job_id: Uuid) -> Result<Option<JobRow>, StoreError> {
        Ok(self.tables().jobs.get(&job_id).cloned())
    }

    async fn update_job_details(
        &self,
        job_id: Uuid,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<Option<JobRow>, StoreError> {
        let mut tables = self.tables();
        let Some(job) = tables.jobs.get_mut(&job_id) else {
            return Ok(None);
        };
        if let Some(title) = title {
            job.title = title;
        }
        if let Some(description) = description {
            job.description = description;
        }
        Ok(Some(job.clone()))
    }

    async fn delete_job(&self, job_id: Uuid) -> Result<Option<Vec<ResumeRow>>, StoreError> {
        let mut tables = self.tables();
        if tables.jobs.remove(&job_id).is_none() {
            return Ok(None);
        }
        let removed = tables.job_resumes(job_id);
        tables.resumes.retain(|_, r| r.job_id != job_id);
        Ok(Some(removed))
    }

    async fn get_resume(&self, resume_id: Uuid) -> Result<Option<ResumeRow>, StoreError> {
        Ok(self.tables().resumes.get(&resume_id).cloned())
    }

    async fn resumes_by_rank(&self, job_id: Uuid) -> Result<Vec<ResumeRow>, StoreError> {
        Ok(self.tables().job_resumes(job_id))
    }

    async fn resumes_by_score(&self, job_id: Uuid) -> Result<Vec<ResumeRow>, StoreError> {
        let mut rows = self.tables().job_resumes(job_id);
        rows.sort_by(|a, b| {
            b.overall_score
                .cmp(&a.overall_score)
                .then(a.rank.cmp(&b.rank))
        });
        Ok(rows)
    }

    async fn apply(&self, mutation: JobMutation) -> Result<Vec<ResumeRow>, StoreError> {
        let JobMutation {
            job_id,
            expected_len,
            change,
        } = mutation;

        let mut tables = self.tables();

        if self.fail_next_apply.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        if !tables.jobs.contains_key(&job_id) {
            return Err(StoreError::JobNotFound(job_id));
        }
        let found = tables.job_resumes(job_id).len();
        if found != expected_len {
            return Err(StoreError::StalePlan {
                job_id,
                expected: expected_len,
                found,
            });
        }

        let mut working = tables.clone();
        match change {
            RankChange::Insert { resume, rank } => {
                for row in working.resumes.values_mut() {
                    if row.job_id == job_id && row.rank >= rank {
                        row.rank += 1;
                    }
                }
                working.resumes.insert(resume.id, row_from_new(resume, rank));
            }
            RankChange::Reassign { ranks } => working.reassign(job_id, &ranks)?,
            RankChange::Remove { resume_id, ranks } => {
                match working.resumes.get(&resume_id) {
                    Some(row) if row.job_id == job_id => {}
                    _ => return Err(StoreError::ResumeNotFound(resume_id)),
                }
                working.resumes.remove(&resume_id);
                working.reassign(job_id, &ranks)?;
            }
            RankChange::Reweight {
                weights,
                details,
                scores,
            } => {
                if let Some(job) = working.jobs.get_mut(&job_id) {
                    job.skills_weight = weights.skills();
                    job.experience_weight = weights.experience();
                    if let Some(title) = details.title {
                        job.title = title;
                    }
                    if let Some(description) = details.description {
                        job.description = description;
                    }
                }
                for rescored in &scores {
                    match working.resumes.get_mut(&rescored.resume_id) {
                        Some(row) if row.job_id == job_id => {
                            row.overall_score = rescored.overall_score;
                            row.rank = rescored.rank;
                        }
                        _ => {
                            return Err(StoreError::PartialUpdate {
                                job_id,
                                planned: scores.len(),
                                touched: 0,
                            })
                        }
                    }
                }
            }
        }

        let rows = working.job_resumes(job_id);
        if verify_dense(rows.iter().map(|r| r.rank)).is_err() {
            return Err(StoreError::RankConflict(job_id));
        }

        *tables = working;
        Ok(rows)
    }
}
