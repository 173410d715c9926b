use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::models::job::{JobRow, NewJob};
use crate::models::resume::{NewResume, ResumeRow};
use crate::ranking::plan::RankAssignment;
use crate::store::{JobMutation, RankChange, Rescored, ScreeningStore, StoreError};

const RANK_UNIQUE_CONSTRAINT: &str = "resumes_job_rank_unique";

/// `ScreeningStore` over the `jobs` / `resumes` tables.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScreeningStore for PgStore {
    async fn insert_job(&self, job: NewJob) -> Result<JobRow, StoreError> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs (id, user_id, title, description, skills_weight, experience_weight)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(job.id)
        .bind(job.user_id)
        .bind(job.title)
        .bind(job.description)
        .bind(job.weights.skills())
        .bind(job.weights.experience())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_jobs(&self, user_id: Uuid) -> Result<Vec<JobRow>, StoreError> {
        Ok(sqlx::query_as::<_, JobRow>(
            "SELECT * FROM jobs WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_job(&self, job_id: Uuid) -> Result<Option<JobRow>, StoreError> {
        Ok(sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_job_details(
        &self,
        job_id: Uuid,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<Option<JobRow>, StoreError> {
        Ok(sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs
            SET title = COALESCE($2, title),
                description = COALESCE($3, description)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(job_id)
        .bind(title)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_job(&self, job_id: Uuid) -> Result<Option<Vec<ResumeRow>>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE job_id = $1 ORDER BY rank ASC",
        )
        .bind(job_id)
        .fetch_all(&mut *tx)
        .await?;

        // resumes go with the job via ON DELETE CASCADE
        let deleted = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(job_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Ok(None);
        }

        tx.commit().await?;
        info!("Deleted job {job_id} with {} resumes", removed.len());
        Ok(Some(removed))
    }

    async fn get_resume(&self, resume_id: Uuid) -> Result<Option<ResumeRow>, StoreError> {
        Ok(sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
            .bind(resume_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn resumes_by_rank(&self, job_id: Uuid) -> Result<Vec<ResumeRow>, StoreError> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE job_id = $1 ORDER BY rank ASC",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn resumes_by_score(&self, job_id: Uuid) -> Result<Vec<ResumeRow>, StoreError> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE job_id = $1 ORDER BY overall_score DESC, rank ASC",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn apply(&self, mutation: JobMutation) -> Result<Vec<ResumeRow>, StoreError> {
        let JobMutation {
            job_id,
            expected_len,
            change,
        } = mutation;

        let mut tx = self.pool.begin().await?;

        // Row lock on the job serializes rank writers across processes.
        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM jobs WHERE id = $1 FOR UPDATE")
                .bind(job_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(StoreError::JobNotFound(job_id));
        }

        let found: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resumes WHERE job_id = $1")
            .bind(job_id)
            .fetch_one(&mut *tx)
            .await?;
        if found as usize != expected_len {
            return Err(StoreError::StalePlan {
                job_id,
                expected: expected_len,
                found: found as usize,
            });
        }

        match change {
            RankChange::Insert { resume, rank } => {
                sqlx::query(
                    "UPDATE resumes SET rank = rank + 1, updated_at = NOW() WHERE job_id = $1 AND rank >= $2",
                )
                .bind(job_id)
                .bind(rank)
                .execute(&mut *tx)
                .await?;
                insert_resume(&mut tx, resume, rank).await?;
            }
            RankChange::Reassign { ranks } => {
                reassign_ranks(&mut tx, job_id, &ranks).await?;
            }
            RankChange::Remove { resume_id, ranks } => {
                let deleted = sqlx::query("DELETE FROM resumes WHERE id = $1 AND job_id = $2")
                    .bind(resume_id)
                    .bind(job_id)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected();
                if deleted != 1 {
                    return Err(StoreError::ResumeNotFound(resume_id));
                }
                reassign_ranks(&mut tx, job_id, &ranks).await?;
            }
            RankChange::Reweight {
                weights,
                details,
                scores,
            } => {
                sqlx::query(
                    r#"
                    UPDATE jobs
                    SET skills_weight = $2,
                        experience_weight = $3,
                        title = COALESCE($4, title),
                        description = COALESCE($5, description)
                    WHERE id = $1
                    "#,
                )
                .bind(job_id)
                .bind(weights.skills())
                .bind(weights.experience())
                .bind(details.title)
                .bind(details.description)
                .execute(&mut *tx)
                .await?;
                rescore_resumes(&mut tx, job_id, &scores).await?;
            }
        }

        let rows = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE job_id = $1 ORDER BY rank ASC",
        )
        .bind(job_id)
        .fetch_all(&mut *tx)
        .await?;

        // The (job_id, rank) uniqueness check is deferred to here.
        tx.commit()
            .await
            .map_err(|e| rank_conflict_or_database(e, job_id))?;

        Ok(rows)
    }
}

async fn insert_resume(
    conn: &mut PgConnection,
    resume: NewResume,
    rank: i32,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO resumes
            (id, job_id, name, position, file_name, file_key, file_url,
             skill_score, experience_score, overall_score,
             skill_description, experience_description, summary,
             matched_skills, experience_months, rank)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        "#,
    )
    .bind(resume.id)
    .bind(resume.job_id)
    .bind(resume.name)
    .bind(resume.position)
    .bind(resume.file_name)
    .bind(resume.file_key)
    .bind(resume.file_url)
    .bind(resume.skill_score)
    .bind(resume.experience_score)
    .bind(resume.overall_score)
    .bind(resume.skill_description)
    .bind(resume.experience_description)
    .bind(resume.summary)
    .bind(resume.matched_skills)
    .bind(resume.experience_months)
    .bind(rank)
    .execute(conn)
    .await?;
    Ok(())
}

/// Single batched UPDATE for a whole rank assignment.
async fn reassign_ranks(
    conn: &mut PgConnection,
    job_id: Uuid,
    ranks: &[RankAssignment],
) -> Result<(), StoreError> {
    if ranks.is_empty() {
        return Ok(());
    }
    let ids: Vec<Uuid> = ranks.iter().map(|a| a.resume_id).collect();
    let new_ranks: Vec<i32> = ranks.iter().map(|a| a.rank).collect();

    let touched = sqlx::query(
        r#"
        UPDATE resumes AS r
        SET rank = v.rank, updated_at = NOW()
        FROM UNNEST($2::uuid[], $3::int4[]) AS v(id, rank)
        WHERE r.id = v.id AND r.job_id = $1
        "#,
    )
    .bind(job_id)
    .bind(ids)
    .bind(new_ranks)
    .execute(conn)
    .await?
    .rows_affected() as usize;

    if touched != ranks.len() {
        return Err(StoreError::PartialUpdate {
            job_id,
            planned: ranks.len(),
            touched,
        });
    }
    Ok(())
}

async fn rescore_resumes(
    conn: &mut PgConnection,
    job_id: Uuid,
    scores: &[Rescored],
) -> Result<(), StoreError> {
    if scores.is_empty() {
        return Ok(());
    }
    let ids: Vec<Uuid> = scores.iter().map(|s| s.resume_id).collect();
    let overall: Vec<i32> = scores.iter().map(|s| s.overall_score).collect();
    let ranks: Vec<i32> = scores.iter().map(|s| s.rank).collect();

    let touched = sqlx::query(
        r#"
        UPDATE resumes AS r
        SET overall_score = v.overall_score, rank = v.rank, updated_at = NOW()
        FROM UNNEST($2::uuid[], $3::int4[], $4::int4[]) AS v(id, overall_score, rank)
        WHERE r.id = v.id AND r.job_id = $1
        "#,
    )
    .bind(job_id)
    .bind(ids)
    .bind(overall)
    .bind(ranks)
    .execute(conn)
    .await?
    .rows_affected() as usize;

    if touched != scores.len() {
        return Err(StoreError::PartialUpdate {
            job_id,
            planned: scores.len(),
            touched,
        });
    }
    Ok(())
}

fn rank_conflict_or_database(e: sqlx::Error, job_id: Uuid) -> StoreError {
    let is_rank_conflict = e
        .as_database_error()
        .and_then(|db| db.constraint())
        .is_some_and(|name| name == RANK_UNIQUE_CONSTRAINT);
    if is_rank_conflict {
        StoreError::RankConflict(job_id)
    } else {
        StoreError::Database(e)
    }
}
