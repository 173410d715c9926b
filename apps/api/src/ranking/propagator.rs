use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::ranking::manager::{commit, RankManager};
use crate::ranking::plan::{resequence, Standing};
use crate::scoring::calculator::overall_score;
use crate::scoring::Weights;
use crate::store::{JobEdit, JobMutation, RankChange, Rescored, StoreError};

/// Re-weights a job: new overall scores from the stored sub-scores, then a full
/// resequence, committed together with the job's new weights.
#[derive(Clone)]
pub struct JobWeightPropagator {
    ranks: RankManager,
}

impl JobWeightPropagator {
    pub fn new(ranks: RankManager) -> Self {
        Self { ranks }
    }

    /// `details` carries any title/description edit made in the same request, so
    /// the whole edit commits or fails as one.
    pub async fn on_weight_change(
        &self,
        job_id: Uuid,
        weights: Weights,
        details: JobEdit,
    ) -> Result<Vec<ResumeRow>, AppError> {
        let _guard = self.ranks.lock(job_id).await;
        let store = self.ranks.store();

        if store.get_job(job_id).await?.is_none() {
            return Err(StoreError::JobNotFound(job_id).into());
        }
        let rows = store.resumes_by_rank(job_id).await?;
        let scores = rescore(&rows, weights);

        let rows = commit(
            store,
            JobMutation {
                job_id,
                expected_len: rows.len(),
                change: RankChange::Reweight {
                    weights,
                    details,
                    scores,
                },
            },
        )
        .await?;

        info!(
            "Job {job_id} re-weighted to skills={} experience={}, {} resumes rescored",
            weights.skills(),
            weights.experience(),
            rows.len()
        );
        Ok(rows)
    }
}

/// New overall score and rank for every row. Ties keep their current rank order.
fn rescore(rows: &[ResumeRow], weights: Weights) -> Vec<Rescored> {
    let standings: Vec<Standing> = rows
        .iter()
        .map(|r| Standing {
            resume_id: r.id,
            overall_score: overall_score(r.skill_score, r.experience_score, weights),
            rank: r.rank,
        })
        .collect();

    resequence(&standings)
        .into_iter()
        .filter_map(|assignment| {
            standings
                .iter()
                .find(|s| s.resume_id == assignment.resume_id)
                .map(|s| Rescored {
                    resume_id: s.resume_id,
                    overall_score: s.overall_score,
                    rank: assignment.rank,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::ranking::plan::Direction;
    use crate::ranking::JobLocks;
    use crate::store::memory::MemoryStore;
    use crate::store::ScreeningStore;
    use crate::testing::{insert_job, new_resume_with};

    fn propagator() -> (Arc<MemoryStore>, RankManager, JobWeightPropagator) {
        let store = Arc::new(MemoryStore::default());
        let ranks = RankManager::new(store.clone(), JobLocks::default());
        (store, ranks.clone(), JobWeightPropagator::new(ranks))
    }

    #[tokio::test]
    async fn test_weight_change_rescores_and_reorders() {
        let (store, ranks, propagator) = propagator();
        let job = insert_job(&*store, 50).await;
        // skills-heavy: 100*0.5 + 0*0.5 = 50; experience-heavy: 40*0.5 + 100*0.5 = 70
        let skilled = ranks.insert(new_resume_with(job.id, 100, 0, 50)).await.unwrap();
        let seasoned = ranks.insert(new_resume_with(job.id, 40, 100, 70)).await.unwrap();
        assert_eq!(seasoned.rank, 1);

        let rows = propagator
            .on_weight_change(job.id, Weights::from_skills(90).unwrap(), JobEdit::default())
            .await
            .unwrap();

        // 100*0.9 = 90 vs 40*0.9 + 100*0.1 = 46
        assert_eq!(rows[0].id, skilled.id);
        assert_eq!(rows[0].overall_score, 90);
        assert_eq!(rows[1].id, seasoned.id);
        assert_eq!(rows[1].overall_score, 46);

        let job = store.get_job(job.id).await.unwrap().unwrap();
        assert_eq!(job.skills_weight, 90);
        assert_eq!(job.experience_weight, 10);
    }

    #[tokio::test]
    async fn test_ties_keep_current_order() {
        let (store, ranks, propagator) = propagator();
        let job = insert_job(&*store, 50).await;
        let a = ranks.insert(new_resume_with(job.id, 60, 60, 60)).await.unwrap();
        let b = ranks.insert(new_resume_with(job.id, 60, 60, 60)).await.unwrap();
        ranks.move_rank(b.id, Direction::Up).await.unwrap();

        let rows = propagator
            .on_weight_change(job.id, Weights::from_skills(20).unwrap(), JobEdit::default())
            .await
            .unwrap();

        assert_eq!((rows[0].id, rows[1].id), (b.id, a.id));
    }

    #[tokio::test]
    async fn test_failure_leaves_old_weights_and_scores() {
        let (store, ranks, propagator) = propagator();
        let job = insert_job(&*store, 50).await;
        ranks.insert(new_resume_with(job.id, 100, 0, 50)).await.unwrap();
        ranks.insert(new_resume_with(job.id, 40, 100, 70)).await.unwrap();
        let before = store.resumes_by_rank(job.id).await.unwrap();

        store.fail_next_apply();
        let result = propagator
            .on_weight_change(job.id, Weights::from_skills(90).unwrap(), JobEdit::default())
            .await;

        assert!(matches!(result, Err(AppError::Consistency(_))));
        let after = store.resumes_by_rank(job.id).await.unwrap();
        let summary = |rows: &[ResumeRow]| {
            rows.iter()
                .map(|r| (r.id, r.overall_score, r.rank))
                .collect::<Vec<_>>()
        };
        assert_eq!(summary(&after), summary(&before));
        assert_eq!(store.get_job(job.id).await.unwrap().unwrap().skills_weight, 50);
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let (_, _, propagator) = propagator();
        let result = propagator
            .on_weight_change(Uuid::new_v4(), Weights::default(), JobEdit::default())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_empty_job_only_updates_weights() {
        let (store, _, propagator) = propagator();
        let job = insert_job(&*store, 50).await;

        let rows = propagator
            .on_weight_change(job.id, Weights::from_skills(75).unwrap(), JobEdit::default())
            .await
            .unwrap();

        assert!(rows.is_empty());
        assert_eq!(store.get_job(job.id).await.unwrap().unwrap().experience_weight, 25);
    }

    #[tokio::test]
    async fn test_details_commit_with_weights() {
        let (store, _, propagator) = propagator();
        let job = insert_job(&*store, 50).await;
        let edit = JobEdit {
            title: Some("Platform Engineer".to_string()),
            description: None,
        };

        propagator
            .on_weight_change(job.id, Weights::from_skills(60).unwrap(), edit)
            .await
            .unwrap();

        let job = store.get_job(job.id).await.unwrap().unwrap();
        assert_eq!(job.title, "Platform Engineer");
        assert_eq!(job.description, "Python, Docker and AWS");
        assert_eq!(job.skills_weight, 60);
    }
}
