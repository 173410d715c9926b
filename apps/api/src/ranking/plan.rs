//! Rank planning: pure functions that turn a job's current standings into the
//! rank assignment an operation should leave behind. Nothing here touches storage;
//! `RankManager` applies the plans atomically.

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::resume::ResumeRow;

/// A resume's position in its job's ranking, as far as ordering is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Standing {
    pub resume_id: Uuid,
    pub overall_score: i32,
    pub rank: i32,
}

impl From<&ResumeRow> for Standing {
    fn from(row: &ResumeRow) -> Self {
        Self {
            resume_id: row.id,
            overall_score: row.overall_score,
            rank: row.rank,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankAssignment {
    pub resume_id: Uuid,
    pub rank: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RankError {
    #[error("Resume is already ranked first")]
    AlreadyFirst,

    #[error("Resume is already ranked last")]
    AlreadyLast,

    #[error("Resume {0} is not ranked in this job")]
    NotRanked(Uuid),

    #[error("Ranks {0:?} are not a dense 1..N sequence")]
    NotDense(Vec<i32>),
}

/// Rank a new entrant takes: below every existing resume scoring at least as
/// high, so among equal scores the newcomer goes last. Existing ranks at or
/// below the returned value shift down by one.
pub fn insertion_rank(standings: &[Standing], overall_score: i32) -> i32 {
    let ahead = standings
        .iter()
        .filter(|s| s.overall_score >= overall_score)
        .count();
    ahead as i32 + 1
}

/// Dense 1..N ranks by descending overall score. Ties keep their current
/// relative order, so resequencing twice changes nothing the second time.
pub fn resequence(standings: &[Standing]) -> Vec<RankAssignment> {
    let mut ordered = standings.to_vec();
    ordered.sort_by(|a, b| {
        b.overall_score
            .cmp(&a.overall_score)
            .then(a.rank.cmp(&b.rank))
    });
    ordered
        .iter()
        .enumerate()
        .map(|(i, s)| RankAssignment {
            resume_id: s.resume_id,
            rank: i as i32 + 1,
        })
        .collect()
}

/// One-step manual move: swap ranks with the neighbour above or below.
/// Ignores scores entirely.
pub fn move_plan(
    standings: &[Standing],
    resume_id: Uuid,
    direction: Direction,
) -> Result<[RankAssignment; 2], RankError> {
    let current = standings
        .iter()
        .find(|s| s.resume_id == resume_id)
        .ok_or(RankError::NotRanked(resume_id))?;

    let target_rank = match direction {
        Direction::Up if current.rank <= 1 => return Err(RankError::AlreadyFirst),
        Direction::Down if current.rank as usize >= standings.len() => {
            return Err(RankError::AlreadyLast)
        }
        Direction::Up => current.rank - 1,
        Direction::Down => current.rank + 1,
    };

    let neighbour = standings
        .iter()
        .find(|s| s.rank == target_rank)
        .ok_or_else(|| RankError::NotDense(ranks_of(standings)))?;

    Ok([
        RankAssignment {
            resume_id: current.resume_id,
            rank: neighbour.rank,
        },
        RankAssignment {
            resume_id: neighbour.resume_id,
            rank: current.rank,
        },
    ])
}

/// Checks that `ranks` is exactly {1, ..., N}.
pub fn verify_dense(ranks: impl IntoIterator<Item = i32>) -> Result<(), RankError> {
    let mut sorted: Vec<i32> = ranks.into_iter().collect();
    sorted.sort_unstable();
    let dense = sorted
        .iter()
        .enumerate()
        .all(|(i, &rank)| rank == i as i32 + 1);
    if dense {
        Ok(())
    } else {
        Err(RankError::NotDense(sorted))
    }
}

fn ranks_of(standings: &[Standing]) -> Vec<i32> {
    let mut ranks: Vec<i32> = standings.iter().map(|s| s.rank).collect();
    ranks.sort_unstable();
    ranks
}
