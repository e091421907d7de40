use super::{leaderboard, ScoreRecord, ScoreStore};
use crate::engine::Outcome;
use crate::error::Result;
use chrono::{DateTime, Utc};

/// Stores the result of every finished game for the current player.
#[derive(Debug, Clone)]
pub struct AutoRecorder
{
    store: ScoreStore,
    username: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded
{
    /// Rank of the new record within its game, starting at 1.
    Ranked { rank: usize, total: usize },
    Skipped,
}

impl AutoRecorder
{
    pub fn new(store: ScoreStore, username: impl Into<String>) -> Self
    {
        Self {
            store,
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str
    {
        &self.username
    }

    pub fn record(&self, game: &str, outcome: &Outcome) -> Result<Recorded>
    {
        self.record_at(game, outcome, Utc::now())
    }

    fn record_at(&self, game: &str, outcome: &Outcome, date: DateTime<Utc>) -> Result<Recorded>
    {
        if outcome.score == 0 {
            tracing::debug!(game, "nothing to record");
            return Ok(Recorded::Skipped);
        }

        let record = ScoreRecord {
            username: self.username.clone(),
            score: outcome.score,
            game: game.to_string(),
            date,
        };
        let records = self.store.append(record.clone())?;
        let ranked = leaderboard(&records, Some(game), usize::MAX);
        let rank = ranked
            .iter()
            .position(|candidate| **candidate == record)
            .map_or(ranked.len(), |idx| idx + 1);
        tracing::info!(game, score = outcome.score, rank, player = %self.username, "score recorded");
        Ok(Recorded::Ranked {
            rank,
            total: ranked.len(),
        })
    }

    pub fn describe(recorded: &Recorded) -> String
    {
        match recorded {
            Recorded::Ranked { rank: 1, .. } => "New high score!".to_string(),
            Recorded::Ranked { rank, total } => format!("Saved: rank {rank} of {total}"),
            Recorded::Skipped => "No score to save.".to_string(),
        }
    }
}
