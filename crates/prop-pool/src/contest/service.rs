use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::domain::{ContestId, OutcomeSnapshot, Submission};
use super::leaderboard::{Leaderboard, LeaderboardEntry};
use super::normalizer::same_name;
use super::repository::{ContestRecord, ContestRepository, OutcomeRecord, RepositoryError};
use super::scoring::{ScoreCard, ScoringConfig, ScoringEngine};

/// Service composing the contest repository with the scoring engine.
pub struct ContestService<R> {
    repository: Arc<R>,
    config: ScoringConfig,
}

impl<R> ContestService<R>
where
    R: ContestRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: ScoringConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn register(&self, record: ContestRecord) -> Result<(), ContestServiceError> {
        let contest_id = record.contest_id().clone();
        self.repository.insert_contest(record)?;
        info!(contest = %contest_id, "contest registered");
        Ok(())
    }

    pub fn submit(
        &self,
        contest_id: &ContestId,
        submission: Submission,
    ) -> Result<SubmissionReceipt, ContestServiceError> {
        self.submit_at(contest_id, submission, Utc::now())
    }

    /// Store a submission as of `now`, enforcing the lock window and one entry per name.
    pub fn submit_at(
        &self,
        contest_id: &ContestId,
        mut submission: Submission,
        now: DateTime<Utc>,
    ) -> Result<SubmissionReceipt, ContestServiceError> {
        let record = self.contest(contest_id)?;

        if let Some(lock) = record.settings.lock {
            if lock.is_locked(now) {
                return Err(ContestServiceError::Locked(lock.lock_at));
            }
        }

        let player_name = submission.player_name.trim().to_string();
        if player_name.is_empty() {
            return Err(ContestServiceError::MissingPlayerName);
        }
        if record
            .submissions
            .iter()
            .any(|existing| same_name(&existing.player_name, &player_name))
        {
            return Err(ContestServiceError::DuplicatePlayer(player_name));
        }

        submission.player_name = player_name.clone();
        let picks = submission.picks.len();
        match self.repository.insert_submission(contest_id, submission) {
            Ok(()) => {}
            Err(RepositoryError::Conflict) => {
                return Err(ContestServiceError::DuplicatePlayer(player_name))
            }
            Err(other) => return Err(other.into()),
        }

        info!(contest = %contest_id, player = %player_name, picks, "submission stored");

        Ok(SubmissionReceipt {
            contest_id: contest_id.clone(),
            player_name,
            picks,
            submitted_at: now,
        })
    }

    /// Replace the outcome snapshot; later scoring calls read the new snapshot as a whole.
    pub fn record_outcomes(
        &self,
        contest_id: &ContestId,
        snapshot: OutcomeSnapshot,
        source: impl Into<String>,
    ) -> Result<OutcomeRecord, ContestServiceError> {
        let outcomes = OutcomeRecord {
            snapshot,
            updated_at: Utc::now(),
            source: source.into(),
        };

        match self.repository.record_outcomes(contest_id, outcomes.clone()) {
            Ok(()) => {}
            Err(RepositoryError::NotFound) => {
                return Err(ContestServiceError::ContestNotFound(contest_id.clone()))
            }
            Err(other) => return Err(other.into()),
        }

        info!(contest = %contest_id, source = %outcomes.source, "outcomes recorded");
        Ok(outcomes)
    }

    pub fn score_player(
        &self,
        contest_id: &ContestId,
        player_name: &str,
    ) -> Result<ScoreCard, ContestServiceError> {
        let record = self.contest(contest_id)?;
        let submission = record
            .submissions
            .iter()
            .find(|submission| same_name(&submission.player_name, player_name))
            .ok_or_else(|| ContestServiceError::PlayerNotFound(player_name.trim().to_string()))?;

        let outcomes = record.outcomes.as_ref().map(|outcomes| &outcomes.snapshot);

        Ok(self.engine_for(&record).score_latest(
            submission,
            &record.schema,
            outcomes,
            &record.eligibility,
        ))
    }

    /// Ranked standings, or an unscored view while no outcome snapshot exists.
    pub fn leaderboard(
        &self,
        contest_id: &ContestId,
    ) -> Result<LeaderboardView, ContestServiceError> {
        let record = self.contest(contest_id)?;

        let Some(outcomes) = &record.outcomes else {
            return Ok(LeaderboardView {
                contest_id: contest_id.clone(),
                scored: false,
                outcomes_updated_at: None,
                outcomes_source: None,
                entries: Vec::new(),
            });
        };

        let engine = self.engine_for(&record);
        let cards: Vec<ScoreCard> = record
            .submissions
            .iter()
            .map(|submission| {
                engine.score(
                    submission,
                    &record.schema,
                    &outcomes.snapshot,
                    &record.eligibility,
                )
            })
            .collect();

        Ok(LeaderboardView {
            contest_id: contest_id.clone(),
            scored: true,
            outcomes_updated_at: Some(outcomes.updated_at),
            outcomes_source: Some(outcomes.source.clone()),
            entries: Leaderboard::rank(&cards).entries,
        })
    }

    fn contest(&self, contest_id: &ContestId) -> Result<ContestRecord, ContestServiceError> {
        self.repository
            .fetch(contest_id)?
            .ok_or_else(|| ContestServiceError::ContestNotFound(contest_id.clone()))
    }

    /// Contest settings fill in team names the service-wide configuration leaves unset.
    fn engine_for(&self, record: &ContestRecord) -> ScoringEngine {
        let mut config = self.config.clone();
        if config.home_team.is_none() || config.away_team.is_none() {
            config.home_team = record.settings.home_team.clone();
            config.away_team = record.settings.away_team.clone();
        }
        ScoringEngine::new(config)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub contest_id: ContestId,
    pub player_name: String,
    pub picks: usize,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardView {
    pub contest_id: ContestId,
    pub scored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcomes_updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcomes_source: Option<String>,
    pub entries: Vec<LeaderboardEntry>,
}

/// Error raised by the contest service.
#[derive(Debug, thiserror::Error)]
pub enum ContestServiceError {
    #[error("contest {0} not found")]
    ContestNotFound(ContestId),
    #[error("no submission found for {0}")]
    PlayerNotFound(String),
    #[error("{0} already submitted picks for this contest")]
    DuplicatePlayer(String),
    #[error("picks locked at {0}")]
    Locked(DateTime<Utc>),
    #[error("player name is required")]
    MissingPlayerName,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
