use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ContestId, Eligibility, OutcomeSnapshot, Submission};
use super::proposition::ContestSchema;

/// Stored state of one contest instance.
#[derive(Debug, Clone)]
pub struct ContestRecord {
    pub schema: ContestSchema,
    pub eligibility: Eligibility,
    pub settings: ContestSettings,
    pub outcomes: Option<OutcomeRecord>,
    pub submissions: Vec<Submission>,
}

impl ContestRecord {
    pub fn new(schema: ContestSchema) -> Self {
        Self {
            schema,
            eligibility: Eligibility::default(),
            settings: ContestSettings::default(),
            outcomes: None,
            submissions: Vec::new(),
        }
    }

    pub fn contest_id(&self) -> &ContestId {
        &self.schema.game_id
    }
}

/// Per-contest game configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContestSettings {
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub away_team: Option<String>,
    #[serde(default)]
    pub lock: Option<LockWindow>,
}

/// Submission cut-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockWindow {
    pub enabled: bool,
    pub lock_at: DateTime<Utc>,
}

impl LockWindow {
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.enabled && now >= self.lock_at
    }
}

/// Latest outcome snapshot with provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeRecord {
    pub snapshot: OutcomeSnapshot,
    pub updated_at: DateTime<Utc>,
    pub source: String,
}

/// Storage abstraction so the service can run against memory or a real backend.
pub trait ContestRepository: Send + Sync {
    fn insert_contest(&self, record: ContestRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ContestId) -> Result<Option<ContestRecord>, RepositoryError>;
    /// Fails with [`RepositoryError::Conflict`] when the player name is already taken.
    fn insert_submission(
        &self,
        id: &ContestId,
        submission: Submission,
    ) -> Result<(), RepositoryError>;
    fn record_outcomes(&self, id: &ContestId, outcomes: OutcomeRecord)
        -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
