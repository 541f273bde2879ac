//! Prop-pool contests: proposition sheets, outcome resolution, scoring and standings.
//!
//! The scoring core (`resolver`, `scoring`, `leaderboard`) is pure and takes every input as an
//! explicit argument. `loader`, `repository`, `service` and `router` wrap it for file-backed
//! runs and the HTTP API.

pub mod domain;
pub mod leaderboard;
pub mod loader;
pub(crate) mod normalizer;
pub mod proposition;
pub mod repository;
pub mod resolver;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ContestId, Eligibility, OutcomeSnapshot, PickStatus, PropId, PushRule, Submission,
    TiebreakPrediction, TIEBREAK_PICK_KEY,
};
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use loader::{ContestBundle, ContestLoadError};
pub use normalizer::normalize_name;
pub use proposition::{
    ContestSchema, EligibilitySource, PropKind, Proposition, SpreadSide, YesOnlyStakes,
};
pub use repository::{
    ContestRecord, ContestRepository, ContestSettings, LockWindow, OutcomeRecord,
    RepositoryError,
};
pub use resolver::{resolve_outcome, Resolution};
pub use router::{contest_router, OutcomeUpdate, ScoreRequest};
pub use scoring::{
    score_submission, MissingListPolicy, PropScore, ScoreCard, ScoringConfig, ScoringEngine,
    TiebreakDistance,
};
pub use service::{ContestService, ContestServiceError, LeaderboardView, SubmissionReceipt};
