use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Value};

use crate::contest::normalizer::same_name;
use crate::contest::{
    contest_router, ContestId, ContestRecord, ContestRepository, ContestSchema, ContestService,
    ContestSettings, Eligibility, OutcomeRecord, OutcomeSnapshot, Proposition, RepositoryError,
    ScoringConfig, Submission,
};

pub(super) const CONTEST: &str = "lx-2026";

pub(super) fn contest_id() -> ContestId {
    ContestId(CONTEST.to_string())
}

pub(super) fn prop(value: Value) -> Proposition {
    serde_json::from_value(value).expect("proposition parses")
}

pub(super) fn schema_with(props: Value) -> ContestSchema {
    serde_json::from_value(json!({ "gameId": CONTEST, "props": props })).expect("schema parses")
}

pub(super) fn outcomes(value: Value) -> OutcomeSnapshot {
    OutcomeSnapshot::from_value(value)
}

/// Five-question sheet covering the common proposition kinds.
pub(super) fn sample_schema() -> ContestSchema {
    schema_with(json!([
        { "id": "total", "type": "over_under", "line": 45.5, "points": 2, "resultKey": "total_points" },
        { "id": "winner", "type": "team_pick", "options": ["Patriots", "Seahawks"], "points": 3, "resultKey": "final" },
        {
            "id": "spread",
            "type": "spread_pick",
            "points": 3,
            "options": [
                { "team": "Patriots", "spread": -2.5 },
                { "team": "Seahawks", "spread": 2.5 }
            ]
        },
        { "id": "anytime", "type": "player_anytime_td", "points": 4 },
        { "id": "safety", "type": "yes_only_boolean", "pointsCorrectYes": 5, "pointsIncorrectYes": -3 }
    ]))
}

/// Patriots 27, Seahawks 20: Avery 12, Casey 5, Blake 4.
pub(super) fn sample_outcomes() -> OutcomeSnapshot {
    outcomes(json!({
        "final": { "Patriots": 27, "Seahawks": 20 },
        "all_td_scorers": ["Rhamondre Stevenson", "Kenneth Walker III"],
        "safety": false
    }))
}

pub(super) fn avery() -> Submission {
    Submission::new(
        "Avery",
        [
            ("total", "O"),
            ("winner", "Patriots"),
            ("spread", "Patriots"),
            ("anytime", "rhamondre stevenson"),
            ("safety", "NO"),
        ],
    )
    .with_tiebreak(24.0, 17.0)
}

pub(super) fn blake() -> Submission {
    Submission::new(
        "Blake",
        [
            ("total", "U"),
            ("winner", "Patriots"),
            ("spread", "Seahawks"),
            ("anytime", "Kenneth Walker III"),
            ("safety", "YES"),
        ],
    )
    .with_tiebreak(27.0, 20.0)
}

pub(super) fn casey() -> Submission {
    Submission::new(
        "Casey",
        [
            ("total", "Over"),
            ("winner", "Seahawks"),
            ("spread", "Patriots"),
            ("anytime", "Drake Maye"),
            ("safety", " "),
        ],
    )
}

pub(super) fn sample_record() -> ContestRecord {
    ContestRecord {
        schema: sample_schema(),
        eligibility: Eligibility::default(),
        settings: ContestSettings {
            home_team: Some("Patriots".to_string()),
            away_team: Some("Seahawks".to_string()),
            lock: None,
        },
        outcomes: None,
        submissions: Vec::new(),
    }
}

pub(super) fn build_service() -> (ContestService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = ContestService::new(repository.clone(), ScoringConfig::default());
    service
        .register(sample_record())
        .expect("sample contest registers");
    (service, repository)
}

/// Registered sample contest with all three sample players entered.
pub(super) fn seeded_service() -> (ContestService<MemoryRepository>, Arc<MemoryRepository>) {
    let (service, repository) = build_service();
    for submission in [avery(), blake(), casey()] {
        service
            .submit(&contest_id(), submission)
            .expect("sample submission accepted");
    }
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) contests: Arc<Mutex<HashMap<ContestId, ContestRecord>>>,
}

impl ContestRepository for MemoryRepository {
    fn insert_contest(&self, record: ContestRecord) -> Result<(), RepositoryError> {
        let mut guard = self.contests.lock().expect("repository mutex poisoned");
        if guard.contains_key(record.contest_id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.contest_id().clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &ContestId) -> Result<Option<ContestRecord>, RepositoryError> {
        let guard = self.contests.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn insert_submission(
        &self,
        id: &ContestId,
        submission: Submission,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.contests.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if record
            .submissions
            .iter()
            .any(|existing| same_name(&existing.player_name, &submission.player_name))
        {
            return Err(RepositoryError::Conflict);
        }
        record.submissions.push(submission);
        Ok(())
    }

    fn record_outcomes(
        &self,
        id: &ContestId,
        outcomes: OutcomeRecord,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.contests.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.outcomes = Some(outcomes);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl ContestRepository for UnavailableRepository {
    fn insert_contest(&self, _record: ContestRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ContestId) -> Result<Option<ContestRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_submission(
        &self,
        _id: &ContestId,
        _submission: Submission,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn record_outcomes(
        &self,
        _id: &ContestId,
        _outcomes: OutcomeRecord,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn contest_router_with_service(
    service: ContestService<MemoryRepository>,
) -> axum::Router {
    contest_router(Arc::new(service))
}
