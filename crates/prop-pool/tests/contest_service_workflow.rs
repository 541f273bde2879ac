//! End-to-end checks for a contest driven through the public service facade and HTTP router.

mod common {
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use prop_pool::contest::{
        normalize_name, ContestBundle, ContestId, ContestRecord, ContestRepository,
        ContestService, ContestSettings, OutcomeRecord, RepositoryError, ScoringConfig,
        Submission,
    };

    pub(super) fn bundle() -> ContestBundle {
        ContestBundle::from_dir(Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/super-bowl-lx"))
            .expect("fixture loads")
    }

    pub(super) fn contest_id() -> ContestId {
        ContestId("super-bowl-lx".to_string())
    }

    #[derive(Default)]
    pub(super) struct Repository {
        contests: Mutex<HashMap<ContestId, ContestRecord>>,
    }

    impl ContestRepository for Repository {
        fn insert_contest(&self, record: ContestRecord) -> Result<(), RepositoryError> {
            let mut guard = self.contests.lock().expect("repository mutex");
            if guard.contains_key(record.contest_id()) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(record.contest_id().clone(), record);
            Ok(())
        }

        fn fetch(&self, id: &ContestId) -> Result<Option<ContestRecord>, RepositoryError> {
            Ok(self.contests.lock().expect("repository mutex").get(id).cloned())
        }

        fn insert_submission(
            &self,
            id: &ContestId,
            submission: Submission,
        ) -> Result<(), RepositoryError> {
            let mut guard = self.contests.lock().expect("repository mutex");
            let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
            let name = normalize_name(&submission.player_name);
            if record
                .submissions
                .iter()
                .any(|existing| normalize_name(&existing.player_name) == name)
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
            let mut guard = self.contests.lock().expect("repository mutex");
            let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
            record.outcomes = Some(outcomes);
            Ok(())
        }
    }

    /// Fixture contest registered with its submissions entered and no outcomes yet.
    pub(super) fn build_service() -> Arc<ContestService<Repository>> {
        let bundle = bundle();
        let service = ContestService::new(Arc::new(Repository::default()), ScoringConfig::default());

        let mut record = ContestRecord::new(bundle.schema.clone());
        record.eligibility = bundle.eligibility.clone();
        record.settings = ContestSettings {
            home_team: Some("Patriots".to_string()),
            away_team: Some("Seahawks".to_string()),
            lock: None,
        };
        service.register(record).expect("contest registers");

        for submission in bundle.submissions {
            service
                .submit(&contest_id(), submission)
                .expect("fixture submission accepted");
        }

        Arc::new(service)
    }
}

mod service {
    use super::common::*;
    use prop_pool::contest::{ContestServiceError, OutcomeSnapshot, Submission};
    use serde_json::json;

    #[test]
    fn results_arrive_in_stages() {
        let service = build_service();
        let full = bundle().outcomes.expect("fixture results");
        let partial = OutcomeSnapshot::from_value(json!({
            "first_td_scorer": full.get("first_td_scorer").cloned(),
            "safety": false
        }));

        service
            .record_outcomes(&contest_id(), partial, "first-quarter")
            .expect("partial outcomes recorded");
        let early = service.score_player(&contest_id(), "Blake").expect("scored");
        assert_eq!(early.total, 6.0 - 2.0 - 3.0);

        service
            .record_outcomes(&contest_id(), full, "final")
            .expect("final outcomes recorded");
        let late = service.score_player(&contest_id(), "Blake").expect("scored");
        assert_eq!(late.total, 15.0);
    }

    #[test]
    fn duplicate_entry_is_refused() {
        let service = build_service();

        let result = service.submit(&contest_id(), Submission::new("casey ", [("mvp", "Sam Darnold")]));

        assert!(matches!(result, Err(ContestServiceError::DuplicatePlayer(_))));
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use prop_pool::contest::contest_router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&body).expect("json")
    }

    #[tokio::test]
    async fn leaderboard_reflects_recorded_outcomes() {
        let router = contest_router(build_service());
        let outcomes = serde_json::to_value(bundle().outcomes.expect("fixture results"))
            .expect("serialize outcomes");

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/v1/contests/super-bowl-lx/outcomes")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::to_vec(&json!({ "outcomes": outcomes })).expect("serialize"),
                    ))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["source"], "manual");

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/contests/super-bowl-lx/leaderboard")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        let payload = body_json(response).await;

        assert_eq!(payload["scored"], true);
        let ranks: Vec<(u64, &str)> = payload["entries"]
            .as_array()
            .expect("entries")
            .iter()
            .map(|entry| {
                (
                    entry["rank"].as_u64().expect("rank"),
                    entry["player_name"].as_str().expect("name"),
                )
            })
            .collect();
        assert_eq!(
            ranks,
            vec![(1, "Avery"), (2, "Blake"), (2, "Dana"), (4, "Casey")]
        );
    }
}
