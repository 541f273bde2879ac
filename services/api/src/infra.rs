use clap::Args;
use metrics_exporter_prometheus::PrometheusHandle;
use prop_pool::contest::{
    normalize_name, ContestBundle, ContestId, ContestRecord, ContestRepository, ContestService,
    ContestServiceError, ContestSettings, MissingListPolicy, OutcomeRecord, PushRule,
    RepositoryError, ScoringConfig, Submission,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryContestRepository {
    contests: Arc<Mutex<HashMap<ContestId, ContestRecord>>>,
}

impl InMemoryContestRepository {
    fn contests(&self) -> Result<MutexGuard<'_, HashMap<ContestId, ContestRecord>>, RepositoryError> {
        self.contests
            .lock()
            .map_err(|_| RepositoryError::Unavailable("contest store poisoned".to_string()))
    }
}

impl ContestRepository for InMemoryContestRepository {
    fn insert_contest(&self, record: ContestRecord) -> Result<(), RepositoryError> {
        let mut guard = self.contests()?;
        if guard.contains_key(record.contest_id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.contest_id().clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &ContestId) -> Result<Option<ContestRecord>, RepositoryError> {
        Ok(self.contests()?.get(id).cloned())
    }

    fn insert_submission(
        &self,
        id: &ContestId,
        submission: Submission,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.contests()?;
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
        let mut guard = self.contests()?;
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.outcomes = Some(outcomes);
        Ok(())
    }
}

/// Command-line overrides layered over the environment's scoring defaults.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct ScoringOverrides {
    /// Credit for results landing exactly on a line: zero or half
    #[arg(long, value_parser = parse_push_rule)]
    pub(crate) push_rule: Option<PushRule>,
    /// Yes-only list picks before the list is recorded: miss or pending
    #[arg(long, value_parser = parse_missing_list_policy)]
    pub(crate) missing_list_policy: Option<MissingListPolicy>,
    /// Home team name as it appears in the final score
    #[arg(long, requires = "away_team")]
    pub(crate) home_team: Option<String>,
    /// Away team name as it appears in the final score
    #[arg(long, requires = "home_team")]
    pub(crate) away_team: Option<String>,
}

impl ScoringOverrides {
    pub(crate) fn apply(&self, mut config: ScoringConfig) -> ScoringConfig {
        if let Some(rule) = self.push_rule {
            config.push_rule = Some(rule);
        }
        if let Some(policy) = self.missing_list_policy {
            config.missing_list_policy = policy;
        }
        if let (Some(home), Some(away)) = (&self.home_team, &self.away_team) {
            config = config.with_teams(home.clone(), away.clone());
        }
        config
    }
}

pub(crate) fn parse_push_rule(raw: &str) -> Result<PushRule, String> {
    PushRule::parse(raw).ok_or_else(|| format!("'{raw}' is not a push rule (zero, half)"))
}

pub(crate) fn parse_missing_list_policy(raw: &str) -> Result<MissingListPolicy, String> {
    MissingListPolicy::parse(raw)
        .ok_or_else(|| format!("'{raw}' is not a missing-list policy (miss, pending)"))
}

/// Registers a loaded contest with its submissions and, when present, its results.
pub(crate) fn load_contest<R>(
    service: &ContestService<R>,
    bundle: ContestBundle,
    settings: ContestSettings,
    source: &str,
) -> Result<ContestId, ContestServiceError>
where
    R: ContestRepository + 'static,
{
    let contest_id = bundle.schema.game_id.clone();
    let mut record = ContestRecord::new(bundle.schema);
    record.eligibility = bundle.eligibility;
    record.settings = settings;
    service.register(record)?;

    for submission in bundle.submissions {
        let player = submission.player_name.clone();
        if let Err(err) = service.submit(&contest_id, submission) {
            warn!(contest = %contest_id, %player, error = %err, "skipping submission");
        }
    }

    if let Some(outcomes) = bundle.outcomes {
        service.record_outcomes(&contest_id, outcomes, source)?;
    }

    info!(contest = %contest_id, "contest loaded");
    Ok(contest_id)
}
