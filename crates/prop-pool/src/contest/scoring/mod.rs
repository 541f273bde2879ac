mod config;
mod rules;
mod tiebreak;

pub use config::{MissingListPolicy, ScoringConfig};
pub use tiebreak::TiebreakDistance;

use serde::Serialize;
use tracing::debug;

use super::domain::{Eligibility, OutcomeSnapshot, PickStatus, PropId, Submission};
use super::proposition::ContestSchema;
use super::resolver::resolve_outcome;
use rules::score_pick;
use tiebreak::tiebreak_distance;

/// Stateless scorer that applies a [`ScoringConfig`] to submissions.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(
        &self,
        submission: &Submission,
        schema: &ContestSchema,
        outcomes: &OutcomeSnapshot,
        eligibility: &Eligibility,
    ) -> ScoreCard {
        let push_rule = self
            .config
            .push_rule
            .or(schema.push_rule)
            .unwrap_or_default();

        let mut total = 0.0;
        let mut breakdown = Vec::with_capacity(schema.props.len());

        for prop in &schema.props {
            let pick = submission.pick(&prop.id);
            let resolution = resolve_outcome(prop, outcomes, eligibility);
            let outcome = score_pick(
                prop,
                pick,
                &resolution,
                push_rule,
                self.config.missing_list_policy,
            );

            total += outcome.points;
            breakdown.push(PropScore {
                id: prop.id.clone(),
                label: prop.label.clone(),
                pick: pick.map(str::to_string),
                correct_answer: resolution.correct_answer(),
                points: outcome.points,
                status: outcome.status,
            });
        }

        let tiebreak = tiebreak_distance(submission.tiebreak.as_ref(), outcomes, &self.config);

        debug!(
            player = %submission.player_name,
            total,
            %tiebreak,
            "scored submission"
        );

        ScoreCard {
            player_name: submission.player_name.clone(),
            total,
            tiebreak,
            breakdown,
        }
    }

    /// Scores against the latest snapshot, or before any results exist when `outcomes` is `None`.
    ///
    /// Without a snapshot nothing has happened yet, so unrecorded lists stay pending whatever
    /// the configured [`MissingListPolicy`].
    pub fn score_latest(
        &self,
        submission: &Submission,
        schema: &ContestSchema,
        outcomes: Option<&OutcomeSnapshot>,
        eligibility: &Eligibility,
    ) -> ScoreCard {
        match outcomes {
            Some(outcomes) => self.score(submission, schema, outcomes, eligibility),
            None => ScoringEngine::new(ScoringConfig {
                missing_list_policy: MissingListPolicy::Pending,
                ..self.config.clone()
            })
            .score(submission, schema, &OutcomeSnapshot::default(), eligibility),
        }
    }
}

/// Scores one submission with the given options.
pub fn score_submission(
    submission: &Submission,
    schema: &ContestSchema,
    outcomes: &OutcomeSnapshot,
    eligibility: &Eligibility,
    config: &ScoringConfig,
) -> ScoreCard {
    ScoringEngine::new(config.clone()).score(submission, schema, outcomes, eligibility)
}

/// One proposition's contribution, kept for audit and display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropScore {
    pub id: PropId,
    pub label: String,
    pub pick: Option<String>,
    pub correct_answer: Option<String>,
    pub points: f64,
    pub status: PickStatus,
}

/// Scoring output for a single participant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCard {
    pub player_name: String,
    pub total: f64,
    pub tiebreak: TiebreakDistance,
    pub breakdown: Vec<PropScore>,
}

impl ScoreCard {
    pub fn entry(&self, id: &str) -> Option<&PropScore> {
        self.breakdown.iter().find(|entry| entry.id.as_str() == id)
    }

    pub fn count(&self, status: PickStatus) -> usize {
        self.breakdown
            .iter()
            .filter(|entry| entry.status == status)
            .count()
    }
}
