use serde::{Deserialize, Serialize};

use crate::contest::domain::PushRule;

/// Options for a scoring pass, layered over the prop sheet's own settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Overrides the prop sheet's `pushRule` when set.
    #[serde(default, alias = "pushRule")]
    pub push_rule: Option<PushRule>,
    #[serde(default, alias = "homeTeam")]
    pub home_team: Option<String>,
    #[serde(default, alias = "awayTeam")]
    pub away_team: Option<String>,
    #[serde(default, alias = "missingListPolicy")]
    pub missing_list_policy: MissingListPolicy,
}

impl ScoringConfig {
    pub fn with_teams(mut self, home: impl Into<String>, away: impl Into<String>) -> Self {
        self.home_team = Some(home.into());
        self.away_team = Some(away.into());
        self
    }

    pub fn with_push_rule(mut self, rule: PushRule) -> Self {
        self.push_rule = Some(rule);
        self
    }
}

/// How a yes-only player pick is scored while its outcome list has not been recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingListPolicy {
    /// Charge `pointsIncorrectYes`, so standings move before every list is final.
    #[default]
    Miss,
    Pending,
}

impl MissingListPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "miss" => Some(Self::Miss),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Miss => "miss",
            Self::Pending => "pending",
        }
    }
}
