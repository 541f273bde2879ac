use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use super::domain::{Eligibility, OutcomeSnapshot, Submission};
use super::leaderboard::Leaderboard;
use super::proposition::ContestSchema;
use super::scoring::{ScoreCard, ScoringEngine};

pub const SCHEMA_FILE: &str = "props.json";
pub const RESULTS_FILE: &str = "results.json";
pub const ELIGIBILITY_FILE: &str = "eligibility.json";
pub const SUBMISSIONS_FILE: &str = "submissions.json";

#[derive(Debug)]
pub enum ContestLoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl std::fmt::Display for ContestLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContestLoadError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            ContestLoadError::Json { path, source } => {
                write!(f, "invalid contest data in {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ContestLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContestLoadError::Io { source, .. } => Some(source),
            ContestLoadError::Json { source, .. } => Some(source),
        }
    }
}

/// Everything needed to score a contest, as read from a directory of JSON documents.
#[derive(Debug, Clone)]
pub struct ContestBundle {
    pub schema: ContestSchema,
    /// `None` until a results document exists.
    pub outcomes: Option<OutcomeSnapshot>,
    pub eligibility: Eligibility,
    pub submissions: Vec<Submission>,
}

impl ContestBundle {
    /// Reads `props.json` plus the optional results, eligibility and submissions documents.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ContestLoadError> {
        let dir = dir.as_ref();
        let schema_path = dir.join(SCHEMA_FILE);
        let schema = read_document(&schema_path, schema_from_reader)?.ok_or_else(|| {
            ContestLoadError::Io {
                path: schema_path.clone(),
                source: std::io::Error::new(ErrorKind::NotFound, "prop sheet is required"),
            }
        })?;

        let outcomes = read_document(&dir.join(RESULTS_FILE), outcomes_from_reader)?;
        let eligibility =
            read_document(&dir.join(ELIGIBILITY_FILE), eligibility_from_reader)?.unwrap_or_default();
        let submissions =
            read_document(&dir.join(SUBMISSIONS_FILE), submissions_from_reader)?.unwrap_or_default();

        info!(
            contest = %schema.game_id,
            props = schema.props.len(),
            submissions = submissions.len(),
            has_results = outcomes.is_some(),
            "loaded contest bundle"
        );

        Ok(Self {
            schema,
            outcomes,
            eligibility,
            submissions,
        })
    }

    pub fn score_all(&self, engine: &ScoringEngine) -> Vec<ScoreCard> {
        self.submissions
            .iter()
            .map(|submission| {
                engine.score_latest(
                    submission,
                    &self.schema,
                    self.outcomes.as_ref(),
                    &self.eligibility,
                )
            })
            .collect()
    }

    pub fn leaderboard(&self, engine: &ScoringEngine) -> Leaderboard {
        Leaderboard::rank(&self.score_all(engine))
    }
}

pub fn schema_from_reader<R: Read>(reader: R) -> Result<ContestSchema, serde_json::Error> {
    serde_json::from_reader(reader)
}

pub fn outcomes_from_reader<R: Read>(reader: R) -> Result<OutcomeSnapshot, serde_json::Error> {
    let value: Value = serde_json::from_reader(reader)?;
    Ok(OutcomeSnapshot::from_value(value))
}

pub fn eligibility_from_reader<R: Read>(reader: R) -> Result<Eligibility, serde_json::Error> {
    serde_json::from_reader(reader)
}

pub fn submissions_from_reader<R: Read>(reader: R) -> Result<Vec<Submission>, serde_json::Error> {
    serde_json::from_reader(reader)
}

/// Missing files are "no data yet", not an error.
fn read_document<T, F>(path: &Path, parse: F) -> Result<Option<T>, ContestLoadError>
where
    T: DeserializeOwned,
    F: FnOnce(BufReader<File>) -> Result<T, serde_json::Error>,
{
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ContestLoadError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    parse(BufReader::new(file))
        .map(Some)
        .map_err(|source| ContestLoadError::Json {
            path: path.to_path_buf(),
            source,
        })
}
