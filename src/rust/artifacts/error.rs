use std::io;
use std::path::PathBuf;

/// Errors raised while loading an artifact or running inference through it.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid {artifact} artifact: {reason}")]
    Invalid {
        artifact: &'static str,
        reason: String,
    },
    #[error("Invalid token pattern: {0}")]
    TokenPattern(#[from] regex::Error),
    #[error("X has {actual} features, but the classifier is expecting {expected} features as input")]
    FeatureMismatch { expected: usize, actual: usize },
    #[error("y contains previously unseen labels: [{0}]")]
    UnseenLabel(i64),
    #[error("Empty input batch")]
    EmptyBatch,
    #[error("The {0} returned no output")]
    NoOutput(&'static str),
}

impl ArtifactError {
    pub(crate) fn invalid(artifact: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            artifact,
            reason: reason.into(),
        }
    }
}
