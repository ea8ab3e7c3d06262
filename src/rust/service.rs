use std::fmt;

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::artifacts::{ArtifactError, Artifacts};
use crate::loader::{load_artifacts, ArtifactPaths};
use crate::normalize::normalize;

/// Whether the artifacts are available for inference.
///
/// Decided once at startup and never changed afterwards.
#[derive(Debug, Clone)]
pub enum Readiness {
    NotReady,
    Ready(Artifacts),
}

/// Reported by the health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    #[serde(rename = "ok")]
    Ok,
    #[serde(rename = "model not loaded")]
    ModelNotLoaded,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::ModelNotLoaded => "model not loaded",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded category for one description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    /// The description exactly as it was submitted.
    pub description: String,
    pub prediction: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("Model components not loaded. Check if model files exist.")]
    NotReady,
    #[error(transparent)]
    Inference(#[from] ArtifactError),
}

impl Readiness {
    /// Loads the artifacts once. A failure is logged and leaves the service
    /// `NotReady` instead of aborting startup.
    pub fn load(paths: &ArtifactPaths) -> Self {
        if !paths.all_present() {
            warn!("One or more artifact files are missing");
        }
        match load_artifacts(paths) {
            Ok(artifacts) => {
                info!("Model and components loaded successfully");
                Self::Ready(artifacts)
            }
            Err(e) => {
                error!("Error loading model components: {}", e);
                error!("Make sure the artifact files exist before starting the server");
                Self::NotReady
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn health(&self) -> HealthStatus {
        match self {
            Self::Ready(_) => HealthStatus::Ok,
            Self::NotReady => HealthStatus::ModelNotLoaded,
        }
    }

    /// Normalizes, vectorizes, classifies and decodes one description.
    pub fn predict(&self, description: &str) -> Result<Prediction, PredictError> {
        let artifacts = match self {
            Self::Ready(artifacts) => artifacts,
            Self::NotReady => return Err(PredictError::NotReady),
        };

        let cleaned = normalize(description);
        debug!("Normalized {:?} to {:?}", description, cleaned);

        let features = artifacts.vectorizer.transform(&[cleaned.as_str()])?;
        let class_id = artifacts
            .classifier
            .predict(&features)?
            .first()
            .copied()
            .ok_or(ArtifactError::NoOutput("classifier"))?;
        let label = artifacts
            .label_encoder
            .inverse_transform(&[class_id])?
            .into_iter()
            .next()
            .ok_or(ArtifactError::NoOutput("label encoder"))?;
        debug!("Predicted class {} ({})", class_id, label);

        Ok(Prediction {
            description: description.to_string(),
            prediction: label,
        })
    }
}
